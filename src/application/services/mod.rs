// src/application/services/mod.rs
use std::sync::Arc;

use crate::{
    application::{
        ApplicationResult,
        commands::{
            enrollments::{EnrollmentCommandService, RedemptionSettings},
            users::UserCommandService,
        },
        dto::AuthenticatedUser,
        ports::{ClockPort, CodeGeneratorPort, PasswordHasherPort, TokenIssuerPort},
        queries::{enrollments::EnrollmentQueryService, users::UserQueryService},
    },
    domain::{
        activation::ActivationCodeRepository, course::CourseRepository,
        enrollment::EnrollmentRepository, errors::AccessError, session::RefreshTokenRepository,
        user::UserRepository,
    },
};

pub struct ApplicationServices {
    pub user_commands: Arc<UserCommandService>,
    pub user_queries: Arc<UserQueryService>,
    pub enrollment_commands: Arc<EnrollmentCommandService>,
    pub enrollment_queries: Arc<EnrollmentQueryService>,
    user_repo: Arc<dyn UserRepository>,
    token_issuer: Arc<TokenIssuerPort>,
}

impl ApplicationServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        course_repo: Arc<dyn CourseRepository>,
        refresh_token_repo: Arc<dyn RefreshTokenRepository>,
        activation_code_repo: Arc<dyn ActivationCodeRepository>,
        enrollment_repo: Arc<dyn EnrollmentRepository>,
        password_hasher: Arc<PasswordHasherPort>,
        token_issuer: Arc<TokenIssuerPort>,
        code_generator: Arc<CodeGeneratorPort>,
        clock: Arc<ClockPort>,
        redemption: RedemptionSettings,
    ) -> Self {
        let user_commands = Arc::new(UserCommandService::new(
            Arc::clone(&user_repo),
            Arc::clone(&refresh_token_repo),
            Arc::clone(&password_hasher),
            Arc::clone(&token_issuer),
            Arc::clone(&clock),
        ));
        let user_queries = Arc::new(UserQueryService::new(
            Arc::clone(&user_repo),
            Arc::clone(&clock),
        ));

        let enrollment_commands = Arc::new(EnrollmentCommandService::new(
            Arc::clone(&activation_code_repo),
            Arc::clone(&enrollment_repo),
            Arc::clone(&course_repo),
            Arc::clone(&code_generator),
            Arc::clone(&clock),
            redemption,
        ));
        let enrollment_queries = Arc::new(EnrollmentQueryService::new(
            Arc::clone(&enrollment_repo),
            Arc::clone(&activation_code_repo),
            Arc::clone(&clock),
        ));

        Self {
            user_commands,
            user_queries,
            enrollment_commands,
            enrollment_queries,
            user_repo,
            token_issuer,
        }
    }

    pub fn token_issuer(&self) -> Arc<TokenIssuerPort> {
        Arc::clone(&self.token_issuer)
    }

    /// Resolve a raw bearer token into the calling user.
    ///
    /// Signature and expiry are checked without storage access; the subject is
    /// then loaded to pick up its current role and to reject accounts that
    /// were deactivated after the token was issued.
    pub async fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser> {
        let verified = self.token_issuer.verify_access(token)?;

        let user = self
            .user_repo
            .find_by_id(verified.subject)
            .await?
            .ok_or(AccessError::InvalidToken)?;

        if !user.is_active {
            return Err(AccessError::UserNotActive.into());
        }

        Ok(AuthenticatedUser {
            id: user.id,
            role: user.role,
            issued_at: verified.issued_at,
            expires_at: verified.expires_at,
        })
    }
}
