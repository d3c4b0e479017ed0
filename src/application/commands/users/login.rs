use super::UserCommandService;
use crate::{
    application::{
        dto::AuthResultDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        errors::AccessError,
        user::{LoginIdentifier, User},
    },
};

const DECOY_PASSWORD: &str = "decoy-password-never-assigned";

pub struct LoginUserCommand {
    /// Email address or phone number.
    pub identifier: String,
    pub password: String,
}

impl UserCommandService {
    pub async fn login(&self, command: LoginUserCommand) -> ApplicationResult<AuthResultDto> {
        let user = self
            .verify_credentials(&command.identifier, &command.password)
            .await?;

        let tokens = self.issue_session_tokens(&user).await?;

        Ok(AuthResultDto {
            user: user.into(),
            tokens,
        })
    }

    /// Unknown identifiers, unparseable identifiers and wrong passwords are
    /// indistinguishable, including in time spent: a miss still runs one
    /// password verification. The active flag is only consulted once the
    /// password has been verified.
    pub async fn verify_credentials(
        &self,
        identifier: &str,
        password: &str,
    ) -> ApplicationResult<User> {
        let Ok(identifier) = LoginIdentifier::parse(identifier) else {
            return Err(self.reject_unknown(password).await);
        };

        let Some(user) = self.user_repo.find_by_identifier(&identifier).await? else {
            return Err(self.reject_unknown(password).await);
        };

        self.password_hasher
            .verify(password, user.password_hash.as_str())
            .await?;

        if !user.is_active {
            tracing::debug!(user_id = %user.id, "login rejected for inactive account");
            return Err(AccessError::UserNotActive.into());
        }

        Ok(user)
    }

    async fn reject_unknown(&self, password: &str) -> ApplicationError {
        let decoy = self
            .decoy_hash
            .get_or_try_init(|| self.password_hasher.hash(DECOY_PASSWORD))
            .await;
        match decoy {
            Ok(hash) => {
                let _ = self.password_hasher.verify(password, hash).await;
            }
            Err(err) => tracing::warn!(error = %err, "failed to prepare decoy password hash"),
        }
        AccessError::InvalidCredentials.into()
    }
}
