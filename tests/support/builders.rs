// tests/support/builders.rs
use super::mocks::{QueuedCodeGenerator, StrictPasswordHasher, TestClock};
use academy_core::application::{
    commands::enrollments::RedemptionSettings,
    ports::{ClockPort, CodeGeneratorPort, PasswordHasherPort, TokenIssuerPort, time::Clock},
    services::ApplicationServices,
};
use academy_core::domain::{
    activation::ActivationCodeRepository, course::CourseRepository,
    enrollment::EnrollmentRepository, session::RefreshTokenRepository, user::UserRepository,
};
use academy_core::infrastructure::{
    repositories::InMemoryStore,
    security::token::{JwtTokenIssuer, TokenSettings},
};
use academy_core::presentation::http::{
    routes::{RouterSettings, build_router},
    state::HttpState,
};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

pub const ACCESS_SECRET: &str = "test-access-secret-0123456789abcdef";
pub const REFRESH_SECRET: &str = "test-refresh-secret-0123456789abcdef";

pub fn test_token_settings() -> TokenSettings {
    TokenSettings {
        access_secret: ACCESS_SECRET.into(),
        refresh_secret: REFRESH_SECRET.into(),
        access_ttl: Duration::minutes(15),
        refresh_ttl: Duration::days(7),
    }
}

/// Services wired against one in-memory store and a hand-driven clock.
pub struct TestApp {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<TestClock>,
    pub services: Arc<ApplicationServices>,
}

impl TestApp {
    pub fn new() -> Self {
        TestAppBuilder::new().build()
    }

    pub fn clock_now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn router(&self) -> axum::Router {
        build_router(
            HttpState {
                services: Arc::clone(&self.services),
            },
            &RouterSettings::default(),
        )
    }
}

pub struct TestAppBuilder {
    redemption: RedemptionSettings,
    password_hasher: Arc<PasswordHasherPort>,
    codes: Vec<String>,
    code_repo: Option<Box<dyn FnOnce(Arc<InMemoryStore>) -> Arc<dyn ActivationCodeRepository>>>,
    refresh_repo: Option<Box<dyn FnOnce(Arc<InMemoryStore>) -> Arc<dyn RefreshTokenRepository>>>,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            redemption: RedemptionSettings {
                retry_backoff: std::time::Duration::from_millis(1),
                ..RedemptionSettings::default()
            },
            password_hasher: Arc::new(StrictPasswordHasher),
            codes: Vec::new(),
            code_repo: None,
            refresh_repo: None,
        }
    }

    pub fn redemption(mut self, settings: RedemptionSettings) -> Self {
        self.redemption = settings;
        self
    }

    pub fn enrollment_validity(mut self, validity: Duration) -> Self {
        self.redemption.enrollment_validity = Some(validity);
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.redemption.max_attempts = attempts;
        self
    }

    pub fn password_hasher(mut self, hasher: Arc<PasswordHasherPort>) -> Self {
        self.password_hasher = hasher;
        self
    }

    /// Codes handed out, in order, by activation-code creation.
    pub fn generated_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.codes = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the activation-code repository, built around the shared store.
    pub fn code_repo<F>(mut self, wrap: F) -> Self
    where
        F: FnOnce(Arc<InMemoryStore>) -> Arc<dyn ActivationCodeRepository> + 'static,
    {
        self.code_repo = Some(Box::new(wrap));
        self
    }

    /// Replaces the refresh-token ledger, built around the shared store.
    pub fn refresh_repo<F>(mut self, wrap: F) -> Self
    where
        F: FnOnce(Arc<InMemoryStore>) -> Arc<dyn RefreshTokenRepository> + 'static,
    {
        self.refresh_repo = Some(Box::new(wrap));
        self
    }

    pub fn build(self) -> TestApp {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(TestClock::new());
        let clock_port: Arc<ClockPort> = clock.clone();

        let token_issuer: Arc<TokenIssuerPort> = Arc::new(
            JwtTokenIssuer::new(&test_token_settings(), Arc::clone(&clock_port))
                .expect("valid token settings"),
        );
        let code_generator: Arc<CodeGeneratorPort> =
            Arc::new(QueuedCodeGenerator::new(self.codes));

        let code_repo: Arc<dyn ActivationCodeRepository> = match self.code_repo {
            Some(wrap) => wrap(Arc::clone(&store)),
            None => store.clone(),
        };
        let user_repo: Arc<dyn UserRepository> = store.clone();
        let course_repo: Arc<dyn CourseRepository> = store.clone();
        let refresh_repo: Arc<dyn RefreshTokenRepository> = match self.refresh_repo {
            Some(wrap) => wrap(Arc::clone(&store)),
            None => store.clone(),
        };
        let enrollment_repo: Arc<dyn EnrollmentRepository> = store.clone();

        let services = Arc::new(ApplicationServices::new(
            user_repo,
            course_repo,
            refresh_repo,
            code_repo,
            enrollment_repo,
            self.password_hasher,
            token_issuer,
            code_generator,
            clock_port,
            self.redemption,
        ));

        TestApp {
            store,
            clock,
            services,
        }
    }
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
