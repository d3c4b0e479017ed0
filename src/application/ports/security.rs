// src/application/ports/security.rs
use crate::application::ApplicationResult;
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> ApplicationResult<String>;
    /// Fails with `AccessError::InvalidCredentials` on mismatch.
    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<()>;
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl IssuedToken {
    pub fn expires_in_seconds(&self) -> i64 {
        (self.expires_at - self.issued_at).num_seconds().max(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject: UserId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Signs and checks bearer credentials. Access and refresh tokens are signed
/// with different keys, so one can never be accepted as the other.
pub trait TokenIssuer: Send + Sync {
    fn issue_access(&self, subject: UserId) -> ApplicationResult<IssuedToken>;

    fn issue_refresh(&self, subject: UserId) -> ApplicationResult<IssuedToken>;

    /// Fails with `InvalidToken` or `TokenExpired`. Never touches storage.
    fn verify_access(&self, token: &str) -> ApplicationResult<VerifiedToken>;

    /// Fails with `InvalidRefreshToken` or `RefreshTokenExpired`. Ledger
    /// state is checked by the caller.
    fn verify_refresh(&self, token: &str) -> ApplicationResult<VerifiedToken>;
}
