use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::application::ports::{ClockPort, PasswordHasherPort, TokenIssuerPort};
use crate::domain::{session::RefreshTokenRepository, user::UserRepository};

pub struct UserCommandService {
    pub(super) user_repo: Arc<dyn UserRepository>,
    pub(super) refresh_tokens: Arc<dyn RefreshTokenRepository>,
    pub(super) password_hasher: Arc<PasswordHasherPort>,
    pub(super) token_issuer: Arc<TokenIssuerPort>,
    pub(super) clock: Arc<ClockPort>,
    /// Hash compared against when no account matches the identifier.
    pub(super) decoy_hash: OnceCell<String>,
}

impl UserCommandService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        refresh_tokens: Arc<dyn RefreshTokenRepository>,
        password_hasher: Arc<PasswordHasherPort>,
        token_issuer: Arc<TokenIssuerPort>,
        clock: Arc<ClockPort>,
    ) -> Self {
        Self {
            user_repo,
            refresh_tokens,
            password_hasher,
            token_issuer,
            clock,
            decoy_hash: OnceCell::new(),
        }
    }
}
