use super::UserCommandService;
use crate::{
    application::{dto::TokenPairDto, error::ApplicationResult},
    domain::{
        errors::AccessError,
        session::{RefreshTokenRecord, RefreshTokenState, TokenHash},
        user::User,
    },
};

pub struct RefreshTokenCommand {
    pub refresh_token: String,
}

impl UserCommandService {
    /// Rotates a refresh token: a new pair is issued first, then the presented
    /// token is revoked. A failed revoke is logged and does not fail the call.
    pub async fn refresh_token(
        &self,
        command: RefreshTokenCommand,
    ) -> ApplicationResult<TokenPairDto> {
        let claims = self.token_issuer.verify_refresh(&command.refresh_token)?;
        let hash = TokenHash::of(&command.refresh_token);

        let record = self.load_usable_record(&hash).await?;
        if record.user_id != claims.subject {
            tracing::warn!(
                user_id = %claims.subject,
                "refresh token subject does not match ledger"
            );
            return Err(AccessError::InvalidRefreshToken.into());
        }

        let user = self.load_active_subject(&record).await?;
        let tokens = self.issue_session_tokens(&user).await?;

        if let Err(err) = self.refresh_tokens.revoke(&hash, self.clock.now()).await {
            tracing::warn!(
                user_id = %user.id,
                error = %err,
                "failed to revoke rotated refresh token"
            );
        }

        Ok(tokens)
    }

    async fn load_usable_record(&self, hash: &TokenHash) -> ApplicationResult<RefreshTokenRecord> {
        let record = self
            .refresh_tokens
            .find_by_hash(hash)
            .await?
            .ok_or(AccessError::InvalidRefreshToken)?;

        match record.state(self.clock.now()) {
            RefreshTokenState::Usable => Ok(record),
            RefreshTokenState::Revoked => Err(AccessError::RefreshTokenRevoked.into()),
            RefreshTokenState::Expired => Err(AccessError::RefreshTokenExpired.into()),
        }
    }

    async fn load_active_subject(&self, record: &RefreshTokenRecord) -> ApplicationResult<User> {
        let user = self
            .user_repo
            .find_by_id(record.user_id)
            .await?
            .ok_or(AccessError::InvalidRefreshToken)?;

        if !user.is_active {
            return Err(AccessError::UserNotActive.into());
        }

        Ok(user)
    }
}
