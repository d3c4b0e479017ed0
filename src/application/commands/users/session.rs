use super::UserCommandService;
use crate::{
    application::{dto::TokenPairDto, error::ApplicationResult},
    domain::{
        session::{NewRefreshToken, TokenHash},
        user::User,
    },
};

impl UserCommandService {
    /// Mints an access/refresh pair and records the refresh token in the
    /// ledger. Only the hash of the refresh token is persisted.
    pub(super) async fn issue_session_tokens(
        &self,
        user: &User,
    ) -> ApplicationResult<TokenPairDto> {
        let access = self.token_issuer.issue_access(user.id)?;
        let refresh = self.token_issuer.issue_refresh(user.id)?;

        self.refresh_tokens
            .insert(NewRefreshToken {
                user_id: user.id,
                token_hash: TokenHash::of(&refresh.token),
                expires_at: refresh.expires_at,
                created_at: self.clock.now(),
            })
            .await?;

        Ok(TokenPairDto::from_issued(access, refresh))
    }
}
