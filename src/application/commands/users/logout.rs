use super::UserCommandService;
use crate::{
    application::{dto::AuthenticatedUser, error::ApplicationResult},
    domain::session::TokenHash,
};

pub struct LogoutCommand {
    pub refresh_token: String,
}

impl UserCommandService {
    /// Revokes one refresh token. Succeeds whether or not the token was known.
    pub async fn logout(&self, command: LogoutCommand) -> ApplicationResult<()> {
        let hash = TokenHash::of(&command.refresh_token);
        let revoked = self.refresh_tokens.revoke(&hash, self.clock.now()).await?;
        tracing::debug!(revoked, "logout processed");
        Ok(())
    }

    /// Revokes every outstanding refresh token of the caller.
    pub async fn logout_all(&self, actor: &AuthenticatedUser) -> ApplicationResult<u64> {
        let revoked = self
            .refresh_tokens
            .revoke_all_for_user(actor.id, self.clock.now())
            .await?;
        tracing::info!(user_id = %actor.id, revoked, "revoked all sessions");
        Ok(revoked)
    }
}
