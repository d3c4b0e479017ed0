use super::{UserCommandService, password::validate_password};
use crate::{
    application::{dto::AuthenticatedUser, error::ApplicationResult},
    domain::{errors::AccessError, user::PasswordHash},
};

pub struct ChangePasswordCommand {
    pub current_password: String,
    pub new_password: String,
}

impl UserCommandService {
    /// Replaces the caller's password and signs out every session.
    pub async fn change_password(
        &self,
        actor: &AuthenticatedUser,
        command: ChangePasswordCommand,
    ) -> ApplicationResult<()> {
        let user = self
            .user_repo
            .find_by_id(actor.id)
            .await?
            .ok_or(AccessError::InvalidToken)?;

        self.password_hasher
            .verify(&command.current_password, user.password_hash.as_str())
            .await?;

        validate_password(&command.new_password)?;
        let hashed = self.password_hasher.hash(&command.new_password).await?;
        let now = self.clock.now();
        self.user_repo
            .update_password(user.id, PasswordHash::new(hashed)?, now)
            .await?;

        let revoked = self.refresh_tokens.revoke_all_for_user(user.id, now).await?;
        tracing::info!(user_id = %user.id, revoked, "password changed");

        Ok(())
    }
}
