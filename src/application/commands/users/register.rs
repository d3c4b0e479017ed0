use super::{UserCommandService, password::validate_password};
use crate::{
    application::{
        dto::AuthResultDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::user::{Email, FullName, NewUser, PasswordHash, PhoneNumber, User},
};

pub struct RegisterUserCommand {
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub full_name: String,
}

impl UserCommandService {
    pub async fn register(&self, command: RegisterUserCommand) -> ApplicationResult<AuthResultDto> {
        let email = Email::new(command.email)?;
        let phone_number = PhoneNumber::new(command.phone_number)?;
        let full_name = FullName::new(command.full_name)?;
        validate_password(&command.password)?;

        self.ensure_identifiers_available(&email, &phone_number)
            .await?;

        let user = self
            .create_and_insert_user(email, phone_number, full_name, &command.password)
            .await?;
        tracing::info!(user_id = %user.id, "user registered");

        let tokens = self.issue_session_tokens(&user).await?;

        Ok(AuthResultDto {
            user: user.into(),
            tokens,
        })
    }

    async fn ensure_identifiers_available(
        &self,
        email: &Email,
        phone_number: &PhoneNumber,
    ) -> ApplicationResult<()> {
        if self.user_repo.phone_exists(phone_number).await? {
            return Err(ApplicationError::conflict("phone number already registered"));
        }
        if self.user_repo.email_exists(email).await? {
            return Err(ApplicationError::conflict("email already registered"));
        }

        Ok(())
    }

    async fn create_and_insert_user(
        &self,
        email: Email,
        phone_number: PhoneNumber,
        full_name: FullName,
        password: &str,
    ) -> ApplicationResult<User> {
        let hashed = self.password_hasher.hash(password).await?;
        let password_hash = PasswordHash::new(hashed)?;

        let created_at = self.clock.now();
        let new_user =
            NewUser::registration(email, phone_number, full_name, password_hash, created_at);
        let user = self.user_repo.insert(new_user).await?;

        Ok(user)
    }
}
