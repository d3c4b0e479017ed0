use crate::domain::errors::DomainResult;
use crate::domain::user::{
    entity::{NewUser, User},
    value_objects::{Email, LoginIdentifier, PasswordHash, PhoneNumber, UserId},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the email or phone number is already taken.
    async fn insert(&self, new_user: NewUser) -> DomainResult<User>;

    async fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>>;

    async fn find_by_identifier(&self, identifier: &LoginIdentifier) -> DomainResult<Option<User>>;

    async fn email_exists(&self, email: &Email) -> DomainResult<bool>;

    async fn phone_exists(&self, phone: &PhoneNumber) -> DomainResult<bool>;

    async fn update_password(
        &self,
        id: UserId,
        password_hash: PasswordHash,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<()>;
}
