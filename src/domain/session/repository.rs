use crate::domain::errors::DomainResult;
use crate::domain::session::entity::{NewRefreshToken, RefreshTokenRecord, TokenHash};
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn insert(&self, token: NewRefreshToken) -> DomainResult<RefreshTokenRecord>;

    async fn find_by_hash(&self, hash: &TokenHash) -> DomainResult<Option<RefreshTokenRecord>>;

    /// Returns whether a row changed state. Revoking twice is not an error.
    async fn revoke(&self, hash: &TokenHash, now: DateTime<Utc>) -> DomainResult<bool>;

    async fn revoke_all_for_user(&self, user_id: UserId, now: DateTime<Utc>) -> DomainResult<u64>;

    /// Hard-deletes rows whose lifetime ended at or before `now`.
    async fn delete_expired(&self, now: DateTime<Utc>) -> DomainResult<u64>;
}
