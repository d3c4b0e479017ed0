// tests/support/mocks/repos.rs
use academy_core::domain::activation::{
    ActivationCode, ActivationCodeId, ActivationCodeRepository, CodeValue, NewActivationCode,
    Redemption,
};
use academy_core::domain::course::CourseId;
use academy_core::domain::enrollment::Enrollment;
use academy_core::domain::errors::{DomainError, DomainResult};
use academy_core::domain::session::{
    NewRefreshToken, RefreshTokenRecord, RefreshTokenRepository, TokenHash,
};
use academy_core::domain::user::UserId;
use academy_core::infrastructure::repositories::InMemoryStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Delegates to the in-memory store but fails the first `failures` redeem
/// calls with a transient error. Every redeem call is counted in
/// `redeem_calls`, which the test keeps a handle to.
pub struct FlakyCodeRepo {
    inner: Arc<InMemoryStore>,
    failures: u32,
    redeem_calls: Arc<AtomicU32>,
}

impl FlakyCodeRepo {
    pub fn new(inner: Arc<InMemoryStore>, failures: u32, redeem_calls: Arc<AtomicU32>) -> Self {
        Self {
            inner,
            failures,
            redeem_calls,
        }
    }
}

#[async_trait]
impl ActivationCodeRepository for FlakyCodeRepo {
    async fn insert(&self, code: NewActivationCode) -> DomainResult<ActivationCode> {
        ActivationCodeRepository::insert(self.inner.as_ref(), code).await
    }

    async fn find_by_code(&self, code: &CodeValue) -> DomainResult<Option<ActivationCode>> {
        self.inner.find_by_code(code).await
    }

    async fn set_active(
        &self,
        id: ActivationCodeId,
        is_active: bool,
        now: DateTime<Utc>,
    ) -> DomainResult<ActivationCode> {
        self.inner.set_active(id, is_active, now).await
    }

    async fn list(
        &self,
        course_id: Option<CourseId>,
        limit: u32,
        offset: u64,
    ) -> DomainResult<(Vec<ActivationCode>, u64)> {
        self.inner.list(course_id, limit, offset).await
    }

    async fn redeem(&self, redemption: Redemption) -> DomainResult<Enrollment> {
        let call = self.redeem_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.failures {
            return Err(DomainError::Transient(format!(
                "simulated serialization failure #{call}"
            )));
        }
        self.inner.redeem(redemption).await
    }
}

/// Delegates to the in-memory store but every `revoke` fails, leaving the
/// stored token untouched. Each revoke attempt is counted.
pub struct FailingRevokeRepo {
    inner: Arc<InMemoryStore>,
    revoke_calls: Arc<AtomicU32>,
}

impl FailingRevokeRepo {
    pub fn new(inner: Arc<InMemoryStore>, revoke_calls: Arc<AtomicU32>) -> Self {
        Self {
            inner,
            revoke_calls,
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for FailingRevokeRepo {
    async fn insert(&self, token: NewRefreshToken) -> DomainResult<RefreshTokenRecord> {
        RefreshTokenRepository::insert(self.inner.as_ref(), token).await
    }

    async fn find_by_hash(&self, hash: &TokenHash) -> DomainResult<Option<RefreshTokenRecord>> {
        self.inner.find_by_hash(hash).await
    }

    async fn revoke(&self, _hash: &TokenHash, _now: DateTime<Utc>) -> DomainResult<bool> {
        self.revoke_calls.fetch_add(1, Ordering::SeqCst);
        Err(DomainError::Persistence("simulated revoke failure".into()))
    }

    async fn revoke_all_for_user(&self, user_id: UserId, now: DateTime<Utc>) -> DomainResult<u64> {
        self.inner.revoke_all_for_user(user_id, now).await
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> DomainResult<u64> {
        self.inner.delete_expired(now).await
    }
}
