use crate::domain::activation::{
    entity::{ActivationCode, NewActivationCode, Redemption},
    value_objects::{ActivationCodeId, CodeValue},
};
use crate::domain::course::CourseId;
use crate::domain::enrollment::Enrollment;
use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait ActivationCodeRepository: Send + Sync {
    /// Fails with `Conflict` when the code text is already taken.
    async fn insert(&self, code: NewActivationCode) -> DomainResult<ActivationCode>;

    async fn find_by_code(&self, code: &CodeValue) -> DomainResult<Option<ActivationCode>>;

    async fn set_active(
        &self,
        id: ActivationCodeId,
        is_active: bool,
        now: DateTime<Utc>,
    ) -> DomainResult<ActivationCode>;

    /// Newest first, with the total number of matching codes.
    async fn list(
        &self,
        course_id: Option<CourseId>,
        limit: u32,
        offset: u64,
    ) -> DomainResult<(Vec<ActivationCode>, u64)>;

    /// Consumes one use and creates the enrollment as a single atomic unit.
    ///
    /// The code's state and the enrollment uniqueness are re-checked inside
    /// the unit. A lost race surfaces as the matching `AccessError`
    /// (`ActivationCodeUsedUp`, `AlreadyEnrolled`, ...); nothing is written in
    /// that case. Failures worth retrying surface as `DomainError::Transient`.
    async fn redeem(&self, redemption: Redemption) -> DomainResult<Enrollment>;
}
