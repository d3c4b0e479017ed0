use crate::domain::course::CourseId;
use crate::domain::enrollment::{
    cursor::EnrollmentListCursor,
    entity::{Enrollment, EnrollmentId, NewEnrollment},
};
use crate::domain::errors::DomainResult;
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Fails with `AccessError::AlreadyEnrolled` when the pair already has an
    /// active row.
    async fn insert(&self, enrollment: NewEnrollment) -> DomainResult<Enrollment>;

    async fn find_by_id(&self, id: EnrollmentId) -> DomainResult<Option<Enrollment>>;

    async fn is_active(
        &self,
        user_id: UserId,
        course_id: CourseId,
        now: DateTime<Utc>,
    ) -> DomainResult<bool>;

    /// Most recent enrollment of the pair in any status.
    async fn find_latest(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> DomainResult<Option<Enrollment>>;

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: u32,
        cursor: Option<EnrollmentListCursor>,
    ) -> DomainResult<(Vec<Enrollment>, Option<EnrollmentListCursor>)>;

    /// Moves an active enrollment to `cancelled`.
    async fn cancel(&self, id: EnrollmentId, now: DateTime<Utc>) -> DomainResult<Enrollment>;

    /// Marks active rows whose window closed at or before `now` as expired.
    async fn expire_lapsed(&self, now: DateTime<Utc>) -> DomainResult<u64>;
}
