use super::EnrollmentQueryService;
use crate::{
    application::{
        dto::{AuthenticatedUser, CursorPage, EnrollmentDto},
        error::ApplicationResult,
    },
    domain::enrollment::EnrollmentListCursor,
};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

pub struct ListEnrollmentsQuery {
    pub limit: u32,
    pub cursor: Option<String>,
}

impl EnrollmentQueryService {
    /// The caller's enrollments, most recent first.
    pub async fn list_my_enrollments(
        &self,
        actor: &AuthenticatedUser,
        query: ListEnrollmentsQuery,
    ) -> ApplicationResult<CursorPage<EnrollmentDto>> {
        let limit = query.limit.clamp(1, MAX_PAGE_SIZE);
        let cursor = query
            .cursor
            .as_deref()
            .map(EnrollmentListCursor::decode)
            .transpose()?;

        let (items, next_cursor) = self
            .enrollments
            .list_for_user(actor.id, limit, cursor)
            .await?;

        let now = self.clock.now();
        let items = items
            .into_iter()
            .map(|enrollment| EnrollmentDto::from_enrollment(enrollment, now))
            .collect();

        Ok(CursorPage::new(
            items,
            next_cursor.map(|cursor| cursor.encode()),
        ))
    }
}
