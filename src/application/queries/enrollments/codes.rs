use super::EnrollmentQueryService;
use crate::{
    application::{
        authorization::ensure_can_manage_codes,
        dto::{ActivationCodeDto, AuthenticatedUser, OffsetPage},
        error::ApplicationResult,
    },
    domain::course::CourseId,
};
use uuid::Uuid;

use super::list::MAX_PAGE_SIZE;

pub struct ListActivationCodesQuery {
    pub course_id: Option<Uuid>,
    pub limit: u32,
    pub offset: u64,
}

impl EnrollmentQueryService {
    pub async fn list_activation_codes(
        &self,
        actor: &AuthenticatedUser,
        query: ListActivationCodesQuery,
    ) -> ApplicationResult<OffsetPage<ActivationCodeDto>> {
        ensure_can_manage_codes(actor)?;

        let limit = query.limit.clamp(1, MAX_PAGE_SIZE);
        let (codes, total) = self
            .codes
            .list(query.course_id.map(CourseId), limit, query.offset)
            .await?;

        let now = self.clock.now();
        Ok(OffsetPage {
            items: codes
                .into_iter()
                .map(|code| ActivationCodeDto::from_code(code, now))
                .collect(),
            total,
            limit,
            offset: query.offset,
        })
    }
}
