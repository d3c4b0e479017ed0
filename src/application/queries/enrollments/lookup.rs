use super::EnrollmentQueryService;
use crate::{
    application::{
        dto::{AuthenticatedUser, EnrollmentCheckDto, EnrollmentDto},
        error::ApplicationResult,
    },
    domain::{course::CourseId, errors::AccessError},
};
use uuid::Uuid;

impl EnrollmentQueryService {
    pub async fn is_enrolled(
        &self,
        actor: &AuthenticatedUser,
        course_id: Uuid,
    ) -> ApplicationResult<EnrollmentCheckDto> {
        let is_enrolled = self
            .enrollments
            .is_active(actor.id, CourseId(course_id), self.clock.now())
            .await?;

        Ok(EnrollmentCheckDto {
            course_id,
            is_enrolled,
        })
    }

    /// Most recent enrollment of the caller in a course, whatever its status.
    pub async fn get_enrollment(
        &self,
        actor: &AuthenticatedUser,
        course_id: Uuid,
    ) -> ApplicationResult<EnrollmentDto> {
        let enrollment = self
            .enrollments
            .find_latest(actor.id, CourseId(course_id))
            .await?
            .ok_or(AccessError::EnrollmentNotFound)?;

        Ok(EnrollmentDto::from_enrollment(enrollment, self.clock.now()))
    }
}
