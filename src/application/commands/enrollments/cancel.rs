use super::EnrollmentCommandService;
use crate::{
    application::{
        authorization::ensure_can_manage_enrollments,
        dto::{AuthenticatedUser, EnrollmentDto},
        error::ApplicationResult,
    },
    domain::enrollment::EnrollmentId,
};
use uuid::Uuid;

pub struct CancelEnrollmentCommand {
    pub enrollment_id: Uuid,
}

impl EnrollmentCommandService {
    pub async fn cancel_enrollment(
        &self,
        actor: &AuthenticatedUser,
        command: CancelEnrollmentCommand,
    ) -> ApplicationResult<EnrollmentDto> {
        ensure_can_manage_enrollments(actor)?;

        let now = self.clock.now();
        let enrollment = self
            .enrollments
            .cancel(EnrollmentId(command.enrollment_id), now)
            .await?;
        tracing::info!(
            actor_id = %actor.id,
            enrollment_id = %enrollment.id,
            "enrollment cancelled"
        );

        Ok(EnrollmentDto::from_enrollment(enrollment, now))
    }
}
