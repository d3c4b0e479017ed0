use super::EnrollmentCommandService;
use crate::{
    application::{
        dto::{AuthenticatedUser, EnrollmentDto, RedemptionResultDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        activation::{CodeValue, Redemption},
        enrollment::Enrollment,
        errors::AccessError,
    },
};

pub struct RedeemCodeCommand {
    pub code: String,
}

impl EnrollmentCommandService {
    /// Exchanges an activation code for an enrollment of the caller.
    ///
    /// The checks before the write are a fast path only. The store repeats
    /// them inside the atomic redeem, which is what guarantees the use limit
    /// and the one-active-enrollment rule under concurrency.
    pub async fn redeem(
        &self,
        actor: &AuthenticatedUser,
        command: RedeemCodeCommand,
    ) -> ApplicationResult<RedemptionResultDto> {
        let code = CodeValue::normalize(&command.code)?;

        let activation = self
            .codes
            .find_by_code(&code)
            .await?
            .ok_or(AccessError::ActivationCodeNotFound)?;

        let course = self
            .courses
            .find_by_id(activation.course_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("course not found"))?;

        let now = self.clock.now();
        activation.check_redeemable(now)?;

        if self.enrollments.is_active(actor.id, course.id, now).await? {
            return Err(AccessError::AlreadyEnrolled.into());
        }

        let enrollment_expires_at = match self.settings.enrollment_validity {
            Some(window) => Some(now.checked_add_signed(window).ok_or_else(|| {
                ApplicationError::infrastructure("enrollment expiry out of range")
            })?),
            None => None,
        };
        let redemption = Redemption {
            code_id: activation.id,
            user_id: actor.id,
            course_id: course.id,
            redeemed_at: now,
            enrollment_expires_at,
        };
        let enrollment = self.redeem_with_retry(redemption).await?;

        tracing::info!(
            user_id = %actor.id,
            course_id = %course.id,
            code_id = %activation.id,
            enrollment_id = %enrollment.id,
            "activation code redeemed"
        );

        Ok(RedemptionResultDto {
            enrollment: EnrollmentDto::from_enrollment(enrollment, now),
            course: course.into(),
        })
    }

    async fn redeem_with_retry(&self, redemption: Redemption) -> ApplicationResult<Enrollment> {
        let max_attempts = self.settings.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.codes.redeem(redemption.clone()).await {
                Ok(enrollment) => return Ok(enrollment),
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        code_id = %redemption.code_id,
                        error = %err,
                        "transient failure while redeeming, retrying"
                    );
                    tokio::time::sleep(self.settings.retry_backoff * attempt).await;
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
