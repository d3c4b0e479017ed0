use std::{sync::Arc, time::Duration};

use crate::application::ports::{ClockPort, CodeGeneratorPort};
use crate::domain::{
    activation::ActivationCodeRepository, course::CourseRepository,
    enrollment::EnrollmentRepository,
};

/// Deployment-wide redemption behaviour.
#[derive(Debug, Clone, Copy)]
pub struct RedemptionSettings {
    /// Enrollment window from redemption time; `None` grants lifetime access.
    pub enrollment_validity: Option<chrono::Duration>,
    /// Attempts of the atomic redeem step when storage reports a transient failure.
    pub max_attempts: u32,
    pub retry_backoff: Duration,
}

impl Default for RedemptionSettings {
    fn default() -> Self {
        Self {
            enrollment_validity: None,
            max_attempts: 3,
            retry_backoff: Duration::from_millis(25),
        }
    }
}

pub struct EnrollmentCommandService {
    pub(super) codes: Arc<dyn ActivationCodeRepository>,
    pub(super) enrollments: Arc<dyn EnrollmentRepository>,
    pub(super) courses: Arc<dyn CourseRepository>,
    pub(super) code_generator: Arc<CodeGeneratorPort>,
    pub(super) clock: Arc<ClockPort>,
    pub(super) settings: RedemptionSettings,
}

impl EnrollmentCommandService {
    pub fn new(
        codes: Arc<dyn ActivationCodeRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
        courses: Arc<dyn CourseRepository>,
        code_generator: Arc<CodeGeneratorPort>,
        clock: Arc<ClockPort>,
        settings: RedemptionSettings,
    ) -> Self {
        Self {
            codes,
            enrollments,
            courses,
            code_generator,
            clock,
            settings,
        }
    }
}
