use std::sync::Arc;

use crate::application::ports::ClockPort;
use crate::domain::{activation::ActivationCodeRepository, enrollment::EnrollmentRepository};

pub struct EnrollmentQueryService {
    pub(super) enrollments: Arc<dyn EnrollmentRepository>,
    pub(super) codes: Arc<dyn ActivationCodeRepository>,
    pub(super) clock: Arc<ClockPort>,
}

impl EnrollmentQueryService {
    pub fn new(
        enrollments: Arc<dyn EnrollmentRepository>,
        codes: Arc<dyn ActivationCodeRepository>,
        clock: Arc<ClockPort>,
    ) -> Self {
        Self {
            enrollments,
            codes,
            clock,
        }
    }
}
