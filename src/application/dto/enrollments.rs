use crate::domain::course::Course;
use crate::domain::enrollment::{Enrollment, EnrollmentStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnrollmentDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_code_id: Option<Uuid>,
    pub status: EnrollmentStatus,
    pub enrolled_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub has_lifetime_access: bool,
    /// `-1` for lifetime access.
    pub days_remaining: i64,
}

impl EnrollmentDto {
    pub fn from_enrollment(enrollment: Enrollment, now: DateTime<Utc>) -> Self {
        Self {
            is_active: enrollment.is_active(now),
            has_lifetime_access: enrollment.has_lifetime_access(),
            days_remaining: enrollment.days_remaining(now),
            id: enrollment.id.into(),
            user_id: enrollment.user_id.into(),
            course_id: enrollment.course_id.into(),
            activation_code_id: enrollment.activation_code_id.map(Into::into),
            status: enrollment.status,
            enrolled_at: enrollment.enrolled_at,
            expires_at: enrollment.expires_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseSummaryDto {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
}

impl From<Course> for CourseSummaryDto {
    fn from(course: Course) -> Self {
        Self {
            id: course.id.into(),
            title: course.title,
            slug: course.slug,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RedemptionResultDto {
    pub enrollment: EnrollmentDto,
    pub course: CourseSummaryDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnrollmentCheckDto {
    pub course_id: Uuid,
    pub is_enrolled: bool,
}
