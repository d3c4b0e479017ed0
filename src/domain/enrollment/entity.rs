// src/domain/enrollment/entity.rs
use crate::domain::activation::ActivationCodeId;
use crate::domain::course::CourseId;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrollmentId(pub Uuid);

impl From<Uuid> for EnrollmentId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<EnrollmentId> for Uuid {
    fn from(value: EnrollmentId) -> Self {
        value.0
    }
}

impl fmt::Display for EnrollmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// `Expired` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Active,
    Expired,
    Cancelled,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Active => false,
            Self::Expired | Self::Cancelled => true,
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(DomainError::Validation(format!(
                "unknown enrollment status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub user_id: UserId,
    pub course_id: CourseId,
    pub activation_code_id: Option<ActivationCodeId>,
    pub enrolled_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub status: EnrollmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Enrollment {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.status == EnrollmentStatus::Active && !self.has_lapsed(now)
    }

    /// Status is still active but the validity window has closed.
    pub fn has_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    pub fn has_lifetime_access(&self) -> bool {
        self.expires_at.is_none()
    }

    /// Whole days left, `-1` for lifetime access and `0` once lapsed.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        match self.expires_at {
            None => -1,
            Some(expires_at) if expires_at <= now => 0,
            Some(expires_at) => (expires_at - now).num_days(),
        }
    }

    pub fn cancel(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.transition(EnrollmentStatus::Cancelled, now)
    }

    pub fn expire(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.transition(EnrollmentStatus::Expired, now)
    }

    fn transition(&mut self, next: EnrollmentStatus, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(DomainError::Conflict(format!(
                "enrollment is already {}",
                self.status
            )));
        }
        self.status = next;
        self.updated_at = now;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub user_id: UserId,
    pub course_id: CourseId,
    pub activation_code_id: Option<ActivationCodeId>,
    pub enrolled_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewEnrollment {
    pub fn into_enrollment(self, id: EnrollmentId) -> Enrollment {
        Enrollment {
            id,
            user_id: self.user_id,
            course_id: self.course_id,
            activation_code_id: self.activation_code_id,
            enrolled_at: self.enrolled_at,
            expires_at: self.expires_at,
            status: EnrollmentStatus::Active,
            created_at: self.enrolled_at,
            updated_at: self.enrolled_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn enrollment(expires_in: Option<Duration>) -> Enrollment {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        NewEnrollment {
            user_id: UserId::generate(),
            course_id: CourseId(Uuid::new_v4()),
            activation_code_id: None,
            enrolled_at: now,
            expires_at: expires_in.map(|d| now + d),
        }
        .into_enrollment(EnrollmentId(Uuid::new_v4()))
    }

    #[test]
    fn lifetime_enrollment_never_lapses() {
        let e = enrollment(None);
        assert!(e.has_lifetime_access());
        assert_eq!(e.days_remaining(e.enrolled_at + Duration::days(10_000)), -1);
        assert!(e.is_active(e.enrolled_at + Duration::days(10_000)));
    }

    #[test]
    fn windowed_enrollment_counts_down() {
        let e = enrollment(Some(Duration::days(30)));
        assert_eq!(e.days_remaining(e.enrolled_at + Duration::days(10)), 20);
        assert_eq!(e.days_remaining(e.enrolled_at + Duration::days(31)), 0);
        assert!(!e.is_active(e.enrolled_at + Duration::days(30)));
    }

    #[test]
    fn terminal_states_reject_transitions() {
        let mut e = enrollment(None);
        let later = e.enrolled_at + Duration::hours(1);
        e.cancel(later).unwrap();
        assert_eq!(e.status, EnrollmentStatus::Cancelled);
        assert_eq!(e.updated_at, later);
        assert!(matches!(e.expire(later), Err(DomainError::Conflict(_))));
        assert!(matches!(e.cancel(later), Err(DomainError::Conflict(_))));
    }
}
