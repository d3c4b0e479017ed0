// src/domain/activation/entity.rs
use crate::domain::activation::value_objects::{ActivationCodeId, CodeValue};
use crate::domain::course::CourseId;
use crate::domain::enrollment::NewEnrollment;
use crate::domain::errors::AccessError;
use crate::domain::user::UserId;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct ActivationCode {
    pub id: ActivationCodeId,
    pub code: CodeValue,
    pub course_id: CourseId,
    /// `None` means unlimited.
    pub max_uses: Option<u32>,
    pub current_uses: u32,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_by: UserId,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ActivationCode {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    pub fn is_used_up(&self) -> bool {
        self.max_uses.is_some_and(|max| self.current_uses >= max)
    }

    /// `None` when the code has no use limit.
    pub fn remaining_uses(&self) -> Option<u32> {
        self.max_uses.map(|max| max.saturating_sub(self.current_uses))
    }

    /// First failing check wins: inactive, then expired, then used up.
    pub fn check_redeemable(&self, now: DateTime<Utc>) -> Result<(), AccessError> {
        if !self.is_active {
            return Err(AccessError::ActivationCodeInactive);
        }
        if self.is_expired(now) {
            return Err(AccessError::ActivationCodeExpired);
        }
        if self.is_used_up() {
            return Err(AccessError::ActivationCodeUsedUp);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NewActivationCode {
    pub code: CodeValue,
    pub course_id: CourseId,
    pub max_uses: Option<u32>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_by: UserId,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One use of a code by one user, applied atomically by the store.
#[derive(Debug, Clone)]
pub struct Redemption {
    pub code_id: ActivationCodeId,
    pub user_id: UserId,
    pub course_id: CourseId,
    pub redeemed_at: DateTime<Utc>,
    pub enrollment_expires_at: Option<DateTime<Utc>>,
}

impl Redemption {
    pub fn new_enrollment(&self) -> NewEnrollment {
        NewEnrollment {
            user_id: self.user_id,
            course_id: self.course_id,
            activation_code_id: Some(self.code_id),
            enrolled_at: self.redeemed_at,
            expires_at: self.enrollment_expires_at,
        }
    }
}
