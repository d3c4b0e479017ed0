use crate::domain::errors::{AccessError, DomainError};

pub(super) const CNT_USER_EMAIL: &str = "users_email_key";
pub(super) const CNT_USER_PHONE: &str = "users_phone_number_key";
pub(super) const CNT_ACTIVATION_CODE: &str = "activation_codes_code_key";
pub(super) const CNT_ACTIVATION_CODE_COURSE: &str = "activation_codes_course_id_fkey";
pub(super) const CNT_ACTIVATION_CODE_USES: &str = "activation_codes_uses_within_limit_chk";
pub(super) const CNT_ENROLLMENT_ACTIVE: &str = "enrollments_one_active_per_course";
pub(super) const CNT_REFRESH_TOKEN_HASH: &str = "refresh_tokens_token_hash_key";

/// Translate a sqlx failure into the domain vocabulary. Constraint names
/// that encode a business rule map to that rule; retryable conditions map to
/// `Transient`; everything else stays opaque.
pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(constraint) = db_err.constraint() {
                return match constraint {
                    CNT_USER_EMAIL => DomainError::Conflict("email already registered".into()),
                    CNT_USER_PHONE => {
                        DomainError::Conflict("phone number already registered".into())
                    }
                    CNT_ACTIVATION_CODE => {
                        DomainError::Conflict("activation code already exists".into())
                    }
                    CNT_ACTIVATION_CODE_COURSE => DomainError::NotFound("course not found".into()),
                    CNT_ACTIVATION_CODE_USES => AccessError::ActivationCodeUsedUp.into(),
                    CNT_ENROLLMENT_ACTIVE => AccessError::AlreadyEnrolled.into(),
                    CNT_REFRESH_TOKEN_HASH => {
                        DomainError::Conflict("refresh token already recorded".into())
                    }
                    other => {
                        DomainError::Persistence(format!("database constraint violation: {other}"))
                    }
                };
            }

            if let Some(code) = db_err.code() {
                match code.as_ref() {
                    "23505" => {
                        return DomainError::Conflict("unique constraint violated".into());
                    }
                    "23503" => {
                        return DomainError::NotFound("referenced record not found".into());
                    }
                    "23514" => {
                        return DomainError::Validation("check constraint violated".into());
                    }
                    // serialization_failure, deadlock_detected
                    "40001" | "40P01" => {
                        return DomainError::Transient(db_err.message().to_string());
                    }
                    _ => {}
                }
            }

            DomainError::Persistence(db_err.message().to_string())
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => DomainError::Transient(err.to_string()),
        _ => DomainError::Persistence(err.to_string()),
    }
}
