// src/domain/errors.rs
use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("persistence error: {0}")]
    Persistence(String),
    /// Storage failure that may succeed when retried (serialization failure,
    /// deadlock, exhausted pool).
    #[error("transient persistence error: {0}")]
    Transient(String),
    #[error(transparent)]
    Access(#[from] AccessError),
}

impl DomainError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Expected, user-facing outcomes of the session and redemption flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum AccessError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user account is not active")]
    UserNotActive,
    #[error("invalid token")]
    InvalidToken,
    #[error("token has expired")]
    TokenExpired,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error("refresh token has expired")]
    RefreshTokenExpired,
    #[error("refresh token has been revoked")]
    RefreshTokenRevoked,
    #[error("activation code not found")]
    ActivationCodeNotFound,
    #[error("activation code is invalid")]
    ActivationCodeInvalid,
    #[error("activation code is inactive")]
    ActivationCodeInactive,
    #[error("activation code has expired")]
    ActivationCodeExpired,
    #[error("activation code has reached its maximum uses")]
    ActivationCodeUsedUp,
    #[error("already enrolled in this course")]
    AlreadyEnrolled,
    #[error("enrollment not found")]
    EnrollmentNotFound,
}

/// Coarse outcome class used by delivery layers to pick a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    BadInput,
}

impl AccessError {
    pub const ALL: [AccessError; 14] = [
        Self::InvalidCredentials,
        Self::UserNotActive,
        Self::InvalidToken,
        Self::TokenExpired,
        Self::InvalidRefreshToken,
        Self::RefreshTokenExpired,
        Self::RefreshTokenRevoked,
        Self::ActivationCodeNotFound,
        Self::ActivationCodeInvalid,
        Self::ActivationCodeInactive,
        Self::ActivationCodeExpired,
        Self::ActivationCodeUsedUp,
        Self::AlreadyEnrolled,
        Self::EnrollmentNotFound,
    ];

    pub fn class(self) -> ErrorClass {
        match self {
            Self::InvalidCredentials
            | Self::InvalidToken
            | Self::TokenExpired
            | Self::InvalidRefreshToken
            | Self::RefreshTokenExpired
            | Self::RefreshTokenRevoked => ErrorClass::Unauthorized,
            Self::UserNotActive => ErrorClass::Forbidden,
            Self::ActivationCodeNotFound | Self::EnrollmentNotFound => ErrorClass::NotFound,
            Self::ActivationCodeUsedUp | Self::AlreadyEnrolled => ErrorClass::Conflict,
            Self::ActivationCodeInvalid
            | Self::ActivationCodeInactive
            | Self::ActivationCodeExpired => ErrorClass::BadInput,
        }
    }

    /// Stable machine-readable identifier.
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::UserNotActive => "USER_NOT_ACTIVE",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::RefreshTokenExpired => "REFRESH_TOKEN_EXPIRED",
            Self::RefreshTokenRevoked => "REFRESH_TOKEN_REVOKED",
            Self::ActivationCodeNotFound => "ACTIVATION_CODE_NOT_FOUND",
            Self::ActivationCodeInvalid => "ACTIVATION_CODE_INVALID",
            Self::ActivationCodeInactive => "ACTIVATION_CODE_INACTIVE",
            Self::ActivationCodeExpired => "ACTIVATION_CODE_EXPIRED",
            Self::ActivationCodeUsedUp => "ACTIVATION_CODE_USED_UP",
            Self::AlreadyEnrolled => "ALREADY_ENROLLED",
            Self::EnrollmentNotFound => "ENROLLMENT_NOT_FOUND",
        }
    }
}
