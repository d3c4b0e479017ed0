// src/domain/activation/value_objects.rs
use crate::domain::errors::{AccessError, DomainError};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

const MAX_CODE_LENGTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivationCodeId(pub Uuid);

impl From<Uuid> for ActivationCodeId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<ActivationCodeId> for Uuid {
    fn from(value: ActivationCodeId) -> Self {
        value.0
    }
}

impl fmt::Display for ActivationCodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Canonical (trimmed, uppercased) activation code text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeValue(String);

impl CodeValue {
    /// Normalizes user input before lookup. Anything that cannot be a code in
    /// either supported format is rejected as invalid rather than not found.
    pub fn normalize(raw: &str) -> Result<Self, AccessError> {
        let value = raw.trim().to_uppercase();
        if value.is_empty() || value.len() > MAX_CODE_LENGTH {
            return Err(AccessError::ActivationCodeInvalid);
        }
        if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(AccessError::ActivationCodeInvalid);
        }
        Ok(Self(value))
    }

    /// Wraps text that is already canonical: stored rows and generated codes.
    pub fn from_trusted(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shape of server-generated codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeFormat {
    /// `XXXX-XXXX-XXXX`, twelve uppercase hex digits.
    #[default]
    GroupedHex,
    /// Eight characters without the easily confused `0`, `O`, `1` and `I`.
    Alphanumeric,
}

impl CodeFormat {
    pub const ALPHANUMERIC_CHARSET: &'static [u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
    pub const ALPHANUMERIC_LENGTH: usize = 8;
    pub const GROUPED_HEX_BYTES: usize = 6;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GroupedHex => "grouped-hex",
            Self::Alphanumeric => "alphanumeric",
        }
    }
}

impl FromStr for CodeFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grouped-hex" => Ok(Self::GroupedHex),
            "alphanumeric" => Ok(Self::Alphanumeric),
            other => Err(DomainError::Validation(format!(
                "unknown activation code format '{other}'"
            ))),
        }
    }
}
