use crate::domain::errors::{DomainError, DomainResult};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Keyset position in a most-recent-first enrollment listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentListCursor {
    pub enrolled_at: DateTime<Utc>,
    pub id: Uuid,
}

impl EnrollmentListCursor {
    pub fn new(enrolled_at: DateTime<Utc>, id: Uuid) -> Self {
        Self { enrolled_at, id }
    }

    pub fn encode(&self) -> String {
        let raw = format!("{}|{}", self.enrolled_at.to_rfc3339(), self.id);
        URL_SAFE_NO_PAD.encode(raw.as_bytes())
    }

    pub fn decode(token: &str) -> DomainResult<Self> {
        let invalid = || DomainError::Validation("invalid cursor token".into());
        let bytes = URL_SAFE_NO_PAD.decode(token).map_err(|_| invalid())?;
        let raw = String::from_utf8(bytes).map_err(|_| invalid())?;
        let (enrolled_at, id) = raw.split_once('|').ok_or_else(invalid)?;
        let enrolled_at = DateTime::parse_from_rfc3339(enrolled_at)
            .map_err(|_| invalid())?
            .with_timezone(&Utc);
        let id = Uuid::parse_str(id).map_err(|_| invalid())?;
        Ok(Self::new(enrolled_at, id))
    }
}
