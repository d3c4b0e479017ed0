use crate::domain::activation::ActivationCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivationCodeDto {
    pub id: Uuid,
    pub code: String,
    pub course_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
    pub current_uses: u32,
    /// `-1` when the code has no use limit.
    pub remaining_uses: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub is_expired: bool,
    pub created_by: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ActivationCodeDto {
    pub fn from_code(code: ActivationCode, now: DateTime<Utc>) -> Self {
        Self {
            remaining_uses: code.remaining_uses().map_or(-1, i64::from),
            is_expired: code.is_expired(now),
            id: code.id.into(),
            code: code.code.to_string(),
            course_id: code.course_id.into(),
            max_uses: code.max_uses,
            current_uses: code.current_uses,
            expires_at: code.expires_at,
            is_active: code.is_active,
            created_by: code.created_by.into(),
            note: code.note,
            created_at: code.created_at,
            updated_at: code.updated_at,
        }
    }
}
