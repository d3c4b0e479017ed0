use crate::domain::user::{Role, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::users::UserDto;
use crate::application::ports::security::IssuedToken;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPairDto {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

impl TokenPairDto {
    pub fn from_issued(access: IssuedToken, refresh: IssuedToken) -> Self {
        Self {
            expires_in: access.expires_in_seconds(),
            access_expires_at: access.expires_at,
            refresh_expires_at: refresh.expires_at,
            access_token: access.token,
            refresh_token: refresh.token,
            token_type: "Bearer".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResultDto {
    pub user: UserDto,
    pub tokens: TokenPairDto,
}

/// Subject of a verified access token, enriched with the stored role.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
