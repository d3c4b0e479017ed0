// src/infrastructure/security/token.rs
use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::{
        ClockPort,
        security::{IssuedToken, TokenIssuer, VerifiedToken},
    },
};
use crate::domain::{errors::AccessError, user::UserId};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::{collections::HashSet, fmt, sync::Arc};
use uuid::Uuid;

use super::claims::{TokenClaims, TokenType};

pub const MIN_SECRET_LENGTH: usize = 32;

#[derive(Clone)]
pub struct TokenSettings {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SigningKeys {
    fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }
}

/// HS256 JWT issuer. Expiry is judged against the injected clock rather than
/// the library's own wall-clock check.
pub struct JwtTokenIssuer {
    access: SigningKeys,
    refresh: SigningKeys,
    validation: Validation,
    clock: Arc<ClockPort>,
}

impl JwtTokenIssuer {
    pub fn new(settings: &TokenSettings, clock: Arc<ClockPort>) -> ApplicationResult<Self> {
        if settings.access_secret == settings.refresh_secret {
            return Err(ApplicationError::infrastructure(
                "access and refresh token secrets must differ",
            ));
        }
        if settings.access_ttl <= Duration::zero() || settings.refresh_ttl <= Duration::zero() {
            return Err(ApplicationError::infrastructure(
                "token lifetimes must be positive",
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims =
            HashSet::from(["exp".to_string(), "sub".to_string()]);

        Ok(Self {
            access: SigningKeys::new(&settings.access_secret, settings.access_ttl),
            refresh: SigningKeys::new(&settings.refresh_secret, settings.refresh_ttl),
            validation,
            clock,
        })
    }

    fn keys(&self, token_type: TokenType) -> &SigningKeys {
        match token_type {
            TokenType::Access => &self.access,
            TokenType::Refresh => &self.refresh,
        }
    }

    fn issue(&self, subject: UserId, token_type: TokenType) -> ApplicationResult<IssuedToken> {
        let keys = self.keys(token_type);
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(keys.ttl)
            .ok_or_else(|| ApplicationError::infrastructure("token expiry out of range"))?;
        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            token_type,
            jti: match token_type {
                TokenType::Access => None,
                TokenType::Refresh => Some(Uuid::new_v4().to_string()),
            },
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|err| {
                ApplicationError::infrastructure(format!("failed to sign token: {err}"))
            })?;

        Ok(IssuedToken {
            token,
            issued_at: timestamp(claims.iat)
                .ok_or_else(|| ApplicationError::infrastructure("issued-at out of range"))?,
            expires_at: timestamp(claims.exp)
                .ok_or_else(|| ApplicationError::infrastructure("expiry out of range"))?,
        })
    }

    fn verify(
        &self,
        token: &str,
        token_type: TokenType,
        invalid: AccessError,
        expired: AccessError,
    ) -> ApplicationResult<VerifiedToken> {
        let claims = decode::<TokenClaims>(token, &self.keys(token_type).decoding, &self.validation)
            .map_err(|err| {
                tracing::debug!(error = %err, ?token_type, "token rejected");
                invalid
            })?
            .claims;

        if claims.token_type != token_type {
            return Err(invalid.into());
        }
        let subject = UserId::parse(&claims.sub).map_err(|_| invalid)?;
        let issued_at = timestamp(claims.iat).ok_or(invalid)?;
        let expires_at = timestamp(claims.exp).ok_or(invalid)?;

        if self.clock.now() >= expires_at {
            return Err(expired.into());
        }

        Ok(VerifiedToken {
            subject,
            issued_at,
            expires_at,
        })
    }
}

fn timestamp(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue_access(&self, subject: UserId) -> ApplicationResult<IssuedToken> {
        self.issue(subject, TokenType::Access)
    }

    fn issue_refresh(&self, subject: UserId) -> ApplicationResult<IssuedToken> {
        self.issue(subject, TokenType::Refresh)
    }

    fn verify_access(&self, token: &str) -> ApplicationResult<VerifiedToken> {
        self.verify(
            token,
            TokenType::Access,
            AccessError::InvalidToken,
            AccessError::TokenExpired,
        )
    }

    fn verify_refresh(&self, token: &str) -> ApplicationResult<VerifiedToken> {
        self.verify(
            token,
            TokenType::Refresh,
            AccessError::InvalidRefreshToken,
            AccessError::RefreshTokenExpired,
        )
    }
}
