// src/infrastructure/repositories/postgres_activation_code.rs
use super::map_sqlx;
use super::postgres_enrollment::{active_exists, expire_lapsed_pair, insert_enrollment};
use crate::domain::activation::{
    ActivationCode, ActivationCodeId, ActivationCodeRepository, CodeValue, NewActivationCode,
    Redemption,
};
use crate::domain::course::CourseId;
use crate::domain::enrollment::Enrollment;
use crate::domain::errors::{AccessError, DomainError, DomainResult};
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

const CODE_COLUMNS: &str = "id, code, course_id, max_uses, current_uses, expires_at, is_active, \
     created_by, note, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresActivationCodeRepository {
    pool: PgPool,
}

impl PostgresActivationCodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ActivationCodeRow {
    id: Uuid,
    code: String,
    course_id: Uuid,
    max_uses: Option<i32>,
    current_uses: i32,
    expires_at: Option<DateTime<Utc>>,
    is_active: bool,
    created_by: Uuid,
    note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn to_count(value: i32, column: &str) -> DomainResult<u32> {
    u32::try_from(value)
        .map_err(|_| DomainError::Persistence(format!("negative {column} in activation_codes")))
}

impl TryFrom<ActivationCodeRow> for ActivationCode {
    type Error = DomainError;

    fn try_from(row: ActivationCodeRow) -> Result<Self, Self::Error> {
        Ok(ActivationCode {
            id: ActivationCodeId(row.id),
            code: CodeValue::from_trusted(row.code),
            course_id: CourseId(row.course_id),
            max_uses: row
                .max_uses
                .map(|max| to_count(max, "max_uses"))
                .transpose()?,
            current_uses: to_count(row.current_uses, "current_uses")?,
            expires_at: row.expires_at,
            is_active: row.is_active,
            created_by: UserId(row.created_by),
            note: row.note,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl ActivationCodeRepository for PostgresActivationCodeRepository {
    async fn insert(&self, code: NewActivationCode) -> DomainResult<ActivationCode> {
        let max_uses = code
            .max_uses
            .map(i32::try_from)
            .transpose()
            .map_err(|_| DomainError::Validation("max_uses is too large".into()))?;

        let row = sqlx::query_as::<_, ActivationCodeRow>(&format!(
            "INSERT INTO activation_codes (id, code, course_id, max_uses, current_uses, expires_at,
                                           is_active, created_by, note, created_at, updated_at)
             VALUES ($1, $2, $3, $4, 0, $5, TRUE, $6, $7, $8, $8)
             RETURNING {CODE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(code.code.as_str())
        .bind(Uuid::from(code.course_id))
        .bind(max_uses)
        .bind(code.expires_at)
        .bind(Uuid::from(code.created_by))
        .bind(code.note)
        .bind(code.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        ActivationCode::try_from(row)
    }

    async fn find_by_code(&self, code: &CodeValue) -> DomainResult<Option<ActivationCode>> {
        let row = sqlx::query_as::<_, ActivationCodeRow>(&format!(
            "SELECT {CODE_COLUMNS} FROM activation_codes WHERE code = $1"
        ))
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(ActivationCode::try_from).transpose()
    }

    async fn set_active(
        &self,
        id: ActivationCodeId,
        is_active: bool,
        now: DateTime<Utc>,
    ) -> DomainResult<ActivationCode> {
        let row = sqlx::query_as::<_, ActivationCodeRow>(&format!(
            "UPDATE activation_codes SET is_active = $2, updated_at = $3
             WHERE id = $1
             RETURNING {CODE_COLUMNS}"
        ))
        .bind(Uuid::from(id))
        .bind(is_active)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?
        .ok_or(AccessError::ActivationCodeNotFound)?;

        ActivationCode::try_from(row)
    }

    async fn list(
        &self,
        course_id: Option<CourseId>,
        limit: u32,
        offset: u64,
    ) -> DomainResult<(Vec<ActivationCode>, u64)> {
        let offset = i64::try_from(offset)
            .map_err(|_| DomainError::Validation("offset is too large".into()))?;
        let course_id = course_id.map(Uuid::from);

        let rows = sqlx::query_as::<_, ActivationCodeRow>(&format!(
            "SELECT {CODE_COLUMNS} FROM activation_codes
             WHERE ($1::uuid IS NULL OR course_id = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(course_id)
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(1) FROM activation_codes WHERE ($1::uuid IS NULL OR course_id = $1)",
        )
        .bind(course_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let items = rows
            .into_iter()
            .map(ActivationCode::try_from)
            .collect::<DomainResult<Vec<_>>>()?;

        Ok((items, u64::try_from(total).unwrap_or_default()))
    }

    /// Runs as one transaction holding a row lock on the code. The guarded
    /// increment is the final arbiter of the use limit; zero affected rows
    /// means another redemption took the last use.
    async fn redeem(&self, redemption: Redemption) -> DomainResult<Enrollment> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let code = sqlx::query_as::<_, ActivationCodeRow>(&format!(
            "SELECT {CODE_COLUMNS} FROM activation_codes WHERE id = $1 FOR UPDATE"
        ))
        .bind(Uuid::from(redemption.code_id))
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_sqlx)?
        .map(ActivationCode::try_from)
        .transpose()?
        .ok_or(AccessError::ActivationCodeNotFound)?;

        code.check_redeemable(redemption.redeemed_at)?;

        expire_lapsed_pair(
            &mut tx,
            redemption.user_id,
            redemption.course_id,
            redemption.redeemed_at,
        )
        .await?;
        if active_exists(
            &mut tx,
            redemption.user_id,
            redemption.course_id,
            redemption.redeemed_at,
        )
        .await?
        {
            return Err(AccessError::AlreadyEnrolled.into());
        }

        let enrollment = insert_enrollment(&mut tx, redemption.new_enrollment()).await?;

        let consumed = sqlx::query(
            "UPDATE activation_codes
             SET current_uses = current_uses + 1, updated_at = $2
             WHERE id = $1 AND (max_uses IS NULL OR current_uses < max_uses)",
        )
        .bind(Uuid::from(redemption.code_id))
        .bind(redemption.redeemed_at)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?;

        if consumed.rows_affected() == 0 {
            return Err(AccessError::ActivationCodeUsedUp.into());
        }

        tx.commit().await.map_err(map_sqlx)?;
        Ok(enrollment)
    }
}
