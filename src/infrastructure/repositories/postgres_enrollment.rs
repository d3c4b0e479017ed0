// src/infrastructure/repositories/postgres_enrollment.rs
use super::map_sqlx;
use crate::domain::activation::ActivationCodeId;
use crate::domain::course::CourseId;
use crate::domain::enrollment::{
    Enrollment, EnrollmentId, EnrollmentListCursor, EnrollmentRepository, EnrollmentStatus,
    NewEnrollment,
};
use crate::domain::errors::{AccessError, DomainError, DomainResult};
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

pub(super) const ENROLLMENT_COLUMNS: &str = "id, user_id, course_id, activation_code_id, \
     enrolled_at, expires_at, status, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresEnrollmentRepository {
    pool: PgPool,
}

impl PostgresEnrollmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct EnrollmentRow {
    id: Uuid,
    user_id: Uuid,
    course_id: Uuid,
    activation_code_id: Option<Uuid>,
    enrolled_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EnrollmentRow> for Enrollment {
    type Error = DomainError;

    fn try_from(row: EnrollmentRow) -> Result<Self, Self::Error> {
        Ok(Enrollment {
            id: EnrollmentId(row.id),
            user_id: UserId(row.user_id),
            course_id: CourseId(row.course_id),
            activation_code_id: row.activation_code_id.map(ActivationCodeId),
            enrolled_at: row.enrolled_at,
            expires_at: row.expires_at,
            status: row.status.parse::<EnrollmentStatus>()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Closes out an active row of the pair whose window has already ended, so
/// the one-active-enrollment index does not block a fresh enrollment.
pub(super) async fn expire_lapsed_pair(
    conn: &mut PgConnection,
    user_id: UserId,
    course_id: CourseId,
    now: DateTime<Utc>,
) -> DomainResult<()> {
    sqlx::query(
        "UPDATE enrollments SET status = 'expired', updated_at = $3
         WHERE user_id = $1 AND course_id = $2 AND status = 'active'
           AND expires_at IS NOT NULL AND expires_at <= $3",
    )
    .bind(Uuid::from(user_id))
    .bind(Uuid::from(course_id))
    .bind(now)
    .execute(&mut *conn)
    .await
    .map_err(map_sqlx)?;
    Ok(())
}

pub(super) async fn active_exists(
    conn: &mut PgConnection,
    user_id: UserId,
    course_id: CourseId,
    now: DateTime<Utc>,
) -> DomainResult<bool> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (
             SELECT 1 FROM enrollments
             WHERE user_id = $1 AND course_id = $2 AND status = 'active'
               AND (expires_at IS NULL OR expires_at > $3)
         )",
    )
    .bind(Uuid::from(user_id))
    .bind(Uuid::from(course_id))
    .bind(now)
    .fetch_one(&mut *conn)
    .await
    .map_err(map_sqlx)
}

pub(super) async fn insert_enrollment(
    conn: &mut PgConnection,
    enrollment: NewEnrollment,
) -> DomainResult<Enrollment> {
    let row = sqlx::query_as::<_, EnrollmentRow>(&format!(
        "INSERT INTO enrollments (id, user_id, course_id, activation_code_id, enrolled_at,
                                  expires_at, status, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, 'active', $5, $5)
         RETURNING {ENROLLMENT_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(Uuid::from(enrollment.user_id))
    .bind(Uuid::from(enrollment.course_id))
    .bind(enrollment.activation_code_id.map(Uuid::from))
    .bind(enrollment.enrolled_at)
    .bind(enrollment.expires_at)
    .fetch_one(&mut *conn)
    .await
    .map_err(map_sqlx)?;

    Enrollment::try_from(row)
}

#[async_trait]
impl EnrollmentRepository for PostgresEnrollmentRepository {
    async fn insert(&self, enrollment: NewEnrollment) -> DomainResult<Enrollment> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        expire_lapsed_pair(
            &mut tx,
            enrollment.user_id,
            enrollment.course_id,
            enrollment.enrolled_at,
        )
        .await?;
        let created = insert_enrollment(&mut tx, enrollment).await?;
        tx.commit().await.map_err(map_sqlx)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: EnrollmentId) -> DomainResult<Option<Enrollment>> {
        let row = sqlx::query_as::<_, EnrollmentRow>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = $1"
        ))
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(Enrollment::try_from).transpose()
    }

    async fn is_active(
        &self,
        user_id: UserId,
        course_id: CourseId,
        now: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx)?;
        active_exists(&mut conn, user_id, course_id, now).await
    }

    async fn find_latest(
        &self,
        user_id: UserId,
        course_id: CourseId,
    ) -> DomainResult<Option<Enrollment>> {
        let row = sqlx::query_as::<_, EnrollmentRow>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments
             WHERE user_id = $1 AND course_id = $2
             ORDER BY enrolled_at DESC, id DESC
             LIMIT 1"
        ))
        .bind(Uuid::from(user_id))
        .bind(Uuid::from(course_id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(Enrollment::try_from).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: u32,
        cursor: Option<EnrollmentListCursor>,
    ) -> DomainResult<(Vec<Enrollment>, Option<EnrollmentListCursor>)> {
        let limit = limit.max(1);
        let (after_at, after_id) = match cursor {
            Some(cursor) => (Some(cursor.enrolled_at), Some(cursor.id)),
            None => (None, None),
        };

        // One extra row tells us whether another page exists.
        let rows = sqlx::query_as::<_, EnrollmentRow>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments
             WHERE user_id = $1
               AND ($2::timestamptz IS NULL OR (enrolled_at, id) < ($2, $3))
             ORDER BY enrolled_at DESC, id DESC
             LIMIT $4"
        ))
        .bind(Uuid::from(user_id))
        .bind(after_at)
        .bind(after_id)
        .bind(i64::from(limit) + 1)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let mut items = rows
            .into_iter()
            .map(Enrollment::try_from)
            .collect::<DomainResult<Vec<_>>>()?;

        let page_size = limit as usize;
        let next = if items.len() > page_size {
            items.truncate(page_size);
            items
                .last()
                .map(|last| EnrollmentListCursor::new(last.enrolled_at, last.id.0))
        } else {
            None
        };

        Ok((items, next))
    }

    async fn cancel(&self, id: EnrollmentId, now: DateTime<Utc>) -> DomainResult<Enrollment> {
        let row = sqlx::query_as::<_, EnrollmentRow>(&format!(
            "UPDATE enrollments SET status = 'cancelled', updated_at = $2
             WHERE id = $1 AND status = 'active'
             RETURNING {ENROLLMENT_COLUMNS}"
        ))
        .bind(Uuid::from(id))
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        if let Some(row) = row {
            return Enrollment::try_from(row);
        }

        match self.find_by_id(id).await? {
            None => Err(AccessError::EnrollmentNotFound.into()),
            Some(existing) => Err(DomainError::Conflict(format!(
                "enrollment is already {}",
                existing.status
            ))),
        }
    }

    async fn expire_lapsed(&self, now: DateTime<Utc>) -> DomainResult<u64> {
        let result = sqlx::query(
            "UPDATE enrollments SET status = 'expired', updated_at = $1
             WHERE status = 'active' AND expires_at IS NOT NULL AND expires_at <= $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(result.rows_affected())
    }
}
