// src/infrastructure/repositories/postgres_course.rs
use super::map_sqlx;
use crate::domain::course::{Course, CourseId, CourseRepository};
use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Clone)]
pub struct PostgresCourseRepository {
    pool: PgPool,
}

impl PostgresCourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CourseRow {
    id: Uuid,
    title: String,
    slug: String,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Course {
            id: CourseId(row.id),
            title: row.title,
            slug: row.slug,
        }
    }
}

#[async_trait]
impl CourseRepository for PostgresCourseRepository {
    async fn find_by_id(&self, id: CourseId) -> DomainResult<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>(
            "SELECT id, title, slug FROM courses WHERE id = $1",
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Ok(row.map(Course::from))
    }
}
