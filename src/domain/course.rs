// src/domain/course.rs
//! Read-only view of the course catalog. Course management lives elsewhere;
//! enrollment only needs to know that a course exists and how to label it.
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub Uuid);

impl CourseId {
    pub fn parse(value: &str) -> DomainResult<Self> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::Validation("course id must be a UUID".into()))
    }
}

impl From<Uuid> for CourseId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<CourseId> for Uuid {
    fn from(value: CourseId) -> Self {
        value.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub slug: String,
}

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn find_by_id(&self, id: CourseId) -> DomainResult<Option<Course>>;
}
