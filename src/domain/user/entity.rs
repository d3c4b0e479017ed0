// src/domain/user/entity.rs
use crate::domain::user::value_objects::{Email, FullName, PasswordHash, PhoneNumber, Role, UserId};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub phone_number: PhoneNumber,
    pub full_name: FullName,
    pub password_hash: PasswordHash,
    pub role: Role,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub phone_number: PhoneNumber,
    pub full_name: FullName,
    pub password_hash: PasswordHash,
    pub role: Role,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    /// Self-registered accounts start as active, unverified students.
    pub fn registration(
        email: Email,
        phone_number: PhoneNumber,
        full_name: FullName,
        password_hash: PasswordHash,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            email,
            phone_number,
            full_name,
            password_hash,
            role: Role::Student,
            is_active: true,
            is_verified: false,
            created_at,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_is_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}
