// src/infrastructure/repositories/mod.rs
mod error;
mod memory;
mod postgres_activation_code;
mod postgres_course;
mod postgres_enrollment;
mod postgres_refresh_token;
mod postgres_user;

pub use error::map_sqlx;
pub use memory::InMemoryStore;
pub use postgres_activation_code::PostgresActivationCodeRepository;
pub use postgres_course::PostgresCourseRepository;
pub use postgres_enrollment::PostgresEnrollmentRepository;
pub use postgres_refresh_token::PostgresRefreshTokenRepository;
pub use postgres_user::PostgresUserRepository;
