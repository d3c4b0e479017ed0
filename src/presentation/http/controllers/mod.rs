// src/presentation/http/controllers/mod.rs
pub mod activation_codes;
pub mod auth;
pub mod enrollments;
