// src/infrastructure/mod.rs
pub mod database;
pub mod maintenance;
pub mod repositories;
pub mod security;
pub mod time;
pub mod util;
