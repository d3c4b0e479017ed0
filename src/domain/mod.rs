pub mod activation;
pub mod course;
pub mod enrollment;
pub mod errors;
pub mod session;
pub mod user;
