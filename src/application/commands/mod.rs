pub mod enrollments;
pub mod users;
