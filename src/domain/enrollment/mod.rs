pub mod cursor;
pub mod entity;
pub mod repository;

pub use cursor::EnrollmentListCursor;
pub use entity::{Enrollment, EnrollmentId, EnrollmentStatus, NewEnrollment};
pub use repository::EnrollmentRepository;
