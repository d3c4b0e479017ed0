pub mod activation_codes;
pub mod auth;
pub mod enrollments;
pub mod pagination;
pub mod users;

pub use activation_codes::ActivationCodeDto;
pub use auth::{AuthResultDto, AuthenticatedUser, TokenPairDto};
pub use enrollments::{CourseSummaryDto, EnrollmentCheckDto, EnrollmentDto, RedemptionResultDto};
pub use pagination::{CursorPage, OffsetPage};
pub use users::{UserDto, UserProfileDto};
