mod codes;
mod list;
mod lookup;
mod service;

pub use codes::ListActivationCodesQuery;
pub use list::{DEFAULT_PAGE_SIZE, ListEnrollmentsQuery, MAX_PAGE_SIZE};
pub use service::EnrollmentQueryService;
