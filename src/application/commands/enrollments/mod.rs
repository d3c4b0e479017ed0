mod cancel;
mod codes;
mod redeem;
mod service;

pub use cancel::CancelEnrollmentCommand;
pub use codes::{CreateActivationCodeCommand, SetActivationCodeActiveCommand};
pub use redeem::RedeemCodeCommand;
pub use service::{EnrollmentCommandService, RedemptionSettings};
