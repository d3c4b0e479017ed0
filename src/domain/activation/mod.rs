pub mod entity;
pub mod repository;
pub mod value_objects;

pub use entity::{ActivationCode, NewActivationCode, Redemption};
pub use repository::ActivationCodeRepository;
pub use value_objects::{ActivationCodeId, CodeFormat, CodeValue};
