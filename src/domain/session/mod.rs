pub mod entity;
pub mod repository;

pub use entity::{NewRefreshToken, RefreshTokenRecord, RefreshTokenState, TokenHash};
pub use repository::RefreshTokenRepository;
