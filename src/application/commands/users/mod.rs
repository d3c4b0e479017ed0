mod change_password;
mod login;
mod logout;
mod password;
mod refresh;
mod register;
mod service;
mod session;

pub use change_password::ChangePasswordCommand;
pub use login::LoginUserCommand;
pub use logout::LogoutCommand;
pub use refresh::RefreshTokenCommand;
pub use register::RegisterUserCommand;
pub use service::UserCommandService;
