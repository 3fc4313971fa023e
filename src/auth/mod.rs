//! Authentication and session management

pub mod models;
pub mod password;
pub mod rate_limit;
pub mod session;

pub use models::{LoginRequest, LoginResponse, MessageResponse, SessionUser};
pub use rate_limit::LoginRateLimiter;
pub use session::{Session, SessionStore};
