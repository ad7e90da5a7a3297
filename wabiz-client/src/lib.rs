pub mod api;
pub mod config;
pub mod error;
pub mod session;

pub use api::ApiClient;
pub use error::ApiError;
pub use session::{Session, SessionError, SessionStore};
