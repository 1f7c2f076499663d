//! Authentication and user management
//!
//! JWT session tokens, the user model and its database operations, and the
//! signup/login/logout/me handlers.

pub mod handlers;
pub mod sessions;
pub mod users;

pub use handlers::{get_me, login, logout, signup};
