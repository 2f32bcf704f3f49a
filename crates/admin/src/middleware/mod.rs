//! Request middleware: browser sessions and tenant resolution.

pub mod auth;
pub mod session;

pub use auth::CurrentShop;
pub use session::create_session_layer;
