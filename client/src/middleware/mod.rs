//! Request and response hooks applied to every service call

pub mod auth;

pub use auth::{authorize, check_response};
