//! Shared types and rules for the inventory console
//!
//! This crate contains the movement rules, request builders and view-state
//! projection shared by the native client and the browser build (via WASM).

pub mod models;
pub mod requests;
pub mod types;
pub mod validation;
pub mod view_state;

pub use models::*;
pub use requests::*;
pub use types::*;
pub use validation::*;
pub use view_state::*;
