//! Inventory console client
//!
//! Typed access to the remote inventory service plus the console container
//! that turns form drafts into requests and reconciles local views after
//! each mutation.

pub mod config;
pub mod console;
pub mod error;
pub mod http;
pub mod middleware;
pub mod services;
pub mod session;

pub use config::Config;
pub use console::InventoryConsole;
pub use error::{ClientError, ClientResult};
pub use http::ApiClient;
pub use session::{FileTokenStore, MemoryTokenStore, Session, SessionState, TokenStore};
