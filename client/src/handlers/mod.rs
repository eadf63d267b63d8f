//! Command handlers for `invctl`

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use inventory_console_client::{
    ApiClient, Config, FileTokenStore, MemoryTokenStore, Session, TokenStore,
};

pub mod auth;
pub mod categories;
pub mod inventory;
pub mod products;
pub mod suppliers;

/// Everything a command needs
pub struct CliContext {
    pub api: ApiClient,
    pub json: bool,
}

impl CliContext {
    pub fn initialize(config: &Config, json: bool) -> Result<Self> {
        let store: Box<dyn TokenStore> = match config.token_path() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "using token file");
                Box::new(FileTokenStore::new(path))
            }
            None => {
                tracing::warn!("no token location available; the session will not persist");
                Box::new(MemoryTokenStore::new())
            }
        };
        let session = Arc::new(Session::open(store)?);
        let api = ApiClient::new(&config.api, session)?;
        Ok(Self { api, json })
    }

    /// Print `value` as JSON when requested, otherwise run `human`
    pub fn render<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(value);
        }
        Ok(())
    }
}

/// Blank optional text arguments count as not given
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
