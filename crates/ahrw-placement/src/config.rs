//! TOML description of a placement table.
//!
//! ```toml
//! slots = 16384
//! nodes = ["server1", "server2", "server3"]
//! ```

use std::path::Path;

use ahrw_types::Server;
use serde::Deserialize;

use crate::error::AhrwError;
use crate::table::{Ahrw, DEFAULT_SLOTS};

/// Slot count and node names for one table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    /// Number of slots. Keep it constant across node set changes.
    pub slots: u64,
    /// Unique node names.
    pub nodes: Vec<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            slots: DEFAULT_SLOTS,
            nodes: Vec::new(),
        }
    }
}

impl TableConfig {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, AhrwError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AhrwError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Parse config from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, AhrwError> {
        toml::from_str(s).map_err(|e| AhrwError::Config(e.to_string()))
    }

    /// Build a table of [`Server`]s, asking `handle` for each node's handle.
    pub fn build<H>(self, mut handle: impl FnMut(&str) -> H) -> Result<Ahrw<Server<H>>, AhrwError> {
        let servers: Vec<Server<H>> = self
            .nodes
            .into_iter()
            .map(|name| {
                let h = handle(&name);
                Server::new(name, h)
            })
            .collect();
        Ahrw::new(self.slots, servers)
    }
}
