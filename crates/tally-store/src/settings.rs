//! TOML settings file: quota limits plus the privileged-id set.
//!
//! ```toml
//! [xp]
//! minute_limit = 5
//! daily_limit = 500
//!
//! [admins]
//! ids = [5589888565]
//! ```
//!
//! Every section is optional; a missing file yields engine defaults.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use tally_core::QuotaConfig;

use crate::error::{Result, StoreError};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub xp: QuotaConfig,
    #[serde(default)]
    pub admins: Admins,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Admins {
    #[serde(default)]
    pub ids: Vec<i64>,
}

impl Settings {
    /// Parse a settings file. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("no settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Settings(format!("failed to read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| StoreError::Settings(format!("invalid TOML in {}: {e}", path.display())))
    }

    pub fn quota(&self) -> QuotaConfig {
        self.xp
    }

    pub fn admin_ids(&self) -> HashSet<i64> {
        self.admins.ids.iter().copied().collect()
    }
}
