//! `[profiles]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [profiles]
//! path = "~/.config/vectrace/profiles.toml"
//! ```

use std::path::{Path, PathBuf};

use macros::Config;
use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// Settings profile store.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "profiles")]
pub struct ProfilesConfig {
    /// Profile store file, `~` is expanded.
    pub path: PathBuf,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("~/.config/vectrace/profiles.toml"),
        }
    }
}

impl ProfilesConfig {
    pub fn normalize(&mut self, root: &Path) {
        if !self.path.as_os_str().is_empty() {
            self.path = crate::utils::path::resolve_path(&self.path, root);
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.path.as_os_str().is_empty() {
            diag.error(Self::FIELDS.path, "profile store path must not be empty");
        } else if self.path.is_dir() {
            diag.error_with_hint(
                Self::FIELDS.path,
                format!("`{}` is a directory", self.path.display()),
                "point it at a file, e.g. profiles.toml inside that directory",
            );
        }
    }
}
