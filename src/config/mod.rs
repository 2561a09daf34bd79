//! Project configuration from `vectrace.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── optimize   # [optimize]
//! │   ├── profiles   # [profiles]
//! │   └── tracer     # [tracer]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # VectraceConfig (this file)
//! ```
//!
//! The file is optional: without one every section takes its defaults and
//! relative paths resolve against the current directory.

pub mod section;
pub mod types;
mod util;

pub use section::{OptimizeConfig, ProfilesConfig, TracerConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};
pub use util::find_config_file;

use crate::log;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "vectrace.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing vectrace.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectraceConfig {
    /// Config file in use, `None` when running on defaults.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Directory relative paths are resolved against.
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub tracer: TracerConfig,

    #[serde(default)]
    pub optimize: OptimizeConfig,

    #[serde(default)]
    pub profiles: ProfilesConfig,
}

impl VectraceConfig {
    /// Find `config_name` from the current directory upward and load it.
    ///
    /// A missing file is not an error: defaults are used and the current
    /// directory becomes the root.
    pub fn load(config_name: &Path) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(config_name, &cwd) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(crate::utils::path::normalize_path(&path));
                config
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", config_name.display());
                Self::default()
            }
        };

        let root = config
            .config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or(cwd, Path::to_path_buf);
        config.finalize(&root);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("in {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Anchor relative paths at `root`.
    fn finalize(&mut self, root: &Path) {
        self.root = crate::utils::path::normalize_path(root);
        self.tracer.normalize(&self.root);
        self.profiles.normalize(&self.root);
    }

    /// Validate every section and report all problems at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.tracer.validate(&mut diag);
        self.profiles.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Commented TOML with every section at its default.
    pub fn template() -> String {
        [
            TracerConfig::template_with_header(),
            OptimizeConfig::template_with_header(),
            ProfilesConfig::template_with_header(),
        ]
        .join("\n")
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> VectraceConfig {
    let (parsed, ignored) = VectraceConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::Grouping;

    #[test]
    fn test_from_str_invalid_toml() {
        let result = VectraceConfig::from_str("[tracer\nprogram = \"autotrace\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_default() {
        let config = VectraceConfig::default();
        assert!(config.config_path.is_none());
        assert_eq!(config.tracer.program, "autotrace");
        assert_eq!(config.optimize.grouping, Grouping::Flat);
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[tracer]\nprogram = \"potrace\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = VectraceConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.tracer.program, "potrace");
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_unknown_field_in_section() {
        let (_, ignored) =
            VectraceConfig::parse_with_ignored("[optimize]\ngroupin = \"flat\"").unwrap();
        assert_eq!(ignored, ["optimize.groupin"]);
    }

    #[test]
    fn test_finalize_resolves_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("params.toml"), "").unwrap();

        let mut config = test_parse_config(
            "[tracer]\nschema = \"params.toml\"\n[profiles]\npath = \"profiles.toml\"",
        );
        config.finalize(dir.path());

        let root = crate::utils::path::normalize_path(dir.path());
        assert_eq!(config.root, root);
        assert_eq!(config.tracer.schema, root.join("params.toml"));
        assert_eq!(config.profiles.path, root.join("profiles.toml"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_collects_all_sections() {
        let mut config = test_parse_config(
            "[tracer]\nprogram = \"\"\nschema = \"missing.toml\"\n[profiles]\npath = \"\"",
        );
        config.finalize(Path::new("/nonexistent"));

        let err = config.validate().unwrap_err();
        let Some(ConfigError::Diagnostics(diag)) = err.downcast_ref::<ConfigError>() else {
            panic!("expected diagnostics, got {err}");
        };
        assert_eq!(diag.len(), 3);
    }

    #[test]
    fn test_template_parses_back() {
        let template = VectraceConfig::template();
        assert!(template.contains("[tracer]"));
        assert!(template.contains("[optimize]"));
        assert!(template.contains("[profiles]"));

        let parsed = test_parse_config(&template);
        let defaults = VectraceConfig::default();
        assert_eq!(parsed.tracer.program, defaults.tracer.program);
        assert_eq!(parsed.tracer.keep_previous, defaults.tracer.keep_previous);
        assert_eq!(parsed.optimize.grouping, defaults.optimize.grouping);
        assert_eq!(parsed.profiles.path, defaults.profiles.path);
    }
}
