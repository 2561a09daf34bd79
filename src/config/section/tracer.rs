//! `[tracer]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [tracer]
//! program = "autotrace"       # Executable, looked up on PATH
//! schema = "params.toml"      # Parameter schema, empty = built-in AutoTrace schema
//! keep_previous = true        # Move an existing output to `<name>~` before tracing
//! ```

use std::path::{Path, PathBuf};

use macros::Config;
use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// External tracer settings.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "tracer")]
pub struct TracerConfig {
    /// Tracer executable, a name on PATH or a path.
    pub program: String,

    /// Parameter schema file. Empty uses the built-in AutoTrace schema.
    pub schema: PathBuf,

    /// Move an existing output file to `<name>~` before tracing.
    pub keep_previous: bool,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            program: "autotrace".into(),
            schema: PathBuf::new(),
            keep_previous: true,
        }
    }
}

impl TracerConfig {
    /// Schema file to load, `None` for the built-in one.
    pub fn schema_path(&self) -> Option<&Path> {
        (!self.schema.as_os_str().is_empty()).then_some(self.schema.as_path())
    }

    /// Resolve the schema path against the config directory.
    pub fn normalize(&mut self, root: &Path) {
        if self.schema_path().is_some() {
            self.schema = crate::utils::path::resolve_path(&self.schema, root);
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.program.trim().is_empty() {
            diag.error_with_hint(
                Self::FIELDS.program,
                "tracer program must not be empty",
                "set it to the tracer executable, e.g. \"autotrace\"",
            );
        }
        if let Some(schema) = self.schema_path()
            && !schema.is_file()
        {
            diag.error_with_hint(
                Self::FIELDS.schema,
                format!("schema file `{}` not found", schema.display()),
                "leave it empty to use the built-in AutoTrace schema",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_tracer_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.tracer.program, "autotrace");
        assert_eq!(config.tracer.schema_path(), None);
        assert!(config.tracer.keep_previous);
    }

    #[test]
    fn test_tracer_config() {
        let config = test_parse_config(
            "[tracer]\nprogram = \"/opt/autotrace/bin/autotrace\"\nschema = \"params.toml\"\nkeep_previous = false",
        );
        assert_eq!(config.tracer.program, "/opt/autotrace/bin/autotrace");
        assert_eq!(config.tracer.schema_path(), Some(Path::new("params.toml")));
        assert!(!config.tracer.keep_previous);
    }

    #[test]
    fn test_normalize_schema() {
        let mut tracer = TracerConfig {
            schema: PathBuf::from("params.toml"),
            ..Default::default()
        };
        tracer.normalize(Path::new("/work"));
        assert_eq!(tracer.schema, PathBuf::from("/work/params.toml"));

        let mut tracer = TracerConfig::default();
        tracer.normalize(Path::new("/work"));
        assert_eq!(tracer.schema_path(), None);
    }

    #[test]
    fn test_validate() {
        let mut diag = ConfigDiagnostics::new();
        TracerConfig::default().validate(&mut diag);
        assert!(diag.is_empty());

        let tracer = TracerConfig {
            program: " ".into(),
            schema: PathBuf::from("/nonexistent/params.toml"),
            ..Default::default()
        };
        tracer.validate(&mut diag);
        assert_eq!(diag.len(), 2);
        assert_eq!(diag.errors()[0].field, TracerConfig::FIELDS.program);
        assert_eq!(diag.errors()[1].field, TracerConfig::FIELDS.schema);
    }

    #[test]
    fn test_template() {
        let template = TracerConfig::template_with_header();
        assert!(template.contains("[tracer]\n"));
        assert!(template.contains("program = \"autotrace\"\n"));
        assert!(template.contains("keep_previous = true\n"));
    }
}
