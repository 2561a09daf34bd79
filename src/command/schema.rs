//! Parameter schema.
//!
//! Describes every tracer parameter: whether it is optional, its initial
//! state, its default and, for numeric parameters, the allowed range. The
//! schema is the source a [`Command`] is built from, and the reference for
//! validating values a user types on the command line.
//!
//! ```toml
//! [[parameter]]
//! name = "corner-threshold"
//! optional = true
//! enabled = false
//! default = "100"
//! description = "If a pixel's angle is less than this, it is considered a corner."
//!
//! [parameter.range]
//! min = 0
//! max = 180
//! step = 1
//! whole-numbers = true
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    BACKGROUND_COLOR, Command, CommandError, CommandListener, INPUT_FILE, OUTPUT_FILE,
    parameter::check_token,
};

/// Schema shipped with the binary, for AutoTrace.
const EMBEDDED: &str = include_str!("autotrace.toml");

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("IO error when reading schema `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("schema parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("invalid schema:\n{}", .0.join("\n"))]
    Invalid(Vec<String>),

    #[error("unknown parameter `{0}`")]
    NotFound(String),

    #[error("invalid value `{value}` for `{name}`: {reason}")]
    Value {
        name: String,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Numeric bounds of a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Range {
    pub min: f64,
    pub max: f64,
    #[serde(default = "default_step")]
    pub step: f64,
    #[serde(default)]
    pub whole_numbers: bool,
}

fn default_step() -> f64 {
    1.0
}

impl Range {
    fn check(&self, value: &str) -> Result<(), String> {
        let number = if self.whole_numbers {
            value
                .parse::<i64>()
                .map_err(|_| "expected a whole number".to_owned())? as f64
        } else {
            value
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| "expected a number".to_owned())?
        };

        if number < self.min || number > self.max {
            return Err(format!("must be between {} and {}", self.min, self.max));
        }
        Ok(())
    }
}

/// Definition of one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterSpec {
    pub name: String,
    /// Non-optional parameters are always enabled.
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub default: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
}

impl ParameterSpec {
    /// Initial enabled state of the parameter in a new command.
    pub fn initially_enabled(&self) -> bool {
        !self.optional || self.enabled
    }

    pub fn is_file(&self) -> bool {
        self.name == INPUT_FILE || self.name == OUTPUT_FILE
    }

    /// Switch without a value.
    pub fn is_flag(&self) -> bool {
        !self.is_file() && self.default.is_empty()
    }

    /// Check a value for this parameter.
    pub fn check(&self, value: &str) -> Result<(), String> {
        if self.is_file() {
            return Ok(());
        }
        check_token(self.is_flag(), value).map_err(str::to_owned)?;
        if self.is_flag() {
            return Ok(());
        }
        if self.name == BACKGROUND_COLOR {
            return check_hex_color(value);
        }
        match &self.range {
            Some(range) => range.check(value),
            None => Ok(()),
        }
    }
}

fn check_hex_color(value: &str) -> Result<(), String> {
    let mut rgb = [0u8; 3];
    hex::decode_to_slice(value, &mut rgb)
        .map_err(|_| "expected six hex digits, e.g. FFFFFF".to_owned())
}

/// Ordered list of parameter definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    #[serde(rename = "parameter", default)]
    parameters: Vec<ParameterSpec>,
}

impl FromStr for Schema {
    type Err = SchemaError;

    /// Parse and validate a schema document.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let schema: Self = toml::from_str(text)?;
        schema.validate()?;
        Ok(schema)
    }
}

impl Schema {
    /// Load a schema file.
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let text =
            fs::read_to_string(path).map_err(|err| SchemaError::Io(path.to_path_buf(), err))?;
        text.parse()
    }

    /// The built-in AutoTrace schema.
    pub fn embedded() -> Result<Self, SchemaError> {
        EMBEDDED.parse()
    }

    /// Load `path`, or the embedded schema when no path is configured.
    pub fn load_or_embedded(path: Option<&Path>) -> Result<Self, SchemaError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::embedded(),
        }
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Collect every structural problem in the schema.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.is_empty() {
            return Err(SchemaError::Invalid(vec!["schema defines no parameters".into()]));
        }

        let mut problems = Vec::new();
        let mut seen = FxHashSet::default();

        for spec in &self.parameters {
            let name = spec.name.as_str();
            if name.trim().is_empty() || name.contains(char::is_whitespace) {
                problems.push(format!("parameter name `{name}` must be a single word"));
                continue;
            }
            if !seen.insert(name) {
                problems.push(format!("`{name}` is defined more than once"));
            }

            if let Some(range) = &spec.range {
                if range.min > range.max {
                    problems.push(format!("`{name}`: range min is greater than max"));
                }
                if range.step <= 0.0 {
                    problems.push(format!("`{name}`: range step must be positive"));
                }
            }
            if !spec.default.is_empty()
                && let Err(reason) = spec.check(&spec.default)
            {
                problems.push(format!("`{name}`: default `{}` {reason}", spec.default));
            }
        }

        for required in [INPUT_FILE, OUTPUT_FILE] {
            if !seen.contains(required) {
                problems.push(format!("missing the `{required}` parameter"));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::Invalid(problems))
        }
    }

    /// Check `value` against the definition of `name`.
    pub fn check_value(&self, name: &str, value: &str) -> Result<(), SchemaError> {
        let spec = self
            .get(name)
            .ok_or_else(|| SchemaError::NotFound(name.to_owned()))?;
        spec.check(value).map_err(|reason| SchemaError::Value {
            name: name.to_owned(),
            value: value.to_owned(),
            reason,
        })
    }

    /// Build a sealed command with every parameter at its initial state.
    pub fn build_command(
        &self,
        program: &str,
        listener: Option<Box<dyn CommandListener + Send>>,
    ) -> Result<Command, SchemaError> {
        let mut command = Command::new(program, self.parameters.len());
        command.set_listener(listener);
        for spec in &self.parameters {
            command.add_parameter(&spec.name, spec.initially_enabled(), &spec.default)?;
        }
        Ok(command)
    }
}
