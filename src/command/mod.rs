//! Tracer command model.
//!
//! | Module      | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `parameter` | A named parameter and its rendering              |
//! | `model`     | The sealed, ordered parameter set (`Command`)    |
//! | `parse`     | Command string tokenizer for `set_command`       |
//! | `listener`  | Change observers                                 |
//! | `schema`    | Parameter definitions loaded from TOML           |

mod listener;
mod model;
mod parameter;
mod parse;
pub mod schema;

pub use listener::{CommandListener, ParameterEvent};
pub use model::Command;
pub use parameter::Parameter;
pub use schema::{ParameterSpec, Schema};

use thiserror::Error;

/// Image to trace. Rendered without an option token, always last.
pub const INPUT_FILE: &str = "input-file";
/// Where the tracer writes its SVG.
pub const OUTPUT_FILE: &str = "output-file";
/// Background color in hex, also honored by the optimizer.
pub const BACKGROUND_COLOR: &str = "background-color";
/// Centerline tracing switches the optimizer to stroke colors.
pub const CENTERLINE: &str = "centerline";

/// Errors raised by the command model.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown parameter `{0}`")]
    NotFound(String),

    #[error("command can only hold {0} parameters")]
    Capacity(usize),

    #[error("command is incomplete: {added} of {capacity} parameters added")]
    Incomplete { added: usize, capacity: usize },

    #[error("parameter `{0}` is defined more than once")]
    Duplicate(String),

    #[error("command has no `{0}` parameter")]
    MissingFileParameter(&'static str),

    #[error("cannot parse command: {0}")]
    Parse(String),

    #[error("value `{value}` for `{name}` {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: &'static str,
    },
}
