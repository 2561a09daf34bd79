//! Pipeline stage attribution for user-visible failures.

use std::fmt;

use thiserror::Error;

/// Where in the pipeline a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Config file, schema, profiles, overrides, input checks.
    Configuration,
    /// Locating or running the tracer.
    Invocation,
    /// Rewriting the traced SVG. The tracer output stays on disk.
    Rewrite,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Configuration => "configuration",
            Self::Invocation => "invocation",
            Self::Rewrite => "rewrite",
        })
    }
}

/// A failure tagged with its stage, rendered as `[stage] message`.
///
/// The wrapped error's chain is folded into the message so `anyhow` does not
/// print it a second time as a cause.
#[derive(Debug, Error)]
#[error("[{stage}] {error:#}")]
pub struct StageError {
    pub stage: Stage,
    error: anyhow::Error,
}

impl StageError {
    pub fn new(stage: Stage, error: impl Into<anyhow::Error>) -> Self {
        Self {
            stage,
            error: error.into(),
        }
    }
}

/// Tag the error of a `Result` with a stage.
pub trait StageExt<T> {
    fn stage(self, stage: Stage) -> Result<T, StageError>;
}

impl<T, E: Into<anyhow::Error>> StageExt<T> for Result<T, E> {
    fn stage(self, stage: Stage) -> Result<T, StageError> {
        self.map_err(|err| StageError::new(stage, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_display() {
        let err = StageError::new(Stage::Invocation, anyhow::anyhow!("`autotrace` failed"));
        assert_eq!(err.to_string(), "[invocation] `autotrace` failed");
    }

    #[test]
    fn test_chain_folded() {
        let result: anyhow::Result<()> = Err(std::io::Error::other("disk full"))
            .context("cannot write out.svg");
        let err = result.stage(Stage::Rewrite).unwrap_err();
        assert_eq!(err.to_string(), "[rewrite] cannot write out.svg: disk full");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_stage_of_typed_error() {
        let result: Result<(), crate::command::CommandError> =
            Err(crate::command::CommandError::NotFound("x".into()));
        let err = result.stage(Stage::Configuration).unwrap_err();
        assert_eq!(err.stage, Stage::Configuration);
        assert_eq!(err.to_string(), "[configuration] unknown parameter `x`");
    }
}
