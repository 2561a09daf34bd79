//! Type-safe config field path.

use owo_colors::OwoColorize;
use std::fmt;

/// A type-safe wrapper for config field paths.
///
/// Used with `#[derive(Config)]` to generate compile-time checked
/// field path accessors.
///
/// # Example
///
/// ```ignore
/// #[derive(Config)]
/// #[config(section = "tracer")]
/// pub struct TracerConfig {
///     pub program: String,
/// }
///
/// // Generated:
/// impl TracerConfig {
///     pub const FIELDS: TracerConfigFields = ...;
/// }
///
/// // Usage:
/// diag.error(TracerConfig::FIELDS.program, "must not be empty");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_path() {
        const PATH: FieldPath = FieldPath::new("tracer.program");
        assert_eq!(PATH.as_str(), "tracer.program");
        assert_eq!(PATH.as_ref(), "tracer.program");
    }
}
