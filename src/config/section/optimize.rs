//! `[optimize]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [optimize]
//! enable = true               # Rewrite the traced SVG after each trace
//! grouping = "color-grouped"  # flat | single-group | color-grouped | style-extracted
//! ```

use macros::Config;
use serde::{Deserialize, Serialize};

use crate::optimize::Grouping;

/// SVG rewrite settings.
#[derive(Debug, Clone, Serialize, Deserialize, Config)]
#[serde(default)]
#[config(section = "optimize")]
pub struct OptimizeConfig {
    /// Rewrite the traced SVG after each trace.
    pub enable: bool,

    /// Color layout: flat, single-group, color-grouped or style-extracted.
    pub grouping: Grouping,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            enable: true,
            grouping: Grouping::Flat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{VectraceConfig, test_parse_config};

    #[test]
    fn test_optimize_config_defaults() {
        let config = test_parse_config("");
        assert!(config.optimize.enable);
        assert_eq!(config.optimize.grouping, Grouping::Flat);
    }

    #[test]
    fn test_grouping_names() {
        for (name, grouping) in [
            ("flat", Grouping::Flat),
            ("single-group", Grouping::SingleGroup),
            ("color-grouped", Grouping::ColorGrouped),
            ("style-extracted", Grouping::StyleExtracted),
        ] {
            let config = test_parse_config(&format!("[optimize]\ngrouping = \"{name}\""));
            assert_eq!(config.optimize.grouping, grouping);
            assert_eq!(grouping.as_str(), name);
        }
    }

    #[test]
    fn test_unknown_grouping_rejected() {
        let result = VectraceConfig::from_str("[optimize]\ngrouping = \"nested\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_template() {
        let template = OptimizeConfig::template();
        assert!(template.contains("grouping = \"flat\"\n"));
        assert!(template.contains("enable = true\n"));
    }
}
