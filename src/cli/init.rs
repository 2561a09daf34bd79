//! `vectrace init`: write a commented config file.

use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

use crate::{config::VectraceConfig, log};

/// Config template with a version header.
pub fn generate_config_template() -> String {
    format!(
        "# vectrace configuration file (v{})\n\n{}",
        env!("CARGO_PKG_VERSION"),
        VectraceConfig::template()
    )
}

/// Write the template to `path`, or print it with `dry_run`.
pub fn write_config(path: &Path, dry_run: bool, force: bool) -> Result<()> {
    if dry_run {
        print!("{}", generate_config_template());
        return Ok(());
    }
    if path.exists() && !force {
        bail!("`{}` already exists, pass --force to overwrite", path.display());
    }

    fs::write(path, generate_config_template())
        .with_context(|| format!("Failed to write config file '{}'", path.display()))?;
    log!("init"; "wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectrace.toml");

        write_config(&path, false, false).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# vectrace configuration file"));
        assert!(VectraceConfig::from_str(&content).is_ok());

        assert!(write_config(&path, false, false).is_err());
        write_config(&path, false, true).unwrap();
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectrace.toml");
        write_config(&path, true, false).unwrap();
        assert!(!path.exists());
    }
}
