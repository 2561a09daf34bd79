//! Path normalization utilities.
//!
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `expand_path` - `~` and `$VAR` expansion
//! - `resolve_path` - expand, then anchor relative paths at a base directory
//! - `backup_path` - sibling path that holds the previous tracer result

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Expand a leading `~` and environment variables.
///
/// Paths that are not valid UTF-8, or that reference unset variables, are
/// returned unchanged.
pub fn expand_path(path: &Path) -> PathBuf {
    let Some(text) = path.to_str() else {
        return path.to_path_buf();
    };
    match shellexpand::full(text) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(_) => PathBuf::from(shellexpand::tilde(text).into_owned()),
    }
}

/// Expand `path`, then resolve it against `base` when relative.
///
/// # Example
/// ```ignore
/// // `schema = "params.toml"` in /work/vectrace.toml
/// resolve_path(Path::new("params.toml"), Path::new("/work"));  // /work/params.toml
/// resolve_path(Path::new("~/p.toml"), Path::new("/work"));     // /home/me/p.toml
/// ```
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    let expanded = expand_path(path);
    if expanded.is_absolute() {
        expanded
    } else {
        normalize_path(&base.join(expanded))
    }
}

/// Path the previous result of `path` is moved to: the same name plus `~`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push("~");
    PathBuf::from(name)
}
