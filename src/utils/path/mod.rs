//! Path utilities.
//!
//! Pure functions for path manipulation, plus the previous-result rename.
//!
//! - [`fs`]: normalization, `~` expansion, config-relative resolution

pub mod fs;

pub use fs::{backup_path, normalize_path, resolve_path};
