//! Proc macros for vectrace.
//!
//! # Config derive macro
//!
//! Generates typed field paths and a commented TOML template for a
//! configuration section.
//!
//! ```ignore
//! #[derive(Config)]
//! #[config(section = "tracer")]
//! /// External tracer settings.
//! pub struct TracerConfig {
//!     /// Tracer executable.
//!     #[config(default = "autotrace")]
//!     pub program: String,
//!
//!     /// Resolved at load time.
//!     #[config(skip)]
//!     pub resolved: PathBuf,
//! }
//!
//! // Generates:
//! // - TracerConfig::FIELDS.program -> FieldPath("tracer.program")
//! // - TracerConfig::template() -> `program = "autotrace"` with doc comment
//! // - TracerConfig::template_with_header() -> with [tracer] header
//! ```
//!
//! # Attributes
//!
//! Struct-level:
//! - `#[config(section = "path")]` - TOML section path
//!
//! Field-level:
//! - `#[config(skip)]` - Skip from FIELDS and template
//! - `#[config(name = "x")]` - Custom TOML field name
//! - `#[config(default = "x")]` - Default value written into the template
//!
//! # Section inference
//!
//! Without `section` attribute, inferred from struct name:
//! - `OptimizeConfig` → `optimize`
//! - `ProfileStoreConfig` → `profile_store`

mod config;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derive macro that generates FIELDS and template().
#[proc_macro_derive(Config, attributes(config))]
pub fn derive_config(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    config::derive(&input).into()
}
