//! Configuration section definitions.
//!
//! Each module corresponds to a section in `vectrace.toml`:
//!
//! | Module     | TOML Section   | Purpose                                |
//! |------------|----------------|----------------------------------------|
//! | `tracer`   | `[tracer]`     | Tracer executable, schema, backups     |
//! | `optimize` | `[optimize]`   | SVG rewrite settings                   |
//! | `profiles` | `[profiles]`   | Settings profile store                 |

mod optimize;
mod profiles;
mod tracer;

pub use optimize::OptimizeConfig;
pub use profiles::ProfilesConfig;
pub use tracer::TracerConfig;
