//! Command-line interface module.
//!
//! | Module     | Subcommand                          |
//! |------------|-------------------------------------|
//! | `trace`    | `vectrace trace`                    |
//! | `optimize` | `vectrace optimize`                 |
//! | `command`  | `vectrace command`                  |
//! | `profile`  | `vectrace profile ...`              |
//! | `params`   | `vectrace params`                   |
//! | `init`     | `vectrace init`                     |

mod args;
pub mod command;
pub mod common;
pub mod init;
pub mod optimize;
pub mod params;
pub mod profile;
pub mod trace;

pub use args::{Cli, Commands, OptimizeArgs, ParamOverrides, ProfileAction, TraceArgs};
