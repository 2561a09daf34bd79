//! Shared helpers.

pub mod exec;
pub mod fmt;
pub mod path;
