//! SVG post-processing of tracer output.
//!
//! The tracer writes one `<path>` per color region with the color buried in
//! a `style` attribute. [`Optimizer`] rewrites that document in place with
//! shorter path data and one of four color layouts, see [`Grouping`].

mod color;
mod document;
mod geometry;
mod naming;
mod optimizer;

use std::{fmt::Display, io, path::PathBuf};

use thiserror::Error;

pub use color::Rgb;
pub use document::SvgDocument;
pub use optimizer::{Grouping, OptimizeReport, Optimizer};

/// Header lines of every document vectrace writes.
const XML_DECLARATION: &str = r#"<?xml version="1.0" standalone="no"?>"#;
const SVG_DOCTYPE: &str = r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">"#;

/// Errors raised while rewriting an SVG document.
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("failed to access {0}")]
    Io(PathBuf, #[source] io::Error),

    #[error("malformed XML: {0}")]
    Xml(String),

    #[error("unexpected tracer output: {0}")]
    Format(String),
}

impl OptimizeError {
    pub(crate) fn xml(err: impl Display) -> Self {
        Self::Xml(err.to_string())
    }
}
