//! Rewrites tracer output into a smaller SVG.
//!
//! Every mode writes the same header and the same paths; they differ in
//! where the color lives:
//!
//! | Grouping          | Color carried by                                |
//! |-------------------|-------------------------------------------------|
//! | `flat`            | each `<path>`                                   |
//! | `single-group`    | each `<path>`, shared paint in one `<g>`        |
//! | `color-grouped`   | one `<g>` per color, first-seen order           |
//! | `style-extracted` | a generated CSS class per color, in `<defs>`    |

use std::{
    fs,
    path::{Path, PathBuf},
};

use quick_xml::escape::escape;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::{
    OptimizeError, SVG_DOCTYPE, XML_DECLARATION,
    color::{Rgb, extract_color},
    document::SvgDocument,
    geometry::compact,
    naming::class_name,
};

/// Number of distinct colors reported in a palette.
pub const PALETTE_LIMIT: usize = 279;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// How path colors are laid out in the rewritten document.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Grouping {
    /// Color on every path.
    #[default]
    Flat,
    /// One group holding the shared paint setting.
    SingleGroup,
    /// One group per distinct color.
    ColorGrouped,
    /// A CSS class per distinct color.
    StyleExtracted,
}

impl Grouping {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::SingleGroup => "single-group",
            Self::ColorGrouped => "color-grouped",
            Self::StyleExtracted => "style-extracted",
        }
    }
}

/// Output of a single rewrite, before it is written anywhere.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub svg: String,
    pub path_count: usize,
    pub palette: Vec<Rgb>,
}

/// What a rewrite did to a file.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizeReport {
    pub output: PathBuf,
    pub grouping: Grouping,
    pub path_count: usize,
    pub palette: Vec<Rgb>,
    /// Size of the rewritten file in bytes.
    pub size: u64,
}

/// Grouping mode plus paint settings taken from the tracer command.
#[derive(Debug, Clone, Default)]
pub struct Optimizer {
    grouping: Grouping,
    background: Option<String>,
    centerline: bool,
}

impl Optimizer {
    pub fn new(grouping: Grouping) -> Self {
        Self {
            grouping,
            ..Default::default()
        }
    }

    /// Background color as six hex digits, or `None` for no backdrop.
    pub fn background(mut self, hex: Option<String>) -> Self {
        self.background = hex;
        self
    }

    /// Centerline traces carry their color in `stroke`, not `fill`.
    pub fn centerline(mut self, enabled: bool) -> Self {
        self.centerline = enabled;
        self
    }

    pub fn grouping(&self) -> Grouping {
        self.grouping
    }

    /// Rewrite `doc` into a new SVG text.
    pub fn render(&self, doc: &SvgDocument) -> Result<Rendered, OptimizeError> {
        let mut pass = Pass::new(self);
        pass.header(doc)?;

        for path in doc.paths() {
            let style = path.attr("style").unwrap_or_default();
            let color = extract_color(style, self.centerline).ok_or_else(|| {
                OptimizeError::Format(format!("cannot read a color from style `{style}`"))
            })?;
            let d = path.attr("d").unwrap_or_default();
            pass.path(color, &compact(d));
        }

        Ok(pass.finish())
    }

    /// Rewrite an SVG file in place.
    ///
    /// The new text is fully rendered before the file is touched, so a
    /// document that cannot be rewritten is left as the tracer wrote it.
    pub fn optimize_file(&self, path: &Path) -> Result<OptimizeReport, OptimizeError> {
        let doc = SvgDocument::load(path)?;
        let rendered = self.render(&doc)?;

        fs::write(path, &rendered.svg).map_err(|err| OptimizeError::Io(path.to_path_buf(), err))?;

        Ok(OptimizeReport {
            output: path.to_path_buf(),
            grouping: self.grouping,
            path_count: rendered.path_count,
            palette: rendered.palette,
            size: rendered.svg.len() as u64,
        })
    }
}

// ============================================================================
// Working state of one rewrite
// ============================================================================

struct Pass<'a> {
    optimizer: &'a Optimizer,
    out: String,
    path_count: usize,
    palette: Vec<Rgb>,
    palette_seen: FxHashSet<Rgb>,
    /// color text -> class name, style-extracted mode
    classes: FxHashMap<String, String>,
    class_order: Vec<(String, String)>,
    /// color text -> index into `groups`, color-grouped mode
    group_index: FxHashMap<String, usize>,
    groups: Vec<(String, Vec<String>)>,
}

impl<'a> Pass<'a> {
    fn new(optimizer: &'a Optimizer) -> Self {
        Self {
            optimizer,
            out: String::new(),
            path_count: 0,
            palette: Vec::new(),
            palette_seen: FxHashSet::default(),
            classes: FxHashMap::default(),
            class_order: Vec::new(),
            group_index: FxHashMap::default(),
            groups: Vec::new(),
        }
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Paint attribute carrying the color, and the one switched off.
    fn paint(&self) -> (&'static str, &'static str) {
        if self.optimizer.centerline {
            ("stroke", "fill")
        } else {
            ("fill", "stroke")
        }
    }

    fn header(&mut self, doc: &SvgDocument) -> Result<(), OptimizeError> {
        let size = format!(
            r#"width="{}" height="{}""#,
            escape(doc.width()),
            escape(doc.height())
        );

        self.line(XML_DECLARATION);
        self.line(SVG_DOCTYPE);
        self.line(&format!(r#"<svg xmlns="{SVG_NAMESPACE}" {size}>"#));

        let optimizer = self.optimizer;
        if let Some(background) = &optimizer.background {
            if Rgb::from_hex(background).is_none() {
                return Err(OptimizeError::Format(format!(
                    "background color `{background}` is not six hex digits"
                )));
            }
            self.line(&format!(r##"<rect fill="#{background}" {size}/>"##));
        }

        if self.optimizer.grouping == Grouping::SingleGroup {
            let (_, off) = self.paint();
            self.line(&format!(r#"<g {off}="none">"#));
        }
        Ok(())
    }

    fn path(&mut self, color: &str, d: &str) {
        self.path_count += 1;
        self.record_color(color);

        let (on, off) = self.paint();
        let d = escape(d);
        match self.optimizer.grouping {
            Grouping::Flat => {
                self.line(&format!(r##"<path {off}="none" {on}="#{color}" d="{d}"/>"##));
            }
            Grouping::SingleGroup => {
                self.line(&format!(r##"<path {on}="#{color}" d="{d}"/>"##));
            }
            Grouping::StyleExtracted => {
                let class = self.class_for(color);
                self.line(&format!(r#"<path class="{class}" d="{d}"/>"#));
            }
            Grouping::ColorGrouped => {
                let index = match self.group_index.get(color) {
                    Some(&index) => index,
                    None => {
                        self.groups.push((color.to_owned(), Vec::new()));
                        self.group_index.insert(color.to_owned(), self.groups.len() - 1);
                        self.groups.len() - 1
                    }
                };
                self.groups[index].1.push(d.into_owned());
            }
        }
    }

    fn record_color(&mut self, color: &str) {
        if self.palette.len() < PALETTE_LIMIT
            && let Some(rgb) = Rgb::from_hex(color)
            && self.palette_seen.insert(rgb)
        {
            self.palette.push(rgb);
        }
    }

    fn class_for(&mut self, color: &str) -> String {
        if let Some(class) = self.classes.get(color) {
            return class.clone();
        }
        let class = class_name(self.class_order.len());
        self.classes.insert(color.to_owned(), class.clone());
        self.class_order.push((class.clone(), color.to_owned()));
        class
    }

    fn finish(mut self) -> Rendered {
        let (on, off) = self.paint();
        match self.optimizer.grouping {
            Grouping::Flat => {}
            Grouping::SingleGroup => self.line("</g>"),
            Grouping::ColorGrouped => {
                for (color, paths) in std::mem::take(&mut self.groups) {
                    self.line(&format!(r##"<g {off}="none" {on}="#{color}">"##));
                    for d in paths {
                        self.line(&format!(r#"<path d="{d}"/>"#));
                    }
                    self.line("</g>");
                }
            }
            Grouping::StyleExtracted => {
                self.line("<defs>");
                self.line(r#"<style type="text/css"><![CDATA["#);
                for (class, color) in std::mem::take(&mut self.class_order) {
                    self.line(&format!(".{class}{{{on}:#{color}}}"));
                }
                self.line("]]></style>");
                self.line("</defs>");
            }
        }
        self.line("</svg>");

        Rendered {
            svg: self.out,
            path_count: self.path_count,
            palette: self.palette,
        }
    }
}
