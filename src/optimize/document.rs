//! Minimal SVG document model for tracer output.
//!
//! The tracer writes a flat document: one `<svg>` root whose children are
//! `<path style=".." d=".."/>` elements. Only the root's attributes and its
//! direct children are modeled; anything nested is kept as raw markup.

use std::{borrow::Cow, fmt::Write as _, fs, path::Path};

use quick_xml::{
    Reader,
    escape::{escape, unescape},
    events::{BytesStart, Event},
};

use super::{OptimizeError, SVG_DOCTYPE, XML_DECLARATION};

/// A childless element with its attributes in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_path(&self) -> bool {
        self.name == "path"
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        write_attrs(&self.attrs, out);
        out.push_str("/>");
    }
}

/// Direct child of the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Markup kept verbatim: elements with content, comments.
    Raw(String),
}

/// Parsed tracer output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgDocument {
    root_attrs: Vec<(String, String)>,
    width: String,
    height: String,
    children: Vec<Node>,
}

impl SvgDocument {
    /// Parse SVG text.
    pub fn parse(text: &str) -> Result<Self, OptimizeError> {
        let mut reader = Reader::from_str(text);
        let mut root_attrs: Option<Vec<(String, String)>> = None;
        let mut children = Vec::new();
        let mut depth = 0usize;
        let mut raw_start = 0usize;
        let mut closed = false;

        loop {
            let before = reader.buffer_position() as usize;
            let event = reader.read_event().map_err(OptimizeError::xml)?;
            let self_closing = matches!(event, Event::Empty(_));
            match event {
                Event::Start(e) | Event::Empty(e) if depth == 0 => {
                    if closed || root_attrs.is_some() {
                        return Err(OptimizeError::Format("more than one root element".into()));
                    }
                    if e.name().as_ref() != b"svg" {
                        return Err(OptimizeError::Format(format!(
                            "root element is <{}>, expected <svg>",
                            String::from_utf8_lossy(e.name().as_ref())
                        )));
                    }
                    root_attrs = Some(read_attrs(&e)?);
                    // `<svg/>` has no children and no end event
                    if self_closing {
                        closed = true;
                    } else {
                        depth = 1;
                    }
                }
                Event::Start(_) => {
                    if depth == 1 {
                        raw_start = before;
                    }
                    depth += 1;
                }
                Event::End(_) => {
                    if depth == 0 {
                        return Err(OptimizeError::Format("unexpected closing tag".into()));
                    }
                    depth -= 1;
                    match depth {
                        0 => closed = true,
                        1 => {
                            let end = reader.buffer_position() as usize;
                            children.push(Node::Raw(text[raw_start..end].to_owned()));
                        }
                        _ => {}
                    }
                }
                Event::Empty(e) if depth == 1 => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    children.push(Node::Element(Element {
                        name,
                        attrs: read_attrs(&e)?,
                    }));
                }
                Event::Comment(_) if depth == 1 => {
                    let end = reader.buffer_position() as usize;
                    children.push(Node::Raw(text[before..end].to_owned()));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        let root_attrs = root_attrs
            .ok_or_else(|| OptimizeError::Format("document has no <svg> element".into()))?;
        if !closed {
            return Err(OptimizeError::Format("<svg> element is not closed".into()));
        }

        let find = |key: &str| {
            root_attrs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .ok_or_else(|| OptimizeError::Format(format!("<svg> has no `{key}` attribute")))
        };
        let width = find("width")?;
        let height = find("height")?;

        Ok(Self {
            root_attrs,
            width,
            height,
            children,
        })
    }

    /// Read and parse an SVG file.
    pub fn load(path: &Path) -> Result<Self, OptimizeError> {
        let text =
            fs::read_to_string(path).map_err(|err| OptimizeError::Io(path.to_path_buf(), err))?;
        Self::parse(&text)
    }

    /// Declared width, verbatim.
    pub fn width(&self) -> &str {
        &self.width
    }

    /// Declared height, verbatim.
    pub fn height(&self) -> &str {
        &self.height
    }

    #[cfg(test)]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Path elements among the root's direct children.
    pub fn paths(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) if e.is_path() => Some(e),
            _ => None,
        })
    }

    /// Insert a filled rectangle spanning the document as the first child.
    pub fn insert_background(&mut self, hex: &str) {
        let rect = Element::new("rect")
            .with_attr("width", self.width.clone())
            .with_attr("height", self.height.clone())
            .with_attr("fill", format!("#{hex}"));
        self.children.insert(0, Node::Element(rect));
    }

    /// Serialize the document as is.
    pub fn to_svg(&self) -> String {
        let mut out = format!("{XML_DECLARATION}\n{SVG_DOCTYPE}\n<svg");
        write_attrs(&self.root_attrs, &mut out);
        out.push_str(">\n");
        for child in &self.children {
            match child {
                Node::Element(e) => e.write_to(&mut out),
                Node::Raw(raw) => out.push_str(raw),
            }
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }
}

fn read_attrs(e: &BytesStart<'_>) -> Result<Vec<(String, String)>, OptimizeError> {
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(OptimizeError::xml)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = std::str::from_utf8(&attr.value).map_err(OptimizeError::xml)?;
        let value = unescape(raw).map_err(OptimizeError::xml)?;
        attrs.push((key, value.into_owned()));
    }
    Ok(attrs)
}

fn write_attrs(attrs: &[(String, String)], out: &mut String) {
    for (key, value) in attrs {
        let value: Cow<'_, str> = escape(value.as_str());
        let _ = write!(out, " {key}=\"{value}\"");
    }
}
