//! # SVG Scanner
//!
//! Pulls the few things the converter needs out of an SVG document:
//!
//! - `<svg height>`: the document height, used to flip Y.
//! - `<g transform="translate(x,y)">`: one document-wide offset (the layer
//!   group Inkscape always writes).
//! - `<path>`: path data, style and an optional `translate` transform.
//!
//! Everything else (other elements, nested groups, non-translate transforms,
//! units other than px) is outside the supported subset and is skipped with a
//! warning where it would change the drawing.

mod style;

pub use style::{stroke_layer, PathStyle};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};

use crate::error::ConvertError;
use crate::model::{DocumentOffsets, Point, RawShape};
use crate::options::ConvertOptions;
use crate::path::tokenize;

/// The scanned document: offsets plus one raw shape per `<path>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScannedDocument {
    pub offsets: DocumentOffsets,
    pub shapes: Vec<RawShape>,
    pub warnings: Vec<ScanWarning>,
}

/// Recovered conditions found while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanWarning {
    /// The path's stroke is absent or not a hex colour; the default layer was used.
    MissingStrokeLayer { index: usize },
    /// A transform other than `translate` was ignored.
    UnsupportedTransform { element: String, transform: String },
    /// A second `<g>` translation was ignored.
    NestedGroup { transform: String },
}

impl std::fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanWarning::MissingStrokeLayer { index } => {
                write!(f, "path #{} has no stroke colour; using the default layer", index)
            }
            ScanWarning::UnsupportedTransform { element, transform } => {
                write!(f, "<{}> transform \"{}\" is not a translate; ignored", element, transform)
            }
            ScanWarning::NestedGroup { transform } => {
                write!(f, "only one group offset is supported; \"{}\" ignored", transform)
            }
        }
    }
}

/// Scan SVG markup into offsets and raw shapes, in document order.
pub fn scan(content: &str, options: &ConvertOptions) -> Result<ScannedDocument, ConvertError> {
    let mut reader = Reader::from_str(content);
    let mut document = ScannedDocument::default();
    let mut group_seen = false;
    let mut buf = Vec::new();

    loop {
        let e = match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => e,
            Event::Eof => break,
            _ => {
                buf.clear();
                continue;
            }
        };
        let tag_name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();

        match tag_name.as_str() {
            "svg" => {
                if let Some(height) = get_attr(&e, "height") {
                    document.offsets.vertical_flip = -parse_height(&height)?;
                }
            }
            "g" => {
                if let Some(transform) = get_attr(&e, "transform") {
                    match parse_translate(&transform) {
                        Some(_) if group_seen => {
                            warn!(%transform, "ignoring nested group offset");
                            document.warnings.push(ScanWarning::NestedGroup { transform });
                        }
                        Some(offset) => {
                            document.offsets.group = offset?;
                            group_seen = true;
                        }
                        None => unsupported_transform(&mut document, "g", transform),
                    }
                }
            }
            "path" => {
                let index = document.shapes.len();
                let shape = scan_path(&e, index, options, &mut document)?;
                document.shapes.push(shape);
            }
            _ => {}
        }
        buf.clear();
    }

    debug!(
        shapes = document.shapes.len(),
        group_x = document.offsets.group.x,
        group_y = document.offsets.group.y,
        flip = document.offsets.vertical_flip,
        "scanned document"
    );
    Ok(document)
}

fn scan_path(
    e: &BytesStart,
    index: usize,
    options: &ConvertOptions,
    document: &mut ScannedDocument,
) -> Result<RawShape, ConvertError> {
    let mut shape = RawShape::new(Vec::<String>::new());
    if let Some(d) = get_attr(e, "d") {
        shape.tokens = tokenize(&d);
    }

    // Presentation attributes first; `style` overrides them.
    let mut style = PathStyle::default();
    for key in ["fill", "stroke", "stroke-width"] {
        if let Some(value) = get_attr(e, key) {
            style.apply(key, &value);
        }
    }
    if let Some(css) = get_attr(e, "style") {
        style.apply_style(&css);
    }

    shape.fill_mode = style.fill_mode;
    shape.stroke_weight = style.stroke_width_px / options.px_per_mm;
    shape.stroke_layer = match style.layer {
        Some(0) => {
            debug!(index, "black stroke, using default layer");
            options.default_layer
        }
        Some(layer) => layer,
        None => {
            warn!(index, layer = options.default_layer, "path has no stroke colour");
            document
                .warnings
                .push(ScanWarning::MissingStrokeLayer { index });
            options.default_layer
        }
    };

    if let Some(transform) = get_attr(e, "transform") {
        match parse_translate(&transform) {
            Some(offset) => shape.local_offset = offset?,
            None => unsupported_transform(document, "path", transform),
        }
    }

    Ok(shape)
}

fn unsupported_transform(document: &mut ScannedDocument, element: &str, transform: String) {
    warn!(element, %transform, "ignoring unsupported transform");
    document.warnings.push(ScanWarning::UnsupportedTransform {
        element: element.to_string(),
        transform,
    });
}

/// Document height in px. A trailing `px` is accepted; other units are not.
fn parse_height(value: &str) -> Result<f64, ConvertError> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed);
    number
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|h| h.is_finite())
        .ok_or_else(|| ConvertError::invalid_attribute("svg", "height", value))
}

/// Parse `translate(x,y)` / `translate(x y)` / `translate(x)`.
///
/// `None` when the transform is not a translate at all.
fn parse_translate(value: &str) -> Option<Result<Point, ConvertError>> {
    let inner = value
        .trim()
        .strip_prefix("translate")?
        .trim()
        .strip_prefix('(')?
        .strip_suffix(')')?;
    let parts: Vec<&str> = inner
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();

    let parse = |s: &str| s.parse::<f64>().ok().filter(|v| v.is_finite());
    let offset = match parts.as_slice() {
        [x] => parse(*x).map(|x| Point::new(x, 0.0)),
        [x, y] => parse(*x).zip(parse(*y)).map(|(x, y)| Point::new(x, y)),
        _ => None,
    };
    Some(offset.ok_or_else(|| ConvertError::invalid_attribute("transform", "translate", value)))
}

/// Helper to get an attribute value from a quick-xml BytesStart.
fn get_attr(e: &BytesStart, name: &str) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == name.as_bytes() {
            return String::from_utf8(attr.value.to_vec()).ok();
        }
    }
    None
}
