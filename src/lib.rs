//! # svg2scr
//!
//! Converts the paths of an SVG drawing into an EAGLE drafting script.
//!
//! EAGLE can only draw straight segments, so everything in the drawing is
//! reduced to absolute point lists in millimetres: lines are copied, Bezier
//! curves are flattened into polylines, and arcs collapse to their endpoints.
//!
//! ## Architecture
//!
//! ```text
//! SVG text
//!       ↓
//!   [svg]     — Scan <svg>/<g>/<path>: offsets + raw shapes
//!       ↓
//!   [path]    — Interpret path commands into mm points
//!       ↓          (uses [bezier] to flatten curves)
//!   [script]  — Serialize to EAGLE script text
//! ```
//!
//! Each stage returns an owned value consumed by the next; shapes are
//! interpreted independently of each other.

pub mod bezier;
pub mod error;
pub mod model;
pub mod options;
pub mod path;
pub mod script;
pub mod svg;

pub use error::{ConvertError, PathError};
pub use model::{DocumentOffsets, EagleShape, FillMode, Point, RawShape, ShapeKind};
pub use options::ConvertOptions;

use std::path::Path;

use serde::Serialize;
use tracing::{debug, error};

use path::Interpreter;
use script::ScriptWriter;
use svg::ScanWarning;

/// A shape that was dropped because its path data could not be interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeFailure {
    /// Index of the `<path>` in document order.
    pub index: usize,
    pub error: PathError,
}

/// Result of converting one document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Conversion {
    /// Converted shapes, in document order.
    pub shapes: Vec<EagleShape>,
    #[serde(skip)]
    pub failures: Vec<ShapeFailure>,
    #[serde(skip)]
    pub warnings: Vec<ScanWarning>,
}

impl Conversion {
    /// Render the converted shapes as EAGLE script text.
    pub fn to_script(&self) -> String {
        ScriptWriter::new().write(&self.shapes)
    }
}

/// Map scanned shapes through the interpreter.
///
/// In strict mode the first failing shape aborts the conversion; otherwise it
/// is dropped and reported in [`Conversion::failures`].
pub fn interpret_shapes(
    offsets: DocumentOffsets,
    shapes: &[RawShape],
    options: &ConvertOptions,
) -> Result<(Vec<EagleShape>, Vec<ShapeFailure>), ConvertError> {
    let interpreter = Interpreter::with_options(offsets, options);
    let mut converted = Vec::with_capacity(shapes.len());
    let mut failures = Vec::new();

    for (index, shape) in shapes.iter().enumerate() {
        match interpreter.interpret(shape) {
            Ok(eagle) => {
                debug!(index, points = eagle.points.len(), kind = ?eagle.kind, "converted path");
                converted.push(eagle);
            }
            Err(source) if options.strict => {
                return Err(ConvertError::Shape { index, source });
            }
            Err(err) => {
                error!(index, %err, "dropping path");
                failures.push(ShapeFailure { index, error: err });
            }
        }
    }

    Ok((converted, failures))
}

/// Convert SVG markup.
pub fn convert(svg: &str, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
    options.validate()?;
    let document = svg::scan(svg, options)?;
    let (shapes, failures) = interpret_shapes(document.offsets, &document.shapes, options)?;
    Ok(Conversion {
        shapes,
        failures,
        warnings: document.warnings,
    })
}

/// Convert an SVG file.
pub fn convert_file(path: &Path, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
    let svg = std::fs::read_to_string(path)?;
    convert(&svg, options)
}
