//! # Script Serializer
//!
//! Writes converted shapes as an EAGLE script (`.scr`).
//!
//! ## Script Structure
//!
//! ```text
//! GRID MM;              <- once per document
//! SET WIRE_BEND 2;      <- straight segments between points
//! LAYER 21;             <- per shape
//! WIRE 0.250            <- entity type and weight (mm)
//! (1.000000 2.000000)   <- one line per point
//! ...
//! ;                     <- ends the shape
//! ```
//!
//! Points that print identically to the previous one are skipped, which
//! collapses the repeated vertices curve flattening produces. POLYGON shapes
//! get their first point written again at the end so EAGLE closes them.

use std::fmt::Write as FmtWrite; // for write! on String

use tracing::{debug, warn};

use crate::model::{EagleShape, Point, ShapeKind};

pub struct ScriptWriter;

impl Default for ScriptWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write shapes to script text, in order.
    pub fn write(&self, shapes: &[EagleShape]) -> String {
        let mut out = String::new();
        out.push_str("GRID MM;\n");
        out.push_str("SET WIRE_BEND 2;\n");

        for (index, shape) in shapes.iter().enumerate() {
            if shape.points.is_empty() {
                warn!(index, "skipping shape without points");
                continue;
            }
            self.write_shape(&mut out, shape);
        }

        debug!(shapes = shapes.len(), bytes = out.len(), "wrote script");
        out
    }

    fn write_shape(&self, out: &mut String, shape: &EagleShape) {
        let _ = writeln!(out, "LAYER {};", shape.layer);
        let _ = writeln!(out, "{} {:.3}", shape.kind.keyword(), shape.weight_mm);

        let mut last: Option<String> = None;
        for point in &shape.points {
            let text = Self::format_point(*point);
            if last.as_deref() != Some(text.as_str()) {
                out.push_str(&text);
                out.push('\n');
                last = Some(text);
            }
        }

        if shape.kind == ShapeKind::Polygon {
            if let Some(first) = shape.points.first() {
                out.push_str(&Self::format_point(*first));
                out.push('\n');
            }
        }

        out.push_str(";\n");
    }

    fn format_point(point: Point) -> String {
        format!("({} {})", Self::format_coord(point.x), Self::format_coord(point.y))
    }

    /// Six decimals, with negative zero printed as plain zero.
    fn format_coord(value: f64) -> String {
        let text = format!("{:.6}", value);
        match text.strip_prefix('-') {
            Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_string(),
            _ => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(kind: ShapeKind, points: &[(f64, f64)]) -> EagleShape {
        EagleShape {
            kind,
            weight_mm: 0.25,
            layer: 21,
            points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }

    #[test]
    fn test_header_written_once() {
        let script = ScriptWriter::new().write(&[]);
        assert_eq!(script, "GRID MM;\nSET WIRE_BEND 2;\n");
    }

    #[test]
    fn test_wire_format() {
        let script = ScriptWriter::new().write(&[shape(
            ShapeKind::Wire,
            &[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)],
        )]);
        assert_eq!(
            script,
            "GRID MM;\nSET WIRE_BEND 2;\nLAYER 21;\nWIRE 0.250\n\
             (0.000000 0.000000)\n(1.000000 0.000000)\n(0.000000 0.000000)\n;\n"
        );
    }

    #[test]
    fn test_polygon_is_closed() {
        let script = ScriptWriter::new().write(&[shape(
            ShapeKind::Polygon,
            &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)],
        )]);
        assert!(script.contains(
            "POLYGON 0.250\n(0.000000 0.000000)\n(1.000000 0.000000)\n(1.000000 1.000000)\n(0.000000 0.000000)\n;\n"
        ));
    }

    #[test]
    fn test_duplicates_after_rounding_skipped() {
        let script = ScriptWriter::new().write(&[shape(
            ShapeKind::Wire,
            &[(1.0, 2.0), (1.0000001, 2.0), (1.0, 2.0), (3.0, 4.0)],
        )]);
        assert_eq!(script.matches("(1.000000 2.000000)").count(), 1);
        assert!(script.contains("(3.000000 4.000000)"));
    }

    #[test]
    fn test_negative_zero_prints_as_zero() {
        let script = ScriptWriter::new().write(&[shape(
            ShapeKind::Wire,
            &[(0.0, -0.0), (-0.0000001, 0.0), (-1.5, -0.25)],
        )]);
        assert!(script.contains("(0.000000 0.000000)\n(-1.500000 -0.250000)\n"));
        assert!(!script.contains("-0.000000"));
    }

    #[test]
    fn test_empty_shape_skipped() {
        let script = ScriptWriter::new().write(&[shape(ShapeKind::Polygon, &[])]);
        assert!(!script.contains("LAYER"));
    }
}
