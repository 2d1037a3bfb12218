//! Integration tests for the svg2scr conversion pipeline.
//!
//! These tests exercise the full path from SVG text to script output.
//! They verify:
//! - Document offsets and the Y flip land shapes where EAGLE expects them
//! - Path commands convert to the right absolute millimetre points
//! - Curves are flattened and smooth curves chain correctly
//! - Bad paths are dropped (or abort in strict mode) without affecting others
//! - The script text has the expected structure

use svg2scr::bezier::CubicBezier;
use svg2scr::model::*;
use svg2scr::path::interpret;
use svg2scr::svg::ScanWarning;
use svg2scr::{convert, ConvertError, ConvertOptions, PathError};

// ─── Helpers ────────────────────────────────────────────────────

fn svg_with_paths(height: f64, group: Option<(f64, f64)>, paths: &[&str]) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="500" height="{}">"#,
        height
    );
    if let Some((x, y)) = group {
        svg.push_str(&format!(r#"<g transform="translate({},{})">"#, x, y));
    }
    for p in paths {
        svg.push_str(p);
    }
    if group.is_some() {
        svg.push_str("</g>");
    }
    svg.push_str("</svg>");
    svg
}

fn wire(d: &str) -> String {
    format!(r##"<path d="{}" style="fill:none;stroke:#150000;stroke-width:0"/>"##, d)
}

fn filled(d: &str) -> String {
    format!(r##"<path d="{}" style="fill:#000000;stroke:#010000;stroke-width:3.54"/>"##, d)
}

fn approx(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

fn convert_default(svg: &str) -> svg2scr::Conversion {
    convert(svg, &ConvertOptions::default()).unwrap()
}

// ─── Interpreter contract ───────────────────────────────────────

#[test]
fn test_round_trip_scenario() {
    let raw = RawShape::new(["M", "0", "0", "L", "3.54", "0", "Z"]);
    let offsets = DocumentOffsets {
        group: Point::new(0.0, 0.0),
        vertical_flip: 0.0,
    };
    let shape = interpret(&raw, &offsets).unwrap();
    assert_eq!(shape.kind, ShapeKind::Wire);
    assert_eq!(
        shape.points,
        vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 0.0)]
    );
}

#[test]
fn test_implicit_lineto_after_absolute_move() {
    let raw = RawShape::new("M 0 0 10 10 20 20".split(' '));
    let shape = interpret(&raw, &DocumentOffsets::default()).unwrap();
    assert_eq!(shape.points.len(), 3);
    assert!(approx(shape.points[1], Point::new(10.0 / PX_PER_MM, -10.0 / PX_PER_MM)));
    assert!(approx(shape.points[2], Point::new(20.0 / PX_PER_MM, -20.0 / PX_PER_MM)));
}

#[test]
fn test_arc_is_two_points() {
    let raw = RawShape::new("M 0 0 A 5 5 0 0 1 10 0".split(' '));
    let shape = interpret(&raw, &DocumentOffsets::default()).unwrap();
    assert_eq!(shape.points.len(), 2);
    assert!(approx(shape.points[1], Point::new(10.0 / PX_PER_MM, 0.0)));
}

#[test]
fn test_curve_starts_and_ends_on_control_points() {
    let raw = RawShape::new("M 10 10 C 20 0 40 0 50 10".split(' '));
    let shape = interpret(&raw, &DocumentOffsets::default()).unwrap();
    let k = PX_PER_MM;
    let start = Point::new(10.0 / k, 10.0 / -k);
    let end = Point::new(50.0 / k, 10.0 / -k);
    assert_eq!(shape.points[0], start);
    assert_eq!(shape.points[1], start);
    assert_eq!(*shape.points.last().unwrap(), end);
    assert!(shape.points.len() >= 2 + MIN_CURVE_SEGMENTS);
}

#[test]
fn test_smooth_cubic_chain_matches_explicit_reflection() {
    let k = PX_PER_MM;
    let smooth = interpret(
        &RawShape::new("M 0 0 C 0 10 10 10 10 0 S 20 -10 20 0".split(' ')),
        &DocumentOffsets::default(),
    )
    .unwrap();
    // 2*end - handle2 = (10, -10) in px
    let explicit = interpret(
        &RawShape::new("M 0 0 C 0 10 10 10 10 0 C 10 -10 20 -10 20 0".split(' ')),
        &DocumentOffsets::default(),
    )
    .unwrap();
    assert_eq!(smooth.points.len(), explicit.points.len());
    for (a, b) in smooth.points.iter().zip(&explicit.points) {
        assert!(approx(*a, *b));
    }

    let second = CubicBezier::new(
        Point::new(10.0 / k, 0.0),
        Point::new(10.0 / k, 10.0 / k),
        Point::new(20.0 / k, 10.0 / k),
        Point::new(20.0 / k, 0.0),
    );
    let mid = second.eval(0.5);
    assert!(smooth.points.iter().any(|p| approx(*p, mid)));
}

// ─── Full documents ─────────────────────────────────────────────

#[test]
fn test_height_flips_y() {
    let svg = svg_with_paths(354.0, None, &[&wire("M 0 0 L 354 354")]);
    let conversion = convert_default(&svg);
    let points = &conversion.shapes[0].points;
    assert!(approx(points[0], Point::new(0.0, 100.0)));
    assert!(approx(points[1], Point::new(100.0, 0.0)));
}

#[test]
fn test_group_and_local_offsets_stack() {
    let svg = svg_with_paths(
        0.0,
        Some((35.4, -35.4)),
        &[r##"<path d="M 0 0 l 3.54 0" style="stroke:#150000" transform="translate(3.54,0)"/>"##],
    );
    let conversion = convert_default(&svg);
    let points = &conversion.shapes[0].points;
    assert!(approx(points[0], Point::new(11.0, 10.0)));
    assert!(approx(points[1], Point::new(12.0, 10.0)));
}

#[test]
fn test_leading_relative_move_quirk_in_document() {
    let svg = svg_with_paths(0.0, None, &[&wire("m 3.54 0 3.54 0 3.54 0")]);
    let points = &convert_default(&svg).shapes[0].points;
    assert!(approx(points[0], Point::new(1.0, 0.0)));
    assert!(approx(points[1], Point::new(2.0, 0.0)));
    assert!(approx(points[2], Point::new(3.0, 0.0)));
}

#[test]
fn test_shapes_keep_document_order_and_metadata() {
    let svg = svg_with_paths(
        0.0,
        Some((0.0, 0.0)),
        &[&wire("M 0 0 L 1 1"), &filled("M 0 0 L 1 0 L 1 1 z")],
    );
    let conversion = convert_default(&svg);
    assert_eq!(conversion.shapes.len(), 2);

    let first = &conversion.shapes[0];
    assert_eq!(first.kind, ShapeKind::Wire);
    assert_eq!(first.layer, 21);
    assert_eq!(first.weight_mm, 0.0);

    let second = &conversion.shapes[1];
    assert_eq!(second.kind, ShapeKind::Polygon);
    assert_eq!(second.layer, 1);
    assert!((second.weight_mm - 1.0).abs() < 1e-12);
    assert_eq!(second.points.first(), second.points.last());
}

#[test]
fn test_missing_stroke_is_recovered() {
    let svg = svg_with_paths(0.0, None, &[r#"<path d="M 0 0 L 1 1" style="fill:none;stroke:none"/>"#]);
    let conversion = convert_default(&svg);
    assert_eq!(conversion.shapes[0].layer, DEFAULT_LAYER);
    assert_eq!(
        conversion.warnings,
        vec![ScanWarning::MissingStrokeLayer { index: 0 }]
    );
}

#[test]
fn test_bad_path_dropped_and_reported() {
    let svg = svg_with_paths(
        0.0,
        None,
        &[&wire("M 0 0 L 1 1"), &wire("M 0 0 C 1 1 2 2"), &wire("M 5 5")],
    );
    let conversion = convert_default(&svg);
    assert_eq!(conversion.shapes.len(), 2);
    assert_eq!(conversion.failures.len(), 1);
    assert_eq!(conversion.failures[0].index, 1);
    assert!(matches!(
        conversion.failures[0].error,
        PathError::TruncatedCommand {
            command: 'C',
            expected: 6,
            found: 4,
            ..
        }
    ));
}

#[test]
fn test_huge_curve_dropped_without_affecting_others() {
    let svg = svg_with_paths(
        0.0,
        None,
        &[&wire("M 0 0 C 0 0 0 0 1e300 0"), &wire("M 0 0 L 3.54 0")],
    );
    let conversion = convert_default(&svg);
    assert_eq!(conversion.shapes.len(), 1);
    assert_eq!(conversion.shapes[0].points.len(), 2);
    assert_eq!(conversion.failures.len(), 1);
    assert!(matches!(
        conversion.failures[0].error,
        PathError::CurveTooLong { command: 'C', .. }
    ));
}

#[test]
fn test_named_stroke_colour_is_not_a_layer() {
    let svg = svg_with_paths(0.0, None, &[r#"<path d="M 0 0 L 1 1" style="stroke:red"/>"#]);
    let conversion = convert_default(&svg);
    assert_eq!(conversion.shapes[0].layer, DEFAULT_LAYER);
    assert_eq!(
        conversion.warnings,
        vec![ScanWarning::MissingStrokeLayer { index: 0 }]
    );
}

#[test]
fn test_strict_mode_aborts_document() {
    let svg = svg_with_paths(0.0, None, &[&wire("M 0 0 L x 1")]);
    let options = ConvertOptions {
        strict: true,
        ..Default::default()
    };
    match convert(&svg, &options) {
        Err(ConvertError::Shape { index, source }) => {
            assert_eq!(index, 0);
            assert!(matches!(source, PathError::UnknownCommandLetter { letter: 'x', .. }));
        }
        other => panic!("expected strict failure, got {:?}", other),
    }
}

#[test]
fn test_malformed_markup_is_an_error() {
    let err = convert("<svg><path d=\"M 0 0\"></g></svg>", &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::Xml(_)));
}

#[test]
fn test_custom_scale_and_segments() {
    let options = ConvertOptions {
        px_per_mm: 1.0,
        min_curve_segments: 32,
        ..Default::default()
    };
    let svg = svg_with_paths(0.0, None, &[&wire("M 0 0 Q 1 1 2 0")]);
    let points = &convert(&svg, &options).unwrap().shapes[0].points;
    assert_eq!(points.len(), 1 + 33);
    assert_eq!(*points.last().unwrap(), Point::new(2.0, 0.0));
}

// ─── Script output ──────────────────────────────────────────────

#[test]
fn test_script_for_document() {
    let svg = svg_with_paths(0.0, None, &[&wire("M 0 0 L 3.54 0 Z"), &filled("M 0 0 L 3.54 0 L 3.54 3.54")]);
    let script = convert_default(&svg).to_script();

    assert!(script.starts_with("GRID MM;\nSET WIRE_BEND 2;\n"));
    assert_eq!(script.matches("GRID MM;").count(), 1);
    assert!(script.contains(
        "LAYER 21;\nWIRE 0.000\n(0.000000 0.000000)\n(1.000000 0.000000)\n(0.000000 0.000000)\n;\n"
    ));
    assert!(script.contains(
        "LAYER 1;\nPOLYGON 1.000\n(0.000000 0.000000)\n(1.000000 0.000000)\n(1.000000 -1.000000)\n(0.000000 0.000000)\n;\n"
    ));
}

#[test]
fn test_script_collapses_curve_duplicates() {
    let svg = svg_with_paths(0.0, None, &[&wire("M 0 0 C 0 10 10 10 10 0")]);
    let conversion = convert_default(&svg);
    let script = conversion.to_script();
    let point_lines = script.lines().filter(|l| l.starts_with('(')).count();
    // The move point and the curve start coincide; only one is written.
    assert_eq!(point_lines, conversion.shapes[0].points.len() - 1);
}
