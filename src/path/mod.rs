//! # Path Command Interpreter
//!
//! Turns a shape's tokenized path data into absolute millimetre points.
//!
//! The interpreter is a small state machine. A command letter selects a
//! [`Mode`]; numeric tokens are then consumed in groups of the mode's arity,
//! and the mode stays active for further groups until the next letter
//! (implicit repetition). Each group is handed to [`transition`], a pure
//! function from the current [`PenState`] to the next one plus the points it
//! emits.
//!
//! Two quirks of the path grammar are preserved on purpose:
//!
//! - A relative `m` as the very first token places its pair absolutely, but
//!   the bare pairs after it are *relative* linetos.
//! - `z`/`Z` closes the shape back to its first point and ends it; anything
//!   after it is ignored.
//!
//! Arcs are not rendered: only their endpoint is kept.

mod tokenize;

pub use tokenize::tokenize;

use tracing::debug;

use crate::bezier::{CubicBezier, CurveTooLong, QuadBezier};
use crate::error::PathError;
use crate::model::{
    DocumentOffsets, EagleShape, Point, RawShape, ShapeKind, DEFAULT_LAYER, MIN_CURVE_SEGMENTS,
    PX_PER_MM,
};
use crate::options::ConvertOptions;

/// The active path command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    MoveAbs,
    MoveRel,
    LineAbs,
    LineRel,
    HorizontalAbs,
    HorizontalRel,
    VerticalAbs,
    VerticalRel,
    CubicAbs,
    CubicRel,
    SmoothCubicAbs,
    SmoothCubicRel,
    QuadAbs,
    QuadRel,
    SmoothQuadAbs,
    SmoothQuadRel,
    ArcAbs,
    ArcRel,
}

impl Mode {
    pub fn from_letter(letter: char) -> Option<Mode> {
        let mode = match letter {
            'M' => Mode::MoveAbs,
            'm' => Mode::MoveRel,
            'L' => Mode::LineAbs,
            'l' => Mode::LineRel,
            'H' => Mode::HorizontalAbs,
            'h' => Mode::HorizontalRel,
            'V' => Mode::VerticalAbs,
            'v' => Mode::VerticalRel,
            'C' => Mode::CubicAbs,
            'c' => Mode::CubicRel,
            'S' => Mode::SmoothCubicAbs,
            's' => Mode::SmoothCubicRel,
            'Q' => Mode::QuadAbs,
            'q' => Mode::QuadRel,
            'T' => Mode::SmoothQuadAbs,
            't' => Mode::SmoothQuadRel,
            'A' => Mode::ArcAbs,
            'a' => Mode::ArcRel,
            _ => return None,
        };
        Some(mode)
    }

    pub fn letter(self) -> char {
        match self {
            Mode::MoveAbs => 'M',
            Mode::MoveRel => 'm',
            Mode::LineAbs => 'L',
            Mode::LineRel => 'l',
            Mode::HorizontalAbs => 'H',
            Mode::HorizontalRel => 'h',
            Mode::VerticalAbs => 'V',
            Mode::VerticalRel => 'v',
            Mode::CubicAbs => 'C',
            Mode::CubicRel => 'c',
            Mode::SmoothCubicAbs => 'S',
            Mode::SmoothCubicRel => 's',
            Mode::QuadAbs => 'Q',
            Mode::QuadRel => 'q',
            Mode::SmoothQuadAbs => 'T',
            Mode::SmoothQuadRel => 't',
            Mode::ArcAbs => 'A',
            Mode::ArcRel => 'a',
        }
    }

    /// Numeric parameters consumed per repetition.
    pub fn arity(self) -> usize {
        match self {
            Mode::HorizontalAbs | Mode::HorizontalRel | Mode::VerticalAbs | Mode::VerticalRel => 1,
            Mode::MoveAbs
            | Mode::MoveRel
            | Mode::LineAbs
            | Mode::LineRel
            | Mode::SmoothQuadAbs
            | Mode::SmoothQuadRel => 2,
            Mode::SmoothCubicAbs | Mode::SmoothCubicRel | Mode::QuadAbs | Mode::QuadRel => 4,
            Mode::CubicAbs | Mode::CubicRel => 6,
            Mode::ArcAbs | Mode::ArcRel => 7,
        }
    }

    pub fn is_relative(self) -> bool {
        self.letter().is_ascii_lowercase()
    }

    /// Mode for the bare parameter groups that follow this one.
    pub fn continuation(self) -> Mode {
        match self {
            Mode::MoveAbs => Mode::LineAbs,
            Mode::MoveRel => Mode::LineRel,
            other => other,
        }
    }
}

enum Token<'a> {
    Command(Mode),
    Close,
    Unknown(char),
    Number(&'a str),
}

fn classify(token: &str) -> Token<'_> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some('z' | 'Z'), None) => Token::Close,
        (Some(letter), None) if letter.is_alphabetic() => {
            Mode::from_letter(letter).map_or(Token::Unknown(letter), Token::Command)
        }
        _ => Token::Number(token),
    }
}

fn parse_number(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Maps source coordinates into output millimetres for one shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Shape + group + flip translation, px.
    pub offset: Point,
    pub px_per_mm: f64,
}

impl Frame {
    pub fn new(offset: Point, px_per_mm: f64) -> Self {
        Self { offset, px_per_mm }
    }

    pub fn absolute_x(&self, x: f64) -> f64 {
        (x + self.offset.x) / self.px_per_mm
    }

    /// Y is negated: SVG grows downward, EAGLE upward.
    pub fn absolute_y(&self, y: f64) -> f64 {
        (y + self.offset.y) / -self.px_per_mm
    }

    pub fn relative_x(&self, from: f64, dx: f64) -> f64 {
        from + dx / self.px_per_mm
    }

    pub fn relative_y(&self, from: f64, dy: f64) -> f64 {
        from + dy / -self.px_per_mm
    }

    /// Resolve a coordinate pair, relative to `from` when `relative`.
    pub fn locate(&self, relative: bool, from: Point, x: f64, y: f64) -> Point {
        if relative {
            Point::new(self.relative_x(from.x, x), self.relative_y(from.y, y))
        } else {
            Point::new(self.absolute_x(x), self.absolute_y(y))
        }
    }
}

/// Pen position and the implicit handles for smooth curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenState {
    pub current: Point,
    /// First handle of the next `s`/`S`.
    pub cubic_reflection: Point,
    /// Handle of the next `t`/`T`.
    pub quad_reflection: Point,
}

impl PenState {
    /// Pen at `point` with both reflections collapsed onto it.
    pub fn at(point: Point) -> Self {
        Self {
            current: point,
            cubic_reflection: point,
            quad_reflection: point,
        }
    }
}

/// Result of executing one parameter group.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub pen: PenState,
    pub points: Vec<Point>,
}

/// Execute one parameter group of `mode`.
///
/// `args` must hold exactly `mode.arity()` values. Fails only for curves too
/// long to flatten.
pub fn transition(
    mode: Mode,
    pen: &PenState,
    args: &[f64],
    frame: &Frame,
    min_segments: usize,
) -> Result<Step, CurveTooLong> {
    debug_assert_eq!(args.len(), mode.arity());
    let relative = mode.is_relative();
    let start = pen.current;
    let at = |x: f64, y: f64| frame.locate(relative, start, x, y);

    let step = match mode {
        Mode::MoveAbs | Mode::MoveRel | Mode::LineAbs | Mode::LineRel => {
            straight_to(at(args[0], args[1]))
        }
        Mode::HorizontalAbs => straight_to(Point::new(frame.absolute_x(args[0]), start.y)),
        Mode::HorizontalRel => straight_to(Point::new(frame.relative_x(start.x, args[0]), start.y)),
        Mode::VerticalAbs => straight_to(Point::new(start.x, frame.absolute_y(args[0]))),
        Mode::VerticalRel => straight_to(Point::new(start.x, frame.relative_y(start.y, args[0]))),
        Mode::CubicAbs | Mode::CubicRel => {
            let curve = CubicBezier::new(
                start,
                at(args[0], args[1]),
                at(args[2], args[3]),
                at(args[4], args[5]),
            );
            cubic_step(curve, min_segments)?
        }
        Mode::SmoothCubicAbs | Mode::SmoothCubicRel => {
            let curve = CubicBezier::new(
                start,
                pen.cubic_reflection,
                at(args[0], args[1]),
                at(args[2], args[3]),
            );
            cubic_step(curve, min_segments)?
        }
        Mode::QuadAbs | Mode::QuadRel => {
            let curve = QuadBezier::new(start, at(args[0], args[1]), at(args[2], args[3]));
            quad_step(curve, min_segments)?
        }
        Mode::SmoothQuadAbs | Mode::SmoothQuadRel => {
            let curve = QuadBezier::new(start, pen.quad_reflection, at(args[0], args[1]));
            quad_step(curve, min_segments)?
        }
        // rx, ry, rotation and both flags are read but not drawn.
        Mode::ArcAbs | Mode::ArcRel => straight_to(at(args[5], args[6])),
    };
    Ok(step)
}

fn straight_to(target: Point) -> Step {
    Step {
        pen: PenState::at(target),
        points: vec![target],
    }
}

fn cubic_step(curve: CubicBezier, min_segments: usize) -> Result<Step, CurveTooLong> {
    Ok(Step {
        pen: PenState {
            current: curve.end,
            cubic_reflection: curve.end.reflect(curve.handle2),
            quad_reflection: curve.end,
        },
        points: curve.points(min_segments)?.collect(),
    })
}

fn quad_step(curve: QuadBezier, min_segments: usize) -> Result<Step, CurveTooLong> {
    Ok(Step {
        pen: PenState {
            current: curve.end,
            cubic_reflection: curve.end,
            quad_reflection: curve.end.reflect(curve.handle),
        },
        points: curve.points(min_segments)?.collect(),
    })
}

/// Converts [`RawShape`]s into [`EagleShape`]s for one document.
#[derive(Debug, Clone)]
pub struct Interpreter {
    offsets: DocumentOffsets,
    px_per_mm: f64,
    min_segments: usize,
    default_layer: u32,
}

impl Interpreter {
    pub fn new(offsets: DocumentOffsets) -> Self {
        Self {
            offsets,
            px_per_mm: PX_PER_MM,
            min_segments: MIN_CURVE_SEGMENTS,
            default_layer: DEFAULT_LAYER,
        }
    }

    pub fn with_options(offsets: DocumentOffsets, options: &ConvertOptions) -> Self {
        Self {
            offsets,
            px_per_mm: options.px_per_mm,
            min_segments: options.min_curve_segments,
            default_layer: options.default_layer,
        }
    }

    pub fn frame(&self, shape: &RawShape) -> Frame {
        Frame::new(self.offsets.for_shape(shape), self.px_per_mm)
    }

    /// Interpret one shape. On error nothing of the shape is kept.
    pub fn interpret(&self, shape: &RawShape) -> Result<EagleShape, PathError> {
        let points = self.trace(shape)?;
        if shape.stroke_layer == 0 {
            debug!(layer = self.default_layer, "shape has no layer, using default");
        }
        Ok(EagleShape {
            kind: ShapeKind::from(shape.fill_mode),
            weight_mm: shape.stroke_weight,
            layer: shape.layer_or(self.default_layer),
            points,
        })
    }

    /// Run the state machine over the shape's tokens.
    fn trace(&self, shape: &RawShape) -> Result<Vec<Point>, PathError> {
        let frame = self.frame(shape);
        let tokens = &shape.tokens;

        let mut pen = PenState::at(Point::new(frame.absolute_x(0.0), frame.absolute_y(0.0)));
        let mut mode: Option<Mode> = None;
        let mut leading_relative_move = false;
        let mut points: Vec<Point> = Vec::new();
        let mut args: Vec<f64> = Vec::with_capacity(7);
        let mut position = 0;

        while position < tokens.len() {
            match classify(&tokens[position]) {
                Token::Close => {
                    if let Some(&first) = points.first() {
                        points.push(first);
                    }
                    break;
                }
                Token::Command(next) => {
                    leading_relative_move = position == 0 && next == Mode::MoveRel;
                    mode = Some(if leading_relative_move {
                        Mode::MoveAbs
                    } else {
                        next
                    });
                    position += 1;
                }
                Token::Unknown(letter) => {
                    return Err(PathError::UnknownCommandLetter { position, letter });
                }
                Token::Number(token) => {
                    let active = mode.ok_or_else(|| PathError::MissingCommand {
                        position,
                        token: token.to_string(),
                    })?;
                    collect_args(tokens, position, active, &mut args)?;

                    let step = transition(active, &pen, &args, &frame, self.min_segments)
                        .map_err(|err| PathError::CurveTooLong {
                            position,
                            command: active.letter(),
                            length: err.length,
                        })?;
                    pen = step.pen;
                    points.extend(step.points);
                    position += active.arity();

                    mode = Some(if leading_relative_move {
                        leading_relative_move = false;
                        Mode::LineRel
                    } else {
                        active.continuation()
                    });
                }
            }
        }

        Ok(points)
    }
}

/// Parse the `mode.arity()` numeric tokens starting at `start` into `args`.
fn collect_args(
    tokens: &[String],
    start: usize,
    mode: Mode,
    args: &mut Vec<f64>,
) -> Result<(), PathError> {
    args.clear();
    let expected = mode.arity();
    for found in 0..expected {
        let position = start + found;
        let truncated = PathError::TruncatedCommand {
            position: start,
            command: mode.letter(),
            expected,
            found,
        };
        let Some(token) = tokens.get(position) else {
            return Err(truncated);
        };
        match classify(token) {
            Token::Number(text) => {
                let value = parse_number(text).ok_or_else(|| PathError::MalformedNumericToken {
                    position,
                    token: text.to_string(),
                })?;
                args.push(value);
            }
            Token::Unknown(letter) => {
                return Err(PathError::UnknownCommandLetter { position, letter });
            }
            Token::Command(_) | Token::Close => return Err(truncated),
        }
    }
    Ok(())
}

/// Interpret one shape with the default conversion constants.
pub fn interpret(shape: &RawShape, offsets: &DocumentOffsets) -> Result<EagleShape, PathError> {
    Interpreter::new(*offsets).interpret(shape)
}
