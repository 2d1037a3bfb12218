//! # Curve Approximator
//!
//! EAGLE has no Bezier primitive, so every curve is flattened into a
//! polyline. The number of segments follows a cheap arclength estimate (one
//! segment per output unit of length) with a floor of
//! [`MIN_CURVE_SEGMENTS`](crate::model::MIN_CURVE_SEGMENTS) so even tiny
//! curves stay smooth.
//!
//! ## Length estimates
//!
//! - Cubic: the average of the chord and the control polygon. The chord
//!   under-estimates, the polygon over-estimates; the blend is close enough
//!   for choosing a segment count.
//! - Quadratic: the closed-form integral of the speed of the quadratic
//!   parametrization. Nearly straight curves make that formula divide by
//!   (almost) zero, in which case the cubic-style blend is used instead.

use crate::model::Point;

/// Below this, the quadratic's second-derivative term is treated as zero.
const DEGENERATE_EPSILON: f64 = 1e-9;

/// Most segments a single curve may be flattened into.
pub const MAX_CURVE_SEGMENTS: usize = 1_000_000;

/// A curve whose estimated length needs more than [`MAX_CURVE_SEGMENTS`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveTooLong {
    /// Estimated length in output units; may be infinite or NaN.
    pub length: f64,
}

/// Number of polyline segments for a curve of estimated `length`.
///
/// Never fewer than `min_segments`; otherwise one per unit of length.
pub fn segment_count(length: f64, min_segments: usize) -> Result<usize, CurveTooLong> {
    // NaN fails this comparison as well.
    if !(length <= MAX_CURVE_SEGMENTS as f64) {
        return Err(CurveTooLong { length });
    }
    let estimate = if length > 0.0 { length.ceil() as usize } else { 0 };
    let n = estimate.max(min_segments).max(1);
    if n > MAX_CURVE_SEGMENTS {
        return Err(CurveTooLong { length });
    }
    Ok(n)
}

/// Average of the chord and the control-polygon length.
fn blended_length(chord: f64, polygon: f64) -> f64 {
    0.5 * chord + 0.5 * polygon
}

/// A cubic Bezier segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub start: Point,
    pub handle1: Point,
    pub handle2: Point,
    pub end: Point,
}

impl CubicBezier {
    pub const fn new(start: Point, handle1: Point, handle2: Point, end: Point) -> Self {
        Self {
            start,
            handle1,
            handle2,
            end,
        }
    }

    pub fn arclength(&self) -> f64 {
        let chord = self.start.distance(self.end);
        let polygon = self.start.distance(self.handle1)
            + self.handle1.distance(self.handle2)
            + self.handle2.distance(self.end);
        blended_length(chord, polygon)
    }

    /// Evaluate at `t` in [0, 1] (Bernstein form).
    pub fn eval(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let a = u * u * u;
        let b = 3.0 * u * u * t;
        let c = 3.0 * u * t * t;
        let d = t * t * t;
        Point::new(
            a * self.start.x + b * self.handle1.x + c * self.handle2.x + d * self.end.x,
            a * self.start.y + b * self.handle1.y + c * self.handle2.y + d * self.end.y,
        )
    }

    /// The flattened curve: `start`, then `n` samples ending at `end`.
    pub fn points(
        &self,
        min_segments: usize,
    ) -> Result<impl Iterator<Item = Point>, CurveTooLong> {
        let curve = *self;
        let n = segment_count(curve.arclength(), min_segments)?;
        Ok(std::iter::once(curve.start).chain((1..=n).map(move |k| {
            if k == n {
                curve.end
            } else {
                curve.eval(k as f64 / n as f64)
            }
        })))
    }
}

/// A quadratic Bezier segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadBezier {
    pub start: Point,
    pub handle: Point,
    pub end: Point,
}

impl QuadBezier {
    pub const fn new(start: Point, handle: Point, end: Point) -> Self {
        Self { start, handle, end }
    }

    /// Closed-form arclength, or the chord/polygon blend for degenerate curves.
    pub fn arclength(&self) -> f64 {
        self.exact_arclength().unwrap_or_else(|| {
            blended_length(
                self.start.distance(self.end),
                self.start.distance(self.handle) + self.handle.distance(self.end),
            )
        })
    }

    /// `None` when the integral is numerically unusable (straight or
    /// collapsed control points).
    fn exact_arclength(&self) -> Option<f64> {
        let (s, h, e) = (self.start, self.handle, self.end);
        let ax = s.x - 2.0 * h.x + e.x;
        let ay = s.y - 2.0 * h.y + e.y;
        let bx = 2.0 * (h.x - s.x);
        let by = 2.0 * (h.y - s.y);

        let a = 4.0 * (ax * ax + ay * ay);
        let b = 4.0 * (ax * bx + ay * by);
        let c = bx * bx + by * by;

        let a2 = a.sqrt();
        if a2 < DEGENERATE_EPSILON {
            return None;
        }
        let sabc = 2.0 * (a + b + c).max(0.0).sqrt();
        let a32 = 2.0 * a * a2;
        let c2 = 2.0 * c.sqrt();
        let ba = b / a2;

        let denominator = ba + c2;
        let ratio = (2.0 * a2 + ba + sabc) / denominator;
        if denominator.abs() < DEGENERATE_EPSILON || !(ratio.is_finite() && ratio > 0.0) {
            return None;
        }

        let length =
            (a32 * sabc + a2 * b * (sabc - c2) + (4.0 * c * a - b * b) * ratio.ln()) / (4.0 * a32);
        (length.is_finite() && length >= 0.0).then_some(length)
    }

    /// Evaluate at `t` in [0, 1] (Bernstein form).
    pub fn eval(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let a = u * u;
        let b = 2.0 * u * t;
        let c = t * t;
        Point::new(
            a * self.start.x + b * self.handle.x + c * self.end.x,
            a * self.start.y + b * self.handle.y + c * self.end.y,
        )
    }

    /// The flattened curve: `start`, then `n` samples ending at `end`.
    pub fn points(
        &self,
        min_segments: usize,
    ) -> Result<impl Iterator<Item = Point>, CurveTooLong> {
        let curve = *self;
        let n = segment_count(curve.arclength(), min_segments)?;
        Ok(std::iter::once(curve.start).chain((1..=n).map(move |k| {
            if k == n {
                curve.end
            } else {
                curve.eval(k as f64 / n as f64)
            }
        })))
    }
}
