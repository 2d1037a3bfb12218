//! # Shape Model
//!
//! The records threaded between the pipeline stages. The document scan
//! produces [`RawShape`]s and a single [`DocumentOffsets`]; the path
//! interpreter turns each raw shape into an [`EagleShape`] that the script
//! writer serializes.
//!
//! Source coordinates are SVG user units (px, origin top-left). Output
//! coordinates are millimetres with the Y axis flipped so the drawing sits
//! above the EAGLE origin.

use serde::{Deserialize, Serialize};

/// Source pixels per output millimetre.
pub const PX_PER_MM: f64 = 3.54;

/// Layer used when a shape's stroke does not encode one (EAGLE "Dimension").
pub const DEFAULT_LAYER: u32 = 20;

/// Lower bound on the number of segments a curve is flattened into.
pub const MIN_CURVE_SEGMENTS: usize = 16;

/// A 2-D point. Units depend on the stage: px before interpretation,
/// millimetres after.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Mirror `handle` across `self`.
    pub fn reflect(self, handle: Point) -> Point {
        Point::new(2.0 * self.x - handle.x, 2.0 * self.y - handle.y)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Whether the source path is filled. Decides the EAGLE entity type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillMode {
    Filled,
    #[default]
    Unfilled,
}

/// One `<path>` as plucked from the SVG document, before interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawShape {
    /// Translation from the path's own `transform`, in px.
    #[serde(default)]
    pub local_offset: Point,
    #[serde(default)]
    pub fill_mode: FillMode,
    /// Target drafting layer. 0 means "not specified".
    #[serde(default = "default_layer")]
    pub stroke_layer: u32,
    /// Line thickness in millimetres.
    #[serde(default)]
    pub stroke_weight: f64,
    /// Command letters and numeric parameter strings, in order.
    pub tokens: Vec<String>,
}

fn default_layer() -> u32 {
    DEFAULT_LAYER
}

impl RawShape {
    /// An unfilled shape on the default layer with the given path tokens.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            local_offset: Point::default(),
            fill_mode: FillMode::Unfilled,
            stroke_layer: DEFAULT_LAYER,
            stroke_weight: 0.0,
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// The stroke layer with the "unset" value 0 replaced by `fallback`.
    pub fn layer_or(&self, fallback: u32) -> u32 {
        if self.stroke_layer == 0 {
            fallback
        } else {
            self.stroke_layer
        }
    }
}

/// Document-wide translation shared by every shape.
///
/// SVG puts the origin at the top-left; EAGLE draws upward from the
/// bottom-left. Negating Y and shifting by the document height (carried here
/// as `vertical_flip = -height`) lines the two up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOffsets {
    /// `<g transform="translate(x,y)">`, px.
    #[serde(default)]
    pub group: Point,
    /// Negative document height, px.
    #[serde(default)]
    pub vertical_flip: f64,
}

impl DocumentOffsets {
    /// Total px translation applied to absolute coordinates of `shape`.
    pub fn for_shape(&self, shape: &RawShape) -> Point {
        Point::new(
            shape.local_offset.x + self.group.x,
            shape.local_offset.y + self.group.y + self.vertical_flip,
        )
    }
}

/// EAGLE entity type for a converted shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Polygon,
    Wire,
}

impl ShapeKind {
    /// Keyword used by the drafting script.
    pub fn keyword(self) -> &'static str {
        match self {
            ShapeKind::Polygon => "POLYGON",
            ShapeKind::Wire => "WIRE",
        }
    }
}

impl From<FillMode> for ShapeKind {
    fn from(mode: FillMode) -> Self {
        match mode {
            FillMode::Filled => ShapeKind::Polygon,
            FillMode::Unfilled => ShapeKind::Wire,
        }
    }
}

/// A fully converted shape: absolute millimetre points ready for the script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EagleShape {
    pub kind: ShapeKind,
    #[serde(rename = "weightMM")]
    pub weight_mm: f64,
    pub layer: u32,
    pub points: Vec<Point>,
}
