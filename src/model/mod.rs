//! Read-only drawing model consumed by the PSTricks generator.
//!
//! Shapes declare their capabilities through optional accessors on [`Shape`];
//! the generator asks for a capability and never matches on the concrete type.

mod shapes;
pub mod style;

use enum_dispatch::enum_dispatch;

pub use shapes::{Arc, ArcKind, Circle, Dot, DotStyle, Ellipse, Polygon, Polyline, Rectangle, Text, TextAnchor};
pub use style::{
    Arrow, ArrowKind, ArrowStyle, Arrows, BorderPosition, DoubleBorder, Fill, FillingStyle, Gradient,
    Hatching, LineKind, LineStyle, Shadow, ShapeStyle,
};

use crate::types::{BBox, NumericError, Point, Scaler};

/// Pixels per centimetre of a freshly created drawing.
pub const DEFAULT_PPC: f64 = 50.0;

/// Common behavior for all shapes
#[enum_dispatch]
pub trait Shape {
    /// Axis-aligned bounds of the unrotated shape
    fn bounds(&self) -> BBox;

    /// Rotation centre
    fn gravity_centre(&self) -> Point {
        self.bounds().center()
    }

    /// Rotation angle in radians
    fn rotation_angle(&self) -> f64 {
        0.0
    }

    fn line_style(&self) -> Option<&LineStyle> {
        None
    }

    /// Whether the line thickness is a user setting
    fn is_thickness_stylable(&self) -> bool {
        true
    }

    fn fill(&self) -> Option<&Fill> {
        None
    }

    fn shadow(&self) -> Option<&Shadow> {
        None
    }

    /// Whether the shadow paints the area under the shape
    fn shadow_fills_shape(&self) -> bool {
        false
    }

    fn double_border(&self) -> Option<&DoubleBorder> {
        None
    }

    /// `Some` only for shapes whose border can move around the outline
    fn border_position(&self) -> Option<BorderPosition> {
        None
    }

    fn arrows(&self) -> Option<&Arrows> {
        None
    }

    fn shows_points(&self) -> bool {
        false
    }
}

/// Any shape of a drawing
#[enum_dispatch(Shape)]
#[derive(Debug, Clone, PartialEq)]
pub enum AnyShape {
    Rectangle,
    Ellipse,
    Circle,
    Polygon,
    Polyline,
    Arc,
    Dot,
    Text,
}

/// A z-ordered list of shapes plus the pixel space it lives in.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    shapes: Vec<AnyShape>,
    ppc: f64,
    origin: Point,
}

impl Default for Drawing {
    fn default() -> Self {
        Self::new(DEFAULT_PPC)
    }
}

impl Drawing {
    pub fn new(ppc: f64) -> Self {
        Self { shapes: Vec::new(), ppc, origin: Point::ZERO }
    }

    /// Pixel position of the document origin.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    pub fn push(&mut self, shape: impl Into<AnyShape>) {
        self.shapes.push(shape.into());
    }

    pub fn with_shape(mut self, shape: impl Into<AnyShape>) -> Self {
        self.push(shape);
        self
    }

    /// Shapes in z-order, back to front.
    pub fn shapes(&self) -> &[AnyShape] {
        &self.shapes
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn ppc(&self) -> f64 {
        self.ppc
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn scaler(&self) -> Result<Scaler, NumericError> {
        Scaler::try_new(self.ppc)
    }

    /// Union of the shape bounds; a drawing without shapes is the origin point.
    pub fn bounds(&self) -> BBox {
        let mut bbox = BBox::new();
        for shape in &self.shapes {
            bbox.expand_box(&shape.bounds());
        }
        if bbox.is_empty() {
            BBox::from_corners(self.origin, self.origin)
        } else {
            bbox
        }
    }

    pub fn top_right(&self) -> Point {
        self.bounds().top_right()
    }

    pub fn bottom_left(&self) -> Point {
        self.bounds().bottom_left()
    }
}
