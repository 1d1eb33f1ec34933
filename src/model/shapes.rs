//! Concrete shape types
//!
//! Each shape owns its geometry plus a [`ShapeStyle`], and declares through
//! the [`Shape`] accessors which parts of that style it supports.

use super::style::{Arrows, BorderPosition, DoubleBorder, Fill, LineStyle, Shadow, ShapeStyle};
use super::Shape;
use crate::types::{BBox, Color, Point, Px};

// ============================================================================
// Closed shapes
// ============================================================================

/// An axis-aligned rectangle, optionally with rounded corners.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    pub top_left: Point,
    pub bottom_right: Point,
    /// Corner roundness in `[0, 1]`; zero draws square corners
    pub frame_arc: f64,
    pub style: ShapeStyle,
}

impl Rectangle {
    pub fn new(top_left: Point, bottom_right: Point) -> Self {
        Self { top_left, bottom_right, frame_arc: 0.0, style: ShapeStyle::default() }
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_frame_arc(mut self, frame_arc: f64) -> Self {
        self.frame_arc = frame_arc.clamp(0.0, 1.0);
        self
    }
}

impl Shape for Rectangle {
    fn bounds(&self) -> BBox {
        BBox::from_corners(self.top_left, self.bottom_right)
    }

    fn rotation_angle(&self) -> f64 {
        self.style.rotation
    }

    fn line_style(&self) -> Option<&LineStyle> {
        Some(&self.style.line)
    }

    fn fill(&self) -> Option<&Fill> {
        Some(&self.style.fill)
    }

    fn shadow(&self) -> Option<&Shadow> {
        Some(&self.style.shadow)
    }

    fn shadow_fills_shape(&self) -> bool {
        true
    }

    fn double_border(&self) -> Option<&DoubleBorder> {
        Some(&self.style.double_border)
    }

    fn border_position(&self) -> Option<BorderPosition> {
        Some(self.style.border_position)
    }
}

/// An axis-aligned ellipse given by its centre and radii.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    pub center: Point,
    pub rx: Px,
    pub ry: Px,
    pub style: ShapeStyle,
}

impl Ellipse {
    pub fn new(center: Point, rx: Px, ry: Px) -> Self {
        Self { center, rx, ry, style: ShapeStyle::default() }
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }
}

impl Shape for Ellipse {
    fn bounds(&self) -> BBox {
        let half = Point::new(self.rx.raw(), self.ry.raw());
        BBox::from_corners(self.center - half, self.center + half)
    }

    fn gravity_centre(&self) -> Point {
        self.center
    }

    fn rotation_angle(&self) -> f64 {
        self.style.rotation
    }

    fn line_style(&self) -> Option<&LineStyle> {
        Some(&self.style.line)
    }

    fn fill(&self) -> Option<&Fill> {
        Some(&self.style.fill)
    }

    fn shadow(&self) -> Option<&Shadow> {
        Some(&self.style.shadow)
    }

    fn shadow_fills_shape(&self) -> bool {
        true
    }

    fn double_border(&self) -> Option<&DoubleBorder> {
        Some(&self.style.double_border)
    }

    fn border_position(&self) -> Option<BorderPosition> {
        Some(self.style.border_position)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: Px,
    pub style: ShapeStyle,
}

impl Circle {
    pub fn new(center: Point, radius: Px) -> Self {
        Self { center, radius, style: ShapeStyle::default() }
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }
}

impl Shape for Circle {
    fn bounds(&self) -> BBox {
        let half = Point::splat(self.radius.raw());
        BBox::from_corners(self.center - half, self.center + half)
    }

    fn gravity_centre(&self) -> Point {
        self.center
    }

    fn rotation_angle(&self) -> f64 {
        self.style.rotation
    }

    fn line_style(&self) -> Option<&LineStyle> {
        Some(&self.style.line)
    }

    fn fill(&self) -> Option<&Fill> {
        Some(&self.style.fill)
    }

    fn shadow(&self) -> Option<&Shadow> {
        Some(&self.style.shadow)
    }

    fn shadow_fills_shape(&self) -> bool {
        true
    }

    fn double_border(&self) -> Option<&DoubleBorder> {
        Some(&self.style.double_border)
    }

    fn border_position(&self) -> Option<BorderPosition> {
        Some(self.style.border_position)
    }
}

/// A closed polygon through its vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub points: Vec<Point>,
    pub style: ShapeStyle,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points, style: ShapeStyle::default() }
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }
}

impl Shape for Polygon {
    fn bounds(&self) -> BBox {
        points_bounds(&self.points)
    }

    fn rotation_angle(&self) -> f64 {
        self.style.rotation
    }

    fn line_style(&self) -> Option<&LineStyle> {
        Some(&self.style.line)
    }

    fn fill(&self) -> Option<&Fill> {
        Some(&self.style.fill)
    }

    fn shadow(&self) -> Option<&Shadow> {
        Some(&self.style.shadow)
    }

    fn shadow_fills_shape(&self) -> bool {
        true
    }

    fn double_border(&self) -> Option<&DoubleBorder> {
        Some(&self.style.double_border)
    }

    fn shows_points(&self) -> bool {
        self.style.show_points
    }
}

// ============================================================================
// Open shapes
// ============================================================================

/// An open line through its vertices, with optional arrow ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub style: ShapeStyle,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points, style: ShapeStyle::default() }
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_arrows(mut self, arrows: Arrows) -> Self {
        self.style.arrows = arrows;
        self
    }
}

impl Shape for Polyline {
    fn bounds(&self) -> BBox {
        points_bounds(&self.points)
    }

    fn rotation_angle(&self) -> f64 {
        self.style.rotation
    }

    fn line_style(&self) -> Option<&LineStyle> {
        Some(&self.style.line)
    }

    fn fill(&self) -> Option<&Fill> {
        Some(&self.style.fill)
    }

    fn shadow(&self) -> Option<&Shadow> {
        Some(&self.style.shadow)
    }

    fn double_border(&self) -> Option<&DoubleBorder> {
        Some(&self.style.double_border)
    }

    fn arrows(&self) -> Option<&Arrows> {
        Some(&self.style.arrows)
    }

    fn shows_points(&self) -> bool {
        self.style.show_points
    }
}

/// The three ways an arc of a circle can be closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArcKind {
    /// Open arc
    #[default]
    Arc,
    /// Closed through the centre
    Wedge,
    /// Closed by the chord between the two ends
    Chord,
}

/// An arc of a circle, angles in radians counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub center: Point,
    pub radius: Px,
    pub start_angle: f64,
    pub end_angle: f64,
    pub kind: ArcKind,
    pub style: ShapeStyle,
}

impl Arc {
    pub fn new(center: Point, radius: Px, start_angle: f64, end_angle: f64) -> Self {
        Self {
            center,
            radius,
            start_angle,
            end_angle,
            kind: ArcKind::Arc,
            style: ShapeStyle::default(),
        }
    }

    pub fn with_kind(mut self, kind: ArcKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }
}

impl Shape for Arc {
    fn bounds(&self) -> BBox {
        let half = Point::splat(self.radius.raw());
        BBox::from_corners(self.center - half, self.center + half)
    }

    fn gravity_centre(&self) -> Point {
        self.center
    }

    fn rotation_angle(&self) -> f64 {
        self.style.rotation
    }

    fn line_style(&self) -> Option<&LineStyle> {
        Some(&self.style.line)
    }

    fn fill(&self) -> Option<&Fill> {
        Some(&self.style.fill)
    }

    fn shadow(&self) -> Option<&Shadow> {
        Some(&self.style.shadow)
    }

    fn shadow_fills_shape(&self) -> bool {
        self.kind != ArcKind::Arc
    }

    fn double_border(&self) -> Option<&DoubleBorder> {
        Some(&self.style.double_border)
    }

    fn arrows(&self) -> Option<&Arrows> {
        match self.kind {
            ArcKind::Arc => Some(&self.style.arrows),
            ArcKind::Wedge | ArcKind::Chord => None,
        }
    }

    fn shows_points(&self) -> bool {
        self.style.show_points
    }
}

// ============================================================================
// Dots and text
// ============================================================================

/// PSTricks dot symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DotStyle {
    #[default]
    Dot,
    ODot,
    Asterisk,
    Bar,
    Diamond,
    ODiamond,
    Plus,
    Square,
    OSquare,
    Triangle,
    OTriangle,
    Pentagon,
    OPentagon,
    X,
}

impl DotStyle {
    pub fn pst_token(self) -> &'static str {
        match self {
            DotStyle::Dot => "*",
            DotStyle::ODot => "o",
            DotStyle::Asterisk => "asterisk",
            DotStyle::Bar => "|",
            DotStyle::Diamond => "diamond*",
            DotStyle::ODiamond => "diamond",
            DotStyle::Plus => "+",
            DotStyle::Square => "square*",
            DotStyle::OSquare => "square",
            DotStyle::Triangle => "triangle*",
            DotStyle::OTriangle => "triangle",
            DotStyle::Pentagon => "pentagon*",
            DotStyle::OPentagon => "pentagon",
            DotStyle::X => "x",
        }
    }

    /// Hollow symbols have an interior that takes a fill colour.
    pub fn is_fillable(self) -> bool {
        matches!(
            self,
            DotStyle::ODot
                | DotStyle::ODiamond
                | DotStyle::OSquare
                | DotStyle::OTriangle
                | DotStyle::OPentagon
        )
    }
}

/// A single dot symbol. Its size is fixed by the diameter, so it carries no
/// line thickness.
#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    pub position: Point,
    pub diameter: Px,
    pub dot_style: DotStyle,
    pub color: Color,
    /// Interior of hollow symbols
    pub fill_color: Color,
    pub rotation: f64,
}

impl Dot {
    pub fn new(position: Point, diameter: Px) -> Self {
        Self {
            position,
            diameter,
            dot_style: DotStyle::Dot,
            color: Color::BLACK,
            fill_color: Color::WHITE,
            rotation: 0.0,
        }
    }

    pub fn with_dot_style(mut self, dot_style: DotStyle) -> Self {
        self.dot_style = dot_style;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_fill_color(mut self, fill_color: Color) -> Self {
        self.fill_color = fill_color;
        self
    }
}

impl Shape for Dot {
    fn bounds(&self) -> BBox {
        let half = Point::splat(self.diameter.raw() / 2.0);
        BBox::from_corners(self.position - half, self.position + half)
    }

    fn gravity_centre(&self) -> Point {
        self.position
    }

    fn rotation_angle(&self) -> f64 {
        self.rotation
    }

    fn is_thickness_stylable(&self) -> bool {
        false
    }
}

/// Where a text is anchored relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Center,
    Left,
    Right,
    Top,
    Bottom,
}

impl TextAnchor {
    /// The `\rput` reference point token; empty for the centre.
    pub fn pst_token(self) -> &'static str {
        match self {
            TextAnchor::Center => "",
            TextAnchor::Left => "l",
            TextAnchor::Right => "r",
            TextAnchor::Top => "t",
            TextAnchor::Bottom => "b",
        }
    }
}

/// A LaTeX text placed at a point. The text is written verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub position: Point,
    pub text: String,
    pub color: Color,
    pub anchor: TextAnchor,
    pub rotation: f64,
}

impl Text {
    pub fn new(position: Point, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
            color: Color::BLACK,
            anchor: TextAnchor::Center,
            rotation: 0.0,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }
}

impl Shape for Text {
    fn bounds(&self) -> BBox {
        BBox::from_corners(self.position, self.position)
    }

    fn gravity_centre(&self) -> Point {
        self.position
    }

    fn rotation_angle(&self) -> f64 {
        self.rotation
    }
}

fn points_bounds(points: &[Point]) -> BBox {
    let mut bbox = BBox::new();
    for p in points {
        bbox.expand_point(*p);
    }
    bbox
}
