//! PSTricks commands for each shape kind
//!
//! A view composes the style fragments of [`Encoder`] with the geometry of its
//! shape and wraps the result in a rotation `\rput` when the shape is rotated.

use super::defaults;
use super::fragments::{join_fragments, Encoder};
use crate::model::{
    AnyShape, Arc, ArcKind, Circle, Dot, Ellipse, Polygon, Polyline, Rectangle, Shape, Text,
};
use crate::types::{fmt_num, Color, Point};

/// Produces the PSTricks code of one shape.
pub trait PstView {
    /// The shape code, or an empty string when the shape cannot be drawn.
    fn pst_code(&self, enc: &mut Encoder<'_>) -> String;
}

/// Wrap `body` in the rotation header of `shape`, if it is rotated.
fn rotated(enc: &Encoder<'_>, shape: &dyn Shape, body: String) -> String {
    match enc.rotation_header_code(shape) {
        Some(header) => format!("{header}{body}}}"),
        None => body,
    }
}

/// Properties plus arrow parameters, for arrowable shapes.
fn properties_with_arrows(enc: &mut Encoder<'_>, shape: &dyn Shape) -> String {
    let properties = enc.properties_code(shape);
    join_fragments([Some(properties), enc.arrows_parameters_code(shape)])
}

impl PstView for Rectangle {
    fn pst_code(&self, enc: &mut Encoder<'_>) -> String {
        let bounds = self.bounds();
        let mut params = enc.properties_code(self);
        if self.frame_arc > 0.0 {
            params.push_str(&format!(", framearc={}", fmt_num(self.frame_arc)));
        }

        let body = format!(
            "\\psframe[{params}]{}{}",
            enc.coord(bounds.bottom_left()),
            enc.coord(bounds.top_right())
        );
        rotated(enc, self, body)
    }
}

impl PstView for Ellipse {
    fn pst_code(&self, enc: &mut Encoder<'_>) -> String {
        let params = enc.properties_code(self);
        let body = format!(
            "\\psellipse[{params}]{}({},{})",
            enc.coord(self.center),
            enc.cm(self.rx),
            enc.cm(self.ry)
        );
        rotated(enc, self, body)
    }
}

impl PstView for Circle {
    fn pst_code(&self, enc: &mut Encoder<'_>) -> String {
        let params = enc.properties_code(self);
        let body = format!(
            "\\pscircle[{params}]{}{{{}}}",
            enc.coord(self.center),
            enc.cm(self.radius)
        );
        rotated(enc, self, body)
    }
}

impl PstView for Polygon {
    fn pst_code(&self, enc: &mut Encoder<'_>) -> String {
        if self.points.len() < 2 {
            return String::new();
        }
        let params = enc.properties_code(self);
        let body = format!("\\pspolygon[{params}]{}", enc.coords(&self.points));
        rotated(enc, self, body)
    }
}

impl PstView for Polyline {
    fn pst_code(&self, enc: &mut Encoder<'_>) -> String {
        if self.points.len() < 2 {
            return String::new();
        }
        let params = properties_with_arrows(enc, self);
        let arrows = enc.arrows_style_code(self).unwrap_or_default();
        let body = format!("\\psline[{params}]{arrows}{}", enc.coords(&self.points));
        rotated(enc, self, body)
    }
}

impl PstView for Arc {
    fn pst_code(&self, enc: &mut Encoder<'_>) -> String {
        let start = fmt_num(self.start_angle.to_degrees());
        let end = fmt_num(self.end_angle.to_degrees());
        let center = enc.coord(self.center);
        let radius = enc.cm(self.radius);

        let body = match self.kind {
            ArcKind::Arc => {
                let params = properties_with_arrows(enc, self);
                let arrows = enc.arrows_style_code(self).unwrap_or_default();
                format!("\\psarc[{params}]{arrows}{center}{{{radius}}}{{{start}}}{{{end}}}")
            }
            ArcKind::Wedge => {
                let params = enc.properties_code(self);
                format!("\\pswedge[{params}]{center}{{{radius}}}{{{start}}}{{{end}}}")
            }
            ArcKind::Chord => {
                let params = enc.properties_code(self);
                format!(
                    "\\pscustom[{params}]{{\\psarc{center}{{{radius}}}{{{start}}}{{{end}}}\\closepath}}"
                )
            }
        };
        rotated(enc, self, body)
    }
}

impl PstView for Dot {
    fn pst_code(&self, enc: &mut Encoder<'_>) -> String {
        let mut params = format!(
            "linecolor={}, dotsize={}, dotstyle={}",
            enc.color_name(self.color),
            enc.cm(self.diameter),
            self.dot_style.pst_token()
        );
        if self.dot_style.is_fillable() && self.fill_color != defaults::INTERIOR_COLOR {
            params.push_str(&format!(", fillcolor={}", enc.color_name(self.fill_color)));
        }

        let body = format!("\\psdots[{params}]{}", enc.coord(self.position));
        rotated(enc, self, body)
    }
}

impl PstView for Text {
    fn pst_code(&self, enc: &mut Encoder<'_>) -> String {
        let text = if self.color == Color::BLACK {
            self.text.clone()
        } else {
            format!("{{\\color{{{}}} {}}}", enc.color_name(self.color), self.text)
        };

        let anchor = match self.anchor.pst_token() {
            "" => String::new(),
            token => format!("[{token}]"),
        };
        let body = format!("\\rput{anchor}{}{{{text}}}", enc.coord(self.position));
        rotated(enc, self, body)
    }
}

impl PstView for AnyShape {
    fn pst_code(&self, enc: &mut Encoder<'_>) -> String {
        match self {
            AnyShape::Rectangle(s) => s.pst_code(enc),
            AnyShape::Ellipse(s) => s.pst_code(enc),
            AnyShape::Circle(s) => s.pst_code(enc),
            AnyShape::Polygon(s) => s.pst_code(enc),
            AnyShape::Polyline(s) => s.pst_code(enc),
            AnyShape::Arc(s) => s.pst_code(enc),
            AnyShape::Dot(s) => s.pst_code(enc),
            AnyShape::Text(s) => s.pst_code(enc),
        }
    }
}

/// Code of every shape in z-order, one shape per line.
pub fn shapes_code<'s>(enc: &mut Encoder<'_>, shapes: impl IntoIterator<Item = &'s AnyShape>) -> String {
    let mut out = String::new();
    for shape in shapes {
        let code = shape.pst_code(enc);
        if !code.is_empty() {
            out.push_str(&code);
            out.push('\n');
        }
    }
    out
}

/// Position of a point in the document, for callers outside an encoder.
pub fn document_point(p: Point, origin: Point, ppc: f64) -> Point {
    Point::new((p.x - origin.x) / ppc, (origin.y - p.y) / ppc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArrowStyle, Arrows, DotStyle, Fill, ShapeStyle, TextAnchor};
    use crate::pst::colors::ColorRegistry;
    use crate::types::{Px, Scaler};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn code_of(shape: impl Into<AnyShape>) -> String {
        let shape = shape.into();
        let mut colors = ColorRegistry::new();
        let mut enc = Encoder::new(&mut colors, Scaler::new(20.0), Point::ZERO);
        shape.pst_code(&mut enc)
    }

    #[test]
    fn rectangle_default() {
        let rect = Rectangle::new(Point::new(0.0, 0.0), Point::new(40.0, 20.0));
        insta::assert_snapshot!(code_of(rect), @r"\psframe[linecolor=black, linewidth=0.1, dimen=middle](0,-1)(2,0)");
    }

    #[test]
    fn rectangle_rounded_and_filled() {
        let style = ShapeStyle { fill: Fill::plain(Color::WHITE), ..ShapeStyle::default() };
        let rect = Rectangle::new(Point::new(0.0, 0.0), Point::new(40.0, 20.0))
            .with_style(style)
            .with_frame_arc(0.5);
        assert_eq!(
            code_of(rect),
            "\\psframe[linecolor=black, linewidth=0.1, dimen=middle, fillstyle=solid, framearc=0.5](0,-1)(2,0)"
        );
    }

    #[test]
    fn rotated_rectangle_is_wrapped() {
        let style = ShapeStyle { rotation: FRAC_PI_2, ..ShapeStyle::default() };
        let rect = Rectangle::new(Point::new(0.0, 0.0), Point::new(40.0, 20.0)).with_style(style);
        let code = code_of(rect);
        assert!(code.starts_with("\\rput{-90}(1.5,0.5){\\psframe["));
        assert!(code.ends_with("(0,-1)(2,0)}"));
    }

    #[test]
    fn ellipse_and_circle() {
        let ellipse = Ellipse::new(Point::new(20.0, 20.0), Px(20.0), Px(10.0));
        assert_eq!(
            code_of(ellipse),
            "\\psellipse[linecolor=black, linewidth=0.1, dimen=middle](1,-1)(1,0.5)"
        );

        let circle = Circle::new(Point::new(20.0, 20.0), Px(10.0));
        assert_eq!(
            code_of(circle),
            "\\pscircle[linecolor=black, linewidth=0.1, dimen=middle](1,-1){0.5}"
        );
    }

    #[test]
    fn polyline_with_arrows() {
        let line = Polyline::new(vec![Point::new(0.0, 0.0), Point::new(40.0, 0.0)])
            .with_arrows(Arrows::new(ArrowStyle::None, ArrowStyle::RightArrow));
        assert_eq!(
            code_of(line),
            "\\psline[linecolor=black, linewidth=0.1, arrowsize=0.06cm 2,arrowlength=1.4,arrowinset=0.4]{->}(0,0)(2,0)"
        );
    }

    #[test]
    fn degenerate_lines_are_skipped() {
        assert_eq!(code_of(Polyline::new(vec![Point::ZERO])), "");
        assert_eq!(code_of(Polygon::new(Vec::new())), "");
    }

    #[test]
    fn polygon_points() {
        let poly = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(20.0, 0.0), Point::new(0.0, 20.0)]);
        assert_eq!(
            code_of(poly),
            "\\pspolygon[linecolor=black, linewidth=0.1](0,0)(1,0)(0,-1)"
        );
    }

    #[test]
    fn arc_kinds() {
        let arc = Arc::new(Point::new(20.0, 20.0), Px(20.0), 0.0, PI);
        assert_eq!(
            code_of(arc.clone()),
            "\\psarc[linecolor=black, linewidth=0.1](1,-1){1}{0}{180}"
        );
        assert_eq!(
            code_of(arc.clone().with_kind(ArcKind::Wedge)),
            "\\pswedge[linecolor=black, linewidth=0.1](1,-1){1}{0}{180}"
        );
        assert_eq!(
            code_of(arc.with_kind(ArcKind::Chord)),
            "\\pscustom[linecolor=black, linewidth=0.1]{\\psarc(1,-1){1}{0}{180}\\closepath}"
        );
    }

    #[test]
    fn dot_code() {
        let dot = Dot::new(Point::new(20.0, 20.0), Px(4.0))
            .with_dot_style(DotStyle::OSquare)
            .with_fill_color(Color::YELLOW);
        assert_eq!(
            code_of(dot),
            "\\psdots[linecolor=black, dotsize=0.2, dotstyle=square, fillcolor=yellow](1,-1)"
        );
    }

    #[test]
    fn text_code() {
        assert_eq!(code_of(Text::new(Point::new(20.0, 0.0), "hello")), "\\rput(1,0){hello}");

        let text = Text::new(Point::new(20.0, 0.0), "hi")
            .with_color(Color::RED)
            .with_anchor(TextAnchor::Left);
        assert_eq!(code_of(text), "\\rput[l](1,0){{\\color{red} hi}}");
    }

    #[test]
    fn shapes_code_skips_empty() {
        let shapes: Vec<AnyShape> = vec![
            Polyline::new(Vec::new()).into(),
            Text::new(Point::ZERO, "a").into(),
        ];
        let mut colors = ColorRegistry::new();
        let mut enc = Encoder::new(&mut colors, Scaler::new(20.0), Point::ZERO);
        assert_eq!(shapes_code(&mut enc, &shapes), "\\rput(0,0){a}\n");
    }

    #[test]
    fn document_point_flips_y() {
        let p = document_point(Point::new(40.0, 20.0), Point::ZERO, 20.0);
        assert_eq!(p, Point::new(2.0, -1.0));
    }
}
