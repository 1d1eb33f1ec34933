//! Style fragments of a PSTricks parameter list
//!
//! Each fragment covers one style aspect of a shape and is `None` when the
//! aspect does not apply (capability missing or value left at its PSTricks
//! default). Fragments naming a colour go through the [`ColorRegistry`] so the
//! colour is defined in the picture preamble.

use super::colors::ColorRegistry;
use super::defaults;
use crate::model::{Arrow, ArrowStyle, BorderPosition, Fill, FillingStyle, LineKind, Shape};
use crate::types::{cut_number, equals_double, fmt_num, rotation_degrees, Color, Point, Px, Scaler};

/// Separator between fragments inside `[...]`.
pub const FRAGMENT_SEPARATOR: &str = ", ";

/// Encodes shape styles for one generation pass.
pub struct Encoder<'a> {
    colors: &'a mut ColorRegistry,
    scaler: Scaler,
    origin: Point,
}

impl<'a> Encoder<'a> {
    pub fn new(colors: &'a mut ColorRegistry, scaler: Scaler, origin: Point) -> Self {
        Self { colors, scaler, origin }
    }

    pub fn ppc(&self) -> f64 {
        self.scaler.ppc
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Document name of a colour, marking it used.
    pub fn color_name(&mut self, color: Color) -> String {
        self.colors.resolve_name(color)
    }

    // ========================================================================
    // Coordinates
    // ========================================================================

    /// Pixel length to a bare centimetre number.
    pub fn cm(&self, l: Px) -> String {
        self.scaler.cm(l).to_string()
    }

    /// Document position of a pixel point, as `(x,y)`.
    pub fn coord(&self, p: Point) -> String {
        let x = self.scaler.cm_raw(p.x - self.origin.x);
        let y = self.scaler.cm_raw(self.origin.y - p.y);
        format!("({},{})", fmt_num(x), fmt_num(y))
    }

    pub fn coords(&self, points: &[Point]) -> String {
        points.iter().map(|p| self.coord(*p)).collect()
    }

    // ========================================================================
    // Line
    // ========================================================================

    pub fn line_code(&mut self, shape: &dyn Shape) -> Option<String> {
        let line = shape.line_style()?;
        let mut code = format!("linecolor={}", self.color_name(line.color));

        if shape.is_thickness_stylable() {
            code.push_str(&format!(", linewidth={}", self.cm(line.thickness)));
        }

        if line.color.opacity() < 1.0 {
            code.push_str(&format!(", strokeopacity={}", fmt_num(line.color.opacity())));
        }

        match line.kind {
            LineKind::Solid => {}
            LineKind::Dotted => {
                code.push_str(&format!(", linestyle=dotted, dotsep={}cm", self.cm(line.dot_sep)));
            }
            LineKind::Dashed => {
                code.push_str(&format!(
                    ", linestyle=dashed, dash={}cm {}cm",
                    self.cm(line.dash_black),
                    self.cm(line.dash_white)
                ));
            }
        }

        Some(code)
    }

    // ========================================================================
    // Filling
    // ========================================================================

    pub fn filling_code(&mut self, shape: &dyn Shape) -> Option<String> {
        let fill = shape.fill()?;

        let mut code = match fill.style {
            FillingStyle::None => None,
            FillingStyle::Plain => Some(self.filling_plain(fill.color)),
            FillingStyle::Gradient => Some(self.filling_gradient(fill)),
            _ => Some(self.filling_hatchings(fill)),
        };

        let shadowed = shape.shadow().is_some_and(|s| s.enabled);
        if !fill.is_filled()
            && shadowed
            && shape.shadow_fills_shape()
            && fill.color != defaults::INTERIOR_COLOR
        {
            let fill_color = format!("fillcolor={}", self.color_name(fill.color));
            code = Some(match code {
                Some(existing) => format!("{existing}, {fill_color}"),
                None => fill_color,
            });
        }

        code
    }

    fn filling_plain(&mut self, color: Color) -> String {
        let mut code = String::from("fillstyle=solid");

        if color != defaults::INTERIOR_COLOR {
            code.push_str(&format!(",fillcolor={}", self.color_name(color)));
        }

        if color.opacity() < 1.0 {
            code.push_str(&format!(", opacity={}", fmt_num(color.opacity())));
        }

        code
    }

    fn filling_gradient(&mut self, fill: &Fill) -> String {
        let gradient = &fill.gradient;
        let mut code = format!("fillstyle=gradient, gradlines={}", defaults::GRADIENT_LINES);

        if gradient.start != defaults::GRADIENT_START_COLOR {
            code.push_str(&format!(", gradbegin={}", self.color_name(gradient.start)));
        }

        if gradient.end != defaults::GRADIENT_END_COLOR {
            code.push_str(&format!(", gradend={}", self.color_name(gradient.end)));
        }

        let mid_point = f64::from(cut_number(gradient.mid_point));
        if !equals_double(mid_point, defaults::GRADIENT_MID_POINT) {
            code.push_str(&format!(", gradmidpoint={}", fmt_num(mid_point)));
        }

        let angle = gradient.angle.to_degrees();
        if !equals_double(angle, defaults::GRADIENT_ANGLE) {
            code.push_str(&format!(", gradangle={}", fmt_num(angle)));
        }

        code
    }

    fn filling_hatchings(&mut self, fill: &Fill) -> String {
        let hatching = &fill.hatching;

        let mut code = String::from(match fill.style {
            FillingStyle::CLines | FillingStyle::CLinesPlain => "fillstyle=crosshatch",
            FillingStyle::HLines | FillingStyle::HLinesPlain => "fillstyle=hlines",
            _ => "fillstyle=vlines",
        });

        if fill.is_filled() {
            code.push('*');
        }

        code.push_str(&format!(
            ", hatchwidth={}, hatchangle={}, hatchsep={}",
            self.cm(hatching.width),
            fmt_num(hatching.angle.to_degrees()),
            self.cm(hatching.sep)
        ));

        if hatching.color != defaults::HATCHING_COLOR {
            code.push_str(&format!(", hatchcolor={}", self.color_name(hatching.color)));
        }

        code
    }

    // ========================================================================
    // Border decorations
    // ========================================================================

    pub fn double_border_code(&mut self, shape: &dyn Shape) -> Option<String> {
        let double = shape.double_border().filter(|d| d.enabled)?;
        let mut code = format!("doubleline=true, doublesep={}", self.cm(double.sep));

        if double.color != defaults::DOUBLE_COLOR {
            code.push_str(&format!(", doublecolor={}", self.color_name(double.color)));
        }

        Some(code)
    }

    pub fn border_position_code(&self, shape: &dyn Shape) -> Option<String> {
        let token = match shape.border_position()? {
            BorderPosition::Inside => "inner",
            BorderPosition::Middle => "middle",
            BorderPosition::Outside => "outer",
        };
        Some(format!("dimen={token}"))
    }

    pub fn shadow_code(&mut self, shape: &dyn Shape) -> Option<String> {
        let shadow = shape.shadow().filter(|s| s.enabled)?;
        let mut code = String::from("shadow=true");

        let angle = shadow.angle.to_degrees();
        if !equals_double(angle, defaults::SHADOW_ANGLE) {
            code.push_str(&format!(",shadowangle={}", fmt_num(angle)));
        }

        code.push_str(&format!(",shadowsize={}", self.cm(shadow.size)));

        if shadow.color != defaults::SHADOW_COLOR {
            code.push_str(&format!(",shadowcolor={}", self.color_name(shadow.color)));
        }

        Some(code)
    }

    pub fn show_points_code(&self, shape: &dyn Shape) -> Option<String> {
        shape.shows_points().then(|| String::from("showpoints=true"))
    }

    // ========================================================================
    // Rotation
    // ========================================================================

    /// Opening of the `\rput` that rotates a shape around its gravity centre.
    ///
    /// The shape code follows, then a closing `}`.
    pub fn rotation_header_code(&self, shape: &dyn Shape) -> Option<String> {
        let ppc = self.ppc();
        if ppc < 1.0 || !self.origin.is_finite() {
            return None;
        }

        let angle = shape.rotation_angle();
        if equals_double(angle, 0.0) {
            return None;
        }

        let gc = shape.gravity_centre();
        let cx = (gc.x - self.origin.x) / ppc;
        let cy = (self.origin.y - gc.y) / ppc;
        let x = -(-angle).cos() * cx + (-angle).sin() * cy + cx;
        let y = -(-angle).sin() * cx - (-angle).cos() * cy + cy;

        Some(format!(
            "\\rput{{{}}}({},{}){{",
            fmt_num(rotation_degrees(angle)),
            fmt_num(x),
            fmt_num(y)
        ))
    }

    // ========================================================================
    // Arrows
    // ========================================================================

    /// Arrow tokens, e.g. `{|->}`.
    pub fn arrows_style_code(&self, shape: &dyn Shape) -> Option<String> {
        let arrows = shape.arrows().filter(|a| !a.is_none())?;
        Some(format!(
            "{{{}-{}}}",
            arrows.start.style.pst_token(),
            arrows.end.style.pst_token()
        ))
    }

    /// Size parameters of the arrow ends; one set when both ends share a kind.
    pub fn arrows_parameters_code(&self, shape: &dyn Shape) -> Option<String> {
        let arrows = shape.arrows().filter(|a| !a.is_none())?;
        let (start, end) = (&arrows.start, &arrows.end);

        let code = if start.style == ArrowStyle::None {
            arrow_parameters(end)
        } else if end.style == ArrowStyle::None
            || start.style.is_same_kind(end.style)
        {
            arrow_parameters(start)
        } else {
            format!("{},{}", arrow_parameters(start), arrow_parameters(end))
        };

        Some(code)
    }

    // ========================================================================
    // Composition
    // ========================================================================

    /// The full parameter list of a shape, without brackets.
    pub fn properties_code(&mut self, shape: &dyn Shape) -> String {
        let fragments = [
            self.line_code(shape),
            self.border_position_code(shape),
            self.shadow_code(shape),
            self.double_border_code(shape),
            self.filling_code(shape),
            self.show_points_code(shape),
        ];
        join_fragments(fragments)
    }
}

/// Join the present fragments with [`FRAGMENT_SEPARATOR`].
pub fn join_fragments(fragments: impl IntoIterator<Item = Option<String>>) -> String {
    fragments
        .into_iter()
        .flatten()
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(FRAGMENT_SEPARATOR)
}

/// Parameters of one arrow end, scaled with the fixed arrow ppc.
fn arrow_parameters(arrow: &Arrow) -> String {
    let scaler = Scaler::new(defaults::SHAPE_PPC);
    let style = arrow.style;

    if style.is_bar() || style.is_round_bracket() || style.is_square_bracket() {
        let mut code = format!(
            "tbarsize={}cm {}",
            scaler.cm(arrow.tbar_size_dim),
            fmt_num(arrow.tbar_size_num)
        );
        if style.is_square_bracket() {
            code.push_str(&format!(",bracketlength={}", fmt_num(arrow.bracket_num)));
        } else if style.is_round_bracket() {
            code.push_str(&format!(",rbracketlength={}", fmt_num(arrow.rbracket_num)));
        }
        code
    } else if style.is_arrow() {
        format!(
            "arrowsize={}cm {},arrowlength={},arrowinset={}",
            scaler.cm(arrow.size_dim),
            fmt_num(arrow.size_num),
            fmt_num(arrow.length),
            fmt_num(arrow.inset)
        )
    } else {
        format!(
            "dotsize={}cm {}",
            scaler.cm(arrow.dot_size_dim),
            fmt_num(arrow.dot_size_num)
        )
    }
}
