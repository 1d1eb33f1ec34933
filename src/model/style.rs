//! Style components shared by the concrete shapes.
//!
//! Angles are radians, lengths are pixels. Default values match the PSTricks
//! defaults so that an untouched shape produces the shortest parameter list.

use crate::pst::defaults;
use crate::types::{Color, Px};

/// Stroke pattern of a shape border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineKind {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Border colour, thickness and dash pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub thickness: Px,
    pub kind: LineKind,
    /// Length of the drawn part of a dash
    pub dash_black: Px,
    /// Length of the gap between dashes
    pub dash_white: Px,
    /// Gap between dots
    pub dot_sep: Px,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: defaults::LINE_COLOR,
            thickness: Px(2.0),
            kind: LineKind::Solid,
            dash_black: Px(6.0),
            dash_white: Px(6.0),
            dot_sep: Px(6.0),
        }
    }
}

/// How the interior of a shape is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillingStyle {
    #[default]
    None,
    Plain,
    Gradient,
    /// Cross hatching
    CLines,
    /// Cross hatching over a plain fill
    CLinesPlain,
    HLines,
    HLinesPlain,
    VLines,
    VLinesPlain,
}

impl FillingStyle {
    /// Whether the interior is painted with the fill colour.
    pub fn is_filled(self) -> bool {
        matches!(
            self,
            FillingStyle::Plain
                | FillingStyle::CLinesPlain
                | FillingStyle::HLinesPlain
                | FillingStyle::VLinesPlain
        )
    }

    pub fn is_hatching(self) -> bool {
        matches!(
            self,
            FillingStyle::CLines
                | FillingStyle::CLinesPlain
                | FillingStyle::HLines
                | FillingStyle::HLinesPlain
                | FillingStyle::VLines
                | FillingStyle::VLinesPlain
        )
    }
}

/// Two-colour gradient parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub start: Color,
    pub end: Color,
    /// Position of the end colour, in `[0, 1]`
    pub mid_point: f64,
    pub angle: f64,
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            start: defaults::GRADIENT_START_COLOR,
            end: defaults::GRADIENT_END_COLOR,
            mid_point: defaults::GRADIENT_MID_POINT,
            angle: defaults::GRADIENT_ANGLE.to_radians(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hatching {
    pub color: Color,
    pub width: Px,
    pub angle: f64,
    pub sep: Px,
}

impl Default for Hatching {
    fn default() -> Self {
        Self {
            color: defaults::HATCHING_COLOR,
            width: Px(1.0),
            angle: 0.0,
            sep: Px(6.0),
        }
    }
}

/// Interior of a fillable shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub style: FillingStyle,
    pub color: Color,
    pub gradient: Gradient,
    pub hatching: Hatching,
}

impl Default for Fill {
    fn default() -> Self {
        Self {
            style: FillingStyle::None,
            color: defaults::INTERIOR_COLOR,
            gradient: Gradient::default(),
            hatching: Hatching::default(),
        }
    }
}

impl Fill {
    pub fn plain(color: Color) -> Self {
        Self { style: FillingStyle::Plain, color, ..Self::default() }
    }

    pub fn is_filled(&self) -> bool {
        self.style.is_filled()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    pub enabled: bool,
    pub color: Color,
    pub size: Px,
    pub angle: f64,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            enabled: false,
            color: defaults::SHADOW_COLOR,
            size: Px(4.0),
            angle: defaults::SHADOW_ANGLE.to_radians(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoubleBorder {
    pub enabled: bool,
    pub color: Color,
    /// Distance between the two strokes
    pub sep: Px,
}

impl Default for DoubleBorder {
    fn default() -> Self {
        Self { enabled: false, color: defaults::DOUBLE_COLOR, sep: Px(6.0) }
    }
}

/// Where the border stroke sits relative to the shape outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderPosition {
    Inside,
    #[default]
    Middle,
    Outside,
}

/// Coarse grouping of arrow styles; styles of the same kind share parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowKind {
    None,
    Bar,
    SquareBracket,
    RoundBracket,
    Arrow,
    Disk,
    Cap,
}

/// Decoration at one end of an arrowable shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrowStyle {
    #[default]
    None,
    BarEnd,
    BarIn,
    LeftArrow,
    RightArrow,
    LeftDoubleArrow,
    RightDoubleArrow,
    LeftRoundBracket,
    RightRoundBracket,
    LeftSquareBracket,
    RightSquareBracket,
    RoundEnd,
    RoundIn,
    SquareEnd,
    DiskEnd,
    DiskIn,
    CircleEnd,
    CircleIn,
}

impl ArrowStyle {
    /// The PSTricks arrow token, as written between `{` and `}`.
    pub fn pst_token(self) -> &'static str {
        match self {
            ArrowStyle::None => "",
            ArrowStyle::BarEnd => "|",
            ArrowStyle::BarIn => "|*",
            ArrowStyle::LeftArrow => "<",
            ArrowStyle::RightArrow => ">",
            ArrowStyle::LeftDoubleArrow => "<<",
            ArrowStyle::RightDoubleArrow => ">>",
            ArrowStyle::LeftRoundBracket => "(",
            ArrowStyle::RightRoundBracket => ")",
            ArrowStyle::LeftSquareBracket => "[",
            ArrowStyle::RightSquareBracket => "]",
            ArrowStyle::RoundEnd => "c",
            ArrowStyle::RoundIn => "cc",
            ArrowStyle::SquareEnd => "C",
            ArrowStyle::DiskEnd => "*",
            ArrowStyle::DiskIn => "**",
            ArrowStyle::CircleEnd => "o",
            ArrowStyle::CircleIn => "oo",
        }
    }

    pub fn kind(self) -> ArrowKind {
        match self {
            ArrowStyle::None => ArrowKind::None,
            ArrowStyle::BarEnd | ArrowStyle::BarIn => ArrowKind::Bar,
            ArrowStyle::LeftArrow
            | ArrowStyle::RightArrow
            | ArrowStyle::LeftDoubleArrow
            | ArrowStyle::RightDoubleArrow => ArrowKind::Arrow,
            ArrowStyle::LeftRoundBracket | ArrowStyle::RightRoundBracket => ArrowKind::RoundBracket,
            ArrowStyle::LeftSquareBracket | ArrowStyle::RightSquareBracket => {
                ArrowKind::SquareBracket
            }
            ArrowStyle::RoundEnd | ArrowStyle::RoundIn | ArrowStyle::SquareEnd => ArrowKind::Cap,
            ArrowStyle::DiskEnd
            | ArrowStyle::DiskIn
            | ArrowStyle::CircleEnd
            | ArrowStyle::CircleIn => ArrowKind::Disk,
        }
    }

    pub fn is_bar(self) -> bool {
        self.kind() == ArrowKind::Bar
    }

    pub fn is_square_bracket(self) -> bool {
        self.kind() == ArrowKind::SquareBracket
    }

    pub fn is_round_bracket(self) -> bool {
        self.kind() == ArrowKind::RoundBracket
    }

    pub fn is_arrow(self) -> bool {
        self.kind() == ArrowKind::Arrow
    }

    /// Disk and circle ends.
    pub fn is_dot(self) -> bool {
        self.kind() == ArrowKind::Disk
    }

    /// Two styles of the same kind are configured by one parameter set.
    pub fn is_same_kind(self, other: ArrowStyle) -> bool {
        self.kind() == other.kind()
    }
}

/// One arrow end with every PSTricks arrow parameter.
///
/// `*_dim` values are pixels, `*_num` values are multiples of the line width.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    pub style: ArrowStyle,
    pub size_dim: Px,
    pub size_num: f64,
    pub length: f64,
    pub inset: f64,
    pub tbar_size_dim: Px,
    pub tbar_size_num: f64,
    pub bracket_num: f64,
    pub rbracket_num: f64,
    pub dot_size_dim: Px,
    pub dot_size_num: f64,
}

impl Default for Arrow {
    fn default() -> Self {
        Self {
            style: ArrowStyle::None,
            size_dim: Px(3.0),
            size_num: 2.0,
            length: 1.4,
            inset: 0.4,
            tbar_size_dim: Px(3.0),
            tbar_size_num: 2.0,
            bracket_num: 0.15,
            rbracket_num: 0.15,
            dot_size_dim: Px(3.0),
            dot_size_num: 2.5,
        }
    }
}

impl Arrow {
    pub fn new(style: ArrowStyle) -> Self {
        Self { style, ..Self::default() }
    }
}

/// Both ends of an arrowable shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Arrows {
    pub start: Arrow,
    pub end: Arrow,
}

impl Arrows {
    pub fn new(start: ArrowStyle, end: ArrowStyle) -> Self {
        Self { start: Arrow::new(start), end: Arrow::new(end) }
    }

    pub fn is_none(&self) -> bool {
        self.start.style == ArrowStyle::None && self.end.style == ArrowStyle::None
    }
}

/// Every style attribute a shape may carry. Shapes expose the parts they
/// support through the [`Shape`](super::Shape) capability accessors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapeStyle {
    pub line: LineStyle,
    pub fill: Fill,
    pub shadow: Shadow,
    pub double_border: DoubleBorder,
    pub border_position: BorderPosition,
    pub arrows: Arrows,
    /// Rotation around the gravity centre
    pub rotation: f64,
    pub show_points: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_variants() {
        assert!(FillingStyle::Plain.is_filled());
        assert!(FillingStyle::HLinesPlain.is_filled());
        assert!(!FillingStyle::HLines.is_filled());
        assert!(!FillingStyle::Gradient.is_filled());
        assert!(!FillingStyle::None.is_hatching());
        assert!(FillingStyle::VLines.is_hatching());
    }

    #[test]
    fn arrow_kinds() {
        assert!(ArrowStyle::LeftArrow.is_same_kind(ArrowStyle::RightDoubleArrow));
        assert!(ArrowStyle::BarEnd.is_same_kind(ArrowStyle::BarIn));
        assert!(!ArrowStyle::BarEnd.is_same_kind(ArrowStyle::LeftSquareBracket));
        assert!(!ArrowStyle::DiskEnd.is_same_kind(ArrowStyle::RoundEnd));
        assert_eq!(ArrowStyle::CircleIn.pst_token(), "oo");
    }

    #[test]
    fn arrows_none() {
        assert!(Arrows::default().is_none());
        assert!(!Arrows::new(ArrowStyle::None, ArrowStyle::RightArrow).is_none());
    }
}
