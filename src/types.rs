//! Strongly-typed numeric primitives for pstexport (zero-cost newtypes).
//!
//! - Drawing coordinates live in pixel space, y axis pointing down
//! - Document coordinates are centimetres, y axis pointing up
//! - Conversions only via Scaler (pixels per centimetre)

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use glam::DVec2;

/// A point in pixel space.
pub type Point = DVec2;

/// Values closer to zero than this are written as `0`.
const CUT_THRESHOLD: f64 = 1e-4;

/// Tolerance of [`equals_double`].
pub const EPSILON: f64 = 1e-5;

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Length in pixels (drawing space)
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Px(pub f64);

impl Px {
    pub const ZERO: Px = Px(0.0);

    /// Create a non-negative length with validation
    #[inline]
    pub fn try_non_negative(val: f64) -> Result<Px, NumericError> {
        if val.is_nan() {
            Err(NumericError::NaN)
        } else if val.is_infinite() {
            Err(NumericError::Infinite)
        } else if val < 0.0 {
            Err(NumericError::Negative)
        } else {
            Ok(Px(val))
        }
    }

    /// Get the raw value (use sparingly, prefer typed operations)
    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }
}

impl Add for Px {
    type Output = Px;
    fn add(self, rhs: Px) -> Px { Px(self.0 + rhs.0) }
}
impl Sub for Px {
    type Output = Px;
    fn sub(self, rhs: Px) -> Px { Px(self.0 - rhs.0) }
}
impl Mul<f64> for Px {
    type Output = Px;
    fn mul(self, rhs: f64) -> Px { Px(self.0 * rhs) }
}
impl Div<f64> for Px {
    type Output = Px;
    fn div(self, rhs: f64) -> Px { Px(self.0 / rhs) }
}
impl Neg for Px {
    type Output = Px;
    fn neg(self) -> Px { Px(-self.0) }
}

impl fmt::Display for Px {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Length in centimetres (document space)
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Cm(pub f64);

impl Cm {
    /// Get the raw value
    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }
}

impl Mul<f64> for Cm {
    type Output = Cm;
    fn mul(self, rhs: f64) -> Cm { Cm(self.0 * rhs) }
}
impl Add<f64> for Cm {
    type Output = Cm;
    fn add(self, rhs: f64) -> Cm { Cm(self.0 + rhs) }
}

/// Document output: the cut, locale-independent form.
impl fmt::Display for Cm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&fmt_num(self.0))
    }
}

/// Convert pixels → centimetres with a given pixels-per-centimetre ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scaler {
    pub ppc: f64,
}

impl Scaler {
    /// Create a new Scaler (unchecked).
    /// Use `try_new` for user-provided values.
    pub(crate) fn new(ppc: f64) -> Self { Scaler { ppc } }

    /// Create a Scaler with validation (rejects NaN, infinite, zero, negative)
    pub fn try_new(ppc: f64) -> Result<Self, NumericError> {
        if ppc.is_nan() {
            Err(NumericError::NaN)
        } else if ppc.is_infinite() {
            Err(NumericError::Infinite)
        } else if ppc == 0.0 {
            Err(NumericError::Zero)
        } else if ppc < 0.0 {
            Err(NumericError::Negative)
        } else {
            Ok(Scaler { ppc })
        }
    }

    /// Convert a pixel length to centimetres.
    #[inline]
    pub fn cm(&self, l: Px) -> Cm { Cm(l.0 / self.ppc) }

    /// Convert a raw pixel quantity to centimetres.
    #[inline]
    pub fn cm_raw(&self, v: f64) -> f64 { v / self.ppc }
}

/// Axis-aligned bounding box in pixel space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl Default for BBox {
    fn default() -> Self {
        Self::new()
    }
}

impl BBox {
    /// Create an empty bounding box (will expand on first point)
    pub fn new() -> Self {
        BBox {
            min: Point::new(f64::MAX, f64::MAX),
            max: Point::new(f64::MIN, f64::MIN),
        }
    }

    /// Create a bounding box from two corners given in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        BBox { min: a.min(b), max: a.max(b) }
    }

    /// Check if the bbox is empty (never expanded)
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Expand to include a point
    pub fn expand_point(&mut self, p: Point) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Expand to include another box
    pub fn expand_box(&mut self, other: &BBox) {
        if !other.is_empty() {
            self.expand_point(other.min);
            self.expand_point(other.max);
        }
    }

    pub fn width(&self) -> Px { Px(self.max.x - self.min.x) }

    pub fn height(&self) -> Px { Px(self.max.y - self.min.y) }

    pub fn center(&self) -> Point { (self.min + self.max) / 2.0 }

    /// Top-right corner (screen space: max x, min y)
    pub fn top_right(&self) -> Point { Point::new(self.max.x, self.min.y) }

    /// Bottom-left corner (screen space: min x, max y)
    pub fn bottom_left(&self) -> Point { Point::new(self.min.x, self.max.y) }
}

/// Drop float noise: tiny values become zero, everything else single precision.
pub fn cut_number(value: f64) -> f32 {
    if value < CUT_THRESHOLD && value > -CUT_THRESHOLD {
        0.0
    } else {
        value as f32
    }
}

/// Format a number for the generated document.
///
/// Uses the shortest representation that round-trips the cut `f32`, so there is
/// never an exponent and never a locale-dependent separator.
pub fn fmt_num(value: f64) -> String {
    let cut = cut_number(value);
    if cut == 0.0 || !cut.is_finite() {
        return "0".to_string();
    }
    format!("{}", cut)
}

/// Compare two floats with [`EPSILON`] tolerance.
pub fn equals_double(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}

/// The PSTricks rotation for an angle in radians: negated degrees, modulo 360.
pub fn rotation_degrees(angle: f64) -> f64 {
    -angle.to_degrees() % 360.0
}

/// An RGBA colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const GRAY: Self = Self::rgb(128, 128, 128);
    pub const LIGHT_GRAY: Self = Self::rgb(191, 191, 191);
    pub const DARK_GRAY: Self = Self::rgb(64, 64, 64);

    /// Convert a CMYK colour (components in `[0, 1]`) to opaque RGB.
    pub fn from_cmyk(c: f64, m: f64, y: f64, k: f64) -> Self {
        let channel = |v: f64| (((1.0 - v) * (1.0 - k)) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::rgb(channel(c), channel(m), channel(y))
    }

    /// Same colour with another alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Same colour, fully opaque.
    pub const fn opaque(self) -> Self {
        self.with_alpha(255)
    }

    /// Opacity in `[0, 1]`.
    pub fn opacity(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// Red, green and blue in `[0, 1]`.
    pub fn rgb_unit(self) -> [f64; 3] {
        [
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        ]
    }
}

/// Error from parsing a `#RRGGBB` style colour.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid colour `{0}`: expected #RGB, #RRGGBB or #RRGGBBAA")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let err = || ParseColorError(s.to_string());
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2).ok_or_else(err)?, 16).map_err(|_| err());

        match hex.len() {
            3 => {
                let digits: Vec<u8> = hex
                    .chars()
                    .map(|c| c.to_digit(16).map(|d| d as u8).ok_or_else(err))
                    .collect::<Result<_, _>>()?;
                Ok(Self::rgb(digits[0] * 17, digits[1] * 17, digits[2] * 17))
            }
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(err()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}
