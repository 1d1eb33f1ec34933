//! PSTricks default parameter values (parameters equal to these are omitted)

use crate::types::Color;

pub const INTERIOR_COLOR: Color = Color::WHITE;
pub const LINE_COLOR: Color = Color::BLACK;
pub const HATCHING_COLOR: Color = Color::BLACK;
pub const DOUBLE_COLOR: Color = Color::WHITE;
pub const SHADOW_COLOR: Color = Color::DARK_GRAY;
pub const GRADIENT_START_COLOR: Color = Color::rgb(0, 26, 242);
pub const GRADIENT_END_COLOR: Color = Color::CYAN;

/// Degrees
pub const SHADOW_ANGLE: f64 = -45.0;
/// Degrees
pub const GRADIENT_ANGLE: f64 = 0.0;
pub const GRADIENT_MID_POINT: f64 = 0.9;
pub const GRADIENT_LINES: u32 = 2000;

/// Pixels per centimetre of arrow parameters, independent of the drawing ppc.
pub const SHAPE_PPC: f64 = 50.0;
