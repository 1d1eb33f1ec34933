//! PSTricks code generation
//!
//! - [`colors`]: colour naming and `\definecolor` lines
//! - [`fragments`]: style parameters shared by every shape command
//! - [`shapes`]: one PSTricks command per shape
//! - [`generator`]: the figure wrapper and document metadata

pub mod colors;
pub mod defaults;
pub mod fragments;
pub mod generator;
pub mod shapes;

pub use colors::{ColorEntry, ColorOrigin, ColorRegistry};
pub use fragments::{join_fragments, Encoder};
pub use generator::{Modifiable, PstGenerator, VerticalPosition};
pub use shapes::{shapes_code, PstView};
