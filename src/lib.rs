//! PSTricks export of vector drawings
//!
//! A [`Drawing`] is a list of shapes in pixel coordinates. [`PstGenerator`]
//! turns it into a `pspicture` environment, [`document`] wraps that into a
//! standalone LaTeX document, and [`Exporter`] drives latex, dvips, ps2pdf,
//! pdfcrop and ps2eps to produce `.ps`, `.eps` and `.pdf` files.
//!
//! ```
//! use pstexport::{Drawing, PstGenerator, Point, Rectangle};
//!
//! let drawing = Drawing::new(20.0)
//!     .with_shape(Rectangle::new(Point::new(0.0, 0.0), Point::new(40.0, 20.0)));
//! let mut generator = PstGenerator::new();
//! let code = generator.latex_drawing(&drawing, "").unwrap();
//! assert!(code.contains("\\psframe[linecolor=black, linewidth=0.1, dimen=middle](0,-1)(2,0)"));
//! ```

pub mod document;
pub mod errors;
pub mod log;
pub mod model;
pub mod pst;
pub mod toolchain;
pub mod types;

pub use errors::{ExportError, FailureCollector};
pub use model::{AnyShape, Drawing, Shape};
pub use model::{Circle, Dot, Ellipse, Polygon, Polyline, Rectangle, Text};
pub use pst::{Modifiable, PstGenerator, VerticalPosition};
pub use toolchain::{ExportConfig, Exporter, ProcessRunner, SystemRunner, ToolchainConfig};
pub use types::{Color, Point, Px};
