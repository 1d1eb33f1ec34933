//! Standalone LaTeX document around a generated picture

use crate::model::Drawing;
use crate::pst::PstGenerator;
use crate::types::{fmt_num, Cm, NumericError, Point};

/// Extra room below the picture, in centimetres.
const PAPER_HEIGHT_PADDING: f64 = 0.2;

/// Lets `\includegraphics` read pictures whose path contains spaces.
pub const PACKAGE_FOR_SPACE_PICTURE: &str = "\\usepackage[space]{grffile}\n\
\\usepackage{etoolbox}\n\
\\makeatletter\n\
\\patchcmd\\Gread@eps{\\@inputcheck#1 }{\\@inputcheck\"#1\"\\relax}{}{}\n\
\\makeatother\n";

/// Paper size of the standalone document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentLayout {
    pub paper_width: Cm,
    pub paper_height: Cm,
}

impl DocumentLayout {
    /// Layout for the bounds of `drawing`.
    pub fn from_drawing(drawing: &Drawing, scale: f64) -> Self {
        Self::from_corners(drawing.top_right(), drawing.bottom_left(), drawing.ppc(), scale)
    }

    /// Layout from the drawing corners in pixels.
    ///
    /// A top edge above zero is moved to zero, so the page never gets a
    /// negative height.
    pub fn from_corners(top_right: Point, bottom_left: Point, ppc: f64, scale: f64) -> Self {
        let (mut tr, mut bl) = (top_right, bottom_left);
        if tr.y < 0.0 {
            bl.y -= tr.y;
            tr.y = 0.0;
        }

        Self {
            paper_width: Cm(tr.x / ppc * scale),
            paper_height: Cm(bl.y / ppc * scale + PAPER_HEIGHT_PADDING),
        }
    }
}

/// Assemble the full document around the picture `body`.
///
/// `packages` are the user preamble lines, written verbatim.
pub fn assemble(layout: DocumentLayout, body: &str, packages: &str) -> String {
    let geometry = format!(
        "\\usepackage[left=0cm,top=0.1cm,right=0cm,bottom=0cm,nohead,nofoot,paperwidth={}cm,paperheight={}cm]{{geometry}}",
        layout.paper_width, layout.paper_height
    );

    [
        "\\documentclass{article}",
        "\\pagestyle{empty}",
        packages,
        &geometry,
        "\\usepackage[usenames,dvipsnames]{pstricks}",
        "\\usepackage{epsfig}",
        "\\usepackage{pst-grad}",
        "\\usepackage{pst-plot}",
        // ends with its own newline
        &format!("{PACKAGE_FOR_SPACE_PICTURE}\\begin{{document}}"),
        "\\addtolength{\\oddsidemargin}{-0.2in}",
        "\\addtolength{\\evensidemargin}{-0.2in}",
        body,
        "\\end{document}",
    ]
    .join("\n")
}

/// Regenerate the picture of `drawing` and wrap it in a document.
pub fn latex_document(
    drawing: &Drawing,
    generator: &mut PstGenerator,
    packages: &str,
) -> Result<String, NumericError> {
    generator.update_full(drawing, packages)?;
    let layout = DocumentLayout::from_drawing(drawing, generator.scale());
    Ok(assemble(layout, generator.cache(), packages))
}

/// Width and height text of a layout, for logs.
pub fn describe(layout: &DocumentLayout) -> String {
    format!("{}cm x {}cm", fmt_num(layout.paper_width.raw()), fmt_num(layout.paper_height.raw()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rectangle;
    use pretty_assertions::assert_eq;

    #[test]
    fn negative_top_is_shifted_to_zero() {
        let layout = DocumentLayout::from_corners(
            Point::new(100.0, -20.0),
            Point::new(0.0, 50.0),
            10.0,
            1.0,
        );
        assert_eq!(layout.paper_width, Cm(10.0));
        // bl.y - tr.y = 70 pixels
        assert_eq!(layout.paper_height.to_string(), "7.2");
    }

    #[test]
    fn layout_scales() {
        let layout = DocumentLayout::from_corners(Point::new(100.0, 0.0), Point::new(0.0, 50.0), 50.0, 2.0);
        assert_eq!(layout.paper_width, Cm(4.0));
        assert_eq!(layout.paper_height.to_string(), "2.2");
        assert_eq!(describe(&layout), "4cm x 2.2cm");
    }

    #[test]
    fn assemble_skeleton() {
        let layout = DocumentLayout { paper_width: Cm(2.0), paper_height: Cm(1.2) };
        let doc = assemble(layout, "BODY", "\\usepackage{amsmath}");
        let expected = "\\documentclass{article}
\\pagestyle{empty}
\\usepackage{amsmath}
\\usepackage[left=0cm,top=0.1cm,right=0cm,bottom=0cm,nohead,nofoot,paperwidth=2cm,paperheight=1.2cm]{geometry}
\\usepackage[usenames,dvipsnames]{pstricks}
\\usepackage{epsfig}
\\usepackage{pst-grad}
\\usepackage{pst-plot}
\\usepackage[space]{grffile}
\\usepackage{etoolbox}
\\makeatletter
\\patchcmd\\Gread@eps{\\@inputcheck#1 }{\\@inputcheck\"#1\"\\relax}{}{}
\\makeatother
\\begin{document}
\\addtolength{\\oddsidemargin}{-0.2in}
\\addtolength{\\evensidemargin}{-0.2in}
BODY
\\end{document}";
        assert_eq!(doc, expected);
    }

    #[test]
    fn latex_document_contains_one_frame() {
        let mut drawing = Drawing::new(20.0);
        drawing.push(Rectangle::new(Point::new(0.0, 0.0), Point::new(40.0, 20.0)));
        let mut generator = PstGenerator::new();

        let doc = latex_document(&drawing, &mut generator, "").unwrap();
        assert_eq!(doc.matches("\\psframe[").count(), 1);
        assert!(doc.contains("paperwidth=2cm,paperheight=1.2cm"));
        assert!(doc.ends_with("\\end{pspicture}\n}\n\n\\end{document}"));
    }
}
