//! Document metadata and the full generation pass
//!
//! [`PstGenerator`] holds what a user sets about the exported picture
//! (comment, caption, label, float position, scale) and rebuilds the PSTricks
//! body of a drawing on every [`PstGenerator::update_full`].

use super::colors::ColorRegistry;
use super::fragments::Encoder;
use super::shapes::{document_point, shapes_code};
use crate::log::debug;
use crate::model::Drawing;
use crate::types::{fmt_num, NumericError};

/// Smallest accepted scale factor.
pub const MIN_SCALE: f64 = 0.1;

/// Characters prefixed to every comment line.
const COMMENT_TAG: &str = "% ";

/// Package lines suggested to users pasting the picture into their own document.
const PACKAGE_HINTS: &[&str] = &[
    "\\usepackage[usenames,dvipsnames]{pstricks}",
    "\\usepackage{epsfig}",
    "\\usepackage{pst-grad} % For gradients",
    "\\usepackage{pst-plot} % For axes",
];

/// Objects tracking whether they changed since last read.
pub trait Modifiable {
    fn is_modified(&self) -> bool;
    fn set_modified(&mut self, modified: bool);
}

/// Float placement of the picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalPosition {
    /// Not in a figure environment
    #[default]
    None,
    Top,
    Bottom,
    Here,
    HereHere,
    FloatsPage,
}

impl VerticalPosition {
    pub fn token(self) -> &'static str {
        match self {
            VerticalPosition::None => "",
            VerticalPosition::Top => "t",
            VerticalPosition::Bottom => "b",
            VerticalPosition::Here => "h",
            VerticalPosition::HereHere => "H",
            VerticalPosition::FloatsPage => "p",
        }
    }
}

/// Generates the PSTricks code of a drawing.
#[derive(Debug, Clone)]
pub struct PstGenerator {
    /// Escaped: every line starts with `% `, ends with a newline
    comment: String,
    label: String,
    caption: String,
    position_vert: VerticalPosition,
    position_hori_centre: bool,
    scale: f64,
    modified: bool,
    with_comments: bool,
    with_latex_params: bool,
    colors: ColorRegistry,
    cache: String,
}

impl Default for PstGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Modifiable for PstGenerator {
    fn is_modified(&self) -> bool {
        self.modified
    }

    fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }
}

impl PstGenerator {
    pub fn new() -> Self {
        Self {
            comment: String::new(),
            label: String::new(),
            caption: String::new(),
            position_vert: VerticalPosition::None,
            position_hori_centre: false,
            scale: 1.0,
            modified: false,
            with_comments: true,
            with_latex_params: true,
            colors: ColorRegistry::new(),
            cache: String::new(),
        }
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Values below [`MIN_SCALE`] are ignored.
    pub fn set_scale(&mut self, scale: f64) {
        if scale >= MIN_SCALE {
            self.scale = scale;
            self.modified = true;
        }
    }

    /// The escaped comment.
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Store `text` as a LaTeX comment. Empty text is ignored.
    pub fn set_comment(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        let mut escaped = String::with_capacity(text.len() * 2);
        let mut eol = true;
        for c in text.chars() {
            if eol {
                escaped.push_str(COMMENT_TAG);
                eol = false;
            }
            if c == '\n' {
                eol = true;
            }
            escaped.push(c);
        }
        escaped.push('\n');

        self.comment = escaped;
        self.modified = true;
    }

    /// The comment with the `% ` tags and the final newline removed.
    pub fn comments_without_tag(&self) -> String {
        let mut out = String::with_capacity(self.comment.len());
        let mut eol = true;
        let mut chars = self.comment.chars();

        while let Some(c) = chars.next() {
            if eol && c == '%' {
                // the tag is two characters long
                chars.next();
                eol = false;
            } else {
                if c == '\n' {
                    eol = true;
                }
                out.push(c);
            }
        }

        if out.chars().count() > 1 && out.ends_with('\n') {
            out.pop();
        }
        out
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
        self.modified = true;
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
        self.modified = true;
    }

    pub fn vertical_position(&self) -> VerticalPosition {
        self.position_vert
    }

    pub fn set_vertical_position(&mut self, position: VerticalPosition) {
        self.position_vert = position;
        self.modified = true;
    }

    pub fn is_centred(&self) -> bool {
        self.position_hori_centre
    }

    /// Marks the generator modified only on change.
    pub fn set_centred(&mut self, centred: bool) {
        if self.position_hori_centre != centred {
            self.position_hori_centre = centred;
            self.modified = true;
        }
    }

    pub fn with_comments(&self) -> bool {
        self.with_comments
    }

    pub fn set_with_comments(&mut self, with_comments: bool) {
        self.with_comments = with_comments;
    }

    /// Whether the figure environment, centring and package hints are written.
    pub fn with_latex_params(&self) -> bool {
        self.with_latex_params
    }

    pub fn set_with_latex_params(&mut self, with_latex_params: bool) {
        self.with_latex_params = with_latex_params;
    }

    pub fn colors(&self) -> &ColorRegistry {
        &self.colors
    }

    pub fn colors_mut(&mut self) -> &mut ColorRegistry {
        &mut self.colors
    }

    // ========================================================================
    // Generation
    // ========================================================================

    /// The code produced by the last [`update_full`](Self::update_full).
    pub fn cache(&self) -> &str {
        &self.cache
    }

    /// Regenerate the whole picture code of `drawing`.
    ///
    /// `packages` are the extra preamble lines of the export configuration,
    /// written as commented hints.
    pub fn update_full(&mut self, drawing: &Drawing, packages: &str) -> Result<(), NumericError> {
        let scaler = drawing.scaler()?;
        self.colors.reset();

        let origin = drawing.origin();
        let bounds = drawing.bounds();
        let top_left = document_point(bounds.min, origin, scaler.ppc);
        let bottom_right = document_point(bounds.max, origin, scaler.ppc);

        let body = {
            let mut enc = Encoder::new(&mut self.colors, scaler, origin);
            shapes_code(&mut enc, drawing.shapes())
        };

        let mut code = String::new();
        let in_figure = self.with_latex_params && self.position_vert != VerticalPosition::None;
        let centred = self.with_latex_params && self.position_hori_centre;

        if self.with_comments && !self.comment.is_empty() {
            code.push_str(&self.comment);
        }

        if self.with_latex_params {
            for hint in PACKAGE_HINTS.iter().copied().chain(packages.lines()) {
                if !hint.trim().is_empty() {
                    code.push_str(COMMENT_TAG);
                    code.push_str(hint);
                    code.push('\n');
                }
            }
        }

        if in_figure {
            code.push_str(&format!("\\begin{{figure}}[{}]\n", self.position_vert.token()));
        }
        if centred {
            code.push_str("\\begin{center}\n");
        }

        let scale = fmt_num(self.scale);
        code.push_str(&format!(
            "\\psscalebox{{{scale} {scale}}} % Change this value to rescale the drawing.\n{{\n"
        ));
        code.push_str(&format!(
            "\\begin{{pspicture}}(0,{})({},{})\n",
            fmt_num(bottom_right.y),
            fmt_num(bottom_right.x),
            fmt_num(top_left.y)
        ));
        code.push_str(&self.colors.definitions());
        code.push_str(&body);
        code.push_str("\\end{pspicture}\n}\n");

        if centred {
            code.push_str("\\end{center}\n");
        }
        if in_figure {
            if !self.caption.is_empty() {
                code.push_str(&format!("\\caption{{{}}}\n", self.caption));
            }
            if !self.label.is_empty() {
                code.push_str(&format!("\\label{{{}}}\n", self.label));
            }
            code.push_str("\\end{figure}\n");
        }

        debug!(
            shapes = drawing.shapes().len(),
            colours = self.colors.used_names().len(),
            "regenerated picture code"
        );
        self.cache = code;
        Ok(())
    }

    /// Regenerate and return the picture code.
    pub fn latex_drawing(&mut self, drawing: &Drawing, packages: &str) -> Result<String, NumericError> {
        self.update_full(drawing, packages)?;
        Ok(self.cache.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Fill, Rectangle, ShapeStyle};
    use crate::types::{Color, Point};

    fn one_rect(fill: Color) -> Drawing {
        let style = ShapeStyle { fill: Fill::plain(fill), ..ShapeStyle::default() };
        Drawing::new(20.0)
            .with_shape(Rectangle::new(Point::new(0.0, 0.0), Point::new(40.0, 20.0)).with_style(style))
    }

    // ==================== Comments ====================

    #[test]
    fn comment_is_escaped_per_line() {
        let mut generator = PstGenerator::new();
        generator.set_comment("first\nsecond");
        assert_eq!(generator.comment(), "% first\n% second\n");
        assert!(generator.is_modified());
    }

    #[test]
    fn comment_round_trip() {
        let mut generator = PstGenerator::new();
        for text in ["a", "hello world", "line one\nline two", "x\n\ny", "trailing\n"] {
            generator.set_comment(text);
            assert_eq!(generator.comments_without_tag(), text);
        }
    }

    #[test]
    fn empty_comment_is_ignored() {
        let mut generator = PstGenerator::new();
        generator.set_comment("kept");
        generator.set_modified(false);
        generator.set_comment("");
        assert_eq!(generator.comments_without_tag(), "kept");
        assert!(!generator.is_modified());
    }

    // ==================== Metadata ====================

    #[test]
    fn scale_below_minimum_is_ignored() {
        let mut generator = PstGenerator::new();
        generator.set_scale(0.05);
        assert_eq!(generator.scale(), 1.0);
        assert!(!generator.is_modified());

        generator.set_scale(0.1);
        assert_eq!(generator.scale(), 0.1);
        assert!(generator.is_modified());
    }

    #[test]
    fn centring_marks_modified_only_on_change() {
        let mut generator = PstGenerator::new();
        generator.set_centred(false);
        assert!(!generator.is_modified());
        generator.set_centred(true);
        assert!(generator.is_modified());
    }

    #[test]
    fn vertical_position_tokens() {
        assert_eq!(VerticalPosition::None.token(), "");
        assert_eq!(VerticalPosition::HereHere.token(), "H");
        assert_eq!(VerticalPosition::FloatsPage.token(), "p");
    }

    // ==================== Generation ====================

    #[test]
    fn update_full_plain_picture() {
        let mut generator = PstGenerator::new();
        generator.set_with_latex_params(false);
        generator.update_full(&one_rect(Color::WHITE), "").unwrap();
        insta::assert_snapshot!(generator.cache(), @r"
        \psscalebox{1 1} % Change this value to rescale the drawing.
        {
        \begin{pspicture}(0,-1)(2,0)
        \psframe[linecolor=black, linewidth=0.1, dimen=middle, fillstyle=solid](0,-1)(2,0)
        \end{pspicture}
        }
        ");
    }

    #[test]
    fn update_full_defines_user_colours_before_use() {
        let mut generator = PstGenerator::new();
        generator.set_with_latex_params(false);
        generator.update_full(&one_rect(Color::rgb(255, 0, 51)), "").unwrap();

        let cache = generator.cache();
        let definition = cache.find("\\definecolor{colour1}{rgb}{1,0,0.2}");
        let usage = cache.find("fillcolor=colour1");
        assert!(definition.is_some());
        assert!(definition < usage);
    }

    #[test]
    fn update_full_rebuilds_colour_usage() {
        let mut generator = PstGenerator::new();
        generator.update_full(&one_rect(Color::rgb(1, 2, 3)), "").unwrap();
        assert_eq!(generator.colors().used_names().len(), 2);

        generator.update_full(&Drawing::new(20.0), "").unwrap();
        assert!(generator.colors().used_names().is_empty());
        assert!(!generator.cache().contains("\\definecolor"));
    }

    #[test]
    fn update_full_figure_environment() {
        let mut generator = PstGenerator::new();
        generator.set_comment("made by hand");
        generator.set_vertical_position(VerticalPosition::Here);
        generator.set_centred(true);
        generator.set_caption("A box");
        generator.set_label("fig:box");

        let code = generator.latex_drawing(&one_rect(Color::WHITE), "\\usepackage{amsmath}").unwrap();
        let lines: Vec<&str> = code.lines().collect();

        assert_eq!(lines[0], "% made by hand");
        assert_eq!(lines[1], "% \\usepackage[usenames,dvipsnames]{pstricks}");
        assert_eq!(lines[5], "% \\usepackage{amsmath}");
        assert_eq!(lines[6], "\\begin{figure}[h]");
        assert_eq!(lines[7], "\\begin{center}");
        assert_eq!(&lines[lines.len() - 4..], &["\\end{center}", "\\caption{A box}", "\\label{fig:box}", "\\end{figure}"]);
    }

    #[test]
    fn update_full_without_comments() {
        let mut generator = PstGenerator::new();
        generator.set_comment("hidden");
        generator.set_with_comments(false);
        generator.update_full(&one_rect(Color::WHITE), "").unwrap();
        assert!(!generator.cache().contains("hidden"));
    }

    #[test]
    fn update_full_rejects_invalid_ppc() {
        let mut generator = PstGenerator::new();
        assert_eq!(generator.update_full(&Drawing::new(0.0), ""), Err(NumericError::Zero));
    }

    #[test]
    fn update_full_keeps_modified_flag() {
        let mut generator = PstGenerator::new();
        generator.update_full(&one_rect(Color::WHITE), "").unwrap();
        assert!(!generator.is_modified());
    }
}
