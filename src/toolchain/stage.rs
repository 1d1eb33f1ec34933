//! External tool stages
//!
//! Each stage is plain data: what it reads, how the tool is invoked and what
//! it should produce. Running the invocation is left to a
//! [`ProcessRunner`](super::ProcessRunner), so argument building is testable
//! without any TeX installation.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::model::Drawing;
use crate::types::Cm;

/// Padding added around the picture on the PostScript page, in centimetres.
const PAGE_PADDING: f64 = 0.2;

/// One external process call: program, argument array, working directory.
///
/// Arguments are never joined into a shell string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(program: impl Into<OsString>, cwd: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), args: Vec::new(), cwd: cwd.into() }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Human readable command line, for logs only.
    pub fn display(&self) -> String {
        let mut out = self.program.to_string_lossy().into_owned();
        for arg in &self.args {
            out.push(' ');
            out.push_str(&arg.to_string_lossy());
        }
        out
    }
}

/// A file a stage is expected to leave behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub exists: bool,
}

impl Artifact {
    /// Look at `path` on disk.
    pub fn probe(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let exists = path.is_file();
        Self { path, exists }
    }
}

/// Conventions of the host the tools run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Posix,
    /// Ghostscript options are written `-name#value`
    Windows,
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) { Platform::Windows } else { Platform::Posix }
    }

    /// Separator between a Ghostscript option and its value.
    pub fn option_assign(self) -> char {
        match self {
            Platform::Posix => '=',
            Platform::Windows => '#',
        }
    }
}

/// Path text as LaTeX expects it: forward slashes only.
pub fn normalize_for_latex(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Common shape of all stages.
pub trait Stage {
    /// Tool name, used in failure records.
    fn name(&self) -> &'static str;

    /// Files that must exist before running.
    fn requires(&self) -> Vec<PathBuf>;

    fn invocation(&self, binary: &OsStr) -> Invocation;

    /// The file the tool should create.
    fn produces(&self) -> PathBuf;
}

// ============================================================================
// latex
// ============================================================================

/// `.tex` to `.dvi` in batch mode.
#[derive(Debug, Clone)]
pub struct LatexStage {
    pub tmp_dir: PathBuf,
    pub tex_file: PathBuf,
}

impl LatexStage {
    fn stem(&self) -> OsString {
        self.tex_file.file_stem().map(OsStr::to_os_string).unwrap_or_default()
    }
}

impl Stage for LatexStage {
    fn name(&self) -> &'static str {
        "latex"
    }

    fn requires(&self) -> Vec<PathBuf> {
        vec![self.tex_file.clone()]
    }

    fn invocation(&self, binary: &OsStr) -> Invocation {
        let mut output_dir = OsString::from("--output-directory=");
        output_dir.push(self.tmp_dir.as_os_str());

        Invocation::new(binary, &self.tmp_dir)
            .arg("--interaction=nonstopmode")
            .arg(output_dir)
            .arg(normalize_for_latex(&self.tex_file))
    }

    fn produces(&self) -> PathBuf {
        let mut dvi = self.stem();
        dvi.push(".dvi");
        self.tmp_dir.join(dvi)
    }
}

// ============================================================================
// dvips
// ============================================================================

/// PostScript page size in centimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: Cm,
    pub height: Cm,
}

impl PageSize {
    /// Bounds of `drawing` scaled, plus padding.
    pub fn from_drawing(drawing: &Drawing, scale: f64) -> Self {
        let tr = drawing.top_right();
        let bl = drawing.bottom_left();
        let ppc = drawing.ppc();
        Self {
            width: Cm((tr.x - bl.x) / ppc * scale + PAGE_PADDING),
            height: Cm((bl.y - tr.y) / ppc * scale + PAGE_PADDING),
        }
    }

    /// The `-T` argument of dvips.
    pub fn dvips_arg(&self) -> String {
        format!("{}cm,{}cm", self.width, self.height)
    }
}

/// `.dvi` to `.ps`. The dvi is renamed without extension before this runs.
#[derive(Debug, Clone)]
pub struct DvipsStage {
    pub tmp_dir: PathBuf,
    /// Extension-less dvi name, relative to `tmp_dir`
    pub name: OsString,
    pub page: PageSize,
    pub output: PathBuf,
}

impl Stage for DvipsStage {
    fn name(&self) -> &'static str {
        "dvips"
    }

    fn requires(&self) -> Vec<PathBuf> {
        vec![self.tmp_dir.join(&self.name)]
    }

    fn invocation(&self, binary: &OsStr) -> Invocation {
        Invocation::new(binary, &self.tmp_dir)
            .arg("-Pdownload35")
            .arg("-T")
            .arg(self.page.dvips_arg())
            .arg(&self.name)
            .arg("-o")
            .arg(&self.output)
    }

    fn produces(&self) -> PathBuf {
        self.tmp_dir.join(&self.output)
    }
}

// ============================================================================
// ps2pdf / pdfcrop
// ============================================================================

/// `.ps` to `.pdf` with every font embedded.
#[derive(Debug, Clone)]
pub struct Ps2PdfStage {
    pub tmp_dir: PathBuf,
    pub ps_file: PathBuf,
    /// Absolute, or relative to `tmp_dir`
    pub output: PathBuf,
    pub platform: Platform,
}

impl Stage for Ps2PdfStage {
    fn name(&self) -> &'static str {
        "ps2pdf"
    }

    fn requires(&self) -> Vec<PathBuf> {
        vec![self.ps_file.clone()]
    }

    fn invocation(&self, binary: &OsStr) -> Invocation {
        Invocation::new(binary, &self.tmp_dir)
            .arg(format!("-dEmbedAllFonts{}true", self.platform.option_assign()))
            .arg(&self.ps_file)
            .arg(&self.output)
    }

    fn produces(&self) -> PathBuf {
        self.tmp_dir.join(&self.output)
    }
}

/// Crops a pdf in place.
#[derive(Debug, Clone)]
pub struct PdfCropStage {
    pub tmp_dir: PathBuf,
    pub pdf_file: PathBuf,
}

impl Stage for PdfCropStage {
    fn name(&self) -> &'static str {
        "pdfcrop"
    }

    fn requires(&self) -> Vec<PathBuf> {
        vec![self.pdf_file.clone()]
    }

    fn invocation(&self, binary: &OsStr) -> Invocation {
        Invocation::new(binary, &self.tmp_dir).arg(&self.pdf_file).arg(&self.pdf_file)
    }

    fn produces(&self) -> PathBuf {
        self.pdf_file.clone()
    }
}

// ============================================================================
// ps2eps
// ============================================================================

#[derive(Debug, Clone)]
pub struct Ps2EpsStage {
    pub tmp_dir: PathBuf,
    pub ps_file: PathBuf,
    pub eps_file: PathBuf,
}

impl Stage for Ps2EpsStage {
    fn name(&self) -> &'static str {
        "ps2eps"
    }

    fn requires(&self) -> Vec<PathBuf> {
        vec![self.ps_file.clone()]
    }

    fn invocation(&self, binary: &OsStr) -> Invocation {
        Invocation::new(binary, &self.tmp_dir).arg(&self.ps_file).arg(&self.eps_file)
    }

    fn produces(&self) -> PathBuf {
        self.eps_file.clone()
    }
}
