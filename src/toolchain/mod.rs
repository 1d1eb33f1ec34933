//! Export to `.tex`, `.ps`, `.eps` and `.pdf` through the TeX toolchain
//!
//! Every export method returns the written path, or `None` after recording
//! the failure in the exporter's [`FailureCollector`]. Intermediate files are
//! removed on every exit path; only the requested file survives.

mod runner;
pub mod stage;

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

pub use runner::{ProcessRunner, SystemRunner};
pub use stage::{
    Artifact, DvipsStage, Invocation, LatexStage, PageSize, PdfCropStage, Platform, Ps2EpsStage,
    Ps2PdfStage, Stage,
};

use crate::document;
use crate::errors::{ExportError, FailureCollector};
use crate::log::{debug, info, warn};
use crate::model::Drawing;
use crate::pst::PstGenerator;

/// Name of the intermediate PostScript file of an EPS export.
const EPS_TMP_PS: &str = "tmpPSFile.ps";

/// Appended to the log when a cropped pdf cannot reach its destination.
const PDF_MOVE_FAILED: &str = " The final pdf document cannot be moved to its final destination. \
If you use Windows, you must have a Perl interpreter installed, such as strawberryPerl (http://strawberryperl.com/)";

// ============================================================================
// Configuration
// ============================================================================

/// External binaries and how to run them.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolchainConfig {
    pub latex: OsString,
    pub dvips: OsString,
    pub ps2pdf: OsString,
    pub pdfcrop: OsString,
    pub ps2eps: OsString,
    pub platform: Platform,
    /// Limit per tool run; `None` waits forever
    pub timeout: Option<Duration>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            latex: "latex".into(),
            dvips: "dvips".into(),
            ps2pdf: "ps2pdf".into(),
            pdfcrop: "pdfcrop".into(),
            ps2eps: "ps2eps".into(),
            platform: Platform::current(),
            timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl ToolchainConfig {
    /// Defaults, with binaries overridden by `PSTEXPORT_LATEX`,
    /// `PSTEXPORT_DVIPS`, `PSTEXPORT_PS2PDF`, `PSTEXPORT_PDFCROP` and
    /// `PSTEXPORT_PS2EPS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let mut config = Self::default();
        let fields: [(&str, &mut OsString); 5] = [
            ("PSTEXPORT_LATEX", &mut config.latex),
            ("PSTEXPORT_DVIPS", &mut config.dvips),
            ("PSTEXPORT_PS2PDF", &mut config.ps2pdf),
            ("PSTEXPORT_PDFCROP", &mut config.pdfcrop),
            ("PSTEXPORT_PS2EPS", &mut config.ps2eps),
        ];
        for (key, field) in fields {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *field = value;
            }
        }
        config
    }

    pub fn with_latex(mut self, binary: impl Into<OsString>) -> Self {
        self.latex = binary.into();
        self
    }

    pub fn with_dvips(mut self, binary: impl Into<OsString>) -> Self {
        self.dvips = binary.into();
        self
    }

    pub fn with_ps2pdf(mut self, binary: impl Into<OsString>) -> Self {
        self.ps2pdf = binary.into();
        self
    }

    pub fn with_pdfcrop(mut self, binary: impl Into<OsString>) -> Self {
        self.pdfcrop = binary.into();
        self
    }

    pub fn with_ps2eps(mut self, binary: impl Into<OsString>) -> Self {
        self.ps2eps = binary.into();
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Everything an export needs besides the drawing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExportConfig {
    /// Extra preamble lines of the standalone document
    pub packages: String,
    pub toolchain: ToolchainConfig,
}

impl ExportConfig {
    pub fn with_packages(mut self, packages: impl Into<String>) -> Self {
        self.packages = packages.into();
        self
    }

    pub fn with_toolchain(mut self, toolchain: ToolchainConfig) -> Self {
        self.toolchain = toolchain;
        self
    }
}

// ============================================================================
// Exporter
// ============================================================================

/// A PostScript file written by the first stages, plus what produced it.
struct PsOutput {
    path: PathBuf,
    document: String,
    log: String,
}

/// Drives the toolchain for one drawing at a time.
pub struct Exporter<R: ProcessRunner = SystemRunner> {
    runner: R,
    config: ExportConfig,
    failures: Arc<FailureCollector>,
}

impl Exporter<SystemRunner> {
    /// Exporter running real processes, recording into the global collector.
    pub fn new(config: ExportConfig) -> Self {
        let runner = SystemRunner::new(config.toolchain.timeout);
        Self::with_runner(config, runner)
    }
}

impl<R: ProcessRunner> Exporter<R> {
    pub fn with_runner(config: ExportConfig, runner: R) -> Self {
        Self { runner, config, failures: FailureCollector::global() }
    }

    /// Record failures into `failures` instead of the global collector.
    pub fn with_failures(mut self, failures: Arc<FailureCollector>) -> Self {
        self.failures = failures;
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn failures(&self) -> &Arc<FailureCollector> {
        &self.failures
    }

    /// The standalone LaTeX document of `drawing`.
    pub fn latex_document(&self, drawing: &Drawing, generator: &mut PstGenerator) -> Option<String> {
        self.finish(self.document(drawing, generator))
    }

    /// Write the standalone document to `path`.
    pub fn create_latex_file(
        &self,
        drawing: &Drawing,
        generator: &mut PstGenerator,
        path: &Path,
    ) -> Option<PathBuf> {
        let result = self
            .document(drawing, generator)
            .and_then(|doc| write_file(path, &doc).map(|()| path.to_path_buf()));
        self.finish(result)
    }

    /// Compile `drawing` to the PostScript file `path`.
    ///
    /// Runs in `tmp_dir` when given, else in a temporary directory removed
    /// afterwards.
    pub fn create_ps_file(
        &self,
        drawing: &Drawing,
        generator: &mut PstGenerator,
        path: &Path,
        tmp_dir: Option<&Path>,
    ) -> Option<PathBuf> {
        let result = require_extension(path, "ps").and_then(|()| {
            let path = &absolute(path)?;
            let owned;
            let dir = match tmp_dir {
                Some(dir) => dir,
                None => {
                    owned = temp_dir()?;
                    owned.path()
                }
            };
            self.ps_file(drawing, generator, path, dir).map(|ps| ps.path)
        });
        self.finish(result)
    }

    /// Compile `drawing` to the encapsulated PostScript file `path`.
    pub fn create_eps_file(
        &self,
        drawing: &Drawing,
        generator: &mut PstGenerator,
        path: &Path,
    ) -> Option<PathBuf> {
        let result = require_extension(path, "eps").and_then(|()| {
            let path = &absolute(path)?;
            let tmp = temp_dir()?;
            self.eps_file(drawing, generator, path, tmp.path())
        });
        self.finish(result)
    }

    /// Compile `drawing` to the pdf file `path`, optionally cropped to the
    /// picture.
    pub fn create_pdf_file(
        &self,
        drawing: &Drawing,
        generator: &mut PstGenerator,
        path: &Path,
        crop: bool,
    ) -> Option<PathBuf> {
        let result = require_extension(path, "pdf").and_then(|()| {
            let path = &absolute(path)?;
            let tmp = temp_dir()?;
            self.pdf_file(drawing, generator, path, crop, tmp.path())
        });
        self.finish(result)
    }

    // ========================================================================
    // Pipelines
    // ========================================================================

    fn document(&self, drawing: &Drawing, generator: &mut PstGenerator) -> Result<String, ExportError> {
        document::latex_document(drawing, generator, &self.config.packages).map_err(|err| {
            ExportError::InvalidInput { message: format!("pixels per centimetre: {err}") }
        })
    }

    fn run(&self, stage: &impl Stage, binary: &OsStr) -> String {
        for input in stage.requires() {
            if !input.is_file() {
                warn!(stage = stage.name(), input = %input.display(), "stage input missing");
            }
        }
        let invocation = stage.invocation(binary);
        debug!(stage = stage.name(), command = %invocation.display(), "toolchain stage");
        self.runner.run(&invocation)
    }

    /// tex, then dvi, then ps at `path`.
    fn ps_file(
        &self,
        drawing: &Drawing,
        generator: &mut PstGenerator,
        path: &Path,
        dir: &Path,
    ) -> Result<PsOutput, ExportError> {
        let name = file_stem(path)?;
        let document = self.document(drawing, generator)?;
        debug!(
            page = %document::describe(&document::DocumentLayout::from_drawing(drawing, generator.scale())),
            "compiling picture"
        );

        let tex_file = dir.join(with_extension(&name, "tex"));
        let dvi_renamed = dir.join(&name);
        let _scratch = Scratch(vec![
            tex_file.clone(),
            dir.join(with_extension(&name, "dvi")),
            dvi_renamed.clone(),
            dir.join(with_extension(&name, "log")),
            dir.join(with_extension(&name, "aux")),
        ]);

        write_file(&tex_file, &document)?;

        let latex = LatexStage { tmp_dir: dir.to_path_buf(), tex_file };
        let mut log = self.run(&latex, &self.config.toolchain.latex);

        let dvi = Artifact::probe(latex.produces());
        if !dvi.exists || fs::rename(&dvi.path, &dvi_renamed).is_err() {
            return Err(ExportError::Toolchain {
                stage: latex.name(),
                artifact: dvi.path,
                document,
                log,
            });
        }

        let dvips = DvipsStage {
            tmp_dir: dir.to_path_buf(),
            name,
            page: PageSize::from_drawing(drawing, generator.scale()),
            output: path.to_path_buf(),
        };
        log.push_str(&self.run(&dvips, &self.config.toolchain.dvips));

        let ps = Artifact::probe(dvips.produces());
        if !ps.exists {
            return Err(ExportError::Toolchain { stage: dvips.name(), artifact: ps.path, document, log });
        }

        Ok(PsOutput { path: ps.path, document, log })
    }

    fn eps_file(
        &self,
        drawing: &Drawing,
        generator: &mut PstGenerator,
        path: &Path,
        dir: &Path,
    ) -> Result<PathBuf, ExportError> {
        let ps_path = dir.join(EPS_TMP_PS);
        let eps_path = ps_path.with_extension("eps");
        let _scratch = Scratch(vec![ps_path.clone(), eps_path.clone()]);

        let ps = self.ps_file(drawing, generator, &ps_path, dir)?;
        let ps2eps = Ps2EpsStage { tmp_dir: dir.to_path_buf(), ps_file: ps.path, eps_file: eps_path };
        let log = ps.log + &self.run(&ps2eps, &self.config.toolchain.ps2eps);

        let eps = Artifact::probe(ps2eps.produces());
        if !eps.exists {
            return Err(ExportError::Toolchain {
                stage: ps2eps.name(),
                artifact: eps.path,
                document: ps.document,
                log,
            });
        }

        if fs::copy(&eps.path, path).is_err() || !Artifact::probe(path).exists {
            return Err(ExportError::Relocate { kind: "EPS", path: path.to_path_buf(), log: None });
        }
        Ok(path.to_path_buf())
    }

    fn pdf_file(
        &self,
        drawing: &Drawing,
        generator: &mut PstGenerator,
        path: &Path,
        crop: bool,
        dir: &Path,
    ) -> Result<PathBuf, ExportError> {
        let name = file_stem(path)?;
        let ps_path = dir.join(with_extension(&name, "ps"));
        let cropped = PathBuf::from(with_extension(&name, "pdf"));
        let _scratch = Scratch(vec![ps_path.clone(), dir.join(&cropped)]);

        let ps = self.ps_file(drawing, generator, &ps_path, dir)?;
        let ps2pdf = Ps2PdfStage {
            tmp_dir: dir.to_path_buf(),
            ps_file: ps.path,
            output: if crop { cropped } else { path.to_path_buf() },
            platform: self.config.toolchain.platform,
        };
        let mut log = ps.log + &self.run(&ps2pdf, &self.config.toolchain.ps2pdf);
        let mut stage = ps2pdf.name();

        if crop {
            let pdfcrop = PdfCropStage { tmp_dir: dir.to_path_buf(), pdf_file: ps2pdf.produces() };
            log.push_str(&self.run(&pdfcrop, &self.config.toolchain.pdfcrop));
            stage = pdfcrop.name();

            if !relocate(&pdfcrop.produces(), path) {
                log.push_str(PDF_MOVE_FAILED);
            }
        }

        let pdf = Artifact::probe(path);
        if !pdf.exists {
            return Err(ExportError::Toolchain { stage, artifact: pdf.path, document: ps.document, log });
        }
        Ok(pdf.path)
    }

    /// Turn a pipeline result into the public `Option`, recording failures.
    ///
    /// Invalid requests are only logged: they have no side effects to report.
    fn finish<T>(&self, result: Result<T, ExportError>) -> Option<T> {
        match result {
            Ok(value) => {
                info!("export done");
                Some(value)
            }
            Err(_err @ ExportError::InvalidInput { .. }) => {
                warn!(err = %_err, "export request rejected");
                None
            }
            Err(err) => {
                self.failures.add(err);
                None
            }
        }
    }
}

// ============================================================================
// File helpers
// ============================================================================

/// Files removed when dropped, whatever happened in between.
struct Scratch(Vec<PathBuf>);

impl Drop for Scratch {
    fn drop(&mut self) {
        for path in &self.0 {
            if path.is_file() {
                let _ = fs::remove_file(path);
            }
        }
    }
}

fn temp_dir() -> Result<TempDir, ExportError> {
    tempfile::Builder::new()
        .prefix("pstexport")
        .tempdir()
        .map_err(|source| ExportError::TempDir { source })
}

fn require_extension(path: &Path, extension: &str) -> Result<(), ExportError> {
    if path.extension() == Some(OsStr::new(extension)) {
        Ok(())
    } else {
        Err(ExportError::InvalidInput {
            message: format!("{} does not end with .{extension}", path.display()),
        })
    }
}

fn file_stem(path: &Path) -> Result<OsString, ExportError> {
    path.file_stem()
        .filter(|stem| !stem.is_empty())
        .map(OsStr::to_os_string)
        .ok_or_else(|| ExportError::InvalidInput {
            message: format!("{} has no file name", path.display()),
        })
}

/// `path` made absolute against the current directory.
///
/// Tools run inside the temp directory, so a relative output path would land
/// there and vanish with it.
fn absolute(path: &Path) -> Result<PathBuf, ExportError> {
    std::path::absolute(path).map_err(|source| ExportError::Io { path: path.to_path_buf(), source })
}

fn with_extension(name: &OsStr, extension: &str) -> OsString {
    let mut out = name.to_os_string();
    out.push(".");
    out.push(extension);
    out
}

/// Write `contents` to `path`, leaving no partial file on failure.
fn write_file(path: &Path, contents: &str) -> Result<(), ExportError> {
    fs::write(path, contents).map_err(|source| {
        let _ = fs::remove_file(path);
        ExportError::Io { path: path.to_path_buf(), source }
    })
}

/// Move `from` to `to`, copying when a rename is not possible.
fn relocate(from: &Path, to: &Path) -> bool {
    relocate_with(from, to, |from, to| fs::rename(from, to))
}

fn relocate_with(from: &Path, to: &Path, rename: impl Fn(&Path, &Path) -> io::Result<()>) -> bool {
    if rename(from, to).is_ok() {
        return true;
    }
    if fs::copy(from, to).is_ok() {
        let _ = fs::remove_file(from);
        return true;
    }
    false
}
