//! Export pipelines against a scripted toolchain
//!
//! `FakeTools` stands in for latex, dvips, ps2pdf, pdfcrop and ps2eps: it
//! records every invocation and writes the files the real tool would, unless
//! told to fail.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use pstexport::model::{Fill, ShapeStyle};
use pstexport::toolchain::Invocation;
use pstexport::{
    Color, Drawing, ExportConfig, ExportError, Exporter, FailureCollector, Point, ProcessRunner, PstGenerator,
    Rectangle,
};

#[cfg(feature = "tracing")]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[cfg(not(feature = "tracing"))]
fn init_tracing() {}

// =============================================================================
// Scripted toolchain
// =============================================================================

#[derive(Default)]
struct FakeTools {
    calls: Mutex<Vec<Invocation>>,
    failing: Vec<&'static str>,
}

impl FakeTools {
    fn failing(tool: &'static str) -> Self {
        Self { failing: vec![tool], ..Self::default() }
    }

    fn programs(&self) -> Vec<String> {
        self.calls.lock().iter().map(|inv| inv.program.to_string_lossy().into_owned()).collect()
    }

    fn args_of(&self, program: &str) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .find(|inv| inv.program == program)
            .map(|inv| inv.args.iter().map(|a| a.to_string_lossy().into_owned()).collect())
            .unwrap_or_default()
    }
}

fn write(path: PathBuf, contents: &str) {
    fs::write(path, contents).unwrap();
}

impl ProcessRunner for FakeTools {
    fn run(&self, invocation: &Invocation) -> String {
        self.calls.lock().push(invocation.clone());
        let program = invocation.program.to_string_lossy().into_owned();
        if self.failing.contains(&program.as_str()) {
            return format!("! {program}: Emergency stop.\n");
        }

        let args: Vec<&OsString> = invocation.args.iter().collect();
        let cwd = &invocation.cwd;
        match program.as_str() {
            "latex" => {
                let stem = Path::new(args[2]).file_stem().unwrap().to_string_lossy().into_owned();
                write(cwd.join(format!("{stem}.dvi")), "dvi");
                write(cwd.join(format!("{stem}.log")), "log");
                write(cwd.join(format!("{stem}.aux")), "aux");
            }
            "dvips" => write(cwd.join(args[5]), "%!PS-Adobe-2.0"),
            "ps2pdf" => write(cwd.join(args[2]), "%PDF-1.4"),
            "ps2eps" => write(cwd.join(args[1]), "%!PS-Adobe-2.0 EPSF-2.0"),
            _ => {}
        }
        format!("{program} ok\n")
    }
}

fn box_drawing() -> Drawing {
    let style = ShapeStyle { fill: Fill::plain(Color::WHITE), ..ShapeStyle::default() };
    Drawing::new(20.0)
        .with_shape(Rectangle::new(Point::new(0.0, 0.0), Point::new(40.0, 20.0)).with_style(style))
}

fn exporter(tools: &FakeTools) -> Exporter<&FakeTools> {
    init_tracing();
    Exporter::with_runner(ExportConfig::default(), tools)
        .with_failures(Arc::new(FailureCollector::new()))
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// =============================================================================
// LaTeX
// =============================================================================

#[test]
fn latex_file_of_filled_box() {
    let tools = FakeTools::default();
    let out = tempfile::tempdir().unwrap();
    let path = out.path().join("box.tex");

    let written = exporter(&tools).create_latex_file(&box_drawing(), &mut PstGenerator::new(), &path);
    assert_eq!(written, Some(path.clone()));
    assert!(tools.programs().is_empty());

    let tex = fs::read_to_string(&path).unwrap();
    assert!(tex.contains("fillstyle=solid"));
    assert!(!tex.contains("fillcolor="));
    insta::assert_snapshot!(tex, @r##"
    \documentclass{article}
    \pagestyle{empty}

    \usepackage[left=0cm,top=0.1cm,right=0cm,bottom=0cm,nohead,nofoot,paperwidth=2cm,paperheight=1.2cm]{geometry}
    \usepackage[usenames,dvipsnames]{pstricks}
    \usepackage{epsfig}
    \usepackage{pst-grad}
    \usepackage{pst-plot}
    \usepackage[space]{grffile}
    \usepackage{etoolbox}
    \makeatletter
    \patchcmd\Gread@eps{\@inputcheck#1 }{\@inputcheck"#1"\relax}{}{}
    \makeatother
    \begin{document}
    \addtolength{\oddsidemargin}{-0.2in}
    \addtolength{\evensidemargin}{-0.2in}
    % \usepackage[usenames,dvipsnames]{pstricks}
    % \usepackage{epsfig}
    % \usepackage{pst-grad} % For gradients
    % \usepackage{pst-plot} % For axes
    \psscalebox{1 1} % Change this value to rescale the drawing.
    {
    \begin{pspicture}(0,-1)(2,0)
    \psframe[linecolor=black, linewidth=0.1, dimen=middle, fillstyle=solid](0,-1)(2,0)
    \end{pspicture}
    }

    \end{document}
    "##);
}

#[test]
fn invalid_ppc_is_rejected_without_record() {
    let tools = FakeTools::default();
    let exporter = exporter(&tools);
    assert_eq!(exporter.latex_document(&Drawing::new(-3.0), &mut PstGenerator::new()), None);
    assert!(exporter.failures().is_empty());
}

// =============================================================================
// PostScript
// =============================================================================

#[test]
fn ps_export_runs_latex_then_dvips() {
    let tools = FakeTools::default();
    let out = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let path = out.path().join("drawing.ps");
    let exporter = exporter(&tools);

    let written =
        exporter.create_ps_file(&box_drawing(), &mut PstGenerator::new(), &path, Some(work.path()));
    assert_eq!(written, Some(path.clone()));
    assert_eq!(tools.programs(), ["latex", "dvips"]);
    assert_eq!(
        tools.args_of("dvips"),
        ["-Pdownload35", "-T", "2.2cm,1.2cm", "drawing", "-o", path.to_str().unwrap()]
    );
    assert!(exporter.failures().is_empty());

    // tex, dvi, log and aux are gone
    assert!(dir_entries(work.path()).is_empty());
}

#[test]
fn ps_scale_changes_page_size() {
    let tools = FakeTools::default();
    let out = tempfile::tempdir().unwrap();
    let mut generator = PstGenerator::new();
    generator.set_scale(2.0);

    let path = out.path().join("big.ps");
    assert!(exporter(&tools).create_ps_file(&box_drawing(), &mut generator, &path, None).is_some());
    assert_eq!(tools.args_of("dvips")[2], "4.2cm,2.2cm");
}

#[test]
fn latex_failure_is_recorded_once_with_document() {
    let tools = FakeTools::failing("latex");
    let out = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let path = out.path().join("drawing.ps");
    let exporter = exporter(&tools);

    let written =
        exporter.create_ps_file(&box_drawing(), &mut PstGenerator::new(), &path, Some(work.path()));
    assert_eq!(written, None);
    assert_eq!(tools.programs(), ["latex"]);
    assert!(!path.exists());
    assert!(dir_entries(work.path()).is_empty());

    let records = exporter.failures().drain();
    assert_eq!(records.len(), 1);
    assert!(records[0].document().unwrap().contains("\\begin{pspicture}"));
    assert!(records[0].log().unwrap().contains("Emergency stop"));
}

#[test]
fn dvips_failure_is_recorded_with_stage() {
    let tools = FakeTools::failing("dvips");
    let out = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let path = out.path().join("drawing.ps");
    let exporter = exporter(&tools);

    let written =
        exporter.create_ps_file(&box_drawing(), &mut PstGenerator::new(), &path, Some(work.path()));
    assert_eq!(written, None);
    assert_eq!(tools.programs(), ["latex", "dvips"]);
    assert!(!path.exists());
    // renamed dvi, log and aux are gone too
    assert!(dir_entries(work.path()).is_empty());

    let records = exporter.failures().drain();
    assert_eq!(records.len(), 1);
    assert!(matches!(&records[0], ExportError::Toolchain { stage: "dvips", .. }), "{:?}", records[0]);
    assert!(records[0].log().unwrap().contains("latex ok"));
}

#[test]
fn relative_output_paths_land_in_current_dir() {
    // The only test touching the working directory; every other test uses
    // absolute paths.
    let tools = FakeTools::default();
    let out = tempfile::tempdir().unwrap();
    std::env::set_current_dir(out.path()).unwrap();
    let exporter = exporter(&tools);
    let cwd = std::env::current_dir().unwrap();

    let ps = exporter.create_ps_file(&box_drawing(), &mut PstGenerator::new(), Path::new("rel.ps"), None);
    assert_eq!(ps, Some(cwd.join("rel.ps")));
    assert_eq!(tools.args_of("dvips")[5], cwd.join("rel.ps").to_str().unwrap());

    let pdf = exporter.create_pdf_file(&box_drawing(), &mut PstGenerator::new(), Path::new("rel.pdf"), false);
    assert_eq!(pdf, Some(cwd.join("rel.pdf")));

    let eps = exporter.create_eps_file(&box_drawing(), &mut PstGenerator::new(), Path::new("rel.eps"));
    assert_eq!(eps, Some(cwd.join("rel.eps")));

    assert_eq!(dir_entries(&cwd), ["rel.eps", "rel.pdf", "rel.ps"]);
    assert!(exporter.failures().is_empty());
}

#[test]
fn wrong_extension_has_no_side_effects() {
    let tools = FakeTools::default();
    let out = tempfile::tempdir().unwrap();
    let exporter = exporter(&tools);

    let png = out.path().join("drawing.png");
    assert_eq!(exporter.create_ps_file(&box_drawing(), &mut PstGenerator::new(), &png, None), None);
    assert_eq!(exporter.create_pdf_file(&box_drawing(), &mut PstGenerator::new(), &png, true), None);
    assert_eq!(exporter.create_eps_file(&box_drawing(), &mut PstGenerator::new(), &png), None);

    assert!(tools.programs().is_empty());
    assert!(exporter.failures().is_empty());
    assert!(dir_entries(out.path()).is_empty());
}

// =============================================================================
// EPS
// =============================================================================

#[test]
fn eps_export_goes_through_ps2eps() {
    let tools = FakeTools::default();
    let out = tempfile::tempdir().unwrap();
    let path = out.path().join("figure.eps");
    let exporter = exporter(&tools);

    let written = exporter.create_eps_file(&box_drawing(), &mut PstGenerator::new(), &path);
    assert_eq!(written, Some(path.clone()));
    assert_eq!(tools.programs(), ["latex", "dvips", "ps2eps"]);
    assert_eq!(tools.args_of("dvips")[3], "tmpPSFile");
    assert_eq!(fs::read_to_string(&path).unwrap(), "%!PS-Adobe-2.0 EPSF-2.0");
    assert_eq!(dir_entries(out.path()), ["figure.eps"]);
}

#[test]
fn eps_failure_names_ps2eps() {
    let tools = FakeTools::failing("ps2eps");
    let out = tempfile::tempdir().unwrap();
    let path = out.path().join("figure.eps");
    let exporter = exporter(&tools);

    assert_eq!(exporter.create_eps_file(&box_drawing(), &mut PstGenerator::new(), &path), None);
    assert_eq!(exporter.failures().len(), 1);
    let message = exporter.failures().last_message().unwrap();
    assert!(message.starts_with("ps2eps did not produce"), "{message}");
}

// =============================================================================
// PDF
// =============================================================================

#[test]
fn pdf_export_without_crop_writes_destination_directly() {
    let tools = FakeTools::default();
    let out = tempfile::tempdir().unwrap();
    let path = out.path().join("drawing.pdf");
    let exporter = exporter(&tools);

    let written = exporter.create_pdf_file(&box_drawing(), &mut PstGenerator::new(), &path, false);
    assert_eq!(written, Some(path.clone()));
    assert_eq!(tools.programs(), ["latex", "dvips", "ps2pdf"]);

    let ps2pdf = tools.args_of("ps2pdf");
    assert_eq!(ps2pdf[0], "-dEmbedAllFonts=true");
    assert!(ps2pdf[1].ends_with("drawing.ps"));
    assert_eq!(ps2pdf[2], path.to_str().unwrap());
}

#[test]
fn pdf_export_with_crop_moves_cropped_file() {
    let tools = FakeTools::default();
    let out = tempfile::tempdir().unwrap();
    let path = out.path().join("drawing.pdf");
    let exporter = exporter(&tools);

    let written = exporter.create_pdf_file(&box_drawing(), &mut PstGenerator::new(), &path, true);
    assert_eq!(written, Some(path.clone()));
    assert_eq!(tools.programs(), ["latex", "dvips", "ps2pdf", "pdfcrop"]);
    assert_eq!(tools.args_of("ps2pdf")[2], "drawing.pdf");

    let crop = tools.args_of("pdfcrop");
    assert_eq!(crop[0], crop[1]);
    assert!(crop[0].ends_with("drawing.pdf"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "%PDF-1.4");
    assert!(exporter.failures().is_empty());
}

#[test]
fn pdf_crop_failure_explains_move() {
    let tools = FakeTools::failing("ps2pdf");
    let out = tempfile::tempdir().unwrap();
    let path = out.path().join("drawing.pdf");
    let exporter = exporter(&tools);

    assert_eq!(exporter.create_pdf_file(&box_drawing(), &mut PstGenerator::new(), &path, true), None);

    let records = exporter.failures().drain();
    assert_eq!(records.len(), 1);
    let log = records[0].log().unwrap();
    assert!(log.contains("ps2pdf: Emergency stop"));
    assert!(log.contains("cannot be moved to its final destination"));
    assert!(records[0].document().is_some());
}
