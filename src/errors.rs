//! Error types with rich diagnostics using miette
//!
//! Export failures are not propagated past the toolchain boundary: they are
//! recorded in a [`FailureCollector`] and the export call returns `None`.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use miette::Diagnostic;
use parking_lot::Mutex;
use thiserror::Error;

// ============================================================================
// Export Errors
// ============================================================================

/// Errors that occur while writing or compiling an exported drawing
#[derive(Error, Diagnostic, Debug)]
pub enum ExportError {
    #[error("invalid export request: {message}")]
    #[diagnostic(code(pstexport::export::invalid_input))]
    InvalidInput { message: String },

    #[error("cannot create a temporary folder")]
    #[diagnostic(code(pstexport::export::temp_dir))]
    TempDir {
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}", path.display())]
    #[diagnostic(code(pstexport::export::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} did not produce {}", artifact.display())]
    #[diagnostic(
        code(pstexport::export::toolchain),
        help("the attempted document and the toolchain log are attached to this record")
    )]
    Toolchain {
        stage: &'static str,
        artifact: PathBuf,
        /// The full LaTeX document that was compiled
        document: String,
        /// Combined output of every external tool invoked so far
        log: String,
    },

    #[error("cannot create the {kind} file at this location: {}", path.display())]
    #[diagnostic(code(pstexport::export::relocate))]
    Relocate {
        kind: &'static str,
        path: PathBuf,
        #[help]
        log: Option<String>,
    },
}

impl ExportError {
    /// The attempted document, for toolchain failures.
    pub fn document(&self) -> Option<&str> {
        match self {
            ExportError::Toolchain { document, .. } => Some(document),
            _ => None,
        }
    }

    /// The captured toolchain log, if any.
    pub fn log(&self) -> Option<&str> {
        match self {
            ExportError::Toolchain { log, .. } => Some(log),
            ExportError::Relocate { log, .. } => log.as_deref(),
            _ => None,
        }
    }
}

// ============================================================================
// Failure Collector
// ============================================================================

/// Collects export failures for later display.
///
/// The toolchain records here instead of returning errors so that an
/// interactive caller stays responsive after a failed export.
#[derive(Debug, Default)]
pub struct FailureCollector {
    records: Mutex<Vec<ExportError>>,
}

impl FailureCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide collector, shared by exporters that are not given one.
    pub fn global() -> Arc<FailureCollector> {
        static GLOBAL: OnceLock<Arc<FailureCollector>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(FailureCollector::new())))
    }

    pub fn add(&self, error: ExportError) {
        crate::log::warn!(%error, "export failure recorded");
        self.records.lock().push(error);
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Take every record, leaving the collector empty.
    pub fn drain(&self) -> Vec<ExportError> {
        std::mem::take(&mut *self.records.lock())
    }

    /// Display text of the most recent record.
    pub fn last_message(&self) -> Option<String> {
        self.records.lock().last().map(ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toolchain_failure() -> ExportError {
        ExportError::Toolchain {
            stage: "latex",
            artifact: PathBuf::from("/tmp/x/drawing.ps"),
            document: "\\documentclass{article}".to_string(),
            log: "! Undefined control sequence.".to_string(),
        }
    }

    #[test]
    fn collector_add_and_drain() {
        let collector = FailureCollector::new();
        assert!(collector.is_empty());

        collector.add(toolchain_failure());
        assert_eq!(collector.len(), 1);
        assert_eq!(
            collector.last_message().as_deref(),
            Some("latex did not produce /tmp/x/drawing.ps")
        );

        let records = collector.drain();
        assert_eq!(records.len(), 1);
        assert!(collector.is_empty());
        assert_eq!(records[0].document(), Some("\\documentclass{article}"));
        assert_eq!(records[0].log(), Some("! Undefined control sequence."));
    }

    #[test]
    fn relocate_exposes_log() {
        let err = ExportError::Relocate {
            kind: "PDF",
            path: PathBuf::from("out.pdf"),
            log: Some("rename failed".to_string()),
        };
        assert_eq!(err.log(), Some("rename failed"));
        assert_eq!(err.document(), None);
        assert_eq!(err.to_string(), "cannot create the PDF file at this location: out.pdf");
    }
}
