//! Conformance test helpers for the patchbay compiler.
//!
//! Runs patch sources and a hardware descriptor through the whole pipeline
//! (analyze, compile, wire, emit) in memory and returns structured results
//! for assertion in integration tests. [`fixtures`] holds the exported
//! patches and descriptors the tests share.

#![warn(missing_docs)]

pub mod fixtures;

use std::path::PathBuf;

use patchbay_config::BuildOptions;
use patchbay_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Severity};
use patchbay_emit::{emit, order_patches, AppSource, Artifact, EmitError};
use patchbay_hardware::{compile, parse_descriptor, HardwareDescriptor, HardwareError};
use patchbay_patch::{analyze, Constants, PatchError};
use patchbay_wiring::{resolve, App, WiringError};

/// A failure of one pipeline stage.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The hardware descriptor did not compile.
    #[error("hardware: {0}")]
    Hardware(#[from] HardwareError),

    /// A patch source could not be analyzed.
    #[error("patch `{file}`: {source}")]
    Patch {
        /// The patch file name.
        file: String,
        /// The analyzer error.
        #[source]
        source: PatchError,
    },

    /// A patch could not be wired to the target.
    #[error("wiring `{app}`: {source}")]
    Wiring {
        /// The patch name.
        app: String,
        /// The resolver error.
        #[source]
        source: WiringError,
    },

    /// The build unit could not be rendered.
    #[error("emit: {0}")]
    Emit(#[from] EmitError),
}

impl PipelineError {
    /// The stage's diagnostic code for this failure (`E1xx` to `E4xx`).
    pub fn code(&self) -> DiagnosticCode {
        match self {
            PipelineError::Hardware(e) => e.code(),
            PipelineError::Patch { source, .. } => source.code(),
            PipelineError::Wiring { source, .. } => source.code(),
            PipelineError::Emit(e) => e.code(),
        }
    }

    /// This failure as an error diagnostic, with the patch file or app name
    /// as its origin where the stage knows one.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            PipelineError::Hardware(e) => Diagnostic::error(e.code(), e.to_string()),
            PipelineError::Patch { file, source } => source.to_diagnostic(file.as_str()),
            PipelineError::Wiring { app, source } => source.to_diagnostic(app.as_str()),
            PipelineError::Emit(e) => Diagnostic::error(e.code(), e.to_string()),
        }
    }
}

/// Result of running the full pipeline.
pub struct PipelineResult {
    /// The compiled hardware model.
    pub hardware: HardwareDescriptor,
    /// The wired apps, in build order.
    pub apps: Vec<App>,
    /// The rendered build.
    pub artifact: Artifact,
    /// Warnings emitted during the pipeline. Fatal failures are returned as
    /// [`PipelineError`] instead.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

impl PipelineResult {
    /// The generated main translation unit.
    pub fn source(&self) -> &str {
        &self.artifact.main_source
    }

    /// Finds a wired app by name.
    pub fn app(&self, name: &str) -> Option<&App> {
        self.apps.iter().find(|a| a.name == name)
    }

    /// Whether a diagnostic with the given code string (e.g. `W301`) was emitted.
    pub fn has_code(&self, code: &str) -> bool {
        self.diagnostics.iter().any(|d| d.code.to_string() == code)
    }
}

/// Compiles a descriptor from JSON text.
pub fn hardware(json: &str) -> Result<HardwareDescriptor, PipelineError> {
    let raw = parse_descriptor(json)?;
    Ok(compile(&raw, None, &DiagnosticSink::new())?)
}

/// Runs the full pipeline with default build options.
///
/// `sources` pairs a file name with the exported patch text.
pub fn full_pipeline(
    target: &str,
    descriptor: &str,
    sources: &[(&str, &str)],
) -> Result<PipelineResult, PipelineError> {
    run_pipeline(target, descriptor, sources, &BuildOptions::default())
}

/// Runs the full pipeline: compile the descriptor, order the patches,
/// analyze, wire and emit.
///
/// Patches are included by file name.
pub fn run_pipeline(
    target: &str,
    descriptor: &str,
    sources: &[(&str, &str)],
    options: &BuildOptions,
) -> Result<PipelineResult, PipelineError> {
    let sink = DiagnosticSink::new();
    let raw = parse_descriptor(descriptor)?;
    let hw = compile(&raw, None, &sink)?;

    let files: Vec<PathBuf> = sources.iter().map(|(f, _)| PathBuf::from(f)).collect();
    let ordered = order_patches(&files, hw.max_apps, &sink);
    let constants = Constants {
        samplerate: f64::from(options.samplerate_hz()),
        vectorsize: f64::from(options.blocksize),
    };

    let mut apps = Vec::with_capacity(ordered.len());
    let mut includes = Vec::with_capacity(ordered.len());
    for path in &ordered {
        let file = path.to_string_lossy().into_owned();
        let text = sources
            .iter()
            .find(|(f, _)| *f == file)
            .map(|(_, t)| *t)
            .unwrap_or_default();
        let patch = analyze(text, &constants, &sink).map_err(|source| PipelineError::Patch {
            file: file.clone(),
            source,
        })?;
        let app = resolve(&patch, &hw, &sink).map_err(|source| PipelineError::Wiring {
            app: patch.name.clone(),
            source,
        })?;
        apps.push(app);
        includes.push(file);
    }

    let refs: Vec<AppSource<'_>> = apps
        .iter()
        .zip(&includes)
        .map(|(app, include)| AppSource { app, include })
        .collect();
    let artifact = emit(target, &hw, options, &refs)?;

    let diagnostics = sink.take_all();
    let warning_count = diagnostics.iter().filter(|d| d.severity == Severity::Warning).count();
    Ok(PipelineResult {
        hardware: hw,
        apps,
        artifact,
        diagnostics,
        warning_count,
    })
}
