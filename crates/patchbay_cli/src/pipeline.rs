//! Shared pipeline helpers for CLI commands.
//!
//! Project directory lookup, build option merging, parallel patch analysis,
//! include path computation and diagnostic rendering.

use std::path::{Component, Path, PathBuf};

use patchbay_config::{BuildOptions, ProjectConfig, CONFIG_FILE};
use patchbay_diagnostics::{DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use patchbay_patch::{Constants, PatchDescriptor};
use rayon::prelude::*;
use tracing::debug;

use crate::{BuildFlags, GlobalArgs};

/// A loaded project configuration and the directory it was found in.
pub struct Project {
    /// Directory containing `patchbay.toml`.
    pub dir: PathBuf,
    /// The parsed configuration.
    pub config: ProjectConfig,
}

/// Loads `patchbay.toml` from `--config`, or from the current directory when
/// one is present there.
///
/// Returns `None` when no project is in use.
pub fn load_project(global: &GlobalArgs) -> Result<Option<Project>, Box<dyn std::error::Error>> {
    let dir = match &global.config {
        Some(p) if p.is_file() => p
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
        Some(p) => p.clone(),
        None => {
            let cwd = std::env::current_dir()?;
            if !cwd.join(CONFIG_FILE).is_file() {
                return Ok(None);
            }
            cwd
        }
    };
    let config = patchbay_config::load_config(&dir)
        .map_err(|e| format!("config {}: {e}", dir.join(CONFIG_FILE).display()))?;
    debug!(dir = %dir.display(), name = %config.project.name, "loaded project");
    Ok(Some(Project { dir, config }))
}

/// Merges command-line flags over the project's build options.
pub fn merge_options(base: BuildOptions, flags: &BuildFlags) -> BuildOptions {
    BuildOptions {
        samplerate_khz: flags.samplerate.unwrap_or(base.samplerate_khz),
        blocksize: flags.blocksize.unwrap_or(base.blocksize),
        ..base
    }
}

/// Values of `samplerate` and `vectorsize` in patch constant expressions.
pub fn constants(options: &BuildOptions) -> Constants {
    Constants {
        samplerate: f64::from(options.samplerate_hz()),
        vectorsize: f64::from(options.blocksize),
    }
}

/// Reads and analyzes patch sources in parallel, keeping input order.
///
/// Each patch reports into its own sink; the diagnostics are forwarded to
/// `sink` in input order so output does not depend on scheduling. A patch
/// that fails analysis is reported to `sink` as an error and left out of the
/// result. Unreadable files are returned as errors.
pub fn analyze_patches(
    paths: &[PathBuf],
    constants: &Constants,
    sink: &DiagnosticSink,
) -> Result<Vec<PatchDescriptor>, Box<dyn std::error::Error>> {
    let results: Vec<(Result<Option<PatchDescriptor>, String>, DiagnosticSink)> = paths
        .par_iter()
        .map(|path| {
            let local = DiagnosticSink::new();
            let result = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))
                .map(|src| match patchbay_patch::analyze(&src, constants, &local) {
                    Ok(patch) => Some(patch),
                    Err(e) => {
                        local.emit(e.to_diagnostic(path.display().to_string()));
                        None
                    }
                });
            (result, local)
        })
        .collect();

    let mut patches = Vec::with_capacity(results.len());
    for (result, local) in results {
        for d in local.take_all() {
            sink.emit(d);
        }
        patches.extend(result?);
    }
    Ok(patches)
}

fn normalize(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| {
        let mut out = std::env::current_dir().unwrap_or_default();
        out.push(path);
        out
    })
}

/// Path of `path` relative to `base`, with `/` separators, for `#include`.
pub fn include_path(path: &Path, base: &Path) -> String {
    let (path, base) = (normalize(path), normalize(base));
    let from: Vec<Component> = base.components().collect();
    let to: Vec<Component> = path.components().collect();
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<String> = vec!["..".to_string(); from.len() - common];
    parts.extend(
        to[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}

/// Renders all diagnostics from a sink to stderr.
///
/// Returns the number of diagnostics rendered.
pub fn render_diagnostics(sink: &DiagnosticSink, color: bool) -> usize {
    let diagnostics = sink.diagnostics();
    let renderer = TerminalRenderer::new(color);
    for diag in &diagnostics {
        eprint!("{}", renderer.render(diag));
    }
    diagnostics.len()
}
