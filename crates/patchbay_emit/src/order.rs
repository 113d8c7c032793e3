//! Selection and ordering of the patches in a multi-app build.

use patchbay_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use std::path::{Path, PathBuf};
use tracing::debug;

/// More patches were given than the target can hold.
pub const W401: DiagnosticCode = DiagnosticCode::new(Category::Warning, 401);

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Orders the patches of a build.
///
/// Duplicate paths are dropped, the rest sorted by file name, and the list
/// truncated to `max_apps` with a warning naming the patches left out.
pub fn order_patches(paths: &[PathBuf], max_apps: usize, sink: &DiagnosticSink) -> Vec<PathBuf> {
    let mut ordered: Vec<PathBuf> = Vec::with_capacity(paths.len());
    for p in paths {
        if !ordered.contains(p) {
            ordered.push(p.clone());
        }
    }
    ordered.sort_by_cached_key(|p| basename(p));

    let limit = max_apps.max(1);
    if ordered.len() > limit {
        let dropped: Vec<String> = ordered[limit..].iter().map(|p| basename(p)).collect();
        sink.emit(
            Diagnostic::warning(
                W401,
                format!("target holds at most {limit} app(s); ignoring {}", dropped.join(", ")),
            )
            .with_help("remove patches from the build or pick a target with more app slots"),
        );
        ordered.truncate(limit);
    }
    debug!(count = ordered.len(), "ordered patches");
    ordered
}
