//! Reading hardware descriptors from disk.

use crate::compile::compile;
use crate::descriptor::RawDescriptor;
use crate::error::HardwareError;
use crate::model::HardwareDescriptor;
use patchbay_diagnostics::DiagnosticSink;
use std::path::Path;
use tracing::debug;

/// Parses descriptor JSON without compiling it.
pub fn parse_descriptor(json: &str) -> Result<RawDescriptor, HardwareError> {
    Ok(serde_json::from_str(json)?)
}

/// Reads, parses and compiles the descriptor at `path`.
pub fn load_descriptor(
    path: &Path,
    sink: &DiagnosticSink,
) -> Result<HardwareDescriptor, HardwareError> {
    let json = std::fs::read_to_string(path).map_err(|source| HardwareError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = json.len(), "read hardware descriptor");
    let raw = parse_descriptor(&json)?;
    compile(&raw, path.parent(), sink)
}
