//! Error types for hardware descriptor loading and compilation.
//!
//! Each variant carries a stable `E2xx` code for the diagnostic stream.

use patchbay_common::TemplateError;
use patchbay_diagnostics::{Category, Diagnostic, DiagnosticCode};
use std::path::PathBuf;

/// The descriptor file cannot be read.
pub const E201: DiagnosticCode = DiagnosticCode::new(Category::Error, 201);

/// The descriptor is not valid JSON of the expected shape.
pub const E202: DiagnosticCode = DiagnosticCode::new(Category::Error, 202);

/// Unknown SOM.
pub const E203: DiagnosticCode = DiagnosticCode::new(Category::Error, 203);

/// Unknown component kind.
pub const E204: DiagnosticCode = DiagnosticCode::new(Category::Error, 204);

/// A component does not name its kind.
pub const E205: DiagnosticCode = DiagnosticCode::new(Category::Error, 205);

/// A catalog or descriptor template is malformed.
pub const E206: DiagnosticCode = DiagnosticCode::new(Category::Error, 206);

/// Two signals share a name.
pub const E207: DiagnosticCode = DiagnosticCode::new(Category::Error, 207);

/// Errors that abort hardware model compilation.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// The descriptor file could not be read.
    #[error("cannot read hardware descriptor {}: {source}", path.display())]
    Io {
        /// The descriptor path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The descriptor is not valid JSON or does not have the expected shape.
    #[error("invalid hardware descriptor: {0}")]
    Parse(#[from] serde_json::Error),

    /// The `som` field names an unsupported module.
    #[error("unknown SOM `{0}` (supported: seed, patch_sm)")]
    UnknownSom(String),

    /// A component names a kind outside the catalog.
    #[error("unknown component kind `{0}`")]
    UnknownComponentKind(String),

    /// A component has no `component` field.
    #[error("component `{component}` does not name its kind")]
    MissingKind {
        /// The component instance name.
        component: String,
    },

    /// A catalog or descriptor template could not be rendered.
    #[error("malformed template `{field}` in `{component}`: {source}")]
    MalformedTemplate {
        /// The component or signal the template belongs to.
        component: String,
        /// The template field, e.g. `map_init` or `mapping[1].set`.
        field: String,
        /// The template error.
        #[source]
        source: TemplateError,
    },

    /// Two signals in the same namespace share a name.
    #[error("duplicate {namespace} signal `{name}`")]
    DuplicateSignal {
        /// `input` or `output`.
        namespace: &'static str,
        /// The repeated signal name.
        name: String,
    },
}

impl HardwareError {
    /// The diagnostic code reported for this error.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            HardwareError::Io { .. } => E201,
            HardwareError::Parse(_) => E202,
            HardwareError::UnknownSom(_) => E203,
            HardwareError::UnknownComponentKind(_) => E204,
            HardwareError::MissingKind { .. } => E205,
            HardwareError::MalformedTemplate { .. } => E206,
            HardwareError::DuplicateSignal { .. } => E207,
        }
    }

    /// This error as a diagnostic about the descriptor at `origin`.
    pub fn to_diagnostic(&self, origin: impl Into<String>) -> Diagnostic {
        Diagnostic::error(self.code(), self.to_string()).with_origin(origin)
    }
}
