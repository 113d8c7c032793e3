//! Error types for code emission.

use patchbay_common::TemplateError;
use patchbay_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// A descriptor code template failed to render.
pub const E401: DiagnosticCode = DiagnosticCode::new(Category::Error, 401);

/// The build has no apps.
pub const E402: DiagnosticCode = DiagnosticCode::new(Category::Error, 402);

/// Two apps share a struct name.
pub const E403: DiagnosticCode = DiagnosticCode::new(Category::Error, 403);

/// Errors that abort rendering of a build unit.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// A descriptor code template failed to render.
    #[error("cannot render {field} of `{owner}`: {source}")]
    Template {
        /// The hardware signal or data handler owning the template.
        owner: String,
        /// Which template, e.g. `setter` or `init`.
        field: &'static str,
        /// The underlying template failure.
        #[source]
        source: TemplateError,
    },

    /// The build has no apps.
    #[error("no patches to emit")]
    NoApps,

    /// Two patches declare the same namespace, so their app structs collide.
    #[error("patches `{first}` and `{second}` both declare namespace `{name}`")]
    DuplicateApp {
        /// The shared namespace.
        name: String,
        /// Include path of the first patch.
        first: String,
        /// Include path of the second patch.
        second: String,
    },
}

impl EmitError {
    /// The diagnostic code reported for this error.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            EmitError::Template { .. } => E401,
            EmitError::NoApps => E402,
            EmitError::DuplicateApp { .. } => E403,
        }
    }

    /// This error as a diagnostic about the build for `origin`.
    pub fn to_diagnostic(&self, origin: impl Into<String>) -> Diagnostic {
        Diagnostic::error(self.code(), self.to_string()).with_origin(origin)
    }
}
