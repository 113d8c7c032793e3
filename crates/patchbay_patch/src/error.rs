//! Error types for patch analysis.
//!
//! Each variant carries a stable `E1xx` code for the diagnostic stream.

use patchbay_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// A required idiom is missing from the patch source.
pub const E101: DiagnosticCode = DiagnosticCode::new(Category::Error, 101);

/// A buffer dimension or initializer cannot be evaluated.
pub const E102: DiagnosticCode = DiagnosticCode::new(Category::Error, 102);

/// An extraction pattern failed to compile.
pub const E103: DiagnosticCode = DiagnosticCode::new(Category::Error, 103);

/// Errors that abort analysis of a patch source.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// A structural idiom the analyzer depends on was not found.
    #[error("malformed patch source: missing {idiom}")]
    MalformedPatchSource {
        /// Description of the missing idiom, e.g. `namespace declaration`.
        idiom: String,
    },

    /// A buffer dimension or initializer is not a supported constant expression.
    #[error("cannot resolve constant expression `{expr}`: {reason}")]
    UnresolvableConstantExpression {
        /// The expression text as it appears in the source.
        expr: String,
        /// Why evaluation failed.
        reason: String,
    },

    /// One of the analyzer's extraction patterns failed to compile.
    #[error("invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl PatchError {
    /// The diagnostic code reported for this error.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            PatchError::MalformedPatchSource { .. } => E101,
            PatchError::UnresolvableConstantExpression { .. } => E102,
            PatchError::Pattern(_) => E103,
        }
    }

    /// This error as a diagnostic about the patch at `origin`.
    pub fn to_diagnostic(&self, origin: impl Into<String>) -> Diagnostic {
        Diagnostic::error(self.code(), self.to_string()).with_origin(origin)
    }

    pub(crate) fn missing(idiom: impl Into<String>) -> Self {
        PatchError::MalformedPatchSource {
            idiom: idiom.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_display() {
        let err = PatchError::missing("namespace declaration");
        assert_eq!(
            err.to_string(),
            "malformed patch source: missing namespace declaration"
        );
    }

    #[test]
    fn constexpr_display() {
        let err = PatchError::UnresolvableConstantExpression {
            expr: "foo * 2".into(),
            reason: "unknown identifier `foo`".into(),
        };
        assert_eq!(
            err.to_string(),
            "cannot resolve constant expression `foo * 2`: unknown identifier `foo`"
        );
        assert_eq!(err.code().to_string(), "E102");
    }

    #[test]
    fn diagnostic_names_the_patch() {
        let diag = PatchError::missing("namespace declaration").to_diagnostic("reverb.cpp");
        assert!(diag.severity.is_error());
        assert_eq!(diag.code, E101);
        assert_eq!(diag.origin.as_deref(), Some("reverb.cpp"));
        assert_eq!(diag.message, "malformed patch source: missing namespace declaration");
    }
}
