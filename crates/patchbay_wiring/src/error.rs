//! Error types for signal graph resolution.

use patchbay_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// A name resolves through no binding rule.
pub const E301: DiagnosticCode = DiagnosticCode::new(Category::Error, 301);

/// A name binds to a signal of the wrong direction.
pub const E302: DiagnosticCode = DiagnosticCode::new(Category::Error, 302);

/// A data buffer cannot be exported.
pub const E303: DiagnosticCode = DiagnosticCode::new(Category::Error, 303);

/// Errors that abort wiring of a patch to a hardware target.
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    /// A name resolves through no binding rule.
    #[error("{kind} `{name}` binds to `{target}`, which names no hardware signal")]
    UnknownParameterBinding {
        /// `parameter`, `output`, `history` or `data`.
        kind: &'static str,
        /// The patch-side name.
        name: String,
        /// The label or alias target that failed to resolve.
        target: String,
    },

    /// A name binds to a hardware signal that cannot carry data in the needed direction.
    #[error("{kind} `{name}` binds to `{signal}`, which is {available}")]
    DirectionMismatch {
        /// `parameter`, `output`, `history` or `data`.
        kind: &'static str,
        /// The patch-side name.
        name: String,
        /// The hardware signal.
        signal: String,
        /// What the signal supports, e.g. `output-only`.
        available: &'static str,
    },

    /// The patch references a buffer whose storage lives outside the patch.
    #[error("data `{name}` references an external buffer, which cannot be exported")]
    UnsupportedDataObject {
        /// The buffer name.
        name: String,
    },
}

impl WiringError {
    /// The diagnostic code reported for this error.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            WiringError::UnknownParameterBinding { .. } => E301,
            WiringError::DirectionMismatch { .. } => E302,
            WiringError::UnsupportedDataObject { .. } => E303,
        }
    }

    /// This error as a diagnostic about the app named `origin`.
    pub fn to_diagnostic(&self, origin: impl Into<String>) -> Diagnostic {
        Diagnostic::error(self.code(), self.to_string()).with_origin(origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_binding_display() {
        let err = WiringError::UnknownParameterBinding {
            kind: "parameter",
            name: "cv9_freq".into(),
            target: "cv9".into(),
        };
        assert_eq!(
            err.to_string(),
            "parameter `cv9_freq` binds to `cv9`, which names no hardware signal"
        );
    }

    #[test]
    fn direction_display() {
        let err = WiringError::DirectionMismatch {
            kind: "parameter",
            name: "led1_level".into(),
            signal: "led1".into(),
            available: "output-only",
        };
        assert_eq!(
            err.to_string(),
            "parameter `led1_level` binds to `led1`, which is output-only"
        );
    }

    #[test]
    fn unsupported_data_display() {
        let err = WiringError::UnsupportedDataObject {
            name: "sample".into(),
        };
        assert_eq!(
            err.to_string(),
            "data `sample` references an external buffer, which cannot be exported"
        );
        assert_eq!(err.to_diagnostic("sampler").code.to_string(), "E303");
    }
}
