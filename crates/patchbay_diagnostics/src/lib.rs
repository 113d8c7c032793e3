//! Diagnostic creation, severity management, and terminal rendering.
//!
//! Fatal compilation failures travel as typed errors through each stage's
//! `Result`. Everything softer (truncated app lists, controls left unbound,
//! data buffers nobody reads) is reported as a structured [`Diagnostic`]
//! collected in a [`DiagnosticSink`] and printed by [`TerminalRenderer`].

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
