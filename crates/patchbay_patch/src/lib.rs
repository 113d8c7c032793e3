//! Patch analysis for the patchbay hardware-mapping compiler.
//!
//! Turns an exported patch source into a [`PatchDescriptor`]: its audio
//! ports, parameters with ranges, data buffers and history outputs. The
//! analyzer is a pure function over the source text; it never reads files.
//!
//! ```
//! use patchbay_patch::{analyze, Constants};
//! use patchbay_diagnostics::DiagnosticSink;
//!
//! let src = r#"
//! namespace gain {
//! const char *gen_kernel_innames[] = { "in1" };
//! const char *gen_kernel_outnames[] = { "out1" };
//! }
//! "#;
//! let patch = analyze(src, &Constants::default(), &DiagnosticSink::new()).unwrap();
//! assert_eq!(patch.name, "gain");
//! assert_eq!(patch.audio_outputs, ["out1"]);
//! ```

#![warn(missing_docs)]

pub mod analyze;
pub mod constexpr;
pub mod descriptor;
pub mod error;
pub mod midi;

pub use analyze::{analyze, W101, W102};
pub use constexpr::Constants;
pub use descriptor::{DataBuffer, ExternalBuffer, HistoryOutput, Parameter, PatchDescriptor};
pub use error::{PatchError, E101, E102, E103};
pub use midi::{MidiKind, MidiPattern};
