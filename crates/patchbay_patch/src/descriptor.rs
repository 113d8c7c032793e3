//! The semantic model extracted from a patch source.

use crate::midi::MidiPattern;
use serde::Serialize;

/// Everything the wiring stage needs to know about one patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatchDescriptor {
    /// Patch name, taken from its namespace.
    pub name: String,
    /// Labels of the audio inputs, in port order.
    pub audio_inputs: Vec<String>,
    /// Labels of the audio outputs, in port order.
    pub audio_outputs: Vec<String>,
    /// Continuous parameters, in declaration order.
    pub parameters: Vec<Parameter>,
    /// Embedded data buffers with known dimensions.
    pub data_buffers: Vec<DataBuffer>,
    /// Symbolic parameters that reference a buffer allocated outside the patch.
    pub external_buffers: Vec<ExternalBuffer>,
    /// Monitorable history outputs.
    pub histories: Vec<HistoryOutput>,
}

/// A continuously variable input of the patch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    /// User-facing parameter name.
    pub name: String,
    /// Member variable holding the value in generated code.
    pub cname: String,
    /// Position in the patch's parameter table.
    pub index: usize,
    /// Lower output bound.
    pub min: f64,
    /// Upper output bound.
    pub max: f64,
    /// Initial value.
    pub default: f64,
}

impl Parameter {
    /// Width of the output interval.
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// A named data buffer declared by the patch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataBuffer {
    /// User-facing buffer name.
    pub name: String,
    /// Member variable holding the buffer in generated code.
    pub cname: String,
    /// Length in frames.
    pub frames: u32,
    /// Channel count.
    pub channels: u32,
    /// Audio file the buffer is loaded from, when known.
    pub source_file: Option<String>,
}

/// A symbolic parameter with no embedded storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalBuffer {
    /// User-facing buffer name.
    pub name: String,
    /// Position in the patch's parameter table.
    pub index: usize,
}

/// A `history` variable exposed for monitoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryOutput {
    /// Name with the generated prefix and suffix removed.
    pub name: String,
    /// Member variable holding the value in generated code.
    pub cname: String,
    /// Initial value.
    pub default: f64,
    /// MIDI semantics encoded in the name, if any.
    pub midi: Option<MidiPattern>,
}
