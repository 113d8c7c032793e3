//! The resolved wiring of one patch, as consumed by the code emitter.

use crate::graph::SignalGraph;
use crate::midi::MidiInput;
use crate::scale::Scaling;
use patchbay_common::{CppType, Phase};
use patchbay_hardware::{HardwareDescriptor, InsertDef};
use serde::Serialize;

/// Where a parameter's value comes from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamSource {
    /// Set only from the parameter view, or left at its default.
    Unbound,
    /// Rescaled from a hardware input every audio block.
    Hardware(String),
    /// Written by incoming MIDI.
    Midi(MidiInput),
}

/// One patch parameter and its binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamBinding {
    /// Parameter name in the patch.
    pub name: String,
    /// Member variable, `gen_param_<name>`.
    pub var: String,
    /// Storage type.
    pub ty: CppType,
    /// Display label.
    pub label: String,
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
    /// Initial value.
    pub default: f64,
    /// Map from the source reading into `[min, max]`.
    pub scaling: Scaling,
    /// Encoder increment in the parameter view.
    pub stepsize: f64,
    /// Binding.
    pub source: ParamSource,
}

impl ParamBinding {
    /// Returns `true` unless the parameter is [`ParamSource::Unbound`].
    pub fn is_bound(&self) -> bool {
        !matches!(self.source, ParamSource::Unbound)
    }

    /// Short name of the source for display: the hardware input, or the
    /// MIDI phase.
    pub fn source_name(&self) -> Option<&str> {
        match &self.source {
            ParamSource::Unbound => None,
            ParamSource::Hardware(input) => Some(input),
            ParamSource::Midi(m) => Some(m.phase.name()),
        }
    }
}

/// A patch audio input and the buffer feeding it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioInBinding {
    /// Port label.
    pub label: String,
    /// Buffer name (`dsy_in1`, `dsy_midi_in`), or `None` when the hardware
    /// has no audio inputs.
    pub source: Option<String>,
}

/// A patch audio output and where its buffer goes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioOutBinding {
    /// Port label, with any matched prefix stripped.
    pub label: String,
    /// Buffer the patch writes: a hardware channel or a glue buffer.
    pub buffer: String,
    /// Hardware output or MIDI stream fed from the buffer.
    pub target: Option<String>,
    /// Throttled MIDI send of the buffer's last sample.
    pub midi_setter: Option<String>,
}

/// A hardware audio output channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HardwareAudioOut {
    /// Channel buffer, `dsy_outN`.
    pub name: String,
    /// Buffer to copy from; equal to `name` when the patch writes the channel
    /// directly, `None` for silence.
    pub source: Option<String>,
}

/// A hardware input read by the app.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceInput {
    /// Signal name, also the local variable name.
    pub name: String,
    /// Expression yielding the reading.
    pub code: String,
    /// Refresh code run before reading.
    pub update: Option<InsertDef>,
}

/// How a hardware output is driven.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputDrive {
    /// Nothing drives the output.
    Idle,
    /// Assigned from an expression (a history, or another output).
    Expr(String),
    /// The last samples of these buffers, summed.
    Sum(Vec<String>),
}

/// A hardware output and its driver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceOutput {
    /// Signal name, also the member variable name.
    pub name: String,
    /// Setter template with a `{value}` placeholder.
    pub code: String,
    /// Phase the setter runs in.
    pub phase: Phase,
    /// Driver.
    pub drive: OutputDrive,
}

impl DeviceOutput {
    /// Returns `true` unless [`OutputDrive::Idle`].
    pub fn is_driven(&self) -> bool {
        self.drive != OutputDrive::Idle
    }
}

/// A history output sent as MIDI when it changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MidiHistory {
    /// History name.
    pub name: String,
    /// Member caching the last sent byte, `gen_history_<name>`.
    pub var: String,
    /// Initial byte.
    pub initial: u8,
    /// Expression converting the patch value to a data byte.
    pub byte: String,
    /// Send statement over `var`.
    pub send: String,
}

/// A data handler fed by a patch buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataBinding {
    /// Handler name.
    pub handler: String,
    /// Patch buffer name.
    pub buffer: String,
    /// Expression naming the buffer, `gen.<cname>`.
    pub data: String,
    /// Init template.
    pub init: Option<String>,
    /// Phase code template.
    pub code: Option<String>,
    /// Phase `code` runs in.
    pub phase: Phase,
}

/// One patch wired to one hardware target.
#[derive(Debug, Clone, Serialize)]
pub struct App {
    /// Patch name.
    pub name: String,
    /// The bipartite binding graph.
    pub graph: SignalGraph,
    /// Patch audio inputs, in port order.
    pub audio_ins: Vec<AudioInBinding>,
    /// Patch audio outputs, in port order.
    pub audio_outs: Vec<AudioOutBinding>,
    /// Block buffers for outputs beyond the hardware channels.
    pub glue_buffers: Vec<String>,
    /// Hardware audio inputs, `dsy_in1..N`.
    pub hardware_ins: Vec<String>,
    /// Hardware audio outputs after normalization.
    pub hardware_outs: Vec<HardwareAudioOut>,
    /// The MIDI input buffer, when the app reads it.
    pub midi_in_buffer: Option<String>,
    /// Buffers streamed to MIDI out.
    pub midi_out_feeds: Vec<String>,
    /// Hardware inputs that feed a parameter.
    pub device_inputs: Vec<DeviceInput>,
    /// Every hardware output, in declaration order.
    pub device_outputs: Vec<DeviceOutput>,
    /// Parameters, in patch order.
    pub params: Vec<ParamBinding>,
    /// MIDI-sending histories, in patch order.
    pub histories: Vec<MidiHistory>,
    /// Data handlers with a bound buffer.
    pub datas: Vec<DataBinding>,
    /// Inserts generated for this app.
    pub inserts: Vec<InsertDef>,
    /// Reads MIDI.
    pub has_midi_in: bool,
    /// Reads raw MIDI bytes through an audio input.
    pub has_generic_midi_in: bool,
    /// Writes MIDI.
    pub has_midi_out: bool,
    /// Index of the parameter initially selected in the parameter view.
    pub param_selected: usize,
}

impl App {
    /// Returns `true` if this app needs the MIDI UART on `hw`.
    pub fn uses_midi_uart(&self, hw: &HardwareDescriptor) -> bool {
        (self.has_midi_in && hw.defines.is_set("OOPSY_TARGET_HAS_MIDI_INPUT"))
            || (self.has_midi_out && hw.defines.is_set("OOPSY_TARGET_HAS_MIDI_OUTPUT"))
    }

    /// Number of MIDI messages that may be sent per throttle period.
    pub fn midi_send_count(&self) -> usize {
        self.audio_outs.iter().filter(|o| o.midi_setter.is_some()).count() + self.histories.len()
    }

    /// Looks up a parameter by patch name.
    pub fn param(&self, name: &str) -> Option<&ParamBinding> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Looks up a hardware output by name.
    pub fn device_output(&self, name: &str) -> Option<&DeviceOutput> {
        self.device_outputs.iter().find(|o| o.name == name)
    }
}
