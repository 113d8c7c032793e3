//! Serde representation of a hardware descriptor document.
//!
//! This is the on-disk JSON schema, read verbatim. [`crate::compile`] turns
//! it into the expanded [`crate::HardwareDescriptor`].

use crate::ordered::OrderedMap;
use patchbay_common::Phase;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The top-level descriptor object.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RawDescriptor {
    /// Device name, used for the board struct and header guard.
    pub name: Option<String>,
    /// Module variant; `seed` when absent.
    pub som: Option<String>,
    /// Component instances by name. Each value holds `component` (the kind)
    /// plus free-form attributes.
    pub components: OrderedMap<OrderedMap<Value>>,
    /// Structural components other components hang off, e.g. an I2C bus.
    pub parents: OrderedMap<OrderedMap<Value>>,
    /// Hand-authored input signals.
    pub inputs: OrderedMap<SignalDef>,
    /// Hand-authored output signals.
    pub outputs: OrderedMap<SignalDef>,
    /// Buffered data handlers, e.g. SD card sample players.
    pub datahandlers: OrderedMap<DataHandlerDef>,
    /// Name-prefix bindings per namespace.
    pub labels: LabelsDef,
    /// Alternate names for components and signals.
    pub aliases: OrderedMap<String>,
    /// Preprocessor defines for the generated build unit.
    pub defines: OrderedMap<Value>,
    /// Free-form code injected into a phase.
    pub inserts: Vec<InsertDef>,
    /// Audio configuration.
    pub audio: Option<AudioDef>,
    /// How many apps one build may hold.
    pub max_apps: Option<usize>,
    /// Present when the device has an OLED display.
    pub display: Option<Value>,
    /// Additional SAI codecs after the onboard one.
    pub external_codecs: Vec<ExternalCodec>,
}

/// A hand-authored signal.
///
/// For inputs `code` is a C++ expression yielding the current value. For
/// outputs it is a statement template writing `{value}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SignalDef {
    /// Getter expression or setter statement.
    pub code: String,
    /// Value domain of an input when not `[0, 1]`.
    #[serde(default)]
    pub range: Option<[f64; 2]>,
    /// Input may be automapped to an unbound parameter.
    #[serde(default)]
    pub automap: bool,
    /// Input yields 0 or 1.
    #[serde(default, rename = "bool")]
    pub is_bool: bool,
    /// Phase an output setter runs in.
    #[serde(default, rename = "where")]
    pub phase: Phase,
    /// Per-block refresh code run before an input is read.
    #[serde(default)]
    pub update: Option<InsertDef>,
}

/// A component sub-signal declared in a descriptor, replacing the catalog's
/// mapping list for that component (used by `CodeClass` components).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MappingDef {
    /// Signal name template.
    pub name: String,
    /// Getter expression template.
    #[serde(default)]
    pub get: Option<String>,
    /// Setter statement template with `{value}`.
    #[serde(default)]
    pub set: Option<String>,
    /// Getter value domain.
    #[serde(default)]
    pub range: Option<[f64; 2]>,
    /// Getter yields 0 or 1.
    #[serde(default, rename = "bool")]
    pub is_bool: bool,
    /// Eligible for automapping.
    #[serde(default)]
    pub automap: bool,
    /// Setter phase.
    #[serde(default, rename = "where")]
    pub phase: Phase,
}

impl From<&patchbay_catalog::MappingTemplate> for MappingDef {
    fn from(m: &patchbay_catalog::MappingTemplate) -> Self {
        Self {
            name: m.name.to_string(),
            get: m.get.map(str::to_string),
            set: m.set.map(str::to_string),
            range: m.range.map(|(lo, hi)| [lo, hi]),
            is_bool: m.is_bool,
            automap: m.automap,
            phase: m.phase,
        }
    }
}

/// A buffered data handler.
///
/// `init` and `code` are templates over `{name}` and `{data}`, the latter
/// bound to the patch buffer routed to this handler.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DataHandlerDef {
    /// Run once when the app starts.
    pub init: Option<String>,
    /// Run every time `where` comes around.
    pub code: Option<String>,
    /// Phase `code` runs in.
    #[serde(rename = "where")]
    pub phase: Phase,
}

/// The `labels` section.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LabelsDef {
    /// Parameter name prefix to hardware input.
    pub params: OrderedMap<String>,
    /// Output name prefix to hardware output.
    pub outs: OrderedMap<String>,
    /// Data buffer name prefix to data handler.
    pub datas: OrderedMap<String>,
}

/// Code injected verbatim into one phase.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InsertDef {
    /// Target phase.
    #[serde(rename = "where")]
    pub phase: Phase,
    /// The code.
    pub code: String,
}

/// The `audio` section.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioDef {
    /// Number of audio channels; 2 when absent.
    pub channels: Option<u32>,
}

/// One external SAI codec.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExternalCodec {
    /// SAI peripheral, e.g. `SAI_2`.
    pub periph: String,
    /// Sync mode of block A.
    pub a_sync: String,
    /// Sync mode of block B.
    pub b_sync: String,
    /// Direction of block A.
    pub a_dir: String,
    /// Direction of block B.
    pub b_dir: String,
    /// Seed pins of the SAI lines.
    pub pin: CodecPins,
}

/// Pin assignment of an external codec.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CodecPins {
    /// Frame sync.
    pub fs: u32,
    /// Master clock.
    pub mclk: u32,
    /// Serial clock.
    pub sck: u32,
    /// Serial data A.
    pub sa: u32,
    /// Serial data B.
    pub sb: u32,
}
