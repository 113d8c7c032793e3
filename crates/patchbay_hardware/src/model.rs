//! The expanded hardware model produced by [`crate::compile`].

use crate::descriptor::{ExternalCodec, InsertDef};
use crate::ordered::OrderedMap;
use patchbay_catalog::{ComponentKind, Som};
use patchbay_common::Phase;
use serde::Serialize;

/// A fully expanded hardware target.
#[derive(Debug, Clone, Serialize)]
pub struct HardwareDescriptor {
    /// Device name; may be empty.
    pub name: String,
    /// Module variant.
    pub som: Som,
    /// Component instances, declared components first, then parents.
    pub components: Vec<Component>,
    /// Readable signals: hand-authored first, then component-derived.
    pub inputs: Vec<InputSignal>,
    /// Writable signals: hand-authored first, then component-derived.
    pub outputs: Vec<OutputSignal>,
    /// Buffered data handlers.
    pub datahandlers: Vec<DataHandler>,
    /// Name-prefix bindings.
    pub labels: Labels,
    /// Lowercase alias to canonical name.
    pub aliases: OrderedMap<String>,
    /// Preprocessor defines.
    pub defines: Defines,
    /// Free-form phase inserts.
    pub inserts: Vec<InsertDef>,
    /// Audio channel count.
    pub audio_channels: u32,
    /// Maximum number of apps per build.
    pub max_apps: usize,
    /// OLED configuration when the device has one.
    pub display: Option<Display>,
    /// External codecs, in SAI order after the onboard codec.
    pub external_codecs: Vec<ExternalCodec>,
    /// The rendered C++ board support header.
    pub board_header: String,
}

impl HardwareDescriptor {
    /// The C++ struct name of the board, e.g. `DaisyField` for `"field"`.
    pub fn struct_name(&self) -> String {
        board_struct_name(&self.name)
    }

    /// Finds an input signal by name.
    pub fn input(&self, name: &str) -> Option<&InputSignal> {
        self.inputs.iter().find(|s| s.name == name)
    }

    /// Finds an output signal by name.
    pub fn output(&self, name: &str) -> Option<&OutputSignal> {
        self.outputs.iter().find(|s| s.name == name)
    }

    /// Finds a data handler by name.
    pub fn datahandler(&self, name: &str) -> Option<&DataHandler> {
        self.datahandlers.iter().find(|d| d.name == name)
    }

    /// Finds a component by instance name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }
}

/// Returns the board struct name for a device name.
pub fn board_struct_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("Daisy{}{}", first.to_ascii_uppercase(), chars.as_str()),
        None => "Daisy".to_string(),
    }
}

/// One component instance with its templates rendered.
#[derive(Debug, Clone, Serialize)]
pub struct Component {
    /// Instance name.
    pub name: String,
    /// Catalog kind.
    pub kind: ComponentKind,
    /// Attribute values after catalog inheritance and pin/index flattening.
    pub attributes: OrderedMap<String>,
    /// Structural grouping only; contributes no signals.
    pub is_parent: bool,
    /// Pre-wired on the SOM; contributes signals but no init code or member.
    pub is_default: bool,
    /// ADC channel, for kinds that occupy one.
    pub adc_channel: Option<usize>,
    /// Rendered member type.
    pub typename: Option<String>,
    /// Rendered init statements.
    pub map_init: Option<String>,
    /// Rendered ADC channel configuration.
    pub init_single: Option<String>,
    /// Rendered free-form init code.
    pub init: Option<String>,
    /// Rendered block-rate processing.
    pub process: Option<String>,
    /// Rendered main-loop processing.
    pub loopprocess: Option<String>,
    /// Rendered end-of-callback processing.
    pub postprocess: Option<String>,
    /// Rendered display processing.
    pub display: Option<String>,
    /// Rendered sample-rate update.
    pub updaterate: Option<String>,
    /// Rendered file-scope declaration.
    pub non_class_decl: Option<String>,
    /// Header to include, resolved against the descriptor directory.
    pub header: Option<String>,
}

impl Component {
    /// Returns an attribute value.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// A named readable signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputSignal {
    /// Signal name.
    pub name: String,
    /// Owning component, `None` for hand-authored signals.
    pub component: Option<String>,
    /// C++ expression yielding the current value.
    pub code: String,
    /// Value domain when not `[0, 1]`.
    pub range: Option<(f64, f64)>,
    /// Yields 0 or 1.
    pub is_bool: bool,
    /// Eligible for automapping.
    pub automap: bool,
    /// Refresh code run before the signal is read.
    pub update: Option<InsertDef>,
    /// The owning component's block-rate processing.
    pub process: Option<String>,
}

/// A named writable signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputSignal {
    /// Signal name.
    pub name: String,
    /// Owning component, `None` for hand-authored signals.
    pub component: Option<String>,
    /// Statement template with a `{value}` placeholder.
    pub code: String,
    /// Phase the setter runs in.
    pub phase: Phase,
    /// The owning component's end-of-callback processing.
    pub postprocess: Option<String>,
}

/// A buffered data handler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataHandler {
    /// Handler name.
    pub name: String,
    /// Init template over `{name}` and `{data}`.
    pub init: Option<String>,
    /// Phase code template over `{name}` and `{data}`.
    pub code: Option<String>,
    /// Phase `code` runs in.
    pub phase: Phase,
}

/// Prefix bindings for each namespace.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Labels {
    /// Parameter prefixes.
    pub params: OrderedMap<String>,
    /// Output prefixes.
    pub outs: OrderedMap<String>,
    /// Data buffer prefixes.
    pub datas: OrderedMap<String>,
}

/// OLED display configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Display {
    /// libDaisy driver type.
    pub driver: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Ordered preprocessor defines, values kept as C++ source text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Defines(OrderedMap<String>);

impl Defines {
    /// Creates an empty define set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns `true` if `name` is defined to something other than `0`.
    pub fn is_set(&self, name: &str) -> bool {
        matches!(self.get(name), Some(v) if v != "0" && v != "false")
    }

    /// Parses the value of `name` as an unsigned integer.
    pub fn get_u32(&self, name: &str) -> Option<u32> {
        self.get(name).and_then(|v| v.trim().parse().ok())
    }

    /// Defines `name`, keeping its position if already present.
    pub fn set(&mut self, name: &str, value: impl ToString) {
        self.0.insert(name, value.to_string());
    }

    /// Defines `name` only if it is absent.
    pub fn set_default(&mut self, name: &str, value: impl ToString) {
        if !self.0.contains_key(name) {
            self.set(name, value);
        }
    }

    /// Undefines `name`.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    /// Iterates in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Number of defines.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing is defined.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn struct_names() {
        assert_eq!(board_struct_name("field"), "DaisyField");
        assert_eq!(board_struct_name("Pod"), "DaisyPod");
        assert_eq!(board_struct_name(""), "Daisy");
    }

    #[test]
    fn define_truthiness() {
        let mut d = Defines::new();
        d.set("OOPSY_TARGET_HAS_OLED", 1);
        d.set("OOPSY_HAS_ENCODER", 0);
        assert!(d.is_set("OOPSY_TARGET_HAS_OLED"));
        assert!(!d.is_set("OOPSY_HAS_ENCODER"));
        assert!(!d.is_set("OOPSY_TARGET_HAS_MIDI_INPUT"));
    }

    #[test]
    fn define_order_and_defaults() {
        let mut d = Defines::new();
        d.set("B", 2);
        d.set("A", 1);
        d.set_default("B", 9);
        d.set_default("C", 3);
        d.set("A", 5);
        let all: Vec<_> = d.iter().collect();
        assert_eq!(all, vec![("B", "2"), ("A", "5"), ("C", "3")]);
        assert_eq!(d.get_u32("C"), Some(3));
        assert_eq!(d.remove("B").as_deref(), Some("2"));
        assert_eq!(d.len(), 2);
    }
}
