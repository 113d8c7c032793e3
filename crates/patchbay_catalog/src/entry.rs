//! Catalog entry and sub-signal mapping templates.

use crate::kind::ComponentKind;
use patchbay_common::Phase;
use serde::Serialize;

/// Which way signals flow through a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// The component produces values the patch can read.
    Input,
    /// The component consumes values the patch writes.
    Output,
    /// Buses, drivers and multiplexers other components hang off.
    Structural,
}

/// One named sub-signal of a component, e.g. a switch's rising edge.
///
/// `name`, `get` and `set` are brace templates rendered against the
/// component's attributes. A mapping with a getter becomes a hardware input;
/// one with a setter becomes a hardware output whose template keeps a
/// `{value}` placeholder for the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MappingTemplate {
    /// Signal name template, usually `{name}` plus a suffix.
    pub name: &'static str,
    /// Expression yielding the current value as a float.
    pub get: Option<&'static str>,
    /// Statement writing `{value}` to the hardware.
    pub set: Option<&'static str>,
    /// Value domain of the getter when it is not `[0, 1]`.
    pub range: Option<(f64, f64)>,
    /// The value is 0 or 1.
    pub is_bool: bool,
    /// Eligible for automatic binding to an unbound parameter.
    pub automap: bool,
    /// Phase the setter runs in.
    pub phase: Phase,
}

impl MappingTemplate {
    /// A readable sub-signal.
    pub const fn get(name: &'static str, get: &'static str) -> Self {
        Self {
            name,
            get: Some(get),
            set: None,
            range: None,
            is_bool: false,
            automap: false,
            phase: Phase::Audio,
        }
    }

    /// A writable sub-signal.
    pub const fn set(name: &'static str, set: &'static str, phase: Phase) -> Self {
        Self {
            name,
            get: None,
            set: Some(set),
            range: None,
            is_bool: false,
            automap: false,
            phase,
        }
    }

    /// Marks the getter as yielding values in `[lo, hi]`.
    pub const fn range(self, lo: f64, hi: f64) -> Self {
        Self {
            range: Some((lo, hi)),
            ..self
        }
    }

    /// Marks the getter as boolean.
    pub const fn boolean(self) -> Self {
        Self {
            is_bool: true,
            ..self
        }
    }

    /// Marks the signal as eligible for automapping.
    pub const fn automap(self) -> Self {
        Self {
            automap: true,
            ..self
        }
    }
}

/// Static defaults and code templates for one component kind on one SOM.
///
/// Every template field is optional; absent ones contribute nothing to the
/// generated board header. `defaults` holds attribute values a descriptor may
/// override, keyed by attribute name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CatalogEntry {
    /// The kind this entry describes.
    pub kind: ComponentKind,
    /// C++ member type of a component instance.
    pub typename: Option<&'static str>,
    /// Signal direction.
    pub direction: Direction,
    /// Per-instance initialization in the board's `Init()`.
    pub map_init: Option<&'static str>,
    /// ADC channel configuration, rendered with `{i}` bound to the channel.
    pub init_single: Option<&'static str>,
    /// Block-rate control processing.
    pub process: Option<&'static str>,
    /// Main-loop processing for blocking transfers.
    pub loopprocess: Option<&'static str>,
    /// End-of-callback maintenance, e.g. LED PWM refresh.
    pub postprocess: Option<&'static str>,
    /// Display refresh work.
    pub display: Option<&'static str>,
    /// Re-applied whenever the audio sample rate changes.
    pub updaterate: Option<&'static str>,
    /// File-scope declaration emitted outside the board struct.
    pub non_class_decl: Option<&'static str>,
    /// Default attribute values.
    pub defaults: &'static [(&'static str, &'static str)],
    /// Named sub-signals.
    pub mapping: &'static [MappingTemplate],
}

impl CatalogEntry {
    /// An entry with no templates, used as the base for the static tables.
    pub const fn blank(kind: ComponentKind, direction: Direction) -> Self {
        Self {
            kind,
            typename: None,
            direction,
            map_init: None,
            init_single: None,
            process: None,
            loopprocess: None,
            postprocess: None,
            display: None,
            updaterate: None,
            non_class_decl: None,
            defaults: &[],
            mapping: &[],
        }
    }

    /// Returns the default value of attribute `key`, if the catalog has one.
    pub fn default_value(&self, key: &str) -> Option<&'static str> {
        self.defaults
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    /// Returns the template stored under a process-like field name.
    pub fn template(&self, field: &str) -> Option<&'static str> {
        match field {
            "typename" => self.typename,
            "map_init" => self.map_init,
            "init_single" => self.init_single,
            "process" => self.process,
            "loopprocess" => self.loopprocess,
            "postprocess" => self.postprocess,
            "display" => self.display,
            "updaterate" => self.updaterate,
            "non_class_decl" => self.non_class_decl,
            _ => None,
        }
    }
}
