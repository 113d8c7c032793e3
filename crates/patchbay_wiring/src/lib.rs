//! The signal graph wiring resolver.
//!
//! [`resolve`] binds one analyzed patch to one compiled hardware target: audio
//! ports by position, names by longest label prefix, MIDI-named parameters and
//! histories to generated message code, then idle controls to unbound
//! parameters in declaration order. The resulting [`App`] carries the binding
//! graph and everything the emitter renders.

#![warn(missing_docs)]

pub mod app;
pub mod bind;
pub mod error;
pub mod graph;
pub mod midi;
pub mod resolve;
pub mod scale;

pub use app::{
    App, AudioInBinding, AudioOutBinding, DataBinding, DeviceInput, DeviceOutput, HardwareAudioOut,
    MidiHistory, OutputDrive, ParamBinding, ParamSource,
};
pub use error::{WiringError, E301, E302, E303};
pub use graph::{Node, NodeId, NodeKind, SignalGraph};
pub use resolve::{automap_pairs, resolve, W301, W302};
pub use scale::{stepsize, Scaling};
