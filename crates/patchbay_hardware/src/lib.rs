//! Hardware descriptors and the hardware model compiler.
//!
//! A descriptor is a JSON document declaring a device's components (by
//! catalog kind, with pins and attribute overrides), hand-authored signals,
//! label and alias tables, defines and phase inserts. [`compile`] expands it
//! against the [`patchbay_catalog`] entries for its SOM into a
//! [`HardwareDescriptor`]: concrete components with rendered code, a flat
//! list of named input and output signals, and the C++ board header.
//!
//! ```
//! use patchbay_diagnostics::DiagnosticSink;
//! use patchbay_hardware::{compile, parse_descriptor};
//!
//! let raw = parse_descriptor(r#"{"components": {"knob1": {"component": "AnalogControl", "pin": 15}}}"#).unwrap();
//! let hw = compile(&raw, None, &DiagnosticSink::new()).unwrap();
//! assert!(hw.input("knob1").unwrap().automap);
//! ```

#![warn(missing_docs)]

pub mod alias;
pub mod board;
pub mod codec;
pub mod compile;
pub mod descriptor;
pub mod error;
pub mod loader;
pub mod model;
pub mod ordered;

pub use compile::{compile, OLED_DRIVER, W201};
pub use descriptor::{
    AudioDef, CodecPins, DataHandlerDef, ExternalCodec, InsertDef, LabelsDef, MappingDef,
    RawDescriptor, SignalDef,
};
pub use error::{HardwareError, E201, E202, E203, E204, E205, E206, E207};
pub use loader::{load_descriptor, parse_descriptor};
pub use model::{
    board_struct_name, Component, DataHandler, Defines, Display, HardwareDescriptor, InputSignal,
    Labels, OutputSignal,
};
pub use ordered::OrderedMap;
