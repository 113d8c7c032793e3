//! Catalog for the compact Daisy Patch SM module.
//!
//! The Patch SM samples its own ADC and exposes CV outputs directly, so analog
//! controls and DAC outputs need no board-side initialization. Pins are the
//! module's named pin constants rather than header numbers. Kinds without an
//! override here share the Seed entry.

use crate::entry::{CatalogEntry, Direction, MappingTemplate as M};
use crate::kind::ComponentKind as K;
use crate::seed;
use patchbay_common::Phase;

const ANALOG_CONTROL: CatalogEntry = CatalogEntry {
    mapping: &[M::get("{name}", "hardware.som.GetAdcValue({pin})").automap()],
    ..CatalogEntry::blank(K::AnalogControl, Direction::Input)
};

const ANALOG_CONTROL_BIPOLAR: CatalogEntry = CatalogEntry {
    mapping: &[M::get("{name}", "hardware.som.GetAdcValue({pin})")
        .range(-1.0, 1.0)
        .automap()],
    ..CatalogEntry::blank(K::AnalogControlBipolar, Direction::Input)
};

const SWITCH: CatalogEntry = CatalogEntry {
    map_init: Some("{name}.Init({pin}, som.AudioCallbackRate(), {type}, {polarity}, {pull});"),
    ..seed::SWITCH
};

const GATE_IN: CatalogEntry = CatalogEntry {
    map_init: Some("dsy_gpio_pin {name}_pin = {pin};\n    {name}.Init(&{name}_pin);"),
    ..seed::GATE_IN
};

const ENCODER: CatalogEntry = CatalogEntry {
    map_init: Some("{name}.Init({pin_a}, {pin_b}, {pin_click});"),
    ..seed::ENCODER
};

const LED: CatalogEntry = CatalogEntry {
    map_init: Some("{name}.Init({pin}, {invert});"),
    ..seed::LED
};

const GATE_OUT: CatalogEntry = CatalogEntry {
    map_init: Some(
        "{name}.pin = {pin};\n    {name}.mode = {mode};\n    {name}.pull = {pull};\n    dsy_gpio_init(&{name});",
    ),
    ..seed::GATE_OUT
};

const CV_OUTS_MAPPING: &[M] = &[
    M::set(
        "{name}1",
        "hardware.som.WriteCvOut(daisy::patch_sm::CV_OUT_1, {value} * 5.f);",
        Phase::Audio,
    ),
    M::set(
        "{name}2",
        "hardware.som.WriteCvOut(daisy::patch_sm::CV_OUT_2, {value} * 5.f);",
        Phase::Audio,
    ),
];

const CV_OUTS: CatalogEntry = CatalogEntry {
    mapping: CV_OUTS_MAPPING,
    ..CatalogEntry::blank(K::CvOuts, Direction::Output)
};

/// Returns the Patch SM catalog entry for `kind`.
pub fn entry(kind: K) -> &'static CatalogEntry {
    match kind {
        K::AnalogControl => &ANALOG_CONTROL,
        K::AnalogControlBipolar => &ANALOG_CONTROL_BIPOLAR,
        K::Switch => &SWITCH,
        K::GateIn => &GATE_IN,
        K::Encoder => &ENCODER,
        K::Led => &LED,
        K::GateOut => &GATE_OUT,
        K::CvOuts => &CV_OUTS,
        other => seed::entry(other),
    }
}
