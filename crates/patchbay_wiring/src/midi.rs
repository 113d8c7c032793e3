//! Generated code for MIDI-bound parameters and outputs.
//!
//! Incoming bytes are parsed by the runtime into `daisy.midi.status` and
//! `daisy.midi.byte[]`, with `daisy.midi.lastbyte` the index of the data
//! byte just received. Outgoing messages go through `daisy.midi_message2`
//! and `daisy.midi_message3`.

use patchbay_common::{cpp_number, CppType, Phase};
use patchbay_patch::{MidiKind, MidiPattern};
use serde::Serialize;

/// Status byte for percussion triggers (note-on, channel 10).
pub const DRUM_STATUS: u8 = 153;

/// Code that writes a parameter from incoming MIDI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MidiInput {
    /// [`Phase::MidiMsg`] for channel messages, [`Phase::MidiStatus`] for
    /// clock and transport.
    pub phase: Phase,
    /// A self-contained `if` statement.
    pub code: String,
    /// Statement run at the end of every audio block, for momentary values.
    pub reset: Option<String>,
}

fn channel_test(pattern: &MidiPattern, base: u8, family: u8) -> String {
    match effective_channel(pattern) {
        Some(ch) => format!("daisy.midi.status == {}", u16::from(base) + u16::from(ch)),
        None => format!("daisy.midi.status/16 == {family}"),
    }
}

/// Channel an input listens on; `None` means any channel.
fn effective_channel(pattern: &MidiPattern) -> Option<u8> {
    match (pattern.channel, pattern.kind) {
        (Some(ch), _) => Some(ch),
        (None, MidiKind::Drum) => Some(9),
        (None, _) => None,
    }
}

/// Builds the receive code for a parameter named after a MIDI pattern.
///
/// `var` is the parameter's member variable; received 7-bit values are
/// rescaled by `scale` and `offset` into the parameter's range.
pub fn input_code(pattern: &MidiPattern, var: &str, scale: f64, offset: f64) -> MidiInput {
    let scale = cpp_number(scale, CppType::Float);
    let offset = cpp_number(offset, CppType::Float);
    let number = pattern.number_or_default();
    let msg = |code: String| MidiInput {
        phase: Phase::MidiMsg,
        code,
        reset: None,
    };
    match pattern.kind {
        MidiKind::Cc => msg(format!(
            "if (daisy.midi.lastbyte == 1 && {} && daisy.midi.byte[0] == {number}) {{ {var} = (daisy.midi.byte[1]/127.f)*{scale} + {offset}; }}",
            channel_test(pattern, 176, 11)
        )),
        MidiKind::Vel | MidiKind::Note | MidiKind::Drum => {
            let status = match effective_channel(pattern) {
                Some(ch) => format!(
                    "(daisy.midi.status == {} || daisy.midi.status == {})",
                    128 + u16::from(ch),
                    144 + u16::from(ch)
                ),
                None => "(daisy.midi.status/16 == 8 || daisy.midi.status/16 == 9)".to_string(),
            };
            msg(format!(
                "if (daisy.midi.lastbyte == 1 && {status} && daisy.midi.byte[0] == {number}) {{ {var} = (daisy.midi.byte[1]/127.f)*{scale} + {offset}; }}"
            ))
        }
        MidiKind::Bend => msg(format!(
            "if (daisy.midi.lastbyte == 1 && {}) {{ {var} = ((daisy.midi.byte[0] + daisy.midi.byte[1]/128.f)/128.f)*{scale} + {offset}; }}",
            channel_test(pattern, 224, 14)
        )),
        MidiKind::Press => msg(format!(
            "if (daisy.midi.lastbyte == 0 && {}) {{ {var} = (daisy.midi.byte[0]/127.f)*{scale} + {offset}; }}",
            channel_test(pattern, 208, 13)
        )),
        MidiKind::Program => msg(format!(
            "if (daisy.midi.lastbyte == 0 && {}) {{ {var} = (daisy.midi.byte[0]/127.f)*{scale} + {offset}; }}",
            channel_test(pattern, 192, 12)
        )),
        MidiKind::Clock => MidiInput {
            phase: Phase::MidiStatus,
            code: format!("if (byte == 248) {{ {var} = 1.f; }}"),
            reset: Some(format!("{var} = 0.f;")),
        },
        MidiKind::Play => MidiInput {
            phase: Phase::MidiStatus,
            code: format!(
                "if (byte == 250 || byte == 251) {{ {var} = 1.f; }} else if (byte == 252) {{ {var} = 0.f; }}"
            ),
            reset: Some(format!("{var} = 0.f;")),
        },
    }
}

/// Expression converting a float `value` into a 7-bit data byte.
///
/// Pitch bend maps `[-1, 1]`; everything else maps `[0, 1]`.
pub fn byte_expr(kind: MidiKind, value: &str) -> String {
    match kind {
        MidiKind::Bend => format!("(uint8_t(({value}+1.f)*64.f)) & 0x7F"),
        _ => format!("(uint8_t({value}*127.f)) & 0x7F"),
    }
}

/// Statement sending `byte` as the message named by `pattern`.
///
/// Returns `None` for clock and transport, which are receive-only.
pub fn send_statement(pattern: &MidiPattern, byte: &str) -> Option<String> {
    let status = u16::from(pattern.kind.status_base()?) + u16::from(pattern.channel_or_default());
    let number = pattern.number_or_default();
    Some(match pattern.kind {
        MidiKind::Cc | MidiKind::Vel | MidiKind::Note => {
            format!("daisy.midi_message3({status}, {number}, {byte});")
        }
        MidiKind::Drum => format!("daisy.midi_message3({DRUM_STATUS}, {number}, {byte});"),
        MidiKind::Bend => format!("daisy.midi_message3({status}, 0, {byte});"),
        MidiKind::Press | MidiKind::Program => format!("daisy.midi_message2({status}, {byte});"),
        MidiKind::Clock | MidiKind::Play => return None,
    })
}
