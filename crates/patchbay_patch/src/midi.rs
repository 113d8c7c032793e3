//! MIDI semantics encoded in patch-side names.
//!
//! Parameters, history outputs and audio output labels may carry names like
//! `midi_cc74`, `midi_vel36_ch10` or `midi_bend_2`. The same lexical rules
//! apply everywhere; each consumer decides which kinds it supports.

use crate::error::PatchError;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// The MIDI message family a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MidiKind {
    /// Note on/off, number is the note.
    Note,
    /// Control change, number is the controller.
    Cc,
    /// Note velocity, number is the note.
    Vel,
    /// Percussion trigger, number is the note.
    Drum,
    /// Pitch bend.
    Bend,
    /// Channel pressure.
    Press,
    /// Program change.
    Program,
    /// Timing clock (status byte 248).
    Clock,
    /// Transport start/continue/stop (status bytes 250-252).
    Play,
}

impl MidiKind {
    /// Returns the name fragment following `midi_`.
    pub fn name(self) -> &'static str {
        match self {
            MidiKind::Note => "note",
            MidiKind::Cc => "cc",
            MidiKind::Vel => "vel",
            MidiKind::Drum => "drum",
            MidiKind::Bend => "bend",
            MidiKind::Press => "press",
            MidiKind::Program => "program",
            MidiKind::Clock => "clock",
            MidiKind::Play => "play",
        }
    }

    /// Status byte of this message family on channel 1, for channel messages.
    pub fn status_base(self) -> Option<u8> {
        match self {
            MidiKind::Note | MidiKind::Vel | MidiKind::Drum => Some(144),
            MidiKind::Cc => Some(176),
            MidiKind::Program => Some(192),
            MidiKind::Press => Some(208),
            MidiKind::Bend => Some(224),
            MidiKind::Clock | MidiKind::Play => None,
        }
    }

    /// Returns `true` for kinds whose name carries a note or controller number.
    pub fn is_numbered(self) -> bool {
        matches!(
            self,
            MidiKind::Note | MidiKind::Cc | MidiKind::Vel | MidiKind::Drum
        )
    }
}

impl fmt::Display for MidiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded `midi_<kind><number>_ch<channel>` name.
///
/// `number` is already reduced modulo 128 and `channel` is the zero-based
/// protocol channel (`ch1` is 0, `ch16` is 15, `ch17` wraps to 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MidiPattern {
    /// The message family.
    pub kind: MidiKind,
    /// Note or controller number, if the name spells one.
    pub number: Option<u8>,
    /// Zero-based channel, if the name spells one.
    pub channel: Option<u8>,
}

pub(crate) fn pattern() -> Result<&'static Regex, PatchError> {
    static RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^midi_(note|cc|vel|drum|bend|press|program)(\d*)(?:_(?:ch)?(\d+))?")
    })
    .as_ref()
    .map_err(|e| PatchError::Pattern(e.clone()))
}

/// Reduces a decimal digit string modulo `m` without overflowing.
fn digits_mod(digits: &str, m: u32) -> u32 {
    digits
        .bytes()
        .fold(0, |acc, d| (acc * 10 + u32::from(d - b'0')) % m)
}

impl MidiPattern {
    /// Decodes `name`, returning `None` if it follows no MIDI pattern.
    ///
    /// [`crate::analyze`] fails with [`PatchError::Pattern`] if the name
    /// pattern does not compile, so past analysis this never hides an error.
    pub fn parse(name: &str) -> Option<Self> {
        Self::try_parse(name).ok().flatten()
    }

    /// Decodes `name`, reporting a name pattern that fails to compile.
    pub fn try_parse(name: &str) -> Result<Option<Self>, PatchError> {
        match name {
            "midi_clock" => {
                return Ok(Some(Self {
                    kind: MidiKind::Clock,
                    number: None,
                    channel: None,
                }))
            }
            "midi_play" => {
                return Ok(Some(Self {
                    kind: MidiKind::Play,
                    number: None,
                    channel: None,
                }))
            }
            _ => {}
        }
        let Some(caps) = pattern()?.captures(name) else {
            return Ok(None);
        };
        let kind = match &caps[1] {
            "note" => MidiKind::Note,
            "cc" => MidiKind::Cc,
            "vel" => MidiKind::Vel,
            "drum" => MidiKind::Drum,
            "bend" => MidiKind::Bend,
            "press" => MidiKind::Press,
            _ => MidiKind::Program,
        };
        let number = match &caps[2] {
            "" => None,
            digits => Some(digits_mod(digits, 128) as u8),
        };
        let channel = caps
            .get(3)
            .map(|m| ((digits_mod(m.as_str(), 16) + 15) % 16) as u8);
        Ok(Some(Self {
            kind,
            number,
            channel,
        }))
    }

    /// Number, defaulting to 1 for numbered kinds and 0 otherwise.
    pub fn number_or_default(&self) -> u8 {
        self.number
            .unwrap_or(if self.kind.is_numbered() { 1 } else { 0 })
    }

    /// Zero-based channel, defaulting to channel 10 for drums and channel 1 otherwise.
    pub fn channel_or_default(&self) -> u8 {
        self.channel
            .unwrap_or(if self.kind == MidiKind::Drum { 9 } else { 0 })
    }

    /// Channel as displayed to users, 1 to 16.
    pub fn display_channel(&self) -> u8 {
        self.channel_or_default() + 1
    }

    /// Status byte for sending this message, or `None` for system messages.
    pub fn status_byte(&self) -> Option<u8> {
        self.kind
            .status_base()
            .map(|base| base + self.channel_or_default())
    }
}
