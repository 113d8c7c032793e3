//! Execution phases that tag every generated code fragment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// When a generated fragment runs on the device.
///
/// Descriptor files spell these in snake case (`"where": "post_audio"`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Once per audio block, before and around the patch's `perform`.
    #[default]
    Audio,
    /// In the non-real-time main loop.
    Main,
    /// On display refresh.
    Display,
    /// When a MIDI data byte completes a channel message.
    MidiMsg,
    /// When a MIDI status byte arrives.
    MidiStatus,
    /// At the very end of the audio callback.
    PostAudio,
    /// At file scope, before the runtime headers.
    Header,
    /// In `main()`, after hardware initialization.
    Init,
}

impl Phase {
    /// All phases, in declaration order.
    pub const ALL: [Phase; 8] = [
        Phase::Audio,
        Phase::Main,
        Phase::Display,
        Phase::MidiMsg,
        Phase::MidiStatus,
        Phase::PostAudio,
        Phase::Header,
        Phase::Init,
    ];

    /// Returns the descriptor spelling of this phase.
    pub fn name(self) -> &'static str {
        match self {
            Phase::Audio => "audio",
            Phase::Main => "main",
            Phase::Display => "display",
            Phase::MidiMsg => "midi_msg",
            Phase::MidiStatus => "midi_status",
            Phase::PostAudio => "post_audio",
            Phase::Header => "header",
            Phase::Init => "init",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no known phase.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown execution phase `{0}`")]
pub struct ParsePhaseError(pub String);

impl FromStr for Phase {
    type Err = ParsePhaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| ParsePhaseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip_through_from_str() {
        for phase in Phase::ALL {
            assert_eq!(phase.name().parse::<Phase>().unwrap(), phase);
        }
    }

    #[test]
    fn unknown_phase() {
        let err = "loop".parse::<Phase>().unwrap_err();
        assert_eq!(err.to_string(), "unknown execution phase `loop`");
    }

    #[test]
    fn serde_uses_snake_case() {
        let p: Phase = serde_json::from_str("\"post_audio\"").unwrap();
        assert_eq!(p, Phase::PostAudio);
        assert_eq!(serde_json::to_string(&Phase::MidiMsg).unwrap(), "\"midi_msg\"");
    }

    #[test]
    fn default_is_audio() {
        assert_eq!(Phase::default(), Phase::Audio);
    }
}
