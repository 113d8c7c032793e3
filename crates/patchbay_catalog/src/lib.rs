//! Static hardware catalog for Daisy-based devices.
//!
//! The catalog is pure data: for every [`ComponentKind`] and each supported
//! [`Som`] it holds a [`CatalogEntry`] with default attributes, C++ code
//! templates and the sub-signals the kind exposes. The hardware model
//! compiler merges a descriptor's components over these entries.
//!
//! # Usage
//!
//! ```
//! use patchbay_catalog::{lookup, ComponentKind, Som};
//!
//! let led = lookup(Som::Seed, ComponentKind::Led);
//! assert_eq!(led.default_value("invert"), Some("true"));
//! assert_eq!(led.mapping[0].name, "{name}");
//! ```

#![warn(missing_docs)]

pub mod entry;
pub mod kind;
pub mod patch_sm;
pub mod seed;

pub use entry::{CatalogEntry, Direction, MappingTemplate};
pub use kind::ComponentKind;

use serde::Serialize;
use std::fmt;

/// The system-on-module at the core of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Som {
    /// The general-purpose Daisy Seed.
    #[default]
    Seed,
    /// The compact Daisy Patch SM.
    PatchSm,
}

impl Som {
    /// Both supported modules.
    pub const ALL: [Som; 2] = [Som::Seed, Som::PatchSm];

    /// Returns the descriptor spelling, also used to pick the libDaisy header.
    pub fn name(self) -> &'static str {
        match self {
            Som::Seed => "seed",
            Som::PatchSm => "patch_sm",
        }
    }

    /// Parses a descriptor `som` value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "seed" | "daisy_seed" => Some(Som::Seed),
            "patch_sm" | "patchsm" | "patch-sm" => Some(Som::PatchSm),
            _ => None,
        }
    }

    /// The libDaisy class of the `som` member.
    pub fn class_name(self) -> &'static str {
        match self {
            Som::Seed => "daisy::DaisySeed",
            Som::PatchSm => "daisy::patch_sm::DaisyPatchSM",
        }
    }

    /// The libDaisy header declaring [`Som::class_name`].
    pub fn header(self) -> &'static str {
        match self {
            Som::Seed => "daisy_seed.h",
            Som::PatchSm => "daisy_patch_sm.h",
        }
    }

    /// Whether analog controls are configured through the board's own ADC table.
    pub fn configures_adc(self) -> bool {
        self == Som::Seed
    }
}

impl fmt::Display for Som {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the catalog entry for `kind` on `som`.
pub fn lookup(som: Som, kind: ComponentKind) -> &'static CatalogEntry {
    match som {
        Som::Seed => seed::entry(kind),
        Som::PatchSm => patch_sm::entry(kind),
    }
}
