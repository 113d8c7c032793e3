//! Parsing and validation of `patchbay.toml` project files and build options.
//!
//! A project file names the hardware descriptor, the patch sources to build,
//! and the numeric build parameters (sample rate, block size) that feed the
//! patch analyzer's constant expressions and the generated defines.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod options;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use options::{BuildOptions, BLOCK_SIZES, SAMPLE_RATES_KHZ};
pub use types::*;
