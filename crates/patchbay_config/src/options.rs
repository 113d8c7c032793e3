//! Numeric build parameters shared by every pipeline stage.

use crate::error::ConfigError;

/// Sample rates the audio engine can run at, in kHz.
pub const SAMPLE_RATES_KHZ: [u32; 3] = [32, 48, 96];

/// Audio block sizes the audio engine accepts, in frames.
pub const BLOCK_SIZES: [u32; 14] = [1, 2, 4, 6, 8, 12, 16, 24, 32, 48, 64, 96, 128, 256];

/// Build parameters for one compilation run.
///
/// These are the only numeric inputs besides the descriptor and the patches:
/// the patch analyzer resolves `samplerate`/`vectorsize` against them and the
/// emitter writes them into the generated defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Sample rate in kHz; one of [`SAMPLE_RATES_KHZ`].
    pub samplerate_khz: u32,
    /// Audio block size in frames; one of [`BLOCK_SIZES`].
    pub blocksize: u32,
    /// Run the MCU at 480 MHz instead of 400 MHz.
    pub boost: bool,
    /// Use fast approximations for expensive math functions.
    pub fastmath: bool,
    /// Disable OLED support even when the target has a display.
    pub nooled: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            samplerate_khz: 48,
            blocksize: 24,
            boost: false,
            fastmath: false,
            nooled: false,
        }
    }
}

impl BuildOptions {
    /// Sample rate in Hz.
    pub fn samplerate_hz(&self) -> u32 {
        self.samplerate_khz * 1000
    }

    /// Checks the sample rate and block size against the supported sets.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !SAMPLE_RATES_KHZ.contains(&self.samplerate_khz) {
            return Err(ConfigError::ValidationError(format!(
                "unsupported sample rate {}kHz (expected one of 32, 48, 96)",
                self.samplerate_khz
            )));
        }
        if !BLOCK_SIZES.contains(&self.blocksize) {
            return Err(ConfigError::ValidationError(format!(
                "unsupported block size {}",
                self.blocksize
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let opts = BuildOptions::default();
        assert!(opts.validate().is_ok());
        assert_eq!(opts.samplerate_hz(), 48000);
    }

    #[test]
    fn rejects_odd_samplerate() {
        let opts = BuildOptions {
            samplerate_khz: 44,
            ..BuildOptions::default()
        };
        let err = opts.validate().unwrap_err();
        assert!(err.to_string().contains("44kHz"));
    }

    #[test]
    fn rejects_odd_blocksize() {
        let opts = BuildOptions {
            blocksize: 7,
            ..BuildOptions::default()
        };
        assert!(matches!(opts.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn every_listed_blocksize_validates() {
        for blocksize in BLOCK_SIZES {
            let opts = BuildOptions {
                blocksize,
                ..BuildOptions::default()
            };
            assert!(opts.validate().is_ok(), "block size {blocksize}");
        }
    }
}
