//! Preprocessor defines of a build unit.

use patchbay_config::BuildOptions;
use patchbay_hardware::{Defines, HardwareDescriptor};
use patchbay_wiring::App;

/// Computes the defines of a build from the target's defines, the build
/// options and the apps it contains.
///
/// Runs after every app is resolved, so the result does not depend on the
/// order apps were wired in.
pub fn target_defines(hw: &HardwareDescriptor, options: &BuildOptions, apps: &[&App]) -> Defines {
    let mut defines = hw.defines.clone();
    defines.set("OOPSY_SAMPLERATE", options.samplerate_hz());
    defines.set("OOPSY_BLOCK_SIZE", options.blocksize);

    if apps.len() > 1 {
        defines.set("OOPSY_MULTI_APP", 1);
        // program changes switch apps
        if defines.is_set("OOPSY_TARGET_HAS_MIDI_INPUT") {
            defines.set("OOPSY_TARGET_USES_MIDI_UART", 1);
        }
    }
    if options.nooled {
        defines.remove("OOPSY_TARGET_HAS_OLED");
    }
    if defines.is_set("OOPSY_TARGET_HAS_OLED")
        && defines.is_set("OOPSY_HAS_PARAM_VIEW")
        && defines.is_set("OOPSY_HAS_ENCODER")
    {
        defines.set("OOPSY_CAN_PARAM_TWEAK", 1);
    }
    if options.fastmath {
        defines.set("GENLIB_USE_FASTMATH", 1);
    }
    if apps.iter().any(|a| a.uses_midi_uart(hw)) {
        defines.set("OOPSY_TARGET_USES_MIDI_UART", 1);
    }
    defines
}
