//! External SAI codec configuration.
//!
//! SAI slot 0 is always the Seed's onboard AK4556; descriptor codecs take
//! slots 1.. in declaration order and are handed to the audio handle in that
//! order.

use crate::descriptor::ExternalCodec;
use std::fmt::Write;

const ONBOARD: &str = r#"
    // External Codec Initialization
    // Internal Codec
    if(som.CheckBoardVersion() == daisy::DaisySeed::BoardVersion::DAISY_SEED_1_1)
    {
        sai_config[0].pin_config.sa = {DSY_GPIOE, 6};
        sai_config[0].pin_config.sb = {DSY_GPIOE, 3};
        sai_config[0].a_dir         = daisy::SaiHandle::Config::Direction::RECEIVE;
        sai_config[0].b_dir         = daisy::SaiHandle::Config::Direction::TRANSMIT;
    }
    else
    {
        sai_config[0].pin_config.sa = {DSY_GPIOE, 6};
        sai_config[0].pin_config.sb = {DSY_GPIOE, 3};
        sai_config[0].a_dir         = daisy::SaiHandle::Config::Direction::TRANSMIT;
        sai_config[0].b_dir         = daisy::SaiHandle::Config::Direction::RECEIVE;
    }
    sai_config[0].periph          = daisy::SaiHandle::Config::Peripheral::SAI_1;
    sai_config[0].sr              = daisy::SaiHandle::Config::SampleRate::SAI_48KHZ;
    sai_config[0].bit_depth       = daisy::SaiHandle::Config::BitDepth::SAI_24BIT;
    sai_config[0].a_sync          = daisy::SaiHandle::Config::Sync::MASTER;
    sai_config[0].b_sync          = daisy::SaiHandle::Config::Sync::SLAVE;
    sai_config[0].pin_config.fs   = {DSY_GPIOE, 4};
    sai_config[0].pin_config.mclk = {DSY_GPIOE, 2};
    sai_config[0].pin_config.sck  = {DSY_GPIOE, 5};
"#;

/// Renders the SAI setup for the onboard codec followed by `codecs`.
pub fn render(codecs: &[ExternalCodec]) -> String {
    let slots = codecs.len() + 1;
    let mut out = String::new();
    // `write!` into a String cannot fail.
    let _ = writeln!(out, "\n    daisy::SaiHandle::Config sai_config[{slots}];");
    out.push_str(ONBOARD);

    for (i, codec) in codecs.iter().enumerate() {
        let n = i + 1;
        let cfg = format!("sai_config[{n}]");
        let _ = writeln!(out);
        let _ = writeln!(out, "    {cfg}.periph          = daisy::SaiHandle::Config::Peripheral::{};", codec.periph);
        let _ = writeln!(out, "    {cfg}.sr              = daisy::SaiHandle::Config::SampleRate::SAI_48KHZ;");
        let _ = writeln!(out, "    {cfg}.bit_depth       = daisy::SaiHandle::Config::BitDepth::SAI_24BIT;");
        let _ = writeln!(out, "    {cfg}.a_sync          = daisy::SaiHandle::Config::Sync::{};", codec.a_sync);
        let _ = writeln!(out, "    {cfg}.b_sync          = daisy::SaiHandle::Config::Sync::{};", codec.b_sync);
        let _ = writeln!(out, "    {cfg}.a_dir           = daisy::SaiHandle::Config::Direction::{};", codec.a_dir);
        let _ = writeln!(out, "    {cfg}.b_dir           = daisy::SaiHandle::Config::Direction::{};", codec.b_dir);
        let _ = writeln!(out, "    {cfg}.pin_config.fs   = som.GetPin({});", codec.pin.fs);
        let _ = writeln!(out, "    {cfg}.pin_config.mclk = som.GetPin({});", codec.pin.mclk);
        let _ = writeln!(out, "    {cfg}.pin_config.sck  = som.GetPin({});", codec.pin.sck);
        let _ = writeln!(out, "    {cfg}.pin_config.sa   = som.GetPin({});", codec.pin.sa);
        let _ = writeln!(out, "    {cfg}.pin_config.sb   = som.GetPin({});", codec.pin.sb);
    }

    let _ = writeln!(out, "\n    daisy::SaiHandle sai_handle[{slots}];");
    for n in 0..slots {
        let _ = writeln!(out, "    sai_handle[{n}].Init(sai_config[{n}]);");
    }

    out.push_str("\n    dsy_gpio_pin codec_reset_pin = som.GetPin(29);\n");
    out.push_str("    daisy::Ak4556::Init(codec_reset_pin);\n\n");
    out.push_str("    daisy::AudioHandle::Config cfg;\n");
    out.push_str("    cfg.blocksize  = 48;\n");
    out.push_str("    cfg.samplerate = daisy::SaiHandle::Config::SampleRate::SAI_48KHZ;\n");
    out.push_str("    cfg.postgain   = 0.5f;\n");
    out.push_str("    som.audio_handle.Init(\n      cfg");
    for n in 0..slots {
        let _ = write!(out, ",\n      sai_handle[{n}]");
    }
    out.push_str(");\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::CodecPins;

    fn codec(periph: &str) -> ExternalCodec {
        ExternalCodec {
            periph: periph.to_string(),
            a_sync: "SLAVE".to_string(),
            b_sync: "MASTER".to_string(),
            a_dir: "TRANSMIT".to_string(),
            b_dir: "RECEIVE".to_string(),
            pin: CodecPins {
                fs: 27,
                mclk: 24,
                sck: 28,
                sa: 26,
                sb: 25,
            },
        }
    }

    #[test]
    fn onboard_codec_is_slot_zero() {
        let out = render(&[codec("SAI_2")]);
        assert!(out.contains("daisy::SaiHandle::Config sai_config[2];"));
        assert!(out.contains("sai_config[0].periph          = daisy::SaiHandle::Config::Peripheral::SAI_1;"));
        assert!(out.contains("sai_config[1].periph          = daisy::SaiHandle::Config::Peripheral::SAI_2;"));
        assert!(out.contains("sai_config[1].pin_config.fs   = som.GetPin(27);"));
        assert!(out.contains("sai_config[1].a_sync          = daisy::SaiHandle::Config::Sync::SLAVE;"));
    }

    #[test]
    fn handles_passed_in_order() {
        let out = render(&[codec("SAI_2"), codec("SAI_3")]);
        let first = out.find("sai_handle[1]").unwrap();
        let second = out.find("sai_handle[2]").unwrap();
        assert!(first < second);
        assert!(out.ends_with("cfg,\n      sai_handle[0],\n      sai_handle[1],\n      sai_handle[2]);\n"));
    }
}
