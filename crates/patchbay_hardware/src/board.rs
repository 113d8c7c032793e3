//! Rendering of the C++ board support header.
//!
//! The header declares one struct per device with `Init`, the per-phase
//! processing hooks and every component as a member. Initialization runs in
//! a fixed order so that buses and the ADC are configured before the
//! controls that use them.

use crate::codec;
use crate::model::{Component, HardwareDescriptor};
use patchbay_catalog::{ComponentKind as K, Som};

enum Section {
    Kinds(&'static [K], &'static str),
    AdcSingle,
    AdcInit,
    Display,
}

const INIT_ORDER: &[Section] = &[
    Section::Kinds(&[K::I2c], "i2c"),
    Section::Kinds(&[K::Pca9685], "LED Drivers"),
    Section::Kinds(&[K::Switch], "Switches"),
    Section::Kinds(&[K::Switch3], "SPDT Switches"),
    Section::Kinds(&[K::Cd4021], "Muxes"),
    Section::Kinds(&[K::GateIn], "Gate ins"),
    Section::Kinds(&[K::Encoder], "Rotary encoders"),
    Section::AdcSingle,
    Section::AdcInit,
    Section::Kinds(&[K::AnalogControl, K::AnalogControlBipolar], "AnalogControl objects"),
    Section::Kinds(&[K::Cd4051AnalogControl], "Multiplexed AnalogControl objects"),
    Section::Kinds(&[K::Led], "LEDs"),
    Section::Kinds(&[K::RgbLed], "RGB LEDs"),
    Section::Kinds(&[K::GateOut], "Gate outs"),
    Section::Kinds(&[K::CvOuts], "DAC"),
    Section::Display,
    Section::Kinds(&[K::MotorShield], "Motor Shield"),
    Section::Kinds(&[K::StepperMotor], "Stepper Motor"),
    Section::Kinds(&[K::DcMotor], "DC Motor"),
    Section::Kinds(&[K::Bme280], "BME sensor"),
    Section::Kinds(&[K::HallSensor], "Hall Effect Sensor"),
    Section::Kinds(&[K::Tlv493d], "TLV Sensor"),
    Section::Kinds(&[K::Mpr121], "MPR Sensor"),
    Section::Kinds(&[K::Apds9960], "APDS Sensor"),
    Section::Kinds(&[K::Bmp390], "BMP Sensor"),
    Section::Kinds(&[K::Vl53l1x], "VL53L1X Sensor"),
    Section::Kinds(&[K::Vl53l0x], "VL53L0X Sensor"),
    Section::Kinds(&[K::NeoTrellis], "Neo Trellis"),
    Section::Kinds(&[K::NeoTrellisLeds], "NeoTrellis LEDs"),
    Section::Kinds(&[K::Bno055], "BNO Sensor"),
    Section::Kinds(&[K::Icm20948], "Icm20948 Sensor"),
    Section::Kinds(&[K::Dps310], "Dps310 Sensor"),
    Section::Kinds(&[K::CodeClass], "Custom classes"),
];

/// Returns the number of ADC channels the board configures.
pub fn analog_count(hw: &HardwareDescriptor) -> usize {
    hw.components.iter().filter(|c| c.adc_channel.is_some()).count()
}

/// Returns the header guard macro for a device name.
pub fn guard_name(name: &str) -> String {
    format!("__PATCHBAY_{}_H__", name.to_uppercase())
}

fn live(hw: &HardwareDescriptor) -> impl Iterator<Item = &Component> {
    hw.components.iter().filter(|c| !c.is_default)
}

fn collect<'a>(
    hw: &'a HardwareDescriptor,
    field: impl Fn(&'a Component) -> Option<&'a String>,
) -> Vec<&'a str> {
    live(hw).filter_map(field).map(String::as_str).collect()
}

fn block(out: &mut String, indent: &str, lines: &[&str]) {
    for line in lines {
        out.push_str(indent);
        out.push_str(line);
        out.push('\n');
    }
}

fn render_init(hw: &HardwareDescriptor) -> String {
    let mut out = String::new();
    let adc = analog_count(hw);

    for section in INIT_ORDER {
        match section {
            Section::Kinds(kinds, comment) => {
                let lines: Vec<&str> = live(hw)
                    .filter(|c| kinds.contains(&c.kind))
                    .filter_map(|c| c.map_init.as_deref())
                    .collect();
                if !lines.is_empty() {
                    out.push_str(&format!("\n    // {comment}\n"));
                    block(&mut out, "    ", &lines);
                }
            }
            Section::AdcSingle => {
                let lines = collect(hw, |c| c.init_single.as_ref());
                if !lines.is_empty() {
                    out.push_str("\n    // Single channel ADC initialization\n");
                    block(&mut out, "    ", &lines);
                }
            }
            Section::AdcInit => {
                if hw.som.configures_adc() && adc > 0 {
                    out.push_str("    som.adc.Init(cfg, ANALOG_COUNT);\n");
                }
            }
            Section::Display => {
                if let Some(d) = &hw.display {
                    out.push_str("\n    // Display\n");
                    out.push_str(&format!(
                        "    daisy::OledDisplay<{}>::Config display_config;\n",
                        d.driver
                    ));
                    out.push_str("    display_config.driver_config.transport_config.Defaults();\n");
                    out.push_str("    display.Init(display_config);\n");
                    out.push_str("    display.Fill(0);\n");
                    out.push_str("    display.Update();\n");
                }
            }
        }
    }

    if !hw.external_codecs.is_empty() {
        out.push_str(&codec::render(&hw.external_codecs));
    }
    if hw.som.configures_adc() {
        out.push_str("\n    som.adc.Start();\n");
    }
    out
}

fn render_set_sample_rate(hw: &HardwareDescriptor, rates: &[&str]) -> String {
    let mut out = String::new();
    out.push_str("  /** Sets the audio sample rate\n   *  \\param sample_rate the new sample rate in Hz\n   */\n");
    out.push_str("  void SetAudioSampleRate(size_t sample_rate)\n  {\n");
    match hw.som {
        Som::PatchSm => out.push_str("    som.SetAudioSampleRate(sample_rate);\n"),
        Som::Seed => {
            out.push_str("    daisy::SaiHandle::Config::SampleRate enum_rate;\n");
            out.push_str("    if (sample_rate >= 96000)\n      enum_rate = daisy::SaiHandle::Config::SampleRate::SAI_96KHZ;\n");
            out.push_str("    else if (sample_rate >= 48000)\n      enum_rate = daisy::SaiHandle::Config::SampleRate::SAI_48KHZ;\n");
            out.push_str("    else if (sample_rate >= 32000)\n      enum_rate = daisy::SaiHandle::Config::SampleRate::SAI_32KHZ;\n");
            out.push_str("    else if (sample_rate >= 16000)\n      enum_rate = daisy::SaiHandle::Config::SampleRate::SAI_16KHZ;\n");
            out.push_str("    else\n      enum_rate = daisy::SaiHandle::Config::SampleRate::SAI_8KHZ;\n");
            out.push_str("    som.SetAudioSampleRate(enum_rate);\n");
        }
    }
    block(&mut out, "    ", rates);
    out.push_str("  }\n\n");

    out.push_str("  /** Sets the audio sample rate\n   *  \\param sample_rate the new sample rate as an enum\n   */\n");
    out.push_str("  void SetAudioSampleRate(daisy::SaiHandle::Config::SampleRate sample_rate)\n  {\n");
    match hw.som {
        Som::Seed => out.push_str("    som.SetAudioSampleRate(sample_rate);\n"),
        Som::PatchSm => {
            out.push_str("    size_t hz_rate;\n    switch (sample_rate)\n    {\n");
            out.push_str("      case (daisy::SaiHandle::Config::SampleRate::SAI_96KHZ):\n        hz_rate = 96000;\n        break;\n");
            out.push_str("      default:\n      case (daisy::SaiHandle::Config::SampleRate::SAI_48KHZ):\n        hz_rate = 48000;\n        break;\n");
            out.push_str("      case (daisy::SaiHandle::Config::SampleRate::SAI_32KHZ):\n        hz_rate = 32000;\n        break;\n");
            out.push_str("      case (daisy::SaiHandle::Config::SampleRate::SAI_16KHZ):\n        hz_rate = 16000;\n        break;\n");
            out.push_str("      case (daisy::SaiHandle::Config::SampleRate::SAI_8KHZ):\n        hz_rate = 8000;\n        break;\n");
            out.push_str("    }\n    som.SetAudioSampleRate(hz_rate);\n");
        }
    }
    block(&mut out, "    ", rates);
    out.push_str("  }\n\n");
    out
}

/// Renders the board support header of `hw`.
pub fn render(hw: &HardwareDescriptor) -> String {
    let guard = guard_name(&hw.name);
    let mut out = String::new();

    out.push_str(&format!("#ifndef {guard}\n#define {guard}\n\n"));
    out.push_str(&format!("#include \"{}\"\n", hw.som.header()));
    if hw.som == Som::Seed {
        out.push_str("#include \"dev/codec_ak4556.h\"\n");
    }
    if hw.display.is_some() {
        out.push_str("#include \"dev/oled_ssd130x.h\"\n");
    }
    for header in hw.components.iter().filter_map(|c| c.header.as_deref()) {
        out.push_str(&format!("#include \"{header}\"\n"));
    }
    out.push_str(&format!("\n#define ANALOG_COUNT {}\n\n", analog_count(hw)));
    out.push_str("namespace patchbay {\n\n");

    let non_class = collect(hw, |c| c.non_class_decl.as_ref());
    if !non_class.is_empty() {
        block(&mut out, "", &non_class);
        out.push('\n');
    }

    out.push_str(&format!("struct {} {{\n\n", hw.struct_name()));

    out.push_str("  /** Initializes the board according to the hardware descriptor\n");
    out.push_str("   *  \\param boost boosts the clock speed from 400 to 480 MHz\n   */\n");
    out.push_str("  void Init(bool boost=true)\n  {\n");
    match hw.som {
        Som::Seed => out.push_str("    som.Configure();\n    som.Init(boost);\n"),
        Som::PatchSm => out.push_str("    som.Init();\n"),
    }
    block(&mut out, "    ", &collect(hw, |c| c.init.as_ref()));
    out.push_str(&render_init(hw));
    out.push_str("  }\n\n");

    out.push_str("  /** Handles all the controls processing that needs to occur at the block rate\n   */\n");
    out.push_str("  void ProcessAllControls()\n  {\n");
    block(&mut out, "    ", &collect(hw, |c| c.process.as_ref()));
    if hw.som == Som::PatchSm {
        out.push_str("    som.ProcessAllControls();\n");
    }
    out.push_str("  }\n\n");

    out.push_str("  /** Handles all the maintenance processing. This should be run last within the audio callback.\n   */\n");
    out.push_str("  void PostProcess()\n  {\n");
    block(&mut out, "    ", &collect(hw, |c| c.postprocess.as_ref()));
    out.push_str("  }\n\n");

    out.push_str("  /** Handles processing that shouldn't occur in the audio block, such as blocking transfers\n   */\n");
    out.push_str("  void LoopProcess()\n  {\n");
    block(&mut out, "    ", &collect(hw, |c| c.loopprocess.as_ref()));
    out.push_str("  }\n\n");

    out.push_str("  /** Handles display-related processing\n   */\n");
    out.push_str("  void Display()\n  {\n");
    block(&mut out, "    ", &collect(hw, |c| c.display.as_ref()));
    out.push_str("  }\n\n");

    out.push_str(&render_set_sample_rate(hw, &collect(hw, |c| c.updaterate.as_ref())));

    out.push_str("  /** Sets the audio block size\n   *  \\param block_size the new block size in words\n   */\n");
    out.push_str("  inline void SetAudioBlockSize(size_t block_size)\n  {\n");
    out.push_str("    som.SetAudioBlockSize(block_size);\n  }\n\n");

    out.push_str("  /** Starts up the audio callback process with the given callback\n   */\n");
    out.push_str("  inline void StartAudio(daisy::AudioHandle::AudioCallback cb)\n  {\n");
    out.push_str("    som.StartAudio(cb);\n  }\n\n");

    out.push_str("  /** This is the board's \"System On Module\"\n   */\n");
    out.push_str(&format!("  {} som;\n", hw.som.class_name()));
    if hw.som.configures_adc() {
        out.push_str("  daisy::AdcChannelConfig cfg[ANALOG_COUNT];\n");
    }

    out.push_str("\n  // I/O Components\n");
    for c in live(hw) {
        if let Some(typename) = &c.typename {
            out.push_str(&format!("  {typename} {};\n", c.name));
        }
    }
    if let Some(d) = &hw.display {
        out.push_str(&format!("  daisy::OledDisplay<{}> display;\n", d.driver));
    }

    out.push_str("\n  // Menu variables\n  int menu_click = 0, menu_hold = 0, menu_rotate = 0;\n");
    out.push_str("};\n\n} // namespace patchbay\n\n");
    out.push_str(&format!("#endif // {guard}\n"));
    out
}
