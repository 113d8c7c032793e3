//! The closed vocabulary of component kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every kind of component a hardware descriptor may declare.
///
/// Descriptor files name kinds by their catalog spelling (`"AnalogControl"`,
/// `"i2c"`); anything else is rejected when the descriptor is compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    /// Momentary or latching push button.
    Switch,
    /// Three-position toggle switch.
    Switch3,
    /// Digital gate/trigger input jack.
    GateIn,
    /// Quadrature rotary encoder with push button.
    Encoder,
    /// Unipolar potentiometer or CV input on a dedicated ADC channel.
    AnalogControl,
    /// Bipolar CV input on a dedicated ADC channel.
    AnalogControlBipolar,
    /// 8-channel analog multiplexer feeding one ADC channel.
    #[serde(rename = "CD4051")]
    Cd4051,
    /// One channel of a CD4051 multiplexer.
    #[serde(rename = "CD4051AnalogControl")]
    Cd4051AnalogControl,
    /// Parallel-in shift register for banks of buttons.
    #[serde(rename = "CD4021")]
    Cd4021,
    /// Single-color LED on a PWM pin.
    Led,
    /// Three-pin RGB LED.
    RgbLed,
    /// Digital gate output jack.
    GateOut,
    /// Pair of DAC-driven CV outputs.
    #[serde(rename = "CVOuts")]
    CvOuts,
    /// I2C bus peripheral shared by attached devices.
    #[serde(rename = "i2c")]
    I2c,
    /// PCA9685 16-channel PWM LED driver.
    #[serde(rename = "PCA9685")]
    Pca9685,
    /// I2C motor driver board.
    MotorShield,
    /// Stepper motor on a motor shield port.
    StepperMotor,
    /// DC motor on a motor shield port.
    DcMotor,
    /// BME280 temperature/pressure/humidity sensor.
    Bme280,
    /// Hall-effect pulse sensor.
    HallSensor,
    /// TLV493D 3-axis magnetic sensor.
    Tlv493d,
    /// MPR121 capacitive touch controller.
    Mpr121,
    /// APDS9960 gesture/proximity/color sensor.
    Apds9960,
    /// BMP390 pressure sensor.
    Bmp390,
    /// VL53L1X time-of-flight distance sensor.
    Vl53l1x,
    /// VL53L0X time-of-flight distance sensor.
    Vl53l0x,
    /// NeoTrellis 4x4 button pad.
    NeoTrellis,
    /// The RGB pixels of a NeoTrellis pad.
    NeoTrellisLeds,
    /// BNO055 absolute orientation sensor.
    Bno055,
    /// ICM20948 9-axis motion sensor.
    Icm20948,
    /// DPS310 barometric sensor.
    Dps310,
    /// User-supplied C++ class with its own header.
    CodeClass,
}

impl ComponentKind {
    /// All kinds, in the order their initialization appears in the board header.
    pub const ALL: [ComponentKind; 32] = [
        ComponentKind::I2c,
        ComponentKind::Pca9685,
        ComponentKind::Switch,
        ComponentKind::Switch3,
        ComponentKind::Cd4021,
        ComponentKind::GateIn,
        ComponentKind::Encoder,
        ComponentKind::AnalogControl,
        ComponentKind::AnalogControlBipolar,
        ComponentKind::Cd4051,
        ComponentKind::Cd4051AnalogControl,
        ComponentKind::Led,
        ComponentKind::RgbLed,
        ComponentKind::GateOut,
        ComponentKind::CvOuts,
        ComponentKind::MotorShield,
        ComponentKind::StepperMotor,
        ComponentKind::DcMotor,
        ComponentKind::Bme280,
        ComponentKind::HallSensor,
        ComponentKind::Tlv493d,
        ComponentKind::Mpr121,
        ComponentKind::Apds9960,
        ComponentKind::Bmp390,
        ComponentKind::Vl53l1x,
        ComponentKind::Vl53l0x,
        ComponentKind::NeoTrellis,
        ComponentKind::NeoTrellisLeds,
        ComponentKind::Bno055,
        ComponentKind::Icm20948,
        ComponentKind::Dps310,
        ComponentKind::CodeClass,
    ];

    /// Returns the descriptor spelling of this kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Switch => "Switch",
            Self::Switch3 => "Switch3",
            Self::GateIn => "GateIn",
            Self::Encoder => "Encoder",
            Self::AnalogControl => "AnalogControl",
            Self::AnalogControlBipolar => "AnalogControlBipolar",
            Self::Cd4051 => "CD4051",
            Self::Cd4051AnalogControl => "CD4051AnalogControl",
            Self::Cd4021 => "CD4021",
            Self::Led => "Led",
            Self::RgbLed => "RgbLed",
            Self::GateOut => "GateOut",
            Self::CvOuts => "CVOuts",
            Self::I2c => "i2c",
            Self::Pca9685 => "PCA9685",
            Self::MotorShield => "MotorShield",
            Self::StepperMotor => "StepperMotor",
            Self::DcMotor => "DcMotor",
            Self::Bme280 => "Bme280",
            Self::HallSensor => "HallSensor",
            Self::Tlv493d => "Tlv493d",
            Self::Mpr121 => "Mpr121",
            Self::Apds9960 => "Apds9960",
            Self::Bmp390 => "Bmp390",
            Self::Vl53l1x => "Vl53l1x",
            Self::Vl53l0x => "Vl53l0x",
            Self::NeoTrellis => "NeoTrellis",
            Self::NeoTrellisLeds => "NeoTrellisLeds",
            Self::Bno055 => "Bno055",
            Self::Icm20948 => "Icm20948",
            Self::Dps310 => "Dps310",
            Self::CodeClass => "CodeClass",
        }
    }

    /// Looks a kind up by its descriptor spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Returns `true` for kinds that occupy a channel of the on-chip ADC.
    pub fn uses_adc_channel(self) -> bool {
        matches!(
            self,
            Self::AnalogControl | Self::AnalogControlBipolar | Self::Cd4051
        )
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
