//! Catalog for the general-purpose Daisy Seed module.
//!
//! Pins are Seed header numbers resolved with `som.GetPin(n)`. Analog
//! controls share the on-chip ADC, configured channel by channel through
//! `cfg[{i}]` before `som.adc.Init`.

use crate::entry::{CatalogEntry, Direction, MappingTemplate as M};
use crate::kind::ComponentKind as K;
use patchbay_common::Phase;

const SWITCH_MAPPING: &[M] = &[
    M::get("{name}", "(hardware.{default_prefix}{name}.Pressed() ? 1.f : 0.f)").boolean(),
    M::get("{name}_rise", "(hardware.{default_prefix}{name}.RisingEdge() ? 1.f : 0.f)").boolean(),
    M::get("{name}_fall", "(hardware.{default_prefix}{name}.FallingEdge() ? 1.f : 0.f)").boolean(),
    M::get("{name}_seconds", "(hardware.{default_prefix}{name}.TimeHeldMs()*0.001f)").range(0.0, 10.0),
];

pub(crate) const SWITCH: CatalogEntry = CatalogEntry {
    typename: Some("daisy::Switch"),
    map_init: Some("{name}.Init(som.GetPin({pin}), som.AudioCallbackRate(), {type}, {polarity}, {pull});"),
    process: Some("{name}.Debounce();"),
    updaterate: Some("{name}.SetUpdateRate(som.AudioCallbackRate());"),
    defaults: &[
        ("type", "daisy::Switch::TYPE_MOMENTARY"),
        ("polarity", "daisy::Switch::POLARITY_INVERTED"),
        ("pull", "daisy::Switch::PULL_UP"),
        ("default_prefix", ""),
    ],
    mapping: SWITCH_MAPPING,
    ..CatalogEntry::blank(K::Switch, Direction::Input)
};

pub(crate) const SWITCH3: CatalogEntry = CatalogEntry {
    typename: Some("daisy::Switch3"),
    map_init: Some("{name}.Init(som.GetPin({pin_a}), som.GetPin({pin_b}));"),
    mapping: &[M::get("{name}", "(hardware.{name}.Read()*0.5f)")],
    ..CatalogEntry::blank(K::Switch3, Direction::Input)
};

const GATE_IN_MAPPING: &[M] = &[
    M::get("{name}", "(hardware.{default_prefix}{name}.State() ? 1.f : 0.f)").boolean(),
    M::get("{name}_trig", "(hardware.{default_prefix}{name}.Trig() ? 1.f : 0.f)").boolean(),
];

pub(crate) const GATE_IN: CatalogEntry = CatalogEntry {
    typename: Some("daisy::GateIn"),
    map_init: Some("dsy_gpio_pin {name}_pin = som.GetPin({pin});\n    {name}.Init(&{name}_pin);"),
    defaults: &[("default_prefix", "")],
    mapping: GATE_IN_MAPPING,
    ..CatalogEntry::blank(K::GateIn, Direction::Input)
};

const ENCODER_MAPPING: &[M] = &[
    M::get("{name}", "hardware.{name}.Increment()").range(-1.0, 1.0),
    M::get("{name}_press", "(hardware.{name}.Pressed() ? 1.f : 0.f)").boolean(),
    M::get("{name}_rise", "(hardware.{name}.RisingEdge() ? 1.f : 0.f)").boolean(),
    M::get("{name}_fall", "(hardware.{name}.FallingEdge() ? 1.f : 0.f)").boolean(),
    M::get("{name}_seconds", "(hardware.{name}.TimeHeldMs()*0.001f)").range(0.0, 10.0),
];

pub(crate) const ENCODER: CatalogEntry = CatalogEntry {
    typename: Some("daisy::Encoder"),
    map_init: Some(
        "{name}.Init(som.GetPin({pin_a}), som.GetPin({pin_b}), som.GetPin({pin_click}));",
    ),
    process: Some("{name}.Debounce();"),
    mapping: ENCODER_MAPPING,
    ..CatalogEntry::blank(K::Encoder, Direction::Input)
};

pub(crate) const ANALOG_CONTROL: CatalogEntry = CatalogEntry {
    typename: Some("daisy::AnalogControl"),
    init_single: Some("cfg[{i}].InitSingle(som.GetPin({pin}));"),
    map_init: Some("{name}.Init(som.adc.GetPtr({i}), som.AudioCallbackRate(), {flip}, {invert});"),
    process: Some("{name}.Process();"),
    updaterate: Some("{name}.SetSampleRate(som.AudioCallbackRate());"),
    defaults: &[("flip", "false"), ("invert", "false")],
    mapping: &[M::get("{name}", "hardware.{name}.Value()").automap()],
    ..CatalogEntry::blank(K::AnalogControl, Direction::Input)
};

pub(crate) const ANALOG_CONTROL_BIPOLAR: CatalogEntry = CatalogEntry {
    typename: Some("daisy::AnalogControl"),
    init_single: Some("cfg[{i}].InitSingle(som.GetPin({pin}));"),
    map_init: Some("{name}.InitBipolarCv(som.adc.GetPtr({i}), som.AudioCallbackRate());"),
    process: Some("{name}.Process();"),
    updaterate: Some("{name}.SetSampleRate(som.AudioCallbackRate());"),
    mapping: &[M::get("{name}", "hardware.{name}.Value()")
        .range(-1.0, 1.0)
        .automap()],
    ..CatalogEntry::blank(K::AnalogControlBipolar, Direction::Input)
};

pub(crate) const CD4051: CatalogEntry = CatalogEntry {
    init_single: Some(
        "cfg[{i}].InitMux(som.GetPin({pin_adc}), 8, som.GetPin({pin_sel0}), som.GetPin({pin_sel1}), som.GetPin({pin_sel2}));",
    ),
    ..CatalogEntry::blank(K::Cd4051, Direction::Structural)
};

pub(crate) const CD4051_ANALOG_CONTROL: CatalogEntry = CatalogEntry {
    typename: Some("daisy::AnalogControl"),
    map_init: Some(
        "{name}.Init(som.adc.GetMuxPtr({index_mux}, {index_channel}), som.AudioCallbackRate());",
    ),
    process: Some("{name}.Process();"),
    updaterate: Some("{name}.SetSampleRate(som.AudioCallbackRate());"),
    mapping: &[M::get("{name}", "hardware.{name}.Value()").automap()],
    ..CatalogEntry::blank(K::Cd4051AnalogControl, Direction::Input)
};

pub(crate) const CD4021: CatalogEntry = CatalogEntry {
    typename: Some("daisy::ShiftRegister4021<{chain_count}>"),
    map_init: Some(
        "daisy::ShiftRegister4021<{chain_count}>::Config {name}_cfg;\n    {name}_cfg.clk = som.GetPin({pin_clk});\n    {name}_cfg.latch = som.GetPin({pin_cs});\n    {name}_cfg.data[0] = som.GetPin({pin_data});\n    {name}.Init({name}_cfg);",
    ),
    process: Some("{name}.Update();"),
    defaults: &[("chain_count", "1")],
    ..CatalogEntry::blank(K::Cd4021, Direction::Structural)
};

pub(crate) const LED: CatalogEntry = CatalogEntry {
    typename: Some("daisy::Led"),
    map_init: Some("{name}.Init(som.GetPin({pin}), {invert});"),
    postprocess: Some("{name}.Update();"),
    defaults: &[("invert", "true")],
    mapping: &[M::set("{name}", "hardware.{name}.Set({value});", Phase::Main)],
    ..CatalogEntry::blank(K::Led, Direction::Output)
};

const RGB_LED_MAPPING: &[M] = &[
    M::set("{name}", "hardware.{name}.Set({value}, {value}, {value});", Phase::Main),
    M::set("{name}_red", "hardware.{name}.SetRed({value});", Phase::Main),
    M::set("{name}_green", "hardware.{name}.SetGreen({value});", Phase::Main),
    M::set("{name}_blue", "hardware.{name}.SetBlue({value});", Phase::Main),
];

pub(crate) const RGB_LED: CatalogEntry = CatalogEntry {
    typename: Some("daisy::RgbLed"),
    map_init: Some(
        "{name}.Init(som.GetPin({pin_r}), som.GetPin({pin_g}), som.GetPin({pin_b}), {invert});",
    ),
    postprocess: Some("{name}.Update();"),
    defaults: &[("invert", "true")],
    mapping: RGB_LED_MAPPING,
    ..CatalogEntry::blank(K::RgbLed, Direction::Output)
};

pub(crate) const GATE_OUT: CatalogEntry = CatalogEntry {
    typename: Some("dsy_gpio"),
    map_init: Some(
        "{name}.pin = som.GetPin({pin});\n    {name}.mode = {mode};\n    {name}.pull = {pull};\n    dsy_gpio_init(&{name});",
    ),
    defaults: &[("mode", "DSY_GPIO_MODE_OUTPUT_PP"), ("pull", "DSY_GPIO_NOPULL")],
    mapping: &[M::set(
        "{name}",
        "dsy_gpio_write(&hardware.{name}, {value} > 0.5f);",
        Phase::Audio,
    )],
    ..CatalogEntry::blank(K::GateOut, Direction::Output)
};

const CV_OUTS_MAPPING: &[M] = &[
    M::set(
        "{name}1",
        "hardware.som.dac.WriteValue(daisy::DacHandle::Channel::ONE, uint16_t({value} * 4095.f));",
        Phase::Audio,
    ),
    M::set(
        "{name}2",
        "hardware.som.dac.WriteValue(daisy::DacHandle::Channel::TWO, uint16_t({value} * 4095.f));",
        Phase::Audio,
    ),
];

pub(crate) const CV_OUTS: CatalogEntry = CatalogEntry {
    map_init: Some(
        "daisy::DacHandle::Config {name}_config;\n    {name}_config.bitdepth = daisy::DacHandle::BitDepth::BITS_12;\n    {name}_config.buff_state = daisy::DacHandle::BufferState::ENABLED;\n    {name}_config.mode = daisy::DacHandle::Mode::POLLING;\n    {name}_config.chn = daisy::DacHandle::Channel::BOTH;\n    som.dac.Init({name}_config);\n    som.dac.WriteValue(daisy::DacHandle::Channel::BOTH, 0);",
    ),
    mapping: CV_OUTS_MAPPING,
    ..CatalogEntry::blank(K::CvOuts, Direction::Output)
};

pub(crate) const I2C: CatalogEntry = CatalogEntry {
    typename: Some("daisy::I2CHandle"),
    map_init: Some(
        "daisy::I2CHandle::Config {name}_config;\n    {name}_config.periph = {periph};\n    {name}_config.speed = {speed};\n    {name}_config.pin_config.scl = som.GetPin({pin_scl});\n    {name}_config.pin_config.sda = som.GetPin({pin_sda});\n    {name}.Init({name}_config);",
    ),
    defaults: &[
        ("periph", "daisy::I2CHandle::Config::Peripheral::I2C_1"),
        ("speed", "daisy::I2CHandle::Config::Speed::I2C_1MHZ"),
        ("pin_scl", "11"),
        ("pin_sda", "12"),
    ],
    ..CatalogEntry::blank(K::I2c, Direction::Structural)
};

pub(crate) const PCA9685: CatalogEntry = CatalogEntry {
    typename: Some("daisy::LedDriverPca9685<{driver_count}, true>"),
    map_init: Some(
        "{name}.Init({parent}, {name}_addresses, {name}_dma_buffer_a, {name}_dma_buffer_b);",
    ),
    loopprocess: Some("{name}.SwapBuffersAndTransmit();"),
    non_class_decl: Some(
        "daisy::LedDriverPca9685<{driver_count}, true>::DmaBuffer DMA_BUFFER_MEM_SECTION {name}_dma_buffer_a, {name}_dma_buffer_b;\nconst uint8_t {name}_addresses[{driver_count}] = {addresses};",
    ),
    defaults: &[
        ("driver_count", "1"),
        ("addresses", "{0x00}"),
        ("parent", "i2c"),
    ],
    ..CatalogEntry::blank(K::Pca9685, Direction::Structural)
};

pub(crate) const MOTOR_SHIELD: CatalogEntry = CatalogEntry {
    typename: Some("daisy::MotorShield"),
    map_init: Some("daisy::MotorShield::Config {name}_config;\n    {name}_config.address = {address};\n    {name}.Init({name}_config);"),
    defaults: &[("address", "0x60")],
    ..CatalogEntry::blank(K::MotorShield, Direction::Structural)
};

pub(crate) const STEPPER_MOTOR: CatalogEntry = CatalogEntry {
    typename: Some("daisy::StepperMotor *"),
    map_init: Some("{name} = {parent}.GetStepper({steps}, {port});"),
    defaults: &[("parent", "motor_shield"), ("port", "1"), ("steps", "200")],
    mapping: &[M::set(
        "{name}",
        "hardware.{name}->Step({value} > 0.5f ? daisy::StepperMotor::FORWARD : daisy::StepperMotor::BACKWARD, daisy::StepperMotor::SINGLE);",
        Phase::Main,
    )],
    ..CatalogEntry::blank(K::StepperMotor, Direction::Output)
};

pub(crate) const DC_MOTOR: CatalogEntry = CatalogEntry {
    typename: Some("daisy::DcMotor *"),
    map_init: Some("{name} = {parent}.GetMotor({port});"),
    defaults: &[("parent", "motor_shield"), ("port", "1")],
    mapping: &[M::set("{name}", "hardware.{name}->SetSpeed({value});", Phase::Main)],
    ..CatalogEntry::blank(K::DcMotor, Direction::Output)
};

const I2C_SENSOR_INIT: &str =
    "{typename}::Config {name}_config;\n    {name}_config.transport_config.address = {address};\n    {name}.Init({name}_config);";

pub(crate) const BME280: CatalogEntry = CatalogEntry {
    typename: Some("daisy::Bme280I2C"),
    map_init: Some(I2C_SENSOR_INIT),
    defaults: &[("address", "0x76")],
    mapping: &[
        M::get("{name}_temp", "hardware.{name}.GetTemperature()").range(-40.0, 85.0),
        M::get("{name}_pressure", "hardware.{name}.GetPressure()").range(300.0, 1100.0),
        M::get("{name}_humidity", "hardware.{name}.GetHumidity()").range(0.0, 100.0),
    ],
    ..CatalogEntry::blank(K::Bme280, Direction::Input)
};

pub(crate) const HALL_SENSOR: CatalogEntry = CatalogEntry {
    typename: Some("daisy::HallSensor"),
    map_init: Some(
        "daisy::HallSensor::Config {name}_config;\n    {name}_config.transport_config.pin = som.GetPin({pin});\n    {name}.Init({name}_config);",
    ),
    mapping: &[M::get("{name}", "(float)hardware.{name}.GetRiseCount()")],
    ..CatalogEntry::blank(K::HallSensor, Direction::Input)
};

pub(crate) const TLV493D: CatalogEntry = CatalogEntry {
    typename: Some("daisy::Tlv493dI2C"),
    map_init: Some(I2C_SENSOR_INIT),
    loopprocess: Some("{name}.UpdateData();"),
    defaults: &[("address", "0x5E")],
    mapping: &[
        M::get("{name}_x", "hardware.{name}.GetX()").range(-1.0, 1.0),
        M::get("{name}_y", "hardware.{name}.GetY()").range(-1.0, 1.0),
        M::get("{name}_z", "hardware.{name}.GetZ()").range(-1.0, 1.0),
    ],
    ..CatalogEntry::blank(K::Tlv493d, Direction::Input)
};

pub(crate) const MPR121: CatalogEntry = CatalogEntry {
    typename: Some("daisy::Mpr121I2C"),
    map_init: Some(I2C_SENSOR_INIT),
    defaults: &[("address", "0x5A")],
    mapping: &[M::get("{name}", "(float)hardware.{name}.Touched()").range(0.0, 4095.0)],
    ..CatalogEntry::blank(K::Mpr121, Direction::Input)
};

pub(crate) const APDS9960: CatalogEntry = CatalogEntry {
    typename: Some("daisy::Apds9960I2C"),
    map_init: Some(I2C_SENSOR_INIT),
    defaults: &[("address", "0x39")],
    mapping: &[
        M::get("{name}_gesture", "(float)hardware.{name}.ReadGesture()").range(0.0, 4.0),
        M::get("{name}_prox", "(hardware.{name}.ReadProximity() / 255.f)"),
        M::get("{name}_red", "hardware.{name}.GetColorDataRed()"),
        M::get("{name}_green", "hardware.{name}.GetColorDataGreen()"),
        M::get("{name}_blue", "hardware.{name}.GetColorDataBlue()"),
    ],
    ..CatalogEntry::blank(K::Apds9960, Direction::Input)
};

pub(crate) const BMP390: CatalogEntry = CatalogEntry {
    typename: Some("daisy::Bmp390I2C"),
    map_init: Some(I2C_SENSOR_INIT),
    loopprocess: Some("{name}.Process();"),
    defaults: &[("address", "0x77")],
    mapping: &[
        M::get("{name}_temp", "hardware.{name}.GetTemperature()").range(-40.0, 85.0),
        M::get("{name}_pressure", "hardware.{name}.GetPressure()").range(300.0, 1250.0),
    ],
    ..CatalogEntry::blank(K::Bmp390, Direction::Input)
};

pub(crate) const VL53L1X: CatalogEntry = CatalogEntry {
    typename: Some("daisy::Vl53l1xI2C"),
    map_init: Some(I2C_SENSOR_INIT),
    defaults: &[("address", "0x29")],
    mapping: &[M::get("{name}", "(float)hardware.{name}.GetDistance()").range(0.0, 4000.0)],
    ..CatalogEntry::blank(K::Vl53l1x, Direction::Input)
};

pub(crate) const VL53L0X: CatalogEntry = CatalogEntry {
    typename: Some("daisy::Vl53l0xI2C"),
    map_init: Some(I2C_SENSOR_INIT),
    defaults: &[("address", "0x29")],
    mapping: &[M::get("{name}", "(float)hardware.{name}.GetDistance()").range(0.0, 2000.0)],
    ..CatalogEntry::blank(K::Vl53l0x, Direction::Input)
};

pub(crate) const NEO_TRELLIS: CatalogEntry = CatalogEntry {
    typename: Some("daisy::NeoTrellisI2C"),
    map_init: Some(I2C_SENSOR_INIT),
    loopprocess: Some("{name}.Process();"),
    defaults: &[("address", "0x2E"), ("key", "0")],
    mapping: &[M::get("{name}", "(hardware.{name}.GetState({key}) ? 1.f : 0.f)").boolean()],
    ..CatalogEntry::blank(K::NeoTrellis, Direction::Input)
};

pub(crate) const NEO_TRELLIS_LEDS: CatalogEntry = CatalogEntry {
    loopprocess: Some("{parent}.pixels.Show();"),
    defaults: &[("parent", "trellis"), ("index", "0")],
    mapping: &[M::set(
        "{name}",
        "hardware.{parent}.pixels.SetPixelColor({index}, uint32_t({value} * 255.f));",
        Phase::Main,
    )],
    ..CatalogEntry::blank(K::NeoTrellisLeds, Direction::Output)
};

pub(crate) const BNO055: CatalogEntry = CatalogEntry {
    typename: Some("daisy::Bno055I2C"),
    map_init: Some(I2C_SENSOR_INIT),
    loopprocess: Some("{name}.Process();"),
    defaults: &[("address", "0x28")],
    mapping: &[
        M::get("{name}_x", "hardware.{name}.GetEuler().x").range(0.0, 360.0),
        M::get("{name}_y", "hardware.{name}.GetEuler().y").range(-180.0, 180.0),
        M::get("{name}_z", "hardware.{name}.GetEuler().z").range(-90.0, 90.0),
    ],
    ..CatalogEntry::blank(K::Bno055, Direction::Input)
};

pub(crate) const ICM20948: CatalogEntry = CatalogEntry {
    typename: Some("daisy::Icm20948I2C"),
    map_init: Some(I2C_SENSOR_INIT),
    loopprocess: Some("{name}.Process();"),
    defaults: &[("address", "0x69")],
    mapping: &[
        M::get("{name}_accelx", "hardware.{name}.GetAccelVect().x").range(-1.0, 1.0),
        M::get("{name}_accely", "hardware.{name}.GetAccelVect().y").range(-1.0, 1.0),
        M::get("{name}_accelz", "hardware.{name}.GetAccelVect().z").range(-1.0, 1.0),
        M::get("{name}_gyrox", "hardware.{name}.GetGyroVect().x").range(-1.0, 1.0),
        M::get("{name}_gyroy", "hardware.{name}.GetGyroVect().y").range(-1.0, 1.0),
        M::get("{name}_gyroz", "hardware.{name}.GetGyroVect().z").range(-1.0, 1.0),
    ],
    ..CatalogEntry::blank(K::Icm20948, Direction::Input)
};

pub(crate) const DPS310: CatalogEntry = CatalogEntry {
    typename: Some("daisy::Dps310I2C"),
    map_init: Some(I2C_SENSOR_INIT),
    loopprocess: Some("{name}.Process();"),
    defaults: &[("address", "0x77")],
    mapping: &[
        M::get("{name}_temp", "hardware.{name}.GetTemperature()").range(-40.0, 85.0),
        M::get("{name}_pressure", "hardware.{name}.GetPressure()").range(300.0, 1200.0),
        M::get("{name}_altitude", "hardware.{name}.GetAltitude()").range(0.0, 1000.0),
    ],
    ..CatalogEntry::blank(K::Dps310, Direction::Input)
};

pub(crate) const CODE_CLASS: CatalogEntry = CatalogEntry {
    typename: Some("{class_name}"),
    map_init: Some("{name}.Init();"),
    ..CatalogEntry::blank(K::CodeClass, Direction::Input)
};

/// Returns the Seed catalog entry for `kind`.
pub fn entry(kind: K) -> &'static CatalogEntry {
    match kind {
        K::Switch => &SWITCH,
        K::Switch3 => &SWITCH3,
        K::GateIn => &GATE_IN,
        K::Encoder => &ENCODER,
        K::AnalogControl => &ANALOG_CONTROL,
        K::AnalogControlBipolar => &ANALOG_CONTROL_BIPOLAR,
        K::Cd4051 => &CD4051,
        K::Cd4051AnalogControl => &CD4051_ANALOG_CONTROL,
        K::Cd4021 => &CD4021,
        K::Led => &LED,
        K::RgbLed => &RGB_LED,
        K::GateOut => &GATE_OUT,
        K::CvOuts => &CV_OUTS,
        K::I2c => &I2C,
        K::Pca9685 => &PCA9685,
        K::MotorShield => &MOTOR_SHIELD,
        K::StepperMotor => &STEPPER_MOTOR,
        K::DcMotor => &DC_MOTOR,
        K::Bme280 => &BME280,
        K::HallSensor => &HALL_SENSOR,
        K::Tlv493d => &TLV493D,
        K::Mpr121 => &MPR121,
        K::Apds9960 => &APDS9960,
        K::Bmp390 => &BMP390,
        K::Vl53l1x => &VL53L1X,
        K::Vl53l0x => &VL53L0X,
        K::NeoTrellis => &NEO_TRELLIS,
        K::NeoTrellisLeds => &NEO_TRELLIS_LEDS,
        K::Bno055 => &BNO055,
        K::Icm20948 => &ICM20948,
        K::Dps310 => &DPS310,
        K::CodeClass => &CODE_CLASS,
    }
}
