//! Exported patch sources and hardware descriptors shared by the tests.
//!
//! The patches are trimmed exports: they keep the idioms the analyzer reads
//! and drop the DSP body.

/// A stereo reverb with four float parameters and no MIDI.
pub const REVERB: &str = r#"
#include "reverb.h"

namespace reverb {

static const int GENLIB_LOOPCOUNT_BAIL = 100000;

typedef struct State {
	CommonState __commonstate;
	Delay m_delay_4;
	Delay m_delay_5;
	int vectorsize;
	t_sample m_wet_19;
	t_sample m_decay_20;
	t_sample m_damping_18;
	t_sample m_predelay_17;
	t_sample samplerate;
	inline void reset(t_param __sr, int __vs) {
		vectorsize = __vs;
		samplerate = __sr;
		m_delay_4.reset("m_delay_4", ((int)924));
		m_delay_5.reset("m_delay_5", (samplerate * 0.25));
		m_predelay_17 = ((int)10);
		m_damping_18 = ((t_sample)0.5);
		m_wet_19 = ((t_sample)0.35);
		m_decay_20 = ((t_sample)0.8);
		genlib_reset_complete(this);
	};
	inline void set_predelay(t_param _value) {
		m_predelay_17 = (_value < 0 ? 0 : (_value > 250 ? 250 : _value));
	};
} State;

int gen_kernel_numins = 2;
int gen_kernel_numouts = 2;

const char *gen_kernel_innames[] = { "in1", "in2" };
const char *gen_kernel_outnames[] = { "out1", "out2" };

void *create(t_param sr, long vs) {
	State *self = new State;
	self->reset(sr, vs);
	ParamInfo *pi;
	self->__commonstate.inputnames = gen_kernel_innames;
	self->__commonstate.outputnames = gen_kernel_outnames;
	self->__commonstate.numparams = 4;
	pi = self->__commonstate.params + 0;
	pi->name = "damping";
	pi->paramtype = GENLIB_PARAMTYPE_FLOAT;
	pi->defaultvalue = self->m_damping_18;
	pi->hasinputminmax = false;
	pi->hasminmax = true;
	pi->outputmin = 0;
	pi->outputmax = 1;
	pi->exp = 0;
	pi->units = "";		// no units defined
	pi = self->__commonstate.params + 1;
	pi->name = "decay";
	pi->paramtype = GENLIB_PARAMTYPE_FLOAT;
	pi->defaultvalue = self->m_decay_20;
	pi->outputmin = 0;
	pi->outputmax = 1;
	pi->units = "";		// no units defined
	pi = self->__commonstate.params + 2;
	pi->name = "predelay";
	pi->paramtype = GENLIB_PARAMTYPE_FLOAT;
	pi->defaultvalue = self->m_predelay_17;
	pi->outputmin = 0;
	pi->outputmax = 250;
	pi->units = "";		// no units defined
	pi = self->__commonstate.params + 3;
	pi->name = "wet";
	pi->paramtype = GENLIB_PARAMTYPE_FLOAT;
	pi->defaultvalue = self->m_wet_19;
	pi->outputmin = 0;
	pi->outputmax = 1;
	pi->units = "";		// no units defined
	return self;
}

} // reverb::
"#;

/// A patch that writes raw MIDI bytes to a `midi` outlet, sends a CC from
/// a history and keeps a byte queue in a data buffer.
pub const MIDI_OUTPUT: &str = r#"
#include "midi_output.h"

namespace midi_output {

typedef struct State {
	CommonState __commonstate;
	Change __m_change_5;
	Data m_midioutbuf_3;
	int vectorsize;
	t_sample m_read_2;
	t_sample samplerate;
	t_sample m_written_1;
	t_sample m_midi_cc74_out_6;
	inline void reset(t_param __sr, int __vs) {
		vectorsize = __vs;
		samplerate = __sr;
		m_written_1 = ((int)0);
		m_read_2 = ((int)0);
		m_midioutbuf_3.reset("midioutbuf", ((int)2048), ((int)1));
		m_midi_cc74_out_6 = ((t_sample)0.5);
		__m_change_5.reset(0);
		genlib_reset_complete(this);
	};
} State;

const char *gen_kernel_innames[] = { "in1" };
const char *gen_kernel_outnames[] = { "out1", "out2", "midi" };

void *create(t_param sr, long vs) {
	State *self = new State;
	self->reset(sr, vs);
	ParamInfo *pi;
	pi = self->__commonstate.params + 0;
	pi->name = "midioutbuf";
	pi->paramtype = GENLIB_PARAMTYPE_SYM;
	pi->defaultvalue = 0.;
	pi->units = "";		// no units defined
	return self;
}

} // midi_output::
"#;

/// A mono synth voice driven by MIDI: note velocity, mod wheel and pitch
/// bend, with a labelled cutoff parameter and an LED history.
pub const SYNTH: &str = r#"
namespace synth {

typedef struct State {
	CommonState __commonstate;
	t_sample m_midi_vel60_7;
	t_sample m_midi_cc1_8;
	t_sample m_midi_bend_9;
	t_sample m_cutoff_10;
	t_sample m_led1_out_11;
	t_sample samplerate;
	inline void reset(t_param __sr, int __vs) {
		samplerate = __sr;
		m_midi_vel60_7 = ((int)0);
		m_midi_cc1_8 = ((int)0);
		m_midi_bend_9 = ((int)0);
		m_cutoff_10 = ((int)1000);
		m_led1_out_11 = ((int)0);
	};
} State;

const char *gen_kernel_innames[] = { };
const char *gen_kernel_outnames[] = { "out1" };

void *create(t_param sr, long vs) {
	State *self = new State;
	ParamInfo *pi;
	pi = self->__commonstate.params + 0;
	pi->name = "midi_vel60";
	pi->paramtype = GENLIB_PARAMTYPE_FLOAT;
	pi->defaultvalue = self->m_midi_vel60_7;
	pi->outputmin = 0;
	pi->outputmax = 1;
	pi = self->__commonstate.params + 1;
	pi->name = "midi_cc1";
	pi->paramtype = GENLIB_PARAMTYPE_FLOAT;
	pi->defaultvalue = self->m_midi_cc1_8;
	pi->outputmin = 0;
	pi->outputmax = 1;
	pi = self->__commonstate.params + 2;
	pi->name = "midi_bend";
	pi->paramtype = GENLIB_PARAMTYPE_FLOAT;
	pi->defaultvalue = self->m_midi_bend_9;
	pi->outputmin = -1;
	pi->outputmax = 1;
	pi = self->__commonstate.params + 3;
	pi->name = "knob2_cutoff";
	pi->paramtype = GENLIB_PARAMTYPE_FLOAT;
	pi->defaultvalue = self->m_cutoff_10;
	pi->outputmin = 20;
	pi->outputmax = 8000;
	return self;
}

} // synth::
"#;

/// A small pedal-style board: two knobs, a switch, an LED, MIDI in.
pub const POD: &str = r#"{
    "name": "pod",
    "max_apps": 8,
    "defines": {"OOPSY_TARGET_HAS_MIDI_INPUT": 1},
    "components": {
        "knob1": {"component": "AnalogControl", "pin": 21},
        "knob2": {"component": "AnalogControl", "pin": 15},
        "sw1": {"component": "Switch", "pin": 28},
        "led1": {"component": "Led", "pin": 22}
    },
    "aliases": {"button": "sw1"}
}"#;

/// A larger board with MIDI in and out, an OLED, an encoder, an SD card
/// data handler and prefix labels.
pub const DESK: &str = r#"{
    "name": "desk",
    "max_apps": 2,
    "defines": {
        "OOPSY_TARGET_HAS_MIDI_INPUT": 1,
        "OOPSY_TARGET_HAS_MIDI_OUTPUT": 1,
        "OOPSY_HAS_PARAM_VIEW": 1,
        "OOPSY_HAS_ENCODER": 1
    },
    "display": {},
    "components": {
        "knob1": {"component": "AnalogControl", "pin": 15},
        "knob2": {"component": "AnalogControl", "pin": 16},
        "encoder": {"component": "Encoder", "pin_a": 26, "pin_b": 25, "pin_click": 0},
        "led1": {"component": "Led", "pin": 22}
    },
    "datahandlers": {
        "sd": {"init": "{name}.Init({data});", "code": "{name}.Process({data});", "where": "main"}
    },
    "labels": {
        "params": {"mix": "knob1"},
        "outs": {"light": "led1"},
        "datas": {"sample": "sd"}
    },
    "inserts": [
        {"where": "init", "code": "hardware.som.StartLog();"}
    ]
}"#;
