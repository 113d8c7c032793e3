//! MIDI input parsing and throttled MIDI output through the whole pipeline.

use patchbay_conformance::fixtures::{DESK, MIDI_OUTPUT, POD, REVERB, SYNTH};
use patchbay_conformance::full_pipeline;
use patchbay_wiring::ParamSource;

#[test]
fn midi_params_listen_on_the_uart() {
    let r = full_pipeline("pod", POD, &[("synth.cpp", SYNTH)]).unwrap();
    let app = r.app("synth").unwrap();
    assert!(app.has_midi_in);
    for name in ["midi_vel60", "midi_cc1", "midi_bend"] {
        assert!(matches!(app.param(name).unwrap().source, ParamSource::Midi(_)), "{name}");
    }

    let src = r.source();
    assert!(src.contains("#define OOPSY_TARGET_USES_MIDI_UART (1)"));
    assert!(src.contains("while (daisy.uart.Readable()) {"));
    assert!(src.contains("if (byte <= 240 || byte == 247) {"));
    assert!(src.contains("daisy.midi.byte[daisy.midi.lastbyte] = byte;"));
    assert!(src.contains("daisy.midi.status/16 == 11 && daisy.midi.byte[0] == 1)"));
    assert!(src.contains("daisy.midi.status/16 == 14)"));
    assert!(src.contains("daisy.midi.byte[0] == 60)"));
    assert!(src.contains("daisy.midi_in_active = 1;"));
    // MIDI-bound params are not rescaled from hardware
    assert!(!src.contains("gen_param_midi_cc1 = (float)("));
    assert!(src.contains("gen.set_midi_cc1(gen_param_midi_cc1);"));
}

#[test]
fn midi_branches_chain_with_else() {
    let r = full_pipeline("pod", POD, &[("synth.cpp", SYNTH)]).unwrap();
    let src = r.source();
    let vel = src.find("daisy.midi.byte[0] == 60)").unwrap();
    let cc = src.find("else if (daisy.midi.lastbyte == 1 && daisy.midi.status/16 == 11").unwrap();
    let bend = src.find("else if (daisy.midi.lastbyte == 1 && daisy.midi.status/16 == 14").unwrap();
    assert!(vel < cc && cc < bend);
}

#[test]
fn no_uart_code_without_midi() {
    let r = full_pipeline("pod", POD, &[("reverb.cpp", REVERB)]).unwrap();
    let src = r.source();
    assert!(!src.contains("OOPSY_TARGET_USES_MIDI_UART"));
    assert!(src.contains("// no midi input handling"));
    assert!(!src.contains("daisy.uart.Readable()"));
}

#[test]
fn midi_output_is_fed_and_throttled() {
    let r = full_pipeline("desk", DESK, &[("midi_output.cpp", MIDI_OUTPUT)]).unwrap();
    let app = r.app("midi_output").unwrap();
    assert!(app.has_midi_out);
    assert_eq!(app.midi_out_feeds, ["glue_out3"]);
    assert_eq!(app.histories.len(), 1);
    assert_eq!(app.histories[0].initial, 63);

    let src = r.source();
    assert!(src.contains("float glue_out3[OOPSY_BLOCK_SIZE];"));
    assert!(src.contains("float * outputs[] = { dsy_out1, dsy_out2, glue_out3 };"));
    assert!(src.contains("uint8_t gen_history_midi_cc74;"));
    assert!(src.contains("gen_history_midi_cc74 = 63;"));
    assert!(src.contains("if (daisy.frames % 2 == 0) { // throttle output for MIDI baud limits"));
    assert!(src.contains(
        "if (gen_history_midi_cc74 != ((uint8_t(gen.m_midi_cc74_out_6*127.f)) & 0x7F)) {"
    ));
    assert!(src.contains("daisy.midi_message3(176, 74, gen_history_midi_cc74);"));
    assert!(src.contains("daisy.midi_postperform(glue_out3, size);"));
    assert!(src.contains("#define OOPSY_TARGET_USES_MIDI_UART (1)"));
}

#[test]
fn unmatched_data_buffer_warns() {
    let r = full_pipeline("desk", DESK, &[("midi_output.cpp", MIDI_OUTPUT)]).unwrap();
    assert!(r.has_code("W302"));
    assert!(r.app("midi_output").unwrap().datas.is_empty());
}

#[test]
fn labelled_data_buffer_binds_to_handler() {
    let source = MIDI_OUTPUT.replace("\"midioutbuf\"", "\"sample_loop\"");
    let r = full_pipeline("desk", DESK, &[("midi_output.cpp", &source)]).unwrap();
    let app = r.app("midi_output").unwrap();
    assert_eq!(app.datas.len(), 1);
    assert_eq!(app.datas[0].handler, "sd");
    assert!(r.source().contains("sd.Init(gen.m_midioutbuf_3);"));
    assert!(r.source().contains("sd.Process(gen.m_midioutbuf_3);"));
    assert!(!r.has_code("W302"));
}
