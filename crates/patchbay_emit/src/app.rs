//! Rendering of one app struct.
//!
//! Each app becomes `struct App_<name> : public oopsy::App<App_<name>>` with
//! parameter and output members and the entry points the runtime calls:
//! `init`, `audioCallback`, `mainloopCallback`, `displayCallback`, plus
//! `setparam` and `paramCallback` on targets with a parameter view.

use crate::error::EmitError;
use crate::fragment::{CodeWriter, Fragment};
use patchbay_common::{cpp_number, format_map, CppType, Missing, Phase};
use patchbay_hardware::{Defines, HardwareDescriptor};
use patchbay_wiring::{App, DataBinding, DeviceOutput, OutputDrive, ParamSource};

/// Target-wide state shared by every app of a build.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// The compiled target.
    pub hw: &'a HardwareDescriptor,
    /// Final defines of the build.
    pub defines: &'a Defines,
    /// Sample rate in kHz, for the MIDI throttle.
    pub samplerate_khz: u32,
}

fn render(
    owner: &str,
    field: &'static str,
    template: &str,
    vars: &[(&str, &str)],
) -> Result<String, EmitError> {
    format_map(template, Missing::Error, |key| {
        vars.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string())
    })
    .map_err(|source| EmitError::Template {
        owner: owner.to_string(),
        field,
        source,
    })
}

fn setter(o: &DeviceOutput) -> Result<String, EmitError> {
    render(&o.name, "setter", &o.code, &[("value", &o.name)])
}

fn data_code(d: &DataBinding, field: &'static str, template: &str) -> Result<String, EmitError> {
    render(&d.handler, field, template, &[("name", &d.handler), ("data", &d.data)])
}

/// Struct name of an app.
pub fn struct_name(app: &App) -> String {
    format!("App_{}", app.name)
}

/// Union member holding an app.
pub fn member_name(app: &App) -> String {
    format!("app_{}", app.name)
}

/// Messages per throttle period allowed by the MIDI baud rate, as a frame
/// divisor: `ceil(n * kHz / 32)`.
pub fn throttle_period(count: usize, samplerate_khz: u32) -> u64 {
    (count as u64 * u64::from(samplerate_khz)).div_ceil(32)
}

/// Writes the struct of `app`.
pub fn write_app(w: &mut CodeWriter, app: &App, ctx: &Context<'_>) -> Result<(), EmitError> {
    let fragments: Vec<Fragment> = app
        .inserts
        .iter()
        .chain(&ctx.hw.inserts)
        .map(Fragment::from)
        .collect();
    let name = struct_name(app);

    w.open(format!("struct {name} : public oopsy::App<{name}> {{"));
    write_members(w, app);
    w.blank();
    write_init(w, app, ctx)?;
    w.blank();
    write_audio(w, app, ctx, &fragments)?;
    w.blank();
    write_mainloop(w, app, ctx, &fragments)?;
    w.blank();
    write_display(w, app, &fragments)?;
    if ctx.defines.is_set("OOPSY_HAS_PARAM_VIEW") {
        w.blank();
        write_param_view(w, app);
    }
    w.close("};");
    Ok(())
}

fn write_members(w: &mut CodeWriter, app: &App) {
    for p in &app.params {
        w.line(format!("{} {};", p.ty, p.var));
    }
    for h in &app.histories {
        w.line(format!("uint8_t {};", h.var));
    }
    for o in &app.device_outputs {
        w.line(format!("float {};", o.name));
    }
    for g in &app.glue_buffers {
        w.line(format!("float {g}[OOPSY_BLOCK_SIZE];"));
    }
}

fn gen_state(w: &mut CodeWriter, app: &App) {
    w.line("Daisy& hardware = daisy.hardware;");
    w.line(format!("{0}::State& gen = *({0}::State *)daisy.gen;", app.name));
}

fn write_init(w: &mut CodeWriter, app: &App, ctx: &Context<'_>) -> Result<(), EmitError> {
    w.open("void init(oopsy::GenDaisy& daisy) {");
    w.line(format!(
        "daisy.gen = {}::create(daisy.hardware.som.AudioSampleRate(), daisy.hardware.som.AudioBlockSize());",
        app.name
    ));
    w.line(format!("{0}::State& gen = *({0}::State *)daisy.gen;", app.name));
    w.line(format!("daisy.param_count = {};", app.params.len()));
    if ctx.defines.is_set("OOPSY_HAS_PARAM_VIEW") {
        w.line(format!("daisy.param_selected = {};", app.param_selected));
    }
    for p in &app.params {
        w.line(format!("{} = {};", p.var, cpp_number(p.default, p.ty)));
    }
    for o in &app.device_outputs {
        w.line(format!("{} = 0.f;", o.name));
    }
    for h in &app.histories {
        w.line(format!("{} = {};", h.var, h.initial));
    }
    for d in &app.datas {
        if let Some(init) = &d.init {
            w.line(data_code(d, "init", init)?);
        }
    }
    w.close("}");
    Ok(())
}

fn write_audio(
    w: &mut CodeWriter,
    app: &App,
    ctx: &Context<'_>,
    fragments: &[Fragment],
) -> Result<(), EmitError> {
    w.open("void audioCallback(oopsy::GenDaisy& daisy, float **hardware_ins, float **hardware_outs, size_t size) {");
    gen_state(w, app);
    w.line("hardware.ProcessAllControls();");
    w.fragments(fragments, Phase::Audio);

    // controls
    for i in &app.device_inputs {
        if let Some(update) = i.update.as_ref().filter(|u| u.phase == Phase::Audio) {
            w.line(render(&i.name, "update", &update.code, &[("name", &i.name)])?);
        }
    }
    for i in &app.device_inputs {
        w.line(format!("float {} = {};", i.name, i.code.trim_end().trim_end_matches(';')));
    }
    for p in &app.params {
        if let ParamSource::Hardware(input) = &p.source {
            w.line(format!(
                "{} = ({})({input}*{} + {});",
                p.var,
                p.ty,
                cpp_number(p.scaling.scale, CppType::Float),
                cpp_number(p.scaling.code_offset(p.ty), CppType::Float)
            ));
        }
    }
    for p in &app.params {
        w.line(format!("gen.set_{}({});", p.name, p.var));
    }

    // patch
    for (i, name) in app.hardware_ins.iter().enumerate() {
        w.line(format!("float * {name} = hardware_ins[{i}];"));
    }
    for (i, out) in app.hardware_outs.iter().enumerate() {
        w.line(format!("float * {} = hardware_outs[{i}];", out.name));
    }
    if let Some(buf) = &app.midi_in_buffer {
        w.line(format!("float * {buf} = daisy.midi_in_data;"));
    }
    let labels = |ls: Vec<&str>| ls.join(", ");
    let pointers = |ps: Vec<String>| {
        if ps.is_empty() {
            "nullptr".to_string()
        } else {
            ps.join(", ")
        }
    };
    w.line(format!(
        "// {}:",
        labels(app.audio_ins.iter().map(|a| a.label.as_str()).collect())
    ));
    w.line(format!(
        "float * inputs[] = {{ {} }};",
        pointers(
            app.audio_ins
                .iter()
                .map(|a| a.source.clone().unwrap_or_else(|| "nullptr".to_string()))
                .collect()
        )
    ));
    w.line(format!(
        "// {}:",
        labels(app.audio_outs.iter().map(|a| a.label.as_str()).collect())
    ));
    w.line(format!(
        "float * outputs[] = {{ {} }};",
        pointers(app.audio_outs.iter().map(|a| a.buffer.clone()).collect())
    ));
    w.line("gen.perform(inputs, outputs, size);");

    // outputs
    for o in &app.device_outputs {
        match &o.drive {
            OutputDrive::Idle => {}
            OutputDrive::Expr(e) => {
                w.line(format!("{} = {e};", o.name));
            }
            OutputDrive::Sum(bufs) => {
                let terms: Vec<String> = bufs.iter().map(|b| format!("{b}[size-1]")).collect();
                w.line(format!("{} = {};", o.name, terms.join(" + ")));
            }
        }
    }
    write_setters(w, app, Phase::Audio)?;
    write_datas(w, app, Phase::Audio)?;

    let sends = app.midi_send_count();
    if sends > 0 {
        w.open(format!(
            "if (daisy.frames % {} == 0) {{ // throttle output for MIDI baud limits",
            throttle_period(sends, ctx.samplerate_khz)
        ));
        for s in app.audio_outs.iter().filter_map(|o| o.midi_setter.as_deref()) {
            w.line(s);
        }
        for h in &app.histories {
            w.open(format!("if ({} != ({})) {{", h.var, h.byte));
            w.line(format!("{} = {};", h.var, h.byte));
            w.line(&h.send);
            w.close("}");
        }
        w.close("}");
    }
    if app.has_midi_out {
        for feed in &app.midi_out_feeds {
            w.line(format!("daisy.midi_postperform({feed}, size);"));
        }
    }
    for out in &app.hardware_outs {
        match &out.source {
            Some(src) if *src == out.name => {}
            Some(src) => {
                w.line(format!("memcpy({}, {src}, sizeof(float)*size);", out.name));
            }
            None => {
                w.line(format!("memset({}, 0, sizeof(float)*size);", out.name));
            }
        }
    }
    w.fragments(fragments, Phase::PostAudio);
    w.line("hardware.PostProcess();");
    w.close("}");
    Ok(())
}

fn write_setters(w: &mut CodeWriter, app: &App, phase: Phase) -> Result<(), EmitError> {
    for o in app.device_outputs.iter().filter(|o| o.is_driven() && o.phase == phase) {
        w.line(setter(o)?);
    }
    Ok(())
}

fn write_datas(w: &mut CodeWriter, app: &App, phase: Phase) -> Result<(), EmitError> {
    for d in app.datas.iter().filter(|d| d.phase == phase) {
        if let Some(code) = &d.code {
            w.line(data_code(d, "code", code)?);
        }
    }
    Ok(())
}

fn midi_codes(app: &App, phase: Phase) -> Vec<&str> {
    app.params
        .iter()
        .filter_map(|p| match &p.source {
            ParamSource::Midi(m) if m.phase == phase => Some(m.code.as_str()),
            _ => None,
        })
        .collect()
}

fn else_chain(w: &mut CodeWriter, branches: &[String]) {
    for (i, b) in branches.iter().enumerate() {
        if i == 0 {
            w.line(b);
        } else {
            w.line(format!("else {b}"));
        }
    }
}

fn write_mainloop(
    w: &mut CodeWriter,
    app: &App,
    ctx: &Context<'_>,
    fragments: &[Fragment],
) -> Result<(), EmitError> {
    w.open("void mainloopCallback(oopsy::GenDaisy& daisy, uint32_t t, uint32_t dt) {");
    gen_state(w, app);
    w.line("hardware.LoopProcess();");
    w.fragments(fragments, Phase::Main);
    write_datas(w, app, Phase::Main)?;
    write_setters(w, app, Phase::Main)?;

    if !ctx.defines.is_set("OOPSY_TARGET_USES_MIDI_UART") {
        w.line("// no midi input handling");
        w.close("}");
        return Ok(());
    }
    w.open("while (daisy.uart.Readable()) {");
    w.line("uint8_t byte = daisy.uart.PopRx();");
    w.open("if (byte >= 128) { // status byte");
    let mut status: Vec<String> = midi_codes(app, Phase::MidiStatus)
        .into_iter()
        .map(String::from)
        .collect();
    status.push(
        "if (byte <= 240 || byte == 247) {\ndaisy.midi.status = byte;\ndaisy.midi.lastbyte = 255; // no data bytes yet\n}"
            .to_string(),
    );
    else_chain_block(w, &status);
    w.reopen("} else {");
    w.line("daisy.midi.lastbyte = !daisy.midi.lastbyte;");
    w.line("daisy.midi.byte[daisy.midi.lastbyte] = byte;");
    let mut msgs: Vec<String> = midi_codes(app, Phase::MidiMsg)
        .into_iter()
        .map(String::from)
        .collect();
    if ctx.defines.is_set("OOPSY_MULTI_APP") {
        msgs.push(
            "if (daisy.midi.status/16 == 12) { daisy.schedule_app_load(daisy.midi.byte[daisy.midi.lastbyte]); } // program change"
                .to_string(),
        );
    }
    else_chain(w, &msgs);
    w.close("}");
    if app.has_generic_midi_in {
        w.open("if (daisy.midi_in_written < OOPSY_BLOCK_SIZE) {");
        w.line("// bytes scaled into [0, 1) to protect hardware from accidental patching");
        w.line("daisy.midi_in_data[daisy.midi_in_written] = byte / 256.0f;");
        w.line("daisy.midi_in_written++;");
        w.close("}");
    }
    w.line("daisy.midi_in_active = 1;");
    w.close("}");
    w.close("}");
    Ok(())
}

/// Like [`else_chain`], for branches whose body spans several lines.
fn else_chain_block(w: &mut CodeWriter, branches: &[String]) {
    for (i, b) in branches.iter().enumerate() {
        let mut lines = b.lines();
        let Some(head) = lines.next() else { continue };
        let body: Vec<&str> = lines.collect();
        let head = if i == 0 { head.to_string() } else { format!("else {head}") };
        match body.split_last() {
            Some((last, inner)) => {
                w.open(head);
                for l in inner {
                    w.line(l);
                }
                w.close(last);
            }
            None => {
                w.line(head);
            }
        }
    }
}

fn write_display(w: &mut CodeWriter, app: &App, fragments: &[Fragment]) -> Result<(), EmitError> {
    w.open("void displayCallback(oopsy::GenDaisy& daisy, uint32_t t, uint32_t dt) {");
    gen_state(w, app);
    w.line("hardware.Display();");
    w.fragments(fragments, Phase::Display);
    write_datas(w, app, Phase::Display)?;
    write_setters(w, app, Phase::Display)?;
    w.close("}");
    Ok(())
}

fn pad(s: &str, width: usize) -> String {
    let cut: String = s.chars().take(width).collect();
    format!("{cut:<width$}")
}

fn write_param_view(w: &mut CodeWriter, app: &App) {
    w.open("float setparam(int idx, float val) {");
    w.open("switch(idx) {");
    for (i, p) in app.params.iter().enumerate() {
        let (min, max) = (cpp_number(p.min, p.ty), cpp_number(p.max, p.ty));
        w.line(format!(
            "case {i}: return {} = ({})((val > {max}) ? {max} : (val < {min}) ? {min} : val);",
            p.var, p.ty
        ));
    }
    w.close("}");
    w.line("return 0.f;");
    w.close("}");
    w.blank();

    w.line("#if defined(OOPSY_TARGET_HAS_OLED) && defined(OOPSY_HAS_PARAM_VIEW)");
    w.open("void paramCallback(oopsy::GenDaisy& daisy, int idx, char * label, int len, bool tweak) {");
    w.open("switch(idx) {");
    for (i, p) in app.params.iter().enumerate() {
        w.open(format!("case {i}:"));
        w.line("#ifdef OOPSY_CAN_PARAM_TWEAK");
        let step = match p.ty {
            CppType::Float => format!(" * {}", cpp_number(p.stepsize, CppType::Float)),
            _ => String::new(),
        };
        w.line(format!(
            "if (tweak) setparam({i}, {} + daisy.menu_button_incr{step});",
            p.var
        ));
        w.line("#endif // OOPSY_CAN_PARAM_TWEAK");
        let label = pad(&p.label, 11);
        match p.source_name() {
            Some(src) => w.line(format!(
                "snprintf(label, len, \"{} {label}\" FLT_FMT3 \"\", FLT_VAR3({}));",
                pad(src, 3),
                p.var
            )),
            None => w.line(format!(
                "snprintf(label, len, \"%s {label}\" FLT_FMT3 \"\", (daisy.param_is_tweaking && {i} == daisy.param_selected) ? \"enc\" : \"   \", FLT_VAR3({}));",
                p.var
            )),
        };
        w.close("break;");
    }
    w.close("}");
    w.close("}");
    w.line("#endif // defined(OOPSY_TARGET_HAS_OLED) && defined(OOPSY_HAS_PARAM_VIEW)");
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchbay_diagnostics::DiagnosticSink;
    use patchbay_hardware::{compile, parse_descriptor};
    use patchbay_patch::{HistoryOutput, MidiPattern, Parameter, PatchDescriptor};
    use patchbay_wiring::resolve;

    const BOARD: &str = r#"{
        "name": "box",
        "defines": {
            "OOPSY_TARGET_HAS_MIDI_INPUT": 1,
            "OOPSY_TARGET_HAS_MIDI_OUTPUT": 1,
            "OOPSY_HAS_PARAM_VIEW": 1
        },
        "components": {
            "knob1": {"component": "AnalogControl", "pin": 15},
            "led1": {"component": "Led", "pin": 22}
        },
        "datahandlers": {
            "sd": {"init": "{name}.Init({data});", "code": "{name}.Process({data});", "where": "main"}
        },
        "labels": {"outs": {"light": "led1"}, "datas": {"sample": "sd"}},
        "inserts": [{"where": "post_audio", "code": "hardware.Tick();"}]
    }"#;

    fn param(name: &str, min: f64, max: f64, default: f64) -> Parameter {
        Parameter {
            name: name.into(),
            cname: format!("m_{name}_1"),
            index: 0,
            min,
            max,
            default,
        }
    }

    fn render_with(patch: &PatchDescriptor, extra_defines: &[(&str, &str)]) -> String {
        let sink = DiagnosticSink::new();
        let hw = compile(&parse_descriptor(BOARD).unwrap(), None, &sink).unwrap();
        let app = resolve(patch, &hw, &sink).unwrap();
        let mut defines = crate::defines::target_defines(&hw, &Default::default(), &[&app]);
        for (k, v) in extra_defines {
            defines.set(k, v);
        }
        let ctx = Context {
            hw: &hw,
            defines: &defines,
            samplerate_khz: 48,
        };
        let mut w = CodeWriter::new();
        write_app(&mut w, &app, &ctx).unwrap();
        w.finish()
    }

    fn patch() -> PatchDescriptor {
        PatchDescriptor {
            name: "synth".into(),
            audio_inputs: vec!["in1".into()],
            audio_outputs: vec!["out1".into(), "out2".into(), "light".into()],
            parameters: vec![param("cutoff", 20.0, 2000.0, 440.0), param("gain", 0.0, 1.0, 0.5)],
            ..PatchDescriptor::default()
        }
    }

    fn index(code: &str, needle: &str) -> usize {
        code.find(needle).unwrap_or_else(|| panic!("missing `{needle}` in\n{code}"))
    }

    #[test]
    fn struct_and_members() {
        let code = render_with(&patch(), &[]);
        assert!(code.starts_with("struct App_synth : public oopsy::App<App_synth> {\n"));
        assert!(code.contains("\tfloat gen_param_cutoff;\n"));
        assert!(code.contains("\tfloat led1;\n"));
        assert!(code.contains("\tfloat glue_out3[OOPSY_BLOCK_SIZE];\n"));
        assert!(code.ends_with("};\n"));
    }

    #[test]
    fn init_sets_defaults() {
        let code = render_with(&patch(), &[]);
        assert!(code.contains("daisy.gen = synth::create(daisy.hardware.som.AudioSampleRate(), daisy.hardware.som.AudioBlockSize());"));
        assert!(code.contains("daisy.param_count = 2;"));
        assert!(code.contains("daisy.param_selected = 1;"));
        assert!(code.contains("gen_param_cutoff = 440.f;"));
        assert!(code.contains("led1 = 0.f;"));
    }

    #[test]
    fn audio_callback_order() {
        let code = render_with(&patch(), &[]);
        let read = index(&code, "float knob1 = hardware.knob1.Value();");
        let scale = index(&code, "gen_param_cutoff = (float)(knob1*1980.f + 20.f);");
        let set = index(&code, "gen.set_cutoff(gen_param_cutoff);");
        let perform = index(&code, "gen.perform(inputs, outputs, size);");
        let drive = index(&code, "led1 = glue_out3[size-1];");
        let write = index(&code, "hardware.led1.Set(led1);");
        let post = index(&code, "hardware.Tick();");
        assert!(read < scale && scale < set && set < perform);
        assert!(perform < drive && drive < write && write < post);
        assert!(code.contains("float * inputs[] = { dsy_in1 };"));
        assert!(code.contains("// out1, out2, light:"));
        assert!(code.contains("float * outputs[] = { dsy_out1, dsy_out2, glue_out3 };"));
        assert!(!code.contains("memcpy"));
        assert!(!code.contains("memset"));
    }

    #[test]
    fn unbound_param_is_set_but_not_scaled() {
        let code = render_with(&patch(), &[]);
        assert!(code.contains("gen.set_gain(gen_param_gain);"));
        assert!(!code.contains("gen_param_gain = (float)("));
    }

    #[test]
    fn silent_channels_are_cleared_or_copied() {
        let mut p = patch();
        p.audio_outputs = vec!["out1".into()];
        let code = render_with(&p, &[]);
        assert!(code.contains("memcpy(dsy_out2, dsy_out1, sizeof(float)*size);"));
        p.audio_outputs.clear();
        let code = render_with(&p, &[]);
        assert!(code.contains("float * outputs[] = { nullptr };"));
        assert!(code.contains("memset(dsy_out1, 0, sizeof(float)*size);"));
    }

    #[test]
    fn midi_uart_parser() {
        let mut p = patch();
        p.parameters.push(param("midi_cc74", 0.0, 1.0, 0.0));
        p.parameters.push(param("midi_clock", 0.0, 1.0, 0.0));
        let code = render_with(&p, &[]);
        let status = index(&code, "if (byte >= 128) { // status byte");
        let clock = index(&code, "if (byte == 248) { gen_param_midi_clock = 1.f; }");
        let generic = index(&code, "else if (byte <= 240 || byte == 247) {");
        let cc = index(&code, "daisy.midi.byte[0] == 74) { gen_param_midi_cc74 = ");
        assert!(status < clock && clock < generic && generic < cc);
        assert!(code.contains("gen_param_midi_clock = 0.f;"));
        assert!(!code.contains("schedule_app_load"));
    }

    #[test]
    fn no_uart_without_midi() {
        let code = render_with(&patch(), &[]);
        assert!(code.contains("// no midi input handling"));
        assert!(!code.contains("daisy.uart"));
    }

    #[test]
    fn midi_history_throttled() {
        let mut p = patch();
        p.histories.push(HistoryOutput {
            name: "midi_cc74".into(),
            cname: "m_midi_cc74_2".into(),
            default: 0.0,
            midi: MidiPattern::parse("midi_cc74"),
        });
        let code = render_with(&p, &[]);
        assert!(code.contains("\tuint8_t gen_history_midi_cc74;\n"));
        // one message at 48kHz: ceil(48/32)
        assert!(code.contains("if (daisy.frames % 2 == 0) { // throttle output for MIDI baud limits"));
        assert!(code.contains(
            "if (gen_history_midi_cc74 != ((uint8_t(gen.m_midi_cc74_2*127.f)) & 0x7F)) {"
        ));
        assert!(code.contains("daisy.midi_message3(176, 74, gen_history_midi_cc74);"));
    }

    #[test]
    fn data_handlers_render_name_and_data() {
        let mut p = patch();
        p.data_buffers.push(patchbay_patch::DataBuffer {
            name: "sample_kick".into(),
            cname: "m_sample_kick_3".into(),
            frames: 48000,
            channels: 1,
            source_file: None,
        });
        let code = render_with(&p, &[]);
        assert!(code.contains("sd.Init(gen.m_sample_kick_3);"));
        let main = index(&code, "void mainloopCallback");
        assert!(index(&code, "sd.Process(gen.m_sample_kick_3);") > main);
    }

    #[test]
    fn param_view() {
        let code = render_with(&patch(), &[]);
        assert!(code.contains(
            "case 0: return gen_param_cutoff = (float)((val > 2000.f) ? 2000.f : (val < 20.f) ? 20.f : val);"
        ));
        assert!(code.contains("snprintf(label, len, \"kno cutoff     \" FLT_FMT3 \"\", FLT_VAR3(gen_param_cutoff));"));
        assert!(code.contains("(daisy.param_is_tweaking && 1 == daisy.param_selected) ? \"enc\" : \"   \""));
        assert!(code.contains("if (tweak) setparam(0, gen_param_cutoff + daisy.menu_button_incr * 16.f);"));
    }

    #[test]
    fn bad_setter_template_names_owner() {
        let sink = DiagnosticSink::new();
        let mut hw = compile(
            &parse_descriptor(r#"{"outputs": {"lamp": {"code": "lamp.Set({value});"}}, "labels": {"outs": {"lamp": "lamp"}}}"#)
                .unwrap(),
            None,
            &sink,
        )
        .unwrap();
        // descriptors are checked at compile time; a hand-built model is not
        hw.outputs[0].code = "lamp.Set({level});".into();
        let p = PatchDescriptor {
            name: "x".into(),
            audio_outputs: vec!["lamp".into()],
            ..PatchDescriptor::default()
        };
        let app = resolve(&p, &hw, &sink).unwrap();
        let defines = crate::defines::target_defines(&hw, &Default::default(), &[&app]);
        let ctx = Context {
            hw: &hw,
            defines: &defines,
            samplerate_khz: 48,
        };
        let err = write_app(&mut CodeWriter::new(), &app, &ctx).unwrap_err();
        assert!(matches!(err, EmitError::Template { ref owner, field: "setter", .. } if owner == "lamp"));
    }

    #[test]
    fn throttle_rounds_up() {
        assert_eq!(throttle_period(1, 48), 2);
        assert_eq!(throttle_period(2, 48), 3);
        assert_eq!(throttle_period(1, 32), 1);
        assert_eq!(throttle_period(3, 96), 9);
    }
}
