//! The wiring resolver.
//!
//! Binding runs in a fixed order: audio ports, histories, parameters, data
//! buffers, then automapping of idle controls, parameter scaling, and
//! finally normalization of undriven outputs. Every step iterates ordered
//! sequences, so the same inputs always produce the same [`App`].

use crate::app::{
    App, AudioInBinding, AudioOutBinding, DataBinding, DeviceInput, DeviceOutput, HardwareAudioOut,
    MidiHistory, OutputDrive, ParamBinding, ParamSource,
};
use crate::bind::{self, Namespace};
use crate::error::WiringError;
use crate::graph::{NodeId, NodeKind, SignalGraph};
use crate::midi;
use crate::scale::{stepsize, Scaling};
use patchbay_common::{CppType, Phase};
use patchbay_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use patchbay_hardware::{HardwareDescriptor, InsertDef};
use patchbay_patch::{MidiKind, PatchDescriptor};
use tracing::{debug, info};

/// An automap-eligible hardware input was left without a parameter.
pub const W301: DiagnosticCode = DiagnosticCode::new(Category::Warning, 301);
/// A data buffer matched no data handler.
pub const W302: DiagnosticCode = DiagnosticCode::new(Category::Warning, 302);

const MIDI_IN: &str = "dsy_midi_in";
const MIDI_OUT: &str = "dsy_midi_out";

/// Pairs idle controls with unbound parameters, first fit in order.
///
/// Returns `(input, param)` pairs; surplus entries on either side stay unpaired.
pub fn automap_pairs<I: Copy, P: Copy>(inputs: &[I], params: &[P]) -> Vec<(I, P)> {
    inputs.iter().copied().zip(params.iter().copied()).collect()
}

struct Resolver<'a> {
    hw: &'a HardwareDescriptor,
    graph: SignalGraph,
    io_count: u32,
    hardware_ins: Vec<String>,
    hardware_outs: Vec<String>,
    midi_in: Option<NodeId>,
    midi_out: Option<NodeId>,
}

/// Wires `patch` to `hw`.
///
/// Non-fatal conditions (controls left idle, buffers with no handler) are
/// reported to `sink`.
pub fn resolve(
    patch: &PatchDescriptor,
    hw: &HardwareDescriptor,
    sink: &DiagnosticSink,
) -> Result<App, WiringError> {
    let mut r = Resolver::new(hw);
    let mut app = App {
        name: patch.name.clone(),
        graph: SignalGraph::new(),
        audio_ins: Vec::new(),
        audio_outs: Vec::new(),
        glue_buffers: Vec::new(),
        hardware_ins: r.hardware_ins.clone(),
        hardware_outs: Vec::new(),
        midi_in_buffer: None,
        midi_out_feeds: Vec::new(),
        device_inputs: Vec::new(),
        device_outputs: Vec::new(),
        params: Vec::new(),
        histories: Vec::new(),
        datas: Vec::new(),
        inserts: Vec::new(),
        has_midi_in: false,
        has_generic_midi_in: false,
        has_midi_out: false,
        param_selected: 0,
    };

    r.audio_inputs(patch, &mut app);
    r.audio_outputs(patch, &mut app)?;
    let history_drives = r.histories(patch, &mut app)?;
    r.params(patch, &mut app)?;
    r.datas(patch, &mut app, sink)?;
    r.automap(&mut app, sink);

    for p in app.params.iter_mut() {
        if let ParamSource::Hardware(input) = &p.source {
            let range = hw.input(input).and_then(|s| s.range);
            p.scaling = Scaling::new(p.min, p.max, range);
        }
    }
    app.param_selected = app.params.iter().position(|p| !p.is_bound()).unwrap_or(0);

    app.device_inputs = hw
        .inputs
        .iter()
        .filter(|s| r.graph.find(&s.name).map_or(false, |id| !r.graph.node(id).targets.is_empty()))
        .map(|s| DeviceInput {
            name: s.name.clone(),
            code: s.code.clone(),
            update: s.update.clone(),
        })
        .collect();

    app.device_outputs = r.normalize_device_outputs(&history_drives);
    app.hardware_outs = r.normalize_audio_outputs();

    if app.has_midi_in {
        app.midi_in_buffer = r.midi_in.map(|_| MIDI_IN.to_string());
    }

    info!(
        app = %app.name,
        params = app.params.len(),
        bound = app.params.iter().filter(|p| p.is_bound()).count(),
        histories = app.histories.len(),
        datas = app.datas.len(),
        midi_in = app.has_midi_in,
        midi_out = app.has_midi_out,
        "resolved wiring"
    );
    app.graph = r.graph;
    Ok(app)
}

impl<'a> Resolver<'a> {
    fn new(hw: &'a HardwareDescriptor) -> Self {
        let mut graph = SignalGraph::new();
        for s in &hw.inputs {
            let id = graph.add_node(&s.name, NodeKind::HardwareInput);
            let node = graph.node_mut(id);
            node.range = s.range;
            node.code = Some(s.code.clone());
        }
        for d in &hw.datahandlers {
            let id = graph.add_node(&d.name, NodeKind::DataHandler);
            let node = graph.node_mut(id);
            node.code = d.code.clone();
            node.phase = d.phase;
        }
        for s in &hw.outputs {
            let id = graph.add_node(&s.name, NodeKind::HardwareOutput);
            let node = graph.node_mut(id);
            node.code = Some(s.code.clone());
            node.phase = s.phase;
        }

        let io_count = hw.defines.get_u32("OOPSY_IO_COUNT").unwrap_or(2);
        let hardware_ins: Vec<String> = (1..=io_count).map(|i| format!("dsy_in{i}")).collect();
        let hardware_outs: Vec<String> = (1..=io_count).map(|i| format!("dsy_out{i}")).collect();
        for name in &hardware_ins {
            graph.add_node(name, NodeKind::AudioIn);
        }
        for name in &hardware_outs {
            graph.add_node(name, NodeKind::AudioOut);
        }
        let midi_in = hw
            .defines
            .is_set("OOPSY_TARGET_HAS_MIDI_INPUT")
            .then(|| graph.add_node(MIDI_IN, NodeKind::MidiIn));
        let midi_out = hw
            .defines
            .is_set("OOPSY_TARGET_HAS_MIDI_OUTPUT")
            .then(|| graph.add_node(MIDI_OUT, NodeKind::MidiOut));

        Self {
            hw,
            graph,
            io_count,
            hardware_ins,
            hardware_outs,
            midi_in,
            midi_out,
        }
    }

    fn node(&self, name: &str) -> Option<NodeId> {
        self.graph.find(name)
    }

    fn audio_inputs(&mut self, patch: &PatchDescriptor, app: &mut App) {
        for (i, label) in patch.audio_inputs.iter().enumerate() {
            let label = label.trim().to_string();
            let port = self.graph.add_node(format!("gen_in{}", i + 1), NodeKind::PatchIn);
            let source = match self.midi_in {
                Some(midi) if label == "midi" => {
                    app.has_midi_in = true;
                    app.has_generic_midi_in = true;
                    Some(midi)
                }
                _ if self.hardware_ins.is_empty() => None,
                _ => self.node(&self.hardware_ins[i % self.hardware_ins.len()]),
            };
            if let Some(src) = source {
                self.graph.bind(src, port);
            }
            let source = source.map(|id| self.graph.name(id).to_string());
            debug!(port = i + 1, %label, source = ?source, "audio input");
            app.audio_ins.push(AudioInBinding { label, source });
        }
    }

    fn audio_outputs(&mut self, patch: &PatchDescriptor, app: &mut App) -> Result<(), WiringError> {
        for (i, label) in patch.audio_outputs.iter().enumerate() {
            let label = label.trim();
            let port = self.graph.add_node(format!("gen_out{}", i + 1), NodeKind::PatchOut);
            let buffer = match self.hardware_outs.get(i) {
                Some(name) => name.clone(),
                None => {
                    let name = format!("glue_out{}", i + 1);
                    self.graph.add_node(&name, NodeKind::Glue);
                    app.glue_buffers.push(name.clone());
                    name
                }
            };
            let buffer_id = self.graph.add_node(&buffer, NodeKind::Glue);

            let mut binding = AudioOutBinding {
                label: label.to_string(),
                buffer: buffer.clone(),
                target: None,
                midi_setter: None,
            };

            let setter = patchbay_patch::MidiPattern::parse(label).and_then(|p| {
                midi::send_statement(&p, &midi::byte_expr(p.kind, &format!("{buffer}[size-1]")))
            });
            if let Some(setter) = setter {
                app.has_midi_out = true;
                binding.midi_setter = Some(setter);
            } else if let (Some(midi), "midi") = (self.midi_out, label) {
                app.has_midi_out = true;
                self.graph.feed(buffer_id, midi);
                app.midi_out_feeds.push(buffer.clone());
                binding.target = Some(MIDI_OUT.to_string());
            } else if let Some(m) = bind::longest_prefix(self.hw, Namespace::Outs, label) {
                let target = bind::output_target(self.hw, "output", label, &m.target)?;
                if let Some(dst) = self.node(&target) {
                    self.graph.feed(buffer_id, dst);
                }
                binding.label = m.label;
                binding.target = Some(target);
            } else {
                self.graph.bind(port, buffer_id);
            }
            debug!(
                port = i + 1,
                label = %binding.label,
                buffer = %binding.buffer,
                target = ?binding.target,
                midi = binding.midi_setter.is_some(),
                "audio output"
            );
            app.audio_outs.push(binding);
        }
        Ok(())
    }

    /// Binds histories; returns the outputs they drive.
    fn histories(
        &mut self,
        patch: &PatchDescriptor,
        app: &mut App,
    ) -> Result<Vec<(String, String)>, WiringError> {
        let mut drives = Vec::new();
        for h in &patch.histories {
            if let Some(pattern) = h.midi {
                let var = format!("gen_history_{}", h.name);
                let Some(send) = midi::send_statement(&pattern, &var) else {
                    debug!(history = %h.name, kind = %pattern.kind, "receive-only MIDI history ignored");
                    continue;
                };
                let raw = match pattern.kind {
                    MidiKind::Bend => (h.default + 1.0) * 64.0,
                    _ => h.default * 127.0,
                };
                let initial = (raw as i64 & 0x7F) as u8;
                let id = self.graph.add_node(&var, NodeKind::History);
                if let Some(midi) = self.midi_out {
                    self.graph.feed(id, midi);
                }
                app.has_midi_out = true;
                debug!(history = %h.name, send = %send, "midi history");
                app.histories.push(MidiHistory {
                    name: h.name.clone(),
                    var,
                    initial,
                    byte: midi::byte_expr(pattern.kind, &format!("gen.{}", h.cname)),
                    send,
                });
            } else if let Some(m) = bind::longest_prefix(self.hw, Namespace::Outs, &h.name) {
                let target = bind::output_target(self.hw, "history", &h.name, &m.target)?;
                let expr = format!("gen.{}", h.cname);
                let id = self.graph.add_node(&expr, NodeKind::History);
                if let Some(dst) = self.node(&target) {
                    self.graph.bind(id, dst);
                }
                debug!(history = %h.name, %target, "history drives output");
                drives.push((target, expr));
            } else {
                debug!(history = %h.name, "history not bound");
            }
        }
        Ok(drives)
    }

    fn params(&mut self, patch: &PatchDescriptor, app: &mut App) -> Result<(), WiringError> {
        for p in &patch.parameters {
            let var = format!("gen_param_{}", p.name);
            let id = self.graph.add_node(&var, NodeKind::Param);
            self.graph.node_mut(id).range = Some((p.min, p.max));

            let mut ty = CppType::Float;
            let mut label = p.name.clone();
            let scaling = Scaling::new(p.min, p.max, None);
            let source = if let Some(pattern) = patchbay_patch::MidiPattern::parse(&p.name) {
                let input = midi::input_code(&pattern, &var, scaling.scale, scaling.offset);
                if let Some(reset) = &input.reset {
                    app.inserts.push(InsertDef {
                        phase: Phase::PostAudio,
                        code: reset.clone(),
                    });
                }
                if let Some(midi) = self.midi_in {
                    self.graph.bind(midi, id);
                }
                app.has_midi_in = true;
                ParamSource::Midi(input)
            } else if let Some(m) = bind::longest_prefix(self.hw, Namespace::Params, &p.name) {
                let input = bind::input_target(self.hw, "parameter", &p.name, &m.target)?;
                if let Some(src) = self.node(&input) {
                    self.graph.bind(src, id);
                }
                label = m.label;
                if let Some((qualifier, rest)) = bind::type_qualifier(&label) {
                    ty = if qualifier == "int" { CppType::Int } else { CppType::Bool };
                    label = rest.to_string();
                }
                ParamSource::Hardware(input)
            } else if p.name.starts_with("midi_") {
                return Err(WiringError::UnknownParameterBinding {
                    kind: "parameter",
                    name: p.name.clone(),
                    target: p.name.clone(),
                });
            } else {
                ParamSource::Unbound
            };
            debug!(param = %p.name, %ty, %label, source = ?source, "parameter");

            app.params.push(ParamBinding {
                name: p.name.clone(),
                var,
                ty,
                label,
                min: p.min,
                max: p.max,
                default: p.default,
                scaling,
                stepsize: stepsize(ty, p.min, p.max, p.default),
                source,
            });
        }
        Ok(())
    }

    fn datas(
        &mut self,
        patch: &PatchDescriptor,
        app: &mut App,
        sink: &DiagnosticSink,
    ) -> Result<(), WiringError> {
        if let Some(ext) = patch.external_buffers.first() {
            return Err(WiringError::UnsupportedDataObject {
                name: ext.name.clone(),
            });
        }
        for d in &patch.data_buffers {
            let Some(m) = bind::longest_prefix(self.hw, Namespace::Datas, &d.name) else {
                sink.emit(
                    Diagnostic::warning(
                        W302,
                        format!("data `{}` matches no data handler and will not be exported", d.name),
                    )
                    .with_origin(patch.name.clone()),
                );
                continue;
            };
            let handler = bind::datahandler_target(self.hw, "data", &d.name, &m.target)?;
            let Some(def) = self.hw.datahandler(&handler) else {
                continue;
            };
            let id = self.graph.add_node(format!("gen_data_{}", d.name), NodeKind::Data);
            if let Some(dst) = self.node(&handler) {
                self.graph.bind(id, dst);
            }
            if d.name == "midi" {
                app.has_midi_out = true;
            }
            debug!(data = %d.name, %handler, "data buffer");
            app.datas.retain(|b| b.handler != handler);
            app.datas.push(DataBinding {
                handler: handler.clone(),
                buffer: d.name.clone(),
                data: format!("gen.{}", d.cname),
                init: def.init.clone(),
                code: def.code.clone(),
                phase: def.phase,
            });
        }
        let order = |b: &DataBinding| self.hw.datahandlers.iter().position(|h| h.name == b.handler);
        app.datas.sort_by_key(order);
        Ok(())
    }

    fn automap(&mut self, app: &mut App, sink: &DiagnosticSink) {
        let idle: Vec<&str> = self
            .hw
            .inputs
            .iter()
            .filter(|s| s.automap)
            .filter(|s| self.node(&s.name).map_or(false, |id| self.graph.node(id).targets.is_empty()))
            .map(|s| s.name.as_str())
            .collect();
        let unbound: Vec<usize> = app
            .params
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_bound())
            .map(|(i, _)| i)
            .collect();

        let pairs = automap_pairs(&idle, &unbound);
        for &(input, index) in &pairs {
            let param = &mut app.params[index];
            if let (Some(src), Some(dst)) = (self.node(input), self.node(&param.var)) {
                self.graph.bind(src, dst);
            }
            debug!(input, param = %param.name, "automap");
            param.source = ParamSource::Hardware(input.to_string());
        }
        for input in idle.iter().skip(pairs.len()) {
            sink.emit(
                Diagnostic::warning(W301, format!("hardware input `{input}` is not bound to any parameter"))
                    .with_origin(app.name.clone()),
            );
        }
    }

    fn normalize_device_outputs(&mut self, history_drives: &[(String, String)]) -> Vec<DeviceOutput> {
        let mut outputs: Vec<DeviceOutput> = Vec::with_capacity(self.hw.outputs.len());
        let mut available: Vec<String> = Vec::new();
        let mut borrowed = 0;
        for s in &self.hw.outputs {
            let mut drive = OutputDrive::Idle;
            if let Some(id) = self.node(&s.name) {
                let feeds = &self.graph.node(id).feeds;
                if !feeds.is_empty() {
                    drive = OutputDrive::Sum(feeds.iter().map(|&f| self.graph.name(f).to_string()).collect());
                } else if let Some((_, expr)) = history_drives.iter().rev().find(|(t, _)| *t == s.name) {
                    drive = OutputDrive::Expr(expr.clone());
                }
            }
            if drive != OutputDrive::Idle {
                available.push(s.name.clone());
            } else if !available.is_empty() {
                let from = available[borrowed % available.len()].clone();
                borrowed += 1;
                if let (Some(src), Some(dst)) = (self.node(&from), self.node(&s.name)) {
                    self.graph.bind(src, dst);
                }
                debug!(output = %s.name, %from, "output borrows");
                drive = OutputDrive::Expr(from);
            }
            outputs.push(DeviceOutput {
                name: s.name.clone(),
                code: s.code.clone(),
                phase: s.phase,
                drive,
            });
        }
        outputs
    }

    fn normalize_audio_outputs(&mut self) -> Vec<HardwareAudioOut> {
        let mut outs = Vec::with_capacity(self.hardware_outs.len());
        let mut available: Vec<String> = Vec::new();
        for (i, name) in self.hardware_outs.iter().enumerate() {
            let Some(id) = self.graph.find(name) else {
                continue;
            };
            let source = if self.graph.node(id).source.is_some() {
                available.push(name.clone());
                Some(name.clone())
            } else if available.is_empty() {
                None
            } else {
                let from = available[i % available.len()].clone();
                if let Some(src) = self.graph.find(&from) {
                    self.graph.bind(src, id);
                }
                Some(from)
            };
            outs.push(HardwareAudioOut {
                name: name.clone(),
                source,
            });
        }
        debug!(channels = self.io_count, "normalized audio outputs");
        outs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchbay_hardware::{compile, parse_descriptor};
    use patchbay_patch::{DataBuffer, ExternalBuffer, HistoryOutput, MidiPattern, Parameter};
    use proptest::prelude::*;

    const TESTBOX: &str = r#"{
        "name": "testbox",
        "defines": {"OOPSY_TARGET_HAS_MIDI_INPUT": 1, "OOPSY_TARGET_HAS_MIDI_OUTPUT": 1},
        "components": {
            "knob1": {"component": "AnalogControl", "pin": 15},
            "knob2": {"component": "AnalogControl", "pin": 16},
            "knob3": {"component": "AnalogControl", "pin": 17},
            "knob4": {"component": "AnalogControl", "pin": 18},
            "sw1": {"component": "Switch", "pin": 28},
            "led1": {"component": "Led", "pin": 22},
            "led2": {"component": "Led", "pin": 23}
        },
        "inputs": {
            "adc_ch1": {"code": "hardware.som.adc.GetFloat(4)"}
        },
        "datahandlers": {
            "sd": {"init": "{name}.Init({data});", "code": "{name}.Process({data});", "where": "main"}
        },
        "labels": {
            "params": {"cv": "knob2", "cv1": "adc_ch1", "led": "led1", "ghost": "nothing"},
            "outs": {"light": "led1"},
            "datas": {"sample": "sd"}
        },
        "aliases": {"button": "sw1"}
    }"#;

    fn hw() -> HardwareDescriptor {
        compile(&parse_descriptor(TESTBOX).unwrap(), None, &DiagnosticSink::new()).unwrap()
    }

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

    fn history(name: &str) -> HistoryOutput {
        HistoryOutput {
            name: name.into(),
            cname: format!("m_{name}_out_1"),
            default: 0.0,
            midi: MidiPattern::parse(name),
        }
    }

    fn patch() -> PatchDescriptor {
        PatchDescriptor {
            name: "test".into(),
            audio_inputs: vec!["in1".into(), "in2".into()],
            audio_outputs: vec!["out1".into(), "out2".into()],
            parameters: Vec::new(),
            data_buffers: Vec::new(),
            external_buffers: Vec::new(),
            histories: Vec::new(),
        }
    }

    fn run(patch: &PatchDescriptor) -> (App, Vec<Diagnostic>) {
        let sink = DiagnosticSink::new();
        let app = resolve(patch, &hw(), &sink).unwrap();
        (app, sink.take_all())
    }

    #[test]
    fn labelled_param_binds_with_scaling() {
        let mut p = patch();
        p.parameters.push(param("cv1_freq", 20.0, 2000.0, 440.0));
        let (app, _) = run(&p);
        let b = app.param("cv1_freq").unwrap();
        assert_eq!(b.source, ParamSource::Hardware("adc_ch1".into()));
        assert_eq!(b.label, "freq");
        assert_eq!(b.var, "gen_param_cv1_freq");
        assert_eq!(b.scaling, Scaling { scale: 1980.0, offset: 20.0 });
        assert_eq!(b.scaling.apply(0.25, CppType::Float), 515.0);
        assert!(app.graph.bindings().contains(&("adc_ch1", "gen_param_cv1_freq")));
    }

    #[test]
    fn signal_name_binds_directly() {
        let mut p = patch();
        p.parameters.push(param("knob1_freq", 20.0, 2000.0, 440.0));
        let (app, _) = run(&p);
        let b = app.param("knob1_freq").unwrap();
        assert_eq!(b.source, ParamSource::Hardware("knob1".into()));
        assert_eq!(b.label, "freq");
        assert_eq!(b.stepsize, 16.0);
    }

    #[test]
    fn automap_first_fit() {
        let mut p = patch();
        p.parameters.push(param("drive", 0.0, 1.0, 0.5));
        p.parameters.push(param("tone", 0.0, 1.0, 0.5));
        let (app, diags) = run(&p);
        assert_eq!(app.params[0].source, ParamSource::Hardware("knob1".into()));
        assert_eq!(app.params[1].source, ParamSource::Hardware("knob2".into()));
        let idle: Vec<_> = diags.iter().filter(|d| d.code == W301).collect();
        assert_eq!(idle.len(), 2);
        assert!(idle[0].message.contains("`knob3`"));
        assert!(idle[1].message.contains("`knob4`"));
        let names: Vec<_> = app.device_inputs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["knob1", "knob2"]);
    }

    #[test]
    fn explicit_binding_is_skipped_by_automap() {
        let mut p = patch();
        p.parameters.push(param("drive", 0.0, 1.0, 0.5));
        p.parameters.push(param("cv_tone", 0.0, 1.0, 0.5));
        let (app, _) = run(&p);
        assert_eq!(app.params[0].source, ParamSource::Hardware("knob1".into()));
        assert_eq!(app.params[1].source, ParamSource::Hardware("knob2".into()));
        assert_eq!(app.params[1].label, "tone");
    }

    #[test]
    fn param_selected_is_first_unbound() {
        let mut p = patch();
        for name in ["a", "b", "c", "d", "e", "f"] {
            p.parameters.push(param(name, 0.0, 1.0, 0.0));
        }
        let (app, diags) = run(&p);
        assert_eq!(app.param_selected, 4);
        assert!(diags.iter().all(|d| d.code != W301));
    }

    #[test]
    fn type_qualifiers() {
        let mut p = patch();
        p.parameters.push(param("knob1_int_steps", 0.0, 8.0, 0.0));
        p.parameters.push(param("sw1_bool", 0.0, 1.0, 0.0));
        let (app, _) = run(&p);
        assert_eq!(app.params[0].ty, CppType::Int);
        assert_eq!(app.params[0].label, "steps");
        assert_eq!(app.params[0].stepsize, 1.0);
        assert_eq!(app.params[1].ty, CppType::Bool);
        assert_eq!(app.params[1].label, "bool");
        assert_eq!(app.params[1].source, ParamSource::Hardware("sw1".into()));
    }

    #[test]
    fn alias_binding() {
        let mut p = patch();
        p.parameters.push(param("button_rise_gate", 0.0, 1.0, 0.0));
        let (app, _) = run(&p);
        assert_eq!(app.params[0].source, ParamSource::Hardware("sw1_rise".into()));
        assert_eq!(app.params[0].label, "gate");
    }

    #[test]
    fn midi_params() {
        let mut p = patch();
        p.parameters.push(param("midi_cc74", 0.0, 1.0, 0.0));
        p.parameters.push(param("midi_clock", 0.0, 1.0, 0.0));
        p.parameters.push(param("drive", 0.0, 1.0, 0.0));
        let (app, _) = run(&p);
        assert!(app.has_midi_in);
        assert!(!app.has_generic_midi_in);
        let ParamSource::Midi(cc) = &app.params[0].source else {
            panic!("expected midi source");
        };
        assert_eq!(cc.phase, Phase::MidiMsg);
        assert!(cc.code.contains("daisy.midi.byte[0] == 74"));
        assert_eq!(app.params[0].source_name(), Some("midi_msg"));
        assert_eq!(app.inserts.len(), 1);
        assert_eq!(app.inserts[0].phase, Phase::PostAudio);
        assert_eq!(app.inserts[0].code, "gen_param_midi_clock = 0.f;");
        // midi params are never automapped
        assert_eq!(app.params[2].source, ParamSource::Hardware("knob1".into()));
        assert_eq!(app.midi_in_buffer.as_deref(), Some("dsy_midi_in"));
        assert!(app.uses_midi_uart(&hw()));
    }

    #[test]
    fn unknown_midi_param_is_fatal() {
        let mut p = patch();
        p.parameters.push(param("midi_sysex", 0.0, 1.0, 0.0));
        let err = resolve(&p, &hw(), &DiagnosticSink::new()).unwrap_err();
        assert!(matches!(err, WiringError::UnknownParameterBinding { .. }));
    }

    #[test]
    fn label_to_missing_signal_is_fatal() {
        let mut p = patch();
        p.parameters.push(param("ghost_level", 0.0, 1.0, 0.0));
        let err = resolve(&p, &hw(), &DiagnosticSink::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "parameter `ghost_level` binds to `nothing`, which names no hardware signal"
        );
    }

    #[test]
    fn output_signal_as_param_is_fatal() {
        let mut p = patch();
        p.parameters.push(param("led1_level", 0.0, 1.0, 0.0));
        let err = resolve(&p, &hw(), &DiagnosticSink::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "parameter `led1_level` binds to `led1`, which is output-only"
        );
    }

    #[test]
    fn midi_history_sends_on_change() {
        let mut p = patch();
        p.histories.push(history("midi_cc74"));
        let (app, _) = run(&p);
        assert!(app.has_midi_out);
        let h = &app.histories[0];
        assert_eq!(h.var, "gen_history_midi_cc74");
        assert_eq!(h.byte, "(uint8_t(gen.m_midi_cc74_out_1*127.f)) & 0x7F");
        assert_eq!(h.send, "daisy.midi_message3(176, 74, gen_history_midi_cc74);");
        assert_eq!(app.midi_send_count(), 1);
    }

    #[test]
    fn history_drives_output() {
        let mut p = patch();
        p.histories.push(history("light_env"));
        p.histories.push(history("unrelated"));
        let (app, _) = run(&p);
        assert_eq!(
            app.device_output("led1").unwrap().drive,
            OutputDrive::Expr("gen.m_light_env_out_1".into())
        );
        // led2 borrows from led1
        assert_eq!(app.device_output("led2").unwrap().drive, OutputDrive::Expr("led1".into()));
        assert!(app.histories.is_empty());
    }

    #[test]
    fn audio_outputs_route() {
        let mut p = patch();
        p.audio_outputs = vec![
            "out1".into(),
            "midi_cc7".into(),
            "light_level".into(),
            "midi".into(),
        ];
        let (app, _) = run(&p);
        assert_eq!(app.audio_outs[0].buffer, "dsy_out1");
        assert_eq!(
            app.audio_outs[1].midi_setter.as_deref(),
            Some("daisy.midi_message3(176, 7, (uint8_t(dsy_out2[size-1]*127.f)) & 0x7F);")
        );
        assert_eq!(app.audio_outs[2].buffer, "glue_out3");
        assert_eq!(app.audio_outs[2].label, "level");
        assert_eq!(app.audio_outs[2].target.as_deref(), Some("led1"));
        assert_eq!(app.audio_outs[3].target.as_deref(), Some("dsy_midi_out"));
        assert_eq!(app.glue_buffers, ["glue_out3", "glue_out4"]);
        assert_eq!(app.midi_out_feeds, ["glue_out4"]);
        assert_eq!(
            app.device_output("led1").unwrap().drive,
            OutputDrive::Sum(vec!["glue_out3".into()])
        );
        // dsy_out2 carries MIDI, so it borrows the audio of dsy_out1
        assert_eq!(app.hardware_outs[0].source.as_deref(), Some("dsy_out1"));
        assert_eq!(app.hardware_outs[1].source.as_deref(), Some("dsy_out1"));
        assert_eq!(app.midi_send_count(), 1);
    }

    #[test]
    fn silent_outputs_without_audio() {
        let mut p = patch();
        p.audio_outputs = vec!["light".into()];
        let (app, _) = run(&p);
        assert_eq!(app.hardware_outs[0].source, None);
        assert_eq!(app.hardware_outs[1].source, None);
        assert_eq!(app.audio_outs[0].label, "light");
    }

    #[test]
    fn audio_inputs_cycle() {
        let mut p = patch();
        p.audio_inputs = vec!["a".into(), "b".into(), "c".into(), "midi".into()];
        let (app, _) = run(&p);
        let sources: Vec<_> = app.audio_ins.iter().map(|a| a.source.as_deref()).collect();
        assert_eq!(sources, [Some("dsy_in1"), Some("dsy_in2"), Some("dsy_in1"), Some("dsy_midi_in")]);
        assert!(app.has_generic_midi_in);
    }

    #[test]
    fn data_buffers() {
        let mut p = patch();
        p.data_buffers.push(DataBuffer {
            name: "sample_kick".into(),
            cname: "m_sample_kick_2".into(),
            frames: 48000,
            channels: 1,
            source_file: None,
        });
        p.data_buffers.push(DataBuffer {
            name: "table".into(),
            cname: "m_table_3".into(),
            frames: 512,
            channels: 1,
            source_file: None,
        });
        let (app, diags) = run(&p);
        assert_eq!(app.datas.len(), 1);
        assert_eq!(app.datas[0].handler, "sd");
        assert_eq!(app.datas[0].data, "gen.m_sample_kick_2");
        assert_eq!(app.datas[0].phase, Phase::Main);
        let w: Vec<_> = diags.iter().filter(|d| d.code == W302).collect();
        assert_eq!(w.len(), 1);
        assert!(w[0].message.contains("`table`"));
    }

    #[test]
    fn external_buffer_is_fatal() {
        let mut p = patch();
        p.external_buffers.push(ExternalBuffer {
            name: "shared".into(),
            index: 0,
        });
        let err = resolve(&p, &hw(), &DiagnosticSink::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "data `shared` references an external buffer, which cannot be exported"
        );
    }

    #[test]
    fn graph_has_hardware_nodes() {
        let (app, _) = run(&patch());
        let kinds = |k| app.graph.nodes_of(k).count();
        assert_eq!(kinds(NodeKind::AudioIn), 2);
        assert_eq!(kinds(NodeKind::AudioOut), 2);
        assert_eq!(kinds(NodeKind::MidiIn), 1);
        assert_eq!(kinds(NodeKind::MidiOut), 1);
        assert_eq!(kinds(NodeKind::DataHandler), 1);
        assert!(app.graph.nodes_of(NodeKind::HardwareInput).any(|n| n.name == "adc_ch1"));
    }

    #[test]
    fn resolution_is_deterministic() {
        let mut p = patch();
        p.parameters.push(param("cv1_freq", 20.0, 2000.0, 440.0));
        p.parameters.push(param("drive", 0.0, 1.0, 0.5));
        p.histories.push(history("midi_cc74"));
        let a = serde_json::to_string(&run(&p).0).unwrap();
        let b = serde_json::to_string(&run(&p).0).unwrap();
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn automap_is_deterministic_first_fit(
            inputs in proptest::collection::vec("[a-z]{1,6}", 0..8),
            params in proptest::collection::vec(0usize..64, 0..8),
        ) {
            let inputs: Vec<&str> = inputs.iter().map(String::as_str).collect();
            let a = automap_pairs(&inputs, &params);
            let b = automap_pairs(&inputs, &params);
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(a.len(), inputs.len().min(params.len()));
            for (k, (input, param)) in a.iter().enumerate() {
                prop_assert_eq!(input, &inputs[k]);
                prop_assert_eq!(*param, params[k]);
            }
        }

        #[test]
        fn automap_binds_in_declaration_order(n in 0usize..7) {
            let mut p = patch();
            for i in 0..n {
                p.parameters.push(param(&format!("p{i}"), 0.0, 1.0, 0.0));
            }
            let sink = DiagnosticSink::new();
            let app = resolve(&p, &hw(), &sink).unwrap();
            let knobs = ["knob1", "knob2", "knob3", "knob4"];
            for (i, b) in app.params.iter().enumerate() {
                match knobs.get(i) {
                    Some(k) => prop_assert_eq!(&b.source, &ParamSource::Hardware(k.to_string())),
                    None => prop_assert_eq!(&b.source, &ParamSource::Unbound),
                }
            }
            prop_assert_eq!(sink.warning_count(), 4usize.saturating_sub(n));
        }
    }
}
