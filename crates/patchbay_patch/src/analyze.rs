//! Idiom extraction over exported patch sources.
//!
//! The exporter writes a narrow, stable dialect of C++. Each piece of the
//! [`PatchDescriptor`] comes from one fixed idiom:
//!
//! | Idiom | Example |
//! |---|---|
//! | namespace | `namespace reverb {` |
//! | port names | `const char *gen_kernel_innames[] = { "in1", "in2" };` |
//! | parameter block | `pi = self->__commonstate.params + 0;` followed by `pi->...` fields |
//! | data buffer | `m_buf_3.reset("buf", ((int)2048), ((int)1));` |
//! | history output | `t_sample m_level_out_2;` |

use crate::constexpr::{self, Constants};
use crate::descriptor::{DataBuffer, ExternalBuffer, HistoryOutput, Parameter, PatchDescriptor};
use crate::error::PatchError;
use crate::midi::MidiPattern;
use patchbay_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info};

/// A value had no initializer and fell back to a default.
pub const W101: DiagnosticCode = DiagnosticCode::new(Category::Warning, 101);

/// A parameter block declared a type the analyzer does not handle.
pub const W102: DiagnosticCode = DiagnosticCode::new(Category::Warning, 102);

struct Patterns {
    namespace: Regex,
    innames: Regex,
    outnames: Regex,
    history: Regex,
    param_block: Regex,
    paramtype: Regex,
    name: Regex,
    defaultvalue: Regex,
    outputmin: Regex,
    outputmax: Regex,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            namespace: Regex::new(r"namespace\s+(\w+)\s*\{")?,
            innames: Regex::new(r"gen_kernel_innames\[\]\s*=\s*\{([^}]*)\}")?,
            outnames: Regex::new(r"gen_kernel_outnames\[\]\s*=\s*\{([^}]*)\}")?,
            history: Regex::new(r"t_sample\s+(m_(\w+)_out_\d+);")?,
            param_block: Regex::new(r"pi\s*=\s*self->__commonstate\.params\s*\+\s*(\d+)")?,
            paramtype: Regex::new(r"pi->paramtype\s*=\s*([^;]+);")?,
            name: Regex::new(r#"pi->name\s*=\s*"([^"]+)""#)?,
            defaultvalue: Regex::new(r"pi->defaultvalue\s*=\s*self->(\w+)")?,
            outputmin: Regex::new(r"pi->outputmin\s*=\s*([^;]+);")?,
            outputmax: Regex::new(r"pi->outputmax\s*=\s*([^;]+);")?,
        })
    }
}

fn patterns() -> Result<&'static Patterns, PatchError> {
    static PATTERNS: OnceLock<Result<Patterns, regex::Error>> = OnceLock::new();
    PATTERNS
        .get_or_init(Patterns::compile)
        .as_ref()
        .map_err(|e| PatchError::Pattern(e.clone()))
}

/// Analyzes one exported patch source.
///
/// `constants` binds `samplerate` and `vectorsize` in buffer dimension and
/// initializer expressions. Values with no initializer fall back to a default
/// and are reported to `sink`.
///
/// # Errors
///
/// Returns [`PatchError::MalformedPatchSource`] when the namespace, a port
/// name array, or a required field of a parameter block is missing, and
/// [`PatchError::UnresolvableConstantExpression`] when an initializer or
/// buffer dimension cannot be evaluated. [`PatchError::Pattern`] means one of
/// the extraction or MIDI name patterns failed to compile.
pub fn analyze(
    source: &str,
    constants: &Constants,
    sink: &DiagnosticSink,
) -> Result<PatchDescriptor, PatchError> {
    let p = patterns()?;
    crate::midi::pattern()?;

    let name = p
        .namespace
        .captures(source)
        .map(|c| c[1].to_string())
        .ok_or_else(|| PatchError::missing("namespace declaration"))?;

    let audio_inputs = port_names(&p.innames, source)
        .ok_or_else(|| PatchError::missing("input port names `gen_kernel_innames`"))?;
    let audio_outputs = port_names(&p.outnames, source)
        .ok_or_else(|| PatchError::missing("output port names `gen_kernel_outnames`"))?;

    let mut histories = Vec::new();
    for caps in p.history.captures_iter(source) {
        let cname = caps[1].to_string();
        let hname = caps[2].to_string();
        let default = match initializer(source, &cname)? {
            Some(expr) => constexpr::eval(expr, constants)?,
            None => {
                sink.emit(
                    Diagnostic::warning(W101, format!("history `{hname}` has no initializer"))
                        .with_origin(format!("patch `{name}`"))
                        .with_note("defaulting to 0"),
                );
                0.0
            }
        };
        let midi = MidiPattern::try_parse(&hname)?;
        histories.push(HistoryOutput {
            name: hname,
            cname,
            default,
            midi,
        });
    }

    let mut parameters = Vec::new();
    let mut data_buffers = Vec::new();
    let mut external_buffers = Vec::new();

    let starts: Vec<(usize, usize)> = p
        .param_block
        .captures_iter(source)
        .filter_map(|c| {
            let m = c.get(0)?;
            let index = c[1].parse().ok()?;
            Some((m.start(), index))
        })
        .collect();

    for (n, &(start, index)) in starts.iter().enumerate() {
        let end = starts.get(n + 1).map_or(source.len(), |&(s, _)| s);
        let block = &source[start..end];

        let pname = p
            .name
            .captures(block)
            .map(|c| c[1].to_string())
            .ok_or_else(|| PatchError::missing(format!("`pi->name` in parameter block {index}")))?;
        let ptype = p
            .paramtype
            .captures(block)
            .map(|c| c[1].trim().to_string())
            .ok_or_else(|| {
                PatchError::missing(format!("`pi->paramtype` of parameter `{pname}`"))
            })?;

        match ptype.as_str() {
            "GENLIB_PARAMTYPE_FLOAT" => {
                let cname = p
                    .defaultvalue
                    .captures(block)
                    .map(|c| c[1].to_string())
                    .ok_or_else(|| {
                        PatchError::missing(format!("`pi->defaultvalue` of parameter `{pname}`"))
                    })?;
                let min = bound(&p.outputmin, block, constants)?.unwrap_or(0.0);
                let max = bound(&p.outputmax, block, constants)?.unwrap_or(1.0);
                let default = match initializer(source, &cname)? {
                    Some(expr) => constexpr::eval(expr, constants)?,
                    None => {
                        sink.emit(
                            Diagnostic::warning(
                                W101,
                                format!("parameter `{pname}` has no initializer"),
                            )
                            .with_origin(format!("patch `{name}`"))
                            .with_note(format!("defaulting to its minimum {min}")),
                        );
                        min
                    }
                };
                debug!(param = %pname, %cname, min, max, default, "parameter");
                parameters.push(Parameter {
                    name: pname,
                    cname,
                    index,
                    min,
                    max,
                    default,
                });
            }
            "GENLIB_PARAMTYPE_SYM" => match buffer_reset(source, &pname)? {
                Some((cname, args)) => {
                    let (frames, channels) = buffer_dims(args, constants)?;
                    debug!(data = %pname, %cname, frames, channels, "data buffer");
                    data_buffers.push(DataBuffer {
                        name: pname,
                        cname,
                        frames,
                        channels,
                        source_file: None,
                    });
                }
                None => {
                    debug!(data = %pname, "external buffer");
                    external_buffers.push(ExternalBuffer { name: pname, index });
                }
            },
            other => {
                sink.emit(
                    Diagnostic::warning(
                        W102,
                        format!("parameter `{pname}` has unsupported type `{other}`"),
                    )
                    .with_origin(format!("patch `{name}`"))
                    .with_note("the parameter is ignored"),
                );
            }
        }
    }

    info!(
        patch = %name,
        ins = audio_inputs.len(),
        outs = audio_outputs.len(),
        params = parameters.len(),
        datas = data_buffers.len(),
        histories = histories.len(),
        "analyzed patch"
    );

    Ok(PatchDescriptor {
        name,
        audio_inputs,
        audio_outputs,
        parameters,
        data_buffers,
        external_buffers,
        histories,
    })
}

fn port_names(re: &Regex, source: &str) -> Option<Vec<String>> {
    let caps = re.captures(source)?;
    Some(
        caps[1]
            .split(',')
            .map(|s| s.replace('"', "").trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

/// Finds the first `<cname> = <expr>;` assignment.
fn initializer<'a>(source: &'a str, cname: &str) -> Result<Option<&'a str>, PatchError> {
    let re = Regex::new(&format!(r"\s{}\s*=\s*([^;=][^;]*);", regex::escape(cname)))?;
    Ok(re
        .captures(source)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str()))
}

fn bound(re: &Regex, block: &str, constants: &Constants) -> Result<Option<f64>, PatchError> {
    match re.captures(block) {
        Some(c) => Ok(Some(constexpr::eval(&c[1], constants)?)),
        None => Ok(None),
    }
}

/// Finds `<cname>.reset("<name>", <args>);` and returns the cname and argument text.
fn buffer_reset<'a>(
    source: &'a str,
    name: &str,
) -> Result<Option<(String, &'a str)>, PatchError> {
    let re = Regex::new(&format!(
        r#"\s(\w+)\.reset\("{}",([^;]+)\);"#,
        regex::escape(name)
    ))?;
    Ok(re.captures(source).and_then(|c| {
        let cname = c.get(1)?.as_str().to_string();
        Some((cname, c.get(2)?.as_str()))
    }))
}

fn buffer_dims(args: &str, constants: &Constants) -> Result<(u32, u32), PatchError> {
    let parts: Vec<&str> = args.split(',').collect();
    let [length, channels] = parts.as_slice() else {
        return Err(PatchError::UnresolvableConstantExpression {
            expr: args.trim().to_string(),
            reason: "expected a length and a channel count".to_string(),
        });
    };
    Ok((
        positive_count(length, constants)?,
        positive_count(channels, constants)?,
    ))
}

fn positive_count(expr: &str, constants: &Constants) -> Result<u32, PatchError> {
    let value = constexpr::eval(expr, constants)?.round();
    if value < 1.0 || value > f64::from(u32::MAX) {
        return Err(PatchError::UnresolvableConstantExpression {
            expr: expr.trim().to_string(),
            reason: format!("buffer dimension {value} is out of range"),
        });
    }
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::MidiKind;

    const REVERB: &str = r#"
#include "genlib.h"

namespace reverb {

typedef struct State {
	CommonState __commonstate;
	Delay m_delay_4;
	t_sample m_wet_19;
	t_sample m_decay_20;
	t_sample m_damping_18;
	t_sample m_predelay_17;
	t_sample samplerate;
	inline void reset(t_param __sr, int __vs) {
		samplerate = __sr;
		m_delay_4.reset("m_delay_4", ((int)924));
		m_predelay_17 = ((int)10);
		m_damping_18 = ((t_sample)0.5);
		m_wet_19 = ((int)0);
		m_decay_20 = ((t_sample)0.5);
	};
} State;

const char *gen_kernel_innames[] = { "in1", "in2" };
const char *gen_kernel_outnames[] = { "out1", "out2" };

void *create(t_param sr, long vs) {
	State *self = new State;
	ParamInfo *pi;
	pi = self->__commonstate.params + 0;
	pi->name = "damping";
	pi->paramtype = GENLIB_PARAMTYPE_FLOAT;
	pi->defaultvalue = self->m_damping_18;
	pi->outputmin = 0;
	pi->outputmax = 1;
	pi->units = "";		// no units defined
	pi = self->__commonstate.params + 1;
	pi->name = "predelay";
	pi->paramtype = GENLIB_PARAMTYPE_FLOAT;
	pi->defaultvalue = self->m_predelay_17;
	pi->outputmin = 0;
	pi->outputmax = 250;
	pi->units = "";		// no units defined
	return self;
}

} // reverb::
"#;

    const MIDI_OUT: &str = r#"
namespace midi_output {
typedef struct State {
	Data m_midioutbuf_3;
	t_sample m_midi_cc74_out_1;
	t_sample m_level_out_2;
	inline void reset(t_param __sr, int __vs) {
		m_midioutbuf_3.reset("midioutbuf", ((int)2048), ((int)1));
		m_midi_cc74_out_1 = ((int)0);
		m_level_out_2 = ((t_sample)0.25);
	};
} State;
const char *gen_kernel_innames[] = { "in1" };
const char *gen_kernel_outnames[] = { "out1", "out2", "midi" };
void *create(t_param sr, long vs) {
	pi = self->__commonstate.params + 0;
	pi->name = "midioutbuf";
	pi->paramtype = GENLIB_PARAMTYPE_SYM;
	pi->defaultvalue = 0.;
	pi->units = "";		// no units defined
}
}
"#;

    fn run(src: &str) -> Result<PatchDescriptor, PatchError> {
        analyze(src, &Constants::default(), &DiagnosticSink::new())
    }

    #[test]
    fn extracts_reverb() {
        let patch = run(REVERB).unwrap();
        assert_eq!(patch.name, "reverb");
        assert_eq!(patch.audio_inputs, ["in1", "in2"]);
        assert_eq!(patch.audio_outputs, ["out1", "out2"]);
        assert_eq!(patch.parameters.len(), 2);
        let damping = &patch.parameters[0];
        assert_eq!(damping.name, "damping");
        assert_eq!(damping.cname, "m_damping_18");
        assert_eq!(damping.index, 0);
        assert_eq!((damping.min, damping.max, damping.default), (0.0, 1.0, 0.5));
        let predelay = &patch.parameters[1];
        assert_eq!(predelay.default, 10.0);
        assert_eq!(predelay.range(), 250.0);
        assert!(patch.data_buffers.is_empty());
        assert!(patch.histories.is_empty());
    }

    #[test]
    fn extracts_buffers_and_histories() {
        let patch = run(MIDI_OUT).unwrap();
        assert_eq!(patch.name, "midi_output");
        assert_eq!(patch.audio_outputs, ["out1", "out2", "midi"]);
        assert!(patch.parameters.is_empty());
        assert_eq!(
            patch.data_buffers,
            [DataBuffer {
                name: "midioutbuf".into(),
                cname: "m_midioutbuf_3".into(),
                frames: 2048,
                channels: 1,
                source_file: None,
            }]
        );
        assert_eq!(patch.histories.len(), 2);
        let cc = &patch.histories[0];
        assert_eq!(cc.name, "midi_cc74");
        assert_eq!(cc.cname, "m_midi_cc74_out_1");
        assert_eq!(cc.midi.unwrap().kind, MidiKind::Cc);
        assert_eq!(cc.midi.unwrap().number, Some(74));
        let level = &patch.histories[1];
        assert_eq!(level.name, "level");
        assert_eq!(level.default, 0.25);
        assert!(level.midi.is_none());
    }

    #[test]
    fn descriptor_json_shape() {
        let json = serde_json::to_value(run(MIDI_OUT).unwrap()).unwrap();
        assert_eq!(json["name"], "midi_output");
        assert_eq!(json["data_buffers"][0]["frames"], 2048);
        assert!(json["data_buffers"][0]["source_file"].is_null());
        assert_eq!(json["histories"][0]["midi"]["kind"], "cc");
        assert_eq!(json["histories"][0]["midi"]["number"], 74);
        assert!(json["histories"][1]["midi"].is_null());
    }

    #[test]
    fn samplerate_sized_buffer() {
        let src = MIDI_OUT.replace("((int)2048)", "(samplerate * 2)");
        let patch = run(&src).unwrap();
        assert_eq!(patch.data_buffers[0].frames, 96000);
        let patch = analyze(
            &src,
            &Constants {
                samplerate: 32000.0,
                vectorsize: 24.0,
            },
            &DiagnosticSink::new(),
        )
        .unwrap();
        assert_eq!(patch.data_buffers[0].frames, 64000);
    }

    #[test]
    fn fractional_dimensions_round() {
        let src = MIDI_OUT.replace("((int)2048)", "(samplerate * 0.0001)");
        assert_eq!(run(&src).unwrap().data_buffers[0].frames, 5);
    }

    #[test]
    fn symbolic_without_reset_is_external() {
        let src = MIDI_OUT.replace(
            "m_midioutbuf_3.reset(\"midioutbuf\", ((int)2048), ((int)1));",
            "",
        );
        let patch = run(&src).unwrap();
        assert!(patch.data_buffers.is_empty());
        assert_eq!(patch.external_buffers.len(), 1);
        assert_eq!(patch.external_buffers[0].name, "midioutbuf");
    }

    #[test]
    fn missing_namespace() {
        let err = run("const char *gen_kernel_innames[] = { };").unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed patch source: missing namespace declaration"
        );
    }

    #[test]
    fn missing_port_arrays() {
        let src = REVERB.replace("gen_kernel_outnames", "kernel_outs");
        let err = run(&src).unwrap_err();
        assert!(matches!(err, PatchError::MalformedPatchSource { ref idiom } if idiom.contains("gen_kernel_outnames")));
    }

    #[test]
    fn empty_port_arrays() {
        let src = REVERB.replace(r#"{ "in1", "in2" }"#, "{  }");
        assert!(run(&src).unwrap().audio_inputs.is_empty());
    }

    #[test]
    fn missing_param_name() {
        let src = REVERB.replace(r#"pi->name = "predelay";"#, "");
        let err = run(&src).unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed patch source: missing `pi->name` in parameter block 1"
        );
    }

    #[test]
    fn unresolvable_dimension() {
        let src = MIDI_OUT.replace("((int)2048)", "(buflen * 2)");
        let err = run(&src).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot resolve constant expression `(buflen * 2)`: unknown identifier `buflen`"
        );
    }

    #[test]
    fn zero_dimension_rejected() {
        let src = MIDI_OUT.replace("((int)1))", "((int)0))");
        let err = run(&src).unwrap_err();
        assert!(matches!(err, PatchError::UnresolvableConstantExpression { .. }));
    }

    #[test]
    fn single_argument_reset_rejected() {
        let src = MIDI_OUT.replace(", ((int)1))", ")");
        let err = run(&src).unwrap_err();
        assert!(err.to_string().contains("expected a length and a channel count"));
    }

    #[test]
    fn missing_initializer_warns() {
        let src = REVERB.replace("m_damping_18 = ((t_sample)0.5);", "");
        let sink = DiagnosticSink::new();
        let patch = analyze(&src, &Constants::default(), &sink).unwrap();
        assert_eq!(patch.parameters[0].default, 0.0);
        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, W101);
        assert_eq!(diags[0].message, "parameter `damping` has no initializer");
    }

    #[test]
    fn unknown_param_type_warns() {
        let tag = "GENLIB_PARAMTYPE_FLOAT";
        let at = REVERB.rfind(tag).unwrap();
        let src = format!(
            "{}GENLIB_PARAMTYPE_EVENT{}",
            &REVERB[..at],
            &REVERB[at + tag.len()..]
        );
        let sink = DiagnosticSink::new();
        let patch = analyze(&src, &Constants::default(), &sink).unwrap();
        assert_eq!(patch.parameters.len(), 1);
        assert_eq!(sink.take_all()[0].code, W102);
    }
}
