//! The hardware model compiler.
//!
//! Expands a [`RawDescriptor`] against the catalog of its SOM: every
//! component inherits the catalog defaults it does not override, compound
//! `pin`/`index` attributes are flattened, templates are rendered, and each
//! component's mapping list becomes top-level input and output signals.

use crate::board;
use crate::descriptor::{MappingDef, RawDescriptor};
use crate::error::HardwareError;
use crate::model::{
    Component, DataHandler, Defines, Display, HardwareDescriptor, InputSignal, Labels,
    OutputSignal,
};
use crate::ordered::OrderedMap;
use patchbay_catalog::{lookup, CatalogEntry, ComponentKind, Som};
use patchbay_common::template::{self, format_map, Missing};
use patchbay_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

/// A template key with no value was rendered empty.
pub const W201: DiagnosticCode = DiagnosticCode::new(Category::Warning, 201);

/// Driver injected for devices that declare a display.
pub const OLED_DRIVER: &str = "daisy::SSD130x4WireSpi128x64Driver";

const PROCESS_FIELDS: [&str; 4] = ["process", "loopprocess", "postprocess", "display"];

const TEMPLATE_FIELDS: [&str; 10] = [
    "typename",
    "map_init",
    "init_single",
    "init",
    "process",
    "loopprocess",
    "postprocess",
    "display",
    "updaterate",
    "non_class_decl",
];

/// Compiles a descriptor into a [`HardwareDescriptor`].
///
/// `base_dir` is the directory the descriptor was read from; relative
/// `header` attributes are resolved against it. Keys that render empty are
/// reported to `sink` as warnings.
pub fn compile(
    raw: &RawDescriptor,
    base_dir: Option<&Path>,
    sink: &DiagnosticSink,
) -> Result<HardwareDescriptor, HardwareError> {
    let som = match raw.som.as_deref() {
        None => Som::default(),
        Some(s) => Som::from_name(s).ok_or_else(|| HardwareError::UnknownSom(s.to_string()))?,
    };

    let mut defines = Defines::new();
    for (name, value) in raw.defines.iter() {
        defines.set(name, define_text(value));
    }
    defines.set_default("OOPSY_IO_COUNT", 2);

    let display = raw.display.as_ref().map(|_| Display {
        driver: OLED_DRIVER.to_string(),
        width: 128,
        height: 64,
    });
    if let Some(d) = &display {
        defines.set("OOPSY_TARGET_HAS_OLED", 1);
        defines.set("OOPSY_OLED_DISPLAY_WIDTH", d.width);
        defines.set("OOPSY_OLED_DISPLAY_HEIGHT", d.height);
    }

    let mut inputs = Vec::new();
    let mut outputs = Vec::new();

    for (name, def) in raw.inputs.iter() {
        check_template(name, "code", &def.code, &[])?;
        if let Some(update) = &def.update {
            check_template(name, "update", &update.code, &["name"])?;
        }
        inputs.push(InputSignal {
            name: name.to_string(),
            component: None,
            code: def.code.clone(),
            range: def.range.map(|[lo, hi]| (lo, hi)),
            is_bool: def.is_bool,
            automap: def.automap,
            update: def.update.clone(),
            process: None,
        });
    }
    for (name, def) in raw.outputs.iter() {
        check_template(name, "code", &def.code, &["value"])?;
        outputs.push(OutputSignal {
            name: name.to_string(),
            component: None,
            code: def.code.clone(),
            phase: def.phase,
            postprocess: None,
        });
    }

    let mut next_adc = 0;
    let mut components = Vec::new();
    let declared = raw
        .components
        .iter()
        .map(|(name, attrs)| (name, attrs, false))
        .chain(raw.parents.iter().map(|(name, attrs)| (name, attrs, true)));
    for (name, attrs, is_parent) in declared {
        let loaded = load_component(som, name, attrs, is_parent, base_dir, &mut next_adc, sink)?;
        inputs.extend(loaded.inputs);
        outputs.extend(loaded.outputs);
        components.push(loaded.component);
    }

    check_unique("input", inputs.iter().map(|s| s.name.as_str()))?;
    check_unique("output", outputs.iter().map(|s| s.name.as_str()))?;

    let mut datahandlers = Vec::new();
    for (name, def) in raw.datahandlers.iter() {
        for (field, t) in [("init", &def.init), ("code", &def.code)] {
            if let Some(t) = t {
                check_template(name, field, t, &["name", "data"])?;
            }
        }
        datahandlers.push(DataHandler {
            name: name.to_string(),
            init: def.init.clone(),
            code: def.code.clone(),
            phase: def.phase,
        });
    }

    let aliases = raw
        .aliases
        .iter()
        .map(|(alias, target)| (alias.to_ascii_lowercase(), target.clone()))
        .collect();

    let mut hw = HardwareDescriptor {
        name: raw.name.clone().unwrap_or_default(),
        som,
        components,
        inputs,
        outputs,
        datahandlers,
        labels: Labels {
            params: raw.labels.params.clone(),
            outs: raw.labels.outs.clone(),
            datas: raw.labels.datas.clone(),
        },
        aliases,
        defines,
        inserts: raw.inserts.clone(),
        audio_channels: raw.audio.as_ref().and_then(|a| a.channels).unwrap_or(2),
        max_apps: raw.max_apps.unwrap_or(1),
        display,
        external_codecs: raw.external_codecs.clone(),
        board_header: String::new(),
    };
    hw.board_header = board::render(&hw);

    info!(
        som = %hw.som,
        components = hw.components.len(),
        inputs = hw.inputs.len(),
        outputs = hw.outputs.len(),
        "compiled hardware descriptor"
    );
    Ok(hw)
}

struct Loaded {
    component: Component,
    inputs: Vec<InputSignal>,
    outputs: Vec<OutputSignal>,
}

fn load_component(
    som: Som,
    name: &str,
    raw: &OrderedMap<Value>,
    is_parent: bool,
    base_dir: Option<&Path>,
    next_adc: &mut usize,
    sink: &DiagnosticSink,
) -> Result<Loaded, HardwareError> {
    let kind_name = raw
        .get("component")
        .and_then(Value::as_str)
        .ok_or_else(|| HardwareError::MissingKind {
            component: name.to_string(),
        })?;
    let kind = ComponentKind::from_name(kind_name)
        .ok_or_else(|| HardwareError::UnknownComponentKind(kind_name.to_string()))?;
    let entry = lookup(som, kind);

    let mut attributes = inherit_attributes(name, kind, entry, raw);
    let is_parent = is_parent || attributes.get("is_parent").is_some_and(|v| v == "true");
    let is_default = attributes.get("is_default").is_some_and(|v| v == "true");
    if !is_default {
        attributes.insert("default_prefix", String::new());
    }

    let adc_channel = if entry.init_single.is_some() && !is_default {
        let channel = *next_adc;
        *next_adc += 1;
        attributes.insert("i", channel.to_string());
        Some(channel)
    } else {
        None
    };

    let mut renderer = Renderer {
        component: name,
        attributes,
        missing: Vec::new(),
    };

    let mut rendered: [Option<String>; TEMPLATE_FIELDS.len()] = Default::default();
    if !is_default {
        for (slot, field) in rendered.iter_mut().zip(TEMPLATE_FIELDS) {
            let Some(source) = template_source(kind, entry, raw, field) else {
                continue;
            };
            let text = renderer.render(field, &source)?;
            if field == "typename" {
                renderer.attributes.insert("typename", text.clone());
            }
            *slot = Some(text).filter(|t| !t.trim().is_empty());
        }
    }
    let [typename, map_init, init_single, init, process, loopprocess, postprocess, display, updaterate, non_class_decl] =
        rendered;

    let mappings: Vec<MappingDef> = match raw.get("mapping") {
        Some(value) => serde_json::from_value(value.clone())?,
        None => entry.mapping.iter().map(MappingDef::from).collect(),
    };

    let mut inputs = Vec::new();
    let mut outputs = Vec::new();
    if !is_parent {
        for (i, m) in mappings.iter().enumerate() {
            let signal = renderer.render(&format!("mapping[{i}].name"), &m.name)?;
            if let Some(get) = &m.get {
                inputs.push(InputSignal {
                    name: signal.clone(),
                    component: Some(name.to_string()),
                    code: renderer.render(&format!("mapping[{i}].get"), get)?,
                    range: m.range.map(|[lo, hi]| (lo, hi)),
                    is_bool: m.is_bool,
                    automap: m.automap,
                    update: None,
                    process: process.clone(),
                });
            }
            if let Some(set) = &m.set {
                outputs.push(OutputSignal {
                    name: signal.clone(),
                    component: Some(name.to_string()),
                    code: renderer.render_setter(&format!("mapping[{i}].set"), set)?,
                    phase: m.phase,
                    postprocess: postprocess.clone(),
                });
            }
        }
    }

    for key in &renderer.missing {
        sink.emit(
            Diagnostic::warning(
                W201,
                format!("template key `{key}` has no value and was rendered empty"),
            )
            .with_origin(format!("component `{name}` ({kind})")),
        );
    }

    let header = renderer.attributes.get("header").map(|h| {
        let path = Path::new(h);
        match base_dir {
            Some(dir) if path.is_relative() => dir.join(path).display().to_string(),
            _ => h.clone(),
        }
    });

    debug!(
        component = name,
        kind = %kind,
        inputs = inputs.len(),
        outputs = outputs.len(),
        "expanded component"
    );

    Ok(Loaded {
        component: Component {
            name: name.to_string(),
            kind,
            attributes: renderer.attributes,
            is_parent,
            is_default,
            adc_channel,
            typename,
            map_init,
            init_single,
            init,
            process,
            loopprocess,
            postprocess,
            display,
            updaterate,
            non_class_decl,
            header,
        },
        inputs,
        outputs,
    })
}

/// Merges catalog defaults under the descriptor's attributes.
fn inherit_attributes(
    name: &str,
    kind: ComponentKind,
    entry: &CatalogEntry,
    raw: &OrderedMap<Value>,
) -> OrderedMap<String> {
    let mut attributes = OrderedMap::new();
    attributes.insert("name", name.to_string());
    attributes.insert("component", kind.name().to_string());
    for (key, value) in entry.defaults {
        attributes.insert(*key, value.to_string());
    }
    for (key, value) in raw.iter() {
        if key == "component" || key == "mapping" || TEMPLATE_FIELDS.contains(&key) {
            continue;
        }
        match (key, value) {
            ("pin" | "index", Value::Object(sub)) => {
                for (sub_key, sub_value) in sub {
                    attributes.insert(format!("{key}_{sub_key}"), value_text(sub_value));
                }
            }
            _ => attributes.insert(key, value_text(value)),
        }
    }
    attributes
}

/// Picks the descriptor override of a template field, or the catalog's.
fn template_source(
    kind: ComponentKind,
    entry: &CatalogEntry,
    raw: &OrderedMap<Value>,
    field: &str,
) -> Option<String> {
    match raw.get(field).and_then(Value::as_str) {
        Some(method) if kind == ComponentKind::CodeClass && PROCESS_FIELDS.contains(&field) => {
            Some(format!("{{name}}.{method}();"))
        }
        Some(custom) => Some(custom.to_string()),
        None => entry.template(field).map(str::to_string),
    }
}

struct Renderer<'a> {
    component: &'a str,
    attributes: OrderedMap<String>,
    missing: Vec<String>,
}

impl Renderer<'_> {
    fn render(&mut self, field: &str, source: &str) -> Result<String, HardwareError> {
        let attributes = &self.attributes;
        let missing = &mut self.missing;
        format_map(source, Missing::Empty, |key| {
            let value = attributes.get(key).cloned();
            if value.is_none() && !missing.iter().any(|m| m == key) {
                missing.push(key.to_string());
            }
            value
        })
        .map_err(|source| self.malformed(field, source))
    }

    /// Renders a setter, keeping `{value}` for the emitter.
    fn render_setter(&mut self, field: &str, source: &str) -> Result<String, HardwareError> {
        let attributes = &self.attributes;
        let missing = &mut self.missing;
        format_map(source, Missing::Keep, |key| {
            if key == "value" {
                return None;
            }
            Some(match attributes.get(key) {
                Some(v) => v.clone(),
                None => {
                    if !missing.iter().any(|m| m == key) {
                        missing.push(key.to_string());
                    }
                    String::new()
                }
            })
        })
        .map_err(|source| self.malformed(field, source))
    }

    fn malformed(&self, field: &str, source: template::TemplateError) -> HardwareError {
        HardwareError::MalformedTemplate {
            component: self.component.to_string(),
            field: field.to_string(),
            source,
        }
    }
}

/// Checks a hand-written template against the keys the emitter fills in.
fn check_template(
    owner: &str,
    field: &str,
    source: &str,
    allowed: &[&str],
) -> Result<(), HardwareError> {
    let malformed = |source| HardwareError::MalformedTemplate {
        component: owner.to_string(),
        field: field.to_string(),
        source,
    };
    let keys = template::keys(source).map_err(malformed)?;
    match keys.into_iter().find(|k| !allowed.contains(k)) {
        Some(key) => Err(malformed(template::TemplateError::UnknownKey {
            key: key.to_string(),
        })),
        None => Ok(()),
    }
}

fn check_unique<'a>(
    namespace: &'static str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), HardwareError> {
    let mut seen = std::collections::HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(HardwareError::DuplicateSignal {
                namespace,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Renders an attribute value as template text.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Renders a define value as C++ source text.
fn define_text(value: &Value) -> String {
    match value {
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        other => value_text(other),
    }
}
