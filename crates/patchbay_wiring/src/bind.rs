//! Name-based binding of patch names to hardware signals.
//!
//! A patch name binds to the hardware through the longest key that prefixes
//! it. Keys come from the descriptor's `labels` section for the namespace,
//! from hardware signal names, and from aliases. A label key matches any
//! prefix (`cv1` matches `cv1freq` and `cv1_freq`); signal names and aliases
//! must be followed by `_` or the end of the name. The remainder after the
//! key, minus one leading `_`, becomes the display label.

use crate::error::WiringError;
use patchbay_hardware::HardwareDescriptor;
use tracing::debug;

/// The three binding namespaces of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// Parameters bind to inputs.
    Params,
    /// Audio outputs and histories bind to outputs.
    Outs,
    /// Data buffers bind to data handlers.
    Datas,
}

/// A successful prefix match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMatch {
    /// The matched key.
    pub key: String,
    /// The canonical name the key refers to.
    pub target: String,
    /// The display label derived from the rest of the name.
    pub label: String,
}

fn strip_key(name: &str, key: &str, separated: bool) -> Option<String> {
    let rest = name.strip_prefix(key)?;
    let rest = match rest.strip_prefix('_') {
        Some(r) => r,
        None if separated && !rest.is_empty() => return None,
        None => rest,
    };
    Some(if rest.is_empty() {
        name.to_string()
    } else {
        rest.to_string()
    })
}

/// Finds the longest key prefixing `name` in `ns`.
///
/// Explicit labels win ties against signal names and aliases of the same length.
pub fn longest_prefix(hw: &HardwareDescriptor, ns: Namespace, name: &str) -> Option<PrefixMatch> {
    let mut best: Option<PrefixMatch> = None;
    let mut consider = |key: &str, target: &str, label: Option<String>| {
        let Some(label) = label else { return };
        if best.as_ref().map_or(true, |b| key.len() > b.key.len()) {
            best = Some(PrefixMatch {
                key: key.to_string(),
                target: target.to_string(),
                label,
            });
        }
    };

    let labels = match ns {
        Namespace::Params => &hw.labels.params,
        Namespace::Outs => &hw.labels.outs,
        Namespace::Datas => &hw.labels.datas,
    };
    for (key, target) in labels.iter() {
        consider(key, target, strip_key(name, key, false));
    }

    match ns {
        Namespace::Params => {
            for s in &hw.inputs {
                consider(&s.name, &s.name, strip_key(name, &s.name, true));
            }
        }
        Namespace::Outs => {
            for s in &hw.outputs {
                consider(&s.name, &s.name, strip_key(name, &s.name, true));
            }
        }
        Namespace::Datas => {
            for d in &hw.datahandlers {
                consider(&d.name, &d.name, strip_key(name, &d.name, true));
            }
        }
    }

    if ns != Namespace::Datas {
        // ASCII folding keeps byte offsets in `low` valid for `name`
        let low = name.to_ascii_lowercase();
        let alias_label = |key: &str| {
            strip_key(&low, key, true).map(|l| {
                if l == low {
                    name.to_string()
                } else {
                    name[name.len() - l.len()..].to_string()
                }
            })
        };
        let signals: Vec<(&str, Option<&str>)> = match ns {
            Namespace::Params => hw
                .inputs
                .iter()
                .map(|s| (s.name.as_str(), s.component.as_deref()))
                .collect(),
            _ => hw
                .outputs
                .iter()
                .map(|s| (s.name.as_str(), s.component.as_deref()))
                .collect(),
        };
        for (alias, target) in hw.aliases.iter() {
            consider(alias, target, alias_label(alias));
            // `alias_rise` stands for `target_rise`
            for &(signal, component) in &signals {
                if component != Some(target.as_str()) {
                    continue;
                }
                if let Some(suffix) = signal.strip_prefix(target.as_str()).filter(|s| !s.is_empty()) {
                    let key = format!("{alias}{suffix}");
                    consider(&key, signal, alias_label(&key));
                }
            }
        }
    }

    if let Some(m) = &best {
        debug!(name, key = %m.key, target = %m.target, label = %m.label, "prefix match");
    }
    best
}

/// Resolves a match target to an input signal name.
pub fn input_target(
    hw: &HardwareDescriptor,
    kind: &'static str,
    name: &str,
    target: &str,
) -> Result<String, WiringError> {
    resolve(hw, kind, name, target, |hw, t| {
        if hw.input(t).is_some() {
            Found::Yes
        } else if hw.output(t).is_some() {
            Found::Wrong("output-only")
        } else if hw.datahandler(t).is_some() {
            Found::Wrong("a data handler")
        } else {
            Found::No
        }
    })
}

/// Resolves a match target to an output signal name.
pub fn output_target(
    hw: &HardwareDescriptor,
    kind: &'static str,
    name: &str,
    target: &str,
) -> Result<String, WiringError> {
    resolve(hw, kind, name, target, |hw, t| {
        if hw.output(t).is_some() {
            Found::Yes
        } else if hw.input(t).is_some() {
            Found::Wrong("input-only")
        } else if hw.datahandler(t).is_some() {
            Found::Wrong("a data handler")
        } else {
            Found::No
        }
    })
}

/// Resolves a match target to a data handler name.
pub fn datahandler_target(
    hw: &HardwareDescriptor,
    kind: &'static str,
    name: &str,
    target: &str,
) -> Result<String, WiringError> {
    resolve(hw, kind, name, target, |hw, t| {
        if hw.datahandler(t).is_some() {
            Found::Yes
        } else if hw.input(t).is_some() || hw.output(t).is_some() {
            Found::Wrong("not a data handler")
        } else {
            Found::No
        }
    })
}

enum Found {
    Yes,
    Wrong(&'static str),
    No,
}

fn resolve(
    hw: &HardwareDescriptor,
    kind: &'static str,
    name: &str,
    target: &str,
    check: impl Fn(&HardwareDescriptor, &str) -> Found,
) -> Result<String, WiringError> {
    let mismatch = |signal: &str, available| WiringError::DirectionMismatch {
        kind,
        name: name.to_string(),
        signal: signal.to_string(),
        available,
    };
    match check(hw, target) {
        Found::Yes => return Ok(target.to_string()),
        Found::Wrong(available) => return Err(mismatch(target, available)),
        Found::No => {}
    }
    if let Some(aliased) = hw.resolve_alias(target) {
        match check(hw, &aliased) {
            Found::Yes => return Ok(aliased),
            Found::Wrong(available) => return Err(mismatch(&aliased, available)),
            Found::No => {}
        }
    }
    Err(WiringError::UnknownParameterBinding {
        kind,
        name: name.to_string(),
        target: target.to_string(),
    })
}

/// Splits a leading `int`/`bool` qualifier off a display label.
///
/// `int_steps` yields `("int", "steps")`; a bare `bool` keeps `bool` as label.
pub fn type_qualifier(label: &str) -> Option<(&'static str, &str)> {
    for ty in ["int", "bool"] {
        if let Some(rest) = label.strip_prefix(ty) {
            if rest.is_empty() {
                return Some((ty, label));
            }
            if let Some(rest) = rest.strip_prefix('_') {
                return Some((ty, if rest.is_empty() { label } else { rest }));
            }
        }
    }
    None
}
