//! Alias resolution.
//!
//! Aliases map alternate spellings (`knob` for `knob1`) to canonical
//! component or signal names. A name may also use an alias as a prefix of a
//! component sub-signal: with `sw` aliasing `sw1`, `sw_rise` resolves to
//! `sw1_rise`.

use crate::model::HardwareDescriptor;

impl HardwareDescriptor {
    /// Resolves `name` through the alias table.
    ///
    /// Lookup ignores ASCII case. Returns `None` when no alias applies.
    pub fn resolve_alias(&self, name: &str) -> Option<String> {
        let low = name.to_ascii_lowercase();
        if let Some(target) = self.aliases.get(&low) {
            return Some(target.clone());
        }
        let mut best: Option<(usize, String)> = None;
        for (alias, target) in self.aliases.iter() {
            let Some(rest) = low.strip_prefix(alias) else {
                continue;
            };
            let candidate = format!("{target}{rest}");
            let is_variant = self
                .inputs
                .iter()
                .map(|s| (&s.name, &s.component))
                .chain(self.outputs.iter().map(|s| (&s.name, &s.component)))
                .any(|(signal, component)| {
                    *signal == candidate && component.as_deref() == Some(target.as_str())
                });
            if is_variant && best.as_ref().map_or(true, |(len, _)| alias.len() > *len) {
                best = Some((alias.len(), candidate));
            }
        }
        best.map(|(_, name)| name)
    }
}
