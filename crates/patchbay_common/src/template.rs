//! Brace-placeholder templates shared by the hardware catalog and the emitter.
//!
//! A placeholder is `{key}`, optionally padded with spaces, where `key` is made
//! of ASCII letters, digits and underscores. `{{` and `}}` are literal braces.
//! Any other brace is literal text, so C++ initializers such as
//! `{DSY_GPIOE, 6}` pass through untouched.

/// What to do with a placeholder whose key has no value.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Missing {
    /// Render the placeholder as nothing.
    Empty,
    /// Leave `{key}` in place and re-escape literal braces, so the output is
    /// itself a template for a later pass.
    Keep,
    /// Fail with [`TemplateError::UnknownKey`].
    Error,
}

/// Errors produced while rendering a template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// A placeholder was opened but the template ended before `}`.
    #[error("unterminated placeholder `{{{key}` in template")]
    Unterminated {
        /// The partial key text.
        key: String,
    },
    /// A placeholder named a key with no value and [`Missing::Error`] was requested.
    #[error("template references unknown key `{key}`")]
    UnknownKey {
        /// The missing key.
        key: String,
    },
}

enum Piece<'a> {
    Text(&'a str),
    Open,
    Close,
    Key(&'a str),
}

enum Scan {
    Key { start: usize, end: usize, next: usize },
    Unterminated { start: usize, end: usize },
    Literal,
}

fn is_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn skip_blanks(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && (bytes[pos] == b' ' || bytes[pos] == b'\t') {
        pos += 1;
    }
    pos
}

fn scan_placeholder(bytes: &[u8], open: usize) -> Scan {
    let start = skip_blanks(bytes, open + 1);
    let mut end = start;
    while end < bytes.len() && is_key_byte(bytes[end]) {
        end += 1;
    }
    if end == start {
        return Scan::Literal;
    }
    let close = skip_blanks(bytes, end);
    match bytes.get(close) {
        Some(b'}') => Scan::Key {
            start,
            end,
            next: close + 1,
        },
        None => Scan::Unterminated { start, end },
        Some(_) => Scan::Literal,
    }
}

fn flush<'a>(pieces: &mut Vec<Piece<'a>>, template: &'a str, from: usize, to: usize) {
    if to > from {
        pieces.push(Piece::Text(&template[from..to]));
    }
}

fn tokenize(template: &str) -> Result<Vec<Piece<'_>>, TemplateError> {
    let bytes = template.as_bytes();
    let mut pieces = Vec::new();
    let mut pos = 0;
    let mut text_start = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'{' if bytes.get(pos + 1) == Some(&b'{') => {
                flush(&mut pieces, template, text_start, pos);
                pieces.push(Piece::Open);
                pos += 2;
                text_start = pos;
            }
            b'}' if bytes.get(pos + 1) == Some(&b'}') => {
                flush(&mut pieces, template, text_start, pos);
                pieces.push(Piece::Close);
                pos += 2;
                text_start = pos;
            }
            b'{' => match scan_placeholder(bytes, pos) {
                Scan::Key { start, end, next } => {
                    flush(&mut pieces, template, text_start, pos);
                    pieces.push(Piece::Key(&template[start..end]));
                    pos = next;
                    text_start = pos;
                }
                Scan::Unterminated { start, end } => {
                    return Err(TemplateError::Unterminated {
                        key: template[start..end].to_string(),
                    });
                }
                Scan::Literal => pos += 1,
            },
            _ => pos += 1,
        }
    }
    flush(&mut pieces, template, text_start, bytes.len());
    Ok(pieces)
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '{' => out.push_str("{{"),
            '}' => out.push_str("}}"),
            c => out.push(c),
        }
    }
}

/// Renders `template`, resolving each placeholder through `lookup`.
///
/// Keys for which `lookup` returns `None` are handled according to `missing`.
pub fn format_map<F>(template: &str, missing: Missing, mut lookup: F) -> Result<String, TemplateError>
where
    F: FnMut(&str) -> Option<String>,
{
    let keep = missing == Missing::Keep;
    let mut out = String::with_capacity(template.len());
    for piece in tokenize(template)? {
        match piece {
            Piece::Text(text) if keep => escape_into(&mut out, text),
            Piece::Text(text) => out.push_str(text),
            Piece::Open if keep => out.push_str("{{"),
            Piece::Open => out.push('{'),
            Piece::Close if keep => out.push_str("}}"),
            Piece::Close => out.push('}'),
            Piece::Key(key) => match lookup(key) {
                Some(value) if keep => escape_into(&mut out, &value),
                Some(value) => out.push_str(&value),
                None => match missing {
                    Missing::Empty => {}
                    Missing::Keep => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                    Missing::Error => {
                        return Err(TemplateError::UnknownKey {
                            key: key.to_string(),
                        })
                    }
                },
            },
        }
    }
    Ok(out)
}

/// Returns the placeholder keys of `template` in order of appearance.
pub fn keys(template: &str) -> Result<Vec<&str>, TemplateError> {
    Ok(tokenize(template)?
        .into_iter()
        .filter_map(|p| match p {
            Piece::Key(k) => Some(k),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn render(t: &str, m: Missing, v: &BTreeMap<String, String>) -> Result<String, TemplateError> {
        format_map(t, m, |k| v.get(k).cloned())
    }

    #[test]
    fn substitutes_keys() {
        let v = vars(&[("name", "sw1"), ("pin", "28")]);
        let out = render("{name}.Init(som.GetPin({ pin }));", Missing::Error, &v).unwrap();
        assert_eq!(out, "sw1.Init(som.GetPin(28));");
    }

    #[test]
    fn doubled_braces_are_literal() {
        let v = vars(&[("name", "mux")]);
        let out = render("for (;;) {{ {name}.Update(); }}", Missing::Error, &v).unwrap();
        assert_eq!(out, "for (;;) { mux.Update(); }");
    }

    #[test]
    fn initializer_braces_pass_through() {
        let out = render("sa = {DSY_GPIOE, 6};", Missing::Error, &BTreeMap::new()).unwrap();
        assert_eq!(out, "sa = {DSY_GPIOE, 6};");
        let out = render("x = { };", Missing::Error, &BTreeMap::new()).unwrap();
        assert_eq!(out, "x = { };");
    }

    #[test]
    fn missing_empty_renders_nothing() {
        let out = render("a{gone}b", Missing::Empty, &BTreeMap::new()).unwrap();
        assert_eq!(out, "ab");
    }

    #[test]
    fn missing_error_names_key() {
        let err = render("{value}", Missing::Error, &BTreeMap::new()).unwrap_err();
        assert_eq!(err.to_string(), "template references unknown key `value`");
    }

    #[test]
    fn unterminated_placeholder() {
        let err = render("som.GetPin({pin", Missing::Empty, &BTreeMap::new()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::Unterminated {
                key: "pin".to_string()
            }
        );
        assert_eq!(err.to_string(), "unterminated placeholder `{pin` in template");
    }

    #[test]
    fn keep_mode_yields_a_template() {
        let first = vars(&[("name", "led1")]);
        let partial = render(
            "hardware.{name}.Set({value}); {{}}",
            Missing::Keep,
            &first,
        )
        .unwrap();
        assert_eq!(partial, "hardware.led1.Set({value}); {{}}");

        let second = vars(&[("value", "led1")]);
        let full = render(&partial, Missing::Error, &second).unwrap();
        assert_eq!(full, "hardware.led1.Set(led1); {}");
    }

    #[test]
    fn keep_mode_escapes_substituted_braces() {
        let first = vars(&[("init", "{x}")]);
        let partial = render("{ {init} }", Missing::Keep, &first).unwrap();
        let full = render(&partial, Missing::Error, &BTreeMap::new()).unwrap();
        assert_eq!(full, "{ {x} }");
    }

    #[test]
    fn lists_keys() {
        let k = keys("{name}_{ sub } {{lit}} {i}").unwrap();
        assert_eq!(k, vec!["name", "sub", "i"]);
    }
}
