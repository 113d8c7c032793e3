//! Evaluation of the constant expressions found in patch initializers.
//!
//! The accepted language is deliberately tiny: numeric literals, the two
//! build constants `samplerate` and `vectorsize`, parentheses, unary minus,
//! the binary operators `+ - * /`, and C-style numeric casts such as `(int)`
//! or `(t_sample)`. Casts are transparent except `(int)` and `(long)`, which
//! truncate toward zero. Anything else is rejected.

use crate::error::PatchError;

const CASTS: [&str; 5] = ["int", "long", "t_sample", "float", "double"];

/// Deepest nesting of parentheses, casts and unary operators accepted.
pub const MAX_DEPTH: usize = 128;

/// Values bound to the symbolic constants of the expression language.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constants {
    /// Sample rate in Hz, bound to `samplerate`.
    pub samplerate: f64,
    /// Audio block size in frames, bound to `vectorsize`.
    pub vectorsize: f64,
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            samplerate: 48000.0,
            vectorsize: 24.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn lex(src: &str) -> Result<Vec<Token>, String> {
    let bytes = src.as_bytes();
    let mut pos = 0;
    let mut tokens = Vec::new();
    while pos < bytes.len() {
        let c = bytes[pos];
        match c {
            b' ' | b'\t' | b'\n' | b'\r' => pos += 1,
            b'+' => {
                tokens.push(Token::Plus);
                pos += 1;
            }
            b'-' => {
                tokens.push(Token::Minus);
                pos += 1;
            }
            b'*' => {
                tokens.push(Token::Star);
                pos += 1;
            }
            b'/' => {
                tokens.push(Token::Slash);
                pos += 1;
            }
            b'(' => {
                tokens.push(Token::LParen);
                pos += 1;
            }
            b')' => {
                tokens.push(Token::RParen);
                pos += 1;
            }
            b'0'..=b'9' | b'.' => {
                let start = pos;
                while pos < bytes.len() && (bytes[pos].is_ascii_digit() || bytes[pos] == b'.') {
                    pos += 1;
                }
                // Exponent part: 1e-05
                if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
                    let mut end = pos + 1;
                    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
                        end += 1;
                    }
                    if end < bytes.len() && bytes[end].is_ascii_digit() {
                        while end < bytes.len() && bytes[end].is_ascii_digit() {
                            end += 1;
                        }
                        pos = end;
                    }
                }
                let text = &src[start..pos];
                let value = text
                    .parse::<f64>()
                    .map_err(|_| format!("invalid number `{text}`"))?;
                // C float suffix: 0.5f
                if pos < bytes.len() && (bytes[pos] == b'f' || bytes[pos] == b'F') {
                    pos += 1;
                }
                tokens.push(Token::Number(value));
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                let start = pos;
                while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_')
                {
                    pos += 1;
                }
                tokens.push(Token::Ident(src[start..pos].to_string()));
            }
            _ => {
                let ch = src[pos..].chars().next().unwrap_or('?');
                return Err(format!("unsupported character `{ch}`"));
            }
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    constants: &'a Constants,
}

fn infix_binding_power(tok: &Token) -> Option<(u8, u8)> {
    match tok {
        Token::Plus | Token::Minus => Some((1, 2)),
        Token::Star | Token::Slash => Some((3, 4)),
        _ => None,
    }
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn bump(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        self.pos += 1;
        tok
    }

    fn expect_rparen(&mut self) -> Result<(), String> {
        match self.bump() {
            Some(Token::RParen) => Ok(()),
            Some(t) => Err(format!("expected `)`, found {}", describe(t))),
            None => Err("expected `)`, found end of expression".to_string()),
        }
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<f64, String> {
        if self.depth == MAX_DEPTH {
            return Err(format!("nesting deeper than {MAX_DEPTH} levels"));
        }
        self.depth += 1;
        let value = self.parse_operators(min_bp);
        self.depth -= 1;
        value
    }

    fn parse_operators(&mut self, min_bp: u8) -> Result<f64, String> {
        let mut lhs = self.parse_prefix()?;
        while let Some(tok) = self.peek() {
            let Some((l_bp, r_bp)) = infix_binding_power(tok) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }
            let op = tok.clone();
            self.pos += 1;
            let rhs = self.parse_expr_bp(r_bp)?;
            lhs = match op {
                Token::Plus => lhs + rhs,
                Token::Minus => lhs - rhs,
                Token::Star => lhs * rhs,
                Token::Slash => {
                    if rhs == 0.0 {
                        return Err("division by zero".to_string());
                    }
                    lhs / rhs
                }
                _ => unreachable!("only arithmetic tokens have a binding power"),
            };
        }
        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<f64, String> {
        let Some(tok) = self.bump().cloned() else {
            return Err("unexpected end of expression".to_string());
        };
        match tok {
            Token::Number(n) => Ok(n),
            Token::Minus => Ok(-self.parse_expr_bp(5)?),
            Token::Plus => self.parse_expr_bp(5),
            Token::Ident(name) => match name.as_str() {
                "samplerate" => Ok(self.constants.samplerate),
                "vectorsize" => Ok(self.constants.vectorsize),
                _ => Err(format!("unknown identifier `{name}`")),
            },
            Token::LParen => {
                if let (Some(Token::Ident(name)), Some(Token::RParen)) =
                    (self.peek(), self.peek_at(1))
                {
                    if CASTS.contains(&name.as_str()) {
                        let truncates = matches!(name.as_str(), "int" | "long");
                        self.pos += 2;
                        let value = self.parse_expr_bp(5)?;
                        return Ok(if truncates { value.trunc() } else { value });
                    }
                    if !matches!(name.as_str(), "samplerate" | "vectorsize") {
                        return Err(format!("unsupported cast `({name})`"));
                    }
                }
                let value = self.parse_expr_bp(0)?;
                self.expect_rparen()?;
                Ok(value)
            }
            other => Err(format!("unexpected {}", describe(&other))),
        }
    }
}

fn describe(tok: &Token) -> String {
    match tok {
        Token::Number(n) => format!("number `{n}`"),
        Token::Ident(s) => format!("identifier `{s}`"),
        Token::Plus => "`+`".to_string(),
        Token::Minus => "`-`".to_string(),
        Token::Star => "`*`".to_string(),
        Token::Slash => "`/`".to_string(),
        Token::LParen => "`(`".to_string(),
        Token::RParen => "`)`".to_string(),
    }
}

/// Evaluates `expr` with `constants` bound to the symbolic names.
///
/// # Errors
///
/// Returns [`PatchError::UnresolvableConstantExpression`] for any character,
/// identifier or construct outside the language, for division by zero, for
/// nesting past [`MAX_DEPTH`], and for results that are not finite.
pub fn eval(expr: &str, constants: &Constants) -> Result<f64, PatchError> {
    let fail = |reason: String| PatchError::UnresolvableConstantExpression {
        expr: expr.trim().to_string(),
        reason,
    };
    let tokens = lex(expr).map_err(fail)?;
    if tokens.is_empty() {
        return Err(fail("empty expression".to_string()));
    }
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
        constants,
    };
    let value = parser.parse_expr_bp(0).map_err(fail)?;
    if let Some(tok) = parser.peek() {
        return Err(fail(format!("trailing {}", describe(tok))));
    }
    if !value.is_finite() {
        return Err(fail("result is not finite".to_string()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(s: &str) -> f64 {
        eval(s, &Constants::default()).unwrap()
    }

    fn reason(s: &str) -> String {
        match eval(s, &Constants::default()) {
            Err(PatchError::UnresolvableConstantExpression { reason, .. }) => reason,
            other => panic!("expected failure for `{s}`, got {other:?}"),
        }
    }

    #[test]
    fn genlib_initializer_forms() {
        assert_eq!(ev("((int)16384)"), 16384.0);
        assert_eq!(ev("samplerate"), 48000.0);
        assert_eq!(ev("(samplerate * 2)"), 96000.0);
        assert_eq!(ev("((t_sample)3.1415926535898)"), 3.1415926535898);
        assert!((ev("(3.1415926535898 * 10)") - 31.415926535898).abs() < 1e-9);
        assert_eq!(ev("(vectorsize * 8)"), 192.0);
        assert_eq!(ev("((16 * 16) * 4096)"), 1048576.0);
        assert!((ev("(samplerate * 0.1)") - 4800.0).abs() < 1e-9);
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(ev("1 + 2 * 3"), 7.0);
        assert_eq!(ev("(1 + 2) * 3"), 9.0);
        assert_eq!(ev("8 - 4 - 2"), 2.0);
        assert_eq!(ev("16 / 4 / 2"), 2.0);
    }

    #[test]
    fn unary_minus_and_casts() {
        assert_eq!(ev("-1"), -1.0);
        assert_eq!(ev("((int)-0.5)"), 0.0);
        assert_eq!(ev("-(2 * 3)"), -6.0);
        assert_eq!(ev("((int)2.9)"), 2.0);
        assert_eq!(ev("((float)2.5)"), 2.5);
        assert_eq!(ev("((long)7.5)"), 7.0);
        assert_eq!(ev("((double)1e-05)"), 1e-05);
    }

    #[test]
    fn nesting_is_capped() {
        let ok = format!("{}1{}", "(".repeat(MAX_DEPTH - 1), ")".repeat(MAX_DEPTH - 1));
        assert_eq!(ev(&ok), 1.0);

        let deep = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(reason(&deep).contains("nesting deeper"));
        assert!(reason(&"-".repeat(10_000)).contains("nesting deeper"));
    }

    #[test]
    fn float_suffix() {
        assert_eq!(ev("0.5f"), 0.5);
    }

    #[test]
    fn bound_constants() {
        let c = Constants {
            samplerate: 32000.0,
            vectorsize: 48.0,
        };
        assert_eq!(eval("samplerate / vectorsize", &c).unwrap(), 32000.0 / 48.0);
    }

    #[test]
    fn rejects_unknown_identifiers() {
        assert_eq!(reason("foo * 2"), "unknown identifier `foo`");
        assert_eq!(reason("((unsigned)3)"), "unsupported cast `(unsigned)`");
    }

    #[test]
    fn rejects_other_operators() {
        assert_eq!(reason("3 % 2"), "unsupported character `%`");
        assert_eq!(reason("1 << 2"), "unsupported character `<`");
        assert_eq!(reason("sin(1)"), "unknown identifier `sin`");
    }

    #[test]
    fn rejects_division_by_zero() {
        assert_eq!(reason("1 / 0"), "division by zero");
        assert_eq!(reason("1 / (vectorsize - 24)"), "division by zero");
    }

    #[test]
    fn rejects_malformed() {
        assert_eq!(reason(""), "empty expression");
        assert_eq!(reason("(1 + 2"), "expected `)`, found end of expression");
        assert_eq!(reason("1 2"), "trailing number `2`");
        assert_eq!(reason("*"), "unexpected `*`");
    }

    #[test]
    fn error_keeps_expression_text() {
        let err = eval("  samplerate * x ", &Constants::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot resolve constant expression `samplerate * x`: unknown identifier `x`"
        );
    }
}
