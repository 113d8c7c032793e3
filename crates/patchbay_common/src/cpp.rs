//! C++ literal formatting for generated code.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage type of a generated member variable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CppType {
    /// `float`, the default for continuous parameters.
    #[default]
    Float,
    /// `int`, for stepped parameters.
    Int,
    /// `bool`, for toggles.
    Bool,
    /// `uint8_t`, for MIDI byte caches.
    Uint8,
    /// `t_sample`, the patch's native sample type.
    TSample,
}

impl CppType {
    /// Returns the C++ spelling of this type.
    pub fn name(self) -> &'static str {
        match self {
            CppType::Float => "float",
            CppType::Int => "int",
            CppType::Bool => "bool",
            CppType::Uint8 => "uint8_t",
            CppType::TSample => "t_sample",
        }
    }

    /// Returns `true` for types whose values are whole numbers.
    pub fn is_integral(self) -> bool {
        matches!(self, CppType::Int | CppType::Bool | CppType::Uint8)
    }
}

impl fmt::Display for CppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Formats `value` as a C++ literal of type `ty`.
///
/// Integral types are truncated toward zero. Floating types always carry an
/// `f` suffix, with `.f` appended to whole numbers (`20` becomes `20.f`).
/// Non-finite values render as `0.f` since they have no literal spelling.
pub fn cpp_number(value: f64, ty: CppType) -> String {
    if ty.is_integral() {
        return format!("{}", value.trunc() as i64);
    }
    if !value.is_finite() {
        return "0.f".to_string();
    }
    let s = format!("{value}");
    if s.contains('e') {
        s
    } else if s.contains('.') {
        format!("{s}f")
    } else {
        format!("{s}.f")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_get_suffix() {
        assert_eq!(cpp_number(0.5, CppType::Float), "0.5f");
        assert_eq!(cpp_number(1980.0, CppType::Float), "1980.f");
        assert_eq!(cpp_number(-1.0, CppType::Float), "-1.f");
        assert_eq!(cpp_number(0.0, CppType::TSample), "0.f");
    }

    #[test]
    fn integral_types_truncate() {
        assert_eq!(cpp_number(3.9, CppType::Int), "3");
        assert_eq!(cpp_number(-3.9, CppType::Int), "-3");
        assert_eq!(cpp_number(1.0, CppType::Bool), "1");
        assert_eq!(cpp_number(74.2, CppType::Uint8), "74");
    }

    #[test]
    fn non_finite_is_zero() {
        assert_eq!(cpp_number(f64::NAN, CppType::Float), "0.f");
    }

    #[test]
    fn type_names() {
        assert_eq!(CppType::Uint8.to_string(), "uint8_t");
        assert_eq!(CppType::default().name(), "float");
        assert!(CppType::Bool.is_integral());
        assert!(!CppType::TSample.is_integral());
    }
}
