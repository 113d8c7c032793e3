//! Parameter rescaling and encoder step sizes.

use patchbay_common::CppType;
use serde::Serialize;

/// Encoder increments for a full sweep of a continuous parameter.
const IDEAL_STEPS: f64 = 100.0;

/// Linear map from a hardware reading to a parameter value.
///
/// `value = raw * scale + offset`. For a hardware input with the default
/// `[0, 1]` domain this is `raw * (max - min) + min`; for a sub-range
/// `[lo, hi]` the two maps are composed so that `lo` yields `min` and `hi`
/// yields `max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scaling {
    /// Multiplier applied to the raw reading.
    pub scale: f64,
    /// Constant added after scaling.
    pub offset: f64,
}

impl Scaling {
    /// Builds the map for a parameter over `[min, max]` fed from `input_range`.
    pub fn new(min: f64, max: f64, input_range: Option<(f64, f64)>) -> Self {
        let range = max - min;
        match input_range {
            Some((lo, hi)) if (lo, hi) != (0.0, 1.0) && hi != lo => {
                let scale = range / (hi - lo);
                Self {
                    scale,
                    offset: min - lo * scale,
                }
            }
            _ => Self { scale: range, offset: min },
        }
    }

    /// The offset written into generated code; integral types round to nearest.
    pub fn code_offset(&self, ty: CppType) -> f64 {
        if ty.is_integral() {
            self.offset + 0.5
        } else {
            self.offset
        }
    }

    /// Evaluates the generated expression `(ty)(raw * scale + offset)`.
    pub fn apply(&self, raw: f64, ty: CppType) -> f64 {
        let v = raw * self.scale + self.code_offset(ty);
        match ty {
            CppType::Bool => {
                if v.trunc() != 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            t if t.is_integral() => v.trunc(),
            _ => v,
        }
    }
}

/// Encoder step for one tweak of a parameter.
///
/// Integer and boolean parameters step by 1. Continuous parameters wider
/// than 2 with integral bounds and default step by a semitone (1/12) below a
/// width of 10, and by the power of two nearest `width / 100` above it.
/// Everything else steps by `width / 100`.
pub fn stepsize(ty: CppType, min: f64, max: f64, default: f64) -> f64 {
    if matches!(ty, CppType::Int | CppType::Bool) {
        return 1.0;
    }
    let range = max - min;
    if range > 2.0 && max.fract() == 0.0 && default.fract() == 0.0 {
        if range < 10.0 {
            return 1.0 / 12.0;
        }
        return 2f64.powf((range / IDEAL_STEPS).log2().round());
    }
    let step = range / IDEAL_STEPS;
    if step == 0.0 {
        // Degenerate range; keep the parameter tweakable.
        return 1.0 / IDEAL_STEPS;
    }
    step
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_domain() {
        let s = Scaling::new(20.0, 2000.0, None);
        assert_eq!(s.scale, 1980.0);
        assert_eq!(s.offset, 20.0);
        assert_eq!(s.apply(0.0, CppType::Float), 20.0);
        assert_eq!(s.apply(1.0, CppType::Float), 2000.0);
        assert_eq!(Scaling::new(20.0, 2000.0, Some((0.0, 1.0))), s);
    }

    #[test]
    fn bipolar_domain() {
        let s = Scaling::new(0.0, 10.0, Some((-1.0, 1.0)));
        assert_eq!(s.scale, 5.0);
        assert_eq!(s.offset, 5.0);
        assert_eq!(s.apply(-1.0, CppType::Float), 0.0);
        assert_eq!(s.apply(1.0, CppType::Float), 10.0);
    }

    #[test]
    fn degenerate_domain_falls_back() {
        let s = Scaling::new(0.0, 4.0, Some((1.0, 1.0)));
        assert_eq!(s.scale, 4.0);
    }

    #[test]
    fn integral_rounding() {
        let s = Scaling::new(0.0, 4.0, None);
        assert_eq!(s.code_offset(CppType::Int), 0.5);
        assert_eq!(s.apply(0.0, CppType::Int), 0.0);
        assert_eq!(s.apply(0.6, CppType::Int), 2.0);
        assert_eq!(s.apply(1.0, CppType::Int), 4.0);
        let b = Scaling::new(0.0, 1.0, None);
        assert_eq!(b.apply(0.4, CppType::Bool), 0.0);
        assert_eq!(b.apply(0.5, CppType::Bool), 1.0);
    }

    #[test]
    fn steps() {
        assert_eq!(stepsize(CppType::Int, 0.0, 100.0, 0.0), 1.0);
        assert_eq!(stepsize(CppType::Bool, 0.0, 1.0, 0.0), 1.0);
        assert_eq!(stepsize(CppType::Float, 0.0, 1.0, 0.5), 0.01);
        assert_eq!(stepsize(CppType::Float, -2.0, 2.0, 0.0), 1.0 / 12.0);
        // 1980 / 100 = 19.8, nearest power of two is 16
        assert_eq!(stepsize(CppType::Float, 20.0, 2000.0, 440.0), 16.0);
        // non-integral default disables the musical steps
        assert_eq!(stepsize(CppType::Float, 0.0, 250.0, 0.5), 2.5);
        assert_eq!(stepsize(CppType::Float, 1.0, 1.0, 1.0), 0.01);
    }

    proptest! {
        #[test]
        fn rescale_stays_in_range(
            min in -1.0e4f64..1.0e4,
            width in 0.0f64..1.0e4,
            raw in 0.0f64..=1.0,
        ) {
            let max = min + width;
            let v = Scaling::new(min, max, None).apply(raw, CppType::Float);
            let eps = 1e-9 * (1.0 + min.abs() + max.abs());
            prop_assert!(v >= min - eps && v <= max + eps, "{v} outside [{min}, {max}]");
        }

        #[test]
        fn integer_rescale_stays_in_range(
            min in 0i32..1000,
            width in 0i32..1000,
            raw in 0.0f64..=1.0,
        ) {
            let (min, max) = (f64::from(min), f64::from(min + width));
            let v = Scaling::new(min, max, None).apply(raw, CppType::Int);
            prop_assert!(v >= min && v <= max, "{v} outside [{min}, {max}]");
        }

        #[test]
        fn sub_range_endpoints_map_to_bounds(
            min in -100.0f64..100.0,
            width in 0.1f64..100.0,
            lo in -5.0f64..0.0,
            span in 0.5f64..5.0,
        ) {
            let max = min + width;
            let s = Scaling::new(min, max, Some((lo, lo + span)));
            let eps = 1e-9 * (1.0 + min.abs() + max.abs());
            prop_assert!((s.apply(lo, CppType::Float) - min).abs() < eps);
            prop_assert!((s.apply(lo + span, CppType::Float) - max).abs() < eps);
        }
    }
}
