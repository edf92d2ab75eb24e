//! Per-bin storage precision.

use std::fmt;

/// A numeric type usable as histogram bin storage.
///
/// Weights are always accumulated as `f64` and converted into the storage
/// type on write, so integer precisions truncate toward zero and saturate.
/// Signed integers saturate symmetrically at `±MAX`.
pub trait BinValue: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Short type name used in diagnostics (`"i8"`, `"f64"`, ...).
    const NAME: &'static str;

    /// Whether the type stores integral values.
    const INTEGRAL: bool;

    /// Widen to `f64`.
    fn to_f64(self) -> f64;

    /// Narrow from `f64` (truncating, saturating for integers; signed types
    /// never store `MIN`).
    fn from_f64(v: f64) -> Self;
}

macro_rules! impl_bin_value {
    ($($t:ty => $integral:expr, |$v:ident| $narrow:expr);* $(;)?) => {
        $(
            impl BinValue for $t {
                const NAME: &'static str = stringify!($t);
                const INTEGRAL: bool = $integral;

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64($v: f64) -> Self {
                    $narrow
                }
            }
        )*
    };
}

impl_bin_value! {
    i8 => true, |v| (v as i8).max(-i8::MAX);
    i16 => true, |v| (v as i16).max(-i16::MAX);
    i32 => true, |v| (v as i32).max(-i32::MAX);
    i64 => true, |v| (v as i64).max(-i64::MAX);
    u64 => true, |v| v as u64;
    f32 => false, |v| v as f32;
    f64 => false, |v| v;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_narrowing_truncates_and_saturates() {
        assert_eq!(i8::from_f64(3.9), 3);
        assert_eq!(i8::from_f64(-3.9), -3);
        assert_eq!(i8::from_f64(1e6), i8::MAX);
        assert_eq!(i16::from_f64(-1e9), -i16::MAX);
        assert_eq!(i8::from_f64(-128.0), -127);
        assert_eq!(i32::from_f64(-3e9), -i32::MAX);
        assert_eq!(u64::from_f64(-1.0), 0);
    }

    #[test]
    fn float_round_trip() {
        assert_eq!(f64::from_f64(0.125).to_f64(), 0.125);
        assert_eq!(f32::from_f64(0.5).to_f64(), 0.5);
        assert_eq!(<f32 as BinValue>::NAME, "f32");
        assert!(<i32 as BinValue>::INTEGRAL);
    }
}
