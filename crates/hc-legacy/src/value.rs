//! Legacy bin storage types and their accumulation rules.

use hc_core::BinValue;

/// Storage type of a legacy histogram class.
pub trait LegacyValue: BinValue {
    /// Class-name suffix (`C`, `S`, `I`, `F`, `D`).
    const SUFFIX: char;

    /// `self + w` with the legacy accumulation rule: integer classes add the
    /// truncated weight and clamp to `±MAX`, float classes add in their own
    /// precision.
    fn add_weight(self, w: f64) -> Self;
}

macro_rules! impl_legacy_int {
    ($($t:ty => $suffix:literal),*) => {
        $(
            impl LegacyValue for $t {
                const SUFFIX: char = $suffix;

                fn add_weight(self, w: f64) -> Self {
                    let max = <$t>::MAX as i64;
                    let newval = (self as i64).saturating_add(w as i64);
                    newval.clamp(-max, max) as $t
                }
            }
        )*
    };
}

impl_legacy_int!(i8 => 'C', i16 => 'S', i32 => 'I');

impl LegacyValue for f32 {
    const SUFFIX: char = 'F';

    fn add_weight(self, w: f64) -> Self {
        self + w as f32
    }
}

impl LegacyValue for f64 {
    const SUFFIX: char = 'D';

    fn add_weight(self, w: f64) -> Self {
        self + w
    }
}
