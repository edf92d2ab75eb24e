//! Compile-time mapping from a source shape to its legacy class.

use hc_legacy::LegacyValue;
use hc_rhist::StatSet;

/// Implemented by every bin precision that has a legacy class of
/// dimensionality `D`.
///
/// The fifteen supported pairs are `D ∈ {1, 2, 3}` times
/// `{i8, i16, i32, f32, f64}`; anything else is rejected by the compiler.
#[diagnostic::on_unimplemented(
    message = "no legacy histogram class exists for {D}-D histograms with `{Self}` bins",
    label = "unsupported (dimension, precision) pair",
    note = "legacy classes exist for 1 to 3 dimensions with i8, i16, i32, f32 or f64 bins"
)]
pub trait LegacyCounterpart<const D: usize>: LegacyValue {
    /// Legacy class name, e.g. `TH2F`.
    const CLASS: &'static str;
}

macro_rules! counterparts {
    ($($d:literal, $t:ty => $class:literal;)*) => {
        $(impl LegacyCounterpart<$d> for $t {
            const CLASS: &'static str = $class;
        })*
    };
}

counterparts! {
    1, i8 => "TH1C"; 1, i16 => "TH1S"; 1, i32 => "TH1I"; 1, f32 => "TH1F"; 1, f64 => "TH1D";
    2, i8 => "TH2C"; 2, i16 => "TH2S"; 2, i32 => "TH2I"; 2, f32 => "TH2F"; 2, f64 => "TH2D";
    3, i8 => "TH3C"; 3, i16 => "TH3S"; 3, i32 => "TH3I"; 3, f32 => "TH3F"; 3, f64 => "TH3D";
}

/// Whether `S` records bin content. Conversion requires it.
pub const fn has_content<S: StatSet>() -> bool {
    S::HAS_CONTENT
}
