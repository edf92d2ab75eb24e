//! # hc-legacy
//!
//! The legacy histogram model: one concrete class per dimensionality and
//! precision (`TH1C` … `TH3D`), three fixed axes, a flat cell array with one
//! underflow and one overflow bin per axis, an optional squared-error array and
//! an 11-slot aggregate statistics vector.
//!
//! ## Example
//!
//! ```
//! use hc_legacy::{TH1D, NSTAT};
//!
//! let mut h = TH1D::new("h", "My title;x [GeV]", 10, 0.0, 1.0)?;
//! h.add_bin_content(3, 2.0)?;
//! h.set_entries(1.0);
//! let stats: [f64; NSTAT] = h.get_stats();
//! assert_eq!(stats[0], 2.0);
//! assert_eq!(h.x_axis().title(), "x [GeV]");
//! # Ok::<(), hc_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod hist;
pub mod naming;
pub mod taxis;
pub mod value;

pub use hist::{
    BinErrorOption, BinLayout, NSTAT, StatOverflows, TH1, TH1C, TH1D, TH1F, TH1I, TH1S, TH2,
    TH2C, TH2D, TH2F, TH2I, TH2S, TH3, TH3C, TH3D, TH3F, TH3I, TH3S, THist,
    set_default_stat_overflows,
};
pub use naming::unique_name;
pub use taxis::TAxis;
pub use value::LegacyValue;
