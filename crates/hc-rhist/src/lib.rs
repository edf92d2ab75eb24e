//! # hc-rhist
//!
//! The source histogram model: `D`-dimensional histograms with per-axis
//! binning schemes ([`Axis`]), a storage precision `P` and a compile-time set
//! of statistics trackers `S`.
//!
//! ## Example
//!
//! ```
//! use hc_rhist::{Axis, RHist, StatContent, StatUncertainty};
//!
//! let mut h: RHist<2, f64, (StatContent, StatUncertainty)> = RHist::with_title(
//!     "pt vs eta",
//!     [Axis::equidistant(10, 0.0, 100.0)?, Axis::irregular(vec![-2.5, 0.0, 1.0, 2.5])?],
//! );
//! h.fill_weighted([42.0, 0.3], 2.0);
//! assert_eq!(h.entries(), 1);
//! # Ok::<(), hc_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod axis;
pub mod hist;
pub mod stats;

pub use axis::{Axis, EquidistantAxis, IrregularAxis, LabelsAxis, OVERFLOW, UNDERFLOW};
pub use hist::{RHist, RHistImpl};
pub use stats::{
    DataMomentUncert, HistStats, Stat, StatContent, StatFlags, StatSet,
    StatTotalSumOfSquaredWeights, StatTotalSumOfWeights, StatUncertainty,
};
