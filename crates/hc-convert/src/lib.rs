//! # hc-convert
//!
//! Converts configurable [`hc_rhist::RHist`] histograms into the legacy
//! [`hc_legacy::THist`] classes.
//!
//! The legacy class is chosen at compile time from the source's dimension and
//! bin precision, e.g. a `RHist<2, f32, _>` always becomes a `TH2F`:
//!
//! ```
//! use hc_convert::convert;
//! use hc_legacy::TH2F;
//! use hc_rhist::{Axis, RHist, StatContent, StatUncertainty};
//!
//! let mut src: RHist<2, f32, (StatContent, StatUncertainty)> = RHist::with_title(
//!     "energy;E [GeV]",
//!     [Axis::equidistant(10, 0.0, 1.0)?, Axis::irregular(vec![0.0, 1.0, 10.0])?],
//! );
//! src.fill_weighted([0.5, 2.0], 0.5);
//!
//! let legacy: TH2F = convert(&src, "energy")?;
//! assert_eq!(legacy.title(), "energy#;E [GeV]");
//! assert_eq!(legacy.entries(), 1.0);
//! # Ok::<(), hc_core::Error>(())
//! ```
//!
//! Shapes without a legacy class do not compile:
//!
//! ```compile_fail
//! use hc_rhist::{Axis, RHist};
//! let src: RHist<1, i64> = RHist::new([Axis::equidistant(1, 0.0, 1.0).unwrap()]);
//! let _ = hc_convert::convert(&src, "h");
//! ```
//!
//! ```compile_fail
//! use hc_rhist::{Axis, RHist};
//! let src: RHist<1, u64> = RHist::new([Axis::equidistant(1, 0.0, 1.0).unwrap()]);
//! let _ = hc_convert::convert(&src, "h");
//! ```
//!
//! ```compile_fail
//! use hc_rhist::{Axis, RHist};
//! let ax = || Axis::equidistant(1, 0.0, 1.0).unwrap();
//! let src: RHist<4, f64> = RHist::new([ax(), ax(), ax(), ax()]);
//! let _ = hc_convert::convert(&src, "h");
//! ```
//!
//! Neither do statistics that lack bin content:
//!
//! ```compile_fail
//! use hc_rhist::{Axis, RHist, StatUncertainty};
//! let src: RHist<1, f64, (StatUncertainty,)> =
//!     RHist::new([Axis::equidistant(1, 0.0, 1.0).unwrap()]);
//! let _ = hc_convert::convert(&src, "h");
//! ```
//!
//! ```compile_fail
//! use hc_rhist::{Axis, DataMomentUncert, RHist, StatTotalSumOfWeights};
//! let src: RHist<1, f64, (StatTotalSumOfWeights, DataMomentUncert)> =
//!     RHist::new([Axis::equidistant(1, 0.0, 1.0).unwrap()]);
//! let _ = hc_convert::convert(&src, "h");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bins;
pub mod builder;
pub mod matcher;
pub mod title;
pub mod transfer;

pub use bins::{BinIndexTranslator, check_binning, verify_bin_conventions};
pub use builder::{AxisArg, LegacyConstruct};
pub use matcher::LegacyCounterpart;

use hc_core::{Error, Result};
use hc_legacy::THist;
use hc_rhist::{RHist, StatSet};

/// Convert `src` into a new legacy histogram called `name`.
///
/// Fails without producing an object when `src` is unconfigured, when a 3-D
/// histogram mixes equidistant and irregular axes, or when the legacy binning
/// does not reproduce the source binning.
pub fn convert<const D: usize, P, S>(src: &RHist<D, P, S>, name: &str) -> Result<THist<D, P>>
where
    P: LegacyCounterpart<D>,
    S: StatSet,
    THist<D, P>: LegacyConstruct,
{
    const {
        assert!(
            matcher::has_content::<S>(),
            "conversion requires a statistics set that records bin content (add StatContent)"
        )
    };
    let imp = src.imp().ok_or(Error::NullSource)?;
    verify_bin_conventions()?;

    let title = title::escape(imp.title());
    let mut dest = builder::build::<D, P>(imp.axes(), name, &title)?;
    check_binning(imp, &dest)?;
    transfer::fill(&mut dest, imp)?;

    log::debug!(
        "converted {D}-D histogram into {} '{name}' ({} cells, {} entries)",
        P::CLASS,
        dest.ncells(),
        dest.entries()
    );
    Ok(dest)
}

/// Method-call form of [`convert`].
pub trait ToLegacy<const D: usize, P> {
    /// See [`convert`].
    fn to_legacy(&self, name: &str) -> Result<THist<D, P>>;
}

impl<const D: usize, P, S> ToLegacy<D, P> for RHist<D, P, S>
where
    P: LegacyCounterpart<D>,
    S: StatSet,
    THist<D, P>: LegacyConstruct,
{
    fn to_legacy(&self, name: &str) -> Result<THist<D, P>> {
        convert(self, name)
    }
}
