//! Source-to-legacy bin index translation.
//!
//! The two models number their global bins differently (the source puts the
//! last axis fastest and gives flow bins negative numbers; the legacy layout
//! puts axis 0 fastest). Translation therefore never maps global numbers
//! directly: it decomposes through the source's own `local_bins`, remaps
//! under/overflow per axis, and recombines through the legacy layout.

use std::sync::OnceLock;

use hc_core::{BinValue, Error, Result};
use hc_legacy::{BinLayout, LegacyValue, TH3D, THist};
use hc_rhist::{Axis, OVERFLOW, RHist, RHistImpl, UNDERFLOW};

/// Maps source global bins of one histogram to legacy global bins.
#[derive(Debug)]
pub struct BinIndexTranslator<'a, const D: usize, P> {
    src: &'a RHistImpl<D, P>,
    layout: BinLayout,
}

impl<'a, const D: usize, P: BinValue> BinIndexTranslator<'a, D, P> {
    /// Translator from `src` into a legacy histogram with `layout`.
    pub fn new(src: &'a RHistImpl<D, P>, layout: BinLayout) -> Self {
        Self { src, layout }
    }

    /// Legacy global bin of source global bin `global`.
    pub fn to_legacy_bin(&self, global: i64) -> Result<usize> {
        let local = self.src.local_bins(global)?;
        let mut xyz = [0i64; 3];
        for (i, (axis, &l)) in self.src.axes().iter().zip(&local).enumerate() {
            xyz[i] = legacy_local(axis, l);
        }
        Ok(self.layout.get_bin(xyz[0], xyz[1], xyz[2]))
    }
}

/// Legacy local bin: underflow is `0`, overflow is `n + 1`, regular bins keep
/// their number.
fn legacy_local(axis: &Axis, local: i64) -> i64 {
    match local {
        UNDERFLOW => 0,
        OVERFLOW => axis.n_bins_no_over() as i64 + 1,
        l => l,
    }
}

fn edges_agree(a: f64, b: f64) -> bool {
    a == b || (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

/// Structural agreement of `src` and `dest`: cell count, per-axis bin counts
/// and the first two lower edges of every axis.
pub fn check_binning<const D: usize, P, L>(src: &RHistImpl<D, P>, dest: &THist<D, L>) -> Result<()>
where
    P: BinValue,
    L: LegacyValue,
{
    let expected: usize = src.axes().iter().map(|a| a.n_bins_no_over() + 2).product();
    if expected != dest.ncells() {
        return Err(Error::BinningMismatch(format!(
            "expected {expected} legacy cells, {} has {}",
            dest.class_name(),
            dest.ncells()
        )));
    }
    for (i, axis) in src.axes().iter().enumerate() {
        let legacy = dest.axis(i)?;
        if legacy.nbins() != axis.n_bins_no_over() {
            return Err(Error::BinningMismatch(format!(
                "axis {i}: {} regular bins in the source, {} in the legacy axis",
                axis.n_bins_no_over(),
                legacy.nbins()
            )));
        }
        let probes = if axis.n_bins_no_over() > 1 { 2 } else { 1 };
        for bin in 1..=probes {
            let (ours, theirs) = (axis.bin_from(bin), legacy.bin_low_edge(bin));
            if !edges_agree(ours, theirs) {
                return Err(Error::BinningMismatch(format!(
                    "axis {i}: bin {bin} starts at {ours} in the source but at {theirs} in the legacy axis"
                )));
            }
        }
    }
    Ok(())
}

static CONVENTIONS: OnceLock<std::result::Result<(), String>> = OnceLock::new();

/// Check once per process that per-axis local bins mean the same thing in
/// both models; every later call returns the cached verdict.
pub fn verify_bin_conventions() -> Result<()> {
    CONVENTIONS
        .get_or_init(|| {
            let verdict = probe_conventions().map_err(|e| e.to_string());
            match &verdict {
                Ok(()) => log::debug!("bin numbering conventions verified"),
                Err(msg) => log::error!("bin numbering conventions broken: {msg}"),
            }
            verdict
        })
        .clone()
        .map_err(Error::BinningMismatch)
}

fn probe_conventions() -> Result<()> {
    let axes = [
        Axis::equidistant(2, 0.0, 2.0)?,
        Axis::equidistant(3, 0.0, 3.0)?,
        Axis::irregular(vec![0.0, 1.0, 2.0, 3.0, 4.0])?,
    ];
    let mut src: RHist<3, f64> = RHist::new(axes);
    // One regular point and one point below the range of axis 0.
    let points = [([1.5, 0.5, 3.5], (2, 1, 4)), ([-1.0, 2.5, 0.5], (0, 3, 1))];
    for (x, _) in &points {
        src.fill(*x);
    }
    let imp = src.imp().ok_or(Error::NullSource)?;
    let dest = TH3D::with_edges(
        "conventions",
        "",
        2,
        &[0.0, 1.0, 2.0],
        3,
        &[0.0, 1.0, 2.0, 3.0],
        4,
        &[0.0, 1.0, 2.0, 3.0, 4.0],
    )?;
    let translator = BinIndexTranslator::new(imp, dest.layout());

    for (x, expected) in points {
        let global = imp
            .all_bins()
            .find(|&g| imp.bin_content(g).is_ok_and(|c| c > 0.0) && covers(imp, g, &x))
            .ok_or_else(|| Error::BinningMismatch(format!("no source bin holds the probe at {x:?}")))?;
        let legacy = translator.to_legacy_bin(global)?;
        let xyz = dest.get_bin_xyz(legacy);
        if xyz != expected {
            return Err(Error::BinningMismatch(format!(
                "probe at {x:?}: source bin {global} maps to legacy bin {legacy} = {xyz:?}, expected {expected:?}"
            )));
        }
        let found = (
            dest.x_axis().find_fix_bin(x[0]),
            dest.y_axis().find_fix_bin(x[1]),
            dest.z_axis().find_fix_bin(x[2]),
        );
        if found != expected {
            return Err(Error::BinningMismatch(format!(
                "probe at {x:?}: legacy axes locate {found:?}, expected {expected:?}"
            )));
        }
    }
    Ok(())
}

fn covers(imp: &RHistImpl<3, f64>, global: i64, x: &[f64; 3]) -> bool {
    match (imp.bin_from(global), imp.bin_to(global)) {
        (Ok(lo), Ok(hi)) => (0..3).all(|i| lo[i] <= x[i] && x[i] < hi[i]),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hc_legacy::TH2D;

    #[test]
    fn conventions_hold() {
        verify_bin_conventions().unwrap();
        // Cached.
        verify_bin_conventions().unwrap();
    }

    #[test]
    fn translates_regular_and_flow_bins() {
        let src: RHist<2, f64> = RHist::new([
            Axis::equidistant(3, 0.0, 3.0).unwrap(),
            Axis::irregular(vec![0.0, 1.0, 4.0]).unwrap(),
        ]);
        let imp = src.imp().unwrap();
        let dest = TH2D::with_y_edges("t", "", 3, 0.0, 3.0, 2, &[0.0, 1.0, 4.0]).unwrap();
        let tr = BinIndexTranslator::new(imp, dest.layout());

        let g = imp.global_bin(&[2, 1]).unwrap();
        assert_eq!(tr.to_legacy_bin(g).unwrap(), dest.get_bin(2, 1, 0));
        let g = imp.global_bin(&[UNDERFLOW, OVERFLOW]).unwrap();
        assert_eq!(tr.to_legacy_bin(g).unwrap(), dest.get_bin(0, 3, 0));
        let g = imp.global_bin(&[OVERFLOW, 2]).unwrap();
        assert_eq!(tr.to_legacy_bin(g).unwrap(), dest.get_bin(4, 2, 0));

        let mut seen: Vec<usize> = imp.all_bins().map(|g| tr.to_legacy_bin(g).unwrap()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), dest.ncells());
    }

    #[test]
    fn growable_axes_use_regular_bins_only() {
        let src: RHist<1, f64> = RHist::new([Axis::growable(4, 0.0, 1.0).unwrap()]);
        let imp = src.imp().unwrap();
        let dest = hc_legacy::TH1D::new("g", "", 4, 0.0, 1.0).unwrap();
        let tr = BinIndexTranslator::new(imp, dest.layout());
        let bins: Vec<usize> = imp.all_bins().map(|g| tr.to_legacy_bin(g).unwrap()).collect();
        assert_eq!(bins, vec![1, 2, 3, 4]);
    }

    #[test]
    fn binning_mismatch_is_reported() {
        let src: RHist<1, f64> = RHist::new([Axis::equidistant(4, 0.0, 1.0).unwrap()]);
        let imp = src.imp().unwrap();
        assert!(check_binning(imp, &hc_legacy::TH1D::new("a", "", 4, 0.0, 1.0).unwrap()).is_ok());

        let err = check_binning(imp, &hc_legacy::TH1D::new("b", "", 5, 0.0, 1.0).unwrap()).unwrap_err();
        assert!(matches!(err, Error::BinningMismatch(_)));

        let err = check_binning(imp, &hc_legacy::TH1D::new("c", "", 4, 0.5, 1.0).unwrap()).unwrap_err();
        assert!(err.to_string().contains("bin 1 starts at 0"));
    }
}
