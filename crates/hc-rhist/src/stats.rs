//! Statistics trackers.
//!
//! A histogram's statistics are selected at compile time as a tuple of
//! zero-sized tracker markers, e.g. `(StatContent, StatUncertainty)`. The
//! empty tuple `()` implicitly records bin content only.

use hc_core::BinValue;

/// Set of tracked statistics, as a bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatFlags(u8);

impl StatFlags {
    /// Per-bin content and entry count.
    pub const CONTENT: StatFlags = StatFlags(1);
    /// Per-bin sum of squared weights.
    pub const UNCERTAINTY: StatFlags = StatFlags(1 << 1);
    /// Per-axis Σw·x and Σw·x².
    pub const MOMENT_UNCERT: StatFlags = StatFlags(1 << 2);
    /// Total Σw.
    pub const TOTAL_SUM_OF_WEIGHTS: StatFlags = StatFlags(1 << 3);
    /// Total Σw².
    pub const TOTAL_SUM_OF_SQUARED_WEIGHTS: StatFlags = StatFlags(1 << 4);

    /// No statistics.
    pub const fn empty() -> Self {
        StatFlags(0)
    }

    /// Union of two sets.
    pub const fn union(self, other: StatFlags) -> Self {
        StatFlags(self.0 | other.0)
    }

    /// Whether every flag of `other` is set in `self`.
    pub const fn contains(self, other: StatFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

/// A statistics tracker marker.
pub trait Stat {
    /// What this tracker records.
    const FLAG: StatFlags;
    /// Whether this is the bin content tracker.
    const IS_CONTENT: bool = Self::FLAG.contains(StatFlags::CONTENT);
}

/// Records per-bin content and the number of entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatContent;

/// Records per-bin sum of squared weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatUncertainty;

/// Records per-axis Σw·x and Σw·x² of the filled coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataMomentUncert;

/// Records the total sum of weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatTotalSumOfWeights;

/// Records the total sum of squared weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatTotalSumOfSquaredWeights;

impl Stat for StatContent {
    const FLAG: StatFlags = StatFlags::CONTENT;
}
impl Stat for StatUncertainty {
    const FLAG: StatFlags = StatFlags::UNCERTAINTY;
}
impl Stat for DataMomentUncert {
    const FLAG: StatFlags = StatFlags::MOMENT_UNCERT;
}
impl Stat for StatTotalSumOfWeights {
    const FLAG: StatFlags = StatFlags::TOTAL_SUM_OF_WEIGHTS;
}
impl Stat for StatTotalSumOfSquaredWeights {
    const FLAG: StatFlags = StatFlags::TOTAL_SUM_OF_SQUARED_WEIGHTS;
}

/// A compile-time set of [`Stat`] trackers.
pub trait StatSet {
    /// Union of the trackers' flags.
    const TRACKED: StatFlags;
    /// Whether any tracker in the set records bin content.
    const HAS_CONTENT: bool;
}

// An empty list means "content only".
impl StatSet for () {
    const TRACKED: StatFlags = StatFlags::CONTENT;
    const HAS_CONTENT: bool = true;
}

macro_rules! impl_stat_set {
    ($($s:ident),+) => {
        impl<$($s: Stat),+> StatSet for ($($s,)+) {
            const TRACKED: StatFlags = StatFlags::empty()$(.union($s::FLAG))+;
            const HAS_CONTENT: bool = false $(|| $s::IS_CONTENT)+;
        }
    };
}

impl_stat_set!(A);
impl_stat_set!(A, B);
impl_stat_set!(A, B, C);
impl_stat_set!(A, B, C, E);
impl_stat_set!(A, B, C, E, F);

/// Storage for every tracked statistic, addressed by storage index.
#[derive(Debug, Clone)]
pub struct HistStats<P> {
    tracked: StatFlags,
    content: Vec<P>,
    entries: u64,
    sum_w2: Vec<f64>,
    moment_xw: Vec<f64>,
    moment_x2w: Vec<f64>,
    total_w: f64,
    total_w2: f64,
}

impl<P: BinValue> HistStats<P> {
    /// Allocate storage for `n_bins` bins over `dims` axes.
    pub fn new(tracked: StatFlags, n_bins: usize, dims: usize) -> Self {
        let sized = |flag: StatFlags, n: usize| if tracked.contains(flag) { n } else { 0 };
        Self {
            tracked,
            content: vec![P::default(); sized(StatFlags::CONTENT, n_bins)],
            entries: 0,
            sum_w2: vec![0.0; sized(StatFlags::UNCERTAINTY, n_bins)],
            moment_xw: vec![0.0; sized(StatFlags::MOMENT_UNCERT, dims)],
            moment_x2w: vec![0.0; sized(StatFlags::MOMENT_UNCERT, dims)],
            total_w: 0.0,
            total_w2: 0.0,
        }
    }

    /// Record one entry at storage index `idx`.
    pub(crate) fn fill(&mut self, idx: usize, x: &[f64], weight: f64) {
        if self.tracked.contains(StatFlags::CONTENT) {
            let c = &mut self.content[idx];
            *c = P::from_f64(c.to_f64() + weight);
            self.entries += 1;
        }
        if self.tracked.contains(StatFlags::UNCERTAINTY) {
            self.sum_w2[idx] += weight * weight;
        }
        if self.tracked.contains(StatFlags::MOMENT_UNCERT) {
            for (i, &xi) in x.iter().enumerate() {
                self.moment_xw[i] += xi * weight;
                self.moment_x2w[i] += xi * xi * weight;
            }
        }
        if self.tracked.contains(StatFlags::TOTAL_SUM_OF_WEIGHTS) {
            self.total_w += weight;
        }
        if self.tracked.contains(StatFlags::TOTAL_SUM_OF_SQUARED_WEIGHTS) {
            self.total_w2 += weight * weight;
        }
    }

    /// Tracked statistics.
    pub fn tracked(&self) -> StatFlags {
        self.tracked
    }

    /// Whether per-bin content is recorded.
    pub fn has_bin_content(&self) -> bool {
        self.tracked.contains(StatFlags::CONTENT)
    }

    /// Whether per-bin uncertainties are recorded (otherwise they are
    /// derived from the content).
    pub fn has_bin_uncertainty(&self) -> bool {
        self.tracked.contains(StatFlags::UNCERTAINTY)
    }

    /// Number of stored bins.
    pub fn size(&self) -> usize {
        self.content.len().max(self.sum_w2.len())
    }

    /// Number of fills recorded by the content tracker.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Content at storage index `idx` (zero when content is not tracked).
    pub fn content_at(&self, idx: usize) -> f64 {
        self.content.get(idx).map_or(0.0, |c| c.to_f64())
    }

    /// Uncertainty at storage index `idx`: `sqrt(Σw²)` when tracked,
    /// `sqrt(|content|)` otherwise.
    pub fn uncertainty_at(&self, idx: usize) -> f64 {
        if self.has_bin_uncertainty() {
            self.sum_w2.get(idx).copied().unwrap_or(0.0).sqrt()
        } else {
            self.content_at(idx).abs().sqrt()
        }
    }

    /// Σw·x along `axis`, if moments are tracked.
    pub fn moment_xw(&self, axis: usize) -> Option<f64> {
        self.moment_xw.get(axis).copied()
    }

    /// Σw·x² along `axis`, if moments are tracked.
    pub fn moment_x2w(&self, axis: usize) -> Option<f64> {
        self.moment_x2w.get(axis).copied()
    }

    /// Total Σw, if tracked.
    pub fn sum_of_weights(&self) -> Option<f64> {
        self.tracked.contains(StatFlags::TOTAL_SUM_OF_WEIGHTS).then_some(self.total_w)
    }

    /// Total Σw², if tracked.
    pub fn sum_of_squared_weights(&self) -> Option<f64> {
        self.tracked.contains(StatFlags::TOTAL_SUM_OF_SQUARED_WEIGHTS).then_some(self.total_w2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_set_content_detection() {
        assert!(<() as StatSet>::HAS_CONTENT);
        assert!(<(StatContent,) as StatSet>::HAS_CONTENT);
        assert!(!<(StatUncertainty,) as StatSet>::HAS_CONTENT);
        assert!(<(StatContent, DataMomentUncert) as StatSet>::HAS_CONTENT);
        assert!(<(DataMomentUncert, StatContent) as StatSet>::HAS_CONTENT);
        assert!(!<(StatUncertainty, DataMomentUncert) as StatSet>::HAS_CONTENT);
        assert!(
            <(
                StatTotalSumOfWeights,
                StatUncertainty,
                StatTotalSumOfSquaredWeights,
                DataMomentUncert,
                StatContent,
            ) as StatSet>::HAS_CONTENT
        );
    }

    #[test]
    fn stat_set_flags_union() {
        let t = <(StatContent, StatUncertainty) as StatSet>::TRACKED;
        assert!(t.contains(StatFlags::CONTENT));
        assert!(t.contains(StatFlags::UNCERTAINTY));
        assert!(!t.contains(StatFlags::MOMENT_UNCERT));
        assert_eq!(<() as StatSet>::TRACKED, StatFlags::CONTENT);
    }

    #[test]
    fn fill_updates_each_tracker() {
        let tracked = <(StatContent, StatUncertainty, DataMomentUncert, StatTotalSumOfWeights) as StatSet>::TRACKED;
        let mut s: HistStats<f64> = HistStats::new(tracked, 4, 2);
        s.fill(1, &[1.0, 2.0], 2.0);
        s.fill(1, &[3.0, 0.5], 0.5);
        assert_eq!(s.content_at(1), 2.5);
        assert_eq!(s.entries(), 2);
        assert_eq!(s.uncertainty_at(1), (4.25f64).sqrt());
        assert_eq!(s.moment_xw(0), Some(3.5));
        assert_eq!(s.moment_x2w(1), Some(8.125));
        assert_eq!(s.sum_of_weights(), Some(2.5));
        assert_eq!(s.sum_of_squared_weights(), None);
    }

    #[test]
    fn uncertainty_falls_back_to_content() {
        let mut s: HistStats<i32> = HistStats::new(StatFlags::CONTENT, 2, 1);
        s.fill(0, &[0.0], 1.0);
        s.fill(0, &[0.0], 1.0);
        s.fill(0, &[0.0], 2.0);
        assert!(!s.has_bin_uncertainty());
        assert_eq!(s.uncertainty_at(0), 2.0);
    }

    #[test]
    fn untracked_content_reads_as_zero() {
        let mut s: HistStats<f32> = HistStats::new(StatFlags::UNCERTAINTY, 3, 1);
        s.fill(2, &[0.0], 3.0);
        assert_eq!(s.content_at(2), 0.0);
        assert_eq!(s.entries(), 0);
        assert_eq!(s.uncertainty_at(2), 3.0);
    }
}
