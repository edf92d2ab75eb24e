//! The histogram type and its bin numbering.
//!
//! Global bin numbering:
//! - regular bins (every coordinate in range) are numbered `1..=∏nᵢ`,
//!   row-major with the last axis varying fastest;
//! - bins with at least one under/overflow coordinate get negative numbers
//!   `-(1 + k)`, where `k` is the row-major position on the extended grid
//!   `∏(nᵢ + flowᵢ)`.
//!
//! Storage is laid out on the extended grid, so every bin has exactly one slot.

use std::marker::PhantomData;

use hc_core::{BinValue, Error, Result};

use crate::axis::{Axis, OVERFLOW, UNDERFLOW};
use crate::stats::{HistStats, StatSet};

/// Backing implementation of a configured histogram.
#[derive(Debug, Clone)]
pub struct RHistImpl<const D: usize, P> {
    title: String,
    axes: [Axis; D],
    n_regular: usize,
    n_extended: usize,
    stat: HistStats<P>,
}

impl<const D: usize, P: BinValue> RHistImpl<D, P> {
    fn new(title: String, axes: [Axis; D], stat_flags: crate::stats::StatFlags) -> Self {
        let n_regular = axes.iter().map(Axis::n_bins_no_over).product();
        let n_extended = axes.iter().map(Axis::n_bins).product();
        let stat = HistStats::new(stat_flags, n_extended, D);
        Self { title, axes, n_regular, n_extended, stat }
    }

    /// Histogram title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// All axes, in declaration order.
    pub fn axes(&self) -> &[Axis; D] {
        &self.axes
    }

    /// Axis `i`, if it exists.
    pub fn axis(&self, i: usize) -> Option<&Axis> {
        self.axes.get(i)
    }

    /// Recorded statistics.
    pub fn stat(&self) -> &HistStats<P> {
        &self.stat
    }

    /// Number of entries recorded by the content tracker.
    pub fn entries(&self) -> u64 {
        self.stat.entries()
    }

    /// Number of bins, including under/overflow.
    pub fn n_bins(&self) -> usize {
        self.n_extended
    }

    /// Number of regular bins.
    pub fn n_regular_bins(&self) -> usize {
        self.n_regular
    }

    /// Global indices of every regular bin.
    pub fn regular_bins(&self) -> impl Iterator<Item = i64> + '_ {
        1..=self.n_regular as i64
    }

    /// Global indices of every under/overflow bin.
    pub fn flow_bins(&self) -> impl Iterator<Item = i64> + '_ {
        (0..self.n_extended)
            .filter(move |&k| self.extended_has_flow(k))
            .map(|k| -(k as i64) - 1)
    }

    /// Global indices of every bin: regular bins first, then under/overflow.
    pub fn all_bins(&self) -> impl Iterator<Item = i64> + '_ {
        self.regular_bins().chain(self.flow_bins())
    }

    /// Decompose a global bin into per-axis local bins (declaration order).
    pub fn local_bins(&self, global: i64) -> Result<[i64; D]> {
        let mut local = [0i64; D];
        if global > 0 {
            let mut idx = (global - 1) as usize;
            if idx >= self.n_regular {
                return Err(Error::InvalidBin(format!(
                    "regular global bin {global} out of range 1..={}",
                    self.n_regular
                )));
            }
            for (i, axis) in self.axes.iter().enumerate().rev() {
                let n = axis.n_bins_no_over();
                local[i] = (idx % n) as i64 + 1;
                idx /= n;
            }
            return Ok(local);
        }
        if global == 0 {
            return Err(Error::InvalidBin("global bin 0 does not exist".into()));
        }
        let k = (-global - 1) as usize;
        if k >= self.n_extended || !self.extended_has_flow(k) {
            return Err(Error::InvalidBin(format!(
                "global bin {global} does not address an under/overflow bin"
            )));
        }
        self.decode_extended(k, &mut local);
        Ok(local)
    }

    /// Combine per-axis local bins into a global bin.
    pub fn global_bin(&self, local: &[i64; D]) -> Result<i64> {
        for (i, (axis, &l)) in self.axes.iter().zip(local).enumerate() {
            if !axis.is_valid_local(l) {
                return Err(Error::InvalidBin(format!("local bin {l} does not exist on axis {i}")));
            }
        }
        if local.iter().all(|&l| l > 0) {
            let idx = self
                .axes
                .iter()
                .zip(local)
                .fold(0usize, |acc, (axis, &l)| acc * axis.n_bins_no_over() + (l - 1) as usize);
            Ok(idx as i64 + 1)
        } else {
            Ok(-(self.extended_index(local) as i64) - 1)
        }
    }

    /// Lower edges of a global bin, per axis (`-inf` for underflow).
    pub fn bin_from(&self, global: i64) -> Result<[f64; D]> {
        let local = self.local_bins(global)?;
        Ok(std::array::from_fn(|i| self.axes[i].bin_from(local[i])))
    }

    /// Upper edges of a global bin, per axis (`+inf` for overflow).
    pub fn bin_to(&self, global: i64) -> Result<[f64; D]> {
        let local = self.local_bins(global)?;
        Ok(std::array::from_fn(|i| self.axes[i].bin_to(local[i])))
    }

    /// Content of a global bin.
    pub fn bin_content(&self, global: i64) -> Result<f64> {
        let local = self.local_bins(global)?;
        Ok(self.stat.content_at(self.extended_index(&local)))
    }

    /// Uncertainty of a global bin.
    pub fn bin_uncertainty(&self, global: i64) -> Result<f64> {
        let local = self.local_bins(global)?;
        Ok(self.stat.uncertainty_at(self.extended_index(&local)))
    }

    fn fill(&mut self, x: &[f64; D], weight: f64) {
        let mut local = [0i64; D];
        for (i, axis) in self.axes.iter().enumerate() {
            let l = axis.find_bin(x[i]);
            if !axis.is_valid_local(l) {
                log::debug!(
                    "dropping fill at {x:?}: value {} lies outside growable axis {i} (growth is not supported)",
                    x[i]
                );
                return;
            }
            local[i] = l;
        }
        let idx = self.extended_index(&local);
        self.stat.fill(idx, x, weight);
    }

    /// Row-major position on the extended grid; `local` must be valid.
    fn extended_index(&self, local: &[i64; D]) -> usize {
        self.axes.iter().zip(local).fold(0usize, |acc, (axis, &l)| {
            acc * axis.n_bins() + extended_coord(axis, l)
        })
    }

    fn decode_extended(&self, mut k: usize, local: &mut [i64; D]) {
        for (i, axis) in self.axes.iter().enumerate().rev() {
            let m = axis.n_bins();
            let e = k % m;
            k /= m;
            local[i] = if axis.n_overflow_bins() == 0 {
                e as i64 + 1
            } else if e == 0 {
                UNDERFLOW
            } else if e == axis.n_bins_no_over() + 1 {
                OVERFLOW
            } else {
                e as i64
            };
        }
    }

    fn extended_has_flow(&self, k: usize) -> bool {
        let mut local = [0i64; D];
        self.decode_extended(k, &mut local);
        local.iter().any(|&l| l < 0)
    }
}

fn extended_coord(axis: &Axis, local: i64) -> usize {
    if axis.n_overflow_bins() == 0 {
        return (local - 1) as usize;
    }
    match local {
        UNDERFLOW => 0,
        OVERFLOW => axis.n_bins_no_over() + 1,
        l => l as usize,
    }
}

/// A `D`-dimensional histogram with `P` bin storage and statistics `S`.
///
/// A default-constructed histogram has no backing implementation; it cannot
/// be filled meaningfully nor converted.
#[derive(Debug, Clone)]
pub struct RHist<const D: usize, P, S = ()> {
    imp: Option<Box<RHistImpl<D, P>>>,
    _stats: PhantomData<S>,
}

impl<const D: usize, P, S> Default for RHist<D, P, S> {
    fn default() -> Self {
        Self { imp: None, _stats: PhantomData }
    }
}

impl<const D: usize, P: BinValue, S: StatSet> RHist<D, P, S> {
    /// Untitled histogram over `axes`.
    pub fn new(axes: [Axis; D]) -> Self {
        Self::with_title("", axes)
    }

    /// Titled histogram over `axes`.
    pub fn with_title(title: impl Into<String>, axes: [Axis; D]) -> Self {
        const { assert!(D >= 1, "a histogram needs at least one axis") };
        Self {
            imp: Some(Box::new(RHistImpl::new(title.into(), axes, S::TRACKED))),
            _stats: PhantomData,
        }
    }

    /// Backing implementation, `None` for a default-constructed histogram.
    pub fn imp(&self) -> Option<&RHistImpl<D, P>> {
        self.imp.as_deref()
    }

    /// Histogram title (empty when unconfigured).
    pub fn title(&self) -> &str {
        self.imp.as_deref().map_or("", RHistImpl::title)
    }

    /// Number of entries (zero when unconfigured).
    pub fn entries(&self) -> u64 {
        self.imp.as_deref().map_or(0, RHistImpl::entries)
    }

    /// Fill one entry with weight 1.
    pub fn fill(&mut self, x: [f64; D]) {
        self.fill_weighted(x, 1.0);
    }

    /// Fill one weighted entry.
    pub fn fill_weighted(&mut self, x: [f64; D], weight: f64) {
        match self.imp.as_deref_mut() {
            Some(imp) => imp.fill(&x, weight),
            None => log::warn!("fill on an unconfigured histogram ignored"),
        }
    }

    /// Fill many entries with weight 1.
    pub fn fill_n(&mut self, xs: &[[f64; D]]) {
        for x in xs {
            self.fill_weighted(*x, 1.0);
        }
    }

    /// Fill many weighted entries; `xs` and `weights` must have equal length.
    pub fn fill_n_weighted(&mut self, xs: &[[f64; D]], weights: &[f64]) -> Result<()> {
        if xs.len() != weights.len() {
            return Err(Error::Validation(format!(
                "fill_n_weighted: {} coordinates but {} weights",
                xs.len(),
                weights.len()
            )));
        }
        for (x, &w) in xs.iter().zip(weights) {
            self.fill_weighted(*x, w);
        }
        Ok(())
    }
}
