//! Legacy histogram classes.
//!
//! All nine-plus-six classes share one generic layout, [`THist`], keyed by
//! dimensionality and storage type; `TH1C` … `TH3D` are plain aliases.

use std::sync::atomic::{AtomicBool, Ordering};

use hc_core::{Error, Result};
use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::taxis::TAxis;
use crate::value::LegacyValue;

/// Length of the aggregate statistics vector.
///
/// Slots: `[0]` Σw, `[1]` Σw², `[2]` Σwx, `[3]` Σwx², `[4]` Σwy, `[5]` Σwy²,
/// `[6]` Σwxy, `[7]` Σwz, `[8]` Σwz², `[9]` Σwxz, `[10]` Σwyz.
pub const NSTAT: usize = 11;

/// Whether under/overflow bins enter recomputed statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatOverflows {
    /// Never include them.
    Ignore,
    /// Always include them.
    Consider,
    /// Follow the process-wide default (see [`set_default_stat_overflows`]).
    #[default]
    Neutral,
}

static DEFAULT_STAT_OVERFLOWS: AtomicBool = AtomicBool::new(false);

/// Process-wide default used by histograms in [`StatOverflows::Neutral`] mode.
pub fn set_default_stat_overflows(consider: bool) {
    DEFAULT_STAT_OVERFLOWS.store(consider, Ordering::Relaxed);
}

/// How [`THist::bin_error`] derives per-bin errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinErrorOption {
    /// `sqrt(Σw²)`, or `sqrt(|content|)` without squared weights.
    #[default]
    Normal,
    /// Central 68.27% Garwood interval for unweighted bins.
    Poisson,
}

/// Global bin numbering of a legacy histogram: axis 0 varies fastest, every
/// axis contributes `nbins + 2` slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinLayout {
    dimension: usize,
    nbins: [usize; 3],
}

impl BinLayout {
    /// Layout over the first `dimension` of `nbins` (regular counts).
    pub fn new(dimension: usize, nbins: [usize; 3]) -> Self {
        Self { dimension, nbins }
    }

    fn stride(&self, axis: usize) -> usize {
        if axis < self.dimension { self.nbins[axis] + 2 } else { 1 }
    }

    /// Number of cells including flow bins.
    pub fn ncells(&self) -> usize {
        (0..3).map(|a| self.stride(a)).product()
    }

    /// Global bin of per-axis bins; each is clamped to `0..=nbins+1`, and
    /// axes beyond the dimension are ignored.
    pub fn get_bin(&self, binx: i64, biny: i64, binz: i64) -> usize {
        let clamp = |axis: usize, b: i64| -> usize {
            if axis >= self.dimension {
                0
            } else {
                b.clamp(0, self.nbins[axis] as i64 + 1) as usize
            }
        };
        let (x, y, z) = (clamp(0, binx), clamp(1, biny), clamp(2, binz));
        x + self.stride(0) * (y + self.stride(1) * z)
    }

    /// Inverse of [`BinLayout::get_bin`].
    pub fn get_bin_xyz(&self, bin: usize) -> (usize, usize, usize) {
        let nx = self.stride(0);
        let ny = self.stride(1);
        let x = bin % nx;
        let y = (bin / nx) % ny;
        let z = bin / nx / ny;
        match self.dimension {
            1 => (x, 0, 0),
            2 => (x, y, 0),
            _ => (x, y, z),
        }
    }
}

/// A legacy histogram of dimensionality `DIM` storing `P` per cell.
#[derive(Debug, Clone)]
pub struct THist<const DIM: usize, P> {
    name: String,
    title: String,
    axes: [TAxis; 3],
    array: Vec<P>,
    sumw2: Vec<f64>,
    entries: f64,
    tsum: [f64; NSTAT],
    stat_overflows: StatOverflows,
    bin_error_option: BinErrorOption,
    norm_factor: f64,
}

/// One-dimensional legacy histogram.
pub type TH1<P> = THist<1, P>;
/// Two-dimensional legacy histogram.
pub type TH2<P> = THist<2, P>;
/// Three-dimensional legacy histogram.
pub type TH3<P> = THist<3, P>;

/// 1-D, one byte per cell.
pub type TH1C = TH1<i8>;
/// 1-D, two bytes per cell.
pub type TH1S = TH1<i16>;
/// 1-D, four-byte integer per cell.
pub type TH1I = TH1<i32>;
/// 1-D, single precision.
pub type TH1F = TH1<f32>;
/// 1-D, double precision.
pub type TH1D = TH1<f64>;
/// 2-D, one byte per cell.
pub type TH2C = TH2<i8>;
/// 2-D, two bytes per cell.
pub type TH2S = TH2<i16>;
/// 2-D, four-byte integer per cell.
pub type TH2I = TH2<i32>;
/// 2-D, single precision.
pub type TH2F = TH2<f32>;
/// 2-D, double precision.
pub type TH2D = TH2<f64>;
/// 3-D, one byte per cell.
pub type TH3C = TH3<i8>;
/// 3-D, two bytes per cell.
pub type TH3S = TH3<i16>;
/// 3-D, four-byte integer per cell.
pub type TH3I = TH3<i32>;
/// 3-D, single precision.
pub type TH3F = TH3<f32>;
/// 3-D, double precision.
pub type TH3D = TH3<f64>;

fn placeholder_axis() -> Result<TAxis> {
    TAxis::uniform(1, 0.0, 1.0)
}

impl<P: LegacyValue> THist<1, P> {
    /// Uniform 1-D histogram.
    pub fn new(name: &str, title: &str, nbinsx: usize, xlow: f64, xup: f64) -> Result<Self> {
        Self::build(name, title, [TAxis::uniform(nbinsx, xlow, xup)?, placeholder_axis()?, placeholder_axis()?])
    }

    /// Variable-width 1-D histogram; `xbins` holds `nbinsx + 1` edges.
    pub fn with_edges(name: &str, title: &str, nbinsx: usize, xbins: &[f64]) -> Result<Self> {
        Self::build(name, title, [TAxis::variable(nbinsx, xbins)?, placeholder_axis()?, placeholder_axis()?])
    }
}

impl<P: LegacyValue> THist<2, P> {
    /// Uniform 2-D histogram.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        title: &str,
        nbinsx: usize,
        xlow: f64,
        xup: f64,
        nbinsy: usize,
        ylow: f64,
        yup: f64,
    ) -> Result<Self> {
        let x = TAxis::uniform(nbinsx, xlow, xup)?;
        let y = TAxis::uniform(nbinsy, ylow, yup)?;
        Self::build(name, title, [x, y, placeholder_axis()?])
    }

    /// Variable x, uniform y.
    #[allow(clippy::too_many_arguments)]
    pub fn with_x_edges(
        name: &str,
        title: &str,
        nbinsx: usize,
        xbins: &[f64],
        nbinsy: usize,
        ylow: f64,
        yup: f64,
    ) -> Result<Self> {
        let x = TAxis::variable(nbinsx, xbins)?;
        let y = TAxis::uniform(nbinsy, ylow, yup)?;
        Self::build(name, title, [x, y, placeholder_axis()?])
    }

    /// Uniform x, variable y.
    #[allow(clippy::too_many_arguments)]
    pub fn with_y_edges(
        name: &str,
        title: &str,
        nbinsx: usize,
        xlow: f64,
        xup: f64,
        nbinsy: usize,
        ybins: &[f64],
    ) -> Result<Self> {
        let x = TAxis::uniform(nbinsx, xlow, xup)?;
        let y = TAxis::variable(nbinsy, ybins)?;
        Self::build(name, title, [x, y, placeholder_axis()?])
    }

    /// Variable x and y.
    pub fn with_edges(
        name: &str,
        title: &str,
        nbinsx: usize,
        xbins: &[f64],
        nbinsy: usize,
        ybins: &[f64],
    ) -> Result<Self> {
        let x = TAxis::variable(nbinsx, xbins)?;
        let y = TAxis::variable(nbinsy, ybins)?;
        Self::build(name, title, [x, y, placeholder_axis()?])
    }
}

impl<P: LegacyValue> THist<3, P> {
    /// Uniform 3-D histogram.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        title: &str,
        nbinsx: usize,
        xlow: f64,
        xup: f64,
        nbinsy: usize,
        ylow: f64,
        yup: f64,
        nbinsz: usize,
        zlow: f64,
        zup: f64,
    ) -> Result<Self> {
        let x = TAxis::uniform(nbinsx, xlow, xup)?;
        let y = TAxis::uniform(nbinsy, ylow, yup)?;
        let z = TAxis::uniform(nbinsz, zlow, zup)?;
        Self::build(name, title, [x, y, z])
    }

    /// Variable x, y and z. There is no mixed 3-D form.
    #[allow(clippy::too_many_arguments)]
    pub fn with_edges(
        name: &str,
        title: &str,
        nbinsx: usize,
        xbins: &[f64],
        nbinsy: usize,
        ybins: &[f64],
        nbinsz: usize,
        zbins: &[f64],
    ) -> Result<Self> {
        let x = TAxis::variable(nbinsx, xbins)?;
        let y = TAxis::variable(nbinsy, ybins)?;
        let z = TAxis::variable(nbinsz, zbins)?;
        Self::build(name, title, [x, y, z])
    }
}

/// Split a legacy title at every `;` not preceded by `#`.
fn split_title(title: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut prev = None;
    for (i, c) in title.char_indices() {
        if c == ';' && prev != Some('#') {
            parts.push(&title[start..i]);
            start = i + 1;
        }
        prev = Some(c);
    }
    parts.push(&title[start..]);
    parts
}

const fn stat_slots(dim: usize) -> usize {
    match dim {
        1 => 4,
        2 => 7,
        _ => NSTAT,
    }
}

// Central 68.27% coverage.
const POISSON_ALPHA: f64 = 1.0 - 0.682_689_492;

fn chi2_quantile(dof: f64, p: f64) -> f64 {
    ChiSquared::new(dof).map_or(f64::NAN, |d| d.inverse_cdf(p))
}

impl<const DIM: usize, P: LegacyValue> THist<DIM, P> {
    fn build(name: &str, title: &str, axes: [TAxis; 3]) -> Result<Self> {
        const { assert!(DIM >= 1 && DIM <= 3, "legacy histograms have 1 to 3 dimensions") };
        let nbins = [axes[0].nbins(), axes[1].nbins(), axes[2].nbins()];
        let ncells = BinLayout::new(DIM, nbins).ncells();
        let mut h = Self {
            name: name.to_string(),
            title: String::new(),
            axes,
            array: vec![P::default(); ncells],
            sumw2: Vec::new(),
            entries: 0.0,
            tsum: [0.0; NSTAT],
            stat_overflows: StatOverflows::Neutral,
            bin_error_option: BinErrorOption::Normal,
            norm_factor: 0.0,
        };
        h.set_title(title);
        Ok(h)
    }

    /// Class name, e.g. `TH2F`.
    pub fn class_name(&self) -> String {
        format!("TH{DIM}{}", P::SUFFIX)
    }

    /// Number of dimensions.
    pub fn dimension(&self) -> usize {
        DIM
    }

    /// Object name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Histogram title, without any axis titles.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the title. `"hist;x;y;z"` also sets the axis titles; `#;` is a
    /// literal semicolon and is stored as written.
    pub fn set_title(&mut self, title: &str) {
        let parts = split_title(title);
        self.title = parts[0].to_string();
        for (axis, part) in self.axes.iter_mut().zip(parts.iter().skip(1)) {
            axis.set_title(*part);
        }
    }

    /// X axis.
    pub fn x_axis(&self) -> &TAxis {
        &self.axes[0]
    }

    /// Y axis; a single placeholder bin below 2-D.
    pub fn y_axis(&self) -> &TAxis {
        &self.axes[1]
    }

    /// Z axis; a single placeholder bin below 3-D.
    pub fn z_axis(&self) -> &TAxis {
        &self.axes[2]
    }

    /// Axis `idx` of this histogram's dimensionality.
    pub fn axis(&self, idx: usize) -> Result<&TAxis> {
        if idx < DIM {
            Ok(&self.axes[idx])
        } else {
            Err(Error::InvalidAxisIndex { index: idx, class: Self::base_class() })
        }
    }

    /// Mutable axis `idx` of this histogram's dimensionality.
    pub fn axis_mut(&mut self, idx: usize) -> Result<&mut TAxis> {
        if idx < DIM {
            Ok(&mut self.axes[idx])
        } else {
            Err(Error::InvalidAxisIndex { index: idx, class: Self::base_class() })
        }
    }

    fn base_class() -> &'static str {
        match DIM {
            1 => "TH1",
            2 => "TH2",
            _ => "TH3",
        }
    }

    /// Bin numbering of this histogram.
    pub fn layout(&self) -> BinLayout {
        BinLayout::new(DIM, [self.axes[0].nbins(), self.axes[1].nbins(), self.axes[2].nbins()])
    }

    /// See [`BinLayout::get_bin`].
    pub fn get_bin(&self, binx: i64, biny: i64, binz: i64) -> usize {
        self.layout().get_bin(binx, biny, binz)
    }

    /// See [`BinLayout::get_bin_xyz`].
    pub fn get_bin_xyz(&self, bin: usize) -> (usize, usize, usize) {
        self.layout().get_bin_xyz(bin)
    }

    /// Number of cells including flow bins.
    pub fn ncells(&self) -> usize {
        self.array.len()
    }

    /// Raw cell storage.
    pub fn array(&self) -> &[P] {
        &self.array
    }

    fn clamp_bin(&self, bin: usize) -> usize {
        bin.min(self.array.len() - 1)
    }

    /// Content of global `bin` (clamped to the last cell).
    pub fn bin_content(&self, bin: usize) -> f64 {
        self.array[self.clamp_bin(bin)].to_f64()
    }

    /// Add `w` to global `bin` with the class's accumulation rule. Squared
    /// weights and statistics are left alone.
    pub fn add_bin_content(&mut self, bin: usize, w: f64) -> Result<()> {
        let n = self.array.len();
        let cell = self
            .array
            .get_mut(bin)
            .ok_or_else(|| Error::InvalidBin(format!("bin {bin} outside {n} cells")))?;
        *cell = cell.add_weight(w);
        Ok(())
    }

    /// Overwrite global `bin`; counts as one entry and invalidates the stored
    /// statistics.
    pub fn set_bin_content(&mut self, bin: usize, content: f64) -> Result<()> {
        let n = self.array.len();
        let cell = self
            .array
            .get_mut(bin)
            .ok_or_else(|| Error::InvalidBin(format!("bin {bin} outside {n} cells")))?;
        *cell = P::from_f64(content);
        self.entries += 1.0;
        self.tsum[0] = 0.0;
        Ok(())
    }

    /// Allocate the squared-weight array. A non-empty histogram seeds it with
    /// `|content|`; an already allocated array is kept.
    pub fn sumw2(&mut self) {
        if self.sumw2.len() == self.array.len() {
            log::warn!("{}: sum of squares of weights structure already created", self.name);
            return;
        }
        self.sumw2 = if self.entries > 0.0 {
            self.array.iter().map(|c| c.to_f64().abs()).collect()
        } else {
            vec![0.0; self.array.len()]
        };
    }

    /// Whether squared weights are stored.
    pub fn has_sumw2(&self) -> bool {
        !self.sumw2.is_empty()
    }

    /// Squared weights per cell; empty unless [`THist::sumw2`] was called.
    pub fn sumw2_array(&self) -> &[f64] {
        &self.sumw2
    }

    /// Mutable squared weights per cell.
    pub fn sumw2_mut(&mut self) -> &mut [f64] {
        &mut self.sumw2
    }

    fn is_unweighted_bin(&self, bin: usize) -> bool {
        match self.sumw2.get(bin) {
            None => true,
            Some(&w2) => (w2 - self.bin_content(bin)).abs() <= 1e-12 * w2.abs().max(1.0),
        }
    }

    fn poisson_count(&self, bin: usize) -> Option<f64> {
        if self.bin_error_option != BinErrorOption::Poisson || !self.is_unweighted_bin(bin) {
            return None;
        }
        let c = self.bin_content(bin);
        if c < 0.0 {
            log::warn!("{}: negative bin content, using normal errors", self.name);
            return None;
        }
        Some(c.trunc())
    }

    /// Error of global `bin`.
    pub fn bin_error(&self, bin: usize) -> f64 {
        let bin = self.clamp_bin(bin);
        if self.poisson_count(bin).is_some() {
            return 0.5 * (self.bin_error_low(bin) + self.bin_error_up(bin));
        }
        match self.sumw2.get(bin) {
            Some(w2) => w2.sqrt(),
            None => self.bin_content(bin).abs().sqrt(),
        }
    }

    /// Lower error of global `bin`; differs from [`THist::bin_error`] only
    /// with Poisson errors.
    pub fn bin_error_low(&self, bin: usize) -> f64 {
        let bin = self.clamp_bin(bin);
        match self.poisson_count(bin) {
            None => self.normal_error(bin),
            Some(n) if n == 0.0 => 0.0,
            Some(n) => n - 0.5 * chi2_quantile(2.0 * n, POISSON_ALPHA / 2.0),
        }
    }

    /// Upper error of global `bin`.
    pub fn bin_error_up(&self, bin: usize) -> f64 {
        let bin = self.clamp_bin(bin);
        match self.poisson_count(bin) {
            None => self.normal_error(bin),
            Some(n) => 0.5 * chi2_quantile(2.0 * (n + 1.0), 1.0 - POISSON_ALPHA / 2.0) - n,
        }
    }

    fn normal_error(&self, bin: usize) -> f64 {
        match self.sumw2.get(bin) {
            Some(w2) => w2.sqrt(),
            None => self.bin_content(bin).abs().sqrt(),
        }
    }

    /// Error mode.
    pub fn bin_error_option(&self) -> BinErrorOption {
        self.bin_error_option
    }

    /// Choose the error mode.
    pub fn set_bin_error_option(&mut self, option: BinErrorOption) {
        self.bin_error_option = option;
    }

    /// Normalisation factor (0: unnormalised).
    pub fn norm_factor(&self) -> f64 {
        self.norm_factor
    }

    /// Set the normalisation factor.
    pub fn set_norm_factor(&mut self, factor: f64) {
        self.norm_factor = factor;
    }

    /// Flow-bin policy for recomputed statistics.
    pub fn stat_overflows(&self) -> StatOverflows {
        self.stat_overflows
    }

    /// Set the flow-bin policy.
    pub fn set_stat_overflows(&mut self, mode: StatOverflows) {
        self.stat_overflows = mode;
    }

    /// Number of entries.
    pub fn entries(&self) -> f64 {
        self.entries
    }

    /// Overwrite the number of entries.
    pub fn set_entries(&mut self, entries: f64) {
        self.entries = entries;
    }

    fn considers_overflows(&self) -> bool {
        match self.stat_overflows {
            StatOverflows::Ignore => false,
            StatOverflows::Consider => true,
            StatOverflows::Neutral => DEFAULT_STAT_OVERFLOWS.load(Ordering::Relaxed),
        }
    }

    /// Aggregate statistics. When Σw is zero but the histogram has entries
    /// they are recomputed from the bins at their centers; otherwise the
    /// stored values are returned. Slots beyond the dimension stay zero.
    pub fn get_stats(&self) -> [f64; NSTAT] {
        if !(self.tsum[0] == 0.0 && self.entries > 0.0) {
            return self.tsum;
        }
        let consider = self.considers_overflows();
        let range = |axis: usize| -> std::ops::RangeInclusive<i64> {
            if axis >= DIM {
                0..=0
            } else {
                let n = self.axes[axis].nbins() as i64;
                if consider { 0..=n + 1 } else { 1..=n }
            }
        };

        let mut stats = [0.0; NSTAT];
        for binz in range(2) {
            let z = self.axes[2].bin_center(binz);
            for biny in range(1) {
                let y = self.axes[1].bin_center(biny);
                for binx in range(0) {
                    let x = self.axes[0].bin_center(binx);
                    let bin = self.get_bin(binx, biny, binz);
                    let w = self.bin_content(bin);
                    let err = self.bin_error(bin).abs();
                    stats[0] += w;
                    stats[1] += err * err;
                    stats[2] += w * x;
                    stats[3] += w * x * x;
                    if DIM >= 2 {
                        stats[4] += w * y;
                        stats[5] += w * y * y;
                        stats[6] += w * x * y;
                    }
                    if DIM >= 3 {
                        stats[7] += w * z;
                        stats[8] += w * z * z;
                        stats[9] += w * x * z;
                        stats[10] += w * y * z;
                    }
                }
            }
        }
        stats
    }

    /// Store aggregate statistics (only the slots of this dimensionality).
    pub fn put_stats(&mut self, stats: &[f64; NSTAT]) {
        let n = stat_slots(DIM);
        self.tsum[..n].copy_from_slice(&stats[..n]);
    }

    /// Recompute the statistics from the bins and derive the entries from
    /// them (effective entries when squared weights are stored).
    pub fn reset_stats(&mut self) {
        self.tsum = [0.0; NSTAT];
        self.entries = 1.0;
        let stats = self.get_stats();
        self.put_stats(&stats);
        self.entries = self.tsum[0].abs();
        if self.has_sumw2() && self.tsum[0] > 0.0 && stats[1] > 0.0 {
            self.entries = stats[0] * stats[0] / stats[1];
        }
    }

    /// Σ content over regular bins.
    pub fn sum_of_weights(&self) -> f64 {
        let mut sum = 0.0;
        let n = |axis: usize| if axis < DIM { self.axes[axis].nbins() as i64 } else { 0 };
        let first = |axis: usize| if axis < DIM { 1 } else { 0 };
        for z in first(2)..=n(2) {
            for y in first(1)..=n(1) {
                for x in 1..=n(0) {
                    sum += self.bin_content(self.get_bin(x, y, z));
                }
            }
        }
        sum
    }

    /// Mean along `axis` (0, 1 or 2) from the aggregate statistics.
    pub fn mean(&self, axis: usize) -> f64 {
        let stats = self.get_stats();
        if stats[0] == 0.0 {
            return 0.0;
        }
        match axis {
            0 => stats[2] / stats[0],
            1 => stats[4] / stats[0],
            _ => stats[7] / stats[0],
        }
    }

    /// Standard deviation along `axis` from the aggregate statistics.
    pub fn std_dev(&self, axis: usize) -> f64 {
        let stats = self.get_stats();
        if stats[0] == 0.0 {
            return 0.0;
        }
        let (s1, s2) = match axis {
            0 => (stats[2], stats[3]),
            1 => (stats[4], stats[5]),
            _ => (stats[7], stats[8]),
        };
        let m = s1 / stats[0];
        (s2 / stats[0] - m * m).abs().sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn title_decoding() {
        let h = TH1D::new("h", "Hist;x title;y title;z title", 2, 0.0, 1.0).unwrap();
        assert_eq!(h.title(), "Hist");
        assert_eq!(h.x_axis().title(), "x title");
        assert_eq!(h.y_axis().title(), "y title");
        assert_eq!(h.z_axis().title(), "z title");

        let h = TH1D::new("h", "Hist#;title#;is#;number 3", 2, 0.0, 1.0).unwrap();
        assert_eq!(h.title(), "Hist#;title#;is#;number 3");
        assert_eq!(h.x_axis().title(), "");

        let h = TH1D::new("h", "a#;b;x", 2, 0.0, 1.0).unwrap();
        assert_eq!(h.title(), "a#;b");
        assert_eq!(h.x_axis().title(), "x");
    }

    #[test]
    fn layout_numbering() {
        let l = BinLayout::new(2, [3, 4, 1]);
        assert_eq!(l.ncells(), 5 * 6);
        assert_eq!(l.get_bin(2, 3, 0), 2 + 5 * 3);
        assert_eq!(l.get_bin_xyz(17), (2, 3, 0));
        assert_eq!(l.get_bin(-4, 99, 7), 5 * 5);

        let l = BinLayout::new(3, [2, 3, 4]);
        assert_eq!(l.ncells(), 4 * 5 * 6);
        for bin in 0..l.ncells() {
            let (x, y, z) = l.get_bin_xyz(bin);
            assert_eq!(l.get_bin(x as i64, y as i64, z as i64), bin);
        }

        let l = BinLayout::new(1, [10, 1, 1]);
        assert_eq!(l.ncells(), 12);
        assert_eq!(l.get_bin(3, 1, 1), 3);
    }

    #[test]
    fn class_names_and_axis_access() {
        let h = TH2F::new("h", "", 2, 0.0, 1.0, 3, 0.0, 1.0).unwrap();
        assert_eq!(h.class_name(), "TH2F");
        assert_eq!(h.ncells(), 4 * 5);
        assert!(h.axis(1).is_ok());
        let err = h.axis(2).unwrap_err();
        assert_eq!(err.to_string(), "2 is not a valid axis index for TH2");
        assert_eq!(TH1C::new("c", "", 1, 0.0, 1.0).unwrap().class_name(), "TH1C");
        assert_eq!(TH3I::new("i", "", 1, 0.0, 1.0, 1, 0.0, 1.0, 1, 0.0, 1.0).unwrap().class_name(), "TH3I");
    }

    #[test]
    fn integer_content_saturates() {
        let mut h = TH1C::new("c", "", 2, 0.0, 1.0).unwrap();
        for _ in 0..200 {
            h.add_bin_content(1, 1.0).unwrap();
        }
        assert_eq!(h.bin_content(1), 127.0);
        h.add_bin_content(2, 0.9).unwrap();
        assert_eq!(h.bin_content(2), 0.0);
        assert!(h.add_bin_content(4, 1.0).is_err());
    }

    #[test]
    fn sumw2_seeds_from_content() {
        let mut h = TH1D::new("h", "", 3, 0.0, 3.0).unwrap();
        h.add_bin_content(1, -4.0).unwrap();
        h.add_bin_content(2, 9.0).unwrap();
        h.sumw2();
        assert_eq!(h.sumw2_array(), &[0.0; 5]);

        let mut h = TH1D::new("h", "", 3, 0.0, 3.0).unwrap();
        h.add_bin_content(1, -4.0).unwrap();
        h.add_bin_content(2, 9.0).unwrap();
        h.set_entries(2.0);
        h.sumw2();
        assert_eq!(h.sumw2_array(), &[0.0, 4.0, 9.0, 0.0, 0.0]);
        assert_eq!(h.bin_error(2), 3.0);
    }

    #[test]
    fn stats_recomputed_when_empty() {
        let mut h = TH1D::new("h", "", 4, 0.0, 4.0).unwrap();
        h.add_bin_content(1, 2.0).unwrap();
        h.add_bin_content(3, 1.0).unwrap();
        h.add_bin_content(5, 10.0).unwrap();
        h.set_entries(3.0);

        h.set_stat_overflows(StatOverflows::Ignore);
        let s = h.get_stats();
        assert_relative_eq!(s[0], 3.0);
        assert_relative_eq!(s[1], 3.0);
        assert_relative_eq!(s[2], 2.0 * 0.5 + 2.5);
        assert_relative_eq!(s[3], 2.0 * 0.25 + 6.25);
        assert_eq!(s[4], 0.0);

        h.set_stat_overflows(StatOverflows::Consider);
        let s = h.get_stats();
        assert_relative_eq!(s[0], 13.0);
        assert_relative_eq!(s[2], 1.0 + 2.5 + 10.0 * 4.5);

        h.put_stats(&s);
        h.set_stat_overflows(StatOverflows::Ignore);
        assert_relative_eq!(h.get_stats()[0], 13.0);
        assert_relative_eq!(h.mean(0), 48.5 / 13.0);
    }

    #[test]
    fn stats_in_three_dimensions() {
        let mut h = TH3D::new("h", "", 2, 0.0, 2.0, 2, 0.0, 2.0, 2, 0.0, 2.0).unwrap();
        let bin = h.get_bin(2, 1, 2);
        h.add_bin_content(bin, 2.0).unwrap();
        h.set_entries(1.0);
        let s = h.get_stats();
        assert_relative_eq!(s[0], 2.0);
        assert_relative_eq!(s[2], 3.0);
        assert_relative_eq!(s[4], 1.0);
        assert_relative_eq!(s[6], 1.5);
        assert_relative_eq!(s[7], 3.0);
        assert_relative_eq!(s[9], 4.5);
        assert_relative_eq!(s[10], 1.5);
        assert_relative_eq!(h.sum_of_weights(), 2.0);
    }

    #[test]
    fn reset_stats_uses_effective_entries() {
        let mut h = TH1D::new("h", "", 2, 0.0, 2.0).unwrap();
        h.sumw2();
        h.add_bin_content(1, 2.0).unwrap();
        h.sumw2_mut()[1] = 2.0;
        h.add_bin_content(2, 2.0).unwrap();
        h.sumw2_mut()[2] = 4.0;
        h.reset_stats();
        assert_relative_eq!(h.entries(), 16.0 / 6.0);
        assert_relative_eq!(h.get_stats()[0], 4.0);
    }

    #[test]
    fn set_bin_content_counts_an_entry_and_invalidates_stats() {
        let mut h = TH1D::new("h", "", 4, 0.0, 4.0).unwrap();
        h.set_stat_overflows(StatOverflows::Ignore);
        h.add_bin_content(1, 2.0).unwrap();
        h.set_entries(1.0);
        let s = h.get_stats();
        h.put_stats(&s);
        assert_relative_eq!(h.get_stats()[0], 2.0);

        h.set_bin_content(2, 3.0).unwrap();
        assert_eq!(h.entries(), 2.0);
        assert_eq!(h.bin_content(2), 3.0);
        let s = h.get_stats();
        assert_relative_eq!(s[0], 5.0);
        assert_relative_eq!(s[2], 2.0 * 0.5 + 3.0 * 1.5);

        h.set_bin_content(2, 1.0).unwrap();
        assert_eq!(h.bin_content(2), 1.0);
        assert_eq!(h.entries(), 3.0);
        assert!(matches!(h.set_bin_content(99, 1.0), Err(Error::InvalidBin(_))));
        assert_eq!(h.entries(), 3.0);

        let mut c = TH1C::new("c", "", 1, 0.0, 1.0).unwrap();
        c.set_bin_content(1, 300.0).unwrap();
        assert_eq!(c.bin_content(1), 127.0);
    }

    #[test]
    fn mean_and_std_dev_from_stats() {
        let mut h = TH1D::new("h", "", 4, 0.0, 4.0).unwrap();
        assert_eq!(h.std_dev(0), 0.0);
        h.add_bin_content(1, 1.0).unwrap();
        h.add_bin_content(3, 1.0).unwrap();
        h.set_entries(2.0);
        h.set_stat_overflows(StatOverflows::Ignore);
        assert_relative_eq!(h.mean(0), 1.5);
        assert_relative_eq!(h.std_dev(0), 1.0);

        let mut h = TH2D::new("h", "", 2, 0.0, 2.0, 2, 0.0, 4.0).unwrap();
        h.set_stat_overflows(StatOverflows::Ignore);
        let bin = h.get_bin(1, 1, 0);
        h.add_bin_content(bin, 1.0).unwrap();
        let bin = h.get_bin(1, 2, 0);
        h.add_bin_content(bin, 1.0).unwrap();
        h.set_entries(2.0);
        assert_relative_eq!(h.std_dev(0), 0.0);
        assert_relative_eq!(h.mean(1), 2.0);
        assert_relative_eq!(h.std_dev(1), 1.0);
    }

    #[test]
    fn rename_keeps_class_and_title() {
        let mut h = TH2F::new("before", "Hist;x", 2, 0.0, 1.0, 2, 0.0, 1.0).unwrap();
        h.set_name("after");
        assert_eq!(h.name(), "after");
        assert_eq!(h.title(), "Hist");
        assert_eq!(h.x_axis().title(), "x");
        assert_eq!(h.class_name(), "TH2F");
    }

    #[test]
    fn poisson_errors() {
        let mut h = TH1I::new("h", "", 2, 0.0, 2.0).unwrap();
        for _ in 0..4 {
            h.add_bin_content(1, 1.0).unwrap();
        }
        assert_relative_eq!(h.bin_error(1), 2.0);
        h.set_bin_error_option(BinErrorOption::Poisson);
        let lo = h.bin_error_low(1);
        let hi = h.bin_error_up(1);
        assert!(lo > 1.0 && lo < 2.0, "lo = {lo}");
        assert!(hi > 2.0 && hi < 4.0, "hi = {hi}");
        assert_eq!(h.bin_error_low(2), 0.0);
        assert!(h.bin_error_up(2) > 1.0);
        assert_relative_eq!(h.bin_error(1), 0.5 * (lo + hi));
    }
}
