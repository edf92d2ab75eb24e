//! Axis descriptors.
//!
//! Local bin convention shared by every axis kind:
//!
//! ```text
//!   -1          1   2   ...   n          -2
//! underflow | regular bins, low to high | overflow
//! ```
//!
//! Growable and labeled axes carry no under/overflow bins: values outside
//! their range would make them grow, which is not supported.

use std::fmt;

use hc_core::{Error, Result};

/// Local index of the underflow bin.
pub const UNDERFLOW: i64 = -1;
/// Local index of the overflow bin.
pub const OVERFLOW: i64 = -2;

/// Fixed-width binning between `low` and `high`.
#[derive(Debug, Clone, PartialEq)]
pub struct EquidistantAxis {
    title: String,
    n_bins: usize,
    low: f64,
    high: f64,
    inv_bin_width: f64,
}

impl EquidistantAxis {
    fn new(n_bins: usize, low: f64, high: f64) -> Result<Self> {
        if n_bins == 0 {
            return Err(Error::InvalidAxis("an axis needs at least one bin".into()));
        }
        if !(low.is_finite() && high.is_finite()) || low >= high {
            return Err(Error::InvalidAxis(format!(
                "equidistant axis range [{low}, {high}) is empty or not finite"
            )));
        }
        Ok(Self { title: String::new(), n_bins, low, high, inv_bin_width: n_bins as f64 / (high - low) })
    }

    /// Lower axis limit.
    pub fn minimum(&self) -> f64 {
        self.low
    }

    /// Upper axis limit.
    pub fn maximum(&self) -> f64 {
        self.high
    }

    /// Width of every regular bin.
    pub fn bin_width(&self) -> f64 {
        (self.high - self.low) / self.n_bins as f64
    }

    fn find_bin(&self, x: f64) -> i64 {
        if x.is_nan() || x >= self.high {
            return OVERFLOW;
        }
        if x < self.low {
            return UNDERFLOW;
        }
        let raw = ((x - self.low) * self.inv_bin_width).floor() as i64 + 1;
        raw.min(self.n_bins as i64)
    }

    fn edge(&self, i: i64) -> f64 {
        if i as usize == self.n_bins {
            return self.high;
        }
        self.low + i as f64 * self.bin_width()
    }
}

/// Explicit, non-uniform bin borders.
#[derive(Debug, Clone, PartialEq)]
pub struct IrregularAxis {
    title: String,
    borders: Vec<f64>,
}

impl IrregularAxis {
    fn new(borders: Vec<f64>) -> Result<Self> {
        if borders.len() < 2 {
            return Err(Error::InvalidAxis(format!(
                "irregular axis needs at least 2 borders, got {}",
                borders.len()
            )));
        }
        if borders.iter().any(|b| !b.is_finite()) {
            return Err(Error::InvalidAxis("irregular axis borders must be finite".into()));
        }
        if let Some(w) = borders.windows(2).position(|w| w[0] >= w[1]) {
            return Err(Error::InvalidAxis(format!(
                "irregular axis borders must be strictly increasing (borders[{}]={} >= borders[{}]={})",
                w,
                borders[w],
                w + 1,
                borders[w + 1]
            )));
        }
        Ok(Self { title: String::new(), borders })
    }

    /// Bin borders, `n + 1` values.
    pub fn bin_borders(&self) -> &[f64] {
        &self.borders
    }

    fn find_bin(&self, x: f64) -> i64 {
        if x.is_nan() {
            return OVERFLOW;
        }
        let idx = self.borders.partition_point(|&b| b <= x);
        if idx == 0 {
            UNDERFLOW
        } else if idx == self.borders.len() {
            OVERFLOW
        } else {
            idx as i64
        }
    }
}

/// Labeled bins; bin `i` spans `[i - 1, i)`.
///
/// Experimental: labels are carried through conversion but their fidelity is
/// not verified.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelsAxis {
    title: String,
    labels: Vec<String>,
}

impl LabelsAxis {
    /// Bin labels, in bin order.
    pub fn bin_labels(&self) -> &[String] {
        &self.labels
    }
}

/// Binning scheme of one histogram dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum Axis {
    /// Fixed-width bins with under/overflow.
    Equidistant(EquidistantAxis),
    /// Fixed-width bins that may grow; no under/overflow bins.
    Growable(EquidistantAxis),
    /// Explicit bin borders with under/overflow.
    Irregular(IrregularAxis),
    /// Labeled bins; growable, no under/overflow bins.
    Labels(LabelsAxis),
}

impl Axis {
    /// `n_bins` equidistant bins on `[low, high)`.
    pub fn equidistant(n_bins: usize, low: f64, high: f64) -> Result<Self> {
        Ok(Axis::Equidistant(EquidistantAxis::new(n_bins, low, high)?))
    }

    /// `n_bins` equidistant bins on `[low, high)` that may grow.
    pub fn growable(n_bins: usize, low: f64, high: f64) -> Result<Self> {
        Ok(Axis::Growable(EquidistantAxis::new(n_bins, low, high)?))
    }

    /// Irregular binning from `n + 1` strictly increasing borders.
    pub fn irregular(borders: Vec<f64>) -> Result<Self> {
        Ok(Axis::Irregular(IrregularAxis::new(borders)?))
    }

    /// One bin per label.
    pub fn labels<I, L>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(Error::InvalidAxis("labeled axis needs at least one label".into()));
        }
        Ok(Axis::Labels(LabelsAxis { title: String::new(), labels }))
    }

    /// Attach a title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        match &mut self {
            Axis::Equidistant(a) | Axis::Growable(a) => a.title = title,
            Axis::Irregular(a) => a.title = title,
            Axis::Labels(a) => a.title = title,
        }
        self
    }

    /// Axis title (empty if none).
    pub fn title(&self) -> &str {
        match self {
            Axis::Equidistant(a) | Axis::Growable(a) => &a.title,
            Axis::Irregular(a) => &a.title,
            Axis::Labels(a) => &a.title,
        }
    }

    /// Kind name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Axis::Equidistant(_) => "Equidistant",
            Axis::Growable(_) => "Growable",
            Axis::Irregular(_) => "Irregular",
            Axis::Labels(_) => "Labeled",
        }
    }

    /// Number of regular bins.
    pub fn n_bins_no_over(&self) -> usize {
        match self {
            Axis::Equidistant(a) | Axis::Growable(a) => a.n_bins,
            Axis::Irregular(a) => a.borders.len() - 1,
            Axis::Labels(a) => a.labels.len(),
        }
    }

    /// Number of under/overflow bins: 2, or 0 for axes that can grow.
    pub fn n_overflow_bins(&self) -> usize {
        if self.can_grow() { 0 } else { 2 }
    }

    /// Number of bins including under/overflow.
    pub fn n_bins(&self) -> usize {
        self.n_bins_no_over() + self.n_overflow_bins()
    }

    /// Whether the axis range may grow.
    pub fn can_grow(&self) -> bool {
        matches!(self, Axis::Growable(_) | Axis::Labels(_))
    }

    /// Lower edge of the first regular bin.
    pub fn minimum(&self) -> f64 {
        match self {
            Axis::Equidistant(a) | Axis::Growable(a) => a.low,
            Axis::Irregular(a) => a.borders[0],
            Axis::Labels(_) => 0.0,
        }
    }

    /// Upper edge of the last regular bin.
    pub fn maximum(&self) -> f64 {
        match self {
            Axis::Equidistant(a) | Axis::Growable(a) => a.high,
            Axis::Irregular(a) => a.borders[a.borders.len() - 1],
            Axis::Labels(a) => a.labels.len() as f64,
        }
    }

    /// Local bin containing `x` (may be [`UNDERFLOW`] or [`OVERFLOW`] even
    /// for axes without such bins; the caller decides what to do then).
    pub fn find_bin(&self, x: f64) -> i64 {
        match self {
            Axis::Equidistant(a) | Axis::Growable(a) => a.find_bin(x),
            Axis::Irregular(a) => a.find_bin(x),
            Axis::Labels(a) => {
                if x.is_nan() || x >= a.labels.len() as f64 {
                    OVERFLOW
                } else if x < 0.0 {
                    UNDERFLOW
                } else {
                    x.floor() as i64 + 1
                }
            }
        }
    }

    /// Whether `local` addresses an existing bin of this axis.
    pub fn is_valid_local(&self, local: i64) -> bool {
        match local {
            UNDERFLOW | OVERFLOW => self.n_overflow_bins() > 0,
            l => l >= 1 && l as usize <= self.n_bins_no_over(),
        }
    }

    /// Lower edge of a local bin (`-inf` for underflow, NaN for a bin that
    /// does not exist).
    pub fn bin_from(&self, local: i64) -> f64 {
        match local {
            l if !self.is_valid_local(l) => f64::NAN,
            UNDERFLOW => f64::NEG_INFINITY,
            OVERFLOW => self.maximum(),
            l => self.edge(l - 1),
        }
    }

    /// Upper edge of a local bin (`+inf` for overflow).
    pub fn bin_to(&self, local: i64) -> f64 {
        match local {
            l if !self.is_valid_local(l) => f64::NAN,
            UNDERFLOW => self.minimum(),
            OVERFLOW => f64::INFINITY,
            l => self.edge(l),
        }
    }

    fn edge(&self, i: i64) -> f64 {
        match self {
            Axis::Equidistant(a) | Axis::Growable(a) => a.edge(i),
            Axis::Irregular(a) => a.borders[i as usize],
            Axis::Labels(_) => i as f64,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bins inc. overflow", self.kind_name(), self.n_bins())?;
        match self {
            Axis::Equidistant(a) | Axis::Growable(a) => {
                write!(f, " from {} to {})", a.low, a.high)
            }
            Axis::Irregular(a) => {
                f.write_str(" with borders")?;
                write_elided(f, &a.borders, |f, b| write!(f, "{b}"))
            }
            Axis::Labels(a) => {
                f.write_str(" with labels")?;
                write_elided(f, &a.labels, |f, l| write!(f, "\"{l}\""))
            }
        }?;
        if !self.title().is_empty() {
            write!(f, " titled \"{}\"", self.title())?;
        }
        Ok(())
    }
}

/// `{ a, b, c, ..., x, y, z })` for long sequences.
fn write_elided<T>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    mut item: impl FnMut(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    f.write_str(" { ")?;
    let n = items.len();
    for (i, it) in items.iter().enumerate() {
        if n > 6 && (3..n - 3).contains(&i) {
            if i == 3 {
                f.write_str("..., ")?;
            }
            continue;
        }
        item(f, it)?;
        if i + 1 < n {
            f.write_str(", ")?;
        }
    }
    f.write_str(" })")
}
