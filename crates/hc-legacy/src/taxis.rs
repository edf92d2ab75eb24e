//! Legacy axis: `n` regular bins numbered `1..=n`, with underflow at `0` and
//! overflow at `n + 1`.

use hc_core::{Error, Result};

/// Axis of a legacy histogram.
///
/// Uniform axes store only `[xmin, xmax)`; variable axes additionally store
/// their `n + 1` bin edges.
#[derive(Debug, Clone, PartialEq)]
pub struct TAxis {
    title: String,
    nbins: usize,
    xmin: f64,
    xmax: f64,
    xbins: Vec<f64>,
    labels: Vec<Option<String>>,
    can_extend: bool,
}

impl TAxis {
    /// Uniform axis with `nbins` bins on `[xmin, xmax)`.
    pub fn uniform(nbins: usize, xmin: f64, xmax: f64) -> Result<Self> {
        if nbins == 0 {
            return Err(Error::InvalidAxis("legacy axis needs at least one bin".into()));
        }
        if !(xmin.is_finite() && xmax.is_finite() && xmin < xmax) {
            return Err(Error::InvalidAxis(format!("invalid legacy axis range [{xmin}, {xmax})")));
        }
        Ok(Self {
            title: String::new(),
            nbins,
            xmin,
            xmax,
            xbins: Vec::new(),
            labels: Vec::new(),
            can_extend: false,
        })
    }

    /// Variable-width axis with `nbins` bins; `edges` must hold at least
    /// `nbins + 1` strictly increasing values (extra values are ignored).
    pub fn variable(nbins: usize, edges: &[f64]) -> Result<Self> {
        if nbins == 0 {
            return Err(Error::InvalidAxis("legacy axis needs at least one bin".into()));
        }
        if edges.len() < nbins + 1 {
            return Err(Error::InvalidAxis(format!(
                "{nbins} bins need {} edges, got {}",
                nbins + 1,
                edges.len()
            )));
        }
        let edges = &edges[..=nbins];
        if edges.windows(2).any(|w| !(w[0] < w[1])) {
            return Err(Error::InvalidAxis("legacy bin edges must be strictly increasing".into()));
        }
        Ok(Self {
            title: String::new(),
            nbins,
            xmin: edges[0],
            xmax: edges[nbins],
            xbins: edges.to_vec(),
            labels: Vec::new(),
            can_extend: false,
        })
    }

    /// Axis title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replace the axis title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Number of regular bins.
    pub fn nbins(&self) -> usize {
        self.nbins
    }

    /// Low edge of bin 1.
    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    /// High edge of bin `n`.
    pub fn xmax(&self) -> f64 {
        self.xmax
    }

    /// Explicit bin edges; empty for uniform axes.
    pub fn xbins(&self) -> &[f64] {
        &self.xbins
    }

    /// Whether bins have individual widths.
    pub fn is_variable_bin_size(&self) -> bool {
        !self.xbins.is_empty()
    }

    fn average_width(&self) -> f64 {
        (self.xmax - self.xmin) / self.nbins as f64
    }

    /// Low edge of `bin`. Outside `1..=n+1` (or on uniform axes) edges are
    /// extrapolated with the average bin width.
    pub fn bin_low_edge(&self, bin: i64) -> f64 {
        if self.xbins.is_empty() || bin < 1 || bin > self.nbins as i64 + 1 {
            self.xmin + (bin - 1) as f64 * self.average_width()
        } else {
            self.xbins[bin as usize - 1]
        }
    }

    /// High edge of `bin`.
    pub fn bin_up_edge(&self, bin: i64) -> f64 {
        if self.xbins.is_empty() || bin < 1 || bin > self.nbins as i64 {
            self.xmin + bin as f64 * self.average_width()
        } else {
            self.xbins[bin as usize]
        }
    }

    /// Center of `bin`.
    pub fn bin_center(&self, bin: i64) -> f64 {
        if self.xbins.is_empty() || bin < 1 || bin > self.nbins as i64 {
            self.xmin + (bin as f64 - 0.5) * self.average_width()
        } else {
            let lo = self.xbins[bin as usize - 1];
            lo + 0.5 * (self.xbins[bin as usize] - lo)
        }
    }

    /// Width of `bin`.
    pub fn bin_width(&self, bin: i64) -> f64 {
        if self.xbins.is_empty() || bin < 1 || bin > self.nbins as i64 {
            self.average_width()
        } else {
            self.xbins[bin as usize] - self.xbins[bin as usize - 1]
        }
    }

    /// Bin containing `x`: `0` below range, `n + 1` at or above `xmax`.
    pub fn find_fix_bin(&self, x: f64) -> usize {
        if x < self.xmin {
            0
        } else if !(x < self.xmax) {
            self.nbins + 1
        } else if self.xbins.is_empty() {
            1 + ((x - self.xmin) / self.average_width()) as usize
        } else {
            self.xbins.partition_point(|&e| e <= x)
        }
    }

    /// Label of regular bin `bin`, if one was set.
    pub fn bin_label(&self, bin: usize) -> Option<&str> {
        self.labels.get(bin.checked_sub(1)?)?.as_deref()
    }

    /// Whether any bin carries a label.
    pub fn has_labels(&self) -> bool {
        self.labels.iter().any(Option::is_some)
    }

    /// Label regular bin `bin` (`1..=n`).
    pub fn set_bin_label(&mut self, bin: usize, label: impl Into<String>) -> Result<()> {
        if bin == 0 || bin > self.nbins {
            return Err(Error::InvalidBin(format!(
                "cannot label bin {bin} of an axis with {} bins",
                self.nbins
            )));
        }
        if self.labels.len() < self.nbins {
            self.labels.resize(self.nbins, None);
        }
        self.labels[bin - 1] = Some(label.into());
        Ok(())
    }

    /// Whether the axis may be extended on out-of-range fills.
    pub fn can_extend(&self) -> bool {
        self.can_extend
    }

    /// Allow or forbid range extension.
    pub fn set_can_extend(&mut self, can_extend: bool) {
        self.can_extend = can_extend;
    }
}
