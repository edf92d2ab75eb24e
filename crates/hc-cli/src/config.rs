//! Self-test configuration.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Tuning knobs of the self-test. Every field has a default, so a config
/// file only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelftestConfig {
    /// Number of randomized runs.
    pub runs: usize,
    /// RNG seed.
    pub seed: u64,
    /// Fills per histogram.
    pub fills: usize,
    /// Inclusive range of regular bins drawn for 1-D axes.
    pub num_bins_range: (usize, usize),
    /// Inclusive range of regular bins drawn for 2-D/3-D axes.
    pub multi_dim_bins_range: (usize, usize),
    /// Range axis limits are drawn from.
    pub axis_limit_range: (f64, f64),
    /// Fraction of fills placed outside the axis range.
    pub flow_fraction: f64,
}

impl Default for SelftestConfig {
    fn default() -> Self {
        Self {
            runs: 100,
            seed: 0x5eed,
            fills: 1000,
            num_bins_range: (1, 1000),
            multi_dim_bins_range: (1, 12),
            axis_limit_range: (-10264.5, 1928.37),
            flow_fraction: 0.05,
        }
    }
}

impl SelftestConfig {
    /// Defaults, overridden by the JSON file at `path` if given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading self-test config");
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))?
            }
            None => Self::default(),
        };
        Ok(config)
    }

    /// Reject configurations the generators cannot honor.
    pub fn validate(&self) -> Result<()> {
        for (name, (lo, hi)) in
            [("num_bins_range", self.num_bins_range), ("multi_dim_bins_range", self.multi_dim_bins_range)]
        {
            if lo == 0 || lo > hi {
                bail!("{name} must satisfy 1 <= min <= max, got ({lo}, {hi})");
            }
        }
        let (lo, hi) = self.axis_limit_range;
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            bail!("axis_limit_range must be a finite, increasing pair, got ({lo}, {hi})");
        }
        if !(0.0..=1.0).contains(&self.flow_fraction) {
            bail!("flow_fraction must lie in [0, 1], got {}", self.flow_fraction);
        }
        Ok(())
    }
}
