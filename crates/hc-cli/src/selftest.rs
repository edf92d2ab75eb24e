//! Randomized conversion self-test.
//!
//! Each run draws axis configurations and a title, builds source histograms of
//! every supported precision with several statistics sets, fills them,
//! converts them and compares the result against the source.

use anyhow::Result;
use hc_convert::{BinIndexTranslator, LegacyConstruct, LegacyCounterpart, convert, title};
use hc_core::Error;
use hc_legacy::{THist, unique_name};
use hc_rhist::{Axis, DataMomentUncert, RHist, RHistImpl, StatContent, StatSet, StatUncertainty};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::SelftestConfig;

/// Outcome of a self-test.
#[derive(Debug, Default, Serialize)]
pub struct Summary {
    /// Runs performed.
    pub runs: usize,
    /// Seed used.
    pub seed: u64,
    /// Conversions that succeeded and matched their source.
    pub conversions: usize,
    /// Conversions that failed as they should (mixed 3-D axes).
    pub expected_rejections: usize,
    /// Everything else.
    pub failures: Vec<Failure>,
}

/// One failed check.
#[derive(Debug, Serialize)]
pub struct Failure {
    /// Run index.
    pub run: usize,
    /// Source shape, e.g. `RHist<2, f32, (StatContent, StatUncertainty)>`.
    pub shape: String,
    /// Axis configuration.
    pub axes: Vec<String>,
    /// What went wrong.
    pub message: String,
}

struct Case<const D: usize> {
    title: String,
    axes: [Axis; D],
}

struct Runner<'a> {
    config: &'a SelftestConfig,
    rng: StdRng,
    run: usize,
    summary: Summary,
}

/// Run the self-test.
pub fn run(config: &SelftestConfig) -> Result<Summary> {
    config.validate()?;
    let mut runner = Runner {
        config,
        rng: StdRng::seed_from_u64(config.seed),
        run: 0,
        summary: Summary { seed: config.seed, ..Default::default() },
    };
    for run in 0..config.runs {
        runner.run = run;
        runner.run_once()?;
        runner.summary.runs += 1;
        if (run + 1) % 10 == 0 {
            tracing::info!(run = run + 1, failures = runner.summary.failures.len(), "progress");
        }
    }
    Ok(runner.summary)
}

const TITLE_PIECES: &[&str] = &["Hist", "title", "is", "number 3", ";", " ", "#", "x [GeV]", ";;"];

fn random_title(rng: &mut StdRng) -> String {
    let n = rng.random_range(0..=5);
    (0..n).map(|_| TITLE_PIECES[rng.random_range(0..TITLE_PIECES.len())]).collect()
}

// Per-shape check body, instantiated for every precision and statistics set.
macro_rules! check_shapes {
    ($self:ident, $case:expr, $d:literal; $($p:ty),*) => {$(
        $self.check::<$d, $p, ()>($case);
        $self.check::<$d, $p, (StatContent, StatUncertainty)>($case);
        $self.check::<$d, $p, (StatUncertainty, DataMomentUncert, StatContent)>($case);
    )*};
}

impl Runner<'_> {
    fn run_once(&mut self) -> Result<()> {
        let bins_1d = self.config.num_bins_range;
        let bins_nd = self.config.multi_dim_bins_range;

        let case = Case { title: random_title(&mut self.rng), axes: [self.random_axis(bins_1d, None)?] };
        check_shapes!(self, &case, 1; i8, i16, i32, f32, f64);

        let case = Case {
            title: random_title(&mut self.rng),
            axes: [self.random_axis(bins_nd, None)?, self.random_axis(bins_nd, None)?],
        };
        check_shapes!(self, &case, 2; i8, i16, i32, f32, f64);

        let uniform = self.rng.random_bool(0.5);
        let case = Case {
            title: random_title(&mut self.rng),
            axes: [
                self.random_axis(bins_nd, Some(uniform))?,
                self.random_axis(bins_nd, Some(uniform))?,
                self.random_axis(bins_nd, Some(uniform))?,
            ],
        };
        check_shapes!(self, &case, 3; i8, i16, i32, f32, f64);

        let odd = self.rng.random_range(0..3);
        let axes = [0, 1, 2].map(|i| self.random_axis(bins_nd, Some(i != odd)));
        let mixed = Case { title: random_title(&mut self.rng), axes: transpose(axes)? };
        self.check_rejected(&mixed);
        Ok(())
    }

    /// Equidistant or irregular axis; `uniform` forces the kind.
    fn random_axis(&mut self, bins: (usize, usize), uniform: Option<bool>) -> Result<Axis> {
        let (lo_lim, hi_lim) = self.config.axis_limit_range;
        let n = self.rng.random_range(bins.0..=bins.1);
        let uniform = uniform.unwrap_or_else(|| self.rng.random_bool(0.5));
        let axis = if uniform {
            let a = self.rng.random_range(lo_lim..hi_lim);
            let b = self.rng.random_range(lo_lim..hi_lim);
            let (low, high) = if a < b { (a, b) } else { (b, a) };
            let high = if high > low { high } else { low + 1.0 };
            Axis::equidistant(n, low, high)?
        } else {
            let step = (hi_lim - lo_lim) / n as f64;
            let mut edge = self.rng.random_range(lo_lim..hi_lim);
            let mut borders = Vec::with_capacity(n + 1);
            borders.push(edge);
            for _ in 0..n {
                edge += self.rng.random_range(1e-3 * step..step);
                borders.push(edge);
            }
            Axis::irregular(borders)?
        };
        Ok(axis.with_title(random_title(&mut self.rng)))
    }

    fn sample<const D: usize>(&mut self, axes: &[Axis; D]) -> [f64; D] {
        std::array::from_fn(|i| {
            let (min, max) = (axes[i].minimum(), axes[i].maximum());
            if self.rng.random::<f64>() < self.config.flow_fraction {
                if self.rng.random_bool(0.5) { min - 1.0 } else { max + 1.0 }
            } else {
                self.rng.random_range(min..max)
            }
        })
    }

    fn record_failure<const D: usize>(&mut self, case: &Case<D>, shape: String, message: String) {
        let axes: Vec<String> = case.axes.iter().map(ToString::to_string).collect();
        tracing::error!(run = self.run, %shape, title = %case.title, ?axes, %message, "self-test failure");
        self.summary.failures.push(Failure { run: self.run, shape, axes, message });
    }

    fn check<const D: usize, P, S>(&mut self, case: &Case<D>)
    where
        P: LegacyCounterpart<D>,
        S: StatSet,
        THist<D, P>: LegacyConstruct,
    {
        let shape = format!("RHist<{D}, {}, {}>", P::NAME, std::any::type_name::<S>());
        let mut src: RHist<D, P, S> = RHist::with_title(case.title.clone(), case.axes.clone());
        // Integer storage truncates fractional weights on both sides.
        let integral = P::INTEGRAL;
        for _ in 0..self.config.fills {
            let x = self.sample(&case.axes);
            let w = if integral { 1.0 } else { self.rng.random_range(0.1..2.0) };
            src.fill_weighted(x, w);
        }

        let result = convert(&src, &unique_name("selftest"))
            .map_err(|e| e.to_string())
            .and_then(|h| match src.imp() {
                Some(imp) => verify(imp, &h),
                None => Err("source lost its implementation".to_string()),
            });
        match result {
            Ok(()) => self.summary.conversions += 1,
            Err(message) => self.record_failure(case, shape, message),
        }
    }

    fn check_rejected(&mut self, case: &Case<3>) {
        let src: RHist<3, f64> = RHist::with_title(case.title.clone(), case.axes.clone());
        match convert(&src, &unique_name("mixed")) {
            Err(Error::InhomogeneousAxes(msg)) => {
                tracing::debug!(%msg, "mixed 3-D axes rejected");
                self.summary.expected_rejections += 1;
            }
            Err(other) => {
                self.record_failure(case, "RHist<3, f64, ()>".into(), format!("wrong error for mixed axes: {other}"))
            }
            Ok(_) => self.record_failure(case, "RHist<3, f64, ()>".into(), "mixed 3-D axes were accepted".into()),
        }
    }
}

fn transpose(axes: [Result<Axis>; 3]) -> Result<[Axis; 3]> {
    let [a, b, c] = axes;
    Ok([a?, b?, c?])
}

fn close(a: f64, b: f64, scale: f64) -> bool {
    (a - b).abs() <= 1e-6 * scale.max(a.abs()).max(b.abs()).max(f64::MIN_POSITIVE)
}

fn verify<const D: usize, P, L>(src: &RHistImpl<D, P>, h: &THist<D, L>) -> Result<(), String>
where
    P: hc_core::BinValue,
    L: hc_legacy::LegacyValue,
{
    let expected_title = title::escape(src.title());
    if h.title() != expected_title {
        return Err(format!("title {:?}, expected {expected_title:?}", h.title()));
    }
    if h.entries() != src.entries() as f64 {
        return Err(format!("{} entries, expected {}", h.entries(), src.entries()));
    }

    for (i, axis) in src.axes().iter().enumerate() {
        let legacy = h.axis(i).map_err(|e| e.to_string())?;
        if legacy.title() != axis.title() {
            return Err(format!("axis {i} title {:?}, expected {:?}", legacy.title(), axis.title()));
        }
        if legacy.nbins() != axis.n_bins_no_over() {
            return Err(format!("axis {i} has {} bins, expected {}", legacy.nbins(), axis.n_bins_no_over()));
        }
        if legacy.can_extend() != axis.can_grow() {
            return Err(format!("axis {i} extend flag {}", legacy.can_extend()));
        }
        if let Axis::Irregular(a) = axis
            && legacy.xbins() != a.bin_borders()
        {
            return Err(format!("axis {i} borders differ"));
        }
    }

    let translator = BinIndexTranslator::new(src, h.layout());
    let tracks_uncertainty = src.stat().has_bin_uncertainty();
    let (mut sumw, mut sumw2, mut sumwx, mut scale_x) = (0.0, 0.0, 0.0, 0.0);
    let mut flow_content = false;
    for global in src.all_bins() {
        let bin = translator.to_legacy_bin(global).map_err(|e| e.to_string())?;
        let content = src.bin_content(global).map_err(|e| e.to_string())?;
        let u = src.bin_uncertainty(global).map_err(|e| e.to_string())?;
        if !close(h.bin_content(bin), content, 0.0) {
            return Err(format!("bin {global}: content {} vs {content}", h.bin_content(bin)));
        }
        if tracks_uncertainty && !close(h.bin_error(bin).powi(2), u * u, 0.0) {
            return Err(format!("bin {global}: error² {} vs {}", h.bin_error(bin).powi(2), u * u));
        }
        sumw += content;
        sumw2 += u * u;
        if global < 0 {
            flow_content |= content != 0.0;
        } else {
            let (lo, hi) = (src.bin_from(global), src.bin_to(global));
            if let (Ok(lo), Ok(hi)) = (lo, hi) {
                let x = 0.5 * (lo[0] + hi[0]);
                sumwx += content * x;
                scale_x += (content * x).abs();
            }
        }
    }

    let stats = h.get_stats();
    let abs_w: f64 = src.all_bins().filter_map(|g| src.bin_content(g).ok()).map(f64::abs).sum();
    if !close(stats[0], sumw, abs_w) {
        return Err(format!("sumw {} vs {sumw}", stats[0]));
    }
    if !close(stats[1], sumw2, 0.0) {
        return Err(format!("sumw2 {} vs {sumw2}", stats[1]));
    }
    // Flow bins sit at different coordinates in the two models.
    if !flow_content && !close(stats[2], sumwx, scale_x) {
        return Err(format!("sumwx {} vs {sumwx}", stats[2]));
    }
    Ok(())
}
