//! Copy bin data and statistics from a source histogram into a freshly built
//! legacy histogram.

use hc_core::{BinValue, Error, Result};
use hc_legacy::{BinErrorOption, LegacyValue, StatOverflows, THist};
use hc_rhist::RHistImpl;

use crate::bins::BinIndexTranslator;

/// Transfer `src` into `dest`.
///
/// The steps run in a fixed order: allocating the squared-weight array seeds
/// it from the current content once entries are set, so it must happen before
/// the entries and any content are written, and the statistics must be
/// recomputed last.
pub fn fill<const D: usize, P, L>(dest: &mut THist<D, L>, src: &RHistImpl<D, P>) -> Result<()>
where
    P: BinValue,
    L: LegacyValue,
{
    dest.set_stat_overflows(StatOverflows::Consider);
    dest.set_bin_error_option(BinErrorOption::Normal);
    dest.set_norm_factor(0.0);

    let translator = BinIndexTranslator::new(src, dest.layout());
    let bins = src
        .all_bins()
        .map(|global| Ok((global, translator.to_legacy_bin(global)?)))
        .collect::<Result<Vec<(i64, usize)>>>()?;

    if src.stat().has_bin_uncertainty() {
        dest.sumw2();
        let sumw2 = dest.sumw2_mut();
        for &(global, bin) in &bins {
            let u = src.bin_uncertainty(global)?;
            let slot = sumw2
                .get_mut(bin)
                .ok_or_else(|| Error::InvalidBin(format!("legacy bin {bin} has no squared-weight slot")))?;
            *slot = u * u;
        }
    }

    dest.set_entries(src.entries() as f64);

    for &(global, bin) in &bins {
        dest.add_bin_content(bin, src.bin_content(global)?)?;
    }

    let stats = dest.get_stats();
    dest.put_stats(&stats);
    log::trace!("transferred {} bins into {}", bins.len(), dest.name());
    Ok(())
}
