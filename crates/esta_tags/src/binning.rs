//! Delay-binning policies: collapsing an arrival time to a coarser key so
//! that tags with near-identical arrivals can match and merge instead of
//! each carving out its own singleton scenario.

use esta_config::types::BinPolicy;

/// The bin an arrival time falls into under a [`BinPolicy`].
///
/// `Exact` carries the arrival's raw bit pattern so that `BinPolicy::None`
/// (and any policy degenerating to a zero bin width) matches only
/// bit-for-bit identical arrivals, without pulling `f64: Eq` into the type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Bin {
    /// Exact arrival match, keyed by `f64::to_bits`.
    Exact(u64),
    /// A bin index under a nonzero bin width, `floor(arrival / width)`.
    Index(i64),
}

/// Computes the bin `arrival` falls into under `policy`.
///
/// `sta_critical_delay` is only consulted by [`BinPolicy::StaSlack`]; it is
/// the precomputed static-timing critical-path delay `D*` the policy's
/// threshold is a fraction of (classical STA itself is out of scope here,
/// so the caller supplies this value).
pub fn bin_arrival(policy: &BinPolicy, arrival: f64, sta_critical_delay: f64) -> Bin {
    match policy {
        BinPolicy::None => Bin::Exact(arrival.to_bits()),
        BinPolicy::Fixed { width } => bin_with_width(arrival, *width),
        BinPolicy::StaSlack {
            threshold_frac,
            w_coarse,
            w_fine,
        } => {
            let threshold = threshold_frac * sta_critical_delay;
            let width = if arrival < threshold { *w_coarse } else { *w_fine };
            bin_with_width(arrival, width)
        }
    }
}

fn bin_with_width(arrival: f64, width: f64) -> Bin {
    if width <= 0.0 {
        Bin::Exact(arrival.to_bits())
    } else {
        Bin::Index((arrival / width).floor() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_policy_matches_only_bit_identical() {
        let a = bin_arrival(&BinPolicy::None, 1.5, 0.0);
        let b = bin_arrival(&BinPolicy::None, 1.5, 0.0);
        let c = bin_arrival(&BinPolicy::None, 1.5000001, 0.0);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn fixed_policy_groups_by_width() {
        let policy = BinPolicy::Fixed { width: 0.5 };
        assert_eq!(bin_arrival(&policy, 1.0, 0.0), bin_arrival(&policy, 1.4, 0.0));
        assert_ne!(bin_arrival(&policy, 1.0, 0.0), bin_arrival(&policy, 1.5, 0.0));
    }

    #[test]
    fn fixed_policy_zero_width_falls_back_to_exact() {
        let policy = BinPolicy::Fixed { width: 0.0 };
        assert_eq!(
            bin_arrival(&policy, 1.0, 0.0),
            Bin::Exact(1.0f64.to_bits())
        );
    }

    #[test]
    fn sta_slack_uses_coarse_below_threshold_fine_above() {
        let policy = BinPolicy::StaSlack {
            threshold_frac: 0.8,
            w_coarse: 1.0,
            w_fine: 0.1,
        };
        let sta_critical_delay = 10.0;
        // Below 8.0: coarse width 1.0, so 3.0 and 3.9 land in the same bin.
        assert_eq!(
            bin_arrival(&policy, 3.0, sta_critical_delay),
            bin_arrival(&policy, 3.9, sta_critical_delay)
        );
        // At/above 8.0: fine width 0.1, so 8.0 and 8.05 land in the same bin
        // but 8.0 and 8.2 do not.
        assert_eq!(
            bin_arrival(&policy, 8.0, sta_critical_delay),
            bin_arrival(&policy, 8.05, sta_critical_delay)
        );
        assert_ne!(
            bin_arrival(&policy, 8.0, sta_critical_delay),
            bin_arrival(&policy, 8.2, sta_critical_delay)
        );
    }
}
