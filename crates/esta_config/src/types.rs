//! Configuration types for a single ESTA analysis run, deserialized from `esta.toml`.

use serde::Deserialize;

/// The full configuration for one analysis run.
///
/// Every field here corresponds to a named knob in the engine's configuration
/// contract: delay-bin policy, permutation budget, BDD variable-allocation
/// scheme, xfunc cache size, and the two opt-in flags that trade strict
/// correctness checking for speed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EstaConfig {
    /// How arrival times are grouped into delay bins before tag merging.
    pub bin_policy: BinPolicy,
    /// Cap on the Cartesian-product permutation count per node. `0` means unbounded.
    pub max_permutations: u64,
    /// The BDD variable-allocation scheme used to encode primary-input transitions.
    pub cond_func: CondFunc,
    /// Capacity of the xfunc memoization cache. `0` means unbounded.
    pub xfunc_cache_capacity: usize,
    /// Whether to infer the smallest-arrival circuit-max tag's probability as
    /// `1 - sum(others)` instead of computing its BDD directly.
    ///
    /// This is a speed optimization only; it precludes validating the
    /// probability sum for that tag, so it defaults to `false`.
    pub infer_last_max_probability: bool,
    /// Whether to apply the next-state transition filter during the forward sweep.
    pub enable_transition_filter: bool,
    /// Which BDD variable-reordering algorithm the underlying package should run.
    pub reorder_method: ReorderMethod,
}

impl Default for EstaConfig {
    fn default() -> Self {
        Self {
            bin_policy: BinPolicy::default(),
            max_permutations: 0,
            cond_func: CondFunc::default(),
            xfunc_cache_capacity: 0,
            infer_last_max_probability: false,
            enable_transition_filter: false,
            reorder_method: ReorderMethod::default(),
        }
    }
}

/// Delay-binning policy applied to arrival times before the tag-merge match predicate.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BinPolicy {
    /// Exact arrival times; two arrivals match only if bit-for-bit equal.
    None,
    /// `bin = floor(arrival / width)`. `width = 0.0` falls back to [`BinPolicy::None`].
    Fixed {
        /// The bin width.
        width: f64,
    },
    /// Coarse bins below `threshold_frac * sta_critical_delay`, fine bins above.
    StaSlack {
        /// Fraction of the precomputed STA critical-path delay that separates
        /// the coarse and fine binning regions.
        threshold_frac: f64,
        /// Bin width used below the threshold.
        w_coarse: f64,
        /// Bin width used at or above the threshold. Must be `<= w_coarse`.
        w_fine: f64,
    },
}

impl Default for BinPolicy {
    fn default() -> Self {
        BinPolicy::None
    }
}

/// The BDD variable-allocation scheme used to encode primary-input transitions.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CondFunc {
    /// Two BDD variables per input (current, next); each transition is a
    /// two-variable minterm, inducing a uniform 1/4 prior per transition.
    Uniform,
    /// `k` BDD variables per input, with the `2^k` minterms partitioned
    /// across the four transitions by `scheme`.
    Grouped {
        /// The minterm-partitioning scheme.
        scheme: PartitionScheme,
        /// The number of BDD variables allocated per input.
        k: u32,
    },
}

impl Default for CondFunc {
    fn default() -> Self {
        CondFunc::Uniform
    }
}

/// How a non-uniform input's `2^k` minterms are partitioned across the four transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionScheme {
    /// Distribute minterms across transitions cyclically.
    RoundRobin,
    /// Pack each transition's share into the largest power-of-two blocks
    /// possible, indexed in plain binary.
    Binary,
    /// As [`PartitionScheme::Binary`], but index blocks in Gray-code order so
    /// adjacent minterms differ in exactly one bit.
    Gray,
}

/// The BDD variable-reordering algorithm the underlying package should run.
///
/// Purely a performance knob; it has no effect on the probabilities the
/// engine reports; it affects BDD size and variable-order stability
/// (see the concurrency model's note on cached handles surviving reorders).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReorderMethod {
    /// No dynamic reordering.
    None,
    /// Sifting: repeatedly move each variable to its locally optimal position.
    Sift,
    /// Windowed permutation over groups of two adjacent variables.
    WindowTwo,
    /// Windowed permutation over groups of three adjacent variables.
    WindowThree,
}

impl Default for ReorderMethod {
    fn default() -> Self {
        ReorderMethod::None
    }
}
