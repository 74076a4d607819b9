//! Primary-input transition variable allocation schemes (spec §4.5.1).
//!
//! Each primary input is assigned a block of BDD variables; an
//! [`InputEncoding`] converts a `(input_index, transition)` pair into the
//! BDD over those variables that is true exactly when the input undergoes
//! that transition. The `Uniform` scheme gives every input exactly two
//! variables and a fixed 1/4 prior per transition; `Grouped` gives every
//! input `k` variables and partitions the `2^k` minterms across the four
//! transitions by one of three schemes, inducing a non-uniform prior.

use crate::manager::{BddFunc, BddManager, Var};
use esta_common::Transition;
use esta_config::types::{CondFunc, PartitionScheme};

/// How primary-input transitions are encoded as BDD variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEncoding {
    /// Two variables per input (current, next); see spec §4.5.1.
    Uniform,
    /// `k` variables per input, minterms partitioned by `scheme`.
    Grouped {
        /// The minterm-partitioning scheme.
        scheme: PartitionScheme,
        /// Variables allocated per input.
        k: u32,
    },
}

impl From<CondFunc> for InputEncoding {
    fn from(cond_func: CondFunc) -> Self {
        match cond_func {
            CondFunc::Uniform => InputEncoding::Uniform,
            CondFunc::Grouped { scheme, k } => InputEncoding::Grouped { scheme, k },
        }
    }
}

impl InputEncoding {
    /// The number of BDD variables each primary input occupies.
    pub fn vars_per_input(self) -> u32 {
        match self {
            InputEncoding::Uniform => 2,
            InputEncoding::Grouped { k, .. } => k,
        }
    }

    /// The total variable count for `num_inputs` primary inputs under this encoding.
    pub fn total_vars(self, num_inputs: u32) -> u32 {
        self.vars_per_input() * num_inputs
    }

    /// The BDD variables allocated to primary input `input_index`.
    fn vars_for_input(self, input_index: u32) -> Vec<Var> {
        let per = self.vars_per_input();
        let base = input_index * per;
        (base..base + per).collect()
    }

    /// Builds (allocating variables in `mgr` as needed) the BDD that is true
    /// exactly when primary input `input_index` undergoes `transition`.
    pub fn transition_func(
        self,
        mgr: &mut BddManager,
        input_index: u32,
        transition: Transition,
    ) -> BddFunc {
        let vars = self.vars_for_input(input_index);
        for &v in &vars {
            mgr.var(v);
        }
        match self {
            InputEncoding::Uniform => uniform_transition_func(mgr, vars[0], vars[1], transition),
            InputEncoding::Grouped { scheme, k } => {
                grouped_transition_func(mgr, &vars, scheme, k, transition)
            }
        }
    }
}

/// `Rise = ¬c ∧ n`, `Fall = c ∧ ¬n`, `High = c ∧ n`, `Low = ¬c ∧ ¬n`.
fn uniform_transition_func(
    mgr: &mut BddManager,
    current: Var,
    next: Var,
    transition: Transition,
) -> BddFunc {
    let c = mgr.var(current);
    let n = mgr.var(next);
    let not_c = mgr.not(c);
    let not_n = mgr.not(n);
    match transition {
        Transition::Rise => mgr.and(not_c, n),
        Transition::Fall => mgr.and(c, not_n),
        Transition::High => mgr.and(c, n),
        Transition::Low => mgr.and(not_c, not_n),
        other => panic!("uniform encoding has no variable for transition {other}"),
    }
}

/// Splits `total` minterms into four shares, as evenly as possible, giving
/// the first `total % 4` transitions (in `Rise, Fall, High, Low` order) one
/// extra minterm. Config does not expose an explicit weight vector, so this
/// is the scheme's only source of non-uniformity when `2^k` isn't a
/// multiple of four.
fn split_counts(total: u32) -> [u32; 4] {
    let base = total / 4;
    let remainder = total % 4;
    let mut counts = [base; 4];
    for c in counts.iter_mut().take(remainder as usize) {
        *c += 1;
    }
    counts
}

/// The n-th value in reflected binary Gray-code order.
fn binary_to_gray(n: u32) -> u32 {
    n ^ (n >> 1)
}

fn grouped_transition_func(
    mgr: &mut BddManager,
    vars: &[Var],
    scheme: PartitionScheme,
    k: u32,
    transition: Transition,
) -> BddFunc {
    let total = 1u32 << k;
    let counts = split_counts(total);
    let idx = match transition {
        Transition::Rise => 0,
        Transition::Fall => 1,
        Transition::High => 2,
        Transition::Low => 3,
        other => panic!("grouped encoding has no variable for transition {other}"),
    };
    let count = counts[idx];
    if count == 0 {
        return mgr.zero();
    }
    let offset: u32 = counts[..idx].iter().sum();

    match scheme {
        PartitionScheme::Binary => {
            // Pack this transition's share into the largest aligned
            // power-of-two blocks possible, starting at `offset`.
            let mut f = mgr.zero();
            for (block_index, free_bits) in decompose_range(offset, count) {
                let cube = aligned_block_cube(mgr, vars, block_index, free_bits);
                f = mgr.or(f, cube);
            }
            f
        }
        PartitionScheme::Gray => {
            // Same contiguous range, but the range is over Gray *ranks*:
            // minterm patterns are the Gray-code images of those ranks, so
            // adjacent ranks (and thus most adjacent minterms) differ in
            // exactly one bit.
            let mut f = mgr.zero();
            for rank in offset..offset + count {
                let pattern = binary_to_gray(rank);
                let cube = minterm_cube(mgr, vars, pattern);
                f = mgr.or(f, cube);
            }
            f
        }
        PartitionScheme::RoundRobin => {
            let mut f = mgr.zero();
            for pattern in 0..total {
                if round_robin_owner(&counts, pattern) == idx {
                    let cube = minterm_cube(mgr, vars, pattern);
                    f = mgr.or(f, cube);
                }
            }
            f
        }
    }
}

/// Returns which transition index (0..4) owns minterm `pattern` under the
/// round-robin distribution: transitions are visited cyclically in
/// `Rise, Fall, High, Low` order, skipping any whose share is already
/// exhausted, until `pattern` minterms have been handed out in total.
fn round_robin_owner(counts: &[u32; 4], pattern: u32) -> usize {
    let mut remaining = *counts;
    let mut ti = 0usize;
    for p in 0..=pattern {
        while remaining[ti] == 0 {
            ti = (ti + 1) % 4;
        }
        if p == pattern {
            return ti;
        }
        remaining[ti] -= 1;
        ti = (ti + 1) % 4;
    }
    unreachable!()
}

/// Builds the cube fixing every variable in `vars` to the corresponding bit
/// of `pattern` (bit `j` of `pattern` controls `vars[j]`).
fn minterm_cube(mgr: &mut BddManager, vars: &[Var], pattern: u32) -> BddFunc {
    let mut f = mgr.one();
    for (j, &v) in vars.iter().enumerate() {
        let lit = mgr.var(v);
        let lit = if (pattern >> j) & 1 == 1 {
            lit
        } else {
            mgr.not(lit)
        };
        f = mgr.and(f, lit);
    }
    f
}

/// Builds the cube that fixes the high-order `vars[free_bits..]` to
/// `block_index`'s bits and leaves `vars[..free_bits]` unconstrained,
/// covering the `2^free_bits` contiguous minterms `[block_index <<
/// free_bits, (block_index + 1) << free_bits)`.
fn aligned_block_cube(mgr: &mut BddManager, vars: &[Var], block_index: u32, free_bits: u32) -> BddFunc {
    let mut f = mgr.one();
    for j in free_bits..vars.len() as u32 {
        let bit_pos = j - free_bits;
        let lit = mgr.var(vars[j as usize]);
        let lit = if (block_index >> bit_pos) & 1 == 1 {
            lit
        } else {
            mgr.not(lit)
        };
        f = mgr.and(f, lit);
    }
    f
}

/// Decomposes the half-open range `[lo, lo + count)` into the minimum
/// number of aligned power-of-two blocks, returning `(block_index,
/// free_bits)` pairs such that block `i` covers `[block_index << free_bits,
/// (block_index + 1) << free_bits)`.
fn decompose_range(lo: u32, count: u32) -> Vec<(u32, u32)> {
    let mut blocks = Vec::new();
    let mut pos = lo;
    let mut remaining = count;
    while remaining > 0 {
        let max_align = if pos == 0 { 32 } else { pos.trailing_zeros() };
        let max_fit = 31 - remaining.leading_zeros();
        let free_bits = max_align.min(max_fit);
        let block_size = 1u32 << free_bits;
        blocks.push((pos >> free_bits, free_bits));
        pos += block_size;
        remaining -= block_size;
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_transitions_are_disjoint_and_partition_space() {
        let mut mgr = BddManager::new();
        let enc = InputEncoding::Uniform;
        let rise = enc.transition_func(&mut mgr, 0, Transition::Rise);
        let fall = enc.transition_func(&mut mgr, 0, Transition::Fall);
        let high = enc.transition_func(&mut mgr, 0, Transition::High);
        let low = enc.transition_func(&mut mgr, 0, Transition::Low);
        for t in [rise, fall, high, low] {
            assert!((mgr.minterm_fraction(t) - 0.25).abs() < 1e-12);
        }
        let any = [rise, fall, high, low]
            .into_iter()
            .fold(mgr.zero(), |acc, f| mgr.or(acc, f));
        assert_eq!(any, BddFunc::TRUE);
    }

    #[test]
    fn uniform_two_inputs_uses_four_vars() {
        let enc = InputEncoding::Uniform;
        assert_eq!(enc.total_vars(2), 4);
    }

    #[test]
    fn grouped_binary_partition_sums_to_one() {
        let mut mgr = BddManager::new();
        let enc = InputEncoding::Grouped {
            scheme: PartitionScheme::Binary,
            k: 3,
        };
        let mut total = 0.0;
        for t in Transition::EVENTS {
            total += mgr.minterm_fraction(enc.transition_func(&mut mgr, 0, t));
        }
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn grouped_gray_partition_sums_to_one() {
        let mut mgr = BddManager::new();
        let enc = InputEncoding::Grouped {
            scheme: PartitionScheme::Gray,
            k: 4,
        };
        let mut total = 0.0;
        for t in Transition::EVENTS {
            total += mgr.minterm_fraction(enc.transition_func(&mut mgr, 0, t));
        }
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn grouped_round_robin_partition_sums_to_one() {
        let mut mgr = BddManager::new();
        let enc = InputEncoding::Grouped {
            scheme: PartitionScheme::RoundRobin,
            k: 5,
        };
        let mut total = 0.0;
        for t in Transition::EVENTS {
            total += mgr.minterm_fraction(enc.transition_func(&mut mgr, 0, t));
        }
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn grouped_transitions_pairwise_disjoint() {
        let mut mgr = BddManager::new();
        let enc = InputEncoding::Grouped {
            scheme: PartitionScheme::Binary,
            k: 3,
        };
        let funcs: Vec<_> = Transition::EVENTS
            .iter()
            .map(|&t| enc.transition_func(&mut mgr, 0, t))
            .collect();
        for i in 0..funcs.len() {
            for j in (i + 1)..funcs.len() {
                let overlap = mgr.and(funcs[i], funcs[j]);
                assert_eq!(overlap, BddFunc::FALSE, "transitions {i} and {j} overlap");
            }
        }
    }

    #[test]
    fn split_counts_even_division() {
        assert_eq!(split_counts(8), [2, 2, 2, 2]);
    }

    #[test]
    fn split_counts_uneven_division_gives_remainder_to_earlier_transitions() {
        assert_eq!(split_counts(10), [3, 3, 2, 2]);
    }

    #[test]
    fn decompose_range_covers_exact_count() {
        let blocks = decompose_range(3, 5);
        let covered: u32 = blocks.iter().map(|&(_, b)| 1u32 << b).sum();
        assert_eq!(covered, 5);
    }

    #[test]
    fn second_input_uses_disjoint_variables_from_first() {
        let mut mgr = BddManager::new();
        let enc = InputEncoding::Uniform;
        let a_rise = enc.transition_func(&mut mgr, 0, Transition::Rise);
        let b_rise = enc.transition_func(&mut mgr, 1, Transition::Rise);
        assert_ne!(mgr.support(a_rise), mgr.support(b_rise));
    }
}
