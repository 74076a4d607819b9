//! A self-contained reduced, ordered binary decision diagram (ROBDD) manager.
//!
//! This is the "underlying BDD package" the engine's #SAT evaluator treats as
//! a black box: variables, `AND`, `OR`, `NOT`, restriction, support,
//! minterm-fraction counting, and cube enumeration. It deliberately omits
//! complemented edges and dynamic reordering — both are performance
//! optimizations of the package the engine wraps, not part of the engine's
//! correctness contract (see `DESIGN.md`, Open Questions #1 and #3).
//!
//! Handles ([`BddFunc`]) are only meaningful relative to the [`BddManager`]
//! that produced them; mixing handles from two managers produces nonsensical
//! (but not memory-unsafe) results, the same caveat CUDD's `DdNode*` carries.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A BDD variable index.
pub type Var = u32;

/// An opaque handle to a node in a [`BddManager`].
///
/// `Copy`, `Eq`, `Hash` for O(1) comparison and use as a cache key. The
/// constant function `false` is always [`BddFunc::FALSE`], `true` is always
/// [`BddFunc::TRUE`], regardless of manager.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct BddFunc(usize);

impl BddFunc {
    /// The constant-`false` function.
    pub const FALSE: BddFunc = BddFunc(0);
    /// The constant-`true` function.
    pub const TRUE: BddFunc = BddFunc(1);

    /// Returns `true` if this handle is the constant-`false` function.
    pub fn is_false(self) -> bool {
        self == BddFunc::FALSE
    }

    /// Returns `true` if this handle is the constant-`true` function.
    pub fn is_true(self) -> bool {
        self == BddFunc::TRUE
    }

    /// Returns `true` if this handle is either terminal.
    pub fn is_terminal(self) -> bool {
        self.0 < 2
    }
}

#[derive(Clone, Copy, Debug)]
struct Node {
    var: Var,
    then_edge: BddFunc,
    else_edge: BddFunc,
}

/// A reduction/uniqueness-preserving arena of BDD nodes, plus the operation
/// caches that make `AND`/`OR`/`NOT`/restrict/minterm-fraction sub-linear on
/// repeated structure.
#[derive(Debug)]
pub struct BddManager {
    nodes: Vec<Node>,
    unique_table: HashMap<(Var, BddFunc, BddFunc), BddFunc>,
    var_nodes: Vec<BddFunc>,
    and_cache: HashMap<(BddFunc, BddFunc), BddFunc>,
    or_cache: HashMap<(BddFunc, BddFunc), BddFunc>,
    not_cache: HashMap<BddFunc, BddFunc>,
    restrict_cache: HashMap<(BddFunc, Var, bool), BddFunc>,
    frac_cache: HashMap<BddFunc, f64>,
}

impl Default for BddManager {
    fn default() -> Self {
        Self::new()
    }
}

impl BddManager {
    /// Creates a manager with no variables allocated yet.
    pub fn new() -> Self {
        Self {
            // Index 0 and 1 are reserved for the FALSE/TRUE terminals; their
            // fields are never read (terminal-ness is checked before any
            // field access).
            nodes: vec![
                Node {
                    var: Var::MAX,
                    then_edge: BddFunc::FALSE,
                    else_edge: BddFunc::FALSE,
                },
                Node {
                    var: Var::MAX,
                    then_edge: BddFunc::TRUE,
                    else_edge: BddFunc::TRUE,
                },
            ],
            unique_table: HashMap::new(),
            var_nodes: Vec::new(),
            and_cache: HashMap::new(),
            or_cache: HashMap::new(),
            not_cache: HashMap::new(),
            restrict_cache: HashMap::new(),
            frac_cache: HashMap::new(),
        }
    }

    /// The constant-`false` function.
    pub fn zero(&self) -> BddFunc {
        BddFunc::FALSE
    }

    /// The constant-`true` function.
    pub fn one(&self) -> BddFunc {
        BddFunc::TRUE
    }

    /// Returns the BDD variable representing the positive literal of `var`,
    /// allocating it (and any lower-numbered variable not yet seen) on
    /// first use.
    pub fn var(&mut self, var: Var) -> BddFunc {
        while (self.var_nodes.len() as u32) <= var {
            let idx = self.var_nodes.len() as Var;
            let handle = self.mk_node(idx, BddFunc::TRUE, BddFunc::FALSE);
            self.var_nodes.push(handle);
        }
        self.var_nodes[var as usize]
    }

    /// The number of distinct variables allocated so far via [`Self::var`].
    pub fn num_vars(&self) -> u32 {
        self.var_nodes.len() as u32
    }

    fn decompose(&self, f: BddFunc) -> Option<(Var, BddFunc, BddFunc)> {
        if f.is_terminal() {
            None
        } else {
            let n = &self.nodes[f.0];
            Some((n.var, n.then_edge, n.else_edge))
        }
    }

    /// Looks up or creates the (reduced) node `(var, then, else)`.
    fn mk_node(&mut self, var: Var, then_edge: BddFunc, else_edge: BddFunc) -> BddFunc {
        if then_edge == else_edge {
            return then_edge;
        }
        if let Some(&existing) = self.unique_table.get(&(var, then_edge, else_edge)) {
            return existing;
        }
        let handle = BddFunc(self.nodes.len());
        self.nodes.push(Node {
            var,
            then_edge,
            else_edge,
        });
        self.unique_table
            .insert((var, then_edge, else_edge), handle);
        handle
    }

    /// Structural negation. O(1) amortized via [`Self::not_cache`].
    pub fn not(&mut self, f: BddFunc) -> BddFunc {
        if f == BddFunc::FALSE {
            return BddFunc::TRUE;
        }
        if f == BddFunc::TRUE {
            return BddFunc::FALSE;
        }
        if let Some(&cached) = self.not_cache.get(&f) {
            return cached;
        }
        let (var, then_edge, else_edge) = self.decompose(f).expect("non-terminal");
        let then_not = self.not(then_edge);
        let else_not = self.not(else_edge);
        let result = self.mk_node(var, then_not, else_not);
        self.not_cache.insert(f, result);
        result
    }

    /// Conjunction.
    pub fn and(&mut self, a: BddFunc, b: BddFunc) -> BddFunc {
        if a == BddFunc::FALSE || b == BddFunc::FALSE {
            return BddFunc::FALSE;
        }
        if a == BddFunc::TRUE {
            return b;
        }
        if b == BddFunc::TRUE {
            return a;
        }
        if a == b {
            return a;
        }
        let key = if a.0 <= b.0 { (a, b) } else { (b, a) };
        if let Some(&cached) = self.and_cache.get(&key) {
            return cached;
        }
        let result = self.apply_binary(a, b, Self::and);
        self.and_cache.insert(key, result);
        result
    }

    /// Disjunction.
    pub fn or(&mut self, a: BddFunc, b: BddFunc) -> BddFunc {
        if a == BddFunc::TRUE || b == BddFunc::TRUE {
            return BddFunc::TRUE;
        }
        if a == BddFunc::FALSE {
            return b;
        }
        if b == BddFunc::FALSE {
            return a;
        }
        if a == b {
            return a;
        }
        let key = if a.0 <= b.0 { (a, b) } else { (b, a) };
        if let Some(&cached) = self.or_cache.get(&key) {
            return cached;
        }
        let result = self.apply_binary(a, b, Self::or);
        self.or_cache.insert(key, result);
        result
    }

    /// Shared top-variable recursion for [`Self::and`]/[`Self::or`]; both
    /// terminal/equality cases are filtered by the caller before this runs.
    fn apply_binary(
        &mut self,
        a: BddFunc,
        b: BddFunc,
        recurse: fn(&mut Self, BddFunc, BddFunc) -> BddFunc,
    ) -> BddFunc {
        let a_parts = self.decompose(a);
        let b_parts = self.decompose(b);
        let (var, a_then, a_else, b_then, b_else) = match (a_parts, b_parts) {
            (Some((va, at, ae)), Some((vb, bt, be))) => {
                if va == vb {
                    (va, at, ae, bt, be)
                } else if va < vb {
                    (va, at, ae, b, b)
                } else {
                    (vb, a, a, bt, be)
                }
            }
            (Some((va, at, ae)), None) => (va, at, ae, b, b),
            (None, Some((vb, bt, be))) => (vb, a, a, bt, be),
            (None, None) => unreachable!("both terminal handled by caller"),
        };
        let then_edge = recurse(self, a_then, b_then);
        let else_edge = recurse(self, a_else, b_else);
        self.mk_node(var, then_edge, else_edge)
    }

    /// Shannon cofactor: restricts `f` by fixing `var` to `value`.
    ///
    /// Variables above (i.e. ordered later than) `var` that `f` does not
    /// depend on are left untouched; variables `f` never references at all
    /// leave `f` unchanged.
    pub fn restrict(&mut self, f: BddFunc, var: Var, value: bool) -> BddFunc {
        if f.is_terminal() {
            return f;
        }
        let key = (f, var, value);
        if let Some(&cached) = self.restrict_cache.get(&key) {
            return cached;
        }
        let (fvar, then_edge, else_edge) = self.decompose(f).expect("non-terminal");
        let result = match fvar.cmp(&var) {
            std::cmp::Ordering::Equal => {
                if value {
                    then_edge
                } else {
                    else_edge
                }
            }
            std::cmp::Ordering::Greater => f,
            std::cmp::Ordering::Less => {
                let t = self.restrict(then_edge, var, value);
                let e = self.restrict(else_edge, var, value);
                self.mk_node(fvar, t, e)
            }
        };
        self.restrict_cache.insert(key, result);
        result
    }

    /// The positive cofactor of `f` with respect to `var` (`var = 1`).
    pub fn cofactor_pos(&mut self, f: BddFunc, var: Var) -> BddFunc {
        self.restrict(f, var, true)
    }

    /// The negative cofactor of `f` with respect to `var` (`var = 0`).
    pub fn cofactor_neg(&mut self, f: BddFunc, var: Var) -> BddFunc {
        self.restrict(f, var, false)
    }

    /// The set of variables `f` actually depends on (its support).
    pub fn support(&self, f: BddFunc) -> Vec<Var> {
        let mut seen = std::collections::BTreeSet::new();
        self.support_recur(f, &mut seen);
        seen.into_iter().collect()
    }

    fn support_recur(&self, f: BddFunc, seen: &mut std::collections::BTreeSet<Var>) {
        if let Some((var, then_edge, else_edge)) = self.decompose(f) {
            if seen.insert(var) {
                self.support_recur(then_edge, seen);
                self.support_recur(else_edge, seen);
            }
        }
    }

    /// The fraction of the `2^N` assignments over all variables allocated so
    /// far that satisfy `f` — i.e. `CountMinterm(f) / 2^N` (spec §4.5.3),
    /// computed by the recursive `frac(node) = (frac(then) + frac(else)) / 2`
    /// identity, memoized on node identity. Because this manager never skips
    /// a level without both children being structurally equal (the
    /// reduction rule), the recursion is correct without any explicit
    /// per-level weighting.
    pub fn minterm_fraction(&mut self, f: BddFunc) -> f64 {
        if f == BddFunc::FALSE {
            return 0.0;
        }
        if f == BddFunc::TRUE {
            return 1.0;
        }
        if let Some(&cached) = self.frac_cache.get(&f) {
            return cached;
        }
        let (_, then_edge, else_edge) = self.decompose(f).expect("non-terminal");
        let frac = (self.minterm_fraction(then_edge) + self.minterm_fraction(else_edge)) / 2.0;
        self.frac_cache.insert(f, frac);
        frac
    }

    /// `CountMinterm(f)` over `n_vars` variables: the absolute count of
    /// satisfying assignments, derived from [`Self::minterm_fraction`].
    pub fn count_minterm(&mut self, f: BddFunc, n_vars: u32) -> f64 {
        self.minterm_fraction(f) * 2f64.powi(n_vars as i32)
    }

    /// Enumerates the BDD's satisfying paths as cubes (one entry per
    /// variable: `Some(true)`, `Some(false)`, or `None` for a don't-care the
    /// function never branches on along that path).
    pub fn sat_cubes(&self, f: BddFunc) -> Vec<Vec<Option<bool>>> {
        let n = self.num_vars() as usize;
        let mut out = Vec::new();
        let mut path = vec![None; n];
        self.sat_cubes_recur(f, &mut path, &mut out);
        out
    }

    fn sat_cubes_recur(
        &self,
        f: BddFunc,
        path: &mut [Option<bool>],
        out: &mut Vec<Vec<Option<bool>>>,
    ) {
        if f == BddFunc::FALSE {
            return;
        }
        if f == BddFunc::TRUE {
            out.push(path.to_vec());
            return;
        }
        let (var, then_edge, else_edge) = self.decompose(f).expect("non-terminal");
        path[var as usize] = Some(true);
        self.sat_cubes_recur(then_edge, path, out);
        path[var as usize] = Some(false);
        self.sat_cubes_recur(else_edge, path, out);
        path[var as usize] = None;
    }

    /// Runs a reordering pass. This manager never actually reorders
    /// variables, so cached handles trivially remain valid across calls;
    /// see `DESIGN.md` Open Question #4. The configured `reorder_method` is
    /// read by the caller only to decide whether to invoke this at all.
    pub fn reorder(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_is_true_on_one_false_on_zero() {
        let mut m = BddManager::new();
        let x = m.var(0);
        assert_eq!(m.restrict(x, 0, true), BddFunc::TRUE);
        assert_eq!(m.restrict(x, 0, false), BddFunc::FALSE);
    }

    #[test]
    fn not_involution() {
        let mut m = BddManager::new();
        let x = m.var(0);
        let nx = m.not(x);
        assert_ne!(nx, x);
        assert_eq!(m.not(nx), x);
    }

    #[test]
    fn and_truth_table() {
        let mut m = BddManager::new();
        let x = m.var(0);
        let y = m.var(1);
        let f = m.and(x, y);
        assert_eq!(m.restrict(m.restrict(f, 0, true), 1, true), BddFunc::TRUE);
        assert_eq!(m.restrict(m.restrict(f, 0, true), 1, false), BddFunc::FALSE);
        assert_eq!(m.restrict(m.restrict(f, 0, false), 1, true), BddFunc::FALSE);
        assert_eq!(
            m.restrict(m.restrict(f, 0, false), 1, false),
            BddFunc::FALSE
        );
    }

    #[test]
    fn or_truth_table() {
        let mut m = BddManager::new();
        let x = m.var(0);
        let y = m.var(1);
        let f = m.or(x, y);
        assert_eq!(m.restrict(m.restrict(f, 0, false), 1, false), BddFunc::FALSE);
        assert_eq!(m.restrict(m.restrict(f, 0, true), 1, false), BddFunc::TRUE);
        assert_eq!(m.restrict(m.restrict(f, 0, false), 1, true), BddFunc::TRUE);
    }

    #[test]
    fn reconvergent_fanout_collapses_to_constant() {
        // y = a & !a should reduce to the constant FALSE function.
        let mut m = BddManager::new();
        let a = m.var(0);
        let not_a = m.not(a);
        let y = m.and(a, not_a);
        assert_eq!(y, BddFunc::FALSE);
    }

    #[test]
    fn minterm_fraction_of_and_is_one_quarter() {
        let mut m = BddManager::new();
        let x = m.var(0);
        let y = m.var(1);
        let f = m.and(x, y);
        assert!((m.minterm_fraction(f) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn minterm_fraction_of_or_is_three_quarters() {
        let mut m = BddManager::new();
        let x = m.var(0);
        let y = m.var(1);
        let f = m.or(x, y);
        assert!((m.minterm_fraction(f) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn minterm_fraction_ignores_unreferenced_variable() {
        // f depends only on x0; over 2 variables it should still be 1/2.
        let mut m = BddManager::new();
        let x = m.var(0);
        let _y = m.var(1);
        assert!((m.minterm_fraction(x) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn count_minterm_matches_fraction_times_two_to_n() {
        let mut m = BddManager::new();
        let x = m.var(0);
        let y = m.var(1);
        let f = m.and(x, y);
        assert!((m.count_minterm(f, m.num_vars()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn support_excludes_dont_care_inputs() {
        let mut m = BddManager::new();
        let x = m.var(0);
        let _y = m.var(1);
        assert_eq!(m.support(x), vec![0]);
    }

    #[test]
    fn support_of_and_includes_both_vars() {
        let mut m = BddManager::new();
        let x = m.var(0);
        let y = m.var(1);
        let f = m.and(x, y);
        assert_eq!(m.support(f), vec![0, 1]);
    }

    #[test]
    fn sat_cubes_of_and_has_one_cube() {
        let mut m = BddManager::new();
        let x = m.var(0);
        let y = m.var(1);
        let f = m.and(x, y);
        let cubes = m.sat_cubes(f);
        assert_eq!(cubes, vec![vec![Some(true), Some(true)]]);
    }

    #[test]
    fn sat_cubes_of_single_var_has_dont_care() {
        let mut m = BddManager::new();
        let x = m.var(0);
        let _y = m.var(1);
        let cubes = m.sat_cubes(x);
        assert_eq!(cubes, vec![vec![Some(true), None]]);
    }

    #[test]
    fn and_is_commutative_in_cache_key() {
        let mut m = BddManager::new();
        let x = m.var(0);
        let y = m.var(1);
        assert_eq!(m.and(x, y), m.and(y, x));
    }

    #[test]
    fn de_morgan_and_via_or_not() {
        let mut m = BddManager::new();
        let x = m.var(0);
        let y = m.var(1);
        let and_direct = m.and(x, y);
        let nx = m.not(x);
        let ny = m.not(y);
        let or_of_nots = m.or(nx, ny);
        let de_morgan = m.not(or_of_nots);
        assert_eq!(and_direct, de_morgan);
    }
}
