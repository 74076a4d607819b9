//! Cartesian-product permutation generation over a node's per-fanin tag
//! sets, with the configured permutation budget enforced before any
//! permutation is materialized.

use esta_common::{EstaError, EstaResult};
use esta_graph::NodeId;
use esta_tags::TagHandle;

/// Generates every combination obtained by choosing one tag from each
/// fanin's tag list, in fanin order.
///
/// Fails with [`EstaError::PermutationBudgetExceeded`] if the product of the
/// per-fanin tag counts exceeds `budget` (a `budget` of `0` means
/// unbounded), checked *before* any combination is built so the budget
/// bounds peak memory, not just final output size.
pub fn generate_permutations(
    node: NodeId,
    per_fanin_tags: &[Vec<TagHandle>],
    budget: u64,
) -> EstaResult<Vec<Vec<TagHandle>>> {
    let count: u64 = per_fanin_tags
        .iter()
        .map(|tags| tags.len() as u64)
        .product();
    if budget != 0 && count > budget {
        return Err(EstaError::PermutationBudgetExceeded {
            node: node.as_raw(),
            count,
            budget,
        });
    }

    let mut combinations: Vec<Vec<TagHandle>> = vec![Vec::new()];
    for tags in per_fanin_tags {
        let mut next = Vec::with_capacity(combinations.len() * tags.len().max(1));
        for combo in &combinations {
            for &tag in tags {
                let mut extended = combo.clone();
                extended.push(tag);
                next.push(extended);
            }
        }
        combinations = next;
    }
    Ok(combinations)
}
