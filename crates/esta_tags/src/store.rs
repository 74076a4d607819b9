//! The per-node tag store: an arena of [`ExtTimingTag`]s plus, for every
//! node, the set of clock tags and the set of data tags currently live
//! there, each set de-duplicated by the `(domain, transition, delay-bin)`
//! match predicate.

use std::collections::HashMap;

use esta_config::types::BinPolicy;
use esta_graph::NodeId;

use crate::binning::{bin_arrival, Bin};
use crate::tag::{ExtTimingTag, TagHandle};

/// Which of a node's two tag sets an operation targets.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TagKind {
    /// Tags launched from a clock pin (carry `Transition::Clock`).
    Clock,
    /// Tags launched from ordinary data propagation.
    Data,
}

/// The `(domain, transition, delay-bin)` key a node's tag sets are indexed
/// by for O(1) merge lookup (spec §3's tag-store contract).
type MatchKey = (esta_graph::DomainId, esta_common::Transition, Bin);

/// The tag arena and per-node tag sets for one analysis run.
#[derive(Debug, Default)]
pub struct TagStore {
    tags: Vec<ExtTimingTag>,
    clock_tags: Vec<Vec<TagHandle>>,
    data_tags: Vec<Vec<TagHandle>>,
    clock_index: Vec<HashMap<MatchKey, TagHandle>>,
    data_index: Vec<HashMap<MatchKey, TagHandle>>,
}

impl TagStore {
    /// Creates a tag store sized for `num_nodes` nodes, all starting with
    /// empty clock and data tag sets.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            tags: Vec::new(),
            clock_tags: vec![Vec::new(); num_nodes],
            data_tags: vec![Vec::new(); num_nodes],
            clock_index: vec![HashMap::new(); num_nodes],
            data_index: vec![HashMap::new(); num_nodes],
        }
    }

    /// Resolves a handle to its tag.
    pub fn get(&self, handle: TagHandle) -> &ExtTimingTag {
        &self.tags[handle.as_raw() as usize]
    }

    /// The clock tags currently live at `node`.
    pub fn clock_tags(&self, node: NodeId) -> &[TagHandle] {
        &self.clock_tags[node.as_raw() as usize]
    }

    /// The data tags currently live at `node`.
    pub fn data_tags(&self, node: NodeId) -> &[TagHandle] {
        &self.data_tags[node.as_raw() as usize]
    }

    /// All tags currently live at `node`, clock tags first.
    pub fn tags_at(&self, node: NodeId) -> impl Iterator<Item = TagHandle> + '_ {
        self.clock_tags(node)
            .iter()
            .chain(self.data_tags(node).iter())
            .copied()
    }

    fn set_for(&mut self, node: NodeId, kind: TagKind) -> &mut Vec<TagHandle> {
        let idx = node.as_raw() as usize;
        match kind {
            TagKind::Clock => &mut self.clock_tags[idx],
            TagKind::Data => &mut self.data_tags[idx],
        }
    }

    fn index_for(&mut self, node: NodeId, kind: TagKind) -> &mut HashMap<MatchKey, TagHandle> {
        let idx = node.as_raw() as usize;
        match kind {
            TagKind::Clock => &mut self.clock_index[idx],
            TagKind::Data => &mut self.data_index[idx],
        }
    }

    /// Inserts `candidate` into `node`'s tag set of the given `kind`.
    ///
    /// If an existing tag in that set matches `candidate` under
    /// `(domain, transition, delay-bin)`, `candidate` is merged into it
    /// (arrival → max, launch node follows the winning arrival, scenarios
    /// concatenated) and the existing handle is returned. Otherwise
    /// `candidate` is allocated as a new tag and its fresh handle is
    /// returned.
    ///
    /// The common case — `candidate`'s transition is a concrete event, never
    /// `Max` — resolves in O(1) via the node's `(domain, transition, bin)`
    /// index (spec §3). Only a `Max`-transition candidate, which the match
    /// predicate lets wildcard-match any transition already on file for its
    /// domain, falls back to a linear scan of the existing set.
    pub fn insert(
        &mut self,
        node: NodeId,
        kind: TagKind,
        candidate: ExtTimingTag,
        bin_policy: &BinPolicy,
        sta_critical_delay: f64,
    ) -> TagHandle {
        let candidate_bin = bin_arrival(bin_policy, candidate.arrival(), sta_critical_delay);
        let key = (candidate.domain(), candidate.transition(), candidate_bin);

        if let Some(&handle) = self.index_for(node, kind).get(&key) {
            self.tags[handle.as_raw() as usize].merge_from(&candidate);
            return handle;
        }

        if candidate.transition() == esta_common::Transition::Max {
            let existing = self.set_for(node, kind).clone();
            for handle in existing {
                let tag = &self.tags[handle.as_raw() as usize];
                if tag.same_domain_and_transition(&candidate)
                    && bin_arrival(bin_policy, tag.arrival(), sta_critical_delay) == candidate_bin
                {
                    self.tags[handle.as_raw() as usize].merge_from(&candidate);
                    return handle;
                }
            }
        }

        let handle = TagHandle::from_raw(self.tags.len() as u32);
        let insert_key = (candidate.domain(), candidate.transition(), candidate_bin);
        self.tags.push(candidate);
        self.set_for(node, kind).push(handle);
        self.index_for(node, kind).insert(insert_key, handle);
        handle
    }

    /// Groups the tag handles at `node` of the given `kind` by their
    /// `(domain, transition, delay-bin)` key. Used by the propagation
    /// engine to enumerate distinct tag groups before taking the
    /// Cartesian product across a node's fanin.
    pub fn group_by_bin(
        &self,
        node: NodeId,
        kind: TagKind,
        bin_policy: &BinPolicy,
        sta_critical_delay: f64,
    ) -> HashMap<(esta_graph::DomainId, esta_common::Transition, Bin), Vec<TagHandle>> {
        let mut groups: HashMap<_, Vec<TagHandle>> = HashMap::new();
        for &handle in self.set_for_read(node, kind) {
            let tag = self.get(handle);
            let key = (
                tag.domain(),
                tag.transition(),
                bin_arrival(bin_policy, tag.arrival(), sta_critical_delay),
            );
            groups.entry(key).or_default().push(handle);
        }
        groups
    }

    fn set_for_read(&self, node: NodeId, kind: TagKind) -> &[TagHandle] {
        match kind {
            TagKind::Clock => self.clock_tags(node),
            TagKind::Data => self.data_tags(node),
        }
    }

    /// The tags live at `node` of the given `kind`.
    pub fn tags_of_kind(&self, node: NodeId, kind: TagKind) -> &[TagHandle] {
        self.set_for_read(node, kind)
    }

    /// The total number of tags allocated across every node.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// `true` if no tags have been allocated.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
