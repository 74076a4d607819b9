//! The extended timing tag: a clock domain, launch node, transition, and
//! arrival time, annotated with the set of primary-input switching
//! scenarios that produce it.

use esta_common::Transition;
use esta_graph::{DomainId, NodeId};

/// An opaque handle to a tag held by a [`crate::TagStore`].
///
/// Stable for the lifetime of the store: tags are never moved or removed
/// once allocated, so a handle recorded in one tag's scenario list (an
/// "input tag handle") stays valid for the rest of the analysis run.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TagHandle(u32);

impl TagHandle {
    /// Creates a handle from a raw arena index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw arena index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// A conjunction of primary-input tag handles: "all of these input tags are
/// simultaneously active."
pub type Conjunction = Vec<TagHandle>;

/// The disjunction (OR) of the conjunctions that produce a tag: "any one of
/// these input-tag combinations is sufficient."
pub type Scenario = Vec<Conjunction>;

/// An extended timing tag.
#[derive(Clone, Debug)]
pub struct ExtTimingTag {
    domain: DomainId,
    launch_node: NodeId,
    transition: Transition,
    arrival: f64,
    scenarios: Scenario,
}

impl ExtTimingTag {
    /// Creates a tag with a single conjunction as its scenario (the common
    /// case when a tag is first produced by propagation, before any merge).
    pub fn new(
        domain: DomainId,
        launch_node: NodeId,
        transition: Transition,
        arrival: f64,
        conjunction: Conjunction,
    ) -> Self {
        Self {
            domain,
            launch_node,
            transition,
            arrival,
            scenarios: vec![conjunction],
        }
    }

    /// Creates a tag with no prior switching conditions, used to seed
    /// primary-input source nodes before the forward sweep begins.
    pub fn seed(domain: DomainId, launch_node: NodeId, transition: Transition, arrival: f64) -> Self {
        Self {
            domain,
            launch_node,
            transition,
            arrival,
            scenarios: vec![Vec::new()],
        }
    }

    /// This tag's clock domain.
    pub fn domain(&self) -> DomainId {
        self.domain
    }

    /// The node that launched this tag's timing path.
    pub fn launch_node(&self) -> NodeId {
        self.launch_node
    }

    /// This tag's transition.
    pub fn transition(&self) -> Transition {
        self.transition
    }

    /// This tag's arrival time.
    pub fn arrival(&self) -> f64 {
        self.arrival
    }

    /// This tag's switching scenarios: an OR of ANDs of input-tag handles.
    pub fn scenarios(&self) -> &Scenario {
        &self.scenarios
    }

    /// `true` if `self` and `other` share the `(domain, transition)` pair a
    /// match predicate additionally refines by delay bin.
    ///
    /// `other` is the incoming side of the comparison (e.g. the candidate
    /// tag being inserted into a [`crate::TagStore`]): if it carries
    /// `Transition::Max` it matches any transition already in the same
    /// domain, the wildcard circuit-max aggregation relies on to merge a
    /// domain's retagged candidates into one running max-tag set.
    pub fn same_domain_and_transition(&self, other: &ExtTimingTag) -> bool {
        self.domain == other.domain
            && (self.transition == other.transition || other.transition == Transition::Max)
    }

    /// Merges `other` into `self` in place: per the merge rule, the arrival
    /// becomes the max of the two, the launch node follows whichever
    /// arrival won, and the scenario becomes the union (concatenation) of
    /// both tags' conjunctions.
    pub fn merge_from(&mut self, other: &ExtTimingTag) {
        if other.arrival > self.arrival {
            self.arrival = other.arrival;
            self.launch_node = other.launch_node;
        }
        self.scenarios.extend(other.scenarios.iter().cloned());
    }
}
