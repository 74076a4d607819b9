//! Opaque ID newtypes for timing graph entities.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a node in the timing graph.
    NodeId
);

define_id!(
    /// Opaque, copyable ID for an edge in the timing graph.
    EdgeId
);

/// Opaque, copyable ID for a clock domain.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DomainId(u32);

impl DomainId {
    /// The sentinel used when a node carries no clock domain.
    pub const INVALID: DomainId = DomainId(u32::MAX);

    /// Creates a domain ID from a raw `u32` index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index.
    pub fn as_raw(self) -> u32 {
        self.0
    }

    /// `true` if this is the [`DomainId::INVALID`] sentinel.
    pub fn is_valid(self) -> bool {
        self != DomainId::INVALID
    }
}
