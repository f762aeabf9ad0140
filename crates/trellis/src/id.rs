//! Opaque vertex identity.
//!
//! Every vertex in a [`Graph`](crate::Graph) is keyed by a [`VertexId`], a
//! 128-bit value with no internal structure. Fresh ids come from
//! [`VertexId::generate`] (random, collision odds are negligible); callers
//! that manage their own identity space mint ids with
//! [`VertexId::from_u128`]. The store's duplicate detection exists for that
//! second path.

use std::fmt;

/// Opaque 128-bit identity of a vertex, unique within a graph.
///
/// Ids are plain values: `Copy`, hashable, and totally ordered, so they key
/// the store's map directly and give every iteration in the engine a
/// deterministic (ascending-id) order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(u128);

impl VertexId {
    /// Generate a fresh random identity.
    #[must_use]
    pub fn generate() -> Self {
        Self(rand::random::<u128>())
    }

    /// Construct an identity from an explicit 128-bit value.
    #[must_use]
    pub const fn from_u128(raw: u128) -> Self {
        Self(raw)
    }

    /// The raw 128-bit value.
    #[must_use]
    pub const fn as_u128(self) -> u128 {
        self.0
    }
}

impl From<u128> for VertexId {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl fmt::Debug for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VertexId({:032x})", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
