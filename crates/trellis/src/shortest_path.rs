//! Weighted least-cost paths over a [`Graph`].
//!
//! # Overview
//!
//! [`find_shortest_path`] runs a Dijkstra-style search and returns the full
//! route as a sequence of [`PathPoint`]s — vertex snapshots paired with the
//! cumulative weight accrued from the source. The sequence reads
//! source-to-target inclusive, starts at weight `0`, and is monotonically
//! non-decreasing.
//!
//! # Design
//!
//! - **Sealed set**: a vertex is sealed when popped with its final label;
//!   the search stops the moment the target seals.
//! - **Frontier heap**: `BinaryHeap` over `Candidate`s whose `Ord` is
//!   reversed, so the max-heap pops the cheapest label first. Revising a
//!   label pushes a fresh entry; stale ones are discarded on pop by the
//!   sealed check.
//! - **Strictly-cheaper relaxation**: a known label is only replaced by a
//!   strictly smaller one, so equal-cost routes resolve to the first one
//!   sealed (deterministic via ascending-id tie-breaking in the heap).
//! - **Non-negative weights**: assumed, not checked. Negative weights void
//!   the sealed-set reasoning and the result is unspecified.
//!
//! # Usage
//!
//! ```rust,ignore
//! let route = shortest_path::find_shortest_path(&graph, a, c)?;
//! for point in &route {
//!     println!("{} at cost {}", point.vertex.id, point.cumulative_weight);
//! }
//! ```

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::{instrument, trace};

use crate::error::{GraphError, Result};
use crate::id::VertexId;
use crate::store::{Graph, Vertex};

// ---------------------------------------------------------------------------
// PathPoint
// ---------------------------------------------------------------------------

/// One step of a computed route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPoint<V> {
    /// Snapshot of the vertex at this step.
    pub vertex: Vertex<V>,
    /// Total weight accrued from the source up to this vertex; `0` at the
    /// source itself.
    pub cumulative_weight: i64,
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Compute the least-cost route `from → … → to`.
///
/// A route needs at least one edge, so querying a vertex against itself
/// reports no route regardless of self-loops. Edge weights must be
/// non-negative (unchecked precondition).
///
/// # Errors
///
/// - [`GraphError::VertexNotFound`] if either endpoint is absent.
/// - [`GraphError::NoRoute`] if no path connects the pair, or `from == to`.
#[instrument(skip(graph), level = "trace")]
pub fn find_shortest_path<V, E>(
    graph: &Graph<V, E>,
    from: VertexId,
    to: VertexId,
) -> Result<Vec<PathPoint<V>>>
where
    V: Clone,
{
    graph.ensure_vertex(from)?;
    graph.ensure_vertex(to)?;
    if from == to {
        return Err(GraphError::NoRoute { from, to });
    }

    let mut best: HashMap<VertexId, i64> = HashMap::from([(from, 0)]);
    let mut predecessor: HashMap<VertexId, VertexId> = HashMap::new();
    let mut sealed: HashSet<VertexId> = HashSet::new();
    let mut frontier = BinaryHeap::from([Candidate {
        weight: 0,
        vertex: from,
    }]);

    while let Some(Candidate { weight, vertex }) = frontier.pop() {
        if !sealed.insert(vertex) {
            // A cheaper label for this vertex was already sealed; this entry
            // is stale.
            continue;
        }
        if vertex == to {
            trace!(%to, weight, "target sealed");
            return Ok(reconstruct(graph, &predecessor, &best, from, to));
        }

        for (next, edge_weight) in graph.adjacency(vertex) {
            if sealed.contains(&next) {
                continue;
            }
            let candidate_weight = weight + edge_weight;
            match best.get(&next) {
                Some(&known) if known <= candidate_weight => {}
                _ => {
                    best.insert(next, candidate_weight);
                    predecessor.insert(next, vertex);
                    frontier.push(Candidate {
                        weight: candidate_weight,
                        vertex: next,
                    });
                }
            }
        }
    }

    Err(GraphError::NoRoute { from, to })
}

/// Walk predecessor links target-back-to-source, then flip the result so it
/// reads source-to-target. Every vertex on the chain was sealed, so its
/// label and record are present.
fn reconstruct<V, E>(
    graph: &Graph<V, E>,
    predecessor: &HashMap<VertexId, VertexId>,
    best: &HashMap<VertexId, i64>,
    from: VertexId,
    to: VertexId,
) -> Vec<PathPoint<V>>
where
    V: Clone,
{
    let mut order = vec![to];
    let mut current = to;
    while current != from {
        let Some(&prev) = predecessor.get(&current) else {
            break;
        };
        order.push(prev);
        current = prev;
    }
    order.reverse();

    order
        .into_iter()
        .filter_map(|id| {
            let vertex = graph.get_vertex(id)?;
            let &cumulative_weight = best.get(&id)?;
            Some(PathPoint {
                vertex,
                cumulative_weight,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Frontier ordering
// ---------------------------------------------------------------------------

/// A frontier entry: the best-known cumulative weight for a vertex at the
/// time it was pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    weight: i64,
    vertex: VertexId,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the cheapest candidate; weight ties
        // break on ascending vertex id to keep exploration deterministic.
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
