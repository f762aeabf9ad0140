//! Point-to-point search over a [`Graph`].
//!
//! # Overview
//!
//! [`breadth_first_search`] and [`depth_first_search`] answer the same
//! question — is `to` reachable from `from` along outgoing edges? — differing
//! only in exploration order. Both return the target vertex as a snapshot
//! when a path exists and `Ok(None)` when none does: absence of a path is a
//! normal negative result, not a fault.
//!
//! # Design
//!
//! - **BFS**: level-by-level via a FIFO queue.
//! - **DFS**: eager descent along each edge in adjacency order, driven by an
//!   explicit cursor stack so deep graphs cannot overflow the call stack. The
//!   visiting order matches the recursive formulation exactly.
//! - **Visited bookkeeping**: each vertex is entered at most once per call,
//!   which guarantees termination on cyclic graphs.
//! - **Target is met on edges**: the search recognizes `to` on the edges
//!   leading into it, never by inspecting the start. A vertex is therefore
//!   reachable from itself only through a self-loop or a cycle; with neither,
//!   searching from a vertex to itself reports `Ok(None)`.
//!
//! # Usage
//!
//! ```rust,ignore
//! match traverse::breadth_first_search(&graph, a, b)? {
//!     Some(vertex) => println!("reached {}", vertex.id),
//!     None => println!("no path"),
//! }
//! ```

use std::collections::{HashSet, VecDeque};

use tracing::instrument;

use crate::error::Result;
use crate::id::VertexId;
use crate::store::{Graph, Vertex};

// ---------------------------------------------------------------------------
// Searches
// ---------------------------------------------------------------------------

/// Breadth-first search for a path `from → … → to`.
///
/// Returns a snapshot of the target on success, `Ok(None)` if it is
/// unreachable.
///
/// # Errors
///
/// Returns [`GraphError::VertexNotFound`](crate::GraphError::VertexNotFound)
/// if either endpoint is absent.
#[instrument(skip(graph), level = "trace")]
pub fn breadth_first_search<V, E>(
    graph: &Graph<V, E>,
    from: VertexId,
    to: VertexId,
) -> Result<Option<Vertex<V>>>
where
    V: Clone,
{
    graph.ensure_vertex(from)?;
    graph.ensure_vertex(to)?;

    let mut visited: HashSet<VertexId> = HashSet::from([from]);
    let mut queue: VecDeque<VertexId> = VecDeque::from([from]);

    while let Some(current) = queue.pop_front() {
        for (next, _) in graph.adjacency(current) {
            if next == to {
                return Ok(graph.get_vertex(to));
            }
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    Ok(None)
}

/// Depth-first search for a path `from → … → to`.
///
/// Returns a snapshot of the target on success, `Ok(None)` if it is
/// unreachable.
///
/// # Errors
///
/// Returns [`GraphError::VertexNotFound`](crate::GraphError::VertexNotFound)
/// if either endpoint is absent.
#[instrument(skip(graph), level = "trace")]
pub fn depth_first_search<V, E>(
    graph: &Graph<V, E>,
    from: VertexId,
    to: VertexId,
) -> Result<Option<Vertex<V>>>
where
    V: Clone,
{
    graph.ensure_vertex(from)?;
    graph.ensure_vertex(to)?;

    let mut visited: HashSet<VertexId> = HashSet::from([from]);
    let mut stack = vec![Cursor::new(graph, from)];

    while let Some(cursor) = stack.last_mut() {
        let Some(next) = cursor.advance() else {
            stack.pop();
            continue;
        };
        if next == to {
            return Ok(graph.get_vertex(to));
        }
        if visited.insert(next) {
            stack.push(Cursor::new(graph, next));
        }
    }
    Ok(None)
}

// ---------------------------------------------------------------------------
// DFS internals
// ---------------------------------------------------------------------------

/// Progress through one vertex's adjacency during the descent.
struct Cursor {
    edges: Vec<VertexId>,
    next: usize,
}

impl Cursor {
    fn new<V, E>(graph: &Graph<V, E>, vertex: VertexId) -> Self {
        Self {
            edges: graph.adjacency(vertex).map(|(to, _)| to).collect(),
            next: 0,
        }
    }

    fn advance(&mut self) -> Option<VertexId> {
        let edge = self.edges.get(self.next).copied()?;
        self.next += 1;
        Some(edge)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
