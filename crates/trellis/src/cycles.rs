//! Cycle detection over a [`Graph`].
//!
//! # Overview
//!
//! Directed graphs may or may not contain cycles; the store's optional
//! add-edge check and any caller reasoning about topology need a cheap,
//! deterministic answer. This module provides the boolean check
//! ([`exists_cycle`]) and full enumeration ([`find_cycles`]).
//!
//! # Design
//!
//! - **Three-state sweep**: classic white/gray/black coloring. A cycle exists
//!   iff a walk reaches a gray vertex (one still on the current path).
//! - **Iterative**: the walk keeps an explicit frame stack instead of
//!   recursing, so adversarially deep graphs cannot overflow the call stack.
//! - **Memoized**: vertices proven cycle-free stay black across the outer
//!   loop's starting points, giving O(V+E) for the whole sweep.
//! - **Undirected rule**: an undirected graph is cyclic by definition — every
//!   mirrored edge offers an immediate return path, an edgeless graph
//!   included. A cycle-checking undirected graph would therefore reject every
//!   edge, which is why [`Graph::undirected`] never enables checking.
//!
//! # Usage
//!
//! ```rust,ignore
//! if cycles::exists_cycle(&graph) {
//!     for cycle in cycles::find_cycles(&graph) {
//!         println!("closed path: {cycle:?}");
//!     }
//! }
//! ```

#![allow(clippy::must_use_candidate)]

use std::collections::HashMap;

use tracing::{instrument, trace};

use crate::id::VertexId;
use crate::store::Graph;

// ---------------------------------------------------------------------------
// Public checks
// ---------------------------------------------------------------------------

/// Returns `true` if the graph contains at least one cycle.
///
/// Undirected graphs always report `true` (see the module docs). Directed
/// graphs are swept vertex by vertex in ascending-id order, short-circuiting
/// on the first back edge.
#[instrument(skip(graph), level = "trace")]
pub fn exists_cycle<V, E>(graph: &Graph<V, E>) -> bool {
    if !graph.is_directed() {
        return true;
    }

    let mut colors: HashMap<VertexId, Color> = HashMap::new();
    for start in graph.ids() {
        if color_of(&colors, start) != Color::White {
            continue;
        }
        if sweep_hits_back_edge(graph, start, &mut colors) {
            return true;
        }
    }
    false
}

/// Enumerate every cycle discovered by the sweep.
///
/// Each cycle is a closed path: the entry vertex appears first and again
/// last, e.g. `[a, b, c, a]` for a three-vertex ring and `[a, a]` for a
/// self-loop. One cycle is recorded per back edge met, so rings sharing
/// vertices are reported separately. Start order is ascending by id and
/// adjacency is walked in insertion order, making the output deterministic
/// for a given construction sequence.
///
/// Undirected graphs get no special treatment here: the sweep simply finds
/// each mirrored pair as a two-vertex closed path.
#[instrument(skip(graph), level = "trace")]
pub fn find_cycles<V, E>(graph: &Graph<V, E>) -> Vec<Vec<VertexId>> {
    let mut cycles = Vec::new();
    let mut colors: HashMap<VertexId, Color> = HashMap::new();

    for start in graph.ids() {
        if color_of(&colors, start) == Color::White {
            collect_cycles_from(graph, start, &mut colors, &mut cycles);
        }
    }

    trace!(found = cycles.len(), "cycle sweep complete");
    cycles
}

// ---------------------------------------------------------------------------
// Sweep internals
// ---------------------------------------------------------------------------

/// Sweep colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not yet visited.
    White,
    /// On the current walk's path.
    Gray,
    /// Fully processed; proven cycle-free for the rest of the sweep.
    Black,
}

fn color_of(colors: &HashMap<VertexId, Color>, id: VertexId) -> Color {
    colors.get(&id).copied().unwrap_or(Color::White)
}

/// One gray vertex on the current path, with a cursor over its adjacency.
///
/// The stack of frames *is* the path, which lets cycle reconstruction read
/// the closed sub-path straight out of it.
struct Frame {
    vertex: VertexId,
    edges: Vec<VertexId>,
    next: usize,
}

impl Frame {
    fn new<V, E>(graph: &Graph<V, E>, vertex: VertexId) -> Self {
        Self {
            vertex,
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

/// Walk from `start`, returning `true` on the first edge into a gray vertex.
fn sweep_hits_back_edge<V, E>(
    graph: &Graph<V, E>,
    start: VertexId,
    colors: &mut HashMap<VertexId, Color>,
) -> bool {
    colors.insert(start, Color::Gray);
    let mut stack = vec![Frame::new(graph, start)];

    while let Some(frame) = stack.last_mut() {
        let Some(next) = frame.advance() else {
            colors.insert(frame.vertex, Color::Black);
            stack.pop();
            continue;
        };
        match color_of(colors, next) {
            Color::Gray => return true,
            Color::Black => {}
            Color::White => {
                colors.insert(next, Color::Gray);
                stack.push(Frame::new(graph, next));
            }
        }
    }
    false
}

/// Walk from `start`, recording one closed sub-path per back edge met.
fn collect_cycles_from<V, E>(
    graph: &Graph<V, E>,
    start: VertexId,
    colors: &mut HashMap<VertexId, Color>,
    cycles: &mut Vec<Vec<VertexId>>,
) {
    colors.insert(start, Color::Gray);
    let mut stack = vec![Frame::new(graph, start)];

    while let Some(frame) = stack.last_mut() {
        let Some(next) = frame.advance() else {
            colors.insert(frame.vertex, Color::Black);
            stack.pop();
            continue;
        };
        match color_of(colors, next) {
            Color::Gray => {
                // Back edge. The closed sub-path runs from the first
                // occurrence of `next` on the path through the current
                // vertex, then repeats `next` to close the loop.
                if let Some(pos) = stack.iter().position(|f| f.vertex == next) {
                    let mut cycle: Vec<VertexId> =
                        stack[pos..].iter().map(|f| f.vertex).collect();
                    cycle.push(next);
                    trace!(len = cycle.len() - 1, "cycle recorded");
                    cycles.push(cycle);
                }
            }
            Color::Black => {}
            Color::White => {
                colors.insert(next, Color::Gray);
                stack.push(Frame::new(graph, next));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
