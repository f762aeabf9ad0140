//! Transitive dependent-set resolution over a [`Graph`].
//!
//! # Overview
//!
//! An edge `a → b` reads "`a` depends on `b`". [`dependents_of`] answers the
//! inverse question for a set of starting vertices: which vertices depend,
//! directly or transitively, on any of them — everything that would be
//! affected if the starts changed.
//!
//! # Design
//!
//! - **Reverse index**: one pass over the store builds a dependers-of map,
//!   then a FIFO closure walk collects every vertex that reaches a start
//!   through at least one backward step. Starts themselves are therefore
//!   excluded unless a cycle leads back into them.
//! - **Verified ordering**: the result is a topological order of the induced
//!   sub-graph (Kahn's algorithm), so a depender always precedes what it
//!   depends on. The ready set drains through a min-heap, making the order
//!   deterministic: ascending id among vertices that are simultaneously free.
//! - **Cyclic remainder**: members Kahn cannot free — cycle participants and
//!   anything orderable only after them — have no valid position; they are
//!   appended after the ordered prefix in ascending id order.
//!
//! # Usage
//!
//! ```rust,ignore
//! let affected = dependents::dependents_of(&graph, &[changed])?;
//! for vertex in affected {
//!     rebuild(&vertex);
//! }
//! ```

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap, HashSet, VecDeque};

use tracing::{instrument, trace};

use crate::error::Result;
use crate::id::VertexId;
use crate::store::{Graph, Vertex};

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Collect every vertex that transitively depends on any of `starts`,
/// ordered so that no vertex precedes one that depends on it.
///
/// The starting vertices are not part of the result unless a dependency
/// cycle re-reaches them. An empty `starts` resolves to an empty set.
///
/// # Errors
///
/// Returns [`GraphError::VertexNotFound`](crate::GraphError::VertexNotFound)
/// if any starting id is absent; the whole call fails, there is no partial
/// result.
#[instrument(skip(graph), level = "trace")]
pub fn dependents_of<V, E>(graph: &Graph<V, E>, starts: &[VertexId]) -> Result<Vec<Vertex<V>>>
where
    V: Clone,
{
    for &start in starts {
        graph.ensure_vertex(start)?;
    }

    let dependers = reverse_index(graph);
    let members = closure(&dependers, starts);
    let ordered = kahn_order(graph, &members);

    trace!(members = ordered.len(), "dependent set resolved");
    Ok(ordered
        .into_iter()
        .filter_map(|id| graph.get_vertex(id))
        .collect())
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

/// Map each vertex to the vertices holding an edge into it.
fn reverse_index<V, E>(graph: &Graph<V, E>) -> HashMap<VertexId, Vec<VertexId>> {
    let mut dependers: HashMap<VertexId, Vec<VertexId>> = HashMap::new();
    for from in graph.ids() {
        for (to, _) in graph.adjacency(from) {
            dependers.entry(to).or_default().push(from);
        }
    }
    dependers
}

/// Everything reachable from `starts` through one or more backward steps.
fn closure(
    dependers: &HashMap<VertexId, Vec<VertexId>>,
    starts: &[VertexId],
) -> HashSet<VertexId> {
    let mut members: HashSet<VertexId> = HashSet::new();
    let mut expanded: HashSet<VertexId> = HashSet::new();
    let mut queue: VecDeque<VertexId> = VecDeque::new();

    for &start in starts {
        if expanded.insert(start) {
            queue.push_back(start);
        }
    }
    while let Some(current) = queue.pop_front() {
        let Some(into_current) = dependers.get(&current) else {
            continue;
        };
        for &depender in into_current {
            members.insert(depender);
            if expanded.insert(depender) {
                queue.push_back(depender);
            }
        }
    }
    members
}

/// Topologically order the induced sub-graph: a member's edge into another
/// member forces the source ahead of the target. Members the drain cannot
/// free trail the prefix in ascending id order.
fn kahn_order<V, E>(graph: &Graph<V, E>, members: &HashSet<VertexId>) -> Vec<VertexId> {
    let mut in_degree: BTreeMap<VertexId, usize> =
        members.iter().map(|&member| (member, 0)).collect();
    for &member in members {
        for (to, _) in graph.adjacency(member) {
            if let Some(degree) = in_degree.get_mut(&to) {
                *degree += 1;
            }
        }
    }

    let mut ready: BinaryHeap<Reverse<VertexId>> = in_degree
        .iter()
        .filter(|&(_, &degree)| degree == 0)
        .map(|(&member, _)| Reverse(member))
        .collect();

    let mut ordered: Vec<VertexId> = Vec::with_capacity(members.len());
    while let Some(Reverse(member)) = ready.pop() {
        ordered.push(member);
        for (to, _) in graph.adjacency(member) {
            if let Some(degree) = in_degree.get_mut(&to) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse(to));
                }
            }
        }
    }

    // BTreeMap iteration keeps the remainder ascending.
    ordered.extend(
        in_degree
            .iter()
            .filter(|&(_, &degree)| degree > 0)
            .map(|(&member, _)| member),
    );
    ordered
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn id(raw: u128) -> VertexId {
        VertexId::from_u128(raw)
    }

    fn build_directed(n: u128, edges: &[(u128, u128)]) -> Graph<String, ()> {
        let mut graph = Graph::directed_cyclic();
        let vertices: Vec<_> = (1..=n)
            .map(|v| Vertex::with_id(id(v), format!("v{v}")))
            .collect();
        graph.add_vertices(vertices).unwrap();
        for &(from, to) in edges {
            graph.add_edge(id(from), id(to), 1, ()).unwrap();
        }
        graph
    }

    fn ids_of(result: &[Vertex<String>]) -> Vec<u128> {
        result.iter().map(|v| v.id.as_u128()).collect()
    }

    // -----------------------------------------------------------------------
    // Closure membership
    // -----------------------------------------------------------------------

    #[test]
    fn chain_resolves_dependers_first() {
        // 3 depends on 2 depends on 1; asking for 1's dependents.
        let graph = build_directed(3, &[(2, 1), (3, 2)]);
        let result = dependents_of(&graph, &[id(1)]).unwrap();
        assert_eq!(ids_of(&result), vec![3, 2]);
        assert_eq!(result[0].data, "v3");
    }

    #[test]
    fn the_start_itself_is_excluded_without_a_cycle() {
        let graph = build_directed(3, &[(2, 1), (3, 2)]);
        let result = dependents_of(&graph, &[id(1)]).unwrap();
        assert!(result.iter().all(|v| v.id != id(1)));
    }

    #[test]
    fn nothing_depends_on_a_source_vertex() {
        // 1 points outward; nothing points at it.
        let graph = build_directed(2, &[(1, 2)]);
        let result = dependents_of(&graph, &[id(1)]).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn empty_starts_resolve_to_an_empty_set() {
        let graph = build_directed(2, &[(1, 2)]);
        let result = dependents_of(&graph, &[]).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn multiple_starts_union_their_dependers() {
        let graph = build_directed(6, &[(2, 1), (6, 5)]);
        let result = dependents_of(&graph, &[id(1), id(5)]).unwrap();
        assert_eq!(ids_of(&result), vec![2, 6]);
    }

    #[test]
    fn duplicate_starts_are_harmless() {
        let graph = build_directed(2, &[(2, 1)]);
        let result = dependents_of(&graph, &[id(1), id(1)]).unwrap();
        assert_eq!(ids_of(&result), vec![2]);
    }

    #[test]
    fn unknown_start_fails_the_whole_call() {
        let graph = build_directed(2, &[(2, 1)]);
        let err = dependents_of(&graph, &[id(1), id(99)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    // -----------------------------------------------------------------------
    // Ordering
    // -----------------------------------------------------------------------

    #[test]
    fn a_shared_depender_appears_once_and_first() {
        // 4 depends on both 2 and 3, which each depend on 1.
        let graph = build_directed(4, &[(2, 1), (3, 1), (4, 2), (4, 3)]);
        let result = dependents_of(&graph, &[id(1)]).unwrap();
        assert_eq!(ids_of(&result), vec![4, 2, 3]);
    }

    #[test]
    fn no_vertex_precedes_one_that_depends_on_it() {
        let graph = build_directed(
            6,
            &[(2, 1), (3, 1), (4, 2), (5, 2), (5, 3), (6, 5)],
        );
        let result = dependents_of(&graph, &[id(1)]).unwrap();
        let order = ids_of(&result);

        for (earlier_pos, &earlier) in order.iter().enumerate() {
            for &later in &order[earlier_pos + 1..] {
                assert!(
                    !graph.contains_edge(id(later), id(earlier)),
                    "{later} depends on {earlier} but was ordered after it"
                );
            }
        }
    }

    #[test]
    fn simultaneously_free_vertices_drain_in_ascending_id_order() {
        // 2 and 3 both depend on 1 and on nothing else.
        let graph = build_directed(3, &[(2, 1), (3, 1)]);
        let result = dependents_of(&graph, &[id(1)]).unwrap();
        assert_eq!(ids_of(&result), vec![2, 3]);
    }

    // -----------------------------------------------------------------------
    // Cycles
    // -----------------------------------------------------------------------

    #[test]
    fn a_cycle_back_into_the_start_includes_the_start() {
        let graph = build_directed(2, &[(1, 2), (2, 1)]);
        let result = dependents_of(&graph, &[id(1)]).unwrap();
        assert_eq!(ids_of(&result), vec![1, 2]);
    }

    #[test]
    fn cycle_participants_follow_the_orderable_prefix() {
        // 2 depends on 1 cleanly; 4 and 5 depend on each other, and 4 also
        // depends on 1.
        let graph = build_directed(5, &[(2, 1), (4, 5), (5, 4), (4, 1)]);
        let result = dependents_of(&graph, &[id(1)]).unwrap();
        assert_eq!(ids_of(&result), vec![2, 4, 5]);
    }

    #[test]
    fn vertices_behind_a_cycle_join_the_unordered_remainder() {
        // 4 ⇄ 5 is a cycle and 4 depends on 2; since 4 can never be freed,
        // 2 cannot be either, and all three trail in ascending order.
        let graph = build_directed(5, &[(2, 1), (3, 1), (4, 5), (5, 4), (4, 2)]);
        let result = dependents_of(&graph, &[id(1)]).unwrap();
        assert_eq!(ids_of(&result), vec![3, 2, 4, 5]);
    }

    #[test]
    fn undirected_mirrors_pull_the_start_back_in() {
        // One undirected edge is a two-record cycle, so each endpoint
        // depends on the other.
        let mut graph: Graph<String, ()> = Graph::undirected();
        graph
            .add_vertices(vec![
                Vertex::with_id(id(1), "v1".into()),
                Vertex::with_id(id(2), "v2".into()),
            ])
            .unwrap();
        graph.add_edge(id(1), id(2), 1, ()).unwrap();

        let result = dependents_of(&graph, &[id(1)]).unwrap();
        assert_eq!(ids_of(&result), vec![1, 2]);
    }

    // -----------------------------------------------------------------------
    // Scale
    // -----------------------------------------------------------------------

    #[test]
    fn deep_dependency_chain_resolves_completely() {
        // 2 depends on 1, 3 on 2, … — asking for 1's dependents returns the
        // whole chain, deepest depender first.
        let edges: Vec<_> = (1..10_000).map(|v| (v + 1, v)).collect();
        let graph = build_directed(10_000, &edges);
        let result = dependents_of(&graph, &[id(1)]).unwrap();
        assert_eq!(result.len(), 9_999);
        assert_eq!(result.first().map(|v| v.id), Some(id(10_000)));
        assert_eq!(result.last().map(|v| v.id), Some(id(2)));
    }
}
