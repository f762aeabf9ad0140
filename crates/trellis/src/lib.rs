//! An in-memory graph engine: a mutable vertex/edge store with cycle
//! detection, breadth- and depth-first search, weighted shortest paths, and
//! transitive dependent-set resolution.
//!
//! # Overview
//!
//! A [`Graph`] owns every vertex and edge; the algorithm modules
//! ([`cycles`], [`traverse`], [`shortest_path`], [`dependents`]) are pure
//! queries over it. Three kinds are constructible:
//!
//! - [`Graph::directed_acyclic`] — directed, meant to stay acyclic, with an
//!   optional cycle check on every edge add (rolled back on detection);
//! - [`Graph::directed_cyclic`] — directed, cycles are legal;
//! - [`Graph::undirected`] — one logical edge materializes a mirrored pair
//!   of directed records kept consistent under update and removal.
//!
//! Vertices are addressed by [`VertexId`], an opaque 128-bit identity.
//! Reads hand out snapshots, never live references, so callers cannot
//! corrupt the store through returned values. All iteration runs in
//! ascending-id order, which makes every query deterministic for a given
//! construction sequence.
//!
//! # Example
//!
//! The solver prefers a cheap two-hop route over an expensive direct edge:
//!
//! ```
//! use trellis::{Graph, VertexId};
//!
//! # fn main() -> trellis::Result<()> {
//! let mut graph: Graph<&str, ()> = Graph::directed_acyclic(true);
//! let a = graph.add_vertex("a");
//! let b = graph.add_vertex("b");
//! let c = graph.add_vertex("c");
//!
//! graph.add_edge(a, b, 1, ())?;
//! graph.add_edge(b, c, 2, ())?;
//! graph.add_edge(a, c, 5, ())?;
//!
//! let route = trellis::shortest_path::find_shortest_path(&graph, a, c)?;
//! let ids: Vec<VertexId> = route.iter().map(|p| p.vertex.id).collect();
//! assert_eq!(ids, vec![a, b, c]);
//! assert_eq!(route.last().map(|p| p.cumulative_weight), Some(3));
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! Every fallible operation returns [`GraphError`], classified into a
//! four-way taxonomy by [`GraphError::kind`]: not-found, already-exists,
//! invalid-topology, and no-route. "No route" and a search's `Ok(None)` are
//! ordinary negative outcomes, distinct from structural faults.
//!
//! # Concurrency
//!
//! The engine is single-threaded by contract: no interior mutability, no
//! locking. A [`Graph`] is `Send`/`Sync` whenever its payloads are, so
//! callers that need shared access can wrap the whole value in a coarse
//! `RwLock`; fine-grained locking would let the multi-vertex algorithms
//! observe a half-applied mutation.

pub mod cycles;
pub mod dependents;
pub mod error;
pub mod id;
pub mod shortest_path;
pub mod store;
pub mod traverse;

pub use error::{ErrorKind, GraphError, Result};
pub use id::VertexId;
pub use shortest_path::PathPoint;
pub use store::{Edge, Graph, Vertex};
