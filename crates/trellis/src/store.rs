//! Mutable vertex/edge store.
//!
//! The [`Graph`] owns every vertex and its outgoing adjacency. Identities map
//! to vertex records through a `BTreeMap`, so all iteration the engine
//! performs (snapshots, detector sweeps, index builds) runs in ascending-id
//! order and is deterministic. Edges are plain records referencing
//! identities, never the vertex structures themselves, which keeps even
//! cyclic topologies trivially safe under single ownership.
//!
//! # Design
//!
//! - **Arena storage**: vertices live in the map; adjacency is an
//!   insertion-ordered `Vec` of `(to, weight, payload)` records per vertex.
//! - **Snapshots on read**: queries hand out clones ([`Vertex`], [`Edge`]),
//!   never live references, so callers cannot corrupt the store by mutating
//!   what they were given.
//! - **Validate, then write**: every mutation checks its preconditions before
//!   touching the map and leaves the store untouched on failure. Batch vertex
//!   insertion is the documented exception: it commits non-conflicting
//!   entries and aggregates the conflicts into one report.
//! - **Undirected mirrors**: an undirected graph materializes one logical
//!   edge as two directed records (from→to and to→from) and keeps them
//!   data-consistent under update and removal.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut graph: Graph<&str, ()> = Graph::directed_acyclic(true);
//! let a = graph.add_vertex("a");
//! let b = graph.add_vertex("b");
//! graph.add_edge(a, b, 1, ())?;
//! assert!(graph.contains_edge(a, b));
//! ```

use std::collections::BTreeMap;

use tracing::trace;

use crate::cycles;
use crate::error::{GraphError, Result};
use crate::id::VertexId;

// ---------------------------------------------------------------------------
// Vertex
// ---------------------------------------------------------------------------

/// A vertex snapshot: identity plus caller payload.
///
/// Values of this type are the currency between caller and store. The store
/// keeps its own records and hands out clones, so mutating a returned
/// `Vertex` never changes the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex<V> {
    /// Identity, unique within a graph.
    pub id: VertexId,
    /// Caller-supplied payload.
    pub data: V,
}

impl<V> Vertex<V> {
    /// Create a vertex under a freshly generated identity.
    #[must_use]
    pub fn new(data: V) -> Self {
        Self {
            id: VertexId::generate(),
            data,
        }
    }

    /// Create a vertex under a caller-chosen identity.
    ///
    /// This is the path on which duplicate identities become possible; the
    /// store reports them via [`GraphError::VertexExists`] /
    /// [`GraphError::VerticesExist`].
    #[must_use]
    pub const fn with_id(id: VertexId, data: V) -> Self {
        Self { id, data }
    }
}

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// A directed edge snapshot.
///
/// For undirected graphs every logical edge surfaces as two of these (one per
/// direction) in [`Graph::get_edges`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<E> {
    /// Source vertex.
    pub from: VertexId,
    /// Destination vertex.
    pub to: VertexId,
    /// Weight used by the shortest-path solver; assumed non-negative there.
    pub weight: i64,
    /// Caller-supplied payload.
    pub data: E,
}

// ---------------------------------------------------------------------------
// Internal records
// ---------------------------------------------------------------------------

/// One directed edge out of the owning vertex.
#[derive(Debug, Clone)]
struct EdgeRecord<E> {
    to: VertexId,
    weight: i64,
    data: E,
}

/// Payload plus outgoing adjacency in insertion order.
#[derive(Debug, Clone)]
struct VertexRecord<V, E> {
    data: V,
    edges: Vec<EdgeRecord<E>>,
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// A mutable in-memory graph over caller payloads `V` (vertices) and `E`
/// (edges).
///
/// Three kinds are constructible, differing only in the immutable flags set
/// at construction time:
///
/// - [`Graph::directed_acyclic`] — directed; optionally rejects any edge that
///   would close a cycle.
/// - [`Graph::directed_cyclic`] — directed; cycles are legal.
/// - [`Graph::undirected`] — every logical edge is mirrored in both
///   directions.
///
/// The store is single-threaded by contract: it holds no interior mutability
/// and no locking. Callers that share a graph across threads must serialize
/// access externally (a coarse `RwLock` around the whole value is the
/// simplest correct choice, since the algorithms read multiple vertices per
/// call and must not observe a half-applied mutation).
#[derive(Debug, Clone)]
pub struct Graph<V, E> {
    vertices: BTreeMap<VertexId, VertexRecord<V, E>>,
    accepts_cycles: bool,
    is_directed: bool,
    check_cycle_on_add_edge: bool,
}

impl<V, E> Graph<V, E> {
    /// Create a directed graph meant to stay acyclic.
    ///
    /// With `check_cycle_on_add_edge` set, [`Graph::add_edge`] consults the
    /// cycle detector and rolls back any edge that would close a cycle.
    /// Without it, staying acyclic is the caller's responsibility; nothing is
    /// enforced after construction.
    #[must_use]
    pub const fn directed_acyclic(check_cycle_on_add_edge: bool) -> Self {
        Self {
            vertices: BTreeMap::new(),
            accepts_cycles: false,
            is_directed: true,
            check_cycle_on_add_edge,
        }
    }

    /// Create a directed graph in which cycles are legal.
    #[must_use]
    pub const fn directed_cyclic() -> Self {
        Self {
            vertices: BTreeMap::new(),
            accepts_cycles: true,
            is_directed: true,
            check_cycle_on_add_edge: false,
        }
    }

    /// Create an undirected graph.
    ///
    /// Adding one logical edge materializes two directed records, one per
    /// direction. Cycle checking is never enabled here: the detector defines
    /// every undirected graph as cyclic (see [`cycles::exists_cycle`]), so a
    /// checking undirected graph could never accept an edge.
    #[must_use]
    pub const fn undirected() -> Self {
        Self {
            vertices: BTreeMap::new(),
            accepts_cycles: true,
            is_directed: false,
            check_cycle_on_add_edge: false,
        }
    }

    // -----------------------------------------------------------------------
    // Vertex mutation
    // -----------------------------------------------------------------------

    /// Insert one vertex under a freshly generated identity and return it.
    ///
    /// Generation retries on the (astronomically unlikely) collision, so the
    /// call itself cannot fail.
    pub fn add_vertex(&mut self, data: V) -> VertexId {
        let mut id = VertexId::generate();
        while self.vertices.contains_key(&id) {
            id = VertexId::generate();
        }
        self.vertices.insert(
            id,
            VertexRecord {
                data,
                edges: Vec::new(),
            },
        );
        id
    }

    /// Insert a batch of pre-built vertices, committing every non-conflicting
    /// entry. Returns the committed identities in batch order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VerticesExist`] listing every identity that was
    /// already present (including duplicates within the batch itself). The
    /// non-conflicting entries remain committed; the batch is additive, not
    /// atomic.
    pub fn add_vertices<I>(&mut self, vertices: I) -> Result<Vec<VertexId>>
    where
        I: IntoIterator<Item = Vertex<V>>,
    {
        let mut committed = Vec::new();
        let mut duplicates = Vec::new();

        for vertex in vertices {
            if self.vertices.contains_key(&vertex.id) {
                duplicates.push(vertex.id);
                continue;
            }
            self.vertices.insert(
                vertex.id,
                VertexRecord {
                    data: vertex.data,
                    edges: Vec::new(),
                },
            );
            committed.push(vertex.id);
        }

        if duplicates.is_empty() {
            Ok(committed)
        } else {
            Err(GraphError::VerticesExist(duplicates))
        }
    }

    /// Replace a vertex payload in place. Topology is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] if the identity is absent.
    pub fn update_vertex_data(&mut self, id: VertexId, data: V) -> Result<()> {
        let record = self
            .vertices
            .get_mut(&id)
            .ok_or(GraphError::VertexNotFound(id))?;
        record.data = data;
        Ok(())
    }

    /// Remove a vertex, every edge out of it, and every edge pointing at it
    /// from any other vertex's adjacency.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexNotFound`] if the identity is absent; the
    /// store is left unchanged.
    pub fn remove_vertex(&mut self, id: VertexId) -> Result<()> {
        self.ensure_vertex(id)?;
        for record in self.vertices.values_mut() {
            record.edges.retain(|edge| edge.to != id);
        }
        self.vertices.remove(&id);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Edge mutation
    // -----------------------------------------------------------------------

    /// Insert a directed edge (mirrored in both directions on undirected
    /// graphs; the payload is cloned into the mirror record).
    ///
    /// When the graph was constructed with cycle checking, the detector runs
    /// after insertion and a cycle-closing edge is fully rolled back, mirror
    /// included: the store never keeps a half-added edge.
    ///
    /// # Errors
    ///
    /// - [`GraphError::VertexNotFound`] if either endpoint is absent.
    /// - [`GraphError::EdgeExists`] if the ordered pair already has an edge.
    /// - [`GraphError::CycleDetected`] if checking is enabled and the edge
    ///   would close a cycle.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, weight: i64, data: E) -> Result<()>
    where
        E: Clone,
    {
        self.ensure_vertex(from)?;
        self.ensure_vertex(to)?;
        if self.contains_edge(from, to) {
            return Err(GraphError::EdgeExists { from, to });
        }

        if !self.is_directed {
            self.push_record(
                to,
                EdgeRecord {
                    to: from,
                    weight,
                    data: data.clone(),
                },
            );
        }
        self.push_record(from, EdgeRecord { to, weight, data });

        if self.check_cycle_on_add_edge && cycles::exists_cycle(self) {
            self.pop_record(from);
            if !self.is_directed {
                self.pop_record(to);
            }
            trace!(%from, %to, "edge rolled back, would close a cycle");
            return Err(GraphError::CycleDetected { from, to });
        }

        Ok(())
    }

    /// Replace an edge payload in place, keeping the undirected mirror record
    /// consistent (a self-loop holds both records in the one adjacency list;
    /// both are updated).
    ///
    /// # Errors
    ///
    /// - [`GraphError::VertexNotFound`] if either endpoint is absent.
    /// - [`GraphError::EdgeNotFound`] if no edge exists for the ordered pair.
    pub fn update_edge_data(&mut self, from: VertexId, to: VertexId, data: E) -> Result<()>
    where
        E: Clone,
    {
        self.ensure_vertex(from)?;
        self.ensure_vertex(to)?;
        if !self.contains_edge(from, to) {
            return Err(GraphError::EdgeNotFound { from, to });
        }

        self.set_matching_data(from, to, &data);
        if !self.is_directed && from != to {
            self.set_matching_data(to, from, &data);
        }
        Ok(())
    }

    /// Remove the edge between the ordered pair (and its undirected mirror).
    ///
    /// # Errors
    ///
    /// - [`GraphError::VertexNotFound`] if either endpoint is absent.
    /// - [`GraphError::EdgeNotFound`] if no edge exists for the ordered pair.
    pub fn remove_edge(&mut self, from: VertexId, to: VertexId) -> Result<()> {
        self.ensure_vertex(from)?;
        self.ensure_vertex(to)?;
        if !self.contains_edge(from, to) {
            return Err(GraphError::EdgeNotFound { from, to });
        }

        self.remove_first_matching(from, to);
        if !self.is_directed {
            // For a self-loop this removes the second record from the same
            // list; otherwise the mirror from the other endpoint's list.
            self.remove_first_matching(to, from);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Returns `true` if the identity is in the graph.
    #[must_use]
    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    /// Returns `true` if an edge exists for the ordered pair.
    ///
    /// On undirected graphs the mirror records make this symmetric.
    #[must_use]
    pub fn contains_edge(&self, from: VertexId, to: VertexId) -> bool {
        self.vertices
            .get(&from)
            .is_some_and(|record| record.edges.iter().any(|edge| edge.to == to))
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of directed edge records. Undirected logical edges count twice
    /// (one per mirror record).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.vertices.values().map(|record| record.edges.len()).sum()
    }

    /// Returns `true` if the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Whether edges are directed.
    #[must_use]
    pub const fn is_directed(&self) -> bool {
        self.is_directed
    }

    /// Whether the graph kind permits cycles.
    #[must_use]
    pub const fn accepts_cycles(&self) -> bool {
        self.accepts_cycles
    }

    /// Whether [`Graph::add_edge`] consults the cycle detector.
    #[must_use]
    pub const fn checks_cycle_on_add_edge(&self) -> bool {
        self.check_cycle_on_add_edge
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// Snapshot one vertex.
    #[must_use]
    pub fn get_vertex(&self, id: VertexId) -> Option<Vertex<V>>
    where
        V: Clone,
    {
        self.vertices.get(&id).map(|record| Vertex {
            id,
            data: record.data.clone(),
        })
    }

    /// Snapshot every vertex, in ascending id order.
    #[must_use]
    pub fn get_vertices(&self) -> Vec<Vertex<V>>
    where
        V: Clone,
    {
        self.vertices
            .iter()
            .map(|(&id, record)| Vertex {
                id,
                data: record.data.clone(),
            })
            .collect()
    }

    /// Snapshot the edge for the ordered pair, if present.
    #[must_use]
    pub fn get_edge(&self, from: VertexId, to: VertexId) -> Option<Edge<E>>
    where
        E: Clone,
    {
        self.vertices.get(&from).and_then(|record| {
            record.edges.iter().find(|edge| edge.to == to).map(|edge| Edge {
                from,
                to,
                weight: edge.weight,
                data: edge.data.clone(),
            })
        })
    }

    /// Snapshot every directed edge record, ordered by source id and then by
    /// insertion order within a source.
    #[must_use]
    pub fn get_edges(&self) -> Vec<Edge<E>>
    where
        E: Clone,
    {
        self.vertices
            .iter()
            .flat_map(|(&from, record)| {
                record.edges.iter().map(move |edge| Edge {
                    from,
                    to: edge.to,
                    weight: edge.weight,
                    data: edge.data.clone(),
                })
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Crate-internal access for the algorithm modules
    // -----------------------------------------------------------------------

    /// Iterate vertex ids in ascending order.
    pub(crate) fn ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys().copied()
    }

    /// Outgoing `(to, weight)` pairs in adjacency order; empty for unknown
    /// ids.
    pub(crate) fn adjacency(&self, id: VertexId) -> impl Iterator<Item = (VertexId, i64)> + '_ {
        self.vertices
            .get(&id)
            .into_iter()
            .flat_map(|record| record.edges.iter().map(|edge| (edge.to, edge.weight)))
    }

    /// Fail with [`GraphError::VertexNotFound`] unless `id` is present.
    pub(crate) fn ensure_vertex(&self, id: VertexId) -> Result<()> {
        if self.contains_vertex(id) {
            Ok(())
        } else {
            Err(GraphError::VertexNotFound(id))
        }
    }

    // -----------------------------------------------------------------------
    // Record plumbing
    // -----------------------------------------------------------------------

    fn push_record(&mut self, at: VertexId, record: EdgeRecord<E>) {
        if let Some(vertex) = self.vertices.get_mut(&at) {
            vertex.edges.push(record);
        }
    }

    fn pop_record(&mut self, at: VertexId) {
        if let Some(vertex) = self.vertices.get_mut(&at) {
            vertex.edges.pop();
        }
    }

    /// Set the payload of every record `at → to`. Ordinarily that is exactly
    /// one record; for an undirected self-loop it is both mirrors at once.
    fn set_matching_data(&mut self, at: VertexId, to: VertexId, data: &E)
    where
        E: Clone,
    {
        if let Some(vertex) = self.vertices.get_mut(&at) {
            for edge in vertex.edges.iter_mut().filter(|edge| edge.to == to) {
                edge.data = data.clone();
            }
        }
    }

    fn remove_first_matching(&mut self, at: VertexId, to: VertexId) {
        if let Some(vertex) = self.vertices.get_mut(&at) {
            if let Some(pos) = vertex.edges.iter().position(|edge| edge.to == to) {
                vertex.edges.remove(pos);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
