//! Graph model: vertices and edges stored in arenas keyed by their
//! stable integer ids, with per-vertex adjacency sets for O(1)
//! membership queries and O(degree) iteration.

use std::collections::{BTreeMap, HashMap, HashSet};

pub type VertexIndex = i64;
pub type EnumerationIndex = i64;
pub type Community = i64;
pub type VertexColor = i16;
pub type EdgeColor = i8;

/// Color of a vertex that carries none.
pub const NO_VERTEX_COLOR: VertexColor = -1;
/// Color of an edge that carries none.
pub const NO_EDGE_COLOR: EdgeColor = -1;
/// Community of a vertex that belongs to none.
pub const NO_COMMUNITY: Community = -1;

/// Longest allowed graph prefix; the container format reserves 128
/// bytes including the terminating NUL.
pub const MAX_PREFIX_LENGTH: usize = 127;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum GraphError {
    #[error("self loop on vertex {0}")]
    SelfLoop(VertexIndex),
    #[error("parallel edge between {0} and {1}")]
    ParallelEdge(VertexIndex, VertexIndex),
    #[error("duplicate vertex index {0}")]
    DuplicateVertex(VertexIndex),
    #[error("edge endpoint {0} is not in the graph")]
    UnknownVertex(VertexIndex),
    #[error("graph prefix exceeds 127 bytes ({0})")]
    PrefixTooLong(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub index: VertexIndex,
    /// Ordering tag that assigns every subgraph a unique enumeration
    /// root; only neighbors with an enumeration index at least the
    /// root's are expanded.
    pub enumeration_index: EnumerationIndex,
    pub community: Community,
    pub color: VertexColor,
    pub incoming_neighbors: HashSet<VertexIndex>,
    pub outgoing_neighbors: HashSet<VertexIndex>,
    pub neighbors: HashSet<VertexIndex>,
}

impl Vertex {
    fn new(
        index: VertexIndex,
        enumeration_index: EnumerationIndex,
        community: Community,
        color: VertexColor,
    ) -> Self {
        Vertex {
            index,
            enumeration_index,
            community,
            color,
            incoming_neighbors: HashSet::new(),
            outgoing_neighbors: HashSet::new(),
            neighbors: HashSet::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub source: VertexIndex,
    pub destination: VertexIndex,
    pub weight: f64,
    pub color: EdgeColor,
}

#[derive(Debug)]
pub struct Graph {
    prefix: String,
    directed: bool,
    vertex_colored: bool,
    edge_colored: bool,
    vertices: BTreeMap<VertexIndex, Vertex>,
    /// Undirected edges are stored once under `(min, max)`; lookups
    /// normalize their key accordingly.
    edges: HashMap<(VertexIndex, VertexIndex), Edge>,
    vertex_types: Vec<(i64, String)>,
    edge_types: Vec<(i64, String)>,
}

impl Graph {
    pub fn new(
        prefix: &str,
        directed: bool,
        vertex_colored: bool,
        edge_colored: bool,
    ) -> Result<Self, GraphError> {
        if prefix.len() > MAX_PREFIX_LENGTH {
            return Err(GraphError::PrefixTooLong(prefix.len()));
        }

        Ok(Graph {
            prefix: prefix.to_string(),
            directed,
            vertex_colored,
            edge_colored,
            vertices: BTreeMap::new(),
            edges: HashMap::new(),
            vertex_types: Vec::new(),
            edge_types: Vec::new(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn directed(&self) -> bool {
        self.directed
    }

    pub fn vertex_colored(&self) -> bool {
        self.vertex_colored
    }

    pub fn edge_colored(&self) -> bool {
        self.edge_colored
    }

    /// Number of distinct edge color values declared by the container.
    pub fn nedge_types(&self) -> i64 {
        self.edge_types.len() as i64
    }

    pub fn vertex_types(&self) -> &[(i64, String)] {
        &self.vertex_types
    }

    pub fn edge_types(&self) -> &[(i64, String)] {
        &self.edge_types
    }

    pub fn set_vertex_types(&mut self, vertex_types: Vec<(i64, String)>) {
        self.vertex_types = vertex_types;
    }

    pub fn set_edge_types(&mut self, edge_types: Vec<(i64, String)>) {
        self.edge_types = edge_types;
    }

    pub fn add_vertex(
        &mut self,
        index: VertexIndex,
        enumeration_index: EnumerationIndex,
        community: Community,
        color: VertexColor,
    ) -> Result<(), GraphError> {
        if self.vertices.contains_key(&index) {
            return Err(GraphError::DuplicateVertex(index));
        }

        self.vertices
            .insert(index, Vertex::new(index, enumeration_index, community, color));
        Ok(())
    }

    pub fn add_edge(
        &mut self,
        source: VertexIndex,
        destination: VertexIndex,
        weight: f64,
        color: EdgeColor,
    ) -> Result<(), GraphError> {
        if !self.contains_vertex(source) {
            return Err(GraphError::UnknownVertex(source));
        }
        if !self.contains_vertex(destination) {
            return Err(GraphError::UnknownVertex(destination));
        }
        if source == destination {
            return Err(GraphError::SelfLoop(source));
        }

        // Undirected edges live under the smaller endpoint.
        let (source, destination) = if !self.directed && destination < source {
            (destination, source)
        } else {
            (source, destination)
        };

        if self.edges.contains_key(&(source, destination)) {
            return Err(GraphError::ParallelEdge(source, destination));
        }

        self.edges.insert(
            (source, destination),
            Edge {
                source,
                destination,
                weight,
                color,
            },
        );

        if self.directed {
            let source_vertex = self
                .vertices
                .get_mut(&source)
                .expect("edge endpoints are vertices of the graph");
            source_vertex.outgoing_neighbors.insert(destination);
            source_vertex.neighbors.insert(destination);

            let destination_vertex = self
                .vertices
                .get_mut(&destination)
                .expect("edge endpoints are vertices of the graph");
            destination_vertex.incoming_neighbors.insert(source);
            destination_vertex.neighbors.insert(source);
        } else {
            let source_vertex = self
                .vertices
                .get_mut(&source)
                .expect("edge endpoints are vertices of the graph");
            source_vertex.incoming_neighbors.insert(destination);
            source_vertex.outgoing_neighbors.insert(destination);
            source_vertex.neighbors.insert(destination);

            let destination_vertex = self
                .vertices
                .get_mut(&destination)
                .expect("edge endpoints are vertices of the graph");
            destination_vertex.incoming_neighbors.insert(source);
            destination_vertex.outgoing_neighbors.insert(source);
            destination_vertex.neighbors.insert(source);
        }

        Ok(())
    }

    pub fn vertex(&self, index: VertexIndex) -> Option<&Vertex> {
        self.vertices.get(&index)
    }

    pub fn contains_vertex(&self, index: VertexIndex) -> bool {
        self.vertices.contains_key(&index)
    }

    /// The edge between two endpoints, if any. For directed graphs the
    /// argument order is the edge direction; for undirected graphs both
    /// orders find the single stored edge.
    pub fn edge(&self, a: VertexIndex, b: VertexIndex) -> Option<&Edge> {
        let key = if !self.directed && b < a { (b, a) } else { (a, b) };
        self.edges.get(&key)
    }

    /// Whether an arc leaves `from` towards `to`. Undirected edges count
    /// in both directions.
    pub fn has_arc(&self, from: VertexIndex, to: VertexIndex) -> bool {
        self.vertices
            .get(&from)
            .map_or(false, |vertex| vertex.outgoing_neighbors.contains(&to))
    }

    pub fn nvertices(&self) -> i64 {
        self.vertices.len() as i64
    }

    pub fn nedges(&self) -> i64 {
        self.edges.len() as i64
    }

    /// Vertex ids in ascending order; the sequential enumeration mode
    /// visits roots in this order.
    pub fn vertex_indices(&self) -> impl Iterator<Item = VertexIndex> + '_ {
        self.vertices.keys().copied()
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    /// Edges sorted by their storage key, for deterministic serialization.
    pub fn edges_sorted(&self) -> Vec<&Edge> {
        let mut edges: Vec<&Edge> = self.edges.values().collect();
        edges.sort_unstable_by_key(|edge| (edge.source, edge.destination));
        edges
    }
}
