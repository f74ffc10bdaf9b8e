//! Certificate byte strings derived from canonical adjacency matrices.
//!
//! The default (sampled) form keeps one byte per matrix row: the most
//! significant byte of the row word, which holds the adjacency bits for
//! vertices 0..8 in nauty's bit order. That compresses the certificate
//! eight-fold while distinguishing all canonical forms on at most eight
//! vertices per layer. The untruncated form keeps every row byte and
//! backs the collision check on the sampled form.

use std::os::raw::c_int;

use crate::graph::{EdgeColor, Graph, VertexColor, VertexIndex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// Sampled fingerprint: one byte per canonical matrix row, plus the
    /// color appendix.
    pub sampled: Vec<u8>,
    /// Untruncated fingerprint: all row bytes, plus the same appendix.
    pub full: Vec<u8>,
}

impl Certificate {
    fn from_matrix(rows: &[u64]) -> Self {
        let mut sampled = Vec::with_capacity(rows.len());
        let mut full = Vec::with_capacity(rows.len() * 8);
        for &row in rows {
            sampled.push((row >> 56) as u8);
            full.extend_from_slice(&row.to_le_bytes());
        }
        Certificate { sampled, full }
    }

    fn push_appendix(&mut self, byte: u8) {
        self.sampled.push(byte);
        self.full.push(byte);
    }
}

/// Certificate of an uncolored subgraph: the canonical matrix alone.
pub fn plain_certificate(canonical_rows: &[u64]) -> Certificate {
    Certificate::from_matrix(canonical_rows)
}

/// Certificate of a vertex-colored subgraph: the canonical matrix, then
/// per canonical slot the 16-bit vertex color, high byte first.
pub fn vertex_colored_certificate(
    canonical_rows: &[u64],
    colors_in_canonical_order: &[VertexColor],
) -> Certificate {
    let mut certificate = Certificate::from_matrix(canonical_rows);
    for &color in colors_in_canonical_order {
        let bits = color as u16;
        certificate.push_appendix((bits >> 8) as u8);
        certificate.push_appendix(bits as u8);
    }
    certificate
}

/// The induced adjacency rebuilt in canonical vertex order, with the
/// edge colors met along the same walk.
pub struct CondensedSubgraph {
    pub matrix: Vec<u64>,
    pub edge_colors: Vec<EdgeColor>,
}

/// Walk every ordered pair of `ordering` and record induced edges. For
/// undirected graphs each edge is met from both sides, for directed
/// graphs only along its direction, so the walk order is canonical in
/// either case.
pub fn condense_in_canonical_order(
    graph: &Graph,
    ordering: &[VertexIndex],
) -> CondensedSubgraph {
    let size = ordering.len();
    let mut condensed = CondensedSubgraph {
        matrix: vec![0; size],
        edge_colors: Vec::new(),
    };

    for (out_slot, &out_vertex) in ordering.iter().enumerate() {
        for (in_slot, &in_vertex) in ordering.iter().enumerate() {
            if let Some(edge) = graph.edge(out_vertex, in_vertex) {
                condensed.matrix[out_slot] |= 1u64 << (63 - in_slot);
                condensed.edge_colors.push(edge.color);
            }
        }
    }

    condensed
}

/// Certificate of an edge-colored subgraph: the condensed matrix, then
/// one raw color byte per edge in walk order.
pub fn edge_colored_certificate(condensed: &CondensedSubgraph) -> Certificate {
    let mut certificate = Certificate::from_matrix(&condensed.matrix);
    for &color in &condensed.edge_colors {
        certificate.push_appendix(color as u8);
    }
    certificate
}

/// Original vertex ids in canonical order: the first `count` canonical
/// slots mapped back through the subgraph vertex list.
pub fn canonical_ordering(
    vertices: &[VertexIndex],
    lab: &[c_int],
    count: usize,
) -> Vec<VertexIndex> {
    lab[..count]
        .iter()
        .map(|&slot| vertices[slot as usize])
        .collect()
}

pub fn to_hex(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}
