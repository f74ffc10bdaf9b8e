//! Translation of induced colored subgraphs into canonicalizer input.
//!
//! Vertex colors become an ordered cell partition; edge colors become a
//! layered construction: L stacked copies of the subgraph joined by
//! per-vertex layer cycles, with each edge of color c placed on exactly
//! the layers whose bit is set in c + 1.

use std::collections::BTreeMap;
use std::os::raw::c_int;

use crate::{
    canon::CanonGraph,
    graph::{Graph, VertexColor, VertexIndex},
};

/// Number of layers needed for `nedge_types` distinct edge colors:
/// ⌈log₂(nedge_types + 1)⌉.
pub fn layer_count(nedge_types: i64) -> usize {
    debug_assert!((0..=7).contains(&nedge_types));
    (64 - (nedge_types as u64).leading_zeros()) as usize
}

/// Load the induced subgraph on `vertices` as a plain digraph.
pub fn encode_plain(canon: &mut CanonGraph, graph: &Graph, vertices: &[VertexIndex]) {
    for (out_index, &out_vertex) in vertices.iter().enumerate() {
        for (in_index, &in_vertex) in vertices.iter().enumerate() {
            if graph.has_arc(out_vertex, in_vertex) {
                canon.add_arc(out_index, in_index);
            }
        }
    }
}

/// Load the layered construction for an edge-colored subgraph.
pub fn encode_layered(
    canon: &mut CanonGraph,
    graph: &Graph,
    vertices: &[VertexIndex],
    layers: usize,
) {
    let size = vertices.len();

    // Cycle through the copies of each vertex so that the canonicalizer
    // cannot separate a vertex from its layer images.
    for layer in 0..layers {
        for vertex in 0..size {
            let current = vertex + layer * size;
            let next = if layer == layers - 1 {
                vertex
            } else {
                vertex + (layer + 1) * size
            };
            canon.add_arc(current, next);
        }
    }

    for (out_index, &out_vertex) in vertices.iter().enumerate() {
        for (in_index, &in_vertex) in vertices.iter().enumerate() {
            if !graph.has_arc(out_vertex, in_vertex) {
                continue;
            }

            if layers > 1 {
                let edge = graph
                    .edge(out_vertex, in_vertex)
                    .expect("adjacent vertices must share an edge");

                // Colors are 0-indexed; c + 1 as a bitmask over layers
                // keeps color 0 distinguishable from an absent edge.
                let mut mask = (edge.color + 1) as u8;
                let mut layer = 0;
                while mask != 0 {
                    if mask & 1 == 1 {
                        canon.add_arc(out_index + layer * size, in_index + layer * size);
                    }
                    mask >>= 1;
                    layer += 1;
                }
            } else {
                canon.add_arc(out_index, in_index);
            }
        }
    }
}

/// Partition with one cell per layer, every copy of the subgraph in one
/// cell. Cells are runs of 1 closed by a 0.
pub fn layer_partition(canon: &mut CanonGraph, size: usize, layers: usize) {
    let mut order = Vec::with_capacity(layers * size);
    let mut partition = Vec::with_capacity(layers * size);

    for layer in 0..layers {
        for vertex in 0..size {
            order.push((vertex + layer * size) as c_int);
            partition.push(1);
        }
        *partition.last_mut().expect("layers have vertices") = 0;
    }

    canon.set_partition(&order, &partition);
}

/// Group the subgraph slots by vertex color, ascending.
pub fn group_by_color(graph: &Graph, vertices: &[VertexIndex]) -> BTreeMap<VertexColor, Vec<usize>> {
    let mut coloring: BTreeMap<VertexColor, Vec<usize>> = BTreeMap::new();
    for (slot, &vertex) in vertices.iter().enumerate() {
        let color = graph
            .vertex(vertex)
            .expect("enumerated vertices are in the graph")
            .color;
        coloring.entry(color).or_default().push(slot);
    }
    coloring
}

/// Partition with one cell per vertex color, colors visited ascending.
pub fn color_partition(canon: &mut CanonGraph, coloring: &BTreeMap<VertexColor, Vec<usize>>) {
    let mut order = Vec::with_capacity(canon.size());
    let mut partition = Vec::with_capacity(canon.size());

    for members in coloring.values() {
        for &slot in members {
            order.push(slot as c_int);
            partition.push(1);
        }
        *partition.last_mut().expect("color cells are nonempty") = 0;
    }

    canon.set_partition(&order, &partition);
}
