//! Canonical labeling of small directed graphs through dense nauty.
//!
//! The workspace is sized once per enumeration root and reused for
//! every subgraph of that root; only graphs that fit a single setword
//! (at most 64 vertices) are supported.

use custom_debug_derive::Debug;
use nauty_Traces_sys::{
    densenauty, empty_graph, optionblk, statsblk, ADDONEARC, SETWORDSNEEDED, FALSE, TRUE,
};
use std::os::raw::c_int;

use crate::debug::bin_fmt;

#[derive(Debug)]
pub struct CanonGraph {
    /// adjacency matrix, one setword per row
    #[debug(with = "bin_fmt")]
    matrix: Vec<u64>,
    /// canonical adjacency matrix as relabelled by nauty
    #[debug(with = "bin_fmt")]
    canonical_matrix: Vec<u64>,
    /// lab
    vertex_order: Vec<c_int>,
    /// ptn aka the coloring
    partition: Vec<c_int>,
    orbits: Vec<c_int>,
    colored: bool,
    size: usize,
}

impl CanonGraph {
    /// Allocate a workspace for graphs on `size` vertices. Aborts when
    /// the adjacency rows do not fit one machine word; that bound is a
    /// configuration limit, not a data condition.
    pub fn new(size: usize, colored: bool) -> Self {
        assert!(
            SETWORDSNEEDED(size) <= 1,
            "canonical graph on {} vertices does not fit one setword",
            size
        );

        CanonGraph {
            matrix: empty_graph(1, size),
            canonical_matrix: vec![0; size],
            vertex_order: vec![0; size],
            partition: vec![0; size],
            orbits: vec![0; size],
            colored,
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn add_arc(&mut self, from: usize, to: usize) {
        debug_assert!(from < self.size && to < self.size);
        ADDONEARC(&mut self.matrix, from, to, 1);
    }

    /// Overwrite the `lab`/`ptn` pair. `partition` follows the nauty
    /// convention: runs of 1 mark vertices sharing a cell, a 0 closes
    /// the cell.
    pub fn set_partition(&mut self, order: &[c_int], partition: &[c_int]) {
        debug_assert_eq!(order.len(), self.size);
        debug_assert_eq!(partition.len(), self.size);
        self.vertex_order.copy_from_slice(order);
        self.partition.copy_from_slice(partition);
    }

    /// Compute the canonical form of the current matrix. Returns the
    /// canonical adjacency rows and the canonical vertex order (`lab`):
    /// `lab[i]` is the input vertex occupying canonical slot `i`.
    pub fn canonize(&mut self) -> (&[u64], &[c_int]) {
        let mut options = optionblk::default();
        options.getcanon = TRUE;
        options.digraph = TRUE;
        options.writeautoms = FALSE;
        options.defaultptn = if self.colored { FALSE } else { TRUE };
        let mut stats = statsblk::default();

        // Safety: call to the nauty library function. All buffers are
        // sized to one setword per row and `size` entries, matching the
        // m/n arguments.
        unsafe {
            densenauty(
                self.matrix.as_mut_ptr(),
                self.vertex_order.as_mut_ptr(),
                self.partition.as_mut_ptr(),
                self.orbits.as_mut_ptr(),
                &mut options,
                &mut stats,
                1,
                self.size as c_int,
                self.canonical_matrix.as_mut_ptr(),
            );
        }

        (&self.canonical_matrix, &self.vertex_order)
    }

    /// Reset the adjacency matrix for the next subgraph.
    pub fn clear(&mut self) {
        for row in self.matrix.iter_mut() {
            *row = 0;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn canonical_rows(arcs: &[(usize, usize)], size: usize) -> Vec<u64> {
        let mut canon = CanonGraph::new(size, false);
        for &(from, to) in arcs {
            canon.add_arc(from, to);
        }
        canon.canonize().0.to_vec()
    }

    #[test]
    fn relabelled_cycles_share_canonical_form() {
        // 0->1->2->0 and the same cycle written from vertex 1.
        let first = canonical_rows(&[(0, 1), (1, 2), (2, 0)], 3);
        let second = canonical_rows(&[(1, 2), (2, 0), (0, 1)], 3);
        let third = canonical_rows(&[(0, 2), (2, 1), (1, 0)], 3);
        assert_eq!(first, second);
        assert_eq!(first, third);
    }

    #[test]
    fn cycle_and_path_differ() {
        let cycle = canonical_rows(&[(0, 1), (1, 2), (2, 0)], 3);
        let path = canonical_rows(&[(0, 1), (1, 2)], 3);
        assert_ne!(cycle, path);
    }

    #[test]
    fn canonical_order_is_a_permutation() {
        let mut canon = CanonGraph::new(4, false);
        canon.add_arc(0, 1);
        canon.add_arc(1, 2);
        canon.add_arc(2, 3);
        let (_rows, order) = canon.canonize();

        let mut sorted: Vec<c_int> = order.to_vec();
        sorted.sort_unstable();
        assert_eq!(vec![0, 1, 2, 3], sorted);
    }

    #[test]
    fn partition_separates_singleton_cell() {
        // Path 0-1-2 (undirected as two arcs each) with vertex 1 in its
        // own cell must keep slot 0 for the isolated-cell vertex.
        let mut canon = CanonGraph::new(3, true);
        for &(a, b) in &[(0usize, 1usize), (1, 0), (1, 2), (2, 1)] {
            canon.add_arc(a, b);
        }
        canon.set_partition(&[1, 0, 2], &[0, 1, 0]);
        let (_rows, order) = canon.canonize();
        assert_eq!(1, order[0]);
    }

    #[test]
    #[should_panic]
    fn oversized_workspace_is_rejected() {
        CanonGraph::new(65, false);
    }
}
