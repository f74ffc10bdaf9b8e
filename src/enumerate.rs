//! Rooted enumeration of connected induced k-subgraphs.
//!
//! The procedure partitions the k - 1 vertices around the root into
//! depth-indexed selections: at every depth the valid vertices are the
//! unvisited neighbors of the previous selection whose enumeration
//! index is at least the root's, and every nonempty subset of them that
//! fits the remaining budget is tried in turn. With unique enumeration
//! indices every connected induced k-subgraph is produced exactly once,
//! at the root minimizing its enumeration index.

use itertools::Itertools;
use std::{
    collections::{btree_map, BTreeMap, HashSet},
    io::Write,
};

use crate::{
    canon::CanonGraph,
    certificate::{self, Certificate},
    debug::process_cpu_seconds,
    encoding,
    graph::{EnumerationIndex, Graph, VertexIndex},
    misc::Settings,
    Error,
};

/// Aggregated isomorphism class: occurrence count plus the untruncated
/// certificate of the first member, kept to surface sampled-form
/// collisions instead of silently merging distinct classes.
struct CertificateClass {
    count: u64,
    full: Vec<u8>,
}

#[derive(Debug)]
pub struct RootSummary {
    pub root: VertexIndex,
    pub enumerated: u64,
    pub seconds: f64,
}

/// All per-root state. Created fresh for every enumeration root and
/// dropped when the root completes; the graph is the only shared input.
pub struct RootEnumeration<'a> {
    graph: &'a Graph,
    settings: &'a Settings,
    root: VertexIndex,
    root_enumeration_index: EnumerationIndex,
    motif_size: usize,
    layers: usize,
    canon: CanonGraph,
    /// Selection stack: `selection[0]` is the root, `selection[i]` the
    /// vertices chosen at depth i of the current branch.
    selection: Vec<Vec<VertexIndex>>,
    /// Union of all vertices live on the selection stack plus the valid
    /// candidates of every open depth.
    visited: HashSet<VertexIndex>,
    certificates: BTreeMap<Vec<u8>, CertificateClass>,
    enumerated: u64,
    subgraph_out: Option<&'a mut dyn Write>,
}

impl<'a> RootEnumeration<'a> {
    pub fn new(
        graph: &'a Graph,
        settings: &'a Settings,
        motif_size: usize,
        root: VertexIndex,
        subgraph_out: Option<&'a mut dyn Write>,
    ) -> Result<Self, Error> {
        assert!(motif_size > 0, "motif size must be positive");
        let root_vertex = graph.vertex(root).ok_or(Error::UnknownRoot(root))?;

        let layers = if settings.edge_colored {
            encoding::layer_count(graph.nedge_types())
        } else {
            1
        };
        let colored = settings.vertex_colored || settings.edge_colored;

        let mut visited = HashSet::new();
        visited.insert(root);

        Ok(RootEnumeration {
            graph,
            settings,
            root,
            root_enumeration_index: root_vertex.enumeration_index,
            motif_size,
            layers,
            canon: CanonGraph::new(layers * motif_size, colored),
            selection: vec![vec![root]],
            visited,
            certificates: BTreeMap::new(),
            enumerated: 0,
            subgraph_out,
        })
    }

    /// Enumerate every subgraph under this root, then serialize the
    /// aggregated certificates followed by the summary line. The
    /// reported seconds are process CPU time over the enumeration
    /// only, not the serialization.
    pub fn run(mut self, certificate_out: &mut dyn Write) -> Result<RootSummary, Error> {
        let start_cpu = process_cpu_seconds();
        self.enumerate_level(self.motif_size - 1)?;
        let seconds = process_cpu_seconds() - start_cpu;

        for (fingerprint, class) in &self.certificates {
            writeln!(
                certificate_out,
                "{}: {}",
                certificate::to_hex(fingerprint),
                class.count
            )?;
        }
        writeln!(
            certificate_out,
            "Enumerated {} subgraphs for node {} in {:.6} seconds.",
            self.enumerated, self.root, seconds
        )?;
        certificate_out.flush()?;

        if let Some(subgraph_out) = self.subgraph_out.as_mut() {
            subgraph_out.flush()?;
        }

        Ok(RootSummary {
            root: self.root,
            enumerated: self.enumerated,
            seconds,
        })
    }

    /// Recurse over the subsets of the valid vertices at the current
    /// depth until the vertex budget is exhausted.
    fn enumerate_level(&mut self, remaining: usize) -> Result<(), Error> {
        if remaining == 0 {
            return self.process_subgraph();
        }

        let valid = self.valid_vertices();

        let max_take = valid.len().min(remaining);
        for take in 1..=max_take {
            for combination in valid.iter().copied().combinations(take) {
                self.selection.push(combination);
                self.enumerate_level(remaining - take)?;
                self.selection.pop();
            }
        }

        // Restore the frame: the candidates of this depth become
        // selectable again for the caller's next branch.
        for vertex in &valid {
            self.visited.remove(vertex);
        }

        Ok(())
    }

    /// Unvisited neighbors of the previous selection with an admissible
    /// enumeration index, marked visited as they are discovered so that
    /// no combination can pick a vertex twice. Sorted ascending so the
    /// subset order is reproducible across runs.
    fn valid_vertices(&mut self) -> Vec<VertexIndex> {
        let mut valid = Vec::new();

        let parents = self
            .selection
            .last()
            .expect("the selection stack always holds the root");

        for &parent_index in parents {
            let parent = self
                .graph
                .vertex(parent_index)
                .expect("selected vertices are in the graph");

            for &neighbor_index in &parent.neighbors {
                let neighbor = self
                    .graph
                    .vertex(neighbor_index)
                    .expect("adjacency sets only reference graph vertices");

                // A candidate qualifies through any one same-community
                // parent; other parents need not match.
                if self.settings.community_based && parent.community != neighbor.community {
                    continue;
                }

                if self.root_enumeration_index <= neighbor.enumeration_index
                    && !self.visited.contains(&neighbor_index)
                {
                    self.visited.insert(neighbor_index);
                    valid.push(neighbor_index);
                }
            }
        }

        valid.sort_unstable();
        valid
    }

    /// The selection stack holds a complete subgraph: canonicalize it,
    /// aggregate its certificate, and optionally write its vertex line.
    fn process_subgraph(&mut self) -> Result<(), Error> {
        let graph = self.graph;
        let vertices: Vec<VertexIndex> = self.selection.iter().flatten().copied().collect();
        debug_assert_eq!(self.motif_size, vertices.len());

        let (certificate, ordering) = if self.settings.edge_colored {
            encoding::encode_layered(&mut self.canon, graph, &vertices, self.layers);
            encoding::layer_partition(&mut self.canon, vertices.len(), self.layers);

            let (_rows, lab) = self.canon.canonize();
            let ordering = certificate::canonical_ordering(&vertices, lab, vertices.len());
            let condensed = certificate::condense_in_canonical_order(graph, &ordering);
            (certificate::edge_colored_certificate(&condensed), ordering)
        } else if self.settings.vertex_colored {
            encoding::encode_plain(&mut self.canon, graph, &vertices);
            let coloring = encoding::group_by_color(graph, &vertices);
            encoding::color_partition(&mut self.canon, &coloring);

            let (rows, lab) = self.canon.canonize();
            let ordering = certificate::canonical_ordering(&vertices, lab, vertices.len());
            let colors: Vec<_> = ordering
                .iter()
                .map(|&vertex| {
                    graph
                        .vertex(vertex)
                        .expect("enumerated vertices are in the graph")
                        .color
                })
                .collect();
            (certificate::vertex_colored_certificate(rows, &colors), ordering)
        } else {
            encoding::encode_plain(&mut self.canon, graph, &vertices);

            let (rows, lab) = self.canon.canonize();
            let ordering = certificate::canonical_ordering(&vertices, lab, vertices.len());
            (certificate::plain_certificate(rows), ordering)
        };

        self.canon.clear();
        self.aggregate(certificate, &ordering)?;
        self.enumerated += 1;

        Ok(())
    }

    fn aggregate(
        &mut self,
        certificate: Certificate,
        ordering: &[VertexIndex],
    ) -> Result<(), Error> {
        let Certificate { sampled, full } = certificate;
        let fingerprint = if self.settings.full_certificates {
            full.clone()
        } else {
            sampled
        };

        if let Some(subgraph_out) = self.subgraph_out.as_mut() {
            write!(subgraph_out, "{}: ", certificate::to_hex(&fingerprint))?;
            for vertex in ordering {
                write!(subgraph_out, "{} ", vertex)?;
            }
            writeln!(subgraph_out)?;
        }

        match self.certificates.entry(fingerprint) {
            btree_map::Entry::Vacant(entry) => {
                entry.insert(CertificateClass { count: 1, full });
            }
            btree_map::Entry::Occupied(mut entry) => {
                if entry.get().full != full {
                    return Err(Error::CertificateCollision);
                }
                entry.get_mut().count += 1;
            }
        }

        Ok(())
    }
}

/// Enumerate one root and serialize its certificates.
pub fn enumerate_root<'a>(
    graph: &'a Graph,
    settings: &'a Settings,
    motif_size: usize,
    root: VertexIndex,
    certificate_out: &mut dyn Write,
    subgraph_out: Option<&'a mut dyn Write>,
) -> Result<RootSummary, Error> {
    RootEnumeration::new(graph, settings, motif_size, root, subgraph_out)?.run(certificate_out)
}
