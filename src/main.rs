#![warn(rust_2018_idioms)]

//! Enumerate all connected induced k-subgraphs rooted at each vertex of
//! a colored graph and aggregate them per root by canonical
//! certificate, for motif frequency estimation against surrogate
//! graphs.

use std::io::Write;

mod canon;
mod certificate;
mod encoding;
mod enumerate;
mod graph;
mod misc;
mod output;
mod parser;

mod input;
use input::read_graph;

mod debug;
pub use debug::Error;

use enumerate::enumerate_root;
use graph::VertexIndex;
use output::open_output_files;

fn main() -> Result<(), Error> {
    // Read the graph and the enumeration switches, ...
    let (graph, settings, options) = read_graph()?;

    // ... open the output files for this run, ...
    let output_suffix = if options.nodes.is_some() {
        options.output_suffix
    } else {
        None
    };
    let mut files = open_output_files(
        &options.output_directory,
        options.motif_size,
        output_suffix,
        settings.write_subgraphs,
    )?;

    // ... and enumerate root by root, either the supplied node list or
    // every vertex in ascending order.
    let roots: Vec<VertexIndex> = match &options.nodes {
        Some(nodes) => nodes.clone(),
        None => graph.vertex_indices().collect(),
    };

    for root in roots {
        enumerate_root(
            &graph,
            &settings,
            options.motif_size,
            root,
            &mut files.certificates,
            files
                .subgraphs
                .as_mut()
                .map(|subgraphs| subgraphs as &mut dyn Write),
        )?;
    }

    Ok(())
}
