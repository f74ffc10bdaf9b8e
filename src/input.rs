//! Command line interface and graph loading.

use std::path::PathBuf;
use structopt::StructOpt;

use crate::{graph::Graph, misc::Settings, parser::read_graph_file, Error};

#[derive(StructOpt, Debug)]
#[structopt(name = "motif-census")]
pub struct CommandLineOptions {
    /// Number of vertices per enumerated subgraph.
    #[structopt(short = "-k", long)]
    pub motif_size: usize,
    /// Include vertex colors in the canonical partition.
    #[structopt(long)]
    pub vertex_colored: bool,
    /// Encode edge colors through the layered construction.
    #[structopt(long)]
    pub edge_colored: bool,
    /// Only expand neighbors within the parent's community.
    #[structopt(long)]
    pub community_based: bool,
    /// Also write one line per enumerated subgraph.
    #[structopt(long)]
    pub write_subgraphs: bool,
    /// Emit untruncated certificates instead of the sampled form.
    #[structopt(long)]
    pub full_certificates: bool,
    /// Enumerate only these roots (comma separated).
    #[structopt(long, use_delimiter = true, requires = "output-suffix")]
    pub nodes: Option<Vec<i64>>,
    /// Suffix tag for node list output files.
    #[structopt(long)]
    pub output_suffix: Option<i64>,
    /// Compressed graph container to read.
    #[structopt(parse(from_os_str))]
    pub input: PathBuf,
    /// Working directory holding certificates/ and subgraphs/.
    #[structopt(parse(from_os_str))]
    pub output_directory: PathBuf,
}

impl CommandLineOptions {
    pub fn settings(&self) -> Settings {
        Settings {
            vertex_colored: self.vertex_colored,
            edge_colored: self.edge_colored,
            community_based: self.community_based,
            write_subgraphs: self.write_subgraphs,
            full_certificates: self.full_certificates,
        }
    }
}

/// Read the graph named on the command line and validate the requested
/// switches against it.
pub fn read_graph() -> Result<(Graph, Settings, CommandLineOptions), Error> {
    let options = CommandLineOptions::from_args();

    let graph = read_graph_file(&options.input)?;

    let settings = options.settings();
    settings.validate(&graph)?;

    Ok((graph, settings, options))
}
