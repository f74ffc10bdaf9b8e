//! Error type and diagnostic helpers.
use nom::error::VerboseErrorKind;
use std::{fmt, io, path::PathBuf};

use crate::graph::{GraphError, VertexIndex};
use crate::parser::ParseError;

// Error type and From<...> implementations

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Graph construction error: {0}")]
    Graph(#[from] GraphError),
    #[error("Failed to access {path}: {source}")]
    File { path: PathBuf, source: io::Error },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Error while parsing the graph container")]
    Parse(Vec<VerboseErrorKind>),
    #[error("{0} bytes of trailing data after the edge type table")]
    TrailingData(usize),
    #[error("Vertex type table size out of range ({0})")]
    VertexTypeCount(i64),
    #[error("Edge type table size out of range ({0})")]
    EdgeTypeCount(i64),
    #[error("Root vertex {0} is not in the graph")]
    UnknownRoot(VertexIndex),
    #[error("Vertex and edge coloring are mutually exclusive")]
    ConflictingColorModes,
    #[error("{0} coloring requested but the graph carries no {0} colors")]
    MissingColors(&'static str),
    #[error(
        "Distinct canonical forms collided in their sampled certificate; rerun with --full-certificates"
    )]
    CertificateCollision,
}

impl<'a> From<nom::Err<ParseError<'a>>> for Error {
    fn from(pe: nom::Err<ParseError<'a>>) -> Self {
        match pe {
            nom::Err::Error(verbose) | nom::Err::Failure(verbose) => Self::Parse(
                verbose
                    .errors
                    .into_iter()
                    .map(|(_input, kind)| kind)
                    .collect(),
            ),
            nom::Err::Incomplete(_) => unreachable!(),
        }
    }
}

// Custom formatter for debug printing

#[allow(clippy::ptr_arg)]
pub fn bin_fmt(vec: &Vec<u64>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{{")?;
    for number in vec {
        write!(f, "{:#066b}", number)?;
    }
    write!(f, "}}")?;

    Ok(())
}

// The `libc` crate does not bind ISO C's `clock()`/`CLOCKS_PER_SEC` for
// this target, so declare them directly against glibc's ABI.
extern "C" {
    fn clock() -> libc::clock_t;
}
const CLOCKS_PER_SEC: libc::clock_t = 1_000_000;

/// Process CPU time consumed so far, in seconds. The enumeration
/// summary reports the difference of two readings so that I/O spent
/// outside the timed section does not count.
pub fn process_cpu_seconds() -> f64 {
    // Safety: clock() only reads the process CPU clock.
    let ticks = unsafe { clock() };
    ticks as f64 / CLOCKS_PER_SEC as f64
}
