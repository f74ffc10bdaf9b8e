//! Binary graph container: parsing and serialization.
//!
//! On disk the container is a bzip2 stream; the parsers here work on
//! the decompressed bytes. All integers are little endian; names and
//! the graph prefix occupy 128 bytes, NUL terminated, trailing bytes
//! ignored.

use bzip2::read::BzDecoder;
use bzip2::write::BzEncoder;
use bzip2::Compression;
use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use crate::{
    graph::{Graph, MAX_PREFIX_LENGTH},
    Error,
};

pub type Input<'a> = &'a [u8];
pub type ParseError<'a> = nom::error::VerboseError<Input<'a>>;
pub type ParseResult<'a, O> = nom::IResult<Input<'a>, O, ParseError<'a>>;

/// Record sizes are fixed by the producing host's packed layout.
const NAME_LENGTH: usize = 128;

fn parse_bool(input: Input<'_>) -> ParseResult<'_, bool> {
    use nom::{combinator::map, number::complete::le_u8};
    map(le_u8, |byte| byte != 0)(input)
}

/// A 128-byte NUL-terminated name field.
fn parse_name(input: Input<'_>) -> ParseResult<'_, String> {
    use nom::{bytes::complete::take, combinator::map};

    map(take(NAME_LENGTH), |bytes: Input<'_>| {
        let end = bytes
            .iter()
            .position(|&byte| byte == 0)
            .unwrap_or(NAME_LENGTH);
        String::from_utf8_lossy(&bytes[..end]).into_owned()
    })(input)
}

#[allow(clippy::type_complexity)]
fn parse_header(input: Input<'_>) -> ParseResult<'_, (i64, i64, bool, bool, bool, String)> {
    use nom::{error::context, number::complete::le_i64, sequence::tuple};

    context(
        "graph header",
        tuple((
            le_i64, le_i64, parse_bool, parse_bool, parse_bool, parse_name,
        )),
    )(input)
}

fn parse_vertex_record(input: Input<'_>) -> ParseResult<'_, (i64, i64, i64, i16)> {
    use nom::{
        error::context,
        number::complete::{le_i16, le_i64},
        sequence::tuple,
    };

    context("vertex record", tuple((le_i64, le_i64, le_i64, le_i16)))(input)
}

fn parse_edge_record(input: Input<'_>) -> ParseResult<'_, (i64, i64, f64, i8)> {
    use nom::{
        error::context,
        number::complete::{le_f64, le_i64, le_i8},
        sequence::tuple,
    };

    context("edge record", tuple((le_i64, le_i64, le_f64, le_i8)))(input)
}

fn parse_type_record(input: Input<'_>) -> ParseResult<'_, (i64, String)> {
    use nom::{error::context, number::complete::le_i64, sequence::pair};

    context("type record", pair(le_i64, parse_name))(input)
}

fn parse_count(input: Input<'_>) -> ParseResult<'_, i64> {
    use nom::{error::context, number::complete::le_i64};
    context("type table size", le_i64)(input)
}

/// Parse a decompressed graph container. The stream must end exactly
/// after the edge type table.
pub fn parse_graph(data: &[u8]) -> Result<Graph, Error> {
    let (rest, (nvertices, nedges, directed, vertex_colored, edge_colored, prefix)) =
        parse_header(data)?;

    let mut graph = Graph::new(&prefix, directed, vertex_colored, edge_colored)?;

    let mut rest = rest;
    for _ in 0..nvertices {
        let (next, (index, enumeration_index, community, color)) = parse_vertex_record(rest)?;
        graph.add_vertex(index, enumeration_index, community, color)?;
        rest = next;
    }

    for _ in 0..nedges {
        let (next, (source, destination, weight, color)) = parse_edge_record(rest)?;
        graph.add_edge(source, destination, weight, color)?;
        rest = next;
    }

    let (mut rest, nvertex_types) = parse_count(rest)?;
    if !(0..=65536).contains(&nvertex_types) {
        return Err(Error::VertexTypeCount(nvertex_types));
    }
    let mut vertex_types = Vec::with_capacity(nvertex_types as usize);
    for _ in 0..nvertex_types {
        let (next, record) = parse_type_record(rest)?;
        vertex_types.push(record);
        rest = next;
    }
    graph.set_vertex_types(vertex_types);

    let (mut rest, nedge_types) = parse_count(rest)?;
    if !(0..=7).contains(&nedge_types) {
        return Err(Error::EdgeTypeCount(nedge_types));
    }
    let mut edge_types = Vec::with_capacity(nedge_types as usize);
    for _ in 0..nedge_types {
        let (next, record) = parse_type_record(rest)?;
        edge_types.push(record);
        rest = next;
    }
    graph.set_edge_types(edge_types);

    if !rest.is_empty() {
        return Err(Error::TrailingData(rest.len()));
    }

    Ok(graph)
}

/// Read and decompress a graph container from disk.
pub fn read_graph_file(path: &Path) -> Result<Graph, Error> {
    let file = File::open(path).map_err(|source| Error::File {
        path: path.to_path_buf(),
        source,
    })?;

    let mut data = Vec::new();
    BzDecoder::new(file)
        .read_to_end(&mut data)
        .map_err(|source| Error::File {
            path: path.to_path_buf(),
            source,
        })?;

    parse_graph(&data)
}

fn write_name<W: Write>(out: &mut W, name: &str) -> std::io::Result<()> {
    let mut field = [0u8; NAME_LENGTH];
    let bytes = name.as_bytes();
    let length = bytes.len().min(MAX_PREFIX_LENGTH);
    field[..length].copy_from_slice(&bytes[..length]);
    out.write_all(&field)
}

/// Serialize a graph into the uncompressed container layout, the exact
/// counterpart of [`parse_graph`]. Edges are written in key order so
/// the output is deterministic.
pub fn write_graph<W: Write>(graph: &Graph, out: &mut W) -> std::io::Result<()> {
    out.write_all(&graph.nvertices().to_le_bytes())?;
    out.write_all(&graph.nedges().to_le_bytes())?;
    out.write_all(&[
        graph.directed() as u8,
        graph.vertex_colored() as u8,
        graph.edge_colored() as u8,
    ])?;
    write_name(out, graph.prefix())?;

    for vertex in graph.vertices() {
        out.write_all(&vertex.index.to_le_bytes())?;
        out.write_all(&vertex.enumeration_index.to_le_bytes())?;
        out.write_all(&vertex.community.to_le_bytes())?;
        out.write_all(&vertex.color.to_le_bytes())?;
    }

    for edge in graph.edges_sorted() {
        out.write_all(&edge.source.to_le_bytes())?;
        out.write_all(&edge.destination.to_le_bytes())?;
        out.write_all(&edge.weight.to_le_bytes())?;
        out.write_all(&edge.color.to_le_bytes())?;
    }

    out.write_all(&(graph.vertex_types().len() as i64).to_le_bytes())?;
    for (index, name) in graph.vertex_types() {
        out.write_all(&index.to_le_bytes())?;
        write_name(out, name)?;
    }

    out.write_all(&(graph.edge_types().len() as i64).to_le_bytes())?;
    for (index, name) in graph.edge_types() {
        out.write_all(&index.to_le_bytes())?;
        write_name(out, name)?;
    }

    Ok(())
}

/// Compress a graph container to disk.
pub fn write_graph_file(graph: &Graph, path: &Path) -> Result<(), Error> {
    let file = File::create(path).map_err(|source| Error::File {
        path: path.to_path_buf(),
        source,
    })?;

    let mut encoder = BzEncoder::new(file, Compression::default());
    write_graph(graph, &mut encoder).map_err(|source| Error::File {
        path: path.to_path_buf(),
        source,
    })?;
    encoder.finish().map_err(|source| Error::File {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::{NO_COMMUNITY, NO_EDGE_COLOR, NO_VERTEX_COLOR};

    fn sample_graph() -> Graph {
        let mut graph = Graph::new("sample", true, true, true).unwrap();
        graph.add_vertex(3, 0, 1, 4).unwrap();
        graph.add_vertex(7, 1, 1, 2).unwrap();
        graph.add_vertex(11, 2, NO_COMMUNITY, NO_VERTEX_COLOR).unwrap();
        graph.add_edge(3, 7, 0.5, 0).unwrap();
        graph.add_edge(7, 3, 1.5, 1).unwrap();
        graph.add_edge(7, 11, -1.0, NO_EDGE_COLOR).unwrap();
        graph.set_vertex_types(vec![(0, "pyramidal".to_string()), (1, "basket".to_string())]);
        graph.set_edge_types(vec![(0, "chemical".to_string()), (1, "electrical".to_string())]);
        graph
    }

    #[test]
    fn round_trip_preserves_the_graph() {
        let graph = sample_graph();
        let mut data = Vec::new();
        write_graph(&graph, &mut data).unwrap();

        let parsed = parse_graph(&data).unwrap();
        assert_eq!(graph.prefix(), parsed.prefix());
        assert_eq!(graph.directed(), parsed.directed());
        assert_eq!(graph.vertex_colored(), parsed.vertex_colored());
        assert_eq!(graph.edge_colored(), parsed.edge_colored());
        assert_eq!(graph.nvertices(), parsed.nvertices());
        assert_eq!(graph.nedges(), parsed.nedges());
        assert_eq!(graph.nedge_types(), parsed.nedge_types());
        assert_eq!(graph.vertex_types(), parsed.vertex_types());

        for vertex in graph.vertices() {
            let parsed_vertex = parsed.vertex(vertex.index).unwrap();
            assert_eq!(vertex, parsed_vertex);
        }
        for edge in graph.edges_sorted() {
            let parsed_edge = parsed.edge(edge.source, edge.destination).unwrap();
            assert_eq!(edge, parsed_edge);
        }
    }

    #[test]
    fn compressed_round_trip() {
        let graph = sample_graph();
        let mut path = std::env::temp_dir();
        path.push("motif-census-parser-test.graph.bz2");

        write_graph_file(&graph, &path).unwrap();
        let parsed = read_graph_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(graph.prefix(), parsed.prefix());
        assert_eq!(graph.nvertices(), parsed.nvertices());
        assert_eq!(graph.nedges(), parsed.nedges());
        assert_eq!(graph.nedge_types(), parsed.nedge_types());
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let graph = sample_graph();
        let mut data = Vec::new();
        write_graph(&graph, &mut data).unwrap();
        data.push(0);

        assert!(matches!(parse_graph(&data), Err(Error::TrailingData(1))));
    }

    #[test]
    fn truncated_stream_is_rejected() {
        let graph = sample_graph();
        let mut data = Vec::new();
        write_graph(&graph, &mut data).unwrap();
        data.truncate(data.len() - 1);

        assert!(matches!(parse_graph(&data), Err(Error::Parse(_))));
    }

    #[test]
    fn oversized_edge_type_table_is_rejected() {
        let mut graph = Graph::new("types", false, false, true).unwrap();
        graph.set_edge_types((0..8).map(|index| (index, String::new())).collect());

        let mut data = Vec::new();
        write_graph(&graph, &mut data).unwrap();

        assert!(matches!(parse_graph(&data), Err(Error::EdgeTypeCount(8))));
    }

    #[test]
    fn duplicate_vertices_are_a_data_error() {
        let mut data = Vec::new();
        let mut graph = Graph::new("dup", false, false, false).unwrap();
        graph.add_vertex(0, 0, NO_COMMUNITY, NO_VERTEX_COLOR).unwrap();
        write_graph(&graph, &mut data).unwrap();

        // Rewrite the vertex count to two and append a duplicate record.
        data[..8].copy_from_slice(&2i64.to_le_bytes());
        let record_start = 19 + NAME_LENGTH;
        let record: Vec<u8> = data[record_start..record_start + 26].to_vec();
        let mut patched = data[..record_start + 26].to_vec();
        patched.extend_from_slice(&record);
        patched.extend_from_slice(&data[record_start + 26..]);

        assert!(matches!(parse_graph(&patched), Err(Error::Graph(_))));
    }

    #[test]
    fn names_truncate_at_the_field_boundary() {
        let mut data = Vec::new();
        write_name(&mut data, &"n".repeat(200)).unwrap();
        assert_eq!(NAME_LENGTH, data.len());
        assert_eq!(0, data[MAX_PREFIX_LENGTH]);
    }
}
