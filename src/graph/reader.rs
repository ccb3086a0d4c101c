//! Instance readers.
//!
//! Two formats are understood:
//!
//! - the OR-Library `pmed` text format: a `N E P` header followed by `E`
//!   lines `i j d` with 1-indexed endpoints;
//! - a JSON document `{ "graph": { "edges": [{ "source", "target", "length" }] },
//!   "centerNum": P }` (requires the `serde` feature). The vertex count is the
//!   largest id referenced by an edge.

use std::fs;
use std::path::Path;

use super::matrix::Distance;
use super::oracle::{DistanceOracle, Edge, Graph};
use crate::error::{PCenterError, Result};
use crate::pcenter::PCenterInstance;

/// A graph plus its facility count, before shortest paths are computed.
#[derive(Debug, Clone)]
pub struct RawInstance {
    pub graph: Graph,
    pub p: usize,
}

impl RawInstance {
    /// Runs the oracle and validates the resulting instance.
    pub fn build<O: DistanceOracle>(&self, oracle: &O) -> Result<PCenterInstance> {
        let matrix = oracle.distances(&self.graph)?;
        PCenterInstance::new(matrix, self.p)
    }
}

/// Parses the `pmed` text format.
///
/// # Examples
///
/// ```
/// use u_pcenter::graph::parse_pmed;
///
/// let raw = parse_pmed("3 2 1\n1 2 4\n2 3 5\n").unwrap();
/// assert_eq!(raw.graph.vertex_count(), 3);
/// assert_eq!(raw.p, 1);
/// ```
pub fn parse_pmed(text: &str) -> Result<RawInstance> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| PCenterError::parse(1, "missing `N E P` header"))?;
    let header = parse_fields::<usize>(header_line, header)?;
    let [n, e, p] = header;

    let mut edges = Vec::new();
    for (line, content) in lines {
        let [s, t, d] = parse_fields::<u64>(line, content)?;
        let length = Distance::try_from(d)
            .map_err(|_| PCenterError::parse(line, format!("edge length {d} is too large")))?;
        edges.push(Edge::new(s as usize, t as usize, length));
    }
    if edges.len() != e {
        log::warn!("pmed header declares {e} edges but {} were read", edges.len());
    }

    Ok(RawInstance {
        graph: Graph::with_vertex_count(n, edges)?,
        p,
    })
}

/// Reads a `pmed` instance from disk.
pub fn read_pmed<P: AsRef<Path>>(path: P) -> Result<RawInstance> {
    parse_pmed(&fs::read_to_string(path)?)
}

fn parse_fields<T: std::str::FromStr>(line: usize, content: &str) -> Result<[T; 3]> {
    let fields: Vec<&str> = content.split_whitespace().collect();
    if fields.len() != 3 {
        return Err(PCenterError::parse(
            line,
            format!("expected 3 fields, found {}", fields.len()),
        ));
    }
    let parse = |s: &str| {
        s.parse::<T>()
            .map_err(|_| PCenterError::parse(line, format!("`{s}` is not a valid number")))
    };
    Ok([parse(fields[0])?, parse(fields[1])?, parse(fields[2])?])
}

#[cfg(feature = "serde")]
mod json {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Document {
        graph: GraphDocument,
        #[serde(rename = "centerNum")]
        center_num: usize,
    }

    #[derive(Deserialize)]
    struct GraphDocument {
        edges: Vec<Edge>,
    }

    /// Parses the JSON instance document.
    pub fn parse_json(text: &str) -> Result<RawInstance> {
        let doc: Document = serde_json::from_str(text)?;
        Ok(RawInstance {
            graph: Graph::from_edges(doc.graph.edges)?,
            p: doc.center_num,
        })
    }

    /// Reads a JSON instance from disk.
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<RawInstance> {
        parse_json(&fs::read_to_string(path)?)
    }
}

#[cfg(feature = "serde")]
pub use json::{parse_json, read_json};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::FloydWarshall;

    const SMALL: &str = "\
4 4 2
1 2 1
2 3 1
3 4 1
4 1 1
";

    #[test]
    fn test_parse_pmed() {
        let raw = parse_pmed(SMALL).unwrap();
        assert_eq!(raw.graph.vertex_count(), 4);
        assert_eq!(raw.graph.edges().len(), 4);
        assert_eq!(raw.p, 2);
        assert_eq!(raw.graph.edges()[2], Edge::new(3, 4, 1));
    }

    #[test]
    fn test_build_instance() {
        let instance = parse_pmed(SMALL).unwrap().build(&FloydWarshall).unwrap();
        assert_eq!(instance.n(), 4);
        assert_eq!(instance.p(), 2);
        assert_eq!(instance.matrix().get(0, 2), 2);
    }

    #[test]
    fn test_parse_errors_report_line() {
        let err = parse_pmed("4 4\n").unwrap_err();
        assert!(matches!(err, PCenterError::Parse { line: 1, .. }));

        let err = parse_pmed("2 1 1\n\n1 x 3\n").unwrap_err();
        assert!(matches!(err, PCenterError::Parse { line: 3, .. }));

        assert!(parse_pmed("").is_err());
    }

    #[test]
    fn test_edge_outside_declared_range() {
        let err = parse_pmed("2 1 1\n1 3 2\n").unwrap_err();
        assert!(matches!(err, PCenterError::InvalidInstance(_)));
    }

    #[test]
    fn test_oversized_header_rejected() {
        // edge count far beyond the lines present
        let raw = parse_pmed("2 18446744073709551615 1\n1 2 1\n").unwrap();
        assert_eq!(raw.graph.edges().len(), 1);

        // vertex count whose N² overflows
        let err = parse_pmed("4294967296 1 1\n1 2 1\n").unwrap_err();
        assert!(matches!(err, PCenterError::InvalidInstance(_)));

        // vertex count that fits in N² but is too large to allocate
        let err = parse_pmed("100000 1 1\n1 2 1\n").unwrap_err();
        assert!(matches!(err, PCenterError::InvalidInstance(_)));
    }

    #[test]
    fn test_invalid_p_rejected_at_build() {
        let raw = parse_pmed("2 1 3\n1 2 2\n").unwrap();
        assert!(matches!(
            raw.build(&FloydWarshall),
            Err(PCenterError::InvalidInstance(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_parse_json() {
        let text = r#"{
            "graph": {
                "nodeNum": 3,
                "edges": [
                    { "source": 1, "target": 2, "length": 7 },
                    { "source": 2, "target": 3, "length": 2 }
                ]
            },
            "centerNum": 1
        }"#;
        let raw = parse_json(text).unwrap();
        assert_eq!(raw.graph.vertex_count(), 3);
        assert_eq!(raw.p, 1);
        let instance = raw.build(&FloydWarshall).unwrap();
        assert_eq!(instance.matrix().get(0, 2), 9);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_parse_json_huge_vertex_id() {
        let text = r#"{
            "graph": { "edges": [{ "source": 1, "target": 4294967296, "length": 1 }] },
            "centerNum": 1
        }"#;
        assert!(matches!(
            parse_json(text),
            Err(PCenterError::InvalidInstance(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_parse_json_malformed() {
        assert!(matches!(parse_json("{"), Err(PCenterError::Json(_))));
    }
}
