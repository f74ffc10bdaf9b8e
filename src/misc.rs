use crate::{graph::Graph, Error};

/// Enumeration switches, bundled so that every root sees one immutable
/// configuration.
#[derive(Debug, Default, Clone)]
pub struct Settings {
    /// Include vertex colors in the canonical partition.
    pub vertex_colored: bool,
    /// Encode edge colors through the layered construction.
    pub edge_colored: bool,
    /// Restrict neighbor expansion to same-community edges.
    pub community_based: bool,
    /// Also write one line per enumerated subgraph.
    pub write_subgraphs: bool,
    /// Emit untruncated certificates (verification mode).
    pub full_certificates: bool,
}

impl Settings {
    /// Colored modes are mutually exclusive and each requires the graph
    /// to actually carry the colors.
    pub fn validate(&self, graph: &Graph) -> Result<(), Error> {
        if self.vertex_colored && self.edge_colored {
            return Err(Error::ConflictingColorModes);
        }
        if self.vertex_colored && !graph.vertex_colored() {
            return Err(Error::MissingColors("vertex"));
        }
        if self.edge_colored && !(graph.edge_colored() && graph.nedge_types() > 0) {
            return Err(Error::MissingColors("edge"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validate() {
        let plain = Graph::new("plain", false, false, false).unwrap();
        let mut colored = Graph::new("colored", false, true, true).unwrap();
        colored.set_edge_types(vec![(0, String::new())]);

        assert!(Settings::default().validate(&plain).is_ok());

        let both = Settings {
            vertex_colored: true,
            edge_colored: true,
            ..Settings::default()
        };
        assert!(matches!(
            both.validate(&colored),
            Err(Error::ConflictingColorModes)
        ));

        let vertex_only = Settings {
            vertex_colored: true,
            ..Settings::default()
        };
        assert!(vertex_only.validate(&colored).is_ok());
        assert!(matches!(
            vertex_only.validate(&plain),
            Err(Error::MissingColors("vertex"))
        ));

        let edge_only = Settings {
            edge_colored: true,
            ..Settings::default()
        };
        assert!(edge_only.validate(&colored).is_ok());
        assert!(matches!(
            edge_only.validate(&plain),
            Err(Error::MissingColors("edge"))
        ));
    }
}
