//! Purpose: In-memory pathway model and its GPML (XML) serialization.
//! Exports: `Pathway`, `DataNode`, `Label`, `Interaction`, `Point`, `Comment`,
//!          `NodeGraphics`, `GpmlXref`, `read_from_xml`, `write_to_xml`, `GPML_NAMESPACE`.
//! Role: Convert between the GPML payload on the wire and a typed model.
//! Invariants: `read_from_xml(write_to_xml(p)) == p` for every model value.
//! Invariants: Malformed or non-GPML input fails with `ErrorKind::Format`.
//! Notes: Elements outside the model (Biopax, Group, Shape, ...) are skipped on read.

mod read;
mod write;

use super::vocab::{DataSource, Xref};

pub use read::read_from_xml;
pub use write::write_to_xml;

pub const GPML_NAMESPACE: &str = "http://pathvisio.org/GPML/2013a";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pathway {
    pub name: String,
    pub organism: Option<String>,
    pub version: Option<String>,
    pub author: Option<String>,
    pub maintainer: Option<String>,
    pub email: Option<String>,
    pub last_modified: Option<String>,
    pub comments: Vec<Comment>,
    pub data_nodes: Vec<DataNode>,
    pub interactions: Vec<Interaction>,
    pub labels: Vec<Label>,
}

impl Pathway {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn data_node(&self, graph_id: &str) -> Option<&DataNode> {
        self.data_nodes
            .iter()
            .find(|node| node.graph_id.as_deref() == Some(graph_id))
    }

    /// Cross-references of all annotated data nodes, in document order.
    pub fn xrefs(&self) -> Vec<Xref> {
        self.data_nodes
            .iter()
            .filter_map(|node| node.xref.as_ref())
            .filter(|xref| !xref.id.is_empty())
            .map(GpmlXref::to_xref)
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Comment {
    pub source: Option<String>,
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataNode {
    pub graph_id: Option<String>,
    pub text_label: String,
    /// `GeneProduct`, `Protein`, `Metabolite`, `Rna`, `Pathway`, ...
    pub node_type: Option<String>,
    pub graphics: Option<NodeGraphics>,
    pub xref: Option<GpmlXref>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeGraphics {
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
}

/// The `Xref` element as GPML stores it: database full name plus id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GpmlXref {
    pub database: String,
    pub id: String,
}

impl GpmlXref {
    pub fn new(database: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            id: id.into(),
        }
    }

    pub fn from_xref(xref: &Xref) -> Self {
        Self {
            database: xref
                .data_source()
                .map(|source| source.full_name().to_string())
                .unwrap_or_default(),
            id: xref.id().to_string(),
        }
    }

    /// Resolve the database name against the known data sources; unknown
    /// names become a custom source without a system code.
    pub fn to_xref(&self) -> Xref {
        let data_source = if self.database.is_empty() {
            None
        } else {
            Some(
                DataSource::from_full_name(&self.database)
                    .unwrap_or_else(|| DataSource::new(self.database.clone(), "")),
            )
        };
        Xref::new(self.id.clone(), data_source)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Interaction {
    pub graph_id: Option<String>,
    pub points: Vec<Point>,
    pub xref: Option<GpmlXref>,
}

impl Interaction {
    pub fn source(&self) -> Option<&str> {
        self.points.first().and_then(|p| p.graph_ref.as_deref())
    }

    pub fn target(&self) -> Option<&str> {
        if self.points.len() < 2 {
            return None;
        }
        self.points.last().and_then(|p| p.graph_ref.as_deref())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub graph_ref: Option<String>,
    pub arrow_head: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Label {
    pub graph_id: Option<String>,
    pub text_label: String,
    pub graphics: Option<NodeGraphics>,
}

#[cfg(test)]
mod tests {
    use super::{DataNode, GpmlXref, Interaction, Pathway, Point};
    use crate::core::vocab::DataSource;

    #[test]
    fn xrefs_skip_unannotated_nodes() {
        let mut pathway = Pathway::new("Apoptosis");
        pathway.data_nodes.push(DataNode {
            text_label: "TP53".to_string(),
            xref: Some(GpmlXref::new("Entrez Gene", "7157")),
            ..DataNode::default()
        });
        pathway.data_nodes.push(DataNode {
            text_label: "unknown".to_string(),
            xref: Some(GpmlXref::new("", "")),
            ..DataNode::default()
        });
        pathway.data_nodes.push(DataNode {
            text_label: "custom".to_string(),
            xref: Some(GpmlXref::new("LocalDb", "x1")),
            ..DataNode::default()
        });

        let xrefs = pathway.xrefs();
        assert_eq!(xrefs.len(), 2);
        assert_eq!(xrefs[0].data_source(), Some(&DataSource::ENTREZ_GENE));
        assert_eq!(xrefs[1].data_source().map(|s| s.full_name()), Some("LocalDb"));
    }

    #[test]
    fn interaction_endpoints_come_from_first_and_last_point() {
        let interaction = Interaction {
            graph_id: Some("i1".to_string()),
            points: vec![
                Point {
                    graph_ref: Some("a".to_string()),
                    ..Point::default()
                },
                Point::default(),
                Point {
                    graph_ref: Some("b".to_string()),
                    arrow_head: Some("Arrow".to_string()),
                    ..Point::default()
                },
            ],
            xref: None,
        };
        assert_eq!(interaction.source(), Some("a"));
        assert_eq!(interaction.target(), Some("b"));
    }
}
