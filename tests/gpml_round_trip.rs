//! Purpose: Check the GPML reader and writer agree on every part of the model.
//! Exports: None (integration test module).
//! Role: Exercise the public GPML entry points without any network.

use wpclient::api::{
    Comment, DataNode, DataSource, ErrorKind, GPML_NAMESPACE, GpmlXref, Interaction, Label,
    NodeGraphics, Pathway, Point, Xref, read_from_xml, write_to_xml,
};

type TestResult<T> = Result<T, Box<dyn std::error::Error>>;

fn sample_pathway() -> Pathway {
    let mut pathway = Pathway::new("Glycolysis & \"friends\"");
    pathway.organism = Some("Homo sapiens".to_string());
    pathway.version = Some("20110415".to_string());
    pathway.author = Some("Kristina Hanspers".to_string());
    pathway.last_modified = Some("20110415".to_string());
    pathway.comments.push(Comment {
        source: Some("WikiPathways-description".to_string()),
        text: "Glucose is converted to pyruvate <in the cytosol>.".to_string(),
    });
    pathway.data_nodes.push(DataNode {
        graph_id: Some("hk1".to_string()),
        text_label: "HK1".to_string(),
        node_type: Some("GeneProduct".to_string()),
        graphics: Some(NodeGraphics {
            center_x: 120.5,
            center_y: 80.0,
            width: 90.0,
            height: 25.0,
        }),
        xref: Some(GpmlXref::from_xref(&Xref::new(
            "3098",
            Some(DataSource::ENTREZ_GENE),
        ))),
    });
    pathway.data_nodes.push(DataNode {
        graph_id: Some("glc".to_string()),
        text_label: "Glucose".to_string(),
        node_type: Some("Metabolite".to_string()),
        graphics: None,
        xref: Some(GpmlXref::new("HMDB", "HMDB0000122")),
    });
    pathway.data_nodes.push(DataNode {
        text_label: "unannotated".to_string(),
        ..DataNode::default()
    });
    pathway.interactions.push(Interaction {
        graph_id: Some("int1".to_string()),
        points: vec![
            Point {
                x: 120.5,
                y: 92.5,
                graph_ref: Some("glc".to_string()),
                arrow_head: None,
            },
            Point {
                x: 120.5,
                y: 200.0,
                graph_ref: Some("hk1".to_string()),
                arrow_head: Some("mim-catalysis".to_string()),
            },
        ],
        xref: None,
    });
    pathway.labels.push(Label {
        graph_id: Some("lbl".to_string()),
        text_label: "Cytosol".to_string(),
        graphics: Some(NodeGraphics {
            center_x: 10.0,
            center_y: 10.0,
            width: 60.0,
            height: 15.0,
        }),
    });
    pathway
}

#[test]
fn written_document_reads_back_equal() -> TestResult<()> {
    let pathway = sample_pathway();
    let xml = write_to_xml(&pathway)?;
    assert!(xml.contains(GPML_NAMESPACE));
    let parsed = read_from_xml(&xml)?;
    assert_eq!(parsed, pathway);
    assert_eq!(write_to_xml(&parsed)?, xml);
    Ok(())
}

#[test]
fn comment_text_survives_exactly() -> TestResult<()> {
    let mut pathway = Pathway::new("Whitespace");
    pathway.comments.push(Comment {
        source: None,
        text: "  padded note\n".to_string(),
    });
    pathway.comments.push(Comment {
        source: Some("s".to_string()),
        text: "   ".to_string(),
    });
    pathway.comments.push(Comment {
        source: None,
        text: String::new(),
    });
    let parsed = read_from_xml(&write_to_xml(&pathway)?)?;
    assert_eq!(parsed.comments, pathway.comments);
    assert_eq!(parsed, pathway);
    Ok(())
}

#[test]
fn xrefs_resolve_known_databases() -> TestResult<()> {
    let parsed = read_from_xml(&write_to_xml(&sample_pathway())?)?;
    let xrefs = parsed.xrefs();
    assert_eq!(xrefs.len(), 2);
    assert_eq!(xrefs[0], Xref::new("3098", Some(DataSource::ENTREZ_GENE)));
    assert_eq!(xrefs[1].data_source().map(DataSource::system_code), Some("Ch"));
    assert_eq!(parsed.data_node("glc").map(|node| node.text_label.as_str()), Some("Glucose"));
    Ok(())
}

#[test]
fn elements_outside_the_model_are_skipped() -> TestResult<()> {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<Pathway xmlns="http://pathvisio.org/GPML/2013a" Name="With extras">
  <Graphics BoardWidth="500.0" BoardHeight="400.0"/>
  <DataNode TextLabel="TP53" GraphId="a1">
    <Attribute Key="note" Value="x"/>
    <Xref Database="Entrez Gene" ID="7157"/>
  </DataNode>
  <Group GroupId="g1" Style="Complex"/>
  <Shape GraphId="s1"><Graphics CenterX="1" CenterY="1" Width="1" Height="1"/></Shape>
  <Biopax>
    <bp:PublicationXref xmlns:bp="http://www.biopax.org/release/biopax-level3.owl#">
      <bp:ID>18651794</bp:ID>
    </bp:PublicationXref>
  </Biopax>
  <InfoBox CenterX="0.0" CenterY="0.0"/>
</Pathway>"#;
    let parsed = read_from_xml(xml)?;
    assert_eq!(parsed.name, "With extras");
    assert_eq!(parsed.data_nodes.len(), 1);
    assert!(parsed.labels.is_empty());
    assert_eq!(
        parsed.data_nodes[0].xref,
        Some(GpmlXref::new("Entrez Gene", "7157"))
    );
    Ok(())
}

#[test]
fn non_gpml_input_is_format_error() {
    for input in ["", "not xml", "<Pathway>", "<Other Name=\"x\"/>"] {
        let err = read_from_xml(input).expect_err(input);
        assert_eq!(err.kind(), ErrorKind::Format, "{input}");
    }
}
