//! Purpose: Parse GPML documents into the in-memory pathway model.
//! Exports: `read_from_xml`.
//! Role: Pull-parser over quick-xml events; one small reader per element kind.
//! Invariants: Comment text is kept byte-for-byte; whitespace between elements is ignored.
//! Invariants: Every failure is `ErrorKind::Format`; unknown elements are skipped whole.
use super::{Comment, DataNode, GpmlXref, Interaction, Label, NodeGraphics, Pathway, Point};
use crate::core::error::{Error, ErrorKind};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

enum Step<'a> {
    Open(BytesStart<'a>),
    Leaf(BytesStart<'a>),
    Text(String),
    Close,
    Other,
}

/// Parse a GPML document into a [`Pathway`].
pub fn read_from_xml(xml: &str) -> Result<Pathway, Error> {
    let mut reader = Reader::from_str(xml);

    let (root, has_children) = loop {
        match step(&mut reader) {
            Ok(Step::Open(start)) => break (start, true),
            Ok(Step::Leaf(start)) => break (start, false),
            Ok(Step::Text(text)) if is_blank(&text) => continue,
            Ok(Step::Text(_)) => {
                return Err(format_error("text content before the root element"));
            }
            Ok(Step::Close) => return Err(format_error("unexpected closing tag")),
            Ok(Step::Other) => continue,
            Err(err) if is_eof(&err) => {
                return Err(format_error("document has no root element"));
            }
            Err(err) => return Err(err),
        }
    };
    if root.local_name().as_ref() != b"Pathway" {
        return Err(format_error(format!(
            "root element must be Pathway, found {}",
            String::from_utf8_lossy(root.local_name().as_ref())
        )));
    }

    let mut pathway = pathway_from_attrs(&root)?;
    if has_children {
        read_pathway_children(&mut reader, &mut pathway)?;
    }
    expect_document_end(&mut reader)?;
    Ok(pathway)
}

fn pathway_from_attrs(root: &BytesStart<'_>) -> Result<Pathway, Error> {
    let name = attr(root, "Name")?
        .ok_or_else(|| format_error("Pathway element is missing the Name attribute"))?;
    Ok(Pathway {
        name,
        organism: attr(root, "Organism")?,
        version: attr(root, "Version")?,
        author: attr(root, "Author")?,
        maintainer: attr(root, "Maintainer")?,
        email: attr(root, "Email")?,
        last_modified: attr(root, "Last-Modified")?,
        ..Pathway::default()
    })
}

fn read_pathway_children(reader: &mut Reader<&[u8]>, pathway: &mut Pathway) -> Result<(), Error> {
    loop {
        let (element, has_children) = match step(reader)? {
            Step::Open(element) => (element, true),
            Step::Leaf(element) => (element, false),
            Step::Close => return Ok(()),
            Step::Text(_) | Step::Other => continue,
        };
        match element.local_name().as_ref() {
            b"Comment" => {
                let text = if has_children {
                    read_text(reader)?
                } else {
                    String::new()
                };
                pathway.comments.push(Comment {
                    source: attr(&element, "Source")?,
                    text,
                });
            }
            b"DataNode" => {
                let mut node = DataNode {
                    graph_id: attr(&element, "GraphId")?,
                    text_label: attr(&element, "TextLabel")?.unwrap_or_default(),
                    node_type: attr(&element, "Type")?,
                    ..DataNode::default()
                };
                if has_children {
                    read_node_children(reader, &mut node.graphics, &mut node.xref)?;
                }
                pathway.data_nodes.push(node);
            }
            b"Label" => {
                let mut label = Label {
                    graph_id: attr(&element, "GraphId")?,
                    text_label: attr(&element, "TextLabel")?.unwrap_or_default(),
                    graphics: None,
                };
                if has_children {
                    let mut ignored = None;
                    read_node_children(reader, &mut label.graphics, &mut ignored)?;
                }
                pathway.labels.push(label);
            }
            b"Interaction" => {
                let mut interaction = Interaction {
                    graph_id: attr(&element, "GraphId")?,
                    ..Interaction::default()
                };
                if has_children {
                    read_interaction_children(reader, &mut interaction)?;
                }
                pathway.interactions.push(interaction);
            }
            _ => {
                if has_children {
                    skip(reader, &element)?;
                }
            }
        }
    }
}

fn read_node_children(
    reader: &mut Reader<&[u8]>,
    graphics: &mut Option<NodeGraphics>,
    xref: &mut Option<GpmlXref>,
) -> Result<(), Error> {
    loop {
        let (element, has_children) = match step(reader)? {
            Step::Open(element) => (element, true),
            Step::Leaf(element) => (element, false),
            Step::Close => return Ok(()),
            Step::Text(_) | Step::Other => continue,
        };
        match element.local_name().as_ref() {
            b"Graphics" => *graphics = Some(node_graphics(&element)?),
            b"Xref" => *xref = Some(gpml_xref(&element)?),
            _ => {}
        }
        if has_children {
            skip(reader, &element)?;
        }
    }
}

fn read_interaction_children(
    reader: &mut Reader<&[u8]>,
    interaction: &mut Interaction,
) -> Result<(), Error> {
    loop {
        let (element, has_children) = match step(reader)? {
            Step::Open(element) => (element, true),
            Step::Leaf(element) => (element, false),
            Step::Close => return Ok(()),
            Step::Text(_) | Step::Other => continue,
        };
        match element.local_name().as_ref() {
            b"Graphics" if has_children => {
                interaction.points = read_points(reader)?;
                continue;
            }
            b"Xref" => interaction.xref = Some(gpml_xref(&element)?),
            _ => {}
        }
        if has_children {
            skip(reader, &element)?;
        }
    }
}

fn read_points(reader: &mut Reader<&[u8]>) -> Result<Vec<Point>, Error> {
    let mut points = Vec::new();
    loop {
        let (element, has_children) = match step(reader)? {
            Step::Open(element) => (element, true),
            Step::Leaf(element) => (element, false),
            Step::Close => return Ok(points),
            Step::Text(_) | Step::Other => continue,
        };
        if element.local_name().as_ref() == b"Point" {
            points.push(Point {
                x: number_attr(&element, "X")?,
                y: number_attr(&element, "Y")?,
                graph_ref: attr(&element, "GraphRef")?,
                arrow_head: attr(&element, "ArrowHead")?,
            });
        }
        if has_children {
            skip(reader, &element)?;
        }
    }
}

fn node_graphics(element: &BytesStart<'_>) -> Result<NodeGraphics, Error> {
    Ok(NodeGraphics {
        center_x: number_attr(element, "CenterX")?,
        center_y: number_attr(element, "CenterY")?,
        width: number_attr(element, "Width")?,
        height: number_attr(element, "Height")?,
    })
}

fn gpml_xref(element: &BytesStart<'_>) -> Result<GpmlXref, Error> {
    Ok(GpmlXref {
        database: attr(element, "Database")?.unwrap_or_default(),
        id: attr(element, "ID")?.unwrap_or_default(),
    })
}

/// Collect the text content of the current element up to its closing tag.
fn read_text(reader: &mut Reader<&[u8]>) -> Result<String, Error> {
    let mut text = String::new();
    loop {
        match step(reader)? {
            Step::Text(chunk) => text.push_str(&chunk),
            Step::Open(element) => skip(reader, &element)?,
            Step::Close => return Ok(text),
            Step::Leaf(_) | Step::Other => {}
        }
    }
}

fn skip(reader: &mut Reader<&[u8]>, element: &BytesStart<'_>) -> Result<(), Error> {
    reader
        .read_to_end(element.name())
        .map(|_| ())
        .map_err(|err| xml_error(reader, err))
}

fn expect_document_end(reader: &mut Reader<&[u8]>) -> Result<(), Error> {
    loop {
        match step(reader) {
            Ok(Step::Other) => continue,
            Ok(Step::Text(text)) if is_blank(&text) => continue,
            Ok(_) => return Err(format_error("content after the root element")),
            Err(err) if is_eof(&err) => return Ok(()),
            Err(err) => return Err(err),
        }
    }
}

fn step<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Step<'a>, Error> {
    match reader.read_event() {
        Ok(Event::Start(element)) => Ok(Step::Open(element)),
        Ok(Event::Empty(element)) => Ok(Step::Leaf(element)),
        Ok(Event::End(_)) => Ok(Step::Close),
        Ok(Event::Text(text)) => text
            .unescape()
            .map(|text| Step::Text(text.into_owned()))
            .map_err(|err| xml_error(reader, err)),
        Ok(Event::CData(data)) => String::from_utf8(data.into_inner().into_owned())
            .map(Step::Text)
            .map_err(|err| format_error("CDATA section is not valid UTF-8").with_source(err)),
        Ok(Event::Eof) => Err(eof_error()),
        Ok(_) => Ok(Step::Other),
        Err(err) => Err(xml_error(reader, err)),
    }
}

fn attr(element: &BytesStart<'_>, name: &str) -> Result<Option<String>, Error> {
    for attribute in element.attributes() {
        let attribute = attribute
            .map_err(|err| format_error("malformed attribute").with_source(err))?;
        if attribute.key.local_name().as_ref() == name.as_bytes() {
            let value = attribute.unescape_value().map_err(|err| {
                format_error(format!("invalid value for attribute {name}")).with_source(err)
            })?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn number_attr(element: &BytesStart<'_>, name: &str) -> Result<f64, Error> {
    let Some(raw) = attr(element, name)? else {
        return Ok(0.0);
    };
    raw.trim().parse::<f64>().map_err(|err| {
        format_error(format!("attribute {name} is not a number: {raw:?}")).with_source(err)
    })
}

fn is_blank(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

const EOF_MESSAGE: &str = "unexpected end of document";

fn eof_error() -> Error {
    format_error(EOF_MESSAGE)
}

fn is_eof(err: &Error) -> bool {
    err.kind() == ErrorKind::Format && err.message() == Some(EOF_MESSAGE)
}

fn format_error(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::Format).with_message(message)
}

fn xml_error(reader: &Reader<&[u8]>, err: quick_xml::Error) -> Error {
    format_error(format!("malformed GPML at byte {}", reader.buffer_position())).with_source(err)
}

#[cfg(test)]
mod tests {
    use super::read_from_xml;
    use crate::core::error::ErrorKind;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Pathway xmlns="http://pathvisio.org/GPML/2013a" Name="Sample &amp; Test" Organism="Homo sapiens" Last-Modified="20110615">
  <Comment Source="WikiPathways-description">A small pathway.</Comment>
  <Comment><![CDATA[x < y]]></Comment>
  <BiopaxRef>abc</BiopaxRef>
  <Graphics BoardWidth="500.0" BoardHeight="300.0" />
  <DataNode TextLabel="TP53" GraphId="a1" Type="GeneProduct">
    <Attribute Key="note" Value="x" />
    <Graphics CenterX="100.0" CenterY="50.5" Width="80.0" Height="20.0" ZOrder="32768" />
    <Xref Database="Entrez Gene" ID="7157" />
  </DataNode>
  <DataNode TextLabel="MDM2" GraphId="b2" Type="GeneProduct" />
  <Interaction GraphId="i1">
    <Graphics ZOrder="12288" LineThickness="1.0">
      <Point X="140.0" Y="50.5" GraphRef="a1" RelX="1.0" RelY="0.0" />
      <Point X="200.0" Y="50.5" GraphRef="b2" ArrowHead="mim-inhibition" />
      <Anchor Position="0.5" Shape="None" GraphId="an1" />
    </Graphics>
    <Xref Database="" ID="" />
  </Interaction>
  <Label TextLabel="Nucleus" GraphId="l1">
    <Graphics CenterX="10" CenterY="20" Width="30" Height="40" />
  </Label>
  <InfoBox CenterX="0.0" CenterY="0.0" />
  <Biopax>
    <bp:PublicationXref xmlns:bp="http://www.biopax.org/release/biopax-level3.owl#" />
  </Biopax>
</Pathway>
"#;

    #[test]
    fn reads_model_elements_and_skips_the_rest() {
        let pathway = read_from_xml(SAMPLE).expect("pathway");
        assert_eq!(pathway.name, "Sample & Test");
        assert_eq!(pathway.organism.as_deref(), Some("Homo sapiens"));
        assert_eq!(pathway.last_modified.as_deref(), Some("20110615"));
        assert_eq!(pathway.comments.len(), 2);
        assert_eq!(pathway.comments[0].text, "A small pathway.");
        assert_eq!(pathway.comments[1].text, "x < y");
        assert_eq!(pathway.comments[1].source, None);
        assert_eq!(
            pathway.comments[0].source.as_deref(),
            Some("WikiPathways-description")
        );

        assert_eq!(pathway.data_nodes.len(), 2);
        let tp53 = pathway.data_node("a1").expect("tp53");
        assert_eq!(tp53.text_label, "TP53");
        let graphics = tp53.graphics.expect("graphics");
        assert_eq!(graphics.center_y, 50.5);
        assert_eq!(tp53.xref.as_ref().map(|x| x.id.as_str()), Some("7157"));
        assert!(pathway.data_node("b2").expect("mdm2").xref.is_none());

        let interaction = &pathway.interactions[0];
        assert_eq!(interaction.points.len(), 2);
        assert_eq!(interaction.source(), Some("a1"));
        assert_eq!(interaction.target(), Some("b2"));
        assert_eq!(
            interaction.points[1].arrow_head.as_deref(),
            Some("mim-inhibition")
        );

        assert_eq!(pathway.labels[0].text_label, "Nucleus");
        assert_eq!(pathway.labels[0].graphics.expect("graphics").height, 40.0);
    }

    #[test]
    fn empty_root_is_a_valid_pathway() {
        let pathway = read_from_xml(r#"<Pathway Name="Empty"/>"#).expect("pathway");
        assert_eq!(pathway.name, "Empty");
        assert!(pathway.data_nodes.is_empty());
    }

    #[test]
    fn malformed_xml_is_format_error() {
        let err = read_from_xml(r#"<Pathway Name="x"><DataNode></Pathway>"#).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn truncated_document_is_format_error() {
        let err = read_from_xml(r#"<Pathway Name="x"><DataNode TextLabel="a">"#).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn wrong_root_and_missing_name_are_rejected() {
        let err = read_from_xml("<html/>").expect_err("err");
        assert_eq!(err.kind(), ErrorKind::Format);
        let err = read_from_xml("<Pathway Organism=\"Homo sapiens\"/>").expect_err("err");
        assert_eq!(err.kind(), ErrorKind::Format);
        let err = read_from_xml("").expect_err("err");
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn non_numeric_coordinates_are_rejected() {
        let xml = r#"<Pathway Name="x"><DataNode><Graphics CenterX="left"/></DataNode></Pathway>"#;
        let err = read_from_xml(xml).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn comment_whitespace_is_preserved() {
        let xml = concat!(
            "<Pathway Name=\"x\">\n",
            "  <Comment>  padded\n</Comment>\n",
            "  <Comment Source=\"s\">   </Comment>\n",
            "</Pathway>\n",
        );
        let pathway = read_from_xml(xml).expect("pathway");
        assert_eq!(pathway.comments[0].text, "  padded\n");
        assert_eq!(pathway.comments[1].text, "   ");
        assert_eq!(pathway.comments[1].source.as_deref(), Some("s"));
    }

    #[test]
    fn text_outside_the_root_is_rejected() {
        let err = read_from_xml(r#"<Pathway Name="a"/> trailing"#).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn second_root_is_rejected() {
        let err = read_from_xml(r#"<Pathway Name="a"/><Pathway Name="b"/>"#).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
