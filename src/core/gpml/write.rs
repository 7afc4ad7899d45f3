//! Purpose: Serialize the pathway model as a GPML 2013a document.
//! Exports: `write_to_xml`.
//! Role: Indented quick-xml writer emitting only the elements the model carries.
//! Invariants: Output always declares `GPML_NAMESPACE` and ends with an `InfoBox`.
//! Invariants: Non-finite coordinates are rejected with `ErrorKind::Format`.
use super::{GPML_NAMESPACE, GpmlXref, NodeGraphics, Pathway, Point};
use crate::core::error::{Error, ErrorKind};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

type XmlWriter = Writer<Vec<u8>>;

/// Serialize a [`Pathway`] as a GPML 2013a document.
pub fn write_to_xml(pathway: &Pathway) -> Result<String, Error> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;

    let mut root = BytesStart::new("Pathway");
    root.push_attribute(("xmlns", GPML_NAMESPACE));
    root.push_attribute(("Name", pathway.name.as_str()));
    push_optional(&mut root, "Organism", pathway.organism.as_deref());
    push_optional(&mut root, "Version", pathway.version.as_deref());
    push_optional(&mut root, "Author", pathway.author.as_deref());
    push_optional(&mut root, "Maintainer", pathway.maintainer.as_deref());
    push_optional(&mut root, "Email", pathway.email.as_deref());
    push_optional(&mut root, "Last-Modified", pathway.last_modified.as_deref());
    emit(&mut writer, Event::Start(root))?;

    for comment in &pathway.comments {
        let mut element = BytesStart::new("Comment");
        push_optional(&mut element, "Source", comment.source.as_deref());
        if comment.text.is_empty() {
            emit(&mut writer, Event::Empty(element))?;
        } else {
            emit(&mut writer, Event::Start(element))?;
            emit(&mut writer, Event::Text(BytesText::new(&comment.text)))?;
            emit(&mut writer, Event::End(BytesEnd::new("Comment")))?;
        }
    }

    for node in &pathway.data_nodes {
        let mut element = BytesStart::new("DataNode");
        element.push_attribute(("TextLabel", node.text_label.as_str()));
        push_optional(&mut element, "GraphId", node.graph_id.as_deref());
        push_optional(&mut element, "Type", node.node_type.as_deref());
        write_node_like(&mut writer, element, "DataNode", node.graphics, node.xref.as_ref())?;
    }

    for interaction in &pathway.interactions {
        let mut element = BytesStart::new("Interaction");
        push_optional(&mut element, "GraphId", interaction.graph_id.as_deref());
        if interaction.points.is_empty() && interaction.xref.is_none() {
            emit(&mut writer, Event::Empty(element))?;
            continue;
        }
        emit(&mut writer, Event::Start(element))?;
        if !interaction.points.is_empty() {
            let mut graphics = BytesStart::new("Graphics");
            graphics.push_attribute(("LineThickness", "1.0"));
            emit(&mut writer, Event::Start(graphics))?;
            for point in &interaction.points {
                emit(&mut writer, Event::Empty(point_element(point)?))?;
            }
            emit(&mut writer, Event::End(BytesEnd::new("Graphics")))?;
        }
        if let Some(xref) = &interaction.xref {
            emit(&mut writer, Event::Empty(xref_element(xref)))?;
        }
        emit(&mut writer, Event::End(BytesEnd::new("Interaction")))?;
    }

    for label in &pathway.labels {
        let mut element = BytesStart::new("Label");
        element.push_attribute(("TextLabel", label.text_label.as_str()));
        push_optional(&mut element, "GraphId", label.graph_id.as_deref());
        write_node_like(&mut writer, element, "Label", label.graphics, None)?;
    }

    let mut info_box = BytesStart::new("InfoBox");
    info_box.push_attribute(("CenterX", "0.0"));
    info_box.push_attribute(("CenterY", "0.0"));
    emit(&mut writer, Event::Empty(info_box))?;
    emit(&mut writer, Event::End(BytesEnd::new("Pathway")))?;

    String::from_utf8(writer.into_inner()).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("serialized GPML is not valid UTF-8")
            .with_source(err)
    })
}

fn write_node_like(
    writer: &mut XmlWriter,
    element: BytesStart<'_>,
    name: &str,
    graphics: Option<NodeGraphics>,
    xref: Option<&GpmlXref>,
) -> Result<(), Error> {
    if graphics.is_none() && xref.is_none() {
        return emit(writer, Event::Empty(element));
    }
    emit(writer, Event::Start(element))?;
    if let Some(graphics) = graphics {
        let mut element = BytesStart::new("Graphics");
        element.push_attribute(("CenterX", number(graphics.center_x, "CenterX")?.as_str()));
        element.push_attribute(("CenterY", number(graphics.center_y, "CenterY")?.as_str()));
        element.push_attribute(("Width", number(graphics.width, "Width")?.as_str()));
        element.push_attribute(("Height", number(graphics.height, "Height")?.as_str()));
        emit(writer, Event::Empty(element))?;
    }
    if let Some(xref) = xref {
        emit(writer, Event::Empty(xref_element(xref)))?;
    }
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn point_element(point: &Point) -> Result<BytesStart<'static>, Error> {
    let mut element = BytesStart::new("Point");
    element.push_attribute(("X", number(point.x, "X")?.as_str()));
    element.push_attribute(("Y", number(point.y, "Y")?.as_str()));
    push_optional(&mut element, "GraphRef", point.graph_ref.as_deref());
    push_optional(&mut element, "ArrowHead", point.arrow_head.as_deref());
    Ok(element)
}

fn xref_element(xref: &GpmlXref) -> BytesStart<'static> {
    let mut element = BytesStart::new("Xref");
    element.push_attribute(("Database", xref.database.as_str()));
    element.push_attribute(("ID", xref.id.as_str()));
    element
}

fn push_optional(element: &mut BytesStart<'_>, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        element.push_attribute((name, value));
    }
}

fn number(value: f64, name: &str) -> Result<String, Error> {
    if !value.is_finite() {
        return Err(Error::new(ErrorKind::Format)
            .with_message(format!("{name} must be a finite number, got {value}")));
    }
    Ok(value.to_string())
}

fn emit(writer: &mut XmlWriter, event: Event<'_>) -> Result<(), Error> {
    writer.write_event(event).map_err(|err| {
        Error::new(ErrorKind::Format)
            .with_message("failed to write GPML")
            .with_source(err)
    })
}

#[cfg(test)]
mod tests {
    use super::write_to_xml;
    use crate::core::error::ErrorKind;
    use crate::core::gpml::{DataNode, NodeGraphics, Pathway};

    #[test]
    fn output_declares_namespace_and_escapes_attributes() {
        let mut pathway = Pathway::new("A <b> & \"c\"");
        pathway.organism = Some("Homo sapiens".to_string());
        let xml = write_to_xml(&pathway).expect("xml");
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("xmlns=\"http://pathvisio.org/GPML/2013a\""));
        assert!(xml.contains("Name=\"A &lt;b&gt; &amp; &quot;c&quot;\""));
        assert!(xml.contains("Organism=\"Homo sapiens\""));
        assert!(xml.contains("<InfoBox"));
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let mut pathway = Pathway::new("bad");
        pathway.data_nodes.push(DataNode {
            text_label: "x".to_string(),
            graphics: Some(NodeGraphics {
                center_x: f64::NAN,
                ..NodeGraphics::default()
            }),
            ..DataNode::default()
        });
        let err = write_to_xml(&pathway).expect_err("err");
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
