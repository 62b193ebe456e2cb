//! Writer for the merged .osm output file.
//!
//! The output is meant to be opened in an editor for review, so uploads
//! are disabled in the header. Synthetic records are written as new
//! nodes, pre-existing records keep their provenance attributes, and any
//! record with the modified flag set carries `action="modify"`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use tagsync_model::Element;

use crate::error::OsmResult;

/// Serialize a record collection as an OSM XML document.
pub fn write_osm<W: Write>(out: W, elements: &[Element], generator: &str) -> OsmResult<()> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut osm = BytesStart::new("osm");
    osm.push_attribute(("version", "0.6"));
    osm.push_attribute(("generator", generator));
    osm.push_attribute(("upload", "false"));
    writer.write_event(Event::Start(osm))?;

    for element in elements {
        write_element(&mut writer, element)?;
    }

    writer.write_event(Event::End(BytesEnd::new("osm")))?;
    let mut inner = writer.into_inner();
    inner.write_all(b"\n")?;
    Ok(())
}

/// Serialize a record collection to a file.
pub fn write_osm_file(path: &Path, elements: &[Element], generator: &str) -> OsmResult<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write_osm(&mut out, elements, generator)?;
    out.flush()?;
    Ok(())
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> OsmResult<()> {
    let name = element.kind.as_str();
    let mut start = BytesStart::new(name);
    start.push_attribute(("id", element.id.to_string().as_str()));

    if element.is_synthetic() {
        start.push_attribute(("action", "modify"));
        start.push_attribute(("visible", "true"));
    } else {
        if element.modified {
            start.push_attribute(("action", "modify"));
        }
        if let Some(meta) = &element.meta {
            start.push_attribute(("timestamp", meta.timestamp.as_str()));
            if let Some(uid) = meta.uid {
                start.push_attribute(("uid", uid.to_string().as_str()));
            }
            if let Some(user) = &meta.user {
                start.push_attribute(("user", user.as_str()));
            }
            start.push_attribute(("visible", "true"));
            start.push_attribute(("version", meta.version.to_string().as_str()));
            start.push_attribute(("changeset", meta.changeset.to_string().as_str()));
        }
    }

    if let (Some(lat), Some(lon)) = (element.lat, element.lon) {
        start.push_attribute(("lat", format_coordinate(lat).as_str()));
        start.push_attribute(("lon", format_coordinate(lon).as_str()));
    }

    let has_children = !element.nodes.is_empty()
        || !element.members.is_empty()
        || element.tags.values().any(|v| !v.trim().is_empty());
    if !has_children {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;

    for node_ref in &element.nodes {
        let mut nd = BytesStart::new("nd");
        nd.push_attribute(("ref", node_ref.to_string().as_str()));
        writer.write_event(Event::Empty(nd))?;
    }

    for member in &element.members {
        let mut entry = BytesStart::new("member");
        entry.push_attribute(("type", member.kind.as_str()));
        entry.push_attribute(("ref", member.ref_id.to_string().as_str()));
        entry.push_attribute(("role", member.role.as_str()));
        writer.write_event(Event::Empty(entry))?;
    }

    for (key, value) in &element.tags {
        // Tags with empty values are dropped from the output.
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let mut tag = BytesStart::new("tag");
        tag.push_attribute(("k", key.as_str()));
        tag.push_attribute(("v", value));
        writer.write_event(Event::Empty(tag))?;
    }

    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn format_coordinate(value: f64) -> String {
    format!("{value:.7}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::parse_nodes;
    use std::collections::BTreeMap;
    use tagsync_model::{ElementKind, ElementMeta, Member};

    fn tags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn render(elements: &[Element]) -> String {
        let mut out = Vec::new();
        write_osm(&mut out, elements, "tagsync v0.1.0").unwrap();
        String::from_utf8(out).unwrap()
    }

    fn remote_node(id: i64, pairs: &[(&str, &str)]) -> Element {
        let mut node = Element::node(id, 59.911491, 10.757933, tags(pairs));
        node.meta = Some(ElementMeta {
            version: 3,
            timestamp: "2021-05-01T12:00:00Z".to_string(),
            changeset: 100,
            uid: Some(42),
            user: Some("mapper".to_string()),
        });
        node
    }

    #[test]
    fn header_disables_upload() {
        let xml = render(&[]);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(r#"<osm version="0.6" generator="tagsync v0.1.0" upload="false">"#));
        assert!(xml.ends_with("</osm>\n"));
    }

    #[test]
    fn synthetic_node_is_written_as_new() {
        let node = {
            let mut n = Element::node(-1001, 59.911491, 10.757933, tags(&[("name", "Ny")]));
            n.modified = true;
            n
        };
        let xml = render(&[node]);
        assert!(xml.contains(
            r#"<node id="-1001" action="modify" visible="true" lat="59.9114910" lon="10.7579330">"#
        ));
        assert!(xml.contains(r#"<tag k="name" v="Ny"/>"#));
        assert!(!xml.contains("timestamp"));
    }

    #[test]
    fn remote_node_keeps_provenance() {
        let node = remote_node(7, &[("ref:xx", "100")]);
        let xml = render(&[node]);
        assert!(xml.contains(
            r#"<node id="7" timestamp="2021-05-01T12:00:00Z" uid="42" user="mapper" visible="true" version="3" changeset="100" lat="59.9114910" lon="10.7579330">"#
        ));
    }

    #[test]
    fn modified_remote_node_carries_action() {
        let mut node = remote_node(7, &[("ref:xx", "100")]);
        node.modified = true;
        let xml = render(&[node]);
        assert!(xml.contains(r#"<node id="7" action="modify" timestamp="#));
    }

    #[test]
    fn anonymous_meta_omits_uid_and_user() {
        let mut node = remote_node(7, &[("ref:xx", "100")]);
        if let Some(meta) = node.meta.as_mut() {
            meta.uid = None;
            meta.user = None;
        }
        let xml = render(&[node]);
        assert!(xml.contains(r#"<node id="7" timestamp="2021-05-01T12:00:00Z" visible="true""#));
        assert!(!xml.contains("uid="));
        assert!(!xml.contains("user="));
    }

    #[test]
    fn way_children_and_relation_members_are_written() {
        let way = Element {
            kind: ElementKind::Way,
            id: 10,
            lat: None,
            lon: None,
            nodes: vec![1, 2],
            members: Vec::new(),
            tags: tags(&[("highway", "service")]),
            meta: None,
            matched: false,
            modified: false,
        };
        let relation = Element {
            kind: ElementKind::Relation,
            id: 20,
            lat: None,
            lon: None,
            nodes: Vec::new(),
            members: vec![Member {
                kind: ElementKind::Way,
                ref_id: 10,
                role: "outer".to_string(),
            }],
            tags: BTreeMap::new(),
            meta: None,
            matched: false,
            modified: false,
        };

        let xml = render(&[way, relation]);
        assert!(xml.contains(r#"<way id="10">"#));
        assert!(xml.contains(r#"<nd ref="1"/>"#));
        assert!(xml.contains(r#"<nd ref="2"/>"#));
        assert!(xml.contains(r#"<relation id="20">"#));
        assert!(xml.contains(r#"<member type="way" ref="10" role="outer"/>"#));
        assert!(xml.contains("</relation>"));
    }

    #[test]
    fn tag_values_are_escaped_and_trimmed() {
        let node = Element::node(
            -1001,
            1.0,
            2.0,
            tags(&[("name", " Fish & Chips "), ("note", "   ")]),
        );
        let xml = render(&[node]);
        assert!(xml.contains(r#"<tag k="name" v="Fish &amp; Chips"/>"#));
        assert!(!xml.contains(r#"k="note""#));
    }

    #[test]
    fn written_nodes_can_be_read_back() {
        let node = Element::node(-1001, 59.5, 10.5, tags(&[("name", "Ny"), ("ref:xx", "1")]));
        let xml = render(&[node]);
        let back = parse_nodes(&xml).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].id, -1001);
        assert_eq!(back[0].tag("name"), Some("Ny"));
        assert_eq!(back[0].tag("ref:xx"), Some("1"));
    }
}
