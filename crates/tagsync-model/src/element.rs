use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Discriminator for the three OSM element kinds.
///
/// Serializes to the lowercase strings used by the Overpass JSON format
/// (`"node"`, `"way"`, `"relation"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Node,
    Way,
    Relation,
}

impl ElementKind {
    /// The lowercase wire/XML name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Node => "node",
            ElementKind::Way => "way",
            ElementKind::Relation => "relation",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance metadata carried by elements that already exist upstream.
///
/// Fetched via `out meta` and echoed verbatim into the output file so an
/// editor can upload the modified element against the right base version.
/// `uid`/`user` are optional because ancient anonymous edits lack them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementMeta {
    pub version: u32,
    pub timestamp: String,
    pub changeset: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// A relation member: kind, referenced element id, and role.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(rename = "ref")]
    pub ref_id: i64,
    #[serde(default)]
    pub role: String,
}

/// A single OSM element: node, way, or relation.
///
/// The field layout matches one entry of the Overpass JSON `elements`
/// array, so a fetched dataset deserializes straight into `Vec<Element>`.
/// Identifiers are non-negative for elements that originate upstream;
/// negative identifiers mark synthetic elements introduced locally.
///
/// The `matched` and `modified` flags are transient reconciliation state:
/// they are never read from or written to any serialized form, and stay
/// `false` until the reconciliation driver sets them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub id: i64,

    /// Node latitude. Absent for ways and relations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    /// Node longitude. Absent for ways and relations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,

    /// Ordered child node references of a way.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<i64>,
    /// Ordered members of a relation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Member>,

    /// The element's tag map. Sorted key order keeps every downstream
    /// iteration (merge decisions, XML output) deterministic.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,

    /// Upstream provenance, present only for remote-origin elements.
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ElementMeta>,

    #[serde(skip)]
    pub matched: bool,
    #[serde(skip)]
    pub modified: bool,
}

impl Element {
    /// Create a bare node with coordinates and tags, no provenance.
    ///
    /// This is the shape of input-dataset records and of synthetic
    /// elements introduced during reconciliation.
    pub fn node(id: i64, lat: f64, lon: f64, tags: BTreeMap<String, String>) -> Self {
        Self {
            kind: ElementKind::Node,
            id,
            lat: Some(lat),
            lon: Some(lon),
            nodes: Vec::new(),
            members: Vec::new(),
            tags,
            meta: None,
            matched: false,
            modified: false,
        }
    }

    /// Look up a tag value.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Returns `true` if this element was introduced locally rather than
    /// fetched from upstream.
    pub fn is_synthetic(&self) -> bool {
        self.id < 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn kind_roundtrips_lowercase() {
        for (kind, name) in [
            (ElementKind::Node, "\"node\""),
            (ElementKind::Way, "\"way\""),
            (ElementKind::Relation, "\"relation\""),
        ] {
            assert_eq!(serde_json::to_string(&kind).unwrap(), name);
            let parsed: ElementKind = serde_json::from_str(name).unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn deserialize_overpass_node_with_meta() {
        let json = r#"{
            "type": "node",
            "id": 123,
            "lat": 59.911491,
            "lon": 10.757933,
            "timestamp": "2021-05-01T12:00:00Z",
            "version": 4,
            "changeset": 99887766,
            "user": "mapper",
            "uid": 42,
            "tags": {"amenity": "fuel", "ref:xx": "100"}
        }"#;

        let element: Element = serde_json::from_str(json).unwrap();
        assert_eq!(element.kind, ElementKind::Node);
        assert_eq!(element.id, 123);
        assert_eq!(element.lat, Some(59.911491));
        assert_eq!(element.tag("amenity"), Some("fuel"));

        let meta = element.meta.expect("meta present");
        assert_eq!(meta.version, 4);
        assert_eq!(meta.changeset, 99887766);
        assert_eq!(meta.user.as_deref(), Some("mapper"));
        assert!(!element.matched);
        assert!(!element.modified);
    }

    #[test]
    fn deserialize_connected_node_without_tags_or_meta() {
        // Recursed-down way nodes arrive with coordinates only when the
        // query does not request meta for them.
        let json = r#"{"type": "node", "id": 7, "lat": 1.0, "lon": 2.0}"#;
        let element: Element = serde_json::from_str(json).unwrap();
        assert!(element.tags.is_empty());
        assert!(element.meta.is_none());
    }

    #[test]
    fn deserialize_way_with_children() {
        let json = r#"{
            "type": "way",
            "id": 55,
            "timestamp": "2020-01-01T00:00:00Z",
            "version": 2,
            "changeset": 100,
            "user": "w",
            "uid": 1,
            "nodes": [1, 2, 3],
            "tags": {"highway": "service"}
        }"#;
        let element: Element = serde_json::from_str(json).unwrap();
        assert_eq!(element.kind, ElementKind::Way);
        assert_eq!(element.nodes, vec![1, 2, 3]);
        assert!(element.meta.is_some());
    }

    #[test]
    fn deserialize_relation_members() {
        let json = r#"{
            "type": "relation",
            "id": 9,
            "timestamp": "2020-01-01T00:00:00Z",
            "version": 1,
            "changeset": 5,
            "user": "r",
            "uid": 2,
            "members": [
                {"type": "way", "ref": 55, "role": "outer"},
                {"type": "node", "ref": 123, "role": ""}
            ]
        }"#;
        let element: Element = serde_json::from_str(json).unwrap();
        assert_eq!(element.members.len(), 2);
        assert_eq!(element.members[0].kind, ElementKind::Way);
        assert_eq!(element.members[0].ref_id, 55);
        assert_eq!(element.members[0].role, "outer");
        assert_eq!(element.members[1].role, "");
    }

    #[test]
    fn anonymous_meta_allows_missing_uid_and_user() {
        let json = r#"{
            "type": "node",
            "id": 3,
            "lat": 0.0,
            "lon": 0.0,
            "timestamp": "2008-03-01T00:00:00Z",
            "version": 1,
            "changeset": 7
        }"#;
        let element: Element = serde_json::from_str(json).unwrap();
        let meta = element.meta.expect("meta present");
        assert_eq!(meta.uid, None);
        assert_eq!(meta.user, None);
    }

    #[test]
    fn node_constructor_is_synthetic_for_negative_ids() {
        let n = Element::node(-1001, 59.0, 10.0, tags(&[("name", "X")]));
        assert!(n.is_synthetic());
        assert_eq!(n.tag("name"), Some("X"));
        assert!(n.meta.is_none());

        let m = Element::node(8, 59.0, 10.0, BTreeMap::new());
        assert!(!m.is_synthetic());
    }

    #[test]
    fn transient_flags_never_serialize() {
        let mut n = Element::node(-1001, 1.0, 2.0, tags(&[("a", "b")]));
        n.matched = true;
        n.modified = true;
        let json = serde_json::to_string(&n).unwrap();
        assert!(!json.contains("matched"));
        assert!(!json.contains("modified"));

        let back: Element = serde_json::from_str(&json).unwrap();
        assert!(!back.matched);
        assert!(!back.modified);
    }
}
