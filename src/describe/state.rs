//! Declarative state documents.
//!
//! A state document maps state identifiers (`user-<name>`, `group-<name>`)
//! to a state function id holding an ordered list of single-key property
//! mappings. Property order is whatever construction order was, and the
//! YAML renderer preserves document insertion order.

use serde_yaml::{Mapping, Sequence, Value};

/// Ordered list of single-key property mappings for one state entry.
#[derive(Debug, Default)]
pub struct PropertyList {
    properties: Sequence,
}

impl PropertyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a property.
    pub fn push(&mut self, key: &str, value: impl Into<Value>) {
        let mut property = Mapping::new();
        property.insert(Value::from(key), value.into());
        self.properties.push(Value::Mapping(property));
    }

    /// Append a string property only when it is non-empty.
    ///
    /// Getent reports unset GECOS fields as empty strings; those are
    /// omitted from the emitted state rather than written out empty.
    pub fn push_nonempty(&mut self, key: &str, value: &str) {
        if !value.is_empty() {
            self.push(key, value);
        }
    }

    fn into_value(self) -> Value {
        Value::Sequence(self.properties)
    }
}

/// A document of state entries, rendered in insertion order.
#[derive(Debug, Default)]
pub struct StateDocument {
    entries: Mapping,
}

impl StateDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a state entry: `<id>: { <function>: [properties...] }`.
    pub fn add(&mut self, id: String, function: &str, properties: PropertyList) {
        let mut state = Mapping::new();
        state.insert(Value::from(function), properties.into_value());
        self.entries.insert(Value::from(id), Value::Mapping(state));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the document as YAML.
    pub fn render(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.entries)
    }
}

/// A pillar document: one top-level section mapping keys to secrets.
///
/// Written even when empty so the pillar tree mirrors the state tree.
#[derive(Debug)]
pub struct PillarDocument {
    section: String,
    values: Mapping,
}

impl PillarDocument {
    pub fn new(section: &str) -> Self {
        Self {
            section: section.to_string(),
            values: Mapping::new(),
        }
    }

    /// Add an entry under the section.
    pub fn insert(&mut self, key: &str, value: &str) {
        self.values.insert(Value::from(key), Value::from(value));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Render the document as YAML.
    pub fn render(&self) -> Result<String, serde_yaml::Error> {
        let mut document = Mapping::new();
        document.insert(
            Value::from(self.section.as_str()),
            Value::Mapping(self.values.clone()),
        );
        serde_yaml::to_string(&document)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_group_entry() {
        let mut properties = PropertyList::new();
        properties.push("name", "adm");
        properties.push("gid", 4);

        let mut document = StateDocument::new();
        document.add("group-adm".to_string(), "group.present", properties);

        assert_eq!(
            document.render().unwrap(),
            "group-adm:\n  group.present:\n  - name: adm\n  - gid: 4\n"
        );
    }

    #[test]
    fn test_render_preserves_insertion_order() {
        let mut document = StateDocument::new();
        for (name, gid) in [("adm", 4), ("root", 0)] {
            let mut properties = PropertyList::new();
            properties.push("name", name);
            properties.push("gid", gid);
            document.add(format!("group-{name}"), "group.present", properties);
        }

        assert_eq!(
            document.render().unwrap(),
            "group-adm:\n  group.present:\n  - name: adm\n  - gid: 4\n\
             group-root:\n  group.present:\n  - name: root\n  - gid: 0\n"
        );
    }

    #[test]
    fn test_render_nested_list_property() {
        let mut properties = PropertyList::new();
        properties.push("name", "adm");
        properties.push(
            "members",
            Value::Sequence(vec![Value::from("syslog"), Value::from("whytewolf")]),
        );

        let mut document = StateDocument::new();
        document.add("group-adm".to_string(), "group.present", properties);

        assert_eq!(
            document.render().unwrap(),
            "group-adm:\n  group.present:\n  - name: adm\n  - members:\n    - syslog\n    - whytewolf\n"
        );
    }

    #[test]
    fn test_push_nonempty_skips_empty_strings() {
        let mut properties = PropertyList::new();
        properties.push("name", "testuser");
        properties.push_nonempty("fullname", "");
        properties.push_nonempty("roomnumber", "101");

        let mut document = StateDocument::new();
        document.add("user-testuser".to_string(), "user.present", properties);

        let rendered = document.render().unwrap();
        assert!(!rendered.contains("fullname"));
        assert!(rendered.contains("- roomnumber: '101'"));
    }

    #[test]
    fn test_pillar_document_render() {
        let mut pillar = PillarDocument::new("users");
        pillar.insert("testuser", "$5$k69zJBp1LxA3q8az$XKEp1knAex0j");

        assert_eq!(
            pillar.render().unwrap(),
            "users:\n  testuser: $5$k69zJBp1LxA3q8az$XKEp1knAex0j\n"
        );
    }

    #[test]
    fn test_pillar_document_renders_empty_section() {
        let pillar = PillarDocument::new("users");
        assert!(pillar.is_empty());
        assert_eq!(pillar.render().unwrap(), "users: {}\n");
    }
}
