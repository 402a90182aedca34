//! Wire data model for the Jira REST v2 API.
//!
//! [`Issue`] and [`EditMeta`] are read-only snapshots decoded from server
//! responses. [`IssueUpdate`] is the only entity this client constructs
//! and owns: it is populated either by the edit loop (diffing the edited
//! buffer against the original issue) or directly from command flags, then
//! submitted and discarded.

use std::collections::BTreeMap;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A remote issue, identified by its key (e.g. "PROJ-123").
///
/// Fields are a loosely-typed mapping; the server decides their shapes.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Issue {
    pub key: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
    /// Resource URL reported by the server, when present.
    #[serde(default, rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
}

/// Server-declared schema of the fields editable in the issue's current
/// state. Consumed only as validation input to the edit loop.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct EditMeta {
    #[serde(default)]
    pub fields: BTreeMap<String, FieldMeta>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct FieldMeta {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub name: String,
    /// Verbs the server accepts for this field ("set", "add", "remove", "edit").
    #[serde(default)]
    pub operations: Vec<String>,
}

/// One field-level mutation: a verb paired with a value.
///
/// Serializes as the single-key object the server expects, e.g.
/// `{"set": ["a", "b"]}`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOperation {
    pub verb: String,
    pub value: Value,
}

impl FieldOperation {
    pub fn set(value: Value) -> Self {
        FieldOperation {
            verb: "set".to_string(),
            value,
        }
    }

    pub fn add(value: Value) -> Self {
        FieldOperation {
            verb: "add".to_string(),
            value,
        }
    }
}

impl Serialize for FieldOperation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.verb, &self.value)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldOperation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OpVisitor;

        impl<'de> Visitor<'de> for OpVisitor {
            type Value = FieldOperation;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a single-key map of verb to value")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let (verb, value): (String, Value) = map
                    .next_entry()?
                    .ok_or_else(|| serde::de::Error::custom("empty field operation"))?;
                Ok(FieldOperation { verb, value })
            }
        }

        deserializer.deserialize_map(OpVisitor)
    }
}

/// The write payload sent to mutate an issue: an ordered sequence of
/// operations per field name.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct IssueUpdate {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub update: BTreeMap<String, Vec<FieldOperation>>,
}

impl IssueUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.update.is_empty()
    }

    /// Append an operation for `field`, preserving operation order.
    pub fn push(&mut self, field: &str, op: FieldOperation) {
        self.update.entry(field.to_string()).or_default().push(op);
    }

    /// Build the update from an edited field mapping, encoding only the
    /// fields whose value differs from the original issue state. A field
    /// absent from the original compares as null, so the null placeholders
    /// the edit buffer shows for unset fields do not count as changes.
    pub fn from_diff(original: &BTreeMap<String, Value>, edited: &BTreeMap<String, Value>) -> Self {
        let mut update = IssueUpdate::new();
        for (field, value) in edited {
            if original.get(field).unwrap_or(&Value::Null) != value {
                update.push(field, FieldOperation::set(value.clone()));
            }
        }
        update
    }

    /// Apply a command-line override on top of whatever the diff produced.
    ///
    /// `comment` is special-cased per the REST API: comments are appended
    /// via an `add` operation carrying a body object, never `set`.
    pub fn apply_override(&mut self, key: &str, value: &str) {
        if key == "comment" {
            if !value.is_empty() {
                self.push("comment", FieldOperation::add(serde_json::json!({ "body": value })));
            }
            return;
        }
        // Flag values arrive as strings; recover lists/numbers/bools where
        // the user wrote them in YAML notation.
        let parsed: Value = serde_yaml::from_str::<serde_json::Value>(value)
            .unwrap_or_else(|_| Value::String(value.to_string()));
        // An existing diff entry for the same field loses to the override.
        self.update.remove(key);
        self.push(key, FieldOperation::set(parsed));
    }
}

/// One page of search results, in server order.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SearchResults {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_operation_serializes_as_single_key_object() {
        let op = FieldOperation::set(json!(["a", "b"]));
        let encoded = serde_json::to_string(&op).unwrap();
        assert_eq!(encoded, r#"{"set":["a","b"]}"#);
    }

    #[test]
    fn field_operation_round_trips() {
        let op = FieldOperation::add(json!({"body": "hi"}));
        let encoded = serde_json::to_string(&op).unwrap();
        let decoded: FieldOperation = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, op);
    }

    #[test]
    fn labels_set_payload_shape() {
        let mut update = IssueUpdate::new();
        update.push("labels", FieldOperation::set(json!(["a", "b"])));
        let encoded = serde_json::to_value(&update).unwrap();
        assert_eq!(encoded, json!({"update": {"labels": [{"set": ["a", "b"]}]}}));
    }

    #[test]
    fn diff_encodes_only_changed_fields() {
        let mut original = BTreeMap::new();
        original.insert("summary".to_string(), json!("old title"));
        original.insert("priority".to_string(), json!("High"));

        let mut edited = original.clone();
        edited.insert("summary".to_string(), json!("new title"));

        let update = IssueUpdate::from_diff(&original, &edited);
        assert_eq!(update.update.len(), 1);
        assert_eq!(
            update.update["summary"],
            vec![FieldOperation::set(json!("new title"))]
        );
    }

    #[test]
    fn null_placeholder_for_unset_field_is_not_a_change() {
        let original = BTreeMap::new();
        let mut edited = BTreeMap::new();
        edited.insert("labels".to_string(), Value::Null);
        assert!(IssueUpdate::from_diff(&original, &edited).is_empty());
    }

    #[test]
    fn diff_of_identical_fields_is_empty() {
        let mut fields = BTreeMap::new();
        fields.insert("summary".to_string(), json!("same"));
        let update = IssueUpdate::from_diff(&fields, &fields.clone());
        assert!(update.is_empty());
    }

    #[test]
    fn comment_override_becomes_add_operation() {
        let mut update = IssueUpdate::new();
        update.apply_override("comment", "looks good");
        assert_eq!(
            update.update["comment"],
            vec![FieldOperation::add(json!({"body": "looks good"}))]
        );
    }

    #[test]
    fn override_replaces_diffed_value_for_same_field() {
        let mut update = IssueUpdate::new();
        update.push("priority", FieldOperation::set(json!("Low")));
        update.apply_override("priority", "High");
        assert_eq!(
            update.update["priority"],
            vec![FieldOperation::set(json!("High"))]
        );
    }

    #[test]
    fn override_parses_yaml_scalars() {
        let mut update = IssueUpdate::new();
        update.apply_override("labels", "[a, b]");
        assert_eq!(
            update.update["labels"],
            vec![FieldOperation::set(json!(["a", "b"]))]
        );
    }

    #[test]
    fn issue_decodes_with_missing_fields() {
        let issue: Issue = serde_json::from_value(json!({"key": "PROJ-1"})).unwrap();
        assert_eq!(issue.key, "PROJ-1");
        assert!(issue.fields.is_empty());
    }
}
