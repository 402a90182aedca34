//! Named templates for issue output and the edit buffer.
//!
//! Output templates are plain text with `{{field}}` placeholders, applied
//! once per issue; built-in defaults can be shadowed by files under
//! `<config-dir>/templates/<name>`. The "edit" template is different in
//! kind: it renders the editable slice of an issue as YAML for the
//! external editor, and [`parse_edit_buffer`] turns the saved buffer back
//! into a field mapping.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::data::{EditMeta, Issue};
use crate::error::{Error, Result};

/// Built-in one-line-per-issue template.
const LIST_TEMPLATE: &str = "{{key}}: {{summary}}";

/// Built-in wider listing.
const TABLE_TEMPLATE: &str = "{{key}}\t{{priority}}\t{{status}}\t{{assignee}}\t{{summary}}";

/// Built-in edit buffer template. `{{fields}}` expands to the YAML of the
/// editable fields; whatever the template adds around it must stay in
/// comments so the saved buffer still parses.
const EDIT_TEMPLATE: &str = "\
# {{key}} - edit the fields below, then save and quit.
# Lines starting with '#' are ignored. Only fields the server
# currently allows editing are shown.
{{fields}}";

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{\{([a-zA-Z_][a-zA-Z0-9_]*)\}\}").unwrap();
}

/// Look up a template body: a user file under the config dir shadows the
/// built-in of the same name.
pub fn lookup(config_dir: &str, name: &str) -> Result<String> {
    let user_path = std::path::Path::new(config_dir)
        .join("templates")
        .join(name);
    if user_path.is_file() {
        return Ok(std::fs::read_to_string(user_path)?);
    }
    match name {
        "edit" => Ok(EDIT_TEMPLATE.to_string()),
        "list" => Ok(LIST_TEMPLATE.to_string()),
        "table" => Ok(TABLE_TEMPLATE.to_string()),
        other => Err(Error::Template(format!("unknown template '{}'", other))),
    }
}

/// Render one issue through a `{{field}}` template. `key` is always
/// available; every other placeholder resolves against the issue's field
/// map. Unknown placeholders render empty.
pub fn render_issue(template: &str, issue: &Issue) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| {
            let name = &caps[1];
            if name == "key" {
                return issue.key.clone();
            }
            issue
                .fields
                .get(name)
                .map(display_value)
                .unwrap_or_default()
        })
        .to_string()
}

/// Flatten a field value for display. Jira represents people, statuses
/// and priorities as objects; their human name lives under `displayName`,
/// `name` or `value`.
fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("displayName")
            .or_else(|| map.get("name"))
            .or_else(|| map.get("value"))
            .map(display_value)
            .unwrap_or_else(|| value.to_string()),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Render the edit buffer through an edit template body. `{{key}}`
/// resolves to the issue key; `{{fields}}` to the YAML of the fields the
/// server declares editable, fields the issue has no value for included
/// as null so the user can fill them in.
pub fn render_edit_buffer(
    body: &str,
    issue: &Issue,
    meta: &EditMeta,
    overrides: &BTreeMap<String, String>,
) -> Result<String> {
    let mut editable: BTreeMap<&str, Value> = BTreeMap::new();
    for field in meta.fields.keys() {
        editable.insert(
            field.as_str(),
            issue.fields.get(field).cloned().unwrap_or(Value::Null),
        );
    }

    let mut fields_block = String::new();
    for key in overrides.keys() {
        fields_block.push_str(&format!("# override from the command line: {}\n", key));
    }
    fields_block.push_str(&serde_yaml::to_string(&serde_json::json!({ "fields": editable }))?);

    let rendered = PLACEHOLDER.replace_all(body, |caps: &regex::Captures| match &caps[1] {
        "key" => issue.key.clone(),
        "fields" => fields_block.clone(),
        _ => String::new(),
    });
    Ok(rendered.to_string())
}

/// Parse a saved edit buffer back into a field mapping. Comment lines are
/// stripped first so error annotations from a previous attempt do not
/// confuse the YAML parser.
pub fn parse_edit_buffer(buffer: &str) -> Result<BTreeMap<String, Value>> {
    let stripped: String = buffer
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");

    #[derive(serde::Deserialize, Default)]
    struct Edited {
        #[serde(default)]
        fields: BTreeMap<String, Value>,
    }

    if stripped.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let edited: Edited = serde_yaml::from_str(&stripped)?;
    Ok(edited.fields)
}
