use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::util::adf::flatten_description;
use crate::util::sprint_field::{resolve_sprint_name, NO_SPRINT};

/// A tracker issue kept exactly as the API returned it.
///
/// Nothing is renamed or defaulted on the way in, so serializing an issue
/// yields the object that was fetched. `key`, `id` and `fields` are read
/// through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Issue {
    raw: Map<String, Value>,
}

impl Issue {
    pub fn key(&self) -> Option<&str> {
        self.raw
            .get("key")
            .and_then(Value::as_str)
            .filter(|k| !k.is_empty())
    }

    /// Issue id, which some endpoints send as a number.
    pub fn id(&self) -> Option<String> {
        match self.raw.get("id")? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn fields(&self) -> Option<&Map<String, Value>> {
        self.raw.get("fields").and_then(Value::as_object)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields()
            .map(|f| f.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Field value, treating an explicit JSON null as absent.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields()?.get(name).filter(|v| !v.is_null())
    }

    #[cfg(test)]
    pub fn fields_mut(&mut self) -> &mut Map<String, Value> {
        let fields = self
            .raw
            .entry("fields")
            .or_insert_with(|| Value::Object(Map::new()));
        if !fields.is_object() {
            *fields = Value::Object(Map::new());
        }
        fields.as_object_mut().expect("fields was just made an object")
    }

    fn nested_str(&self, name: &str, attr: &str) -> Option<&str> {
        self.field(name)?.get(attr)?.as_str()
    }

    pub fn summary(&self) -> Option<&str> {
        self.field("summary")?.as_str()
    }

    pub fn status_name(&self) -> Option<&str> {
        self.nested_str("status", "name")
    }

    pub fn priority_name(&self) -> Option<&str> {
        self.nested_str("priority", "name")
    }

    pub fn issue_type_name(&self) -> Option<&str> {
        self.nested_str("issuetype", "name")
    }

    pub fn project_key(&self) -> Option<&str> {
        self.nested_str("project", "key")
    }

    pub fn assignee_name(&self) -> Option<&str> {
        self.nested_str("assignee", "displayName")
    }

    pub fn created(&self) -> Option<&str> {
        self.field("created")?.as_str()
    }

    /// Description as plain text, whether it arrived as a string or a rich document.
    pub fn description_text(&self) -> Option<String> {
        self.field("description").and_then(flatten_description)
    }

    pub fn sprint_name(&self) -> String {
        self.fields()
            .map(resolve_sprint_name)
            .unwrap_or_else(|| NO_SPRINT.to_string())
    }
}
