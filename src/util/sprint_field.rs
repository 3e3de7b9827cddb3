use serde_json::{Map, Value};

pub const NO_SPRINT: &str = "No Sprint";

const UNNAMED_SPRINT: &str = "Unknown";

/// The shapes a sprint field shows up in across tracker APIs.
///
/// Empty lists, objects and strings count as [`SprintField::Absent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SprintField<'a> {
    List(&'a [Value]),
    Object(&'a Map<String, Value>),
    PlainString(&'a str),
    Absent,
}

impl<'a> SprintField<'a> {
    pub fn classify(value: Option<&'a Value>) -> Self {
        match value {
            Some(Value::Array(items)) if !items.is_empty() => Self::List(items.as_slice()),
            Some(Value::Object(map)) if !map.is_empty() => Self::Object(map),
            Some(Value::String(s)) if !s.is_empty() => Self::PlainString(s),
            _ => Self::Absent,
        }
    }

    pub fn name(&self) -> Option<String> {
        match self {
            Self::List(items) => Some(name_from_list(items)),
            Self::Object(map) => Some(name_from_object(map)),
            Self::PlainString(s) => Some((*s).to_string()),
            Self::Absent => None,
        }
    }
}

fn name_from_list(items: &[Value]) -> String {
    match items.first() {
        Some(Value::Object(map)) => name_from_object(map),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => UNNAMED_SPRINT.to_string(),
    }
}

fn name_from_object(map: &Map<String, Value>) -> String {
    map.get("name")
        .and_then(Value::as_str)
        .unwrap_or(UNNAMED_SPRINT)
        .to_string()
}

/// Sprint name for an issue's field map.
///
/// The `sprint` field wins when present in any shape. Otherwise the first
/// field whose key mentions "sprint" (any case) and holds a list or object is
/// used, which picks up instances that expose sprints under a custom key.
/// Falls back to [`NO_SPRINT`].
pub fn resolve_sprint_name(fields: &Map<String, Value>) -> String {
    if let Some(name) = SprintField::classify(fields.get("sprint")).name() {
        return name;
    }

    fields
        .iter()
        .filter(|(key, _)| key.to_lowercase().contains("sprint"))
        .find_map(|(_, value)| match SprintField::classify(Some(value)) {
            field @ (SprintField::List(_) | SprintField::Object(_)) => field.name(),
            _ => None,
        })
        .unwrap_or_else(|| NO_SPRINT.to_string())
}
