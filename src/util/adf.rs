use serde_json::Value;

/// Plain-text rendering of a description field.
///
/// Strings pass through unchanged and rich documents are flattened with
/// [`extract_text_from_adf`]. Returns `None` for null.
pub fn flatten_description(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => Some(extract_text_from_adf(value)),
        other => Some(other.to_string()),
    }
}

/// Extract plain text from Jira's Atlassian Document Format (ADF).
///
/// Only top-level paragraphs are read. The text nodes of each paragraph are
/// concatenated, paragraphs are joined by newlines and the result is trimmed.
pub fn extract_text_from_adf(doc: &Value) -> String {
    let Some(blocks) = doc.get("content").and_then(Value::as_array) else {
        return String::new();
    };

    let mut text = String::new();
    for block in blocks.iter().filter(|b| node_type(b) == Some("paragraph")) {
        let inline = block.get("content").and_then(Value::as_array);
        for node in inline.into_iter().flatten() {
            if node_type(node) == Some("text") {
                if let Some(t) = node.get("text").and_then(Value::as_str) {
                    text.push_str(t);
                }
            }
        }
        text.push('\n');
    }

    text.trim().to_string()
}

fn node_type(node: &Value) -> Option<&str> {
    node.get("type").and_then(Value::as_str)
}
