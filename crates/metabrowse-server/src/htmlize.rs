//! Hash-to-HTML flattener

use serde_json::{Map, Value};

use crate::views::escape;

/// Render a nested mapping as a titled collapsible HTML fragment.
///
/// Scalar entries become table rows; nested mappings recurse into child
/// collapsible sections appended after the rows. Iteration order of the
/// input is preserved. Reusable rendering primitive; not wired to a route.
pub fn htmlize_hash(title: &str, hash: &Map<String, Value>) -> String {
    let mut rows: Option<String> = None;
    let mut sections: Option<String> = None;

    for (key, value) in hash {
        match value {
            Value::Object(nested) => {
                sections
                    .get_or_insert_with(String::new)
                    .push_str(&htmlize_hash(key, nested));
            }
            scalar => {
                let rows = rows.get_or_insert_with(|| String::from("<table>"));
                rows.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td></tr>",
                    escape(key),
                    escape(&scalar_text(scalar))
                ));
            }
        }
    }

    let mut output = format!(
        "<div data-role='collapsible' data-content-theme='c'><h3>{}</h3>",
        escape(title)
    );
    if let Some(rows) = rows {
        output.push_str(&rows);
        output.push_str("</table>");
    }
    if let Some(sections) = sections {
        output.push_str(&sections);
    }
    output.push_str("</div>");
    output
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
