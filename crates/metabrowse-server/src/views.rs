//! HTML view rendering
//!
//! Static templates with placeholder replacement; every interpolated value
//! is escaped because `title`/`message` arrive from the query string.

use std::collections::BTreeMap;

const PAGE_LAYOUT: &str = include_str!("../templates/page.html");
const LOGIN_LAYOUT: &str = include_str!("../templates/login.html");
const TERMS_TEMPLATE: &str = include_str!("../templates/terms.html");
const ERROR_TEMPLATE: &str = include_str!("../templates/error.html");
const DESCRIBE_TEMPLATE: &str = include_str!("../templates/describe.html");
const LIST_TEMPLATE: &str = include_str!("../templates/list.html");

/// Escape a value for interpolation into HTML text or attributes.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn page(title: &str, content: &str) -> String {
    PAGE_LAYOUT
        .replace("{{TITLE}}", &escape(title))
        .replace("{{CONTENT}}", content)
}

/// The terms view on its own (`GET /terms`).
pub fn terms_page() -> String {
    page("Terms of Service", TERMS_TEMPLATE)
}

/// The terms view wrapped in the login layout (`GET /authenticate`),
/// carrying the login URL and the pass-through state parameter.
pub fn terms_with_login(login_url: &str, state: Option<&str>) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("state", state.unwrap_or(""));

    LOGIN_LAYOUT
        .replace("{{TITLE}}", "Log in")
        .replace("{{CONTENT}}", TERMS_TEMPLATE)
        .replace("{{LOGIN_URL}}", &escape(login_url))
        .replace("{{LOGIN_QUERY}}", &escape(&query.finish()))
}

/// The error view.
pub fn error_page(title: &str, message: &str) -> String {
    page(
        "Error",
        &ERROR_TEMPLATE
            .replace("{{ERROR_TITLE}}", &escape(title))
            .replace("{{ERROR_MESSAGE}}", &escape(message)),
    )
}

/// The describe view: one row per field, in the map's ascending key order.
pub fn describe(name: &str, typemap: &BTreeMap<String, String>) -> String {
    let mut rows = String::new();
    for (field, field_type) in typemap {
        rows.push_str(&format!(
            "      <tr><td>{}</td><td>{}</td></tr>\n",
            escape(field),
            escape(field_type)
        ));
    }
    page(name, &DESCRIBE_TEMPLATE.replace("{{ROWS}}", &rows))
}

/// The object-list view, each entry linking to its describe page.
pub fn list(objects: &[String]) -> String {
    let mut items = String::new();
    for name in objects {
        items.push_str(&format!(
            "  <li><a href=\"/describe/{}\">{}</a></li>\n",
            escape(name),
            escape(name)
        ));
    }
    page("Objects", &LIST_TEMPLATE.replace("{{ITEMS}}", &items))
}
