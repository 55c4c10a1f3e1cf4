// Selector strategies - the named ways of locating an element
//
// A strategy is chosen by the caller, tried in caller order, and compiled
// into a backend-neutral query just before it is handed to the automation
// backend.

use std::fmt;

/// One named way of locating a UI element.
///
/// Callers list strategies most-specific first; `ElementResolver` tries
/// them in that order and stops at the first success.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectorStrategy {
    /// ARIA role lookup, e.g. `searchbox` or `button`.
    Role(String),
    /// Text-contains lookup on the element's own text nodes.
    Text(String),
    /// Lookup by the `placeholder` attribute.
    Placeholder(String),
    /// Raw structural query, passed through untouched.
    Query(String),
}

impl SelectorStrategy {
    /// Parses the tagged-string form: `role:NAME`, `text:LITERAL`,
    /// `placeholder:LITERAL`, or anything else as a raw query.
    pub fn parse(tag: &str) -> Self {
        if let Some(role) = tag.strip_prefix("role:") {
            SelectorStrategy::Role(role.to_string())
        } else if let Some(text) = tag.strip_prefix("text:") {
            SelectorStrategy::Text(text.to_string())
        } else if let Some(placeholder) = tag.strip_prefix("placeholder:") {
            SelectorStrategy::Placeholder(placeholder.to_string())
        } else {
            SelectorStrategy::Query(tag.to_string())
        }
    }

    /// Compiles the strategy into the query handed to the backend.
    pub fn to_query(&self) -> Query {
        match self {
            SelectorStrategy::Role(role) => Query::Css(role_selector(role)),
            SelectorStrategy::Text(text) => Query::XPath(format!(
                "//*[contains(text(), {})]",
                xpath_literal(text)
            )),
            SelectorStrategy::Placeholder(placeholder) => {
                Query::Css(format!("[placeholder=\"{}\"]", css_escape(placeholder)))
            }
            SelectorStrategy::Query(query) => Query::Css(query.clone()),
        }
    }
}

impl From<&str> for SelectorStrategy {
    fn from(tag: &str) -> Self {
        SelectorStrategy::parse(tag)
    }
}

impl fmt::Display for SelectorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorStrategy::Role(role) => write!(f, "role:{role}"),
            SelectorStrategy::Text(text) => write!(f, "text:{text}"),
            SelectorStrategy::Placeholder(placeholder) => write!(f, "placeholder:{placeholder}"),
            SelectorStrategy::Query(query) => write!(f, "{query}"),
        }
    }
}

/// Compiled, backend-neutral form of a strategy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    Css(String),
    XPath(String),
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Css(css) => write!(f, "css={css}"),
            Query::XPath(xpath) => write!(f, "xpath={xpath}"),
        }
    }
}

/// Maps a role to a CSS selector covering the explicit `role` attribute
/// plus the common implicit carriers of that role.
fn role_selector(role: &str) -> String {
    let attr = format!("[role=\"{}\"]", css_escape(role));
    let implicit = match role {
        "button" => Some("button, input[type=\"button\"], input[type=\"submit\"]"),
        "link" => Some("a[href]"),
        "searchbox" => Some("input[type=\"search\"]"),
        "textbox" => Some("input[type=\"text\"], textarea"),
        "heading" => Some("h1, h2, h3, h4, h5, h6"),
        "img" => Some("img"),
        "navigation" => Some("nav"),
        "list" => Some("ul, ol"),
        _ => None,
    };
    match implicit {
        Some(tags) => format!("{attr}, {tags}"),
        None => attr,
    }
}

fn css_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Builds an XPath string literal, falling back to `concat()` when the
/// value mixes both quote kinds.
fn xpath_literal(value: &str) -> String {
    if !value.contains('"') {
        format!("\"{value}\"")
    } else if !value.contains('\'') {
        format!("'{value}'")
    } else {
        let parts: Vec<String> = value
            .split('"')
            .map(|part| format!("\"{part}\""))
            .collect();
        format!("concat({})", parts.join(", '\"', "))
    }
}
