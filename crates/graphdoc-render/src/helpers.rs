//! Template helpers.
//!
//! Registered on every [`TemplateEngine`](crate::TemplateEngine):
//!
//! | Helper | Usage | Output |
//! |--------|-------|--------|
//! | `slugify` | `{{slugify name}}` | anchor id derived from a name |
//! | `markdown` | `{{{markdown description}}}` | HTML rendering of a Markdown description |
//! | `gql_group` | `{{#each (gql_group reference.types)}}` | `[{kind, title, types}]` groups |

use graphdoc_schema::TypeKind;
use handlebars::Handlebars;
use pulldown_cmark::{Options, Parser};
use serde_json::{Value, json};

mod registered {
    use super::{group_types, markdown_to_html, slugify};
    use handlebars::handlebars_helper;
    use serde_json::Value;

    handlebars_helper!(slugify_helper: |text: str| slugify(text));

    handlebars_helper!(markdown_helper: |text: Json| match text {
        Value::String(text) => markdown_to_html(text),
        _ => String::new(),
    });

    handlebars_helper!(gql_group_helper: |types: array| group_types(types));
}

/// Registers `slugify`, `markdown`, and `gql_group` on a registry.
pub fn register_helpers(handlebars: &mut Handlebars<'_>) {
    handlebars.register_helper("slugify", Box::new(registered::slugify_helper));
    handlebars.register_helper("markdown", Box::new(registered::markdown_helper));
    handlebars.register_helper("gql_group", Box::new(registered::gql_group_helper));
}

/// Converts text to a URL-safe anchor id.
///
/// Lowercases ASCII alphanumerics, turns runs of whitespace, dashes, and
/// underscores into a single dash, and drops everything else.
///
/// # Examples
///
/// ```
/// use graphdoc_render::helpers::slugify;
///
/// assert_eq!(slugify("User"), "user");
/// assert_eq!(slugify("Input Objects"), "input-objects");
/// assert_eq!(slugify("INPUT_OBJECT"), "input-object");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_was_dash = true; // no leading dash

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Renders a Markdown description to HTML.
///
/// # Examples
///
/// ```
/// use graphdoc_render::helpers::markdown_to_html;
///
/// assert_eq!(markdown_to_html("Use `id`"), "<p>Use <code>id</code></p>\n");
/// ```
#[must_use]
pub fn markdown_to_html(text: &str) -> String {
    let parser = Parser::new_ext(text, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
    let mut html = String::with_capacity(text.len() + text.len() / 2);
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

/// Partitions serialized type descriptors by their `kind`.
///
/// Groups follow [`TypeKind::ALL`]; unrecognised kinds come after them in
/// first-seen order. Input order is kept within a group and empty groups are
/// omitted.
///
/// # Examples
///
/// ```
/// use graphdoc_render::helpers::group_types;
/// use serde_json::json;
///
/// let groups = group_types(&[
///     json!({"name": "Color", "kind": "ENUM"}),
///     json!({"name": "User", "kind": "OBJECT"}),
/// ]);
///
/// assert_eq!(groups[0]["title"], "Objects");
/// assert_eq!(groups[1]["types"][0]["name"], "Color");
/// ```
#[must_use]
pub fn group_types(types: &[Value]) -> Value {
    let mut groups: Vec<(&str, Vec<&Value>)> = Vec::new();
    for ty in types {
        let kind = ty.get("kind").and_then(Value::as_str).unwrap_or_default();
        match groups.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, members)) => members.push(ty),
            None => groups.push((kind, vec![ty])),
        }
    }

    groups.sort_by_key(|(kind, _)| {
        TypeKind::ALL
            .iter()
            .position(|known| known.as_str() == *kind)
            .unwrap_or(TypeKind::ALL.len())
    });

    groups
        .into_iter()
        .map(|(kind, members)| {
            let title = TypeKind::from_name(kind).map_or(kind, |k| k.title());
            json!({ "kind": kind, "title": title, "types": members })
        })
        .collect()
}
