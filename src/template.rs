//! Template rendering.
//!
//! Scaffold templates use EJS-style tags around Tera expressions:
//!
//! | tag              | meaning                                 |
//! |------------------|-----------------------------------------|
//! | `<%= expr %>`    | output `expr`                           |
//! | `<%- expr %>`    | output `expr` (same as `<%=`)           |
//! | `<% stmt %>`     | statement, e.g. `if` / `for` / `endif`  |
//! | `<%_ stmt _%>`   | statement, trimming surrounding spaces  |
//! | `<%# text %>`    | comment                                 |
//! | `<%%`            | a literal `<%`                          |
//!
//! A closing `-%>` or `_%>` trims whitespace after the tag. Output is never
//! escaped, values are written verbatim.

use serde_json::{Map, Value};
use tera::{Context, Tera};

use crate::error::{Error, Result};

/// File name suffix marking a file for rendering. Stripped on output.
pub const TEMPLATE_SUFFIX: &str = ".ejs";

const OPEN: &str = "<%";
const CLOSE: &str = "%>";

/// Returns the output file name for `name` if it is a template.
pub fn strip_template_suffix(name: &str) -> Option<&str> {
    name.strip_suffix(TEMPLATE_SUFFIX)
        .filter(|stem| !stem.is_empty())
}

/// Renders `source` with `values` as the context.
///
/// `name` identifies the template in errors.
pub fn render_template(name: &str, source: &str, values: &Map<String, Value>) -> Result<String> {
    let render_err = |source| Error::Render {
        name: name.to_owned(),
        source,
    };
    let translated = translate(source).map_err(render_err)?;
    let context = Context::from_value(Value::Object(values.clone())).map_err(render_err)?;
    Tera::one_off(&translated, &context, false).map_err(render_err)
}

/// Formats a Tera error together with its causes on one line.
pub fn describe(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut cause = std::error::Error::source(err);
    while let Some(inner) = cause {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        cause = inner.source();
    }
    message
}

// ============================================================================
// Tag translation
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Output,
    Statement,
    Comment,
}

/// Rewrites EJS-style tags into Tera syntax.
///
/// Literal text containing Tera's own delimiters is wrapped in a raw block so
/// it passes through untouched.
fn translate(source: &str) -> tera::Result<String> {
    let mut out = String::with_capacity(source.len() + 16);
    let mut rest = source;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];

        // `<%%` is an escaped literal `<%`.
        if let Some(tail) = after_open.strip_prefix('%') {
            push_literal(&mut out, &rest[..start]);
            push_literal(&mut out, OPEN);
            rest = tail;
            continue;
        }

        push_literal(&mut out, &rest[..start]);

        let (kind, trim_before, body) = match after_open.chars().next() {
            Some('=') | Some('-') => (TagKind::Output, false, &after_open[1..]),
            Some('#') => (TagKind::Comment, false, &after_open[1..]),
            Some('_') => (TagKind::Statement, true, &after_open[1..]),
            _ => (TagKind::Statement, false, after_open),
        };

        let Some(end) = body.find(CLOSE) else {
            let line = source[..source.len() - rest.len() + start].matches('\n').count() + 1;
            return Err(tera::Error::msg(format!(
                "unterminated `<%` tag starting on line {}",
                line
            )));
        };

        let mut inner = &body[..end];
        let mut trim_after = false;
        if let Some(stripped) = inner.strip_suffix('-').or_else(|| inner.strip_suffix('_')) {
            inner = stripped;
            trim_after = true;
        }
        push_tag(&mut out, kind, inner.trim(), trim_before, trim_after);

        rest = &body[end + CLOSE.len()..];
    }

    push_literal(&mut out, rest);
    Ok(out)
}

fn push_literal(out: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    // A trailing `{` would fuse with the opening brace of the next tag.
    if text.contains("{{") || text.contains("{%") || text.contains("{#") || text.ends_with('{') {
        out.push_str("{% raw %}");
        out.push_str(text);
        out.push_str("{% endraw %}");
    } else {
        out.push_str(text);
    }
}

fn push_tag(out: &mut String, kind: TagKind, inner: &str, trim_before: bool, trim_after: bool) {
    let (open, close) = match kind {
        TagKind::Output => ("{{", "}}"),
        TagKind::Statement => ("{%", "%}"),
        TagKind::Comment => ("{#", "#}"),
    };
    out.push_str(open);
    if trim_before {
        out.push('-');
    }
    out.push(' ');
    // Comments may not contain the closing delimiter.
    if kind == TagKind::Comment {
        out.push_str(&inner.replace("#}", "# }"));
    } else {
        out.push_str(inner);
    }
    out.push(' ');
    if trim_after {
        out.push('-');
    }
    out.push_str(close);
}
