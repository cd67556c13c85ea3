//! YAML frontmatter handling for markdown documents.
//!
//! A document may open with a block delimited by `---` lines:
//!
//! ```text
//! ---
//! title: Getting Started
//! ---
//! # Body starts here
//! ```
//!
//! The block is closed by the next line that is exactly `---` (or `...`).
//! A block that is never closed is treated as ordinary body text.

use serde_yaml::Value;

use crate::error::Result;

/// Metadata read from a document's frontmatter block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    /// Non-empty `title` key, if present.
    pub title: Option<String>,
}

/// Split `content` into its frontmatter and body.
///
/// Content without a frontmatter block yields `Frontmatter::default()` and
/// the full input as body. Returns an error only when a closed block
/// contains invalid YAML.
pub fn parse(content: &str) -> Result<(Frontmatter, &str)> {
    let Some((yaml, body)) = split(content) else {
        return Ok((Frontmatter::default(), content));
    };

    if yaml.trim().is_empty() {
        return Ok((Frontmatter::default(), body));
    }

    let value: Value = serde_yaml::from_str(yaml)?;
    let title = value.get("title").and_then(scalar_text);

    Ok((Frontmatter { title }, body))
}

fn split(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let (first, mut rest) = next_line(content)?;
    if first.trim_end() != "---" {
        return None;
    }

    let yaml_start = content.len() - rest.len();
    loop {
        let (line, after) = next_line(rest)?;
        if matches!(line.trim_end(), "---" | "...") {
            let yaml_end = content.len() - rest.len();
            return Some((&content[yaml_start..yaml_end], after));
        }
        rest = after;
    }
}

fn next_line(s: &str) -> Option<(&str, &str)> {
    if s.is_empty() {
        return None;
    }
    match s.find('\n') {
        Some(i) => Some((&s[..i], &s[i + 1..])),
        None => Some((s, "")),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
