use serde_json::Value;
use tracing::debug;

use crate::models::PlatformDetail;

/// Decodes the `Platforms Info` cell and keeps the first platform name.
///
/// Cells come either as JSON or as a Python-style literal
/// (`[{'Platform': 'PC', 'Platform Metascore': None}]`). Anything that does
/// not decode to a non-empty list whose first entry is a platform record
/// yields `None`.
pub struct PlatformParser;

impl PlatformParser {
    pub fn new() -> Self {
        PlatformParser
    }

    pub fn first_platform(&self, cell: Option<&str>) -> Option<String> {
        let raw = cell?.trim();
        if raw.is_empty() {
            return None;
        }

        let detail = match self.parse_first_detail(raw) {
            Some(detail) => detail,
            None => {
                debug!("Unparseable platforms info: {}", raw);
                return None;
            }
        };

        Some(detail.platform.trim().to_string()).filter(|platform| !platform.is_empty())
    }

    /// Only element 0 has to be a platform record; later entries are ignored.
    fn parse_first_detail(&self, raw: &str) -> Option<PlatformDetail> {
        let value: Value = serde_json::from_str(raw)
            .or_else(|_| serde_json::from_str(&literal_to_json(raw)))
            .ok()?;

        match value {
            Value::Array(items) => {
                let first = items.into_iter().next()?;
                serde_json::from_value(first).ok()
            }
            _ => None,
        }
    }
}

impl Default for PlatformParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Rewrites a Python literal into JSON: single-quoted strings become
/// double-quoted, `None`/`True`/`False` become `null`/`true`/`false`.
/// Content inside strings is left alone apart from escaping.
fn literal_to_json(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len() + 8);
    let mut chars = literal.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                let quote = c;
                out.push('"');
                while let Some(inner) = chars.next() {
                    match inner {
                        '\\' => match chars.next() {
                            Some('\'') => out.push('\''),
                            Some('x') => {
                                let hex: String = chars.by_ref().take(2).collect();
                                out.push_str("\\u00");
                                out.push_str(&hex);
                            }
                            Some(escaped) => {
                                out.push('\\');
                                out.push(escaped);
                            }
                            None => out.push_str("\\\\"),
                        },
                        '"' if quote == '\'' => out.push_str("\\\""),
                        _ if inner == quote => break,
                        _ => out.push(inner),
                    }
                }
                out.push('"');
            }
            _ if c.is_ascii_alphabetic() => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        word.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match word.as_str() {
                    "None" => out.push_str("null"),
                    "True" => out.push_str("true"),
                    "False" => out.push_str("false"),
                    _ => out.push_str(&word),
                }
            }
            _ => out.push(c),
        }
    }

    out
}
