#![forbid(unsafe_code)]

//! A small CSS selector subset for element lookup.
//!
//! Supported: comma-separated lists of compound selectors built from a tag
//! name (or `*`), `#id`, `.class`, `[attr]` and `[attr=value]` (value may be
//! quoted). Combinators and pseudo-classes are not supported and are
//! reported as [`SelectorError`].
//!
//! ```
//! use lather_core::selector::Selector;
//!
//! let sel = Selector::parse(r#"button.lock-btn[data-field="weight"], .panel-title"#).unwrap();
//! assert_eq!(sel.alternatives().len(), 2);
//! ```

use std::fmt;

use crate::dom::{Document, NodeId};

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

/// One compound selector: every part must match the same element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Compound {
    tag: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Id(String),
    Class(String),
    HasAttr(String),
    AttrEq(String, String),
}

/// Selector parse error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector (or one alternative) was empty.
    Empty,
    /// A character the subset does not understand.
    Unexpected {
        /// Byte offset within the alternative.
        at: usize,
        /// The offending character.
        found: char,
    },
    /// An `[attr` group with no closing bracket.
    UnclosedAttribute,
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty selector"),
            Self::Unexpected { at, found } => {
                write!(f, "unexpected {found:?} at offset {at} in selector")
            }
            Self::UnclosedAttribute => f.write_str("unclosed attribute selector"),
        }
    }
}

impl std::error::Error for SelectorError {}

impl Selector {
    /// Parse a selector list.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let alternatives = input
            .split(',')
            .map(|alt| Compound::parse(alt.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { alternatives })
    }

    /// Selector matching a single id.
    #[must_use]
    pub fn id(id: &str) -> Self {
        Self {
            alternatives: vec![Compound {
                tag: None,
                parts: vec![Part::Id(id.to_string())],
            }],
        }
    }

    /// Selector matching a single class.
    #[must_use]
    pub fn class(class: &str) -> Self {
        Self {
            alternatives: vec![Compound {
                tag: None,
                parts: vec![Part::Class(class.to_string())],
            }],
        }
    }

    /// Selector matching elements carrying `name`, optionally with a value.
    #[must_use]
    pub fn attr(name: &str, value: Option<&str>) -> Self {
        let part = match value {
            Some(v) => Part::AttrEq(name.to_string(), v.to_string()),
            None => Part::HasAttr(name.to_string()),
        };
        Self {
            alternatives: vec![Compound {
                tag: None,
                parts: vec![part],
            }],
        }
    }

    /// Selector matching a tag name.
    #[must_use]
    pub fn tag(tag: &str) -> Self {
        Self {
            alternatives: vec![Compound {
                tag: Some(tag.to_ascii_lowercase()),
                parts: Vec::new(),
            }],
        }
    }

    /// Selector list matching either `self` or `other`.
    #[must_use]
    pub fn or(mut self, other: Selector) -> Self {
        self.alternatives.extend(other.alternatives);
        self
    }

    /// Narrow every alternative to elements that also carry `name="value"`.
    #[must_use]
    pub fn and_attr(mut self, name: &str, value: &str) -> Self {
        for alt in &mut self.alternatives {
            alt.parts
                .push(Part::AttrEq(name.to_string(), value.to_string()));
        }
        self
    }

    /// The comma-separated alternatives.
    #[must_use]
    pub fn alternatives(&self) -> &[Compound] {
        &self.alternatives
    }

    /// Whether `node` matches any alternative.
    #[must_use]
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.alternatives.iter().any(|c| c.matches(doc, node))
    }
}

impl Compound {
    fn parse(input: &str) -> Result<Self, SelectorError> {
        if input.is_empty() {
            return Err(SelectorError::Empty);
        }
        let chars: Vec<(usize, char)> = input.char_indices().collect();
        let mut out = Compound::default();
        let mut i = 0;

        let ident = |start: usize| -> (String, usize) {
            let mut end = start;
            while end < chars.len() && is_ident_char(chars[end].1) {
                end += 1;
            }
            (chars[start..end].iter().map(|(_, c)| c).collect(), end)
        };

        if chars[0].1 == '*' {
            i = 1;
        } else if is_ident_char(chars[0].1) {
            let (tag, end) = ident(0);
            out.tag = Some(tag.to_ascii_lowercase());
            i = end;
        }

        while i < chars.len() {
            let (at, c) = chars[i];
            match c {
                '#' | '.' => {
                    let (name, end) = ident(i + 1);
                    if name.is_empty() {
                        return Err(SelectorError::Unexpected { at, found: c });
                    }
                    out.parts.push(if c == '#' {
                        Part::Id(name)
                    } else {
                        Part::Class(name)
                    });
                    i = end;
                }
                '[' => {
                    let close = chars[i..]
                        .iter()
                        .position(|(_, c)| *c == ']')
                        .map(|p| p + i)
                        .ok_or(SelectorError::UnclosedAttribute)?;
                    let body: String = chars[i + 1..close].iter().map(|(_, c)| c).collect();
                    out.parts.push(parse_attr(&body, at)?);
                    i = close + 1;
                }
                _ => return Err(SelectorError::Unexpected { at, found: c }),
            }
        }
        Ok(out)
    }

    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(tag) = doc.tag(node) else {
            return false;
        };
        if self.tag.as_deref().is_some_and(|t| t != tag) {
            return false;
        }
        self.parts.iter().all(|part| match part {
            Part::Id(id) => doc.attr(node, "id") == Some(id.as_str()),
            Part::Class(class) => doc.has_class(node, class),
            Part::HasAttr(name) => doc.has_attr(node, name),
            Part::AttrEq(name, value) => doc.attr(node, name) == Some(value.as_str()),
        })
    }
}

fn parse_attr(body: &str, at: usize) -> Result<Part, SelectorError> {
    let body = body.trim();
    match body.split_once('=') {
        None if body.is_empty() => Err(SelectorError::Empty),
        None => Ok(Part::HasAttr(body.to_string())),
        Some((name, value)) => {
            let name = name.trim();
            if name.is_empty() {
                return Err(SelectorError::Unexpected { at, found: '=' });
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            Ok(Part::AttrEq(name.to_string(), value.to_string()))
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::el;

    fn doc_with(html: crate::html::Element) -> (Document, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let ids = doc.append_html(body, &html.into());
        (doc, ids[0])
    }

    #[test]
    fn parses_compound_with_attributes() {
        let sel = Selector::parse(r#"button.lock-btn[data-field="weight"]"#).unwrap();
        let (doc, node) = doc_with(
            el("button")
                .class("lock-btn")
                .class("locked")
                .attr("data-field", "weight"),
        );
        assert!(sel.matches(&doc, node));
    }

    #[test]
    fn tag_mismatch_fails() {
        let sel = Selector::parse("a.lock-btn").unwrap();
        let (doc, node) = doc_with(el("button").class("lock-btn"));
        assert!(!sel.matches(&doc, node));
    }

    #[test]
    fn list_matches_any_alternative() {
        let sel = Selector::parse("h2, .panel-title").unwrap();
        let (doc, node) = doc_with(el("div").class("panel-title"));
        assert!(sel.matches(&doc, node));
    }

    #[test]
    fn built_list_equals_parsed_list() {
        let built = Selector::class("panel-title").or(Selector::tag("H2"));
        assert_eq!(built, Selector::parse(".panel-title, h2").unwrap());
        let narrowed = Selector::class("percentage-display").and_attr("data-fat-index", "2");
        assert_eq!(
            narrowed,
            Selector::parse(".percentage-display[data-fat-index=\"2\"]").unwrap()
        );
    }

    #[test]
    fn unquoted_and_single_quoted_values() {
        let (doc, node) = doc_with(el("input").attr("type", "number"));
        assert!(Selector::parse("[type=number]").unwrap().matches(&doc, node));
        assert!(Selector::parse("[type='number']").unwrap().matches(&doc, node));
        assert!(Selector::parse("[type]").unwrap().matches(&doc, node));
    }

    #[test]
    fn rejects_combinators() {
        assert!(matches!(
            Selector::parse("div span"),
            Err(SelectorError::Unexpected { found: ' ', .. })
        ));
        assert_eq!(Selector::parse(""), Err(SelectorError::Empty));
        assert_eq!(
            Selector::parse("[data-x"),
            Err(SelectorError::UnclosedAttribute)
        );
    }
}
