#![forbid(unsafe_code)]

//! Typed markup trees.
//!
//! Render functions return [`Html`] rather than strings. Text and attribute
//! values are escaped when the tree is serialized (via [`std::fmt::Display`])
//! and copied verbatim when it is mounted into a
//! [`Document`](crate::dom::Document), so there is no path by which content
//! data becomes markup.
//!
//! # Example
//!
//! ```
//! use lather_core::html::{Html, el};
//!
//! let row = el("tr")
//!     .class("item-row")
//!     .attr("data-fat-index", "0")
//!     .child(el("td").text("Olive <Oil>"));
//!
//! assert_eq!(
//!     Html::from(row).to_string(),
//!     r#"<tr class="item-row" data-fat-index="0"><td>Olive &lt;Oil&gt;</td></tr>"#
//! );
//! ```

use std::fmt;

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "wbr",
];

/// A node of a markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Html {
    /// An element with attributes and children.
    Element(Element),
    /// A text run.
    Text(String),
    /// A sequence of siblings with no wrapper.
    Fragment(Vec<Html>),
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lower-case tag name.
    pub tag: String,
    /// Attributes in insertion order.
    pub attrs: Vec<(String, String)>,
    /// Child nodes.
    pub children: Vec<Html>,
}

/// Start building an element.
#[must_use]
pub fn el(tag: &str) -> Element {
    Element::new(tag)
}

impl Element {
    /// Create an element with no attributes or children.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing any existing value.
    #[must_use]
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        } else {
            self.attrs.push((name.to_string(), value));
        }
        self
    }

    /// Set an attribute only when `cond` holds.
    #[must_use]
    pub fn attr_if(self, cond: bool, name: &str, value: impl Into<String>) -> Self {
        if cond { self.attr(name, value) } else { self }
    }

    /// Set a boolean attribute (`disabled`, `hidden`, ...).
    #[must_use]
    pub fn flag(self, name: &str) -> Self {
        self.attr(name, "")
    }

    /// Set the `id` attribute.
    #[must_use]
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Append a class to the `class` attribute. Empty names are ignored.
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        let class = class.trim();
        if class.is_empty() {
            return self;
        }
        if let Some(slot) = self.attrs.iter_mut().find(|(n, _)| n == "class") {
            if !slot.1.split_whitespace().any(|c| c == class) {
                if !slot.1.is_empty() {
                    slot.1.push(' ');
                }
                slot.1.push_str(class);
            }
            self
        } else {
            self.attr("class", class)
        }
    }

    /// Append a class only when `cond` holds.
    #[must_use]
    pub fn class_if(self, cond: bool, class: &str) -> Self {
        if cond { self.class(class) } else { self }
    }

    /// Append one child.
    #[must_use]
    pub fn child(mut self, child: impl Into<Html>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append an optional child.
    #[must_use]
    pub fn child_opt(mut self, child: Option<impl Into<Html>>) -> Self {
        if let Some(child) = child {
            self.children.push(child.into());
        }
        self
    }

    /// Append many children.
    #[must_use]
    pub fn children<I, H>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = H>,
        H: Into<Html>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Append a text child.
    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Html::Text(text.into()))
    }

    /// Look up an attribute value.
    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the `class` attribute lists `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }
}

impl Html {
    /// A text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// A fragment of siblings.
    #[must_use]
    pub fn fragment<I, H>(items: I) -> Self
    where
        I: IntoIterator<Item = H>,
        H: Into<Html>,
    {
        Self::Fragment(items.into_iter().map(Into::into).collect())
    }

    /// Nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::Fragment(Vec::new())
    }

    /// Visit every element in document order.
    pub fn for_each_element<'a>(&'a self, f: &mut impl FnMut(&'a Element)) {
        match self {
            Self::Element(e) => {
                f(e);
                for child in &e.children {
                    child.for_each_element(f);
                }
            }
            Self::Text(_) => {}
            Self::Fragment(items) => {
                for item in items {
                    item.for_each_element(f);
                }
            }
        }
    }

    /// Collect the elements matching `pred`, in document order.
    #[must_use]
    pub fn find_all(&self, pred: impl Fn(&Element) -> bool) -> Vec<&Element> {
        let mut out = Vec::new();
        self.for_each_element(&mut |e| {
            if pred(e) {
                out.push(e);
            }
        });
        out
    }

    /// Concatenated text of the tree, unescaped.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Element(e) => e.children.iter().for_each(|c| c.collect_text(out)),
            Self::Text(t) => out.push_str(t),
            Self::Fragment(items) => items.iter().for_each(|c| c.collect_text(out)),
        }
    }
}

impl From<Element> for Html {
    fn from(e: Element) -> Self {
        Self::Element(e)
    }
}

impl From<String> for Html {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Html {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Vec<Html>> for Html {
    fn from(items: Vec<Html>) -> Self {
        Self::Fragment(items)
    }
}

/// Escape text for use in markup or a quoted attribute value.
#[must_use]
pub fn escape(value: &str) -> String {
    v_htmlescape::escape(value).to_string()
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attrs {
            if value.is_empty() && is_boolean_attr(name) {
                write!(f, " {name}")?;
            } else {
                write!(f, " {name}=\"{}\"", v_htmlescape::escape(value))?;
            }
        }
        f.write_str(">")?;
        if self.is_void() {
            return Ok(());
        }
        for child in &self.children {
            write!(f, "{child}")?;
        }
        write!(f, "</{}>", self.tag)
    }
}

impl fmt::Display for Html {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(e) => write!(f, "{e}"),
            Self::Text(t) => write!(f, "{}", v_htmlescape::escape(t)),
            Self::Fragment(items) => items.iter().try_for_each(|i| write!(f, "{i}")),
        }
    }
}

pub(crate) fn is_boolean_attr(name: &str) -> bool {
    matches!(
        name,
        "disabled" | "hidden" | "inert" | "readonly" | "checked" | "selected" | "open" | "required"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn escapes_text_and_attributes() {
        let html = Html::from(el("p").attr("title", "a\"b").text("<b>&"));
        assert_eq!(
            html.to_string(),
            "<p title=\"a&quot;b\">&lt;b&gt;&amp;</p>"
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let html = Html::from(el("input").attr("type", "number").attr("value", "3"));
        assert_eq!(html.to_string(), r#"<input type="number" value="3">"#);
    }

    #[test]
    fn boolean_attributes_render_bare() {
        let html = Html::from(el("button").flag("disabled").text("x"));
        assert_eq!(html.to_string(), "<button disabled>x</button>");
    }

    #[test]
    fn class_appends_without_duplicates() {
        let e = el("div").class("a").class("b").class("a").class("  ");
        assert_eq!(e.get_attr("class"), Some("a b"));
        assert!(e.has_class("b"));
        assert!(!e.has_class("c"));
    }

    #[test]
    fn attr_replaces_existing_value() {
        let e = el("div").attr("data-x", "1").attr("data-x", "2");
        assert_eq!(e.attrs.len(), 1);
        assert_eq!(e.get_attr("data-x"), Some("2"));
    }

    #[test]
    fn fragments_render_siblings() {
        let html = Html::fragment([el("i"), el("b")]);
        assert_eq!(html.to_string(), "<i></i><b></b>");
        assert_eq!(Html::empty().to_string(), "");
    }

    #[test]
    fn find_all_walks_in_document_order() {
        let html = Html::from(
            el("ul")
                .child(el("li").class("x").text("1"))
                .child(el("li").child(el("span").class("x").text("2"))),
        );
        let found = html.find_all(|e| e.has_class("x"));
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].tag, "li");
        assert_eq!(found[1].tag, "span");
        assert_eq!(html.text_content(), "12");
    }
}
