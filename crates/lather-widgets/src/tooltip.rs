#![forbid(unsafe_code)]

//! The single glossary tooltip.
//!
//! One `#glossary-tooltip` element is created on first use and reused for
//! every term. Showing a new term replaces the content and position; the
//! anchor gets `aria-describedby` pointing at the tooltip while it is shown.

use lather_core::dom::{Document, NodeId};
use lather_core::geometry::{Rect, Size};
use lather_core::html::{Html, el};

use crate::helpers::place_popup;

/// Id of the shared tooltip element.
pub const TOOLTIP_ID: &str = "glossary-tooltip";

/// Layout inputs for positioning. The host measures these; headless callers
/// pass fixed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipPlacement {
    pub anchor: Rect,
    pub viewport: Rect,
    pub size: Size,
}

impl TooltipPlacement {
    #[must_use]
    pub const fn new(anchor: Rect, viewport: Rect, size: Size) -> Self {
        Self {
            anchor,
            viewport,
            size,
        }
    }
}

#[derive(Debug, Default)]
pub struct TooltipManager {
    node: Option<NodeId>,
    anchor: Option<NodeId>,
}

impl TooltipManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill and position the tooltip next to `anchor`.
    pub fn show(
        &mut self,
        doc: &mut Document,
        anchor: Option<NodeId>,
        title: &str,
        body: &Html,
        placement: TooltipPlacement,
    ) -> NodeId {
        let node = self.ensure(doc);
        let content = Html::fragment([
            el("div").class("tooltip-title").text(title),
            el("div").class("tooltip-body").child(body.clone()),
        ]);
        doc.replace_children(node, &content);

        let at = place_popup(placement.anchor, placement.size, placement.viewport);
        doc.set_attr(node, "style", &format!("left: {}px; top: {}px;", at.x, at.y));
        doc.remove_attr(node, "hidden");
        doc.add_class(node, "visible");

        if let Some(previous) = self.anchor.take() {
            doc.remove_attr(previous, "aria-describedby");
        }
        if let Some(anchor) = anchor {
            doc.set_attr(anchor, "aria-describedby", TOOLTIP_ID);
        }
        self.anchor = anchor;

        #[cfg(feature = "tracing")]
        tracing::debug!(title, x = at.x, y = at.y, "tooltip.show");
        node
    }

    /// Hide and empty the tooltip. Returns `false` if it was not shown.
    pub fn hide(&mut self, doc: &mut Document) -> bool {
        if !self.is_visible(doc) {
            return false;
        }
        if let Some(node) = self.node {
            doc.set_attr(node, "hidden", "");
            doc.remove_class(node, "visible");
            doc.clear_children(node);
        }
        if let Some(anchor) = self.anchor.take() {
            doc.remove_attr(anchor, "aria-describedby");
        }
        true
    }

    #[must_use]
    pub fn is_visible(&self, doc: &Document) -> bool {
        self.node
            .is_some_and(|n| doc.is_connected(n) && !doc.has_attr(n, "hidden"))
    }

    fn ensure(&mut self, doc: &mut Document) -> NodeId {
        if let Some(node) = self.node.filter(|&n| doc.is_connected(n)) {
            return node;
        }
        let node = match doc.get_element_by_id(TOOLTIP_ID) {
            Some(existing) => existing,
            None => {
                let body = doc.body();
                let markup: Html = el("div")
                    .id(TOOLTIP_ID)
                    .class("glossary-tooltip")
                    .attr("role", "tooltip")
                    .flag("hidden")
                    .into();
                doc.append_html(body, &markup)[0]
            }
        };
        self.node = Some(node);
        node
    }
}
