//! Glossary term tooltips and the full glossary panel.

use lather_content::{Article, ContentDb, ContentEntry};
use lather_core::dom::NodeId;
use lather_core::html::{Html, el};
use lather_widgets::helpers::{set_content, set_text};
use lather_widgets::{PanelOptions, TooltipPlacement, UiContext};

pub const GLOSSARY_PANEL: &str = "glossaryPanel";
pub const GLOSSARY_OVERLAY: &str = "glossaryPanelOverlay";
pub const GLOSSARY_TITLE: &str = "glossaryPanelTitle";
pub const GLOSSARY_BODY: &str = "glossaryPanelBody";

/// Hash that opens `slug` in the glossary.
#[must_use]
pub fn term_href(slug: &str) -> String {
    format!("#glossary/{slug}")
}

/// Show the short definition of `slug` next to `anchor`.
///
/// Returns `false` for unknown terms; the tooltip is left as it was.
pub fn show_term_tooltip(
    ui: &mut UiContext,
    glossary: &ContentDb,
    slug: &str,
    anchor: Option<NodeId>,
    placement: TooltipPlacement,
) -> bool {
    let Some(entry) = glossary.get(slug) else {
        tracing::debug!(slug, "unknown glossary term");
        return false;
    };
    let body = Html::fragment([
        Html::text(entry.description()),
        el("a")
            .class("tooltip-more")
            .attr("href", term_href(slug))
            .text("Read more")
            .into(),
    ]);
    ui.show_tooltip(anchor, entry.name(), &body, placement);
    true
}

/// Body of the glossary panel for one entry.
#[must_use]
pub fn glossary_panel_body(entry: &ContentEntry, glossary: &ContentDb) -> Html {
    let mut body = el("div")
        .class("glossary-entry")
        .child(el("p").class("glossary-description").text(entry.description()));
    if let Some(details) = entry.details() {
        body = body.children(
            details
                .paragraphs()
                .into_iter()
                .map(|p| el("p").class("glossary-details").text(p)),
        );
    }
    if !entry.related().is_empty() {
        body = body.child(
            el("div")
                .class("glossary-related")
                .child(el("h3").text("Related terms"))
                .child(el("ul").children(entry.related().iter().map(|slug| {
                    el("li").child(
                        el("a")
                            .class("related-term")
                            .attr("href", term_href(slug))
                            .attr("data-term", slug.as_str())
                            .text(glossary.display_name(slug)),
                    )
                }))),
        );
    }
    body.into()
}

/// Fill and open the glossary panel for `slug`. Unknown terms leave the
/// panel closed.
pub fn open_glossary_panel(ui: &mut UiContext, glossary: &ContentDb, slug: &str) -> bool {
    let Some(entry) = glossary.get(slug) else {
        tracing::debug!(slug, "unknown glossary term");
        return false;
    };
    let body = glossary_panel_body(entry, glossary);
    let doc = ui.doc_mut();
    set_text(doc, GLOSSARY_TITLE, entry.name());
    set_content(doc, GLOSSARY_BODY, &body);
    ui.open_panel(GLOSSARY_PANEL, GLOSSARY_OVERLAY, PanelOptions::default())
}
