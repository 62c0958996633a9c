//! Render modules: data in, markup mounted into the document.
//!
//! Each module reads content records and page state, builds [`Html`], and
//! writes it into the element ids the page template provides. Missing ids
//! are skipped, so a partial template renders what it can.

pub mod glossary;
pub mod ingredient;
pub mod profile;
pub mod recipe;

use lather_content::SourceDb;
use lather_core::html::{Html, el};

pub use glossary::{open_glossary_panel, show_term_tooltip};
pub use ingredient::{InfoPanel, show_ingredient_info};
pub use profile::{blend_profile, render_profile};
pub use recipe::{RecipeMode, RecipeView, render_recipe, update_percentages, update_warnings};

/// Citation list for `ids`. Ids missing from `sources` (or all of them when
/// sources are unavailable) are listed verbatim.
#[must_use]
pub fn references_list(ids: &[String], sources: Option<&SourceDb>) -> Html {
    if ids.is_empty() {
        return Html::empty();
    }
    el("ol")
        .class("references")
        .children(ids.iter().map(|id| {
            let source = sources.and_then(|s| s.get(id));
            let item = el("li").attr("data-source", id.as_str());
            match source {
                Some(source) => match source.url.as_deref() {
                    Some(url) => item.child(
                        el("a")
                            .attr("href", url)
                            .attr("rel", "noopener")
                            .text(source.citation()),
                    ),
                    None => item.text(source.citation()),
                },
                None => item.class("unresolved").text(id.as_str()),
            }
        }))
        .into()
}
