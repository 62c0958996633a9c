//! Page controllers.
//!
//! A controller fetches its databases once through a
//! [`ContentStore`](lather_content::ContentStore), keeps the page state
//! (filters, tabs, the recipe), renders into its container, and wires
//! delegated listeners. Listeners only see `&Document`, so they post actions
//! to the controller's [`Mailbox`]; the host calls `pump` after dispatching
//! an event to apply them and re-render.
//!
//! Every controller reports a failed load the same way: `Failed to load
//! <what>.` inside its container plus a warning in the log. Nothing retries.

pub mod ingredients;
pub mod listing;
pub mod recipe;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use lather_content::{Article, ContentFile, IngredientRecord, SourceDb};
use lather_core::html::{Html, el};

use crate::render::references_list;

pub use ingredients::IngredientsPage;
pub use listing::{ListingFilter, ListingPage, RenderOutcome};
pub use recipe::{RecipeAction, RecipePage};

/// Queue through which page listeners request state changes.
pub type Mailbox<T> = Rc<RefCell<VecDeque<T>>>;

pub(crate) fn mailbox<T>() -> Mailbox<T> {
    Rc::new(RefCell::new(VecDeque::new()))
}

pub(crate) fn take_all<T>(mailbox: &Mailbox<T>) -> Vec<T> {
    mailbox.borrow_mut().drain(..).collect()
}

/// The single-database article pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArticlePage {
    Glossary,
    Formulas,
    Equipment,
    Processes,
}

impl ArticlePage {
    pub const ALL: [ArticlePage; 4] = [Self::Glossary, Self::Formulas, Self::Equipment, Self::Processes];

    #[must_use]
    pub const fn file(self) -> ContentFile {
        match self {
            Self::Glossary => ContentFile::Glossary,
            Self::Formulas => ContentFile::Formulas,
            Self::Equipment => ContentFile::Equipment,
            Self::Processes => ContentFile::Processes,
        }
    }

    /// Id of the element the page renders into.
    #[must_use]
    pub const fn container_id(self) -> &'static str {
        match self {
            Self::Glossary => "glossaryList",
            Self::Formulas => "formulasList",
            Self::Equipment => "equipmentList",
            Self::Processes => "processesList",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Glossary => "Glossary",
            Self::Formulas => "Formulas",
            Self::Equipment => "Equipment",
            Self::Processes => "Processes",
        }
    }

    /// A listing controller for this page.
    #[must_use]
    pub fn controller(self) -> ListingPage {
        ListingPage::new(self.file(), self.container_id())
    }
}

/// `Failed to load <what>.`
#[must_use]
pub fn load_error(what: &str) -> Html {
    el("p")
        .class("load-error")
        .attr("role", "alert")
        .text(format!("Failed to load {what}."))
        .into()
}

/// Extra lines shown on a card after the description.
pub trait CardExtras {
    fn extras(&self) -> Option<Html> {
        None
    }
}

impl CardExtras for lather_content::ContentEntry {}

impl CardExtras for IngredientRecord {
    fn extras(&self) -> Option<Html> {
        let usage = self.usage.and_then(|u| u.describe())?;
        Some(el("p").class("article-usage").text(format!("Usage: {usage}")).into())
    }
}

/// One article card.
///
/// `name_of` labels related slugs; unknown slugs should come back as
/// themselves.
pub fn article_card<A, N>(slug: &str, record: &A, name_of: N, sources: Option<&SourceDb>) -> Html
where
    A: Article + CardExtras,
    N: Fn(&str) -> String,
{
    let mut card = el("article")
        .class("article-card")
        .id(slug)
        .attr("data-slug", slug)
        .attr_if(record.category().is_some(), "data-category", record.category().unwrap_or_default())
        .child(el("h3").class("article-title").text(record.name()));

    if !record.description().is_empty() {
        card = card.child(el("p").class("article-description").text(record.description()));
    }
    card = card.child_opt(record.extras());
    if let Some(details) = record.details() {
        card = card.child(
            el("div")
                .class("article-details")
                .children(details.paragraphs().into_iter().map(|p| el("p").text(p))),
        );
    }
    if !record.related().is_empty() {
        card = card.child(
            el("div")
                .class("article-related")
                .child(el("span").class("related-label").text("Related: "))
                .children(record.related().iter().map(|target| {
                    el("a")
                        .class("related-link")
                        .attr("href", format!("#{target}"))
                        .text(name_of(target.as_str()))
                })),
        );
    }
    if !record.references().is_empty() {
        card = card.child(
            el("div")
                .class("article-references")
                .child(el("h4").text("References"))
                .child(references_list(record.references(), sources)),
        );
    }
    card.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lather_content::ContentEntry;
    use pretty_assertions::assert_eq;

    #[test]
    fn load_error_names_what_failed() {
        assert_eq!(
            load_error("skin care data").to_string(),
            r#"<p class="load-error" role="alert">Failed to load skin care data.</p>"#
        );
    }

    #[test]
    fn card_links_related_entries_by_name() {
        let entry: ContentEntry = serde_json::from_str(
            r#"{"name": "Stick Blender", "description": "Brings batter to trace.", "related": ["trace", "gloves"]}"#,
        )
        .unwrap();
        let card = article_card("stick-blender", &entry, |s| match s {
            "trace" => "Trace".to_string(),
            other => other.to_string(),
        }, None);
        let links: Vec<(&str, String)> = card
            .find_all(|e| e.has_class("related-link"))
            .into_iter()
            .map(|e| (e.get_attr("href").unwrap_or_default(), Html::Element(e.clone()).text_content()))
            .collect();
        assert_eq!(
            links,
            vec![("#trace", "Trace".to_string()), ("#gloves", "gloves".to_string())]
        );
        assert!(card.find_all(|e| e.has_class("article-references")).is_empty());
    }

    #[test]
    fn ingredient_cards_show_usage() {
        let record: IngredientRecord =
            serde_json::from_str(r#"{"name": "Castor Oil", "usage": {"max": 10}}"#).unwrap();
        let card = article_card("castor-oil", &record, |s: &str| s.to_string(), None);
        assert!(card.text_content().contains("Usage: up to 10%"));
    }
}
