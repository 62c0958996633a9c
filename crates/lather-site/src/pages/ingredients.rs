//! The ingredients page: one tab per ingredient database.

use lather_content::{ContentFetcher, ContentFile, ContentStore};
use lather_core::abort::AbortController;
use lather_core::dom::Document;
use lather_core::event::EventKind;
use lather_core::html::{Html, el};
use lather_core::selector::Selector;
use lather_widgets::helpers::{delegate, element};

use super::{ListingPage, Mailbox, RenderOutcome, mailbox, take_all};

pub const TABS_ID: &str = "ingredientTabs";
pub const LIST_ID: &str = "ingredientList";

/// Tabs in display order.
pub const TABS: [ContentFile; 5] = [
    ContentFile::Fats,
    ContentFile::Fragrances,
    ContentFile::Colourants,
    ContentFile::SoapPerformance,
    ContentFile::SkinCare,
];

/// `data-tab` value: the file name without `.json`.
#[must_use]
pub fn tab_key(file: ContentFile) -> &'static str {
    file.file_name().trim_end_matches(".json")
}

fn tab_label(file: ContentFile) -> &'static str {
    match file {
        ContentFile::Fats => "Fats",
        ContentFile::Fragrances => "Fragrances",
        ContentFile::Colourants => "Colourants",
        ContentFile::SoapPerformance => "Soap performance",
        ContentFile::SkinCare => "Skin care",
        other => other.label(),
    }
}

#[derive(Debug)]
pub struct IngredientsPage {
    active: ContentFile,
    listings: Vec<ListingPage>,
    actions: Mailbox<ContentFile>,
    controller: Option<AbortController>,
}

impl Default for IngredientsPage {
    fn default() -> Self {
        Self::new()
    }
}

impl IngredientsPage {
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: ContentFile::Fats,
            listings: TABS.iter().map(|&file| ListingPage::new(file, LIST_ID)).collect(),
            actions: mailbox(),
            controller: None,
        }
    }

    #[must_use]
    pub fn active(&self) -> ContentFile {
        self.active
    }

    /// Switch tabs. Files that are not ingredient tabs are refused.
    pub fn select_tab(&mut self, file: ContentFile) -> bool {
        if !TABS.contains(&file) {
            return false;
        }
        self.active = file;
        true
    }

    /// Switch tabs by `data-tab` key.
    pub fn select_tab_key(&mut self, key: &str) -> bool {
        TABS.iter()
            .find(|&&f| tab_key(f) == key)
            .is_some_and(|&f| self.select_tab(f))
    }

    /// The active tab's listing.
    pub fn listing_mut(&mut self) -> &mut ListingPage {
        let active = self.active;
        let index = TABS.iter().position(|&f| f == active).unwrap_or(0);
        &mut self.listings[index]
    }

    /// Render the tab bar and the active tab. Each tab fetches its file the
    /// first time it is shown.
    pub fn render<F: ContentFetcher>(
        &mut self,
        doc: &mut Document,
        store: &ContentStore<F>,
    ) -> RenderOutcome {
        self.render_tabs(doc);
        self.listing_mut().render(doc, store)
    }

    /// Apply tab clicks and the active listing's filter changes.
    pub fn pump<F: ContentFetcher>(&mut self, doc: &mut Document, store: &ContentStore<F>) -> bool {
        let tabs = take_all(&self.actions);
        let switched = tabs.into_iter().fold(false, |acc, f| self.select_tab(f) || acc);
        if switched {
            self.render(doc, store);
            return true;
        }
        self.listing_mut().pump(doc, store)
    }

    fn render_tabs(&mut self, doc: &mut Document) {
        if let Some(controller) = self.controller.take() {
            controller.abort();
        }
        let Some(bar) = element(doc, TABS_ID) else {
            return;
        };
        let tabs = Html::fragment(TABS.iter().map(|&file| {
            let selected = file == self.active;
            el("button")
                .attr("type", "button")
                .attr("role", "tab")
                .class("tab")
                .class_if(selected, "active")
                .attr("data-tab", tab_key(file))
                .attr("aria-selected", if selected { "true" } else { "false" })
                .attr("aria-controls", LIST_ID)
                .text(tab_label(file))
        }));
        doc.set_attr(bar, "role", "tablist");
        doc.replace_children(bar, &tabs);

        let controller = AbortController::new();
        let actions = self.actions.clone();
        delegate(
            doc,
            bar,
            EventKind::Click,
            Selector::attr("data-tab", None),
            Some(&controller.signal()),
            move |ctx, tab| {
                let key = ctx.doc.attr(tab, "data-tab").unwrap_or_default();
                if let Some(&file) = TABS.iter().find(|&&f| tab_key(f) == key) {
                    actions.borrow_mut().push_back(file);
                }
            },
        );
        self.controller = Some(controller);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lather_content::MemoryFetcher;
    use lather_core::event::DomEvent;
    use pretty_assertions::assert_eq;

    fn page() -> Document {
        Document::from_html(&Html::fragment([el("nav").id(TABS_ID), el("section").id(LIST_ID)]))
    }

    #[test]
    fn tab_keys_match_file_names() {
        let keys: Vec<&str> = TABS.iter().map(|&f| tab_key(f)).collect();
        assert_eq!(
            keys,
            vec!["fats", "fragrances", "colourants", "soap-performance", "skin-care"]
        );
    }

    #[test]
    fn clicking_a_tab_loads_that_database_once() {
        let mut doc = page();
        let store = ContentStore::new(
            MemoryFetcher::new()
                .with(ContentFile::Fats, r#"{"olive-oil": {"name": "Olive Oil"}}"#)
                .with(
                    ContentFile::Fragrances,
                    r#"{"lavender": {"name": "Lavender", "usage": {"max": 3}}, "clove": {"name": "Clove"}}"#,
                )
                .with(ContentFile::Sources, "{}"),
        );
        let mut ingredients = IngredientsPage::new();
        assert_eq!(ingredients.render(&mut doc, &store), RenderOutcome::Rendered(1));

        let bar = doc.get_element_by_id(TABS_ID).unwrap();
        let tab = doc
            .query(bar, &Selector::attr("data-tab", Some("fragrances")))
            .unwrap();
        doc.dispatch(&DomEvent::click(tab));
        assert!(ingredients.pump(&mut doc, &store));
        assert_eq!(ingredients.active(), ContentFile::Fragrances);

        let bar = doc.get_element_by_id(TABS_ID).unwrap();
        let selected = doc
            .query(bar, &Selector::attr("aria-selected", Some("true")))
            .unwrap();
        assert_eq!(doc.text_content(selected), "Fragrances");
        let list = doc.get_element_by_id(LIST_ID).unwrap();
        assert!(doc.text_content(list).contains("Usage: up to 3%"));

        ingredients.select_tab(ContentFile::Fats);
        ingredients.render(&mut doc, &store);
        assert_eq!(store.fetch_count(), 3);
    }

    #[test]
    fn failed_tab_reports_its_label() {
        let mut doc = page();
        let store = ContentStore::new(MemoryFetcher::new().with(ContentFile::Fats, "{}"));
        let mut ingredients = IngredientsPage::new();
        assert!(ingredients.select_tab_key("skin-care"));
        assert_eq!(ingredients.render(&mut doc, &store), RenderOutcome::LoadFailed);
        let list = doc.get_element_by_id(LIST_ID).unwrap();
        assert_eq!(doc.text_content(list), "Failed to load skin care data.");
        assert!(!ingredients.select_tab(ContentFile::Glossary));
    }
}
