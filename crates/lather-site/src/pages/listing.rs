//! Searchable, filterable article listing.
//!
//! One controller serves every single-database page (glossary, formulas,
//! equipment, processes) and each ingredient tab.

use std::collections::{BTreeMap, BTreeSet};

use lather_content::{
    Article, ContentDb, ContentFetcher, ContentFile, ContentStore, IngredientDb, SourceDb,
    filter_sorted,
};
use lather_core::abort::AbortController;
use lather_core::dom::{Document, NodeId};
use lather_core::event::EventKind;
use lather_core::html::{Element, Html, el};
use lather_core::selector::Selector;
use lather_widgets::helpers::{delegate, element};

use super::{CardExtras, Mailbox, article_card, load_error, mailbox, take_all};

/// Active category and search text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    /// `None` shows every category.
    pub category: Option<String>,
    pub query: String,
}

impl ListingFilter {
    /// Select a category; `"all"` and empty clear it.
    pub fn set_category(&mut self, category: Option<&str>) {
        self.category = category
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != "all")
            .map(str::to_string);
    }
}

/// What [`ListingPage::render`] produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Cards rendered after filtering.
    Rendered(usize),
    /// The database could not be loaded; the error message was shown.
    LoadFailed,
    /// The page has no container to render into.
    MissingContainer,
}

#[derive(Debug)]
enum Loaded {
    Articles(ContentDb),
    Ingredients(IngredientDb),
}

#[derive(Debug)]
enum ListingAction {
    Category(Option<String>),
    Query(String),
}

#[derive(Debug)]
pub struct ListingPage {
    file: ContentFile,
    container_id: String,
    filter: ListingFilter,
    loaded: Option<Loaded>,
    sources: Option<SourceDb>,
    actions: Mailbox<ListingAction>,
    controller: Option<AbortController>,
}

impl ListingPage {
    #[must_use]
    pub fn new(file: ContentFile, container_id: impl Into<String>) -> Self {
        Self {
            file,
            container_id: container_id.into(),
            filter: ListingFilter::default(),
            loaded: None,
            sources: None,
            actions: mailbox(),
            controller: None,
        }
    }

    #[must_use]
    pub fn file(&self) -> ContentFile {
        self.file
    }

    #[must_use]
    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    #[must_use]
    pub fn filter(&self) -> &ListingFilter {
        &self.filter
    }

    pub fn set_category(&mut self, category: Option<&str>) {
        self.filter.set_category(category);
    }

    pub fn set_query(&mut self, query: &str) {
        self.filter.query = query.to_string();
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// The loaded article database, for pages that reuse it (the glossary
    /// panel, for one).
    #[must_use]
    pub fn articles(&self) -> Option<&ContentDb> {
        match &self.loaded {
            Some(Loaded::Articles(db)) => Some(db),
            _ => None,
        }
    }

    #[must_use]
    pub fn ingredients(&self) -> Option<&IngredientDb> {
        match &self.loaded {
            Some(Loaded::Ingredients(db)) => Some(db),
            _ => None,
        }
    }

    /// Fetch the database and sources on first use. Sources are optional:
    /// without them references are listed by id.
    pub fn load<F: ContentFetcher>(&mut self, store: &ContentStore<F>) -> lather_content::Result<()> {
        if self.loaded.is_some() {
            return Ok(());
        }
        let loaded = if self.file.is_ingredient_db() {
            Loaded::Ingredients(store.ingredients(self.file)?)
        } else {
            Loaded::Articles(store.articles(self.file)?)
        };
        self.sources = store.sources().ok();
        tracing::debug!(file = %self.file, sources = self.sources.is_some(), "page loaded");
        self.loaded = Some(loaded);
        Ok(())
    }

    /// Render toolbar and cards into the container, loading first if needed.
    pub fn render<F: ContentFetcher>(
        &mut self,
        doc: &mut Document,
        store: &ContentStore<F>,
    ) -> RenderOutcome {
        if let Some(controller) = self.controller.take() {
            controller.abort();
        }
        let Some(container) = element(doc, &self.container_id) else {
            return RenderOutcome::MissingContainer;
        };
        if let Err(error) = self.load(store) {
            tracing::warn!(file = %self.file, %error, "page load failed");
            doc.replace_children(container, &load_error(self.file.label()));
            return RenderOutcome::LoadFailed;
        }

        let (cards, categories, shown) = match &self.loaded {
            Some(Loaded::Articles(db)) => {
                build_cards(&db.iter().collect::<Vec<_>>(), &self.filter, self.sources.as_ref())
            }
            Some(Loaded::Ingredients(db)) => {
                build_cards(&db.iter().collect::<Vec<_>>(), &self.filter, self.sources.as_ref())
            }
            None => return RenderOutcome::LoadFailed,
        };
        let list = if shown == 0 {
            el("div").class("article-list").child(
                el("p")
                    .class("no-results")
                    .text(format!("No {} match your search.", self.file.label())),
            )
        } else {
            el("div").class("article-list").children(cards)
        };
        let markup = Html::fragment([self.toolbar(&categories), list]);
        doc.replace_children(container, &markup);
        self.wire(doc, container);

        tracing::debug!(file = %self.file, shown, "listing.render");
        RenderOutcome::Rendered(shown)
    }

    /// Apply posted filter changes and re-render. Returns `false` when
    /// nothing was posted.
    pub fn pump<F: ContentFetcher>(&mut self, doc: &mut Document, store: &ContentStore<F>) -> bool {
        let actions = take_all(&self.actions);
        if actions.is_empty() {
            return false;
        }
        for action in actions {
            match action {
                ListingAction::Category(category) => self.set_category(category.as_deref()),
                ListingAction::Query(query) => self.set_query(&query),
            }
        }
        self.render(doc, store);
        true
    }

    fn toolbar(&self, categories: &[String]) -> Element {
        let mut toolbar = el("div").class("listing-toolbar").child(
            el("input")
                .attr("type", "search")
                .class("listing-search")
                .attr("placeholder", "Search")
                .attr("aria-label", format!("Search {}", self.file.label()))
                .attr("value", self.filter.query.as_str()),
        );
        if !categories.is_empty() {
            let active = self.filter.category.as_deref().unwrap_or("all");
            let buttons = std::iter::once(("all", "All"))
                .chain(categories.iter().map(|c| (c.as_str(), c.as_str())))
                .map(|(value, label)| {
                    el("button")
                        .attr("type", "button")
                        .class("filter-btn")
                        .class_if(value == active, "active")
                        .attr("data-category", value)
                        .attr("aria-pressed", if value == active { "true" } else { "false" })
                        .text(label)
                });
            toolbar = toolbar.child(
                el("div")
                    .class("category-filters")
                    .attr("role", "group")
                    .children(buttons),
            );
        }
        toolbar
    }

    fn wire(&mut self, doc: &Document, container: NodeId) {
        let controller = AbortController::new();
        let signal = controller.signal();

        let actions = self.actions.clone();
        delegate(
            doc,
            container,
            EventKind::Click,
            Selector::class("filter-btn"),
            Some(&signal),
            move |ctx, button| {
                let category = ctx.doc.attr(button, "data-category").map(str::to_string);
                actions.borrow_mut().push_back(ListingAction::Category(category));
            },
        );

        let actions = self.actions.clone();
        delegate(
            doc,
            container,
            EventKind::Input,
            Selector::class("listing-search"),
            Some(&signal),
            move |ctx, input| {
                let value = ctx
                    .event
                    .value
                    .as_deref()
                    .or_else(|| ctx.doc.value(input))
                    .unwrap_or_default()
                    .to_string();
                actions.borrow_mut().push_back(ListingAction::Query(value));
            },
        );

        self.controller = Some(controller);
    }
}

/// Cards for the records passing `filter`, every category present in the
/// database, and the number of cards.
fn build_cards<'a, A>(
    records: &[(&'a str, &'a A)],
    filter: &ListingFilter,
    sources: Option<&SourceDb>,
) -> (Vec<Html>, Vec<String>, usize)
where
    A: Article + CardExtras + 'a,
{
    let names: BTreeMap<&str, &str> = records.iter().map(|(slug, r)| (*slug, r.name())).collect();
    let categories: BTreeSet<String> = records
        .iter()
        .filter_map(|(_, r)| r.category().map(str::to_string))
        .collect();
    let matching = filter_sorted(records.iter().copied(), filter.category.as_deref(), &filter.query);
    let cards: Vec<Html> = matching
        .iter()
        .map(|(slug, record)| {
            article_card(
                slug,
                *record,
                |target| {
                    names
                        .get(target)
                        .filter(|n| !n.is_empty())
                        .map_or_else(|| target.to_string(), |n| (*n).to_string())
                },
                sources,
            )
        })
        .collect();
    let shown = cards.len();
    (cards, categories.into_iter().collect(), shown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lather_content::MemoryFetcher;
    use lather_core::event::DomEvent;
    use pretty_assertions::assert_eq;

    const FORMULAS: &str = r#"{
        "lye-calc": {"name": "Lye Calculation", "description": "NaOH from SAP values.", "category": "core"},
        "hardness": {"name": "Hardness", "description": "Lauric + myristic + palmitic + stearic.", "category": "properties", "related": ["lye-calc"]},
        "solver": {"name": "Blend Solver", "description": "Search for a blend.", "category": "optimization"}
    }"#;

    fn page() -> Document {
        Document::from_html(&Html::from(el("section").id("formulasList")))
    }

    fn store() -> ContentStore<MemoryFetcher> {
        ContentStore::new(
            MemoryFetcher::new()
                .with(ContentFile::Formulas, FORMULAS)
                .with(ContentFile::Sources, "{}"),
        )
    }

    fn titles(doc: &Document) -> Vec<String> {
        let root = doc.get_element_by_id("formulasList").unwrap();
        doc.query_all(root, &Selector::class("article-title"))
            .into_iter()
            .map(|n| doc.text_content(n))
            .collect()
    }

    #[test]
    fn renders_sorted_cards_and_filters_by_category() {
        let mut doc = page();
        let store = store();
        let mut listing = ListingPage::new(ContentFile::Formulas, "formulasList");
        assert_eq!(listing.render(&mut doc, &store), RenderOutcome::Rendered(3));
        assert_eq!(titles(&doc), vec!["Blend Solver", "Hardness", "Lye Calculation"]);

        listing.set_category(Some("properties"));
        assert_eq!(listing.render(&mut doc, &store), RenderOutcome::Rendered(1));
        let root = doc.get_element_by_id("formulasList").unwrap();
        let link = doc.query(root, &Selector::class("related-link")).unwrap();
        assert_eq!(doc.text_content(link), "Lye Calculation");
        assert_eq!(store.fetch_count(), 2);
    }

    #[test]
    fn filter_buttons_and_search_post_actions() {
        let mut doc = page();
        let store = store();
        let mut listing = ListingPage::new(ContentFile::Formulas, "formulasList");
        listing.render(&mut doc, &store);

        let root = doc.get_element_by_id("formulasList").unwrap();
        let core = doc
            .query(root, &Selector::class("filter-btn").and_attr("data-category", "core"))
            .unwrap();
        doc.dispatch(&DomEvent::click(core));
        assert!(listing.pump(&mut doc, &store));
        assert_eq!(listing.filter().category.as_deref(), Some("core"));
        assert_eq!(titles(&doc), vec!["Lye Calculation"]);

        let root = doc.get_element_by_id("formulasList").unwrap();
        let all = doc
            .query(root, &Selector::class("filter-btn").and_attr("data-category", "all"))
            .unwrap();
        doc.dispatch(&DomEvent::click(all));
        let search = doc.query(root, &Selector::class("listing-search")).unwrap();
        doc.dispatch(&DomEvent::input(search, "solv"));
        assert!(listing.pump(&mut doc, &store));
        assert_eq!(listing.filter().category, None);
        assert_eq!(titles(&doc), vec!["Blend Solver"]);
        assert!(!listing.pump(&mut doc, &store));
    }

    #[test]
    fn no_match_shows_message() {
        let mut doc = page();
        let mut listing = ListingPage::new(ContentFile::Formulas, "formulasList");
        listing.set_query("zzz");
        assert_eq!(listing.render(&mut doc, &store()), RenderOutcome::Rendered(0));
        let root = doc.get_element_by_id("formulasList").unwrap();
        assert!(doc.text_content(root).contains("No formulas match your search."));
    }

    #[test]
    fn failed_load_shows_error_and_stays_usable() {
        let mut doc = page();
        let empty = ContentStore::new(MemoryFetcher::new());
        let mut listing = ListingPage::new(ContentFile::Formulas, "formulasList");
        assert_eq!(listing.render(&mut doc, &empty), RenderOutcome::LoadFailed);
        let root = doc.get_element_by_id("formulasList").unwrap();
        assert_eq!(doc.text_content(root), "Failed to load formulas.");
        assert!(!listing.is_loaded());

        assert_eq!(listing.render(&mut doc, &store()), RenderOutcome::Rendered(3));
    }
}
