//! Page templates and the per-page session that drives them.
//!
//! [`shell`] builds the static markup of a page: navigation, the view
//! containers, and the side panels. A [`PageSession`] mounts that shell into a
//! [`UiContext`], runs the page's controller against a [`ContentStore`], and
//! turns DOM events and hash changes into re-renders. [`Site`] ties the
//! configuration to a content source and renders whole pages to strings.

use clap::ValueEnum;
use lather_content::{
    ContentDb, ContentFetcher, ContentFile, ContentStore, DirFetcher, LinkIssue, validate_links,
};
use lather_core::dom::{DispatchOutcome, NodeId};
use lather_core::event::{DomEvent, EventKind, KeyEvent};
use lather_core::geometry::Rect;
use lather_core::html::{Element, Html, el, escape};
use lather_core::selector::Selector;
use lather_core::{AbortController, Document};
use lather_widgets::helpers::delegate;
use lather_widgets::panel::PanelConfig;
use lather_widgets::{KeyOutcome, UiConfig, UiContext};
use web_time::Duration;

use crate::config::{SiteConfig, UiSettings};
use crate::pages::{
    ArticlePage, IngredientsPage, ListingPage, Mailbox, RecipePage, ingredients, mailbox, take_all,
};
use crate::recipe::RecipeEntry;
use crate::render::glossary::{GLOSSARY_BODY, GLOSSARY_OVERLAY, GLOSSARY_PANEL, GLOSSARY_TITLE};
use crate::render::recipe::{RECIPE_CONTAINER, RECIPE_TARGET, RECIPE_TOTAL};
use crate::render::profile::PROFILE_RESULTS;
use crate::render::{InfoPanel, RecipeView, open_glossary_panel, show_term_tooltip};
use crate::router::{self, AlgorithmCategory, Route, Router, view_id};

/// Every page of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Page {
    HowItWorks,
    Recipe,
    Glossary,
    Formulas,
    Equipment,
    Ingredients,
    Processes,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Self::HowItWorks,
        Self::Recipe,
        Self::Glossary,
        Self::Formulas,
        Self::Equipment,
        Self::Ingredients,
        Self::Processes,
    ];

    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::HowItWorks => "how-it-works",
            Self::Recipe => "recipe",
            Self::Glossary => "glossary",
            Self::Formulas => "formulas",
            Self::Equipment => "equipment",
            Self::Ingredients => "ingredients",
            Self::Processes => "processes",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::HowItWorks => "How it works",
            Self::Recipe => "Recipe builder",
            Self::Glossary => "Glossary",
            Self::Formulas => "Formulas",
            Self::Equipment => "Equipment",
            Self::Ingredients => "Ingredients",
            Self::Processes => "Processes",
        }
    }

    /// Output file name, `<slug>.html`.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.html", self.slug())
    }

    /// The article listing this page shows, if it is a single-database page.
    #[must_use]
    pub const fn article_page(self) -> Option<ArticlePage> {
        match self {
            Self::Glossary => Some(ArticlePage::Glossary),
            Self::Formulas => Some(ArticlePage::Formulas),
            Self::Equipment => Some(ArticlePage::Equipment),
            Self::Processes => Some(ArticlePage::Processes),
            Self::HowItWorks | Self::Recipe | Self::Ingredients => None,
        }
    }

    /// Whether the page reacts to `#section/subpath` routes.
    #[must_use]
    pub const fn is_routed(self) -> bool {
        matches!(self, Self::HowItWorks)
    }
}

/// Soap properties explained under `#properties`.
pub const PROPERTIES: [(&str, &str, &str); 7] = [
    ("hardness", "Hardness", "How firm the bar is and how long it lasts in use."),
    ("cleansing", "Cleansing", "How strongly the lather strips oils from skin."),
    ("conditioning", "Conditioning", "How much the bar leaves skin feeling soft."),
    ("bubbly", "Bubbly", "Volume of large, airy lather."),
    ("creamy", "Creamy", "Density and stability of fine lather."),
    ("iodine", "Iodine", "Degree of unsaturation; higher values make softer bars."),
    ("ins", "INS", "Hardness minus iodine value; a rough balance indicator."),
];

fn site_nav(active: Page) -> Element {
    el("nav")
        .class("site-nav")
        .attr("aria-label", "Site")
        .children(Page::ALL.into_iter().map(|page| {
            el("a")
                .attr("href", page.file_name())
                .attr_if(page == active, "aria-current", "page")
                .text(page.title())
        }))
}

fn close_button() -> Element {
    el("button")
        .attr("type", "button")
        .class("panel-close")
        .flag("data-close-panel")
        .attr("aria-label", "Close panel")
        .text("Close")
}

fn overlay(id: &str) -> Element {
    el("div")
        .id(id)
        .class("panel-overlay")
        .flag("data-close-panel")
        .attr("aria-hidden", "true")
}

fn side_panel(id: &str, title_id: &str) -> Element {
    el("aside")
        .id(id)
        .class("side-panel")
        .attr("role", "dialog")
        .attr("aria-modal", "true")
        .attr("aria-labelledby", title_id)
        .attr("aria-hidden", "true")
        .child(close_button())
}

fn info_panel(panel: InfoPanel) -> [Html; 2] {
    let prefix = panel.prefix();
    let part = |name: &str| format!("{prefix}{name}");
    let section = |heading: &str, name: &str| {
        el("section")
            .class("panel-section")
            .child(el("h3").text(heading))
            .child(el("div").id(&part(name)))
    };
    [
        overlay(&part("Overlay")).into(),
        side_panel(prefix, &part("Name"))
            .child(el("h2").id(&part("Name")).class("panel-title"))
            .child(el("p").id(&part("Description")).class("panel-description"))
            .child(section("Usage", "Usage"))
            .child(section("Fatty acids", "FattyAcids"))
            .child(section("References", "References"))
            .into(),
    ]
}

fn glossary_panel() -> [Html; 2] {
    [
        overlay(GLOSSARY_OVERLAY).into(),
        side_panel(GLOSSARY_PANEL, GLOSSARY_TITLE)
            .child(el("h2").id(GLOSSARY_TITLE).class("panel-title"))
            .child(el("div").id(GLOSSARY_BODY))
            .into(),
    ]
}

fn view(section: &str, visible: bool) -> Element {
    el("section")
        .id(&view_id(section))
        .class("route-view")
        .attr_if(!visible, "hidden", "")
}

fn how_it_works_main() -> Vec<Html> {
    let routes = el("nav").class("route-nav").attr("aria-label", "Sections").children(
        router::SECTIONS.iter().skip(1).map(|&section| {
            el("a")
                .attr("href", format!("#{section}"))
                .attr("data-route", section)
                .text(title_of(section))
        }),
    );
    let properties = PROPERTIES.iter().map(|(slug, name, description)| {
        el("div")
            .id(&format!("property-{slug}"))
            .class("property")
            .child(el("h3").text(*name))
            .child(el("p").text(*description))
    });
    let algorithm_links = AlgorithmCategory::ALL.iter().map(|category| {
        el("a")
            .class("category-link")
            .attr("href", Route::Algorithms { category: *category }.to_hash())
            .text(title_of(category.as_str()))
    });
    vec![
        el("h1").text(Page::HowItWorks.title()).into(),
        routes.into(),
        view("landing", true)
            .child(el("p").text("Pick a section to see how recipes are evaluated."))
            .into(),
        view("properties", false).children(properties).into(),
        view("algorithms", false)
            .child(el("div").class("algorithm-categories").children(algorithm_links))
            .child(el("div").id(ArticlePage::Formulas.container_id()))
            .into(),
        view("glossary", false)
            .child(el("div").id(ArticlePage::Glossary.container_id()))
            .into(),
    ]
}

fn title_of(name: &str) -> String {
    let mut chars = name.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

fn recipe_main(unit: &str) -> Vec<Html> {
    vec![
        el("h1").text(Page::Recipe.title()).into(),
        el("div").id(RECIPE_CONTAINER).class("recipe-rows").into(),
        el("p")
            .class("recipe-total")
            .text("Total: ")
            .child(el("span").id(RECIPE_TOTAL))
            .into(),
        el("label")
            .class("recipe-target")
            .text("Scale unlocked fats to ")
            .child(
                el("input")
                    .id(RECIPE_TARGET)
                    .attr("type", "number")
                    .attr("min", "0")
                    .attr("step", "any"),
            )
            .child(el("span").class("item-unit").text(unit))
            .into(),
        el("section")
            .class("profile")
            .child(el("h2").text("Fatty acid profile"))
            .child(el("div").id(PROFILE_RESULTS))
            .into(),
    ]
}

fn ingredients_main() -> Vec<Html> {
    vec![
        el("h1").text(Page::Ingredients.title()).into(),
        el("nav").id(ingredients::TABS_ID).class("tabs").into(),
        el("section")
            .id(ingredients::LIST_ID)
            .attr("role", "tabpanel")
            .into(),
    ]
}

/// Static markup of `page`: navigation, main content, and side panels.
/// `unit` labels weight controls.
#[must_use]
pub fn shell(page: Page, main_content_id: &str, unit: &str) -> Html {
    let main: Vec<Html> = match page {
        Page::HowItWorks => how_it_works_main(),
        Page::Recipe => recipe_main(unit),
        Page::Ingredients => ingredients_main(),
        other => match other.article_page() {
            Some(article) => vec![
                el("h1").text(article.title()).into(),
                el("div").id(article.container_id()).into(),
            ],
            None => Vec::new(),
        },
    };
    let [fat_overlay, fat_panel] = info_panel(InfoPanel::Fat);
    let [additive_overlay, additive_panel] = info_panel(InfoPanel::Additive);
    let [glossary_overlay, glossary] = glossary_panel();
    Html::fragment([
        el("header").class("site-header").child(site_nav(page)).into(),
        el("main").id(main_content_id).children(main).into(),
        fat_overlay,
        fat_panel,
        additive_overlay,
        additive_panel,
        glossary_overlay,
        glossary,
    ])
}

/// The controller behind a page.
#[derive(Debug)]
enum Controller {
    HowItWorks {
        formulas: ListingPage,
        glossary: ListingPage,
    },
    Recipe(RecipePage),
    Listing(ListingPage),
    Ingredients(IngredientsPage),
}

/// Requests posted by page-wide listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionAction {
    ClosePanel,
    Term(String),
    Tooltip {
        term: String,
        anchor: NodeId,
        bounds: Rect,
    },
    HideTooltip,
}

/// One open page: document, UI state, controller, and router.
pub struct PageSession<'a, F> {
    page: Page,
    store: &'a ContentStore<F>,
    settings: UiSettings,
    ui: UiContext,
    controller: Controller,
    router: Router,
    actions: Mailbox<SessionAction>,
    listeners: AbortController,
}

impl<'a, F: ContentFetcher> PageSession<'a, F> {
    /// Mount the shell of `page` and wire page-wide listeners. Nothing is
    /// fetched until [`PageSession::render`].
    #[must_use]
    pub fn new(page: Page, config: &SiteConfig, store: &'a ContentStore<F>) -> Self {
        let main_content_id = config.ui.main_content_id.as_str();
        let doc = Document::from_html(&shell(page, main_content_id, &config.unit));
        let ui_config = UiConfig {
            panel: PanelConfig {
                main_content_id: main_content_id.to_string(),
                ..PanelConfig::default()
            },
            toast_duration: config.ui.toast_duration(),
            ..UiConfig::default()
        };
        let controller = match page {
            Page::HowItWorks => Controller::HowItWorks {
                formulas: ArticlePage::Formulas.controller(),
                glossary: ArticlePage::Glossary.controller(),
            },
            Page::Recipe => Controller::Recipe(RecipePage::new(RecipeView::new(
                config.unit.as_str(),
                config.recipe.empty_message.as_str(),
            ))),
            Page::Ingredients => Controller::Ingredients(IngredientsPage::new()),
            Page::Glossary => Controller::Listing(ArticlePage::Glossary.controller()),
            Page::Formulas => Controller::Listing(ArticlePage::Formulas.controller()),
            Page::Equipment => Controller::Listing(ArticlePage::Equipment.controller()),
            Page::Processes => Controller::Listing(ArticlePage::Processes.controller()),
        };
        let mut session = Self {
            page,
            store,
            settings: config.ui.clone(),
            ui: UiContext::with_config(doc, ui_config),
            controller,
            router: Router::new(),
            actions: mailbox(),
            listeners: AbortController::new(),
        };
        session.wire();
        if let Controller::Recipe(recipe) = &mut session.controller {
            recipe.wire_controls(session.ui.doc());
        }
        session
    }

    fn wire(&self) {
        let doc = self.ui.doc();
        let root = doc.root();
        let signal = self.listeners.signal();
        let actions = self.actions.clone();
        delegate(
            doc,
            root,
            EventKind::Click,
            Selector::attr("data-close-panel", None),
            Some(&signal),
            move |_, _| actions.borrow_mut().push_back(SessionAction::ClosePanel),
        );
        let actions = self.actions.clone();
        delegate(
            doc,
            root,
            EventKind::Click,
            Selector::attr("data-term", None),
            Some(&signal),
            move |ctx, link| {
                if let Some(term) = ctx.doc.attr(link, "data-term") {
                    ctx.prevent_default();
                    actions.borrow_mut().push_back(SessionAction::Term(term.to_string()));
                }
            },
        );
        let actions = self.actions.clone();
        delegate(
            doc,
            root,
            EventKind::FocusIn,
            Selector::attr("data-term", None),
            Some(&signal),
            move |ctx, link| {
                let term = ctx.doc.attr(link, "data-term");
                let (Some(term), Some(bounds)) = (term, ctx.event.bounds) else {
                    return;
                };
                actions.borrow_mut().push_back(SessionAction::Tooltip {
                    term: term.to_string(),
                    anchor: link,
                    bounds,
                });
            },
        );
        let actions = self.actions.clone();
        delegate(
            doc,
            root,
            EventKind::FocusOut,
            Selector::attr("data-term", None),
            Some(&signal),
            move |_, _| actions.borrow_mut().push_back(SessionAction::HideTooltip),
        );
    }

    #[must_use]
    pub fn page(&self) -> Page {
        self.page
    }

    #[must_use]
    pub fn ui(&self) -> &UiContext {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut UiContext {
        &mut self.ui
    }

    #[must_use]
    pub fn route(&self) -> &Route {
        self.router.current()
    }

    /// The recipe controller, on the recipe page.
    pub fn recipe_mut(&mut self) -> Option<&mut RecipePage> {
        match &mut self.controller {
            Controller::Recipe(recipe) => Some(recipe),
            _ => None,
        }
    }

    /// Load the page's databases and paint every container.
    pub fn render(&mut self) {
        let span = tracing::debug_span!("page.render", page = self.page.slug());
        let _guard = span.enter();
        let store = self.store;
        match &mut self.controller {
            Controller::HowItWorks { formulas, glossary } => {
                formulas.render(self.ui.doc_mut(), store);
                glossary.render(self.ui.doc_mut(), store);
                router::apply_route(self.ui.doc_mut(), self.router.current());
            }
            Controller::Recipe(recipe) => {
                if recipe.load(&mut self.ui, store) {
                    recipe.render(&mut self.ui);
                }
            }
            Controller::Listing(listing) => {
                listing.render(self.ui.doc_mut(), store);
            }
            Controller::Ingredients(page) => {
                page.render(self.ui.doc_mut(), store);
            }
        }
    }

    /// Replace the recipe and repaint it. Returns `false` off the recipe page.
    pub fn set_recipe(&mut self, entries: Vec<RecipeEntry>) -> bool {
        let store = self.store;
        let Controller::Recipe(recipe) = &mut self.controller else {
            return false;
        };
        recipe.set_entries(entries);
        if recipe.load(&mut self.ui, store) {
            recipe.render(&mut self.ui);
        }
        true
    }

    /// Follow a hash change. Routed pages switch views; `#glossary/<term>`
    /// opens the glossary panel on any page that has the glossary loaded.
    pub fn navigate(&mut self, hash: &str) -> bool {
        if !self.router.navigate(hash) {
            return false;
        }
        let route = self.router.current().clone();
        let store = self.store;
        if let Controller::HowItWorks { formulas, glossary } = &mut self.controller {
            match &route {
                Route::Algorithms { category } => {
                    formulas.set_category(category.filter());
                    formulas.render(self.ui.doc_mut(), store);
                }
                Route::Glossary { term: Some(term) } => {
                    if glossary.load(store).is_ok() {
                        if let Some(db) = glossary.articles() {
                            open_glossary_panel(&mut self.ui, db, term);
                        }
                    }
                }
                _ => {}
            }
            router::apply_route(self.ui.doc_mut(), &route);
        } else if let Route::Glossary { term: Some(term) } = &route {
            self.open_term(term);
        }
        true
    }

    /// Run `f` against the glossary the page already holds, fetching it
    /// through the store on pages that do not.
    fn with_glossary(&mut self, f: impl FnOnce(&mut UiContext, &ContentDb) -> bool) -> bool {
        match &self.controller {
            Controller::HowItWorks { glossary, .. } => {
                glossary.articles().is_some_and(|db| f(&mut self.ui, db))
            }
            Controller::Listing(listing) if listing.file() == ContentFile::Glossary => {
                listing.articles().is_some_and(|db| f(&mut self.ui, db))
            }
            _ => match self.store.articles(ContentFile::Glossary) {
                Ok(db) => f(&mut self.ui, &db),
                Err(error) => {
                    tracing::warn!(%error, "glossary unavailable");
                    false
                }
            },
        }
    }

    fn open_term(&mut self, term: &str) -> bool {
        self.with_glossary(|ui, db| open_glossary_panel(ui, db, term))
    }

    /// Show the short definition of `term` next to `anchor`, laid out at
    /// `bounds`. Unknown terms show nothing.
    pub fn show_term(&mut self, term: &str, anchor: NodeId, bounds: Rect) -> bool {
        let placement = self.settings.tooltip_placement(bounds);
        self.with_glossary(|ui, db| show_term_tooltip(ui, db, term, Some(anchor), placement))
    }

    /// Dispatch `event`, then apply whatever the page's listeners posted.
    pub fn dispatch(&mut self, event: &DomEvent) -> DispatchOutcome {
        let outcome = self.ui.dispatch(event);
        self.pump();
        outcome
    }

    /// Route a key press to the open panel or tooltip.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        self.ui.handle_key(key)
    }

    /// Advance animation frames and timers.
    pub fn advance(&mut self, dt: Duration) {
        self.ui.advance(dt);
    }

    fn pump(&mut self) {
        let store = self.store;
        match &mut self.controller {
            Controller::HowItWorks { formulas, glossary } => {
                formulas.pump(self.ui.doc_mut(), store);
                glossary.pump(self.ui.doc_mut(), store);
            }
            Controller::Recipe(recipe) => {
                recipe.pump(&mut self.ui);
            }
            Controller::Listing(listing) => {
                listing.pump(self.ui.doc_mut(), store);
            }
            Controller::Ingredients(page) => {
                page.pump(self.ui.doc_mut(), store);
            }
        }
        for action in take_all(&self.actions) {
            match action {
                SessionAction::ClosePanel => {
                    self.ui.close_current_panel();
                }
                SessionAction::Term(term) => {
                    self.ui.hide_tooltip();
                    self.open_term(&term);
                }
                SessionAction::Tooltip {
                    term,
                    anchor,
                    bounds,
                } => {
                    self.show_term(&term, anchor, bounds);
                }
                SessionAction::HideTooltip => {
                    self.ui.hide_tooltip();
                }
            }
        }
    }

    /// Serialize the whole page, doctype included.
    #[must_use]
    pub fn to_html_string(&self) -> String {
        let doc = self.ui.doc();
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{} | Lather</title>\n</head>\n{}\n</html>\n",
            escape(self.page.title()),
            doc.outer_html(doc.body())
        )
    }
}

impl<F> Drop for PageSession<'_, F> {
    fn drop(&mut self) {
        self.listeners.abort();
    }
}

/// A configured site reading content through `F`.
#[derive(Debug)]
pub struct Site<F> {
    config: SiteConfig,
    store: ContentStore<F>,
}

impl Site<DirFetcher> {
    /// Read content from `config.content_dir`.
    #[must_use]
    pub fn from_config(config: SiteConfig) -> Self {
        let fetcher = DirFetcher::new(config.content_dir.clone());
        Self::new(config, fetcher)
    }
}

impl<F: ContentFetcher> Site<F> {
    #[must_use]
    pub fn new(config: SiteConfig, fetcher: F) -> Self {
        Self {
            config,
            store: ContentStore::new(fetcher),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &ContentStore<F> {
        &self.store
    }

    /// Open `page` for interactive use.
    #[must_use]
    pub fn open(&self, page: Page) -> PageSession<'_, F> {
        PageSession::new(page, &self.config, &self.store)
    }

    /// Render `page` to a complete HTML document. `hash` is applied after the
    /// first render; `recipe` seeds the recipe page.
    pub fn render_page(
        &self,
        page: Page,
        hash: Option<&str>,
        recipe: Option<Vec<RecipeEntry>>,
    ) -> String {
        let mut session = self.open(page);
        session.render();
        if let Some(entries) = recipe {
            session.set_recipe(entries);
        }
        if let Some(hash) = hash {
            session.navigate(hash);
        }
        tracing::info!(page = page.slug(), "rendered");
        session.to_html_string()
    }

    /// Dangling cross-links and unresolved references in the content.
    #[must_use]
    pub fn check(&self) -> Vec<LinkIssue> {
        validate_links(&self.store)
    }
}
