#![forbid(unsafe_code)]

//! Hash routing for the "how it works" page.
//!
//! The URL hash has the shape `#section/subpath`:
//!
//! | Hash | Route |
//! |---|---|
//! | `#properties`, `#properties/hardness` | [`Route::Properties`] |
//! | `#algorithms`, `#algorithms/core` | [`Route::Algorithms`] (category defaults to `all`) |
//! | `#glossary`, `#glossary/trace` | [`Route::Glossary`] |
//! | anything else | [`Route::Landing`] |

use std::fmt;

use lather_core::dom::Document;
use lather_core::selector::Selector;
use lather_widgets::helpers::element;

/// Formula categories shown under `#algorithms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlgorithmCategory {
    Core,
    Properties,
    Optimization,
    #[default]
    All,
}

impl AlgorithmCategory {
    pub const ALL: [AlgorithmCategory; 4] = [Self::Core, Self::Properties, Self::Optimization, Self::All];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Properties => "properties",
            Self::Optimization => "optimization",
            Self::All => "all",
        }
    }

    /// Unknown names fall back to [`AlgorithmCategory::All`].
    #[must_use]
    pub fn parse(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name.trim()))
            .unwrap_or_default()
    }

    /// Category to filter formulas by; `None` shows everything.
    #[must_use]
    pub fn filter(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            other => Some(other.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Landing,
    Properties {
        property: Option<String>,
    },
    Algorithms {
        category: AlgorithmCategory,
    },
    Glossary {
        term: Option<String>,
    },
}

impl Route {
    /// Parse a location hash, with or without the leading `#`.
    #[must_use]
    pub fn parse(hash: &str) -> Self {
        let path = hash.trim().trim_start_matches('#');
        let (section, rest) = path.split_once('/').unwrap_or((path, ""));
        let sub = rest.trim().trim_matches('/');
        let sub = (!sub.is_empty()).then(|| sub.to_string());
        match section.to_ascii_lowercase().as_str() {
            "properties" => Self::Properties { property: sub },
            "algorithms" => Self::Algorithms {
                category: sub.as_deref().map(AlgorithmCategory::parse).unwrap_or_default(),
            },
            "glossary" => Self::Glossary { term: sub },
            _ => Self::Landing,
        }
    }

    /// The section name, also the `data-route` value of its view.
    #[must_use]
    pub const fn section(&self) -> &'static str {
        match self {
            Self::Landing => "landing",
            Self::Properties { .. } => "properties",
            Self::Algorithms { .. } => "algorithms",
            Self::Glossary { .. } => "glossary",
        }
    }

    /// Canonical hash for this route.
    #[must_use]
    pub fn to_hash(&self) -> String {
        match self {
            Self::Landing => String::new(),
            Self::Properties { property: Some(p) } => format!("#properties/{p}"),
            Self::Algorithms {
                category: AlgorithmCategory::All,
            } => "#algorithms".to_string(),
            Self::Algorithms { category } => format!("#algorithms/{}", category.as_str()),
            Self::Glossary { term: Some(t) } => format!("#glossary/{t}"),
            other => format!("#{}", other.section()),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Landing => f.write_str("#"),
            other => f.write_str(&other.to_hash()),
        }
    }
}

/// Every section, in navigation order.
pub const SECTIONS: [&str; 4] = ["landing", "properties", "algorithms", "glossary"];

/// Id of the view element for `section`.
#[must_use]
pub fn view_id(section: &str) -> String {
    format!("{section}View")
}

/// Current route; remembers the last hash so repeated navigation is cheap.
#[derive(Debug, Default)]
pub struct Router {
    current: Route,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Switch to the route named by `hash`. Returns `false` when it is the
    /// route already shown.
    pub fn navigate(&mut self, hash: &str) -> bool {
        let next = Route::parse(hash);
        if next == self.current {
            return false;
        }
        tracing::debug!(from = %self.current, to = %next, "route");
        self.current = next;
        true
    }
}

/// Show the view for `route`, hide the others, and mark navigation.
///
/// For `#properties/<name>` the element `property-<name>` gets the
/// `targeted` class. Missing views are skipped.
pub fn apply_route(doc: &mut Document, route: &Route) {
    for section in SECTIONS {
        let Some(view) = element(doc, &view_id(section)) else {
            continue;
        };
        if section == route.section() {
            doc.remove_attr(view, "hidden");
        } else {
            doc.set_attr(view, "hidden", "");
        }
    }

    let links = doc.query_all(doc.root(), &Selector::attr("data-route", None));
    for link in links {
        if doc.attr(link, "data-route") == Some(route.section()) {
            doc.set_attr(link, "aria-current", "page");
        } else {
            doc.remove_attr(link, "aria-current");
        }
    }

    for targeted in doc.query_all(doc.root(), &Selector::class("targeted")) {
        doc.remove_class(targeted, "targeted");
    }
    if let Route::Properties { property: Some(p) } = route {
        if let Some(node) = element(doc, &format!("property-{p}")) {
            doc.add_class(node, "targeted");
        }
    }
}
