//! Records stored in the content databases.
//!
//! Every database is a JSON object from slug to record. Article files
//! (glossary, formulas, equipment, processes) hold [`ContentEntry`] values;
//! ingredient files (fats and the additive tabs) hold [`IngredientRecord`]s,
//! which add usage bounds and fatty-acid composition. `sources.json` holds
//! the [`Source`]s that `references` point at.
//!
//! Older files spell some keys differently (`term` for `name`, `desc` for
//! `description`); both spellings are accepted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Free-form detail text: one paragraph or a list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Details {
    Text(String),
    List(Vec<String>),
}

impl Details {
    /// Paragraphs in order, empty ones dropped.
    #[must_use]
    pub fn paragraphs(&self) -> Vec<&str> {
        let all: Vec<&str> = match self {
            Self::Text(t) => vec![t.as_str()],
            Self::List(items) => items.iter().map(String::as_str).collect(),
        };
        all.into_iter().filter(|p| !p.trim().is_empty()).collect()
    }
}

/// Shared view over every record shown as an article card.
pub trait Article {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn details(&self) -> Option<&Details>;
    fn related(&self) -> &[String];
    fn references(&self) -> &[String];
    fn category(&self) -> Option<&str>;

    /// Case-insensitive match of `query` against name, description, and
    /// details. An empty query matches everything.
    fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        let hit = |s: &str| s.to_lowercase().contains(&query);
        hit(self.name())
            || hit(self.description())
            || self
                .details()
                .is_some_and(|d| d.paragraphs().into_iter().any(hit))
    }

    /// Whether the record belongs to `category`. `None` and `"all"` match
    /// everything.
    fn in_category(&self, category: Option<&str>) -> bool {
        match category {
            None | Some("all") => true,
            Some(wanted) => self.category() == Some(wanted),
        }
    }
}

/// A glossary term, formula, piece of equipment, or process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    #[serde(default, alias = "term")]
    pub name: String,
    #[serde(default, alias = "desc")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Article for ContentEntry {
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn details(&self) -> Option<&Details> {
        self.details.as_ref()
    }
    fn related(&self) -> &[String] {
        &self.related
    }
    fn references(&self) -> &[String] {
        &self.references
    }
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// Recommended share of the recipe, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl Usage {
    /// Whether `percent` exceeds the maximum.
    #[must_use]
    pub fn exceeded_by(&self, percent: f64) -> bool {
        self.max.is_some_and(|max| percent > max)
    }

    /// Human-readable range such as `"5-25%"`, `"up to 25%"`, or `"at least 5%"`.
    #[must_use]
    pub fn describe(&self) -> Option<String> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Some(format!("{min}-{max}%")),
            (None, Some(max)) => Some(format!("up to {max}%")),
            (Some(min), None) => Some(format!("at least {min}%")),
            (None, None) => None,
        }
    }
}

/// A fat, fragrance, colourant, or other additive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientRecord {
    #[serde(default, alias = "term")]
    pub name: String,
    #[serde(default, alias = "desc")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    /// Fatty acid name to percentage of the fat.
    #[serde(default, alias = "fatty_acids", skip_serializing_if = "BTreeMap::is_empty")]
    pub fatty_acids: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Article for IngredientRecord {
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn details(&self) -> Option<&Details> {
        self.details.as_ref()
    }
    fn related(&self) -> &[String] {
        &self.related
    }
    fn references(&self) -> &[String] {
        &self.references
    }
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// A bibliography entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default, alias = "name")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(
        default,
        deserialize_with = "year_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Years appear both as `1997` and `"1997"`.
fn year_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl Source {
    /// One-line citation: `Author (Year). Title.`
    #[must_use]
    pub fn citation(&self) -> String {
        let mut out = String::new();
        if let Some(author) = self.author.as_deref().filter(|a| !a.is_empty()) {
            out.push_str(author);
            if let Some(year) = self.year.as_deref().filter(|y| !y.is_empty()) {
                out.push_str(&format!(" ({year})"));
            }
            out.push_str(". ");
        }
        out.push_str(self.title.trim_end_matches('.'));
        out.push('.');
        out
    }
}

macro_rules! slug_db {
    ($(#[$meta:meta])* $name:ident, $record:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name {
            entries: BTreeMap<String, $record>,
        }

        impl $name {
            #[must_use]
            pub fn get(&self, slug: &str) -> Option<&$record> {
                self.entries.get(slug)
            }

            #[must_use]
            pub fn contains(&self, slug: &str) -> bool {
                self.entries.contains_key(slug)
            }

            #[must_use]
            pub fn len(&self) -> usize {
                self.entries.len()
            }

            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.entries.is_empty()
            }

            /// Records in slug order.
            pub fn iter(&self) -> impl Iterator<Item = (&str, &$record)> {
                self.entries.iter().map(|(k, v)| (k.as_str(), v))
            }

            pub fn insert(&mut self, slug: impl Into<String>, record: $record) {
                self.entries.insert(slug.into(), record);
            }
        }

        impl FromIterator<(String, $record)> for $name {
            fn from_iter<I: IntoIterator<Item = (String, $record)>>(iter: I) -> Self {
                Self {
                    entries: iter.into_iter().collect(),
                }
            }
        }
    };
}

slug_db!(
    /// An article database keyed by slug.
    ContentDb,
    ContentEntry
);

slug_db!(
    /// An ingredient database keyed by id.
    IngredientDb,
    IngredientRecord
);

slug_db!(
    /// `sources.json`.
    SourceDb,
    Source
);

impl ContentDb {
    /// Display name for a slug: the entry's name, or the slug itself.
    #[must_use]
    pub fn display_name<'a>(&'a self, slug: &'a str) -> &'a str {
        self.get(slug)
            .map(|e| e.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(slug)
    }
}

impl IngredientDb {
    /// Display name for an id: the record's name, or the id itself.
    #[must_use]
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id)
            .map(|e| e.name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or(id)
    }
}

impl SourceDb {
    /// Resolve reference ids in order. Unknown ids resolve to `None`.
    #[must_use]
    pub fn resolve<'a>(&'a self, ids: &'a [String]) -> Vec<(&'a str, Option<&'a Source>)> {
        ids.iter().map(|id| (id.as_str(), self.get(id))).collect()
    }
}

/// Records that match `category` and `query`, sorted by display name
/// (case-insensitive, slug as tiebreak).
pub fn filter_sorted<'a, A, I>(records: I, category: Option<&str>, query: &str) -> Vec<(&'a str, &'a A)>
where
    A: Article + 'a,
    I: IntoIterator<Item = (&'a str, &'a A)>,
{
    let mut out: Vec<(&str, &A)> = records
        .into_iter()
        .filter(|(_, r)| r.in_category(category) && r.matches_query(query))
        .collect();
    out.sort_by(|(sa, a), (sb, b)| {
        a.name()
            .to_lowercase()
            .cmp(&b.name().to_lowercase())
            .then_with(|| sa.cmp(sb))
    });
    out
}
