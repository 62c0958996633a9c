//! The ingredient info side panel.
//!
//! Fats and additives share one panel layout under different id prefixes:
//! `fatPanel`, `fatPanelOverlay`, `fatPanelName`, ... and the `additivePanel`
//! equivalents.

use lather_content::{IngredientRecord, SourceDb};
use lather_core::html::{Html, el};
use lather_widgets::helpers::{format_trimmed, set_content, set_texts};
use lather_widgets::{PanelOptions, UiContext};

use super::references_list;

/// Which info panel to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoPanel {
    Fat,
    Additive,
}

impl InfoPanel {
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Fat => "fatPanel",
            Self::Additive => "additivePanel",
        }
    }

    fn id(self, part: &str) -> String {
        format!("{}{part}", self.prefix())
    }
}

/// Fatty acids by descending share, name as tiebreak.
#[must_use]
pub fn sorted_fatty_acids(record: &IngredientRecord) -> Vec<(&str, f64)> {
    let mut acids: Vec<(&str, f64)> = record
        .fatty_acids
        .iter()
        .map(|(name, pct)| (name.as_str(), *pct))
        .collect();
    acids.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    acids
}

/// `"oleic"` -> `"Oleic"`.
#[must_use]
pub fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn fatty_acid_list(record: &IngredientRecord) -> Html {
    let acids = sorted_fatty_acids(record);
    if acids.is_empty() {
        return el("p").class("panel-empty").text("No fatty acid data.").into();
    }
    el("ul")
        .class("fatty-acid-list")
        .children(acids.into_iter().map(|(name, pct)| {
            el("li")
                .child(el("span").class("acid-name").text(title_case(name)))
                .child(el("span").class("acid-value").text(format!("{}%", format_trimmed(pct, 1))))
        }))
        .into()
}

/// Fill the info panel for `record` and open it.
///
/// Returns `false` when the panel is not in the page. Missing inner elements
/// are skipped.
pub fn show_ingredient_info(
    ui: &mut UiContext,
    panel: InfoPanel,
    record: &IngredientRecord,
    sources: Option<&SourceDb>,
) -> bool {
    let usage = record
        .usage
        .and_then(|u| u.describe())
        .unwrap_or_else(|| "No usage guidance.".to_string());
    let (name_id, description_id, usage_id) =
        (panel.id("Name"), panel.id("Description"), panel.id("Usage"));
    let doc = ui.doc_mut();
    set_texts(
        doc,
        &[
            (name_id.as_str(), record.name.as_str()),
            (description_id.as_str(), record.description.as_str()),
            (usage_id.as_str(), usage.as_str()),
        ],
    );
    set_content(doc, &panel.id("FattyAcids"), &fatty_acid_list(record));
    set_content(
        doc,
        &panel.id("References"),
        &references_list(&record.references, sources),
    );
    tracing::debug!(panel = panel.prefix(), name = %record.name, "ingredient info");
    ui.open_panel(panel.prefix(), &panel.id("Overlay"), PanelOptions::default())
}
