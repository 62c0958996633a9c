//! Blended fatty-acid profile of a recipe.

use std::collections::BTreeMap;

use lather_content::IngredientDb;
use lather_core::dom::Document;
use lather_core::html::{Html, el};
use lather_widgets::helpers::{format_fixed, set_content};

use super::ingredient::title_case;
use crate::recipe::RecipeState;

pub const PROFILE_RESULTS: &str = "profileResults";

/// Weight-weighted mean of each fat's composition, largest share first.
///
/// Rows whose id is not in `fats`, or whose fat has no composition data,
/// contribute neither composition nor weight. Each row weighs by its share of the recipe, so weight and
/// percentage recipes blend the same way.
#[must_use]
pub fn blend_profile(recipe: &RecipeState, fats: &IngredientDb) -> Vec<(String, f64)> {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    let mut total = 0.0;
    for (entry, share) in recipe.entries().iter().zip(recipe.percentages()) {
        let Some(fat) = fats.get(&entry.id) else {
            continue;
        };
        if share <= 0.0 || fat.fatty_acids.is_empty() {
            continue;
        }
        total += share;
        for (acid, pct) in &fat.fatty_acids {
            *sums.entry(acid.as_str()).or_default() += share * pct;
        }
    }
    if total <= 0.0 {
        return Vec::new();
    }
    let mut blend: Vec<(String, f64)> = sums
        .into_iter()
        .map(|(acid, sum)| (acid.to_string(), sum / total))
        .collect();
    blend.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    blend
}

fn profile_table(blend: &[(String, f64)]) -> Html {
    if blend.is_empty() {
        return el("p")
            .class("empty-state")
            .text("Add fats with composition data to see the blended profile.")
            .into();
    }
    el("table")
        .class("profile-table")
        .child(
            el("thead").child(
                el("tr")
                    .child(el("th").attr("scope", "col").text("Fatty acid"))
                    .child(el("th").attr("scope", "col").text("Share")),
            ),
        )
        .child(el("tbody").children(blend.iter().map(|(acid, pct)| {
            el("tr")
                .child(el("td").text(title_case(acid)))
                .child(el("td").class("numeric").text(format!("{}%", format_fixed(*pct, 1))))
        })))
        .into()
}

/// Render the blend of `recipe` into `#profileResults`. Returns the number
/// of acids listed.
pub fn render_profile(doc: &mut Document, recipe: &RecipeState, fats: &IngredientDb) -> usize {
    let blend = blend_profile(recipe, fats);
    set_content(doc, PROFILE_RESULTS, &profile_table(&blend));
    tracing::debug!(acids = blend.len(), "profile.render");
    blend.len()
}
