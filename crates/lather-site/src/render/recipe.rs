//! Recipe rows and totals.

use lather_content::IngredientDb;
use lather_core::abort::AbortController;
use lather_core::dom::Document;
use lather_core::html::{Html, el};
use lather_core::selector::Selector;
use lather_widgets::helpers::{element, format_fixed, set_text};
use lather_widgets::{
    ItemCategory, LockableField, PercentageMode, RowCallbacks, RowDescriptor, RowOptions,
    attach_row_event_handlers_with_signal, render_item_row, update_row_warning,
};

use crate::recipe::{Amount, RecipeState};

/// Container of the recipe rows.
pub const RECIPE_CONTAINER: &str = "recipeFats";
/// Element showing the recipe total.
pub const RECIPE_TOTAL: &str = "recipeTotal";
/// Input that scales the unlocked weights to a new total.
pub const RECIPE_TARGET: &str = "recipeTarget";

/// Class added to rows above their usage maximum.
pub const OVER_LIMIT_CLASS: &str = "over-limit";

/// How quantities are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecipeMode {
    /// Weights are typed in, percentages are derived.
    #[default]
    Weight,
    /// Percentages are typed in and rebalanced.
    Percentage,
}

/// Where and how the recipe is painted.
///
/// The view owns the abort controller of the current row listeners, so each
/// render detaches the previous set before wiring a new one.
#[derive(Debug)]
pub struct RecipeView {
    pub container_id: String,
    pub total_id: String,
    pub target_id: String,
    pub mode: RecipeMode,
    pub unit: String,
    pub empty_message: String,
    controller: Option<AbortController>,
}

impl Default for RecipeView {
    fn default() -> Self {
        Self {
            container_id: RECIPE_CONTAINER.to_string(),
            total_id: RECIPE_TOTAL.to_string(),
            target_id: RECIPE_TARGET.to_string(),
            mode: RecipeMode::Weight,
            unit: "g".to_string(),
            empty_message: "No fats added yet.".to_string(),
            controller: None,
        }
    }
}

impl RecipeView {
    #[must_use]
    pub fn new(unit: impl Into<String>, empty_message: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            empty_message: empty_message.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: RecipeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Whether row listeners are currently attached.
    #[must_use]
    pub fn is_wired(&self) -> bool {
        self.controller.as_ref().is_some_and(|c| !c.is_aborted())
    }

    /// Detach the current row listeners, if any.
    pub fn detach(&mut self) {
        if let Some(controller) = self.controller.take() {
            controller.abort();
        }
    }

    fn row_options(&self) -> RowOptions {
        match self.mode {
            RecipeMode::Weight => RowOptions {
                show_weight: true,
                show_percentage: true,
                percentage_mode: PercentageMode::Display,
                show_lock: true,
                show_remove: true,
                lockable_field: Some(LockableField::Weight),
                unit: self.unit.clone(),
                category: ItemCategory::Fat,
            },
            RecipeMode::Percentage => RowOptions {
                show_weight: false,
                show_percentage: true,
                percentage_mode: PercentageMode::Input,
                show_lock: true,
                show_remove: true,
                lockable_field: Some(LockableField::Percentage),
                unit: self.unit.clone(),
                category: ItemCategory::Fat,
            },
        }
    }
}

/// Describe each row for the item-row component.
#[must_use]
pub fn row_descriptors(recipe: &RecipeState, fats: &IngredientDb) -> Vec<RowDescriptor> {
    let percentages = recipe.percentages();
    recipe
        .entries()
        .iter()
        .zip(percentages)
        .enumerate()
        .map(|(index, (entry, pct))| {
            let mut row = RowDescriptor::new(entry.id.as_str(), fats.display_name(&entry.id))
                .percentage(pct)
                .locked(recipe.is_locked(index));
            row.warning_class = Some(OVER_LIMIT_CLASS.to_string());
            if let Amount::Weight(w) = entry.amount {
                row = row.weight(w);
            }
            let max = fats
                .get(&entry.id)
                .and_then(|f| f.usage)
                .filter(|u| u.exceeded_by(pct))
                .and_then(|u| u.max);
            if let Some(max) = max {
                row = row.warning(
                    Some(OVER_LIMIT_CLASS),
                    format!("Above the recommended maximum of {max}%"),
                );
            }
            row
        })
        .collect()
}

/// Paint `recipe` into the view's container and wire row callbacks.
///
/// An empty recipe shows the view's empty message. Returns the number of
/// rows rendered; a missing container renders nothing.
pub fn render_recipe(
    doc: &mut Document,
    view: &mut RecipeView,
    recipe: &RecipeState,
    fats: &IngredientDb,
    callbacks: &RowCallbacks,
) -> usize {
    view.detach();
    let Some(container) = element(doc, &view.container_id) else {
        tracing::debug!(container = %view.container_id, "recipe container missing");
        return 0;
    };

    if recipe.is_empty() {
        doc.replace_children(
            container,
            &Html::from(el("p").class("empty-state").text(view.empty_message.as_str())),
        );
        set_text(doc, &view.total_id, &total_text(0.0, &view.unit));
        tracing::debug!(rows = 0, "recipe.render");
        return 0;
    }

    let options = view.row_options();
    let rows = row_descriptors(recipe, fats);
    let markup = Html::fragment(
        rows.iter()
            .enumerate()
            .map(|(index, row)| render_item_row(row, index, &options)),
    );
    doc.replace_children(container, &markup);

    let controller = AbortController::new();
    attach_row_event_handlers_with_signal(
        doc,
        container,
        ItemCategory::Fat,
        callbacks,
        &controller.signal(),
    );
    view.controller = Some(controller);

    update_percentages(doc, view, recipe);
    tracing::debug!(rows = rows.len(), mode = ?view.mode, "recipe.render");
    rows.len()
}

/// Refresh the percentage displays and the total without re-rendering rows.
pub fn update_percentages(doc: &mut Document, view: &RecipeView, recipe: &RecipeState) {
    let Some(container) = element(doc, &view.container_id) else {
        return;
    };
    let index_attr = ItemCategory::Fat.index_attr();
    for (index, pct) in recipe.percentages().into_iter().enumerate() {
        let selector = Selector::class("percentage-display")
            .and_attr(index_attr, &index.to_string());
        if let Some(node) = doc.query(container, &selector) {
            doc.set_text_content(node, &format!("{}%", format_fixed(pct, 1)));
        }
    }
    set_text(doc, &view.total_id, &total_text(recipe.total_weight(), &view.unit));
}

/// Re-evaluate usage limits after a weight edit and flip the warning class
/// and icon of each row in place. Returns how many rows changed state.
pub fn update_warnings(
    doc: &mut Document,
    view: &RecipeView,
    recipe: &RecipeState,
    fats: &IngredientDb,
) -> usize {
    let Some(container) = element(doc, &view.container_id) else {
        return 0;
    };
    let flipped = row_descriptors(recipe, fats)
        .iter()
        .enumerate()
        .filter(|(index, row)| update_row_warning(doc, container, *index, row, ItemCategory::Fat))
        .count();
    if flipped > 0 {
        tracing::debug!(flipped, "recipe.warnings");
    }
    flipped
}

fn total_text(total: f64, unit: &str) -> String {
    format!("{} {unit}", format_fixed(total, 2))
}
