//! The recipe builder page.

use std::rc::Rc;

use lather_content::{ContentFetcher, ContentFile, ContentStore, IngredientDb, SourceDb};
use lather_core::abort::AbortController;
use lather_core::dom::{Document, EventContext};
use lather_core::event::EventKind;
use lather_widgets::helpers::{element, parse_number, set_content};
use lather_widgets::{RowCallbacks, UiContext};

use super::{Mailbox, load_error, mailbox, take_all};
use crate::recipe::{Amount, RecipeEntry, RecipeState};
use crate::render::{
    InfoPanel, RecipeView, render_profile, render_recipe, show_ingredient_info, update_percentages,
    update_warnings,
};

/// A change requested by a row control.
#[derive(Debug, Clone, PartialEq)]
pub enum RecipeAction {
    Weight(usize, f64),
    Percentage(usize, f64),
    ToggleLock(usize),
    Remove(usize),
    Info(String),
    /// Scale unlocked weights so the recipe totals this much.
    ScaleTo(f64),
}

/// Owns the recipe, its view, and the fat database.
#[derive(Debug)]
pub struct RecipePage {
    state: RecipeState,
    view: RecipeView,
    fats: Option<IngredientDb>,
    sources: Option<SourceDb>,
    actions: Mailbox<RecipeAction>,
    controls: Option<AbortController>,
}

impl RecipePage {
    #[must_use]
    pub fn new(view: RecipeView) -> Self {
        Self {
            state: RecipeState::new(),
            view,
            fats: None,
            sources: None,
            actions: mailbox(),
            controls: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> &RecipeState {
        &self.state
    }

    #[must_use]
    pub fn view(&self) -> &RecipeView {
        &self.view
    }

    /// Fetch fats (required) and sources (optional). On failure the
    /// container shows `Failed to load fats.` and the page keeps working
    /// with an empty database.
    pub fn load<F: ContentFetcher>(&mut self, ui: &mut UiContext, store: &ContentStore<F>) -> bool {
        if self.fats.is_some() {
            return true;
        }
        match store.ingredients(ContentFile::Fats) {
            Ok(fats) => {
                self.fats = Some(fats);
                self.sources = store.sources().ok();
                true
            }
            Err(error) => {
                tracing::warn!(%error, "recipe page load failed");
                set_content(
                    ui.doc_mut(),
                    &self.view.container_id,
                    &load_error(ContentFile::Fats.label()),
                );
                false
            }
        }
    }

    /// Replace the recipe.
    pub fn set_entries(&mut self, entries: Vec<RecipeEntry>) {
        self.state = RecipeState::from_entries(entries);
    }

    /// Append an ingredient and repaint.
    pub fn add(&mut self, ui: &mut UiContext, entry: RecipeEntry) -> usize {
        let index = self.state.add(entry);
        self.render(ui);
        index
    }

    /// Wire the page-level controls outside the rows (the target total).
    /// Re-wiring replaces the previous listeners.
    pub fn wire_controls(&mut self, doc: &Document) {
        if let Some(controller) = self.controls.take() {
            controller.abort();
        }
        let Some(target) = element(doc, &self.view.target_id) else {
            return;
        };
        let controller = AbortController::new();
        let post = poster(&self.actions);
        doc.add_event_listener(
            target,
            EventKind::Change,
            Rc::new(move |ctx: &EventContext<'_>| {
                let value = parse_number(ctx.event.value.as_deref().unwrap_or_default());
                post(RecipeAction::ScaleTo(value));
            }),
            Some(controller.signal()),
        );
        self.controls = Some(controller);
    }

    fn callbacks(&self) -> RowCallbacks {
        let (w, p, l, r, i) = (
            poster(&self.actions),
            poster(&self.actions),
            poster(&self.actions),
            poster(&self.actions),
            poster(&self.actions),
        );
        RowCallbacks::new()
            .on_weight_change(move |index, value| w(RecipeAction::Weight(index, value)))
            .on_percentage_change(move |index, value| p(RecipeAction::Percentage(index, value)))
            .on_toggle_lock(move |index| l(RecipeAction::ToggleLock(index)))
            .on_remove(move |index| r(RecipeAction::Remove(index)))
            .on_info(move |id| i(RecipeAction::Info(id.to_string())))
    }

    /// Paint rows, totals, and the blended profile.
    pub fn render(&mut self, ui: &mut UiContext) -> usize {
        let empty = IngredientDb::default();
        let fats = self.fats.as_ref().unwrap_or(&empty);
        let callbacks = self.callbacks();
        let rows = render_recipe(ui.doc_mut(), &mut self.view, &self.state, fats, &callbacks);
        render_profile(ui.doc_mut(), &self.state, fats);
        rows
    }

    /// Apply what row controls posted. Weight edits only refresh the derived
    /// numbers and warnings; structural changes and scaling repaint the rows.
    pub fn pump(&mut self, ui: &mut UiContext) -> usize {
        let actions = take_all(&self.actions);
        let mut repaint = false;
        let mut refresh = false;
        for action in &actions {
            match action {
                RecipeAction::Weight(index, value) => {
                    refresh |= self.state.set_weight(*index, *value);
                }
                RecipeAction::Percentage(index, value) => {
                    repaint |= self.state.set_percentage(*index, *value);
                }
                RecipeAction::ToggleLock(index) => {
                    repaint |= self.state.toggle_lock(*index).is_some();
                }
                RecipeAction::Remove(index) => {
                    repaint |= self.state.remove(*index).is_some();
                }
                RecipeAction::Info(id) => self.show_info(ui, id),
                RecipeAction::ScaleTo(target) => {
                    if *target > 0.0 {
                        repaint |= self.state.scale_unlocked_to(*target);
                    } else {
                        tracing::debug!(total = *target, "ignoring non-positive recipe total");
                    }
                }
            }
        }
        if repaint {
            self.render(ui);
        } else if refresh {
            let empty = IngredientDb::default();
            let fats = self.fats.as_ref().unwrap_or(&empty);
            update_percentages(ui.doc_mut(), &self.view, &self.state);
            update_warnings(ui.doc_mut(), &self.view, &self.state, fats);
            render_profile(ui.doc_mut(), &self.state, fats);
        }
        actions.len()
    }

    fn show_info(&self, ui: &mut UiContext, id: &str) {
        let Some(record) = self.fats.as_ref().and_then(|f| f.get(id)) else {
            tracing::debug!(id, "no info for ingredient");
            return;
        };
        show_ingredient_info(ui, InfoPanel::Fat, record, self.sources.as_ref());
    }

    /// Weight of the row at `index`, if it is a weight row.
    #[must_use]
    pub fn weight_at(&self, index: usize) -> Option<f64> {
        match self.state.entries().get(index)?.amount {
            Amount::Weight(w) => Some(w),
            Amount::Percentage(_) => None,
        }
    }
}

fn poster(actions: &Mailbox<RecipeAction>) -> impl Fn(RecipeAction) + 'static {
    let actions = actions.clone();
    move |action| actions.borrow_mut().push_back(action)
}
