#![forbid(unsafe_code)]

//! Generic ingredient row: one fat or additive line of a recipe or cupboard
//! list.
//!
//! Rendering and event wiring are separate steps. [`render_item_row`] is a
//! pure function from a [`RowDescriptor`] to [`Html`]; the attach functions
//! install delegated listeners on the list container that translate DOM
//! events into plain callbacks keyed by row index.
//!
//! Weight-only, percentage-only, and mixed lists are all the same component
//! configured through [`RowOptions`].
//!
//! # Markup contract
//!
//! ```text
//! div.item-row[data-{cat}-index][data-{cat}-id]
//!   div.item-name-cell        button.item-name[data-action=info], span.warning-icon?
//!   div.item-weight-cell?     input.weight-input[data-field=weight], span.item-unit, button.lock-btn?
//!   div.item-percentage-cell? input.percentage-input | span.percentage-display, button.lock-btn?
//!   div.item-actions-cell?    button.remove-btn[data-action=remove]
//! ```
//!
//! `{cat}` is `fat` or `additive`.

use std::rc::Rc;

use lather_core::abort::AbortSignal;
use lather_core::dom::{Document, EventContext, ListenerId, NodeId};
use lather_core::event::EventKind;
use lather_core::html::{Element, Html, el};
use lather_core::selector::Selector;

use crate::helpers::{delegate, format_fixed, format_trimmed, parse_number};

/// Which list a row belongs to. Only affects data-attribute names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ItemCategory {
    /// Base oils and butters.
    #[default]
    Fat,
    /// Fragrances, colourants, and other additives.
    Additive,
}

impl ItemCategory {
    /// Lower-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fat => "fat",
            Self::Additive => "additive",
        }
    }

    /// Attribute carrying the row index.
    #[must_use]
    pub const fn index_attr(self) -> &'static str {
        match self {
            Self::Fat => "data-fat-index",
            Self::Additive => "data-additive-index",
        }
    }

    /// Attribute carrying the ingredient id.
    #[must_use]
    pub const fn id_attr(self) -> &'static str {
        match self {
            Self::Fat => "data-fat-id",
            Self::Additive => "data-additive-id",
        }
    }
}

/// A quantity field that may be locked against redistribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockableField {
    /// The weight input.
    Weight,
    /// The percentage input or display.
    Percentage,
}

impl LockableField {
    /// Value of the `data-field` attribute.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weight => "weight",
            Self::Percentage => "percentage",
        }
    }
}

/// How the percentage cell is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PercentageMode {
    /// Read-only text, updated in place by the page.
    #[default]
    Display,
    /// Editable number input.
    Input,
}

/// Data for one row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowDescriptor {
    pub id: String,
    pub name: String,
    pub weight: Option<f64>,
    pub percentage: Option<f64>,
    /// Lock applying to whichever field is lockable.
    pub is_locked: bool,
    pub is_weight_locked: bool,
    pub is_percentage_locked: bool,
    pub has_warning: bool,
    /// Extra class put on the row while `has_warning` is set. Keep it on
    /// unwarned rows too so [`update_row_warning`] knows what to clear.
    pub warning_class: Option<String>,
    /// Tooltip text for the warning icon.
    pub warning_message: Option<String>,
}

impl RowDescriptor {
    /// A row with only an id and display name.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    #[must_use]
    pub fn percentage(mut self, percentage: f64) -> Self {
        self.percentage = Some(percentage);
        self
    }

    #[must_use]
    pub fn locked(mut self, locked: bool) -> Self {
        self.is_locked = locked;
        self
    }

    /// Flag the row with a warning.
    #[must_use]
    pub fn warning(mut self, class: Option<&str>, message: impl Into<String>) -> Self {
        self.has_warning = true;
        self.warning_class = class.map(str::to_string);
        self.warning_message = Some(message.into());
        self
    }

    /// Whether `field` is locked on this row.
    #[must_use]
    pub fn is_field_locked(&self, field: LockableField) -> bool {
        self.is_locked
            || match field {
                LockableField::Weight => self.is_weight_locked,
                LockableField::Percentage => self.is_percentage_locked,
            }
    }
}

/// Which parts of a row to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOptions {
    pub show_weight: bool,
    pub show_percentage: bool,
    pub percentage_mode: PercentageMode,
    pub show_lock: bool,
    pub show_remove: bool,
    pub lockable_field: Option<LockableField>,
    /// Unit label after the weight input.
    pub unit: String,
    pub category: ItemCategory,
}

impl Default for RowOptions {
    fn default() -> Self {
        Self {
            show_weight: true,
            show_percentage: true,
            percentage_mode: PercentageMode::Display,
            show_lock: false,
            show_remove: true,
            lockable_field: None,
            unit: "g".to_string(),
            category: ItemCategory::Fat,
        }
    }
}

impl RowOptions {
    fn lock_for(&self, field: LockableField) -> bool {
        self.show_lock && self.lockable_field == Some(field)
    }
}

/// Render one row.
#[must_use]
pub fn render_item_row(row: &RowDescriptor, index: usize, opts: &RowOptions) -> Html {
    let cat = opts.category;
    let index_str = index.to_string();

    let mut name_cell = el("div").class("item-cell").class("item-name-cell").child(
        el("button")
            .attr("type", "button")
            .class("item-name")
            .attr("data-action", "info")
            .attr(cat.id_attr(), row.id.as_str())
            .attr("title", format!("About {}", row.name))
            .text(row.name.as_str()),
    );
    if row.has_warning {
        name_cell = name_cell.child(warning_icon(row));
    }

    let mut row_el = el("div")
        .class("item-row")
        .class_if(row.has_warning, warning_class(row))
        .attr(cat.index_attr(), index_str.as_str())
        .attr(cat.id_attr(), row.id.as_str())
        .child(name_cell);

    if opts.show_weight {
        let locked = row.is_field_locked(LockableField::Weight);
        let weight = row.weight.map(|w| format_trimmed(w, 2)).unwrap_or_default();
        let mut cell = el("div")
            .class("item-cell")
            .class("item-weight-cell")
            .child(
                el("input")
                    .attr("type", "number")
                    .class("item-input")
                    .class("weight-input")
                    .class_if(locked && opts.lock_for(LockableField::Weight), "locked")
                    .attr("data-field", "weight")
                    .attr(cat.index_attr(), index_str.as_str())
                    .attr("min", "0")
                    .attr("step", "any")
                    .attr("value", weight)
                    .attr("aria-label", format!("{} weight in {}", row.name, opts.unit)),
            )
            .child(el("span").class("item-unit").text(opts.unit.as_str()));
        if opts.lock_for(LockableField::Weight) {
            cell = cell.child(lock_button(LockableField::Weight, locked, &row.name));
        }
        row_el = row_el.child(cell);
    }

    if opts.show_percentage {
        let locked = row.is_field_locked(LockableField::Percentage);
        let pct = row.percentage.unwrap_or(0.0);
        let mut cell = el("div").class("item-cell").class("item-percentage-cell");
        cell = match opts.percentage_mode {
            PercentageMode::Input => cell
                .child(
                    el("input")
                        .attr("type", "number")
                        .class("item-input")
                        .class("percentage-input")
                        .class_if(locked && opts.lock_for(LockableField::Percentage), "locked")
                        .attr("data-field", "percentage")
                        .attr(cat.index_attr(), index_str.as_str())
                        .attr("min", "0")
                        .attr("max", "100")
                        .attr("step", "0.1")
                        .attr("value", format_trimmed(pct, 1))
                        .attr("aria-label", format!("{} percentage", row.name)),
                )
                .child(el("span").class("item-unit").text("%")),
            PercentageMode::Display => cell.child(
                el("span")
                    .class("percentage-display")
                    .attr(cat.index_attr(), index_str.as_str())
                    .text(format!("{}%", format_fixed(pct, 1))),
            ),
        };
        if opts.lock_for(LockableField::Percentage) {
            cell = cell.child(lock_button(LockableField::Percentage, locked, &row.name));
        }
        row_el = row_el.child(cell);
    }

    if opts.show_remove {
        row_el = row_el.child(
            el("div").class("item-cell").class("item-actions-cell").child(
                el("button")
                    .attr("type", "button")
                    .class("remove-btn")
                    .attr("data-action", "remove")
                    .attr("aria-label", format!("Remove {}", row.name))
                    .text("\u{00d7}"),
            ),
        );
    }

    row_el.into()
}

fn warning_class(row: &RowDescriptor) -> &str {
    row.warning_class.as_deref().unwrap_or("has-warning")
}

fn warning_icon(row: &RowDescriptor) -> Element {
    let message = row.warning_message.as_deref().unwrap_or("Check usage");
    el("span")
        .class("warning-icon")
        .attr("role", "img")
        .attr("aria-label", message)
        .attr("title", message)
        .text("\u{26a0}")
}

/// Bring the warning class and icon of an already rendered row in line with
/// `row`, leaving its inputs untouched. Returns `true` if the row's warning
/// state flipped.
pub fn update_row_warning(
    doc: &mut Document,
    container: NodeId,
    index: usize,
    row: &RowDescriptor,
    category: ItemCategory,
) -> bool {
    let selector = Selector::class("item-row").and_attr(category.index_attr(), &index.to_string());
    let Some(row_node) = doc.query(container, &selector) else {
        return false;
    };
    let icon = doc.query(row_node, &Selector::class("warning-icon"));
    let flipped = icon.is_some() != row.has_warning;
    doc.set_class(row_node, warning_class(row), row.has_warning);
    match (icon, row.has_warning) {
        (Some(icon), false) => doc.delete(icon),
        (Some(icon), true) => {
            let fresh = warning_icon(row);
            for name in ["aria-label", "title"] {
                if let Some(value) = fresh.get_attr(name) {
                    doc.set_attr(icon, name, value);
                }
            }
        }
        (None, true) => {
            if let Some(cell) = doc.query(row_node, &Selector::class("item-name-cell")) {
                doc.append_html(cell, &warning_icon(row).into());
            }
        }
        (None, false) => {}
    }
    flipped
}

fn lock_button(field: LockableField, locked: bool, name: &str) -> Element {
    let label = if locked {
        format!("Unlock {} {}", name, field.as_str())
    } else {
        format!("Lock {} {}", name, field.as_str())
    };
    el("button")
        .attr("type", "button")
        .class("lock-btn")
        .class_if(locked, "locked")
        .attr("data-action", "toggle-lock")
        .attr("data-field", field.as_str())
        .attr("aria-pressed", if locked { "true" } else { "false" })
        .attr("aria-label", label.as_str())
        .attr("title", label)
        .text(if locked { "\u{1f512}" } else { "\u{1f513}" })
}

/// Callbacks invoked by row controls. Unset callbacks are simply not wired.
#[derive(Clone, Default)]
pub struct RowCallbacks {
    pub on_weight_change: Option<Rc<dyn Fn(usize, f64)>>,
    pub on_percentage_change: Option<Rc<dyn Fn(usize, f64)>>,
    pub on_toggle_lock: Option<Rc<dyn Fn(usize)>>,
    pub on_remove: Option<Rc<dyn Fn(usize)>>,
    pub on_info: Option<Rc<dyn Fn(&str)>>,
}

impl RowCallbacks {
    /// No callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_weight_change(mut self, f: impl Fn(usize, f64) + 'static) -> Self {
        self.on_weight_change = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_percentage_change(mut self, f: impl Fn(usize, f64) + 'static) -> Self {
        self.on_percentage_change = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_toggle_lock(mut self, f: impl Fn(usize) + 'static) -> Self {
        self.on_toggle_lock = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_remove(mut self, f: impl Fn(usize) + 'static) -> Self {
        self.on_remove = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_info(mut self, f: impl Fn(&str) + 'static) -> Self {
        self.on_info = Some(Rc::new(f));
        self
    }
}

/// Wire row callbacks onto `container` for the life of the container.
///
/// Calling this again on the same container adds a second set of listeners;
/// use [`attach_row_event_handlers_with_signal`] when the caller re-wires on
/// every render.
pub fn attach_row_event_handlers(
    doc: &Document,
    container: NodeId,
    category: ItemCategory,
    callbacks: &RowCallbacks,
) -> Vec<ListenerId> {
    attach(doc, container, category, callbacks, None)
}

/// Wire row callbacks onto `container`, all bound to `signal`. Aborting the
/// signal detaches every one of them.
pub fn attach_row_event_handlers_with_signal(
    doc: &Document,
    container: NodeId,
    category: ItemCategory,
    callbacks: &RowCallbacks,
    signal: &AbortSignal,
) -> Vec<ListenerId> {
    attach(doc, container, category, callbacks, Some(signal))
}

fn attach(
    doc: &Document,
    container: NodeId,
    category: ItemCategory,
    callbacks: &RowCallbacks,
    signal: Option<&AbortSignal>,
) -> Vec<ListenerId> {
    let mut ids = Vec::new();
    let index_attr = category.index_attr();
    let id_attr = category.id_attr();

    let fields = [
        (LockableField::Weight, callbacks.on_weight_change.clone()),
        (LockableField::Percentage, callbacks.on_percentage_change.clone()),
    ];
    for (field, callback) in fields {
        let Some(callback) = callback else {
            continue;
        };
        ids.push(delegate(
            doc,
            container,
            EventKind::Input,
            Selector::attr("data-field", Some(field.as_str())),
            signal,
            move |ctx: &EventContext<'_>, control| {
                if ctx.doc.tag(control) != Some("input") {
                    return;
                }
                let Some(index) = row_index(ctx.doc, control, index_attr) else {
                    return;
                };
                let raw = ctx
                    .event
                    .value
                    .as_deref()
                    .or_else(|| ctx.doc.value(control))
                    .unwrap_or_default();
                callback(index, parse_number(raw));
            },
        ));
    }

    if let Some(callback) = callbacks.on_toggle_lock.clone() {
        ids.push(delegate(
            doc,
            container,
            EventKind::Click,
            Selector::attr("data-action", Some("toggle-lock")),
            signal,
            move |ctx: &EventContext<'_>, button| {
                if let Some(index) = row_index(ctx.doc, button, index_attr) {
                    callback(index);
                }
            },
        ));
    }

    if let Some(callback) = callbacks.on_remove.clone() {
        ids.push(delegate(
            doc,
            container,
            EventKind::Click,
            Selector::attr("data-action", Some("remove")),
            signal,
            move |ctx: &EventContext<'_>, button| {
                if let Some(index) = row_index(ctx.doc, button, index_attr) {
                    callback(index);
                }
            },
        ));
    }

    if let Some(callback) = callbacks.on_info.clone() {
        ids.push(delegate(
            doc,
            container,
            EventKind::Click,
            Selector::attr("data-action", Some("info")),
            signal,
            move |ctx: &EventContext<'_>, button| {
                if let Some(id) = ctx.doc.attr(button, id_attr) {
                    callback(id);
                }
            },
        ));
    }

    ids
}

fn row_index(doc: &Document, control: NodeId, index_attr: &str) -> Option<usize> {
    let row = doc.closest(control, &Selector::attr(index_attr, None))?;
    doc.attr(row, index_attr)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lather_core::abort::AbortController;
    use lather_core::event::DomEvent;
    use proptest::prelude::*;
    use std::cell::RefCell;

    fn olive() -> RowDescriptor {
        RowDescriptor::new("olive-oil", "Olive Oil")
            .weight(300.0)
            .percentage(60.0)
    }

    fn cells(html: &Html, class: &str) -> usize {
        html.find_all(|e| e.has_class(class)).len()
    }

    #[test]
    fn default_row_has_name_weight_percentage_and_remove() {
        let html = render_item_row(&olive(), 0, &RowOptions::default());
        assert_eq!(cells(&html, "item-weight-cell"), 1);
        assert_eq!(cells(&html, "item-percentage-cell"), 1);
        assert_eq!(cells(&html, "item-actions-cell"), 1);
        assert_eq!(cells(&html, "lock-btn"), 0);
        let display = html.find_all(|e| e.has_class("percentage-display"));
        assert_eq!(Html::from(display[0].clone()).text_content(), "60.0%");
        let input = html.find_all(|e| e.has_class("weight-input"));
        assert_eq!(input[0].get_attr("value"), Some("300"));
    }

    #[test]
    fn category_selects_attribute_names() {
        let opts = RowOptions {
            category: ItemCategory::Additive,
            ..RowOptions::default()
        };
        let html = render_item_row(&olive(), 3, &opts);
        let rows = html.find_all(|e| e.has_class("item-row"));
        assert_eq!(rows[0].get_attr("data-additive-index"), Some("3"));
        assert_eq!(rows[0].get_attr("data-additive-id"), Some("olive-oil"));
        assert_eq!(rows[0].get_attr("data-fat-index"), None);
    }

    #[test]
    fn warning_adds_class_and_icon() {
        let row = olive().warning(Some("over-limit"), "Above 100%");
        let html = render_item_row(&row, 0, &RowOptions::default());
        let rows = html.find_all(|e| e.has_class("item-row"));
        assert!(rows[0].has_class("over-limit"));
        let icons = html.find_all(|e| e.has_class("warning-icon"));
        assert_eq!(icons[0].get_attr("title"), Some("Above 100%"));
    }

    #[test]
    fn locked_field_renders_pressed_lock() {
        let opts = RowOptions {
            show_lock: true,
            lockable_field: Some(LockableField::Percentage),
            percentage_mode: PercentageMode::Input,
            ..RowOptions::default()
        };
        let html = render_item_row(&olive().locked(true), 0, &opts);
        let locks = html.find_all(|e| e.has_class("lock-btn"));
        assert_eq!(locks.len(), 1);
        assert_eq!(locks[0].get_attr("aria-pressed"), Some("true"));
        assert_eq!(locks[0].get_attr("data-field"), Some("percentage"));
        let inputs = html.find_all(|e| e.has_class("percentage-input"));
        assert!(inputs[0].has_class("locked"));
    }

    #[test]
    fn names_are_escaped_in_markup() {
        let row = RowDescriptor::new("x", "<Shea & Cocoa>");
        let markup = render_item_row(&row, 0, &RowOptions::default()).to_string();
        assert!(markup.contains("&lt;Shea &amp; Cocoa&gt;"));
        assert!(!markup.contains("<Shea"));
    }

    #[test]
    fn warning_state_updates_in_place() {
        let opts = RowOptions::default();
        let (mut doc, list) = mount(&[olive()], &opts);
        let input = doc.query(list, &Selector::class("weight-input")).unwrap();
        let row = doc.query(list, &Selector::class("item-row")).unwrap();

        let warned = olive().warning(Some("over-limit"), "Above 30%");
        assert!(update_row_warning(&mut doc, list, 0, &warned, ItemCategory::Fat));
        assert!(doc.has_class(row, "over-limit"));
        let icon = doc.query(row, &Selector::class("warning-icon")).unwrap();
        assert_eq!(doc.attr(icon, "title"), Some("Above 30%"));
        assert!(!update_row_warning(&mut doc, list, 0, &warned, ItemCategory::Fat));
        assert_eq!(doc.query_all(row, &Selector::class("warning-icon")).len(), 1);

        let mut cleared = olive();
        cleared.warning_class = Some("over-limit".to_string());
        assert!(update_row_warning(&mut doc, list, 0, &cleared, ItemCategory::Fat));
        assert!(!doc.has_class(row, "over-limit"));
        assert!(doc.query(row, &Selector::class("warning-icon")).is_none());
        assert!(doc.is_connected(input));
        assert!(!update_row_warning(&mut doc, list, 5, &olive(), ItemCategory::Fat));
    }

    fn mount(rows: &[RowDescriptor], opts: &RowOptions) -> (Document, NodeId) {
        let mut doc = Document::from_html(&el("div").id("list").into());
        let list = doc.get_element_by_id("list").unwrap();
        let html = Html::fragment(
            rows.iter()
                .enumerate()
                .map(|(i, r)| render_item_row(r, i, opts)),
        );
        doc.replace_children(list, &html);
        (doc, list)
    }

    #[derive(Default)]
    struct Log(RefCell<Vec<String>>);

    fn recording(log: &Rc<Log>) -> RowCallbacks {
        let (a, b, c, d, e) = (
            Rc::clone(log),
            Rc::clone(log),
            Rc::clone(log),
            Rc::clone(log),
            Rc::clone(log),
        );
        RowCallbacks::new()
            .on_weight_change(move |i, v| a.0.borrow_mut().push(format!("weight {i} {v}")))
            .on_percentage_change(move |i, v| b.0.borrow_mut().push(format!("pct {i} {v}")))
            .on_toggle_lock(move |i| c.0.borrow_mut().push(format!("lock {i}")))
            .on_remove(move |i| d.0.borrow_mut().push(format!("remove {i}")))
            .on_info(move |id| e.0.borrow_mut().push(format!("info {id}")))
    }

    fn lockable() -> RowOptions {
        RowOptions {
            show_lock: true,
            lockable_field: Some(LockableField::Weight),
            percentage_mode: PercentageMode::Input,
            ..RowOptions::default()
        }
    }

    #[test]
    fn delegated_events_reach_callbacks_with_row_index() {
        let rows = [olive(), RowDescriptor::new("coconut-oil", "Coconut Oil").weight(200.0)];
        let (doc, list) = mount(&rows, &lockable());
        let log = Rc::new(Log::default());
        attach_row_event_handlers(&doc, list, ItemCategory::Fat, &recording(&log));

        let weights = doc.query_all(list, &Selector::class("weight-input"));
        doc.dispatch(&DomEvent::input(weights[1], "250.5"));
        let pcts = doc.query_all(list, &Selector::class("percentage-input"));
        doc.dispatch(&DomEvent::input(pcts[0], "abc"));
        let locks = doc.query_all(list, &Selector::class("lock-btn"));
        doc.dispatch(&DomEvent::click(locks[1]));
        let removes = doc.query_all(list, &Selector::class("remove-btn"));
        doc.dispatch(&DomEvent::click(removes[0]));
        let names = doc.query_all(list, &Selector::class("item-name"));
        doc.dispatch(&DomEvent::click(names[1]));

        assert_eq!(
            *log.0.borrow(),
            vec![
                "weight 1 250.5",
                "pct 0 0",
                "lock 1",
                "remove 0",
                "info coconut-oil",
            ]
        );
    }

    #[test]
    fn missing_callbacks_are_not_wired() {
        let (doc, list) = mount(&[olive()], &lockable());
        let ids = attach_row_event_handlers(
            &doc,
            list,
            ItemCategory::Fat,
            &RowCallbacks::new().on_remove(|_| {}),
        );
        assert_eq!(ids.len(), 1);
        assert_eq!(doc.listener_count_on(list), 1);
        let locks = doc.query_all(list, &Selector::class("lock-btn"));
        let outcome = doc.dispatch(&DomEvent::click(locks[0]));
        assert_eq!(outcome.handlers_run, 1);
    }

    #[test]
    fn aborting_signal_silences_every_callback() {
        let (doc, list) = mount(&[olive()], &lockable());
        let log = Rc::new(Log::default());
        let controller = AbortController::new();
        attach_row_event_handlers_with_signal(
            &doc,
            list,
            ItemCategory::Fat,
            &recording(&log),
            &controller.signal(),
        );
        controller.abort();

        for class in ["weight-input", "percentage-input"] {
            let node = doc.query(list, &Selector::class(class)).unwrap();
            doc.dispatch(&DomEvent::input(node, "5"));
        }
        for class in ["lock-btn", "remove-btn", "item-name"] {
            let node = doc.query(list, &Selector::class(class)).unwrap();
            doc.dispatch(&DomEvent::click(node));
        }
        assert!(log.0.borrow().is_empty());
        assert_eq!(doc.listener_count(), 0);
    }

    #[test]
    fn delegation_survives_rerender() {
        let (mut doc, list) = mount(&[olive()], &lockable());
        let log = Rc::new(Log::default());
        attach_row_event_handlers(&doc, list, ItemCategory::Fat, &recording(&log));
        let html = Html::fragment([
            render_item_row(&olive(), 0, &lockable()),
            render_item_row(&olive(), 1, &lockable()),
        ]);
        doc.replace_children(list, &html);
        let removes = doc.query_all(list, &Selector::class("remove-btn"));
        doc.dispatch(&DomEvent::click(removes[1]));
        assert_eq!(*log.0.borrow(), vec!["remove 1"]);
    }

    fn lockable_strategy() -> impl Strategy<Value = Option<LockableField>> {
        prop_oneof![
            Just(None),
            Just(Some(LockableField::Weight)),
            Just(Some(LockableField::Percentage)),
        ]
    }

    proptest! {
        #[test]
        fn cells_match_options(
            show_weight: bool,
            show_percentage: bool,
            show_remove: bool,
            show_lock: bool,
            input_mode: bool,
            lockable in lockable_strategy(),
        ) {
            let opts = RowOptions {
                show_weight,
                show_percentage,
                show_remove,
                show_lock,
                lockable_field: lockable,
                percentage_mode: if input_mode { PercentageMode::Input } else { PercentageMode::Display },
                ..RowOptions::default()
            };
            let html = render_item_row(&olive(), 0, &opts);
            prop_assert_eq!(cells(&html, "item-weight-cell"), usize::from(show_weight));
            prop_assert_eq!(cells(&html, "item-percentage-cell"), usize::from(show_percentage));
            prop_assert_eq!(cells(&html, "item-actions-cell"), usize::from(show_remove));

            for (cell_class, field) in [
                ("item-weight-cell", LockableField::Weight),
                ("item-percentage-cell", LockableField::Percentage),
            ] {
                let cell_locks: usize = html
                    .find_all(|e| e.has_class(cell_class))
                    .iter()
                    .map(|cell| {
                        Html::from((*cell).clone())
                            .find_all(|e| e.has_class("lock-btn"))
                            .len()
                    })
                    .sum();
                let expected = show_lock && lockable == Some(field) && (
                    (field == LockableField::Weight && show_weight)
                        || (field == LockableField::Percentage && show_percentage)
                );
                prop_assert_eq!(cell_locks, usize::from(expected));
            }
        }
    }
}
