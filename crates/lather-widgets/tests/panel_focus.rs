#![forbid(unsafe_code)]

//! Panel switching, inert handling, focus trapping and focus restoration
//! driven through a full [`UiContext`].
//!
//! # Invariants tested
//!
//! 1. At most one panel is open; opening B while A is open closes A.
//! 2. The main region is inert exactly while a panel is open.
//! 3. Closing restores focus to the element focused before the first open,
//!    but only if it is still attached.
//! 4. Tab and Shift+Tab wrap at the edges, including a single tabbable.

use lather_core::dom::{Document, NodeId};
use lather_core::event::{KeyCode, KeyEvent, Modifiers};
use lather_core::html::{Html, el};
use lather_widgets::{KeyOutcome, PanelOptions, UiContext};
use web_time::Duration;

const FRAME: Duration = Duration::from_millis(16);

fn page() -> Document {
    Document::from_html(&Html::fragment([
        el("main")
            .id("main-content")
            .child(el("button").id("olive-info").text("Olive Oil"))
            .child(el("a").id("trace-link").attr("href", "#glossary").text("trace")),
        el("div").id("fatPanelOverlay"),
        el("aside")
            .id("fatPanel")
            .child(el("h2").class("panel-title").id("fatPanelName").text("Olive Oil"))
            .child(el("button").id("fat-close").text("Close"))
            .child(el("a").id("fat-more").attr("href", "#fats").text("More"))
            .child(el("input").id("fat-hidden").attr("type", "text").flag("hidden"))
            .child(el("button").id("fat-disabled").flag("disabled").text("Nope")),
        el("div").id("glossaryPanelOverlay"),
        el("aside")
            .id("glossaryPanel")
            .child(el("h2").class("panel-title").text("Trace"))
            .child(el("button").id("glossary-close").text("Close")),
    ]))
}

fn node(ui: &UiContext, id: &str) -> NodeId {
    ui.doc().get_element_by_id(id).unwrap()
}

fn focus(ui: &mut UiContext, id: &str) {
    let n = node(ui, id);
    assert!(ui.doc_mut().focus(n), "could not focus #{id}");
}

fn focused_id(ui: &UiContext) -> Option<String> {
    let active = ui.doc().active_element()?;
    ui.doc().attr(active, "id").map(str::to_string)
}

#[test]
fn switching_panels_keeps_one_open_and_restores_original_focus() {
    let mut ui = UiContext::new(page());
    focus(&mut ui, "olive-info");

    assert!(ui.open_panel("fatPanel", "fatPanelOverlay", PanelOptions::default()));
    ui.advance(FRAME);
    assert_eq!(focused_id(&ui).as_deref(), Some("fatPanelName"));

    assert!(ui.open_panel("glossaryPanel", "glossaryPanelOverlay", PanelOptions::default()));
    ui.advance(FRAME);

    let fat = node(&ui, "fatPanel");
    let glossary = node(&ui, "glossaryPanel");
    assert!(!ui.doc().has_class(fat, "open"));
    assert!(!ui.doc().has_class(node(&ui, "fatPanelOverlay"), "open"));
    assert!(ui.doc().has_class(glossary, "open"));
    assert_eq!(ui.current_panel_id(), Some("glossaryPanel"));
    assert!(ui.doc().has_attr(node(&ui, "main-content"), "inert"));

    ui.close_panel("glossaryPanel", "glossaryPanelOverlay");
    assert!(!ui.is_panel_open());
    assert!(!ui.doc().has_attr(node(&ui, "main-content"), "inert"));
    assert_eq!(focused_id(&ui).as_deref(), Some("olive-info"));
}

#[test]
fn detached_opener_is_not_refocused() {
    let mut ui = UiContext::new(page());
    focus(&mut ui, "olive-info");
    ui.open_panel("fatPanel", "fatPanelOverlay", PanelOptions::default());
    ui.advance(FRAME);

    let opener = node(&ui, "olive-info");
    ui.doc_mut().remove(opener);
    ui.close_current_panel();
    assert_eq!(ui.doc().active_element(), None);
}

#[test]
fn main_content_cannot_take_focus_while_panel_is_open() {
    let mut ui = UiContext::new(page());
    ui.open_panel("fatPanel", "fatPanelOverlay", PanelOptions::default());
    let link = node(&ui, "trace-link");
    assert!(!ui.doc_mut().focus(link));
    assert!(!ui.doc().is_tabbable(link));
}

#[test]
fn tab_wraps_forward_and_backward_skipping_hidden_and_disabled() {
    let mut ui = UiContext::new(page());
    ui.open_panel("fatPanel", "fatPanelOverlay", PanelOptions::focus("#fat-more"));
    ui.advance(FRAME);
    assert_eq!(focused_id(&ui).as_deref(), Some("fat-more"));

    let tab = KeyEvent::new(KeyCode::Tab);
    let shift_tab = KeyEvent::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT);

    assert_eq!(ui.handle_key(tab), KeyOutcome::FocusTrapped);
    assert_eq!(focused_id(&ui).as_deref(), Some("fat-close"));
    assert_eq!(ui.handle_key(shift_tab), KeyOutcome::FocusTrapped);
    assert_eq!(focused_id(&ui).as_deref(), Some("fat-more"));
}

#[test]
fn single_tabbable_keeps_focus_on_itself() {
    let mut ui = UiContext::new(page());
    ui.open_panel("glossaryPanel", "glossaryPanelOverlay", PanelOptions::focus("#glossary-close"));
    ui.advance(FRAME);
    assert_eq!(focused_id(&ui).as_deref(), Some("glossary-close"));

    ui.handle_key(KeyEvent::new(KeyCode::Tab));
    assert_eq!(focused_id(&ui).as_deref(), Some("glossary-close"));
    ui.handle_key(KeyEvent::new(KeyCode::BackTab));
    assert_eq!(focused_id(&ui).as_deref(), Some("glossary-close"));
}

#[test]
fn tab_from_title_enters_tab_order_at_first_control() {
    let mut ui = UiContext::new(page());
    ui.open_panel("glossaryPanel", "glossaryPanelOverlay", PanelOptions::default());
    ui.advance(FRAME);
    ui.handle_key(KeyEvent::new(KeyCode::Tab));
    assert_eq!(focused_id(&ui).as_deref(), Some("glossary-close"));
}

#[test]
fn escape_closes_and_keys_are_ignored_afterwards() {
    let mut ui = UiContext::new(page());
    ui.open_panel("fatPanel", "fatPanelOverlay", PanelOptions::default());
    assert_eq!(ui.handle_key(KeyEvent::new(KeyCode::Escape)), KeyOutcome::PanelClosed);
    assert_eq!(ui.handle_key(KeyEvent::new(KeyCode::Tab)), KeyOutcome::Ignored);
    // the focus frame queued by the open must not pull focus into a closed panel
    ui.advance(FRAME);
    assert_eq!(ui.doc().active_element(), None);
}
