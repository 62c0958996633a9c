#![forbid(unsafe_code)]

//! Side panels with focus trapping and focus restoration.
//!
//! A [`PanelManager`] tracks at most one open panel. Opening a panel marks it
//! and its overlay open, makes the main content region `inert`, and schedules
//! initial focus for the next animation frame. While open, Tab and Shift+Tab
//! cycle through the panel's tabbable descendants and Escape closes it.
//! Closing returns focus to the element that was focused before the first
//! panel of the session opened.
//!
//! # Invariants
//!
//! 1. At most one panel is tracked as open.
//! 2. Switching from panel A to panel B closes A without restoring focus; B
//!    inherits A's restoration target.
//! 3. The tab order is recomputed on every key press from the currently
//!    visible tabbables, so panels whose content changes while open still
//!    trap correctly.
//! 4. Focus is only restored to an element that is still in the document.
//!
//! # Failure Modes
//!
//! - Unknown panel or overlay ids are no-ops.
//! - A panel with no tabbable descendants swallows Tab without moving focus.
//! - A focus task queued by an earlier open is ignored once the panel has
//!   been closed or another panel opened.

use lather_core::clock::Scheduler;
use lather_core::dom::{Document, NodeId};
use lather_core::event::KeyEvent;
use lather_core::selector::Selector;

use crate::context::UiTask;

/// Per-open options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelOptions {
    /// Selector for the element to focus first, tried before the title.
    pub focus_selector: Option<String>,
}

impl PanelOptions {
    /// Focus the first match of `selector` when the panel opens.
    #[must_use]
    pub fn focus(selector: impl Into<String>) -> Self {
        Self {
            focus_selector: Some(selector.into()),
        }
    }
}

/// Page-level settings shared by every panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    /// Id of the region made inert while a panel is open.
    pub main_content_id: String,
    /// Fallback initial-focus target when no focus selector matches.
    pub title_selector: Selector,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            main_content_id: "main-content".to_string(),
            title_selector: Selector::class("panel-title")
                .or(Selector::tag("h1"))
                .or(Selector::tag("h2"))
                .or(Selector::tag("h3")),
        }
    }
}

/// Deferred panel work, run by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelTask {
    /// Move focus into the panel opened at `generation`.
    FocusInitial {
        generation: u64,
        focus_selector: Option<String>,
    },
}

/// What [`PanelManager::handle_key`] did with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKeyOutcome {
    /// No panel open, or not a key the panel cares about.
    Ignored,
    /// Tab or Shift+Tab was kept inside the panel.
    Trapped,
    /// Escape closed the panel.
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenPanel {
    panel_id: String,
    overlay_id: String,
}

/// Tracks the open panel, its restoration target, and pending focus work.
#[derive(Debug, Clone, Default)]
pub struct PanelManager {
    config: PanelConfig,
    current: Option<OpenPanel>,
    restore_to: Option<NodeId>,
    generation: u64,
}

impl PanelManager {
    /// A manager with the default page layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A manager with custom page settings.
    #[must_use]
    pub fn with_config(config: PanelConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Whether a panel is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Id of the open panel.
    #[must_use]
    pub fn current_panel_id(&self) -> Option<&str> {
        self.current.as_ref().map(|p| p.panel_id.as_str())
    }

    /// Element focus returns to on close.
    #[must_use]
    pub fn restore_target(&self) -> Option<NodeId> {
        self.restore_to
    }

    /// Open `panel_id` with its overlay. Returns `false` when the panel does
    /// not exist.
    pub fn open(
        &mut self,
        doc: &mut Document,
        sched: &mut Scheduler<UiTask>,
        panel_id: &str,
        overlay_id: &str,
        options: PanelOptions,
    ) -> bool {
        let Some(panel) = doc.get_element_by_id(panel_id) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(panel_id, "panel.open: no such panel");
            return false;
        };

        match self.current.take() {
            Some(previous) => {
                if previous.panel_id != panel_id {
                    set_open(doc, &previous.panel_id, false);
                }
                if previous.overlay_id != overlay_id {
                    set_open(doc, &previous.overlay_id, false);
                }
                #[cfg(feature = "tracing")]
                tracing::debug!(from = %previous.panel_id, to = panel_id, "panel.switch");
            }
            None => {
                self.restore_to = doc.active_element().filter(|&n| !doc.contains(panel, n));
            }
        }

        set_open(doc, panel_id, true);
        set_open(doc, overlay_id, true);
        if let Some(main) = doc.get_element_by_id(&self.config.main_content_id) {
            doc.set_attr(main, "inert", "");
        }

        self.current = Some(OpenPanel {
            panel_id: panel_id.to_string(),
            overlay_id: overlay_id.to_string(),
        });
        self.generation += 1;
        sched.request_animation_frame(UiTask::Panel(PanelTask::FocusInitial {
            generation: self.generation,
            focus_selector: options.focus_selector,
        }));

        #[cfg(feature = "tracing")]
        tracing::debug!(panel_id, overlay_id, generation = self.generation, "panel.open");
        true
    }

    /// Close `panel_id` and its overlay.
    ///
    /// Closing the tracked panel lifts `inert`, ends the trap, and restores
    /// focus. Closing some other panel only clears its open markers.
    pub fn close(&mut self, doc: &mut Document, panel_id: &str, overlay_id: &str) {
        set_open(doc, panel_id, false);
        set_open(doc, overlay_id, false);

        let tracked = self
            .current
            .as_ref()
            .is_some_and(|p| p.panel_id == panel_id);
        if !tracked {
            if self.current.is_none() {
                self.release_main(doc);
            }
            return;
        }

        self.current = None;
        self.generation += 1;
        self.release_main(doc);

        let restored = self
            .restore_to
            .take()
            .filter(|&n| doc.is_connected(n))
            .is_some_and(|n| doc.focus(n));
        if !restored {
            let inside = doc.get_element_by_id(panel_id).is_some_and(|panel| {
                doc.active_element()
                    .is_some_and(|active| doc.contains(panel, active))
            });
            if inside {
                doc.blur();
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(panel_id, restored, "panel.close");
    }

    /// Close whichever panel is open. Returns `false` if none was.
    pub fn close_current(&mut self, doc: &mut Document) -> bool {
        match self.current.clone() {
            Some(open) => {
                self.close(doc, &open.panel_id, &open.overlay_id);
                true
            }
            None => false,
        }
    }

    /// Route a key press to the open panel.
    ///
    /// A tracked panel that has left the document is dropped on the next key:
    /// `inert` is lifted and Escape reports [`PanelKeyOutcome::Closed`].
    pub fn handle_key(&mut self, doc: &mut Document, key: KeyEvent) -> PanelKeyOutcome {
        let Some(panel) = self.current_node(doc) else {
            if self.close_current(doc) && key.is_escape() {
                return PanelKeyOutcome::Closed;
            }
            return PanelKeyOutcome::Ignored;
        };

        if key.is_escape() {
            self.close_current(doc);
            return PanelKeyOutcome::Closed;
        }

        let forward = key.is_tab();
        if !forward && !key.is_back_tab() {
            return PanelKeyOutcome::Ignored;
        }

        let order = doc.tabbables(panel);
        let (Some(&first), Some(&last)) = (order.first(), order.last()) else {
            return PanelKeyOutcome::Trapped;
        };
        let at = doc
            .active_element()
            .and_then(|active| order.iter().position(|&n| n == active));
        let next = match (at, forward) {
            (Some(i), true) if i + 1 < order.len() => order[i + 1],
            (_, true) => first,
            (Some(i), false) if i > 0 => order[i - 1],
            (_, false) => last,
        };
        doc.focus(next);
        PanelKeyOutcome::Trapped
    }

    /// Run a deferred panel task. Returns `true` if focus moved.
    pub fn handle_task(&mut self, doc: &mut Document, task: PanelTask) -> bool {
        let PanelTask::FocusInitial {
            generation,
            focus_selector,
        } = task;
        if generation != self.generation {
            return false;
        }
        let Some(panel) = self.current_node(doc) else {
            return false;
        };

        if let Some(raw) = focus_selector.as_deref() {
            match Selector::parse(raw) {
                Ok(selector) => {
                    if doc
                        .query(panel, &selector)
                        .is_some_and(|target| doc.focus(target))
                    {
                        return true;
                    }
                }
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(selector = raw, error = %_err, "panel focus selector rejected");
                }
            }
        }

        if let Some(title) = doc.query(panel, &self.config.title_selector) {
            if !doc.is_focusable(title) {
                doc.set_attr(title, "tabindex", "-1");
            }
            if doc.focus(title) {
                return true;
            }
        }

        doc.tabbables(panel)
            .first()
            .is_some_and(|&first| doc.focus(first))
    }

    fn current_node(&self, doc: &Document) -> Option<NodeId> {
        doc.get_element_by_id(&self.current.as_ref()?.panel_id)
    }

    fn release_main(&self, doc: &mut Document) {
        if let Some(main) = doc.get_element_by_id(&self.config.main_content_id) {
            doc.remove_attr(main, "inert");
        }
    }
}

fn set_open(doc: &mut Document, id: &str, open: bool) {
    if let Some(node) = doc.get_element_by_id(id) {
        doc.set_class(node, "open", open);
        doc.set_attr(node, "aria-hidden", if open { "false" } else { "true" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lather_core::event::KeyCode;
    use lather_core::html::{Html, el};

    fn page() -> Document {
        Document::from_html(&Html::fragment([
            el("main")
                .id("main-content")
                .child(el("button").id("opener").text("Olive Oil")),
            el("div").id("fatPanelOverlay").class("panel-overlay"),
            el("aside")
                .id("fatPanel")
                .attr("aria-hidden", "true")
                .child(el("h2").class("panel-title").text("Olive Oil"))
                .child(el("button").id("fat-close").text("Close"))
                .child(el("a").id("fat-link").attr("href", "#glossary").text("More")),
        ]))
    }

    fn id(doc: &Document, id: &str) -> NodeId {
        doc.get_element_by_id(id).unwrap()
    }

    fn drain(pm: &mut PanelManager, doc: &mut Document, sched: &mut Scheduler<UiTask>) {
        while let Some(task) = sched.pop_due(web_time::Duration::from_secs(1)) {
            if let UiTask::Panel(task) = task {
                pm.handle_task(doc, task);
            }
        }
    }

    #[test]
    fn open_marks_panel_and_inerts_main() {
        let mut doc = page();
        let mut sched = Scheduler::new();
        let mut pm = PanelManager::new();
        assert!(pm.open(&mut doc, &mut sched, "fatPanel", "fatPanelOverlay", PanelOptions::default()));

        let panel = id(&doc, "fatPanel");
        assert!(doc.has_class(panel, "open"));
        assert_eq!(doc.attr(panel, "aria-hidden"), Some("false"));
        assert!(doc.has_class(id(&doc, "fatPanelOverlay"), "open"));
        assert!(doc.is_inert(id(&doc, "opener")));
        assert_eq!(pm.current_panel_id(), Some("fatPanel"));
        assert_eq!(sched.pending(), 1);
    }

    #[test]
    fn initial_focus_prefers_selector_then_title() {
        let mut doc = page();
        let mut sched = Scheduler::new();
        let mut pm = PanelManager::new();

        pm.open(&mut doc, &mut sched, "fatPanel", "fatPanelOverlay", PanelOptions::focus("#fat-link"));
        drain(&mut pm, &mut doc, &mut sched);
        assert_eq!(doc.active_element(), Some(id(&doc, "fat-link")));
        pm.close_current(&mut doc);

        pm.open(&mut doc, &mut sched, "fatPanel", "fatPanelOverlay", PanelOptions::focus("#nope"));
        drain(&mut pm, &mut doc, &mut sched);
        let title = doc.query(id(&doc, "fatPanel"), &Selector::class("panel-title")).unwrap();
        assert_eq!(doc.active_element(), Some(title));
        assert_eq!(doc.attr(title, "tabindex"), Some("-1"));
    }

    #[test]
    fn stale_focus_task_is_ignored_after_close() {
        let mut doc = page();
        let mut sched = Scheduler::new();
        let mut pm = PanelManager::new();
        pm.open(&mut doc, &mut sched, "fatPanel", "fatPanelOverlay", PanelOptions::default());
        pm.close_current(&mut doc);
        drain(&mut pm, &mut doc, &mut sched);
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn escape_closes_and_restores_focus() {
        let mut doc = page();
        let mut sched = Scheduler::new();
        let mut pm = PanelManager::new();
        let opener = id(&doc, "opener");
        assert!(doc.focus(opener));
        pm.open(&mut doc, &mut sched, "fatPanel", "fatPanelOverlay", PanelOptions::default());
        drain(&mut pm, &mut doc, &mut sched);

        let outcome = pm.handle_key(&mut doc, KeyEvent::new(KeyCode::Escape));
        assert_eq!(outcome, PanelKeyOutcome::Closed);
        assert!(!pm.is_open());
        assert!(!doc.is_inert(opener));
        assert_eq!(doc.active_element(), Some(opener));
        assert_eq!(pm.handle_key(&mut doc, KeyEvent::new(KeyCode::Escape)), PanelKeyOutcome::Ignored);
    }

    #[test]
    fn detached_restore_target_is_skipped() {
        let mut doc = page();
        let mut sched = Scheduler::new();
        let mut pm = PanelManager::new();
        let opener = id(&doc, "opener");
        doc.focus(opener);
        pm.open(&mut doc, &mut sched, "fatPanel", "fatPanelOverlay", PanelOptions::default());
        drain(&mut pm, &mut doc, &mut sched);
        doc.remove(opener);
        pm.close_current(&mut doc);
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn escape_releases_a_panel_that_left_the_document() {
        let mut doc = page();
        let mut sched = Scheduler::new();
        let mut pm = PanelManager::new();
        let opener = id(&doc, "opener");
        doc.focus(opener);
        pm.open(&mut doc, &mut sched, "fatPanel", "fatPanelOverlay", PanelOptions::default());
        drain(&mut pm, &mut doc, &mut sched);
        let panel = id(&doc, "fatPanel");
        doc.delete(panel);

        assert_eq!(pm.handle_key(&mut doc, KeyEvent::new(KeyCode::Escape)), PanelKeyOutcome::Closed);
        assert!(!pm.is_open());
        assert!(!doc.has_attr(id(&doc, "main-content"), "inert"));
        assert_eq!(doc.active_element(), Some(opener));
        assert_eq!(pm.handle_key(&mut doc, KeyEvent::new(KeyCode::Escape)), PanelKeyOutcome::Ignored);
    }

    #[test]
    fn missing_ids_are_no_ops() {
        let mut doc = page();
        let mut sched = Scheduler::new();
        let mut pm = PanelManager::new();
        assert!(!pm.open(&mut doc, &mut sched, "nope", "nopeOverlay", PanelOptions::default()));
        assert!(!pm.is_open());
        pm.close(&mut doc, "nope", "nopeOverlay");
        assert!(!pm.close_current(&mut doc));
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn tab_cycles_inside_panel() {
        let mut doc = page();
        let mut sched = Scheduler::new();
        let mut pm = PanelManager::new();
        pm.open(&mut doc, &mut sched, "fatPanel", "fatPanelOverlay", PanelOptions::focus("#fat-link"));
        drain(&mut pm, &mut doc, &mut sched);

        let tab = KeyEvent::new(KeyCode::Tab);
        assert_eq!(pm.handle_key(&mut doc, tab), PanelKeyOutcome::Trapped);
        assert_eq!(doc.active_element(), Some(id(&doc, "fat-close")));

        let back = KeyEvent::new(KeyCode::BackTab);
        pm.handle_key(&mut doc, back);
        assert_eq!(doc.active_element(), Some(id(&doc, "fat-link")));

        let other = KeyEvent::new(KeyCode::Char('x'));
        assert_eq!(pm.handle_key(&mut doc, other), PanelKeyOutcome::Ignored);
    }
}
