#![forbid(unsafe_code)]

//! The per-page UI context.
//!
//! [`UiContext`] owns the document, the frame/timer scheduler, and the panel,
//! toast and tooltip managers. DOM listeners only see `&Document`, so when a
//! listener needs UI state to change (a toast close button, for example) it
//! posts a [`UiTask`] to the shared [`Outbox`]; [`UiContext::dispatch`] drains
//! the outbox right after the event finishes.
//!
//! Time only moves when the host calls [`UiContext::advance`], which runs due
//! frames and timers in order. Tasks scheduled while handling a task are
//! measured from that task's due time.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use lather_core::clock::Scheduler;
use lather_core::dom::{DispatchOutcome, Document, NodeId};
use lather_core::event::{DomEvent, KeyEvent};
use lather_core::html::Html;
use web_time::Duration;

use crate::panel::{PanelConfig, PanelKeyOutcome, PanelManager, PanelOptions, PanelTask};
use crate::toast::{DEFAULT_TOAST_DURATION, ToastId, ToastKind, ToastManager, ToastTask};
use crate::tooltip::{TooltipManager, TooltipPlacement};

/// Deferred UI work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiTask {
    Panel(PanelTask),
    Toast(ToastTask),
}

/// Queue through which listeners request UI work.
pub type Outbox = Rc<RefCell<VecDeque<UiTask>>>;

/// Context-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiConfig {
    pub panel: PanelConfig,
    /// Lifetime of toasts shown through [`UiContext::notify`].
    pub toast_duration: Duration,
    /// Interval between animation frames.
    pub frame_interval: Duration,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            panel: PanelConfig::default(),
            toast_duration: DEFAULT_TOAST_DURATION,
            frame_interval: lather_core::clock::FRAME_INTERVAL,
        }
    }
}

/// What [`UiContext::handle_key`] did with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    /// Tab was kept inside the open panel.
    FocusTrapped,
    /// Escape closed the open panel.
    PanelClosed,
    /// Escape hid the tooltip.
    TooltipHidden,
}

/// Owns the document and every piece of page-wide UI state.
pub struct UiContext {
    doc: Document,
    sched: Scheduler<UiTask>,
    panels: PanelManager,
    toasts: ToastManager,
    tooltips: TooltipManager,
    outbox: Outbox,
    config: UiConfig,
}

impl std::fmt::Debug for UiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiContext")
            .field("now", &self.sched.now())
            .field("pending", &self.sched.pending())
            .field("panel", &self.panels.current_panel_id())
            .field("toasts", &self.toasts.visible_count())
            .finish()
    }
}

impl UiContext {
    /// Wrap `doc` with default settings.
    #[must_use]
    pub fn new(doc: Document) -> Self {
        Self::with_config(doc, UiConfig::default())
    }

    #[must_use]
    pub fn with_config(doc: Document, config: UiConfig) -> Self {
        Self {
            doc,
            sched: Scheduler::with_frame_interval(config.frame_interval),
            panels: PanelManager::with_config(config.panel.clone()),
            toasts: ToastManager::new(),
            tooltips: TooltipManager::new(),
            outbox: Rc::new(RefCell::new(VecDeque::new())),
            config,
        }
    }

    #[must_use]
    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// A handle for listeners that need to request UI work.
    #[must_use]
    pub fn outbox(&self) -> Outbox {
        Rc::clone(&self.outbox)
    }

    #[must_use]
    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// Current time on the context clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.sched.now()
    }

    /// Number of queued frames and timers.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.sched.pending()
    }

    // --- Panels -----------------------------------------------------------

    /// Open a side panel. Returns `false` when `panel_id` is not in the page.
    pub fn open_panel(&mut self, panel_id: &str, overlay_id: &str, options: PanelOptions) -> bool {
        self.panels
            .open(&mut self.doc, &mut self.sched, panel_id, overlay_id, options)
    }

    pub fn close_panel(&mut self, panel_id: &str, overlay_id: &str) {
        self.panels.close(&mut self.doc, panel_id, overlay_id);
    }

    pub fn close_current_panel(&mut self) -> bool {
        self.panels.close_current(&mut self.doc)
    }

    #[must_use]
    pub fn is_panel_open(&self) -> bool {
        self.panels.is_open()
    }

    #[must_use]
    pub fn current_panel_id(&self) -> Option<&str> {
        self.panels.current_panel_id()
    }

    // --- Toasts -----------------------------------------------------------

    /// Show a toast for `duration`; zero keeps it until dismissed.
    pub fn show_toast(&mut self, message: &str, kind: ToastKind, duration: Duration) -> ToastId {
        self.toasts.show(
            &mut self.doc,
            &mut self.sched,
            &self.outbox,
            message,
            kind,
            duration,
        )
    }

    /// Show a toast for the configured default duration.
    pub fn notify(&mut self, message: &str, kind: ToastKind) -> ToastId {
        let duration = self.config.toast_duration;
        self.show_toast(message, kind, duration)
    }

    pub fn dismiss_toast(&mut self, id: ToastId) -> bool {
        self.toasts.dismiss(&mut self.doc, &mut self.sched, id)
    }

    #[must_use]
    pub fn toasts(&self) -> &ToastManager {
        &self.toasts
    }

    // --- Tooltip ----------------------------------------------------------

    pub fn show_tooltip(
        &mut self,
        anchor: Option<NodeId>,
        title: &str,
        body: &Html,
        placement: TooltipPlacement,
    ) -> NodeId {
        self.tooltips
            .show(&mut self.doc, anchor, title, body, placement)
    }

    pub fn hide_tooltip(&mut self) -> bool {
        self.tooltips.hide(&mut self.doc)
    }

    #[must_use]
    pub fn is_tooltip_visible(&self) -> bool {
        self.tooltips.is_visible(&self.doc)
    }

    // --- Input and time ---------------------------------------------------

    /// Route a key press: the open panel first, then Escape for the tooltip.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match self.panels.handle_key(&mut self.doc, key) {
            PanelKeyOutcome::Trapped => KeyOutcome::FocusTrapped,
            PanelKeyOutcome::Closed => KeyOutcome::PanelClosed,
            PanelKeyOutcome::Ignored => {
                if key.is_escape() && self.tooltips.hide(&mut self.doc) {
                    KeyOutcome::TooltipHidden
                } else {
                    KeyOutcome::Ignored
                }
            }
        }
    }

    /// Dispatch a DOM event, then run whatever its listeners posted.
    pub fn dispatch(&mut self, event: &DomEvent) -> DispatchOutcome {
        let outcome = self.doc.dispatch(event);
        self.drain_outbox();
        outcome
    }

    /// Move the clock forward by `dt`, running every frame and timer that
    /// falls due on the way.
    pub fn advance(&mut self, dt: Duration) {
        let until = self.sched.now().saturating_add(dt);
        while let Some(task) = self.sched.pop_due(until) {
            self.run(task);
            self.drain_outbox();
        }
        self.sched.settle(until);
    }

    fn drain_outbox(&mut self) {
        loop {
            let next = self.outbox.borrow_mut().pop_front();
            let Some(task) = next else {
                break;
            };
            self.run(task);
        }
    }

    fn run(&mut self, task: UiTask) {
        match task {
            UiTask::Panel(task) => {
                self.panels.handle_task(&mut self.doc, task);
            }
            UiTask::Toast(task) => {
                self.toasts.handle_task(&mut self.doc, &mut self.sched, task);
            }
        }
    }
}
