#![forbid(unsafe_code)]

//! Transient notifications stacked in a page-wide container.
//!
//! A toast moves through three phases:
//!
//! ```text
//! Entering --(next frame)--> Visible --(expire | dismiss)--> Exiting --(200ms)--> detached
//! ```
//!
//! Automatic expiry and the close button share one removal routine, so the
//! exit animation always runs and a toast is never detached twice. A zero
//! duration makes the toast persistent until dismissed.
//!
//! Toasts have no identity beyond their node and [`ToastId`]: no queue, no
//! cap, no de-duplication. Concurrent toasts are ordered by append order.

use std::fmt;

use lather_core::clock::{Scheduler, TimerId};
use lather_core::dom::{Document, EventContext, NodeId};
use lather_core::event::EventKind;
use lather_core::html::{Html, el};
use lather_core::selector::Selector;
use web_time::Duration;

use crate::context::{Outbox, UiTask};
use crate::helpers::delegate;

/// Id of the shared toast container.
pub const CONTAINER_ID: &str = "toast-container";

/// Time between `hiding` and removal, matching the CSS exit transition.
pub const TOAST_EXIT: Duration = Duration::from_millis(200);

/// Lifetime used when callers do not choose one.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(4000);

/// Unique identifier for a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u64);

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message type; selects the icon and styling class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    /// Lower-case name, used in the `toast-{kind}` class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Icon shown before the message.
    #[must_use]
    pub const fn icon(self) -> char {
        match self {
            Self::Success => '\u{2713}',
            Self::Error => '\u{2717}',
            Self::Warning => '!',
            Self::Info => 'i',
        }
    }

    const fn role(self) -> &'static str {
        match self {
            Self::Error | Self::Warning => "alert",
            Self::Info | Self::Success => "status",
        }
    }
}

/// Deferred toast work, run by the scheduler or posted by the close button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastTask {
    /// Add `visible` so the entrance transition runs.
    Reveal(ToastId),
    /// Duration elapsed.
    Expire(ToastId),
    /// Close button pressed.
    Dismiss(ToastId),
    /// Exit transition finished; remove the node.
    Detach(ToastId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Entering,
    Visible,
    Exiting,
}

#[derive(Debug, Clone)]
struct LiveToast {
    id: ToastId,
    node: NodeId,
    phase: Phase,
    expiry: Option<TimerId>,
}

/// Owns the toast container and the toasts currently in the document.
#[derive(Debug, Default)]
pub struct ToastManager {
    next_id: u64,
    container: Option<NodeId>,
    live: Vec<LiveToast>,
}

impl ToastManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a toast. A zero `duration` keeps it until dismissed.
    pub fn show(
        &mut self,
        doc: &mut Document,
        sched: &mut Scheduler<UiTask>,
        outbox: &Outbox,
        message: &str,
        kind: ToastKind,
        duration: Duration,
    ) -> ToastId {
        self.next_id += 1;
        let id = ToastId(self.next_id);
        let container = self.container(doc, outbox);

        let markup: Html = el("div")
            .class("toast")
            .class(&format!("toast-{}", kind.as_str()))
            .attr("role", kind.role())
            .attr("data-toast-id", id.to_string())
            .child(
                el("span")
                    .class("toast-icon")
                    .attr("aria-hidden", "true")
                    .text(kind.icon().to_string()),
            )
            .child(el("span").class("toast-message").text(message))
            .child(
                el("button")
                    .attr("type", "button")
                    .class("toast-close")
                    .attr("data-action", "dismiss-toast")
                    .attr("aria-label", "Dismiss notification")
                    .text("\u{00d7}"),
            )
            .into();
        let node = doc.append_html(container, &markup)[0];

        sched.request_animation_frame(UiTask::Toast(ToastTask::Reveal(id)));
        let expiry = (!duration.is_zero())
            .then(|| sched.set_timeout(duration, UiTask::Toast(ToastTask::Expire(id))));
        self.live.push(LiveToast {
            id,
            node,
            phase: Phase::Entering,
            expiry,
        });

        #[cfg(feature = "tracing")]
        tracing::debug!(
            toast = %id,
            kind = kind.as_str(),
            duration_ms = duration.as_millis() as u64,
            "toast.show"
        );
        id
    }

    /// Start removing a toast. Returns `false` if it is unknown or already
    /// on its way out.
    pub fn dismiss(&mut self, doc: &mut Document, sched: &mut Scheduler<UiTask>, id: ToastId) -> bool {
        let Some(toast) = self
            .live
            .iter_mut()
            .find(|t| t.id == id && t.phase != Phase::Exiting)
        else {
            return false;
        };
        if let Some(timer) = toast.expiry.take() {
            sched.cancel(timer);
        }
        toast.phase = Phase::Exiting;
        doc.remove_class(toast.node, "visible");
        doc.add_class(toast.node, "hiding");
        sched.set_timeout(TOAST_EXIT, UiTask::Toast(ToastTask::Detach(id)));

        #[cfg(feature = "tracing")]
        tracing::debug!(toast = %id, "toast.hide");
        true
    }

    /// Run a deferred toast task.
    pub fn handle_task(&mut self, doc: &mut Document, sched: &mut Scheduler<UiTask>, task: ToastTask) {
        match task {
            ToastTask::Reveal(id) => {
                if let Some(toast) = self
                    .live
                    .iter_mut()
                    .find(|t| t.id == id && t.phase == Phase::Entering)
                {
                    toast.phase = Phase::Visible;
                    doc.add_class(toast.node, "visible");
                }
            }
            ToastTask::Expire(id) | ToastTask::Dismiss(id) => {
                self.dismiss(doc, sched, id);
            }
            ToastTask::Detach(id) => {
                if let Some(at) = self.live.iter().position(|t| t.id == id) {
                    let toast = self.live.remove(at);
                    doc.remove(toast.node);
                    #[cfg(feature = "tracing")]
                    tracing::debug!(toast = %id, "toast.detach");
                }
            }
        }
    }

    /// Toasts in the document and not yet exiting.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.live.iter().filter(|t| t.phase != Phase::Exiting).count()
    }

    /// Whether the toast is still attached (including while exiting).
    #[must_use]
    pub fn is_live(&self, id: ToastId) -> bool {
        self.live.iter().any(|t| t.id == id)
    }

    /// Node of a live toast.
    #[must_use]
    pub fn node(&self, id: ToastId) -> Option<NodeId> {
        self.live.iter().find(|t| t.id == id).map(|t| t.node)
    }

    /// Find or create `#toast-container` and wire its close buttons once.
    fn container(&mut self, doc: &mut Document, outbox: &Outbox) -> NodeId {
        if let Some(node) = self.container.filter(|&n| doc.is_connected(n)) {
            return node;
        }
        let node = match doc.get_element_by_id(CONTAINER_ID) {
            Some(existing) => existing,
            None => {
                let body = doc.body();
                let markup: Html = el("div")
                    .id(CONTAINER_ID)
                    .class("toast-container")
                    .attr("aria-live", "polite")
                    .into();
                doc.append_html(body, &markup)[0]
            }
        };

        let outbox = Outbox::clone(outbox);
        delegate(
            doc,
            node,
            EventKind::Click,
            Selector::attr("data-action", Some("dismiss-toast")),
            None,
            move |ctx: &EventContext<'_>, button| {
                let id = ctx
                    .doc
                    .closest(button, &Selector::attr("data-toast-id", None))
                    .and_then(|toast| ctx.doc.attr(toast, "data-toast-id"))
                    .and_then(|raw| raw.parse().ok());
                if let Some(id) = id {
                    outbox
                        .borrow_mut()
                        .push_back(UiTask::Toast(ToastTask::Dismiss(ToastId(id))));
                }
            },
        );
        self.container = Some(node);
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lather_core::event::DomEvent;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    struct Rig {
        doc: Document,
        sched: Scheduler<UiTask>,
        outbox: Outbox,
        toasts: ToastManager,
    }

    impl Rig {
        fn new(doc: Document) -> Self {
            Self {
                doc,
                sched: Scheduler::new(),
                outbox: Rc::new(RefCell::new(VecDeque::new())),
                toasts: ToastManager::new(),
            }
        }

        fn show(&mut self, message: &str, kind: ToastKind, ms: u64) -> ToastId {
            self.toasts.show(
                &mut self.doc,
                &mut self.sched,
                &self.outbox,
                message,
                kind,
                Duration::from_millis(ms),
            )
        }

        fn run_until(&mut self, ms: u64) {
            let until = Duration::from_millis(ms);
            loop {
                let posted = self.outbox.borrow_mut().pop_front();
                let task = posted.or_else(|| self.sched.pop_due(until));
                match task {
                    Some(UiTask::Toast(task)) => {
                        self.toasts.handle_task(&mut self.doc, &mut self.sched, task);
                    }
                    Some(_) => {}
                    None => break,
                }
            }
            self.sched.settle(until);
        }
    }

    #[test]
    fn toast_lifecycle_reveal_hide_detach() {
        let mut rig = Rig::new(Document::new());
        let id = rig.show("Saved", ToastKind::Success, 1000);
        let node = rig.toasts.node(id).unwrap();
        assert!(!rig.doc.has_class(node, "visible"));

        rig.run_until(16);
        assert!(rig.doc.has_class(node, "visible"));

        rig.run_until(1000);
        assert!(rig.doc.has_class(node, "hiding"));
        assert!(rig.toasts.is_live(id));
        assert_eq!(rig.toasts.visible_count(), 0);

        rig.run_until(1199);
        assert!(rig.toasts.is_live(id));
        rig.run_until(1200);
        assert!(!rig.toasts.is_live(id));
        assert!(!rig.doc.is_connected(node));
    }

    #[test]
    fn container_is_created_once_and_reused() {
        let mut rig = Rig::new(Document::new());
        rig.show("a", ToastKind::Info, 0);
        rig.show("b", ToastKind::Error, 0);
        let container = rig.doc.get_element_by_id(CONTAINER_ID).unwrap();
        assert_eq!(rig.doc.element_children(container).len(), 2);
        assert_eq!(rig.doc.query_all(rig.doc.root(), &Selector::id(CONTAINER_ID)).len(), 1);
        assert_eq!(rig.doc.listener_count_on(container), 1);
    }

    #[test]
    fn page_supplied_container_is_adopted() {
        let doc = Document::from_html(&el("section").id(CONTAINER_ID).into());
        let mut rig = Rig::new(doc);
        let id = rig.show("hello", ToastKind::Warning, 0);
        let container = rig.doc.get_element_by_id(CONTAINER_ID).unwrap();
        assert_eq!(rig.doc.tag(container), Some("section"));
        assert_eq!(rig.doc.parent(rig.toasts.node(id).unwrap()), Some(container));
    }

    #[test]
    fn close_button_dismisses_through_outbox() {
        let mut rig = Rig::new(Document::new());
        let id = rig.show("Persistent", ToastKind::Info, 0);
        rig.run_until(16);
        let node = rig.toasts.node(id).unwrap();
        let close = rig.doc.query(node, &Selector::class("toast-close")).unwrap();
        rig.doc.dispatch(&DomEvent::click(close));
        assert_eq!(rig.outbox.borrow().len(), 1);

        rig.run_until(16);
        assert!(rig.doc.has_class(node, "hiding"));
        rig.run_until(216);
        assert!(!rig.toasts.is_live(id));
    }

    #[test]
    fn dismiss_twice_schedules_one_detach() {
        let mut rig = Rig::new(Document::new());
        let id = rig.show("x", ToastKind::Info, 500);
        assert!(rig.toasts.dismiss(&mut rig.doc, &mut rig.sched, id));
        assert!(!rig.toasts.dismiss(&mut rig.doc, &mut rig.sched, id));
        // reveal frame + one detach; the expiry timer was cancelled
        assert_eq!(rig.sched.pending(), 2);
    }

    #[test]
    fn message_is_text_not_markup() {
        let mut rig = Rig::new(Document::new());
        let id = rig.show("<b>bold</b>", ToastKind::Error, 0);
        let node = rig.toasts.node(id).unwrap();
        assert!(rig.doc.query(node, &Selector::tag("b")).is_none());
        assert_eq!(rig.doc.attr(node, "role"), Some("alert"));
        assert!(rig.doc.has_class(node, "toast-error"));
    }
}
