#![forbid(unsafe_code)]

//! Headless document model.
//!
//! [`Document`] is the in-process stand-in for the browser DOM that the
//! widgets and page controllers mutate. It keeps exactly the surface the view
//! layer relies on:
//!
//! - an element/text tree with attributes and a `class` list,
//! - lookup by id and by [`Selector`],
//! - connectivity (`is_connected`) so stale references can be detected,
//! - focus, `inert`, `hidden`, and the tabbable-element order,
//! - listeners with bubbling dispatch, optionally bound to an
//!   [`AbortSignal`].
//!
//! # Invariants
//!
//! 1. A node has at most one parent; appending a node moves it.
//! 2. Subtrees detached with [`Document::remove`] stay in the arena but are
//!    no longer connected; ids inside them are invisible to
//!    [`Document::get_element_by_id`].
//! 3. Children dropped by [`Document::clear_children`],
//!    [`Document::replace_children`] or [`Document::delete`] are released:
//!    their slots are reused and their listeners discarded. A [`NodeId`]
//!    carries the generation of its slot, so a stale id never resolves to the
//!    node that took its place.
//! 4. [`Document::active_element`] never reports a disconnected node.
//! 5. Listeners whose signal is aborted never run and are pruned on the next
//!    dispatch.
//!
//! Listener registration and dispatch take `&self`: handlers receive a shared
//! borrow of the document and may register further listeners, but they
//! cannot restructure the tree mid-dispatch.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::abort::AbortSignal;
use crate::event::{DomEvent, EventKind};
use crate::html::{Element, Html};
use crate::selector::Selector;

/// Handle to a node of a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Raw arena index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    const fn slot(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// Handle to a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Event handler callback.
pub type Handler = Rc<dyn Fn(&EventContext<'_>)>;

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

struct Listener {
    id: ListenerId,
    node: NodeId,
    kind: EventKind,
    handler: Handler,
    signal: Option<AbortSignal>,
}

impl Listener {
    fn is_live(&self) -> bool {
        !self.signal.as_ref().is_some_and(AbortSignal::is_aborted)
    }
}

/// What a handler sees while an event is being dispatched.
pub struct EventContext<'a> {
    /// The document, read-only for the duration of dispatch.
    pub doc: &'a Document,
    /// The event being dispatched.
    pub event: &'a DomEvent,
    /// The node whose listener is running.
    pub current_target: NodeId,
    default_prevented: &'a Cell<bool>,
    propagation_stopped: &'a Cell<bool>,
}

impl EventContext<'_> {
    /// The node the event was dispatched at.
    #[must_use]
    pub fn target(&self) -> NodeId {
        self.event.target
    }

    /// Mark the event's default action as cancelled.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Stop bubbling after the current node's listeners finish.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }
}

/// Result of [`Document::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOutcome {
    /// A handler called [`EventContext::prevent_default`].
    pub default_prevented: bool,
    /// Number of handlers that ran.
    pub handlers_run: usize,
}

/// An in-memory document tree.
pub struct Document {
    nodes: Vec<NodeData>,
    free: Vec<u32>,
    root: NodeId,
    body: NodeId,
    focused: Option<NodeId>,
    listeners: RefCell<Vec<Listener>>,
    next_listener: Cell<u64>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("free", &self.free.len())
            .field("focused", &self.focused)
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

impl Document {
    /// Create a document containing `<html><body></body></html>`.
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            body: NodeId {
                index: 0,
                generation: 0,
            },
            focused: None,
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(1),
        };
        let root = doc.create_element("html");
        let body = doc.create_element("body");
        doc.append_child(root, body);
        doc.root = root;
        doc.body = body;
        doc
    }

    /// Create a document whose body holds `content`.
    #[must_use]
    pub fn from_html(content: &Html) -> Self {
        let mut doc = Self::new();
        let body = doc.body;
        doc.append_html(body, content);
        doc
    }

    /// The `<html>` element.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// The `<body>` element.
    #[must_use]
    pub const fn body(&self) -> NodeId {
        self.body
    }

    // --- Construction -----------------------------------------------------

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        if let Some(index) = self.free.pop() {
            let data = &mut self.nodes[index as usize];
            data.kind = kind;
            return NodeId {
                index,
                generation: data.generation,
            };
        }
        let index = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
        self.nodes.push(NodeData {
            kind,
            generation: 0,
            parent: None,
            children: Vec::new(),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    /// Return `node` and its subtree to the free list and drop their
    /// listeners. The caller has already detached `node`.
    fn release(&mut self, node: NodeId) {
        let mut doomed = self.descendants(node);
        doomed.push(node);
        for id in &doomed {
            let data = &mut self.nodes[id.slot()];
            data.kind = NodeKind::Text(String::new());
            data.generation = data.generation.wrapping_add(1);
            data.parent = None;
            data.children = Vec::new();
            self.free.push(id.index);
        }
        if self.focused.is_some_and(|f| !self.exists(f)) {
            self.focused = None;
        }
        let nodes = &self.nodes;
        self.listeners.borrow_mut().retain(|l| {
            nodes
                .get(l.node.slot())
                .is_some_and(|n| n.generation == l.node.generation)
        });
    }

    /// Number of arena slots in use, connected or not.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Materialize a markup tree as detached nodes, returning the top-level
    /// nodes (fragments are flattened).
    pub fn build(&mut self, html: &Html) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.build_into(html, &mut out);
        out
    }

    fn build_into(&mut self, html: &Html, out: &mut Vec<NodeId>) {
        match html {
            Html::Element(e) => out.push(self.build_element(e)),
            Html::Text(t) => out.push(self.create_text(t)),
            Html::Fragment(items) => items.iter().for_each(|i| self.build_into(i, out)),
        }
    }

    fn build_element(&mut self, e: &Element) -> NodeId {
        let id = self.push(NodeKind::Element {
            tag: e.tag.clone(),
            attrs: e.attrs.clone(),
        });
        for child in &e.children {
            for c in self.build(child) {
                self.append_child(id, c);
            }
        }
        id
    }

    /// Append `html` under `parent`; returns the new top-level nodes.
    pub fn append_html(&mut self, parent: NodeId, html: &Html) -> Vec<NodeId> {
        let nodes = self.build(html);
        for &n in &nodes {
            self.append_child(parent, n);
        }
        nodes
    }

    /// Replace every child of `parent` with `html`.
    pub fn replace_children(&mut self, parent: NodeId, html: &Html) -> Vec<NodeId> {
        self.clear_children(parent);
        self.append_html(parent, html)
    }

    // --- Tree structure ---------------------------------------------------

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent. Returns `false` (and does nothing) if that would
    /// create a cycle or if `parent` is a text node.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.exists(parent) || !self.exists(child) || !self.is_element(parent) {
            return false;
        }
        if parent == child || self.contains(child, parent) {
            return false;
        }
        self.detach(child);
        self.nodes[child.slot()].parent = Some(parent);
        self.nodes[parent.slot()].children.push(child);
        true
    }

    /// Detach `node` from its parent. The subtree stays valid but
    /// disconnected.
    pub fn remove(&mut self, node: NodeId) {
        if !self.exists(node) || node == self.root {
            return;
        }
        self.detach(node);
        if self.focused.is_some_and(|f| !self.is_connected(f)) {
            self.focused = None;
        }
    }

    /// Detach `node` and release its subtree. Ids inside it go stale.
    pub fn delete(&mut self, node: NodeId) {
        if !self.exists(node) || node == self.root || node == self.body {
            return;
        }
        self.detach(node);
        self.release(node);
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.slot()].parent.take() {
            self.nodes[parent.slot()].children.retain(|&c| c != node);
        }
    }

    /// Remove and release every child of `node`.
    pub fn clear_children(&mut self, node: NodeId) {
        if !self.exists(node) {
            return;
        }
        let children = std::mem::take(&mut self.nodes[node.slot()].children);
        for c in children {
            self.nodes[c.slot()].parent = None;
            self.release(c);
        }
        if self.focused.is_some_and(|f| !self.is_connected(f)) {
            self.focused = None;
        }
    }

    fn data(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes
            .get(node.slot())
            .filter(|n| n.generation == node.generation)
    }

    fn data_mut(&mut self, node: NodeId) -> Option<&mut NodeData> {
        self.nodes
            .get_mut(node.slot())
            .filter(|n| n.generation == node.generation)
    }

    fn exists(&self, node: NodeId) -> bool {
        self.data(node).is_some()
    }

    /// Parent of `node`.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).and_then(|n| n.parent)
    }

    /// Children of `node`.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.data(node).map_or(&[], |n| n.children.as_slice())
    }

    /// Element children of `node`.
    #[must_use]
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
            .collect()
    }

    /// Whether `node` is reachable from the document root.
    #[must_use]
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.exists(node) && self.ancestors_inclusive(node).last() == Some(&self.root)
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.exists(node) && self.ancestors_inclusive(node).contains(&ancestor)
    }

    /// `node`, its parent, and so on up to the top of its tree.
    #[must_use]
    pub fn ancestors_inclusive(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = Some(node).filter(|&n| self.exists(n));
        while let Some(n) = cur {
            out.push(n);
            cur = self.parent(n);
        }
        out
    }

    /// All descendants of `node` in document order (excluding `node`).
    #[must_use]
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }

    // --- Element data -----------------------------------------------------

    /// Whether `node` is an element (as opposed to text).
    #[must_use]
    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(
            self.data(node).map(|n| &n.kind),
            Some(NodeKind::Element { .. })
        )
    }

    /// Tag name of an element.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match self.data(node).map(|n| &n.kind) {
            Some(NodeKind::Element { tag, .. }) => Some(tag.as_str()),
            _ => None,
        }
    }

    fn attrs(&self, node: NodeId) -> Option<&Vec<(String, String)>> {
        match self.data(node).map(|n| &n.kind) {
            Some(NodeKind::Element { attrs, .. }) => Some(attrs),
            _ => None,
        }
    }

    fn attrs_mut(&mut self, node: NodeId) -> Option<&mut Vec<(String, String)>> {
        match self.data_mut(node).map(|n| &mut n.kind) {
            Some(NodeKind::Element { attrs, .. }) => Some(attrs),
            _ => None,
        }
    }

    /// Attribute value.
    #[must_use]
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.attrs(node)?
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether an attribute is present.
    #[must_use]
    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.attr(node, name).is_some()
    }

    /// Set an attribute, replacing any existing value.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(attrs) = self.attrs_mut(node) {
            if let Some(slot) = attrs.iter_mut().find(|(n, _)| n == name) {
                slot.1 = value.to_string();
            } else {
                attrs.push((name.to_string(), value.to_string()));
            }
        }
    }

    /// Remove an attribute if present.
    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(attrs) = self.attrs_mut(node) {
            attrs.retain(|(n, _)| n != name);
        }
    }

    /// Whether the `class` attribute lists `class`.
    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attr(node, "class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    /// Add `class` to the class list.
    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if self.has_class(node, class) || !self.is_element(node) {
            return;
        }
        let next = match self.attr(node, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr(node, "class", &next);
    }

    /// Remove `class` from the class list.
    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        let Some(existing) = self.attr(node, "class") else {
            return;
        };
        let next: Vec<&str> = existing.split_whitespace().filter(|c| *c != class).collect();
        let next = next.join(" ");
        self.set_attr(node, "class", &next);
    }

    /// Add or remove `class` depending on `on`.
    pub fn set_class(&mut self, node: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    /// Current `value` of a form control.
    #[must_use]
    pub fn value(&self, node: NodeId) -> Option<&str> {
        self.attr(node, "value")
    }

    /// Set the `value` of a form control.
    pub fn set_value(&mut self, node: NodeId, value: &str) {
        self.set_attr(node, "value", value);
    }

    /// Concatenated text of `node` and its descendants.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        if let Some(NodeKind::Text(t)) = self.data(node).map(|n| &n.kind) {
            out.push_str(t);
            return out;
        }
        for n in self.descendants(node) {
            if let NodeKind::Text(t) = &self.nodes[n.slot()].kind {
                out.push_str(t);
            }
        }
        out
    }

    /// Replace the children of `node` with a single text node.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        if !self.is_element(node) {
            if let Some(NodeData {
                kind: NodeKind::Text(t),
                ..
            }) = self.data_mut(node)
            {
                *t = text.to_string();
            }
            return;
        }
        self.clear_children(node);
        let t = self.create_text(text);
        self.append_child(node, t);
    }

    // --- Lookup -----------------------------------------------------------

    /// First connected element with the given `id`.
    #[must_use]
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&n| self.attr(n, "id") == Some(id))
    }

    /// First descendant of `scope` matching `selector`.
    #[must_use]
    pub fn query(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&n| selector.matches(self, n))
    }

    /// All descendants of `scope` matching `selector`, in document order.
    #[must_use]
    pub fn query_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| selector.matches(self, n))
            .collect()
    }

    /// Nearest inclusive ancestor of `node` matching `selector`.
    #[must_use]
    pub fn closest(&self, node: NodeId, selector: &Selector) -> Option<NodeId> {
        self.ancestors_inclusive(node)
            .into_iter()
            .find(|&n| selector.matches(self, n))
    }

    // --- Focus ------------------------------------------------------------

    /// The focused element, if it is still connected.
    #[must_use]
    pub fn active_element(&self) -> Option<NodeId> {
        self.focused.filter(|&f| self.is_connected(f))
    }

    /// Move focus to `node`. Returns `false` if the node cannot take focus
    /// (disconnected, not focusable, hidden, or inside an inert subtree).
    pub fn focus(&mut self, node: NodeId) -> bool {
        if !self.is_connected(node)
            || !self.is_focusable(node)
            || self.is_hidden(node)
            || self.is_inert(node)
        {
            return false;
        }
        self.focused = Some(node);
        #[cfg(feature = "tracing")]
        tracing::trace!(node = %node, "document.focus");
        true
    }

    /// Drop focus.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Whether `node` can receive focus programmatically.
    #[must_use]
    pub fn is_focusable(&self, node: NodeId) -> bool {
        let Some(tag) = self.tag(node) else {
            return false;
        };
        if self.tab_index(node).is_some() {
            return !self.has_attr(node, "disabled");
        }
        match tag {
            "button" | "select" | "textarea" => !self.has_attr(node, "disabled"),
            "input" => !self.has_attr(node, "disabled") && self.attr(node, "type") != Some("hidden"),
            "a" | "area" => self.has_attr(node, "href"),
            _ => false,
        }
    }

    /// Parsed `tabindex`, if present and numeric.
    #[must_use]
    pub fn tab_index(&self, node: NodeId) -> Option<i32> {
        self.attr(node, "tabindex")?.trim().parse().ok()
    }

    /// Whether `node` participates in sequential (Tab) navigation.
    #[must_use]
    pub fn is_tabbable(&self, node: NodeId) -> bool {
        self.is_focusable(node)
            && self.tab_index(node).is_none_or(|t| t >= 0)
            && !self.is_hidden(node)
            && !self.is_inert(node)
    }

    /// Whether `node` or an ancestor is hidden (`hidden` attribute, `hidden`
    /// class, or inline `display: none`).
    #[must_use]
    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.ancestors_inclusive(node).into_iter().any(|n| {
            self.has_attr(n, "hidden")
                || self.has_class(n, "hidden")
                || self.attr(n, "style").is_some_and(|s| {
                    s.chars()
                        .filter(|c| !c.is_whitespace())
                        .collect::<String>()
                        .contains("display:none")
                })
        })
    }

    /// Whether `node` or an ancestor carries `inert`.
    #[must_use]
    pub fn is_inert(&self, node: NodeId) -> bool {
        self.ancestors_inclusive(node)
            .into_iter()
            .any(|n| self.has_attr(n, "inert"))
    }

    /// Tabbable descendants of `scope` in navigation order: positive
    /// `tabindex` values ascending, then everything else in document order.
    #[must_use]
    pub fn tabbables(&self, scope: NodeId) -> Vec<NodeId> {
        let all: Vec<NodeId> = self
            .descendants(scope)
            .into_iter()
            .filter(|&n| self.is_tabbable(n))
            .collect();
        let mut positive: Vec<(i32, NodeId)> = all
            .iter()
            .filter_map(|&n| self.tab_index(n).filter(|&t| t > 0).map(|t| (t, n)))
            .collect();
        positive.sort_by_key(|&(t, _)| t);
        let mut out: Vec<NodeId> = positive.into_iter().map(|(_, n)| n).collect();
        out.extend(
            all.into_iter()
                .filter(|&n| self.tab_index(n).is_none_or(|t| t == 0)),
        );
        out
    }

    // --- Events -----------------------------------------------------------

    /// Register `handler` for `kind` events reaching `node`. When `signal` is
    /// given, aborting it revokes the listener.
    pub fn add_event_listener(
        &self,
        node: NodeId,
        kind: EventKind,
        handler: Handler,
        signal: Option<AbortSignal>,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push(Listener {
            id,
            node,
            kind,
            handler,
            signal,
        });
        id
    }

    /// Unregister a listener. Unknown ids are ignored.
    pub fn remove_event_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|l| l.id != id);
    }

    /// Number of listeners that would still run (aborted ones excluded).
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().iter().filter(|l| l.is_live()).count()
    }

    /// Number of live listeners attached directly to `node`.
    #[must_use]
    pub fn listener_count_on(&self, node: NodeId) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|l| l.node == node && l.is_live())
            .count()
    }

    /// Dispatch `event` at its target and bubble it to the root.
    pub fn dispatch(&self, event: &DomEvent) -> DispatchOutcome {
        self.listeners.borrow_mut().retain(Listener::is_live);

        let prevented = Cell::new(false);
        let stopped = Cell::new(false);
        let mut handlers_run = 0;

        for node in self.ancestors_inclusive(event.target) {
            let matching: Vec<(Handler, Option<AbortSignal>)> = self
                .listeners
                .borrow()
                .iter()
                .filter(|l| l.node == node && l.kind == event.kind)
                .map(|l| (Rc::clone(&l.handler), l.signal.clone()))
                .collect();
            for (handler, signal) in matching {
                if signal.as_ref().is_some_and(AbortSignal::is_aborted) {
                    continue;
                }
                let ctx = EventContext {
                    doc: self,
                    event,
                    current_target: node,
                    default_prevented: &prevented,
                    propagation_stopped: &stopped,
                };
                handler(&ctx);
                handlers_run += 1;
            }
            if stopped.get() {
                break;
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            kind = ?event.kind,
            target = %event.target,
            handlers_run,
            "document.dispatch"
        );

        DispatchOutcome {
            default_prevented: prevented.get(),
            handlers_run,
        }
    }

    // --- Serialization ----------------------------------------------------

    /// Snapshot the subtree at `node` as a markup tree.
    #[must_use]
    pub fn to_html(&self, node: NodeId) -> Html {
        match self.data(node).map(|n| &n.kind) {
            Some(NodeKind::Element { tag, attrs }) => Html::Element(Element {
                tag: tag.clone(),
                attrs: attrs.clone(),
                children: self.children(node).iter().map(|&c| self.to_html(c)).collect(),
            }),
            Some(NodeKind::Text(t)) => Html::Text(t.clone()),
            None => Html::empty(),
        }
    }

    /// Serialized markup of `node` including its own tag.
    #[must_use]
    pub fn outer_html(&self, node: NodeId) -> String {
        self.to_html(node).to_string()
    }

    /// Serialized markup of the children of `node`.
    #[must_use]
    pub fn inner_html(&self, node: NodeId) -> String {
        self.children(node)
            .iter()
            .map(|&c| self.to_html(c).to_string())
            .collect()
    }
}
