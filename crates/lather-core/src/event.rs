#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! Keyboard input arrives as [`KeyEvent`]; pointer and form interaction is
//! expressed as [`DomEvent`] values dispatched at a target node and bubbled
//! to its ancestors by [`Document::dispatch`](crate::dom::Document::dispatch).
//!
//! # Design Notes
//!
//! - Shift+Tab is reported as `Tab` with [`Modifiers::SHIFT`]; `BackTab` is
//!   accepted as a synonym by [`KeyEvent::is_back_tab`].
//! - `Modifiers` use bitflags for easy combination.

use bitflags::bitflags;

use crate::dom::NodeId;
use crate::geometry::Rect;

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check if Shift modifier is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Forward Tab (no Shift).
    #[must_use]
    pub const fn is_tab(&self) -> bool {
        matches!(self.code, KeyCode::Tab) && !self.shift()
    }

    /// Shift+Tab, or the dedicated back-tab code.
    #[must_use]
    pub const fn is_back_tab(&self) -> bool {
        matches!(self.code, KeyCode::BackTab) || (matches!(self.code, KeyCode::Tab) && self.shift())
    }

    /// Escape, regardless of modifiers.
    #[must_use]
    pub const fn is_escape(&self) -> bool {
        matches!(self.code, KeyCode::Escape)
    }
}

/// Key codes the view layer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),

    /// Enter/Return key.
    Enter,

    /// Escape key.
    Escape,

    /// Tab key.
    Tab,

    /// Shift+Tab (back-tab).
    BackTab,

    /// Space bar.
    Space,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// Kind of a dispatched document event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer activation.
    Click,
    /// Live edit of a form control's value.
    Input,
    /// Committed change of a form control's value.
    Change,
    /// Key press delivered to the focused element.
    KeyDown,
    /// Focus (or a resting pointer) arrived on the target.
    FocusIn,
    /// Focus (or the pointer) left the target.
    FocusOut,
}

/// An event dispatched at a node of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent {
    /// What happened.
    pub kind: EventKind,
    /// The node the event was dispatched at.
    pub target: NodeId,
    /// The control's value for `Input` / `Change`.
    pub value: Option<String>,
    /// The key for `KeyDown`.
    pub key: Option<KeyEvent>,
    /// Layout box of the target, reported with `FocusIn`.
    pub bounds: Option<Rect>,
}

impl DomEvent {
    /// A click on `target`.
    #[must_use]
    pub fn click(target: NodeId) -> Self {
        Self {
            kind: EventKind::Click,
            target,
            value: None,
            key: None,
            bounds: None,
        }
    }

    /// An input edit on `target` carrying the new value.
    #[must_use]
    pub fn input(target: NodeId, value: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Input,
            target,
            value: Some(value.into()),
            key: None,
            bounds: None,
        }
    }

    /// A committed change on `target` carrying the new value.
    #[must_use]
    pub fn change(target: NodeId, value: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Change,
            target,
            value: Some(value.into()),
            key: None,
            bounds: None,
        }
    }

    /// A key press delivered at `target`.
    #[must_use]
    pub fn key_down(target: NodeId, key: KeyEvent) -> Self {
        Self {
            kind: EventKind::KeyDown,
            target,
            value: None,
            key: Some(key),
            bounds: None,
        }
    }

    /// Focus arriving on `target`, laid out at `bounds`.
    #[must_use]
    pub fn focus_in(target: NodeId, bounds: Rect) -> Self {
        Self {
            kind: EventKind::FocusIn,
            target,
            value: None,
            key: None,
            bounds: Some(bounds),
        }
    }

    /// Focus leaving `target`.
    #[must_use]
    pub fn focus_out(target: NodeId) -> Self {
        Self {
            kind: EventKind::FocusOut,
            target,
            value: None,
            key: None,
            bounds: None,
        }
    }
}
