#![forbid(unsafe_code)]

//! Interactive building blocks for Lather pages.
//!
//! Every widget renders into, and reacts to, a [`lather_core::Document`].
//! State that a browser script would keep in module globals (the open panel,
//! the toast container, the active tooltip) lives in the managers owned by a
//! [`context::UiContext`], so independent contexts never interfere.

pub mod context;
pub mod helpers;
pub mod item_row;
pub mod panel;
pub mod toast;
pub mod tooltip;

pub use context::{KeyOutcome, Outbox, UiConfig, UiContext, UiTask};
pub use item_row::{
    ItemCategory, LockableField, PercentageMode, RowCallbacks, RowDescriptor, RowOptions,
    attach_row_event_handlers, attach_row_event_handlers_with_signal, render_item_row,
    update_row_warning,
};
pub use panel::{PanelManager, PanelOptions};
pub use toast::{ToastId, ToastKind, ToastManager};
pub use tooltip::{TooltipManager, TooltipPlacement};
