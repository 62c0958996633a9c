#![forbid(unsafe_code)]

//! Core: headless document, typed markup, input events, and scheduling.
//!
//! # Role in Lather
//! `lather-core` is the stand-in for the browser. It owns the [`dom::Document`]
//! tree that widgets mutate, the [`html::Html`] node trees that render
//! functions return, the canonical key events, abort signals for listener
//! lifetimes, and the deterministic frame/timer [`clock::Scheduler`].
//!
//! # How it fits in the system
//! `lather-widgets` builds rows, panels, toasts, and tooltips on top of these
//! primitives; `lather-site` drives them from page controllers. Nothing here
//! knows about soap, recipes, or content files.

pub mod abort;
pub mod clock;
pub mod dom;
pub mod event;
pub mod geometry;
pub mod html;
pub mod selector;

pub use abort::{AbortController, AbortSignal};
pub use dom::{Document, NodeId};
pub use html::{Element, Html, el};
