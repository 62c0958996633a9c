#![forbid(unsafe_code)]

//! The Lather site: recipe builder, reference pages, and hash router.
//!
//! Page controllers in [`pages`] fetch content through
//! [`lather_content::ContentStore`], render it with [`render`], and react to
//! events dispatched into a [`lather_widgets::UiContext`]. [`app`] assembles
//! whole pages and [`cli`] exposes them as the `lather` binary.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod pages;
pub mod recipe;
pub mod render;
pub mod router;

pub use app::{Page, PageSession, Site, shell};
pub use cli::{Cli, Commands, run, run_from_env};
pub use config::SiteConfig;
pub use error::{Result, SiteError};
pub use recipe::{Amount, LockSet, RecipeEntry, RecipeState};
pub use router::{AlgorithmCategory, Route, Router};
