#![forbid(unsafe_code)]

//! Static content for the Lather site.
//!
//! Every page is driven by one or more JSON databases mapping a slug to a
//! record. This crate names those files ([`ContentFile`]), models their
//! records ([`ContentEntry`], [`IngredientRecord`], [`Source`]), fetches them
//! through a pluggable [`ContentFetcher`], and checks their cross-links.

pub mod error;
pub mod fetch;
pub mod files;
pub mod model;
pub mod validate;

pub use error::{ContentError, Result};
pub use fetch::{ContentFetcher, ContentStore, DirFetcher, MemoryFetcher};
pub use files::ContentFile;
pub use model::{
    Article, ContentDb, ContentEntry, Details, IngredientDb, IngredientRecord, Source, SourceDb,
    Usage, filter_sorted,
};
pub use validate::{LinkIssue, LinkIssueKind, validate_links};
