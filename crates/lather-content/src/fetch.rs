//! Loading content files.
//!
//! A [`ContentFetcher`] returns the raw text of one file. [`ContentStore`]
//! wraps a fetcher, fetches each file at most once, and parses it into the
//! typed database for that file. A failed fetch is not cached, so a later
//! page load tries again.

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use ahash::AHashMap;
use serde::de::DeserializeOwned;

use crate::error::{ContentError, Result};
use crate::files::ContentFile;
use crate::model::{ContentDb, IngredientDb, SourceDb};

/// Source of raw content text.
pub trait ContentFetcher {
    fn fetch(&self, file: ContentFile) -> Result<String>;
}

/// Reads files from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ContentFetcher for DirFetcher {
    fn fetch(&self, file: ContentFile) -> Result<String> {
        let path = self.root.join(file.file_name());
        fs::read_to_string(&path).map_err(|source| ContentError::Io { path, source })
    }
}

/// Serves files from memory. Files never inserted are [`ContentError::Missing`].
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    files: AHashMap<ContentFile, String>,
}

impl MemoryFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, file: ContentFile, text: impl Into<String>) -> Self {
        self.insert(file, text);
        self
    }

    pub fn insert(&mut self, file: ContentFile, text: impl Into<String>) {
        self.files.insert(file, text.into());
    }
}

impl ContentFetcher for MemoryFetcher {
    fn fetch(&self, file: ContentFile) -> Result<String> {
        self.files
            .get(&file)
            .cloned()
            .ok_or(ContentError::Missing { file })
    }
}

/// Parse `text` as the database stored in `file`.
pub fn parse<T: DeserializeOwned>(file: ContentFile, text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|source| ContentError::Json { file, source })
}

/// Caching front for a fetcher.
pub struct ContentStore<F> {
    fetcher: F,
    cache: RefCell<AHashMap<ContentFile, Rc<str>>>,
    fetches: Cell<usize>,
}

impl<F: ContentFetcher> ContentStore<F> {
    #[must_use]
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            cache: RefCell::new(AHashMap::new()),
            fetches: Cell::new(0),
        }
    }

    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Number of calls made to the underlying fetcher.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }

    /// Raw text of `file`, fetched on first use.
    pub fn text(&self, file: ContentFile) -> Result<Rc<str>> {
        if let Some(text) = self.cache.borrow().get(&file) {
            return Ok(Rc::clone(text));
        }
        self.fetches.set(self.fetches.get() + 1);
        let text: Rc<str> = match self.fetcher.fetch(file) {
            Ok(text) => text.into(),
            Err(error) => {
                tracing::warn!(file = %file, %error, "content fetch failed");
                return Err(error);
            }
        };
        tracing::debug!(file = %file, bytes = text.len(), "content fetched");
        self.cache.borrow_mut().insert(file, Rc::clone(&text));
        Ok(text)
    }

    /// Fetch and parse `file` into `T`.
    pub fn load<T: DeserializeOwned>(&self, file: ContentFile) -> Result<T> {
        let text = self.text(file)?;
        parse(file, &text).inspect_err(|error| {
            tracing::warn!(file = %file, %error, "content parse failed");
        })
    }

    pub fn articles(&self, file: ContentFile) -> Result<ContentDb> {
        self.load(file)
    }

    pub fn ingredients(&self, file: ContentFile) -> Result<IngredientDb> {
        self.load(file)
    }

    pub fn sources(&self) -> Result<SourceDb> {
        self.load(ContentFile::Sources)
    }
}

impl<F> std::fmt::Debug for ContentStore<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStore")
            .field("cached", &self.cache.borrow().len())
            .field("fetches", &self.fetches.get())
            .finish()
    }
}
