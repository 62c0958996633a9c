//! Cross-link checks over every content database.
//!
//! A `related` slug must name an entry in the same database or in the
//! glossary; a `references` id must name an entry in `sources.json`. Files
//! that cannot be loaded are reported rather than aborting the check.

use std::fmt;

use crate::error::ContentError;
use crate::fetch::{ContentFetcher, ContentStore};
use crate::files::ContentFile;
use crate::model::{Article, ContentDb, SourceDb};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkIssueKind {
    /// `related` names a slug that does not exist.
    DanglingRelated(String),
    /// `references` names a source that does not exist.
    UnresolvedReference(String),
    /// The file could not be fetched or parsed.
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkIssue {
    pub file: ContentFile,
    /// Entry the issue was found in; `None` for file-level problems.
    pub slug: Option<String>,
    pub kind: LinkIssueKind,
}

impl fmt::Display for LinkIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.slug, &self.kind) {
            (Some(slug), LinkIssueKind::DanglingRelated(target)) => {
                write!(f, "{}: {slug}: related entry '{target}' does not exist", self.file)
            }
            (Some(slug), LinkIssueKind::UnresolvedReference(id)) => {
                write!(f, "{}: {slug}: reference '{id}' is not in sources.json", self.file)
            }
            (_, LinkIssueKind::Unreadable(reason)) => write!(f, "{}: {reason}", self.file),
            (None, kind) => write!(f, "{}: {kind:?}", self.file),
        }
    }
}

/// Check every database reachable through `store`.
pub fn validate_links<F: ContentFetcher>(store: &ContentStore<F>) -> Vec<LinkIssue> {
    let mut issues = Vec::new();

    let sources: Option<SourceDb> = store
        .sources()
        .map_err(|e| issues.push(unreadable(ContentFile::Sources, &e)))
        .ok();
    let glossary: Option<ContentDb> = store.articles(ContentFile::Glossary).ok();

    for file in ContentFile::ALL {
        if file == ContentFile::Sources {
            continue;
        }
        let checked = if file.is_ingredient_db() {
            store.ingredients(file).map(|db| {
                let slugs: Vec<&str> = db.iter().map(|(s, _)| s).collect();
                check(file, db.iter(), &slugs, glossary.as_ref(), sources.as_ref())
            })
        } else {
            store.articles(file).map(|db| {
                let slugs: Vec<&str> = db.iter().map(|(s, _)| s).collect();
                check(file, db.iter(), &slugs, glossary.as_ref(), sources.as_ref())
            })
        };
        match checked {
            Ok(found) => issues.extend(found),
            Err(error) => issues.push(unreadable(file, &error)),
        }
    }

    tracing::debug!(issues = issues.len(), "content links checked");
    issues
}

fn unreadable(file: ContentFile, error: &ContentError) -> LinkIssue {
    LinkIssue {
        file,
        slug: None,
        kind: LinkIssueKind::Unreadable(error.to_string()),
    }
}

fn check<'a, A: Article + 'a>(
    file: ContentFile,
    records: impl Iterator<Item = (&'a str, &'a A)>,
    own_slugs: &[&str],
    glossary: Option<&ContentDb>,
    sources: Option<&SourceDb>,
) -> Vec<LinkIssue> {
    let mut out = Vec::new();
    for (slug, record) in records {
        for target in record.related() {
            let known = own_slugs.contains(&target.as_str())
                || glossary.is_some_and(|g| g.contains(target));
            if !known {
                out.push(LinkIssue {
                    file,
                    slug: Some(slug.to_string()),
                    kind: LinkIssueKind::DanglingRelated(target.clone()),
                });
            }
        }
        // references stay unchecked without sources.json
        let Some(sources) = sources else {
            continue;
        };
        for id in record.references() {
            if !sources.contains(id) {
                out.push(LinkIssue {
                    file,
                    slug: Some(slug.to_string()),
                    kind: LinkIssueKind::UnresolvedReference(id.clone()),
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;

    fn store() -> ContentStore<MemoryFetcher> {
        let mut fetcher = MemoryFetcher::new()
            .with(
                ContentFile::Glossary,
                r#"{
                    "trace": {"term": "Trace", "related": ["saponification"], "references": ["cavitch"]},
                    "saponification": {"term": "Saponification", "related": ["lye-water"]}
                }"#,
            )
            .with(
                ContentFile::Fats,
                r#"{"olive-oil": {"name": "Olive Oil", "related": ["trace", "castile"], "references": ["nope"]}}"#,
            )
            .with(ContentFile::Sources, r#"{"cavitch": {"title": "The Soapmaker's Companion"}}"#);
        for file in ContentFile::ALL {
            if !matches!(file, ContentFile::Glossary | ContentFile::Fats | ContentFile::Sources) {
                fetcher.insert(file, "{}");
            }
        }
        ContentStore::new(fetcher)
    }

    #[test]
    fn reports_dangling_related_and_unknown_references() {
        let issues = validate_links(&store());
        let rendered: Vec<String> = issues.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "glossary.json: saponification: related entry 'lye-water' does not exist",
                "fats.json: olive-oil: related entry 'castile' does not exist",
                "fats.json: olive-oil: reference 'nope' is not in sources.json",
            ]
        );
    }

    #[test]
    fn unreadable_files_are_reported_not_fatal() {
        let store = ContentStore::new(
            MemoryFetcher::new().with(ContentFile::Glossary, r#"{"trace": {"references": ["x"]}}"#),
        );
        let issues = validate_links(&store);
        assert!(issues.iter().any(|i| i.file == ContentFile::Sources
            && matches!(i.kind, LinkIssueKind::Unreadable(_))));
        assert!(!issues
            .iter()
            .any(|i| matches!(i.kind, LinkIssueKind::UnresolvedReference(_))));
        // every file but glossary is missing
        let unreadable = issues
            .iter()
            .filter(|i| matches!(i.kind, LinkIssueKind::Unreadable(_)))
            .count();
        assert_eq!(unreadable, ContentFile::ALL.len() - 1);
    }
}
