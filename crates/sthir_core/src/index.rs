//! A set of bundles with the metadata needed to ship it as one file.
//!
//! File format (JSON):
//!   { "version": 1, "generated_at": "<RFC 3339>", "documents": [ <bundle tuple>, ... ] }
//!
//! `documents` is exactly the literal embedded in search artifacts; see `to_literal`.

use std::fs;
use std::io::Write;
use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::bundle::FilterBundle;
use crate::config::BuildConfig;
use crate::consts::INDEX_VERSION;
use crate::errors::{Result, SthirError};
use crate::query::{parse_query, rank, Hit};
use crate::tokens::TokenCounts;

/// Tokenizer output for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub tokens: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchIndex {
    pub version: u32,
    pub generated_at: String,
    pub documents: Vec<FilterBundle>,
}

impl SearchIndex {
    pub fn new(documents: Vec<FilterBundle>) -> Result<Self> {
        Ok(Self {
            version: INDEX_VERSION,
            generated_at: OffsetDateTime::now_utc().format(&Rfc3339)?,
            documents,
        })
    }

    /// Builds one bundle per document in parallel; output order follows input order.
    pub fn build(docs: &[SourceDocument], cfg: &BuildConfig) -> Result<Self> {
        cfg.validate()?;
        let documents = docs
            .par_iter()
            .map(|d| {
                let counts = TokenCounts::from_tokens(&d.tokens);
                FilterBundle::build(d.id.as_str(), d.title.as_str(), &counts, cfg).inspect_err(|e| {
                    tracing::warn!(document = %d.id, error = %e, "bundle build failed");
                })
            })
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(documents = documents.len(), chunk_size = cfg.chunk_size, "index built");
        Self::new(documents)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let idx: SearchIndex = serde_json::from_str(&s)?;
        if idx.version != INDEX_VERSION {
            return Err(SthirError::UnsupportedVersion(idx.version));
        }
        for b in &idx.documents {
            b.validate()?;
        }
        Ok(idx)
    }

    /// Write to a temp file beside `path`, then rename over it.
    pub fn save_atomic(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(d) if !d.as_os_str().is_empty() => d,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::Builder::new().prefix(".sthir_idx_").tempfile_in(dir)?;
        tmp.as_file_mut().write_all(serde_json::to_string_pretty(self)?.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(path)?;
        Ok(())
    }

    /// The bare tuple array, ready to embed verbatim in a page.
    pub fn to_literal(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.documents)?)
    }

    pub fn search(&self, query: &str) -> Result<Vec<Hit>> {
        rank(&self.documents, &parse_query(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, text: &str) -> SourceDocument {
        SourceDocument {
            id: id.into(),
            title: format!("Title {id}"),
            tokens: text.split_whitespace().map(String::from).collect(),
        }
    }

    #[test]
    fn build_keeps_input_order() {
        let docs: Vec<_> = (0..20).map(|i| doc(&format!("d{i}"), "alpha beta gamma")).collect();
        let idx = SearchIndex::build(&docs, &BuildConfig::default()).unwrap();
        let ids: Vec<_> = idx.documents.iter().map(|b| b.document_id.clone()).collect();
        let want: Vec<_> = (0..20).map(|i| format!("d{i}")).collect();
        assert_eq!(ids, want);
        assert_eq!(idx.version, INDEX_VERSION);
    }

    #[test]
    fn empty_document_aborts_build() {
        let docs = vec![doc("ok", "words here"), doc("empty", "")];
        assert!(matches!(
            SearchIndex::build(&docs, &BuildConfig::default()),
            Err(SthirError::EmptyDocument)
        ));
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("index.json");
        let idx = SearchIndex::build(&[doc("a", "sun moon sun")], &BuildConfig::default()).unwrap();
        idx.save_atomic(&p).unwrap();
        let back = SearchIndex::load(&p).unwrap();
        assert_eq!(back.documents, idx.documents);
        assert!(back.search("SUN").unwrap()[0].score >= 2);
    }

    #[test]
    fn load_rejects_wrong_version_and_corrupt_bundles() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("index.json");

        let mut idx = SearchIndex::build(&[doc("a", "x y z")], &BuildConfig::default()).unwrap();
        idx.version = 9;
        idx.save_atomic(&p).unwrap();
        assert!(matches!(SearchIndex::load(&p), Err(SthirError::UnsupportedVersion(9))));

        idx.version = INDEX_VERSION;
        idx.documents[0].m += 1;
        idx.save_atomic(&p).unwrap();
        assert!(matches!(SearchIndex::load(&p), Err(SthirError::BundleMismatch { .. })));
    }

    #[test]
    fn literal_is_tuple_array() {
        let idx = SearchIndex::build(&[doc("a", "one two")], &BuildConfig::default()).unwrap();
        let lit = idx.to_literal().unwrap();
        let v: serde_json::Value = serde_json::from_str(&lit).unwrap();
        assert_eq!(v.as_array().unwrap()[0].as_array().unwrap().len(), 7);
    }
}
