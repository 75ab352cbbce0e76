use std::collections::BTreeSet;

use serde::Serialize;

use crate::analyzer::{StopWordTokenFilter, TextAnalyzer};
use crate::config::IndexConfig;
use crate::disk_segment::DiskSegment;
use crate::docstore::DocumentStore;
use crate::error::{Error, Result};
use crate::memory_segment::MemorySegment;
use crate::posting::{DocId, Position};

/// Longest snippet rendered into query results, in characters.
const SNIPPET_CHARS: usize = 160;

/// The results of a query: three parallel lists, one entry per matching
/// document. Ordering is the ascending-doc-id union order; callers should
/// rely on set membership only.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Results {
    pub doc_ids: Vec<DocId>,
    pub doc_titles: Vec<String>,
    pub snippets: Vec<String>,
}

impl Results {
    pub fn len(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_ids.is_empty()
    }
}

/// Global index: a durable main segment on disk plus an auxiliary segment
/// in memory, a document store for result assembly, and the analyzer both
/// ingestion and queries share. Single-threaded; one instance owns its
/// files exclusively.
pub struct Index {
    analyzer: TextAnalyzer,
    docstore: DocumentStore,
    memory: MemorySegment,
    disk: DiskSegment,
    memory_limit_bytes: usize,
}

impl Index {
    /// Opens (or creates) the index files named by the config.
    pub fn open(config: IndexConfig) -> Result<Self> {
        if config.memory_limit_bytes == 0 {
            return Err(Error::InvalidArgument(
                "memory_limit_bytes must be positive".into(),
            ));
        }
        let stop_words = match &config.stopwords_path {
            Some(path) => StopWordTokenFilter::from_file(path)?,
            None => StopWordTokenFilter::english(),
        };
        let analyzer = TextAnalyzer::standard(stop_words);
        let disk = DiskSegment::open(&config.index_path)?;
        let docstore = DocumentStore::open(&config.docstore_path)?;
        log::info!(
            "opened index at {} (docstore at {}, memory limit {} bytes)",
            config.index_path.display(),
            config.docstore_path.display(),
            config.memory_limit_bytes
        );
        Ok(Self {
            analyzer,
            docstore,
            memory: MemorySegment::new(),
            disk,
            memory_limit_bytes: config.memory_limit_bytes,
        })
    }

    /// Stores the document and buffers its tokens in the memory segment.
    /// Positions run over the analyzed concatenation of title and body,
    /// consecutively from 0. When the buffered size estimate reaches the
    /// configured limit, the memory segment is flushed to disk.
    ///
    /// Re-adding a doc id overwrites the stored document and folds the new
    /// positions into the already-buffered postings.
    pub fn add_document(&mut self, doc_id: &str, title: &str, body: &str) -> Result<()> {
        self.docstore.add_document(doc_id, title, body)?;

        let text = format!("{title} {body}");
        for (position, term) in self.analyzer.analyze(&text).into_iter().enumerate() {
            self.memory.add_token(&term, doc_id, position as Position);
        }

        if self.memory.size() >= self.memory_limit_bytes {
            log::info!(
                "memory segment reached {} bytes ({} terms), flushing",
                self.memory.size(),
                self.memory.term_count()
            );
            self.save()?;
        }
        Ok(())
    }

    /// Documents containing any of the given terms.
    pub fn free_text_query(&self, terms: &[&str]) -> Result<Results> {
        let mut doc_ids = BTreeSet::new();
        for term in terms {
            let term = self.analyzer.normalize(term);
            if term.is_empty() {
                continue;
            }
            doc_ids.extend(self.memory.one_word_query(&term));
            doc_ids.extend(self.disk.one_word_query(&term)?);
        }
        self.build_results(doc_ids)
    }

    /// Documents where the given terms occur as an exact phrase, in both
    /// halves of the index. An empty phrase matches nothing.
    pub fn phrase_query(&self, terms: &[&str]) -> Result<Results> {
        let terms: Vec<String> = terms
            .iter()
            .map(|term| self.analyzer.normalize(term))
            .filter(|term| !term.is_empty())
            .collect();
        if terms.is_empty() {
            return Ok(Results::default());
        }

        let mut doc_ids = BTreeSet::new();
        doc_ids.extend(self.memory.phrase_query(&terms));
        doc_ids.extend(self.disk.phrase_query(&terms)?);
        self.build_results(doc_ids)
    }

    /// Merges the memory segment into the disk segment and clears it.
    /// Best-effort: on failure the memory segment is left intact so a
    /// retry can complete the merge.
    pub fn save(&mut self) -> Result<()> {
        let terms = self.memory.term_count();
        self.memory.merge_into_disk(&self.disk)?;
        self.memory.clear();
        if terms > 0 {
            log::info!("flushed {terms} terms to disk");
        }
        Ok(())
    }

    /// Flushes pending postings and releases the index files.
    pub fn close(mut self) -> Result<()> {
        self.save()
    }

    pub fn memory(&self) -> &MemorySegment {
        &self.memory
    }

    pub fn disk(&self) -> &DiskSegment {
        &self.disk
    }

    pub fn docstore(&self) -> &DocumentStore {
        &self.docstore
    }

    fn build_results(&self, doc_ids: BTreeSet<DocId>) -> Result<Results> {
        let mut results = Results::default();
        for doc_id in doc_ids {
            let document = match self.docstore.get_document(&doc_id) {
                Ok(document) => document,
                Err(Error::UnknownDocument(_)) => {
                    log::warn!("doc {doc_id:?} surfaced by the index but missing from the docstore");
                    continue;
                }
                Err(err) => return Err(err),
            };
            results.doc_ids.push(doc_id);
            results.doc_titles.push(document.title);
            results.snippets.push(snippet(&document.body));
        }
        Ok(results)
    }
}

fn snippet(body: &str) -> String {
    let mut out: String = body.chars().take(SNIPPET_CHARS).collect();
    if out.len() < body.len() {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_truncates_on_char_boundary() {
        let body = "é".repeat(200);
        let s = snippet(&body);
        assert!(s.starts_with('é'));
        assert_eq!(s.chars().count(), SNIPPET_CHARS + 3);
        assert!(s.ends_with("..."));
    }

    #[test]
    fn test_snippet_short_body_untouched() {
        assert_eq!(snippet("winter is coming"), "winter is coming");
    }
}
