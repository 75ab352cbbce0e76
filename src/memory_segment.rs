use std::collections::HashMap;

use crate::disk_segment::DiskSegment;
use crate::error::Result;
use crate::posting::{DocId, Position, Posting, PostingList};

/// Packed bytes per posting header in the size estimate.
const POSTING_HEADER_BYTES: usize = 4;
/// Packed bytes per stored position.
const POSITION_BYTES: usize = 4;

/// In-memory half of the segmented index: a term -> PostingList map plus a
/// running estimate of the packed size of all postings. The estimate skips
/// term strings; it only drives the flush threshold.
#[derive(Debug, Default)]
pub struct MemorySegment {
    index: HashMap<String, PostingList>,
    size_bytes: usize,
}

impl MemorySegment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Estimated packed size in bytes of the buffered postings.
    /// Non-decreasing until `clear`.
    pub fn size(&self) -> usize {
        self.size_bytes
    }

    pub fn term_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Records that `term` occurred in `doc_id` at `position`.
    pub fn add_token(&mut self, term: &str, doc_id: &str, position: Position) {
        self.index
            .entry(term.to_owned())
            .or_default()
            .add_posting(Posting::new(doc_id, vec![position]));
        self.size_bytes += POSTING_HEADER_BYTES + POSITION_BYTES;
    }

    /// Inserts or merges a whole posting under `term`.
    pub fn add_posting(&mut self, term: &str, posting: Posting) {
        self.size_bytes += POSTING_HEADER_BYTES + POSITION_BYTES * posting.positions().len();
        self.index.entry(term.to_owned()).or_default().add_posting(posting);
    }

    /// Doc ids containing `term`, ascending. Unknown terms yield an empty
    /// result without creating an entry.
    pub fn one_word_query(&self, term: &str) -> Vec<DocId> {
        self.index.get(term).map(PostingList::doc_ids).unwrap_or_default()
    }

    /// Doc ids where the exact phrase occurs, ascending. Terms absent from
    /// the segment contribute empty posting lists.
    pub fn phrase_query(&self, terms: &[String]) -> Vec<DocId> {
        let empty = PostingList::new();
        let lists: Vec<&PostingList> = terms
            .iter()
            .map(|term| self.index.get(term).unwrap_or(&empty))
            .collect();
        PostingList::find_phrases(lists).doc_ids()
    }

    /// Merges every buffered posting list into the disk segment. Term order
    /// is irrelevant; the per-term merge is idempotent, so a retry after a
    /// mid-way failure is safe as long as this segment is not cleared.
    pub fn merge_into_disk(&self, disk: &DiskSegment) -> Result<()> {
        for (term, posting_list) in &self.index {
            disk.merge_posting_list(term, posting_list)?;
        }
        Ok(())
    }

    /// Drops all buffered postings and resets the size estimate.
    pub fn clear(&mut self) {
        self.index = HashMap::new();
        self.size_bytes = 0;
    }
}
