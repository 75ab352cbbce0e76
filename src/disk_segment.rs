use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};

use crate::error::{Error, Result};
use crate::posting::{DocId, PostingList};

const POSTINGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("postings");

/// Persistent half of the segmented index: a term -> PostingList map backed
/// by a single-file key-value store. Values are bincode-encoded posting
/// lists; `merge_posting_list` is the only mutation path.
pub struct DiskSegment {
    db: Database,
}

impl DiskSegment {
    /// Opens the store at the given path, creating it if necessary.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Database::create(path)?;
        // make sure the table exists so read transactions never miss it
        let txn = db.begin_write()?;
        txn.open_table(POSTINGS_TABLE)?;
        txn.commit()?;
        Ok(Self { db })
    }

    pub fn has(&self, term: &str) -> Result<bool> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(POSTINGS_TABLE)?;
        Ok(table.get(term)?.is_some())
    }

    /// All indexed terms, in key order.
    pub fn keys(&self) -> Result<Vec<String>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(POSTINGS_TABLE)?;
        let mut keys = Vec::new();
        for entry in table.iter()? {
            let (term, _) = entry?;
            keys.push(term.value().to_owned());
        }
        Ok(keys)
    }

    /// Decodes the stored posting list for `term`, or None if the term has
    /// never been merged in.
    pub fn posting_list(&self, term: &str) -> Result<Option<PostingList>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(POSTINGS_TABLE)?;
        match table.get(term)? {
            Some(raw) => Ok(Some(decode_posting_list(term, raw.value())?)),
            None => Ok(None),
        }
    }

    /// Doc ids containing `term`, ascending. Unknown terms yield an empty
    /// result.
    pub fn one_word_query(&self, term: &str) -> Result<Vec<DocId>> {
        Ok(self
            .posting_list(term)?
            .map(|pl| pl.doc_ids())
            .unwrap_or_default())
    }

    /// Doc ids where the exact phrase occurs, ascending. Terms absent from
    /// the store contribute empty posting lists.
    pub fn phrase_query(&self, terms: &[String]) -> Result<Vec<DocId>> {
        let mut lists = Vec::with_capacity(terms.len());
        for term in terms {
            lists.push(self.posting_list(term)?.unwrap_or_default());
        }
        Ok(PostingList::find_phrases(&lists).doc_ids())
    }

    /// Merges the incoming posting list into whatever is already stored
    /// under `term`. Merging the same list twice is idempotent.
    pub fn merge_posting_list(&self, term: &str, incoming: &PostingList) -> Result<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(POSTINGS_TABLE)?;
            let existing = match table.get(term)? {
                Some(raw) => Some(decode_posting_list(term, raw.value())?),
                None => None,
            };
            let merged = match existing {
                Some(current) => PostingList::merge_lists(&current, incoming),
                None => incoming.clone(),
            };
            let encoded = encode_posting_list(term, &merged)?;
            table.insert(term, encoded.as_slice())?;
        }
        txn.commit()?;
        log::debug!("merged posting list for term {term:?}");
        Ok(())
    }
}

fn encode_posting_list(term: &str, posting_list: &PostingList) -> Result<Vec<u8>> {
    bincode::serialize(posting_list).map_err(|err| Error::Encode {
        key: term.to_owned(),
        reason: err.to_string(),
    })
}

fn decode_posting_list(term: &str, raw: &[u8]) -> Result<PostingList> {
    bincode::deserialize(raw).map_err(|err| Error::Corruption {
        key: term.to_owned(),
        reason: err.to_string(),
    })
}
