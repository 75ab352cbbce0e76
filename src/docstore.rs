use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::posting::DocId;

const DOCUMENTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("documents");

/// A document as stored: title plus verbatim body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub title: String,
    pub body: String,
}

/// Persistent doc_id -> (title, body) store used to materialize result
/// titles and snippets. Re-adding a doc id overwrites the previous entry.
pub struct DocumentStore {
    db: Database,
}

impl DocumentStore {
    /// Opens the store at the given path, creating it if necessary.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Database::create(path)?;
        let txn = db.begin_write()?;
        txn.open_table(DOCUMENTS_TABLE)?;
        txn.commit()?;
        Ok(Self { db })
    }

    pub fn has_key(&self, doc_id: &str) -> Result<bool> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(DOCUMENTS_TABLE)?;
        Ok(table.get(doc_id)?.is_some())
    }

    /// All stored doc ids, in key order.
    pub fn keys(&self) -> Result<Vec<DocId>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(DOCUMENTS_TABLE)?;
        let mut keys = Vec::new();
        for entry in table.iter()? {
            let (doc_id, _) = entry?;
            keys.push(doc_id.value().to_owned());
        }
        Ok(keys)
    }

    pub fn add_document(&self, doc_id: &str, title: &str, body: &str) -> Result<()> {
        let document = StoredDocument {
            title: title.to_owned(),
            body: body.to_owned(),
        };
        let encoded = bincode::serialize(&document).map_err(|err| Error::Encode {
            key: doc_id.to_owned(),
            reason: err.to_string(),
        })?;
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(DOCUMENTS_TABLE)?;
            table.insert(doc_id, encoded.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Looks up a document, failing with `UnknownDocument` if it was never
    /// stored.
    pub fn get_document(&self, doc_id: &str) -> Result<StoredDocument> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(DOCUMENTS_TABLE)?;
        match table.get(doc_id)? {
            Some(raw) => bincode::deserialize(raw.value()).map_err(|err| Error::Corruption {
                key: doc_id.to_owned(),
                reason: err.to_string(),
            }),
            None => Err(Error::UnknownDocument(doc_id.to_owned())),
        }
    }
}
