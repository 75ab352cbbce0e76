use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

/// Flush threshold used when none is configured.
pub const DEFAULT_MEMORY_LIMIT_BYTES: usize = 500_000_000;

/// Environment-backed configuration for the CLI binary.
pub static CONFIG: Lazy<IndexConfig> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    let mut config = IndexConfig::new(
        get_env_or_default("SIFT_INDEX_PATH", "sift.index"),
        get_env_or_default("SIFT_DOCSTORE_PATH", "sift_docs.db"),
    );
    if let Ok(limit) = env::var("SIFT_MEMORY_LIMIT_BYTES") {
        config.memory_limit_bytes = limit
            .parse()
            .unwrap_or_else(|_| panic!("SIFT_MEMORY_LIMIT_BYTES must be an integer: {limit}"));
    }
    if let Ok(path) = env::var("SIFT_STOPWORDS_PATH") {
        config.stopwords_path = Some(PathBuf::from(path));
    }
    config
});

#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// File backing the disk segment.
    pub index_path: PathBuf,
    /// File backing the document store.
    pub docstore_path: PathBuf,
    /// Memory-segment size estimate at which a flush is triggered.
    pub memory_limit_bytes: usize,
    /// Newline-delimited stop-word file; the built-in English list is used
    /// when unset.
    pub stopwords_path: Option<PathBuf>,
}

impl IndexConfig {
    pub fn new(index_path: impl Into<PathBuf>, docstore_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
            docstore_path: docstore_path.into(),
            memory_limit_bytes: DEFAULT_MEMORY_LIMIT_BYTES,
            stopwords_path: None,
        }
    }

    pub fn with_memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit_bytes = bytes;
        self
    }

    pub fn with_stopwords(mut self, path: impl Into<PathBuf>) -> Self {
        self.stopwords_path = Some(path.into());
        self
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
