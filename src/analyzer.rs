use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use porter_stemmer::stem;

use crate::error::{Error, Result};

static DEFAULT_STOP_WORDS: OnceLock<HashSet<String>> = OnceLock::new();

fn default_stop_words() -> &'static HashSet<String> {
    DEFAULT_STOP_WORDS.get_or_init(|| {
        stop_words::get(stop_words::LANGUAGE::English)
            .into_iter()
            .map(|x| x.to_string())
            .collect()
    })
}

/// A character filter receives the original text as a stream of characters and can transform the stream by adding,
/// removing, or changing characters. For instance, a character filter could be used to convert Hindu-Arabic
/// numerals (٠‎١٢٣٤٥٦٧٨‎٩‎) into their Arabic-Latin equivalents (0123456789), or to strip punctuation from the stream.
pub trait CharacterFilter: Send + Sync {
    fn filter(&self, text: String) -> String;
}

/// Replaces every character outside [A-Za-z0-9] with a space, so that
/// punctuation and markup never glue two terms together.
#[derive(Debug, Default)]
pub struct AlphanumericFilter;

impl CharacterFilter for AlphanumericFilter {
    fn filter(&self, text: String) -> String {
        text.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
            .collect()
    }
}

/// A tokenizer receives a stream of characters, breaks it up into individual tokens (usually individual words),
/// and outputs a stream of tokens.
/// For instance, a whitespace tokenizer breaks text into tokens whenever it sees any whitespace.
/// It would convert the text "Quick brown fox!" into the terms [Quick, brown, fox!].
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: String) -> Vec<String>;
}

pub struct WhiteSpaceTokenizer;

impl Tokenizer for WhiteSpaceTokenizer {
    fn tokenize(&self, text: String) -> Vec<String> {
        text.split_whitespace()
            .map(|w| w.to_string())
            .collect::<Vec<String>>()
    }
}

/// A token filter receives the token stream and may add, remove, or change tokens.
/// For example, a lowercase token filter converts all tokens to lowercase, a stop token
/// filter removes common words (stop words) like the from the token stream,
/// and a synonym token filter introduces synonyms into the token stream.
pub trait TokenFilter: Send + Sync {
    fn filter(&self, tokens: Vec<String>) -> Vec<String>;
}

pub struct LowerCaseTokenFilter;

impl TokenFilter for LowerCaseTokenFilter {
    fn filter(&self, tokens: Vec<String>) -> Vec<String> {
        tokens.iter().map(|w| w.to_lowercase()).collect::<Vec<String>>()
    }
}

#[derive(Debug)]
pub struct StopWordTokenFilter {
    words: HashSet<String>,
}

impl StopWordTokenFilter {
    pub fn new(words: HashSet<String>) -> Self {
        Self { words }
    }

    /// The built-in English list.
    pub fn english() -> Self {
        Self::new(default_stop_words().clone())
    }

    /// Loads a newline-delimited stop-word file, one word per line.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|err| {
            Error::InvalidArgument(format!(
                "cannot read stop-word file {}: {err}",
                path.display()
            ))
        })?;
        let words = contents
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        Ok(Self::new(words))
    }
}

impl TokenFilter for StopWordTokenFilter {
    fn filter(&self, mut tokens: Vec<String>) -> Vec<String> {
        tokens.retain(|w| !self.words.contains(w));
        tokens
    }
}

pub struct PorterStemmerTokenFilter;

impl TokenFilter for PorterStemmerTokenFilter {
    fn filter(&self, tokens: Vec<String>) -> Vec<String> {
        tokens.iter().map(|w| stem(w)).collect::<Vec<String>>()
    }
}

/// The full analysis pipeline: character filters, then tokenization, then
/// token filters. Emitted terms keep their stream order; stop words are
/// dropped before positions are assigned, so positions always refer to the
/// filtered stream.
pub struct TextAnalyzer {
    char_filters: Vec<Box<dyn CharacterFilter>>,
    tokenizer: Box<dyn Tokenizer>,
    token_filters: Vec<Box<dyn TokenFilter>>,
}

impl TextAnalyzer {
    pub fn new(
        char_filters: Vec<Box<dyn CharacterFilter>>,
        tokenizer: Box<dyn Tokenizer>,
        token_filters: Vec<Box<dyn TokenFilter>>,
    ) -> Self {
        Self {
            char_filters,
            tokenizer,
            token_filters,
        }
    }

    /// The standard chain: alphanumeric stripping, whitespace splitting,
    /// lowercasing, stop-word removal, Porter stemming.
    pub fn standard(stop_words: StopWordTokenFilter) -> Self {
        Self::new(
            vec![Box::new(AlphanumericFilter)],
            Box::new(WhiteSpaceTokenizer),
            vec![
                Box::new(LowerCaseTokenFilter),
                Box::new(stop_words),
                Box::new(PorterStemmerTokenFilter),
            ],
        )
    }

    /// Runs the pipeline over a document, yielding normalized terms in
    /// order.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let mut content = text.to_string();
        for filter in self.char_filters.iter() {
            content = filter.filter(content);
        }

        let mut tokens = self.tokenizer.tokenize(content);

        for filter in self.token_filters.iter() {
            tokens = filter.filter(tokens);
        }
        tokens
    }

    /// Normalizes a single query term through the same pipeline. Stop words
    /// come back as the empty string.
    pub fn normalize(&self, term: &str) -> String {
        self.analyze(term).into_iter().next().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_stop_words() -> TextAnalyzer {
        TextAnalyzer::standard(StopWordTokenFilter::new(HashSet::new()))
    }

    #[test]
    fn test_alphanumeric_filter() {
        let filter = AlphanumericFilter;
        assert_eq!(
            filter.filter("winter, is(coming)!".to_string()),
            "winter  is coming  "
        );
    }

    #[test]
    fn test_analyze_lowercases_and_stems() {
        let analyzer = no_stop_words();
        assert_eq!(
            analyzer.analyze("Winter is COMING"),
            vec!["winter", "is", "come"]
        );
    }

    #[test]
    fn test_analyze_drops_stop_words_before_positions() {
        let words: HashSet<String> = ["the".to_string(), "of".to_string()].into();
        let analyzer = TextAnalyzer::standard(StopWordTokenFilter::new(words));
        // "the" and "of" consume no position in the emitted stream
        assert_eq!(analyzer.analyze("The song of storms"), vec!["song", "storm"]);
    }

    #[test]
    fn test_normalize() {
        let words: HashSet<String> = ["the".to_string()].into();
        let analyzer = TextAnalyzer::standard(StopWordTokenFilter::new(words));
        assert_eq!(analyzer.normalize("Running!"), "run");
        assert_eq!(analyzer.normalize("the"), "");
        assert_eq!(analyzer.normalize(""), "");
    }
}
