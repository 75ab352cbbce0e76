use std::io::Write;

use anyhow::Result;
use sift::analyzer::{StopWordTokenFilter, TextAnalyzer, TokenFilter};
use sift::Error;

#[test]
fn test_stop_words_from_file() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "winter")?;
    writeln!(file, "is")?;
    writeln!(file)?;

    let filter = StopWordTokenFilter::from_file(file.path())?;
    let tokens = vec!["winter".to_string(), "is".to_string(), "coming".to_string()];
    assert_eq!(filter.filter(tokens), vec!["coming"]);
    Ok(())
}

#[test]
fn test_stop_words_file_missing() {
    let err = StopWordTokenFilter::from_file("/no/such/stopwords.dat").unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn test_english_stop_words() {
    let analyzer = TextAnalyzer::standard(StopWordTokenFilter::english());
    // "the" and "of" are in the built-in list, content words are not
    assert_eq!(analyzer.analyze("the king of winter"), vec!["king", "winter"]);
}

#[test]
fn test_analyze_strips_punctuation_and_case() -> Result<()> {
    let file = tempfile::NamedTempFile::new()?;
    let analyzer = TextAnalyzer::standard(StopWordTokenFilter::from_file(file.path())?);
    assert_eq!(
        analyzer.analyze("Winter... IS: coming!"),
        vec!["winter", "is", "come"]
    );
    Ok(())
}

#[test]
fn test_normalize_matches_ingestion_path() -> Result<()> {
    let file = tempfile::NamedTempFile::new()?;
    let analyzer = TextAnalyzer::standard(StopWordTokenFilter::from_file(file.path())?);
    for word in ["Coming", "WINTER", "storms", "42nd"] {
        let analyzed = analyzer.analyze(word);
        assert_eq!(analyzed.len(), 1);
        assert_eq!(analyzer.normalize(word), analyzed[0]);
    }
    Ok(())
}
