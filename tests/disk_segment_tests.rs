use anyhow::Result;
use sift::disk_segment::DiskSegment;
use sift::posting::{Posting, PostingList};
use sift::Error;

fn vehicle_lists() -> (PostingList, PostingList) {
    let plist1 = PostingList::from_postings(vec![
        Posting::new("bus.com", vec![0, 1]),
        Posting::new("truck.com", vec![5, 6]),
    ]);
    let plist2 = PostingList::from_postings(vec![
        Posting::new("car.com", vec![3, 4]),
        Posting::new("van.com", vec![7, 8]),
    ]);
    (plist1, plist2)
}

#[test]
fn test_merge_and_one_word_query() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let disk = DiskSegment::open(dir.path().join("test.index"))?;
    let (plist1, plist2) = vehicle_lists();

    disk.merge_posting_list("vehicle", &plist1)?;
    assert_eq!(disk.one_word_query("vehicle")?, vec!["bus.com", "truck.com"]);

    disk.merge_posting_list("vehicle", &plist2)?;
    assert_eq!(
        disk.one_word_query("vehicle")?,
        vec!["bus.com", "car.com", "truck.com", "van.com"]
    );

    // unknown terms are empty, not errors
    assert!(disk.one_word_query("plane")?.is_empty());
    assert!(!disk.has("plane")?);
    assert!(disk.has("vehicle")?);
    Ok(())
}

#[test]
fn test_merge_is_idempotent() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let disk = DiskSegment::open(dir.path().join("test.index"))?;
    let (plist1, _) = vehicle_lists();

    disk.merge_posting_list("vehicle", &plist1)?;
    let first = disk.posting_list("vehicle")?.unwrap();
    // re-running the same merge, as a retried flush would, changes nothing
    disk.merge_posting_list("vehicle", &plist1)?;
    assert_eq!(disk.posting_list("vehicle")?.unwrap(), first);
    Ok(())
}

#[test]
fn test_keys() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let disk = DiskSegment::open(dir.path().join("test.index"))?;

    for term in ["bus", "car", "truck", "van"] {
        let plist = PostingList::from_postings(vec![Posting::new("a.com", vec![0])]);
        disk.merge_posting_list(term, &plist)?;
    }
    assert_eq!(disk.keys()?, vec!["bus", "car", "truck", "van"]);
    Ok(())
}

#[test]
fn test_phrase_query_on_disk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let disk = DiskSegment::open(dir.path().join("test.index"))?;

    disk.merge_posting_list(
        "winter",
        &PostingList::from_postings(vec![
            Posting::new("disney.com", vec![1, 4]),
            Posting::new("hbo.com", vec![0, 5]),
            Posting::new("patagonia.com", vec![2]),
        ]),
    )?;
    disk.merge_posting_list(
        "is",
        &PostingList::from_postings(vec![
            Posting::new("hbo.com", vec![1]),
            Posting::new("patagonia.com", vec![5]),
            Posting::new("wikipedia.org", vec![3, 10]),
        ]),
    )?;
    disk.merge_posting_list(
        "coming",
        &PostingList::from_postings(vec![
            Posting::new("hbo.com", vec![2, 4]),
            Posting::new("patagonia.com", vec![4]),
        ]),
    )?;

    let terms: Vec<String> = ["winter", "is", "coming"]
        .iter()
        .map(|t| t.to_string())
        .collect();
    assert_eq!(disk.phrase_query(&terms)?, vec!["hbo.com"]);

    let reversed: Vec<String> = terms.iter().rev().cloned().collect();
    assert!(disk.phrase_query(&reversed)?.is_empty());

    // a phrase containing an unindexed term matches nothing
    let missing = vec!["winter".to_string(), "frozen".to_string()];
    assert!(disk.phrase_query(&missing)?.is_empty());
    Ok(())
}

#[test]
fn test_corrupt_value_is_isolated() -> Result<()> {
    use redb::{Database, TableDefinition};
    const POSTINGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("postings");

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("test.index");

    // plant a value bincode cannot decode
    {
        let db = Database::create(&path)?;
        let txn = db.begin_write()?;
        {
            let mut table = txn.open_table(POSTINGS_TABLE)?;
            table.insert("mangled", [0xff, 0xff, 0xff].as_slice())?;
        }
        txn.commit()?;
    }

    let disk = DiskSegment::open(&path)?;
    disk.merge_posting_list(
        "intact",
        &PostingList::from_postings(vec![Posting::new("a.com", vec![0])]),
    )?;

    let err = disk.one_word_query("mangled").unwrap_err();
    assert!(matches!(err, Error::Corruption { ref key, .. } if key == "mangled"));
    // the corrupt key does not contaminate other terms
    assert_eq!(disk.one_word_query("intact")?, vec!["a.com"]);
    Ok(())
}
