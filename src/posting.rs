use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Caller-supplied document identifier. One totally-ordered id type per
/// index instance; comparisons are lexicographic.
pub type DocId = String;

/// 0-based ordinal of a token within an analyzed document.
pub type Position = u32;

/// A Posting pairs a document id with the sorted list of positions at which
/// a term occurs in that document. Positions are strictly ascending and
/// free of duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    positions: Vec<Position>,
}

impl Posting {
    pub fn new(doc_id: impl Into<DocId>, positions: Vec<Position>) -> Self {
        debug_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        Self {
            doc_id: doc_id.into(),
            positions,
        }
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Inserts the position into the sorted list iff it is not already
    /// present. Re-adding a position is a no-op.
    pub fn add_position(&mut self, position: Position) {
        if let Err(i) = self.positions.binary_search(&position) {
            self.positions.insert(i, position);
        }
    }

    /// Returns a new Posting whose positions are the sorted set-union of
    /// both inputs. The postings must refer to the same document.
    pub fn merge(a: &Posting, b: &Posting) -> Result<Posting> {
        if a.doc_id != b.doc_id {
            return Err(Error::MergeMismatch {
                left: a.doc_id.clone(),
                right: b.doc_id.clone(),
            });
        }
        let mut merged = a.clone();
        merged.merge_positions(b);
        Ok(merged)
    }

    /// Folds the other posting's positions into our own, collapsing
    /// duplicates. The caller guarantees both postings refer to the same
    /// document.
    fn merge_positions(&mut self, other: &Posting) {
        let (a, b) = (&self.positions, &other.positions);
        let mut merged = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0usize, 0usize);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Less => {
                    merged.push(a[i]);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    merged.push(b[j]);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    merged.push(a[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&a[i..]);
        merged.extend_from_slice(&b[j..]);
        self.positions = merged;
    }
}

/// A PostingList keeps its postings sorted by doc id, at most one Posting
/// per document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingList {
    postings: Vec<Posting>,
}

impl PostingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_postings(postings: Vec<Posting>) -> Self {
        debug_assert!(postings.windows(2).all(|w| w[0].doc_id < w[1].doc_id));
        Self { postings }
    }

    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Posting> {
        self.postings.iter()
    }

    pub fn get(&self, doc_id: &str) -> Option<&Posting> {
        self.postings
            .binary_search_by(|p| p.doc_id.as_str().cmp(doc_id))
            .ok()
            .map(|i| &self.postings[i])
    }

    /// Doc ids in ascending order.
    pub fn doc_ids(&self) -> Vec<DocId> {
        self.postings.iter().map(|p| p.doc_id.clone()).collect()
    }

    /// Inserts the posting at its sorted slot, or merges its positions into
    /// the existing posting for the same document.
    pub fn add_posting(&mut self, posting: Posting) {
        match self
            .postings
            .binary_search_by(|p| p.doc_id.cmp(&posting.doc_id))
        {
            Ok(i) => self.postings[i].merge_positions(&posting),
            Err(i) => self.postings.insert(i, posting),
        }
    }

    /// Two-pointer merge over ascending doc ids. Postings for the same
    /// document have their position lists unioned.
    pub fn merge_lists(a: &PostingList, b: &PostingList) -> PostingList {
        let (x, y) = (&a.postings, &b.postings);
        let mut merged = Vec::with_capacity(x.len() + y.len());
        let (mut i, mut j) = (0usize, 0usize);
        while i < x.len() && j < y.len() {
            match x[i].doc_id.cmp(&y[j].doc_id) {
                std::cmp::Ordering::Less => {
                    merged.push(x[i].clone());
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    merged.push(y[j].clone());
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    let mut p = x[i].clone();
                    p.merge_positions(&y[j]);
                    merged.push(p);
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend(x[i..].iter().cloned());
        merged.extend(y[j..].iter().cloned());
        PostingList { postings: merged }
    }

    /// Finds positional runs across the given posting lists, one list per
    /// phrase term in order. The returned postings carry the start
    /// positions of every occurrence of the exact phrase. Example:
    ///
    /// ```
    /// use sift::posting::{Posting, PostingList};
    ///
    /// let x = PostingList::from_postings(vec![
    ///     Posting::new("1", vec![2, 5]),
    ///     Posting::new("2", vec![2]),
    /// ]);
    /// let y = PostingList::from_postings(vec![Posting::new("1", vec![6])]);
    /// let z = PostingList::from_postings(vec![
    ///     Posting::new("1", vec![7]),
    ///     Posting::new("2", vec![3]),
    /// ]);
    /// let phrases = PostingList::find_phrases([&x, &y, &z]);
    /// assert_eq!(phrases.postings(), &[Posting::new("1", vec![5])]);
    /// ```
    ///
    /// The i-th term of a phrase occurs i spots after the first term, so a
    /// position `pos` in the i-th list votes for a phrase start at
    /// `pos - i`. The working state is a forward index from doc id to the
    /// surviving candidate starts; it only ever shrinks after the first
    /// list.
    pub fn find_phrases<'a, I>(posting_lists: I) -> PostingList
    where
        I: IntoIterator<Item = &'a PostingList>,
    {
        let mut lists = posting_lists.into_iter();
        let Some(first) = lists.next() else {
            return PostingList::new();
        };

        // candidate phrase-start positions per doc id
        let mut fw_index: BTreeMap<&DocId, BTreeSet<Position>> = first
            .iter()
            .map(|p| (&p.doc_id, p.positions.iter().copied().collect()))
            .collect();

        for (i, posting_list) in lists.enumerate() {
            let term_index = (i + 1) as Position;
            let mut ith_doc_ids: HashSet<&DocId> = HashSet::new();
            for posting in posting_list {
                ith_doc_ids.insert(&posting.doc_id);
                if let Some(starts) = fw_index.get_mut(&posting.doc_id) {
                    let offsets: BTreeSet<Position> = posting
                        .positions
                        .iter()
                        .filter_map(|pos| pos.checked_sub(term_index))
                        .collect();
                    starts.retain(|s| offsets.contains(s));
                }
            }
            // drop docs where the i-th term is absent or no start survived
            fw_index.retain(|doc_id, starts| ith_doc_ids.contains(doc_id) && !starts.is_empty());
            if fw_index.is_empty() {
                break;
            }
        }

        let postings = fw_index
            .into_iter()
            .map(|(doc_id, starts)| Posting::new(doc_id.clone(), starts.into_iter().collect()))
            .collect();
        PostingList { postings }
    }
}

impl<'a> IntoIterator for &'a PostingList {
    type Item = &'a Posting;
    type IntoIter = std::slice::Iter<'a, Posting>;

    fn into_iter(self) -> Self::IntoIter {
        self.postings.iter()
    }
}
