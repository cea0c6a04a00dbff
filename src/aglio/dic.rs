//! Tagged dictionary of conversation fragments and words
//!
//! Scraps and words are registered under tag sets and picked at random
//! among every entry whose tags cover the query.

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::sync::Arc;

use super::knot::{tag_set, TagSet};
use crate::sequencer::Sequencer;

/// Authoring callback of a scrap
pub type ScrapCallback = Arc<dyn Fn(&mut Sequencer) + Send + Sync>;

/// A registered conversation fragment
#[derive(Clone)]
pub struct ScrapEntry {
    pub index: usize,
    pub tags: TagSet,
    callback: ScrapCallback,
}

impl fmt::Debug for ScrapEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrapEntry")
            .field("index", &self.index)
            .field("tags", &self.tags)
            .finish()
    }
}

impl ScrapEntry {
    /// Write this fragment into `seq`
    pub fn author(&self, seq: &mut Sequencer) {
        (self.callback)(seq);
    }

    pub fn matches(&self, query: &TagSet) -> bool {
        query.is_subset(&self.tags)
    }
}

/// Reusable text fragments under a tag set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub tags: TagSet,
    pub values: Vec<String>,
}

#[derive(Debug, Default, Clone)]
pub struct AglioDic {
    scraps: Vec<ScrapEntry>,
    words: Vec<WordEntry>,
}

impl AglioDic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fragment and return its index
    pub fn scrap<S, F>(&mut self, tags: &[S], callback: F) -> usize
    where
        S: AsRef<str>,
        F: Fn(&mut Sequencer) + Send + Sync + 'static,
    {
        let index = self.scraps.len();
        self.scraps.push(ScrapEntry {
            index,
            tags: tag_set(tags),
            callback: Arc::new(callback),
        });
        index
    }

    /// Register word fragments under `tags`
    pub fn word<S: AsRef<str>, V: AsRef<str>>(&mut self, tags: &[S], values: &[V]) -> &mut Self {
        self.words.push(WordEntry {
            tags: tag_set(tags),
            values: values.iter().map(|v| v.as_ref().to_string()).collect(),
        });
        self
    }

    pub fn scraps(&self) -> &[ScrapEntry] {
        &self.scraps
    }

    pub fn words(&self) -> &[WordEntry] {
        &self.words
    }

    pub fn get(&self, index: usize) -> Option<&ScrapEntry> {
        self.scraps.get(index)
    }

    /// Scrap after `index`, wrapping to the first
    pub fn next(&self, index: usize) -> Option<&ScrapEntry> {
        if self.scraps.is_empty() {
            return None;
        }
        self.scraps.get((index + 1) % self.scraps.len())
    }

    /// Uniform pick among scraps whose tags cover `tags`
    pub fn select_scrap<S: AsRef<str>>(&self, tags: &[S]) -> Option<&ScrapEntry> {
        self.select_scrap_with(&mut rand::thread_rng(), tags)
    }

    pub fn select_scrap_with<R: Rng + ?Sized, S: AsRef<str>>(
        &self,
        rng: &mut R,
        tags: &[S],
    ) -> Option<&ScrapEntry> {
        let query = tag_set(tags);
        let candidates: Vec<&ScrapEntry> =
            self.scraps.iter().filter(|s| s.matches(&query)).collect();
        candidates.choose(rng).copied()
    }

    /// Uniform pick of one value among word entries whose tags cover `tags`
    pub fn select_word<S: AsRef<str>>(&self, tags: &[S]) -> Option<&str> {
        self.select_word_with(&mut rand::thread_rng(), tags)
    }

    pub fn select_word_with<R: Rng + ?Sized, S: AsRef<str>>(
        &self,
        rng: &mut R,
        tags: &[S],
    ) -> Option<&str> {
        let query = tag_set(tags);
        let values: Vec<&str> = self
            .words
            .iter()
            .filter(|w| query.is_subset(&w.tags))
            .flat_map(|w| w.values.iter().map(String::as_str))
            .collect();
        values.choose(rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;
    use crate::sequencer::SequencerRegistry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dic() -> AglioDic {
        let mut dic = AglioDic::new();
        dic.scrap(&["morning", "alice"], |seq| {
            seq.period("alice").talk("Good morning.");
        });
        dic.scrap(&["evening", "alice"], |seq| {
            seq.period("alice").talk("Good evening.");
        });
        dic.scrap(&["morning", "bob"], |seq| {
            seq.period("bob").talk("Mornin'.");
        });
        dic
    }

    #[test]
    fn test_scrap_indices() {
        let d = dic();
        let indices: Vec<_> = d.scraps().iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_next_wraps() {
        let d = dic();
        assert_eq!(d.next(0).unwrap().index, 1);
        assert_eq!(d.next(2).unwrap().index, 0);
        assert!(AglioDic::new().next(0).is_none());
    }

    #[test]
    fn test_select_scrap_superset() {
        let d = dic();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let picked = d.select_scrap_with(&mut rng, &["alice"]).unwrap();
            assert!(picked.tags.contains("alice"));
        }
        let only = d.select_scrap_with(&mut rng, &["bob", "morning"]).unwrap();
        assert_eq!(only.index, 2);
    }

    #[test]
    fn test_select_scrap_no_match() {
        let d = dic();
        assert!(d.select_scrap(&["night"]).is_none());
        assert!(AglioDic::new().select_scrap::<&str>(&[]).is_none());
    }

    #[test]
    fn test_select_scrap_covers_all_candidates() {
        let d = dic();
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let picked = d.select_scrap_with::<_, &str>(&mut rng, &[]).unwrap();
            seen[picked.index] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn test_scrap_authors_into_sequencer() {
        let d = dic();
        let mut seq = Sequencer::new(&SequencerRegistry::new(), Options::default()).unwrap();
        d.get(1).unwrap().author(&mut seq);
        let p = &seq.scrap().sections()[0].paragraphs()[0];
        assert_eq!(p.actor, "alice");
        assert_eq!(p.text(), "Good evening.");
    }

    #[test]
    fn test_select_word() {
        let mut d = AglioDic::new();
        d.word(&["greet", "polite"], &["Hello", "Good day"])
            .word(&["greet"], &["Hey"]);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let w = d.select_word_with(&mut rng, &["polite"]).unwrap();
            assert!(w == "Hello" || w == "Good day");
        }
        assert!(d.select_word(&["rude"]).is_none());
        assert_eq!(d.words().len(), 2);
    }
}
