//! High score leaderboard system
//!
//! Persisted through the key-value store, tracks the top 5 scores.

use serde::{Deserialize, Serialize};

use crate::persistence;
use crate::platform::KeyValueStore;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 5;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's score
    pub score: u64,
    /// Local date the score was set
    pub date: String,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "side_runner_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from arbitrary entries, restoring order and size limits
    pub fn from_entries(mut entries: Vec<HighScoreEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_HIGH_SCORES);
        Self { entries }
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Whether a score beats the best stored score
    ///
    /// Evaluate before calling [`HighScores::add_score`]. With an empty board
    /// any positive score is a record.
    pub fn is_new_record(&self, score: u64) -> bool {
        score > 0 && self.top_score().is_none_or(|best| score > best)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u64, date: impl Into<String>) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            date: date.into(),
        };

        // Ties go below existing entries
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores; absent or malformed data yields an empty board
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let loaded: HighScores = persistence::load_or_default(store, Self::STORAGE_KEY);
        let scores = Self::from_entries(loaded.entries);
        log::info!("Loaded {} high scores", scores.entries.len());
        scores
    }

    /// Save high scores
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        if persistence::save(store, Self::STORAGE_KEY, self) {
            log::info!("High scores saved ({} entries)", self.entries.len());
        }
    }

    /// Forget every entry, in memory and in storage
    pub fn reset<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) {
        self.entries.clear();
        if let Err(e) = store.remove(Self::STORAGE_KEY) {
            log::warn!("{}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;
    use proptest::prelude::*;

    #[test]
    fn test_add_and_rank() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(300, "1/1/2026"), Some(1));
        assert_eq!(scores.add_score(500, "1/2/2026"), Some(1));
        assert_eq!(scores.add_score(400, "1/3/2026"), Some(2));
        assert_eq!(scores.top_score(), Some(500));
        let ordered: Vec<u64> = scores.entries().iter().map(|e| e.score).collect();
        assert_eq!(ordered, vec![500, 400, 300]);
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.add_score(0, "today"), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_full_board_rejects_low_scores() {
        let mut scores = HighScores::new();
        for s in [100, 200, 300, 400, 500] {
            scores.add_score(s, "d");
        }
        assert!(!scores.qualifies(100));
        assert_eq!(scores.add_score(50, "d"), None);
        assert_eq!(scores.potential_rank(250), Some(4));
        assert_eq!(scores.add_score(250, "d"), Some(4));
        assert_eq!(scores.entries().len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries().last().map(|e| e.score), Some(200));
    }

    #[test]
    fn test_new_record_means_beating_the_best() {
        let mut scores = HighScores::new();
        assert!(!scores.is_new_record(0));
        assert!(scores.is_new_record(10));

        scores.add_score(100, "d");
        scores.add_score(20, "d");
        // Enters the board but does not beat the best
        assert!(scores.qualifies(50));
        assert!(!scores.is_new_record(50));
        assert!(!scores.is_new_record(100));
        assert!(scores.is_new_record(101));
    }

    #[test]
    fn test_load_missing_or_malformed_is_empty() {
        let mut store = MemoryStore::new();
        assert!(HighScores::load(&store).is_empty());

        store.set(HighScores::STORAGE_KEY, "not json at all").unwrap();
        assert!(HighScores::load(&store).is_empty());

        store.set(HighScores::STORAGE_KEY, r#"{"score": 5}"#).unwrap();
        assert!(HighScores::load(&store).is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let mut scores = HighScores::new();
        scores.add_score(1200, "3/4/2026");
        scores.add_score(800, "3/5/2026");
        scores.save(&mut store);

        let json = store.get(HighScores::STORAGE_KEY).unwrap().unwrap();
        assert!(json.starts_with('['));
        assert_eq!(HighScores::load(&store), scores);
    }

    #[test]
    fn test_load_repairs_unsorted_oversized_list() {
        let mut store = MemoryStore::new();
        let raw = r#"[
            {"score": 10, "date": "a"}, {"score": 70, "date": "b"},
            {"score": 30, "date": "c"}, {"score": 90, "date": "d"},
            {"score": 50, "date": "e"}, {"score": 20, "date": "f"}
        ]"#;
        store.set(HighScores::STORAGE_KEY, raw).unwrap();

        let scores = HighScores::load(&store);
        let ordered: Vec<u64> = scores.entries().iter().map(|e| e.score).collect();
        assert_eq!(ordered, vec![90, 70, 50, 30, 20]);
    }

    #[test]
    fn test_reset_clears_storage() {
        let mut store = MemoryStore::new();
        let mut scores = HighScores::new();
        scores.add_score(10, "d");
        scores.save(&mut store);
        scores.reset(&mut store);
        assert!(scores.is_empty());
        assert!(HighScores::load(&store).is_empty());
    }

    proptest! {
        #[test]
        fn board_stays_bounded_and_sorted(
            inserts in proptest::collection::vec(0u64..10_000, 0..60)
        ) {
            let mut scores = HighScores::new();
            for score in inserts {
                scores.add_score(score, "d");
                prop_assert!(scores.entries().len() <= MAX_HIGH_SCORES);
                prop_assert!(scores.entries().windows(2).all(|w| w[0].score >= w[1].score));
            }
        }
    }
}
