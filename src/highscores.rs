//! Best-score record per game variant
//!
//! Stored as two little-endian bytes under the variant's fixed key. Anything
//! else found under that key (wrong length, missing) reads as zero.

use serde::{Deserialize, Serialize};

use crate::persistence::KvStore;
use crate::sim::Variant;

/// Size of the stored record
pub const RECORD_LEN: usize = 2;

/// Encode a score as its persisted record
pub fn encode(score: u16) -> [u8; RECORD_LEN] {
    score.to_le_bytes()
}

/// Decode a persisted record; `None` on wrong length
pub fn decode(bytes: &[u8]) -> Option<u16> {
    let bytes: [u8; RECORD_LEN] = bytes.try_into().ok()?;
    Some(u16::from_le_bytes(bytes))
}

/// Best score for one variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub variant: Variant,
    pub best: u16,
}

impl HighScore {
    /// Read the stored best, defaulting to 0
    pub fn load(variant: Variant, store: &dyn KvStore) -> Self {
        let key = variant.high_score_key();
        let best = match store.get(key) {
            Some(bytes) => match decode(&bytes) {
                Some(best) => {
                    log::info!("High score loaded for {}: {}", variant.as_str(), best);
                    best
                }
                None => {
                    log::warn!(
                        "High score record '{}' has {} bytes, expected {}; using 0",
                        key,
                        bytes.len(),
                        RECORD_LEN
                    );
                    0
                }
            },
            None => {
                log::info!("No high score stored for {}, starting at 0", variant.as_str());
                0
            }
        };
        Self { variant, best }
    }

    /// Would this score replace the record?
    pub fn beats(&self, score: u16) -> bool {
        score > self.best
    }

    /// Fold in a finished run's score. Persists only when the record improves;
    /// a failed write is logged and the in-memory best still advances.
    /// Returns true if the record improved.
    pub fn record(&mut self, score: u16, store: &mut dyn KvStore) -> bool {
        if !self.beats(score) {
            return false;
        }
        self.best = score;
        let key = self.variant.high_score_key();
        match store.set(key, &encode(score)) {
            Ok(()) => log::info!("New high score for {}: {}", self.variant.as_str(), score),
            Err(e) => log::warn!("Failed to save high score {} for {}: {}", score, key, e),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    #[test]
    fn test_record_format() {
        assert_eq!(encode(0x0102), [0x02, 0x01]);
        assert_eq!(decode(&[0x02, 0x01]), Some(0x0102));
        assert_eq!(decode(&[1]), None);
        assert_eq!(decode(&[1, 2, 3]), None);
    }

    #[test]
    fn test_load_missing_and_malformed() {
        let store = MemoryStore::new();
        assert_eq!(HighScore::load(Variant::Snake, &store).best, 0);

        let store = MemoryStore::new().with_entry("snake_high_score", &[5]);
        assert_eq!(HighScore::load(Variant::Snake, &store).best, 0);

        let store = MemoryStore::new().with_entry("dino_high_score", &[44, 1]);
        assert_eq!(HighScore::load(Variant::Runner, &store).best, 300);
        // Keys are per variant
        assert_eq!(HighScore::load(Variant::Snake, &store).best, 0);
    }

    #[test]
    fn test_record_only_on_improvement() {
        let mut store = MemoryStore::new();
        let mut hs = HighScore::load(Variant::Runner, &store);

        assert!(!hs.record(0, &mut store));
        assert!(store.get("dino_high_score").is_none());

        assert!(hs.record(12, &mut store));
        assert_eq!(store.get("dino_high_score"), Some(vec![12, 0]));

        assert!(!hs.record(12, &mut store));
        assert!(!hs.record(3, &mut store));
        assert_eq!(hs.best, 12);
        assert_eq!(HighScore::load(Variant::Runner, &store).best, 12);
    }

    #[test]
    fn test_write_failure_is_not_fatal() {
        let mut store = MemoryStore::read_only();
        let mut hs = HighScore::load(Variant::Snake, &store);
        assert!(hs.record(9, &mut store));
        assert_eq!(hs.best, 9);
        assert!(store.get("snake_high_score").is_none());
    }

    proptest! {
        #[test]
        fn prop_best_is_running_max(scores in prop::collection::vec(any::<u16>(), 0..40)) {
            let mut store = MemoryStore::new();
            let mut hs = HighScore::load(Variant::Snake, &store);
            let mut expected = 0u16;
            for score in scores {
                hs.record(score, &mut store);
                expected = expected.max(score);
                prop_assert_eq!(hs.best, expected);
                prop_assert_eq!(HighScore::load(Variant::Snake, &store).best, expected);
            }
        }
    }
}
