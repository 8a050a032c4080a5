//! Best-score persistence
//!
//! A single named integer, read once at startup and written whenever the
//! current score first exceeds it. LocalStorage on web, in-memory stub on
//! native.

use serde::{Deserialize, Serialize};

/// Persisted best score
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "pasta_invaders_highscore";

    pub fn new() -> Self {
        Self::default()
    }

    /// Does `score` beat the stored best?
    pub fn beats(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record `score` if it beats the best; returns true when it did
    pub fn record(&mut self, score: u64) -> bool {
        if self.beats(score) {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Load the best score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(score) = serde_json::from_str::<HighScore>(&json) {
                    log::info!("Loaded high score: {}", score.best);
                    return score;
                }
            }
        }

        log::info!("No stored high score, starting fresh");
        Self::new()
    }

    /// Save the best score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("High score saved: {}", self.best);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_maximum() {
        let mut hs = HighScore::new();
        assert!(hs.record(100));
        assert!(!hs.record(50));
        assert_eq!(hs.best, 100);
        assert!(hs.record(150));
        assert_eq!(hs.best, 150);
    }

    #[test]
    fn test_equal_score_does_not_beat() {
        let mut hs = HighScore { best: 100 };
        assert!(!hs.beats(100));
        assert!(!hs.record(100));
    }

    #[test]
    fn test_roundtrip_json() {
        let hs = HighScore { best: 420 };
        let json = serde_json::to_string(&hs).unwrap();
        let back: HighScore = serde_json::from_str(&json).unwrap();
        assert_eq!(back.best, 420);
    }
}
