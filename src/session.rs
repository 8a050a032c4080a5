//! Game session controller
//!
//! Owns the simulation state for the lifetime of the page, accepts the
//! start/restart commands from the presentation layer, tracks the persisted
//! high score, and numbers runs so late commentary responses can be told
//! apart from the current run.

use crate::commentary::CommentaryRequest;
use crate::highscore::HighScore;
use crate::sim::{GameConfig, GameEvent, GamePhase, GameState, TickInput, tick};

pub struct Session {
    state: GameState,
    high_score: HighScore,
    /// Bumped on every start/restart; commentary responses carry the
    /// generation they were requested under and are dropped on mismatch
    generation: u64,
}

impl Session {
    pub fn new(seed: u64, config: GameConfig) -> Self {
        Self {
            state: GameState::new(seed, config),
            high_score: HighScore::load(),
            generation: 0,
        }
    }

    /// MENU/GAME_OVER -> PLAYING. Resets score, wave, and all entities.
    pub fn start(&mut self) {
        self.generation += 1;
        self.state.start_run();
        log::info!("run {} started", self.generation);
    }

    /// Identical reset to `start`; separate command name for the game-over
    /// overlay
    pub fn restart(&mut self) {
        self.start();
    }

    /// Advance one frame. Ticks the simulation only while `Playing`, so no
    /// orphaned tick can fire after a transition out of it.
    pub fn frame(&mut self, input: &TickInput) -> Vec<GameEvent> {
        let events = tick(&mut self.state, input);
        if self.high_score.record(self.state.score) {
            self.high_score.save();
        }
        events
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn wave(&self) -> u32 {
        self.state.wave
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Is a response tagged with `generation` still about the current run?
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Snapshot for the commentary service at the end of a run
    pub fn commentary_request(&self) -> CommentaryRequest {
        CommentaryRequest {
            score: self.state.score,
            wave: self.state.wave,
            victory: self.state.phase == GamePhase::Victory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(99, GameConfig::new(800.0, 600.0))
    }

    #[test]
    fn test_start_enters_playing_with_fresh_run() {
        let mut s = session();
        assert_eq!(s.phase(), GamePhase::Menu);
        s.start();
        assert_eq!(s.phase(), GamePhase::Playing);
        assert_eq!(s.score(), 0);
        assert_eq!(s.wave(), 1);
        assert_eq!(s.state().enemies.len(), s.state().formation_size());
    }

    #[test]
    fn test_menu_frames_do_not_tick() {
        let mut s = session();
        for _ in 0..10 {
            assert!(s.frame(&TickInput::default()).is_empty());
        }
        assert_eq!(s.state().time_ticks, 0);
    }

    #[test]
    fn test_double_restart_matches_single() {
        let mut s = session();
        s.start();
        s.frame(&TickInput {
            shoot: true,
            ..Default::default()
        });
        s.restart();
        let once = (s.score(), s.wave(), s.state().enemies.len());
        s.restart();
        assert_eq!(once, (s.score(), s.wave(), s.state().enemies.len()));
        assert!(s.state().projectiles.is_empty());
    }

    #[test]
    fn test_generation_invalidates_stale_responses() {
        let mut s = session();
        s.start();
        let stale = s.generation();
        assert!(s.is_current(stale));
        s.restart();
        assert!(!s.is_current(stale));
        assert!(s.is_current(s.generation()));
    }

    #[test]
    fn test_high_score_tracks_run_score() {
        let mut s = session();
        s.start();
        s.state.score = 250;
        s.frame(&TickInput::default());
        assert_eq!(s.high_score(), 250);

        // A weaker follow-up run leaves it untouched
        s.restart();
        s.state.score = 100;
        s.frame(&TickInput::default());
        assert_eq!(s.high_score(), 250);
    }

    #[test]
    fn test_commentary_request_snapshot() {
        let mut s = session();
        s.start();
        s.state.score = 310;
        s.state.wave = 3;
        s.state.phase = GamePhase::GameOver;
        let req = s.commentary_request();
        assert_eq!(req.score, 310);
        assert_eq!(req.wave, 3);
        assert!(!req.victory);
    }
}
