//! Game state and core simulation types
//!
//! The whole simulation is owned by one `GameState` aggregate; the tick loop
//! and the renderer both receive it by reference. No module-level mutable
//! state anywhere.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Rect;
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    Menu,
    /// Active gameplay
    Playing,
    /// Run ended (invasion or player hit)
    GameOver,
    /// Reserved - the endless wave loop never reaches it
    Victory,
}

/// Events reported out of a tick for the session/presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// An enemy was destroyed; carries its score value
    EnemyDestroyed { score: u32 },
    /// The formation cleared and the next wave spawned in the same tick
    WaveCleared { next_wave: u32 },
    /// An enemy shot hit the player
    PlayerHit,
    /// The formation reached the player's row
    Invasion,
}

/// Canvas dimensions captured at session start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
    pub width: f32,
    pub height: f32,
}

impl GameConfig {
    pub fn new(width: f32, height: f32) -> Self {
        debug_assert!(width > 0.0 && height > 0.0);
        Self { width, height }
    }
}

/// Enemy taxonomy. Wine is a reserved special/boss type: it carries a score
/// and a glyph but the default wave generator never places it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Tomato,
    Pizza,
    Spaghetti,
    Wine,
}

impl EnemyKind {
    /// Score awarded at wave 1; scaled linearly by wave number
    pub fn base_score(&self) -> u32 {
        match self {
            EnemyKind::Tomato => 10,
            EnemyKind::Pizza => 20,
            EnemyKind::Spaghetti => 30,
            EnemyKind::Wine => 100,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            EnemyKind::Tomato => "\u{1F345}",
            EnemyKind::Pizza => "\u{1F355}",
            EnemyKind::Spaghetti => "\u{1F35D}",
            EnemyKind::Wine => "\u{1F377}",
        }
    }
}

/// The player-controlled chef
#[derive(Debug, Clone)]
pub struct Player {
    pub rect: Rect,
    /// Movement per tick (px)
    pub speed: f32,
    /// Ticks until the next shot is allowed
    pub cooldown: u32,
}

impl Player {
    /// Player anchored bottom-center of the canvas
    pub fn spawn(config: &GameConfig) -> Self {
        Self {
            rect: Rect::new(
                config.width / 2.0 - PLAYER_WIDTH / 2.0,
                config.height - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN,
                PLAYER_WIDTH,
                PLAYER_HEIGHT,
            ),
            speed: PLAYER_SPEED,
            cooldown: 0,
        }
    }
}

/// One formation member
#[derive(Debug, Clone)]
pub struct Enemy {
    pub rect: Rect,
    pub kind: EnemyKind,
    /// `base_score * wave`, fixed at spawn
    pub score_value: u32,
    /// Deletion flag, compacted at end of tick
    pub dead: bool,
}

/// Projectile ownership decides which collision set it tests against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Player,
    Enemy,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub rect: Rect,
    /// Signed vertical velocity: negative = upward (player-fired)
    pub dy: f32,
    pub owner: Owner,
    pub dead: bool,
}

/// Burst particle palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleColor {
    Sauce,
    Pasta,
    Splash,
}

impl ParticleColor {
    pub fn css(&self) -> &'static str {
        match self {
            ParticleColor::Sauce => SAUCE_COLOR,
            ParticleColor::Pasta => PASTA_COLOR,
            ParticleColor::Splash => SPLASH_COLOR,
        }
    }
}

/// Cosmetic burst particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Unit interval, starts at 1.0; doubles as render opacity
    pub life: f32,
    pub size: f32,
    pub color: ParticleColor,
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub phase: GamePhase,
    /// Monotonically non-decreasing within a run, reset on start
    pub score: u64,
    /// Starts at 1, bumped on each formation clear
    pub wave: u32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    /// Horizontal sweep direction: 1.0 = rightward, -1.0 = leftward
    pub enemy_direction: f32,
    /// Tick counter for the current run (drives the starfield drift)
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Fresh state sitting in the menu
    pub fn new(seed: u64, config: GameConfig) -> Self {
        Self {
            config,
            phase: GamePhase::Menu,
            score: 0,
            wave: 1,
            player: Player::spawn(&config),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            enemy_direction: 1.0,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Reset for a (re)start: score 0, wave 1, entities cleared, player
    /// recentered, fresh formation. Idempotent - calling it twice before any
    /// tick yields the same state.
    pub fn start_run(&mut self) {
        self.score = 0;
        self.wave = 1;
        self.player = Player::spawn(&self.config);
        self.projectiles.clear();
        self.particles.clear();
        self.enemies.clear();
        self.time_ticks = 0;
        super::wave::generate_wave(self);
        self.phase = GamePhase::Playing;
    }

    /// Enemies not yet flagged for deletion this tick
    pub fn live_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| !e.dead).count()
    }

    /// Full formation size at wave start
    pub fn formation_size(&self) -> usize {
        (ENEMY_ROWS * ENEMY_COLS) as usize
    }

    /// Spawn a destruction burst centered on `pos`
    pub fn spawn_burst(&mut self, pos: Vec2, color: ParticleColor) {
        for _ in 0..PARTICLES_COUNT {
            let vel = Vec2::new(
                self.rng.random_range(-2.0..2.0),
                self.rng.random_range(-2.0..2.0),
            );
            let size = self.rng.random_range(2.0..5.0);
            self.particles.push(Particle {
                pos,
                vel,
                life: 1.0,
                size,
                color,
            });
        }
    }
}
