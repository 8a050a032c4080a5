//! Pasta Invaders - a kitchen-defense invader shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, wave generation, tick loop)
//! - `input`: Keyboard/touch intent merging
//! - `session`: Game session controller (phase machine, score, high score)
//! - `render`: Canvas 2D rendering (wasm only)
//! - `commentary`: Nonna's post-game commentary service client
//! - `highscore`: Best-score persistence (LocalStorage on web)

pub mod commentary;
pub mod highscore;
pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscore::HighScore;
pub use session::Session;
pub use settings::Settings;

/// Game tuning constants
pub mod consts {
    /// Player sprite box (px)
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    /// Horizontal movement per tick (px)
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Ticks between player shots
    pub const PLAYER_COOLDOWN: u32 = 25;
    /// Gap between the player and the bottom canvas edge (px)
    pub const PLAYER_BOTTOM_MARGIN: f32 = 20.0;

    /// Enemy sprite box (px)
    pub const ENEMY_WIDTH: f32 = 32.0;
    pub const ENEMY_HEIGHT: f32 = 32.0;
    /// Gap between formation cells, both axes (px)
    pub const ENEMY_PADDING: f32 = 15.0;
    /// Formation shape
    pub const ENEMY_ROWS: u32 = 4;
    pub const ENEMY_COLS: u32 = 8;
    /// Horizontal sweep speed before wave/population scaling (px per tick)
    pub const ENEMY_SPEED_BASE: f32 = 1.0;
    /// Vertical drop on edge hit (px)
    pub const ENEMY_DROP_HEIGHT: f32 = 20.0;
    /// Vertical offset of the top formation row (px)
    pub const ENEMY_START_Y: f32 = 50.0;
    /// Base per-tick probability of an enemy shot (scaled by wave)
    pub const ENEMY_SHOOT_CHANCE: f64 = 0.02;

    /// Projectile box (px)
    pub const PROJECTILE_WIDTH: f32 = 6.0;
    pub const PROJECTILE_HEIGHT: f32 = 12.0;
    /// Player projectile speed (px per tick); enemy shots travel slower
    pub const PROJECTILE_SPEED: f32 = 7.0;
    pub const ENEMY_PROJECTILE_FACTOR: f32 = 0.6;

    /// Particles spawned per destruction burst
    pub const PARTICLES_COUNT: usize = 8;
    /// Life lost per tick (life starts at 1.0)
    pub const PARTICLE_DECAY: f32 = 0.02;

    /// Sprite glyphs
    pub const PLAYER_SPRITE: &str = "\u{1F468}\u{200D}\u{1F373}"; // chef
    pub const PROJECTILE_SPRITE: &str = "\u{1F374}"; // fork
    pub const ENEMY_PROJECTILE_SPRITE: &str = "\u{1F4A7}"; // olive oil drop

    /// Particle colors (CSS)
    pub const SAUCE_COLOR: &str = "#ef4444";
    pub const PASTA_COLOR: &str = "#fde047";
    pub const SPLASH_COLOR: &str = "#ffffff";
}
