//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and portable:
//! - One tick per render frame, fixed step
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::{Rect, intersects};
pub use state::{
    Enemy, EnemyKind, GameConfig, GameEvent, GamePhase, GameState, Owner, Particle, ParticleColor,
    Player, Projectile,
};
pub use tick::{TickInput, tick};
pub use wave::generate_wave;
