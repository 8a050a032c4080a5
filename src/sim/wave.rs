//! Wave generation
//!
//! Builds the enemy formation for the state's current wave number. Difficulty
//! scales two ways: score values grow linearly with the wave, and the sweep
//! speed ramp in `tick` uses the wave number directly.

use super::collision::Rect;
use super::state::{Enemy, EnemyKind, GameState};
use crate::consts::*;

/// Row-to-type mapping: the top row is worth the most
fn row_kind(row: u32) -> EnemyKind {
    match row {
        0 => EnemyKind::Spaghetti,
        1 => EnemyKind::Pizza,
        _ => EnemyKind::Tomato,
    }
}

/// Populate `state.enemies` with a full, horizontally centered formation.
///
/// Side effects: resets the sweep direction to rightward. Any surviving
/// enemies are discarded (callers only invoke this on an empty formation or
/// a run reset).
pub fn generate_wave(state: &mut GameState) {
    let wave = state.wave;
    debug_assert!(wave >= 1, "waves are 1-indexed");

    let cell_w = ENEMY_WIDTH + ENEMY_PADDING;
    let cell_h = ENEMY_HEIGHT + ENEMY_PADDING;
    let start_x = (state.config.width - ENEMY_COLS as f32 * cell_w) / 2.0;

    state.enemies.clear();
    for row in 0..ENEMY_ROWS {
        let kind = row_kind(row);
        for col in 0..ENEMY_COLS {
            state.enemies.push(Enemy {
                rect: Rect::new(
                    start_x + col as f32 * cell_w,
                    ENEMY_START_Y + row as f32 * cell_h,
                    ENEMY_WIDTH,
                    ENEMY_HEIGHT,
                ),
                kind,
                score_value: kind.base_score() * wave,
                dead: false,
            });
        }
    }
    state.enemy_direction = 1.0;

    log::debug!(
        "wave {} formation: {} enemies from x={:.0}",
        wave,
        state.enemies.len(),
        start_x
    );
}
