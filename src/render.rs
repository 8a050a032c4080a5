//! Canvas 2D render adapter
//!
//! Draws the current simulation state; strictly read-only over `GameState`.
//! Sprites are font glyphs drawn with `fill_text`, particles are alpha-faded
//! filled circles where opacity equals remaining life.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{GameState, Owner};

const BACKGROUND_COLOR: &str = "#0f172a";
const STAR_COLOR: &str = "#1e293b";
const STAR_COUNT: u32 = 20;

pub struct Renderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl Renderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width as f64;
        self.height = height as f64;
    }

    /// Draw one frame. `time` is the rAF timestamp in milliseconds and only
    /// drives the starfield drift.
    pub fn render(&self, state: &GameState, settings: &Settings, time: f64) {
        let ctx = &self.ctx;

        ctx.set_fill_style_str(BACKGROUND_COLOR);
        ctx.fill_rect(0.0, 0.0, self.width, self.height);

        if settings.starfield {
            self.draw_stars(if settings.starfield_drifts() { time } else { 0.0 });
        }

        ctx.set_text_align("center");
        ctx.set_text_baseline("top");

        // Player
        let player = &state.player.rect;
        ctx.set_font(&format!("{}px sans-serif", PLAYER_WIDTH as u32));
        let _ = ctx.fill_text(
            PLAYER_SPRITE,
            (player.x + player.w / 2.0) as f64,
            player.y as f64,
        );

        // Formation
        ctx.set_font(&format!("{}px sans-serif", ENEMY_WIDTH as u32));
        for enemy in &state.enemies {
            let _ = ctx.fill_text(
                enemy.kind.glyph(),
                (enemy.rect.x + enemy.rect.w / 2.0) as f64,
                enemy.rect.y as f64,
            );
        }

        // Projectiles, distinct glyph per owner
        ctx.set_font("16px sans-serif");
        for p in &state.projectiles {
            let glyph = match p.owner {
                Owner::Player => PROJECTILE_SPRITE,
                Owner::Enemy => ENEMY_PROJECTILE_SPRITE,
            };
            let _ = ctx.fill_text(glyph, (p.rect.x + p.rect.w / 2.0) as f64, p.rect.y as f64);
        }

        // Particles
        if settings.particles {
            for p in &state.particles {
                ctx.set_global_alpha(p.life as f64);
                ctx.set_fill_style_str(p.color.css());
                ctx.begin_path();
                let _ = ctx.arc(
                    p.pos.x as f64,
                    p.pos.y as f64,
                    p.size as f64,
                    0.0,
                    std::f64::consts::TAU,
                );
                ctx.fill();
            }
            ctx.set_global_alpha(1.0);
        }
    }

    fn draw_stars(&self, time: f64) {
        self.ctx.set_fill_style_str(STAR_COLOR);
        for i in 0..STAR_COUNT {
            let i = i as f64;
            let x = (i.sin() * 1000.0 + time / 10.0).rem_euclid(self.width);
            let y = (i.cos() * 1000.0).rem_euclid(self.height);
            self.ctx.fill_rect(x, y, 2.0, 2.0);
        }
    }
}
