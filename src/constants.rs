//! Tuning constants.
//!
//! Distances are in level pixels, speeds in pixels per nominal frame, and
//! durations in nominal frames unless the name says otherwise. A "nominal
//! frame" is one step at `TARGET_FPS`; the per-frame delta scales them.

use glam::Vec2;

// ── Frame timing ─────────────────────────────────────────────────────────────

pub const TARGET_FPS: f32 = 60.0;

/// Upper bound on the per-frame delta, in nominal frames.
pub const MAX_DELTA: f32 = 3.0;

/// Overlaps thinner than this are treated as resting contact.
pub const COLLISION_EPSILON: f32 = 1e-3;

// ── Player ───────────────────────────────────────────────────────────────────

pub const PLAYER_SIZE: Vec2 = Vec2::new(40.0, 80.0);
pub const PLAYER_SLIDE_HEIGHT: f32 = 40.0;
pub const PLAYER_MAX_HEALTH: u32 = 100;

pub const PLAYER_RUN_SPEED: f32 = 6.0;
pub const PLAYER_ACCEL: f32 = 0.75;
pub const PLAYER_DECEL: f32 = 1.0;

pub const GRAVITY: f32 = 0.8;
pub const MAX_FALL_SPEED: f32 = 18.0;
pub const JUMP_IMPULSE: f32 = 17.0;
/// Upward speed left after the jump key is released early.
pub const JUMP_CUT_SPEED: f32 = 5.0;

pub const SLIDE_SPEED: f32 = 9.0;
pub const SLIDE_FRAMES: f32 = 30.0;

pub const HURT_FRAMES: f32 = 24.0;
pub const HURT_KNOCKBACK: f32 = 4.0;

// ── Gun ──────────────────────────────────────────────────────────────────────

pub const MAX_GUN_TIER: u8 = 3;
/// Score needed to reach tier 2 and tier 3.
pub const GUN_TIER_SCORES: [u32; 2] = [400, 1000];
pub const SHOOT_COOLDOWN_FRAMES: [f32; 3] = [30.0, 20.0, 12.0];
pub const BULLET_DAMAGE: [u32; 3] = [25, 34, 50];
pub const SHOOT_ANIM_FRAMES: f32 = 10.0;
pub const BULLET_SPEED: f32 = 14.0;
pub const BULLET_SIZE: Vec2 = Vec2::new(12.0, 6.0);

// ── Zombies ──────────────────────────────────────────────────────────────────

pub const ZOMBIE_SIZE: Vec2 = Vec2::new(40.0, 80.0);
pub const ZOMBIE_MAX_HEALTH: u32 = 100;
pub const ZOMBIE_PATROL_SPEED_MIN: f32 = 1.0;
pub const ZOMBIE_PATROL_SPEED_MAX: f32 = 1.6;
pub const ZOMBIE_CHASE_SPEED: f32 = 2.5;
pub const ZOMBIE_CHASE_RANGE: f32 = 320.0;
pub const ZOMBIE_CONTACT_DAMAGE: u32 = 20;
pub const ZOMBIE_DEATH_FRAMES: f32 = 45.0;
pub const ZOMBIE_HEALTH_BAR_FRAMES: f32 = 120.0;
pub const ZOMBIE_KILL_POINTS: u32 = 50;
pub const ZOMBIE_MOAN_MIN_FRAMES: f32 = 240.0;
pub const ZOMBIE_MOAN_MAX_FRAMES: f32 = 600.0;

// ── Hazards ──────────────────────────────────────────────────────────────────

/// Per-source delay between two damage ticks on the player.
pub const CONTACT_COOLDOWN_FRAMES: f32 = 60.0;
pub const SPIKES_DAMAGE: u32 = 20;
pub const SAW_DAMAGE: u32 = 30;
pub const SAW_SIZE: f32 = 64.0;
pub const SAW_SPEED: f32 = 3.0;

// ── Items & puzzles ──────────────────────────────────────────────────────────

pub const ITEM_SIZE: Vec2 = Vec2::new(32.0, 32.0);
pub const HEALTH_PICKUP: u32 = 25;
pub const COIN_POINTS: u32 = 100;

pub const LEVER_ANIM_FRAMES: f32 = 20.0;

// ── Session ──────────────────────────────────────────────────────────────────

pub const LEVEL_SECONDS: u32 = 180;
pub const GAME_COMPLETED_POINTS: u32 = 1000;
