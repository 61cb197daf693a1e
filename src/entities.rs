//! Small entity types shared across modules. Mostly data.

use glam::Vec2;

use crate::constants::{BULLET_SIZE, ITEM_SIZE};
use crate::geometry::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flipped(&self) -> Facing {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver(DeathCause),
    /// Final level finished.
    Completed,
}

// ── Death ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathCause {
    Acid,
    Saw,
    Spikes,
    Zombies,
    Laser,
    TimeUp,
}

impl DeathCause {
    /// End-of-level message.
    pub fn message(&self) -> &'static str {
        match self {
            DeathCause::Acid => "Avoid acid",
            DeathCause::Saw => "Avoid saw",
            DeathCause::Spikes => "Avoid spikes",
            DeathCause::Zombies => "Avoid zombies",
            DeathCause::Laser => "Avoid laser",
            DeathCause::TimeUp => "Time is up",
        }
    }
}

// ── Items ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    Health,
    Coin,
    Key,
}

impl ItemKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "health" => Some(ItemKind::Health),
            "coin" => Some(ItemKind::Coin),
            "key" => Some(ItemKind::Key),
            _ => None,
        }
    }
}

/// Collectible, removed from the world on first touch.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub pos: Vec2,
    pub kind: ItemKind,
}

impl Item {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, ITEM_SIZE)
    }
}

/// Touching it finishes the level.
#[derive(Clone, Debug, PartialEq)]
pub struct Exit {
    pub rect: Rect,
}

// ── Projectiles ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: u32,
}

impl Projectile {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, BULLET_SIZE)
    }
}
