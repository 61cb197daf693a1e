//! Discrete feedback events raised during a frame.
//!
//! The presentation layer maps these to sounds and effects. The core only
//! appends to the buffer; it never waits on whoever consumes them.

use crate::entities::{DeathCause, ItemKind};

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    LevelStart { level: usize },
    LevelComplete { level: usize },
    GameCompleted { final_score: u32 },
    GameOver { cause: DeathCause },

    Jump,
    Shoot,
    PlayerHit { damage: u32 },
    PlayerDeath { cause: DeathCause },

    EnemyHit,
    EnemyDeath,
    ZombieMoan,

    Pickup(ItemKind),

    LeverPulled,
    LaserOn,
    LaserOff,
    SwitchSuccess,
    SwitchFail,
    DoorOpened { door: u32 },
    DoorClosed { door: u32 },
}
