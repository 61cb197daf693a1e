//! Gameplay simulation core for a side-scrolling platformer.
//!
//! The library owns physics, entity state machines, puzzle wiring and the
//! level session; the binary in `main.rs` is only a terminal front-end.

pub mod body;
pub mod camera;
pub mod config;
pub mod constants;
pub mod enemy;
pub mod entities;
pub mod error;
pub mod events;
pub mod geometry;
pub mod hazard;
pub mod input;
pub mod level;
pub mod player;
pub mod puzzle;
pub mod session;
pub mod timer;
pub mod world;
