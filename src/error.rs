//! Error types. Level errors are raised once at load; frame logic never fails.

use thiserror::Error;

use crate::input::Action;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("no levels supplied")]
    NoLevels,

    #[error("level '{level}': no player spawn point")]
    MissingPlayerSpawn { level: String },

    #[error("level '{level}': more than one player spawn point")]
    DuplicatePlayerSpawn { level: String },

    #[error("level '{level}': invalid size {width}x{height}")]
    InvalidDimensions { level: String, width: f32, height: f32 },

    #[error("level '{level}': object '{name}' has unresolvable type '{tag}'")]
    InvalidObjectType { level: String, name: String, tag: String },

    #[error("level '{level}': object '{name}' needs an id")]
    MissingId { level: String, name: String },

    #[error("level '{level}': object '{name}' has a non-positive size")]
    DegenerateObject { level: String, name: String },

    #[error("level '{level}': laser machine id {machine} is used twice")]
    DuplicateMachine { level: String, machine: u32 },

    #[error("level '{level}': {source_name} references laser machine {machine} which does not exist")]
    UnknownMachine { level: String, source_name: String, machine: u32 },

    #[error("level '{level}': {source_name} references door group {door} which has no door")]
    UnknownDoor { level: String, source_name: String, door: u32 },

    #[error("level '{level}': laser receiver for door group {door} is not crossed by any beam")]
    UnreachableReceiver { level: String, door: u32 },

    #[error("level '{level}': door group {door} has no receiver, lever or switch")]
    UnwiredDoor { level: String, door: u32 },

    #[error("failed to parse level data: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("key '{symbol}' is already bound to {action:?}")]
    KeyInUse { symbol: String, action: Action },

    #[error("key '{0}' cannot be bound")]
    KeyNotAllowed(String),
}
