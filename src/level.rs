//! Level data: the authored object list and its load-time interpretation.
//!
//! Each object's `name` picks a `SpawnKind` once, at load. Names the game does
//! not know are skipped so maps can carry extra authoring data, but a known
//! name with a bad `type` or a missing `id` is a hard error.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::entities::{Exit, Item, ItemKind};
use crate::error::LevelError;
use crate::geometry::{Obstacle, ObstacleKind, Rect};
use crate::hazard::{Hazard, SawMotion};
use crate::puzzle::{
    Door, DoorSwitch, LaserBeam, LaserMachine, LaserReceiver, Lever, LeverTarget, PuzzleGraph,
    PuzzleParts,
};

// ── Raw data ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
}

impl MapObject {
    pub fn new(name: &str, kind: &str, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            x,
            y,
            width,
            height,
            id: None,
        }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub name: String,
    /// Level size in pixels.
    pub width: f32,
    pub height: f32,
    pub objects: Vec<MapObject>,
}

// ── Spawn dispatch ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum SpawnKind {
    Player,
    Obstacle(ObstacleKind),
    Zombie,
    Acid,
    Spikes,
    Saw(SawMotion),
    LaserMachine { id: u32, on: bool },
    LaserBeam { machine: u32 },
    LaserReceiver { door: u32, required_on: bool },
    Door { group: u32 },
    DoorSwitch { door: u32 },
    Lever { targets: Vec<LeverTarget> },
    Item(ItemKind),
    Exit,
}

impl SpawnKind {
    /// `Ok(None)` for names the game does not use.
    pub fn resolve(level: &str, obj: &MapObject) -> Result<Option<SpawnKind>, LevelError> {
        let bad_type = || LevelError::InvalidObjectType {
            level: level.to_string(),
            name: obj.name.clone(),
            tag: obj.kind.clone(),
        };
        let id = || {
            obj.id.ok_or_else(|| LevelError::MissingId {
                level: level.to_string(),
                name: obj.name.clone(),
            })
        };

        let kind = match obj.name.as_str() {
            "player" => SpawnKind::Player,
            "zombie" => SpawnKind::Zombie,
            "exit" => SpawnKind::Exit,
            "obstacle" => SpawnKind::Obstacle(ObstacleKind::parse(&obj.kind).ok_or_else(bad_type)?),
            "acid" => SpawnKind::Acid,
            "spikes" => SpawnKind::Spikes,
            "saw" => SpawnKind::Saw(SawMotion::parse(&obj.kind, &obj.rect()).ok_or_else(bad_type)?),
            "laser_machine" => SpawnKind::LaserMachine {
                id: id()?,
                on: parse_on_off(&obj.kind).ok_or_else(bad_type)?,
            },
            "laser_beam" => SpawnKind::LaserBeam { machine: id()? },
            "laser_receiver" => SpawnKind::LaserReceiver {
                door: id()?,
                required_on: parse_on_off(&obj.kind).ok_or_else(bad_type)?,
            },
            "door" => SpawnKind::Door { group: id()? },
            "door_switch" => SpawnKind::DoorSwitch { door: id()? },
            "lever" => SpawnKind::Lever {
                targets: LeverTarget::parse_list(&obj.kind).ok_or_else(bad_type)?,
            },
            other => match ItemKind::parse(other) {
                Some(item) => SpawnKind::Item(item),
                None => return Ok(None),
            },
        };

        if kind.needs_area() && (obj.width <= 0.0 || obj.height <= 0.0) {
            return Err(LevelError::DegenerateObject {
                level: level.to_string(),
                name: obj.name.clone(),
            });
        }
        Ok(Some(kind))
    }

    /// Point spawns (player, zombies, items) may be authored with no size.
    fn needs_area(&self) -> bool {
        !matches!(self, SpawnKind::Player | SpawnKind::Zombie | SpawnKind::Item(_))
    }
}

fn parse_on_off(tag: &str) -> Option<bool> {
    match tag {
        "" | "on" => Some(true),
        "off" => Some(false),
        _ => None,
    }
}

// ── Layout ───────────────────────────────────────────────────────────────────

/// A level sorted into the entity collections it spawns, in authoring order.
#[derive(Clone, Debug)]
pub struct LevelLayout {
    pub size: Vec2,
    pub player_spawn: Vec2,
    pub obstacles: Vec<Obstacle>,
    pub zombies: Vec<Vec2>,
    pub hazards: Vec<Hazard>,
    pub puzzle: PuzzleParts,
    pub items: Vec<Item>,
    pub exits: Vec<Exit>,
}

impl LevelData {
    pub fn from_json(text: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn layout(&self) -> Result<LevelLayout, LevelError> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(LevelError::InvalidDimensions {
                level: self.name.clone(),
                width: self.width,
                height: self.height,
            });
        }

        let mut player_spawn: Option<Vec2> = None;
        let mut layout = LevelLayout {
            size: self.size(),
            player_spawn: Vec2::ZERO,
            obstacles: Vec::new(),
            zombies: Vec::new(),
            hazards: Vec::new(),
            puzzle: PuzzleParts::default(),
            items: Vec::new(),
            exits: Vec::new(),
        };

        for obj in &self.objects {
            let Some(kind) = SpawnKind::resolve(&self.name, obj)? else {
                debug!(level = %self.name, name = %obj.name, "ignoring unknown map object");
                continue;
            };
            let rect = obj.rect();
            match kind {
                SpawnKind::Player => {
                    if player_spawn.is_some() {
                        return Err(LevelError::DuplicatePlayerSpawn {
                            level: self.name.clone(),
                        });
                    }
                    player_spawn = Some(obj.center());
                }
                SpawnKind::Obstacle(kind) => layout.obstacles.push(Obstacle { rect, kind }),
                SpawnKind::Zombie => layout.zombies.push(obj.center()),
                SpawnKind::Acid => layout.hazards.push(Hazard::acid(rect)),
                SpawnKind::Spikes => layout.hazards.push(Hazard::spikes(rect)),
                SpawnKind::Saw(motion) => layout.hazards.push(Hazard::saw(rect, motion)),
                SpawnKind::LaserMachine { id, on } => {
                    layout.puzzle.machines.push(LaserMachine { id, rect, on })
                }
                SpawnKind::LaserBeam { machine } => {
                    layout.puzzle.beams.push(LaserBeam::new(machine, rect))
                }
                SpawnKind::LaserReceiver { door, required_on } => layout
                    .puzzle
                    .receivers
                    .push(LaserReceiver::new(rect, door, required_on)),
                SpawnKind::Door { group } => layout.puzzle.doors.push(Door::new(rect, group)),
                SpawnKind::DoorSwitch { door } => {
                    layout.puzzle.switches.push(DoorSwitch::new(rect, door))
                }
                SpawnKind::Lever { targets } => {
                    layout.puzzle.levers.push(Lever::new(rect, targets))
                }
                SpawnKind::Item(kind) => layout.items.push(Item {
                    pos: obj.center(),
                    kind,
                }),
                SpawnKind::Exit => layout.exits.push(Exit { rect }),
            }
        }

        layout.player_spawn = player_spawn.ok_or_else(|| LevelError::MissingPlayerSpawn {
            level: self.name.clone(),
        })?;
        Ok(layout)
    }

    /// Run every load-time check without keeping the result.
    pub fn validate(&self) -> Result<(), LevelError> {
        let layout = self.layout()?;
        PuzzleGraph::build(&self.name, layout.puzzle)?;
        info!(
            level = %self.name,
            objects = self.objects.len(),
            zombies = layout.zombies.len(),
            "level validated"
        );
        Ok(())
    }
}
