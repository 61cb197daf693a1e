//! Puzzle wiring: levers, laser machines and beams, receivers, door switches
//! and doors.
//!
//! The pieces form a directed graph that is resolved once at load:
//!
//! ```text
//! lever ──► laser machine ──► beam ──► receiver ──┐
//! lever ──────────────────────────────────────────┼──► door (AND)
//! door switch ────────────────────────────────────┘
//! ```
//!
//! Every frame the graph is evaluated front to back. A door's open state is
//! the AND of all its inputs and only changes, with an event, on a flip. An
//! open door does not close on a body standing in it; it stays jammed open
//! until the doorway is clear.

use tracing::debug;

use crate::constants::LEVER_ANIM_FRAMES;
use crate::error::LevelError;
use crate::events::GameEvent;
use crate::geometry::Rect;

// ── Pieces ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeverTarget {
    Machine(u32),
    Door(u32),
}

impl LeverTarget {
    /// Parse a comma separated target list: `3`, `machine:3` or `door:1`.
    pub fn parse_list(tag: &str) -> Option<Vec<LeverTarget>> {
        let mut targets = Vec::new();
        for part in tag.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let target = match part.split_once(':') {
                Some(("machine", id)) => LeverTarget::Machine(id.trim().parse().ok()?),
                Some(("door", id)) => LeverTarget::Door(id.trim().parse().ok()?),
                Some(_) => return None,
                None => LeverTarget::Machine(part.parse().ok()?),
            };
            targets.push(target);
        }
        if targets.is_empty() {
            None
        } else {
            Some(targets)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Lever {
    pub rect: Rect,
    pub on: bool,
    pub targets: Vec<LeverTarget>,
    anim: f32,
}

impl Lever {
    pub fn new(rect: Rect, targets: Vec<LeverTarget>) -> Self {
        Self {
            rect,
            on: false,
            targets,
            anim: 0.0,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.anim > 0.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LaserMachine {
    pub id: u32,
    pub rect: Rect,
    pub on: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LaserBeam {
    pub machine: u32,
    pub rect: Rect,
    machine_idx: usize,
}

impl LaserBeam {
    pub fn new(machine: u32, rect: Rect) -> Self {
        Self {
            machine,
            rect,
            machine_idx: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LaserReceiver {
    pub rect: Rect,
    pub door: u32,
    /// Machine state a crossing beam must have for this receiver to count.
    pub required_on: bool,
    pub satisfied: bool,
    beams: Vec<usize>,
}

impl LaserReceiver {
    pub fn new(rect: Rect, door: u32, required_on: bool) -> Self {
        Self {
            rect,
            door,
            required_on,
            satisfied: false,
            beams: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DoorSwitch {
    pub rect: Rect,
    pub door: u32,
    pub unlocked: bool,
}

impl DoorSwitch {
    pub fn new(rect: Rect, door: u32) -> Self {
        Self {
            rect,
            door,
            unlocked: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchOutcome {
    Unlocked,
    /// Pressed without a key.
    Failed,
    AlreadyUnlocked,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct DoorInputs {
    receivers: Vec<usize>,
    levers: Vec<usize>,
    switches: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Door {
    pub rect: Rect,
    pub group: u32,
    pub open: bool,
    inputs: DoorInputs,
}

impl Door {
    pub fn new(rect: Rect, group: u32) -> Self {
        Self {
            rect,
            group,
            open: false,
            inputs: DoorInputs::default(),
        }
    }
}

/// Unresolved pieces as spawned from a level.
#[derive(Clone, Debug, Default)]
pub struct PuzzleParts {
    pub levers: Vec<Lever>,
    pub machines: Vec<LaserMachine>,
    pub beams: Vec<LaserBeam>,
    pub receivers: Vec<LaserReceiver>,
    pub switches: Vec<DoorSwitch>,
    pub doors: Vec<Door>,
}

// ── Graph ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct PuzzleGraph {
    levers: Vec<Lever>,
    machines: Vec<LaserMachine>,
    beams: Vec<LaserBeam>,
    receivers: Vec<LaserReceiver>,
    switches: Vec<DoorSwitch>,
    doors: Vec<Door>,
}

impl PuzzleGraph {
    /// Resolve every reference and reject wiring that could never work.
    pub fn build(level: &str, parts: PuzzleParts) -> Result<Self, LevelError> {
        let PuzzleParts {
            levers,
            machines,
            mut beams,
            mut receivers,
            switches,
            mut doors,
        } = parts;

        for (i, m) in machines.iter().enumerate() {
            if machines[..i].iter().any(|other| other.id == m.id) {
                return Err(LevelError::DuplicateMachine {
                    level: level.to_string(),
                    machine: m.id,
                });
            }
        }
        let machine_index = |id: u32, source: &str| {
            machines
                .iter()
                .position(|m| m.id == id)
                .ok_or_else(|| LevelError::UnknownMachine {
                    level: level.to_string(),
                    source_name: source.to_string(),
                    machine: id,
                })
        };
        let has_door = |group: u32| doors.iter().any(|d| d.group == group);
        let unknown_door = |group: u32, source: &str| LevelError::UnknownDoor {
            level: level.to_string(),
            source_name: source.to_string(),
            door: group,
        };

        for beam in beams.iter_mut() {
            beam.machine_idx = machine_index(beam.machine, "laser_beam")?;
        }
        for lever in &levers {
            for target in &lever.targets {
                match *target {
                    LeverTarget::Machine(id) => {
                        machine_index(id, "lever")?;
                    }
                    LeverTarget::Door(group) if !has_door(group) => {
                        return Err(unknown_door(group, "lever"));
                    }
                    LeverTarget::Door(_) => {}
                }
            }
        }
        for receiver in receivers.iter_mut() {
            if !has_door(receiver.door) {
                return Err(unknown_door(receiver.door, "laser_receiver"));
            }
            receiver.beams = beams
                .iter()
                .enumerate()
                .filter(|(_, b)| b.rect.overlaps(&receiver.rect))
                .map(|(i, _)| i)
                .collect();
            if receiver.beams.is_empty() {
                return Err(LevelError::UnreachableReceiver {
                    level: level.to_string(),
                    door: receiver.door,
                });
            }
        }
        for switch in &switches {
            if !has_door(switch.door) {
                return Err(unknown_door(switch.door, "door_switch"));
            }
        }

        for door in doors.iter_mut() {
            let group = door.group;
            door.inputs = DoorInputs {
                receivers: indices(&receivers, |r| r.door == group),
                levers: indices(&levers, |l| l.targets.contains(&LeverTarget::Door(group))),
                switches: indices(&switches, |s| s.door == group),
            };
            if door.inputs == DoorInputs::default() {
                return Err(LevelError::UnwiredDoor {
                    level: level.to_string(),
                    door: group,
                });
            }
        }

        let mut graph = Self {
            levers,
            machines,
            beams,
            receivers,
            switches,
            doors,
        };
        // Initial state is settled silently.
        graph.evaluate(&[], &mut Vec::new());
        Ok(graph)
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn levers(&self) -> &[Lever] {
        &self.levers
    }

    pub fn machines(&self) -> &[LaserMachine] {
        &self.machines
    }

    pub fn beams(&self) -> &[LaserBeam] {
        &self.beams
    }

    pub fn receivers(&self) -> &[LaserReceiver] {
        &self.receivers
    }

    pub fn switches(&self) -> &[DoorSwitch] {
        &self.switches
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    pub fn machine_on(&self, id: u32) -> Option<bool> {
        self.machines.iter().find(|m| m.id == id).map(|m| m.on)
    }

    pub fn door_open(&self, group: u32) -> Option<bool> {
        self.doors.iter().find(|d| d.group == group).map(|d| d.open)
    }

    /// Beams whose machine is on. Only these exist in the world.
    pub fn active_beams(&self) -> impl Iterator<Item = &LaserBeam> {
        self.beams.iter().filter(|b| self.machines[b.machine_idx].on)
    }

    /// Closed doors block movement like ground.
    pub fn closed_door_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.doors.iter().filter(|d| !d.open).map(|d| d.rect)
    }

    pub fn lever_at(&self, rect: &Rect) -> Option<usize> {
        self.levers.iter().position(|l| l.rect.overlaps(rect))
    }

    pub fn switch_at(&self, rect: &Rect) -> Option<usize> {
        self.switches.iter().position(|s| s.rect.overlaps(rect))
    }

    // ── Signals ──────────────────────────────────────────────────────────────

    /// Toggle a lever and every machine bound to it. Ignored while the lever
    /// is still animating from the previous pull.
    pub fn pull_lever(&mut self, idx: usize, events: &mut Vec<GameEvent>) -> bool {
        let Some(lever) = self.levers.get_mut(idx) else {
            return false;
        };
        if lever.is_animating() {
            return false;
        }
        lever.on = !lever.on;
        lever.anim = LEVER_ANIM_FRAMES;
        events.push(GameEvent::LeverPulled);
        debug!(lever = idx, on = lever.on, "lever pulled");

        for target in lever.targets.clone() {
            if let LeverTarget::Machine(id) = target {
                if let Some(machine) = self.machines.iter_mut().find(|m| m.id == id) {
                    machine.on = !machine.on;
                    events.push(if machine.on {
                        GameEvent::LaserOn
                    } else {
                        GameEvent::LaserOff
                    });
                    debug!(machine = id, on = machine.on, "laser machine toggled");
                }
            }
        }
        true
    }

    /// Press a door switch. A key is consumed on success.
    pub fn press_switch(
        &mut self,
        idx: usize,
        has_key: &mut bool,
        events: &mut Vec<GameEvent>,
    ) -> SwitchOutcome {
        let Some(switch) = self.switches.get_mut(idx) else {
            return SwitchOutcome::Failed;
        };
        if switch.unlocked {
            return SwitchOutcome::AlreadyUnlocked;
        }
        if !*has_key {
            events.push(GameEvent::SwitchFail);
            return SwitchOutcome::Failed;
        }
        *has_key = false;
        switch.unlocked = true;
        events.push(GameEvent::SwitchSuccess);
        debug!(door = switch.door, "door switch unlocked");
        SwitchOutcome::Unlocked
    }

    /// Advance lever animations, then re-evaluate receivers and doors.
    /// `occupied` holds the bodies a closing door must not shut on.
    pub fn update(&mut self, delta: f32, occupied: &[Rect], events: &mut Vec<GameEvent>) {
        for lever in self.levers.iter_mut() {
            lever.anim = (lever.anim - delta).max(0.0);
        }
        self.evaluate(occupied, events);
    }

    fn evaluate(&mut self, occupied: &[Rect], events: &mut Vec<GameEvent>) {
        for receiver in self.receivers.iter_mut() {
            receiver.satisfied = receiver.beams.iter().any(|&b| {
                self.machines[self.beams[b].machine_idx].on == receiver.required_on
            });
        }

        for door in self.doors.iter_mut() {
            let inputs = &door.inputs;
            let open = inputs.receivers.iter().all(|&r| self.receivers[r].satisfied)
                && inputs.levers.iter().all(|&l| self.levers[l].on)
                && inputs.switches.iter().all(|&s| self.switches[s].unlocked);
            if open == door.open {
                continue;
            }
            if !open && occupied.iter().any(|r| r.overlaps(&door.rect)) {
                continue;
            }
            door.open = open;
            debug!(door = door.group, open, "door changed");
            events.push(if open {
                GameEvent::DoorOpened { door: door.group }
            } else {
                GameEvent::DoorClosed { door: door.group }
            });
        }
    }
}

fn indices<T>(items: &[T], pred: impl Fn(&T) -> bool) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| pred(item))
        .map(|(i, _)| i)
        .collect()
}
