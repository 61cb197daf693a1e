//! One level's live entities and the per-frame simulation step.
//!
//! Entities of one type update in spawn order. Anything that would add to or
//! remove from a collection during the step (shots fired, spent bullets,
//! picked-up items, finished zombie corpses) is collected first and applied
//! at the end, so no collection changes while it is being walked.

use glam::Vec2;
use rand::Rng;
use tracing::{debug, info};

use crate::config::SimConfig;
use crate::constants::{COIN_POINTS, HEALTH_PICKUP, ZOMBIE_KILL_POINTS};
use crate::enemy::Zombie;
use crate::entities::{DeathCause, Exit, Item, ItemKind, Projectile};
use crate::error::LevelError;
use crate::events::GameEvent;
use crate::geometry::{CollisionWorld, Rect};
use crate::hazard::Hazard;
use crate::input::{Action, InputFrame};
use crate::level::{LevelData, LevelLayout};
use crate::player::Player;
use crate::puzzle::PuzzleGraph;

/// A level that passed every load-time check. Spawning from it cannot fail.
#[derive(Clone, Debug)]
pub struct LevelPlan {
    name: String,
    layout: LevelLayout,
    puzzle: PuzzleGraph,
}

impl LevelPlan {
    pub fn new(level: &LevelData) -> Result<Self, LevelError> {
        let mut layout = level.layout()?;
        let puzzle = PuzzleGraph::build(&level.name, std::mem::take(&mut layout.puzzle))?;
        Ok(Self {
            name: level.name.clone(),
            layout,
            puzzle,
        })
    }
}

#[derive(Clone, Debug)]
pub struct World {
    pub name: String,
    pub size: Vec2,
    pub collision: CollisionWorld,
    pub player: Player,
    pub zombies: Vec<Zombie>,
    pub hazards: Vec<Hazard>,
    pub puzzle: PuzzleGraph,
    pub items: Vec<Item>,
    pub projectiles: Vec<Projectile>,
    pub exits: Vec<Exit>,
    static_solids: Vec<Rect>,
    level_up: bool,
}

impl World {
    /// Check `level` and spawn it.
    pub fn build(
        level: &LevelData,
        config: &SimConfig,
        rng: &mut impl Rng,
    ) -> Result<Self, LevelError> {
        Ok(Self::spawn(&LevelPlan::new(level)?, config, rng))
    }

    /// Spawn every entity of `plan`. The player starts fresh; carrying
    /// health and score over is up to the caller.
    pub fn spawn(plan: &LevelPlan, config: &SimConfig, rng: &mut impl Rng) -> Self {
        let layout = &plan.layout;
        let collision = CollisionWorld::new(layout.obstacles.clone());
        let zombies = layout
            .zombies
            .iter()
            .map(|&spawn| Zombie::new(spawn, &collision, rng))
            .collect::<Vec<_>>();
        let player = Player::new(
            layout.player_spawn,
            config.controls.clone(),
            config.gun_upgrade_on,
        );

        info!(
            level = %plan.name,
            zombies = zombies.len(),
            hazards = layout.hazards.len(),
            items = layout.items.len(),
            doors = plan.puzzle.doors().len(),
            "level spawned"
        );

        Self {
            name: plan.name.clone(),
            size: layout.size,
            static_solids: collision.solid_rects(),
            collision,
            player,
            zombies,
            hazards: layout.hazards.clone(),
            puzzle: plan.puzzle.clone(),
            items: layout.items.clone(),
            projectiles: Vec::new(),
            exits: layout.exits.clone(),
            level_up: false,
        }
    }

    /// Whether the level-complete signal has been raised.
    pub fn level_up(&self) -> bool {
        self.level_up
    }

    pub fn signal_level_up(&mut self) {
        self.level_up = true;
    }

    /// Ground, screen limits and currently closed doors.
    pub fn solids(&self) -> Vec<Rect> {
        let mut solids = self.static_solids.clone();
        solids.extend(self.puzzle.closed_door_rects());
        solids
    }

    /// Run one simulation step.
    pub fn step(
        &mut self,
        input: &InputFrame,
        delta: f32,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) {
        let solids = self.solids();
        let fired = self.player.update(input, &solids, delta, events);

        if !self.player.is_dead() {
            self.interact(input, events);
        }
        let occupied = self.body_rects();
        self.puzzle.update(delta, &occupied, events);
        let solids = self.solids();

        for zombie in self.zombies.iter_mut() {
            zombie.update(&mut self.player, &solids, delta, rng, events);
        }
        for hazard in self.hazards.iter_mut() {
            hazard.update(&mut self.player, delta, events);
        }
        let player_rect = self.player.rect();
        if !self.player.is_dead()
            && self.puzzle.active_beams().any(|b| b.rect.overlaps(&player_rect))
        {
            self.player.kill(DeathCause::Laser, events);
        }

        self.step_projectiles(&solids, delta, events);
        self.collect_items(events);

        if !self.player.is_dead() {
            let player_rect = self.player.rect();
            if self.exits.iter().any(|e| e.rect.overlaps(&player_rect)) {
                self.level_up = true;
            }
        }

        self.projectiles.extend(fired);
        self.zombies.retain(|z| !z.is_removable());
    }

    /// Player and zombie collision boxes.
    fn body_rects(&self) -> Vec<Rect> {
        std::iter::once(self.player.rect())
            .chain(self.zombies.iter().map(|z| z.rect()))
            .collect()
    }

    fn interact(&mut self, input: &InputFrame, events: &mut Vec<GameEvent>) {
        let rect = self.player.rect();
        if input.pressed(Action::Interact) {
            if let Some(idx) = self.puzzle.lever_at(&rect) {
                self.puzzle.pull_lever(idx, events);
            }
        }
        if input.pressed(Action::Open) {
            if let Some(idx) = self.puzzle.switch_at(&rect) {
                self.puzzle.press_switch(idx, &mut self.player.has_key, events);
            }
        }
    }

    fn step_projectiles(&mut self, solids: &[Rect], delta: f32, events: &mut Vec<GameEvent>) {
        let bounds = Rect {
            pos: Vec2::ZERO,
            size: self.size,
        };
        let mut spent = vec![false; self.projectiles.len()];

        for (i, shot) in self.projectiles.iter_mut().enumerate() {
            let from = shot.rect();
            let step = shot.vel * delta;
            let swept = from.union(&from.translated(step));
            let heading = shot.vel.x.signum();
            let distance = |target: &Rect| {
                if heading >= 0.0 {
                    target.left() - from.right()
                } else {
                    from.left() - target.right()
                }
            };

            let wall = solids
                .iter()
                .filter(|s| s.overlaps(&swept))
                .map(|s| distance(s))
                .fold(None, |best: Option<f32>, d| Some(best.map_or(d, |b| b.min(d))));
            let victim = self
                .zombies
                .iter()
                .enumerate()
                .filter(|(_, z)| z.is_alive() && z.rect().overlaps(&swept))
                .map(|(zi, z)| (zi, distance(&z.rect())))
                .min_by(|a, b| a.1.total_cmp(&b.1));

            match (victim, wall) {
                (Some((zi, zd)), w) if w.map_or(true, |wd| zd <= wd) => {
                    spent[i] = true;
                    if self.zombies[zi].take_hit(shot.damage, events) {
                        self.player.add_score(ZOMBIE_KILL_POINTS);
                    }
                }
                (_, Some(_)) => spent[i] = true,
                _ => {
                    shot.pos += step;
                    if !shot.rect().overlaps(&bounds) {
                        spent[i] = true;
                    }
                }
            }
        }

        let mut spent = spent.into_iter();
        self.projectiles.retain(|_| !spent.next().unwrap_or(true));
    }

    fn collect_items(&mut self, events: &mut Vec<GameEvent>) {
        if self.player.is_dead() {
            return;
        }
        let player_rect = self.player.rect();
        let (taken, kept): (Vec<Item>, Vec<Item>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| item.rect().overlaps(&player_rect));
        self.items = kept;

        for item in taken {
            match item.kind {
                ItemKind::Health => {
                    self.player.heal(HEALTH_PICKUP);
                }
                ItemKind::Coin => self.player.add_score(COIN_POINTS),
                ItemKind::Key => self.player.has_key = true,
            }
            debug!(kind = ?item.kind, "item picked up");
            events.push(GameEvent::Pickup(item.kind));
        }
    }
}
