//! Level session orchestrator.
//!
//! Owns the current level's `World`, the countdown, the camera and the RNG.
//! Every level is checked up front, so a broken map fails `Session::new`
//! instead of surfacing halfway through a run. Each level entry, restarts
//! included, spawns a fresh world from its plan with the session RNG.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::body::clamp_delta;
use crate::camera::Camera;
use crate::config::SimConfig;
use crate::constants::GAME_COMPLETED_POINTS;
use crate::entities::{DeathCause, GameStatus};
use crate::error::LevelError;
use crate::events::GameEvent;
use crate::input::InputFrame;
use crate::level::LevelData;
use crate::player::Player;
use crate::timer::GameTimer;
use crate::world::{LevelPlan, World};

pub struct Session {
    config: SimConfig,
    /// Checked levels, in play order.
    plans: Vec<LevelPlan>,
    level_index: usize,
    world: World,
    timer: GameTimer,
    camera: Camera,
    status: GameStatus,
    paused: bool,
    rng: StdRng,
    events: Vec<GameEvent>,
}

impl Session {
    pub fn new(config: SimConfig, levels: Vec<LevelData>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::NoLevels);
        }
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let plans = levels
            .iter()
            .map(LevelPlan::new)
            .collect::<Result<Vec<_>, _>>()?;
        info!(levels = plans.len(), "session created");

        let world = World::spawn(&plans[0], &config, &mut rng);
        let mut session = Self {
            camera: Camera::new(world.size, config.viewport),
            timer: GameTimer::new(config.level_seconds),
            config,
            plans,
            level_index: 0,
            world,
            status: GameStatus::Playing,
            paused: false,
            rng,
            events: Vec::new(),
        };
        session.begin_level();
        Ok(session)
    }

    // ── Frame ────────────────────────────────────────────────────────────────

    /// Advance the session by one rendered frame.
    pub fn frame(&mut self, elapsed: Duration, input: &InputFrame) {
        let delta = clamp_delta(elapsed);

        if self.is_running() {
            if self.timer.advance(delta) {
                self.world.player.kill(DeathCause::TimeUp, &mut self.events);
                self.game_over(DeathCause::TimeUp);
            } else {
                self.world.step(input, delta, &mut self.rng, &mut self.events);
                self.resolve_step();
            }
        }

        self.camera.update(self.world.player.body.pos);
    }

    fn is_running(&self) -> bool {
        !self.paused && self.status == GameStatus::Playing
    }

    fn resolve_step(&mut self) {
        if let Some(cause) = self.world.player.dead_message() {
            self.game_over(cause);
        } else if self.world.level_up() {
            self.level_complete();
        }
    }

    fn game_over(&mut self, cause: DeathCause) {
        info!(
            level = self.level_number(),
            score = self.world.player.score(),
            cause = cause.message(),
            "game over"
        );
        self.status = GameStatus::GameOver(cause);
        self.events.push(GameEvent::GameOver { cause });
    }

    fn level_complete(&mut self) {
        let finished = self.level_number();
        self.events.push(GameEvent::LevelComplete { level: finished });

        let next = self.level_index + 1;
        if next < self.plans.len() {
            let carried = (self.world.player.health(), self.world.player.score());
            info!(
                from = finished,
                health = carried.0,
                score = carried.1,
                "level complete"
            );
            self.start_level(next, Some(carried));
            return;
        }

        self.world.player.add_score(GAME_COMPLETED_POINTS);
        let final_score = self.world.player.score();
        info!(final_score, "game completed");
        self.status = GameStatus::Completed;
        self.events.push(GameEvent::GameCompleted { final_score });
    }

    /// Spawn level `index` afresh, optionally threading health and score
    /// from the player that just finished.
    fn start_level(&mut self, index: usize, carried: Option<(u32, u32)>) {
        let mut world = World::spawn(&self.plans[index], &self.config, &mut self.rng);
        if let Some((health, score)) = carried {
            world.player.keep_health(health);
            world.player.keep_score(score);
        }
        self.level_index = index;
        self.world = world;
        self.begin_level();
    }

    fn begin_level(&mut self) {
        self.camera = Camera::new(self.world.size, self.config.viewport);
        self.camera.update(self.world.player.body.pos);
        self.timer.set(self.config.level_seconds);
        self.events.push(GameEvent::LevelStart {
            level: self.level_number(),
        });
    }

    // ── Control ──────────────────────────────────────────────────────────────

    /// Raise the level-complete signal; it is acted on after the next step.
    pub fn signal_level_up(&mut self) {
        self.world.signal_level_up();
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Start over from the first level with a fresh player.
    pub fn restart(&mut self) {
        info!("session restarted");
        self.status = GameStatus::Playing;
        self.paused = false;
        self.start_level(0, None);
    }

    /// Drain the feedback events raised since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn player(&self) -> &Player {
        &self.world.player
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn timer(&self) -> &GameTimer {
        &self.timer
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_over(&self) -> bool {
        self.status != GameStatus::Playing
    }

    /// One-based number of the level being played.
    pub fn level_number(&self) -> usize {
        self.level_index + 1
    }

    pub fn level_count(&self) -> usize {
        self.plans.len()
    }

    pub fn final_score(&self) -> u32 {
        self.world.player.score()
    }
}
