//! Player controller: locomotion state machine, health, score and gun.

use glam::Vec2;

use crate::body::{approach, is_clear, KinematicBody};
use crate::constants::{
    BULLET_DAMAGE, BULLET_SIZE, BULLET_SPEED, GUN_TIER_SCORES, HURT_FRAMES, HURT_KNOCKBACK,
    JUMP_CUT_SPEED, JUMP_IMPULSE, MAX_GUN_TIER, PLAYER_ACCEL, PLAYER_DECEL, PLAYER_MAX_HEALTH,
    PLAYER_RUN_SPEED, PLAYER_SIZE, PLAYER_SLIDE_HEIGHT, SHOOT_ANIM_FRAMES, SHOOT_COOLDOWN_FRAMES,
    SLIDE_FRAMES, SLIDE_SPEED,
};
use crate::entities::{DeathCause, Facing, Projectile};
use crate::events::GameEvent;
use crate::geometry::Rect;
use crate::input::{Action, ControlBindings, InputFrame};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Run,
    Jump,
    Fall,
    Slide,
    Hurt,
    Dead,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub body: KinematicBody,
    pub state: PlayerState,
    pub facing: Facing,
    pub has_key: bool,
    health: u32,
    score: u32,
    gun_tier: u8,
    gun_upgrades: bool,
    controls: ControlBindings,
    dead_message: Option<DeathCause>,
    /// Collision box is at slide height and still has to stand up.
    crouched: bool,
    slide_timer: f32,
    hurt_timer: f32,
    shoot_cooldown: f32,
    shoot_anim: f32,
}

impl Player {
    pub fn new(spawn: Vec2, controls: ControlBindings, gun_upgrades: bool) -> Self {
        Self {
            body: KinematicBody::new(spawn, PLAYER_SIZE),
            state: PlayerState::Fall,
            facing: Facing::Right,
            has_key: false,
            health: PLAYER_MAX_HEALTH,
            score: 0,
            gun_tier: 1,
            gun_upgrades,
            controls,
            dead_message: None,
            crouched: false,
            slide_timer: 0.0,
            hurt_timer: 0.0,
            shoot_cooldown: 0.0,
            shoot_anim: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    // ── Accessors used by the session ────────────────────────────────────────

    pub fn health(&self) -> u32 {
        self.health
    }

    /// Carry health over from a previous level.
    pub fn keep_health(&mut self, health: u32) {
        self.health = health.min(PLAYER_MAX_HEALTH);
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Carry score over from a previous level.
    pub fn keep_score(&mut self, score: u32) {
        self.score = score;
        self.gun_tier = gun_tier_for(score, self.gun_upgrades);
    }

    pub fn add_score(&mut self, points: u32) {
        self.keep_score(self.score.saturating_add(points));
    }

    /// Restore health, capped at the maximum. Returns the amount gained.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.health;
        self.health = (self.health + amount).min(PLAYER_MAX_HEALTH);
        self.health - before
    }

    pub fn gun_tier(&self) -> u8 {
        self.gun_tier
    }

    /// Progress towards the next gun tier in `0.0..=1.0`.
    pub fn gun_progress(&self) -> f32 {
        if !self.gun_upgrades {
            return 0.0;
        }
        if self.gun_tier >= MAX_GUN_TIER {
            return 1.0;
        }
        let idx = (self.gun_tier - 1) as usize;
        let lower = if idx == 0 { 0 } else { GUN_TIER_SCORES[idx - 1] };
        let upper = GUN_TIER_SCORES[idx];
        (self.score - lower) as f32 / (upper - lower) as f32
    }

    pub fn control_key(&self, action: Action) -> &str {
        self.controls.symbol(action)
    }

    pub fn dead_message(&self) -> Option<DeathCause> {
        self.dead_message
    }

    pub fn is_dead(&self) -> bool {
        self.state == PlayerState::Dead
    }

    pub fn is_invulnerable(&self) -> bool {
        self.hurt_timer > 0.0
    }

    pub fn is_shooting(&self) -> bool {
        self.shoot_anim > 0.0
    }

    pub fn is_crouched(&self) -> bool {
        self.crouched
    }

    // ── Per-frame update ─────────────────────────────────────────────────────

    /// Advance one frame. Returns a projectile when a shot was fired.
    pub fn update(
        &mut self,
        input: &InputFrame,
        solids: &[Rect],
        delta: f32,
        events: &mut Vec<GameEvent>,
    ) -> Option<Projectile> {
        self.shoot_cooldown = (self.shoot_cooldown - delta).max(0.0);
        self.shoot_anim = (self.shoot_anim - delta).max(0.0);
        self.hurt_timer = (self.hurt_timer - delta).max(0.0);

        if self.is_dead() {
            self.body.vel.x = approach(self.body.vel.x, 0.0, PLAYER_DECEL * delta);
            self.body.integrate(delta);
            self.body.move_and_collide(solids, delta);
            return None;
        }

        if input.pressed(Action::Jump) {
            self.jump(solids, events);
        }
        if input.released(Action::Jump) {
            self.jump_cut();
        }
        if input.pressed(Action::Slide) {
            self.slide();
        }

        match self.state {
            PlayerState::Hurt => {
                self.body.vel.x = approach(self.body.vel.x, 0.0, PLAYER_DECEL * 0.25 * delta);
            }
            PlayerState::Slide if self.slide_timer > 0.0 => {
                self.body.vel.x = self.facing.sign() * SLIDE_SPEED;
                self.slide_timer -= delta;
            }
            PlayerState::Slide => {
                // Out of slide time but no head room: crawl.
                let dir = input.horizontal();
                self.body.vel.x = dir * PLAYER_RUN_SPEED * 0.5;
                if dir != 0.0 {
                    self.facing = if dir < 0.0 { Facing::Left } else { Facing::Right };
                }
            }
            _ => {
                let dir = input.horizontal();
                let target = dir * PLAYER_RUN_SPEED;
                let step = if dir != 0.0 { PLAYER_ACCEL } else { PLAYER_DECEL };
                self.body.vel.x = approach(self.body.vel.x, target, step * delta);
                if dir < 0.0 {
                    self.facing = Facing::Left;
                } else if dir > 0.0 {
                    self.facing = Facing::Right;
                }
            }
        }

        self.body.integrate(delta);
        let contacts = self.body.move_and_collide(solids, delta);

        if self.state == PlayerState::Slide && (self.slide_timer <= 0.0 || contacts.hit_wall()) {
            if self.try_stand(solids) {
                self.state = PlayerState::Idle;
            }
        } else if self.crouched && self.state != PlayerState::Slide {
            self.try_stand(solids);
        }

        let shot = if input.held(Action::Shoot) {
            self.try_shoot(events)
        } else {
            None
        };

        self.refresh_state();
        shot
    }


    fn refresh_state(&mut self) {
        match self.state {
            PlayerState::Dead | PlayerState::Slide => {}
            PlayerState::Hurt if self.hurt_timer > 0.0 => {}
            _ => self.state = self.locomotion_state(),
        }
    }

    fn locomotion_state(&self) -> PlayerState {
        if !self.body.grounded {
            if self.body.vel.y < 0.0 {
                PlayerState::Jump
            } else {
                PlayerState::Fall
            }
        } else if self.body.vel.x.abs() > 0.1 {
            PlayerState::Run
        } else {
            PlayerState::Idle
        }
    }

    // ── Actions ──────────────────────────────────────────────────────────────

    /// Jump from the ground. A slide is cancelled if there is head room.
    pub fn jump(&mut self, solids: &[Rect], events: &mut Vec<GameEvent>) -> bool {
        if !self.body.grounded {
            return false;
        }
        if !matches!(self.state, PlayerState::Idle | PlayerState::Run | PlayerState::Slide) {
            return false;
        }
        if !self.try_stand(solids) {
            return false;
        }
        self.body.vel.y = -JUMP_IMPULSE;
        self.body.grounded = false;
        self.state = PlayerState::Jump;
        events.push(GameEvent::Jump);
        true
    }

    /// Releasing jump early truncates the upward speed.
    pub fn jump_cut(&mut self) {
        if self.is_dead() {
            return;
        }
        if self.body.vel.y < -JUMP_CUT_SPEED {
            self.body.vel.y = -JUMP_CUT_SPEED;
        }
    }

    pub fn slide(&mut self) -> bool {
        if !self.body.grounded || !matches!(self.state, PlayerState::Idle | PlayerState::Run) {
            return false;
        }
        self.state = PlayerState::Slide;
        self.slide_timer = SLIDE_FRAMES;
        self.crouched = true;
        self.body.set_height_keep_feet(PLAYER_SLIDE_HEIGHT);
        true
    }

    /// Restore full height if nothing is in the way.
    fn try_stand(&mut self, solids: &[Rect]) -> bool {
        if !self.crouched {
            return true;
        }
        let bottom = self.body.bottom();
        let standing = Rect::from_center(
            Vec2::new(self.body.pos.x, bottom - PLAYER_SIZE.y * 0.5),
            PLAYER_SIZE,
        );
        if !is_clear(&standing, solids) {
            return false;
        }
        self.body.set_height_keep_feet(PLAYER_SIZE.y);
        self.crouched = false;
        true
    }

    fn try_shoot(&mut self, events: &mut Vec<GameEvent>) -> Option<Projectile> {
        if self.gun_tier == 0 || self.shoot_cooldown > 0.0 {
            return None;
        }
        if matches!(self.state, PlayerState::Slide | PlayerState::Hurt) {
            return None;
        }
        let tier = (self.gun_tier - 1) as usize;
        self.shoot_cooldown = SHOOT_COOLDOWN_FRAMES[tier];
        self.shoot_anim = SHOOT_ANIM_FRAMES;
        events.push(GameEvent::Shoot);

        let sign = self.facing.sign();
        let muzzle = Vec2::new(
            sign * (self.body.size.x + BULLET_SIZE.x) * 0.5,
            -self.body.size.y * 0.1,
        );
        Some(Projectile {
            pos: self.body.pos + muzzle,
            vel: Vec2::new(sign * BULLET_SPEED, 0.0),
            damage: BULLET_DAMAGE[tier],
        })
    }

    // ── Damage ───────────────────────────────────────────────────────────────

    /// Apply non-lethal-by-default damage from a source at `source_x`.
    /// Ignored while invulnerable or dead. Returns whether it landed.
    pub fn take_damage(
        &mut self,
        amount: u32,
        cause: DeathCause,
        source_x: f32,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if self.is_dead() || self.is_invulnerable() {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        events.push(GameEvent::PlayerHit { damage: amount });
        if self.health == 0 {
            self.die(cause, events);
            return true;
        }

        self.state = PlayerState::Hurt;
        self.hurt_timer = HURT_FRAMES;
        let away = if self.body.pos.x < source_x { -1.0 } else { 1.0 };
        self.body.vel.x = away * HURT_KNOCKBACK;
        self.body.vel.y = -HURT_KNOCKBACK;
        true
    }

    /// Instant death, regardless of invulnerability.
    pub fn kill(&mut self, cause: DeathCause, events: &mut Vec<GameEvent>) {
        if self.is_dead() {
            return;
        }
        self.health = 0;
        self.die(cause, events);
    }

    fn die(&mut self, cause: DeathCause, events: &mut Vec<GameEvent>) {
        self.state = PlayerState::Dead;
        self.dead_message = Some(cause);
        self.body.vel.x = 0.0;
        events.push(GameEvent::PlayerDeath { cause });
    }
}

fn gun_tier_for(score: u32, upgrades: bool) -> u8 {
    if !upgrades {
        return 1;
    }
    1 + GUN_TIER_SCORES.iter().filter(|&&s| score >= s).count() as u8
}
