//! Zombie controller: patrol between boundaries, chase, contact attack, death.

use glam::Vec2;
use rand::Rng;
use tracing::warn;

use crate::body::KinematicBody;
use crate::constants::{
    CONTACT_COOLDOWN_FRAMES, ZOMBIE_CHASE_RANGE, ZOMBIE_CHASE_SPEED, ZOMBIE_CONTACT_DAMAGE,
    ZOMBIE_DEATH_FRAMES, ZOMBIE_HEALTH_BAR_FRAMES, ZOMBIE_MAX_HEALTH, ZOMBIE_MOAN_MAX_FRAMES,
    ZOMBIE_MOAN_MIN_FRAMES, ZOMBIE_PATROL_SPEED_MAX, ZOMBIE_PATROL_SPEED_MIN, ZOMBIE_SIZE,
};
use crate::entities::{DeathCause, Facing};
use crate::events::GameEvent;
use crate::geometry::{CollisionWorld, Rect};
use crate::player::Player;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZombieState {
    Patrol,
    Chase,
    Attack,
    Dead,
}

#[derive(Clone, Debug)]
pub struct Zombie {
    pub body: KinematicBody,
    pub state: ZombieState,
    pub facing: Facing,
    pub health: u32,
    /// Patrol limits as x coordinates of the flanking boundaries.
    pub left_bound: Option<f32>,
    pub right_bound: Option<f32>,
    patrol_speed: f32,
    contact_cooldown: f32,
    death_timer: f32,
    health_bar_timer: f32,
    moan_timer: f32,
}

impl Zombie {
    pub fn new(spawn: Vec2, world: &CollisionWorld, rng: &mut impl Rng) -> Self {
        let body = KinematicBody::new(spawn, ZOMBIE_SIZE);
        let (left_bound, right_bound) = world.patrol_bounds(&body.rect());
        if left_bound.is_none() || right_bound.is_none() {
            warn!(
                x = spawn.x,
                y = spawn.y,
                "zombie is missing a patrol boundary, walls will turn it"
            );
        }
        let facing = if rng.gen_bool(0.5) { Facing::Left } else { Facing::Right };
        Self {
            body,
            state: ZombieState::Patrol,
            facing,
            health: ZOMBIE_MAX_HEALTH,
            left_bound,
            right_bound,
            patrol_speed: rng.gen_range(ZOMBIE_PATROL_SPEED_MIN..=ZOMBIE_PATROL_SPEED_MAX),
            contact_cooldown: 0.0,
            death_timer: ZOMBIE_DEATH_FRAMES,
            health_bar_timer: 0.0,
            moan_timer: rng.gen_range(ZOMBIE_MOAN_MIN_FRAMES..ZOMBIE_MOAN_MAX_FRAMES),
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn is_alive(&self) -> bool {
        self.state != ZombieState::Dead
    }

    /// Dead and finished its death animation.
    pub fn is_removable(&self) -> bool {
        self.state == ZombieState::Dead && self.death_timer <= 0.0
    }

    /// The health bar only shows for a while after a hit.
    pub fn health_bar_visible(&self) -> bool {
        self.is_alive() && self.health_bar_timer > 0.0
    }

    pub fn update(
        &mut self,
        player: &mut Player,
        solids: &[Rect],
        delta: f32,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) {
        self.contact_cooldown = (self.contact_cooldown - delta).max(0.0);
        self.health_bar_timer = (self.health_bar_timer - delta).max(0.0);

        if !self.is_alive() {
            self.death_timer -= delta;
            self.body.vel.x = 0.0;
            self.body.integrate(delta);
            self.body.move_and_collide(solids, delta);
            return;
        }

        self.moan_timer -= delta;
        if self.moan_timer <= 0.0 {
            events.push(GameEvent::ZombieMoan);
            self.moan_timer = rng.gen_range(ZOMBIE_MOAN_MIN_FRAMES..ZOMBIE_MOAN_MAX_FRAMES);
        }

        let player_rect = player.rect();
        let touching = !player.is_dead() && self.rect().overlaps(&player_rect);
        self.state = if touching {
            ZombieState::Attack
        } else if self.can_see(player) {
            ZombieState::Chase
        } else {
            ZombieState::Patrol
        };

        match self.state {
            ZombieState::Attack => {
                self.face_towards(player_rect.center().x);
                self.body.vel.x = 0.0;
            }
            ZombieState::Chase => {
                self.face_towards(player_rect.center().x);
                self.body.vel.x = self.facing.sign() * ZOMBIE_CHASE_SPEED;
            }
            _ => self.body.vel.x = self.facing.sign() * self.patrol_speed,
        }

        self.clamp_to_bounds(delta);
        self.body.integrate(delta);
        let contacts = self.body.move_and_collide(solids, delta);
        if contacts.hit_wall() && self.state == ZombieState::Patrol {
            self.facing = self.facing.flipped();
        }

        if touching && self.contact_cooldown <= 0.0 {
            let landed = player.take_damage(
                ZOMBIE_CONTACT_DAMAGE,
                DeathCause::Zombies,
                self.body.pos.x,
                events,
            );
            if landed {
                self.contact_cooldown = CONTACT_COOLDOWN_FRAMES;
            }
        }
    }

    /// Apply a projectile hit. Returns true when this hit killed it.
    pub fn take_hit(&mut self, damage: u32, events: &mut Vec<GameEvent>) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health = self.health.saturating_sub(damage);
        self.health_bar_timer = ZOMBIE_HEALTH_BAR_FRAMES;
        if self.health == 0 {
            self.state = ZombieState::Dead;
            self.body.vel.x = 0.0;
            events.push(GameEvent::EnemyDeath);
            return true;
        }
        events.push(GameEvent::EnemyHit);
        false
    }


    fn face_towards(&mut self, x: f32) {
        if x < self.body.pos.x {
            self.facing = Facing::Left;
        } else if x > self.body.pos.x {
            self.facing = Facing::Right;
        }
    }

    /// Player within range, on the same band and inside the patrol area.
    fn can_see(&self, player: &Player) -> bool {
        if player.is_dead() {
            return false;
        }
        let rect = self.rect();
        let target = player.rect();
        if !rect.overlaps_y(&target) {
            return false;
        }
        let px = target.center().x;
        if (px - self.body.pos.x).abs() > ZOMBIE_CHASE_RANGE {
            return false;
        }
        let inside_left = self.left_bound.map_or(true, |l| px >= l);
        let inside_right = self.right_bound.map_or(true, |r| px <= r);
        inside_left && inside_right
    }

    /// Stop at the patrol limits; patrolling zombies turn around there.
    fn clamp_to_bounds(&mut self, delta: f32) {
        let half = self.body.size.x * 0.5;
        let next_x = self.body.pos.x + self.body.vel.x * delta;
        if let Some(left) = self.left_bound {
            if self.body.vel.x < 0.0 && next_x - half <= left {
                self.body.pos.x = self.body.pos.x.max(left + half);
                self.body.vel.x = 0.0;
                if self.state == ZombieState::Patrol {
                    self.facing = Facing::Right;
                }
            }
        }
        if let Some(right) = self.right_bound {
            if self.body.vel.x > 0.0 && next_x + half >= right {
                self.body.pos.x = self.body.pos.x.min(right - half);
                self.body.vel.x = 0.0;
                if self.state == ZombieState::Patrol {
                    self.facing = Facing::Left;
                }
            }
        }
    }
}
