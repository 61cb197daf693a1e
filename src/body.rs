//! Kinematic body shared by every moving entity.
//!
//! Movement is resolved one axis at a time, horizontal first. Each axis move
//! is swept against the solid set, so a body can never skip over an obstacle
//! however thin it is, even at the clamped maximum delta.

use std::time::Duration;

use glam::Vec2;

use crate::constants::{COLLISION_EPSILON, GRAVITY, MAX_DELTA, MAX_FALL_SPEED, TARGET_FPS};
use crate::geometry::Rect;

/// Convert wall-clock frame time into a delta in nominal frames, capped at
/// `MAX_DELTA` so a stall cannot blow up the integration.
pub fn clamp_delta(elapsed: Duration) -> f32 {
    (elapsed.as_secs_f32() * TARGET_FPS).clamp(0.0, MAX_DELTA)
}

/// Move `current` toward `target` by at most `step`.
pub fn approach(current: f32, target: f32, step: f32) -> f32 {
    if current < target {
        (current + step).min(target)
    } else {
        (current - step).max(target)
    }
}

/// True when `rect` overlaps none of `solids`.
pub fn is_clear(rect: &Rect, solids: &[Rect]) -> bool {
    !solids.iter().any(|s| rect.overlaps(s))
}

/// Which sides were blocked during the last move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Contacts {
    pub grounded: bool,
    pub ceiling: bool,
    pub wall_left: bool,
    pub wall_right: bool,
}

impl Contacts {
    pub fn hit_wall(&self) -> bool {
        self.wall_left || self.wall_right
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct KinematicBody {
    /// Center of the collision rectangle.
    pub pos: Vec2,
    pub vel: Vec2,
    /// Constant acceleration, gravity unless changed.
    pub acc: Vec2,
    pub size: Vec2,
    pub grounded: bool,
}

impl KinematicBody {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            pos: center,
            vel: Vec2::ZERO,
            acc: Vec2::new(0.0, GRAVITY),
            size,
            grounded: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y * 0.5
    }

    /// Change the height while keeping the feet where they are.
    pub fn set_height_keep_feet(&mut self, height: f32) {
        let bottom = self.bottom();
        self.size.y = height;
        self.pos.y = bottom - height * 0.5;
    }

    /// Apply acceleration to velocity. Falling speed is capped at
    /// `MAX_FALL_SPEED`.
    pub fn integrate(&mut self, delta: f32) {
        self.vel += self.acc * delta;
        self.vel.y = self.vel.y.min(MAX_FALL_SPEED);
    }

    /// Advance by `vel * delta` against `solids`, x axis then y axis.
    ///
    /// A blocked axis snaps the body flush against the obstacle and zeroes
    /// that velocity component. `grounded` is set when a downward move is
    /// stopped by something below.
    pub fn move_and_collide(&mut self, solids: &[Rect], delta: f32) -> Contacts {
        let mut contacts = Contacts::default();

        let dx = self.vel.x * delta;
        if dx != 0.0 {
            match sweep_x(&self.rect(), dx, solids) {
                Some(allowed) => {
                    self.pos.x += allowed;
                    self.vel.x = 0.0;
                    if dx > 0.0 {
                        contacts.wall_right = true;
                    } else {
                        contacts.wall_left = true;
                    }
                }
                None => self.pos.x += dx,
            }
        }

        let dy = self.vel.y * delta;
        if dy != 0.0 {
            match sweep_y(&self.rect(), dy, solids) {
                Some(allowed) => {
                    self.pos.y += allowed;
                    self.vel.y = 0.0;
                    if dy > 0.0 {
                        contacts.grounded = true;
                    } else {
                        contacts.ceiling = true;
                    }
                }
                None => self.pos.y += dy,
            }
        } else {
            contacts.grounded = self.standing_on(solids);
        }

        self.grounded = contacts.grounded;
        contacts
    }

    /// True when the body's feet rest on top of a solid.
    pub fn standing_on(&self, solids: &[Rect]) -> bool {
        let rect = self.rect();
        solids.iter().any(|s| {
            rect.overlaps_x(s) && (s.top() - rect.bottom()).abs() <= COLLISION_EPSILON * 10.0
        })
    }
}

/// Allowed horizontal displacement when something blocks `dx`, or `None` when
/// the whole move is free. Solids already overlapping `rect` are ignored.
fn sweep_x(rect: &Rect, dx: f32, solids: &[Rect]) -> Option<f32> {
    let swept = rect.union(&rect.translated(Vec2::new(dx, 0.0)));
    let mut limit: Option<f32> = None;
    for s in solids {
        if !swept.overlaps(s) {
            continue;
        }
        if dx > 0.0 {
            if s.left() < rect.right() - COLLISION_EPSILON {
                continue;
            }
            let allowed = s.left() - rect.right();
            limit = Some(limit.map_or(allowed, |l: f32| l.min(allowed)));
        } else {
            if s.right() > rect.left() + COLLISION_EPSILON {
                continue;
            }
            let allowed = s.right() - rect.left();
            limit = Some(limit.map_or(allowed, |l: f32| l.max(allowed)));
        }
    }
    limit
}

fn sweep_y(rect: &Rect, dy: f32, solids: &[Rect]) -> Option<f32> {
    let swept = rect.union(&rect.translated(Vec2::new(0.0, dy)));
    let mut limit: Option<f32> = None;
    for s in solids {
        if !swept.overlaps(s) {
            continue;
        }
        if dy > 0.0 {
            if s.top() < rect.bottom() - COLLISION_EPSILON {
                continue;
            }
            let allowed = s.top() - rect.bottom();
            limit = Some(limit.map_or(allowed, |l: f32| l.min(allowed)));
        } else {
            if s.bottom() > rect.top() + COLLISION_EPSILON {
                continue;
            }
            let allowed = s.bottom() - rect.top();
            limit = Some(limit.map_or(allowed, |l: f32| l.max(allowed)));
        }
    }
    limit
}
