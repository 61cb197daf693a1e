//! Static and moving damage sources: acid pools, spikes and saws.
//!
//! Each hazard keeps its own contact cooldown, so two different spike strips
//! can hurt the player independently. Acid kills outright.

use glam::Vec2;

use crate::constants::{CONTACT_COOLDOWN_FRAMES, SAW_DAMAGE, SAW_SIZE, SAW_SPEED, SPIKES_DAMAGE};
use crate::entities::DeathCause;
use crate::events::GameEvent;
use crate::geometry::Rect;
use crate::player::Player;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HazardKind {
    Acid,
    Spikes,
    Saw,
}

impl HazardKind {
    pub fn death_cause(&self) -> DeathCause {
        match self {
            HazardKind::Acid => DeathCause::Acid,
            HazardKind::Spikes => DeathCause::Spikes,
            HazardKind::Saw => DeathCause::Saw,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SawMotion {
    Static,
    Horizontal,
    Vertical,
}

impl SawMotion {
    /// Parse a saw's type tag. An empty tag picks the track's long axis.
    pub fn parse(tag: &str, track: &Rect) -> Option<Self> {
        match tag {
            "static" => Some(SawMotion::Static),
            "horizontal" => Some(SawMotion::Horizontal),
            "vertical" => Some(SawMotion::Vertical),
            "" if track.size.x > track.size.y => Some(SawMotion::Horizontal),
            "" if track.size.y > track.size.x => Some(SawMotion::Vertical),
            "" => Some(SawMotion::Static),
            _ => None,
        }
    }
}

/// A saw's travel along its authored rectangle.
#[derive(Clone, Debug, PartialEq)]
struct SawTrack {
    from: Vec2,
    to: Vec2,
    /// +1 heading to `to`, -1 heading back to `from`.
    heading: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hazard {
    pub kind: HazardKind,
    /// Current damage rectangle.
    pub rect: Rect,
    track: Option<SawTrack>,
    cooldown: f32,
}

impl Hazard {
    pub fn acid(rect: Rect) -> Self {
        Self::fixed(HazardKind::Acid, rect)
    }

    pub fn spikes(rect: Rect) -> Self {
        Self::fixed(HazardKind::Spikes, rect)
    }

    fn fixed(kind: HazardKind, rect: Rect) -> Self {
        Self {
            kind,
            rect,
            track: None,
            cooldown: 0.0,
        }
    }

    /// A saw blade riding along `track_rect`.
    pub fn saw(track_rect: Rect, motion: SawMotion) -> Self {
        let size = Vec2::splat(SAW_SIZE);
        let center = track_rect.center();
        let half_travel = ((track_rect.size - size) * 0.5).max(Vec2::ZERO);
        let path = match motion {
            SawMotion::Static => None,
            SawMotion::Horizontal => Some((
                center - Vec2::new(half_travel.x, 0.0),
                center + Vec2::new(half_travel.x, 0.0),
            )),
            SawMotion::Vertical => Some((
                center - Vec2::new(0.0, half_travel.y),
                center + Vec2::new(0.0, half_travel.y),
            )),
        };
        let track = path
            .filter(|(from, to)| from != to)
            .map(|(from, to)| SawTrack { from, to, heading: 1.0 });
        // A saw that does not travel keeps its authored rectangle.
        let rect = match &track {
            Some(t) => Rect::from_center(t.from, size),
            None => track_rect,
        };
        Self {
            kind: HazardKind::Saw,
            rect,
            track,
            cooldown: 0.0,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.track.is_some()
    }

    pub fn update(&mut self, player: &mut Player, delta: f32, events: &mut Vec<GameEvent>) {
        self.cooldown = (self.cooldown - delta).max(0.0);
        self.advance(delta);

        if player.is_dead() || !self.rect.overlaps(&player.rect()) {
            return;
        }
        let cause = self.kind.death_cause();
        match self.kind {
            HazardKind::Acid => player.kill(cause, events),
            HazardKind::Spikes | HazardKind::Saw => {
                if self.cooldown > 0.0 {
                    return;
                }
                let damage = if self.kind == HazardKind::Saw {
                    SAW_DAMAGE
                } else {
                    SPIKES_DAMAGE
                };
                if player.take_damage(damage, cause, self.rect.center().x, events) {
                    self.cooldown = CONTACT_COOLDOWN_FRAMES;
                }
            }
        }
    }

    fn advance(&mut self, delta: f32) {
        let Some(track) = self.track.as_mut() else {
            return;
        };
        let center = self.rect.center();
        let target = if track.heading > 0.0 { track.to } else { track.from };
        let remaining = target - center;
        let step = SAW_SPEED * delta;
        let next = if remaining.length() <= step {
            track.heading = -track.heading;
            target
        } else {
            center + remaining.normalize() * step
        };
        self.rect = Rect::from_center(next, self.rect.size);
    }
}
