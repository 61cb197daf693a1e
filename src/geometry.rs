//! Static collision geometry: rectangles, obstacles and the level's solid set.

use glam::Vec2;

use crate::constants::COLLISION_EPSILON;

// ── Rect ─────────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in level pixels, `pos` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            pos: center - size * 0.5,
            size,
        }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap: rectangles that only touch (within epsilon) do not
    /// overlap, so a body resting on the ground is not "inside" it.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.overlaps_x(other) && self.overlaps_y(other)
    }

    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.left() < other.right() - COLLISION_EPSILON
            && self.right() > other.left() + COLLISION_EPSILON
    }

    pub fn overlaps_y(&self, other: &Rect) -> bool {
        self.top() < other.bottom() - COLLISION_EPSILON
            && self.bottom() > other.top() + COLLISION_EPSILON
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let min = self.pos.min(other.pos);
        let max = Vec2::new(self.right(), self.bottom())
            .max(Vec2::new(other.right(), other.bottom()));
        Rect {
            pos: min,
            size: max - min,
        }
    }

    pub fn translated(&self, offset: Vec2) -> Rect {
        Rect {
            pos: self.pos + offset,
            size: self.size,
        }
    }
}

// ── Obstacles ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    Ground,
    ScreenLimit,
    /// Bounds zombie patrols; nothing collides with it physically.
    ZombieBoundary,
}

impl ObstacleKind {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "ground" => Some(Self::Ground),
            "screen_limit" => Some(Self::ScreenLimit),
            "zombie_boundary" => Some(Self::ZombieBoundary),
            _ => None,
        }
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, Self::Ground | Self::ScreenLimit)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    pub rect: Rect,
    pub kind: ObstacleKind,
}

/// Immutable obstacle set of one level.
#[derive(Clone, Debug, Default)]
pub struct CollisionWorld {
    obstacles: Vec<Obstacle>,
}

impl CollisionWorld {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Rectangles that block movement (ground and screen limits).
    pub fn solid_rects(&self) -> Vec<Rect> {
        self.obstacles
            .iter()
            .filter(|o| o.kind.is_solid())
            .map(|o| o.rect)
            .collect()
    }

    pub fn zombie_boundaries(&self) -> impl Iterator<Item = &Rect> {
        self.obstacles
            .iter()
            .filter(|o| o.kind == ObstacleKind::ZombieBoundary)
            .map(|o| &o.rect)
    }

    /// The nearest zombie boundaries left and right of `rect` that share its
    /// vertical band, as `(left_limit, right_limit)` x coordinates.
    pub fn patrol_bounds(&self, rect: &Rect) -> (Option<f32>, Option<f32>) {
        let center = rect.center().x;
        let mut left: Option<f32> = None;
        let mut right: Option<f32> = None;
        for b in self.zombie_boundaries() {
            if !b.overlaps_y(rect) {
                continue;
            }
            if b.center().x <= center {
                let edge = b.right();
                left = Some(left.map_or(edge, |l| l.max(edge)));
            } else {
                let edge = b.left();
                right = Some(right.map_or(edge, |r| r.min(edge)));
            }
        }
        (left, right)
    }
}
