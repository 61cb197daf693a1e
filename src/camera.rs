//! Viewport tracking clamped to the level bounds.

use glam::Vec2;

use crate::geometry::Rect;

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub offset: Vec2,
    level_size: Vec2,
    viewport: Vec2,
}

impl Camera {
    pub fn new(level_size: Vec2, viewport: Vec2) -> Self {
        Self {
            offset: Vec2::ZERO,
            level_size,
            viewport,
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Recenter on `target`. The view never shows anything outside the
    /// level; a level smaller than the viewport pins the offset at zero.
    pub fn update(&mut self, target: Vec2) {
        let max = (self.level_size - self.viewport).max(Vec2::ZERO);
        self.offset = (target - self.viewport * 0.5).clamp(Vec2::ZERO, max);
    }

    /// Level space to screen space.
    pub fn apply(&self, rect: &Rect) -> Rect {
        rect.translated(-self.offset)
    }

    pub fn apply_point(&self, point: Vec2) -> Vec2 {
        point - self.offset
    }

    /// The part of the level currently on screen.
    pub fn view_rect(&self) -> Rect {
        Rect {
            pos: self.offset,
            size: self.viewport,
        }
    }
}
