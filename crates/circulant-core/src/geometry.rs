//! Axis-aligned track regions.
//!
//! Two flavours exist: [`Rect`] carries sub-pixel coordinates, [`RectI`] is
//! restricted to whole pixels. Both keep their size fixed when clamped into
//! an image; only the top-left corner moves.

use glam::Vec2 as GlamVec2;
use serde::{Deserialize, Serialize};

/// 2D vector.
pub type Vec2 = GlamVec2;

/// Axis-aligned rectangle with sub-pixel top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Minimum corner (top-left).
    #[inline]
    pub fn min(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Center point.
    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Move the top-left corner by `delta`.
    #[inline]
    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Check if the rectangle lies entirely inside a `width x height` image.
    pub fn is_inside(self, width: u32, height: u32) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.x + self.width <= width as f32
            && self.y + self.height <= height as f32
    }

    /// Shift the rectangle so it lies inside a `width x height` image.
    ///
    /// The size is never changed. Returns `true` if the corner moved.
    pub fn ensure_in_bounds(&mut self, width: u32, height: u32) -> bool {
        let before = self.min();

        if self.x < 0.0 {
            self.x = 0.0;
        } else if self.x > width as f32 - self.width {
            self.x = width as f32 - self.width;
        }
        if self.y < 0.0 {
            self.y = 0.0;
        } else if self.y > height as f32 - self.height {
            self.y = height as f32 - self.height;
        }

        before != self.min()
    }

    /// Round every component to the nearest whole pixel.
    pub fn round(self) -> RectI {
        RectI::new(
            self.x.round() as i32,
            self.y.round() as i32,
            self.width.round() as i32,
            self.height.round() as i32,
        )
    }
}

impl From<RectI> for Rect {
    fn from(r: RectI) -> Self {
        Self::new(r.x as f32, r.y as f32, r.width as f32, r.height as f32)
    }
}

/// Axis-aligned rectangle with integer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RectI {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl RectI {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Shift the rectangle so it lies inside a `width x height` image.
    ///
    /// The size is never changed. Returns `true` if the corner moved.
    pub fn ensure_in_bounds(&mut self, width: u32, height: u32) -> bool {
        let before = (self.x, self.y);
        let (width, height) = (width as i32, height as i32);

        if self.x < 0 {
            self.x = 0;
        } else if self.x > width - self.width {
            self.x = width - self.width;
        }
        if self.y < 0 {
            self.y = 0;
        } else if self.y > height - self.height {
            self.y = height - self.height;
        }

        before != (self.x, self.y)
    }
}
