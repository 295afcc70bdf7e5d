//! Axis-aligned collision helpers shared by the paddle games
//!
//! Balls, paddles and bricks are all rectangles on the 320x200 grid, so the
//! tests here are plain interval overlaps plus the paddle "english" that
//! steers the rebound by where the ball struck.

use glam::Vec2;

use crate::clampf;

/// Axis-aligned rectangle, `pos` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
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

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Touching edges count as overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.right() >= other.pos.x
            && self.pos.x <= other.right()
            && self.bottom() >= other.pos.y
            && self.pos.y <= other.bottom()
    }
}

/// Which wall a bounce happened on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Low,
    High,
}

/// Keep `pos` in `[min, max]` on one axis, reflecting `vel` on contact
pub fn bounce_between(pos: &mut f32, vel: &mut f32, min: f32, max: f32) -> Option<Wall> {
    if *pos <= min {
        *pos = min;
        *vel = -*vel;
        Some(Wall::Low)
    } else if *pos >= max {
        *pos = max;
        *vel = -*vel;
        Some(Wall::High)
    } else {
        None
    }
}

/// Where the ball struck the paddle along one axis: -1 at one end, +1 at the other
pub fn impact_offset(ball_center: f32, paddle_center: f32, half_extent: f32) -> f32 {
    if half_extent <= 0.0 {
        return 0.0;
    }
    clampf((ball_center - paddle_center) / half_extent, -1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_overlap() {
        let paddle = Rect::new(16.0, 80.0, 6.0, 22.0);
        assert!(paddle.overlaps(&Rect::new(20.0, 90.0, 2.0, 2.0)));
        // Touching the right edge
        assert!(paddle.overlaps(&Rect::new(22.0, 90.0, 2.0, 2.0)));
        assert!(!paddle.overlaps(&Rect::new(23.0, 90.0, 2.0, 2.0)));
        assert!(!paddle.overlaps(&Rect::new(18.0, 103.0, 2.0, 2.0)));
    }

    #[test]
    fn test_bounce_between() {
        let mut pos = -1.5;
        let mut vel = -2.0;
        assert_eq!(
            bounce_between(&mut pos, &mut vel, 0.0, 198.0),
            Some(Wall::Low)
        );
        assert_eq!((pos, vel), (0.0, 2.0));

        let mut pos = 199.0;
        let mut vel = 1.0;
        assert_eq!(
            bounce_between(&mut pos, &mut vel, 0.0, 198.0),
            Some(Wall::High)
        );
        assert_eq!((pos, vel), (198.0, -1.0));

        let mut pos = 50.0;
        let mut vel = 1.0;
        assert_eq!(bounce_between(&mut pos, &mut vel, 0.0, 198.0), None);
        assert_eq!(vel, 1.0);
    }

    #[test]
    fn test_impact_offset() {
        assert_eq!(impact_offset(100.0, 100.0, 11.0), 0.0);
        assert_eq!(impact_offset(111.0, 100.0, 11.0), 1.0);
        assert_eq!(impact_offset(50.0, 100.0, 11.0), -1.0);
        assert_eq!(impact_offset(5.0, 0.0, 0.0), 0.0);
    }
}
