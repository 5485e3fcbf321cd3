//! Collision detection for the flyer
//!
//! The flyer is a circle and every obstacle is a pair of axis-aligned
//! rectangles, so the test is the classic clamp-to-box nearest point check.

use glam::Vec2;

use super::state::{Flyer, Obstacle};
use crate::tuning::Tuning;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Rectangle from its top-left corner and size (y grows downward)
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + w, y + h),
        }
    }

    /// Point inside (or on the boundary of) the rectangle closest to `point`
    #[inline]
    pub fn nearest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }
}

/// Circle vs rectangle overlap; touching counts as a hit
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let nearest = rect.nearest_point(center);
    center.distance_squared(nearest) <= radius * radius
}

/// Does the flyer intersect either solid region of the obstacle?
pub fn flyer_hits_obstacle(flyer: &Flyer, obstacle: &Obstacle, tuning: &Tuning) -> bool {
    let center = Vec2::new(flyer.x, flyer.y);
    circle_rect_overlap(center, flyer.radius, &obstacle.upper_rect(tuning))
        || circle_rect_overlap(center, flyer.radius, &obstacle.lower_rect(tuning))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn top_rect() -> Rect {
        // x in [100, 180], y in [0, 90]
        Rect::new(100.0, 0.0, 80.0, 90.0)
    }

    #[test]
    fn test_circle_below_rect_overlaps() {
        // Nearest point is (140, 90), 10 units away
        assert!(circle_rect_overlap(Vec2::new(140.0, 100.0), 18.0, &top_rect()));
    }

    #[test]
    fn test_circle_touching_bottom_edge() {
        // Exactly one radius below the edge
        assert!(circle_rect_overlap(Vec2::new(140.0, 108.0), 18.0, &top_rect()));
        assert!(!circle_rect_overlap(Vec2::new(140.0, 108.5), 18.0, &top_rect()));
    }

    #[test]
    fn test_circle_touching_left_edge() {
        assert!(circle_rect_overlap(Vec2::new(82.0, 50.0), 18.0, &top_rect()));
        assert!(!circle_rect_overlap(Vec2::new(80.0, 50.0), 18.0, &top_rect()));
    }

    #[test]
    fn test_circle_near_corner() {
        // Corner at (180, 90); offset (12, 12) is ~16.97 away
        assert!(circle_rect_overlap(Vec2::new(192.0, 102.0), 18.0, &top_rect()));
        // Offset (13, 13) is ~18.38 away, axis distances both under the radius
        assert!(!circle_rect_overlap(Vec2::new(193.0, 103.0), 18.0, &top_rect()));
    }

    #[test]
    fn test_circle_far_away() {
        assert!(!circle_rect_overlap(Vec2::new(400.0, 400.0), 18.0, &top_rect()));
    }

    #[test]
    fn test_center_inside_rect() {
        assert!(circle_rect_overlap(Vec2::new(140.0, 45.0), 18.0, &top_rect()));
    }

    #[test]
    fn test_flyer_in_gap_is_clear() {
        let tuning = Tuning::default();
        let flyer = Flyer {
            x: 140.0,
            y: 400.0,
            vy: 0.0,
            radius: 18.0,
        };
        let obstacle = Obstacle {
            x: 100.0,
            gap_center: 400.0,
            scored: false,
        };
        assert!(!flyer_hits_obstacle(&flyer, &obstacle, &tuning));
    }

    #[test]
    fn test_flyer_hits_upper_and_lower() {
        let tuning = Tuning::default();
        let obstacle = Obstacle {
            x: 100.0,
            gap_center: 400.0,
            scored: false,
        };
        // Gap spans 305..495; 305 + 17 puts the circle 1 unit into the top block
        let high = Flyer {
            x: 140.0,
            y: 322.0,
            vy: 0.0,
            radius: 18.0,
        };
        let low = Flyer { y: 478.0, ..high };
        assert!(flyer_hits_obstacle(&high, &obstacle, &tuning));
        assert!(flyer_hits_obstacle(&low, &obstacle, &tuning));
    }

    #[test]
    fn test_flyer_past_obstacle_is_clear() {
        let tuning = Tuning::default();
        let flyer = Flyer {
            x: 140.0,
            y: 100.0,
            vy: 0.0,
            radius: 18.0,
        };
        let obstacle = Obstacle {
            x: 20.0,
            gap_center: 400.0,
            scored: true,
        };
        // Trailing edge at 100, flyer leading edge at 122
        assert!(!flyer_hits_obstacle(&flyer, &obstacle, &tuning));
    }
}
