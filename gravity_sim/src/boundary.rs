//! Viewport walls
//!
//! The viewport is the square `[-h, h]²`. After integration each body is
//! tested against the four walls in a fixed order and only the first wall it
//! touches is resolved that frame. A body pushed into a corner therefore
//! bounces off one wall now and the other on a later frame.

use serde::Deserialize;

use crate::body::Body;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wall {
    Bottom,
    Top,
    Right,
    Left,
}

impl Wall {
    /// Order in which walls are tested
    pub const PRIORITY: [Wall; 4] = [Wall::Bottom, Wall::Top, Wall::Right, Wall::Left];

    /// Whether the body's surface has reached this wall
    fn touches(self, body: &Body, h: f32) -> bool {
        let p = body.position;
        let r = body.radius;
        match self {
            Wall::Bottom => p.y - r <= -h,
            Wall::Top => p.y + r >= h,
            Wall::Right => p.x + r >= h,
            Wall::Left => p.x - r <= -h,
        }
    }

    /// Clamp the body against this wall and reflect the normal velocity
    fn bounce(self, body: &mut Body, h: f32, restitution: f32) {
        let r = body.radius;
        match self {
            Wall::Bottom => {
                body.position.y = -h + r;
                body.velocity.y = -body.velocity.y * restitution;
            }
            Wall::Top => {
                body.position.y = h - r;
                body.velocity.y = -body.velocity.y * restitution;
            }
            Wall::Right => {
                body.position.x = h - r;
                body.velocity.x = -body.velocity.x * restitution;
            }
            Wall::Left => {
                body.position.x = -h + r;
                body.velocity.x = -body.velocity.x * restitution;
            }
        }
    }
}

/// Square viewport centered on the origin
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Bounds {
    pub half_extent: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self { half_extent: 1.0 }
    }
}

/// Resolve at most one wall contact for `body`, returning the wall it hit
pub fn resolve_boundary(body: &mut Body, bounds: &Bounds, restitution: f32) -> Option<Wall> {
    let h = bounds.half_extent;
    let wall = Wall::PRIORITY.into_iter().find(|wall| wall.touches(body, h))?;
    wall.bounce(body, h, restitution);
    Some(wall)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec2;

    fn ball(position: Vec2, velocity: Vec2) -> Body {
        Body::new(0.1, position, 1.0, velocity, [1.0; 3]).unwrap()
    }

    #[test]
    fn bottom_bounce_clamps_and_reflects() {
        let mut body = ball(Vec2::new(0.0, -1.05), Vec2::new(0.3, -2.0));
        let hit = resolve_boundary(&mut body, &Bounds::default(), 0.95);

        assert_eq!(hit, Some(Wall::Bottom));
        assert_relative_eq!(body.position.y, -0.9);
        assert_relative_eq!(body.velocity.y, 1.9);
        assert_eq!(body.velocity.x, 0.3);
    }

    #[test]
    fn reflected_speed_never_exceeds_incoming() {
        for e in [0.0, 0.5, 0.8, 0.95, 1.0] {
            let mut body = ball(Vec2::new(0.95, 0.0), Vec2::new(3.0, 0.0));
            resolve_boundary(&mut body, &Bounds::default(), e);
            assert_relative_eq!(body.velocity.x, -3.0 * e);
            assert!(body.velocity.x.abs() <= 3.0);
        }
    }

    #[test]
    fn each_wall_is_detected() {
        let cases = [
            (Vec2::new(0.0, 0.95), Wall::Top, Vec2::new(0.0, 0.9)),
            (Vec2::new(0.95, 0.0), Wall::Right, Vec2::new(0.9, 0.0)),
            (Vec2::new(-0.95, 0.0), Wall::Left, Vec2::new(-0.9, 0.0)),
        ];
        for (position, wall, clamped) in cases {
            let mut body = ball(position, Vec2::ONE);
            assert_eq!(resolve_boundary(&mut body, &Bounds::default(), 1.0), Some(wall));
            assert_relative_eq!(body.position.x, clamped.x);
            assert_relative_eq!(body.position.y, clamped.y);
        }
    }

    #[test]
    fn corner_resolves_only_first_wall() {
        let mut body = ball(Vec2::new(0.98, -0.98), Vec2::new(1.0, -1.0));
        let hit = resolve_boundary(&mut body, &Bounds::default(), 0.8);

        assert_eq!(hit, Some(Wall::Bottom));
        assert_relative_eq!(body.position.y, -0.9);
        // Right wall is left for a later frame
        assert_eq!(body.position.x, 0.98);
        assert_eq!(body.velocity.x, 1.0);
    }

    #[test]
    fn interior_body_is_untouched() {
        let mut body = ball(Vec2::new(0.3, -0.2), Vec2::new(1.0, 1.0));
        let before = body;
        assert_eq!(resolve_boundary(&mut body, &Bounds::default(), 0.9), None);
        assert_eq!(body, before);
    }

    #[test]
    fn custom_bounds() {
        let mut body = ball(Vec2::new(0.0, 1.95), Vec2::new(0.0, 1.0));
        let bounds = Bounds { half_extent: 2.0 };
        assert_eq!(resolve_boundary(&mut body, &bounds, 1.0), Some(Wall::Top));
        assert_relative_eq!(body.position.y, 1.9);
        assert_eq!(body.velocity.y, -1.0);
    }
}
