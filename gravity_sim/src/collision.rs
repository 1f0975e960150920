//! Circle-circle collision detection and impulse resolution

use glam::Vec2;

use crate::body::Body;
use crate::config::SimConfig;

/// Tunables for one body-body resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionParams {
    pub restitution: f32,
    pub correction_percent: f32,
    pub slop: f32,
}

impl From<&SimConfig> for CollisionParams {
    fn from(config: &SimConfig) -> Self {
        Self {
            restitution: config.collision_restitution,
            correction_percent: config.correction_percent,
            slop: config.slop,
        }
    }
}

/// Geometry of an overlapping pair, seen from the first body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from the first body's center to the second's
    pub normal: Vec2,
    pub distance: f32,
    /// `r_a + r_b - distance`, never negative for a detected contact
    pub penetration: f32,
}

/// Returns the contact if the circles touch or overlap.
///
/// Concentric circles have no usable normal and are reported as no contact.
pub fn detect(a: &Body, b: &Body) -> Option<Contact> {
    let offset = b.position - a.position;
    let distance = offset.length();
    let reach = a.radius + b.radius;

    if distance > reach || distance == 0.0 {
        return None;
    }

    Some(Contact {
        normal: offset / distance,
        distance,
        penetration: reach - distance,
    })
}

/// Exchange an impulse along the contact normal, then push the bodies apart.
///
/// The impulse is skipped when the bodies already separate along the normal;
/// the pair is visited from both sides in a frame and the second visit must
/// not undo the first. Positional correction always runs and moves each body
/// by its share of the total inverse mass, so the heavier one moves less.
pub fn resolve(a: &mut Body, b: &mut Body, contact: &Contact, params: &CollisionParams) {
    let n = contact.normal;
    let inv_a = a.inverse_mass();
    let inv_b = b.inverse_mass();
    let inv_mass_sum = inv_a + inv_b;

    let closing = (a.velocity - b.velocity).dot(n);
    if closing > 0.0 {
        let impulse = -(1.0 + params.restitution) * closing / inv_mass_sum;
        a.velocity += n * impulse * inv_a;
        b.velocity -= n * impulse * inv_b;
    }

    if contact.penetration > 0.0 {
        let correction = (contact.penetration - params.slop).max(0.0) * params.correction_percent;
        a.position -= n * correction * (inv_a / inv_mass_sum);
        b.position += n * correction * (inv_b / inv_mass_sum);
    }
}

/// Detect and resolve in one call; returns whether the pair was in contact
pub fn collide(a: &mut Body, b: &mut Body, params: &CollisionParams) -> bool {
    match detect(a, b) {
        Some(contact) => {
            resolve(a, b, &contact, params);
            true
        }
        None => false,
    }
}

/// Two disjoint mutable borrows into `bodies`, in the order asked for
pub fn pair_mut(bodies: &mut [Body], i: usize, j: usize) -> (&mut Body, &mut Body) {
    assert_ne!(i, j, "a body cannot collide with itself");
    if i < j {
        let (head, tail) = bodies.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = bodies.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

/// Resolve `bodies[index]` against every other body, returning the contact count
pub fn collide_with_others(bodies: &mut [Body], index: usize, params: &CollisionParams) -> usize {
    let mut contacts = 0;
    for other in 0..bodies.len() {
        if other == index {
            continue;
        }
        let (a, b) = pair_mut(bodies, index, other);
        if collide(a, b, params) {
            contacts += 1;
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const PARAMS: CollisionParams = CollisionParams {
        restitution: 0.9,
        correction_percent: 0.98,
        slop: 0.001,
    };

    fn body(x: f32, vx: f32, mass: f32) -> Body {
        Body::new(0.1, Vec2::new(x, 0.0), mass, Vec2::new(vx, 0.0), [1.0; 3]).unwrap()
    }

    #[test]
    fn detects_touching_and_overlapping() {
        let a = body(0.0, 0.0, 1.0);
        assert!(detect(&a, &body(0.2, 0.0, 1.0)).is_some());
        let contact = detect(&a, &body(0.15, 0.0, 1.0)).unwrap();
        assert_relative_eq!(contact.penetration, 0.05, epsilon = 1e-6);
        assert_eq!(contact.normal, Vec2::X);
        assert!(detect(&a, &body(0.25, 0.0, 1.0)).is_none());
    }

    #[test]
    fn concentric_bodies_are_ignored() {
        let mut a = body(0.3, 1.0, 1.0);
        let mut b = body(0.3, -1.0, 2.0);
        assert!(detect(&a, &b).is_none());
        assert!(!collide(&mut a, &mut b, &PARAMS));
        assert_eq!(a.velocity.x, 1.0);
        assert_eq!(b.velocity.x, -1.0);
    }

    #[test]
    fn head_on_equal_masses() {
        let mut a = body(-0.1, 4.0, 5.0);
        let mut b = body(0.1, -4.0, 5.0);
        assert!(collide(&mut a, &mut b, &PARAMS));

        assert_relative_eq!(a.velocity.x, -3.6, epsilon = 1e-5);
        assert_relative_eq!(b.velocity.x, 3.6, epsilon = 1e-5);
    }

    #[test]
    fn momentum_is_conserved() {
        let mut a = Body::new(0.1, Vec2::new(0.0, 0.0), 3.0, Vec2::new(2.0, 1.0), [1.0; 3]).unwrap();
        let mut b = Body::new(0.15, Vec2::new(0.2, 0.1), 7.0, Vec2::new(-1.0, 0.5), [1.0; 3]).unwrap();
        let before = a.momentum() + b.momentum();

        assert!(collide(&mut a, &mut b, &PARAMS));

        let after = a.momentum() + b.momentum();
        assert_relative_eq!(before.x, after.x, epsilon = 1e-4);
        assert_relative_eq!(before.y, after.y, epsilon = 1e-4);
    }

    #[test]
    fn separating_pair_gets_no_impulse() {
        let mut a = body(-0.05, -1.0, 1.0);
        let mut b = body(0.05, 1.0, 1.0);
        collide(&mut a, &mut b, &PARAMS);
        assert_eq!(a.velocity.x, -1.0);
        assert_eq!(b.velocity.x, 1.0);
    }

    #[test]
    fn correction_reduces_penetration() {
        let mut a = body(-0.05, 0.0, 1.0);
        let mut b = body(0.05, 0.0, 1.0);
        let before = detect(&a, &b).unwrap().penetration;

        collide(&mut a, &mut b, &PARAMS);

        let gap = b.position.x - a.position.x;
        let after = a.radius + b.radius - gap;
        assert!(after < before);
        assert!(gap > 0.1);
        // Only slop and the uncorrected 2% remain
        assert_relative_eq!(after, 0.001 + 0.02 * (0.1 - 0.001), epsilon = 1e-5);
    }

    #[test]
    fn heavier_body_moves_less() {
        let mut light = body(-0.05, 0.0, 1.0);
        let mut heavy = body(0.05, 0.0, 9.0);

        collide(&mut light, &mut heavy, &PARAMS);

        let light_shift = (light.position.x + 0.05).abs();
        let heavy_shift = (heavy.position.x - 0.05).abs();
        assert!(light_shift > heavy_shift);
        assert_relative_eq!(light_shift, 9.0 * heavy_shift, epsilon = 1e-5);
    }

    #[test]
    fn resting_overlap_within_slop_is_not_moved() {
        let mut a = body(0.0, 0.0, 1.0);
        let mut b = body(0.1995, 0.0, 1.0);
        collide(&mut a, &mut b, &PARAMS);
        assert_eq!(a.position.x, 0.0);
        assert_eq!(b.position.x, 0.1995);
    }

    #[test]
    fn pair_mut_preserves_order() {
        let mut bodies = [body(0.0, 0.0, 1.0), body(0.5, 0.0, 2.0), body(0.9, 0.0, 3.0)];
        let (a, b) = pair_mut(&mut bodies, 2, 0);
        assert_eq!(a.mass, 3.0);
        assert_eq!(b.mass, 1.0);
        let (a, b) = pair_mut(&mut bodies, 0, 1);
        assert_eq!(a.mass, 1.0);
        assert_eq!(b.mass, 2.0);
    }

    #[test]
    fn collide_with_others_counts_contacts() {
        let mut bodies = [body(0.0, 0.0, 1.0), body(0.15, 0.0, 1.0), body(0.8, 0.0, 1.0)];
        assert_eq!(collide_with_others(&mut bodies, 0, &PARAMS), 1);
    }
}
