//! Semi-implicit (symplectic) Euler integration

use crate::body::Body;

/// Advance one body by `dt` seconds.
///
/// Velocity is updated first and the *new* velocity moves the position.
/// Swapping the two lines turns this into explicit Euler, which gains energy
/// on orbits.
#[inline]
pub fn integrate(body: &mut Body, dt: f32) {
    body.velocity += body.acceleration * dt;
    body.position += body.velocity * dt;
}

pub fn integrate_all(bodies: &mut [Body], dt: f32) {
    for body in bodies.iter_mut() {
        integrate(body, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn position_uses_updated_velocity() {
        let mut body = Body::new(0.1, Vec2::ZERO, 1.0, Vec2::new(1.0, 0.0), [1.0; 3]).unwrap();
        body.acceleration = Vec2::new(2.0, -4.0);

        integrate(&mut body, 0.5);

        assert_eq!(body.velocity, Vec2::new(2.0, -2.0));
        assert_eq!(body.position, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn no_acceleration_is_linear_motion() {
        let mut body =
            Body::new(0.1, Vec2::new(0.25, 0.25), 1.0, Vec2::new(0.5, -0.25), [1.0; 3]).unwrap();
        integrate(&mut body, 0.25);
        assert_eq!(body.position, Vec2::new(0.375, 0.1875));
        assert_eq!(body.velocity, Vec2::new(0.5, -0.25));
    }
}
