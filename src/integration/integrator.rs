use crate::math::vec2::Vec2;
use crate::objects::Body;

/// Pre-solve half of a substep: remembers where the body started, then
/// advances it by its velocity over `h` seconds.
///
/// Gravity only accelerates dynamic bodies. Kinematic bodies still move
/// under their own velocity.
pub fn integrate_position(body: &mut Body, gravity: Vec2, h: f64) {
    body.previous_position = body.position;
    if body.is_dynamic() {
        body.velocity += gravity * h;
    }
    body.position += body.velocity * h;
    body.rotation = wrap_angle(body.rotation + body.angular_velocity * h);
}

/// Post-solve half of a substep: the velocity of a dynamic body becomes the
/// distance it actually travelled, position corrections included.
pub fn reconstruct_velocity(body: &mut Body, h: f64) {
    if !body.is_dynamic() || h <= 0.0 {
        return;
    }
    body.velocity = (body.position - body.previous_position) / h;
    body.previous_position = body.position;
}

/// Wraps an angle in radians to the range [-PI, PI].
pub fn wrap_angle(angle: f64) -> f64 {
    angle.sin().atan2(angle.cos())
}
