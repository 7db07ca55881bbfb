//! Per-frame scene inputs: injectors, motors and colliders.

use glam::Vec3;
use plume_core::MotorKind;
use plume_space::Shape;

/// Adds density inside its shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Injector {
    /// World-space volume.
    pub shape: Shape,
    /// Density added per second at the centre.
    pub amount: f32,
}

impl Injector {
    /// Injector adding `amount` density per second.
    pub fn new(shape: Shape, amount: f32) -> Self {
        Self { shape, amount }
    }
}

/// Adds velocity inside its shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motor {
    /// World-space volume.
    pub shape: Shape,
    /// Direction pattern.
    pub kind: MotorKind,
    /// Acceleration in world units per second squared at the centre.
    pub value: f32,
}

impl Motor {
    /// Motor of `kind` with strength `value`.
    pub fn new(shape: Shape, kind: MotorKind, value: f32) -> Self {
        Self { shape, kind, value }
    }
}

/// A solid volume the fluid flows around.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collider {
    /// World-space volume.
    pub shape: Shape,
}

impl Collider {
    /// Collider occupying `shape`.
    pub fn new(shape: Shape) -> Self {
        Self { shape }
    }
}

/// Everything one update consumes besides `dt` and the solver config.
///
/// Order is preserved: shapes are dispatched in list order.
/// `collider_velocities[i]` is the world-space velocity of `colliders[i]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInputs {
    /// Density sources.
    pub injectors: Vec<Injector>,
    /// Velocity sources.
    pub motors: Vec<Motor>,
    /// Solid volumes.
    pub colliders: Vec<Collider>,
    /// One velocity per collider, in world units per second.
    pub collider_velocities: Vec<Vec3>,
}

impl FrameInputs {
    /// No sources and no colliders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an injector.
    pub fn with_injector(mut self, injector: Injector) -> Self {
        self.injectors.push(injector);
        self
    }

    /// Append a motor.
    pub fn with_motor(mut self, motor: Motor) -> Self {
        self.motors.push(motor);
        self
    }

    /// Append a collider together with its velocity.
    pub fn with_collider(mut self, collider: Collider, velocity: Vec3) -> Self {
        self.colliders.push(collider);
        self.collider_velocities.push(velocity);
        self
    }

    /// Total shape count.
    pub fn shape_count(&self) -> usize {
        self.injectors.len() + self.motors.len() + self.colliders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_collider_lists_parallel() {
        let s = Shape::sphere(Vec3::ZERO, 1.0);
        let f = FrameInputs::new()
            .with_injector(Injector::new(s, 1.0))
            .with_collider(Collider::new(s), Vec3::X)
            .with_collider(Collider::new(s), Vec3::Y)
            .with_motor(Motor::new(s, MotorKind::Omni, 2.0));
        assert_eq!(f.colliders.len(), f.collider_velocities.len());
        assert_eq!(f.collider_velocities, vec![Vec3::X, Vec3::Y]);
        assert_eq!(f.shape_count(), 4);
    }
}
