//! Scene membership: which injectors, motors and colliders feed a field.
//!
//! [`SceneRegistry`] hands out typed handles, keeps registration order (the
//! order shapes are dispatched in), and derives collider velocities from
//! how far each collider moved since the previous frame.

use std::fmt;

use glam::Vec3;
use indexmap::IndexMap;
use plume_space::Shape;

use crate::inputs::{Collider, FrameInputs, Injector, Motor};

macro_rules! handle {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

handle!(
    /// Handle to a registered [`Injector`].
    InjectorId,
    "injector"
);
handle!(
    /// Handle to a registered [`Motor`].
    MotorId,
    "motor"
);
handle!(
    /// Handle to a registered [`Collider`].
    ColliderId,
    "collider"
);

#[derive(Clone, Debug)]
struct TrackedCollider {
    collider: Collider,
    last_center: Vec3,
}

/// Ordered sets of scene shapes plus collider motion history.
#[derive(Clone, Debug, Default)]
pub struct SceneRegistry {
    next_id: u32,
    injectors: IndexMap<InjectorId, Injector>,
    motors: IndexMap<MotorId, Motor>,
    colliders: IndexMap<ColliderId, TrackedCollider>,
}

impl SceneRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // ── Injectors ─────────────────────────────────────────────────

    /// Register an injector at the end of the dispatch order.
    pub fn add_injector(&mut self, injector: Injector) -> InjectorId {
        let id = InjectorId(self.allocate());
        self.injectors.insert(id, injector);
        id
    }

    /// Unregister an injector, keeping the order of the rest.
    pub fn remove_injector(&mut self, id: InjectorId) -> Option<Injector> {
        let removed = self.injectors.shift_remove(&id);
        if removed.is_none() {
            log::warn!("remove of unknown {id}");
        }
        removed
    }

    /// The injector behind `id`.
    pub fn injector(&self, id: InjectorId) -> Option<&Injector> {
        self.injectors.get(&id)
    }

    /// Mutable injector behind `id`.
    pub fn injector_mut(&mut self, id: InjectorId) -> Option<&mut Injector> {
        self.injectors.get_mut(&id)
    }

    /// Move or reshape an injector. Returns `false` for an unknown handle.
    pub fn set_injector_shape(&mut self, id: InjectorId, shape: Shape) -> bool {
        self.injector_mut(id).map(|i| i.shape = shape).is_some()
    }

    /// Number of registered injectors.
    pub fn injector_count(&self) -> usize {
        self.injectors.len()
    }

    // ── Motors ────────────────────────────────────────────────────

    /// Register a motor at the end of the dispatch order.
    pub fn add_motor(&mut self, motor: Motor) -> MotorId {
        let id = MotorId(self.allocate());
        self.motors.insert(id, motor);
        id
    }

    /// Unregister a motor, keeping the order of the rest.
    pub fn remove_motor(&mut self, id: MotorId) -> Option<Motor> {
        let removed = self.motors.shift_remove(&id);
        if removed.is_none() {
            log::warn!("remove of unknown {id}");
        }
        removed
    }

    /// The motor behind `id`.
    pub fn motor(&self, id: MotorId) -> Option<&Motor> {
        self.motors.get(&id)
    }

    /// Mutable motor behind `id`.
    pub fn motor_mut(&mut self, id: MotorId) -> Option<&mut Motor> {
        self.motors.get_mut(&id)
    }

    /// Move or reshape a motor. Returns `false` for an unknown handle.
    pub fn set_motor_shape(&mut self, id: MotorId, shape: Shape) -> bool {
        self.motor_mut(id).map(|m| m.shape = shape).is_some()
    }

    /// Number of registered motors.
    pub fn motor_count(&self) -> usize {
        self.motors.len()
    }

    // ── Colliders ─────────────────────────────────────────────────

    /// Register a collider. Its velocity is zero until it moves.
    pub fn add_collider(&mut self, collider: Collider) -> ColliderId {
        let id = ColliderId(self.allocate());
        let last_center = collider.shape.bounds().center();
        self.colliders.insert(
            id,
            TrackedCollider {
                collider,
                last_center,
            },
        );
        id
    }

    /// Unregister a collider together with its own motion history.
    pub fn remove_collider(&mut self, id: ColliderId) -> Option<Collider> {
        match self.colliders.shift_remove(&id) {
            Some(tracked) => Some(tracked.collider),
            None => {
                log::warn!("remove of unknown {id}");
                None
            }
        }
    }

    /// The collider behind `id`.
    pub fn collider(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(&id).map(|t| &t.collider)
    }

    /// Move or reshape a collider. The next frame's velocity reflects the
    /// move. Returns `false` for an unknown handle.
    pub fn set_collider_shape(&mut self, id: ColliderId, shape: Shape) -> bool {
        self.colliders
            .get_mut(&id)
            .map(|t| t.collider.shape = shape)
            .is_some()
    }

    /// Number of registered colliders.
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    // ── Frames ────────────────────────────────────────────────────

    /// Snapshot the scene for one update of `dt` seconds.
    ///
    /// Each collider's velocity is the displacement of its bounds centre
    /// since the last [`commit_frame`](Self::commit_frame) divided by `dt`.
    /// A non-positive `dt` yields zero velocities. The reference positions
    /// are left alone, so a failed update can be retried with the same
    /// motion.
    pub fn frame_inputs(&self, dt: f32) -> FrameInputs {
        let usable_dt = dt.is_finite() && dt > 0.0;
        if !usable_dt {
            log::warn!("collider velocities zeroed for dt {dt}");
        }
        let mut inputs = FrameInputs {
            injectors: self.injectors.values().copied().collect(),
            motors: self.motors.values().copied().collect(),
            colliders: Vec::with_capacity(self.colliders.len()),
            collider_velocities: Vec::with_capacity(self.colliders.len()),
        };
        for tracked in self.colliders.values() {
            let velocity = if usable_dt {
                (tracked.collider.shape.bounds().center() - tracked.last_center) / dt
            } else {
                Vec3::ZERO
            };
            inputs.colliders.push(tracked.collider);
            inputs.collider_velocities.push(velocity);
        }
        inputs
    }

    /// Make every collider's current position the reference for the next
    /// velocity. Call once the update that used
    /// [`frame_inputs`](Self::frame_inputs) has succeeded.
    pub fn commit_frame(&mut self) {
        for tracked in self.colliders.values_mut() {
            tracked.last_center = tracked.collider.shape.bounds().center();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plume_core::MotorKind;

    fn sphere_at(x: f32) -> Shape {
        Shape::sphere(Vec3::new(x, 0.5, 0.5), 0.1)
    }

    #[test]
    fn handles_are_distinct_across_kinds() {
        let mut r = SceneRegistry::new();
        let i = r.add_injector(Injector::new(sphere_at(0.5), 1.0));
        let m = r.add_motor(Motor::new(sphere_at(0.5), MotorKind::Direction, 1.0));
        let c = r.add_collider(Collider::new(sphere_at(0.5)));
        assert_ne!(i.0, m.0);
        assert_ne!(m.0, c.0);
        assert_eq!(c.to_string(), format!("collider#{}", c.0));
    }

    #[test]
    fn order_survives_removal() {
        let mut r = SceneRegistry::new();
        let a = r.add_injector(Injector::new(sphere_at(0.1), 1.0));
        let b = r.add_injector(Injector::new(sphere_at(0.2), 2.0));
        let c = r.add_injector(Injector::new(sphere_at(0.3), 3.0));
        assert!(r.remove_injector(b).is_some());
        assert!(r.remove_injector(b).is_none());
        let amounts: Vec<f32> = r.frame_inputs(0.1).injectors.iter().map(|i| i.amount).collect();
        assert_eq!(amounts, vec![1.0, 3.0]);
        assert!(r.injector(a).is_some() && r.injector(c).is_some());
    }

    #[test]
    fn collider_velocity_is_finite_difference() {
        let mut r = SceneRegistry::new();
        let c = r.add_collider(Collider::new(sphere_at(0.5)));
        assert_eq!(r.frame_inputs(0.1).collider_velocities, vec![Vec3::ZERO]);
        r.commit_frame();

        assert!(r.set_collider_shape(c, sphere_at(0.7)));
        let v = r.frame_inputs(0.1).collider_velocities[0];
        assert!((v - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-4);
        r.commit_frame();

        // No further motion: velocity drops back to zero.
        assert_eq!(r.frame_inputs(0.1).collider_velocities, vec![Vec3::ZERO]);
    }

    #[test]
    fn removing_collider_keeps_others_history() {
        let mut r = SceneRegistry::new();
        let a = r.add_collider(Collider::new(sphere_at(0.2)));
        let b = r.add_collider(Collider::new(sphere_at(0.6)));
        r.set_collider_shape(b, sphere_at(0.8));
        r.remove_collider(a);
        let inputs = r.frame_inputs(0.5);
        assert_eq!(inputs.colliders.len(), 1);
        assert_eq!(inputs.collider_velocities.len(), 1);
        assert!((inputs.collider_velocities[0].x - 0.4).abs() < 1e-4);
    }

    #[test]
    fn unknown_handles_are_rejected() {
        let mut r = SceneRegistry::new();
        assert!(!r.set_motor_shape(MotorId(7), sphere_at(0.1)));
        assert!(!r.set_injector_shape(InjectorId(7), sphere_at(0.1)));
        assert!(r.remove_collider(ColliderId(7)).is_none());
        assert_eq!(r.motor_count() + r.injector_count() + r.collider_count(), 0);
    }

    #[test]
    fn zero_dt_gives_zero_velocity() {
        let mut r = SceneRegistry::new();
        let c = r.add_collider(Collider::new(sphere_at(0.2)));
        r.set_collider_shape(c, sphere_at(0.9));
        assert_eq!(r.frame_inputs(0.0).collider_velocities, vec![Vec3::ZERO]);
    }

    #[test]
    fn uncommitted_motion_is_reported_again() {
        let mut r = SceneRegistry::new();
        let c = r.add_collider(Collider::new(sphere_at(0.2)));
        r.set_collider_shape(c, sphere_at(0.4));
        let first = r.frame_inputs(0.1).collider_velocities[0];
        let retry = r.frame_inputs(0.1).collider_velocities[0];
        assert!((first.x - 2.0).abs() < 1e-4);
        assert_eq!(first, retry);
        r.commit_frame();
        assert_eq!(r.frame_inputs(0.1).collider_velocities, vec![Vec3::ZERO]);
    }
}
