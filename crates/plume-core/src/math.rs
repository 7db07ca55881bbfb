//! Axis-aligned bounds and the dispatch tile size.

pub use glam::{IVec3, Mat4, Quat, UVec3, Vec3};

/// Edge length of one dispatch tile, in voxels.
///
/// Every grid resolution is a multiple of this on every axis, and kernel
/// launches are counted in tiles of `TILE_SIZE³` voxels.
pub const TILE_SIZE: u32 = 8;

/// Axis-aligned bounding box in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Box from explicit corners. No ordering check is made.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box starting at `min` with the given `size`.
    pub fn from_min_size(min: Vec3, size: Vec3) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    /// Box centred on `center` with the given `size`.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Smallest box containing every point in `points`.
    ///
    /// Returns `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Self::new(first, first);
        for p in iter {
            aabb.encapsulate(p);
        }
        Some(aabb)
    }

    /// Grow the box to contain `point`.
    pub fn encapsulate(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Edge lengths (`max - min`).
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Centre point.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Whether `point` lies inside or on the boundary.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_size_round_trip() {
        let b = Aabb::from_min_size(Vec3::new(1.0, 2.0, 3.0), Vec3::splat(2.0));
        assert_eq!(b.max, Vec3::new(3.0, 4.0, 5.0));
        assert_eq!(b.size(), Vec3::splat(2.0));
        assert_eq!(b.center(), Vec3::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn from_points_encloses_all() {
        let b = Aabb::from_points([
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(-2.0, 3.0, 0.5),
            Vec3::new(0.0, 0.0, -4.0),
        ])
        .unwrap();
        assert_eq!(b.min, Vec3::new(-2.0, -1.0, -4.0));
        assert_eq!(b.max, Vec3::new(1.0, 3.0, 0.5));
    }

    #[test]
    fn from_points_empty_is_none() {
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn contains_is_inclusive() {
        let b = Aabb::from_min_size(Vec3::ZERO, Vec3::ONE);
        assert!(b.contains(Vec3::ONE));
        assert!(b.contains(Vec3::splat(0.5)));
        assert!(!b.contains(Vec3::new(1.5, 0.5, 0.5)));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn point() -> impl Strategy<Value = Vec3> {
            (-100.0f32..100.0, -100.0f32..100.0, -100.0f32..100.0)
                .prop_map(|(x, y, z)| Vec3::new(x, y, z))
        }

        proptest! {
            #[test]
            fn from_points_contains_every_point(points in prop::collection::vec(point(), 1..16)) {
                let b = Aabb::from_points(points.iter().copied()).unwrap();
                for p in &points {
                    prop_assert!(b.contains(*p));
                }
                prop_assert!(b.size().cmpge(Vec3::ZERO).all());
            }
        }
    }
}
