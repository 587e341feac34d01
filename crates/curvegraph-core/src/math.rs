//! Math utilities
//!
//! Re-exports from glam plus the bounding and culling volumes used by
//! region accumulation.

use std::fmt;

pub use glam::{Affine2, Affine3A, Mat4, Vec2, Vec3, Vec4};

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
///
/// Starts out inverted (`min = +inf`, `max = -inf`) so the first
/// [`resize`](Aabb::resize) establishes the box from a single point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create an empty AABB
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Create an AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create the smallest AABB containing all `points`
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut result = Self::EMPTY;
        for point in points {
            result.expand_to_include(point);
        }
        result
    }

    /// Check if the AABB is empty
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Check if a point is inside the AABB
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if `other` lies completely inside this AABB
    pub fn contains_aabb(&self, other: &Aabb) -> bool {
        other.is_empty() || (self.contains_point(other.min) && self.contains_point(other.max))
    }

    /// Restore the empty state
    pub fn reset(&mut self) {
        *self = Self::EMPTY;
    }

    /// Grow the AABB componentwise so it contains `(x, y, z)`
    pub fn resize(&mut self, x: f32, y: f32, z: f32) {
        self.expand_to_include(Vec3::new(x, y, z));
    }

    /// Expand the AABB to include a point
    pub fn expand_to_include(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Transform the AABB by a matrix
    pub fn transform(&self, matrix: Mat4) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        Aabb::from_points(self.corners().map(|corner| matrix.transform_point3(corner)))
    }

    /// Transform the AABB in the XY plane, keeping its Z extent
    pub fn transform_affine2(&self, affine: Affine2) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        let corners = [
            Vec2::new(self.min.x, self.min.y),
            Vec2::new(self.max.x, self.min.y),
            Vec2::new(self.min.x, self.max.y),
            Vec2::new(self.max.x, self.max.y),
        ];

        let mut result = Aabb::EMPTY;
        for corner in corners {
            let p = affine.transform_point2(corner);
            result.resize(p.x, p.y, self.min.z);
            result.resize(p.x, p.y, self.max.z);
        }
        result
    }

    fn corners(&self) -> [Vec3; 8] {
        [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ]
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for Aabb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "[empty]");
        }
        write!(
            f,
            "[{} {} {} .. {} {} {}]",
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z
        )
    }
}

/// Something a bounding box can be tested against before geometry is kept
pub trait CullVolume: fmt::Debug {
    /// Returns true if `aabb` lies entirely outside the volume
    fn is_outside(&self, aabb: &Aabb) -> bool;
}

/// A plane in 3D space (ax + by + cz + d = 0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Normal vector
    pub normal: Vec3,
    /// Distance from origin
    pub distance: f32,
}

impl Plane {
    /// Create a new plane
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Get the signed distance from a point to the plane
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// Frustum for culling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frustum {
    /// Frustum planes (left, right, bottom, top, near, far), normals point inwards
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Create a frustum from a view-projection matrix with OpenGL clip depth (-1..1)
    pub fn from_matrix(matrix: Mat4) -> Self {
        let rows = [
            matrix.row(0),
            matrix.row(1),
            matrix.row(2),
            matrix.row(3),
        ];

        let mut planes = [Plane::new(Vec3::ZERO, 0.0); 6];

        // Left plane
        planes[0] = Self::normalize_plane(rows[3] + rows[0]);
        // Right plane
        planes[1] = Self::normalize_plane(rows[3] - rows[0]);
        // Bottom plane
        planes[2] = Self::normalize_plane(rows[3] + rows[1]);
        // Top plane
        planes[3] = Self::normalize_plane(rows[3] - rows[1]);
        // Near plane
        planes[4] = Self::normalize_plane(rows[3] + rows[2]);
        // Far plane
        planes[5] = Self::normalize_plane(rows[3] - rows[2]);

        Self { planes }
    }

    /// Orthographic frustum over the given view volume
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        Self::from_matrix(Mat4::orthographic_rh_gl(left, right, bottom, top, near, far))
    }

    fn normalize_plane(plane: Vec4) -> Plane {
        let length = plane.truncate().length();
        if length > 0.0 {
            Plane {
                normal: plane.truncate() / length,
                distance: plane.w / length,
            }
        } else {
            Plane::new(Vec3::ZERO, 0.0)
        }
    }

    /// Check if an AABB intersects the frustum
    ///
    /// Conservative: boxes straddling a corner outside the frustum may
    /// still report an intersection.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        if aabb.is_empty() {
            return false;
        }
        for plane in &self.planes {
            // Find the positive vertex (furthest along the plane normal)
            let p = Vec3::new(
                if plane.normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if plane.normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if plane.normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );

            if plane.distance_to_point(p) < 0.0 {
                return false;
            }
        }
        true
    }

    /// Check if an AABB lies completely outside the frustum
    pub fn is_aabb_outside(&self, aabb: &Aabb) -> bool {
        !self.intersects_aabb(aabb)
    }
}

impl CullVolume for Frustum {
    fn is_outside(&self, aabb: &Aabb) -> bool {
        self.is_aabb_outside(aabb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_contains_point() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.contains_point(Vec3::splat(0.5)));
        assert!(!aabb.contains_point(Vec3::splat(2.0)));
    }

    #[test]
    fn test_aabb_resize_from_empty() {
        let mut aabb = Aabb::default();
        assert!(aabb.is_empty());

        aabb.resize(1.0, 2.0, 3.0);
        assert!(!aabb.is_empty());
        assert_eq!(aabb.min, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 2.0, 3.0));

        aabb.resize(-1.0, 4.0, 0.0);
        assert_eq!(aabb.min, Vec3::new(-1.0, 2.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 4.0, 3.0));
    }

    #[test]
    fn test_aabb_resize_idempotent_inside() {
        let mut aabb = Aabb::new(Vec3::ZERO, Vec3::splat(2.0));
        let before = aabb;
        aabb.resize(1.0, 1.0, 1.0);
        aabb.resize(1.0, 1.0, 1.0);
        assert_eq!(aabb, before);
    }

    #[test]
    fn test_aabb_reset() {
        let mut aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        aabb.reset();
        assert_eq!(aabb, Aabb::EMPTY);
        aabb.resize(5.0, 5.0, 5.0);
        assert_eq!(aabb.min, aabb.max);
    }

    #[test]
    fn test_aabb_contains_aabb() {
        let outer = Aabb::new(Vec3::ZERO, Vec3::splat(4.0));
        let inner = Aabb::new(Vec3::ONE, Vec3::splat(2.0));
        assert!(outer.contains_aabb(&inner));
        assert!(!inner.contains_aabb(&outer));
        assert!(inner.contains_aabb(&Aabb::EMPTY));
    }

    #[test]
    fn test_aabb_transform_affine2_keeps_z() {
        let aabb = Aabb::new(Vec3::new(0.0, 0.0, -1.0), Vec3::new(1.0, 2.0, 1.0));
        let moved = aabb.transform_affine2(Affine2::from_translation(Vec2::new(10.0, -5.0)));
        assert_eq!(moved.min, Vec3::new(10.0, -5.0, -1.0));
        assert_eq!(moved.max, Vec3::new(11.0, -3.0, 1.0));

        let scaled = aabb.transform_affine2(Affine2::from_scale(Vec2::new(-2.0, 1.0)));
        assert_eq!(scaled.min, Vec3::new(-2.0, 0.0, -1.0));
        assert_eq!(scaled.max, Vec3::new(0.0, 2.0, 1.0));
    }

    #[test]
    fn test_aabb_transform_empty_stays_empty() {
        let moved = Aabb::EMPTY.transform(Mat4::from_translation(Vec3::ONE));
        assert!(moved.is_empty());
    }

    #[test]
    fn test_aabb_display() {
        assert_eq!(Aabb::EMPTY.to_string(), "[empty]");
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(aabb.to_string(), "[0 0 0 .. 1 1 1]");
    }

    #[test]
    fn test_frustum_orthographic_culling() {
        let frustum = Frustum::orthographic(0.0, 100.0, 0.0, 100.0, -1.0, 1.0);

        let inside = Aabb::new(Vec3::new(10.0, 10.0, 0.0), Vec3::new(20.0, 20.0, 0.0));
        let straddling = Aabb::new(Vec3::new(-10.0, 50.0, 0.0), Vec3::new(10.0, 60.0, 0.0));
        let outside = Aabb::new(Vec3::new(200.0, 10.0, 0.0), Vec3::new(210.0, 20.0, 0.0));

        assert!(!frustum.is_aabb_outside(&inside));
        assert!(!frustum.is_aabb_outside(&straddling));
        assert!(frustum.is_aabb_outside(&outside));
        assert!(frustum.is_outside(&outside));
        assert!(frustum.is_outside(&Aabb::EMPTY));
    }

    #[test]
    fn test_plane_distance() {
        let plane = Plane::new(Vec3::Y, -1.0);
        assert!((plane.distance_to_point(Vec3::new(0.0, 3.0, 0.0)) - 2.0).abs() < 1e-6);
        assert!(plane.distance_to_point(Vec3::ZERO) < 0.0);
    }
}
