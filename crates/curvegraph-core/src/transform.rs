//! Shape transforms
//!
//! Transforms applied to outline geometry before it enters a region's
//! coordinate space.

use glam::{Affine2, Affine3A, Vec3};

use crate::math::Aabb;

/// A transform that can move both points and bounding boxes
pub trait ShapeTransform {
    /// Transform a single point
    fn transform_point(&self, point: Vec3) -> Vec3;

    /// Transform a bounding box, returning a box that contains the transformed original
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

/// Planar transform. Only X and Y are affected, Z passes through untouched.
impl ShapeTransform for Affine2 {
    fn transform_point(&self, point: Vec3) -> Vec3 {
        self.transform_point2(point.truncate()).extend(point.z)
    }

    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        aabb.transform_affine2(*self)
    }
}

impl ShapeTransform for Affine3A {
    fn transform_point(&self, point: Vec3) -> Vec3 {
        self.transform_point3(point)
    }

    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        aabb.transform((*self).into())
    }
}
