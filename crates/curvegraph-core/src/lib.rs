//! # curvegraph Core
//!
//! Geometric building blocks shared by the curvegraph crates:
//! - **Bounding volumes**: axis-aligned boxes that grow point by point
//! - **Culling**: frustums built from view-projection matrices
//! - **Transforms**: planar and spatial affine transforms for shapes

pub mod math;
pub mod transform;

pub use math::{Aabb, CullVolume, Frustum, Plane};
pub use transform::ShapeTransform;
