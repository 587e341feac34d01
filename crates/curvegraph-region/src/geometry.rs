//! Vertices and Triangles
//!
//! Geometry as handed over by an outline tessellator.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Identity of a tessellated vertex
///
/// Decided once by the tessellator and carried through ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VertexId {
    /// Synthesized by the tessellator, has no slot in the shape's raw vertex list
    #[default]
    Fresh,
    /// Alias of the raw vertex at this position in the shape's own vertex list
    Aliased(u32),
}

impl VertexId {
    /// Relative raw-vertex slot, if any
    pub fn relative_index(&self) -> Option<u32> {
        match self {
            Self::Fresh => None,
            Self::Aliased(index) => Some(*index),
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh)
    }
}

/// Outline vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Position
    pub position: Vec3,
    /// Curve texture parameters
    #[serde(default)]
    pub tex_coord: Vec2,
    /// Identity assigned by the tessellator
    #[serde(default)]
    pub id: VertexId,
}

impl Vertex {
    /// Create a fresh vertex
    pub fn new(position: Vec3, tex_coord: Vec2) -> Self {
        Self {
            position,
            tex_coord,
            id: VertexId::Fresh,
        }
    }

    /// Create a vertex aliasing raw slot `index`
    pub fn aliased(position: Vec3, tex_coord: Vec2, index: u32) -> Self {
        Self {
            position,
            tex_coord,
            id: VertexId::Aliased(index),
        }
    }

    /// Copy of this vertex carrying a different identity
    pub fn with_id(mut self, id: VertexId) -> Self {
        self.id = id;
        self
    }
}

/// Triangle of the tessellated outline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Build a triangle whose corners alias raw slots `indices` of `raw`
    ///
    /// Returns `None` if any index is out of range.
    pub fn from_raw(raw: &[Vertex], indices: [u32; 3]) -> Option<Self> {
        let corner = |i: u32| {
            raw.get(i as usize)
                .map(|v| v.with_id(VertexId::Aliased(i)))
        };
        Some(Self::new(corner(indices[0])?, corner(indices[1])?, corner(indices[2])?))
    }

    /// Identity deciding how the whole triangle is indexed
    pub fn lead_id(&self) -> VertexId {
        self.vertices[0].id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_default_identity() {
        let v = Vertex::new(Vec3::ZERO, Vec2::ZERO);
        assert!(v.id.is_fresh());
        assert_eq!(v.id.relative_index(), None);
    }

    #[test]
    fn test_triangle_from_raw() {
        let raw = [
            Vertex::new(Vec3::ZERO, Vec2::ZERO),
            Vertex::new(Vec3::X, Vec2::X),
            Vertex::new(Vec3::Y, Vec2::Y),
        ];
        let tri = Triangle::from_raw(&raw, [2, 0, 1]).unwrap();
        assert_eq!(tri.lead_id(), VertexId::Aliased(2));
        assert_eq!(tri.vertices[0].position, Vec3::Y);
        assert_eq!(tri.vertices[1].id.relative_index(), Some(0));

        assert!(Triangle::from_raw(&raw, [0, 1, 3]).is_none());
    }

    #[test]
    fn test_vertex_id_serde() {
        let json = serde_json::to_string(&VertexId::Aliased(4)).unwrap();
        let back: VertexId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, VertexId::Aliased(4));

        let fresh: VertexId = serde_json::from_str("\"Fresh\"").unwrap();
        assert!(fresh.is_fresh());
    }
}
