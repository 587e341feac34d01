//! Outline Shapes
//!
//! The view a region needs of a curved outline: its bounds, its raw
//! vertices and its triangulation.

use curvegraph_core::Aabb;
use serde::{Deserialize, Serialize};

use crate::geometry::{Triangle, Vertex};

/// Which vertex set a triangulation is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VerticesState {
    /// The outline's control points as given
    Original,
    /// Control points converted to quadratic NURBS segments
    #[default]
    QuadraticNurbs,
}

/// A tessellated curved outline
pub trait OutlineShape {
    /// Bounding box of the untransformed shape
    fn bounds(&self) -> Aabb;

    /// Triangulation of the shape for the requested vertex state
    fn triangles(&self, state: VerticesState) -> &[Triangle];

    /// Raw vertices the triangulation may alias
    fn vertices(&self) -> &[Vertex];
}

impl<T: OutlineShape + ?Sized> OutlineShape for &T {
    fn bounds(&self) -> Aabb {
        (**self).bounds()
    }

    fn triangles(&self, state: VerticesState) -> &[Triangle] {
        (**self).triangles(state)
    }

    fn vertices(&self) -> &[Vertex] {
        (**self).vertices()
    }
}

/// Outline whose tessellation has already been computed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TessellatedShape {
    /// Raw outline vertices
    #[serde(default)]
    pub vertices: Vec<Vertex>,
    /// Triangles, aliasing `vertices` or carrying fresh vertices
    #[serde(default)]
    pub triangles: Vec<Triangle>,
}

impl TessellatedShape {
    pub fn new(vertices: Vec<Vertex>, triangles: Vec<Triangle>) -> Self {
        Self { vertices, triangles }
    }
}

impl OutlineShape for TessellatedShape {
    fn bounds(&self) -> Aabb {
        let raw = self.vertices.iter().map(|v| v.position);
        let tris = self
            .triangles
            .iter()
            .flat_map(|t| t.vertices.iter().map(|v| v.position));
        Aabb::from_points(raw.chain(tris))
    }

    fn triangles(&self, _state: VerticesState) -> &[Triangle] {
        &self.triangles
    }

    fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }
}
