//! Render-ready geometry
//!
//! [`EdgeGeometry`] is the flat line-list position buffer derived from the
//! current node positions. [`cube_mesh`] is the shared unit cube every node
//! is drawn with.

use bytemuck::{Pod, Zeroable};

use crate::graph::GraphStore;

/// Floats per edge: two endpoints of three coordinates each
pub const FLOATS_PER_EDGE: usize = 6;

/// Line-list positions for every edge, in edge-list order.
///
/// The buffer has no state of its own: [`EdgeGeometry::rebuild`] recomputes
/// it from the store every time positions change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeGeometry {
    positions: Vec<f32>,
}

impl EdgeGeometry {
    /// Create a buffer already in sync with `store`
    pub fn from_store(store: &GraphStore) -> Self {
        let mut geometry = Self {
            positions: Vec::with_capacity(store.edge_count() * FLOATS_PER_EDGE),
        };
        geometry.rebuild(store);
        geometry
    }

    /// Recompute the buffer from the current node positions
    pub fn rebuild(&mut self, store: &GraphStore) {
        let nodes = store.nodes();
        self.positions.clear();
        for edge in store.edges() {
            self.positions.extend_from_slice(&nodes[edge.a].position);
            self.positions.extend_from_slice(&nodes[edge.b].position);
        }
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Number of line vertices (two per edge)
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn segment_count(&self) -> usize {
        self.positions.len() / FLOATS_PER_EDGE
    }

    /// Raw bytes for vertex buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }
}

/// A cube vertex with position and texture coordinate.
///
/// Layout matches the vertex shader input for direct buffer upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CubeVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Vertices in the cube mesh (6 faces, 2 triangles each)
pub const CUBE_VERTEX_COUNT: usize = 36;

/// Generate a unit cube centered on the origin as a triangle list.
///
/// Every face maps the full texture, so a node's icon appears on all six
/// sides.
pub fn cube_mesh() -> Vec<CubeVertex> {
    let s = 0.5;
    let a = [-s, -s, s];
    let b = [s, -s, s];
    let c = [s, s, s];
    let d = [-s, s, s];
    let e = [-s, -s, -s];
    let f = [s, -s, -s];
    let g = [s, s, -s];
    let h = [-s, s, -s];

    let faces = [
        [a, b, c, d], // +Z
        [b, f, g, c], // +X
        [f, e, h, g], // -Z
        [e, a, d, h], // -X
        [d, c, g, h], // +Y
        [b, a, e, f], // -Y
    ];
    let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    faces
        .iter()
        .flat_map(|quad| {
            [0, 1, 2, 0, 2, 3].map(|i| CubeVertex {
                position: quad[i],
                uv: uvs[i],
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_store() -> GraphStore {
        GraphStore::build(
            vec![
                ("a".to_string(), [1.0, 2.0, 3.0]),
                ("b".to_string(), [4.0, 5.0, 6.0]),
                ("c".to_string(), [7.0, 8.0, 9.0]),
            ],
            vec![("a", "b"), ("b", "c")],
        )
        .unwrap()
    }

    #[test]
    fn test_edge_geometry_layout() {
        let geometry = EdgeGeometry::from_store(&path_store());
        assert_eq!(
            geometry.positions(),
            &[
                1.0, 2.0, 3.0, 4.0, 5.0, 6.0, // a-b
                4.0, 5.0, 6.0, 7.0, 8.0, 9.0, // b-c
            ]
        );
        assert_eq!(geometry.segment_count(), 2);
        assert_eq!(geometry.vertex_count(), 4);
    }

    #[test]
    fn test_edge_geometry_tracks_positions() {
        let mut store = path_store();
        let mut geometry = EdgeGeometry::from_store(&store);

        store.nodes_mut()[1].position = [0.0, 0.0, 0.0];
        geometry.rebuild(&store);

        assert_eq!(&geometry.positions()[3..9], &[0.0; 6]);
        assert_eq!(geometry.positions().len(), 12);
    }

    #[test]
    fn test_edge_geometry_empty() {
        let store = GraphStore::build(
            vec![("a".to_string(), [0.0; 3])],
            Vec::<(&str, &str)>::new(),
        )
        .unwrap();
        let geometry = EdgeGeometry::from_store(&store);
        assert!(geometry.positions().is_empty());
        assert!(geometry.as_bytes().is_empty());
    }

    #[test]
    fn test_edge_geometry_bytes() {
        let geometry = EdgeGeometry::from_store(&path_store());
        assert_eq!(geometry.as_bytes().len(), 12 * std::mem::size_of::<f32>());
    }

    #[test]
    fn test_cube_vertex_size() {
        // 3 floats (position) + 2 floats (uv) = 20 bytes
        assert_eq!(std::mem::size_of::<CubeVertex>(), 20);
    }

    #[test]
    fn test_cube_mesh_counts() {
        let mesh = cube_mesh();
        assert_eq!(mesh.len(), CUBE_VERTEX_COUNT);
        assert_eq!(mesh.len() % 3, 0);
    }

    #[test]
    fn test_cube_mesh_unit_extent() {
        for v in cube_mesh() {
            for coord in v.position {
                assert_eq!(coord.abs(), 0.5);
            }
            for t in v.uv {
                assert!(t == 0.0 || t == 1.0);
            }
        }
    }

    #[test]
    fn test_cube_faces_are_planar() {
        // Each face shares one coordinate across its six vertices
        for face in cube_mesh().chunks(6) {
            let shared = (0..3).any(|axis| {
                face.iter()
                    .all(|v| v.position[axis] == face[0].position[axis])
            });
            assert!(shared, "face {:?} is not axis-aligned", face);
        }
    }
}
