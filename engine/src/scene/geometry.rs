use cgmath::Vector3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexPosition {
    pub position: Vector3<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topology {
    Lines,
    Triangles,
}

/// CPU-side mesh buffers, ready for the render host to upload.
///
/// An empty `indices` vec means the vertices are drawn in order; an empty
/// `uvs` vec means the mesh carries positions only.
#[derive(Clone, Debug)]
pub struct MeshData {
    pub topology: Topology,
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }
}

pub trait Geometry {
    fn data(&self) -> &MeshData;
}
