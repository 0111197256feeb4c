use super::geometry::{Geometry, MeshData, Topology};

/// Unit quad lying in the XZ plane, facing +Y. Used for ground markers;
/// scale/orient through the owning scene object's transform.
pub struct Quad {
    data: MeshData,
}

pub fn create() -> Quad {
    Quad {
        data: MeshData {
            topology: Topology::Triangles,
            positions: vec![
                [-0.5, 0.0, -0.5],
                [0.5, 0.0, -0.5],
                [-0.5, 0.0, 0.5],
                [0.5, 0.0, 0.5],
            ],
            uvs: vec![[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]],
            indices: vec![0, 2, 1, 1, 2, 3],
        },
    }
}

impl Geometry for Quad {
    fn data(&self) -> &MeshData {
        &self.data
    }
}
