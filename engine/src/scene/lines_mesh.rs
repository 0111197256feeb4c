use super::geometry::{Geometry, MeshData, Topology, VertexPosition};

/// Non-indexed line-list mesh: every consecutive vertex pair is one segment.
pub struct LinesMesh {
    data: MeshData,
}

pub fn create(raw_vertices: Vec<VertexPosition>) -> LinesMesh {
    let positions = raw_vertices
        .iter()
        .map(|v| [v.position.x, v.position.y, v.position.z])
        .collect();

    LinesMesh {
        data: MeshData {
            topology: Topology::Lines,
            positions,
            uvs: Vec::new(),
            indices: Vec::new(),
        },
    }
}

impl Geometry for LinesMesh {
    fn data(&self) -> &MeshData {
        &self.data
    }
}
