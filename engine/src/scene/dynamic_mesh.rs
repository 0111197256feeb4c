use super::geometry::{Geometry, MeshData};

/// Indexed triangle mesh whose positions are rewritten every frame while the
/// topology, uvs, and indices stay fixed. The host checks `take_dirty` after
/// each update to decide whether the vertex buffer needs a re-upload.
pub struct DynamicMesh {
    data: MeshData,
    positions_dirty: bool,
}

impl DynamicMesh {
    pub fn new(data: MeshData) -> DynamicMesh {
        DynamicMesh {
            data,
            positions_dirty: true,
        }
    }

    /// Overwrite the position buffer in place. The new buffer must have the
    /// same vertex count the mesh was created with.
    pub fn write_positions(&mut self, positions: &[[f32; 3]]) {
        debug_assert_eq!(positions.len(), self.data.positions.len());
        self.data.positions.copy_from_slice(positions);
        self.positions_dirty = true;
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.positions_dirty)
    }
}

impl Geometry for DynamicMesh {
    fn data(&self) -> &MeshData {
        &self.data
    }
}
