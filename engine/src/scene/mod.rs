pub mod geometry;
pub use geometry::{Geometry, MeshData, Topology, VertexPosition};

pub mod material;
pub use material::{DashParams, Material, TextureData};

pub mod color_material;

pub mod scene_object;
pub use scene_object::SceneObject;

pub mod dynamic_mesh;
pub use dynamic_mesh::DynamicMesh;

pub mod lines_mesh;
pub use lines_mesh::LinesMesh;

pub mod quad;
pub use quad::{create as create_quad, Quad};
