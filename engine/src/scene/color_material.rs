use cgmath::Vector3;

use super::material::Material;

pub fn create(color: Vector3<f32>) -> Material {
    Material::solid(color)
}
