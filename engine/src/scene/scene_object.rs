use std::cell::RefCell;
use std::rc::Rc;

use cgmath::{Matrix4, SquareMatrix};

pub use crate::scene::Geometry;
pub use crate::scene::Material;

/// A drawable: shared material + geometry plus per-object transform and
/// draw flags. Material and geometry are reference-counted so the owner can
/// keep mutating them (color swaps, per-frame vertex rewrites) after handing
/// the object to the render host.
#[derive(Clone)]
pub struct SceneObject {
    pub material: Rc<RefCell<Material>>,
    pub geometry: Rc<RefCell<dyn Geometry>>,
    transform: Matrix4<f32>,
    depth_write: bool,
    visible: bool,
}

impl SceneObject {
    pub fn new(material: Material, geometry: Rc<RefCell<dyn Geometry>>) -> SceneObject {
        SceneObject {
            material: Rc::new(RefCell::new(material)),
            geometry,
            transform: Matrix4::identity(),
            depth_write: true,
            visible: true,
        }
    }

    pub fn set_transform(&mut self, transform: Matrix4<f32>) {
        self.transform = transform;
    }

    pub fn transform(&self) -> Matrix4<f32> {
        self.transform
    }

    pub fn set_depth_write(&mut self, depth_write: bool) {
        self.depth_write = depth_write;
    }

    pub fn depth_write(&self) -> bool {
        self.depth_write
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
