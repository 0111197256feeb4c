use cgmath::Vector3;

/// Raw RGBA texture bytes for the host to upload (e.g. the guide beam's
/// 1D fade gradient).
#[derive(Clone, Debug)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Scrolling dash pattern parameters for beam-style materials. `time` is
/// advanced by the owner; the host feeds all three to its shader uniforms.
#[derive(Clone, Copy, Debug)]
pub struct DashParams {
    pub count: f32,
    pub speed: f32,
    pub time: f32,
}

/// Host-facing material description. No GPU state lives here; the render
/// host decides how to realize blending and texturing.
#[derive(Clone, Debug)]
pub struct Material {
    pub color: Vector3<f32>,
    pub opacity: f32,
    pub additive_blend: bool,
    pub map: Option<TextureData>,
    pub dash: Option<DashParams>,
}

impl Material {
    pub fn solid(color: Vector3<f32>) -> Material {
        Material {
            color,
            opacity: 1.0,
            additive_blend: false,
            map: None,
            dash: None,
        }
    }
}
