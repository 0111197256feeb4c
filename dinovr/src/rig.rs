use cgmath::{Matrix4, Quaternion, Rad, Rotation, Rotation3, Vector3};

/// The locomotion group: the transform that parents the viewer and the
/// controllers. Teleports translate it, snap turns rotate it; the physical
/// play space rides along inside it.
#[derive(Clone, Copy, Debug)]
pub struct PlayerRig {
    /// World position of the rig origin (the physical floor center).
    pub position: Vector3<f32>,
    /// Accumulated snap-turn rotation about +Y.
    pub yaw: Rad<f32>,
    /// Opacity of the host-drawn full-screen overlay, written by fade-style
    /// transition effects. 0 when no transition is masking the view.
    pub fade_opacity: f32,
}

impl PlayerRig {
    pub fn new(position: Vector3<f32>) -> PlayerRig {
        PlayerRig {
            position,
            yaw: Rad(0.0),
            fade_opacity: 0.0,
        }
    }

    pub fn rotation(&self) -> Quaternion<f32> {
        Quaternion::from_angle_y(self.yaw)
    }

    pub fn transform(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position) * Matrix4::from(self.rotation())
    }

    pub fn to_world(&self, local: Vector3<f32>) -> Vector3<f32> {
        self.rotation() * local + self.position
    }

    pub fn to_local(&self, world: Vector3<f32>) -> Vector3<f32> {
        self.rotation().invert() * (world - self.position)
    }

    pub fn direction_to_world(&self, local: Vector3<f32>) -> Vector3<f32> {
        self.rotation() * local
    }
}
