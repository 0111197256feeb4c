use bitflags::bitflags;
use cgmath::{vec3, Quaternion, Vector2, Vector3};

use crate::vr_config::Handedness;

bitflags! {
    /// Digital button state for one controller.
    pub struct Buttons: u8 {
        const TRIGGER  = 0b0001;
        const SQUEEZE  = 0b0010;
        const TOUCHPAD = 0b0100;
        const MENU     = 0b1000;
    }
}

/// Pose of a tracked device in rig-local space (the locomotion group's
/// frame, matching an XR local reference space).
#[derive(Clone, Copy, Debug)]
pub struct Pose {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
}

impl Pose {
    /// The direction the device points: its local -Z axis.
    pub fn forward(&self) -> Vector3<f32> {
        self.rotation * vec3(0.0, 0.0, -1.0)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Pose {
            position: vec3(0.0, 0.0, 0.0),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
        }
    }
}

/// Snapshot of one hand controller for the current frame.
#[derive(Clone, Copy, Debug)]
pub struct Hand {
    pub pose: Pose,
    pub thumbstick: Vector2<f32>,
    pub touchpad: Vector2<f32>,
    pub buttons: Buttons,
}

impl Hand {
    pub fn pressed(&self, buttons: Buttons) -> bool {
        self.buttons.contains(buttons)
    }
}

impl Default for Hand {
    fn default() -> Self {
        Hand {
            pose: Pose::default(),
            thumbstick: Vector2::new(0.0, 0.0),
            touchpad: Vector2::new(0.0, 0.0),
            buttons: Buttons::empty(),
        }
    }
}

/// Per-frame input snapshot, filled in by the platform layer and polled by
/// the locomotion manager. Input arrives only through this struct; device
/// connect/disconnect bookkeeping stays with the platform.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputContext {
    pub left_hand: Hand,
    pub right_hand: Hand,
    pub head: Pose,
}

impl InputContext {
    pub fn hand(&self, handedness: Handedness) -> &Hand {
        match handedness {
            Handedness::Left => &self.left_hand,
            Handedness::Right => &self.right_hand,
        }
    }

    pub fn hand_mut(&mut self, handedness: Handedness) -> &mut Hand {
        match handedness {
            Handedness::Left => &mut self.left_hand,
            Handedness::Right => &mut self.right_hand,
        }
    }
}
