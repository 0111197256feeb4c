use cgmath::{vec3, Vector3};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_4;

/// Tunables for the teleport locomotion system. The defaults reproduce the
/// dinosaur pen's handling: an 8 m/s launch, a 16-segment guide beam, and a
/// 4 m fall limit.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Initial speed of the virtual ball cast from the controller, in m/s.
    pub launch_speed: f32,
    /// Constant acceleration applied to the guide trajectory.
    pub gravity: Vector3<f32>,
    /// Number of segments in the rendered guide beam.
    pub guide_segments: usize,
    /// Half-width of the beam cross section, in meters.
    pub ray_radius: f32,
    /// Dash repetitions along the beam and scroll speed of the pattern.
    pub dash_count: f32,
    pub dash_speed: f32,
    /// Fixed walkable-ground height. When `None` and navigation meshes are
    /// supplied, the flight-time probe instead aims below the rig origin.
    pub ground_height: Option<f32>,
    /// How far below the rig origin the probe reaches when no fixed ground
    /// height is configured.
    pub probe_below_offset: f32,
    /// Largest vertical drop a destination may be below the controller.
    pub max_fall_distance: f32,
    /// Minimum dot product between a hit surface normal and +Y for the
    /// surface to count as walkable.
    pub up_threshold: f32,
    pub valid_color: Vector3<f32>,
    pub invalid_color: Vector3<f32>,
    /// Diameter of the landing indicator, in meters.
    pub target_size: f32,
    /// Thumbstick deflection that starts/holds a teleport gesture.
    pub teleport_axis_threshold: f32,
    /// Sideways deflection that triggers a snap turn, and the angle stepped.
    pub turn_axis_threshold: f32,
    pub snap_turn_increment: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        LocomotionConfig {
            launch_speed: 8.0,
            gravity: vec3(0.0, -9.8, 0.0),
            guide_segments: 16,
            ray_radius: 0.02,
            dash_count: 8.0,
            dash_speed: 2.0,
            ground_height: None,
            probe_below_offset: 2.0,
            max_fall_distance: 4.0,
            up_threshold: 0.1,
            valid_color: vec3(0.0, 0.8, 1.0),
            invalid_color: vec3(1.0, 0.35, 0.1),
            target_size: 0.5,
            teleport_axis_threshold: 0.5,
            turn_axis_threshold: 0.65,
            snap_turn_increment: FRAC_PI_4,
        }
    }
}
