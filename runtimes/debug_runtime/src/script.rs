use cgmath::{vec2, vec3, Deg, Quaternion, Rotation3};
use dinovr::{Handedness, InputContext, Pose};

/// Canned controller timeline for the headless run. Exercises the full
/// loop: a valid teleport, a snap turn, and an out-of-bounds attempt that
/// must leave the rig where it is.
pub fn input_for_time(t: f32) -> InputContext {
    let mut input = InputContext::default();
    input.head = Pose {
        position: vec3(0.0, 1.6, 0.0),
        rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
    };

    let right = input.hand_mut(Handedness::Right);
    right.pose.position = vec3(0.2, 1.4, -0.1);
    right.pose.rotation = Quaternion::from_angle_x(Deg(-15.0));

    if (0.5..1.5).contains(&t) {
        // Hold a teleport gesture, aiming slightly downward ahead.
        right.thumbstick = vec2(0.0, -1.0);
    } else if (2.0..2.4).contains(&t) {
        // Snap turn to the right.
        right.thumbstick = vec2(1.0, 0.0);
    } else if (3.0..4.0).contains(&t) {
        // Aim high for maximum range; after the first hop and the turn
        // this overshoots the walkable platform, so the release must not
        // move the rig.
        right.pose.rotation = Quaternion::from_angle_x(Deg(20.0));
        right.thumbstick = vec2(0.0, -1.0);
    }

    input
}
