// Locomotion core for the dinosaur-pen VR experience.
//
// The render host owns drawing, assets, and audio; this crate owns how the
// player gets around: the teleport guide beam, destination validation
// against walkable geometry, and the transition effects that move the
// viewpoint without making anyone sick.

pub mod config;
pub mod input_context;
pub mod locomotion;
pub mod physics;
pub mod rig;
pub mod scenes;
pub mod time;
pub mod vr_config;

pub use config::LocomotionConfig;
pub use input_context::{Buttons, Hand, InputContext, Pose};
pub use locomotion::{
    BallisticCurve, FadeEffect, LocomotionCallbacks, LocomotionEffect, LocomotionManager,
    NavigationClipper, SlideEffect, SnapEffect, TeleportGuide, TeleportState,
};
pub use physics::NavMeshSet;
pub use rig::PlayerRig;
pub use time::Time;
pub use vr_config::Handedness;
