// Teleport locomotion.
//
// Standard VR teleport movement: the player points a controller, a
// ballistic guide beam shows where they would land, and on release the
// viewpoint moves there through a configurable transition effect instead of
// smooth (motion-sickness-prone) locomotion.

pub mod ballistic;
pub mod effect;
pub mod guide;
pub mod manager;
pub mod nav_clipper;

pub use ballistic::BallisticCurve;
pub use effect::{FadeEffect, LocomotionEffect, SlideEffect, SnapEffect, TransitionContext};
pub use guide::TeleportGuide;
pub use manager::{
    ControllerHandle, LocomotionCallbacks, LocomotionManager, TeleportState, ValidityPredicate,
};
pub use nav_clipper::{ClipResult, NavigationClipper};
