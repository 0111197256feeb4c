use cgmath::{Rad, Vector3};
use engine::{input_log, locomotion_log};

use super::effect::{LocomotionEffect, TransitionContext};
use super::guide::TeleportGuide;
use crate::config::LocomotionConfig;
use crate::input_context::{Buttons, Hand, InputContext};
use crate::physics::NavMeshSet;
use crate::rig::PlayerRig;
use crate::time::Time;
use crate::vr_config::Handedness;

/// Destination filter supplied by the application, e.g. an arena bounds
/// check. Must be cheap; it runs every frame while aiming.
pub type ValidityPredicate = Box<dyn Fn(Vector3<f32>) -> bool>;

/// Optional notification hooks around selection and transition phases.
/// All are fire-and-forget; the state machine never depends on them.
#[derive(Default)]
pub struct LocomotionCallbacks {
    pub on_start_select: Option<Box<dyn FnMut()>>,
    pub on_end_select: Option<Box<dyn FnMut()>>,
    pub on_start_transition: Option<Box<dyn FnMut(Vector3<f32>, Vector3<f32>)>>,
    pub on_end_transition: Option<Box<dyn FnMut()>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TeleportState {
    Idle,
    Selecting,
    Transitioning,
}

/// Handle returned by `add_controller`, identifying one registered
/// controller to the manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControllerHandle(usize);

/// Per-controller gesture bookkeeping. Both activation methods are latched
/// independently so a held input produces exactly one start event.
struct ControllerTracker {
    handedness: Handedness,
    touchpad_held: bool,
    stick_held: bool,
    turn_ready: bool,
}

impl ControllerTracker {
    fn new(handedness: Handedness) -> ControllerTracker {
        ControllerTracker {
            handedness,
            touchpad_held: false,
            stick_held: false,
            turn_ready: true,
        }
    }

    fn gesture_active(&self) -> bool {
        self.touchpad_held || self.stick_held
    }
}

/// Top-level teleport locomotion driver.
///
/// Polls registered controllers once per frame, runs the teleport guide
/// while a gesture is held, and plays the configured transition effect when
/// a valid destination is committed. At most one controller selects at a
/// time, and no new teleport can begin while a transition is in flight.
pub struct LocomotionManager {
    config: LocomotionConfig,
    guide: TeleportGuide,
    effect: Box<dyn LocomotionEffect>,
    state: TeleportState,
    controllers: Vec<ControllerTracker>,
    selecting: Option<usize>,
    nav: Option<NavMeshSet>,
    predicate: Option<ValidityPredicate>,
    callbacks: LocomotionCallbacks,
    transition_start: Vector3<f32>,
    transition_end: Vector3<f32>,
    transition_elapsed: f32,
}

impl LocomotionManager {
    pub fn new(config: LocomotionConfig, effect: Box<dyn LocomotionEffect>) -> LocomotionManager {
        let guide = TeleportGuide::new(config.clone());
        LocomotionManager {
            config,
            guide,
            effect,
            state: TeleportState::Idle,
            controllers: Vec::new(),
            selecting: None,
            nav: None,
            predicate: None,
            callbacks: LocomotionCallbacks::default(),
            transition_start: Vector3::new(0.0, 0.0, 0.0),
            transition_end: Vector3::new(0.0, 0.0, 0.0),
            transition_elapsed: 0.0,
        }
    }

    /// Register a controller for input polling. The handle stays valid for
    /// the manager's lifetime; there is no unregistration, a vanished
    /// device simply reports neutral input.
    pub fn add_controller(&mut self, handedness: Handedness) -> ControllerHandle {
        self.controllers.push(ControllerTracker::new(handedness));
        ControllerHandle(self.controllers.len() - 1)
    }

    pub fn set_navigation_meshes(&mut self, nav: NavMeshSet) {
        self.nav = Some(nav);
    }

    pub fn set_validity_predicate(&mut self, predicate: ValidityPredicate) {
        self.predicate = Some(predicate);
    }

    pub fn set_callbacks(&mut self, callbacks: LocomotionCallbacks) {
        self.callbacks = callbacks;
    }

    /// Swap the transition strategy. Takes effect from the next committed
    /// teleport; an in-flight transition keeps its current effect.
    pub fn set_effect(&mut self, effect: Box<dyn LocomotionEffect>) {
        if self.state != TeleportState::Transitioning {
            self.effect = effect;
        }
    }

    pub fn state(&self) -> TeleportState {
        self.state
    }

    /// The controller currently holding a teleport gesture, if any.
    pub fn selecting_controller(&self) -> Option<ControllerHandle> {
        self.selecting.map(ControllerHandle)
    }

    pub fn guide(&self) -> &TeleportGuide {
        &self.guide
    }

    /// Drive one frame: input edges first, then the guide, then (on other
    /// frames) the transition. A frame never runs both the guide and the
    /// transition.
    pub fn update(&mut self, time: &Time, input: &InputContext, rig: &mut PlayerRig) {
        if self.state == TeleportState::Transitioning {
            // Single flight: gesture input is not even polled until the
            // transition lands, so latches pick up afterwards.
            self.advance_transition(time, rig);
            return;
        }

        self.poll_controllers(input, rig);

        if self.state == TeleportState::Selecting {
            if let Some(index) = self.selecting {
                let hand = *input.hand(self.controllers[index].handedness);
                self.guide.update_guide_for_controller(
                    &hand.pose,
                    rig,
                    self.nav.as_ref(),
                    self.predicate.as_deref(),
                    time,
                );
            }
        }
    }

    fn poll_controllers(&mut self, input: &InputContext, rig: &mut PlayerRig) {
        for index in 0..self.controllers.len() {
            let hand = *input.hand(self.controllers[index].handedness);

            self.poll_gesture(index, &hand, input, rig);
            self.poll_snap_turn(index, &hand, rig);
        }
    }

    fn poll_gesture(&mut self, index: usize, hand: &Hand, input: &InputContext, rig: &mut PlayerRig) {
        // Two activation methods: touchpad press with the pad deflected
        // forward, or a bare thumbstick push past the threshold.
        let touchpad = hand.pressed(Buttons::TOUCHPAD)
            && -hand.touchpad.y > self.config.teleport_axis_threshold;
        let stick = -hand.thumbstick.y > self.config.teleport_axis_threshold;

        let was_active = self.controllers[index].gesture_active();
        self.controllers[index].touchpad_held = touchpad;
        self.controllers[index].stick_held = stick;
        let is_active = self.controllers[index].gesture_active();

        if is_active && !was_active {
            self.on_gesture_start(index);
        } else if !is_active && was_active {
            self.on_gesture_end(index, input, rig);
        }
    }

    fn poll_snap_turn(&mut self, index: usize, hand: &Hand, rig: &mut PlayerRig) {
        let deflection = hand.thumbstick.x;
        let tracker = &mut self.controllers[index];

        if deflection.abs() > self.config.turn_axis_threshold {
            if tracker.turn_ready {
                tracker.turn_ready = false;
                let step = self.config.snap_turn_increment * -deflection.signum();
                rig.yaw += Rad(step);
                input_log!(DEBUG, "snap turn to yaw {:?}", rig.yaw);
            }
        } else {
            tracker.turn_ready = true;
        }
    }

    fn on_gesture_start(&mut self, index: usize) {
        // First to start wins; a second controller's gesture is ignored
        // until the active one resolves.
        if self.state != TeleportState::Idle {
            return;
        }

        locomotion_log!(DEBUG, "gesture start, controller {}", index);
        self.state = TeleportState::Selecting;
        self.selecting = Some(index);
        self.guide.set_visible(true);
        if let Some(cb) = self.callbacks.on_start_select.as_mut() {
            cb();
        }
    }

    fn on_gesture_end(&mut self, index: usize, input: &InputContext, rig: &mut PlayerRig) {
        // Stale or duplicate release events from a non-selecting
        // controller carry no meaning here.
        if self.state != TeleportState::Selecting || self.selecting != Some(index) {
            return;
        }

        let offset = self.guide.teleport_offset(rig, &input.head);

        self.guide.set_visible(false);
        self.selecting = None;
        if let Some(cb) = self.callbacks.on_end_select.as_mut() {
            cb();
        }

        match offset {
            Some(offset) => self.begin_transition(offset, rig),
            None => {
                locomotion_log!(DEBUG, "gesture end with invalid destination");
                self.state = TeleportState::Idle;
            }
        }
    }

    fn begin_transition(&mut self, offset: Vector3<f32>, rig: &mut PlayerRig) {
        self.transition_start = rig.position;
        self.transition_end = rig.position + offset;
        self.transition_elapsed = 0.0;
        self.state = TeleportState::Transitioning;

        locomotion_log!(
            DEBUG,
            "transition start {:?} -> {:?}",
            self.transition_start,
            self.transition_end
        );
        if let Some(cb) = self.callbacks.on_start_transition.as_mut() {
            cb(self.transition_start, self.transition_end);
        }

        let (start, end) = (self.transition_start, self.transition_end);
        self.effect
            .start_effect(&mut TransitionContext { start, end, rig });

        // A zero-duration effect never gets a per-frame phase: finish now,
        // inside the same frame the destination was committed.
        if self.effect.duration() <= 0.0 {
            self.end_transition(rig);
        }
    }

    fn advance_transition(&mut self, time: &Time, rig: &mut PlayerRig) {
        self.transition_elapsed += time.elapsed_seconds();
        let duration = self.effect.duration();

        if duration > 0.0 {
            let t = (self.transition_elapsed / duration).min(1.0);
            let (start, end) = (self.transition_start, self.transition_end);
            self.effect
                .update_effect(t, &mut TransitionContext { start, end, rig });
        }

        if self.transition_elapsed >= duration {
            self.end_transition(rig);
        }
    }

    /// Finish the active transition. Idempotent: both the natural
    /// duration-elapsed path and a forced completion may call it, and a
    /// call with no transition in flight does nothing.
    pub fn end_transition(&mut self, rig: &mut PlayerRig) {
        if self.state != TeleportState::Transitioning {
            return;
        }

        let (start, end) = (self.transition_start, self.transition_end);
        self.effect
            .end_effect(&mut TransitionContext { start, end, rig });
        self.state = TeleportState::Idle;

        locomotion_log!(DEBUG, "transition end at {:?}", rig.position);
        if let Some(cb) = self.callbacks.on_end_transition.as_mut() {
            cb();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locomotion::effect::{FadeEffect, SlideEffect, SnapEffect};
    use cgmath::{vec2, vec3, InnerSpace, Quaternion};
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    const FRAME: Duration = Duration::from_millis(10);

    fn frame_time() -> Time {
        Time::new(Duration::ZERO, FRAME)
    }

    fn manager_over_flat_ground(effect: Box<dyn LocomotionEffect>) -> LocomotionManager {
        let config = LocomotionConfig {
            ground_height: Some(0.0),
            ..LocomotionConfig::default()
        };
        LocomotionManager::new(config, effect)
    }

    fn aiming_input(handedness: Handedness) -> InputContext {
        let mut input = InputContext::default();
        let hand = input.hand_mut(handedness);
        hand.pose.position = vec3(0.0, 1.5, 0.0);
        hand.pose.rotation = Quaternion::new(1.0, 0.0, 0.0, 0.0);
        hand.thumbstick = vec2(0.0, -1.0);
        input
    }

    fn released_input() -> InputContext {
        InputContext::default()
    }

    #[test]
    fn press_aim_release_teleports_with_snap() {
        let mut manager = manager_over_flat_ground(Box::new(SnapEffect));
        manager.add_controller(Handedness::Right);
        let mut rig = PlayerRig::new(vec3(0.0, 0.0, 0.0));

        manager.update(&frame_time(), &aiming_input(Handedness::Right), &mut rig);
        assert_eq!(manager.state(), TeleportState::Selecting);

        // Snap finishes selecting -> transitioning -> idle in one frame.
        manager.update(&frame_time(), &released_input(), &mut rig);
        assert_eq!(manager.state(), TeleportState::Idle);
        assert!(rig.position.z < -1.0);
        assert!(rig.position.y.abs() < 1e-3);
    }

    #[test]
    fn holding_the_stick_does_not_retrigger() {
        let mut manager = manager_over_flat_ground(Box::new(SnapEffect));
        manager.add_controller(Handedness::Right);
        let mut rig = PlayerRig::new(vec3(0.0, 0.0, 0.0));

        let starts = Rc::new(Cell::new(0));
        let counter = starts.clone();
        manager.set_callbacks(LocomotionCallbacks {
            on_start_select: Some(Box::new(move || counter.set(counter.get() + 1))),
            ..LocomotionCallbacks::default()
        });

        let input = aiming_input(Handedness::Right);
        for _ in 0..5 {
            manager.update(&frame_time(), &input, &mut rig);
        }

        assert_eq!(starts.get(), 1);
    }

    #[test]
    fn touchpad_press_requires_deflection() {
        let mut manager = manager_over_flat_ground(Box::new(SnapEffect));
        manager.add_controller(Handedness::Right);
        let mut rig = PlayerRig::new(vec3(0.0, 0.0, 0.0));

        // Resting thumb on a pressed pad: not a teleport gesture.
        let mut input = InputContext::default();
        input.hand_mut(Handedness::Right).buttons = Buttons::TOUCHPAD;
        manager.update(&frame_time(), &input, &mut rig);
        assert_eq!(manager.state(), TeleportState::Idle);

        // Press plus a forward deflection starts selecting.
        let hand = input.hand_mut(Handedness::Right);
        hand.pose.position = vec3(0.0, 1.5, 0.0);
        hand.touchpad = vec2(0.0, -1.0);
        manager.update(&frame_time(), &input, &mut rig);
        assert_eq!(manager.state(), TeleportState::Selecting);
    }

    #[test]
    fn single_flight_between_two_controllers() {
        let mut manager = manager_over_flat_ground(Box::new(SnapEffect));
        manager.add_controller(Handedness::Left);
        manager.add_controller(Handedness::Right);
        let mut rig = PlayerRig::new(vec3(0.0, 0.0, 0.0));

        // Both controllers start a gesture in the same frame.
        let mut input = aiming_input(Handedness::Left);
        let right = input.hand_mut(Handedness::Right);
        right.pose.position = vec3(0.3, 1.5, 0.0);
        right.thumbstick = vec2(0.0, -1.0);

        manager.update(&frame_time(), &input, &mut rig);
        assert_eq!(manager.state(), TeleportState::Selecting);
        let first = manager.selecting_controller().expect("one wins");

        // Releasing the second controller is a stale event: still selecting.
        let mut left_only = input;
        left_only.hand_mut(Handedness::Right).thumbstick = vec2(0.0, 0.0);
        manager.update(&frame_time(), &left_only, &mut rig);
        assert_eq!(manager.state(), TeleportState::Selecting);
        assert_eq!(manager.selecting_controller(), Some(first));

        // Releasing the first resolves the teleport.
        manager.update(&frame_time(), &released_input(), &mut rig);
        assert_eq!(manager.state(), TeleportState::Idle);
    }

    #[test]
    fn invalid_destination_returns_to_idle_without_moving() {
        let mut manager = manager_over_flat_ground(Box::new(SnapEffect));
        manager.set_validity_predicate(Box::new(|_| false));
        manager.add_controller(Handedness::Right);
        let mut rig = PlayerRig::new(vec3(0.0, 0.0, 0.0));

        manager.update(&frame_time(), &aiming_input(Handedness::Right), &mut rig);
        manager.update(&frame_time(), &released_input(), &mut rig);

        assert_eq!(manager.state(), TeleportState::Idle);
        assert_eq!(rig.position, vec3(0.0, 0.0, 0.0));
    }

    #[test]
    fn slide_transition_spans_frames_and_lands_exactly() {
        let mut manager = manager_over_flat_ground(Box::new(SlideEffect::new(0.1)));
        manager.add_controller(Handedness::Right);
        let mut rig = PlayerRig::new(vec3(0.0, 0.0, 0.0));

        manager.update(&frame_time(), &aiming_input(Handedness::Right), &mut rig);
        let expected = manager.guide().target_point();
        manager.update(&frame_time(), &released_input(), &mut rig);
        assert_eq!(manager.state(), TeleportState::Transitioning);

        // Gesture input during the transition is ignored entirely.
        for _ in 0..20 {
            manager.update(&frame_time(), &aiming_input(Handedness::Right), &mut rig);
            if manager.state() == TeleportState::Idle {
                break;
            }
        }

        assert_eq!(manager.state(), TeleportState::Idle);
        assert!((rig.position - expected).magnitude() < 1e-4);
    }

    #[test]
    fn fade_masks_the_jump_mid_transition() {
        let mut manager = manager_over_flat_ground(Box::new(FadeEffect::new(0.1)));
        manager.add_controller(Handedness::Right);
        let mut rig = PlayerRig::new(vec3(0.0, 0.0, 0.0));

        manager.update(&frame_time(), &aiming_input(Handedness::Right), &mut rig);
        manager.update(&frame_time(), &released_input(), &mut rig);

        let mut peak_opacity = 0.0f32;
        while manager.state() == TeleportState::Transitioning {
            manager.update(&frame_time(), &released_input(), &mut rig);
            peak_opacity = peak_opacity.max(rig.fade_opacity);
        }

        assert!(peak_opacity > 0.9);
        assert_eq!(rig.fade_opacity, 0.0);
        assert!(rig.position.z < -1.0);
    }

    #[test]
    fn end_transition_is_idempotent() {
        let mut manager = manager_over_flat_ground(Box::new(SlideEffect::new(0.1)));
        manager.add_controller(Handedness::Right);
        let mut rig = PlayerRig::new(vec3(0.0, 0.0, 0.0));

        manager.update(&frame_time(), &aiming_input(Handedness::Right), &mut rig);
        manager.update(&frame_time(), &released_input(), &mut rig);
        assert_eq!(manager.state(), TeleportState::Transitioning);

        manager.end_transition(&mut rig);
        let landed = rig.position;
        assert_eq!(manager.state(), TeleportState::Idle);

        // Second call: no state change, no motion, no panic.
        manager.end_transition(&mut rig);
        assert_eq!(manager.state(), TeleportState::Idle);
        assert_eq!(rig.position, landed);
    }

    #[test]
    fn snap_turn_steps_once_per_deflection() {
        let mut manager = manager_over_flat_ground(Box::new(SnapEffect));
        manager.add_controller(Handedness::Right);
        let mut rig = PlayerRig::new(vec3(0.0, 0.0, 0.0));

        let mut input = InputContext::default();
        input.hand_mut(Handedness::Right).thumbstick = vec2(1.0, 0.0);

        for _ in 0..4 {
            manager.update(&frame_time(), &input, &mut rig);
        }
        // Held deflection turns exactly once.
        assert!((rig.yaw.0 + std::f32::consts::FRAC_PI_4).abs() < 1e-5);

        // Recenter, deflect again: one more step.
        manager.update(&frame_time(), &InputContext::default(), &mut rig);
        manager.update(&frame_time(), &input, &mut rig);
        assert!((rig.yaw.0 + std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn callbacks_fire_in_order() {
        let log = Rc::new(std::cell::RefCell::new(Vec::new()));

        let mut manager = manager_over_flat_ground(Box::new(SnapEffect));
        manager.add_controller(Handedness::Right);
        let mut rig = PlayerRig::new(vec3(0.0, 0.0, 0.0));

        let push = |tag: &'static str| {
            let log = log.clone();
            move || log.borrow_mut().push(tag)
        };
        manager.set_callbacks(LocomotionCallbacks {
            on_start_select: Some(Box::new(push("start_select"))),
            on_end_select: Some(Box::new(push("end_select"))),
            on_start_transition: {
                let log = log.clone();
                Some(Box::new(move |_, _| log.borrow_mut().push("start_transition")))
            },
            on_end_transition: Some(Box::new(push("end_transition"))),
        });

        manager.update(&frame_time(), &aiming_input(Handedness::Right), &mut rig);
        manager.update(&frame_time(), &released_input(), &mut rig);

        assert_eq!(
            *log.borrow(),
            vec!["start_select", "end_select", "start_transition", "end_transition"]
        );
    }
}
