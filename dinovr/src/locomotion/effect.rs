use cgmath::Vector3;

use crate::rig::PlayerRig;

/// Everything a transition effect may touch while it runs: the committed
/// start/end rig positions and the rig itself.
pub struct TransitionContext<'a> {
    pub start: Vector3<f32>,
    pub end: Vector3<f32>,
    pub rig: &'a mut PlayerRig,
}

/// Strategy for moving the viewpoint once a destination is committed.
///
/// The manager calls `start_effect` once, `update_effect` with normalized
/// progress every frame, and `end_effect` exactly once at completion.
/// `end_effect` must leave the rig at `ctx.end` even if `update_effect`
/// never ran (zero duration) or never reached t = 1.
pub trait LocomotionEffect {
    fn duration(&self) -> f32;

    fn start_effect(&mut self, _ctx: &mut TransitionContext<'_>) {}

    fn update_effect(&mut self, _t: f32, _ctx: &mut TransitionContext<'_>) {}

    fn end_effect(&mut self, ctx: &mut TransitionContext<'_>);
}

/// Instant repositioning: no intermediate frames at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct SnapEffect;

impl LocomotionEffect for SnapEffect {
    fn duration(&self) -> f32 {
        0.0
    }

    fn end_effect(&mut self, ctx: &mut TransitionContext<'_>) {
        ctx.rig.position = ctx.end;
    }
}

/// Linear glide from start to end.
///
/// Keep the duration short: sustained camera motion the user didn't make
/// with their own head is a known VR-comfort hazard, so anything beyond
/// about 0.25s trades comfort for nothing.
#[derive(Clone, Copy, Debug)]
pub struct SlideEffect {
    pub duration: f32,
}

impl SlideEffect {
    pub fn new(duration: f32) -> SlideEffect {
        SlideEffect { duration }
    }
}

impl Default for SlideEffect {
    fn default() -> Self {
        SlideEffect { duration: 0.1 }
    }
}

impl LocomotionEffect for SlideEffect {
    fn duration(&self) -> f32 {
        self.duration
    }

    fn update_effect(&mut self, t: f32, ctx: &mut TransitionContext<'_>) {
        let t = t.clamp(0.0, 1.0);
        ctx.rig.position = ctx.start + (ctx.end - ctx.start) * t;
    }

    fn end_effect(&mut self, ctx: &mut TransitionContext<'_>) {
        ctx.rig.position = ctx.end;
    }
}

/// Fade the view to black, jump while fully obscured, fade back in.
///
/// The overlay opacity ramps up to 1 at the transition midpoint and back
/// down; the position jump happens once, at the first frame at or past the
/// midpoint, while the screen hides the discontinuity.
#[derive(Clone, Copy, Debug)]
pub struct FadeEffect {
    pub duration: f32,
    moved: bool,
}

impl FadeEffect {
    pub fn new(duration: f32) -> FadeEffect {
        FadeEffect {
            duration,
            moved: false,
        }
    }
}

impl Default for FadeEffect {
    fn default() -> Self {
        FadeEffect::new(0.5)
    }
}

impl LocomotionEffect for FadeEffect {
    fn duration(&self) -> f32 {
        self.duration
    }

    fn start_effect(&mut self, ctx: &mut TransitionContext<'_>) {
        self.moved = false;
        ctx.rig.fade_opacity = 0.0;
    }

    fn update_effect(&mut self, t: f32, ctx: &mut TransitionContext<'_>) {
        let t = t.clamp(0.0, 1.0);
        ctx.rig.fade_opacity = (1.0 - (t - 0.5).abs() * 2.0).clamp(0.0, 1.0);

        if t >= 0.5 && !self.moved {
            ctx.rig.position = ctx.end;
            self.moved = true;
        }
    }

    fn end_effect(&mut self, ctx: &mut TransitionContext<'_>) {
        // A transition cut short must still deliver its destination.
        if !self.moved {
            ctx.rig.position = ctx.end;
            self.moved = true;
        }
        ctx.rig.fade_opacity = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec3;

    fn run_transition(
        effect: &mut dyn LocomotionEffect,
        rig: &mut PlayerRig,
        steps: &[f32],
    ) -> Vector3<f32> {
        let start = rig.position;
        let end = vec3(3.0, 0.0, -4.0);

        effect.start_effect(&mut TransitionContext { start, end, rig: &mut *rig });
        for &t in steps {
            effect.update_effect(t, &mut TransitionContext { start, end, rig: &mut *rig });
        }
        effect.end_effect(&mut TransitionContext { start, end, rig: &mut *rig });
        end
    }

    #[test]
    fn snap_lands_on_destination_without_updates() {
        let mut rig = PlayerRig::new(vec3(0.0, 0.0, 0.0));
        let mut effect = SnapEffect;
        let end = run_transition(&mut effect, &mut rig, &[]);
        assert_eq!(rig.position, end);
    }

    #[test]
    fn slide_interpolates_then_clamps() {
        let mut rig = PlayerRig::new(vec3(0.0, 0.0, 0.0));
        let mut effect = SlideEffect::default();

        let start = rig.position;
        let end = vec3(2.0, 0.0, 0.0);
        effect.update_effect(0.5, &mut TransitionContext { start, end, rig: &mut rig });
        assert_eq!(rig.position, vec3(1.0, 0.0, 0.0));

        // Progress past 1 must not overshoot.
        effect.update_effect(1.7, &mut TransitionContext { start, end, rig: &mut rig });
        assert_eq!(rig.position, end);
    }

    #[test]
    fn fade_jumps_exactly_once() {
        let mut rig = PlayerRig::new(vec3(0.0, 0.0, 0.0));
        let mut effect = FadeEffect::default();

        let start = rig.position;
        let end = vec3(3.0, 0.0, -4.0);
        effect.start_effect(&mut TransitionContext { start, end, rig: &mut rig });

        let mut jumps = 0;
        let mut last = rig.position;
        for &t in &[0.1, 0.3, 0.5, 0.55, 0.8, 1.0] {
            effect.update_effect(t, &mut TransitionContext { start, end, rig: &mut rig });
            if rig.position != last {
                jumps += 1;
                last = rig.position;
            }
        }

        assert_eq!(jumps, 1);
        assert_eq!(rig.position, end);
    }

    #[test]
    fn fade_opacity_peaks_at_midpoint() {
        let mut rig = PlayerRig::new(vec3(0.0, 0.0, 0.0));
        let mut effect = FadeEffect::default();

        let start = rig.position;
        let end = vec3(1.0, 0.0, 0.0);
        effect.start_effect(&mut TransitionContext { start, end, rig: &mut rig });

        effect.update_effect(0.25, &mut TransitionContext { start, end, rig: &mut rig });
        assert!((rig.fade_opacity - 0.5).abs() < 1e-5);

        effect.update_effect(0.5, &mut TransitionContext { start, end, rig: &mut rig });
        assert!((rig.fade_opacity - 1.0).abs() < 1e-5);

        effect.update_effect(1.0, &mut TransitionContext { start, end, rig: &mut rig });
        assert!(rig.fade_opacity.abs() < 1e-5);
    }

    #[test]
    fn aborted_fade_still_delivers_destination() {
        let mut rig = PlayerRig::new(vec3(0.0, 0.0, 0.0));
        let mut effect = FadeEffect::default();

        // Never reaches the midpoint before the forced end.
        let end = run_transition(&mut effect, &mut rig, &[0.1, 0.2]);
        assert_eq!(rig.position, end);
        assert_eq!(rig.fade_opacity, 0.0);
    }

    #[test]
    fn fade_effect_is_reusable_across_transitions() {
        let mut rig = PlayerRig::new(vec3(0.0, 0.0, 0.0));
        let mut effect = FadeEffect::default();

        run_transition(&mut effect, &mut rig, &[0.6]);
        let end = run_transition(&mut effect, &mut rig, &[0.6]);
        assert_eq!(rig.position, end);
    }
}
