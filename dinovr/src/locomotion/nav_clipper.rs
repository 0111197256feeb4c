use cgmath::{vec3, InnerSpace};

use super::ballistic::BallisticCurve;
use crate::physics::NavMeshSet;

/// Outcome of clipping one frame's guide curve against the walkable set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipResult {
    /// A surface was hit somewhere along the trace.
    pub hit_surface: bool,
    /// The hit surface faces up enough to land on.
    pub walkable: bool,
}

impl ClipResult {
    pub const MISS: ClipResult = ClipResult {
        hit_surface: false,
        walkable: false,
    };
}

/// Truncates a ballistic curve at the first navigation-mesh intersection.
///
/// The curve is walked in coarse segments, one raycast per segment, rather
/// than raycasting every rendered sample. The hit is then resolved to the
/// exact intersection distance within its segment, so the shortened flight
/// time puts the beam tip on the surface instead of at the nearest coarse
/// sample.
#[derive(Clone, Copy, Debug)]
pub struct NavigationClipper {
    /// Coarse trace segment count; half the visual segment count is plenty.
    pub trace_segments: usize,
    /// Walkability threshold for `normal . up`.
    pub up_threshold: f32,
}

impl NavigationClipper {
    pub fn new(trace_segments: usize, up_threshold: f32) -> NavigationClipper {
        NavigationClipper {
            trace_segments: trace_segments.max(1),
            up_threshold,
        }
    }

    /// Walk the curve over `[0, flight_time]` casting segment rays. On the
    /// first hit, shorten the curve's flight time to the intersection and
    /// report whether the surface is walkable. With no hit the flight time
    /// is left at the full estimate (the user is aiming into the void).
    pub fn clip(&self, curve: &mut BallisticCurve, nav: &NavMeshSet) -> ClipResult {
        let total = curve.flight_time;
        if total <= 0.0 || nav.is_empty() {
            return ClipResult::MISS;
        }

        let dt = total / self.trace_segments as f32;
        let up = vec3(0.0, 1.0, 0.0);

        let mut segment_start = curve.point_at_time(0.0);
        for i in 0..self.trace_segments {
            let t0 = i as f32 * dt;
            let segment_end = curve.point_at_time(t0 + dt);
            let segment = segment_end - segment_start;
            let length = segment.magnitude();

            if length > f32::EPSILON {
                if let Some(hit) = nav.cast_ray(segment_start, segment, length) {
                    curve.flight_time = t0 + (hit.distance / length) * dt;
                    return ClipResult {
                        hit_surface: true,
                        walkable: hit.normal.dot(up) > self.up_threshold,
                    };
                }
            }

            segment_start = segment_end;
        }

        ClipResult::MISS
    }
}
