use cgmath::{InnerSpace, Vector3};

/// Gravity-affected trajectory for the teleport guide: the path of a
/// virtual ball launched from the controller.
///
/// `flight_time` is the commit point of the curve. It starts as the
/// estimate from `time_to_reach_height` and gets shortened by the
/// navigation clipper when the ball hits geometry earlier. A flight time of
/// zero degenerates the curve to its origin.
#[derive(Clone, Copy, Debug)]
pub struct BallisticCurve {
    pub origin: Vector3<f32>,
    pub velocity: Vector3<f32>,
    pub gravity: Vector3<f32>,
    pub flight_time: f32,
}

impl BallisticCurve {
    pub fn new(gravity: Vector3<f32>) -> BallisticCurve {
        BallisticCurve {
            origin: Vector3::new(0.0, 0.0, 0.0),
            velocity: Vector3::new(0.0, 0.0, 0.0),
            gravity,
            flight_time: 0.0,
        }
    }

    /// Re-aim the curve from a new launch point. `direction` does not need
    /// to be normalized; `speed` is in m/s.
    pub fn launch(&mut self, origin: Vector3<f32>, direction: Vector3<f32>, speed: f32) {
        self.origin = origin;
        let length = direction.magnitude();
        self.velocity = if length > f32::EPSILON {
            direction * (speed / length)
        } else {
            Vector3::new(0.0, 0.0, 0.0)
        };
    }

    /// Kinematic position at time `t`: origin + v*t + g*t^2/2.
    pub fn point_at_time(&self, t: f32) -> Vector3<f32> {
        self.origin + self.velocity * t + self.gravity * (0.5 * t * t)
    }

    /// Instantaneous velocity at time `t`; the curve tangent.
    pub fn velocity_at_time(&self, t: f32) -> Vector3<f32> {
        self.velocity + self.gravity * t
    }

    /// Where the ball is at the end of the committed flight time.
    pub fn end_point(&self) -> Vector3<f32> {
        self.point_at_time(self.flight_time)
    }

    /// Smallest positive time at which the ball crosses `target_y`, from
    /// the quadratic `0.5*g.y*t^2 + v.y*t + (origin.y - target_y) = 0`.
    ///
    /// Returns `None` when the trajectory never reaches the height (the
    /// discriminant goes negative for near-horizontal or upward launches
    /// toward a height the ball cannot climb to) or when gravity does not
    /// pull downward. Callers treat that as "no landing, invalid".
    pub fn time_to_reach_height(&self, target_y: f32) -> Option<f32> {
        let g = self.gravity.y;
        if g >= 0.0 {
            return None;
        }

        let v = self.velocity.y;
        let discriminant = v * v - 2.0 * g * (self.origin.y - target_y);
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_d = discriminant.sqrt();
        let t_rising = (-v + sqrt_d) / g;
        let t_falling = (-v - sqrt_d) / g;

        [t_rising, t_falling]
            .into_iter()
            .filter(|t| *t > 0.0)
            .min_by(|a, b| a.total_cmp(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec3;

    const GRAVITY: Vector3<f32> = Vector3::new(0.0, -9.8, 0.0);

    fn launched(origin: Vector3<f32>, direction: Vector3<f32>, speed: f32) -> BallisticCurve {
        let mut curve = BallisticCurve::new(GRAVITY);
        curve.launch(origin, direction, speed);
        curve
    }

    #[test]
    fn point_matches_closed_form_parabola() {
        let curve = launched(vec3(0.0, 1.5, 0.0), vec3(0.0, 0.5, -1.0), 8.0);

        for i in 0..20 {
            let t = i as f32 * 0.1;
            let p = curve.point_at_time(t);
            let expected_y = curve.origin.y + curve.velocity.y * t - 0.5 * 9.8 * t * t;
            assert!((p.y - expected_y).abs() < 1e-5);
        }
    }

    #[test]
    fn zero_flight_time_degenerates_to_origin() {
        let mut curve = launched(vec3(1.0, 2.0, 3.0), vec3(0.0, 0.0, -1.0), 8.0);
        curve.flight_time = 0.0;
        assert_eq!(curve.end_point(), curve.origin);
    }

    #[test]
    fn reaches_ground_below_launch() {
        let curve = launched(vec3(0.0, 1.5, 0.0), vec3(0.0, 0.0, -1.0), 8.0);

        let t = curve.time_to_reach_height(0.0).expect("ground is reachable");
        assert!(t > 0.0);
        assert!(curve.point_at_time(t).y.abs() < 1e-4);
    }

    #[test]
    fn straight_up_launch_falls_back_past_origin_height() {
        // Ball rises, then falls back through the lower target height.
        let curve = launched(vec3(0.0, 1.5, 0.0), vec3(0.0, 1.0, 0.0), 8.0);

        let t = curve.time_to_reach_height(0.0).expect("falls back down");
        assert!(t > 0.0);
        // Must be the descending crossing: well after the apex at v/g.
        assert!(t > 8.0 / 9.8);
        assert!(curve.point_at_time(t).y.abs() < 1e-4);
    }

    #[test]
    fn picks_first_crossing_when_target_is_above() {
        // Aiming up at a height the ball passes twice: once rising, once
        // falling. The guide wants the first crossing.
        let curve = launched(vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0), 8.0);

        let t = curve.time_to_reach_height(1.0).expect("climbs past 1m");
        assert!(t > 0.0);
        assert!(t < 8.0 / 9.8);
        assert!((curve.point_at_time(t).y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn unreachable_height_has_no_solution() {
        // 8 m/s straight up peaks at ~3.27m; a 10m target is out of reach.
        let curve = launched(vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0), 8.0);
        assert!(curve.time_to_reach_height(10.0).is_none());
    }

    #[test]
    fn horizontal_launch_toward_higher_ground_has_no_solution() {
        let curve = launched(vec3(0.0, 1.0, 0.0), vec3(0.0, 0.0, -1.0), 8.0);
        assert!(curve.time_to_reach_height(5.0).is_none());
    }
}
