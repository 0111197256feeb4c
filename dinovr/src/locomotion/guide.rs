use std::cell::RefCell;
use std::rc::Rc;

use cgmath::{vec3, InnerSpace, Matrix4, Rad, Vector3};
use engine::guide_log;
use engine::scene::{
    color_material, lines_mesh, quad, DashParams, DynamicMesh, Material, MeshData, SceneObject,
    TextureData, Topology, VertexPosition,
};

use super::ballistic::BallisticCurve;
use super::nav_clipper::NavigationClipper;
use crate::config::LocomotionConfig;
use crate::input_context::Pose;
use crate::physics::NavMeshSet;
use crate::rig::PlayerRig;
use crate::time::Time;

/// 48x1 RGBA gradient mapped across the beam cross section. Soft edges, a
/// bright core, additive-friendly.
#[rustfmt::skip]
const GUIDE_FADE_TEXTURE: [u8; 192] = [
    0xff, 0xff, 0xff, 0x01, 0xff, 0xff, 0xff, 0x02, 0xbf, 0xbf, 0xbf, 0x04, 0xcc, 0xcc, 0xcc, 0x05,
    0xdb, 0xdb, 0xdb, 0x07, 0xcc, 0xcc, 0xcc, 0x0a, 0xd8, 0xd8, 0xd8, 0x0d, 0xd2, 0xd2, 0xd2, 0x11,
    0xce, 0xce, 0xce, 0x15, 0xce, 0xce, 0xce, 0x1a, 0xce, 0xce, 0xce, 0x1f, 0xcd, 0xcd, 0xcd, 0x24,
    0xc8, 0xc8, 0xc8, 0x2a, 0xc9, 0xc9, 0xc9, 0x2f, 0xc9, 0xc9, 0xc9, 0x34, 0xc9, 0xc9, 0xc9, 0x39,
    0xc9, 0xc9, 0xc9, 0x3d, 0xc8, 0xc8, 0xc8, 0x41, 0xcb, 0xcb, 0xcb, 0x44, 0xee, 0xee, 0xee, 0x87,
    0xfa, 0xfa, 0xfa, 0xc8, 0xf9, 0xf9, 0xf9, 0xc9, 0xf9, 0xf9, 0xf9, 0xc9, 0xfa, 0xfa, 0xfa, 0xc9,
    0xfa, 0xfa, 0xfa, 0xc9, 0xf9, 0xf9, 0xf9, 0xc9, 0xf9, 0xf9, 0xf9, 0xc9, 0xfa, 0xfa, 0xfa, 0xc8,
    0xee, 0xee, 0xee, 0x87, 0xcb, 0xcb, 0xcb, 0x44, 0xc8, 0xc8, 0xc8, 0x41, 0xc9, 0xc9, 0xc9, 0x3d,
    0xc9, 0xc9, 0xc9, 0x39, 0xc9, 0xc9, 0xc9, 0x34, 0xc9, 0xc9, 0xc9, 0x2f, 0xc8, 0xc8, 0xc8, 0x2a,
    0xcd, 0xcd, 0xcd, 0x24, 0xce, 0xce, 0xce, 0x1f, 0xce, 0xce, 0xce, 0x1a, 0xce, 0xce, 0xce, 0x15,
    0xd2, 0xd2, 0xd2, 0x11, 0xd8, 0xd8, 0xd8, 0x0d, 0xcc, 0xcc, 0xcc, 0x0a, 0xdb, 0xdb, 0xdb, 0x07,
    0xcc, 0xcc, 0xcc, 0x05, 0xbf, 0xbf, 0xbf, 0x04, 0xff, 0xff, 0xff, 0x02, 0xff, 0xff, 0xff, 0x01,
];

/// Flight time used when the height solve has no real root, so the arc
/// still renders (flagged invalid) instead of vanishing.
const UNSOLVABLE_FLIGHT_TIME: f32 = 0.5;

/// Lift of the landing indicator above the surface, against z-fighting.
const TARGET_HEIGHT_OFFSET: f32 = 0.02;

/// One discretized point along the guide curve with its cross-section
/// frame: `normal` is the in-arc-plane offset axis, `binormal` the
/// sideways one.
#[derive(Clone, Copy, Debug)]
struct GuideSample {
    point: Vector3<f32>,
    normal: Vector3<f32>,
    binormal: Vector3<f32>,
}

fn sample_curve(curve: &BallisticCurve, t: f32) -> GuideSample {
    let point = curve.point_at_time(t);

    let mut tangent = curve.velocity_at_time(t);
    if tangent.magnitude2() <= f32::EPSILON {
        tangent = vec3(0.0, 0.0, -1.0);
    }
    let tangent = tangent.normalize();

    // Side axis from tangent x up; falls back to an arbitrary horizontal
    // axis when the tangent is (nearly) vertical.
    let mut side = tangent.cross(vec3(0.0, 1.0, 0.0));
    if side.magnitude2() < 1e-6 {
        side = tangent.cross(vec3(0.0, 0.0, 1.0));
    }
    let binormal = side.normalize();
    let normal = binormal.cross(tangent).normalize();

    GuideSample {
        point,
        normal,
        binormal,
    }
}

/// The teleport guide: the ballistic beam from the controller, the landing
/// indicator, and the validity of the pointed-at destination.
///
/// Everything the user sees and the destination the manager commits come
/// from the same per-frame state, so the beam tip and the actual teleport
/// target can never disagree.
pub struct TeleportGuide {
    config: LocomotionConfig,
    curve: BallisticCurve,
    clipper: NavigationClipper,
    beam_mesh: Rc<RefCell<DynamicMesh>>,
    beam: SceneObject,
    target: SceneObject,
    positions: Vec<[f32; 3]>,
    shown: bool,
    valid: bool,
    target_point: Vector3<f32>,
    aim_yaw: Rad<f32>,
}

impl TeleportGuide {
    pub fn new(config: LocomotionConfig) -> TeleportGuide {
        let segments = config.guide_segments.max(1);
        let beam_mesh = Rc::new(RefCell::new(DynamicMesh::new(build_beam_topology(segments))));

        let beam_material = Material {
            color: config.invalid_color,
            opacity: 1.0,
            additive_blend: true,
            map: Some(TextureData {
                width: 48,
                height: 1,
                rgba: GUIDE_FADE_TEXTURE.to_vec(),
            }),
            dash: Some(DashParams {
                count: config.dash_count,
                speed: config.dash_speed,
                time: 0.0,
            }),
        };
        let mut beam = SceneObject::new(beam_material, beam_mesh.clone());
        beam.set_depth_write(false);
        beam.set_visible(false);

        let mut target = SceneObject::new(
            color_material::create(config.invalid_color),
            Rc::new(RefCell::new(quad::create())),
        );
        target.set_depth_write(false);
        target.set_visible(false);

        let clipper = NavigationClipper::new((segments / 2).max(1), config.up_threshold);
        let curve = BallisticCurve::new(config.gravity);
        let positions = vec![[0.0; 3]; (segments + 1) * 4];

        TeleportGuide {
            config,
            curve,
            clipper,
            beam_mesh,
            beam,
            target,
            positions,
            shown: false,
            valid: false,
            target_point: vec3(0.0, 0.0, 0.0),
            aim_yaw: Rad(0.0),
        }
    }

    /// Recompute the whole guide for this frame from one controller's pose.
    ///
    /// `controller` is the aiming hand in rig-local space; `nav` is the
    /// walkable-surface set (when present the beam clips against it);
    /// `predicate` is the app's extra destination check.
    pub fn update_guide_for_controller(
        &mut self,
        controller: &Pose,
        rig: &PlayerRig,
        nav: Option<&NavMeshSet>,
        predicate: Option<&dyn Fn(Vector3<f32>) -> bool>,
        time: &Time,
    ) {
        let origin = rig.to_world(controller.position);
        let direction = rig.direction_to_world(controller.forward());
        self.curve
            .launch(origin, direction, self.config.launch_speed);

        // Long-range probe height: either the configured walkable ground,
        // or far enough below the rig floor that the first estimate always
        // crosses anything the clipper could land on.
        let probe_height = self
            .config
            .ground_height
            .unwrap_or(rig.position.y - self.config.probe_below_offset);

        let solve = self.curve.time_to_reach_height(probe_height);
        self.curve.flight_time = solve.unwrap_or(UNSOLVABLE_FLIGHT_TIME);

        let mut valid = solve.is_some();
        if let Some(nav) = nav {
            let clip = self.clipper.clip(&mut self.curve, nav);
            valid = clip.hit_surface && clip.walkable;
        }

        self.rebuild_beam();

        let candidate = self.curve.end_point();
        if let Some(predicate) = predicate {
            valid = valid && predicate(candidate);
        }
        // Drop check against the controller, not the feet: a destination a
        // long way below is a fall, however it was reached.
        valid = valid && (origin.y - candidate.y) < self.config.max_fall_distance;

        if valid != self.valid {
            guide_log!(DEBUG, "destination validity changed: {}", valid);
            self.apply_validity_colors(valid);
        }
        self.valid = valid;
        self.target_point = candidate;

        let flat = vec3(direction.x, 0.0, direction.z);
        if flat.magnitude2() > 1e-8 {
            self.aim_yaw = Rad(f32::atan2(-flat.x, -flat.z));
        }
        self.place_target_indicator();

        // The dash pattern only crawls while the destination is usable.
        if self.valid {
            if let Some(dash) = self.beam.material.borrow_mut().dash.as_mut() {
                dash.time = (dash.time + time.elapsed_seconds() * dash.speed).fract();
            }
        }
    }

    /// Vector from the user's feet to the last computed destination, or
    /// `None` while that destination is invalid. Reads this frame's state
    /// only; the committed destination is always the one being shown.
    pub fn teleport_offset(&self, rig: &PlayerRig, head: &Pose) -> Option<Vector3<f32>> {
        if !self.valid {
            return None;
        }

        // Feet: the viewer position dropped to the rig floor.
        let feet_local = vec3(head.position.x, 0.0, head.position.z);
        let feet_world = rig.to_world(feet_local);
        Some(self.target_point - feet_world)
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.shown = visible;
        self.beam.set_visible(visible);
        self.target.set_visible(visible && self.valid);
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn target_point(&self) -> Vector3<f32> {
        self.target_point
    }

    pub fn aim_yaw(&self) -> Rad<f32> {
        self.aim_yaw
    }

    pub fn beam(&self) -> &SceneObject {
        &self.beam
    }

    pub fn target(&self) -> &SceneObject {
        &self.target
    }

    /// Cheap line-list rendition of the current arc for debug drawing.
    pub fn debug_polyline(&self, color: Vector3<f32>) -> Option<SceneObject> {
        let segments = self.config.guide_segments.max(1);
        if self.curve.flight_time <= 0.0 {
            return None;
        }

        let mut vertices = Vec::with_capacity(segments * 2);
        let mut previous = self.curve.point_at_time(0.0);
        for i in 1..=segments {
            let t = i as f32 * self.curve.flight_time / segments as f32;
            let point = self.curve.point_at_time(t);
            vertices.push(VertexPosition { position: previous });
            vertices.push(VertexPosition { position: point });
            previous = point;
        }

        let mesh = lines_mesh::create(vertices);
        let mut arc = SceneObject::new(color_material::create(color), Rc::new(RefCell::new(mesh)));
        arc.set_depth_write(false);
        Some(arc)
    }

    fn rebuild_beam(&mut self) {
        let segments = self.config.guide_segments.max(1);
        let r = self.config.ray_radius;

        // One cross section per sample: up/down along the frame normal,
        // left/right along the binormal. The section still pinches where a
        // navigation clip bends the arc sharply; resolving that needs
        // parallel transport along the clipped arc.
        for i in 0..=segments {
            let t = i as f32 * self.curve.flight_time / segments as f32;
            let sample = sample_curve(&self.curve, t);

            let verts = [
                sample.point + sample.normal * r,
                sample.point - sample.normal * r,
                sample.point + sample.binormal * r,
                sample.point - sample.binormal * r,
            ];
            for (j, v) in verts.iter().enumerate() {
                self.positions[i * 4 + j] = [v.x, v.y, v.z];
            }
        }

        self.beam_mesh.borrow_mut().write_positions(&self.positions);
    }

    fn apply_validity_colors(&mut self, valid: bool) {
        let color = if valid {
            self.config.valid_color
        } else {
            self.config.invalid_color
        };
        self.beam.material.borrow_mut().color = color;
        self.target.material.borrow_mut().color = color;
        self.target.set_visible(self.shown && valid);
    }

    fn place_target_indicator(&mut self) {
        let translation = Matrix4::from_translation(
            self.target_point + vec3(0.0, TARGET_HEIGHT_OFFSET, 0.0),
        );
        // World-space yaw of the aim direction: the indicator's forward
        // marking tracks where the user points, unaffected by however many
        // snap turns the rig has accumulated.
        let rotation = Matrix4::from_angle_y(self.aim_yaw);
        let scale = Matrix4::from_scale(self.config.target_size);
        self.target.set_transform(translation * rotation * scale);
    }
}

fn build_beam_topology(segments: usize) -> MeshData {
    let vertex_count = (segments + 1) * 4;
    let mut uvs = Vec::with_capacity(vertex_count);
    let mut indices = Vec::with_capacity(segments * 12);

    for i in 0..=segments {
        let v = 1.0 - i as f32 / segments as f32;
        uvs.push([0.0, v]);
        uvs.push([1.0, v]);
        uvs.push([0.0, v]);
        uvs.push([1.0, v]);

        if i < segments {
            let o = (i * 4) as u32;
            // Two ribbons per segment: the vertical pair and the
            // horizontal pair of the cross section.
            indices.extend_from_slice(&[
                o,
                o + 1,
                o + 4,
                o + 1,
                o + 5,
                o + 4,
                o + 2,
                o + 3,
                o + 6,
                o + 3,
                o + 7,
                o + 6,
            ]);
        }
    }

    MeshData {
        topology: Topology::Triangles,
        positions: vec![[0.0; 3]; vertex_count],
        uvs,
        indices,
    }
}
