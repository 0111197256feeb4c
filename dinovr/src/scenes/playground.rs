use cgmath::{vec3, Vector3};
use rapier3d::prelude::*;

use crate::config::LocomotionConfig;
use crate::locomotion::{LocomotionEffect, LocomotionManager};
use crate::physics::NavMeshSet;
use crate::rig::PlayerRig;
use crate::vr_config::Handedness;

/// Keeps teleports inside the pen's inner fence.
pub fn pen_bounds(dest: Vector3<f32>) -> bool {
    dest.x > -25.5 && dest.x < 26.0 && dest.z > -35.0 && dest.z < 16.5
}

/// A ready-to-drive locomotion setup: flat walkable ground, the pen bounds
/// check, and both hands registered. Used by the debug runtime and by
/// integration-flavored tests.
pub struct PlaygroundScene {
    pub manager: LocomotionManager,
    pub rig: PlayerRig,
}

/// Convenience builder for locomotion test scenes that only need a floor
/// and a spawn point.
pub struct PlaygroundBuilder {
    config: LocomotionConfig,
    floor_half_extent: f32,
    floor_height: f32,
    spawn: Vector3<f32>,
    bounded: bool,
}

impl PlaygroundBuilder {
    pub fn new() -> PlaygroundBuilder {
        PlaygroundBuilder {
            config: LocomotionConfig::default(),
            floor_half_extent: 40.0,
            floor_height: 0.0,
            spawn: vec3(0.0, 0.0, 0.0),
            bounded: true,
        }
    }

    pub fn with_config(mut self, config: LocomotionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_floor(mut self, half_extent: f32, height: f32) -> Self {
        self.floor_half_extent = half_extent;
        self.floor_height = height;
        self
    }

    pub fn with_spawn(mut self, spawn: Vector3<f32>) -> Self {
        self.spawn = spawn;
        self
    }

    /// Drop the pen fence check; any walkable surface becomes teleportable.
    pub fn unbounded(mut self) -> Self {
        self.bounded = false;
        self
    }

    pub fn build(self, effect: Box<dyn LocomotionEffect>) -> PlaygroundScene {
        let mut nav = NavMeshSet::new();
        nav.add_walkable(
            ColliderBuilder::cuboid(self.floor_half_extent, 0.1, self.floor_half_extent)
                .translation(vector![0.0, self.floor_height - 0.1, 0.0])
                .build(),
        );
        nav.rebuild();

        let mut manager = LocomotionManager::new(self.config, effect);
        manager.set_navigation_meshes(nav);
        if self.bounded {
            manager.set_validity_predicate(Box::new(pen_bounds));
        }
        manager.add_controller(Handedness::Left);
        manager.add_controller(Handedness::Right);

        PlaygroundScene {
            manager,
            rig: PlayerRig::new(self.spawn),
        }
    }
}

impl Default for PlaygroundBuilder {
    fn default() -> Self {
        Self::new()
    }
}
