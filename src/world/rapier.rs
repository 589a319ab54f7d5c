//! Rapier-backed world
//!
//! Wraps the rapier3d boilerplate into a single struct implementing the
//! `World` seam: one fixed cuboid for the table, one dynamic cuboid per
//! block, ray casts through the query pipeline. Colors are bookkeeping for
//! the host renderer; nothing is drawn here.

use std::collections::HashMap;

use glam::Vec3;
use rapier3d::na;
use rapier3d::prelude::*;

use super::{RayHit, World};
use crate::consts::*;
use crate::sim::{BlockColor, BlockId};

fn vec3_to_na(v: Vec3) -> na::Vector3<f32> {
    na::Vector3::new(v.x, v.y, v.z)
}

fn na_to_vec3(v: &na::Vector3<f32>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub struct RapierWorld {
    gravity: na::Vector3<f32>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    blocks: HashMap<BlockId, RigidBodyHandle>,
    colors: HashMap<BlockId, BlockColor>,
}

impl RapierWorld {
    /// Create a world containing just the table slab.
    pub fn new() -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = SIM_DT;

        let mut world = Self {
            gravity: na::Vector3::new(0.0, GRAVITY_Y, 0.0),
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            blocks: HashMap::new(),
            colors: HashMap::new(),
        };

        let table = RigidBodyBuilder::fixed()
            .translation(na::Vector3::new(0.0, TABLE_Y, 0.0))
            .build();
        let table_handle = world.bodies.insert(table);
        let slab = ColliderBuilder::cuboid(TABLE_LENGTH / 2.0, TABLE_HEIGHT / 2.0, TABLE_WIDTH / 2.0)
            .friction(FRICTION)
            .restitution(RESTITUTION)
            .build();
        world
            .colliders
            .insert_with_parent(slab, table_handle, &mut world.bodies);

        world
    }

    /// Color currently recorded for a block, for the host renderer.
    pub fn block_color(&self, id: BlockId) -> Option<BlockColor> {
        self.colors.get(&id).copied()
    }

    fn block_id_of_collider(&self, handle: ColliderHandle) -> Option<BlockId> {
        let collider = self.colliders.get(handle)?;
        let body = self.bodies.get(collider.parent()?)?;
        if body.is_fixed() {
            return None;
        }
        Some(BlockId(body.user_data as u32))
    }
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl World for RapierWorld {
    fn add_block(&mut self, id: BlockId, pos: Vec3, size: f32, color: BlockColor) {
        let body = RigidBodyBuilder::dynamic()
            .translation(vec3_to_na(pos))
            .user_data(id.0 as u128)
            .build();
        let body_handle = self.bodies.insert(body);

        let half = size / 2.0;
        let collider = ColliderBuilder::cuboid(half, half, half)
            .friction(FRICTION)
            .restitution(RESTITUTION)
            .mass(BLOCK_MASS)
            .build();
        self.colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies);

        self.blocks.insert(id, body_handle);
        self.colors.insert(id, color);
    }

    fn remove_block(&mut self, id: BlockId) {
        let Some(handle) = self.blocks.remove(&id) else {
            return;
        };
        self.colors.remove(&id);
        self.bodies.remove(
            handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    fn block_position(&self, id: BlockId) -> Option<Vec3> {
        let handle = self.blocks.get(&id)?;
        let body = self.bodies.get(*handle)?;
        Some(na_to_vec3(body.translation()))
    }

    fn set_block_color(&mut self, id: BlockId, color: BlockColor) {
        if self.blocks.contains_key(&id) {
            self.colors.insert(id, color);
        }
    }

    fn apply_impulse(&mut self, id: BlockId, impulse: Vec3) {
        if let Some(handle) = self.blocks.get(&id) {
            if let Some(body) = self.bodies.get_mut(*handle) {
                body.apply_impulse(vec3_to_na(impulse), true);
            }
        }
    }

    fn cast_ray(&mut self, origin: Vec3, dir: Vec3) -> Vec<RayHit> {
        self.query_pipeline.update(&self.colliders);

        let ray = Ray::new(
            na::Point3::new(origin.x, origin.y, origin.z),
            vec3_to_na(dir),
        );
        let mut hits = Vec::new();
        self.query_pipeline.intersections_with_ray(
            &self.bodies,
            &self.colliders,
            &ray,
            f32::MAX,
            true,
            QueryFilter::exclude_fixed(),
            |handle, intersection| {
                if let Some(block) = self.block_id_of_collider(handle) {
                    hits.push(RayHit {
                        block,
                        distance: intersection.time_of_impact,
                    });
                }
                true
            },
        );
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }
}
