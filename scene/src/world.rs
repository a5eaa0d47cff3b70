//! Rapier dynamics world.
//!
//! Owns every rapier set and pipeline the scene needs and advances them on a fixed
//! timestep. Collision events raised during a step are buffered by the
//! [`EventCollector`] and handed back to the caller once the step returns.

// Re-export Rapier so the runner can reach engine types without depending on it directly.
pub use rapier3d;

use rapier3d::{
    na::{Translation3, UnitQuaternion},
    prelude::*,
};

use crate::{
    error::Result,
    events::EventCollector,
    rapier::{MaterialDef, ShapeDef, collider_from_def},
    settings::SceneSettings,
    tag::{ActorIndex, ActorKind, pack_tag},
};

/// How a body created through [`PhysicsWorld::spawn`] moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    Fixed,
    Dynamic,
    /// Moved by setting its next pose; pushes dynamic bodies but is never pushed back.
    Kinematic,
}

/// Everything needed to put one body + collider into the world.
#[derive(Clone, Debug)]
pub struct SpawnDef {
    pub kind: ActorKind,
    pub index: ActorIndex,
    pub body: BodyKind,
    pub translation: Vector<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub shape: ShapeDef,
    pub material: MaterialDef,
    pub density: f32,
    /// Sensors report overlaps but never generate contact forces.
    pub sensor: bool,
    /// Raise collision events for pairs involving this collider. Always on for sensors.
    pub events: bool,
}

impl SpawnDef {
    pub fn new(kind: ActorKind, body: BodyKind, translation: Vector<f32>, shape: ShapeDef) -> Self {
        Self {
            kind,
            index: 0,
            body,
            translation,
            rotation: UnitQuaternion::identity(),
            shape,
            material: MaterialDef::default(),
            density: 1.0,
            sensor: false,
            events: false,
        }
    }

    pub fn index(mut self, index: ActorIndex) -> Self {
        self.index = index;
        self
    }

    pub fn rotation(mut self, rotation: UnitQuaternion<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn material(mut self, material: MaterialDef) -> Self {
        self.material = material;
        self
    }

    pub fn density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn sensor(mut self, sensor: bool) -> Self {
        self.sensor = sensor;
        self
    }

    pub fn events(mut self, events: bool) -> Self {
        self.events = events;
        self
    }
}

/// Handles of a spawned actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spawned {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

pub struct PhysicsWorld {
    pub gravity: Vector<f32>,
    pub integration_parameters: IntegrationParameters,
    pub pipeline: PhysicsPipeline,
    pub islands: IslandManager,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub impulse_joints: ImpulseJointSet,
    pub multibody_joints: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    events: EventCollector,
}

impl PhysicsWorld {
    pub fn new(settings: &SceneSettings) -> Self {
        Self {
            gravity: settings.gravity,
            integration_parameters: IntegrationParameters {
                dt: settings.dt_seconds(),
                ..IntegrationParameters::default()
            },
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            events: EventCollector::default(),
        }
    }

    /// Insert a body with a single tagged collider.
    ///
    /// Only sensors and colliders spawned with [`SpawnDef::events`] report collision
    /// events, so pyramid boxes knocking into each other stay silent.
    pub fn spawn(&mut self, def: SpawnDef) -> Result<Spawned> {
        let iso = Isometry::from_parts(Translation3::from(def.translation), def.rotation);
        let builder = match def.body {
            BodyKind::Fixed => RigidBodyBuilder::fixed(),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_position_based(),
        };
        let body = self.bodies.insert(builder.pose(iso).build());

        let active_events = if def.sensor || def.events {
            ActiveEvents::COLLISION_EVENTS
        } else {
            ActiveEvents::empty()
        };
        let collider = collider_from_def(&def.shape, def.material)?
            .density(def.density)
            .sensor(def.sensor)
            .active_events(active_events)
            .user_data(pack_tag(def.index, def.kind))
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);

        Ok(Spawned { body, collider })
    }

    pub fn insert_joint(
        &mut self,
        body1: RigidBodyHandle,
        body2: RigidBodyHandle,
        joint: impl Into<GenericJoint>,
    ) -> ImpulseJointHandle {
        self.impulse_joints.insert(body1, body2, joint, true)
    }

    pub fn remove_joint(&mut self, handle: ImpulseJointHandle) -> bool {
        self.impulse_joints.remove(handle, true).is_some()
    }

    /// Advance one fixed step and return the collision events it raised, in order.
    pub fn step(&mut self) -> Vec<CollisionEvent> {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &self.events,
        );
        self.events.drain()
    }

    pub fn translation(&self, body: RigidBodyHandle) -> Option<Vector<f32>> {
        self.bodies.get(body).map(|rb| *rb.translation())
    }
}
