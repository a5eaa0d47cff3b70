//! Scene objects built out of rapier bodies and joints.
//!
//! Shapes are rough stand-ins for the meshes a renderer would draw: compounds of
//! cuboids for the wooden parts, a convex hull for the ball, and a grid of small
//! spheres tied together with springs for the cloth.

use rapier3d::{
    na::{Point3, UnitQuaternion},
    prelude::*,
};

use crate::{
    color::Rgb,
    constants::{ARM_BALL_ANCHOR, BALL_DENSITY, DRIVE_MOTOR_FACTOR},
    error::{Result, SceneError},
    mesh::BallModel,
    rapier::{CuboidPart, MaterialDef, ShapeDef},
    tag::{ActorIndex, ActorKind},
    world::{BodyKind, PhysicsWorld, SpawnDef, Spawned},
};

/// A body the scene keeps track of, with the color it should be drawn in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Actor {
    pub kind: ActorKind,
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    pub color: Rgb,
}

impl Actor {
    pub fn new(kind: ActorKind, spawned: Spawned, color: Rgb) -> Self {
        Self {
            kind,
            body: spawned.body,
            collider: spawned.collider,
            color,
        }
    }

    pub fn spawn(world: &mut PhysicsWorld, def: SpawnDef, color: Rgb) -> Result<Self> {
        let kind = def.kind;
        Ok(Self::new(kind, world.spawn(def)?, color))
    }

    pub fn pose<'a>(&self, world: &'a PhysicsWorld) -> Result<&'a Isometry<f32>> {
        world
            .bodies
            .get(self.body)
            .map(|rb| rb.position())
            .ok_or(SceneError::MissingBody(self.kind))
    }
}

const WOOD: Rgb = Rgb::new(0.55, 0.35, 0.2);

/// Base-local pivot of the catapult arm.
const CATAPULT_PIVOT: [f32; 3] = [2.0, 10.0, 0.0];

/// Kinematic base + swinging arm driven by a velocity motor on a -Z hinge.
pub struct Catapult {
    pub base: Actor,
    pub arm: Actor,
    pub pivot: ImpulseJointHandle,
    pub translation: Vector<f32>,
}

impl Catapult {
    pub fn spawn(world: &mut PhysicsWorld, translation: Vector<f32>) -> Result<Self> {
        let base_shape = ShapeDef::Compound {
            parts: vec![
                // Sled on the ground.
                CuboidPart::new(Vector::new(0.0, 0.0, 0.0), Vector::new(4.0, 0.5, 3.0)),
                // Two uprights either side of the pivot.
                CuboidPart::new(Vector::new(2.0, 5.0, 2.0), Vector::new(0.5, 5.0, 0.5)),
                CuboidPart::new(Vector::new(2.0, 5.0, -2.0), Vector::new(0.5, 5.0, 0.5)),
            ],
        };
        let base = Actor::spawn(
            world,
            SpawnDef::new(
                ActorKind::CatapultBase,
                BodyKind::Kinematic,
                translation,
                base_shape,
            ),
            WOOD,
        )?;

        let arm_shape = ShapeDef::Compound {
            parts: vec![
                CuboidPart::new(Vector::new(3.05, 0.0, 0.0), Vector::new(6.65, 0.4, 0.8)),
                // Lip just past the tip of the ball (hull spans x 5..9 around the anchor).
                CuboidPart::new(Vector::new(9.4, 1.0, 0.0), Vector::new(0.3, 0.6, 0.8)),
            ],
        };
        let pivot: Vector<f32> = CATAPULT_PIVOT.into();
        let arm = Actor::spawn(
            world,
            SpawnDef::new(
                ActorKind::CatapultArm,
                BodyKind::Dynamic,
                translation + pivot,
                arm_shape,
            ),
            WOOD,
        )?;

        // Hinge about -Z: a negative motor target lifts the ball end (+X) over the
        // top and throws toward -X, where the goal and the pyramids are.
        let joint = RevoluteJointBuilder::new(-Vector::z_axis())
            .local_anchor1(Point3::from(pivot))
            .local_anchor2(Point3::origin())
            .motor_velocity(0.0, DRIVE_MOTOR_FACTOR)
            .contacts_enabled(false);
        let pivot = world.insert_joint(base.body, arm.body, joint);

        Ok(Self {
            base,
            arm,
            pivot,
            translation,
        })
    }

    /// Set the arm motor target speed (rad/s about the -Z hinge).
    pub fn set_drive_velocity(&self, world: &mut PhysicsWorld, velocity: f32) -> Result<()> {
        let joint = world
            .impulse_joints
            .get_mut(self.pivot, true)
            .ok_or(SceneError::MissingJoint("catapult pivot"))?;
        joint
            .data
            .set_motor_velocity(JointAxis::AngX, velocity, DRIVE_MOTOR_FACTOR);
        Ok(())
    }

    /// Turn the base to `yaw` radians about +Y, keeping it in place.
    pub fn set_yaw(&self, world: &mut PhysicsWorld, yaw: f32) -> Result<()> {
        let rb = world
            .bodies
            .get_mut(self.base.body)
            .ok_or(SceneError::MissingBody(ActorKind::CatapultBase))?;
        let rotation = UnitQuaternion::from_axis_angle(&Vector::y_axis(), yaw);
        rb.set_next_kinematic_position(Isometry::from_parts(self.translation.into(), rotation));
        Ok(())
    }

    /// World position of the ball cup on the arm.
    pub fn ball_anchor(&self, world: &PhysicsWorld) -> Result<Point3<f32>> {
        Ok(self.arm.pose(world)? * Point3::from(Vector::from(ARM_BALL_ANCHOR)))
    }
}

/// Static tower with free-spinning sails about +X.
pub struct Windmill {
    pub base: Actor,
    pub spokes: Actor,
    pub hub: ImpulseJointHandle,
}

/// Base-local hub of the windmill sails.
const WINDMILL_HUB: [f32; 3] = [8.0, 20.0, 0.0];

impl Windmill {
    pub fn spawn(world: &mut PhysicsWorld, translation: Vector<f32>) -> Result<Self> {
        let base_shape = ShapeDef::Compound {
            parts: vec![
                CuboidPart::new(Vector::new(0.0, 10.0, 0.0), Vector::new(1.5, 10.0, 1.5)),
                // Axle from the tower out to the hub.
                CuboidPart::new(Vector::new(4.0, 20.0, 0.0), Vector::new(4.0, 0.5, 0.5)),
            ],
        };
        let base = Actor::spawn(
            world,
            SpawnDef::new(
                ActorKind::WindmillBase,
                BodyKind::Fixed,
                translation,
                base_shape,
            ),
            WOOD,
        )?;

        let spokes_shape = ShapeDef::Compound {
            parts: vec![
                CuboidPart::new(Vector::zeros(), Vector::new(0.25, 8.0, 0.75)),
                CuboidPart::new(Vector::zeros(), Vector::new(0.25, 0.75, 8.0)),
            ],
        };
        let hub: Vector<f32> = WINDMILL_HUB.into();
        let spokes = Actor::spawn(
            world,
            SpawnDef::new(
                ActorKind::WindmillSpokes,
                BodyKind::Dynamic,
                translation + hub,
                spokes_shape,
            )
            .events(true),
            Rgb::new(0.9, 0.9, 0.85),
        )?;

        let joint = RevoluteJointBuilder::new(Vector::x_axis())
            .local_anchor1(Point3::from(hub))
            .local_anchor2(Point3::origin())
            .contacts_enabled(false);
        let hub = world.insert_joint(base.body, spokes.body, joint);

        Ok(Self { base, spokes, hub })
    }
}

/// Rugby goal: two uprights and a crossbar on a fixed body.
pub fn spawn_goal_post(world: &mut PhysicsWorld, translation: Vector<f32>) -> Result<Actor> {
    let shape = ShapeDef::Compound {
        parts: vec![
            CuboidPart::new(Vector::new(0.0, 30.0, 13.5), Vector::new(0.5, 30.0, 0.5)),
            CuboidPart::new(Vector::new(0.0, 30.0, -13.5), Vector::new(0.5, 30.0, 0.5)),
            CuboidPart::new(Vector::new(0.0, 25.0, 0.0), Vector::new(0.5, 0.5, 13.5)),
        ],
    };
    Actor::spawn(
        world,
        SpawnDef::new(ActorKind::GoalPost, BodyKind::Fixed, translation, shape).events(true),
        Rgb::new(1.0, 1.0, 1.0),
    )
}

/// Where and how big the cloth is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClothSpec {
    /// Top-left corner.
    pub translation: Vector<f32>,
    pub rotation: UnitQuaternion<f32>,
    /// Width along local +X, height along local -Y.
    pub size: [f32; 2],
    /// Cells along each axis; the grid has `(nx + 1) * (ny + 1)` particles.
    pub resolution: [usize; 2],
}

impl ClothSpec {
    pub fn particle_count(&self) -> usize {
        (self.resolution[0] + 1) * (self.resolution[1] + 1)
    }

    /// Particle positions, row by row from the pinned top edge.
    pub fn particle_positions(&self) -> Vec<Vector<f32>> {
        let [nx, ny] = self.resolution;
        let (dx, dy) = self.cell_size();

        (0..=ny)
            .flat_map(|v| (0..=nx).map(move |u| (u, v)))
            .map(|(u, v)| {
                let local = Vector::new(u as f32 * dx, -(v as f32) * dy, 0.0);
                self.translation + self.rotation * local
            })
            .collect()
    }

    fn cell_size(&self) -> (f32, f32) {
        let [nx, ny] = self.resolution;
        (
            self.size[0] / nx.max(1) as f32,
            self.size[1] / ny.max(1) as f32,
        )
    }
}

const CLOTH_PARTICLE_RADIUS: f32 = 0.5;
const CLOTH_PARTICLE_DENSITY: f32 = 0.2;
const CLOTH_STIFFNESS: f32 = 400.0;
const CLOTH_DAMPING: f32 = 4.0;

/// Mass-spring sheet: particles are engine bodies, edges are spring joints.
pub struct Cloth {
    pub particles: Vec<Actor>,
    pub springs: Vec<ImpulseJointHandle>,
    pub color: Rgb,
}

impl Cloth {
    pub fn spawn(world: &mut PhysicsWorld, spec: &ClothSpec, color: Rgb) -> Result<Self> {
        let [nx, _] = spec.resolution;
        let (dx, dy) = spec.cell_size();

        let mut particles = Vec::with_capacity(spec.particle_count());
        for (i, position) in spec.particle_positions().into_iter().enumerate() {
            // The top edge hangs from the crossbar.
            let body = if i <= nx {
                BodyKind::Fixed
            } else {
                BodyKind::Dynamic
            };
            let def = SpawnDef::new(
                ActorKind::Cloth,
                body,
                position,
                ShapeDef::Sphere {
                    radius: CLOTH_PARTICLE_RADIUS,
                },
            )
            .index(i as ActorIndex)
            .density(CLOTH_PARTICLE_DENSITY);
            particles.push(Actor::spawn(world, def, color)?);
        }

        let mut springs = Vec::new();
        let row = nx + 1;
        for i in 0..particles.len() {
            let right = (i % row + 1 < row).then_some((i + 1, dx));
            let below = (i + row < particles.len()).then_some((i + row, dy));
            for (j, rest) in [right, below].into_iter().flatten() {
                let spring = SpringJointBuilder::new(rest, CLOTH_STIFFNESS, CLOTH_DAMPING)
                    .local_anchor1(Point3::origin())
                    .local_anchor2(Point3::origin());
                springs.push(world.insert_joint(particles[i].body, particles[j].body, spring));
            }
        }

        Ok(Self {
            particles,
            springs,
            color,
        })
    }

    /// Push every free particle with a constant acceleration (replaces earlier forces).
    pub fn set_external_acceleration(&self, world: &mut PhysicsWorld, acceleration: Vector<f32>) {
        for particle in &self.particles {
            if let Some(rb) = world.bodies.get_mut(particle.body) {
                if rb.is_dynamic() {
                    let force = acceleration * rb.mass();
                    rb.reset_forces(true);
                    rb.add_force(force, true);
                }
            }
        }
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
        for particle in &mut self.particles {
            particle.color = color;
        }
    }
}

/// A rugby ball and, while it sits in the cup, the joint holding it there.
pub struct Ball {
    pub actor: Actor,
    pub model: BallModel,
    pub joint: Option<ImpulseJointHandle>,
}

impl Ball {
    /// Build a ball in the catapult cup and attach it to the arm.
    pub fn spawn_on_arm(
        world: &mut PhysicsWorld,
        catapult: &Catapult,
        model: BallModel,
        index: ActorIndex,
        color: Rgb,
    ) -> Result<Self> {
        let points = model.points()?;
        let anchor = catapult.ball_anchor(world)?;
        // Lined up with the arm so the joint has nothing to correct.
        let rotation = catapult.arm.pose(world)?.rotation;
        let def = SpawnDef::new(
            ActorKind::Ball,
            BodyKind::Dynamic,
            anchor.coords,
            ShapeDef::ConvexHull { points },
        )
        .index(index)
        .rotation(rotation)
        .material(MaterialDef::LEATHER)
        .density(BALL_DENSITY)
        .events(true);
        let actor = Actor::spawn(world, def, color)?;

        let joint = RevoluteJointBuilder::new(Vector::x_axis())
            .local_anchor1(Point3::from(Vector::from(ARM_BALL_ANCHOR)))
            .local_anchor2(Point3::origin())
            .contacts_enabled(false);
        let joint = world.insert_joint(catapult.arm.body, actor.body, joint);

        Ok(Self {
            actor,
            model,
            joint: Some(joint),
        })
    }

    pub fn is_attached(&self) -> bool {
        self.joint.is_some()
    }

    /// Let go of the arm.
    pub fn release(&mut self, world: &mut PhysicsWorld) -> Result<()> {
        let joint = self.joint.take().ok_or(SceneError::NoBallAttached)?;
        if !world.remove_joint(joint) {
            return Err(SceneError::MissingJoint("ball"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SceneSettings;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1.0e-4;

    fn world() -> PhysicsWorld {
        PhysicsWorld::new(&SceneSettings::default())
    }

    #[test]
    fn cloth_grid_hangs_from_its_corner() {
        let spec = ClothSpec {
            translation: Vector::new(-50.0, 59.0, 12.0),
            rotation: UnitQuaternion::from_axis_angle(&Vector::y_axis(), FRAC_PI_2),
            size: [25.0, 28.0],
            resolution: [4, 4],
        };
        let positions = spec.particle_positions();
        assert_eq!(positions.len(), 25);
        assert_eq!(spec.particle_count(), 25);

        // Top-left corner is the anchor; rotating about +Y maps local +X onto world -Z.
        assert!((positions[0] - spec.translation).norm() < EPS);
        assert!((positions[4] - Vector::new(-50.0, 59.0, -13.0)).norm() < EPS);
        assert!((positions[24] - Vector::new(-50.0, 31.0, -13.0)).norm() < EPS);
    }

    #[test]
    fn cloth_pins_top_row_and_links_neighbours() {
        let mut world = world();
        let spec = ClothSpec {
            translation: Vector::new(0.0, 20.0, 0.0),
            rotation: UnitQuaternion::identity(),
            size: [6.0, 6.0],
            resolution: [2, 3],
        };
        let cloth = Cloth::spawn(&mut world, &spec, Rgb::default()).unwrap();

        assert_eq!(cloth.particles.len(), 12);
        // 3 columns x 4 rows: 2*4 horizontal + 3*3 vertical springs.
        assert_eq!(cloth.springs.len(), 17);

        let fixed = cloth
            .particles
            .iter()
            .filter(|p| world.bodies[p.body].is_fixed())
            .count();
        assert_eq!(fixed, 3);
    }

    #[test]
    fn catapult_arm_starts_at_the_pivot() {
        let mut world = world();
        let catapult = Catapult::spawn(&mut world, Vector::new(0.0, 1.0, 0.0)).unwrap();
        let arm = world.translation(catapult.arm.body).unwrap();
        assert!((arm - Vector::new(2.0, 11.0, 0.0)).norm() < EPS);

        let anchor = catapult.ball_anchor(&world).unwrap();
        assert!((anchor.coords - Vector::new(9.0, 12.5, 0.0)).norm() < EPS);
    }

    #[test]
    fn ball_hull_clears_the_arm() {
        // Beam top and the inner face of the lip, in arm-local coordinates.
        const BEAM_TOP: f32 = 0.4;
        const LIP_FACE: f32 = 9.1;
        let anchor = Vector::from(ARM_BALL_ANCHOR);
        for model in crate::mesh::BALL_MODELS {
            for p in model.points().unwrap() {
                let local = anchor + p.coords;
                assert!(local.y > BEAM_TOP, "{model:?} sinks into the beam: {local:?}");
                assert!(local.x < LIP_FACE, "{model:?} overlaps the lip: {local:?}");
            }
        }
    }

    #[test]
    fn drive_velocity_reaches_the_motor() {
        let mut world = world();
        let catapult = Catapult::spawn(&mut world, Vector::zeros()).unwrap();
        catapult.set_drive_velocity(&mut world, -3.0).unwrap();

        let joint = world.impulse_joints.get(catapult.pivot).unwrap();
        let motor = joint.data.motor(JointAxis::AngX).unwrap();
        assert_eq!(motor.target_vel, -3.0);
    }

    #[test]
    fn ball_is_attached_then_released() {
        let mut world = world();
        let catapult = Catapult::spawn(&mut world, Vector::zeros()).unwrap();
        let mut ball =
            Ball::spawn_on_arm(&mut world, &catapult, BallModel::default(), 0, Rgb::default())
                .unwrap();

        assert!(ball.is_attached());
        assert_eq!(world.impulse_joints.len(), 2);

        ball.release(&mut world).unwrap();
        assert!(!ball.is_attached());
        assert_eq!(world.impulse_joints.len(), 1);
        assert_eq!(ball.release(&mut world), Err(SceneError::NoBallAttached));
    }

    #[test]
    fn windmill_sails_sit_on_the_hub() {
        let mut world = world();
        let windmill = Windmill::spawn(&mut world, Vector::new(-20.0, 0.0, 0.0)).unwrap();
        let hub = world.translation(windmill.spokes.body).unwrap();
        assert!((hub - Vector::new(-12.0, 20.0, 0.0)).norm() < EPS);
        assert!(world.impulse_joints.get(windmill.hub).is_some());
    }
}
