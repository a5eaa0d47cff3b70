//! Scene assembly and per-tick gameplay.
//!
//! A [`Scene`] owns the settings, the current level and the ball preset. Everything
//! living in the physics world is grouped in a [`Stage`], which is thrown away and
//! rebuilt on level change.

use std::f32::consts::FRAC_PI_2;

use rand::{SeedableRng, rngs::StdRng};
use rapier3d::{na::UnitQuaternion, prelude::*};

use crate::{
    actors::{Actor, Ball, Catapult, Cloth, ClothSpec, Windmill, spawn_goal_post},
    bitmask_flags::{FilterData, FilterGroup},
    color::Rgb,
    constants::{
        CATAPULT_POSITION, CLOTH_POSITION, CLOTH_RESOLUTION, CLOTH_SIZE, GOAL_POST_POSITION,
        GOAL_TRIGGER_HALF_EXTENTS, GOAL_TRIGGER_POSITION, GRASS_COLOR, HALFWAY_LINE_COLOR,
        HALFWAY_LINE_HALF_EXTENTS, HALFWAY_LINE_POSITION, KNOCKED_DOWN_COLOR, PALETTE,
        PYRAMID_BOX_DENSITY, ROTATE_STEP_RAD,
    },
    error::{Result, SceneError},
    events::{ContactFilters, ContactReport, Handled, TriggerState},
    level::Level,
    mesh::{BALL_MODELS, BallModel},
    pyramid::PyramidSpec,
    rapier::{MaterialDef, ShapeDef},
    settings::SceneSettings,
    tag::{ActorIndex, ActorKind},
    world::{BodyKind, PhysicsWorld, SpawnDef},
};

/// Drive left after one tick of decay. Never negative.
pub fn decay_drive(power: f32, decay: f32) -> f32 {
    (power - decay).max(0.0)
}

/// Fraction of `heights` at or below `threshold`; 0 for an empty set.
pub fn knocked_down_fraction(heights: impl IntoIterator<Item = f32>, threshold: f32) -> f32 {
    let (mut down, mut total) = (0usize, 0usize);
    for y in heights {
        total += 1;
        if y <= threshold {
            down += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    down as f32 / total as f32
}

/// Ball reports contacts with the goal frame and windmill sails, and vice versa.
fn contact_filters() -> ContactFilters {
    let mut filters = ContactFilters::default();
    filters.set(
        ActorKind::Ball,
        FilterData::new(&[FilterGroup::Actor0], &[FilterGroup::Actor1]),
    );
    for kind in [ActorKind::GoalPost, ActorKind::WindmillSpokes] {
        filters.set(
            kind,
            FilterData::new(&[FilterGroup::Actor1], &[FilterGroup::Actor0]),
        );
    }
    filters
}

/// Everything spawned for one level.
pub struct Stage {
    pub world: PhysicsWorld,
    pub plane: Actor,
    pub halfway_line: Actor,
    pub catapult: Catapult,
    pub goal_post: Actor,
    pub goal_trigger: Actor,
    pub cloth: Cloth,
    pub windmill: Option<Windmill>,
    pub boxes: Vec<Actor>,
    pub balls: Vec<Ball>,
}

impl Stage {
    fn build(settings: &SceneSettings, level: Level) -> Result<Self> {
        let mut world = PhysicsWorld::new(settings);

        let plane = Actor::spawn(
            &mut world,
            SpawnDef::new(
                ActorKind::Plane,
                BodyKind::Fixed,
                Vector::zeros(),
                ShapeDef::Plane {
                    offset_along_normal: 0.0,
                },
            )
            .material(MaterialDef::GRASS),
            GRASS_COLOR,
        )?;

        let halfway_line = Actor::spawn(
            &mut world,
            SpawnDef::new(
                ActorKind::HalfwayLine,
                BodyKind::Kinematic,
                HALFWAY_LINE_POSITION.into(),
                ShapeDef::Cuboid {
                    half_extents: HALFWAY_LINE_HALF_EXTENTS.into(),
                },
            ),
            HALFWAY_LINE_COLOR,
        )?;

        let catapult = Catapult::spawn(&mut world, CATAPULT_POSITION.into())?;
        let goal_post = spawn_goal_post(&mut world, GOAL_POST_POSITION.into())?;

        let cloth = Cloth::spawn(
            &mut world,
            &ClothSpec {
                translation: CLOTH_POSITION.into(),
                rotation: UnitQuaternion::from_axis_angle(&Vector::y_axis(), FRAC_PI_2),
                size: CLOTH_SIZE,
                resolution: CLOTH_RESOLUTION,
            },
            PALETTE[2],
        )?;

        // Invisible: only there to catch the ball between the uprights.
        let goal_trigger = Actor::spawn(
            &mut world,
            SpawnDef::new(
                ActorKind::GoalTrigger,
                BodyKind::Kinematic,
                GOAL_TRIGGER_POSITION.into(),
                ShapeDef::Cuboid {
                    half_extents: GOAL_TRIGGER_HALF_EXTENTS.into(),
                },
            )
            .sensor(true),
            PALETTE[0],
        )?;

        let layout = level.layout();
        let windmill = layout
            .windmill
            .map(|at| Windmill::spawn(&mut world, at))
            .transpose()?;
        let boxes = match layout.pyramid {
            Some(pyramid) => spawn_pyramid(&mut world, &pyramid)?,
            None => Vec::new(),
        };

        Ok(Self {
            world,
            plane,
            halfway_line,
            catapult,
            goal_post,
            goal_trigger,
            cloth,
            windmill,
            boxes,
            balls: Vec::new(),
        })
    }

    /// Every visible actor, for whatever draws the scene. The goal trigger is left out.
    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        let windmill = self
            .windmill
            .iter()
            .flat_map(|w| [&w.base, &w.spokes]);
        [
            &self.plane,
            &self.halfway_line,
            &self.catapult.base,
            &self.catapult.arm,
            &self.goal_post,
        ]
        .into_iter()
        .chain(self.cloth.particles.iter())
        .chain(windmill)
        .chain(self.boxes.iter())
        .chain(self.balls.iter().map(|ball| &ball.actor))
    }
}

fn spawn_pyramid(world: &mut PhysicsWorld, pyramid: &PyramidSpec) -> Result<Vec<Actor>> {
    let half_extents = pyramid.half_extents();
    pyramid
        .positions()
        .into_iter()
        .enumerate()
        .map(|(i, position)| {
            let def = SpawnDef::new(
                ActorKind::PyramidBox,
                BodyKind::Dynamic,
                position,
                ShapeDef::Cuboid { half_extents },
            )
            .index(i as ActorIndex)
            .material(MaterialDef::PYRAMID_BOX)
            .density(PYRAMID_BOX_DENSITY);
            Actor::spawn(world, def, PALETTE[i % PALETTE.len()])
        })
        .collect()
}

pub struct Scene {
    settings: SceneSettings,
    rng: StdRng,
    level: Level,
    model_index: usize,
    filters: ContactFilters,
    triggers: TriggerState,
    contacts: Vec<ContactReport>,
    drive_power: f32,
    yaw: f32,
    box_percent: f32,
    stage: Stage,
}

impl Scene {
    /// Build the scene for `level` with the first ball on the catapult.
    pub fn new(settings: SceneSettings, level: Level, model_index: usize) -> Result<Self> {
        let stage = Stage::build(&settings, level)?;
        let mut scene = Self {
            rng: StdRng::seed_from_u64(settings.color_seed),
            settings,
            level,
            model_index: model_index % BALL_MODELS.len(),
            filters: contact_filters(),
            triggers: TriggerState::default(),
            contacts: Vec::new(),
            drive_power: 0.0,
            yaw: 0.0,
            box_percent: 0.0,
            stage,
        };
        scene.new_ball()?;
        scene.log_init();
        Ok(scene)
    }

    /// Throw the stage away and rebuild it for the current level.
    pub fn init(&mut self) -> Result<()> {
        self.stage = Stage::build(&self.settings, self.level)?;
        self.triggers = TriggerState::default();
        self.contacts.clear();
        self.drive_power = 0.0;
        self.yaw = 0.0;
        self.box_percent = 0.0;
        self.new_ball()?;
        self.log_init();
        Ok(())
    }

    fn log_init(&self) {
        log::info!(
            "scene ready: level {} ({}), {} boxes, windmill: {}",
            self.level,
            self.level.test_case(),
            self.stage.boxes.len(),
            self.stage.windmill.is_some()
        );
    }

    /// Per-tick gameplay: arm drive, win condition, cloth reaction.
    pub fn update(&mut self) -> Result<()> {
        let Stage {
            world,
            catapult,
            boxes,
            cloth,
            ..
        } = &mut self.stage;

        catapult.set_drive_velocity(world, -self.drive_power)?;
        self.drive_power = decay_drive(self.drive_power, self.settings.drive_decay);

        let threshold = self.settings.box_height_threshold;
        let mut heights = Vec::with_capacity(boxes.len());
        for actor in boxes.iter_mut() {
            let y = world
                .translation(actor.body)
                .ok_or(SceneError::MissingBody(ActorKind::PyramidBox))?
                .y;
            if y <= threshold {
                actor.color = KNOCKED_DOWN_COLOR;
            }
            heights.push(y);
        }
        self.box_percent = knocked_down_fraction(heights, threshold);

        if self.triggers.cloth {
            cloth.set_color(PALETTE[3]);
            cloth.set_external_acceleration(world, self.settings.cloth_wind);
        }
        Ok(())
    }

    /// Advance the world one fixed step, handle its events, then [`Scene::update`].
    pub fn step(&mut self) -> Result<()> {
        self.contacts.clear();
        for event in self.stage.world.step() {
            let handled = self
                .triggers
                .handle(&event, &self.stage.world.colliders, &self.filters);
            if let Handled::Contact(report) = handled {
                self.contacts.push(report);
            }
        }
        self.update()
    }

    pub fn power_up(&mut self) {
        self.drive_power += self.settings.power_up_step;
        log::debug!("drive power {}", self.drive_power);
    }

    /// Let the ball on the arm fly.
    pub fn launch(&mut self) -> Result<()> {
        let attached = self.stage.balls.last_mut().filter(|ball| ball.is_attached());
        let Some(ball) = attached else {
            log::warn!("launch ignored: no ball on the catapult");
            return Err(SceneError::NoBallAttached);
        };
        ball.release(&mut self.stage.world)?;
        log::info!("ball launched with drive {}", self.drive_power);
        Ok(())
    }

    /// Put a fresh ball on the arm. Returns `false` if one is already there.
    pub fn new_ball(&mut self) -> Result<bool> {
        if self.has_ball() {
            return Ok(false);
        }
        let index = self.stage.balls.len() as ActorIndex;
        let model = self.ball_model();
        let color = Rgb::random(&mut self.rng);
        let ball = Ball::spawn_on_arm(
            &mut self.stage.world,
            &self.stage.catapult,
            model,
            index,
            color,
        )?;
        log::info!("new ball #{index} ({:?})", ball.model);
        self.stage.balls.push(ball);
        Ok(true)
    }

    pub fn rotate_left(&mut self) -> Result<()> {
        self.rotate_by(ROTATE_STEP_RAD)
    }

    pub fn rotate_right(&mut self) -> Result<()> {
        self.rotate_by(-ROTATE_STEP_RAD)
    }

    fn rotate_by(&mut self, delta: f32) -> Result<()> {
        self.yaw += delta;
        self.stage.catapult.set_yaw(&mut self.stage.world, self.yaw)
    }

    /// Move to the next ball preset. Applies to the next ball created.
    pub fn cycle_ball_model(&mut self) -> BallModel {
        self.model_index = (self.model_index + 1) % BALL_MODELS.len();
        let model = self.ball_model();
        log::info!(
            "Set model rings to {}, model separations to {}",
            model.rings,
            model.separations
        );
        model
    }

    pub fn next_level(&mut self) -> Result<()> {
        self.level = self.level.next();
        log::info!("moving to level {}", self.level);
        self.init()
    }

    pub fn current_test_case(&self) -> &'static str {
        self.level.test_case()
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn ball_model(&self) -> BallModel {
        BALL_MODELS[self.model_index]
    }

    pub fn has_ball(&self) -> bool {
        self.stage.balls.last().is_some_and(Ball::is_attached)
    }

    pub fn ball_count(&self) -> usize {
        self.stage.balls.len()
    }

    pub fn drive_power(&self) -> f32 {
        self.drive_power
    }

    pub fn box_percent(&self) -> f32 {
        self.box_percent
    }

    pub fn triggers(&self) -> TriggerState {
        self.triggers
    }

    /// Filtered contacts reported during the last [`Scene::step`].
    pub fn contacts(&self) -> &[ContactReport] {
        &self.contacts
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1.0e-5;

    /// Level with no pyramid: cheap to build and step.
    const EMPTY: Level = Level(99);

    fn scene(level: Level) -> Scene {
        Scene::new(SceneSettings::default(), level, 0).unwrap()
    }

    #[test]
    fn drive_decays_to_zero() {
        assert!((decay_drive(1.0, 0.05) - 0.95).abs() < EPS);
        assert_eq!(decay_drive(0.03, 0.05), 0.0);
        assert_eq!(decay_drive(0.0, 0.05), 0.0);
    }

    #[test]
    fn fraction_counts_boxes_at_or_below_threshold() {
        assert_eq!(knocked_down_fraction([1.0, 10.0, 12.0, 30.0], 10.0), 0.5);
        assert_eq!(knocked_down_fraction(std::iter::empty(), 10.0), 0.0);
    }

    #[test]
    fn first_level_builds_pyramid_and_ball() {
        let mut scene = scene(Level(0));
        let stage = scene.stage();
        assert_eq!(stage.boxes.len(), 210);
        assert!(stage.windmill.is_none());
        assert_eq!(stage.cloth.particles.len(), 25);
        assert!(scene.has_ball());
        assert_eq!(scene.ball_count(), 1);
        assert_eq!(scene.current_test_case(), "level1");
        let world = &stage.world;
        assert!(
            stage
                .boxes
                .iter()
                .all(|b| world.colliders[b.collider].active_events().is_empty())
        );

        // Only the bottom row (centres at y = 4) starts under the threshold.
        scene.update().unwrap();
        assert!((scene.box_percent() - 20.0 / 210.0).abs() < EPS);
        let red = scene
            .stage()
            .boxes
            .iter()
            .filter(|b| b.color == KNOCKED_DOWN_COLOR)
            .count();
        assert_eq!(red, 20);
    }

    #[test]
    fn second_level_has_a_windmill() {
        let scene = scene(Level(1));
        assert!(scene.stage().windmill.is_some());
        assert_eq!(scene.stage().boxes.len(), 25 * 26 / 2);
    }

    #[test]
    fn empty_level_reports_zero_percent() {
        let mut scene = scene(EMPTY);
        assert!(scene.stage().boxes.is_empty());
        scene.update().unwrap();
        assert_eq!(scene.box_percent(), 0.0);
        assert_eq!(scene.current_test_case(), "default");
    }

    #[test]
    fn power_decays_each_update() {
        let mut scene = scene(EMPTY);
        scene.power_up();
        scene.power_up();
        assert_eq!(scene.drive_power(), 2.0);

        scene.update().unwrap();
        assert!((scene.drive_power() - 1.95).abs() < EPS);

        let joint = scene
            .stage()
            .world
            .impulse_joints
            .get(scene.stage().catapult.pivot)
            .unwrap();
        assert_eq!(joint.data.motor(JointAxis::AngX).unwrap().target_vel, -2.0);

        for _ in 0..100 {
            scene.update().unwrap();
        }
        assert_eq!(scene.drive_power(), 0.0);
    }

    #[test]
    fn launch_then_reload() {
        let mut scene = scene(EMPTY);
        assert!(!scene.new_ball().unwrap());

        scene.launch().unwrap();
        assert!(!scene.has_ball());
        assert_eq!(scene.launch(), Err(SceneError::NoBallAttached));

        assert!(scene.new_ball().unwrap());
        assert!(scene.has_ball());
        assert_eq!(scene.ball_count(), 2);
    }

    #[test]
    fn model_cycle_wraps() {
        let mut scene = scene(EMPTY);
        assert_eq!(scene.ball_model(), BALL_MODELS[0]);
        let seen: Vec<_> = (0..5).map(|_| scene.cycle_ball_model()).collect();
        assert_eq!(seen[0], BALL_MODELS[1]);
        assert_eq!(seen[4], BALL_MODELS[0]);

        scene.cycle_ball_model();
        scene.launch().unwrap();
        scene.new_ball().unwrap();
        assert_eq!(scene.stage().balls[1].model, BALL_MODELS[1]);
    }

    #[test]
    fn next_level_rebuilds_and_resets_balls() {
        let mut scene = scene(Level(0));
        scene.launch().unwrap();
        scene.new_ball().unwrap();
        assert_eq!(scene.ball_count(), 2);

        scene.next_level().unwrap();
        assert_eq!(scene.level(), Level(1));
        assert_eq!(scene.current_test_case(), "level2");
        assert_eq!(scene.ball_count(), 1);
        assert!(scene.stage().windmill.is_some());
    }

    #[test]
    fn rotating_turns_the_base() {
        let mut scene = scene(EMPTY);
        scene.rotate_left().unwrap();
        scene.rotate_left().unwrap();
        scene.rotate_right().unwrap();
        scene.step().unwrap();

        let base = scene.stage().catapult.base.body;
        let rotation = scene.stage().world.bodies[base].rotation();
        let yaw = rotation.scaled_axis().y;
        assert!((yaw - ROTATE_STEP_RAD).abs() < 1e-4, "yaw = {yaw}");
    }

    #[test]
    fn cloth_flag_triggers_wind_and_recolor() {
        let mut scene = scene(EMPTY);
        scene.triggers.cloth = true;
        scene.update().unwrap();

        let cloth = &scene.stage().cloth;
        assert_eq!(cloth.color, PALETTE[3]);
        let world = &scene.stage().world;
        let pushed = cloth
            .particles
            .iter()
            .map(|p| &world.bodies[p.body])
            .filter(|rb| rb.is_dynamic())
            .all(|rb| rb.user_force().z > 0.0);
        assert!(pushed);
    }

    fn arm_angle(scene: &Scene) -> f32 {
        let arm = scene.stage().catapult.arm.body;
        scene.stage().world.bodies[arm].rotation().scaled_axis().z
    }

    fn ball_velocity(scene: &Scene, index: usize) -> Vector<f32> {
        let ball = scene.stage().balls[index].actor.body;
        *scene.stage().world.bodies[ball].linvel()
    }

    #[test]
    fn powered_arm_lifts_the_ball_end() {
        let mut scene = scene(EMPTY);
        for _ in 0..10 {
            scene.power_up();
        }
        // The first step runs before the motor has a target.
        scene.step().unwrap();
        scene.step().unwrap();

        let arm = scene.stage().catapult.arm.body;
        let spin = scene.stage().world.bodies[arm].angvel().z;
        assert!(spin > 0.0, "arm spins ball side downwards: {spin}");
    }

    #[test]
    fn scripted_launch_throws_toward_the_goal() {
        let mut scene = scene(EMPTY);
        for _ in 0..10 {
            scene.power_up();
        }
        let start_x = scene.stage().catapult.ball_anchor(&scene.stage().world).unwrap().x;

        let mut ticks = 0;
        while arm_angle(&scene) < 0.6 {
            scene.step().unwrap();
            ticks += 1;
            assert!(ticks < 60, "arm never came up: {}", arm_angle(&scene));
        }
        scene.launch().unwrap();
        for _ in 0..10 {
            scene.step().unwrap();
        }

        let velocity = ball_velocity(&scene, 0);
        assert!(velocity.x < 0.0, "ball flies away from the goal: {velocity:?}");
        let ball = scene.stage().balls[0].actor.body;
        assert!(scene.stage().world.translation(ball).unwrap().x < start_x);
    }

    #[test]
    fn ball_in_goal_volume_raises_the_cloth_flag() {
        let mut scene = scene(EMPTY);
        for _ in 0..5 {
            scene.step().unwrap();
        }
        // Cloth particles hang inside the volume but do not count.
        assert_eq!(scene.triggers(), TriggerState::default());

        scene.launch().unwrap();
        let ball = scene.stage().balls[0].actor.body;
        let rb = &mut scene.stage_mut().world.bodies[ball];
        // Beside the cloth's middle column, well inside the volume.
        let inside = Vector::from(GOAL_TRIGGER_POSITION) + Vector::new(0.0, 0.0, 3.0);
        rb.set_translation(inside, true);
        rb.set_linvel(Vector::zeros(), true);
        scene.step().unwrap();

        let triggers = scene.triggers();
        assert!(triggers.trigger);
        assert!(triggers.cloth);
        assert_eq!(scene.stage().cloth.color, PALETTE[3]);
    }

    #[test]
    fn stepping_keeps_the_scene_consistent() {
        let mut scene = scene(EMPTY);
        scene.power_up();
        for _ in 0..30 {
            scene.step().unwrap();
        }
        scene.launch().unwrap();
        for _ in 0..30 {
            scene.step().unwrap();
        }
        assert!(scene.drive_power() < 1.0);
        assert!(!scene.has_ball());
    }
}
