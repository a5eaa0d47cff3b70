mod logging;

use std::{env::args, str::FromStr};

use anyhow::Context;
use scene::{Level, Performance, Scene, SceneSettings};
use tracing::{info, warn};

use crate::logging::init_logging;

const CLI_HELP: &str = r#"Headless catapult scene runner.

Options:
    --level=N       level to build (0-6, anything else is an empty pitch) [0]
    --ticks=N       fixed steps to simulate [600]
    --power=N       power-up presses before the launch [10]
    --launch-at=N   tick at which the ball is released, early in the upswing [6]
    --model=N       ball mesh preset (0-4) [0]
    --seed=N        seed for ball colors [0]
    --help          print this message

Logging honours RUST_LOG, e.g. RUST_LOG=scene=debug."#;

/// One scripted run.
#[derive(Clone, Debug, PartialEq, Eq)]
struct RunArgs {
    level: u32,
    ticks: u32,
    power: u32,
    launch_at: u32,
    model: usize,
    seed: u64,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            level: 0,
            ticks: 600,
            power: 10,
            launch_at: 6,
            model: 0,
            seed: 0,
        }
    }
}

// value of the last `--name=` flag, parsed
fn flag<T>(args: &[String], prefix: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    args.iter()
        .filter_map(|arg| arg.strip_prefix(prefix))
        .last()
        .map(|value| {
            value
                .parse()
                .with_context(|| format!("invalid value for {prefix} {value:?}"))
        })
        .transpose()
}

impl RunArgs {
    fn parse(args: &[String]) -> anyhow::Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            level: flag(args, "--level=")?.unwrap_or(defaults.level),
            ticks: flag(args, "--ticks=")?.unwrap_or(defaults.ticks),
            power: flag(args, "--power=")?.unwrap_or(defaults.power),
            launch_at: flag(args, "--launch-at=")?.unwrap_or(defaults.launch_at),
            model: flag(args, "--model=")?.unwrap_or(defaults.model),
            seed: flag(args, "--seed=")?.unwrap_or(defaults.seed),
        })
    }
}

fn main() -> anyhow::Result<()> {
    let args = args().skip(1).collect::<Vec<String>>();
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        println!("{}", CLI_HELP);
        return Ok(());
    }

    init_logging()?;
    let run_args = RunArgs::parse(&args)?;
    run(&run_args)
}

fn run(run_args: &RunArgs) -> anyhow::Result<()> {
    let settings = SceneSettings {
        color_seed: run_args.seed,
        ..SceneSettings::default()
    };
    let mut scene = Scene::new(settings, Level(run_args.level), run_args.model)
        .context("error building scene")?;
    info!(
        test_case = scene.current_test_case(),
        ball = ?scene.ball_model(),
        "running {} ticks",
        run_args.ticks
    );

    for _ in 0..run_args.power {
        scene.power_up();
    }

    let mut perf = Performance::new();
    let mut contacts = 0usize;
    for tick in 0..run_args.ticks {
        perf.start();
        if tick == run_args.launch_at {
            if let Err(e) = scene.launch() {
                warn!(%e, "unable to launch");
            }
        }
        scene.step().with_context(|| format!("error on tick {tick}"))?;
        contacts += scene.contacts().len();
        perf.fps();

        if tick % 60 == 59 {
            info!(
                tick,
                box_percent = scene.box_percent(),
                drive = scene.drive_power(),
                "progress"
            );
        }
    }

    let triggers = scene.triggers();
    info!(
        test_case = scene.current_test_case(),
        box_percent = scene.box_percent(),
        goal = triggers.cloth,
        contacts,
        avg_fps = perf.average_fps(),
        "done"
    );
    Ok(())
}
