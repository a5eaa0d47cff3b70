pub mod actors;
pub mod bitmask_flags;
pub mod color;
pub mod constants;
pub mod error;
pub mod events;
pub mod level;
pub mod mesh;
pub mod perf;
pub mod pyramid;
pub mod rapier;
pub mod scene;
pub mod settings;
pub mod tag;
pub mod world;

pub use color::Rgb;
pub use constants::{BOX_HEIGHT_THRESHOLD, DRIVE_DECAY_PER_TICK, PALETTE, TIMESTEP};
pub use error::{Result, SceneError};
pub use events::{ContactReport, TriggerState};
pub use level::{LAST_LEVEL, Level, LevelLayout};
pub use mesh::{BALL_MODELS, BallModel, rugby_ball_points};
pub use perf::Performance;
pub use pyramid::{PyramidSpec, pyramid_box_count, pyramid_positions};
pub use scene::{Scene, Stage, decay_drive, knocked_down_fraction};
pub use settings::SceneSettings;
pub use tag::{ActorKind, pack_tag, try_unpack_kind};
