use std::fmt;

use crate::tag::ActorKind;

/// Errors raised while building or driving the scene.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SceneError {
    /// A ball mesh needs at least one point per cross-section.
    InvalidRings,
    /// The engine rejected a point cloud (e.g. every point is coplanar).
    DegenerateHull { points: usize },
    /// A launch was requested while no ball sits on the catapult arm.
    NoBallAttached,
    /// A body handle recorded by the scene no longer exists in the engine.
    MissingBody(ActorKind),
    /// A joint handle recorded by the scene no longer exists in the engine.
    MissingJoint(&'static str),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::InvalidRings => write!(f, "ball mesh needs at least one ring"),
            SceneError::DegenerateHull { points } => {
                write!(f, "unable to build a convex hull from {points} points")
            }
            SceneError::NoBallAttached => write!(f, "no ball is attached to the catapult"),
            SceneError::MissingBody(kind) => write!(f, "missing rigid body for {kind:?}"),
            SceneError::MissingJoint(name) => write!(f, "missing joint `{name}`"),
        }
    }
}

impl std::error::Error for SceneError {}

pub type Result<T> = std::result::Result<T, SceneError>;
