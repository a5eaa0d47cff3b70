//! Actor identification stored on colliders.
//!
//! Rapier gives every collider a free `u128` of `user_data`. Event handling needs to
//! know *what* it touched (a ball, the goal trigger, a plane...), so the scene packs
//! an [`ActorKind`] and a per-kind index into that slot.
//!
//! # Bit layout
//! Least-significant bit = bit 0:
//!
//! - bits 0..=63   : per-kind index (u64)
//! - bits 64..=71  : `ActorKind` tag (u8)
//! - bits 72..=127 : reserved (must be zero)
//!
//! A zero `user_data` (the rapier default) never decodes to a valid tag, so colliders
//! created outside the scene are ignored by event handling.

/// Packed [`ActorKind`] + index.
pub type ActorTag = u128;

/// Index of an actor among the actors of the same kind.
pub type ActorIndex = u64;

/// What kind of scene object a collider belongs to.
///
/// The numeric values are part of the packed tag; do not reorder.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ActorKind {
    Plane = 1,
    HalfwayLine = 2,
    CatapultBase = 3,
    CatapultArm = 4,
    Ball = 5,
    GoalPost = 6,
    GoalTrigger = 7,
    Cloth = 8,
    WindmillBase = 9,
    WindmillSpokes = 10,
    PyramidBox = 11,
}

impl ActorKind {
    const ALL: [ActorKind; 11] = [
        ActorKind::Plane,
        ActorKind::HalfwayLine,
        ActorKind::CatapultBase,
        ActorKind::CatapultArm,
        ActorKind::Ball,
        ActorKind::GoalPost,
        ActorKind::GoalTrigger,
        ActorKind::Cloth,
        ActorKind::WindmillBase,
        ActorKind::WindmillSpokes,
        ActorKind::PyramidBox,
    ];

    fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|k| *k as u8 == tag)
    }

    /// Display name, as shown in contact logs.
    pub fn name(self) -> &'static str {
        match self {
            ActorKind::Plane => "plane",
            ActorKind::HalfwayLine => "halfwayLine",
            ActorKind::CatapultBase => "catapultBase",
            ActorKind::CatapultArm => "catapultArm",
            ActorKind::Ball => "ball",
            ActorKind::GoalPost => "goalPostFrame",
            ActorKind::GoalTrigger => "goalPost",
            ActorKind::Cloth => "cloth",
            ActorKind::WindmillBase => "windmillBase",
            ActorKind::WindmillSpokes => "windmillSpokes",
            ActorKind::PyramidBox => "box",
        }
    }
}

pub fn pack_tag(index: ActorIndex, kind: ActorKind) -> ActorTag {
    (index as u128) | ((kind as u128) << ActorIndex::BITS)
}

/// Returns `None` for untagged colliders and unknown kind values.
pub fn try_unpack_kind(tag: ActorTag) -> Option<ActorKind> {
    const KIND_MASK: u128 = u8::MAX as u128;
    ActorKind::from_tag(((tag >> ActorIndex::BITS) & KIND_MASK) as u8)
}

/// Extracts the index. Does not validate the kind.
pub fn unpack_index(tag: ActorTag) -> ActorIndex {
    const INDEX_MASK: u128 = u64::MAX as u128;
    (tag & INDEX_MASK) as ActorIndex
}

/// Checks that `tag` was produced by [`pack_tag`].
pub fn validate_tag(tag: ActorTag) -> Result<(), &'static str> {
    const RESERVED_MASK: u128 = !0u128 << 72;
    if (tag & RESERVED_MASK) != 0 {
        return Err("Actor tag reserved bits are non-zero");
    }
    if try_unpack_kind(tag).is_none() {
        return Err("Actor tag has unknown kind");
    }
    Ok(())
}
