//! Collision and trigger handling.
//!
//! Rapier calls the [`EventHandler`] from inside the step, possibly from solver
//! threads, so the collector only buffers. The scene drains the buffer after the step
//! and feeds each event to [`TriggerState::handle`] on the main thread.

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use rapier3d::prelude::*;

use crate::{
    bitmask_flags::{FilterData, pair_notifies},
    tag::{ActorKind, try_unpack_kind},
};

/// Buffers collision events raised during a step.
#[derive(Default)]
pub struct EventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl EventCollector {
    pub fn drain(&self) -> Vec<CollisionEvent> {
        let mut collisions = self
            .collisions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *collisions)
    }
}

impl EventHandler for EventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        self.collisions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// Per-kind filter words. Kinds without an entry never report contacts.
#[derive(Clone, Debug, Default)]
pub struct ContactFilters {
    filters: HashMap<ActorKind, FilterData>,
}

impl ContactFilters {
    pub fn set(&mut self, kind: ActorKind, data: FilterData) {
        self.filters.insert(kind, data);
    }

    pub fn get(&self, kind: ActorKind) -> FilterData {
        self.filters.get(&kind).copied().unwrap_or_default()
    }

    pub fn notifies(&self, a: ActorKind, b: ActorKind) -> bool {
        pair_notifies(&self.get(a), &self.get(b))
    }
}

/// A reported contact between two tagged actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContactReport {
    pub actors: (ActorKind, ActorKind),
    pub touching: bool,
}

/// What [`TriggerState::handle`] did with an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handled {
    Trigger,
    Contact(ContactReport),
    Ignored,
}

/// Flags read by the per-tick update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TriggerState {
    /// Something other than a plane or the cloth currently overlaps a trigger volume.
    pub trigger: bool,
    /// The ball has been through the goal trigger at least once.
    pub cloth: bool,
}

impl TriggerState {
    pub fn handle(
        &mut self,
        event: &CollisionEvent,
        colliders: &ColliderSet,
        filters: &ContactFilters,
    ) -> Handled {
        if event.sensor() {
            self.handle_trigger(event, colliders)
        } else {
            handle_contact(event, colliders, filters)
        }
    }

    fn handle_trigger(&mut self, event: &CollisionEvent, colliders: &ColliderSet) -> Handled {
        let (c1, c2) = (event.collider1(), event.collider2());
        // The "other" side is whichever collider is not the sensor.
        let other = match colliders.get(c1) {
            Some(co) if co.is_sensor() => c2,
            _ => c1,
        };
        let Some(other) = colliders.get(other) else {
            return Handled::Ignored;
        };
        if other.shape().shape_type() == ShapeType::HalfSpace {
            return Handled::Ignored;
        }
        // The cloth hangs inside the goal volume.
        let kind = try_unpack_kind(other.user_data);
        if kind == Some(ActorKind::Cloth) {
            return Handled::Ignored;
        }

        if event.started() {
            if kind == Some(ActorKind::Ball) {
                log::info!("Ball has collided with cloth");
                self.cloth = true;
            }
            self.trigger = true;
        } else {
            log::debug!("trigger touch lost");
            self.trigger = false;
        }

        Handled::Trigger
    }
}

fn handle_contact(
    event: &CollisionEvent,
    colliders: &ColliderSet,
    filters: &ContactFilters,
) -> Handled {
    let kind = |handle: ColliderHandle| {
        colliders
            .get(handle)
            .and_then(|co| try_unpack_kind(co.user_data))
    };
    let (Some(a), Some(b)) = (kind(event.collider1()), kind(event.collider2())) else {
        return Handled::Ignored;
    };
    if !filters.notifies(a, b) {
        return Handled::Ignored;
    }

    log::info!("Contact found between {} {}", a.name(), b.name());
    if event.started() {
        log::info!("onContact::TOUCH_FOUND");
    } else {
        log::info!("onContact::TOUCH_LOST");
    }

    Handled::Contact(ContactReport {
        actors: (a, b),
        touching: event.started(),
    })
}
