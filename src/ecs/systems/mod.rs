pub mod behavior;
pub mod drag;
pub mod physics;

use glam::Vec2;

use crate::ecs::components::{Body, PetId, PetState, Position, Presentation, Velocity};
use crate::page::{Boundary, Rect};
use crate::pet::PetMut;

/// Every component a pet carries, as one query.
pub(crate) type PetQuery<'a> = (
    &'a PetId,
    &'a mut Position,
    &'a mut Velocity,
    &'a mut Body,
    &'a mut PetState,
    &'a mut Presentation,
);

/// Run `f` on the pet with `id`, if it exists.
pub(crate) fn with_pet<R>(
    world: &mut hecs::World,
    id: PetId,
    f: impl FnOnce(&mut PetMut<'_>) -> R,
) -> Option<R> {
    let (_, (pid, pos, vel, body, state, look)) = world
        .query_mut::<PetQuery<'_>>()
        .into_iter()
        .find(|(_, (pid, ..))| **pid == id)?;
    let mut pet = PetMut {
        id: *pid,
        pos,
        vel,
        body,
        state,
        look,
    };
    Some(f(&mut pet))
}

/// Run one simulation tick for every pet: physics, then behavior.
///
/// `anchor` is this frame's resolved anchor; each pet derives its own bounds
/// from it since sprite sizes differ.
pub fn tick(world: &mut hecs::World, anchor: Option<&Rect>, viewport: Vec2, rng: &mut fastrand::Rng) {
    for (_, (id, pos, vel, body, state, look)) in world.query_mut::<PetQuery<'_>>() {
        let mut pet = PetMut {
            id: *id,
            pos,
            vel,
            body,
            state,
            look,
        };

        // 1. Gravity, floor and walls
        let bounds = Boundary::for_sprite(anchor, viewport, pet.body.size(), physics::GROUND_OFFSET);
        physics::step(&mut pet, &bounds);

        // 2. State machine
        behavior::update(&mut pet, rng);
    }
}
