use glam::Vec2;

use crate::ecs::components::{Body, PetId, Position};
use crate::page::Rect;
use crate::pet::PetMut;

use super::{behavior, with_pet};

/// Share of pointer movement kept as velocity, so a release flings the pet.
const FLING: f32 = 0.5;

/// Pick a pet up. Returns `false` if there is no such pet.
pub fn grab(world: &mut hecs::World, id: PetId, rng: &mut fastrand::Rng) -> bool {
    with_pet(world, id, |pet| {
        pet.body.dragging = true;
        pet.vel.0 = Vec2::ZERO;
        log::debug!("{:?} grabbed", pet.id);
        behavior::on_grab(pet, rng);
    })
    .is_some()
}

/// Follow the pointer. Only held pets move.
pub fn drag_to(world: &mut hecs::World, id: PetId, pointer: Vec2, movement: Vec2) -> bool {
    with_pet(world, id, |pet| follow(pet, pointer, movement)).unwrap_or(false)
}

fn follow(pet: &mut PetMut<'_>, pointer: Vec2, movement: Vec2) -> bool {
    if !pet.body.dragging {
        return false;
    }
    pet.pos.0 = pointer - pet.body.size() / 2.0;
    pet.vel.0 = movement * FLING;
    true
}

/// Let go. The next physics step decides whether it's standing.
pub fn release(world: &mut hecs::World, id: PetId) -> bool {
    with_pet(world, id, |pet| {
        pet.body.dragging = false;
        pet.body.on_ground = false;
        log::debug!("{:?} released at {:?}", pet.id, pet.pos.0);
    })
    .is_some()
}

/// Topmost pet under `point`: the last one drawn.
pub fn pet_at(world: &mut hecs::World, point: Vec2) -> Option<PetId> {
    world
        .query_mut::<(&PetId, &Position, &Body)>()
        .into_iter()
        .filter(|(_, (_, pos, body))| {
            let size = body.size();
            Rect::new(pos.0.x, pos.0.y, size.x, size.y).contains(point)
        })
        .map(|(_, (id, _, _))| *id)
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{Presentation, Velocity};
    use crate::ecs::systems::physics;
    use crate::page::Boundary;
    use crate::pet::{self, Archetype, Side};

    fn world_with(archetype: Archetype) -> (hecs::World, hecs::Entity) {
        let mut world = hecs::World::new();
        let e = pet::spawn(&mut world, PetId(1), archetype, 0.5);
        (world, e)
    }

    #[test]
    fn grab_drag_release() {
        let mut rng = fastrand::Rng::with_seed(1);
        let (mut world, e) = world_with(Archetype::Speaki);

        // Not held yet: pointer moves are ignored.
        assert!(!drag_to(&mut world, PetId(1), Vec2::new(400.0, 300.0), Vec2::ZERO));

        assert!(grab(&mut world, PetId(1), &mut rng));
        assert!(world.get::<&Body>(e).unwrap().dragging);
        assert_eq!(world.get::<&Presentation>(e).unwrap().image, pet::speaki::CRYING);
        assert_eq!(world.get::<&Presentation>(e).unwrap().cue, Some("cry-drag.mp3"));

        assert!(drag_to(&mut world, PetId(1), Vec2::new(400.0, 300.0), Vec2::new(-8.0, 4.0)));
        assert_eq!(world.get::<&Position>(e).unwrap().0, Vec2::new(362.5, 262.5));
        assert_eq!(world.get::<&Velocity>(e).unwrap().0, Vec2::new(-4.0, 2.0));

        assert!(release(&mut world, PetId(1)));
        let body = *world.get::<&Body>(e).unwrap();
        assert!(!body.dragging);
        assert!(!body.on_ground);

        assert!(!grab(&mut world, PetId(99), &mut rng));
    }

    #[test]
    fn release_past_left_wall() {
        let mut rng = fastrand::Rng::with_seed(1);
        let (mut world, _) = world_with(Archetype::Erpin);
        let viewport = Vec2::new(1280.0, 800.0);

        grab(&mut world, PetId(1), &mut rng);
        // Sprite is 75 px; this puts its left edge at x = 50.
        drag_to(&mut world, PetId(1), Vec2::new(87.5, 400.0), Vec2::new(-120.0, 0.0));
        release(&mut world, PetId(1));

        let mut hits = Vec::new();
        for _ in 0..3 {
            with_pet(&mut world, PetId(1), |pet| {
                let bounds = Boundary::for_sprite(None, viewport, pet.body.size(), physics::GROUND_OFFSET);
                let ev = physics::step(pet, &bounds);
                if let Some(side) = ev.wall {
                    hits.push((side, pet.pos.0.x));
                }
            });
        }
        // Bounce back to +30, then the erpin wall hook sets it walking right.
        assert_eq!(hits, vec![(Side::Left, 0.0)]);
    }

    #[test]
    fn topmost_hit() {
        let mut world = hecs::World::new();
        pet::spawn(&mut world, PetId(1), Archetype::Speaki, 1.0);
        pet::spawn(&mut world, PetId(2), Archetype::Speaki, 1.0);

        assert_eq!(pet_at(&mut world, Vec2::new(10.0, 10.0)), None);
        assert_eq!(pet_at(&mut world, Vec2::new(150.0, 150.0)), Some(PetId(2)));
    }
}
