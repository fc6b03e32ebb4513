use crate::page::Boundary;
use crate::pet::{PetMut, Side};

use super::behavior;

/// Downward acceleration in pixels/tick².
pub const GRAVITY: f32 = 0.5;
/// Horizontal velocity kept per grounded tick.
const GROUND_FRICTION: f32 = 0.95;
/// Horizontal velocity factor when bouncing off a wall.
const WALL_BOUNCE: f32 = -0.5;
/// Horizontal velocity kept on touchdown.
const LANDING_DAMPING: f32 = 0.8;
/// How far the sprite sinks into the anchor so its feet overlap the border.
pub const GROUND_OFFSET: f32 = 10.0;

/// What happened during one step. Hooks have already run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepEvents {
    pub landed: bool,
    pub wall: Option<Side>,
}

/// Advance one pet by a tick: gravity, integration, floor, then walls.
/// Held pets are left alone; the pointer owns their position.
pub fn step(pet: &mut PetMut<'_>, bounds: &Boundary) -> StepEvents {
    let mut events = StepEvents::default();
    if pet.body.dragging {
        return events;
    }

    pet.vel.0.y += GRAVITY;
    pet.pos.0 += pet.vel.0;

    if pet.pos.0.y >= bounds.floor_y {
        pet.pos.0.y = bounds.floor_y;
        pet.vel.0.y = 0.0;
        if !pet.body.on_ground {
            pet.body.on_ground = true;
            pet.vel.0.x *= LANDING_DAMPING;
            events.landed = true;
            log::trace!("{:?} landed at y={}", pet.id, bounds.floor_y);
            behavior::on_land(pet);
        }
        pet.vel.0.x *= GROUND_FRICTION;
    } else {
        pet.body.on_ground = false;
    }

    let side = if pet.pos.0.x <= bounds.min_x {
        pet.pos.0.x = bounds.min_x;
        Some(Side::Left)
    } else if pet.pos.0.x >= bounds.max_x {
        pet.pos.0.x = bounds.max_x;
        Some(Side::Right)
    } else {
        None
    };

    if let Some(side) = side {
        pet.vel.0.x *= WALL_BOUNCE;
        log::trace!("{:?} hit the {:?} wall", pet.id, side);
        behavior::on_wall(pet, side);
        events.wall = Some(side);
    }

    events
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::pet::speaki::{self, SpeakiState};
    use crate::pet::testing::Fixture;
    use crate::pet::{Archetype, Brain};

    fn viewport_bounds(f: &Fixture) -> Boundary {
        Boundary::for_sprite(None, Vec2::new(1280.0, 800.0), f.body.size(), GROUND_OFFSET)
    }

    #[test]
    fn falls_and_settles_on_viewport() {
        let mut f = Fixture::new(Archetype::Speaki);
        let bounds = viewport_bounds(&f);
        assert_eq!(bounds.floor_y, 650.0);

        let mut landings = 0;
        for _ in 0..200 {
            let ev = step(&mut f.view(), &bounds);
            landings += ev.landed as u32;
            assert_eq!(ev.wall, None);
            if f.body.on_ground {
                assert_eq!(f.pos.0.y, bounds.floor_y);
            }
        }

        assert_eq!(landings, 1);
        assert!(f.body.on_ground);
        assert_eq!(f.pos.0.y, 650.0);
        assert_eq!(f.vel.0.y, 0.0);
        assert_eq!(f.pos.0.x, 100.0);
    }

    #[test]
    fn overshoot_snaps_to_floor() {
        let mut f = Fixture::new(Archetype::Erpin);
        let bounds = viewport_bounds(&f);
        f.pos.0.y = bounds.floor_y - 1.0;
        f.vel.0 = Vec2::new(2.0, 30.0);

        let ev = step(&mut f.view(), &bounds);
        assert!(ev.landed);
        assert_eq!(f.pos.0.y, bounds.floor_y);
        assert_eq!(f.vel.0.y, 0.0);
        // Touchdown damping, then ground friction.
        assert!((f.vel.0.x - 2.0 * 0.8 * 0.95).abs() < 1e-6);
    }

    #[test]
    fn landing_resets_jump_once() {
        let mut f = Fixture::grounded(Archetype::Speaki);
        let bounds = viewport_bounds(&f);
        f.pos.0 = Vec2::new(0.0, bounds.floor_y);

        // Bump the left wall while grounded: hop.
        let ev = step(&mut f.view(), &bounds);
        assert_eq!(ev.wall, Some(Side::Left));
        assert!(!f.body.on_ground);
        assert_eq!(f.state.brain, Brain::Speaki(speaki::SpeakiBrain { state: SpeakiState::Jumping, walk_clip: 0 }));
        assert_eq!(f.look.image, speaki::HAPPY);

        let mut landings = 0;
        for _ in 0..100 {
            let ev = step(&mut f.view(), &bounds);
            if ev.landed {
                landings += 1;
                assert_eq!(f.look.image, speaki::CHEERFUL);
                match f.state.brain {
                    Brain::Speaki(b) => assert_eq!(b.state, SpeakiState::Idle),
                    _ => unreachable!(),
                }
            }
        }
        assert_eq!(landings, 1);
    }

    #[test]
    fn wall_hook_once_per_clamp() {
        let mut f = Fixture::grounded(Archetype::Gengar);
        let bounds = viewport_bounds(&f);
        f.pos.0 = Vec2::new(bounds.max_x - 1.0, bounds.floor_y);
        f.vel.0.x = 4.0;

        let ev = step(&mut f.view(), &bounds);
        assert_eq!(ev.wall, Some(Side::Right));
        assert_eq!(f.pos.0.x, bounds.max_x);
        // Bounce, then the pout hook zeroes it.
        assert_eq!(f.vel.0.x, 0.0);
        assert!(!f.body.facing_right);

        f.pos.0.x = 500.0;
        let ev = step(&mut f.view(), &bounds);
        assert_eq!(ev.wall, None);
    }

    #[test]
    fn dragging_skips_everything() {
        let mut f = Fixture::new(Archetype::Gengar);
        let bounds = viewport_bounds(&f);
        f.body.dragging = true;
        f.pos.0 = Vec2::new(-40.0, 2000.0);
        f.vel.0 = Vec2::new(-3.0, 5.0);

        let ev = step(&mut f.view(), &bounds);
        assert_eq!(ev, StepEvents::default());
        assert_eq!(f.pos.0, Vec2::new(-40.0, 2000.0));
        assert_eq!(f.vel.0, Vec2::new(-3.0, 5.0));
        assert!(!f.body.on_ground);
    }

    #[test]
    fn bounce_inverts_velocity() {
        let mut f = Fixture::new(Archetype::Speaki);
        let bounds = viewport_bounds(&f);
        // Airborne, so speaki doesn't hop and the raw bounce is visible.
        f.pos.0 = Vec2::new(1.0, 100.0);
        f.vel.0 = Vec2::new(-4.0, 0.0);

        let ev = step(&mut f.view(), &bounds);
        assert_eq!(ev.wall, Some(Side::Left));
        assert_eq!(f.pos.0.x, 0.0);
        assert_eq!(f.vel.0.x, 2.0);
    }
}
