pub mod erpin;
pub mod gengar;
pub mod speaki;

use glam::Vec2;

use crate::ecs::components::*;

/// Where a freshly spawned pet appears before it falls to the floor.
const SPAWN_POS: Vec2 = Vec2::new(100.0, 100.0);
/// Initial state dwell, in ticks.
const SPAWN_TIMER: u32 = 100;

/// Closed set of character kinds. Fixed for the lifetime of a pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Archetype {
    Speaki,
    Erpin,
    Gengar,
}

impl Archetype {
    /// Reconcile order.
    pub const ALL: [Archetype; 3] = [Archetype::Speaki, Archetype::Erpin, Archetype::Gengar];

    pub fn label(self) -> &'static str {
        match self {
            Archetype::Speaki => "speaki",
            Archetype::Erpin => "erpin",
            Archetype::Gengar => "gengar",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Population used when the config has no count for this archetype.
    pub fn default_count(self) -> u32 {
        match self {
            Archetype::Speaki | Archetype::Erpin => 1,
            Archetype::Gengar => 0,
        }
    }

    pub fn hooks(self) -> &'static Hooks {
        match self {
            Archetype::Speaki => &speaki::HOOKS,
            Archetype::Erpin => &erpin::HOOKS,
            Archetype::Gengar => &gengar::HOOKS,
        }
    }

    fn initial_brain(self) -> Brain {
        match self {
            Archetype::Speaki => Brain::Speaki(speaki::SpeakiBrain::default()),
            Archetype::Erpin => Brain::Erpin(erpin::ErpinState::Idle),
            Archetype::Gengar => Brain::Gengar(gengar::GengarState::Idle),
        }
    }

    fn initial_image(self) -> &'static str {
        match self {
            Archetype::Speaki => speaki::CHEERFUL,
            Archetype::Erpin => erpin::CHEERFUL,
            Archetype::Gengar => gengar::EATING,
        }
    }
}

/// Per-archetype behavior state. The variant pins the archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brain {
    Speaki(speaki::SpeakiBrain),
    Erpin(erpin::ErpinState),
    Gengar(gengar::GengarState),
}

impl Brain {
    pub fn archetype(&self) -> Archetype {
        match self {
            Brain::Speaki(_) => Archetype::Speaki,
            Brain::Erpin(_) => Archetype::Erpin,
            Brain::Gengar(_) => Archetype::Gengar,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Brain::Speaki(b) => b.state.label(),
            Brain::Erpin(s) => s.label(),
            Brain::Gengar(s) => s.label(),
        }
    }
}

/// Which wall a pet was clamped against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Mutable view over one pet's components, handed to physics and behavior.
pub struct PetMut<'a> {
    pub id: PetId,
    pub pos: &'a mut Position,
    pub vel: &'a mut Velocity,
    pub body: &'a mut Body,
    pub state: &'a mut PetState,
    pub look: &'a mut Presentation,
}

/// Archetype dispatch table. Timer countdown and the dragging guard are
/// handled by the caller, not the hooks.
pub struct Hooks {
    pub update: for<'a, 'b, 'r> fn(&'a mut PetMut<'b>, &'r mut fastrand::Rng),
    pub on_wall: for<'a, 'b> fn(&'a mut PetMut<'b>, Side),
    pub on_land: for<'a, 'b> fn(&'a mut PetMut<'b>),
    pub on_grab: for<'a, 'b, 'r> fn(&'a mut PetMut<'b>, &'r mut fastrand::Rng),
}

/// Component bundle for a new pet.
pub fn bundle(
    id: PetId,
    archetype: Archetype,
    scale: f32,
) -> (PetId, Position, Velocity, Body, PetState, Presentation) {
    (
        id,
        Position(SPAWN_POS),
        Velocity(Vec2::ZERO),
        Body::new(scale),
        PetState {
            brain: archetype.initial_brain(),
            timer: SPAWN_TIMER,
        },
        Presentation::new(archetype.initial_image()),
    )
}

/// Spawn a pet into the world.
pub fn spawn(world: &mut hecs::World, id: PetId, archetype: Archetype, scale: f32) -> hecs::Entity {
    world.spawn(bundle(id, archetype, scale))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_defaults() {
        let mut world = hecs::World::new();
        let e = spawn(&mut world, PetId(7), Archetype::Gengar, 0.5);
        let mut q = world
            .query_one::<(&Position, &Body, &PetState, &Presentation)>(e)
            .unwrap();
        let (pos, body, state, look) = q.get().unwrap();
        assert_eq!(pos.0, Vec2::new(100.0, 100.0));
        assert!(body.facing_right);
        assert!(!body.on_ground);
        assert_eq!(body.size(), Vec2::splat(75.0));
        assert_eq!(state.archetype(), Archetype::Gengar);
        assert_eq!(state.timer, 100);
        assert_eq!(look.image, gengar::EATING);
    }

    #[test]
    fn brain_variant_pins_archetype() {
        for a in Archetype::ALL {
            assert_eq!(a.initial_brain().archetype(), a);
            assert_eq!(Archetype::ALL[a.index()], a);
        }
    }
}
