use crate::pet::{PetMut, Side};

/// Count down the state timer and run the archetype's state machine.
/// Held pets don't think.
pub fn update(pet: &mut PetMut<'_>, rng: &mut fastrand::Rng) {
    if pet.body.dragging {
        return;
    }
    pet.state.timer = pet.state.timer.saturating_sub(1);
    let hooks = pet.state.archetype().hooks();
    (hooks.update)(pet, rng);
}

pub fn on_wall(pet: &mut PetMut<'_>, side: Side) {
    let hooks = pet.state.archetype().hooks();
    (hooks.on_wall)(pet, side);
}

pub fn on_land(pet: &mut PetMut<'_>) {
    let hooks = pet.state.archetype().hooks();
    (hooks.on_land)(pet);
}

pub fn on_grab(pet: &mut PetMut<'_>, rng: &mut fastrand::Rng) {
    let hooks = pet.state.archetype().hooks();
    (hooks.on_grab)(pet, rng);
}
