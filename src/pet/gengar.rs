//! Gengar: slurps ramen, strolls, and sulks in corners.

use super::{Brain, Hooks, PetMut, Side};

pub const EATING: &str = "Gengar-Eat.png";
pub const GRABBED: &str = "Gengar-Grab.png";
pub const POUTY: &str = "Gengar-pouty.png";
pub const WALKING: &str = "Gengar-Walk.png";

const GRAB_CLIP: &str = "gengar-grab.mp3";
const LAUGH_CLIP: &str = "gengar-laughing.mp3";
const VOICE_CLIP: &str = "gengar-voice.mp3";

const WALK_ACCEL: f32 = 0.1;
const MAX_SPEED: f32 = 1.0;
/// Speed when walking off after a sulk.
const LEAVE_SPEED: f32 = 1.5;
/// Velocity decay outside of walking.
const DECAY: f32 = 0.8;
/// Sulk length after hitting a wall.
const WALL_POUT_TIMER: u32 = 30;
/// Walk length after a sulk ends.
const LEAVE_TIMER: u32 = 200;
/// Per-tick chance of idle chatter while walking.
const CHATTER_CHANCE: f32 = 0.002;

/// Re-roll table: cumulative thresholds.
const IDLE_CHANCE: f32 = 0.2;
const POUT_CHANCE: f32 = 0.3;

pub static HOOKS: Hooks = Hooks {
    update,
    on_wall,
    on_land,
    on_grab,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GengarState {
    Idle,
    Walk,
    Pout,
}

impl GengarState {
    pub fn label(self) -> &'static str {
        match self {
            GengarState::Idle => "IDLE",
            GengarState::Walk => "WALK",
            GengarState::Pout => "POUT",
        }
    }
}

fn update(pet: &mut PetMut<'_>, rng: &mut fastrand::Rng) {
    let Brain::Gengar(state) = &mut pet.state.brain else {
        return;
    };

    if *state == GengarState::Pout {
        if pet.state.timer == 0 {
            *state = GengarState::Walk;
            pet.state.timer = LEAVE_TIMER;
            pet.look.show(WALKING);
            pet.vel.0.x = if pet.body.facing_right { LEAVE_SPEED } else { -LEAVE_SPEED };
        }
        return;
    }

    if !pet.body.on_ground {
        return;
    }

    if pet.state.timer == 0 {
        let r = rng.f32();
        if r < IDLE_CHANCE {
            *state = GengarState::Idle;
            pet.state.timer = rng.u32(30..50);
            pet.look.show(EATING);
            pet.vel.0.x = 0.0;
            if rng.bool() {
                pet.look.cue(VOICE_CLIP);
            }
        } else if r < POUT_CHANCE {
            *state = GengarState::Pout;
            pet.state.timer = rng.u32(30..50);
            pet.look.show(POUTY);
            pet.vel.0.x = 0.0;
            pet.look.cue(LAUGH_CLIP);
        } else {
            *state = GengarState::Walk;
            pet.state.timer = rng.u32(100..300);
            pet.look.show(WALKING);
            if pet.vel.0.x == 0.0 {
                pet.body.facing_right = rng.bool();
            }
            if rng.f32() < 0.4 {
                pet.look.cue(VOICE_CLIP);
            }
        }
    }

    if *state == GengarState::Walk {
        pet.vel.0.x += if pet.body.facing_right { WALK_ACCEL } else { -WALK_ACCEL };
        pet.vel.0.x = pet.vel.0.x.clamp(-MAX_SPEED, MAX_SPEED);
        if rng.f32() < CHATTER_CHANCE && !pet.look.sound_playing {
            pet.look.cue(VOICE_CLIP);
        }
    } else {
        pet.vel.0.x *= DECAY;
    }
}

/// Sulk against the wall, then walk away from it.
fn on_wall(pet: &mut PetMut<'_>, side: Side) {
    let Brain::Gengar(state) = &mut pet.state.brain else {
        return;
    };
    if *state == GengarState::Pout {
        return;
    }

    log::debug!("gengar {:?} sulks at the {:?} wall", pet.id, side);
    *state = GengarState::Pout;
    pet.state.timer = WALL_POUT_TIMER;
    pet.vel.0.x = 0.0;
    pet.body.facing_right = side == Side::Left;
    pet.look.show(POUTY);
    pet.look.cue(LAUGH_CLIP);
}

fn on_land(_pet: &mut PetMut<'_>) {}

fn on_grab(pet: &mut PetMut<'_>, _rng: &mut fastrand::Rng) {
    pet.look.show(GRABBED);
    pet.look.cue(GRAB_CLIP);
}
