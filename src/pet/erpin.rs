//! Erpin: wanders back and forth and dozes off mid-walk.

use super::{Brain, Hooks, PetMut, Side};

pub const CHEERFUL: &str = "Erpin-Cherrful.png";
pub const CRYING: &str = "Erpin-Cry.png";
pub const SLEEPING: &str = "Erpin-Sleeping.png";

const HUM_CLIP: &str = "Erpin-humu.mp3";
const PUNCH_CLIPS: [&str; 2] = ["Erpin-Punch-1.mp3", "Erpin-Punch-2.mp3"];

/// Per-tick chance a walking erpin falls asleep on the spot.
const NAP_CHANCE: f32 = 0.003;
/// Per-tick chance a walking erpin turns around.
const TURN_CHANCE: f32 = 0.02;
/// Chance of humming when a walk starts.
const HUM_CHANCE: f32 = 0.3;
const WALK_ACCEL: f32 = 1.5;
const MAX_SPEED: f32 = 2.5;
/// Speed after bouncing off a wall.
const WALL_SPEED: f32 = 1.5;
/// Dwell after waking up.
const WAKE_TIMER: u32 = 100;

/// Re-roll table: cumulative thresholds. Rolls above `WALK_CHANCE` keep the
/// current state.
const SLEEP_CHANCE: f32 = 0.02;
const IDLE_CHANCE: f32 = 0.12;
const WALK_CHANCE: f32 = 0.82;

pub static HOOKS: Hooks = Hooks {
    update,
    on_wall,
    on_land,
    on_grab,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErpinState {
    Idle,
    Walk,
    Sleeping,
}

impl ErpinState {
    pub fn label(self) -> &'static str {
        match self {
            ErpinState::Idle => "IDLE",
            ErpinState::Walk => "WALK",
            ErpinState::Sleeping => "SLEEPING",
        }
    }
}

fn update(pet: &mut PetMut<'_>, rng: &mut fastrand::Rng) {
    let Brain::Erpin(state) = &mut pet.state.brain else {
        return;
    };

    // Asleep: nothing but the timer can wake it.
    if *state == ErpinState::Sleeping {
        pet.vel.0.x = 0.0;
        if pet.state.timer == 0 {
            log::debug!("erpin {:?} wakes up", pet.id);
            *state = ErpinState::Idle;
            pet.state.timer = WAKE_TIMER;
            pet.look.show(CHEERFUL);
        }
        return;
    }

    if !pet.body.on_ground {
        return;
    }

    if *state == ErpinState::Walk && rng.f32() < NAP_CHANCE {
        log::debug!("erpin {:?} dozes off mid-walk", pet.id);
        *state = ErpinState::Sleeping;
        pet.state.timer = rng.u32(300..600);
        pet.vel.0.x = 0.0;
        pet.look.show(SLEEPING);
        return;
    }

    if pet.state.timer == 0 {
        let r = rng.f32();
        if r < SLEEP_CHANCE {
            *state = ErpinState::Sleeping;
            pet.state.timer = rng.u32(500..1000);
            pet.vel.0.x = 0.0;
            pet.look.show(SLEEPING);
            return;
        } else if r < IDLE_CHANCE {
            *state = ErpinState::Idle;
            pet.state.timer = rng.u32(100..200);
            pet.look.show(CHEERFUL);
        } else if r < WALK_CHANCE {
            *state = ErpinState::Walk;
            pet.state.timer = rng.u32(200..400);
            pet.look.show(CHEERFUL);
            if rng.f32() < HUM_CHANCE && !pet.look.sound_playing {
                pet.look.cue(HUM_CLIP);
            }
        }
    }

    if *state == ErpinState::Walk {
        if rng.f32() < TURN_CHANCE {
            pet.body.facing_right = !pet.body.facing_right;
        }
        pet.vel.0.x += if pet.body.facing_right { WALK_ACCEL } else { -WALK_ACCEL };
    }
    pet.vel.0.x = pet.vel.0.x.clamp(-MAX_SPEED, MAX_SPEED);
}

/// Turn around and walk away. A sleeping erpin doesn't notice.
fn on_wall(pet: &mut PetMut<'_>, side: Side) {
    let Brain::Erpin(state) = &mut pet.state.brain else {
        return;
    };
    if *state == ErpinState::Sleeping {
        return;
    }

    *state = ErpinState::Walk;
    pet.body.facing_right = side == Side::Left;
    pet.vel.0.x = if pet.body.facing_right { WALL_SPEED } else { -WALL_SPEED };
}

fn on_land(_pet: &mut PetMut<'_>) {}

fn on_grab(pet: &mut PetMut<'_>, rng: &mut fastrand::Rng) {
    pet.look.show(CRYING);
    pet.look.cue(PUNCH_CLIPS[rng.usize(..PUNCH_CLIPS.len())]);
}
