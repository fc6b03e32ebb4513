//! Speaki: a restless walker that hops whenever it bumps into a wall.

use super::{Brain, Hooks, PetMut, Side};

pub const CHEERFUL: &str = "Speaki-Cherrful.png";
pub const CRYING: &str = "Speaki-Cry.png";
pub const HAPPY: &str = "Speaki-Happu.png";

const DRAG_CLIP: &str = "cry-drag.mp3";
const JUMP_CLIP: &str = "jump.mp3";
/// Footstep clips, played in rotation while walking.
const WALK_CLIPS: [&str; 3] = ["walk-1.mp3", "walk-2.mp3", "walk-3.mp3"];

/// Walk acceleration per tick.
const WALK_ACCEL: f32 = 0.05;
/// Horizontal speed cap while grounded.
const MAX_SPEED: f32 = 1.5;
/// Upward launch velocity of a wall hop.
const JUMP_VELOCITY: f32 = -10.0;
/// Horizontal kick away from the wall during a hop.
const JUMP_KICK: f32 = 2.0;

/// Re-roll table: cumulative thresholds.
const IDLE_CHANCE: f32 = 0.02;
const WALK_LEFT_CHANCE: f32 = 0.52;

pub static HOOKS: Hooks = Hooks {
    update,
    on_wall,
    on_land,
    on_grab,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakiState {
    Idle,
    WalkLeft,
    WalkRight,
    Jumping,
}

impl SpeakiState {
    pub fn label(self) -> &'static str {
        match self {
            SpeakiState::Idle => "IDLE",
            SpeakiState::WalkLeft => "WALK_LEFT",
            SpeakiState::WalkRight => "WALK_RIGHT",
            SpeakiState::Jumping => "JUMPING",
        }
    }

    fn is_walking(self) -> bool {
        matches!(self, SpeakiState::WalkLeft | SpeakiState::WalkRight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeakiBrain {
    pub state: SpeakiState,
    /// Index into the footstep rotation.
    pub walk_clip: usize,
}

impl Default for SpeakiBrain {
    fn default() -> Self {
        Self {
            state: SpeakiState::Idle,
            walk_clip: 0,
        }
    }
}

/// Pick the next state and its dwell time.
fn roll(rng: &mut fastrand::Rng) -> (SpeakiState, u32) {
    let r = rng.f32();
    if r < IDLE_CHANCE {
        (SpeakiState::Idle, rng.u32(50..100))
    } else if r < WALK_LEFT_CHANCE {
        (SpeakiState::WalkLeft, rng.u32(600..1000))
    } else {
        (SpeakiState::WalkRight, rng.u32(600..1000))
    }
}

fn update(pet: &mut PetMut<'_>, rng: &mut fastrand::Rng) {
    if !pet.body.on_ground {
        return;
    }
    let Brain::Speaki(brain) = &mut pet.state.brain else {
        return;
    };

    if pet.state.timer == 0 {
        let (next, timer) = roll(rng);
        if next != brain.state {
            log::debug!("speaki {:?}: {} -> {}", pet.id, brain.state.label(), next.label());
        }
        brain.state = next;
        pet.state.timer = timer;
        pet.look.show(CHEERFUL);
    }

    match brain.state {
        SpeakiState::WalkLeft => {
            pet.vel.0.x -= WALK_ACCEL;
            pet.body.facing_right = false;
        }
        SpeakiState::WalkRight => {
            pet.vel.0.x += WALK_ACCEL;
            pet.body.facing_right = true;
        }
        SpeakiState::Idle | SpeakiState::Jumping => {}
    }
    pet.vel.0.x = pet.vel.0.x.clamp(-MAX_SPEED, MAX_SPEED);

    if brain.state.is_walking() && !pet.look.sound_playing {
        pet.look.cue(WALK_CLIPS[brain.walk_clip]);
        brain.walk_clip = (brain.walk_clip + 1) % WALK_CLIPS.len();
    }
}

/// Grounded wall hits always hop, whatever the timer says.
fn on_wall(pet: &mut PetMut<'_>, side: Side) {
    if !pet.body.on_ground {
        return;
    }
    let Brain::Speaki(brain) = &mut pet.state.brain else {
        return;
    };

    brain.state = SpeakiState::Jumping;
    pet.vel.0.y = JUMP_VELOCITY;
    pet.body.on_ground = false;
    pet.look.show(HAPPY);
    pet.look.cue(JUMP_CLIP);

    match side {
        Side::Left => {
            pet.vel.0.x = JUMP_KICK;
            pet.body.facing_right = true;
        }
        Side::Right => {
            pet.vel.0.x = -JUMP_KICK;
            pet.body.facing_right = false;
        }
    }
}

fn on_land(pet: &mut PetMut<'_>) {
    if let Brain::Speaki(brain) = &mut pet.state.brain {
        if brain.state == SpeakiState::Jumping {
            brain.state = SpeakiState::Idle;
            pet.look.show(CHEERFUL);
        }
    }
}

fn on_grab(pet: &mut PetMut<'_>, _rng: &mut fastrand::Rng) {
    pet.look.show(CRYING);
    pet.look.cue(DRAG_CLIP);
}
