use glam::Vec2;

use crate::pet::{Archetype, Brain};

/// Sprite edge length in page pixels before scaling.
pub const SPRITE_SIZE: f32 = 150.0;

/// Opaque pet identifier. Never reused within one `App`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PetId(pub u64);

/// Top-left corner of the sprite in page pixels.
#[derive(Debug, Clone, Copy)]
pub struct Position(pub Vec2);

/// Velocity in pixels/tick.
#[derive(Debug, Clone, Copy)]
pub struct Velocity(pub Vec2);

/// Physical flags shared by every archetype.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    /// Display size multiplier, set from config.
    pub scale: f32,
    pub facing_right: bool,
    /// Resting on the resolved floor. Recomputed every non-dragging tick.
    pub on_ground: bool,
    /// Held by the pointer. Physics and behavior are suspended.
    pub dragging: bool,
}

impl Body {
    pub fn new(scale: f32) -> Self {
        Self {
            scale,
            facing_right: true,
            on_ground: false,
            dragging: false,
        }
    }

    /// Rendered sprite size.
    pub fn size(&self) -> Vec2 {
        Vec2::splat(SPRITE_SIZE * self.scale)
    }
}

/// Current behavior state plus its dwell countdown.
#[derive(Debug, Clone, Copy)]
pub struct PetState {
    pub brain: Brain,
    /// Ticks left in the current state. Saturates at zero.
    pub timer: u32,
}

impl PetState {
    pub fn archetype(&self) -> Archetype {
        self.brain.archetype()
    }
}

/// Presentation hints for the stage and speaker. The simulation writes these
/// but never reads them back for decisions, except `sound_playing`.
#[derive(Debug, Clone)]
pub struct Presentation {
    /// Image file name, resolved per archetype by `Assets`.
    pub image: &'static str,
    /// Sound requested this tick. Last request wins.
    pub cue: Option<&'static str>,
    /// Mirrors the speaker. Refreshed once per frame.
    pub sound_playing: bool,
}

impl Presentation {
    pub fn new(image: &'static str) -> Self {
        Self {
            image,
            cue: None,
            sound_playing: false,
        }
    }

    pub fn show(&mut self, image: &'static str) {
        self.image = image;
    }

    pub fn cue(&mut self, clip: &'static str) {
        self.cue = Some(clip);
    }
}
