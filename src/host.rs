//! Collaborators the simulation talks to but never implements: something
//! that draws sprites, something that plays sounds, and something that turns
//! asset paths into URLs.

use glam::Vec2;

use crate::ecs::components::PetId;
use crate::error::{AudioError, HostError};
use crate::pet::Archetype;

/// Where and which way round to draw a sprite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate: Vec2,
    /// Sprites are drawn facing left; flip when facing right.
    pub flip_x: bool,
}

/// One frame's worth of presentation for a single pet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite<'a> {
    pub transform: Transform,
    pub size: Vec2,
    /// Empty once the host context is gone.
    pub image_url: &'a str,
}

pub trait Stage {
    fn show(&mut self, id: PetId, sprite: &Sprite<'_>);

    fn hide(&mut self, id: PetId);

    /// The pet is gone for good; drop whatever backs its sprite.
    fn release(&mut self, id: PetId);
}

/// One audio channel per pet. A new `play` replaces whatever that pet was
/// playing.
pub trait Speaker {
    fn play(&mut self, id: PetId, url: &str) -> Result<(), AudioError>;

    fn is_playing(&self, id: PetId) -> bool;

    fn release(&mut self, _id: PetId) {}
}

pub trait AssetHost {
    fn url(&self, path: &str) -> Result<String, HostError>;
}

/// Resolves assets relative to a base directory or URL prefix.
#[derive(Debug, Clone)]
pub struct DirHost {
    base: String,
}

impl DirHost {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }
}

impl AssetHost for DirHost {
    fn url(&self, path: &str) -> Result<String, HostError> {
        Ok(format!("{}/{}", self.base, path))
    }
}

/// Asset URL resolution with a one-way degraded mode: after the host
/// reports an invalid context every lookup returns an empty string.
pub struct Assets {
    host: Box<dyn AssetHost>,
    valid: bool,
}

impl Assets {
    pub fn new(host: Box<dyn AssetHost>) -> Self {
        Self { host, valid: true }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn image(&mut self, archetype: Archetype, file: &str) -> String {
        self.resolve(&format!("characters/{}/{}", archetype.label(), file))
    }

    pub fn sound(&mut self, archetype: Archetype, file: &str) -> String {
        self.resolve(&format!("characters/{}/sound/{}", archetype.label(), file))
    }

    fn resolve(&mut self, path: &str) -> String {
        if !self.valid {
            return String::new();
        }
        match self.host.url(path) {
            Ok(url) => url,
            Err(HostError::ContextInvalidated) => {
                log::info!("host context invalidated, assets disabled");
                self.valid = false;
                String::new()
            }
        }
    }
}
