use glam::Vec2;
use serde::Serialize;

use crate::config::Config;
use crate::ecs::components::{Body, PetId, PetState, Position, Presentation, Velocity};
use crate::ecs::systems::{self, drag};
use crate::error::AudioError;
use crate::host::{Assets, Sprite, Speaker, Stage, Transform};
use crate::page::{self, AnchorSource, Page, ResolverTuning};
use crate::pool::{self, PetIds, Reconciled};

/// Whether the driver should schedule another frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    /// The host context is gone. Nothing will render again.
    Stop,
}

/// One pet's externally visible state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PetSnapshot {
    pub id: u64,
    pub archetype: &'static str,
    pub state: &'static str,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub facing_right: bool,
    pub on_ground: bool,
    pub dragging: bool,
    pub image: &'static str,
}

/// Owned simulation context: the live pets plus everything a frame needs.
pub struct App {
    world: hecs::World,
    rng: fastrand::Rng,
    config: Config,
    tuning: ResolverTuning,
    assets: Assets,
    ids: PetIds,
    tick_count: u64,

    // Visibility and anchor tier as of the last frame, for logging changes
    hidden: bool,
    last_source: Option<AnchorSource>,
}

impl App {
    pub fn new(assets: Assets) -> Self {
        Self::with_rng(assets, fastrand::Rng::new())
    }

    /// Deterministic context for replays and tests.
    pub fn with_seed(assets: Assets, seed: u64) -> Self {
        Self::with_rng(assets, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(assets: Assets, rng: fastrand::Rng) -> Self {
        Self {
            world: hecs::World::new(),
            rng,
            config: Config::default(),
            tuning: ResolverTuning::default(),
            assets,
            ids: PetIds::default(),
            tick_count: 0,
            hidden: false,
            last_source: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_tuning(&mut self, tuning: ResolverTuning) {
        self.tuning = tuning;
    }

    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    pub fn pet_count(&self) -> usize {
        self.world.len() as usize
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Adopt a new config and reconcile the population against it. Pets
    /// removed here are released from the stage and speaker.
    pub fn apply_config(&mut self, config: Config, stage: &mut dyn Stage, speaker: &mut dyn Speaker) -> Reconciled {
        if !config.sound_enabled && self.config.sound_enabled {
            log::info!("sound disabled");
        }
        self.config = config;

        let out = pool::reconcile(&mut self.world, &self.config, &mut self.ids);
        for &id in &out.released {
            stage.release(id);
            speaker.release(id);
        }
        out
    }

    /// Run one frame: gate, resolve the floor, tick, then present.
    pub fn frame(&mut self, page: &dyn Page, stage: &mut dyn Stage, speaker: &mut dyn Speaker) -> FrameOutcome {
        if !self.assets.is_valid() {
            return FrameOutcome::Stop;
        }

        for (_, (id, look)) in self.world.query_mut::<(&PetId, &mut Presentation)>() {
            look.sound_playing = speaker.is_playing(*id);
        }

        if !page::is_applicable(page) {
            if !self.hidden {
                log::debug!("pets hidden on {}{}", page.hostname(), page.path());
                self.hidden = true;
            }
            for (_, id) in self.world.query_mut::<&PetId>() {
                stage.hide(*id);
            }
            return FrameOutcome::Continue;
        }
        self.hidden = false;

        let anchor = page::resolve_anchor(page, &self.tuning);
        let source = anchor.map(|a| a.source);
        if source != self.last_source {
            match anchor {
                Some(a) => log::debug!("standing on {:?} at {:?}", a.source, a.rect),
                None => log::debug!("no anchor, standing on the viewport"),
            }
            self.last_source = source;
        }

        systems::tick(
            &mut self.world,
            anchor.as_ref().map(|a| &a.rect),
            page.viewport(),
            &mut self.rng,
        );
        self.present(stage, speaker);
        self.tick_count += 1;

        if self.assets.is_valid() {
            FrameOutcome::Continue
        } else {
            log::info!("stopping after {} ticks", self.tick_count);
            FrameOutcome::Stop
        }
    }

    /// Push sprites to the stage and drain sound requests into the speaker.
    fn present(&mut self, stage: &mut dyn Stage, speaker: &mut dyn Speaker) {
        let sound_enabled = self.config.sound_enabled;

        for (_, (id, pos, body, state, look)) in self
            .world
            .query_mut::<(&PetId, &Position, &Body, &PetState, &mut Presentation)>()
        {
            let archetype = state.archetype();
            let image_url = self.assets.image(archetype, look.image);
            stage.show(
                *id,
                &Sprite {
                    transform: Transform {
                        translate: pos.0,
                        flip_x: body.facing_right,
                    },
                    size: body.size(),
                    image_url: &image_url,
                },
            );

            let Some(clip) = look.cue.take() else {
                continue;
            };
            if !sound_enabled {
                continue;
            }
            let url = self.assets.sound(archetype, clip);
            if url.is_empty() {
                continue;
            }
            match speaker.play(*id, &url) {
                Ok(()) => look.sound_playing = true,
                Err(AudioError::Blocked) => look.sound_playing = false,
                Err(e) => {
                    log::warn!("{:?}: {}", id, e);
                    look.sound_playing = false;
                }
            }
        }
    }

    pub fn grab(&mut self, id: PetId) -> bool {
        drag::grab(&mut self.world, id, &mut self.rng)
    }

    pub fn drag_to(&mut self, id: PetId, pointer: Vec2, movement: Vec2) -> bool {
        drag::drag_to(&mut self.world, id, pointer, movement)
    }

    pub fn release(&mut self, id: PetId) -> bool {
        drag::release(&mut self.world, id)
    }

    pub fn pet_at(&mut self, point: Vec2) -> Option<PetId> {
        drag::pet_at(&mut self.world, point)
    }

    /// All pets, ordered by id.
    pub fn snapshot(&mut self) -> Vec<PetSnapshot> {
        let mut pets: Vec<PetSnapshot> = self
            .world
            .query_mut::<(&PetId, &Position, &Velocity, &Body, &PetState, &Presentation)>()
            .into_iter()
            .map(|(_, (id, pos, vel, body, state, look))| PetSnapshot {
                id: id.0,
                archetype: state.archetype().label(),
                state: state.brain.label(),
                x: pos.0.x,
                y: pos.0.y,
                vx: vel.0.x,
                vy: vel.0.y,
                facing_right: body.facing_right,
                on_ground: body.on_ground,
                dragging: body.dragging,
                image: look.image,
            })
            .collect();
        pets.sort_by_key(|p| p.id);
        pets
    }
}
