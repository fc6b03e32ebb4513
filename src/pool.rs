//! Keeps the live population in line with the config.

use crate::config::Config;
use crate::ecs::components::{Body, PetId, PetState};
use crate::pet::{self, Archetype};

/// Hands out pet ids. Never reuses one.
#[derive(Debug, Default)]
pub struct PetIds {
    next: u64,
}

impl PetIds {
    pub fn next(&mut self) -> PetId {
        self.next += 1;
        PetId(self.next)
    }
}

/// What one `reconcile` call changed.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Reconciled {
    pub spawned: Vec<PetId>,
    /// The caller releases their sprites and audio.
    pub released: Vec<PetId>,
    pub rescaled: usize,
}

impl Reconciled {
    pub fn is_empty(&self) -> bool {
        self.spawned.is_empty() && self.released.is_empty() && self.rescaled == 0
    }
}

/// Bring `world` to the counts and scale in `config`.
///
/// Excess pets are removed in whatever order the world yields them.
/// Calling it again with the same config changes nothing.
pub fn reconcile(world: &mut hecs::World, config: &Config, ids: &mut PetIds) -> Reconciled {
    let mut out = Reconciled::default();

    for (_, body) in world.query_mut::<&mut Body>() {
        if body.scale != config.scale {
            body.scale = config.scale;
            out.rescaled += 1;
        }
    }

    for archetype in Archetype::ALL {
        let live: Vec<(hecs::Entity, PetId)> = world
            .query_mut::<(&PetId, &PetState)>()
            .into_iter()
            .filter(|(_, (_, state))| state.archetype() == archetype)
            .map(|(e, (id, _))| (e, *id))
            .collect();
        let want = config.count(archetype) as usize;

        if live.len() < want {
            for _ in live.len()..want {
                let id = ids.next();
                pet::spawn(world, id, archetype, config.scale);
                out.spawned.push(id);
            }
        } else {
            for &(entity, id) in &live[want..] {
                // Just collected from this world, so the entity is live.
                let _ = world.despawn(entity);
                out.released.push(id);
            }
        }
    }

    if !out.is_empty() {
        log::info!(
            "population: +{} -{} rescaled {} (now {})",
            out.spawned.len(),
            out.released.len(),
            out.rescaled,
            world.len()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(world: &mut hecs::World) -> [usize; 3] {
        let mut n = [0; 3];
        for (_, state) in world.query_mut::<&PetState>() {
            n[state.archetype().index()] += 1;
        }
        n
    }

    #[test]
    fn defaults_spawn_speaki_and_erpin() {
        let mut world = hecs::World::new();
        let mut ids = PetIds::default();
        let out = reconcile(&mut world, &Config::default(), &mut ids);

        assert_eq!(out.spawned, vec![PetId(1), PetId(2)]);
        assert_eq!(counts(&mut world), [1, 1, 0]);
    }

    #[test]
    fn converges_and_is_idempotent() {
        let mut world = hecs::World::new();
        let mut ids = PetIds::default();
        let mut config = Config::default();
        config.counts = [4, 0, 2];

        reconcile(&mut world, &config, &mut ids);
        assert_eq!(counts(&mut world), [4, 0, 2]);

        let again = reconcile(&mut world, &config, &mut ids);
        assert!(again.is_empty());
        assert_eq!(counts(&mut world), [4, 0, 2]);

        config.counts = [1, 3, 0];
        let out = reconcile(&mut world, &config, &mut ids);
        assert_eq!(out.released.len(), 5);
        assert_eq!(out.spawned.len(), 3);
        assert_eq!(counts(&mut world), [1, 3, 0]);
        assert!(reconcile(&mut world, &config, &mut ids).is_empty());
    }

    #[test]
    fn ids_are_never_reused() {
        let mut world = hecs::World::new();
        let mut ids = PetIds::default();
        let mut config = Config::default();

        config.counts = [2, 0, 0];
        let first = reconcile(&mut world, &config, &mut ids).spawned;
        config.counts = [0, 0, 0];
        reconcile(&mut world, &config, &mut ids);
        config.counts = [2, 0, 0];
        let second = reconcile(&mut world, &config, &mut ids).spawned;

        assert!(first.iter().all(|id| !second.contains(id)));
    }

    #[test]
    fn rescales_live_pets() {
        let mut world = hecs::World::new();
        let mut ids = PetIds::default();
        let mut config = Config::default();
        reconcile(&mut world, &config, &mut ids);

        config.scale = 0.75;
        let out = reconcile(&mut world, &config, &mut ids);
        assert_eq!(out.rescaled, 2);
        assert!(out.spawned.is_empty() && out.released.is_empty());
        for (_, body) in world.query_mut::<&Body>() {
            assert_eq!(body.scale, 0.75);
        }

        assert_eq!(reconcile(&mut world, &config, &mut ids).rescaled, 0);
    }
}
