//! Particle state and the id-keyed store that owns all live particles.

use std::collections::BTreeMap;

use crate::config::SCREEN_CENTER_Y;

/// Unique particle identity. Monotonically assigned, never reused while the
/// simulation runs.
pub type ParticleId = u64;

/// Two-state particle lifecycle. Landing is an event, not a phase: the
/// terminal action is removal from the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// In flight from the emitter toward the barrier.
    ToSlit,
    /// Past the barrier, aimed at its sampled landing ordinate.
    ToScreen,
}

/// Which slit a particle is associated with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slit {
    Top,
    Bottom,
}

impl Slit {
    /// Vertical center of this slit for the given separation.
    pub fn center_y(self, slit_separation: f32) -> f32 {
        match self {
            Slit::Top => SCREEN_CENTER_Y - slit_separation / 2.0,
            Slit::Bottom => SCREEN_CENTER_Y + slit_separation / 2.0,
        }
    }
}

/// One in-flight particle. Owned exclusively by the [`ParticleStore`];
/// destroyed on landing or on twin cleanup.
#[derive(Clone, Debug)]
pub struct Particle {
    pub id: ParticleId,
    pub x: f32,
    pub y: f32,
    /// Horizontal speed, fixed for the particle's lifetime.
    pub vx: f32,
    /// Vertical speed, recomputed exactly once at slit crossing.
    pub vy: f32,
    /// Sampled screen-landing ordinate, immutable after creation. The
    /// kinematics reproduce it exactly at the screen.
    pub target_y: f32,
    pub phase: Phase,
    pub origin_slit: Slit,
    /// Back-reference to the entangled twin sharing `target_y`, present only
    /// in unobserved mode. No ownership; the store owns both members.
    pub twin: Option<ParticleId>,
    /// Designated-counter tag: exactly one member of each twin pair (and
    /// every observed-mode single) contributes a histogram count on landing.
    pub counts: bool,
}

/// The live particle set, keyed by id.
///
/// A dense id-keyed map rather than a positional array: steppers iterate a
/// stable snapshot of live ids and defer removals to end-of-tick, so removing
/// a twin mid-iteration can never invalidate the traversal. `BTreeMap` keeps
/// iteration order deterministic (creation order, since ids are monotone).
#[derive(Debug, Default)]
pub struct ParticleStore {
    live: BTreeMap<ParticleId, Particle>,
    next_id: ParticleId,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next particle id. Ids are never reused, even after the
    /// particle they named is long gone.
    pub fn allocate_id(&mut self) -> ParticleId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn insert(&mut self, particle: Particle) {
        self.live.insert(particle.id, particle);
    }

    pub fn get_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.live.get_mut(&id)
    }

    pub fn contains(&self, id: ParticleId) -> bool {
        self.live.contains_key(&id)
    }

    pub fn remove(&mut self, id: ParticleId) -> Option<Particle> {
        self.live.remove(&id)
    }

    /// Snapshot of live ids in creation order, taken once per tick so that
    /// removals during the tick cannot perturb iteration.
    pub fn live_ids(&self) -> Vec<ParticleId> {
        self.live.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.live.values()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Drop every live particle. Id assignment is NOT rewound; ids stay
    /// unique across resets within a run.
    pub fn clear(&mut self) {
        self.live.clear();
    }
}
