//! Kinematics stepper: the per-tick state machine over the live particle set.
//!
//! Phases advance `ToSlit -> ToScreen -> removed`. Both boundary crossings
//! clamp to the exact boundary coordinate so integration drift never leaks
//! into the landing position: the slit crossing snaps the particle onto its
//! slit center and re-aims it at its sampled target in closed form, and the
//! screen crossing reports a landing ordinate equal to that target up to
//! float tolerance.

use std::collections::BTreeSet;

use crate::config::{BARRIER_X, SCREEN_X, SimulationConfig};
use crate::particle::{ParticleId, ParticleStore, Phase};

/// A countable landing on the detection screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LandingEvent {
    /// Final vertical position, equal to the particle's sampled target.
    pub y: f32,
}

/// Advance every live particle by `dt` seconds, returning the tick's
/// countable landings in arrival order.
///
/// Iterates a stable snapshot of live ids; removals (landed particles and
/// their twins) are collected into a set and applied at end-of-tick, so a
/// twin retired mid-tick is simply skipped when its own id comes up.
pub fn step(store: &mut ParticleStore, config: &SimulationConfig, dt: f32) -> Vec<LandingEvent> {
    let mut events = Vec::new();
    let mut retired: BTreeSet<ParticleId> = BTreeSet::new();

    for id in store.live_ids() {
        if retired.contains(&id) {
            continue;
        }
        let Some(p) = store.get_mut(id) else {
            continue;
        };

        let x_next = p.x + p.vx * dt;
        match p.phase {
            Phase::ToSlit => {
                if x_next >= BARRIER_X {
                    // Snap onto the slit center, then aim at the sampled
                    // target: with the remaining flight time fixed by the
                    // constant forward speed, this vy lands the particle on
                    // target_y exactly when x reaches the screen.
                    p.x = BARRIER_X;
                    p.y = p.origin_slit.center_y(config.slit_separation);
                    p.phase = Phase::ToScreen;
                    let time_to_screen = (SCREEN_X - BARRIER_X) / p.vx;
                    p.vy = (p.target_y - p.y) / time_to_screen;
                } else {
                    p.x = x_next;
                    p.y += p.vy * dt;
                }
            }
            Phase::ToScreen => {
                if x_next >= SCREEN_X {
                    // Land exactly on the screen plane.
                    let time_to_hit = (SCREEN_X - p.x) / p.vx;
                    let landing_y = p.y + p.vy * time_to_hit;
                    let counts = p.counts;
                    let twin = p.twin;

                    if counts {
                        events.push(LandingEvent { y: landing_y });
                    }
                    retired.insert(id);
                    // The twin is retired in the same step, wherever it is,
                    // without producing an event of its own.
                    if let Some(twin_id) = twin {
                        if store.contains(twin_id) {
                            retired.insert(twin_id);
                        }
                    }
                } else {
                    p.x = x_next;
                    p.y += p.vy * dt;
                }
            }
        }
    }

    for id in retired {
        store.remove(id);
    }
    events
}
