//! The simulation engine: one tick driver entry point over all components.
//!
//! The driver calls [`Engine::advance_tick`] once per rendered frame with the
//! elapsed time, the current configuration snapshot, and the running flag;
//! the engine emits, steps, and hands back the tick's countable landings for
//! the external histogram sink.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{ConfigError, SimulationConfig};
use crate::emission::{self, EmissionGate};
use crate::particle::{Particle, ParticleStore};
use crate::stepper::{self, LandingEvent};

pub struct Engine {
    store: ParticleStore,
    gate: EmissionGate,
    rng: StdRng,
}

impl Engine {
    /// Engine with OS-seeded randomness, for interactive use.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Engine with a fixed seed, for deterministic runs and tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            store: ParticleStore::new(),
            gate: EmissionGate::new(),
            rng,
        }
    }

    /// Advance the simulation by one tick of `elapsed` seconds.
    ///
    /// Rejects an invalid configuration snapshot at the boundary; otherwise
    /// conditionally emits (single particle or twin pair, per the observer
    /// flag), advances every live particle, and returns the countable
    /// landings in same-tick arrival order.
    pub fn advance_tick(
        &mut self,
        elapsed: f32,
        config: &SimulationConfig,
        running: bool,
    ) -> Result<Vec<LandingEvent>, ConfigError> {
        config.validate()?;
        if self.gate.should_emit(elapsed, config.emission_rate, running) {
            emission::emit(&mut self.store, config, &mut self.rng);
        }
        Ok(stepper::step(&mut self.store, config, elapsed))
    }

    /// Live particles, for the driver's canvas.
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.store.iter()
    }

    pub fn particle_count(&self) -> usize {
        self.store.len()
    }

    /// Drop all in-flight particles and rewind the emission gate. Particle
    /// ids keep counting up across resets.
    pub fn reset(&mut self) {
        self.store.clear();
        self.gate.reset();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SCREEN_CENTER_Y, SCREEN_HEIGHT};
    use crate::histogram::{DEFAULT_NUM_BINS, Histogram};

    const DT: f32 = 1.0 / 60.0;

    /// Run a seeded engine for `ticks` frames and bin every landing.
    fn run_scenario(config: &SimulationConfig, ticks: usize, seed: u64) -> Histogram {
        let mut engine = Engine::with_seed(seed);
        let mut hist = Histogram::new(DEFAULT_NUM_BINS, SCREEN_HEIGHT / DEFAULT_NUM_BINS as f32);
        for _ in 0..ticks {
            let events = engine.advance_tick(DT, config, true).unwrap();
            for event in events {
                hist.record(event.y);
            }
        }
        hist
    }

    /// Window-3 moving average, enough to tame per-bin Poisson noise.
    fn smoothed(counts: &[u32]) -> Vec<f32> {
        (0..counts.len())
            .map(|i| {
                let lo = i.saturating_sub(1);
                let hi = (i + 1).min(counts.len() - 1);
                let window = &counts[lo..=hi];
                window.iter().sum::<u32>() as f32 / window.len() as f32
            })
            .collect()
    }

    /// Local maxima above a quarter of the global maximum. Maxima closer
    /// than five bins are merged into the taller one, so sampling noise on a
    /// wide lobe cannot split it in two; real structure (fringes, slit
    /// lobes) is never closer than eight bins in these scenarios.
    fn find_peaks(profile: &[f32]) -> Vec<usize> {
        let max = profile.iter().cloned().fold(0.0_f32, f32::max);
        let mut peaks: Vec<usize> = Vec::new();
        for i in 1..profile.len() - 1 {
            if profile[i] > profile[i - 1] && profile[i] >= profile[i + 1] && profile[i] > max / 4.0
            {
                match peaks.last() {
                    Some(&last) if i - last < 5 => {
                        if profile[i] > profile[last] {
                            *peaks.last_mut().unwrap() = i;
                        }
                    }
                    _ => peaks.push(i),
                }
            }
        }
        peaks
    }

    /// Mean center-to-center distance of adjacent peaks near the axis.
    fn mean_peak_spacing(hist: &Histogram, peaks: &[usize]) -> f32 {
        let near: Vec<f32> = peaks
            .iter()
            .map(|&i| hist.bin_center(i))
            .filter(|c| (c - SCREEN_CENTER_Y).abs() < 130.0)
            .collect();
        assert!(near.len() >= 3, "too few central peaks: {near:?}");
        let gaps: Vec<f32> = near.windows(2).map(|w| w[1] - w[0]).collect();
        gaps.iter().sum::<f32>() / gaps.len() as f32
    }

    fn halves_imbalance(hist: &Histogram) -> f32 {
        let mid = hist.counts().len() / 2;
        let left: f64 = hist.counts()[..mid].iter().map(|&c| c as f64).sum();
        let right: f64 = hist.counts()[mid..].iter().map(|&c| c as f64).sum();
        ((left - right).abs() / (left + right)) as f32
    }

    #[test]
    fn test_seeded_engines_replay_identically() {
        let config = SimulationConfig::default();
        let mut a = Engine::with_seed(123);
        let mut b = Engine::with_seed(123);
        for _ in 0..2000 {
            assert_eq!(
                a.advance_tick(DT, &config, true).unwrap(),
                b.advance_tick(DT, &config, true).unwrap()
            );
        }
    }

    #[test]
    fn test_invalid_config_is_rejected_at_the_boundary() {
        let mut engine = Engine::with_seed(1);
        let config = SimulationConfig {
            emission_rate: 0.0,
            ..Default::default()
        };
        assert!(engine.advance_tick(DT, &config, true).is_err());
    }

    #[test]
    fn test_paused_engine_emits_nothing_but_drains_flights() {
        let config = SimulationConfig::default();
        let mut engine = Engine::with_seed(2);
        for _ in 0..120 {
            engine.advance_tick(DT, &config, true).unwrap();
        }
        assert!(engine.particle_count() > 0);

        // Stop emission; everything already in flight still lands.
        for _ in 0..400 {
            engine.advance_tick(DT, &config, false).unwrap();
        }
        assert_eq!(engine.particle_count(), 0);
    }

    #[test]
    fn test_interference_scenario_shows_symmetric_fringes() {
        let config = SimulationConfig {
            emission_rate: 50.0,
            ..Default::default()
        };
        let hist = run_scenario(&config, 12_000, 42);
        assert!(hist.total() > 3_000);

        let peaks = find_peaks(&smoothed(hist.counts()));
        assert!(peaks.len() >= 5, "expected many fringes, found {peaks:?}");
        assert!(halves_imbalance(&hist) < 0.1);

        let spacing = mean_peak_spacing(&hist, &peaks);
        assert!(
            (30.0..50.0).contains(&spacing),
            "fringe spacing {spacing} out of expected band"
        );
    }

    #[test]
    fn test_fringe_spacing_widens_with_wavelength() {
        let base = SimulationConfig {
            emission_rate: 50.0,
            ..Default::default()
        };
        let red = SimulationConfig {
            wavelength: 700.0,
            ..base.clone()
        };

        let hist_500 = run_scenario(&base, 12_000, 42);
        let hist_700 = run_scenario(&red, 12_000, 42);
        let spacing_500 = mean_peak_spacing(&hist_500, &find_peaks(&smoothed(hist_500.counts())));
        let spacing_700 = mean_peak_spacing(&hist_700, &find_peaks(&smoothed(hist_700.counts())));
        assert!(
            spacing_700 > spacing_500 + 5.0,
            "expected wider fringes at 700nm: {spacing_500} vs {spacing_700}"
        );
    }

    #[test]
    fn test_observed_scenario_shows_two_lobes_and_central_dip() {
        let config = SimulationConfig {
            observer_active: true,
            emission_rate: 50.0,
            ..Default::default()
        };
        let hist = run_scenario(&config, 12_000, 42);
        let profile = smoothed(hist.counts());
        let peaks = find_peaks(&profile);
        assert_eq!(peaks.len(), 2, "expected two lobes, found {peaks:?}");

        let half = config.slit_separation / 2.0;
        assert!((hist.bin_center(peaks[0]) - (SCREEN_CENTER_Y - half)).abs() <= 10.0);
        assert!((hist.bin_center(peaks[1]) - (SCREEN_CENTER_Y + half)).abs() <= 10.0);

        // Deep minimum on the optical axis, no ripples between the lobes.
        let peak_height = profile[peaks[0]].max(profile[peaks[1]]);
        let center_bin = (SCREEN_CENTER_Y / hist.bin_width()) as usize;
        assert!(profile[center_bin] < peak_height / 5.0);
    }
}
