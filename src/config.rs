//! Simulation configuration and the fixed world geometry.
//!
//! All coordinates are stylized screen-space units, not physical ones: the
//! simulation is a visual analogy, so the geometry below is chosen for
//! legibility rather than realism.

use thiserror::Error;

// ===================================================================================
// World Geometry (fixed)
// ===================================================================================

/// Horizontal position of the particle emitter.
pub const EMITTER_X: f32 = 40.0;
/// Horizontal position of the double-slit barrier.
pub const BARRIER_X: f32 = 400.0;
/// Horizontal position of the detection screen.
pub const SCREEN_X: f32 = 760.0;
/// Vertical extent of the detection screen.
pub const SCREEN_HEIGHT: f32 = 600.0;
/// Vertical center of the screen (the optical axis).
pub const SCREEN_CENTER_Y: f32 = SCREEN_HEIGHT / 2.0;
/// Overall world width, used by the driver for scaling the canvas.
pub const WORLD_WIDTH: f32 = 800.0;

/// Constant forward speed of every particle (units per second). Never zero,
/// so time-to-screen denominators derived from it are always valid.
pub const FORWARD_SPEED: f32 = 240.0;

/// Width of the single-slit diffraction envelope shared by both density
/// branches.
pub const ENVELOPE_SIGMA: f32 = 150.0;
/// Width of each classical "came through one slit" lobe.
pub const SLIT_PEAK_SIGMA: f32 = 12.0;
/// Maps nanometer-range wavelength values onto a visually useful fringe
/// spacing (lambda = 500, separation = 80 gives roughly 40-unit fringes).
pub const FRINGE_SCALE: f32 = 0.018;
/// Width of the uniform window used by the sampler's liveness fallback.
pub const FALLBACK_WINDOW: f32 = 60.0;

// ===================================================================================
// Default Configuration (initial slider values in the driver)
// ===================================================================================

const DEFAULT_WAVELENGTH: f32 = 500.0;
const DEFAULT_SLIT_SEPARATION: f32 = 80.0;
const DEFAULT_EMISSION_RATE: f32 = 5.0;

// ===================================================================================
// Configuration
// ===================================================================================

/// Per-tick configuration snapshot, owned by the driver and read by the
/// engine. The engine never mutates it.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Visual proxy for the photon/electron wavelength. Must be positive.
    pub wavelength: f32,
    /// Distance between the two slit centers. Must be positive.
    pub slit_separation: f32,
    /// When true, landings follow the classical two-lobe pattern instead of
    /// the interference pattern.
    pub observer_active: bool,
    /// Target particle emissions per second. Must be positive.
    pub emission_rate: f32,
    /// Rendering-only flag, passed through to the driver untouched.
    pub show_guides: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            wavelength: DEFAULT_WAVELENGTH,
            slit_separation: DEFAULT_SLIT_SEPARATION,
            observer_active: false,
            emission_rate: DEFAULT_EMISSION_RATE,
            show_guides: true,
        }
    }
}

impl SimulationConfig {
    /// Check the preconditions the engine relies on. Called at the tick
    /// boundary so an invalid snapshot is rejected instead of producing NaNs
    /// or stalled emission.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.wavelength > 0.0) {
            return Err(ConfigError::NonPositiveWavelength(self.wavelength));
        }
        if !(self.slit_separation > 0.0) {
            return Err(ConfigError::NonPositiveSlitSeparation(self.slit_separation));
        }
        if !(self.emission_rate > 0.0) {
            return Err(ConfigError::NonPositiveEmissionRate(self.emission_rate));
        }
        Ok(())
    }
}

/// Invalid-configuration conditions surfaced at the engine boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Wavelength must be a positive real.
    #[error("wavelength must be positive, got {0}")]
    NonPositiveWavelength(f32),

    /// Slit separation must be a positive real.
    #[error("slit separation must be positive, got {0}")]
    NonPositiveSlitSeparation(f32),

    /// Emission rate must be a positive real.
    #[error("emission rate must be positive, got {0}")]
    NonPositiveEmissionRate(f32),
}
