//! Landing-position density model.
//!
//! Pure function of (position, slit separation, wavelength, observer flag).
//! The result is an unnormalized density kept within [0, 1] so it can be
//! consumed directly as a rejection-sampling acceptance probability.

use std::f32::consts::PI;

use crate::config::{
    BARRIER_X, ENVELOPE_SIGMA, FRINGE_SCALE, SCREEN_CENTER_Y, SCREEN_X, SLIT_PEAK_SIGMA,
};

/// Fixed slit-to-screen distance, the `L` of the interference phase term.
const SLIT_TO_SCREEN: f32 = SCREEN_X - BARRIER_X;

#[inline]
fn gaussian(x: f32, sigma: f32) -> f32 {
    (-x * x / (2.0 * sigma * sigma)).exp()
}

/// Unnormalized landing density at screen ordinate `y`.
///
/// Both branches share a Gaussian single-slit diffraction envelope, which
/// keeps the density small at extreme offsets regardless of mode:
///
/// - `observed`: the classical, particle-like pattern, a half-sum of two
///   narrow Gaussians centered on the slit positions (the half keeps the
///   value within [0, 1] even when the lobes overlap at small separations).
/// - otherwise: the two-slit interference intensity law in normalized-phase
///   form, `cos^2(pi * d * ry / (lambda * L * k))`.
pub fn density(y: f32, slit_separation: f32, wavelength: f32, observed: bool) -> f32 {
    let ry = y - SCREEN_CENTER_Y;
    let envelope = gaussian(ry, ENVELOPE_SIGMA);

    if observed {
        let half = slit_separation / 2.0;
        let lobes = gaussian(ry - half, SLIT_PEAK_SIGMA) + gaussian(ry + half, SLIT_PEAK_SIGMA);
        0.5 * lobes * envelope
    } else {
        let phase = PI * slit_separation * ry / (wavelength * SLIT_TO_SCREEN * FRINGE_SCALE);
        phase.cos().powi(2) * envelope
    }
}

/// Center-to-center spacing of adjacent interference fringes for the given
/// configuration. Used by the driver to place guide lines.
pub fn fringe_spacing(slit_separation: f32, wavelength: f32) -> f32 {
    wavelength * SLIT_TO_SCREEN * FRINGE_SCALE / slit_separation
}
