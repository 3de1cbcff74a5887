//! Histogram sink for landing ordinates.
//!
//! External collaborator of the engine: the driver owns one of these, feeds
//! every landing event into it, and resets it whenever a pattern-relevant
//! configuration value changes.

/// Default bin count for a full-screen histogram.
pub const DEFAULT_NUM_BINS: usize = 120;

/// Fixed-width binning of landing positions.
#[derive(Debug)]
pub struct Histogram {
    bins: Vec<u32>,
    bin_width: f32,
}

impl Histogram {
    pub fn new(num_bins: usize, bin_width: f32) -> Self {
        Self {
            bins: vec![0; num_bins],
            bin_width,
        }
    }

    /// Count one landing. Positions that fall outside `[0, num_bins)` after
    /// binning are dropped.
    pub fn record(&mut self, y: f32) {
        let bin = (y / self.bin_width).floor();
        if bin >= 0.0 && (bin as usize) < self.bins.len() {
            self.bins[bin as usize] += 1;
        }
    }

    /// Zero every bin. Invoked by the environment when the slit separation,
    /// wavelength, or observer flag changes.
    pub fn reset(&mut self) {
        self.bins.fill(0);
    }

    pub fn counts(&self) -> &[u32] {
        &self.bins
    }

    pub fn bin_width(&self) -> f32 {
        self.bin_width
    }

    /// Midpoint position of bin `index`, for plotting.
    pub fn bin_center(&self, index: usize) -> f32 {
        (index as f32 + 0.5) * self.bin_width
    }

    pub fn total(&self) -> u64 {
        self.bins.iter().map(|&c| c as u64).sum()
    }
}
