//! Smoothed crossfade between the dry input and the processed signal.

use crate::utils::{crossfade, one_pole, smoothing_coefficient};

const SMOOTHING_TIME: f32 = 0.15;

/// Raw mix fractions below this bypass the whole block.
pub const BYPASS_THRESHOLD: f32 = 0.001;

#[derive(Debug, Default)]
pub struct DryWetMixer {
    mix: f32,
    target: f32,
    coefficient: f32,
}

impl DryWetMixer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init(&mut self, sample_rate: f32, initial_mix: f32) {
        self.coefficient = smoothing_coefficient(SMOOTHING_TIME, sample_rate);
        self.mix = initial_mix.clamp(0.0, 1.0);
        self.target = self.mix;
    }

    /// Update the mix target. The target moves even while the processor is
    /// bypassed; the smoothed value only advances through [`Self::next`].
    pub fn set_target(&mut self, fraction: f32) {
        self.target = fraction.clamp(0.0, 1.0);
    }

    pub fn mix(&self) -> f32 {
        self.mix
    }

    /// Advance the smoothed mix by one frame.
    #[inline]
    pub fn next(&mut self) -> f32 {
        one_pole(&mut self.mix, self.target, self.coefficient);

        self.mix
    }

    #[inline]
    pub fn blend(dry: f32, wet: f32, mix: f32) -> f32 {
        crossfade(dry, wet, mix)
    }
}
