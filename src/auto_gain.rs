//! Loudness compensation after the distortion stage.
//!
//! The block's RMS is measured across all channels, smoothed, and turned
//! into a makeup gain towards a fixed loudness reference. The gain itself
//! is smoothed per sample with asymmetric attack and release so that drops
//! in level are recovered noticeably slower than peaks are tamed.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::utils::{one_pole, smoothing_coefficient};

const TARGET_RMS: f32 = 0.707;
const RMS_FLOOR: f32 = 0.001;
const MIN_GAIN: f32 = 0.01;
const MAX_GAIN: f32 = 5.0;
const ATTACK_TIME: f32 = 0.5;
const RELEASE_TIME: f32 = 1.5;
const RMS_TIME: f32 = 0.5;

/// Mix fractions below this leave the gain untouched.
const MIN_ACTIVE_MIX: f32 = 0.01;

#[derive(Debug)]
pub struct AutoGain {
    current_gain: f32,
    smoothed_rms: f32,
    attack_coefficient: f32,
    release_coefficient: f32,
    sample_rate: f32,
}

impl Default for AutoGain {
    fn default() -> Self {
        Self {
            current_gain: 1.0,
            smoothed_rms: 0.0,
            attack_coefficient: 1.0,
            release_coefficient: 1.0,
            sample_rate: 0.0,
        }
    }
}

impl AutoGain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init(&mut self, sample_rate: f32) {
        self.current_gain = 1.0;
        self.smoothed_rms = 0.0;
        self.attack_coefficient = smoothing_coefficient(ATTACK_TIME, sample_rate);
        self.release_coefficient = smoothing_coefficient(RELEASE_TIME, sample_rate);
        self.sample_rate = sample_rate;
    }

    pub fn current_gain(&self) -> f32 {
        self.current_gain
    }

    /// Measure the block, update the gain and apply it in place. Skipped
    /// when the mix fraction is effectively dry.
    #[inline]
    pub fn process(&mut self, mix_fraction: f32, buffers: &mut [&mut [f32]]) {
        if mix_fraction < MIN_ACTIVE_MIX {
            return;
        }

        let num_channels = buffers.len();
        let num_frames = buffers
            .iter()
            .map(|buffer| buffer.len())
            .min()
            .unwrap_or(0);
        if num_channels == 0 || num_frames == 0 {
            return;
        }

        let mut sum_squares = 0.0_f64;
        for buffer in buffers.iter() {
            for sample in buffer[..num_frames].iter() {
                sum_squares += (*sample as f64) * (*sample as f64);
            }
        }
        let mean_square = sum_squares / (num_channels * num_frames) as f64;
        let measured_rms = (mean_square as f32).sqrt().max(RMS_FLOOR);

        // The RMS smoother advances once per block, so its coefficient is
        // derived from the block duration.
        let rms_coefficient =
            1.0 - (-(num_frames as f32) / (RMS_TIME * self.sample_rate)).exp();
        one_pole(&mut self.smoothed_rms, measured_rms, rms_coefficient);

        let desired_gain =
            (TARGET_RMS / self.smoothed_rms.max(RMS_FLOOR)).clamp(MIN_GAIN, MAX_GAIN);

        for i in 0..num_frames {
            let coefficient = if desired_gain > self.current_gain {
                self.attack_coefficient
            } else {
                self.release_coefficient
            };
            one_pole(&mut self.current_gain, desired_gain, coefficient);

            for buffer in buffers.iter_mut() {
                buffer[i] *= self.current_gain;
            }
        }
    }
}
