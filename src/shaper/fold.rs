//! Wavefolding and harmonic shaping stages.

#[allow(unused_imports)]
use num_traits::float::Float;

use core::f32::consts::PI;

use super::{finite_db, Waveshaper};
use crate::utils::db_to_gain;

/// Folds the driven signal through a full sine cycle.
#[derive(Debug, Default)]
pub struct SinusoidalFold {
    drive_gain: f32,
    output_gain: f32,
}

impl SinusoidalFold {
    const MAKEUP: f32 = 1.5;

    pub fn new() -> Self {
        Self::default()
    }
}

impl Waveshaper for SinusoidalFold {
    fn set_parameters(&mut self, drive_db: f32, output_db: f32) {
        self.drive_gain = db_to_gain(finite_db(drive_db));
        self.output_gain = db_to_gain(finite_db(output_db)) * Self::MAKEUP;
    }

    #[inline]
    fn process_sample(&mut self, sample: f32) -> f32 {
        (PI * self.drive_gain * sample).sin() * self.output_gain
    }
}

/// Reflects the signal back into the unit range as often as needed.
#[derive(Debug, Default)]
pub struct Wavefolder {
    drive_gain: f32,
    output_gain: f32,
}

impl Wavefolder {
    const THRESHOLD: f32 = 1.0;

    pub fn new() -> Self {
        Self::default()
    }
}

impl Waveshaper for Wavefolder {
    fn set_parameters(&mut self, drive_db: f32, output_db: f32) {
        self.drive_gain = db_to_gain(finite_db(drive_db));
        self.output_gain = db_to_gain(finite_db(output_db));
    }

    #[inline]
    fn process_sample(&mut self, sample: f32) -> f32 {
        let mut x = self.drive_gain * sample;

        // A non-finite value would never leave the fold loop.
        if !x.is_finite() {
            return 0.0;
        }

        while x > Self::THRESHOLD {
            x = 2.0 * Self::THRESHOLD - x;
        }
        while x < -Self::THRESHOLD {
            x = -2.0 * Self::THRESHOLD - x;
        }

        x * self.output_gain
    }
}

/// Fixed mix of second and third order Chebyshev polynomials.
///
/// The input is clamped to the polynomials' domain and a small dead zone
/// keeps T2's -1.0 rest value from leaking out at silence.
#[derive(Debug, Default)]
pub struct Chebyshev {
    drive_gain: f32,
    output_gain: f32,
}

impl Chebyshev {
    const T2_GAIN: f32 = 0.5;
    const T3_GAIN: f32 = 0.3;
    const DEAD_ZONE: f32 = 1.0e-2;

    pub fn new() -> Self {
        Self::default()
    }
}

impl Waveshaper for Chebyshev {
    fn set_parameters(&mut self, drive_db: f32, output_db: f32) {
        self.drive_gain = db_to_gain(finite_db(drive_db));
        self.output_gain = db_to_gain(finite_db(output_db));
    }

    #[inline]
    fn process_sample(&mut self, sample: f32) -> f32 {
        let x = self.drive_gain * sample;

        if x.abs() < Self::DEAD_ZONE {
            return 0.0;
        }

        let x = x.clamp(-1.0, 1.0);
        let t2 = 2.0 * x * x - 1.0;
        let t3 = 4.0 * x * x * x - 3.0 * x;

        (Self::T2_GAIN * t2 + Self::T3_GAIN * t3) * self.output_gain
    }
}
