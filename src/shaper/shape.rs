//! Polynomial and transcendental transfer curves.

#[allow(unused_imports)]
use num_traits::float::Float;

use core::f32::consts::FRAC_2_PI;

use super::{finite_db, Waveshaper};
use crate::utils::db_to_gain;

/// Cubic waveshaper with a fixed shape amount.
#[derive(Debug, Default)]
pub struct WaveShaper {
    drive_gain: f32,
    output_gain: f32,
}

impl WaveShaper {
    const SHAPE: f32 = 0.9;

    pub fn new() -> Self {
        Self::default()
    }
}

impl Waveshaper for WaveShaper {
    fn set_parameters(&mut self, drive_db: f32, output_db: f32) {
        self.drive_gain = db_to_gain(finite_db(drive_db));
        self.output_gain = db_to_gain(finite_db(output_db));
    }

    #[inline]
    fn process_sample(&mut self, sample: f32) -> f32 {
        let x = self.drive_gain * sample;

        (x - Self::SHAPE * x * x * x * 1.2) * self.output_gain
    }
}

/// Arctangent saturation.
#[derive(Debug, Default)]
pub struct Arctan {
    drive_gain: f32,
    output_gain: f32,
}

impl Arctan {
    const K: f32 = 20.0;
    const MAKEUP: f32 = 1.3;

    pub fn new() -> Self {
        Self::default()
    }
}

impl Waveshaper for Arctan {
    fn set_parameters(&mut self, drive_db: f32, output_db: f32) {
        self.drive_gain = db_to_gain(finite_db(drive_db));
        self.output_gain = db_to_gain(finite_db(output_db)) * Self::MAKEUP;
    }

    #[inline]
    fn process_sample(&mut self, sample: f32) -> f32 {
        let x = self.drive_gain * sample;

        FRAC_2_PI * (Self::K * x).atan() * self.output_gain
    }
}

/// Arctangent saturation with different slopes for the positive and
/// negative half waves, adding even harmonics.
#[derive(Debug, Default)]
pub struct AsymmetricArctan {
    drive_gain: f32,
    output_gain: f32,
}

impl AsymmetricArctan {
    const K_POSITIVE: f32 = 8.0;
    const K_NEGATIVE: f32 = 20.0;
    const MAKEUP: f32 = 1.3;

    pub fn new() -> Self {
        Self::default()
    }
}

impl Waveshaper for AsymmetricArctan {
    fn set_parameters(&mut self, drive_db: f32, output_db: f32) {
        self.drive_gain = db_to_gain(finite_db(drive_db));
        self.output_gain = db_to_gain(finite_db(output_db)) * Self::MAKEUP;
    }

    #[inline]
    fn process_sample(&mut self, sample: f32) -> f32 {
        let x = self.drive_gain * sample;
        let k = if x >= 0.0 {
            Self::K_POSITIVE
        } else {
            Self::K_NEGATIVE
        };

        FRAC_2_PI * (k * x).atan() * self.output_gain
    }
}

/// Second and third order polynomial distortion.
#[derive(Debug, Default)]
pub struct Polynomial {
    drive_gain: f32,
    output_gain: f32,
}

impl Polynomial {
    const A: f32 = 0.25;
    const B: f32 = 0.75;

    pub fn new() -> Self {
        Self::default()
    }
}

impl Waveshaper for Polynomial {
    fn set_parameters(&mut self, drive_db: f32, output_db: f32) {
        self.drive_gain = db_to_gain(finite_db(drive_db));
        self.output_gain = db_to_gain(finite_db(output_db));
    }

    #[inline]
    fn process_sample(&mut self, sample: f32) -> f32 {
        let x = self.drive_gain * sample;
        let shaped = x - (Self::A * 1.3) * x * x - (Self::B * 1.3) * x * x * x;

        shaped * self.output_gain
    }
}

/// Full wave rectifier.
#[derive(Debug, Default)]
pub struct Rectify {
    drive_gain: f32,
    output_gain: f32,
}

impl Rectify {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Waveshaper for Rectify {
    fn set_parameters(&mut self, drive_db: f32, output_db: f32) {
        self.drive_gain = db_to_gain(finite_db(drive_db));
        self.output_gain = db_to_gain(finite_db(output_db));
    }

    #[inline]
    fn process_sample(&mut self, sample: f32) -> f32 {
        (self.drive_gain * sample).abs() * self.output_gain
    }
}

/// Signed logarithmic compression, normalized so unity input maps to
/// unity output.
#[derive(Debug, Default)]
pub struct Logarithmic {
    drive_gain: f32,
    output_gain: f32,
}

impl Logarithmic {
    const COMPENSATION: f32 = 0.6;
    const A: f32 = 8.0;

    pub fn new() -> Self {
        Self::default()
    }
}

impl Waveshaper for Logarithmic {
    fn set_parameters(&mut self, drive_db: f32, output_db: f32) {
        self.drive_gain = db_to_gain(finite_db(drive_db));
        self.output_gain = db_to_gain(finite_db(output_db)) / Self::COMPENSATION;
    }

    #[inline]
    fn process_sample(&mut self, sample: f32) -> f32 {
        let x = self.drive_gain * sample;
        let shaped = ((1.0 + Self::A * x.abs()).ln() / (1.0 + Self::A).ln()).copysign(x);

        shaped * self.output_gain
    }
}

/// Truncated Taylor expansion of arctangent.
#[derive(Debug, Default)]
pub struct Cubic {
    drive_gain: f32,
    output_gain: f32,
}

impl Cubic {
    const COMPENSATION: f32 = 0.8;

    pub fn new() -> Self {
        Self::default()
    }
}

impl Waveshaper for Cubic {
    fn set_parameters(&mut self, drive_db: f32, output_db: f32) {
        self.drive_gain = db_to_gain(finite_db(drive_db));
        self.output_gain = db_to_gain(finite_db(output_db)) / Self::COMPENSATION;
    }

    #[inline]
    fn process_sample(&mut self, sample: f32) -> f32 {
        let x = self.drive_gain * sample;
        let x3 = x * x * x;
        let x5 = x3 * x * x;

        (x - x3 / 3.0 + x5 / 5.0) * self.output_gain
    }
}
