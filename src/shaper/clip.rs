//! Clipping and saturation stages.

#[allow(unused_imports)]
use num_traits::float::Float;

use super::{finite_db, Waveshaper};
use crate::utils::db_to_gain;

/// Smooth saturator with a small constant offset that biases the transfer
/// curve away from odd symmetry.
#[derive(Debug, Default)]
pub struct SoftClip {
    drive_gain: f32,
    output_gain: f32,
}

impl SoftClip {
    const COMPENSATION: f32 = 2.0;

    /// Extra input gain so the curve saturates inside the nominal drive
    /// range.
    const DRIVE_OFFSET_DB: f32 = 12.0;

    pub fn new() -> Self {
        Self::default()
    }
}

impl Waveshaper for SoftClip {
    fn set_parameters(&mut self, drive_db: f32, output_db: f32) {
        self.drive_gain = db_to_gain(finite_db(drive_db) + Self::DRIVE_OFFSET_DB);
        self.output_gain = db_to_gain(finite_db(output_db)) / Self::COMPENSATION;
    }

    #[inline]
    fn process_sample(&mut self, sample: f32) -> f32 {
        let mut x = self.drive_gain * sample;
        x += 0.1_f32.copysign(x);

        let squashed = x / (1.0 + x.abs());

        (3.0 * squashed).tanh() * self.output_gain
    }
}

/// Brickwall clamp at a low threshold.
#[derive(Debug, Default)]
pub struct HardClip {
    drive_gain: f32,
    output_gain: f32,
}

impl HardClip {
    const COMPENSATION: f32 = 0.15;
    const THRESHOLD: f32 = 0.1;

    pub fn new() -> Self {
        Self::default()
    }
}

impl Waveshaper for HardClip {
    fn set_parameters(&mut self, drive_db: f32, output_db: f32) {
        self.drive_gain = db_to_gain(finite_db(drive_db));
        self.output_gain = db_to_gain(finite_db(output_db)) / Self::COMPENSATION;
    }

    #[inline]
    fn process_sample(&mut self, sample: f32) -> f32 {
        let driven = self.drive_gain * sample;

        driven.clamp(-Self::THRESHOLD, Self::THRESHOLD) * self.output_gain
    }
}

/// Two saturators in series: tanh into arctangent.
#[derive(Debug, Default)]
pub struct Cascade {
    drive_gain: f32,
    output_gain: f32,
}

impl Cascade {
    const COMPENSATION: f32 = 0.6;

    pub fn new() -> Self {
        Self::default()
    }
}

impl Waveshaper for Cascade {
    fn set_parameters(&mut self, drive_db: f32, output_db: f32) {
        self.drive_gain = db_to_gain(finite_db(drive_db));
        self.output_gain = db_to_gain(finite_db(output_db)) / Self::COMPENSATION;
    }

    #[inline]
    fn process_sample(&mut self, sample: f32) -> f32 {
        (self.drive_gain * sample).tanh().atan() * self.output_gain
    }
}

/// Sum of two tanh stages shifted by a bias, approximating a diode pair's
/// conduction knees.
#[derive(Debug, Default)]
pub struct Diode {
    drive_gain: f32,
    output_gain: f32,
}

impl Diode {
    const COMPENSATION: f32 = 0.4;
    const BIAS: f32 = 0.5;

    pub fn new() -> Self {
        Self::default()
    }
}

impl Waveshaper for Diode {
    fn set_parameters(&mut self, drive_db: f32, output_db: f32) {
        self.drive_gain = db_to_gain(finite_db(drive_db));
        self.output_gain = db_to_gain(finite_db(output_db)) / Self::COMPENSATION;
    }

    #[inline]
    fn process_sample(&mut self, sample: f32) -> f32 {
        let x = self.drive_gain * sample;
        let shaped = 0.5 * ((x - Self::BIAS).tanh() + (x + Self::BIAS).tanh());

        shaped * self.output_gain
    }
}

/// Classic third-order valve polynomial.
#[derive(Debug, Default)]
pub struct Tube {
    drive_gain: f32,
    output_gain: f32,
}

impl Tube {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Waveshaper for Tube {
    fn set_parameters(&mut self, drive_db: f32, output_db: f32) {
        self.drive_gain = db_to_gain(finite_db(drive_db));
        self.output_gain = db_to_gain(finite_db(output_db));
    }

    #[inline]
    fn process_sample(&mut self, sample: f32) -> f32 {
        let x = self.drive_gain * sample;

        (1.5 * x - 0.5 * x * x * x) * self.output_gain
    }
}
