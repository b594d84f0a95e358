//! Quantizing and reclocking stages.

#[allow(unused_imports)]
use num_traits::float::Float;

use super::{finite_db, Waveshaper};
use crate::utils::db_to_gain;

/// Rounds the driven signal to a fixed number of amplitude steps.
#[derive(Debug, Default)]
pub struct Bitcrusher {
    drive_gain: f32,
    output_gain: f32,
}

impl Bitcrusher {
    const BIT_DEPTH: f32 = 5.0;

    pub fn new() -> Self {
        Self::default()
    }
}

impl Waveshaper for Bitcrusher {
    fn set_parameters(&mut self, drive_db: f32, output_db: f32) {
        self.drive_gain = db_to_gain(finite_db(drive_db));
        self.output_gain = db_to_gain(finite_db(output_db));
    }

    #[inline]
    fn process_sample(&mut self, sample: f32) -> f32 {
        let x = self.drive_gain * sample;
        let step = 1.0 / 2.0_f32.powf(Self::BIT_DEPTH);

        (x / step).round() * step * self.output_gain
    }
}

/// Sample-and-hold rate reducer: captures every eighth input sample and
/// repeats it in between.
///
/// The held sample and the divider position persist for the lifetime of
/// the owning channel; they are cleared at the prepare boundary only.
#[derive(Debug, Default)]
pub struct Lofi {
    drive_gain: f32,
    output_gain: f32,
    last_sample: f32,
    counter: u32,
}

impl Lofi {
    const RATE_DIVIDER: u32 = 8;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.last_sample = 0.0;
        self.counter = 0;
    }
}

impl Waveshaper for Lofi {
    fn set_parameters(&mut self, drive_db: f32, output_db: f32) {
        self.drive_gain = db_to_gain(finite_db(drive_db));
        self.output_gain = db_to_gain(finite_db(output_db));
    }

    #[inline]
    fn process_sample(&mut self, sample: f32) -> f32 {
        self.counter += 1;

        if self.counter >= Self::RATE_DIVIDER {
            self.last_sample = sample * self.drive_gain;
            self.counter = 0;
        }

        self.last_sample * self.output_gain
    }
}
