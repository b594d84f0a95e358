//! Utility functions shared by the processing modules.

pub mod random;

#[allow(unused_imports)]
use num_traits::float::Float;

/// One-pole lowpass step towards `in_`.
#[inline]
pub fn one_pole(out: &mut f32, in_: f32, coefficient: f32) {
    *out += coefficient * (in_ - *out);
}

#[inline]
pub fn crossfade(a: f32, b: f32, fade: f32) -> f32 {
    a + (b - a) * fade
}

/// Decibels to linear gain.
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10.0_f32.powf(db * 0.05)
}

/// Per-step coefficient of a one-pole smoother with the given time constant,
/// advanced every `1.0 / step_rate` seconds.
#[inline]
pub fn smoothing_coefficient(time_seconds: f32, step_rate: f32) -> f32 {
    1.0 - (-1.0 / (time_seconds * step_rate)).exp()
}
