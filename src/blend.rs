//! Maps the pad position to blend weights for the four distortion slots.
//!
//! The effective position is centered, converted to radius and angle, and
//! each cardinal direction is scored by a Gaussian of its angular distance.
//! Towards the pad center the scores fade into an even four-way split, so
//! the middle of the pad always blends all slots equally.

#[allow(unused_imports)]
use num_traits::float::Float;

use core::f32::consts::{FRAC_PI_2, PI, TAU};

use crate::utils::{one_pole, smoothing_coefficient};

const ANGLE_RIGHT: f32 = 0.0;
const ANGLE_TOP: f32 = 3.0 * FRAC_PI_2;
const ANGLE_LEFT: f32 = PI;
const ANGLE_BOTTOM: f32 = FRAC_PI_2;

const SHARPNESS: f32 = 2.0;
const CENTER_WEIGHT: f32 = 0.25;
const SMOOTHING_TIME: f32 = 0.3;

/// Blend weights of the four slots. Targets are normalized to sum to 1;
/// smoothed weights lag their targets individually, so their instantaneous
/// sum may deviate from 1 and must not be renormalized by consumers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeights {
    pub right: f32,
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
}

impl BlendWeights {
    /// Even split at the pad center.
    pub const CENTER: Self = Self {
        right: 0.25,
        top: 0.25,
        left: 0.25,
        bottom: 0.25,
    };

    pub fn sum(&self) -> f32 {
        self.right + self.top + self.left + self.bottom
    }
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Angular distance wrapped over two full turns; within one turn this
/// reduces to `|b - a|`, so opposite approach directions are not
/// symmetrical. The Gaussian scoring suppresses the far tail either way.
#[inline]
fn angular_distance(a: f32, b: f32) -> f32 {
    ((b - a + PI) % (2.0 * TAU) - PI).abs()
}

/// Ideal (pre-smoothing) weights for an effective pad position. Both
/// coordinates are expected in 0.0..=1.0.
pub fn target_weights(x: f32, y: f32) -> BlendWeights {
    let centered_x = (x - 0.5) * 2.0;
    let centered_y = (y - 0.5) * 2.0;

    let radius = (centered_x * centered_x + centered_y * centered_y)
        .sqrt()
        .min(1.0);
    let mut angle = centered_y.atan2(centered_x);
    if angle < 0.0 {
        angle += TAU;
    }

    let mut right = gaussian_score(ANGLE_RIGHT, angle);
    let mut top = gaussian_score(ANGLE_TOP, angle);
    let mut left = gaussian_score(ANGLE_LEFT, angle);
    let mut bottom = gaussian_score(ANGLE_BOTTOM, angle);

    let sum = right + top + left + bottom;
    right /= sum;
    top /= sum;
    left /= sum;
    bottom /= sum;

    // Fade the directional scores into an even split towards the center.
    right = (1.0 - radius) * CENTER_WEIGHT + radius * right;
    top = (1.0 - radius) * CENTER_WEIGHT + radius * top;
    left = (1.0 - radius) * CENTER_WEIGHT + radius * left;
    bottom = (1.0 - radius) * CENTER_WEIGHT + radius * bottom;

    let total = right + top + left + bottom;

    BlendWeights {
        right: right / total,
        top: top / total,
        left: left / total,
        bottom: bottom / total,
    }
}

#[inline]
fn gaussian_score(ideal: f32, angle: f32) -> f32 {
    let distance = angular_distance(ideal, angle);

    (-SHARPNESS * distance * distance).exp()
}

/// Smoothed weight state advanced once per frame.
#[derive(Debug)]
pub struct BlendEngine {
    coefficient: f32,
    weights: BlendWeights,
}

impl Default for BlendEngine {
    fn default() -> Self {
        Self {
            coefficient: 1.0,
            weights: BlendWeights::CENTER,
        }
    }
}

impl BlendEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init(&mut self, sample_rate: f32) {
        self.coefficient = smoothing_coefficient(SMOOTHING_TIME, sample_rate);
        self.weights = BlendWeights::CENTER;
    }

    pub fn weights(&self) -> BlendWeights {
        self.weights
    }

    /// Advance the smoothed weights towards the targets for this position
    /// and return them.
    #[inline]
    pub fn step(&mut self, x: f32, y: f32) -> BlendWeights {
        let target = target_weights(x, y);

        one_pole(&mut self.weights.right, target.right, self.coefficient);
        one_pole(&mut self.weights.top, target.top, self.coefficient);
        one_pole(&mut self.weights.left, target.left, self.coefficient);
        one_pole(&mut self.weights.bottom, target.bottom, self.coefficient);

        self.weights
    }
}
