//! Bank of per-sample waveshaping algorithms.
//!
//! Every unit converts its drive/output settings from decibels to linear
//! gain, applies the drive ahead of a closed-form nonlinearity and scales
//! the result by the output gain divided by a per-algorithm loudness
//! compensation constant. All units are stateless per sample except the
//! lo-fi reducer, which holds its last captured sample.

pub mod clip;
pub mod digital;
pub mod fold;
pub mod shape;

use clip::{Cascade, Diode, HardClip, SoftClip, Tube};
use digital::{Bitcrusher, Lofi};
use fold::{Chebyshev, SinusoidalFold, Wavefolder};
use shape::{Arctan, AsymmetricArctan, Cubic, Logarithmic, Polynomial, Rectify, WaveShaper};

pub trait Waveshaper {
    /// Update drive and output trim, both in decibels.
    fn set_parameters(&mut self, drive_db: f32, output_db: f32);

    /// Shape a single sample.
    fn process_sample(&mut self, sample: f32) -> f32;
}

/// Replacement for non-finite decibel settings.
#[inline]
pub(crate) fn finite_db(db: f32) -> f32 {
    if db.is_finite() {
        db
    } else {
        0.0
    }
}

pub const NUM_ALGORITHMS: usize = 17;

/// Selectable shaping algorithms, in selector order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    #[default]
    SoftClip,

    HardClip,
    SinusoidalFold,
    WaveShaper,
    Arctan,
    AsymmetricArctan,
    Cascade,
    Polynomial,
    Rectify,
    Logarithmic,
    Bitcrusher,
    Cubic,
    Diode,
    Tube,
    Chebyshev,
    Lofi,
    Wavefolder,
}

impl<T> From<T> for Algorithm
where
    T: Into<usize>,
{
    fn from(value: T) -> Self {
        match value.into() {
            1 => Algorithm::HardClip,
            2 => Algorithm::SinusoidalFold,
            3 => Algorithm::WaveShaper,
            4 => Algorithm::Arctan,
            5 => Algorithm::AsymmetricArctan,
            6 => Algorithm::Cascade,
            7 => Algorithm::Polynomial,
            8 => Algorithm::Rectify,
            9 => Algorithm::Logarithmic,
            10 => Algorithm::Bitcrusher,
            11 => Algorithm::Cubic,
            12 => Algorithm::Diode,
            13 => Algorithm::Tube,
            14 => Algorithm::Chebyshev,
            15 => Algorithm::Lofi,
            16 => Algorithm::Wavefolder,
            _ => Algorithm::SoftClip,
        }
    }
}

/// One instance of every algorithm for a single audio channel.
///
/// Only the four units selected by the pad directions are exercised in a
/// given block, but all of them track the current drive so a selector
/// change never processes with stale gains.
#[derive(Debug, Default)]
pub struct ShaperBank {
    soft_clip: SoftClip,
    hard_clip: HardClip,
    sinusoidal_fold: SinusoidalFold,
    wave_shaper: WaveShaper,
    arctan: Arctan,
    asymmetric_arctan: AsymmetricArctan,
    cascade: Cascade,
    polynomial: Polynomial,
    rectify: Rectify,
    logarithmic: Logarithmic,
    bitcrusher: Bitcrusher,
    cubic: Cubic,
    diode: Diode,
    tube: Tube,
    chebyshev: Chebyshev,
    lofi: Lofi,
    wavefolder: Wavefolder,
}

impl ShaperBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear held state. Called at the prepare boundary only, never
    /// mid-stream.
    pub fn reset(&mut self) {
        self.lofi.reset();
    }

    pub fn set_parameters(&mut self, drive_db: f32, output_db: f32) {
        self.soft_clip.set_parameters(drive_db, output_db);
        self.hard_clip.set_parameters(drive_db, output_db);
        self.sinusoidal_fold.set_parameters(drive_db, output_db);
        self.wave_shaper.set_parameters(drive_db, output_db);
        self.arctan.set_parameters(drive_db, output_db);
        self.asymmetric_arctan.set_parameters(drive_db, output_db);
        self.cascade.set_parameters(drive_db, output_db);
        self.polynomial.set_parameters(drive_db, output_db);
        self.rectify.set_parameters(drive_db, output_db);
        self.logarithmic.set_parameters(drive_db, output_db);
        self.bitcrusher.set_parameters(drive_db, output_db);
        self.cubic.set_parameters(drive_db, output_db);
        self.diode.set_parameters(drive_db, output_db);
        self.tube.set_parameters(drive_db, output_db);
        self.chebyshev.set_parameters(drive_db, output_db);
        self.lofi.set_parameters(drive_db, output_db);
        self.wavefolder.set_parameters(drive_db, output_db);
    }

    #[inline]
    pub fn process_sample(&mut self, algorithm: Algorithm, sample: f32) -> f32 {
        match algorithm {
            Algorithm::SoftClip => self.soft_clip.process_sample(sample),
            Algorithm::HardClip => self.hard_clip.process_sample(sample),
            Algorithm::SinusoidalFold => self.sinusoidal_fold.process_sample(sample),
            Algorithm::WaveShaper => self.wave_shaper.process_sample(sample),
            Algorithm::Arctan => self.arctan.process_sample(sample),
            Algorithm::AsymmetricArctan => self.asymmetric_arctan.process_sample(sample),
            Algorithm::Cascade => self.cascade.process_sample(sample),
            Algorithm::Polynomial => self.polynomial.process_sample(sample),
            Algorithm::Rectify => self.rectify.process_sample(sample),
            Algorithm::Logarithmic => self.logarithmic.process_sample(sample),
            Algorithm::Bitcrusher => self.bitcrusher.process_sample(sample),
            Algorithm::Cubic => self.cubic.process_sample(sample),
            Algorithm::Diode => self.diode.process_sample(sample),
            Algorithm::Tube => self.tube.process_sample(sample),
            Algorithm::Chebyshev => self.chebyshev.process_sample(sample),
            Algorithm::Lofi => self.lofi.process_sample(sample),
            Algorithm::Wavefolder => self.wavefolder.process_sample(sample),
        }
    }
}
