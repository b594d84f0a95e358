//! Shared parameter state and host transport info.
//!
//! Parameters are plain scalars behind relaxed atomics: host automation and
//! UI threads store, the audio thread loads once per block (selectors,
//! flags) or once per sample via its own smoothers (positions, drive, mix).
//! A one-block-stale read is audible at worst, never unsound, so no
//! ordering beyond atomicity is requested.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

use log::warn;

use crate::NUM_SLOTS;

/// `f32` stored in an `AtomicU32`, relaxed on both sides.
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// Per-axis modulation settings.
#[derive(Debug)]
pub struct LfoParams {
    /// Modulation depth, 0.0..=1.0.
    pub depth: AtomicF32,

    /// Free-running rate in Hz, 0.1..=20.0. Ignored while synced.
    pub rate: AtomicF32,

    /// Derive the rate from the transport tempo.
    pub sync: AtomicBool,

    /// Index into [`crate::lfo::NOTE_DIVISIONS`].
    pub note_division: AtomicUsize,

    /// Index into the [`crate::lfo::LfoShape`] selectors.
    pub shape: AtomicUsize,

    /// A bypassed axis contributes a zero offset.
    pub bypass: AtomicBool,
}

impl Default for LfoParams {
    fn default() -> Self {
        Self {
            depth: AtomicF32::new(1.0),
            rate: AtomicF32::new(0.1),
            sync: AtomicBool::new(false),
            note_division: AtomicUsize::new(5),
            shape: AtomicUsize::new(0),
            bypass: AtomicBool::new(false),
        }
    }
}

/// The full host-facing parameter set.
#[derive(Debug)]
pub struct Params {
    /// Pad position, 0.0..=1.0 per axis.
    pub xy_x: AtomicF32,
    pub xy_y: AtomicF32,

    /// Drive ahead of the selected nonlinearities, in dB, 1.0..=10.0.
    pub drive: AtomicF32,

    /// Dry/wet amount in percent, 0.0..=100.0.
    pub output_mix: AtomicF32,

    pub lfo_x: LfoParams,
    pub lfo_y: LfoParams,

    /// Algorithm selector per pad direction (right, top, left, bottom),
    /// 0-based into the shaper catalog.
    pub algorithm: [AtomicUsize; NUM_SLOTS],
}

impl Default for Params {
    fn default() -> Self {
        Self::new()
    }
}

impl Params {
    pub const NUM_FIELDS: usize = 20;

    pub fn new() -> Self {
        Self {
            xy_x: AtomicF32::new(0.5),
            xy_y: AtomicF32::new(0.5),
            drive: AtomicF32::new(5.0),
            output_mix: AtomicF32::new(100.0),
            lfo_x: LfoParams::default(),
            lfo_y: LfoParams::default(),
            algorithm: [
                AtomicUsize::new(0),
                AtomicUsize::new(0),
                AtomicUsize::new(0),
                AtomicUsize::new(0),
            ],
        }
    }

    /// The whole configuration as ordered name/value pairs, for the preset
    /// collaborator to serialize. Flags are encoded as 0.0/1.0, selectors
    /// as their index.
    pub fn save_fields(&self) -> [(&'static str, f32); Self::NUM_FIELDS] {
        [
            ("XY_X", self.xy_x.load()),
            ("XY_Y", self.xy_y.load()),
            ("PostXYDrive", self.drive.load()),
            ("OutputMix", self.output_mix.load()),
            ("LFO_X_Depth", self.lfo_x.depth.load()),
            ("LFO_X_Rate", self.lfo_x.rate.load()),
            ("LFO_X_Sync", bool_to_field(self.lfo_x.sync.load(Ordering::Relaxed))),
            (
                "LFO_X_NoteDivision",
                self.lfo_x.note_division.load(Ordering::Relaxed) as f32,
            ),
            ("LFO_X_Shape", self.lfo_x.shape.load(Ordering::Relaxed) as f32),
            (
                "LFO_X_Bypass",
                bool_to_field(self.lfo_x.bypass.load(Ordering::Relaxed)),
            ),
            ("LFO_Y_Depth", self.lfo_y.depth.load()),
            ("LFO_Y_Rate", self.lfo_y.rate.load()),
            ("LFO_Y_Sync", bool_to_field(self.lfo_y.sync.load(Ordering::Relaxed))),
            (
                "LFO_Y_NoteDivision",
                self.lfo_y.note_division.load(Ordering::Relaxed) as f32,
            ),
            ("LFO_Y_Shape", self.lfo_y.shape.load(Ordering::Relaxed) as f32),
            (
                "LFO_Y_Bypass",
                bool_to_field(self.lfo_y.bypass.load(Ordering::Relaxed)),
            ),
            ("Distortion_Right", self.algorithm[0].load(Ordering::Relaxed) as f32),
            ("Distortion_Top", self.algorithm[1].load(Ordering::Relaxed) as f32),
            ("Distortion_Left", self.algorithm[2].load(Ordering::Relaxed) as f32),
            (
                "Distortion_Bottom",
                self.algorithm[3].load(Ordering::Relaxed) as f32,
            ),
        ]
    }

    /// Restore one named field, clamping into its valid range. Unknown
    /// names and non-finite values are ignored so a damaged preset can
    /// never corrupt the engine state. Returns whether the name matched.
    pub fn load_field(&self, name: &str, value: f32) -> bool {
        if !value.is_finite() {
            warn!("ignoring non-finite value for parameter {name}");
            return false;
        }

        match name {
            "XY_X" => self.xy_x.store(value.clamp(0.0, 1.0)),
            "XY_Y" => self.xy_y.store(value.clamp(0.0, 1.0)),
            "PostXYDrive" => self.drive.store(value.clamp(1.0, 10.0)),
            "OutputMix" => self.output_mix.store(value.clamp(0.0, 100.0)),
            "LFO_X_Depth" => self.lfo_x.depth.store(value.clamp(0.0, 1.0)),
            "LFO_X_Rate" => self.lfo_x.rate.store(value.clamp(0.1, 20.0)),
            "LFO_X_Sync" => self.lfo_x.sync.store(value >= 0.5, Ordering::Relaxed),
            "LFO_X_NoteDivision" => self
                .lfo_x
                .note_division
                .store(selector(value, 13), Ordering::Relaxed),
            "LFO_X_Shape" => self.lfo_x.shape.store(selector(value, 4), Ordering::Relaxed),
            "LFO_X_Bypass" => self.lfo_x.bypass.store(value >= 0.5, Ordering::Relaxed),
            "LFO_Y_Depth" => self.lfo_y.depth.store(value.clamp(0.0, 1.0)),
            "LFO_Y_Rate" => self.lfo_y.rate.store(value.clamp(0.1, 20.0)),
            "LFO_Y_Sync" => self.lfo_y.sync.store(value >= 0.5, Ordering::Relaxed),
            "LFO_Y_NoteDivision" => self
                .lfo_y
                .note_division
                .store(selector(value, 13), Ordering::Relaxed),
            "LFO_Y_Shape" => self.lfo_y.shape.store(selector(value, 4), Ordering::Relaxed),
            "LFO_Y_Bypass" => self.lfo_y.bypass.store(value >= 0.5, Ordering::Relaxed),
            "Distortion_Right" => self.algorithm[0].store(selector(value, 16), Ordering::Relaxed),
            "Distortion_Top" => self.algorithm[1].store(selector(value, 16), Ordering::Relaxed),
            "Distortion_Left" => self.algorithm[2].store(selector(value, 16), Ordering::Relaxed),
            "Distortion_Bottom" => self.algorithm[3].store(selector(value, 16), Ordering::Relaxed),
            _ => {
                warn!("ignoring unknown parameter {name}");
                return false;
            }
        }

        true
    }
}

#[inline]
fn bool_to_field(flag: bool) -> f32 {
    if flag {
        1.0
    } else {
        0.0
    }
}

#[inline]
fn selector(value: f32, max: usize) -> usize {
    (value.max(0.0) as usize).min(max)
}

/// Host transport state, sampled once per block.
#[derive(Debug, Clone, Copy)]
pub struct Transport {
    pub bpm: f64,
    pub playing: bool,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            playing: false,
        }
    }
}

impl Transport {
    /// Tempo with the fallback applied for hosts that report none.
    pub fn effective_bpm(&self) -> f32 {
        if self.bpm > 0.0 {
            self.bpm as f32
        } else {
            120.0
        }
    }
}
