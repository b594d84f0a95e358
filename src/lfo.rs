//! Low-frequency oscillators driving the pad position.
//!
//! Each axis owns one oscillator with a selectable waveform, a free-running
//! or tempo-synced frequency and a depth scaler. Every emitted value is
//! also pushed into a lock-free history ring for visualization readback
//! from another thread.

#[allow(unused_imports)]
use num_traits::float::Float;

use alloc::sync::Arc;
use core::f32::consts::{FRAC_2_PI, PI, TAU};
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::utils::random;

/// Capacity of the visualization history ring.
pub const HISTORY_SIZE: usize = 8192;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LfoShape {
    #[default]
    Sine,

    Triangle,
    Square,
    Saw,
    Random,
}

impl<T> From<T> for LfoShape
where
    T: Into<usize>,
{
    fn from(value: T) -> Self {
        match value.into() {
            1 => LfoShape::Triangle,
            2 => LfoShape::Square,
            3 => LfoShape::Saw,
            4 => LfoShape::Random,
            _ => LfoShape::Sine,
        }
    }
}

/// Musical note division for tempo sync.
#[derive(Debug, Clone, Copy)]
pub struct NoteDivision {
    pub label: &'static str,

    /// Cycle-rate factor applied to the beat rate.
    pub multiplier: f32,
}

/// Note-division table, from fastest to slowest. The selector index of the
/// host parameter maps directly into this table.
pub const NOTE_DIVISIONS: [NoteDivision; 14] = [
    NoteDivision { label: "1/32", multiplier: 32.0 },
    NoteDivision { label: "1/16", multiplier: 16.0 },
    NoteDivision { label: "1/16T", multiplier: 24.0 },
    NoteDivision { label: "1/8", multiplier: 8.0 },
    NoteDivision { label: "1/8T", multiplier: 12.0 },
    NoteDivision { label: "1/4", multiplier: 1.0 },
    NoteDivision { label: "1/4T", multiplier: 1.5 },
    NoteDivision { label: "1/2", multiplier: 0.5 },
    NoteDivision { label: "1/2T", multiplier: 0.75 },
    NoteDivision { label: "1", multiplier: 0.25 },
    NoteDivision { label: "2", multiplier: 0.125 },
    NoteDivision { label: "4", multiplier: 0.0625 },
    NoteDivision { label: "8", multiplier: 0.03125 },
    NoteDivision { label: "16", multiplier: 0.015625 },
];

/// Oscillation frequency in Hz for a tempo and note-division selector.
/// Out-of-range selectors clamp to the slowest division.
#[inline]
pub fn sync_frequency(bpm: f32, division: usize) -> f32 {
    let division = division.min(NOTE_DIVISIONS.len() - 1);

    (bpm / 60.0) * NOTE_DIVISIONS[division].multiplier
}

/// History ring written by the audio thread and read by a visualization
/// thread.
///
/// Single writer, relaxed atomics throughout. A reader takes the write
/// index once and copies the buffer; entries near the index may be
/// overwritten mid-copy, which rotates or tears the snapshot. That is
/// acceptable for display purposes and must never feed a control decision.
pub struct LfoScope {
    values: [AtomicU32; HISTORY_SIZE],
    write_index: AtomicUsize,
}

impl LfoScope {
    pub fn new() -> Self {
        const ZERO: AtomicU32 = AtomicU32::new(0);

        Self {
            values: [ZERO; HISTORY_SIZE],
            write_index: AtomicUsize::new(0),
        }
    }

    #[inline]
    pub fn push(&self, value: f32) {
        let index = self.write_index.load(Ordering::Relaxed);
        self.values[index].store(value.to_bits(), Ordering::Relaxed);
        self.write_index
            .store((index + 1) % HISTORY_SIZE, Ordering::Relaxed);
    }

    /// Copy the most recent `out.len()` values, oldest first.
    pub fn snapshot(&self, out: &mut [f32]) {
        let len = out.len().min(HISTORY_SIZE);
        let index = self.write_index.load(Ordering::Relaxed);
        let start = (index + HISTORY_SIZE - len) % HISTORY_SIZE;

        for (n, out_value) in out.iter_mut().take(len).enumerate() {
            let slot = (start + n) % HISTORY_SIZE;
            *out_value = f32::from_bits(self.values[slot].load(Ordering::Relaxed));
        }
    }
}

impl Default for LfoScope {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for LfoScope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LfoScope")
            .field("write_index", &self.write_index)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct Lfo {
    phase: f32,
    phase_increment: f32,
    frequency: f32,
    depth: f32,
    shape: LfoShape,
    random_value: f32,
    sample_rate: f32,
    scope: Arc<LfoScope>,
}

impl Default for Lfo {
    fn default() -> Self {
        Self {
            phase: 0.0,
            phase_increment: 0.0,
            frequency: 1.0,
            depth: 0.0,
            shape: LfoShape::Sine,
            random_value: 0.0,
            sample_rate: 0.0,
            scope: Arc::new(LfoScope::new()),
        }
    }
}

impl Lfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init(&mut self, sample_rate: f32) {
        self.phase = 0.0;
        self.random_value = 0.0;
        self.sample_rate = sample_rate;
        self.update_increment();
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate > 0.0 && sample_rate != self.sample_rate {
            self.sample_rate = sample_rate;
            self.update_increment();
        }
    }

    /// Set the free-running frequency in Hz. Non-positive frequencies are
    /// ignored and the previous frequency is retained.
    pub fn set_frequency(&mut self, frequency: f32) {
        if frequency <= 0.0 || !frequency.is_finite() {
            return;
        }

        self.frequency = frequency;
        self.update_increment();
    }

    /// Derive the frequency from a tempo and note-division selector.
    pub fn set_sync_frequency(&mut self, bpm: f32, division: usize) {
        self.set_frequency(sync_frequency(bpm, division));
    }

    pub fn set_depth(&mut self, depth: f32) {
        self.depth = depth.clamp(0.0, 1.0);
    }

    pub fn set_shape(&mut self, shape: LfoShape) {
        self.shape = shape;
    }

    pub fn reset_phase(&mut self) {
        self.phase = 0.0;
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Adopt another oscillator's phase so both axes run in lockstep.
    pub fn sync_phase_to(&mut self, phase: f32) {
        let mut phase = phase % TAU;
        if phase < 0.0 {
            phase += TAU;
        }
        self.phase = phase;
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Handle to the history ring for the visualization thread.
    pub fn scope(&self) -> Arc<LfoScope> {
        Arc::clone(&self.scope)
    }

    fn update_increment(&mut self) {
        if self.sample_rate > 0.0 {
            self.phase_increment = TAU * self.frequency / self.sample_rate;
        }
    }

    /// Advance one sample and return the modulation offset. The offset is
    /// also recorded in the history ring.
    #[inline]
    pub fn process_modulation(&mut self) -> f32 {
        self.phase += self.phase_increment;

        if self.phase >= TAU {
            self.phase %= TAU;
            // Only the random shape consumes the draw, but rolling on every
            // wrap keeps the shapes interchangeable mid-cycle.
            self.random_value = random::get_bipolar_float();
        }

        let value = match self.shape {
            LfoShape::Sine => self.phase.sin(),
            LfoShape::Triangle => FRAC_2_PI * self.phase.sin().asin(),
            LfoShape::Square => {
                if self.phase < PI {
                    1.0
                } else {
                    -1.0
                }
            }
            LfoShape::Saw => 2.0 * self.phase / TAU - 1.0,
            LfoShape::Random => self.random_value,
        };

        let scaled = value * self.depth * 0.5;
        self.scope.push(scaled);

        scaled
    }
}
