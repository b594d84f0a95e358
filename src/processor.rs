//! Block processor tying the engines together.
//!
//! One instance runs the whole signal path synchronously inside the host's
//! audio callback: LFO evaluation, pad blending, the four-way shaper
//! stage, loudness compensation and the dry/wet crossfade. Everything the
//! path needs is allocated in [`Processor::prepare`]; `process` itself
//! never allocates, locks or panics.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::Ordering;

use log::{debug, warn};

use crate::auto_gain::AutoGain;
use crate::blend::BlendEngine;
use crate::lfo::{Lfo, LfoScope, LfoShape};
use crate::mixer::{DryWetMixer, BYPASS_THRESHOLD};
use crate::params::{AtomicF32, Params, Transport};
use crate::shaper::{Algorithm, ShaperBank};
use crate::utils::{one_pole, smoothing_coefficient};
use crate::{Axis, Direction, NUM_SLOTS};

const POSITION_SMOOTHING_TIME: f32 = 0.3;

/// Effective pad position after modulation, readable from the UI thread
/// for thumb rendering.
#[derive(Debug)]
pub struct PadPosition {
    x: AtomicF32,
    y: AtomicF32,
}

impl Default for PadPosition {
    fn default() -> Self {
        Self {
            x: AtomicF32::new(0.5),
            y: AtomicF32::new(0.5),
        }
    }
}

impl PadPosition {
    #[inline]
    fn store(&self, x: f32, y: f32) {
        self.x.store(x);
        self.y.store(y);
    }

    pub fn get(&self) -> (f32, f32) {
        (self.x.load(), self.y.load())
    }
}

#[derive(Debug)]
pub struct Processor {
    sample_rate: f32,
    banks: Vec<ShaperBank>,
    lfo_x: Lfo,
    lfo_y: Lfo,
    blend: BlendEngine,
    auto_gain: AutoGain,
    mixer: DryWetMixer,
    smoothed_x: f32,
    smoothed_y: f32,
    position_coefficient: f32,
    previous_sync_x: bool,
    previous_sync_y: bool,
    lfo_offsets_x: Vec<f32>,
    lfo_offsets_y: Vec<f32>,
    position: Arc<PadPosition>,
}

impl Default for Processor {
    fn default() -> Self {
        Self {
            sample_rate: 0.0,
            banks: Vec::new(),
            lfo_x: Lfo::new(),
            lfo_y: Lfo::new(),
            blend: BlendEngine::new(),
            auto_gain: AutoGain::new(),
            mixer: DryWetMixer::new(),
            smoothed_x: 0.5,
            smoothed_y: 0.5,
            position_coefficient: 1.0,
            previous_sync_x: false,
            previous_sync_y: false,
            lfo_offsets_x: Vec::new(),
            lfo_offsets_y: Vec::new(),
            position: Arc::new(PadPosition::default()),
        }
    }
}

impl Processor {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)allocate per-channel state for a host configuration. Must be
    /// called before the first [`Self::process`] and again whenever the
    /// sample rate, maximum block size or channel count changes; the host
    /// guarantees this never races a running block.
    pub fn prepare(
        &mut self,
        params: &Params,
        sample_rate: f32,
        max_block_size: usize,
        num_channels: usize,
    ) {
        if sample_rate <= 0.0 || max_block_size == 0 || num_channels == 0 {
            warn!(
                "ignoring prepare with sample_rate={sample_rate}, \
                 max_block_size={max_block_size}, num_channels={num_channels}"
            );
            return;
        }

        debug!(
            "prepare: sample_rate={sample_rate}, max_block_size={max_block_size}, \
             num_channels={num_channels}"
        );

        self.sample_rate = sample_rate;

        self.banks.clear();
        self.banks.resize_with(num_channels, ShaperBank::new);

        self.lfo_x.init(sample_rate);
        self.lfo_y.init(sample_rate);
        self.blend.init(sample_rate);
        self.auto_gain.init(sample_rate);
        self.mixer
            .init(sample_rate, params.output_mix.load() * 0.01);

        self.smoothed_x = params.xy_x.load().clamp(0.0, 1.0);
        self.smoothed_y = params.xy_y.load().clamp(0.0, 1.0);
        self.position_coefficient = smoothing_coefficient(POSITION_SMOOTHING_TIME, sample_rate);
        self.position.store(self.smoothed_x, self.smoothed_y);

        self.previous_sync_x = params.lfo_x.sync.load(Ordering::Relaxed);
        self.previous_sync_y = params.lfo_y.sync.load(Ordering::Relaxed);

        self.lfo_offsets_x.clear();
        self.lfo_offsets_x.resize(max_block_size, 0.0);
        self.lfo_offsets_y.clear();
        self.lfo_offsets_y.resize(max_block_size, 0.0);
    }

    /// History ring of one axis for visualization readback.
    pub fn scope(&self, axis: Axis) -> Arc<LfoScope> {
        match axis {
            Axis::X => self.lfo_x.scope(),
            Axis::Y => self.lfo_y.scope(),
        }
    }

    /// Effective pad position handle for thumb rendering.
    pub fn pad_position(&self) -> Arc<PadPosition> {
        Arc::clone(&self.position)
    }

    /// Force both oscillators into lockstep, as triggered from the UI.
    pub fn sync_lfo_phases(&mut self) {
        self.lfo_x.reset_phase();
        let phase = self.lfo_x.phase();
        self.lfo_y.sync_phase_to(phase);
    }

    pub fn current_gain(&self) -> f32 {
        self.auto_gain.current_gain()
    }

    /// Process one block in place. Block length must not exceed the
    /// prepared maximum; channels beyond the prepared count are ignored.
    pub fn process(
        &mut self,
        params: &Params,
        transport: &Transport,
        buffers: &mut [&mut [f32]],
    ) {
        let num_channels = buffers.len().min(self.banks.len());
        if num_channels == 0 {
            return;
        }
        debug_assert!(buffers[0].len() <= self.lfo_offsets_x.len());
        let num_frames = buffers
            .iter()
            .map(|buffer| buffer.len())
            .min()
            .unwrap_or(0)
            .min(self.lfo_offsets_x.len());
        if num_frames == 0 {
            return;
        }

        // The mix target keeps tracking the parameter while bypassed, but
        // no smoother advances until the mix comes back up.
        let raw_mix = params.output_mix.load() * 0.01;
        self.mixer.set_target(raw_mix);
        if raw_mix < BYPASS_THRESHOLD {
            return;
        }

        let algorithms: [Algorithm; NUM_SLOTS] = [
            Algorithm::from(params.algorithm[Direction::Right as usize].load(Ordering::Relaxed)),
            Algorithm::from(params.algorithm[Direction::Top as usize].load(Ordering::Relaxed)),
            Algorithm::from(params.algorithm[Direction::Left as usize].load(Ordering::Relaxed)),
            Algorithm::from(params.algorithm[Direction::Bottom as usize].load(Ordering::Relaxed)),
        ];

        self.update_lfos(params, transport);

        let bypass_x = params.lfo_x.bypass.load(Ordering::Relaxed);
        let bypass_y = params.lfo_y.bypass.load(Ordering::Relaxed);

        // Evaluate the oscillators once per sample; every channel reuses
        // the same offsets.
        for (offset_x, offset_y) in self
            .lfo_offsets_x
            .iter_mut()
            .zip(self.lfo_offsets_y.iter_mut())
            .take(num_frames)
        {
            *offset_x = if bypass_x {
                0.0
            } else {
                self.lfo_x.process_modulation()
            };
            *offset_y = if bypass_y {
                0.0
            } else {
                self.lfo_y.process_modulation()
            };
        }

        let drive_db = params.drive.load();
        for bank in self.banks.iter_mut().take(num_channels) {
            bank.set_parameters(drive_db, 0.0);
        }

        let base_x = params.xy_x.load().clamp(0.0, 1.0);
        let base_y = params.xy_y.load().clamp(0.0, 1.0);

        for i in 0..num_frames {
            one_pole(&mut self.smoothed_x, base_x, self.position_coefficient);
            one_pole(&mut self.smoothed_y, base_y, self.position_coefficient);

            let effective_x = (self.smoothed_x + self.lfo_offsets_x[i]).clamp(0.0, 1.0);
            let effective_y = (self.smoothed_y + self.lfo_offsets_y[i]).clamp(0.0, 1.0);
            self.position.store(effective_x, effective_y);

            let weights = self.blend.step(effective_x, effective_y);
            let mix = self.mixer.next();

            for (bank, buffer) in self
                .banks
                .iter_mut()
                .zip(buffers.iter_mut())
                .take(num_channels)
            {
                let dry = buffer[i];
                let blended = 0.25
                    * (weights.right * bank.process_sample(algorithms[0], dry)
                        + weights.top * bank.process_sample(algorithms[1], dry)
                        + weights.left * bank.process_sample(algorithms[2], dry)
                        + weights.bottom * bank.process_sample(algorithms[3], dry));

                buffer[i] = DryWetMixer::blend(dry, blended, mix);
            }
        }

        self.auto_gain.process(raw_mix, &mut buffers[..num_channels]);
    }

    fn update_lfos(&mut self, params: &Params, transport: &Transport) {
        let sync_x = params.lfo_x.sync.load(Ordering::Relaxed);
        let sync_y = params.lfo_y.sync.load(Ordering::Relaxed);

        // Phases reset only on a sync-state transition. When both axes
        // engage sync in the same block they restart in lockstep.
        if sync_x != self.previous_sync_x || sync_y != self.previous_sync_y {
            if sync_x && sync_y {
                self.sync_lfo_phases();
            } else if sync_x {
                self.lfo_x.reset_phase();
            } else if sync_y {
                self.lfo_y.reset_phase();
            }
            self.previous_sync_x = sync_x;
            self.previous_sync_y = sync_y;
        }

        let bpm = transport.effective_bpm();

        if sync_x {
            self.lfo_x
                .set_sync_frequency(bpm, params.lfo_x.note_division.load(Ordering::Relaxed));
        } else {
            self.lfo_x.set_frequency(params.lfo_x.rate.load());
        }
        if sync_y {
            self.lfo_y
                .set_sync_frequency(bpm, params.lfo_y.note_division.load(Ordering::Relaxed));
        } else {
            self.lfo_y.set_frequency(params.lfo_y.rate.load());
        }

        self.lfo_x.set_depth(params.lfo_x.depth.load());
        self.lfo_y.set_depth(params.lfo_y.depth.load());
        self.lfo_x
            .set_shape(LfoShape::from(params.lfo_x.shape.load(Ordering::Relaxed)));
        self.lfo_y
            .set_shape(LfoShape::from(params.lfo_y.shape.load(Ordering::Relaxed)));
    }
}
