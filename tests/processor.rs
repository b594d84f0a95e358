//! End-to-end tests for the block processor

mod wav_writer;

use quadrant_dsp::auto_gain::AutoGain;
use quadrant_dsp::params::{Params, Transport};
use quadrant_dsp::processor::Processor;
use quadrant_dsp::shaper::clip::SoftClip;
use quadrant_dsp::shaper::Waveshaper;
use quadrant_dsp::Axis;

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZE: usize = 512;

fn test_tone(n: usize) -> f32 {
    (core::f32::consts::TAU * n as f32 * 110.0 / SAMPLE_RATE).sin() * 0.5
}

#[test]
fn zero_mix_bypasses_the_block() {
    let params = Params::new();
    params.load_field("OutputMix", 0.0);

    let mut processor = Processor::new();
    processor.prepare(&params, SAMPLE_RATE, BLOCK_SIZE, 2);

    let mut left = [0.0f32; BLOCK_SIZE];
    let mut right = [0.0f32; BLOCK_SIZE];
    for n in 0..BLOCK_SIZE {
        left[n] = test_tone(n);
        right[n] = -test_tone(n);
    }
    let reference_left = left;
    let reference_right = right;

    let mut buffers = [&mut left[..], &mut right[..]];
    processor.process(&params, &Transport::default(), &mut buffers);

    assert_eq!(left, reference_left);
    assert_eq!(right, reference_right);
}

#[test]
fn center_blend_collapses_to_one_algorithm() {
    // Dead center with four identical slots: the equal weights cancel the
    // blending and only the structural 1/4 scale remains.
    let params = Params::new();
    params.load_field("LFO_X_Depth", 0.0);
    params.load_field("LFO_Y_Depth", 0.0);

    let mut processor = Processor::new();
    processor.prepare(&params, SAMPLE_RATE, BLOCK_SIZE, 2);

    let mut left = [0.0f32; BLOCK_SIZE];
    let mut right = [0.0f32; BLOCK_SIZE];
    left[0] = 1.0;
    right[0] = 1.0;

    let mut buffers = [&mut left[..], &mut right[..]];
    processor.process(&params, &Transport::default(), &mut buffers);

    let mut unit = SoftClip::new();
    unit.set_parameters(5.0, 0.0);
    let expected = 0.25 * unit.process_sample(1.0);

    assert!(
        (left[0] - expected).abs() < 1.0e-3,
        "impulse response {} differs from {expected}",
        left[0]
    );
    assert_eq!(left[0], right[0]);
}

#[test]
fn auto_gain_converges_to_the_loudness_reference() {
    let mut gain = AutoGain::new();
    gain.init(SAMPLE_RATE);

    // 0.25 peak sine: RMS 0.1768, desired makeup gain just under 4.
    let expected = 0.707 / (0.25 / 2.0_f32.sqrt());

    let blocks = (4.0 * SAMPLE_RATE / BLOCK_SIZE as f32) as usize;
    let mut n = 0usize;

    for _ in 0..blocks {
        let mut left = [0.0f32; BLOCK_SIZE];
        let mut right = [0.0f32; BLOCK_SIZE];
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let s = (core::f32::consts::TAU * n as f32 * 440.0 / SAMPLE_RATE).sin() * 0.25;
            *l = s;
            *r = s;
            n += 1;
        }

        let mut buffers = [&mut left[..], &mut right[..]];
        gain.process(1.0, &mut buffers);
    }

    let relative_error = (gain.current_gain() - expected).abs() / expected;
    assert!(
        relative_error < 0.01,
        "gain {} did not converge to {expected}",
        gain.current_gain()
    );
}

#[test]
fn auto_gain_skips_when_nearly_dry() {
    let mut gain = AutoGain::new();
    gain.init(SAMPLE_RATE);

    let mut samples = [0.5f32; BLOCK_SIZE];
    let reference = samples;
    let mut buffers = [&mut samples[..]];
    gain.process(0.005, &mut buffers);

    assert_eq!(samples, reference);
    assert_eq!(gain.current_gain(), 1.0);
}

#[test]
fn bypass_freezes_the_smoothers() {
    let params = Params::new();
    params.load_field("OutputMix", 0.0);
    params.load_field("LFO_X_Depth", 0.0);
    params.load_field("LFO_Y_Depth", 0.0);

    let mut processor = Processor::new();
    processor.prepare(&params, SAMPLE_RATE, BLOCK_SIZE, 2);
    let position = processor.pad_position();

    // Drag the pad while bypassed: nothing advances.
    params.load_field("XY_X", 1.0);
    for _ in 0..100 {
        let mut left = [0.1f32; BLOCK_SIZE];
        let mut right = [0.1f32; BLOCK_SIZE];
        let mut buffers = [&mut left[..], &mut right[..]];
        processor.process(&params, &Transport::default(), &mut buffers);
    }
    assert_eq!(position.get(), (0.5, 0.5));

    // Raising the mix resumes smoothing from the frozen state.
    params.load_field("OutputMix", 100.0);
    let mut left = [0.1f32; BLOCK_SIZE];
    let mut right = [0.1f32; BLOCK_SIZE];
    let mut buffers = [&mut left[..], &mut right[..]];
    processor.process(&params, &Transport::default(), &mut buffers);

    let (x, _) = position.get();
    assert!(x > 0.5 && x < 0.6, "position {x} should creep towards 1.0");
}

#[test]
fn stereo_channels_stay_identical_for_identical_input() {
    let params = Params::new();
    // Lo-fi on every slot exercises the held per-channel state.
    params.load_field("Distortion_Right", 15.0);
    params.load_field("Distortion_Top", 15.0);
    params.load_field("Distortion_Left", 15.0);
    params.load_field("Distortion_Bottom", 15.0);

    let mut processor = Processor::new();
    processor.prepare(&params, SAMPLE_RATE, BLOCK_SIZE, 2);

    for block in 0..8 {
        let mut left = [0.0f32; BLOCK_SIZE];
        let mut right = [0.0f32; BLOCK_SIZE];
        for n in 0..BLOCK_SIZE {
            left[n] = test_tone(block * BLOCK_SIZE + n);
            right[n] = left[n];
        }

        let mut buffers = [&mut left[..], &mut right[..]];
        processor.process(&params, &Transport::default(), &mut buffers);

        assert_eq!(left, right, "channels diverged in block {block}");
    }
}

#[test]
fn simultaneous_sync_runs_both_axes_in_lockstep() {
    let params = Params::new();
    params.load_field("LFO_X_NoteDivision", 3.0);
    params.load_field("LFO_Y_NoteDivision", 3.0);

    let mut processor = Processor::new();
    processor.prepare(&params, SAMPLE_RATE, BLOCK_SIZE, 2);

    // Run free for a while so the phases drift apart.
    params.load_field("LFO_X_Rate", 3.1);
    params.load_field("LFO_Y_Rate", 7.7);
    for _ in 0..16 {
        let mut left = [0.1f32; BLOCK_SIZE];
        let mut right = [0.1f32; BLOCK_SIZE];
        let mut buffers = [&mut left[..], &mut right[..]];
        processor.process(&params, &Transport::default(), &mut buffers);
    }

    // Engaging sync on both axes in the same block restarts them together.
    params.load_field("LFO_X_Sync", 1.0);
    params.load_field("LFO_Y_Sync", 1.0);
    let mut left = [0.1f32; BLOCK_SIZE];
    let mut right = [0.1f32; BLOCK_SIZE];
    let mut buffers = [&mut left[..], &mut right[..]];
    processor.process(&params, &Transport { bpm: 120.0, playing: true }, &mut buffers);

    let mut snapshot_x = [0.0f32; BLOCK_SIZE];
    let mut snapshot_y = [0.0f32; BLOCK_SIZE];
    processor.scope(Axis::X).snapshot(&mut snapshot_x);
    processor.scope(Axis::Y).snapshot(&mut snapshot_y);

    assert_eq!(snapshot_x, snapshot_y);
}

#[test]
fn invalid_prepare_is_rejected() {
    let params = Params::new();
    let mut processor = Processor::new();
    processor.prepare(&params, 0.0, BLOCK_SIZE, 2);

    let mut left = [0.3f32; BLOCK_SIZE];
    let reference = left;
    let mut buffers = [&mut left[..]];
    processor.process(&params, &Transport::default(), &mut buffers);

    assert_eq!(left, reference);
}

#[test]
fn modulated_sweep_renders() {
    let params = Params::new();
    params.load_field("Distortion_Right", 0.0);
    params.load_field("Distortion_Top", 10.0);
    params.load_field("Distortion_Left", 16.0);
    params.load_field("Distortion_Bottom", 13.0);
    params.load_field("LFO_X_Rate", 0.5);
    params.load_field("LFO_Y_Rate", 1.3);
    params.load_field("PostXYDrive", 7.0);

    let mut processor = Processor::new();
    processor.prepare(&params, SAMPLE_RATE, BLOCK_SIZE, 2);

    let blocks = (4.0 * SAMPLE_RATE / BLOCK_SIZE as f32) as usize;
    let mut wav_data = Vec::new();

    for block in 0..blocks {
        let mut left = [0.0f32; BLOCK_SIZE];
        let mut right = [0.0f32; BLOCK_SIZE];
        for n in 0..BLOCK_SIZE {
            left[n] = test_tone(block * BLOCK_SIZE + n);
            right[n] = left[n];
        }

        let mut buffers = [&mut left[..], &mut right[..]];
        processor.process(&params, &Transport::default(), &mut buffers);

        for sample in &left {
            assert!(sample.is_finite());
        }
        wav_data.extend_from_slice(&left);
    }

    wav_writer::write("processor/modulated_sweep.wav", SAMPLE_RATE, &wav_data).ok();
}
