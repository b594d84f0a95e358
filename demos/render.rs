//! Renders a few seconds of processed audio to a WAV file.
//!
//! A low sawtooth-ish test tone runs through the engine while the pad is
//! modulated by both LFOs, sweeping between the four slot algorithms.

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use log::info;

use quadrant_dsp::params::{Params, Transport};
use quadrant_dsp::processor::Processor;

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZE: usize = 512;
const DURATION: f32 = 8.0;

fn main() {
    simple_logger::SimpleLogger::new().init().unwrap();

    let params = Params::new();
    params.load_field("Distortion_Right", 0.0); // soft clip
    params.load_field("Distortion_Top", 10.0); // bitcrusher
    params.load_field("Distortion_Left", 16.0); // wavefolder
    params.load_field("Distortion_Bottom", 13.0); // tube
    params.load_field("PostXYDrive", 6.0);
    params.load_field("LFO_X_Rate", 0.4);
    params.load_field("LFO_Y_Rate", 0.9);
    params.load_field("LFO_X_Depth", 1.0);
    params.load_field("LFO_Y_Depth", 1.0);

    let mut processor = Processor::new();
    processor.prepare(&params, SAMPLE_RATE, BLOCK_SIZE, 2);

    let transport = Transport::default();
    let mut left = [0.0f32; BLOCK_SIZE];
    let mut right = [0.0f32; BLOCK_SIZE];
    let mut frames = Vec::new();

    let blocks = (DURATION * SAMPLE_RATE / (BLOCK_SIZE as f32)) as usize;
    let mut phase = 0.0f32;

    for _ in 0..blocks {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            phase += 110.0 / SAMPLE_RATE;
            if phase >= 1.0 {
                phase -= 1.0;
            }
            let tone = 0.5 * (2.0 * phase - 1.0);
            *l = tone;
            *r = tone;
        }

        let mut buffers = [&mut left[..], &mut right[..]];
        processor.process(&params, &transport, &mut buffers);

        for (l, r) in left.iter().zip(right.iter()) {
            frames.push((*l, *r));
        }
    }

    let path = Path::new("out/render.wav");
    std::fs::create_dir_all(path.parent().unwrap()).ok();

    let spec = WavSpec {
        channels: 2,
        sample_rate: SAMPLE_RATE as u32,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for (l, r) in &frames {
        writer.write_sample(*l).unwrap();
        writer.write_sample(*r).unwrap();
    }
    writer.finalize().unwrap();

    info!("wrote {} frames to {}", frames.len(), path.display());
}
