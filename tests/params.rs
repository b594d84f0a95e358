//! Tests for the parameter store contract

use quadrant_dsp::params::{Params, Transport};

#[test]
fn fields_round_trip() {
    let source = Params::new();
    source.load_field("XY_X", 0.3);
    source.load_field("PostXYDrive", 8.5);
    source.load_field("LFO_Y_Sync", 1.0);
    source.load_field("LFO_Y_NoteDivision", 7.0);
    source.load_field("Distortion_Left", 12.0);

    let restored = Params::new();
    for (name, value) in source.save_fields() {
        assert!(restored.load_field(name, value), "unknown field {name}");
    }

    for ((name, a), (_, b)) in source.save_fields().into_iter().zip(restored.save_fields()) {
        assert_eq!(a, b, "field {name} did not round trip");
    }
}

#[test]
fn loads_are_clamped_into_range() {
    let params = Params::new();

    params.load_field("PostXYDrive", 99.0);
    assert_eq!(params.drive.load(), 10.0);

    params.load_field("OutputMix", -5.0);
    assert_eq!(params.output_mix.load(), 0.0);

    params.load_field("LFO_X_Rate", 0.0);
    assert_eq!(params.lfo_x.rate.load(), 0.1);

    params.load_field("Distortion_Top", 40.0);
    assert_eq!(
        params.algorithm[1].load(core::sync::atomic::Ordering::Relaxed),
        16
    );
}

#[test]
fn damaged_values_are_rejected() {
    let params = Params::new();

    assert!(!params.load_field("PostXYDrive", f32::NAN));
    assert_eq!(params.drive.load(), 5.0);

    assert!(!params.load_field("NoSuchParameter", 1.0));
}

#[test]
fn transport_falls_back_to_default_tempo() {
    assert_eq!(Transport { bpm: 0.0, playing: true }.effective_bpm(), 120.0);
    assert_eq!(Transport { bpm: -3.0, playing: false }.effective_bpm(), 120.0);
    assert_eq!(Transport { bpm: 98.0, playing: true }.effective_bpm(), 98.0);
}
