//! Tests for the pad blend engine

use quadrant_dsp::blend::{target_weights, BlendEngine, BlendWeights};

const SAMPLE_RATE: f32 = 48000.0;

#[test]
fn target_weights_are_normalized_everywhere() {
    for xi in 0..=20 {
        for yi in 0..=20 {
            let x = xi as f32 / 20.0;
            let y = yi as f32 / 20.0;
            let weights = target_weights(x, y);

            assert!(
                (weights.sum() - 1.0).abs() < 1.0e-5,
                "weights at ({x}, {y}) sum to {}",
                weights.sum()
            );
            for w in [weights.right, weights.top, weights.left, weights.bottom] {
                assert!(w >= 0.0, "negative weight at ({x}, {y})");
            }
        }
    }
}

#[test]
fn center_is_an_even_split() {
    let weights = target_weights(0.5, 0.5);

    for w in [weights.right, weights.top, weights.left, weights.bottom] {
        assert!((w - 0.25).abs() < 1.0e-6, "center weight {w} != 0.25");
    }
}

#[test]
fn cardinal_positions_favor_their_slot() {
    let dominant = |weights: BlendWeights| {
        let all = [weights.right, weights.top, weights.left, weights.bottom];
        let mut best = 0;
        for (n, w) in all.iter().enumerate() {
            if *w > all[best] {
                best = n;
            }
        }
        best
    };

    // The vertical axis is in screen coordinates: y = 0 is the top edge.
    assert_eq!(dominant(target_weights(1.0, 0.5)), 0, "right edge");
    assert_eq!(dominant(target_weights(0.5, 0.0)), 1, "top edge");
    assert_eq!(dominant(target_weights(0.0, 0.5)), 2, "left edge");
    assert_eq!(dominant(target_weights(0.5, 1.0)), 3, "bottom edge");
}

#[test]
fn radius_fades_toward_even_split() {
    // Halfway out to the right edge the right slot leads, but less than at
    // the edge itself.
    let mid = target_weights(0.75, 0.5);
    let edge = target_weights(1.0, 0.5);

    assert!(mid.right > 0.25);
    assert!(edge.right > mid.right);
}

#[test]
fn smoothed_weights_lag_their_target() {
    let mut engine = BlendEngine::new();
    engine.init(SAMPLE_RATE);

    let target = target_weights(1.0, 0.5);

    let first = engine.step(1.0, 0.5);
    assert!(
        first.right < target.right,
        "smoothed weight jumped straight to its target"
    );

    // ~0.3 s time constant: two seconds of stepping converge closely.
    let mut current = first;
    for _ in 0..2 * SAMPLE_RATE as usize {
        current = engine.step(1.0, 0.5);
    }
    assert!((current.right - target.right).abs() < 1.0e-2);
    assert!((current.sum() - 1.0).abs() < 1.0e-2);
}

#[test]
fn engine_starts_from_even_split() {
    let engine = BlendEngine::new();
    assert_eq!(engine.weights(), BlendWeights::CENTER);
}
