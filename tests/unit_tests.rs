//! Unit-level tests against hand-checked fixtures.
//!
//! The fixtures are the textbook 2-2-1 network's values: a unit with
//! weights {0.5, 0.4} and threshold 0.8, and an output unit with
//! weights {-1.2, 1.1} and threshold 0.3. Expected values are asserted
//! to four decimal places.

use approx::assert_abs_diff_eq;
use bpn::{Activation, Unit};
use rand::rngs::StdRng;
use rand::SeedableRng;

const EPS: f64 = 1e-4;

fn hidden_unit() -> Unit {
    Unit::with_weights(vec![0.5, 0.4], 0.8)
}

fn output_unit() -> Unit {
    Unit::with_weights(vec![-1.2, 1.1], 0.3)
}

// ============================================================================
// Activation
// ============================================================================

#[test]
fn sigmoid_activation() {
    let mut unit = hidden_unit();
    let output = unit.activate(&[1.0, 1.0], Activation::Sigmoid).unwrap();
    assert_abs_diff_eq!(output, 0.5250, epsilon = EPS);
    assert_abs_diff_eq!(unit.output(), 0.5250, epsilon = EPS);
}

#[test]
fn scaled_tanh_activation() {
    let mut unit = hidden_unit();
    let output = unit.activate(&[1.0, 1.0], Activation::ScaledTanh).unwrap();
    assert_abs_diff_eq!(output, 0.0572, epsilon = EPS);
}

#[test]
fn sigmoid_activation_with_zero_input() {
    let mut unit = hidden_unit();
    let output = unit.activate(&[1.0, 0.0], Activation::Sigmoid).unwrap();
    assert_abs_diff_eq!(output, 0.4256, epsilon = EPS);
}

#[test]
fn activation_stores_inputs() {
    let mut unit = output_unit();
    unit.activate(&[0.5250, 0.8808], Activation::Sigmoid).unwrap();
    assert_eq!(unit.inputs(), vec![0.5250, 0.8808]);
}

// ============================================================================
// Error and gradients
// ============================================================================

#[test]
fn calc_error_scaled_tanh() {
    let mut unit = output_unit();
    unit.activate(&[0.0, 1.0], Activation::ScaledTanh).unwrap();
    unit.calc_error(0.9);
    assert_abs_diff_eq!(unit.output_error(), 0.4529, epsilon = EPS);
}

#[test]
fn calc_error_sigmoid() {
    let mut unit = output_unit();
    unit.activate(&[0.5250, 0.8808], Activation::Sigmoid).unwrap();
    unit.calc_error(0.0);
    assert_abs_diff_eq!(unit.output_error(), -0.5097, epsilon = EPS);
}

#[test]
fn sigmoid_output_gradient() {
    let mut unit = output_unit();
    unit.activate(&[0.5250, 0.8808], Activation::Sigmoid).unwrap();
    unit.calc_error(0.0);
    let gradient = unit.output_gradient(Activation::Sigmoid);
    assert_abs_diff_eq!(gradient, -0.1274, epsilon = EPS);
}

#[test]
fn scaled_tanh_output_gradient() {
    let mut unit = output_unit();
    unit.activate(&[0.5250, 0.8808], Activation::ScaledTanh)
        .unwrap();
    unit.calc_error(0.0);
    let gradient = unit.output_gradient(Activation::ScaledTanh);
    assert_abs_diff_eq!(gradient, -0.0127, epsilon = EPS);
}

#[test]
fn sigmoid_hidden_gradient() {
    let mut unit = hidden_unit();
    unit.activate(&[1.0, 0.0], Activation::Sigmoid).unwrap();
    let gradient = unit
        .hidden_gradient(&[0.1254], &[-1.2], Activation::Sigmoid)
        .unwrap();
    assert_abs_diff_eq!(gradient, -0.0368, epsilon = EPS);
}

#[test]
fn scaled_tanh_hidden_gradient() {
    let mut unit = hidden_unit();
    unit.activate(&[1.0, 0.0], Activation::ScaledTanh).unwrap();
    let gradient = unit
        .hidden_gradient(&[0.1254], &[-1.2], Activation::ScaledTanh)
        .unwrap();
    assert_abs_diff_eq!(gradient, -0.0852, epsilon = EPS);
}

// ============================================================================
// Weight correction
// ============================================================================

#[test]
fn weight_correction_skips_zero_inputs() {
    let mut unit = hidden_unit();
    unit.activate(&[1.0, 0.0], Activation::Sigmoid).unwrap();
    let gradient = unit
        .hidden_gradient(&[0.1254], &[-1.2], Activation::Sigmoid)
        .unwrap();
    unit.weight_correction(0.1, 0.0, gradient).unwrap();

    let weights = unit.weights();
    assert_abs_diff_eq!(weights[0], 0.4963, epsilon = EPS);
    // The second connection's input was 0, so its weight must not move.
    assert_abs_diff_eq!(weights[1], 0.4, epsilon = EPS);
    assert_abs_diff_eq!(unit.threshold(), 0.8037, epsilon = EPS);
}

#[test]
fn weight_correction_carries_momentum() {
    let mut unit = hidden_unit();
    unit.activate(&[1.0, 0.0], Activation::Sigmoid).unwrap();

    // First update: delta = 0.1 * 1.0 * 0.1 = 0.01.
    unit.weight_correction(0.1, 0.9, 0.1).unwrap();
    assert_abs_diff_eq!(unit.weights()[0], 0.51, epsilon = 1e-9);
    assert_abs_diff_eq!(unit.threshold(), 0.79, epsilon = 1e-9);

    // Second update blends the remembered delta: 0.9 * 0.01 + 0.01.
    unit.weight_correction(0.1, 0.9, 0.1).unwrap();
    assert_abs_diff_eq!(unit.weights()[0], 0.529, epsilon = 1e-9);
    assert_abs_diff_eq!(unit.threshold(), 0.771, epsilon = 1e-9);
}

// ============================================================================
// Dimension validation
// ============================================================================

#[test]
fn activation_rejects_wrong_width_without_mutating() {
    let mut unit = hidden_unit();
    unit.activate(&[1.0, 1.0], Activation::Sigmoid).unwrap();
    let before_output = unit.output();
    let before_inputs = unit.inputs();

    let err = unit.activate(&[1.0, 1.0, 1.0], Activation::Sigmoid);
    assert!(err.is_err());
    assert_eq!(unit.output(), before_output);
    assert_eq!(unit.inputs(), before_inputs);
}

#[test]
fn hidden_gradient_rejects_uneven_collections() {
    let mut unit = hidden_unit();
    unit.activate(&[1.0, 0.0], Activation::Sigmoid).unwrap();
    let result = unit.hidden_gradient(&[0.1, 0.2], &[-1.2], Activation::Sigmoid);
    assert!(result.is_err());
}

// ============================================================================
// Initialization
// ============================================================================

#[test]
fn random_units_draw_from_unit_interval() {
    let mut rng = StdRng::seed_from_u64(9999);
    let unit = Unit::random(5, &mut rng);
    assert_eq!(unit.fan_in(), 5);
    assert!(unit.weights().iter().all(|w| (-1.0..1.0).contains(w)));
    assert!((-1.0..1.0).contains(&unit.threshold()));
    assert_eq!(unit.output(), 0.0);
    assert_eq!(unit.output_error(), 0.0);
}

#[test]
fn same_seed_same_unit() {
    let mut a = StdRng::seed_from_u64(9999);
    let mut b = StdRng::seed_from_u64(9999);
    let unit_a = Unit::random(3, &mut a);
    let unit_b = Unit::random(3, &mut b);
    assert_eq!(unit_a.weights(), unit_b.weights());
    assert_eq!(unit_a.threshold(), unit_b.threshold());
}

#[test]
fn reinitialization_continues_the_draw_sequence() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut unit = Unit::random(2, &mut rng);
    let first_weights = unit.weights();

    unit.init_weights(&mut rng);
    assert_ne!(unit.weights(), first_weights);

    // A fresh generator with the same seed replays both draws.
    let mut replay = StdRng::seed_from_u64(7);
    let mut other = Unit::random(2, &mut replay);
    other.init_weights(&mut replay);
    assert_eq!(unit.weights(), other.weights());
}

// ============================================================================
// Accessors
// ============================================================================

#[test]
fn setters_replace_values() {
    let mut unit = hidden_unit();
    unit.set_weight(0, 0.1984);
    assert_eq!(unit.weight(0), 0.1984);

    unit.set_weights(&[0.1984, -0.6581]);
    assert_eq!(unit.weights(), vec![0.1984, -0.6581]);

    unit.set_threshold(0.0231);
    assert_eq!(unit.threshold(), 0.0231);
}

#[test]
fn display_renders_four_decimals() {
    let mut unit = output_unit();
    unit.activate(&[0.5250, 0.8808], Activation::Sigmoid).unwrap();
    unit.calc_error(0.0);
    let text = unit.to_string();
    assert!(text.contains("-1.2000"), "unexpected display: {text}");
    assert!(text.contains("0.5097"), "unexpected display: {text}");
}
