//! RGB <-> HSV conversion and hue/saturation shifts.
//!
//! Hue is represented in [0, 1) turns rather than degrees: 0.0 is red, 1/3
//! is green, 2/3 is blue. Saturation and value are linear [0, 1]. Hue is
//! undefined for achromatic colors and defaults to 0 there.
//!
//! All functions are pure and, given finite inputs, never produce NaN or
//! infinity.

/// Convert an RGB color to HSV.
///
/// All channels are expected in [0, 1]. Returns (hue, saturation, value)
/// with hue in [0, 1) turns.
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let value = max;
    let saturation = if max > 0.0 { delta / max } else { 0.0 };

    if delta <= f32::EPSILON {
        // Achromatic: hue is undefined, default to 0.
        return (0.0, saturation, value);
    }

    let hue = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    } / 6.0;

    (hue.rem_euclid(1.0), saturation, value)
}

/// Convert an HSV color back to RGB.
///
/// Hue is in turns and is wrapped into [0, 1) before conversion; saturation
/// and value are expected in [0, 1]. Output channels are in [0, 1].
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let c = v * s;
    let h_prime = h.rem_euclid(1.0) * 6.0;
    let x = c * (1.0 - ((h_prime % 2.0) - 1.0).abs());

    let (r1, g1, b1) = if h_prime < 1.0 {
        (c, x, 0.0)
    } else if h_prime < 2.0 {
        (x, c, 0.0)
    } else if h_prime < 3.0 {
        (0.0, c, x)
    } else if h_prime < 4.0 {
        (0.0, x, c)
    } else if h_prime < 5.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    let m = v - c;
    (r1 + m, g1 + m, b1 + m)
}

/// Rotate the hue of an RGB color by the given number of degrees.
///
/// The shift wraps around the hue circle via euclidean modulo, so the
/// resulting hue is never negative. Gray inputs stay gray.
pub fn shift_hue(r: f32, g: f32, b: f32, degrees: f32) -> (f32, f32, f32) {
    let (h, s, v) = rgb_to_hsv(r, g, b);
    hsv_to_rgb((h + degrees / 360.0).rem_euclid(1.0), s, v)
}

/// Shift the saturation of an RGB color by an additive delta.
///
/// The resulting saturation is clamped into [0, 1]. Achromatic inputs are
/// returned unchanged: their hue is undefined, so there is no direction to
/// saturate toward.
pub fn shift_saturation(r: f32, g: f32, b: f32, delta: f32) -> (f32, f32, f32) {
    let (h, s, v) = rgb_to_hsv(r, g, b);
    if s <= f32::EPSILON {
        return (r, g, b);
    }
    hsv_to_rgb(h, (s + delta).clamp(0.0, 1.0), v)
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn channel_strategy() -> impl Strategy<Value = f32> {
        0.0f32..=1.0
    }

    proptest! {
        /// Property: RGB -> HSV -> RGB reproduces the input within 0.01.
        #[test]
        fn prop_round_trip(
            r in channel_strategy(),
            g in channel_strategy(),
            b in channel_strategy(),
        ) {
            let (h, s, v) = rgb_to_hsv(r, g, b);
            let (r2, g2, b2) = hsv_to_rgb(h, s, v);

            prop_assert!((r - r2).abs() <= 0.01);
            prop_assert!((g - g2).abs() <= 0.01);
            prop_assert!((b - b2).abs() <= 0.01);
        }

        /// Property: conversion outputs are always finite and in range.
        #[test]
        fn prop_hsv_components_in_range(
            r in channel_strategy(),
            g in channel_strategy(),
            b in channel_strategy(),
        ) {
            let (h, s, v) = rgb_to_hsv(r, g, b);

            prop_assert!((0.0..1.0).contains(&h), "hue {} out of [0,1)", h);
            prop_assert!((0.0..=1.0).contains(&s));
            prop_assert!((0.0..=1.0).contains(&v));
        }

        /// Property: hue and saturation shifts never produce NaN or values
        /// meaningfully outside [0, 1].
        #[test]
        fn prop_shifts_safe(
            r in channel_strategy(),
            g in channel_strategy(),
            b in channel_strategy(),
            degrees in -180.0f32..=180.0,
            delta in -1.0f32..=1.0,
        ) {
            let (r, g, b) = shift_hue(r, g, b, degrees);
            let (r, g, b) = shift_saturation(r, g, b, delta);

            for c in [r, g, b] {
                prop_assert!(c.is_finite());
                prop_assert!((-0.001..=1.001).contains(&c));
            }
        }

        /// Property: a hue shift preserves value exactly and keeps gray gray.
        #[test]
        fn prop_hue_shift_preserves_value(
            r in channel_strategy(),
            g in channel_strategy(),
            b in channel_strategy(),
            degrees in -180.0f32..=180.0,
        ) {
            let before = rgb_to_hsv(r, g, b).2;
            let (r2, g2, b2) = shift_hue(r, g, b, degrees);
            let after = rgb_to_hsv(r2, g2, b2).2;

            prop_assert!((before - after).abs() <= 0.01);
        }
    }
}
