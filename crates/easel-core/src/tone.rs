//! Exposure and contrast tone adjustments.
//!
//! Both operations are pure per-pixel transforms over normalized RGB
//! channels and clamp their output into [0, 1]. When both apply, exposure
//! runs before contrast (the pipeline order).

/// Apply exposure adjustment.
///
/// Exposure is measured in stops; each stop doubles or halves the
/// brightness.
///
/// Formula: `output = input * 2^exposure`
#[inline]
pub fn apply_exposure(r: f32, g: f32, b: f32, exposure: f32) -> (f32, f32, f32) {
    if exposure == 0.0 {
        return (r, g, b);
    }
    let multiplier = 2.0_f32.powf(exposure);
    (
        (r * multiplier).clamp(0.0, 1.0),
        (g * multiplier).clamp(0.0, 1.0),
        (b * multiplier).clamp(0.0, 1.0),
    )
}

/// Apply contrast adjustment.
///
/// Positive values push channels away from mid-gray, negative values pull
/// them toward it. At -1 every channel collapses to 0.5.
///
/// Formula: `output = (input - 0.5) * (1 + contrast) + 0.5`
#[inline]
pub fn apply_contrast(r: f32, g: f32, b: f32, contrast: f32) -> (f32, f32, f32) {
    if contrast == 0.0 {
        return (r, g, b);
    }
    let factor = 1.0 + contrast;
    let midpoint = 0.5;
    (
        ((r - midpoint) * factor + midpoint).clamp(0.0, 1.0),
        ((g - midpoint) * factor + midpoint).clamp(0.0, 1.0),
        ((b - midpoint) * factor + midpoint).clamp(0.0, 1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exposure_identity() {
        assert_eq!(apply_exposure(0.3, 0.5, 0.7, 0.0), (0.3, 0.5, 0.7));
    }

    #[test]
    fn test_exposure_one_stop_doubles() {
        let (r, g, b) = apply_exposure(0.25, 0.25, 0.25, 1.0);
        assert!((r - 0.5).abs() < 1e-6);
        assert!((g - 0.5).abs() < 1e-6);
        assert!((b - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_exposure_negative_one_stop_halves() {
        let (r, _, _) = apply_exposure(0.5, 0.5, 0.5, -1.0);
        assert!((r - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_exposure_clips_at_white() {
        assert_eq!(apply_exposure(0.8, 0.8, 0.8, 2.0), (1.0, 1.0, 1.0));
    }

    #[test]
    fn test_contrast_identity() {
        assert_eq!(apply_contrast(0.3, 0.5, 0.7, 0.0), (0.3, 0.5, 0.7));
    }

    #[test]
    fn test_contrast_positive_spreads_from_midpoint() {
        let (r, g, b) = apply_contrast(0.25, 0.5, 0.75, 1.0);
        assert!(r < 0.25, "dark channel should get darker");
        assert!((g - 0.5).abs() < 1e-6, "midpoint stays put");
        assert!(b > 0.75, "bright channel should get brighter");
    }

    #[test]
    fn test_contrast_negative_collapses_to_gray() {
        let (r, g, b) = apply_contrast(0.0, 0.5, 1.0, -1.0);
        assert_eq!((r, g, b), (0.5, 0.5, 0.5));
    }

    #[test]
    fn test_contrast_clamps() {
        let (r, _, b) = apply_contrast(0.0, 0.5, 1.0, 1.0);
        assert_eq!(r, 0.0);
        assert_eq!(b, 1.0);
    }

    #[test]
    fn test_extremes_stay_finite_and_in_range() {
        let colors = [
            (0.0, 0.0, 0.0),
            (1.0, 1.0, 1.0),
            (1.0, 0.0, 0.0),
            (0.0, 1.0, 0.0),
            (0.0, 0.0, 1.0),
        ];
        for (r, g, b) in colors {
            for exposure in [-2.0, 2.0] {
                for contrast in [-1.0, 1.0] {
                    let (r, g, b) = apply_exposure(r, g, b, exposure);
                    let (r, g, b) = apply_contrast(r, g, b, contrast);
                    for c in [r, g, b] {
                        assert!(c.is_finite());
                        assert!((0.0..=1.0).contains(&c));
                    }
                }
            }
        }
    }
}
