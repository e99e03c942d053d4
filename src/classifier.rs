use std::f32::consts::PI;

use rand::Rng;
use rand_distr::StandardNormal;

use crate::types::{Classification, ClassifyError, QualityClass, SignalStats};

/// Number of samples in one analysis window.
pub const SIGNAL_POINTS: usize = 128;

// Guards the distortion ratio against division by zero when the mean is ~0.
const MEAN_EPSILON: f32 = 1e-6;

const JITTER_SPAN: f32 = 0.05;
const CONFIDENCE_FLOOR: f32 = 0.5;
const CONFIDENCE_CEILING: f32 = 0.99;

/// Classifies a 128-point signal window and perturbs the base confidence
/// with uniform jitter drawn from `rng`.
pub fn classify<R: Rng>(data: &[f32], rng: &mut R) -> Result<Classification, ClassifyError> {
    let (class, base_confidence) = evaluate(data)?;
    let jitter = rng.gen_range(-JITTER_SPAN..=JITTER_SPAN);
    let confidence = (base_confidence + jitter).clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING);

    Ok(Classification { class, confidence })
}

/// Deterministic core of the classifier: statistics plus threshold rules,
/// no randomness involved. Same input always yields the same class and
/// base confidence.
pub fn evaluate(data: &[f32]) -> Result<(QualityClass, f32), ClassifyError> {
    if data.len() != SIGNAL_POINTS {
        return Err(ClassifyError::InvalidLength {
            expected: SIGNAL_POINTS,
            actual: data.len(),
        });
    }

    let stats = compute_stats(data);
    Ok(grade(&stats))
}

/// Mean, population standard deviation, min/max, and the std-to-mean
/// distortion ratio used as a stand-in for THD. A real analyzer would run
/// an FFT here.
pub fn compute_stats(data: &[f32]) -> SignalStats {
    let count = data.len() as f32;
    let mean = data.iter().sum::<f32>() / count;
    let variance = data
        .iter()
        .map(|value| (value - mean) * (value - mean))
        .sum::<f32>()
        / count;
    let std_dev = variance.sqrt();

    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &value in data {
        if value < min {
            min = value;
        }
        if value > max {
            max = value;
        }
    }

    SignalStats {
        mean,
        std_dev,
        min,
        max,
        distortion_ratio: std_dev / (mean + MEAN_EPSILON),
    }
}

// Ordered threshold rules, first match wins. A clean signal sits close to a
// unit mean with low distortion.
fn grade(stats: &SignalStats) -> (QualityClass, f32) {
    let mean_offset = (stats.mean - 1.0).abs();

    if stats.distortion_ratio < 0.05 && mean_offset < 0.1 {
        (QualityClass::VeryGood, 0.95)
    } else if stats.distortion_ratio < 0.1 && mean_offset < 0.2 {
        (QualityClass::Good, 0.85)
    } else if stats.distortion_ratio < 0.2 && mean_offset < 0.3 {
        (QualityClass::Average, 0.75)
    } else {
        (QualityClass::Poor, 0.7)
    }
}

/// Generates a synthetic test window: one sine sweep over [0, 4π] with
/// Gaussian noise at `noise_scale`, min-max normalized to [0, 1].
pub fn generate_sample<R: Rng>(noise_scale: f32, rng: &mut R) -> Vec<f32> {
    let step = 4.0 * PI / (SIGNAL_POINTS as f32 - 1.0);
    let mut signal: Vec<f32> = (0..SIGNAL_POINTS)
        .map(|index| {
            let noise: f32 = rng.sample(StandardNormal);
            (index as f32 * step).sin() + noise_scale * noise
        })
        .collect();

    min_max_normalize(&mut signal);
    signal
}

// Rescales the window to span exactly [0, 1]. A flat window maps to all
// zeros instead of dividing by zero.
fn min_max_normalize(signal: &mut [f32]) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &value in signal.iter() {
        if value < min {
            min = value;
        }
        if value > max {
            max = value;
        }
    }

    let range = max - min;
    if range <= f32::EPSILON {
        for value in signal.iter_mut() {
            *value = 0.0;
        }
        return;
    }

    for value in signal.iter_mut() {
        *value = (*value - min) / range;
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn split_window(low: f32, high: f32) -> Vec<f32> {
        let mut window = vec![low; SIGNAL_POINTS / 2];
        window.extend(vec![high; SIGNAL_POINTS / 2]);
        window
    }

    #[test]
    fn unit_signal_grades_very_good() {
        let window = vec![1.0; SIGNAL_POINTS];
        let (class, base) = evaluate(&window).unwrap();
        assert_eq!(class, QualityClass::VeryGood);
        assert_eq!(base, 0.95);
    }

    #[test]
    fn zero_signal_falls_through_to_poor() {
        let window = vec![0.0; SIGNAL_POINTS];
        let stats = compute_stats(&window);
        assert_eq!(stats.distortion_ratio, 0.0);

        let (class, base) = evaluate(&window).unwrap();
        assert_eq!(class, QualityClass::Poor);
        assert_eq!(base, 0.7);
    }

    #[test]
    fn moderate_distortion_grades_good() {
        // mean 1.0, population std dev 0.07 -> ratio just under 0.1
        let window = split_window(0.93, 1.07);
        let (class, base) = evaluate(&window).unwrap();
        assert_eq!(class, QualityClass::Good);
        assert_eq!(base, 0.85);
    }

    #[test]
    fn heavy_distortion_grades_average() {
        // mean 1.0, population std dev 0.15
        let window = split_window(0.85, 1.15);
        let (class, base) = evaluate(&window).unwrap();
        assert_eq!(class, QualityClass::Average);
        assert_eq!(base, 0.75);
    }

    #[test]
    fn severe_distortion_grades_poor() {
        // mean 1.0, population std dev 0.3 -> past the last threshold
        let window = split_window(0.7, 1.3);
        let (class, base) = evaluate(&window).unwrap();
        assert_eq!(class, QualityClass::Poor);
        assert_eq!(base, 0.7);
    }

    #[test]
    fn short_window_is_rejected_with_observed_length() {
        let window = vec![0.5; 127];
        let error = evaluate(&window).unwrap_err();
        match error {
            ClassifyError::InvalidLength { expected, actual } => {
                assert_eq!(expected, SIGNAL_POINTS);
                assert_eq!(actual, 127);
            }
        }
    }

    #[test]
    fn evaluate_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        let window = generate_sample(0.1, &mut rng);
        let first = evaluate(&window).unwrap();
        let second = evaluate(&window).unwrap();
        assert_eq!(first.0, second.0);
        assert_eq!(first.1, second.1);
    }

    #[test]
    fn confidence_stays_within_bounds() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let window = generate_sample(0.1, &mut rng);
            let result = classify(&window, &mut rng).unwrap();
            assert!(result.class.as_id() <= 3);
            assert!(result.confidence >= CONFIDENCE_FLOOR);
            assert!(result.confidence <= CONFIDENCE_CEILING);
        }
    }

    #[test]
    fn jitter_stays_within_half_band_of_base() {
        let window = vec![1.0; SIGNAL_POINTS];
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = classify(&window, &mut rng).unwrap();
            assert_eq!(result.class, QualityClass::VeryGood);
            assert!((result.confidence - 0.95).abs() <= JITTER_SPAN + 1e-6);
        }
    }

    #[test]
    fn generated_sample_spans_unit_interval() {
        let mut rng = StdRng::seed_from_u64(42);
        let sample = generate_sample(0.1, &mut rng);
        assert_eq!(sample.len(), SIGNAL_POINTS);

        let min = sample.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = sample.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(min, 0.0);
        assert_eq!(max, 1.0);
        assert!(sample.iter().all(|value| (0.0..=1.0).contains(value)));
    }

    #[test]
    fn generated_sample_classifies_without_error() {
        let mut rng = StdRng::seed_from_u64(3);
        let sample = generate_sample(0.1, &mut rng);
        assert!(classify(&sample, &mut rng).is_ok());
    }

    #[test]
    fn flat_window_normalizes_to_zeros() {
        let mut window = vec![0.25; SIGNAL_POINTS];
        min_max_normalize(&mut window);
        assert!(window.iter().all(|value| *value == 0.0));
    }
}
