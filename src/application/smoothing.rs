// Smoothing engine - moving average and minute-axis labels

/// Ticks per minute of wall-clock simulation time (60 ticks/s, 60 s/min).
const TICKS_PER_MINUTE_AXIS: f64 = 3600.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Smoothed {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

pub fn ticks_to_minutes(tick: f64) -> f64 {
    tick / TICKS_PER_MINUTE_AXIS
}

/// Centered moving average over `y`.
///
/// Each window `y[i..i + window]` yields its mean paired with
/// `x[i + window / 2]`. Inputs are returned unchanged unless `window > 1` and
/// the series holds at least two windows worth of values.
pub fn smooth(x: &[f64], y: &[f64], window: usize) -> Smoothed {
    let y = &y[..y.len().min(x.len())];

    if window <= 1 || y.len() / 2 < window {
        return Smoothed {
            x: x.to_vec(),
            y: y.to_vec(),
        };
    }

    let center = window / 2;
    let (smoothed_x, smoothed_y): (Vec<f64>, Vec<f64>) = y
        .windows(window)
        .enumerate()
        .map(|(i, values)| (x[i + center], values.iter().sum::<f64>() / window as f64))
        .unzip();

    tracing::debug!("Smoothed {} points down to {}", y.len(), smoothed_y.len());
    Smoothed {
        x: smoothed_x,
        y: smoothed_y,
    }
}

/// Axis labels in minutes for a series sampled every `interval` ticks over
/// `length` ticks.
pub fn get_labels(interval: u64, length: u64) -> Vec<f64> {
    if interval == 0 || length == 0 {
        return Vec::new();
    }

    let mut ticks: Vec<u64> = (0..length).step_by(interval as usize).collect();
    if let Some(last) = ticks.last_mut() {
        *last = (*last).min(length);
    }

    let mut minutes: Vec<f64> = ticks
        .into_iter()
        .map(|tick| ticks_to_minutes(tick as f64))
        .collect();
    minutes.sort_by(f64::total_cmp);
    minutes
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_smooth_window_of_three() {
        let result = smooth(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3);
        assert_eq!(result.x, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(result.y, vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_smooth_even_window_uses_center_left() {
        let x: Vec<f64> = (0..8).map(f64::from).collect();
        let y = vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0];
        let result = smooth(&x, &y, 4);
        assert_eq!(result.y.len(), 5);
        assert_eq!(result.x[0], 2.0);
        assert_relative_eq!(result.y[0], 3.0);
    }

    #[test]
    fn test_smooth_identity_cases() {
        let x = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let y = vec![5.0, 1.0, 4.0, 2.0, 3.0];

        let unit = smooth(&x, &y, 1);
        assert_eq!((unit.x, unit.y), (x.clone(), y.clone()));

        // 5 / 2 < 3
        let too_wide = smooth(&x, &y, 3);
        assert_eq!((too_wide.x, too_wide.y), (x.clone(), y.clone()));

        let zero = smooth(&x, &y, 0);
        assert_eq!(zero.y, y);
    }

    #[test]
    fn test_smooth_huge_window_returns_inputs() {
        let result = smooth(&[0.0, 1.0], &[1.0, 2.0], usize::MAX);
        assert_eq!(result.x, vec![0.0, 1.0]);
        assert_eq!(result.y, vec![1.0, 2.0]);
    }

    #[test]
    fn test_smooth_truncates_to_shorter_x() {
        let result = smooth(&[0.0, 1.0, 2.0, 3.0], &[1.0, 1.0, 1.0, 1.0, 9.0, 9.0], 2);
        assert_eq!(result.y, vec![1.0, 1.0, 1.0]);
        assert_eq!(result.x, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_get_labels() {
        let labels = get_labels(60, 180);
        assert_eq!(labels.len(), 3);
        assert_relative_eq!(labels[0], 0.0);
        assert_relative_eq!(labels[1], 60.0 / 3600.0);
        assert_relative_eq!(labels[2], 120.0 / 3600.0);
    }

    #[test]
    fn test_get_labels_uneven_length() {
        let labels = get_labels(3600, 8000);
        assert_eq!(labels, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_get_labels_empty_inputs() {
        assert!(get_labels(0, 180).is_empty());
        assert!(get_labels(60, 0).is_empty());
    }
}
