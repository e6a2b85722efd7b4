//! Confidence scoring shared by every stage.

/// Live forecasts with fewer yearly observations than this are flagged low-confidence.
pub const MIN_FORECAST_DATA_POINTS: usize = 5;

/// Step schedule over the amount of input a stage had to work with.
pub fn confidence(sample_size: usize) -> f64 {
    match sample_size {
        n if n >= 100 => 0.95,
        n if n >= 50 => 0.85,
        n if n >= 25 => 0.70,
        _ => 0.50,
    }
}

/// Returns `(confidence, low_confidence)` for a forecast.
///
/// Estimated forecasts are always low-confidence. Live series shorter than
/// [`MIN_FORECAST_DATA_POINTS`] drop below 0.7 and are flagged.
pub fn forecast_confidence(data_points: usize, live: bool) -> (f64, bool) {
    if !live {
        return (0.5, true);
    }
    if data_points >= MIN_FORECAST_DATA_POINTS {
        (0.9, false)
    } else {
        (0.6, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_boundaries() {
        assert_eq!(confidence(0), 0.50);
        assert_eq!(confidence(24), 0.50);
        assert_eq!(confidence(25), 0.70);
        assert_eq!(confidence(49), 0.70);
        assert_eq!(confidence(50), 0.85);
        assert_eq!(confidence(99), 0.85);
        assert_eq!(confidence(100), 0.95);
        assert_eq!(confidence(10_000), 0.95);
    }

    #[test]
    fn test_confidence_is_monotonic() {
        let mut previous = confidence(0);
        for n in 1..=500 {
            let current = confidence(n);
            assert!(current >= previous, "confidence dropped at n={n}");
            previous = current;
        }
    }

    #[test]
    fn test_forecast_confidence_short_series_is_flagged() {
        let (score, low) = forecast_confidence(3, true);
        assert!(score < 0.7);
        assert!(low);

        let (score, low) = forecast_confidence(5, true);
        assert!(score >= 0.7);
        assert!(!low);
    }

    #[test]
    fn test_forecast_confidence_estimated_always_flagged() {
        let (score, low) = forecast_confidence(11, false);
        assert!(score < 0.7);
        assert!(low);
    }
}
