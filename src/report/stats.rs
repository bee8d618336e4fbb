//! Summary statistics for a spread series.

/// `describe`-style summary of a value series.
#[derive(Debug, Clone)]
pub struct SpreadStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n-1 denominator).
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Compute summary statistics; `None` for an empty series.
pub fn describe(values: &[f64]) -> Option<SpreadStats> {
    if values.is_empty() {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = if values.len() < 2 {
        0.0
    } else {
        let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);
        var.sqrt()
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    Some(SpreadStats {
        count: values.len(),
        mean,
        std,
        min: sorted[0],
        q25: percentile(&sorted, 0.25),
        median: percentile(&sorted, 0.50),
        q75: percentile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Linear-interpolation percentile over pre-sorted values.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] + (sorted[hi] - sorted[lo]) * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_of_empty_is_none() {
        assert!(describe(&[]).is_none());
    }

    #[test]
    fn describe_matches_hand_computation() {
        let stats = describe(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(stats.count, 5);
        assert!((stats.mean - 3.0).abs() < 1e-12);
        // Sample std of 1..5 is sqrt(2.5).
        assert!((stats.std - 2.5f64.sqrt()).abs() < 1e-12);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.q25, 2.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q75, 4.0);
        assert_eq!(stats.max, 5.0);
    }

    #[test]
    fn quartiles_interpolate_between_ranks() {
        let stats = describe(&[10.0, 20.0, 30.0, 40.0]).unwrap();
        assert!((stats.q25 - 17.5).abs() < 1e-12);
        assert!((stats.median - 25.0).abs() < 1e-12);
        assert!((stats.q75 - 32.5).abs() < 1e-12);
    }

    #[test]
    fn single_value_has_zero_std() {
        let stats = describe(&[42.0]).unwrap();
        assert_eq!(stats.std, 0.0);
        assert_eq!(stats.min, 42.0);
        assert_eq!(stats.max, 42.0);
    }
}
