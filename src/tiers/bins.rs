use crate::error::BinSpecError;

/// Finds the interval index of `value` within `boundaries`.
///
/// Intervals are right-inclusive, `(b[i], b[i + 1]]`, except the first one
/// which also contains `b[0]`. Returns `None` for missing or NaN input and for
/// values outside `[b[0], b[n]]`.
///
/// `boundaries` must be strictly increasing; [`BinSpec::new`] checks this.
pub fn locate(boundaries: &[f64], value: Option<f64>) -> Option<usize> {
    let v = value.filter(|v| !v.is_nan())?;
    let first = *boundaries.first()?;

    if v == first {
        return Some(0);
    }

    // Number of boundaries strictly below `v`.
    let below = boundaries.partition_point(|&b| b < v);
    if below == 0 || below == boundaries.len() {
        return None;
    }

    Some(below - 1)
}

/// Ordered bin edges paired with one label per interval.
#[derive(Debug, Clone, PartialEq)]
pub struct BinSpec<L> {
    boundaries: Vec<f64>,
    labels: Vec<L>,
}

impl<L> BinSpec<L> {
    /// Builds a spec after checking that the boundaries are strictly
    /// increasing and that there is exactly one label per interval.
    ///
    /// Use `f64::INFINITY` as the last boundary for domains unbounded above.
    pub fn new(boundaries: Vec<f64>, labels: Vec<L>) -> Result<Self, BinSpecError> {
        if boundaries.len() < 2 {
            return Err(BinSpecError::TooFewBoundaries(boundaries.len()));
        }

        if labels.len() + 1 != boundaries.len() {
            return Err(BinSpecError::LabelCount {
                boundaries: boundaries.len(),
                labels: labels.len(),
                expected: boundaries.len() - 1,
            });
        }

        if let Some(index) = boundaries.iter().position(|b| b.is_nan()) {
            return Err(BinSpecError::NanBoundary { index });
        }

        for (index, pair) in boundaries.windows(2).enumerate() {
            if pair[0] >= pair[1] {
                return Err(BinSpecError::NotIncreasing {
                    index,
                    previous: pair[0],
                    next: pair[1],
                });
            }
        }

        Ok(Self { boundaries, labels })
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Returns the label of the interval containing `value`, if any.
    pub fn classify(&self, value: Option<f64>) -> Option<&L> {
        locate(&self.boundaries, value).map(|i| &self.labels[i])
    }

    /// Iterates `(lower, upper, label)` for every interval.
    pub fn intervals(&self) -> impl Iterator<Item = (f64, f64, &L)> {
        self.boundaries
            .windows(2)
            .zip(&self.labels)
            .map(|(pair, label)| (pair[0], pair[1], label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dti() -> BinSpec<&'static str> {
        BinSpec::new(
            vec![0.0, 20.0, 30.0, 40.0, 50.0, 60.0, f64::INFINITY],
            vec!["0-20", "20-30", "30-40", "40-50", "50-60", "60+"],
        )
        .unwrap()
    }

    #[test]
    fn test_classify_boundaries_belong_to_lower_interval() {
        let spec = dti();
        assert_eq!(spec.classify(Some(0.0)), Some(&"0-20"));
        assert_eq!(spec.classify(Some(0.01)), Some(&"0-20"));
        assert_eq!(spec.classify(Some(20.0)), Some(&"0-20"));
        assert_eq!(spec.classify(Some(20.01)), Some(&"20-30"));
        assert_eq!(spec.classify(Some(60.0)), Some(&"50-60"));
        assert_eq!(spec.classify(Some(60.5)), Some(&"60+"));
        assert_eq!(spec.classify(Some(1e12)), Some(&"60+"));
        assert_eq!(spec.classify(Some(f64::INFINITY)), Some(&"60+"));
    }

    #[test]
    fn test_classify_out_of_domain() {
        let spec = dti();
        assert_eq!(spec.classify(Some(-0.5)), None);
        assert_eq!(spec.classify(Some(f64::NEG_INFINITY)), None);
        assert_eq!(spec.classify(Some(f64::NAN)), None);
        assert_eq!(spec.classify(None), None);
    }

    #[test]
    fn test_classify_above_finite_upper_bound() {
        let spec = BinSpec::new(vec![0.0, 10.0, 20.0], vec!["low", "high"]).unwrap();
        assert_eq!(spec.classify(Some(20.0)), Some(&"high"));
        assert_eq!(spec.classify(Some(20.5)), None);
    }

    #[test]
    fn test_classify_matches_interval_rule() {
        let spec = dti();
        let b = spec.boundaries();
        for step in -10..=1300 {
            let v = step as f64 * 0.05;
            let expected = (0..spec.labels().len())
                .find(|&i| (b[i] < v && v <= b[i + 1]) || (i == 0 && v == b[0]));
            assert_eq!(locate(b, Some(v)), expected, "value {v}");
        }
    }

    #[test]
    fn test_classify_is_idempotent() {
        let spec = dti();
        for v in [0.0, 19.99, 20.0, 35.5, 61.0] {
            assert_eq!(spec.classify(Some(v)), spec.classify(Some(v)));
        }
    }

    #[test]
    fn test_new_rejects_bad_specs() {
        assert_eq!(
            BinSpec::new(vec![1.0], Vec::<&str>::new()),
            Err(BinSpecError::TooFewBoundaries(1))
        );
        assert!(matches!(
            BinSpec::new(vec![0.0, 1.0, 2.0], vec!["a"]),
            Err(BinSpecError::LabelCount { expected: 2, .. })
        ));
        assert!(matches!(
            BinSpec::new(vec![0.0, 2.0, 2.0], vec!["a", "b"]),
            Err(BinSpecError::NotIncreasing { index: 1, .. })
        ));
        assert!(matches!(
            BinSpec::new(vec![0.0, f64::NAN], vec!["a"]),
            Err(BinSpecError::NanBoundary { index: 1 })
        ));
    }

    #[test]
    fn test_intervals() {
        let spec = BinSpec::new(vec![0.0, 5.0, f64::INFINITY], vec!["a", "b"]).unwrap();
        let intervals: Vec<_> = spec.intervals().collect();
        assert_eq!(intervals, vec![(0.0, 5.0, &"a"), (5.0, f64::INFINITY, &"b")]);
    }
}
