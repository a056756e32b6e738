//! Running summaries over a stream of observations.
//!
//! Moments and the median have different memory contracts, so they live in two
//! separate types: [`MeanVarAccumulator`] keeps three numbers no matter how many
//! observations it has seen, [`MedianAccumulator`] keeps every observation.

/// Running mean and population variance (Welford's update).
///
/// The update never forms a sum of squares, so large count magnitudes do not
/// cancel catastrophically.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeanVarAccumulator {
    count: u64,
    mean: f64,
    m2: f64,
}

impl MeanVarAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one observation.
    #[inline]
    pub fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean of all observations, 0.0 when nothing was pushed.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance (divides by `n`), 0.0 for fewer than two observations.
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / self.count as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}

impl Extend<f64> for MeanVarAccumulator {
    fn extend<T: IntoIterator<Item = f64>>(&mut self, iter: T) {
        for x in iter {
            self.push(x);
        }
    }
}

impl FromIterator<f64> for MeanVarAccumulator {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> Self {
        let mut acc = MeanVarAccumulator::new();
        acc.extend(iter);
        acc
    }
}

/// Exact median over every pushed observation.
///
/// Observations are buffered, so memory grows linearly with the stream.
#[derive(Debug, Clone, Default)]
pub struct MedianAccumulator {
    values: Vec<f64>,
}

impl MedianAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, x: f64) {
        self.values.push(x);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    ///
    /// Median of the observations seen so far.
    ///
    /// For an even number of observations this is the mean of the two middle
    /// values. Returns `None` on an empty stream.
    ///
    pub fn median(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        let mut sorted = self.values.clone();
        sorted.sort_unstable_by(f64::total_cmp);

        let n = sorted.len();
        if n % 2 == 0 {
            Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
        } else {
            Some(sorted[n / 2])
        }
    }
}

impl Extend<f64> for MedianAccumulator {
    fn extend<T: IntoIterator<Item = f64>>(&mut self, iter: T) {
        self.values.extend(iter);
    }
}

impl FromIterator<f64> for MedianAccumulator {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
