//! Time series on a fixed grid.

use crate::AggregateOp;

/// Unix timestamp in seconds.
pub type Timestamp = i64;

/// The shared time window of one audit pass.
///
/// Every series audited together is sampled on this grid: `points` values,
/// the first at `from`, each following one `step` seconds later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuditContext {
    /// Timestamp of the first point.
    pub from: Timestamp,

    /// Resolution in seconds.
    pub step: i64,

    /// Number of points in the window.
    pub points: usize,
}

impl AuditContext {
    /// Create a new context.
    pub const fn new(from: Timestamp, step: i64, points: usize) -> Self {
        Self { from, step, points }
    }

    /// Timestamp of the last point, or `from` for an empty window.
    pub fn to(&self) -> Timestamp {
        self.from + self.step * self.points.saturating_sub(1) as i64
    }

    /// Iterate over the timestamps of the grid.
    pub fn timestamps(&self) -> impl Iterator<Item = Timestamp> + '_ {
        (0..self.points).map(move |i| self.from + self.step * i as i64)
    }

    /// A series on this grid with every sample missing.
    pub fn nan_series(&self) -> TimeSeries {
        TimeSeries::nan(self.points)
    }

    /// Whether the series is sampled on this grid.
    pub fn is_aligned(&self, series: &TimeSeries) -> bool {
        series.len() == self.points
    }
}

/// An immutable sequence of samples on an [`AuditContext`] grid.
///
/// A `NaN` value means no sample was recorded at that point. It is never
/// interpreted as zero.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "Vec<Option<f64>>", into = "Vec<Option<f64>>")
)]
pub struct TimeSeries {
    data: Vec<f64>,
}

impl TimeSeries {
    /// Create a series from raw values.
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// A series of `len` missing samples.
    pub fn nan(len: usize) -> Self {
        Self {
            data: vec![f64::NAN; len],
        }
    }

    /// A series of `len` samples all equal to `value`.
    pub fn constant(len: usize, value: f64) -> Self {
        Self {
            data: vec![value; len],
        }
    }

    /// Number of points, missing ones included.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the series has no points at all.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True when no point carries a sample.
    pub fn is_missing(&self) -> bool {
        self.data.iter().all(|v| v.is_nan())
    }

    /// Value at `index`, `NaN` when out of range.
    pub fn get(&self, index: usize) -> f64 {
        self.data.get(index).copied().unwrap_or(f64::NAN)
    }

    /// The latest recorded sample, `NaN` if there is none.
    pub fn last(&self) -> f64 {
        self.data
            .iter()
            .rev()
            .find(|v| !v.is_nan())
            .copied()
            .unwrap_or(f64::NAN)
    }

    /// The raw values.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Iterate over the values.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().copied()
    }

    /// Apply `f` to every point.
    pub fn map<F>(&self, f: F) -> TimeSeries
    where
        F: Fn(f64) -> f64,
    {
        TimeSeries {
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Fold every point into a single value with `op`.
    ///
    /// Follows the same missing-value rules as pointwise aggregation, so
    /// `reduce(NanSum)` of a series with no samples is `NaN`.
    pub fn reduce(&self, op: AggregateOp) -> f64 {
        let mut values = self.data.iter().copied();
        let Some(first) = values.next() else {
            return f64::NAN;
        };
        values.fold(op.first(first), |acc, v| op.combine(acc, v))
    }
}

impl PartialEq for TimeSeries {
    /// Missing samples compare equal to each other.
    fn eq(&self, other: &Self) -> bool {
        self.data.len() == other.data.len()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
    }
}

impl From<Vec<f64>> for TimeSeries {
    fn from(data: Vec<f64>) -> Self {
        Self::new(data)
    }
}

impl From<Vec<Option<f64>>> for TimeSeries {
    fn from(values: Vec<Option<f64>>) -> Self {
        Self {
            data: values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect(),
        }
    }
}

impl From<TimeSeries> for Vec<Option<f64>> {
    fn from(series: TimeSeries) -> Self {
        series
            .data
            .into_iter()
            .map(|v| if v.is_nan() { None } else { Some(v) })
            .collect()
    }
}

impl FromIterator<f64> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAN: f64 = f64::NAN;

    #[test]
    fn test_context_grid() {
        let ctx = AuditContext::new(1_700_000_000, 30, 4);
        let ts: Vec<_> = ctx.timestamps().collect();
        assert_eq!(
            ts,
            vec![1_700_000_000, 1_700_000_030, 1_700_000_060, 1_700_000_090]
        );
        assert_eq!(ctx.to(), 1_700_000_090);
        assert!(ctx.is_aligned(&ctx.nan_series()));
        assert!(!ctx.is_aligned(&TimeSeries::nan(3)));
    }

    #[test]
    fn test_empty_context() {
        let ctx = AuditContext::new(100, 15, 0);
        assert_eq!(ctx.to(), 100);
        assert_eq!(ctx.timestamps().count(), 0);
    }

    #[test]
    fn test_last_skips_missing_tail() {
        let s = TimeSeries::new(vec![1.0, 2.0, NAN, NAN]);
        assert_eq!(s.last(), 2.0);
        assert!(TimeSeries::nan(3).last().is_nan());
        assert!(TimeSeries::default().last().is_nan());
    }

    #[test]
    fn test_missing_and_empty() {
        assert!(TimeSeries::nan(2).is_missing());
        assert!(!TimeSeries::nan(2).is_empty());
        assert!(TimeSeries::default().is_empty());
        assert!(!TimeSeries::new(vec![NAN, 0.0]).is_missing());
    }

    #[test]
    fn test_get_out_of_range_is_missing() {
        let s = TimeSeries::new(vec![1.0]);
        assert_eq!(s.get(0), 1.0);
        assert!(s.get(1).is_nan());
    }

    #[test]
    fn test_reduce() {
        let s = TimeSeries::new(vec![1.0, NAN, 4.0, 2.0]);
        assert_eq!(s.reduce(AggregateOp::NanSum), 7.0);
        assert_eq!(s.reduce(AggregateOp::Max), 4.0);
        assert!(TimeSeries::nan(3).reduce(AggregateOp::NanSum).is_nan());
        assert!(TimeSeries::default().reduce(AggregateOp::Max).is_nan());
    }

    #[test]
    fn test_equality_treats_missing_as_equal() {
        let a = TimeSeries::new(vec![1.0, NAN]);
        let b = TimeSeries::new(vec![1.0, NAN]);
        assert_eq!(a, b);
        assert_ne!(a, TimeSeries::new(vec![1.0, 0.0]));
        assert_ne!(a, TimeSeries::new(vec![1.0]));
    }

    #[test]
    fn test_option_conversions() {
        let s = TimeSeries::from(vec![Some(1.0), None]);
        assert!(s.get(1).is_nan());
        let back: Vec<Option<f64>> = s.into();
        assert_eq!(back, vec![Some(1.0), None]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_missing_as_null() {
        let s = TimeSeries::new(vec![0.5, NAN]);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "[0.5,null]");

        let parsed: TimeSeries = serde_json::from_str("[null, 2.0]").unwrap();
        assert!(parsed.get(0).is_nan());
        assert_eq!(parsed.get(1), 2.0);
    }
}
