//! Pointwise combinators over aligned series.

use crate::TimeSeries;

/// How samples of several series are combined at each point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AggregateOp {
    /// Sum of the recorded samples. Missing only when every operand is missing.
    NanSum,
    /// Maximum of the recorded samples. Missing only when every operand is missing.
    Max,
    /// Left fold of `a / b`. Missing when either side is missing or `b` is zero.
    Div,
    /// `1.0` if any operand is positive, `0.0` if some operand is recorded but
    /// none is positive, missing when every operand is missing.
    Any,
}

impl AggregateOp {
    /// Value of the accumulator after the first operand.
    pub fn first(self, v: f64) -> f64 {
        match self {
            AggregateOp::Any if !v.is_nan() => bool_value(v > 0.0),
            _ => v,
        }
    }

    /// Combine an accumulated value with the next operand.
    pub fn combine(self, acc: f64, v: f64) -> f64 {
        match self {
            AggregateOp::NanSum => match (acc.is_nan(), v.is_nan()) {
                (true, _) => v,
                (false, true) => acc,
                (false, false) => acc + v,
            },
            AggregateOp::Max => match (acc.is_nan(), v.is_nan()) {
                (true, _) => v,
                (false, true) => acc,
                (false, false) => acc.max(v),
            },
            AggregateOp::Div => {
                if acc.is_nan() || v.is_nan() || v == 0.0 {
                    f64::NAN
                } else {
                    acc / v
                }
            }
            AggregateOp::Any => {
                if acc.is_nan() && v.is_nan() {
                    f64::NAN
                } else {
                    bool_value(acc > 0.0 || v > 0.0)
                }
            }
        }
    }
}

fn bool_value(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Accumulates operands and combines them pointwise under one operator.
///
/// Operands must have exactly `points` samples, the length of the audit grid.
/// Anything else is not aligned and is ignored. Under [`AggregateOp::Div`] a
/// rejected or absent operand leaves the whole result missing, since the
/// quotient is undefined without it.
///
/// # Example
///
/// ```rust
/// use appaudit_types::{Aggregate, AggregateOp, TimeSeries};
///
/// let mut calls = Aggregate::new(AggregateOp::NanSum, 2);
/// calls.add_input(&TimeSeries::new(vec![10.0, 20.0]));
/// calls.add_input(&TimeSeries::new(vec![5.0, f64::NAN]));
/// assert!(!calls.add_input(&TimeSeries::new(vec![1.0])));
///
/// let total = calls.get().unwrap();
/// assert_eq!(total.values(), &[15.0, 20.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Aggregate {
    op: AggregateOp,
    points: usize,
    acc: Option<Vec<f64>>,
}

impl Aggregate {
    /// Create an empty accumulator over a grid of `points` samples.
    pub fn new(op: AggregateOp, points: usize) -> Self {
        Self {
            op,
            points,
            acc: None,
        }
    }

    /// The operator applied by this accumulator.
    pub fn op(&self) -> AggregateOp {
        self.op
    }

    /// Length of the grid operands must match.
    pub fn points(&self) -> usize {
        self.points
    }

    /// Add an operand. Returns `false` if it was ignored as misaligned.
    pub fn add_input(&mut self, series: &TimeSeries) -> bool {
        if series.len() != self.points {
            self.reject();
            return false;
        }
        let op = self.op;
        if let Some(acc) = self.acc.as_mut() {
            for (a, v) in acc.iter_mut().zip(series.iter()) {
                *a = op.combine(*a, v);
            }
        } else {
            self.acc = Some(series.iter().map(|v| op.first(v)).collect());
        }
        true
    }

    /// Add an operand if present.
    pub fn add_optional(&mut self, series: Option<&TimeSeries>) -> bool {
        match series {
            Some(series) => self.add_input(series),
            None => {
                self.reject();
                false
            }
        }
    }

    /// Builder-style variant of [`Aggregate::add_input`].
    pub fn with_input(mut self, series: &TimeSeries) -> Self {
        self.add_input(series);
        self
    }

    /// True if no operand has been added.
    pub fn is_empty(&self) -> bool {
        self.acc.is_none()
    }

    /// The combined series, or `None` if nothing was added.
    pub fn get(&self) -> Option<TimeSeries> {
        self.acc.clone().map(TimeSeries::new)
    }

    /// Consume the accumulator, returning the combined series.
    pub fn finish(self) -> Option<TimeSeries> {
        self.acc.map(TimeSeries::new)
    }

    fn reject(&mut self) {
        if self.op == AggregateOp::Div {
            self.acc = Some(vec![f64::NAN; self.points]);
        }
    }
}

/// Combine `inputs` pointwise under `op` on a grid of `points` samples.
///
/// Returns `None` when `inputs` is empty.
pub fn aggregate<'a, I>(op: AggregateOp, points: usize, inputs: I) -> Option<TimeSeries>
where
    I: IntoIterator<Item = &'a TimeSeries>,
{
    let mut agg = Aggregate::new(op, points);
    for series in inputs {
        agg.add_input(series);
    }
    agg.finish()
}
