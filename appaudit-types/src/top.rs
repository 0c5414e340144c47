//! Named series sets and Top-N selection.

use std::cmp::Ordering;

use crate::{Aggregate, AggregateOp, TimeSeries};

/// Name of the series holding everything not selected by [`top`].
pub const OTHER_SERIES: &str = "other";

/// A set of series keyed by name, in insertion order.
///
/// Insertion order is significant: it breaks ties when ranking with [`top`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedSeriesSet {
    entries: Vec<(String, TimeSeries)>,
}

impl NamedSeriesSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a series. Replacing an existing name keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, series: TimeSeries) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = series,
            None => self.entries.push((name, series)),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, series: TimeSeries) -> Self {
        self.insert(name, series);
        self
    }

    /// Look up a series by name.
    pub fn get(&self, name: &str) -> Option<&TimeSeries> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, series)| series)
    }

    /// Whether the set contains `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of series.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the set holds no series.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, series)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TimeSeries)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }
}

impl<S: Into<String>> FromIterator<(S, TimeSeries)> for NamedSeriesSet {
    fn from_iter<I: IntoIterator<Item = (S, TimeSeries)>>(iter: I) -> Self {
        let mut set = NamedSeriesSet::new();
        for (name, series) in iter {
            set.insert(name, series);
        }
        set
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for NamedSeriesSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, series) in &self.entries {
            map.serialize_entry(name, series)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for NamedSeriesSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SetVisitor;

        impl<'de> serde::de::Visitor<'de> for SetVisitor {
            type Value = NamedSeriesSet;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of series names to sample arrays")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut set = NamedSeriesSet::new();
                while let Some((name, series)) = access.next_entry::<String, TimeSeries>()? {
                    set.insert(name, series);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(SetVisitor)
    }
}

/// Result of [`top`]: the highest scoring series and the folded remainder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Top {
    /// Selected series, highest score first.
    pub entries: Vec<(String, TimeSeries)>,

    /// Every series that was not selected, combined with the ranking operator.
    /// `None` when nothing was left out.
    pub other: Option<TimeSeries>,
}

impl Top {
    /// Number of selected series.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of the selected series, in rank order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}

/// Select the `n` series with the highest `op`-reduced total.
///
/// Only series of exactly `points` samples take part. Series without any
/// sample score lowest. Equal scores keep insertion order. Exactly
/// `min(n, aligned)` entries are returned; the rest are folded with `op` into
/// [`Top::other`].
///
/// # Example
///
/// ```rust
/// use appaudit_types::{top, AggregateOp, NamedSeriesSet, TimeSeries};
///
/// let calls = NamedSeriesSet::new()
///     .with("get", TimeSeries::new(vec![10.0, 12.0]))
///     .with("set", TimeSeries::new(vec![1.0, 2.0]))
///     .with("del", TimeSeries::new(vec![0.0, 1.0]));
///
/// let selected = top(&calls, AggregateOp::NanSum, 2, 2);
/// assert_eq!(selected.names().collect::<Vec<_>>(), vec!["get", "set"]);
/// assert_eq!(selected.other.unwrap().values(), &[0.0, 1.0]);
/// ```
pub fn top(set: &NamedSeriesSet, op: AggregateOp, n: usize, points: usize) -> Top {
    let mut ranked: Vec<(f64, &str, &TimeSeries)> = set
        .iter()
        .filter(|(_, series)| series.len() == points)
        .map(|(name, series)| (series.reduce(op), name, series))
        .collect();

    // sort_by is stable, so ties stay in insertion order
    ranked.sort_by(|a, b| compare_scores(b.0, a.0));

    let mut entries = Vec::with_capacity(n.min(ranked.len()));
    let mut other = Aggregate::new(op, points);
    for (i, (_, name, series)) in ranked.into_iter().enumerate() {
        if i < n {
            entries.push((name.to_string(), series.clone()));
        } else {
            other.add_input(series);
        }
    }

    Top {
        entries,
        other: other.finish(),
    }
}

/// Total order on scores with missing values below everything else.
fn compare_scores(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.total_cmp(&b),
    }
}
