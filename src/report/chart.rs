//! Charts: named series drawn together.

use serde::Serialize;
use tracing::debug;

use appaudit_types::{Aggregate, AggregateOp, TimeSeries, Top, OTHER_SERIES};

/// Identifies a chart within a report.
///
/// Charts sharing a title but with different group keys are alternatives the
/// renderer switches between; `<selector>` in the title stands for the group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ChartKey {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl ChartKey {
    pub fn new(title: impl Into<String>, group: Option<String>) -> Self {
        Self {
            title: title.into(),
            group,
        }
    }
}

/// A named series of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub data: TimeSeries,
}

/// A chart: series on the audit grid, rendering hints and a threshold overlay.
///
/// `stacked`, `sorted` and `featured` are hints for the renderer and do not
/// affect the data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    #[serde(flatten)]
    pub key: ChartKey,
    pub series: Vec<Series>,
    pub stacked: bool,
    pub sorted: bool,
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<Series>,
    #[serde(skip)]
    points: usize,
}

impl Chart {
    /// Create an empty chart on a grid of `points` samples.
    pub fn new(key: ChartKey, points: usize) -> Self {
        Self {
            key,
            series: Vec::new(),
            stacked: false,
            sorted: false,
            featured: false,
            threshold: None,
            points,
        }
    }

    /// Add a series. Missing or misaligned series are skipped; a name already
    /// present is merged into the existing series with `NanSum`.
    pub fn add_series(&mut self, name: &str, data: Option<&TimeSeries>) -> &mut Self {
        let Some(data) = data else {
            return self;
        };
        if data.len() != self.points {
            debug!(
                chart = %self.key.title,
                series = name,
                "skipping series not aligned with the audit grid"
            );
            return self;
        }

        match self.series.iter_mut().find(|s| s.name == name) {
            Some(existing) => {
                let merged = Aggregate::new(AggregateOp::NanSum, self.points)
                    .with_input(&existing.data)
                    .with_input(data)
                    .finish();
                if let Some(merged) = merged {
                    existing.data = merged;
                }
            }
            None => self.series.push(Series {
                name: name.to_string(),
                data: data.clone(),
            }),
        }
        self
    }

    /// Add the selected series of a Top-N selection, followed by the remainder
    /// as a series named `other`.
    pub fn add_top(&mut self, top: Top) -> &mut Self {
        for (name, data) in &top.entries {
            self.add_series(name, Some(data));
        }
        self.add_series(OTHER_SERIES, top.other.as_ref());
        self
    }

    /// Set the threshold overlay. Repeated calls fold the new series into the
    /// existing overlay with `op`.
    pub fn set_threshold(
        &mut self,
        name: &str,
        data: Option<&TimeSeries>,
        op: AggregateOp,
    ) -> &mut Self {
        let Some(data) = data else {
            return self;
        };
        if data.len() != self.points {
            return self;
        }

        let combined = match &self.threshold {
            Some(existing) => Aggregate::new(op, self.points)
                .with_input(&existing.data)
                .with_input(data)
                .finish(),
            None => Aggregate::new(op, self.points).with_input(data).finish(),
        };
        if let Some(combined) = combined {
            self.threshold = Some(Series {
                name: name.to_string(),
                data: combined,
            });
        }
        self
    }

    pub fn stacked(&mut self) -> &mut Self {
        self.stacked = true;
        self
    }

    pub fn sorted(&mut self) -> &mut Self {
        self.sorted = true;
        self
    }

    /// Mark the chart as the one to show first.
    pub fn feature(&mut self) -> &mut Self {
        self.featured = true;
        self
    }

    /// Look up a series by name.
    pub fn get(&self, name: &str) -> Option<&TimeSeries> {
        self.series.iter().find(|s| s.name == name).map(|s| &s.data)
    }

    /// True if the chart holds no series.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
