//! Rating series rows and period bucketing for the trend panel.

use chrono::{Datelike, Days, Months, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// One dated rating taken from a review.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingPoint {
    pub date: NaiveDate,
    pub score: f64,
}

impl RatingPoint {
    pub const fn new(date: NaiveDate, score: f64) -> Self {
        Self { date, score }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TrendFrequency {
    Daily,
    Weekly,
    #[default]
    Monthly,
}

impl TrendFrequency {
    /// Number of buckets the trailing moving average spans.
    pub const fn moving_average_window(self) -> usize {
        match self {
            Self::Daily => 7,
            Self::Weekly => 4,
            Self::Monthly => 3,
        }
    }

    /// Label of the bucket containing `date`: the day itself, the Sunday that
    /// closes its week, or the last day of its month.
    pub fn bucket_end(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Daily => date,
            Self::Weekly => {
                let remaining = 6 - u64::from(date.weekday().num_days_from_monday());
                date.checked_add_days(Days::new(remaining)).unwrap_or(date)
            }
            Self::Monthly => date
                .with_day(1)
                .and_then(|first| first.checked_add_months(Months::new(1)))
                .and_then(|next| next.pred_opt())
                .unwrap_or(date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRow {
    pub date: NaiveDate,
    pub avg_score: f64,
    pub moving_average: f64,
    pub count: usize,
}

/// Averages `points` per bucket and adds a trailing moving average over the
/// preceding non-empty buckets. Points outside the inclusive `range` are
/// ignored; buckets without points are omitted.
pub fn rating_trend(
    points: &[RatingPoint],
    frequency: TrendFrequency,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Vec<TrendRow> {
    let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for point in points {
        if let Some((start, end)) = range {
            if point.date < start || point.date > end {
                continue;
            }
        }
        let bucket = buckets.entry(frequency.bucket_end(point.date)).or_insert((0.0, 0));
        bucket.0 += point.score;
        bucket.1 += 1;
    }

    let window = frequency.moving_average_window();
    let mut recent: VecDeque<f64> = VecDeque::with_capacity(window);
    buckets
        .into_iter()
        .map(|(date, (sum, count))| {
            let avg_score = sum / count as f64;
            if recent.len() == window {
                recent.pop_front();
            }
            recent.push_back(avg_score);
            let moving_average = recent.iter().sum::<f64>() / recent.len() as f64;
            TrendRow {
                date,
                avg_score,
                moving_average,
                count,
            }
        })
        .collect()
}
