use crate::domain::ProductId;
use crate::trend::RatingPoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// The three fetches of one aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Review,
    Trend,
    Recommendation,
}

impl TaskKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::Trend => "trend",
            Self::Recommendation => "recommendation",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fetch that failed. Isolated to its own task; never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} fetch failed: {cause}")]
pub struct FetchFailure {
    pub kind: TaskKind,
    pub cause: String,
}

impl FetchFailure {
    pub fn new(kind: TaskKind, cause: impl Into<String>) -> Self {
        Self {
            kind,
            cause: cause.into(),
        }
    }

    /// Keeps the whole context chain of `error` as the cause.
    pub fn from_error(kind: TaskKind, error: &anyhow::Error) -> Self {
        Self::new(kind, format!("{error:#}"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProduct {
    pub product_id: ProductId,
    pub product_name: String,
    pub similarity: f64,
    pub reco_score: f64,
}

/// Recommendation payload: either a flat list or a list per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SimilarProducts {
    Flat(Vec<ScoredProduct>),
    ByCategory(BTreeMap<String, Vec<ScoredProduct>>),
}

impl SimilarProducts {
    /// Concatenates per-category lists in category order.
    pub fn into_flat(self) -> Vec<ScoredProduct> {
        match self {
            Self::Flat(items) => items,
            Self::ByCategory(groups) => groups.into_values().flatten().collect(),
        }
    }
}

/// What a finished task hands back to the control task.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Review(Option<String>),
    Trend(Vec<RatingPoint>),
    Recommendations(SimilarProducts),
    Failure(FetchFailure),
}

impl TaskOutcome {
    pub const fn kind(&self) -> TaskKind {
        match self {
            Self::Review(_) => TaskKind::Review,
            Self::Trend(_) => TaskKind::Trend,
            Self::Recommendations(_) => TaskKind::Recommendation,
            Self::Failure(failure) => failure.kind,
        }
    }
}
