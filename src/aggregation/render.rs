use super::outcome::FetchFailure;
use crate::trend::RatingPoint;
use serde::Serialize;

/// State of one dashboard panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "payload", rename_all = "lowercase")]
pub enum PanelState<T> {
    Loading,
    Success(T),
    Error(String),
}

impl<T> PanelState<T> {
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewPanel {
    Text(String),
    NoRepresentativeReview,
}

impl ReviewPanel {
    /// Blank or missing text becomes the explicit "no review" indicator.
    pub fn from_text(text: Option<String>) -> Self {
        match text {
            Some(text) if !text.trim().is_empty() => Self::Text(text),
            _ => Self::NoRepresentativeReview,
        }
    }
}

/// Receives panel updates from the aggregation control task.
pub trait RenderSurface {
    fn render_review(&mut self, state: PanelState<ReviewPanel>);
    fn render_trend(&mut self, state: PanelState<Vec<RatingPoint>>);
    fn report_recommendation_failure(&mut self, failure: &FetchFailure);
}
