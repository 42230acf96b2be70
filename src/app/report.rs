//! JSON report printed by the command line front end.

use crate::aggregation::{FetchFailure, PanelState, RenderSurface, ReviewPanel, ScoredProduct};
use crate::catalog::FilterCriteria;
use crate::domain::{ProductRecord, group_label};
use crate::pagination::CategorySection;
use crate::trend::{RatingPoint, TrendFrequency, TrendRow, rating_trend};
use serde::Serialize;
use tracing::debug;

/// Render surface that keeps the latest state of every panel.
#[derive(Debug)]
pub struct ReportSurface {
    frequency: TrendFrequency,
    review: Option<PanelState<ReviewPanel>>,
    trend: Option<PanelState<Vec<TrendRow>>>,
    recommendation_error: Option<String>,
}

impl ReportSurface {
    pub fn new(frequency: TrendFrequency) -> Self {
        Self {
            frequency,
            review: None,
            trend: None,
            recommendation_error: None,
        }
    }

    pub fn review(&self) -> Option<&PanelState<ReviewPanel>> {
        self.review.as_ref()
    }

    pub fn trend(&self) -> Option<&PanelState<Vec<TrendRow>>> {
        self.trend.as_ref()
    }

    pub fn recommendation_error(&self) -> Option<&str> {
        self.recommendation_error.as_deref()
    }
}

impl RenderSurface for ReportSurface {
    fn render_review(&mut self, state: PanelState<ReviewPanel>) {
        debug!(panel = "review", loading = state.is_loading(), "Panel updated");
        self.review = Some(state);
    }

    fn render_trend(&mut self, state: PanelState<Vec<RatingPoint>>) {
        debug!(panel = "trend", loading = state.is_loading(), "Panel updated");
        self.trend = Some(match state {
            PanelState::Loading => PanelState::Loading,
            PanelState::Success(points) => {
                PanelState::Success(rating_trend(&points, self.frequency, None))
            }
            PanelState::Error(message) => PanelState::Error(message),
        });
    }

    fn report_recommendation_failure(&mut self, failure: &FetchFailure) {
        self.recommendation_error = Some(failure.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub product_id: String,
    pub name: String,
    pub sub_category: String,
    pub score: f64,
    pub price: u64,
    pub total_reviews: u64,
}

impl From<&ProductRecord> for ProductSummary {
    fn from(product: &ProductRecord) -> Self {
        Self {
            product_id: product.id.to_string(),
            name: product.name().to_string(),
            sub_category: group_label(product.group_key.as_ref()).to_string(),
            score: product.attributes.score,
            price: product.attributes.price,
            total_reviews: product.attributes.total_reviews,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionSummary {
    pub label: String,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items: Vec<ProductSummary>,
}

impl From<&CategorySection<'_>> for SectionSummary {
    fn from(section: &CategorySection<'_>) -> Self {
        Self {
            label: section.label.clone(),
            page: section.page,
            total_pages: section.total_pages,
            total_items: section.total_items,
            items: section.items.iter().map(|p| ProductSummary::from(*p)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub filter: FilterCriteria,
    pub total_results: usize,
    pub page: usize,
    pub total_pages: usize,
    pub popular: Vec<ProductSummary>,
    pub results: Vec<ProductSummary>,
    pub sections: Vec<SectionSummary>,
    pub selected: Option<ProductSummary>,
    pub review: Option<PanelState<ReviewPanel>>,
    pub trend: Option<PanelState<Vec<TrendRow>>>,
    pub recommendation_error: Option<String>,
    pub recommendations: Vec<ScoredProduct>,
    pub scroll_requests: usize,
}
