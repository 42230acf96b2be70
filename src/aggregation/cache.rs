use super::outcome::ScoredProduct;
use crate::domain::ProductId;
use crate::trend::RatingPoint;

/// Results kept across aggregation passes for the lifetime of a session.
///
/// Recommendations are memoized against the single product they were last
/// fetched for; a failed fetch leaves both the list and the target untouched.
#[derive(Debug, Clone, Default)]
pub struct InsightCache {
    recommendation_target: Option<ProductId>,
    recommendations: Vec<ScoredProduct>,
    trend: Option<(ProductId, Vec<RatingPoint>)>,
}

impl InsightCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recommendation_target(&self) -> Option<&ProductId> {
        self.recommendation_target.as_ref()
    }

    pub fn recommendations(&self) -> &[ScoredProduct] {
        &self.recommendations
    }

    /// Rating series of the most recent successful trend fetch.
    pub fn trend(&self) -> Option<(&ProductId, &[RatingPoint])> {
        self.trend.as_ref().map(|(id, points)| (id, points.as_slice()))
    }

    /// True when the cached recommendations already belong to `product_id`.
    pub fn targets(&self, product_id: &ProductId) -> bool {
        self.recommendation_target.as_ref() == Some(product_id)
    }

    pub(crate) fn store_trend(&mut self, product_id: ProductId, points: Vec<RatingPoint>) {
        self.trend = Some((product_id, points));
    }

    pub(crate) fn store_recommendations(&mut self, product_id: ProductId, items: Vec<ScoredProduct>) {
        self.recommendations = items;
        self.recommendation_target = Some(product_id);
    }
}
