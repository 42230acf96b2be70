use super::{RatingSeriesSource, ReviewSource, SimilarProductSource};
use crate::aggregation::{ScoredProduct, SimilarProducts};
use crate::catalog::Catalog;
use crate::catalog::filter::MAX_RATING;
use crate::domain::{ProductId, ProductRecord, ReviewId, group_label};
use crate::trend::RatingPoint;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// One row of the reviews file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReviewRecord {
    pub review_id: u64,
    pub product_id: ProductId,
    pub date: NaiveDate,
    pub score: f64,
    #[serde(default, alias = "full_text")]
    pub text: String,
}

/// Reviews loaded from a JSON file, serving review text and rating series.
#[derive(Debug, Clone, Default)]
pub struct LocalReviewStore {
    reviews: Vec<ReviewRecord>,
}

impl LocalReviewStore {
    pub fn new(reviews: Vec<ReviewRecord>) -> Self {
        Self { reviews }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let reviews: Vec<ReviewRecord> =
            serde_json::from_str(content).context("invalid reviews JSON")?;
        Ok(Self::new(reviews))
    }

    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read reviews from {}", path.display()))?;
        let store = Self::from_json_str(&content)?;
        info!(path = %path.display(), reviews = store.len(), "Loaded review store");
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

#[async_trait]
impl ReviewSource for LocalReviewStore {
    async fn fetch_representative_review(
        &self,
        product_id: &ProductId,
        review_id: ReviewId,
    ) -> Result<Option<String>> {
        let text = self
            .reviews
            .iter()
            .find(|r| r.review_id == review_id.get() && &r.product_id == product_id)
            .map(|r| r.text.clone())
            .filter(|text| !text.trim().is_empty());
        debug!(%product_id, %review_id, found = text.is_some(), "Looked up representative review");
        Ok(text)
    }
}

#[async_trait]
impl RatingSeriesSource for LocalReviewStore {
    async fn fetch_rating_series(&self, product_id: &ProductId) -> Result<Vec<RatingPoint>> {
        let mut points: Vec<RatingPoint> = self
            .reviews
            .iter()
            .filter(|r| &r.product_id == product_id)
            .map(|r| RatingPoint::new(r.date, r.score))
            .collect();
        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

/// Recommends catalog neighbours: products sharing a category with the
/// target, ranked by rating closeness weighted with review volume.
#[derive(Debug, Clone)]
pub struct CategoryNeighbours {
    catalog: Arc<Catalog>,
}

impl CategoryNeighbours {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    fn score(target: &ProductRecord, candidate: &ProductRecord) -> ScoredProduct {
        let distance = (target.attributes.score - candidate.attributes.score).abs();
        let similarity = (1.0 - distance / MAX_RATING).clamp(0.0, 1.0);
        let volume = (1.0 + candidate.attributes.total_reviews as f64).ln();
        ScoredProduct {
            product_id: candidate.id.clone(),
            product_name: candidate.name().to_string(),
            similarity,
            reco_score: similarity * volume,
        }
    }
}

#[async_trait]
impl SimilarProductSource for CategoryNeighbours {
    async fn fetch_similar_products(
        &self,
        product_id: &ProductId,
        categories: &[String],
        top_n: usize,
    ) -> Result<SimilarProducts> {
        let Some(target) = self.catalog.get(product_id) else {
            bail!("product {product_id} is not in the catalog");
        };

        let wanted: Vec<&str> = if categories.is_empty() {
            target.group_key.iter().map(|k| k.as_str()).collect()
        } else {
            categories.iter().map(String::as_str).collect()
        };

        let mut groups: BTreeMap<String, Vec<ScoredProduct>> = BTreeMap::new();
        for candidate in self.catalog.products() {
            if candidate.id == target.id {
                continue;
            }
            let label = group_label(candidate.group_key.as_ref());
            if !wanted.is_empty() && !wanted.contains(&label) {
                continue;
            }
            groups
                .entry(label.to_string())
                .or_default()
                .push(Self::score(target, candidate));
        }

        for items in groups.values_mut() {
            items.sort_by(|a, b| b.reco_score.total_cmp(&a.reco_score));
            items.truncate(top_n);
        }
        debug!(%product_id, categories = groups.len(), "Computed category neighbours");
        Ok(SimilarProducts::ByCategory(groups))
    }
}
