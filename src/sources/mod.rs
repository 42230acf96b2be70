//! Collaborators the aggregation pass fetches from.
//!
//! Every source is shared across the fetch tasks of one pass, so
//! implementations must be `Send + Sync`. Errors are plain `anyhow` errors;
//! the coordinator turns them into per-task failures.

pub mod local;

use crate::aggregation::SimilarProducts;
use crate::domain::{ProductId, ReviewId};
use crate::trend::RatingPoint;
use anyhow::Result;
use async_trait::async_trait;

pub use local::{CategoryNeighbours, LocalReviewStore, ReviewRecord};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// Text of one review of `product_id`; `None` when it has no text.
    async fn fetch_representative_review(
        &self,
        product_id: &ProductId,
        review_id: ReviewId,
    ) -> Result<Option<String>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingSeriesSource: Send + Sync {
    async fn fetch_rating_series(&self, product_id: &ProductId) -> Result<Vec<RatingPoint>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SimilarProductSource: Send + Sync {
    /// Up to `top_n` products similar to `product_id`, optionally restricted
    /// to `categories` (empty means the product's own category).
    async fn fetch_similar_products(
        &self,
        product_id: &ProductId,
        categories: &[String],
        top_n: usize,
    ) -> Result<SimilarProducts>;
}
