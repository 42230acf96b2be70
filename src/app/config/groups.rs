use crate::aggregation::DEFAULT_TOP_N;
use crate::pagination::{DEFAULT_CATEGORY_PAGE_SIZE, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};

pub const DEFAULT_REVIEW_LIMIT: usize = 3;
pub const DEFAULT_POPULAR_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub page_size: usize,
    pub category_page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            category_page_size: DEFAULT_CATEGORY_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightConfig {
    pub recommendation_top_n: usize,
    /// How many representative review references are considered.
    pub representative_review_limit: usize,
    pub popular_count: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            recommendation_top_n: DEFAULT_TOP_N,
            representative_review_limit: DEFAULT_REVIEW_LIMIT,
            popular_count: DEFAULT_POPULAR_COUNT,
        }
    }
}
