use crate::domain::{FilterSignature, ProductRecord, SortOption};
use serde::{Deserialize, Serialize};

pub const MAX_RATING: f64 = 5.0;

/// Search and sidebar filter inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub query: String,
    pub sub_categories: Vec<String>,
    pub skin_types: Vec<String>,
    pub min_rating: f64,
    pub max_rating: f64,
    pub min_price: u64,
    pub max_price: u64,
    pub sort: SortOption,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            query: String::new(),
            sub_categories: Vec::new(),
            skin_types: Vec::new(),
            min_rating: 0.0,
            max_rating: MAX_RATING,
            min_price: 0,
            max_price: u64::MAX,
            sort: SortOption::Recommended,
        }
    }
}

impl FilterCriteria {
    pub fn signature(&self) -> FilterSignature {
        FilterSignature::new(
            &self.query,
            &self.sub_categories,
            &self.skin_types,
            (self.min_rating, self.max_rating),
            (self.min_price, self.max_price),
            self.sort,
        )
    }

    /// No query and no category or skin type selection: the dashboard shows
    /// popular products instead of a result set.
    pub fn is_initial(&self) -> bool {
        self.query.trim().is_empty() && self.sub_categories.is_empty() && self.skin_types.is_empty()
    }

    pub fn matches(&self, product: &ProductRecord) -> bool {
        let attrs = &product.attributes;

        let query = self.query.trim().to_lowercase();
        if !query.is_empty() {
            let in_name = attrs.product_name.to_lowercase().contains(&query);
            let in_brand = attrs
                .brand
                .as_deref()
                .is_some_and(|brand| brand.to_lowercase().contains(&query));
            let in_keywords = attrs
                .top_keywords
                .iter()
                .any(|keyword| keyword.to_lowercase().contains(&query));
            if !(in_name || in_brand || in_keywords) {
                return false;
            }
        }

        if !self.sub_categories.is_empty()
            && !self
                .sub_categories
                .iter()
                .any(|selected| product.group_key.as_ref().is_some_and(|k| k.as_str() == selected))
        {
            return false;
        }

        if !self.skin_types.is_empty()
            && !attrs
                .skin_type
                .as_deref()
                .is_some_and(|skin| self.skin_types.iter().any(|selected| selected == skin))
        {
            return false;
        }

        (self.min_rating..=self.max_rating).contains(&attrs.score)
            && (self.min_price..=self.max_price).contains(&attrs.price)
    }

    /// Matching products, ordered by `self.sort`.
    pub fn apply(&self, products: &[ProductRecord]) -> Vec<ProductRecord> {
        let mut matched: Vec<ProductRecord> =
            products.iter().filter(|p| self.matches(p)).cloned().collect();
        sort_products(&mut matched, self.sort);
        matched
    }
}

/// Stable in-place sort of a result set.
pub fn sort_products(products: &mut [ProductRecord], sort: SortOption) {
    match sort {
        SortOption::Recommended => products.sort_by(|a, b| {
            let (a, b) = (&a.attributes, &b.attributes);
            a.badge_rank()
                .cmp(&b.badge_rank())
                .then_with(|| b.score.total_cmp(&a.score))
                .then_with(|| b.total_reviews.cmp(&a.total_reviews))
        }),
        SortOption::RatingDesc => {
            products.sort_by(|a, b| b.attributes.score.total_cmp(&a.attributes.score));
        }
        SortOption::ReviewsDesc => {
            products.sort_by(|a, b| b.attributes.total_reviews.cmp(&a.attributes.total_reviews));
        }
        SortOption::PriceAsc => products.sort_by_key(|p| p.attributes.price),
        SortOption::PriceDesc => {
            products.sort_by(|a, b| b.attributes.price.cmp(&a.attributes.price));
        }
    }
}
