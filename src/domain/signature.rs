use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Result ordering requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Badge rank, then rating, then review count
    #[default]
    Recommended,
    RatingDesc,
    ReviewsDesc,
    PriceAsc,
    PriceDesc,
}

/// Snapshot of every input that defines "what the user asked for".
///
/// Only ever compared for equality against the previously seen snapshot.
/// Equality is over the normalized inputs: the query and list entries are
/// trimmed, and list-valued inputs are sorted and deduplicated, so `" toner"`
/// equals `"toner"` and `["A", "A"]` equals `["A"]`. Rating bounds compare
/// bitwise after canonicalizing NaN and negative zero, so every signature
/// equals itself.
#[derive(Debug, Clone)]
pub struct FilterSignature {
    query: String,
    sub_categories: Vec<String>,
    skin_types: Vec<String>,
    rating_bounds: (f64, f64),
    price_bounds: (u64, u64),
    sort: SortOption,
}

impl FilterSignature {
    pub fn new(
        query: &str,
        sub_categories: &[String],
        skin_types: &[String],
        rating_bounds: (f64, f64),
        price_bounds: (u64, u64),
        sort: SortOption,
    ) -> Self {
        Self {
            query: query.trim().to_string(),
            sub_categories: as_set(sub_categories),
            skin_types: as_set(skin_types),
            rating_bounds: (canonical(rating_bounds.0), canonical(rating_bounds.1)),
            price_bounds,
            sort,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> SortOption {
        self.sort
    }
}

impl PartialEq for FilterSignature {
    fn eq(&self, other: &Self) -> bool {
        self.query == other.query
            && self.sub_categories == other.sub_categories
            && self.skin_types == other.skin_types
            && self.rating_bounds.0.to_bits() == other.rating_bounds.0.to_bits()
            && self.rating_bounds.1.to_bits() == other.rating_bounds.1.to_bits()
            && self.price_bounds == other.price_bounds
            && self.sort == other.sort
    }
}

impl Eq for FilterSignature {}

fn canonical(value: f64) -> f64 {
    if value.is_nan() { f64::NAN } else { value + 0.0 }
}

fn as_set(values: &[String]) -> Vec<String> {
    let mut set: Vec<String> = values.iter().map(|v| v.trim().to_string()).collect();
    set.sort();
    set.dedup();
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn list_order_does_not_affect_equality() {
        let a = FilterSignature::new(
            "cream",
            &strings(&["Toner", "Serum"]),
            &strings(&["dry"]),
            (0.0, 5.0),
            (0, 50_000),
            SortOption::Recommended,
        );
        let b = FilterSignature::new(
            "cream",
            &strings(&["Serum", "Toner", "Serum"]),
            &strings(&["dry"]),
            (0.0, 5.0),
            (0, 50_000),
            SortOption::Recommended,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn non_finite_rating_bounds_equal_themselves() {
        let nan = FilterSignature::new("", &[], &[], (f64::NAN, 5.0), (0, 100), SortOption::Recommended);
        assert_eq!(nan, nan.clone());
        assert_eq!(
            nan,
            FilterSignature::new("", &[], &[], (-f64::NAN, 5.0), (0, 100), SortOption::Recommended)
        );

        let neg_zero = FilterSignature::new("", &[], &[], (-0.0, 5.0), (0, 100), SortOption::Recommended);
        let zero = FilterSignature::new("", &[], &[], (0.0, 5.0), (0, 100), SortOption::Recommended);
        assert_eq!(neg_zero, zero);
        assert_ne!(nan, zero);
    }

    #[test]
    fn query_and_entries_are_trimmed_before_comparison() {
        let padded = FilterSignature::new(
            " toner ",
            &strings(&[" Serum", "Serum"]),
            &[],
            (0.0, 5.0),
            (0, 100),
            SortOption::Recommended,
        );
        let plain = FilterSignature::new(
            "toner",
            &strings(&["Serum"]),
            &[],
            (0.0, 5.0),
            (0, 100),
            SortOption::Recommended,
        );
        assert_eq!(padded, plain);
    }

    #[test]
    fn any_field_change_breaks_equality() {
        let base = FilterSignature::new("", &[], &[], (0.0, 5.0), (0, 100), SortOption::Recommended);
        let sorted = FilterSignature::new("", &[], &[], (0.0, 5.0), (0, 100), SortOption::PriceAsc);
        let rated = FilterSignature::new("", &[], &[], (3.5, 5.0), (0, 100), SortOption::Recommended);
        assert_ne!(base, sorted);
        assert_ne!(base, rated);
    }
}
