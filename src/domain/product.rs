use super::error::InsightError;
use super::review_ids::{ReviewId, parse_review_ids};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Display label used for products that carry no group key.
pub const UNGROUPED_LABEL: &str = "Uncategorized";

/// Non-empty, trimmed product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    pub fn new(raw: impl Into<String>) -> Result<Self, InsightError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InsightError::InvalidProductId(raw));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProductId {
    type Error = InsightError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Category label a product belongs to. Blank labels are not valid keys;
/// such products are ungrouped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(String);

impl GroupKey {
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human-readable section label for an optional group key.
pub fn group_label(key: Option<&GroupKey>) -> &str {
    key.map_or(UNGROUPED_LABEL, GroupKey::as_str)
}

/// Display attributes of a product. The pagination and aggregation core never
/// reads these; filtering, sorting and the local collaborators do.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductAttributes {
    pub product_name: String,
    pub brand: Option<String>,
    pub skin_type: Option<String>,
    pub price: u64,
    pub score: f64,
    pub total_reviews: u64,
    pub badge: Option<String>,
    pub top_keywords: Vec<String>,
    pub category_path_norm: Option<String>,
    pub image_url: Option<String>,
    pub product_url: Option<String>,
    /// Raw representative review reference: a list, a `;`/`,` delimited
    /// string, a scalar, or null.
    pub representative_review_id: serde_json::Value,
}

impl ProductAttributes {
    /// Sort rank of the badge: `BEST` first, then recommended, then none.
    pub fn badge_rank(&self) -> u8 {
        match self.badge.as_deref().map(str::trim) {
            Some(badge) if badge.eq_ignore_ascii_case("best") => 0,
            Some(badge) if badge == "추천" || badge.eq_ignore_ascii_case("recommended") => 1,
            _ => 2,
        }
    }

    /// Representative review references, normalized and truncated to `limit`.
    pub fn representative_review_ids(&self, limit: usize) -> Vec<String> {
        parse_review_ids(&self.representative_review_id, limit)
    }

    /// First representative review reference that is a valid review id.
    pub fn primary_review_id(&self, limit: usize) -> Option<ReviewId> {
        self.representative_review_ids(limit)
            .first()
            .and_then(|raw| ReviewId::parse(raw))
    }
}

/// One product of a result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "product_id")]
    pub id: ProductId,
    #[serde(
        rename = "sub_category",
        default,
        deserialize_with = "deserialize_group_key"
    )]
    pub group_key: Option<GroupKey>,
    #[serde(flatten)]
    pub attributes: ProductAttributes,
}

impl ProductRecord {
    pub fn new(id: ProductId, group_key: Option<GroupKey>) -> Self {
        Self {
            id,
            group_key,
            attributes: ProductAttributes::default(),
        }
    }

    pub fn with_attributes(mut self, attributes: ProductAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn name(&self) -> &str {
        &self.attributes.product_name
    }

    pub fn group_label(&self) -> &str {
        group_label(self.group_key.as_ref())
    }
}

fn deserialize_group_key<'de, D>(deserializer: D) -> Result<Option<GroupKey>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(GroupKey::new))
}
