//! Product catalog loading, lookup and search.

pub mod filter;

pub use filter::{FilterCriteria, sort_products};

use crate::domain::{ProductId, ProductRecord};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Duplicate product id: {0}")]
    DuplicateProductId(ProductId),
}

/// In-memory product catalog, kept in source order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<ProductRecord>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    pub fn new(products: Vec<ProductRecord>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if index.insert(product.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateProductId(product.id.clone()));
            }
        }
        Ok(Self { products, index })
    }

    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let products: Vec<ProductRecord> = serde_json::from_str(content)?;
        Self::new(products)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&content)?;
        info!(
            path = %path.display(),
            products = catalog.len(),
            "Loaded product catalog"
        );
        Ok(catalog)
    }

    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: &ProductId) -> Option<&ProductRecord> {
        self.index.get(id).map(|&position| &self.products[position])
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ProductRecord> {
        let name = name.trim();
        self.products.iter().find(|p| p.name() == name)
    }

    /// Distinct sub-category labels, sorted.
    pub fn sub_categories(&self) -> Vec<String> {
        self.products
            .iter()
            .filter_map(|p| p.group_key.as_ref().map(|k| k.as_str().to_string()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct skin types, sorted.
    pub fn skin_types(&self) -> Vec<String> {
        self.products
            .iter()
            .filter_map(|p| p.attributes.skin_type.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Filtered and sorted result set for `criteria`.
    pub fn search(&self, criteria: &FilterCriteria) -> Vec<ProductRecord> {
        criteria.apply(&self.products)
    }
}

/// Most reviewed products, ties broken by rating.
pub fn popular(catalog: &Catalog, count: usize) -> Vec<&ProductRecord> {
    let mut ranked: Vec<&ProductRecord> = catalog.products().iter().collect();
    ranked.sort_by(|a, b| {
        b.attributes
            .total_reviews
            .cmp(&a.attributes.total_reviews)
            .then_with(|| b.attributes.score.total_cmp(&a.attributes.score))
    });
    ranked.truncate(count);
    ranked
}
