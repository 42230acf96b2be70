//! Domain layer for catalog-insight.
//!
//! Contains the canonical types shared across all modules:
//! - `ProductRecord`: one row of a filtered result set
//! - `ProductId` / `GroupKey`: validated identifiers
//! - `FilterSignature`: value snapshot of what the user asked for
//! - `ReviewId`: representative review references
//! - `InsightError`: Top-level error type

pub mod error;
pub mod product;
pub mod review_ids;
pub mod signature;

pub use error::InsightError;
pub use product::{GroupKey, ProductAttributes, ProductId, ProductRecord, UNGROUPED_LABEL, group_label};
pub use review_ids::{ReviewId, parse_review_ids};
pub use signature::{FilterSignature, SortOption};
