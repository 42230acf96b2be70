#![deny(warnings, rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
// Noisy pedantic lints suppressed with justification:
#![allow(
    clippy::cast_precision_loss,      // Acceptable for score averages
    clippy::missing_errors_doc,       // Internal API
    clippy::missing_panics_doc,       // Internal API
    clippy::module_name_repetitions,  // e.g. CatalogError in catalog module
    clippy::must_use_candidate,       // Annotated selectively on critical APIs
    clippy::doc_markdown              // Internal API
)]

pub mod aggregation;
pub mod app;
pub mod catalog;
pub mod domain;
pub mod pagination;
pub mod session;
pub mod sources;
pub mod trend;

// Re-export main types for easy access
pub use aggregation::{AggregationCoordinator, InsightRequest};
pub use app::{App, Config};
pub use catalog::Catalog;
pub use domain::{InsightError, ProductId, ProductRecord};
pub use session::DashboardSession;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
