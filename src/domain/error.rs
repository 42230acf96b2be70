use thiserror::Error;

/// Top-level error type for the dashboard engine.
#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::app::ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] crate::catalog::CatalogError),

    #[error("Invalid product id: {0:?}")]
    InvalidProductId(String),

    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    #[error("Logging error: {0}")]
    Logging(#[from] crate::app::LoggingError),
}
