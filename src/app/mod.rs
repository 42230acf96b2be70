pub mod config;
pub mod logging_system;
pub mod report;

pub use config::{Config, ConfigError, InsightConfig, LogFormat, LogLevel, PaginationConfig};
pub use logging_system::{LoggingError, LoggingSystem, setup_logging};
pub use report::{DashboardReport, ProductSummary, ReportSurface, SectionSummary};

use crate::aggregation::{AggregationCoordinator, InsightRequest};
use crate::catalog::{Catalog, popular};
use crate::domain::InsightError;
use crate::session::DashboardSession;
use crate::sources::{CategoryNeighbours, LocalReviewStore};
use anyhow::Context;
use std::sync::Arc;
use tracing::{debug, info};

pub struct App {
    config: Config,
    catalog: Arc<Catalog>,
    coordinator: AggregationCoordinator,
}

impl App {
    pub async fn from_args<I, T>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::from_config(Self::load_config(args)?).await
    }

    /// CLI arguments and environment, overlaid with the config file when one
    /// is named.
    pub fn load_config<I, T>(args: I) -> Result<Config, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let config = Config::from_args(args)?;
        match config.config_file.clone() {
            Some(path) => config.merge_file(&path),
            None => Ok(config),
        }
    }

    /// Loads the catalog and reviews named by `config` and wires the local
    /// collaborators.
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let catalog = Arc::new(Catalog::from_path(&config.catalog_path).map_err(InsightError::from)?);

        let reviews = match &config.reviews_path {
            Some(path) => LocalReviewStore::from_path(path)
                .await
                .context("failed to load review store")?,
            None => {
                info!("No reviews file configured, review and trend panels will be empty");
                LocalReviewStore::default()
            }
        };
        let reviews = Arc::new(reviews);

        let coordinator = AggregationCoordinator::new(
            reviews.clone(),
            reviews,
            Arc::new(CategoryNeighbours::new(Arc::clone(&catalog))),
        )
        .with_top_n(config.insight.recommendation_top_n);

        Ok(Self::with_parts(config, catalog, coordinator))
    }

    pub fn with_parts(
        config: Config,
        catalog: Arc<Catalog>,
        coordinator: AggregationCoordinator,
    ) -> Self {
        Self {
            config,
            catalog,
            coordinator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// One dashboard pass: filter, page, optionally open a product and
    /// aggregate its insights.
    pub async fn run(&self) -> Result<DashboardReport, InsightError> {
        let config = &self.config;
        let criteria = config.criteria();
        let signature = criteria.signature();
        let mut session = DashboardSession::new(
            config.pagination.page_size,
            config.pagination.category_page_size,
        );

        let mut scroll_requests = 0usize;
        let mut scroll = || {
            scroll_requests += 1;
            debug!(total = scroll_requests, "Scroll to top requested");
        };

        let initial = criteria.is_initial();
        let results = if initial {
            Vec::new()
        } else {
            self.catalog.search(&criteria)
        };
        info!(
            query = %criteria.query,
            results = results.len(),
            initial,
            "Searched catalog"
        );

        session.render_results(&results, &signature, &mut scroll);
        while session.page() < config.page && session.advance_page(&mut scroll) {}

        let mut surface = ReportSurface::new(config.trend_frequency);
        let mut selected = None;
        if let Some(name) = &config.select {
            let product = self
                .catalog
                .find_by_name(name)
                .ok_or_else(|| InsightError::UnknownProduct(name.clone()))?;
            session.select_product(product.id.clone(), &mut scroll);

            let request = InsightRequest::for_product(
                product,
                config.insight.representative_review_limit,
            );
            let outcome = session
                .load_insights(&self.coordinator, &request, &mut surface)
                .await;
            info!(
                product_id = %product.id,
                failures = outcome.failures.len(),
                recommendation_skipped = outcome.recommendation_skipped,
                "Loaded product insights"
            );
            selected = Some(ProductSummary::from(product));
        }

        let view = session.render_results(&results, &signature, &mut scroll);
        let popular_products = if initial {
            popular(&self.catalog, config.insight.popular_count)
                .into_iter()
                .map(ProductSummary::from)
                .collect()
        } else {
            Vec::new()
        };

        Ok(DashboardReport {
            filter: criteria.clone(),
            total_results: view.total_results,
            page: view.page,
            total_pages: view.total_pages,
            popular: popular_products,
            results: view.items.iter().map(ProductSummary::from).collect(),
            sections: view.sections.iter().map(SectionSummary::from).collect(),
            selected,
            review: surface.review().cloned(),
            trend: surface.trend().cloned(),
            recommendation_error: surface.recommendation_error().map(str::to_string),
            recommendations: session.cache().recommendations().to_vec(),
            scroll_requests,
        })
    }
}

pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Main entry point for the application
pub async fn main() -> anyhow::Result<()> {
    let config = App::load_config(std::env::args_os())?;
    setup_logging(config.log_level, config.log_format, &config.log_directives)
        .map_err(InsightError::from)?;
    info!("Starting catalog-insight v{}", get_version());

    let app = App::from_config(config).await?;

    let report = app.run().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
