use super::cache::InsightCache;
use super::outcome::{FetchFailure, TaskKind, TaskOutcome};
use super::render::{PanelState, RenderSurface, ReviewPanel};
use crate::domain::{ProductId, ProductRecord, ReviewId};
use crate::sources::{RatingSeriesSource, ReviewSource, SimilarProductSource};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

pub const DEFAULT_TOP_N: usize = 100;

/// Inputs of one aggregation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightRequest {
    pub product_id: ProductId,
    /// Absent when the product has no valid representative review reference;
    /// the review fetch is skipped then.
    pub review_id: Option<ReviewId>,
    pub categories: Vec<String>,
}

impl InsightRequest {
    pub fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            review_id: None,
            categories: Vec::new(),
        }
    }

    /// Request for `product`, using its first representative review
    /// reference among the first `review_limit`.
    pub fn for_product(product: &ProductRecord, review_limit: usize) -> Self {
        Self {
            product_id: product.id.clone(),
            review_id: product.attributes.primary_review_id(review_limit),
            categories: Vec::new(),
        }
    }

    pub fn with_review_id(mut self, review_id: Option<ReviewId>) -> Self {
        self.review_id = review_id;
        self
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }
}

/// What happened during one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationReport {
    pub launched: Vec<TaskKind>,
    pub completion_order: Vec<TaskKind>,
    pub failures: Vec<FetchFailure>,
    pub review_skipped: bool,
    pub recommendation_skipped: bool,
}

impl AggregationReport {
    pub fn failed(&self, kind: TaskKind) -> bool {
        self.failures.iter().any(|f| f.kind == kind)
    }
}

/// Fans out the review, trend and recommendation fetches for one product and
/// applies their outcomes in completion order.
///
/// Fetch tasks only return values. Panel updates and cache writes happen on
/// the task calling [`AggregationCoordinator::run`].
#[derive(Clone)]
pub struct AggregationCoordinator {
    reviews: Arc<dyn ReviewSource>,
    ratings: Arc<dyn RatingSeriesSource>,
    recommender: Arc<dyn SimilarProductSource>,
    top_n: usize,
}

impl AggregationCoordinator {
    pub fn new(
        reviews: Arc<dyn ReviewSource>,
        ratings: Arc<dyn RatingSeriesSource>,
        recommender: Arc<dyn SimilarProductSource>,
    ) -> Self {
        Self {
            reviews,
            ratings,
            recommender,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub const fn top_n(&self) -> usize {
        self.top_n
    }

    pub async fn run<R>(
        &self,
        request: &InsightRequest,
        cache: &mut InsightCache,
        surface: &mut R,
    ) -> AggregationReport
    where
        R: RenderSurface + ?Sized,
    {
        let product_id = &request.product_id;
        let mut report = AggregationReport::default();

        surface.render_review(PanelState::Loading);
        surface.render_trend(PanelState::Loading);

        let mut tasks = JoinSet::new();

        match request.review_id {
            Some(review_id) => {
                let reviews = Arc::clone(&self.reviews);
                let id = product_id.clone();
                spawn_guarded(&mut tasks, TaskKind::Review, async move {
                    let text = reviews.fetch_representative_review(&id, review_id).await?;
                    anyhow::Ok(TaskOutcome::Review(text))
                });
                report.launched.push(TaskKind::Review);
            }
            None => {
                debug!(%product_id, "No representative review reference, skipping review fetch");
                report.review_skipped = true;
                surface.render_review(PanelState::Success(ReviewPanel::NoRepresentativeReview));
            }
        }

        let ratings = Arc::clone(&self.ratings);
        let id = product_id.clone();
        spawn_guarded(&mut tasks, TaskKind::Trend, async move {
            let points = ratings.fetch_rating_series(&id).await?;
            anyhow::Ok(TaskOutcome::Trend(points))
        });
        report.launched.push(TaskKind::Trend);

        if cache.targets(product_id) {
            debug!(%product_id, "Recommendations already cached for product");
            report.recommendation_skipped = true;
        } else {
            let recommender = Arc::clone(&self.recommender);
            let id = product_id.clone();
            let categories = request.categories.clone();
            let top_n = self.top_n;
            spawn_guarded(&mut tasks, TaskKind::Recommendation, async move {
                let similar = recommender
                    .fetch_similar_products(&id, &categories, top_n)
                    .await?;
                anyhow::Ok(TaskOutcome::Recommendations(similar))
            });
            report.launched.push(TaskKind::Recommendation);
        }

        info!(%product_id, tasks = report.launched.len(), "Started insight aggregation");

        let mut pending = report.launched.clone();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    let kind = outcome.kind();
                    pending.retain(|k| *k != kind);
                    report.completion_order.push(kind);
                    Self::apply(outcome, product_id, cache, surface, &mut report);
                }
                Err(join_error) => {
                    warn!(%product_id, error = %join_error, "Fetch task ended without an outcome");
                }
            }
        }

        for kind in pending {
            let failure = FetchFailure::new(kind, "task terminated without reporting");
            Self::apply(TaskOutcome::Failure(failure), product_id, cache, surface, &mut report);
        }

        info!(
            %product_id,
            completed = report.completion_order.len(),
            failed = report.failures.len(),
            "Finished insight aggregation"
        );
        report
    }

    fn apply<R>(
        outcome: TaskOutcome,
        product_id: &ProductId,
        cache: &mut InsightCache,
        surface: &mut R,
        report: &mut AggregationReport,
    ) where
        R: RenderSurface + ?Sized,
    {
        match outcome {
            TaskOutcome::Review(text) => {
                surface.render_review(PanelState::Success(ReviewPanel::from_text(text)));
            }
            TaskOutcome::Trend(points) => {
                cache.store_trend(product_id.clone(), points.clone());
                surface.render_trend(PanelState::Success(points));
            }
            TaskOutcome::Recommendations(similar) => {
                let items = similar.into_flat();
                debug!(%product_id, recommendations = items.len(), "Cached recommendations");
                cache.store_recommendations(product_id.clone(), items);
            }
            TaskOutcome::Failure(failure) => {
                warn!(%product_id, task = %failure.kind, cause = %failure.cause, "Fetch failed");
                match failure.kind {
                    TaskKind::Review => surface.render_review(PanelState::Error(failure.cause.clone())),
                    TaskKind::Trend => surface.render_trend(PanelState::Error(failure.cause.clone())),
                    TaskKind::Recommendation => surface.report_recommendation_failure(&failure),
                }
                report.failures.push(failure);
            }
        }
    }
}

/// Spawns `fetch` so that errors and panics both come back as a failure
/// outcome for `kind`.
fn spawn_guarded<F>(tasks: &mut JoinSet<TaskOutcome>, kind: TaskKind, fetch: F)
where
    F: Future<Output = anyhow::Result<TaskOutcome>> + Send + 'static,
{
    tasks.spawn(async move {
        let started = Instant::now();
        let outcome = match AssertUnwindSafe(fetch).catch_unwind().await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(error)) => TaskOutcome::Failure(FetchFailure::from_error(kind, &error)),
            Err(payload) => TaskOutcome::Failure(FetchFailure::new(
                kind,
                format!("task panicked: {}", panic_message(payload.as_ref())),
            )),
        };
        debug!(
            task = %kind,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fetch task finished"
        );
        outcome
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}
