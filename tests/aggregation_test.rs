// Aggregation pass behaviour with scripted collaborators
use async_trait::async_trait;
use catalog_insight::aggregation::{
    AggregationCoordinator, FetchFailure, InsightCache, InsightRequest, PanelState, RenderSurface,
    ReviewPanel, ScoredProduct, SimilarProducts, TaskKind,
};
use catalog_insight::domain::{ProductId, ReviewId};
use catalog_insight::session::DashboardSession;
use catalog_insight::sources::{RatingSeriesSource, ReviewSource, SimilarProductSource};
use catalog_insight::trend::RatingPoint;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Clone)]
enum Script<T> {
    Ok(T),
    Fail(&'static str),
    Panic(&'static str),
}

struct Scripted<T> {
    delay: Duration,
    script: Script<T>,
    calls: AtomicUsize,
}

impl<T: Clone> Scripted<T> {
    fn new(delay_ms: u64, script: Script<T>) -> Arc<Self> {
        Arc::new(Self {
            delay: Duration::from_millis(delay_ms),
            script,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn play(&self) -> anyhow::Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        match &self.script {
            Script::Ok(value) => Ok(value.clone()),
            Script::Fail(cause) => Err(anyhow::anyhow!(*cause)),
            Script::Panic(message) => panic!("{message}"),
        }
    }
}

#[async_trait]
impl ReviewSource for Scripted<Option<String>> {
    async fn fetch_representative_review(
        &self,
        _product_id: &ProductId,
        _review_id: ReviewId,
    ) -> anyhow::Result<Option<String>> {
        self.play().await
    }
}

#[async_trait]
impl RatingSeriesSource for Scripted<Vec<RatingPoint>> {
    async fn fetch_rating_series(&self, _product_id: &ProductId) -> anyhow::Result<Vec<RatingPoint>> {
        self.play().await
    }
}

#[async_trait]
impl SimilarProductSource for Scripted<SimilarProducts> {
    async fn fetch_similar_products(
        &self,
        _product_id: &ProductId,
        _categories: &[String],
        _top_n: usize,
    ) -> anyhow::Result<SimilarProducts> {
        self.play().await
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Review(PanelState<ReviewPanel>),
    Trend(PanelState<Vec<RatingPoint>>),
    RecommendationFailed(FetchFailure),
}

#[derive(Default)]
struct EventLog {
    events: Vec<Event>,
}

impl RenderSurface for EventLog {
    fn render_review(&mut self, state: PanelState<ReviewPanel>) {
        self.events.push(Event::Review(state));
    }

    fn render_trend(&mut self, state: PanelState<Vec<RatingPoint>>) {
        self.events.push(Event::Trend(state));
    }

    fn report_recommendation_failure(&mut self, failure: &FetchFailure) {
        self.events.push(Event::RecommendationFailed(failure.clone()));
    }
}

impl EventLog {
    fn last_review(&self) -> Option<&PanelState<ReviewPanel>> {
        self.events.iter().rev().find_map(|e| match e {
            Event::Review(state) => Some(state),
            _ => None,
        })
    }

    fn last_trend(&self) -> Option<&PanelState<Vec<RatingPoint>>> {
        self.events.iter().rev().find_map(|e| match e {
            Event::Trend(state) => Some(state),
            _ => None,
        })
    }
}

fn id(raw: &str) -> ProductId {
    ProductId::new(raw).unwrap()
}

fn points() -> Vec<RatingPoint> {
    vec![RatingPoint::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), 4.5)]
}

fn similar(ids: &[&str]) -> SimilarProducts {
    let mut groups = BTreeMap::new();
    groups.insert(
        "Toner".to_string(),
        ids.iter()
            .map(|raw| ScoredProduct {
                product_id: id(raw),
                product_name: raw.to_string(),
                similarity: 0.9,
                reco_score: 0.8,
            })
            .collect(),
    );
    SimilarProducts::ByCategory(groups)
}

fn request(product: &str) -> InsightRequest {
    InsightRequest::new(id(product)).with_review_id(Some(ReviewId::new(11)))
}

#[tokio::test]
async fn test_outcomes_are_applied_in_completion_order() {
    let reviews = Scripted::new(120, Script::Ok(Some("soothing".to_string())));
    let ratings = Scripted::new(0, Script::Ok(points()));
    let recommender = Scripted::new(40, Script::Ok(similar(&["b"])));
    let coordinator =
        AggregationCoordinator::new(reviews.clone(), ratings.clone(), recommender.clone());

    let mut cache = InsightCache::new();
    let mut log = EventLog::default();
    let report = coordinator.run(&request("a"), &mut cache, &mut log).await;

    assert_eq!(
        report.completion_order,
        vec![TaskKind::Trend, TaskKind::Recommendation, TaskKind::Review]
    );
    assert_eq!(
        &log.events[..2],
        &[
            Event::Review(PanelState::Loading),
            Event::Trend(PanelState::Loading)
        ]
    );
    assert_eq!(log.events[2], Event::Trend(PanelState::Success(points())));
    assert_eq!(
        log.last_review(),
        Some(&PanelState::Success(ReviewPanel::Text("soothing".to_string())))
    );
}

#[tokio::test]
async fn test_trend_timeout_leaves_siblings_intact() {
    let reviews = Scripted::new(10, Script::Ok(Some("text".to_string())));
    let ratings = Scripted::new(30, Script::<Vec<RatingPoint>>::Fail("timeout"));
    let recommender = Scripted::new(20, Script::Ok(similar(&["b", "c"])));
    let coordinator = AggregationCoordinator::new(reviews, ratings, recommender);

    let mut cache = InsightCache::new();
    let mut log = EventLog::default();
    let report = coordinator.run(&request("a"), &mut cache, &mut log).await;

    assert_eq!(log.last_trend(), Some(&PanelState::Error("timeout".to_string())));
    assert_eq!(
        log.last_review(),
        Some(&PanelState::Success(ReviewPanel::Text("text".to_string())))
    );
    assert_eq!(cache.recommendation_target(), Some(&id("a")));
    assert_eq!(cache.recommendations().len(), 2);
    assert_eq!(report.failures, vec![FetchFailure::new(TaskKind::Trend, "timeout")]);
}

#[tokio::test]
async fn test_recommendation_failure_does_not_move_cache_target() {
    let reviews = Scripted::new(5, Script::Ok(Some("text".to_string())));
    let ratings = Scripted::new(5, Script::Ok(points()));
    let recommender = Scripted::new(5, Script::<SimilarProducts>::Fail("model offline"));
    let coordinator =
        AggregationCoordinator::new(reviews, ratings, recommender.clone());

    let mut cache = InsightCache::new();
    let mut log = EventLog::default();
    coordinator.run(&request("a"), &mut cache, &mut log).await;

    assert!(matches!(log.last_review(), Some(PanelState::Success(_))));
    assert!(matches!(log.last_trend(), Some(PanelState::Success(_))));
    assert!(log.events.contains(&Event::RecommendationFailed(FetchFailure::new(
        TaskKind::Recommendation,
        "model offline"
    ))));
    assert_eq!(cache.recommendation_target(), None);

    // Not memoized, so the same product retries.
    coordinator.run(&request("a"), &mut cache, &mut log).await;
    assert_eq!(recommender.calls(), 2);
}

#[tokio::test]
async fn test_recommendations_memoized_by_last_target() {
    let reviews = Scripted::new(0, Script::Ok(None::<String>));
    let ratings = Scripted::new(0, Script::Ok(points()));
    let recommender = Scripted::new(0, Script::Ok(similar(&["x"])));
    let coordinator =
        AggregationCoordinator::new(reviews, ratings.clone(), recommender.clone());
    let mut session = DashboardSession::default();
    let mut log = EventLog::default();

    let first = session.load_insights(&coordinator, &request("a"), &mut log).await;
    let second = session.load_insights(&coordinator, &request("a"), &mut log).await;
    assert!(!first.recommendation_skipped);
    assert!(second.recommendation_skipped);
    assert_eq!(recommender.calls(), 1);

    session.load_insights(&coordinator, &request("b"), &mut log).await;
    session.load_insights(&coordinator, &request("a"), &mut log).await;
    assert_eq!(recommender.calls(), 3);
    assert_eq!(session.cache().recommendation_target(), Some(&id("a")));

    // Trend and review are fetched on every pass.
    assert_eq!(ratings.calls(), 4);
}

#[tokio::test]
async fn test_panicking_task_is_reported_as_failure() {
    let reviews = Scripted::new(0, Script::<Option<String>>::Panic("review parser bug"));
    let ratings = Scripted::new(10, Script::Ok(points()));
    let recommender = Scripted::new(10, Script::Ok(similar(&["b"])));
    let coordinator = AggregationCoordinator::new(reviews, ratings, recommender);

    let mut cache = InsightCache::new();
    let mut log = EventLog::default();
    let report = coordinator.run(&request("a"), &mut cache, &mut log).await;

    assert_eq!(
        log.last_review(),
        Some(&PanelState::Error("task panicked: review parser bug".to_string()))
    );
    assert_eq!(log.last_trend(), Some(&PanelState::Success(points())));
    assert!(cache.targets(&id("a")));
    assert_eq!(report.completion_order.len(), 3);
}

#[tokio::test]
async fn test_empty_review_renders_indicator() {
    let reviews = Scripted::new(0, Script::Ok(Some("   ".to_string())));
    let ratings = Scripted::new(0, Script::Ok(Vec::<RatingPoint>::new()));
    let recommender = Scripted::new(0, Script::Ok(SimilarProducts::Flat(Vec::new())));
    let coordinator = AggregationCoordinator::new(reviews, ratings, recommender);

    let mut log = EventLog::default();
    coordinator
        .run(&request("a"), &mut InsightCache::new(), &mut log)
        .await;

    assert_eq!(
        log.last_review(),
        Some(&PanelState::Success(ReviewPanel::NoRepresentativeReview))
    );
}
