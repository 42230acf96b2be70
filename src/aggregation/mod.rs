//! Concurrent fan-out of the per-product insight fetches.
//!
//! One pass launches up to three tasks (review, trend, recommendation) and
//! applies each outcome as soon as it completes. A failing task only affects
//! its own panel.

pub mod cache;
pub mod coordinator;
pub mod outcome;
pub mod render;

pub use cache::InsightCache;
pub use coordinator::{AggregationCoordinator, AggregationReport, DEFAULT_TOP_N, InsightRequest};
pub use outcome::{FetchFailure, ScoredProduct, SimilarProducts, TaskKind, TaskOutcome};
pub use render::{PanelState, RenderSurface, ReviewPanel};
