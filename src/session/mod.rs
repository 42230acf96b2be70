//! Per-user dashboard session.
//!
//! All mutable state of one dashboard (global cursor, per-group cursors, the
//! last filter signature, the selected product and the insight cache) lives
//! in [`DashboardSession`]. Every render pass and user command takes it by
//! `&mut`.

use crate::aggregation::{
    AggregationCoordinator, AggregationReport, InsightCache, InsightRequest, RenderSurface,
};
use crate::domain::{FilterSignature, GroupKey, ProductId, ProductRecord};
use crate::pagination::{
    CategoryPager, CategorySection, DEFAULT_CATEGORY_PAGE_SIZE, DEFAULT_PAGE_SIZE, PageLayout,
    PaginationState, ScrollRequester, compute_page_size, page_slice, total_pages,
};
use tracing::debug;

/// Output of one render pass over a result set.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView<'a> {
    pub page: usize,
    pub total_pages: usize,
    pub total_results: usize,
    pub layout: PageLayout,
    pub filter_changed: bool,
    /// Products on the current global page; empty in the detail view.
    pub items: &'a [ProductRecord],
    /// Per-group sections; only filled when results span several groups.
    pub sections: Vec<CategorySection<'a>>,
}

#[derive(Debug, Clone)]
pub struct DashboardSession {
    pagination: PaginationState,
    category_pager: CategoryPager,
    single_page_size: usize,
    selected: Option<ProductId>,
    cache: InsightCache,
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_CATEGORY_PAGE_SIZE)
    }
}

impl DashboardSession {
    pub fn new(page_size: usize, category_page_size: usize) -> Self {
        Self {
            pagination: PaginationState::new(),
            category_pager: CategoryPager::new(category_page_size),
            single_page_size: page_size.max(1),
            selected: None,
            cache: InsightCache::new(),
        }
    }

    /// Lays out `results` for the current cursors.
    ///
    /// Page counts are recomputed and cursors clamped on every call. A
    /// signature different from the previous one resets the global cursor
    /// and requests a single scroll to the top.
    pub fn render_results<'a, S>(
        &mut self,
        results: &'a [ProductRecord],
        signature: &FilterSignature,
        scroll: &mut S,
    ) -> ResultsView<'a>
    where
        S: ScrollRequester + ?Sized,
    {
        let layout = compute_page_size(results, self.single_page_size);
        self.pagination
            .sync_total_pages(total_pages(results.len(), layout.page_size));
        let filter_changed = self.pagination.detect_filter_change(signature, scroll);

        let detail_view = self.selected.is_some();
        let items = page_slice(results, self.pagination.cursor(), layout, detail_view);
        let sections = if layout.is_grouped() && !detail_view {
            self.category_pager.sections(results)
        } else {
            Vec::new()
        };

        debug!(
            page = self.pagination.cursor(),
            total_pages = self.pagination.total_pages(),
            groups = layout.total_groups,
            filter_changed,
            "Rendered result page"
        );

        ResultsView {
            page: self.pagination.cursor(),
            total_pages: self.pagination.total_pages(),
            total_results: results.len(),
            layout,
            filter_changed,
            items,
            sections,
        }
    }

    pub fn advance_page<S>(&mut self, scroll: &mut S) -> bool
    where
        S: ScrollRequester + ?Sized,
    {
        let moved = self.pagination.advance();
        if moved {
            scroll.request_scroll_to_top();
        }
        moved
    }

    pub fn retreat_page<S>(&mut self, scroll: &mut S) -> bool
    where
        S: ScrollRequester + ?Sized,
    {
        let moved = self.pagination.retreat();
        if moved {
            scroll.request_scroll_to_top();
        }
        moved
    }

    /// Pages one category section forward. The view stays where it is.
    pub fn advance_group_page(&mut self, key: Option<&GroupKey>) -> bool {
        self.category_pager.advance(key)
    }

    pub fn retreat_group_page(&mut self, key: Option<&GroupKey>) -> bool {
        self.category_pager.retreat(key)
    }

    /// Opens the detail view of `product_id`.
    pub fn select_product<S>(&mut self, product_id: ProductId, scroll: &mut S)
    where
        S: ScrollRequester + ?Sized,
    {
        debug!(%product_id, "Selected product");
        self.selected = Some(product_id);
        scroll.request_scroll_to_top();
    }

    pub fn clear_selection<S>(&mut self, scroll: &mut S)
    where
        S: ScrollRequester + ?Sized,
    {
        self.selected = None;
        scroll.request_scroll_to_top();
    }

    pub fn selected_product(&self) -> Option<&ProductId> {
        self.selected.as_ref()
    }

    pub const fn page(&self) -> usize {
        self.pagination.cursor()
    }

    pub const fn total_pages(&self) -> usize {
        self.pagination.total_pages()
    }

    pub fn group_page(&self, key: Option<&GroupKey>) -> Option<usize> {
        self.category_pager.cursor(key)
    }

    pub fn cache(&self) -> &InsightCache {
        &self.cache
    }

    /// Runs one aggregation pass against this session's cache.
    pub async fn load_insights<R>(
        &mut self,
        coordinator: &AggregationCoordinator,
        request: &InsightRequest,
        surface: &mut R,
    ) -> AggregationReport
    where
        R: RenderSurface + ?Sized,
    {
        coordinator.run(request, &mut self.cache, surface).await
    }
}
