use super::ScrollRequester;
use crate::domain::{FilterSignature, GroupKey, ProductRecord};
use std::collections::HashSet;
use tracing::debug;

/// Page size of a single-group result list.
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub page_size: usize,
    pub total_groups: usize,
}

impl PageLayout {
    /// True when paging happens per group instead of globally.
    pub const fn is_grouped(&self) -> bool {
        self.total_groups > 1
    }
}

/// Number of distinct group keys; ungrouped products count as one group.
pub fn count_groups(results: &[ProductRecord]) -> usize {
    results
        .iter()
        .map(|p| p.group_key.as_ref())
        .collect::<HashSet<Option<&GroupKey>>>()
        .len()
}

/// Single-group results are paged by `single_page_size`; grouped results put
/// the whole set on one global page.
pub fn compute_page_size(results: &[ProductRecord], single_page_size: usize) -> PageLayout {
    let total_groups = count_groups(results);
    let page_size = if total_groups > 1 {
        results.len()
    } else {
        single_page_size
    };
    PageLayout {
        page_size: page_size.max(1),
        total_groups,
    }
}

/// `ceil(item_count / page_size)`, never less than one page.
pub fn total_pages(item_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    item_count.div_ceil(page_size).max(1)
}

/// Pulls a 1-based cursor back into `1..=total_pages`.
pub fn clamp_cursor(cursor: usize, total_pages: usize) -> usize {
    cursor.min(total_pages).max(1)
}

/// Items visible on the global page. Grouped layouts return everything (the
/// per-group pager slices further); the detail view suppresses paging.
pub fn page_slice<T>(results: &[T], cursor: usize, layout: PageLayout, detail_view: bool) -> &[T] {
    if detail_view {
        return &[];
    }
    if layout.is_grouped() {
        return results;
    }
    let start = cursor
        .saturating_sub(1)
        .saturating_mul(layout.page_size)
        .min(results.len());
    let end = start.saturating_add(layout.page_size).min(results.len());
    &results[start..end]
}

/// Global cursor plus the last filter signature seen.
#[derive(Debug, Clone)]
pub struct PaginationState {
    cursor: usize,
    total_pages: usize,
    last_signature: Option<FilterSignature>,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new()
    }
}

impl PaginationState {
    pub const fn new() -> Self {
        Self {
            cursor: 1,
            total_pages: 1,
            last_signature: None,
        }
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub const fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn last_signature(&self) -> Option<&FilterSignature> {
        self.last_signature.as_ref()
    }

    /// Records the current page count and clamps the cursor against it.
    /// Runs on every render pass.
    pub fn sync_total_pages(&mut self, total_pages: usize) -> usize {
        self.total_pages = total_pages.max(1);
        self.cursor = clamp_cursor(self.cursor, self.total_pages);
        self.cursor
    }

    /// Resets the cursor, stores `signature` and requests a scroll when the
    /// signature differs from the stored one. Returns whether it did.
    pub fn detect_filter_change<S>(&mut self, signature: &FilterSignature, scroll: &mut S) -> bool
    where
        S: ScrollRequester + ?Sized,
    {
        if self.last_signature.as_ref() == Some(signature) {
            return false;
        }
        debug!(previous_page = self.cursor, "Filter changed, resetting to first page");
        self.cursor = 1;
        self.last_signature = Some(signature.clone());
        scroll.request_scroll_to_top();
        true
    }

    pub fn advance(&mut self) -> bool {
        if self.cursor < self.total_pages {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn retreat(&mut self) -> bool {
        if self.cursor > 1 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }
}
