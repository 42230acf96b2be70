//! Filter-aware pagination.
//!
//! Two mutually exclusive policies, selected by how many distinct group keys
//! the active result set holds:
//! - one group (or none): a single global cursor pages the flat list
//! - two or more groups: every group is paged independently by
//!   [`CategoryPager`], and the global page is the whole result set

pub mod category;
pub mod state;

pub use category::{CategoryPager, CategorySection, DEFAULT_CATEGORY_PAGE_SIZE};
pub use state::{
    DEFAULT_PAGE_SIZE, PageLayout, PaginationState, clamp_cursor, compute_page_size, count_groups,
    page_slice, total_pages,
};

/// Fire-and-forget "scroll the view back to the top" side effect.
pub trait ScrollRequester {
    fn request_scroll_to_top(&mut self);
}

impl<F: FnMut()> ScrollRequester for F {
    fn request_scroll_to_top(&mut self) {
        self();
    }
}
