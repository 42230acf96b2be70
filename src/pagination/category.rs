use super::state::{clamp_cursor, total_pages};
use crate::domain::{GroupKey, ProductRecord, group_label};
use std::collections::HashMap;

/// Page size inside each category section.
pub const DEFAULT_CATEGORY_PAGE_SIZE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GroupCursor {
    page: usize,
    total_pages: usize,
}

/// One rendered category section of a grouped result set.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySection<'a> {
    pub key: Option<GroupKey>,
    pub label: String,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// 1-based position of the first visible item within the group; 0 when empty.
    pub first_item: usize,
    pub items: Vec<&'a ProductRecord>,
}

/// Independent cursors, one per group key, created on first display and kept
/// for the rest of the session.
#[derive(Debug, Clone)]
pub struct CategoryPager {
    page_size: usize,
    cursors: HashMap<Option<GroupKey>, GroupCursor>,
}

impl Default for CategoryPager {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORY_PAGE_SIZE)
    }
}

impl CategoryPager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            cursors: HashMap::new(),
        }
    }

    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages_for_group(&self, group_size: usize) -> usize {
        total_pages(group_size, self.page_size)
    }

    /// Current page of a group, if it has been displayed.
    pub fn cursor(&self, key: Option<&GroupKey>) -> Option<usize> {
        self.cursors.get(&key.cloned()).map(|c| c.page)
    }

    pub fn tracked_groups(&self) -> usize {
        self.cursors.len()
    }

    /// Splits `results` into sections (named groups in key order, the
    /// ungrouped section last), clamping every visited cursor.
    pub fn sections<'a>(&mut self, results: &'a [ProductRecord]) -> Vec<CategorySection<'a>> {
        let mut groups: HashMap<Option<&GroupKey>, Vec<&'a ProductRecord>> = HashMap::new();
        for product in results {
            groups.entry(product.group_key.as_ref()).or_default().push(product);
        }
        let mut groups: Vec<_> = groups.into_iter().collect();
        groups.sort_by(|(a, _), (b, _)| (a.is_none(), a).cmp(&(b.is_none(), b)));

        groups
            .into_iter()
            .map(|(key, members)| {
                let total = self.total_pages_for_group(members.len());
                let cursor = self
                    .cursors
                    .entry(key.cloned())
                    .or_insert(GroupCursor { page: 1, total_pages: total });
                cursor.total_pages = total;
                cursor.page = clamp_cursor(cursor.page, total);

                let start = (cursor.page - 1) * self.page_size;
                let end = (start + self.page_size).min(members.len());
                let items = members.get(start..end).map(<[_]>::to_vec).unwrap_or_default();

                CategorySection {
                    key: key.cloned(),
                    label: group_label(key).to_string(),
                    page: cursor.page,
                    total_pages: total,
                    total_items: members.len(),
                    first_item: if items.is_empty() { 0 } else { start + 1 },
                    items,
                }
            })
            .collect()
    }

    /// Moves one group forward. Unknown groups and last pages are left alone.
    pub fn advance(&mut self, key: Option<&GroupKey>) -> bool {
        match self.cursors.get_mut(&key.cloned()) {
            Some(cursor) if cursor.page < cursor.total_pages => {
                cursor.page += 1;
                true
            }
            _ => false,
        }
    }

    pub fn retreat(&mut self, key: Option<&GroupKey>) -> bool {
        match self.cursors.get_mut(&key.cloned()) {
            Some(cursor) if cursor.page > 1 => {
                cursor.page -= 1;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProductId;

    fn grouped(groups: &[(&str, usize)]) -> Vec<ProductRecord> {
        groups
            .iter()
            .flat_map(|(group, count)| {
                (0..*count).map(move |i| {
                    ProductRecord::new(
                        ProductId::new(format!("{group}-{i}")).unwrap(),
                        GroupKey::new(group),
                    )
                })
            })
            .collect()
    }

    fn key(label: &str) -> Option<GroupKey> {
        GroupKey::new(label)
    }

    #[test]
    fn group_page_counts_follow_group_size() {
        let pager = CategoryPager::default();
        assert_eq!(pager.total_pages_for_group(13), 3);
        assert_eq!(pager.total_pages_for_group(4), 1);
        assert_eq!(pager.total_pages_for_group(0), 1);
    }

    #[test]
    fn sections_are_created_lazily_and_sorted() {
        let results = grouped(&[("Toner", 13), ("", 2), ("Serum", 4)]);
        let mut pager = CategoryPager::default();
        assert_eq!(pager.tracked_groups(), 0);

        let sections = pager.sections(&results);
        let labels: Vec<&str> = sections.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Serum", "Toner", crate::domain::UNGROUPED_LABEL]);
        assert_eq!(pager.tracked_groups(), 3);

        let toner = &sections[1];
        assert_eq!((toner.page, toner.total_pages, toner.total_items), (1, 3, 13));
        assert_eq!(toner.items.len(), 6);
        assert_eq!(toner.first_item, 1);
    }

    #[test]
    fn advancing_one_group_leaves_others_alone() {
        let results = grouped(&[("Toner", 13), ("Serum", 8)]);
        let mut pager = CategoryPager::default();
        pager.sections(&results);

        assert!(pager.advance(key("Toner").as_ref()));
        assert!(pager.advance(key("Toner").as_ref()));
        assert!(!pager.advance(key("Toner").as_ref()));

        assert_eq!(pager.cursor(key("Toner").as_ref()), Some(3));
        assert_eq!(pager.cursor(key("Serum").as_ref()), Some(1));

        let sections = pager.sections(&results);
        let toner = sections.iter().find(|s| s.label == "Toner").unwrap();
        assert_eq!(toner.items.len(), 1);
        assert_eq!(toner.first_item, 13);
    }

    #[test]
    fn unknown_group_cannot_be_paged() {
        let mut pager = CategoryPager::default();
        assert!(!pager.advance(key("Toner").as_ref()));
        assert!(!pager.retreat(key("Toner").as_ref()));
        assert_eq!(pager.tracked_groups(), 0);
    }

    #[test]
    fn shrinking_group_is_clamped_on_read() {
        let mut pager = CategoryPager::default();
        pager.sections(&grouped(&[("Toner", 13), ("Serum", 1)]));
        pager.advance(key("Toner").as_ref());
        pager.advance(key("Toner").as_ref());

        let smaller = grouped(&[("Toner", 7), ("Serum", 1)]);
        let sections = pager.sections(&smaller);
        let toner = sections.iter().find(|s| s.label == "Toner").unwrap();
        assert_eq!((toner.page, toner.total_pages), (2, 2));
        assert_eq!(pager.cursor(key("Toner").as_ref()), Some(2));
    }
}
