// Global and per-category paging through a dashboard session
use catalog_insight::domain::{FilterSignature, GroupKey, ProductId, ProductRecord, SortOption};
use catalog_insight::pagination::{
    CategoryPager, PaginationState, clamp_cursor, compute_page_size, total_pages,
};
use catalog_insight::session::DashboardSession;
use std::cell::Cell;

fn records(groups: &[(&str, usize)]) -> Vec<ProductRecord> {
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

fn signature(query: &str, sub_categories: &[&str]) -> FilterSignature {
    let sub_categories: Vec<String> = sub_categories.iter().map(|s| (*s).to_string()).collect();
    FilterSignature::new(
        query,
        &sub_categories,
        &[],
        (0.0, 5.0),
        (0, 100_000),
        SortOption::Recommended,
    )
}

#[test]
fn test_total_pages_is_at_least_one() {
    for size in [1, 6, 10, 17] {
        assert_eq!(total_pages(0, size), 1);
    }
    assert_eq!(total_pages(1, 10), 1);
    assert_eq!(total_pages(60, 6), 10);
    assert_eq!(total_pages(61, 6), 11);
}

#[test]
fn test_clamp_cursor_bounds() {
    assert_eq!(clamp_cursor(0, 3), 1);
    assert_eq!(clamp_cursor(2, 3), 2);
    assert_eq!(clamp_cursor(9, 3), 3);
}

#[test]
fn test_twenty_five_items_filter_change_scrolls_once() {
    let results = records(&[("Toner", 25)]);
    let mut session = DashboardSession::default();
    let scrolls = Cell::new(0);
    let mut scroll = || scrolls.set(scrolls.get() + 1);

    let view = session.render_results(&results, &signature("", &["Toner"]), &mut scroll);
    assert_eq!(view.total_pages, 3);
    session.advance_page(&mut scroll);
    session.advance_page(&mut scroll);
    assert_eq!(session.page(), 3);

    let before = scrolls.get();
    let changed = signature("mist", &["Toner"]);
    let view = session.render_results(&results, &changed, &mut scroll);
    assert!(view.filter_changed);
    assert_eq!(view.page, 1);
    assert_eq!(view.items.first().map(|p| p.id.as_str()), Some("Toner-0"));

    // Identical signature on the next passes: no more scroll requests.
    session.render_results(&results, &changed, &mut scroll);
    session.render_results(&results, &changed, &mut scroll);
    assert_eq!(scrolls.get(), before + 1);
}

#[test]
fn test_selection_order_is_not_a_filter_change() {
    let mut state = PaginationState::new();
    let mut scrolls = 0;
    let mut scroll = || scrolls += 1;
    assert!(state.detect_filter_change(&signature("", &["Toner", "Serum"]), &mut scroll));
    assert!(!state.detect_filter_change(&signature("", &["Serum", "Toner"]), &mut scroll));
    assert_eq!(scrolls, 1);
}

#[test]
fn test_shrinking_results_clamp_global_cursor() {
    let mut session = DashboardSession::default();
    let mut scroll = || {};
    let sig = signature("", &[]);

    session.render_results(&records(&[("Toner", 45)]), &sig, &mut scroll);
    while session.advance_page(&mut scroll) {}
    assert_eq!(session.page(), 5);

    let toner = records(&[("Toner", 12)]);
    let view = session.render_results(&toner, &sig, &mut scroll);
    assert_eq!((view.page, view.total_pages), (2, 2));
    assert_eq!(view.items.len(), 2);
}

#[test]
fn test_group_sizes_thirteen_and_four() {
    let results = records(&[("Toner", 13), ("Serum", 4)]);
    let layout = compute_page_size(&results, 10);
    assert!(layout.is_grouped());
    assert_eq!(total_pages(results.len(), layout.page_size), 1);

    let pager = CategoryPager::default();
    assert_eq!(pager.total_pages_for_group(13), 3);
    assert_eq!(pager.total_pages_for_group(4), 1);
}

#[test]
fn test_group_paging_is_independent() {
    let results = records(&[("Toner", 13), ("Serum", 14), ("Cleanser", 2)]);
    let mut session = DashboardSession::default();
    let mut scrolls = 0;
    let mut scroll = || scrolls += 1;
    let sig = signature("", &["Toner", "Serum", "Cleanser"]);

    session.render_results(&results, &sig, &mut scroll);
    let toner = GroupKey::new("Toner");
    let serum = GroupKey::new("Serum");

    assert!(session.advance_group_page(toner.as_ref()));
    assert!(session.advance_group_page(toner.as_ref()));
    assert!(session.advance_group_page(serum.as_ref()));
    assert!(session.retreat_group_page(serum.as_ref()));
    assert!(!session.retreat_group_page(serum.as_ref()));

    let view = session.render_results(&results, &sig, &mut scroll);
    let pages: Vec<(&str, usize)> = view
        .sections
        .iter()
        .map(|s| (s.label.as_str(), s.page))
        .collect();
    assert_eq!(pages, vec![("Cleanser", 1), ("Serum", 1), ("Toner", 3)]);
    assert_eq!(session.page(), 1);
    assert_eq!(scrolls, 1);
}

#[test]
fn test_group_cursors_survive_filter_changes() {
    let results = records(&[("Toner", 13), ("Serum", 4)]);
    let mut session = DashboardSession::default();
    let mut scroll = || {};
    session.render_results(&results, &signature("", &[]), &mut scroll);
    session.advance_group_page(GroupKey::new("Toner").as_ref());

    let narrowed = records(&[("Toner", 8), ("Serum", 4)]);
    let view = session.render_results(&narrowed, &signature("gel", &[]), &mut scroll);
    let toner = view.sections.iter().find(|s| s.label == "Toner").unwrap();
    assert_eq!((toner.page, toner.total_pages, toner.items.len()), (2, 2, 2));
}
