//! Pagination calculator
//!
//! Slices a filtered list into pages and computes the bounded window of
//! page links shown by the browse UI. Out-of-range page requests clamp
//! rather than error.

use serde::Serialize;

/// One page of a paginated list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Compute the page slice for `requested_page`.
///
/// `total_pages = max(1, ceil(len / page_size))`; the current page is
/// clamped into `[1, total_pages]`.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, requested_page: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = (total_items.div_ceil(page_size)).max(1);
    let current_page = requested_page.clamp(1, total_pages);

    let start = (current_page - 1) * page_size;
    let end = (start + page_size).min(total_items);
    let items = if start < total_items {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        items,
        current_page,
        total_pages,
        total_items,
    }
}

/// One entry in the rendered page-number strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "number", rename_all = "lowercase")]
pub enum PageLink {
    Page(usize),
    Ellipsis,
}

/// Bounded window of page links with ellipsis collapsing.
///
/// All pages are shown when there are at most five; otherwise the window
/// keeps the first four plus the last page near the start, the first page
/// plus the last four near the end, and first + neighbours + last in the
/// middle.
pub fn page_links(current_page: usize, total_pages: usize) -> Vec<PageLink> {
    const MAX_VISIBLE_PAGES: usize = 5;

    let mut links = Vec::new();

    if total_pages <= MAX_VISIBLE_PAGES {
        links.extend((1..=total_pages).map(PageLink::Page));
    } else if current_page <= 3 {
        links.extend((1..=4).map(PageLink::Page));
        links.push(PageLink::Ellipsis);
        links.push(PageLink::Page(total_pages));
    } else if current_page >= total_pages - 2 {
        links.push(PageLink::Page(1));
        links.push(PageLink::Ellipsis);
        links.extend((total_pages - 3..=total_pages).map(PageLink::Page));
    } else {
        links.push(PageLink::Page(1));
        links.push(PageLink::Ellipsis);
        links.extend((current_page - 1..=current_page + 1).map(PageLink::Page));
        links.push(PageLink::Ellipsis);
        links.push(PageLink::Page(total_pages));
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageLink::{Ellipsis, Page as P};

    #[test]
    fn test_total_pages_is_ceiling() {
        let items: Vec<u32> = (0..25).collect();
        let page = paginate(&items, 20, 1);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 20);

        let page2 = paginate(&items, 20, 2);
        assert_eq!(page2.items.len(), 5);
        assert_eq!(page2.items[0], 20);
    }

    #[test]
    fn test_empty_list_has_one_page() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, 20, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_out_of_range_requests_clamp() {
        let items: Vec<u32> = (0..25).collect();

        // Page 0 clamps to 1
        let first = paginate(&items, 20, 0);
        assert_eq!(first.current_page, 1);

        // totalPages + 5 yields the same slice as totalPages
        let last = paginate(&items, 20, 2);
        let beyond = paginate(&items, 20, 7);
        assert_eq!(beyond.current_page, last.current_page);
        assert_eq!(beyond.items, last.items);
    }

    #[test]
    fn test_page_size_zero_is_treated_as_one() {
        let items: Vec<u32> = (0..3).collect();
        let page = paginate(&items, 0, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items, vec![1]);
    }

    #[test]
    fn test_exact_boundary_slices() {
        let items: Vec<u32> = (0..40).collect();
        let page = paginate(&items, 20, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 20);
        assert_eq!(*page.items.first().unwrap(), 20);
        assert_eq!(*page.items.last().unwrap(), 39);
    }

    #[test]
    fn test_links_show_all_pages_up_to_five() {
        assert_eq!(page_links(1, 1), vec![P(1)]);
        assert_eq!(page_links(3, 5), vec![P(1), P(2), P(3), P(4), P(5)]);
    }

    #[test]
    fn test_links_near_start() {
        // current <= 3: first four, ellipsis, last
        assert_eq!(
            page_links(2, 10),
            vec![P(1), P(2), P(3), P(4), Ellipsis, P(10)]
        );
        assert_eq!(
            page_links(3, 10),
            vec![P(1), P(2), P(3), P(4), Ellipsis, P(10)]
        );
    }

    #[test]
    fn test_links_near_end() {
        // current >= total - 2: first, ellipsis, last four
        assert_eq!(
            page_links(8, 10),
            vec![P(1), Ellipsis, P(7), P(8), P(9), P(10)]
        );
        assert_eq!(
            page_links(10, 10),
            vec![P(1), Ellipsis, P(7), P(8), P(9), P(10)]
        );
    }

    #[test]
    fn test_links_in_the_middle() {
        assert_eq!(
            page_links(5, 10),
            vec![P(1), Ellipsis, P(4), P(5), P(6), Ellipsis, P(10)]
        );
    }

    #[test]
    fn test_links_boundary_between_start_and_middle() {
        // current == 4 on 10 pages is the first "middle" layout
        assert_eq!(
            page_links(4, 10),
            vec![P(1), Ellipsis, P(3), P(4), P(5), Ellipsis, P(10)]
        );
        // current == 7 on 10 pages is the last "middle" layout
        assert_eq!(
            page_links(7, 10),
            vec![P(1), Ellipsis, P(6), P(7), P(8), Ellipsis, P(10)]
        );
    }
}
