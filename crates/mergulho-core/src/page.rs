//! Offset pagination.

use serde::Serialize;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u64 = 100;

/// A requested page. Out-of-range values are clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    page_size: u64,
}

impl PageRequest {
    /// Clamp `page` to at least 1 and `page_size` into `[1, 100]`.
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: page.max(1) as u64,
            page_size: page_size.clamp(1, MAX_PAGE_SIZE as i64) as u64,
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of documents skipped before this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    /// True iff this page came back full.
    ///
    /// No exact count is taken while listing, so an exactly full final page
    /// also reports `true`; the following page is then empty.
    pub has_more: bool,
}

impl<T> PageResult<T> {
    /// Build a page from the items returned for `request`.
    pub fn from_items(items: Vec<T>, request: PageRequest) -> Self {
        let has_more = items.len() as u64 == request.page_size();
        Self {
            items,
            page: request.page(),
            page_size: request.page_size(),
            has_more,
        }
    }

    /// The page to link as "next", if any.
    pub fn next_page(&self) -> Option<u64> {
        self.has_more.then(|| self.page + 1)
    }

    /// The page to link as "previous", if any.
    pub fn prev_page(&self) -> Option<u64> {
        (self.page > 1).then(|| self.page - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_page() {
        assert_eq!(PageRequest::new(0, 10).page(), 1);
        assert_eq!(PageRequest::new(-5, 10).page(), 1);
        assert_eq!(PageRequest::new(i64::MIN, 10).page(), 1);
        assert_eq!(PageRequest::new(7, 10).page(), 7);
    }

    #[test]
    fn clamps_page_size() {
        assert_eq!(PageRequest::new(1, 0).page_size(), 1);
        assert_eq!(PageRequest::new(1, -3).page_size(), 1);
        assert_eq!(PageRequest::new(1, 101).page_size(), 100);
        assert_eq!(PageRequest::new(1, i64::MAX).page_size(), 100);
        assert_eq!(PageRequest::new(1, 25).page_size(), 25);
    }

    #[test]
    fn offset_from_page() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
        assert_eq!(PageRequest::new(i64::MAX, 100).offset(), u64::MAX);
    }

    #[test]
    fn has_more_only_when_full() {
        let request = PageRequest::new(2, 3);
        assert!(PageResult::from_items(vec![1, 2, 3], request).has_more);
        assert!(!PageResult::from_items(vec![1, 2], request).has_more);
        assert!(!PageResult::<u8>::from_items(vec![], request).has_more);
    }

    #[test]
    fn navigation() {
        let first = PageResult::from_items(vec![1, 2], PageRequest::new(1, 2));
        assert_eq!(first.prev_page(), None);
        assert_eq!(first.next_page(), Some(2));

        let last = PageResult::from_items(vec![3], PageRequest::new(2, 2));
        assert_eq!(last.prev_page(), Some(1));
        assert_eq!(last.next_page(), None);
    }
}
