//! Page-number pagination.
//!
//! Listings are sliced into fixed-size pages. The requested page comes
//! straight from the `page` query parameter, so it is resolved leniently:
//!
//! - missing or not an integer: page 1
//! - an integer below 1 or past the last page: the last page
//! - an empty listing still has one (empty) page

use serde::Serialize;

/// Number of posts shown on every listing page.
pub const POSTS_PER_PAGE: u64 = 10;

/// A page request as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    raw: Option<String>,
    per_page: u64,
}

impl PageRequest {
    /// Build a request from the raw `page` query value.
    #[must_use]
    pub fn new(raw: Option<String>) -> Self {
        Self {
            raw,
            per_page: POSTS_PER_PAGE,
        }
    }

    /// Request the first page.
    #[must_use]
    pub fn first() -> Self {
        Self::new(None)
    }

    /// Override the page size.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: u64) -> Self {
        self.per_page = if per_page == 0 { 1 } else { per_page };
        self
    }

    /// Page size.
    #[must_use]
    pub const fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Number of pages needed for `count` items (never less than 1).
    #[must_use]
    pub const fn num_pages(&self, count: u64) -> u64 {
        if count == 0 {
            1
        } else {
            count.div_ceil(self.per_page)
        }
    }

    /// Resolve the 1-based page number to serve for a listing of `count` items.
    #[must_use]
    pub fn resolve(&self, count: u64) -> u64 {
        let num_pages = self.num_pages(count);

        let Some(raw) = self.raw.as_deref().map(str::trim) else {
            return 1;
        };

        match raw.parse::<i64>() {
            Ok(requested) if requested >= 1 && (requested as u64) <= num_pages => {
                requested as u64
            }
            Ok(_) => num_pages,
            // An integer too large to represent is still past the last page.
            Err(_) if is_integer_literal(raw) => num_pages,
            Err(_) => 1,
        }
    }
}

fn is_integer_literal(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// One page of an ordered listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Items on this page.
    pub object_list: Vec<T>,
    /// 1-based page number.
    pub number: u64,
    /// Total number of pages.
    pub num_pages: u64,
    /// Total number of items across all pages.
    pub count: u64,
    /// Page size.
    pub per_page: u64,
}

impl<T> Page<T> {
    /// Assemble a page.
    #[must_use]
    pub fn new(object_list: Vec<T>, number: u64, count: u64, request: &PageRequest) -> Self {
        Self {
            object_list,
            number,
            num_pages: request.num_pages(count),
            count,
            per_page: request.per_page(),
        }
    }

    /// The single empty page of an empty listing.
    #[must_use]
    pub fn empty(request: &PageRequest) -> Self {
        Self::new(Vec::new(), 1, 0, request)
    }

    /// Number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.object_list.len()
    }

    /// Whether this page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.object_list.is_empty()
    }

    /// Whether a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Number of the next page, if any.
    #[must_use]
    pub const fn next_page_number(&self) -> Option<u64> {
        if self.has_next() {
            Some(self.number + 1)
        } else {
            None
        }
    }

    /// Number of the previous page, if any.
    #[must_use]
    pub const fn previous_page_number(&self) -> Option<u64> {
        if self.has_previous() {
            Some(self.number - 1)
        } else {
            None
        }
    }

    /// 1-based index of the first item on this page (0 for an empty listing).
    #[must_use]
    pub const fn start_index(&self) -> u64 {
        if self.count == 0 {
            0
        } else {
            (self.number - 1) * self.per_page + 1
        }
    }

    /// 1-based index of the last item on this page.
    #[must_use]
    pub const fn end_index(&self) -> u64 {
        if self.number == self.num_pages {
            self.count
        } else {
            self.number * self.per_page
        }
    }

    /// Convert the items while keeping the page metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        let object_list = self.object_list.into_iter().map(f).collect();
        Page {
            object_list,
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            per_page: self.per_page,
        }
    }

    /// Swap in a different item list while keeping the page metadata.
    #[must_use]
    pub fn with_object_list<U>(&self, object_list: Vec<U>) -> Page<U> {
        Page {
            object_list,
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(raw: &str) -> PageRequest {
        PageRequest::new(Some(raw.to_string()))
    }

    #[test]
    fn test_missing_page_is_first() {
        assert_eq!(PageRequest::first().resolve(13), 1);
    }

    #[test]
    fn test_non_integer_page_is_first() {
        assert_eq!(request("abc").resolve(13), 1);
        assert_eq!(request("2.0").resolve(13), 1);
        assert_eq!(request("").resolve(13), 1);
    }

    #[test]
    fn test_in_range_page_is_kept() {
        assert_eq!(request("2").resolve(13), 2);
        assert_eq!(request(" 1 ").resolve(13), 1);
    }

    #[test]
    fn test_out_of_range_page_is_last() {
        assert_eq!(request("3").resolve(13), 2);
        assert_eq!(request("0").resolve(13), 2);
        assert_eq!(request("-4").resolve(13), 2);
        assert_eq!(request("99999999999999999999").resolve(13), 2);
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        let req = request("5");
        assert_eq!(req.num_pages(0), 1);
        assert_eq!(req.resolve(0), 1);

        let page: Page<u32> = Page::empty(&req);
        assert!(page.is_empty());
        assert!(!page.has_next());
        assert!(!page.has_previous());
        assert_eq!(page.start_index(), 0);
        assert_eq!(page.end_index(), 0);
    }

    #[test]
    fn test_thirteen_items_split_ten_and_three() {
        let req = PageRequest::first();
        assert_eq!(req.num_pages(13), 2);

        let first = Page::new((1..=10).collect::<Vec<u32>>(), 1, 13, &req);
        assert_eq!(first.len(), 10);
        assert!(first.has_next());
        assert_eq!(first.next_page_number(), Some(2));
        assert_eq!(first.previous_page_number(), None);
        assert_eq!(first.start_index(), 1);
        assert_eq!(first.end_index(), 10);

        let second = Page::new((11..=13).collect::<Vec<u32>>(), 2, 13, &req);
        assert_eq!(second.len(), 3);
        assert!(!second.has_next());
        assert_eq!(second.previous_page_number(), Some(1));
        assert_eq!(second.start_index(), 11);
        assert_eq!(second.end_index(), 13);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let req = PageRequest::first().with_per_page(2);
        let page = Page::new(vec![1, 2], 1, 3, &req).map(|n| n * 10);
        assert_eq!(page.object_list, vec![10, 20]);
        assert_eq!(page.num_pages, 2);
        assert_eq!(page.count, 3);
    }
}
