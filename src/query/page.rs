//! Generic paged result container.
//!
//! A [`PagedList`] is a single page sliced out of a filtered collection,
//! together with the metadata a client needs to navigate the rest of it.
//! Page requests are clamped into range rather than rejected.

use serde::Serialize;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound for page sizes; larger requests are clamped down.
pub const MAX_PAGE_SIZE: u32 = 50;

/// A normalized page request: `page_number >= 1`, `page_size` in `1..=MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_number: u32,
    page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Builds a request, clamping both values into their valid ranges.
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number: page_number.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Builds a request from raw query string values.
    ///
    /// Missing or non-numeric values fall back to the defaults, negative
    /// and zero values clamp to the lower bound.
    pub fn from_raw(page_number: Option<&str>, page_size: Option<&str>) -> Self {
        let page_number = parse_lenient(page_number).unwrap_or(1);
        let page_size = parse_lenient(page_size).unwrap_or(i64::from(DEFAULT_PAGE_SIZE));

        Self::new(saturate(page_number), saturate(page_size))
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page_number as usize - 1) * self.page_size as usize
    }
}

fn parse_lenient(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
}

fn saturate(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}

/// Paging metadata computed once per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u32,
}

impl PageMeta {
    pub fn new(request: PageRequest, total_count: u64) -> Self {
        let total_pages = total_count.div_ceil(u64::from(request.page_size()));

        Self {
            current_page: request.page_number(),
            page_size: request.page_size(),
            total_count,
            total_pages: total_pages.min(u64::from(u32::MAX)) as u32,
        }
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// One page of `T` plus its [`PageMeta`]. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedList<T> {
    items: Vec<T>,
    meta: PageMeta,
}

impl<T> PagedList<T> {
    /// Counts the whole collection, then slices out the requested page.
    ///
    /// A page past the end yields no items but keeps the real totals.
    pub fn paginate<I>(source: I, request: PageRequest) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let all: Vec<T> = source.into_iter().collect();
        let meta = PageMeta::new(request, all.len() as u64);

        let items = all
            .into_iter()
            .skip(request.offset())
            .take(request.page_size() as usize)
            .collect();

        Self { items, meta }
    }

    /// Wraps a page that was already sliced by the storage layer.
    pub fn from_parts(items: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        Self {
            items,
            meta: PageMeta::new(request, total_count),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn meta(&self) -> PageMeta {
        self.meta
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Transforms the items, keeping the metadata untouched.
    pub fn map<U, F>(self, f: F) -> PagedList<U>
    where
        F: FnMut(T) -> U,
    {
        PagedList {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }

    pub fn into_parts(self) -> (Vec<T>, PageMeta) {
        (self.items, self.meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_page_request_defaults() {
        let request = PageRequest::default();
        assert_eq!(request.page_number(), 1);
        assert_eq!(request.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_page_request_clamps_out_of_range() {
        let request = PageRequest::new(0, 500);
        assert_eq!(request.page_number(), 1);
        assert_eq!(request.page_size(), MAX_PAGE_SIZE);

        let request = PageRequest::new(3, 0);
        assert_eq!(request.page_size(), 1);
        assert_eq!(request.offset(), 2);
    }

    #[test]
    fn test_page_request_from_raw() {
        let request = PageRequest::from_raw(Some("2"), Some("25"));
        assert_eq!(request, PageRequest::new(2, 25));

        let request = PageRequest::from_raw(Some("abc"), None);
        assert_eq!(request, PageRequest::default());

        let request = PageRequest::from_raw(Some("-4"), Some("-1"));
        assert_eq!(request, PageRequest::new(1, 1));

        let request = PageRequest::from_raw(None, Some(" 75 "));
        assert_eq!(request.page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_second_page_of_twenty_five() {
        let page = PagedList::paginate(1..=25, PageRequest::new(2, 10));

        assert_eq!(page.items(), (11..=20).collect::<Vec<_>>().as_slice());
        assert_eq!(page.meta().total_count, 25);
        assert_eq!(page.meta().total_pages, 3);
        assert_eq!(page.meta().current_page, 2);
        assert!(page.meta().has_next());
        assert!(page.meta().has_previous());
    }

    #[test]
    fn test_last_partial_page() {
        let page = PagedList::paginate(1..=25, PageRequest::new(3, 10));
        assert_eq!(page.items(), &[21, 22, 23, 24, 25]);
        assert!(!page.meta().has_next());
    }

    #[test]
    fn test_empty_collection() {
        let page = PagedList::paginate(Vec::<i32>::new(), PageRequest::default());

        assert!(page.is_empty());
        assert_eq!(page.meta().total_count, 0);
        assert_eq!(page.meta().total_pages, 0);
        assert_eq!(page.meta().current_page, 1);
    }

    #[test]
    fn test_page_past_the_end() {
        let page = PagedList::paginate(1..=25, PageRequest::new(9, 10));

        assert!(page.is_empty());
        assert_eq!(page.meta().total_count, 25);
        assert_eq!(page.meta().total_pages, 3);
        assert_eq!(page.meta().current_page, 9);
    }

    #[test]
    fn test_from_parts_and_map() {
        let page = PagedList::from_parts(vec![1, 2], 12, PageRequest::new(6, 2));
        let page = page.map(|n| n.to_string());

        assert_eq!(page.items(), &["1".to_string(), "2".to_string()]);
        assert_eq!(page.meta().total_pages, 6);
        assert!(!page.meta().has_next());
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let meta = PageMeta::new(PageRequest::new(1, 10), 3);
        let json = serde_json::to_value(meta).unwrap();

        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["pageSize"], 10);
        assert_eq!(json["totalCount"], 3);
        assert_eq!(json["totalPages"], 1);
    }

    proptest! {
        #[test]
        fn prop_pages_reassemble_input(len in 0usize..200, size in 1u32..=MAX_PAGE_SIZE) {
            let input: Vec<usize> = (0..len).collect();
            let first = PagedList::paginate(input.clone(), PageRequest::new(1, size));
            let total_pages = first.meta().total_pages;

            prop_assert_eq!(u64::from(total_pages), (len as u64).div_ceil(u64::from(size)));

            let mut rebuilt = Vec::new();
            for page_number in 1..=total_pages {
                let page = PagedList::paginate(input.clone(), PageRequest::new(page_number, size));
                prop_assert!(page.len() <= size as usize);
                prop_assert_eq!(page.meta().total_count, len as u64);
                rebuilt.extend(page.into_parts().0);
            }

            prop_assert_eq!(rebuilt, input);
        }

        #[test]
        fn prop_page_beyond_last_is_empty(len in 0usize..100, size in 1u32..=MAX_PAGE_SIZE, extra in 1u32..5) {
            let input: Vec<usize> = (0..len).collect();
            let total_pages = (len as u32).div_ceil(size);
            let page = PagedList::paginate(input, PageRequest::new(total_pages + extra, size));

            prop_assert!(page.is_empty());
            prop_assert_eq!(page.meta().total_count, len as u64);
            prop_assert_eq!(page.meta().total_pages, total_pages);
        }
    }
}
