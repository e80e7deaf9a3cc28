//! Paged response envelope and the `Pagination` header.

use axum::Json;
use axum::http::{HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::query::{PageMeta, PagedList};

/// Name of the response header carrying [`PaginationHeader`] as JSON.
pub const PAGINATION_HEADER: &str = "pagination";

/// Generic paged response wrapper.
///
/// Responding with it also sets the `Pagination` header, so clients can read
/// the totals from either place.
#[derive(Debug, Serialize, ToSchema)]
pub struct PagedResponse<T> {
    /// The items on this page
    pub data: Vec<T>,

    pub pagination: PaginationMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page number (1-based)
    #[schema(example = 1)]
    pub page: u32,

    #[schema(example = 10)]
    pub page_size: u32,

    /// Total number of items across all pages
    #[schema(example = 25)]
    pub total_items: u64,

    #[schema(example = 3)]
    pub total_pages: u32,

    #[schema(example = true)]
    pub has_next: bool,

    #[schema(example = false)]
    pub has_prev: bool,
}

impl From<PageMeta> for PaginationMeta {
    fn from(meta: PageMeta) -> Self {
        Self {
            page: meta.current_page,
            page_size: meta.page_size,
            total_items: meta.total_count,
            total_pages: meta.total_pages,
            has_next: meta.has_next(),
            has_prev: meta.has_previous(),
        }
    }
}

/// Value of the `Pagination` response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationHeader {
    pub current_page: u32,
    pub items_per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl From<PaginationMeta> for PaginationHeader {
    fn from(meta: PaginationMeta) -> Self {
        Self {
            current_page: meta.page,
            items_per_page: meta.page_size,
            total_items: meta.total_items,
            total_pages: meta.total_pages,
        }
    }
}

impl<T> PagedResponse<T> {
    /// Converts every item of a [`PagedList`] into its response shape.
    pub fn from_list<S, F>(list: PagedList<S>, convert: F) -> Self
    where
        F: FnMut(S) -> T,
    {
        let (items, meta) = list.into_parts();
        Self {
            data: items.into_iter().map(convert).collect(),
            pagination: meta.into(),
        }
    }
}

impl<T: Serialize> IntoResponse for PagedResponse<T> {
    fn into_response(self) -> Response {
        let header = serde_json::to_string(&PaginationHeader::from(self.pagination))
            .ok()
            .and_then(|value| HeaderValue::from_str(&value).ok());

        let mut response = Json(self).into_response();
        if let Some(value) = header {
            response
                .headers_mut()
                .insert(HeaderName::from_static(PAGINATION_HEADER), value);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::PageRequest;

    #[test]
    fn test_meta_from_page() {
        let list = PagedList::paginate(1..=25, PageRequest::new(2, 10));
        let response = PagedResponse::from_list(list, |n| n * 2);

        assert_eq!(response.data.first(), Some(&22));
        assert_eq!(
            response.pagination,
            PaginationMeta {
                page: 2,
                page_size: 10,
                total_items: 25,
                total_pages: 3,
                has_next: true,
                has_prev: true,
            }
        );
    }

    #[test]
    fn test_response_sets_pagination_header() {
        let list = PagedList::paginate(Vec::<u8>::new(), PageRequest::new(1, 10));
        let response = PagedResponse::from_list(list, |n| n).into_response();

        let header = response.headers().get("Pagination").unwrap().to_str().unwrap();
        let value: serde_json::Value = serde_json::from_str(header).unwrap();
        assert_eq!(value["currentPage"], 1);
        assert_eq!(value["itemsPerPage"], 10);
        assert_eq!(value["totalItems"], 0);
        assert_eq!(value["totalPages"], 0);
    }
}
