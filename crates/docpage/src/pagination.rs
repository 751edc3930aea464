//! Page metadata and typed page results.

use serde::{Deserialize, Serialize};

/// Describes where a page sits within the full result set.
///
/// Built by pagination engines for every call and returned to callers
/// unchanged. `prev` and `next` are page numbers, with `0` meaning there is
/// no such page, matching the outward JSON shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// Total number of records matching the query, across all pages.
    pub total: i64,
    /// Current page number (1-based).
    pub page: i64,
    /// Maximum number of records per page.
    pub per_page: i64,
    /// Previous page number, or `0` on the first page.
    pub prev: i64,
    /// Next page number, or `0` on the last page.
    pub next: i64,
    /// Total number of pages.
    pub total_page: i64,
}

impl PageMetadata {
    /// Creates page metadata from the total count and the resolved window.
    ///
    /// `page` and `per_page` are expected to be already clamped by the
    /// engine (see [`PageWindow`]); the derived fields follow from them.
    ///
    /// [`PageWindow`]: crate::PageWindow
    pub fn new(total: i64, page: i64, per_page: i64) -> Self {
        let total = total.max(0);
        let per_page = per_page.max(1);
        let total_page = total / per_page + i64::from(total % per_page != 0);

        Self {
            total,
            page,
            per_page,
            prev: if page > 1 { page - 1 } else { 0 },
            next: if page < total_page { page + 1 } else { 0 },
            total_page,
        }
    }

    /// Returns whether a page exists before this one.
    #[inline]
    pub fn has_prev(&self) -> bool {
        self.prev > 0
    }

    /// Returns whether a page exists after this one.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.next > 0
    }
}

/// A page of typed records together with its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    /// The decoded records, in the order the engine returned them.
    pub data: Vec<T>,
    /// The engine's metadata for this page.
    pub pagination: PageMetadata,
}

impl<T> PaginatedResult<T> {
    /// Creates a new paginated result.
    pub fn new(data: Vec<T>, pagination: PageMetadata) -> Self {
        Self { data, pagination }
    }

    /// Splits the result into records and metadata.
    pub fn into_parts(self) -> (Vec<T>, PageMetadata) {
        (self.data, self.pagination)
    }

    /// Maps the records to a different type.
    pub fn map<U, F>(self, f: F) -> PaginatedResult<U>
    where
        F: FnMut(T) -> U,
    {
        PaginatedResult {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn total_pages_round_up() {
        assert_eq!(PageMetadata::new(25, 1, 10).total_page, 3);
        assert_eq!(PageMetadata::new(30, 1, 10).total_page, 3);
        assert_eq!(PageMetadata::new(31, 1, 10).total_page, 4);
        assert_eq!(PageMetadata::new(0, 1, 10).total_page, 0);
    }

    #[test]
    fn huge_page_size_does_not_overflow() {
        let metadata = PageMetadata::new(30, 1, i64::MAX);
        assert_eq!(metadata.total_page, 1);
        assert_eq!((metadata.prev, metadata.next), (0, 0));

        let metadata = PageMetadata::new(i64::MAX, 1, i64::MAX);
        assert_eq!(metadata.total_page, 1);
        assert_eq!(PageMetadata::new(i64::MAX, 1, 2).total_page, i64::MAX / 2 + 1);
    }

    #[test]
    fn into_parts_and_map_keep_metadata() {
        let result = PaginatedResult::new(vec![1, 2, 3], PageMetadata::new(3, 1, 10));
        let doubled = result.map(|n| n * 2);
        assert_eq!(doubled.data, vec![2, 4, 6]);

        let (data, pagination) = doubled.into_parts();
        assert_eq!(data.len(), 3);
        assert_eq!(pagination, PageMetadata::new(3, 1, 10));
    }

    #[test]
    fn neighbours() {
        let first = PageMetadata::new(30, 1, 10);
        assert!(!first.has_prev());
        assert_eq!(first.next, 2);

        let middle = PageMetadata::new(30, 2, 10);
        assert_eq!((middle.prev, middle.next), (1, 3));

        let last = PageMetadata::new(30, 3, 10);
        assert_eq!(last.prev, 2);
        assert!(!last.has_next());

        let empty = PageMetadata::new(0, 1, 10);
        assert!(!empty.has_prev());
        assert!(!empty.has_next());
    }

    #[test]
    fn serializes_outward_shape() {
        let result = PaginatedResult::new(vec!["a", "b"], PageMetadata::new(12, 2, 5));
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(
            value,
            json!({
                "data": ["a", "b"],
                "pagination": {
                    "total": 12,
                    "page": 2,
                    "perPage": 5,
                    "prev": 1,
                    "next": 3,
                    "totalPage": 3
                }
            })
        );
    }

    #[test]
    fn map_keeps_metadata() {
        let result = PaginatedResult::new(vec![1, 2, 3], PageMetadata::new(3, 1, 10));
        let mapped = result.map(|n| n * 2);
        assert_eq!(mapped.data, vec![2, 4, 6]);
        assert_eq!(mapped.pagination.total, 3);
    }
}
