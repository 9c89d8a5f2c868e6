//! Pagination for the raw-data view (100 rows/page)

use std::ops::Range;

/// Rows per page
pub const PAGE_SIZE: usize = 100;

/// Page window over a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: usize,
    pub total_pages: usize,
    /// Index of the first row on the page
    pub offset: usize,
    /// Rows on this page
    pub len: usize,
}

impl Pagination {
    /// Row index range for slicing the snapshot
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

/// Clamp `requested_page` into `[1, total_pages]` and locate its rows
///
/// ```
/// use survey_dash::pagination::calculate_pagination;
///
/// // 250 rows = 3 pages (100 + 100 + 50)
/// let p = calculate_pagination(250, 3);
/// assert_eq!(p.offset, 200);
/// assert_eq!(p.len, 50);
///
/// // Out-of-bounds requests land on the last page
/// assert_eq!(calculate_pagination(250, 99).page, 3);
/// ```
pub fn calculate_pagination(total_rows: usize, requested_page: i64) -> Pagination {
    let total_pages = total_rows.div_ceil(PAGE_SIZE);
    let last = total_pages.max(1);
    let page = usize::try_from(requested_page).unwrap_or(1).clamp(1, last);
    let offset = (page - 1) * PAGE_SIZE;
    let len = total_rows.saturating_sub(offset).min(PAGE_SIZE);

    Pagination {
        page,
        total_pages,
        offset,
        len,
    }
}
