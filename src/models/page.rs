use serde::{Deserialize, Serialize};

/// Number of users per page on the paginated listing.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// One page of a listing plus the metadata needed to walk the rest.
#[derive(Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: i64,
    pub per_page: i64,
    pub total: i64,
    pub last_page: i64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, current_page: i64, per_page: i64, total: i64) -> Self {
        // An empty listing still has one (empty) page.
        let last_page = ((total + per_page - 1) / per_page).max(1);
        Self {
            data,
            current_page,
            per_page,
            total,
            last_page,
        }
    }

    /// Brings a requested page into `1..=N`, where `N` is the last page whose
    /// offset still fits in an `i64`.
    pub fn clamp_page(page: i64, per_page: i64) -> i64 {
        page.clamp(1, i64::MAX / per_page.max(1))
    }

    /// Rows to skip for `page` (1-based).
    pub fn offset(page: i64, per_page: i64) -> i64 {
        (Self::clamp_page(page, per_page) - 1) * per_page.max(1)
    }
}
