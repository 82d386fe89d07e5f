//! Page navigation over paginated listings

use crate::types::Pagination;

impl Pagination {
    /// Page behind the "previous" control; `None` while it is disabled
    pub fn previous_page(&self) -> Option<u32> {
        self.has_prev
            .then(|| self.current_page.saturating_sub(1).max(1))
    }

    /// Page behind the "next" control; `None` while it is disabled
    pub fn next_page(&self) -> Option<u32> {
        self.has_next.then(|| self.current_page.saturating_add(1))
    }

    pub const fn is_first(&self) -> bool {
        !self.has_prev
    }

    pub const fn is_last(&self) -> bool {
        !self.has_next
    }
}
