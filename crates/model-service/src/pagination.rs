//! Pagination for batch predictions
//!
//! Pages are 1-indexed and sized within a fixed bound. A page request is
//! validated once at construction, so every downstream consumer can rely on
//! the bounds holding.

use serde::Serialize;

use common::{Error, Result};

/// Largest number of records one page may cover
pub const MAX_PAGE_SIZE: usize = 1000;

/// A validated request for one page of batch results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: usize,
    page_size: usize,
}

impl PageRequest {
    /// Creates a page request.
    ///
    /// `page` is 1-indexed; `page_size` must lie in `1..=MAX_PAGE_SIZE`.
    pub fn new(page: usize, page_size: usize) -> Result<Self> {
        if page < 1 {
            return Err(Error::InvalidArgument(
                "page must be greater than or equal to 1".to_string(),
            ));
        }

        if page_size < 1 || page_size > MAX_PAGE_SIZE {
            return Err(Error::InvalidArgument(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
            )));
        }

        Ok(Self { page, page_size })
    }

    /// Requested page, 1-indexed
    pub fn page(&self) -> usize {
        self.page
    }

    /// Number of records the page covers
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Index of the first record the page covers. Saturates for pages far
    /// past any real frame; slicing clamps such offsets to an empty window.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Number of pages needed to cover `total` records
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_bounds_are_accepted() {
        assert!(PageRequest::new(1, 1).is_ok());
        assert!(PageRequest::new(1, MAX_PAGE_SIZE).is_ok());
        assert!(PageRequest::new(250, 50).is_ok());
    }

    #[test]
    fn test_page_zero_is_rejected() {
        let err = PageRequest::new(0, 50).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("page"));
    }

    #[test]
    fn test_page_size_bounds_are_enforced() {
        assert!(PageRequest::new(1, 0).unwrap_err().is_invalid_argument());
        assert!(PageRequest::new(1, MAX_PAGE_SIZE + 1)
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn test_offset_is_zero_based() {
        assert_eq!(PageRequest::new(1, 50).unwrap().offset(), 0);
        assert_eq!(PageRequest::new(2, 50).unwrap().offset(), 50);
        assert_eq!(PageRequest::new(4, 25).unwrap().offset(), 75);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = PageRequest::new(1, 3).unwrap();
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(3), 1);
        assert_eq!(page.total_pages(4), 2);
        assert_eq!(page.total_pages(10), 4);
    }

    #[test]
    fn test_extreme_pages_do_not_overflow() {
        let far = PageRequest::new(usize::MAX, 2).unwrap();
        assert_eq!(far.offset(), usize::MAX);

        let page = PageRequest::new(1, MAX_PAGE_SIZE).unwrap();
        assert_eq!(page.total_pages(usize::MAX), usize::MAX / MAX_PAGE_SIZE + 1);
    }
}
