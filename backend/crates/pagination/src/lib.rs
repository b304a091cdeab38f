//! Page-number pagination primitives shared by list endpoints.
//!
//! A [`PageRequest`] validates the caller's page/size pair and translates it
//! into an offset and limit for repositories. A [`Page`] wraps one page of
//! results together with the totals clients need to render navigation.

use serde::{Deserialize, Serialize};

/// Smallest page number accepted by [`PageRequest::new`].
pub const FIRST_PAGE: u64 = 1;
/// Largest page size accepted by [`PageRequest::new`].
pub const MAX_PER_PAGE: u64 = 100;
/// Page size used when callers do not ask for one.
pub const DEFAULT_PER_PAGE: u64 = 10;

/// Errors raised when a page request is out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Pages are numbered from one.
    #[error("page must be at least {FIRST_PAGE}")]
    PageOutOfRange,
    /// Page size must be between one and [`MAX_PER_PAGE`].
    #[error("page size must be between 1 and {MAX_PER_PAGE}")]
    PerPageOutOfRange,
}

/// Validated page selection.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(3, 10).expect("valid request");
/// assert_eq!(request.offset(), 20);
/// assert_eq!(request.limit(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    per_page: u64,
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when `page` is zero or `per_page` falls
    /// outside `1..=MAX_PER_PAGE`.
    pub const fn new(page: u64, per_page: u64) -> Result<Self, PageRequestError> {
        if page < FIRST_PAGE {
            return Err(PageRequestError::PageOutOfRange);
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(PageRequestError::PerPageOutOfRange);
        }
        Ok(Self { page, per_page })
    }

    /// First page with the given size.
    ///
    /// # Errors
    /// Returns [`PageRequestError::PerPageOutOfRange`] for invalid sizes.
    pub const fn first(per_page: u64) -> Result<Self, PageRequestError> {
        Self::new(FIRST_PAGE, per_page)
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Number of records to skip.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - FIRST_PAGE).saturating_mul(self.per_page)
    }

    /// Maximum number of records to return.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.per_page
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: FIRST_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of results plus navigation totals.
///
/// Serialises as
/// `{"items":[...],"current":1,"pages":3,"total":25,"perPage":10}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Records on this page.
    pub items: Vec<T>,
    /// One-based number of this page.
    pub current: u64,
    /// Total number of pages for the query.
    pub pages: u64,
    /// Total number of records matching the query.
    pub total: u64,
    /// Page size used for the query.
    pub per_page: u64,
}

impl<T> Page<T> {
    /// Assemble a page from repository output.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Page, PageRequest};
    ///
    /// let request = PageRequest::new(2, 10).expect("valid request");
    /// let page = Page::new(vec!["k"], request, 11);
    /// assert_eq!(page.pages, 2);
    /// assert_eq!(page.current, 2);
    /// ```
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            items,
            current: request.page(),
            pages: total.div_ceil(request.per_page()),
            total,
            per_page: request.per_page(),
        }
    }

    /// Transform the items while keeping the navigation totals.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current: self.current,
            pages: self.pages,
            total: self.total,
            per_page: self.per_page,
        }
    }

    /// Whether another page follows this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current < self.pages
    }
}
