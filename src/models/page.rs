use std::str::FromStr;

use serde::Serialize;

use crate::NoteError;

/// Default number of notes per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Sort order for listing notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Oldest / smallest first
    Ascending,
    /// Newest / largest first
    #[default]
    Descending,
}

impl SortOrder {
    /// Parses a direction parameter: `desc` in any case is descending,
    /// anything else is ascending.
    pub fn from_param(value: &str) -> Self {
        if value.eq_ignore_ascii_case("desc") {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Note field a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedTime,
    Title,
    Id,
}

impl SortField {
    pub(crate) fn column(self) -> &'static str {
        match self {
            Self::CreatedTime => "created_time",
            Self::Title => "title",
            Self::Id => "id",
        }
    }
}

impl FromStr for SortField {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "createdtime" | "created_time" => Ok(Self::CreatedTime),
            "title" => Ok(Self::Title),
            "id" => Ok(Self::Id),
            _ => Err(NoteError::InvalidSortField(s.to_string())),
        }
    }
}

/// Pagination and ordering for list queries.
///
/// `page` is zero-based. Defaults to the first page of
/// [`DEFAULT_PAGE_SIZE`] notes, newest first.
///
/// # Examples
///
/// ```
/// use notes::{PageRequest, SortField, SortOrder};
///
/// let request = PageRequest::new(2, 5)?.sorted_by(SortField::Title, SortOrder::Ascending);
/// assert_eq!(request.offset(), 10);
/// # Ok::<(), notes::NoteError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
    sort_field: SortField,
    order: SortOrder,
}

impl PageRequest {
    /// Creates a request for `page` with `size` notes per page, ordered by
    /// creation time descending.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::InvalidPage` if `size` is zero.
    pub fn new(page: u32, size: u32) -> Result<Self, NoteError> {
        if size == 0 {
            return Err(NoteError::InvalidPage(
                "Page size must not be less than one".to_string(),
            ));
        }
        Ok(Self {
            page,
            size,
            sort_field: SortField::default(),
            order: SortOrder::default(),
        })
    }

    /// Replaces the ordering.
    pub fn sorted_by(mut self, sort_field: SortField, order: SortOrder) -> Self {
        self.sort_field = sort_field;
        self.order = order;
        self
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn sort_field(&self) -> SortField {
        self.sort_field
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Number of notes skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort_field: SortField::default(),
            order: SortOrder::default(),
        }
    }
}

/// One page of results plus the totals needed to page through the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let size = request.size();
        Self {
            content,
            page: request.page(),
            size,
            total_elements,
            total_pages: total_elements.div_ceil(u64::from(size)),
        }
    }

    /// Converts every item, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) + 1 < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_default_is_first_page_newest_first() {
        let request = PageRequest::default();

        assert_eq!(request.page(), 0);
        assert_eq!(request.size(), DEFAULT_PAGE_SIZE);
        assert_eq!(request.sort_field(), SortField::CreatedTime);
        assert_eq!(request.order(), SortOrder::Descending);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn page_request_rejects_zero_size() {
        assert!(matches!(
            PageRequest::new(0, 0),
            Err(NoteError::InvalidPage(_))
        ));
    }

    #[test]
    fn offset_does_not_overflow() {
        let request = PageRequest::new(u32::MAX, u32::MAX).unwrap();
        assert_eq!(request.offset(), u64::from(u32::MAX) * u64::from(u32::MAX));
    }

    #[test]
    fn sort_order_only_desc_is_descending() {
        assert_eq!(SortOrder::from_param("desc"), SortOrder::Descending);
        assert_eq!(SortOrder::from_param("DESC"), SortOrder::Descending);
        assert_eq!(SortOrder::from_param("asc"), SortOrder::Ascending);
        assert_eq!(SortOrder::from_param("sideways"), SortOrder::Ascending);
    }

    #[test]
    fn sort_field_allow_list() {
        assert_eq!("createdTime".parse::<SortField>().unwrap(), SortField::CreatedTime);
        assert_eq!("created_time".parse::<SortField>().unwrap(), SortField::CreatedTime);
        assert_eq!("TITLE".parse::<SortField>().unwrap(), SortField::Title);
        assert_eq!("id".parse::<SortField>().unwrap(), SortField::Id);

        let err = "text; DROP TABLE notes".parse::<SortField>().unwrap_err();
        assert!(matches!(err, NoteError::InvalidSortField(_)));
    }

    #[test]
    fn page_totals() {
        let request = PageRequest::new(1, 10).unwrap();
        let page = Page::new(vec![1, 2, 3], &request, 23);

        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());

        let mapped = page.map(|n| n * 2);
        assert_eq!(mapped.content, vec![2, 4, 6]);
        assert_eq!(mapped.total_elements, 23);

        let empty: Page<i32> = Page::new(Vec::new(), &request, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next());
    }

    #[test]
    fn page_serializes_camel_case() {
        let page = Page::new(vec!["a"], &PageRequest::default(), 1);
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["totalElements"], 1);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["content"], serde_json::json!(["a"]));
    }
}
