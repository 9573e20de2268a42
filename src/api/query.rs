//! Query parameters for the list endpoints

use serde::Deserialize;

use crate::{DEFAULT_PAGE_SIZE, NoteError, PageRequest, SortOrder, Tag};

/// Paging and sorting for `/notes` and `/notes/summaries`.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Zero-based page index (default: 0)
    #[serde(default)]
    pub page: u32,
    /// Notes per page (default: 10)
    #[serde(default = "default_size")]
    pub size: u32,
    /// Sort field (default: "createdTime")
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    /// "desc" for descending, anything else ascending (default: "desc")
    #[serde(default = "default_sort_dir")]
    pub sort_dir: String,
}

fn default_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_sort_by() -> String {
    "createdTime".to_string()
}

fn default_sort_dir() -> String {
    "desc".to_string()
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: default_size(),
            sort_by: default_sort_by(),
            sort_dir: default_sort_dir(),
        }
    }
}

impl ListQuery {
    pub fn to_page_request(&self) -> Result<PageRequest, NoteError> {
        Ok(PageRequest::new(self.page, self.size)?
            .sorted_by(self.sort_by.parse()?, SortOrder::from_param(&self.sort_dir)))
    }
}

/// Parameters of `/notes/filter`.
///
/// `tags` may be repeated (`tags=a&tags=b`), comma-separated (`tags=a,b`),
/// or both. Empty entries are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    pub tags: Vec<String>,
    pub page: u32,
    pub size: u32,
}

impl Default for FilterQuery {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FilterQuery {
    /// Builds the query from raw key/value pairs. Unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, NoteError> {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "tags" => query.tags.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from),
                ),
                "page" => query.page = parse_number("page", &value)?,
                "size" => query.size = parse_number("size", &value)?,
                _ => {}
            }
        }
        Ok(query)
    }

    pub fn to_page_request(&self) -> Result<PageRequest, NoteError> {
        PageRequest::new(self.page, self.size)
    }

    /// Validates the tag names against the tag set.
    pub fn tag_set(&self) -> Result<std::collections::BTreeSet<Tag>, NoteError> {
        crate::service::map_tags(&self.tags)
    }
}

fn parse_number(name: &str, value: &str) -> Result<u32, NoteError> {
    value
        .trim()
        .parse()
        .map_err(|_| NoteError::InvalidPage(format!("{name} must be a non-negative integer, got '{value}'")))
}
