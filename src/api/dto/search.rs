//! Body of `POST /search`.
//!
//! ```json
//! {"current":1,"pageSize":10,"filter":{"status":"active"},"sorts":[{"key":"name","direction":"asc"}]}
//! ```

use bson::{Document, oid::ObjectId};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::api::dto::list_query::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, json_to_document};
use crate::api::dto::sort::SortInput;
use crate::api::extractors::{ObjectIdError, parse_object_id};
use crate::error::AppError;
use crate::repos::Page;

fn default_current() -> u64 {
    DEFAULT_PAGE
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_skip"))]
pub struct Pagination {
    #[serde(default = "default_current")]
    #[validate(range(min = 1))]
    pub current: u64,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 1000))]
    pub page_size: u64,
}

impl Pagination {
    pub fn page(&self) -> Page {
        Page {
            number: self.current,
            size: self.page_size,
        }
    }
}

fn validate_skip(pagination: &Pagination) -> Result<(), ValidationError> {
    match pagination.page().checked_skip() {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("current_out_of_range")),
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Search body whose filter is a caller-defined type.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "F: DeserializeOwned"))]
pub struct SearchInputWith<F> {
    #[serde(flatten)]
    pub pagination: Pagination,
    #[serde(default)]
    pub filter: Option<F>,
    #[serde(flatten)]
    pub sort: SortInput,
}

impl<F> Validate for SearchInputWith<F> {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.pagination.validate()
    }
}

impl<F> SearchInputWith<F> {
    /// Paging and sorting read from a query string (`current`, `pageSize`,
    /// `sorts` as a JSON array); the filter stays unset.
    pub fn from_query(query: &str) -> Result<Self, AppError> {
        let mut pagination = Pagination::default();
        let mut sort = SortInput::default();

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match &*key {
                "current" => pagination.current = query_number("current", value)?,
                "pageSize" => pagination.page_size = query_number("pageSize", value)?,
                "sorts" => {
                    sort.sorts = serde_json::from_str(value)
                        .map_err(|e| AppError::bad_request("INVALID_SORT", e.to_string()))?;
                }
                _ => {}
            }
        }

        Ok(Self {
            pagination,
            filter: None,
            sort,
        })
    }
}

fn query_number(name: &str, value: &str) -> Result<u64, AppError> {
    value.parse().map_err(|_| {
        AppError::bad_request("INVALID_QUERY", format!("{name} must be a positive integer"))
    })
}

impl<F: Default> SearchInputWith<F> {
    pub fn ensure_filter(&mut self) -> &mut F {
        self.filter.get_or_insert_with(F::default)
    }
}

/// Search body with a free-form JSON filter.
pub type SearchInput = SearchInputWith<Map<String, Value>>;

impl SearchInput {
    pub fn filter_document(&self) -> Result<Document, AppError> {
        match &self.filter {
            None => Ok(Document::new()),
            Some(map) => json_to_document(map),
        }
    }

    /// `Ok(None)` when the key is absent, not a string, or empty.
    pub fn filter_value_as_object_id(&self, key: &str) -> Result<Option<ObjectId>, ObjectIdError> {
        match self.filter_value_as_string(key) {
            None => Ok(None),
            Some(v) => parse_object_id(v).map(Some),
        }
    }

    pub fn filter_value_as_string(&self, key: &str) -> Option<&str> {
        self.filter
            .as_ref()?
            .get(key)?
            .as_str()
            .filter(|s| !s.is_empty())
    }
}
