/*
 * Responsibility
 * - Query string of the paged list route: page, size, all, filter, sort
 * - Defaults and clamping; malformed values become 400s
 */
use bson::Document;
use serde::Deserialize;

use crate::api::dto::sort::{SortEntry, sort_fields};
use crate::error::AppError;
use crate::repos::{Page, SortField};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Raw parameters as they arrive; everything is optional text.
#[derive(Debug, Default, Deserialize)]
pub struct ListQueryParams {
    pub page: Option<String>,
    pub size: Option<String>,
    pub all: Option<String>,
    pub filter: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub page: u64,
    pub size: u64,
    pub all: bool,
    pub filter: Document,
    pub sort: Vec<SortField>,
}

impl TryFrom<ListQueryParams> for ListQuery {
    type Error = AppError;

    fn try_from(params: ListQueryParams) -> Result<Self, Self::Error> {
        let page = parse_number(params.page.as_deref(), "page")?
            .unwrap_or(DEFAULT_PAGE)
            .max(1);
        let size = parse_number(params.size.as_deref(), "size")?
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        if (Page { number: page, size }).checked_skip().is_none() {
            return Err(AppError::bad_request("INVALID_QUERY", "page is out of range"));
        }

        let all = params
            .all
            .as_deref()
            .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1"));

        let filter = match non_blank(params.filter.as_deref()) {
            None => Document::new(),
            Some(raw) => parse_filter(raw)?,
        };

        let sort = match non_blank(params.sort.as_deref()) {
            None => Vec::new(),
            Some(raw) => {
                let entries: Vec<SortEntry> = serde_json::from_str(raw)
                    .map_err(|e| AppError::bad_request("INVALID_SORT", e.to_string()))?;
                sort_fields(&entries)
            }
        };

        Ok(Self {
            page,
            size,
            all,
            filter,
            sort,
        })
    }
}

/// A JSON object converted to a backend filter document.
pub fn parse_filter(raw: &str) -> Result<Document, AppError> {
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw)
        .map_err(|e| AppError::bad_request("INVALID_FILTER", e.to_string()))?;
    json_to_document(&map)
}

pub fn json_to_document(
    map: &serde_json::Map<String, serde_json::Value>,
) -> Result<Document, AppError> {
    bson::to_document(map).map_err(|e| AppError::bad_request("INVALID_FILTER", e.to_string()))
}

fn non_blank(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_number(v: Option<&str>, name: &str) -> Result<Option<u64>, AppError> {
    match non_blank(v) {
        None => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|_| {
            AppError::bad_request("INVALID_QUERY", format!("{name} must be a positive integer"))
        }),
    }
}
