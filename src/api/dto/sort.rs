use serde::Deserialize;

use crate::repos::SortField;

/// One `{"key","direction"}` sort entry as sent by clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SortEntry {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub direction: String,
}

impl SortEntry {
    /// `None` for an empty key or an unrecognised direction.
    pub fn to_sort_field(&self) -> Option<SortField> {
        let key = self.key.trim();
        if key.is_empty() {
            return None;
        }
        match self.direction.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortField::asc(key)),
            "desc" | "descending" => Some(SortField::desc(key)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SortInput {
    #[serde(default)]
    pub sorts: Vec<SortEntry>,
}

impl SortInput {
    /// Valid entries in order; invalid ones are dropped.
    pub fn to_sort_fields(&self) -> Vec<SortField> {
        sort_fields(&self.sorts)
    }
}

pub fn sort_fields(entries: &[SortEntry]) -> Vec<SortField> {
    entries.iter().filter_map(SortEntry::to_sort_field).collect()
}
