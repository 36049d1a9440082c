/*
 * Responsibility
 * - The success envelope shared by every controller route
 * - {"success":true}, {"success":true,"data":..}, list and table payloads
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Debug, Serialize)]
pub struct ListData<T> {
    pub list: Vec<T>,
    pub total: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableData<T> {
    pub list: Vec<T>,
    pub total: u64,
    pub current: u64,
    pub page_size: u64,
}

impl ApiResponse<()> {
    pub fn ok() -> Self {
        Self {
            success: true,
            data: None,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }
}

impl<T: Serialize> ApiResponse<ListData<T>> {
    pub fn list(list: Vec<T>, total: u64) -> Self {
        Self::data(ListData { list, total })
    }
}

impl<T: Serialize> ApiResponse<TableData<T>> {
    pub fn table(list: Vec<T>, total: u64, current: u64, page_size: u64) -> Self {
        Self::data(TableData {
            list,
            total,
            current,
            page_size,
        })
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
