/*
 * Responsibility
 * - GET /organizations?owner=.. (proxied to the Casdoor management API)
 * - Authenticated callers only
 */
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::api::extractors::AuthenticatedUser;
use crate::api::response::ApiResponse;
use crate::error::AppError;
use crate::state::AppState;

fn default_owner() -> String {
    "admin".to_string()
}

#[derive(Debug, Deserialize)]
pub struct OrganizationsQuery {
    #[serde(default = "default_owner")]
    pub owner: String,
}

pub async fn list_organizations(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    Query(query): Query<OrganizationsQuery>,
) -> Result<Response, AppError> {
    let client = state
        .casdoor
        .as_ref()
        .ok_or_else(|| AppError::internal("casdoor client is not configured"))?;

    tracing::debug!(user_id = %identity.user_id, owner = %query.owner, "listing organizations");
    let organizations = client.get_organizations_by_owner(&query.owner).await?;
    let total = organizations.len() as u64;
    Ok(ApiResponse::list(organizations, total).into_response())
}
