/*
 * Responsibility
 * - v1 URL layout
 * - /health: open
 * - /widgets: entity controller (Casdoor check, ownership filtered)
 * - /organizations: strict gate, proxied to Casdoor
 */
use std::sync::Arc;

use axum::{Router, routing::get};

use crate::api::controller::{
    BaseController, BaseControllerOptions, EntityController, EntityControllerOptions,
};
use crate::api::v1::handlers::{health::health, organizations::list_organizations};
use crate::repos::{EntityService, Widget};
use crate::state::AppState;

pub fn routes(state: &AppState, widgets: Arc<dyn EntityService<Widget>>) -> Router<AppState> {
    let router = Router::new().route("/health", get(health));

    let router = EntityController::new(
        widgets,
        EntityControllerOptions::new("/widgets").with_all_disabled(false),
    )
    .register(router, state);

    let organizations = Router::new().route("/", get(list_organizations));
    BaseController::new(
        BaseControllerOptions::new("/organizations").with_require_authenticated(true),
    )
    .register(router, organizations, state)
}
