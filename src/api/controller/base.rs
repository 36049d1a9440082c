//! Router registration shared by all controllers.
//!
//! `BaseController` mounts a router under its path with the auth layers its
//! options ask for, so custom handlers sit behind the same gate as the entity
//! routes.

use axum::Router;

use crate::api::controller::options::BaseControllerOptions;
use crate::middleware::auth::{access, must};
use crate::state::AppState;

#[derive(Debug, Clone, Default)]
pub struct BaseController {
    pub options: BaseControllerOptions,
}

impl BaseController {
    pub fn new(options: BaseControllerOptions) -> Self {
        Self { options }
    }

    /// Wraps `routes` with the auth layers and mounts it on `app` at
    /// `router_path` (merged when the path is empty or `/`).
    pub fn register<S>(&self, app: Router<S>, routes: Router<S>, state: &AppState) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let routes = authenticate(routes, &self.options, state);

        let path = self.options.router_path.trim_matches('/');
        if path.is_empty() {
            app.merge(routes)
        } else {
            app.nest(&format!("/{path}"), routes)
        }
    }
}

/// Layers the auth middleware (and the strict gate when required) on `router`.
pub fn authenticate<S>(router: Router<S>, options: &BaseControllerOptions, state: &AppState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if options.authenticated_disabled {
        return router;
    }

    // inner layer runs last: the gate must see the identity the check resolved
    let router = if options.require_authenticated {
        must::apply(router, state.auth.clone())
    } else {
        router
    };
    access::apply(router, state.auth.clone())
}

/// Adds the Casdoor check to an arbitrary router unless `disabled`.
pub fn merge_authenticated_if_needed<S>(router: Router<S>, disabled: bool, state: &AppState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if disabled {
        return router;
    }
    access::apply(router, state.auth.clone())
}
