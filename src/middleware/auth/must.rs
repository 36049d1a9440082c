//! Strict gate: rejects requests that reach it without an authenticated identity.
//!
//! Layer it inside (after) the Casdoor check so the identity has been resolved.
//! The gate only reads the resolved identity, so a disabled Casdoor check
//! leaves every gated route closed. Routers meant to stay open opt out with
//! `authenticated_disabled`.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
};

use crate::middleware::auth::access::{AuthError, CasdoorMiddleware};
use crate::services::auth::Identity;

pub fn apply<S>(router: Router<S>, auth: Arc<CasdoorMiddleware>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(auth, require_authenticated))
}

pub async fn require_authenticated(
    State(auth): State<Arc<CasdoorMiddleware>>,
    req: Request,
    next: Next,
) -> Response {
    let authenticated = req
        .extensions()
        .get::<Identity>()
        .is_some_and(Identity::is_authenticated);

    if !authenticated {
        tracing::debug!(path = %req.uri().path(), "rejecting unauthenticated request");
        return auth.reject(&AuthError::TokenMissing);
    }

    next.run(req).await
}
