//! Casdoor access-token check → `Identity` in request extensions.
//!
//! Per request:
//! 1. an identity already resolved upstream passes unchanged
//! 2. a disabled middleware passes without resolving anything
//! 3. the extractor runs; a malformed credential is rejected
//! 4. no token passes (anonymous); the strict gate may reject later
//! 5. the token is verified; failure is rejected
//! 6. the verified identity is stored for handlers
//!
//! Rejections go through the configured error handler (401 + plain text by
//! default). Nothing after a rejection runs.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::config::CasdoorSettings;
use crate::middleware::auth::extract::{self, ExtractError, SharedExtractor};
use crate::services::auth::{ClaimVerifier, Identity, VerifyError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Verify(#[from] VerifyError),
    #[error("required authorization token not found")]
    TokenMissing,
}

pub type ErrorHandler = Arc<dyn Fn(&AuthError) -> Response + Send + Sync>;

/// Default rejection: 401 with the error text as a plain-text body.
pub fn on_error(err: &AuthError) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        err.to_string(),
    )
        .into_response()
}

#[derive(Clone)]
pub struct CasdoorOptions {
    pub disabled: bool,
    pub credentials_optional: bool,
    pub extractor: SharedExtractor,
    pub error_handler: ErrorHandler,
}

impl Default for CasdoorOptions {
    fn default() -> Self {
        Self {
            disabled: false,
            credentials_optional: false,
            extractor: extract::default_extractor(),
            error_handler: Arc::new(on_error),
        }
    }
}

impl CasdoorOptions {
    pub fn from_settings(settings: &CasdoorSettings) -> Self {
        Self {
            disabled: settings.disabled,
            credentials_optional: settings.credentials_optional,
            ..Self::default()
        }
    }

    pub fn with_extractor(mut self, extractor: SharedExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_error_handler(
        mut self,
        handler: impl Fn(&AuthError) -> Response + Send + Sync + 'static,
    ) -> Self {
        self.error_handler = Arc::new(handler);
        self
    }

    pub fn with_credentials_optional(mut self, optional: bool) -> Self {
        self.credentials_optional = optional;
        self
    }
}

/// One instance per application, shared by every router that needs auth.
pub struct CasdoorMiddleware {
    options: CasdoorOptions,
    verifier: Option<Arc<dyn ClaimVerifier>>,
}

impl std::fmt::Debug for CasdoorMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CasdoorMiddleware")
            .field("disabled", &self.is_disabled())
            .field("credentials_optional", &self.options.credentials_optional)
            .finish()
    }
}

impl CasdoorMiddleware {
    pub fn new(options: CasdoorOptions, verifier: Arc<dyn ClaimVerifier>) -> Self {
        Self {
            options,
            verifier: Some(verifier),
        }
    }

    /// Lets every request through without resolving an identity.
    pub fn disabled(options: CasdoorOptions) -> Self {
        Self {
            options: CasdoorOptions {
                disabled: true,
                ..options
            },
            verifier: None,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.options.disabled || self.verifier.is_none()
    }

    pub fn reject(&self, err: &AuthError) -> Response {
        (self.options.error_handler)(err)
    }

    /// Resolves the caller of `req` into its extensions.
    ///
    /// `Ok(())` means continue with the request (with or without identity).
    pub fn check_jwt(&self, req: &mut Request) -> Result<(), AuthError> {
        if req.extensions().get::<Identity>().is_some() {
            return Ok(());
        }

        let Some(verifier) = self.verifier.as_ref().filter(|_| !self.options.disabled) else {
            return Ok(());
        };

        let token = match self.options.extractor.extract(req) {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(error = %err, "error extracting token");
                return Err(err.into());
            }
        };

        let Some(token) = token else {
            if self.options.credentials_optional {
                tracing::debug!("no credentials found (credentials optional)");
            } else {
                tracing::debug!("no credentials found");
            }
            return Ok(());
        };
        tracing::debug!(token_len = token.len(), "token extracted");

        let claims = match verifier.verify(&token) {
            Ok(claims) => claims,
            Err(err) => {
                tracing::warn!(error = %err, "error parsing token");
                return Err(err.into());
            }
        };

        let identity = Identity::from_claims(claims);
        tracing::debug!(user_id = %identity.user_id, "token verified");
        req.extensions_mut().insert(identity);
        Ok(())
    }
}

/// The identity resolved for `req`, if any.
pub fn user_claims(req: &Request) -> Option<&Identity> {
    req.extensions().get::<Identity>()
}

/// Applies the Casdoor check to every route of `router`.
///
/// ```ignore
/// let v1 = api::v1::routes::router(&ctx);
/// let v1 = middleware::auth::access::apply(v1, ctx.auth.clone());
/// ```
pub fn apply<S>(router: Router<S>, auth: Arc<CasdoorMiddleware>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(auth, serve))
}

pub async fn serve(
    State(auth): State<Arc<CasdoorMiddleware>>,
    mut req: Request,
    next: Next,
) -> Response {
    match auth.check_jwt(&mut req) {
        Ok(()) => next.run(req).await,
        Err(err) => auth.reject(&err),
    }
}
