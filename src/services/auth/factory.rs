//! Factory: build the Casdoor auth middleware from application settings.
use std::sync::Arc;

use crate::config::CasdoorSettings;
use crate::middleware::auth::{CasdoorMiddleware, CasdoorOptions};
use crate::services::auth::{CasdoorVerifier, ClaimVerifier, VerifyError};

pub fn build_auth_middleware(
    settings: &CasdoorSettings,
) -> Result<Arc<CasdoorMiddleware>, VerifyError> {
    let options = CasdoorOptions::from_settings(settings);

    if settings.disabled {
        tracing::warn!("casdoor verification is disabled; requests pass without identity");
        return Ok(Arc::new(CasdoorMiddleware::disabled(options)));
    }

    let verifier: Arc<dyn ClaimVerifier> = Arc::new(CasdoorVerifier::new(&settings.certificate)?);
    Ok(Arc::new(CasdoorMiddleware::new(options, verifier)))
}
