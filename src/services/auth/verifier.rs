use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

use crate::services::auth::Claims;

/// Errors returned by access-token verification.
///
/// The Display text is what a rejected caller sees in the 401 body.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("invalid casdoor certificate: {0}")]
    InvalidCertificate(String),
    #[error("token verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("token carries no user id")]
    MissingUserId,
}

/// Parses and verifies a raw bearer token into claims.
///
/// Implemented by [`CasdoorVerifier`]; tests and alternative providers plug in
/// their own.
pub trait ClaimVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Claims, VerifyError>;
}

/// Verifies Casdoor tokens against the application's signing certificate.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct CasdoorVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for CasdoorVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CasdoorVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl CasdoorVerifier {
    /// `certificate_pem` is the X.509 certificate Casdoor shows for the
    /// application's cert (a bare RSA public key PEM is accepted too).
    pub fn new(certificate_pem: &str) -> Result<Self, VerifyError> {
        let decoding_key = DecodingKey::from_rsa_pem(certificate_pem.as_bytes())
            .map_err(|e| VerifyError::InvalidCertificate(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = vec![Algorithm::RS256, Algorithm::RS384, Algorithm::RS512];
        // Casdoor sets aud to the client id; the resource server accepts any application
        validation.validate_aud = false;

        Ok(Self {
            decoding_key,
            validation,
        })
    }
}

impl ClaimVerifier for CasdoorVerifier {
    fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        if claims.user_id().trim().is_empty() {
            return Err(VerifyError::MissingUserId);
        }

        Ok(claims)
    }
}
