pub mod claims;
pub mod factory;
pub mod verifier;

pub use claims::{Claims, Identity, user_id_of};
pub use factory::build_auth_middleware;
pub use verifier::{CasdoorVerifier, ClaimVerifier, VerifyError};
