pub mod access;
pub mod extract;
pub mod must;

pub use access::{AuthError, CasdoorMiddleware, CasdoorOptions, ErrorHandler, on_error};
pub use extract::{
    ExtractError, SharedExtractor, TokenExtractor, default_extractor, from_auth_header,
    from_first, from_header, from_parameter,
};
