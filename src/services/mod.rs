pub mod auth;
pub mod casdoor;
