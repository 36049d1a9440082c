pub mod controller;
pub mod dto;
pub mod extractors;
pub mod response;
pub mod v1;
