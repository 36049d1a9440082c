pub mod client;

pub use client::{CasdoorClient, ClientError, Organization};
