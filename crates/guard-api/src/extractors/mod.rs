//! Axum extractors for request handling
//!
//! Custom extractors for validation, request signing, and client identity.

mod client_ip;
mod path;
mod signed;
mod validated;

pub use client_ip::ClientIp;
pub use path::{ApiPath, TablePath};
pub use signed::{SignedJson, SignedTarget};
pub use validated::ValidatedJson;
