// pamly-api: Async Rust client for the core REST API of a privileged
// access management appliance.
//
// `ApplianceClient` is the transport: authenticated GET/POST/PUT/DELETE
// against `/service/core/v4/`, returning raw bodies or typed records.
// Each resource family adds its endpoints as inherent methods from the
// `endpoints` module. Workflow logic (access-request lifecycle, task
// polling) lives in `pamly-core`.

mod auth;
pub mod client;
mod endpoints;
pub mod error;
pub mod filter;
pub mod models;
pub mod transport;

pub use client::ApplianceClient;
pub use error::Error;
pub use filter::{Filter, FilterValue, Operator};
pub use transport::{TlsMode, TransportConfig};
