//! Workflow layer on top of `pamly-api`.
//!
//! - **[`Session`]**: Cheaply cloneable handle pairing an authenticated
//!   [`ApplianceClient`](pamly_api::ApplianceClient) with the polling
//!   configuration. [`Session::connect`] builds the transport and logs in.
//!
//! - **Access requests**: batch creation from entitlements, close /
//!   cancel / check-in dispatch by state, and password checkout that can
//!   wait for a pending request to become available.
//!
//! - **Task polling**: [`Session::check_task_state`] follows a
//!   password or SSH-key job to success or failure through the owning
//!   account's task schedule.
//!
//! Both polling loops run on a fixed interval and stop when the
//! caller's [`Deadline`] expires.

pub mod access_request;
pub mod config;
pub mod deadline;
pub mod error;
pub mod session;
pub mod task;

pub use access_request::RequestOptions;
pub use config::{AuthCredentials, PollConfig, SessionConfig, TlsVerification};
pub use deadline::Deadline;
pub use error::CoreError;
pub use session::Session;

// Records and query builder callers need alongside the workflows.
pub use pamly_api::models;
pub use pamly_api::{Error as ApiError, Filter, Operator};
