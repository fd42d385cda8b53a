//! Resource records exchanged with the appliance core API.
//!
//! All records are plain, connection-free snapshots. Field names travel
//! as PascalCase; enums travel as strings.

mod access_request;
mod asset;
mod batch;
mod cluster;
mod entitlement;
mod identity_provider;
mod policy;
mod role;
mod task;
mod timestamp;
mod user;

pub use access_request::{
    AccessRequest, AccessRequestState, AccessRequestType, NewAccessRequest, WorkflowAction,
};
pub use asset::{Asset, AssetAccount};
pub use batch::{ApiErrorBody, BatchResponse};
pub use cluster::ClusterMember;
pub use entitlement::AccountEntitlement;
pub use identity_provider::IdentityProvider;
pub use policy::{
    AccessPolicy, AccessRequestProperties, PolicyAccount, ReasonCode, RequesterProperties,
};
pub use role::{Role, RoleMember};
pub use task::{AccountTaskData, PasswordActivityLog, TaskName, TaskRecord};
pub use user::User;
