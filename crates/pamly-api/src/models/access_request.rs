// ── Access request types ──
//
// An access request is a time-boxed grant to check out a credential or
// open a session on an account. The appliance drives it through a state
// machine; the client only reads snapshots and invokes explicit actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Server-side state of an access request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum AccessRequestState {
    New,
    PendingApproval,
    PendingTimeRequested,
    PendingAccountRestored,
    PendingAccountElevated,
    RequestAvailable,
    PasswordCheckedOut,
    PasswordCheckedIn,
    PendingReview,
    PendingPasswordReset,
    Expired,
    Denied,
    Canceled,
    Revoked,
    PendingAcknowledgment,
    Acknowledged,
    Complete,
    Pending,
}

impl AccessRequestState {
    /// Waiting on the appliance or an approver before it can be used.
    pub fn is_pending(self) -> bool {
        matches!(
            self,
            Self::Pending
                | Self::PendingApproval
                | Self::PendingTimeRequested
                | Self::PendingAccountRestored
                | Self::PendingAccountElevated
                | Self::PendingReview
                | Self::PendingPasswordReset
                | Self::PendingAcknowledgment
        )
    }

    /// Terminal states; the request can never be checked out again.
    pub fn is_invalid_for_checkout(self) -> bool {
        matches!(
            self,
            Self::Complete | Self::Expired | Self::Denied | Self::Canceled | Self::Revoked
        )
    }

    /// The credential can be checked out right now.
    pub fn is_valid_for_checkout(self) -> bool {
        matches!(
            self,
            Self::PasswordCheckedOut | Self::RequestAvailable | Self::Acknowledged
        )
    }
}

/// Kind of access being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum AccessRequestType {
    Password,
    #[serde(rename = "SSHKey")]
    #[strum(serialize = "SSHKey")]
    SshKey,
    #[serde(rename = "SSH")]
    #[strum(serialize = "SSH")]
    Ssh,
    RemoteDesktop,
    RemoteDesktopApplication,
    Telnet,
    ApiKey,
    File,
}

/// One entry of the request's workflow history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WorkflowAction {
    /// e.g. `Create`, `Approve`, `CheckOutPassword`, `Cancel`.
    pub action_type: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub user_display_name: Option<String>,
    #[serde(default, with = "super::timestamp")]
    pub occurred: Option<DateTime<Utc>>,
    #[serde(default)]
    pub state: Option<AccessRequestState>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Access request record from `AccessRequests`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccessRequest {
    pub id: String,
    #[serde(default)]
    pub access_request_type: Option<AccessRequestType>,
    pub state: AccessRequestState,
    #[serde(default)]
    pub account_id: Option<i64>,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub asset_id: Option<i64>,
    #[serde(default)]
    pub asset_name: Option<String>,
    #[serde(default)]
    pub requester_id: Option<i64>,
    #[serde(default)]
    pub requester_display_name: Option<String>,
    #[serde(default)]
    pub requested_duration_minutes: Option<u32>,
    #[serde(default)]
    pub reason_code: Option<String>,
    #[serde(default)]
    pub reason_comment: Option<String>,
    #[serde(default, with = "super::timestamp")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default, with = "super::timestamp")]
    pub expires_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub workflow_actions: Vec<WorkflowAction>,
}

impl AccessRequest {
    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    pub fn is_valid_for_checkout(&self) -> bool {
        self.state.is_valid_for_checkout()
    }

    pub fn is_invalid_for_checkout(&self) -> bool {
        self.state.is_invalid_for_checkout()
    }
}

/// Creation payload submitted to `AccessRequests/BatchCreate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewAccessRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_request_type: Option<AccessRequestType>,
    pub account_id: i64,
    pub asset_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_duration_minutes: Option<u32>,
    /// Request on behalf of another user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_comment: Option<String>,
}
