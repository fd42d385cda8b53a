// ── Access-request workflow ──
//
// Creation from entitlements, close/cancel/check-in dispatch, and password
// checkout with an optional wait for pending requests to become available.

use std::fmt::Write as _;

use pamly_api::models::{
    AccessRequest, AccessRequestState, AccountEntitlement, BatchResponse, NewAccessRequest,
};
use secrecy::SecretString;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};

use crate::deadline::Deadline;
use crate::error::CoreError;
use crate::session::Session;

/// Request details shared by every entitlement in a create call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub requested_duration_minutes: Option<u32>,
    /// Request on behalf of another user.
    pub requester_username: Option<String>,
    pub reason_code: Option<String>,
    pub reason_comment: Option<String>,
}

impl RequestOptions {
    /// Creation payload for one entitlement.
    pub fn payload_for(&self, entitlement: &AccountEntitlement) -> NewAccessRequest {
        NewAccessRequest {
            access_request_type: entitlement.access_request_type(),
            account_id: entitlement.account.id,
            asset_id: entitlement.asset.id,
            requested_duration_minutes: self.requested_duration_minutes,
            requester_username: self.requester_username.clone(),
            reason_code: self.reason_code.clone(),
            reason_comment: self.reason_comment.clone(),
        }
    }
}

impl Session {
    // ── Creation ─────────────────────────────────────────────────────

    /// Request access for one entitlement.
    pub async fn create_access_request(
        &self,
        entitlement: &AccountEntitlement,
        options: &RequestOptions,
    ) -> Result<AccessRequest, CoreError> {
        let request = self
            .client()
            .create_access_request(&options.payload_for(entitlement))
            .await?;
        info!(id = %request.id, state = %request.state, "access request created");
        Ok(request)
    }

    /// Request access for every entitlement in one batch.
    ///
    /// Entry `i` of the result answers `entitlements[i]`. If any entry
    /// failed, the whole result list comes back inside
    /// [`CoreError::PartialBatch`] together with every failure message.
    pub async fn create_access_requests(
        &self,
        entitlements: &[AccountEntitlement],
        options: &RequestOptions,
    ) -> Result<Vec<BatchResponse<AccessRequest>>, CoreError> {
        let payloads: Vec<NewAccessRequest> = entitlements
            .iter()
            .map(|e| options.payload_for(e))
            .collect();

        let results = self
            .client()
            .batch_create_access_requests(&payloads)
            .await?;
        if results.len() != payloads.len() {
            warn!(
                submitted = payloads.len(),
                returned = results.len(),
                "batch response length differs from request"
            );
        }

        let mut message = String::new();
        for (i, entry) in results.iter().enumerate() {
            if let Some(failure) = entry.failure_message() {
                if !message.is_empty() {
                    message.push_str("; ");
                }
                let _ = write!(message, "entry {i}: {failure}");
            }
        }

        if message.is_empty() {
            info!(count = results.len(), "access requests created");
            Ok(results)
        } else {
            warn!(%message, "batch create partially failed");
            Err(CoreError::PartialBatch { results, message })
        }
    }

    // ── Lifecycle actions ────────────────────────────────────────────

    /// End a request in whatever way its state allows.
    ///
    /// Checked-out requests are checked in; `Pending`, `RequestAvailable`
    /// and `PendingAccountRestored` requests are canceled; `Complete`
    /// requests are returned unchanged. Other states are rejected without
    /// contacting the appliance.
    pub async fn close_access_request(
        &self,
        request: &AccessRequest,
    ) -> Result<AccessRequest, CoreError> {
        debug!(id = %request.id, state = %request.state, "closing access request");
        match request.state {
            AccessRequestState::PasswordCheckedOut => self.check_in_access_request(request).await,
            AccessRequestState::Pending
            | AccessRequestState::RequestAvailable
            | AccessRequestState::PendingAccountRestored => {
                self.cancel_access_request(request).await
            }
            AccessRequestState::Complete => Ok(request.clone()),
            state => Err(CoreError::InvalidState {
                operation: "close",
                request_id: request.id.clone(),
                state,
            }),
        }
    }

    pub async fn cancel_access_request(
        &self,
        request: &AccessRequest,
    ) -> Result<AccessRequest, CoreError> {
        let updated = self.client().cancel_access_request(&request.id).await?;
        info!(id = %updated.id, state = %updated.state, "access request canceled");
        Ok(updated)
    }

    pub async fn check_in_access_request(
        &self,
        request: &AccessRequest,
    ) -> Result<AccessRequest, CoreError> {
        let updated = self.client().check_in_access_request(&request.id).await?;
        info!(id = %updated.id, state = %updated.state, "access request checked in");
        Ok(updated)
    }

    // ── Checkout ─────────────────────────────────────────────────────

    /// Retrieve the password for `request`.
    ///
    /// A pending request fails with [`CoreError::StillPending`] unless
    /// `wait_for_pending` is set, in which case the request is re-fetched
    /// every `checkout_interval` until it becomes available. The wait ends
    /// with [`CoreError::Timeout`] when `deadline` expires, or with
    /// [`CoreError::InvalidState`] if the request lands in a terminal state.
    pub async fn check_out_password(
        &self,
        request: &AccessRequest,
        wait_for_pending: bool,
        deadline: &Deadline,
    ) -> Result<SecretString, CoreError> {
        if request.is_invalid_for_checkout() {
            return Err(CoreError::InvalidState {
                operation: "check out",
                request_id: request.id.clone(),
                state: request.state,
            });
        }

        if request.is_pending() {
            if !wait_for_pending {
                return Err(CoreError::StillPending {
                    request_id: request.id.clone(),
                    state: request.state,
                });
            }
            self.wait_until_available(&request.id, deadline).await?;
        }

        let password = self.client().check_out_password(&request.id).await?;
        Ok(password)
    }

    async fn wait_until_available(&self, id: &str, deadline: &Deadline) -> Result<(), CoreError> {
        debug!(id, "waiting for access request to become available");
        let timeout = || CoreError::Timeout {
            waiting_for: format!("access request {id} to become available"),
        };
        let mut interval = tokio::time::interval(self.poll_config().checkout_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval.tick().await; // consume the immediate first tick

        let expired = deadline.expired();
        tokio::pin!(expired);

        loop {
            tokio::select! {
                biased;
                () = &mut expired => return Err(timeout()),
                _ = interval.tick() => {}
            }
            let current = tokio::select! {
                biased;
                () = &mut expired => return Err(timeout()),
                current = self.client().get_access_request(id, &[]) => current?,
            };
            // The next tick counts from the end of this poll.
            interval.reset();

            trace!(id, state = %current.state, "polled access request");
            if current.is_valid_for_checkout() {
                return Ok(());
            }
            if current.is_invalid_for_checkout() {
                return Err(CoreError::InvalidState {
                    operation: "check out",
                    request_id: current.id,
                    state: current.state,
                });
            }
        }
    }
}
