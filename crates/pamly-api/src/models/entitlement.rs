use serde::{Deserialize, Serialize};

use super::access_request::AccessRequestType;
use super::asset::{Asset, AssetAccount};
use super::policy::AccessPolicy;

/// An (account, asset, policies) triple the current user may request,
/// from `GET Me/RequestEntitlements`. Read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AccountEntitlement {
    pub account: AssetAccount,
    pub asset: Asset,
    pub policies: Vec<AccessPolicy>,
}

impl AccountEntitlement {
    /// Request type of the first policy, if any policy is attached.
    pub fn access_request_type(&self) -> Option<AccessRequestType> {
        self.policies
            .first()
            .and_then(AccessPolicy::access_request_type)
    }
}
