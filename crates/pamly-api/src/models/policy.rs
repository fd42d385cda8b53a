use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::access_request::AccessRequestType;

// ── Policies ─────────────────────────────────────────────────────────

/// Access policy, from `GET AccessPolicies`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AccessPolicy {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub role_id: Option<i64>,
    pub role_name: Option<String>,
    pub priority: i32,
    pub is_expired: bool,
    pub access_request_properties: AccessRequestProperties,
    pub requester_properties: RequesterProperties,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl AccessPolicy {
    /// Reason codes a requester may pick under this policy.
    pub fn reason_codes(&self) -> &[ReasonCode] {
        &self.requester_properties.reason_codes
    }

    /// Kind of access this policy grants.
    pub fn access_request_type(&self) -> Option<AccessRequestType> {
        self.access_request_properties.access_request_type
    }
}

/// What a request under the policy may ask for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AccessRequestProperties {
    pub access_request_type: Option<AccessRequestType>,
    pub allow_simultaneous_access: bool,
    pub default_release_duration_minutes: Option<u32>,
    pub maximum_release_duration_days: Option<u32>,
    pub change_password_after_checkin: bool,
}

/// Constraints imposed on the requester.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RequesterProperties {
    pub require_reason_code: bool,
    pub require_reason_comment: bool,
    pub require_ticket_number: bool,
    pub reason_codes: Vec<ReasonCode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ReasonCode {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Account in a policy's scope, from `GET AccessPolicies/{id}/Accounts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PolicyAccount {
    pub id: i64,
    pub name: String,
    pub domain_name: Option<String>,
    pub asset_id: i64,
    pub asset_name: Option<String>,
    pub disabled: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn accessors_read_nested_properties() {
        let policy: AccessPolicy = serde_json::from_str(
            r#"{
                "Id": 4,
                "Name": "Linux root",
                "AccessRequestProperties": {"AccessRequestType": "SSH"},
                "RequesterProperties": {
                    "RequireReasonCode": true,
                    "ReasonCodes": [{"Id": 1, "Name": "Incident"}, {"Id": 2, "Name": "Change"}]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(policy.access_request_type(), Some(AccessRequestType::Ssh));
        let names: Vec<_> = policy.reason_codes().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Incident", "Change"]);
    }

    #[test]
    fn bare_policy_has_no_type_or_reasons() {
        let policy: AccessPolicy = serde_json::from_str(r#"{"Id": 1, "Name": "p"}"#).unwrap();
        assert_eq!(policy.access_request_type(), None);
        assert!(policy.reason_codes().is_empty());
    }
}
