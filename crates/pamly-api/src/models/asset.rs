use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Assets ───────────────────────────────────────────────────────────

/// Managed system, from `GET Assets`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Asset {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Hostname or IP address.
    pub network_address: Option<String>,
    pub platform_id: Option<i64>,
    pub platform_display_name: Option<String>,
    pub asset_partition_id: Option<i64>,
    pub asset_partition_name: Option<String>,
    pub disabled: bool,
    #[serde(with = "super::timestamp")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

// ── Accounts ─────────────────────────────────────────────────────────

/// Account on a managed asset, from `GET AssetAccounts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AssetAccount {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub domain_name: Option<String>,
    pub asset_id: i64,
    pub asset_name: Option<String>,
    pub asset_network_address: Option<String>,
    pub platform_id: Option<i64>,
    pub disabled: bool,
    pub has_password: bool,
    pub has_ssh_key: bool,
    pub is_service_account: bool,
    #[serde(with = "super::timestamp")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl AssetAccount {
    /// `asset\account` when the asset name is known, otherwise the bare name.
    pub fn qualified_name(&self) -> String {
        match &self.asset_name {
            Some(asset) => format!("{asset}\\{}", self.name),
            None => self.name.clone(),
        }
    }
}
