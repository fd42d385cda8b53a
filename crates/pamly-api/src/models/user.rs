use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Appliance user, from `GET Users`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_address: Option<String>,
    pub description: Option<String>,
    pub disabled: bool,
    pub locked: bool,
    pub identity_provider_id: Option<i64>,
    pub identity_provider_name: Option<String>,
    /// e.g. `GlobalAdmin`, `AssetAdmin`, `PolicyAdmin`.
    pub admin_roles: Vec<String>,
    #[serde(with = "super::timestamp")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(with = "super::timestamp")]
    pub last_login_date: Option<DateTime<Utc>>,
    /// Catch-all for additional fields not modeled above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}
