use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Entitlement (role) grouping access policies and their members.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub priority: i32,
    pub members: Vec<RoleMember>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// A user or group granted a role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RoleMember {
    pub id: i64,
    pub name: String,
    /// `User` or `Group`.
    pub principal_kind: Option<String>,
}
