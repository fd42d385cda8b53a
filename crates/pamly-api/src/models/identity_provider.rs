use serde::{Deserialize, Serialize};

/// Authentication provider known to the appliance, from `GET IdentityProviders`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct IdentityProvider {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// e.g. `Local`, `ActiveDirectory`, `Ldap`.
    pub type_reference_name: Option<String>,
    /// Identifier used in the login scope (`local`, `ad:...`).
    pub rsts_provider_id: Option<String>,
    pub network_address: Option<String>,
}
