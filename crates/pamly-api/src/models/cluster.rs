use serde::{Deserialize, Serialize};

/// Appliance in the cluster, from `GET Cluster/Members`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ClusterMember {
    pub id: String,
    pub name: String,
    pub hostname: Option<String>,
    pub ipv4_address: Option<String>,
    pub is_leader: bool,
    pub is_online: bool,
    pub appliance_version: Option<String>,
}
