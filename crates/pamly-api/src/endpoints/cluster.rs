// Cluster endpoints (read-only)

use super::fields_query;
use crate::client::ApplianceClient;
use crate::error::Error;
use crate::filter::Filter;
use crate::models::ClusterMember;

impl ApplianceClient {
    /// `GET Cluster/Members`
    pub async fn list_cluster_members(&self, filter: &Filter) -> Result<Vec<ClusterMember>, Error> {
        self.get_json("Cluster/Members", &filter.query_pairs())
            .await
    }

    /// `GET Cluster/Members/{id}`
    pub async fn get_cluster_member(&self, id: &str, fields: &[&str]) -> Result<ClusterMember, Error> {
        self.get_json(&format!("Cluster/Members/{id}"), &fields_query(fields))
            .await
    }
}
