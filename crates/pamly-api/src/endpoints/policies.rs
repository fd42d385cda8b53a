// Access policy endpoints

use tracing::debug;

use super::fields_query;
use crate::client::ApplianceClient;
use crate::error::Error;
use crate::filter::Filter;
use crate::models::{AccessPolicy, PolicyAccount};

impl ApplianceClient {
    /// `GET AccessPolicies`
    pub async fn list_access_policies(&self, filter: &Filter) -> Result<Vec<AccessPolicy>, Error> {
        debug!("listing access policies");
        self.get_json("AccessPolicies", &filter.query_pairs()).await
    }

    /// `GET AccessPolicies/{id}`
    pub async fn get_access_policy(&self, id: i64, fields: &[&str]) -> Result<AccessPolicy, Error> {
        self.get_json(&format!("AccessPolicies/{id}"), &fields_query(fields))
            .await
    }

    /// `POST AccessPolicies`
    pub async fn create_access_policy(&self, policy: &AccessPolicy) -> Result<AccessPolicy, Error> {
        debug!(name = %policy.name, "creating access policy");
        self.post_json("AccessPolicies", policy).await
    }

    /// `PUT AccessPolicies/{id}`
    pub async fn update_access_policy(&self, policy: &AccessPolicy) -> Result<AccessPolicy, Error> {
        self.put_json(&format!("AccessPolicies/{}", policy.id), policy)
            .await
    }

    /// `DELETE AccessPolicies/{id}`
    pub async fn delete_access_policy(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting access policy");
        self.delete(&format!("AccessPolicies/{id}")).await?;
        Ok(())
    }

    /// Accounts in the scope of a policy.
    ///
    /// `GET AccessPolicies/{id}/Accounts`
    pub async fn list_policy_accounts(
        &self,
        policy_id: i64,
        filter: &Filter,
    ) -> Result<Vec<PolicyAccount>, Error> {
        debug!(policy_id, "listing policy accounts");
        self.get_json(
            &format!("AccessPolicies/{policy_id}/Accounts"),
            &filter.query_pairs(),
        )
        .await
    }
}
