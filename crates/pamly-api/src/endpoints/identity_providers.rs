// Identity provider endpoints

use tracing::debug;

use super::fields_query;
use crate::client::ApplianceClient;
use crate::error::Error;
use crate::filter::Filter;
use crate::models::IdentityProvider;

impl ApplianceClient {
    /// `GET IdentityProviders`
    pub async fn list_identity_providers(
        &self,
        filter: &Filter,
    ) -> Result<Vec<IdentityProvider>, Error> {
        debug!("listing identity providers");
        self.get_json("IdentityProviders", &filter.query_pairs())
            .await
    }

    /// `GET IdentityProviders/{id}`
    pub async fn get_identity_provider(
        &self,
        id: i64,
        fields: &[&str],
    ) -> Result<IdentityProvider, Error> {
        self.get_json(&format!("IdentityProviders/{id}"), &fields_query(fields))
            .await
    }

    /// `POST IdentityProviders`
    pub async fn create_identity_provider(
        &self,
        provider: &IdentityProvider,
    ) -> Result<IdentityProvider, Error> {
        debug!(name = %provider.name, "creating identity provider");
        self.post_json("IdentityProviders", provider).await
    }

    /// `DELETE IdentityProviders/{id}`
    pub async fn delete_identity_provider(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting identity provider");
        self.delete(&format!("IdentityProviders/{id}")).await?;
        Ok(())
    }
}
