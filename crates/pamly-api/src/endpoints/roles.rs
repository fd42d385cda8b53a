// Role (entitlement) endpoints

use tracing::debug;

use super::fields_query;
use crate::client::ApplianceClient;
use crate::error::Error;
use crate::filter::Filter;
use crate::models::Role;

impl ApplianceClient {
    /// `GET Roles`
    pub async fn list_roles(&self, filter: &Filter) -> Result<Vec<Role>, Error> {
        debug!("listing roles");
        self.get_json("Roles", &filter.query_pairs()).await
    }

    /// `GET Roles/{id}`
    pub async fn get_role(&self, id: i64, fields: &[&str]) -> Result<Role, Error> {
        self.get_json(&format!("Roles/{id}"), &fields_query(fields))
            .await
    }

    /// `POST Roles`
    pub async fn create_role(&self, role: &Role) -> Result<Role, Error> {
        debug!(name = %role.name, "creating role");
        self.post_json("Roles", role).await
    }

    /// `PUT Roles/{id}`
    pub async fn update_role(&self, role: &Role) -> Result<Role, Error> {
        self.put_json(&format!("Roles/{}", role.id), role).await
    }

    /// `DELETE Roles/{id}`
    pub async fn delete_role(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting role");
        self.delete(&format!("Roles/{id}")).await?;
        Ok(())
    }
}
