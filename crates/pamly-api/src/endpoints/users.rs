// User endpoints
//
// `Users` collection of the core API.

use tracing::debug;

use super::fields_query;
use crate::client::ApplianceClient;
use crate::error::Error;
use crate::filter::Filter;
use crate::models::User;

impl ApplianceClient {
    /// `GET Users`
    pub async fn list_users(&self, filter: &Filter) -> Result<Vec<User>, Error> {
        debug!("listing users");
        self.get_json("Users", &filter.query_pairs()).await
    }

    /// `GET Users/{id}`
    pub async fn get_user(&self, id: i64, fields: &[&str]) -> Result<User, Error> {
        self.get_json(&format!("Users/{id}"), &fields_query(fields))
            .await
    }

    /// `POST Users`
    pub async fn create_user(&self, user: &User) -> Result<User, Error> {
        debug!(name = %user.name, "creating user");
        self.post_json("Users", user).await
    }

    /// `PUT Users/{id}`
    pub async fn update_user(&self, user: &User) -> Result<User, Error> {
        debug!(id = user.id, "updating user");
        self.put_json(&format!("Users/{}", user.id), user).await
    }

    /// `DELETE Users/{id}`
    pub async fn delete_user(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting user");
        self.delete(&format!("Users/{id}")).await?;
        Ok(())
    }
}
