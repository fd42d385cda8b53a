// Asset endpoints

use tracing::debug;

use super::fields_query;
use crate::client::ApplianceClient;
use crate::error::Error;
use crate::filter::Filter;
use crate::models::Asset;

impl ApplianceClient {
    /// `GET Assets`
    pub async fn list_assets(&self, filter: &Filter) -> Result<Vec<Asset>, Error> {
        debug!("listing assets");
        self.get_json("Assets", &filter.query_pairs()).await
    }

    /// `GET Assets/{id}`
    pub async fn get_asset(&self, id: i64, fields: &[&str]) -> Result<Asset, Error> {
        self.get_json(&format!("Assets/{id}"), &fields_query(fields))
            .await
    }

    /// `POST Assets`
    pub async fn create_asset(&self, asset: &Asset) -> Result<Asset, Error> {
        debug!(name = %asset.name, "creating asset");
        self.post_json("Assets", asset).await
    }

    /// `PUT Assets/{id}`
    pub async fn update_asset(&self, asset: &Asset) -> Result<Asset, Error> {
        debug!(id = asset.id, "updating asset");
        self.put_json(&format!("Assets/{}", asset.id), asset).await
    }

    /// `DELETE Assets/{id}`
    pub async fn delete_asset(&self, id: i64) -> Result<(), Error> {
        debug!(id, "deleting asset");
        self.delete(&format!("Assets/{id}")).await?;
        Ok(())
    }
}
