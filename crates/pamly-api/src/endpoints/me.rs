// Endpoints scoped to the logged-in user

use tracing::debug;

use crate::client::ApplianceClient;
use crate::error::Error;
use crate::filter::Filter;
use crate::models::{AccountEntitlement, User};

impl ApplianceClient {
    /// The user the current token belongs to.
    ///
    /// `GET Me`
    pub async fn get_me(&self) -> Result<User, Error> {
        self.get_json("Me", &[]).await
    }

    /// Accounts the current user may request access to.
    ///
    /// `GET Me/RequestEntitlements`
    pub async fn list_request_entitlements(
        &self,
        filter: &Filter,
    ) -> Result<Vec<AccountEntitlement>, Error> {
        debug!("listing request entitlements");
        self.get_json("Me/RequestEntitlements", &filter.query_pairs())
            .await
    }
}
