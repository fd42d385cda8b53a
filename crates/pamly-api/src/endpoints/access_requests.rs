// Access request endpoints
//
// Creation goes through the batch endpoint; lifecycle transitions are
// POST actions on `AccessRequests/{id}/<Action>` that answer with the
// updated record. Password checkout is the one endpoint whose body is
// the secret itself rather than JSON.

use secrecy::SecretString;
use tracing::{debug, info};

use super::fields_query;
use crate::client::ApplianceClient;
use crate::error::Error;
use crate::filter::Filter;
use crate::models::{AccessRequest, BatchResponse, NewAccessRequest};

impl ApplianceClient {
    /// `GET AccessRequests`
    pub async fn list_access_requests(&self, filter: &Filter) -> Result<Vec<AccessRequest>, Error> {
        debug!("listing access requests");
        self.get_json("AccessRequests", &filter.query_pairs()).await
    }

    /// `GET AccessRequests/{id}`
    pub async fn get_access_request(
        &self,
        id: &str,
        fields: &[&str],
    ) -> Result<AccessRequest, Error> {
        self.get_json(&format!("AccessRequests/{id}"), &fields_query(fields))
            .await
    }

    /// Submit a single request.
    ///
    /// `POST AccessRequests`
    pub async fn create_access_request(
        &self,
        request: &NewAccessRequest,
    ) -> Result<AccessRequest, Error> {
        debug!(
            account_id = request.account_id,
            asset_id = request.asset_id,
            "creating access request"
        );
        self.post_json("AccessRequests", request).await
    }

    /// Submit several requests at once. Entry `i` of the response answers
    /// `requests[i]`; individual entries may fail while others succeed.
    ///
    /// `POST AccessRequests/BatchCreate`
    pub async fn batch_create_access_requests(
        &self,
        requests: &[NewAccessRequest],
    ) -> Result<Vec<BatchResponse<AccessRequest>>, Error> {
        debug!(count = requests.len(), "batch-creating access requests");
        self.post_json("AccessRequests/BatchCreate", requests).await
    }

    /// `POST AccessRequests/{id}/Cancel`
    pub async fn cancel_access_request(&self, id: &str) -> Result<AccessRequest, Error> {
        debug!(id, "canceling access request");
        self.post_action(&format!("AccessRequests/{id}/Cancel"))
            .await
    }

    /// `POST AccessRequests/{id}/CheckIn`
    pub async fn check_in_access_request(&self, id: &str) -> Result<AccessRequest, Error> {
        debug!(id, "checking in access request");
        self.post_action(&format!("AccessRequests/{id}/CheckIn"))
            .await
    }

    /// Retrieve the secret for an available request.
    ///
    /// The response body is returned verbatim, without JSON decoding.
    ///
    /// `POST AccessRequests/{id}/CheckOutPassword`
    pub async fn check_out_password(&self, id: &str) -> Result<SecretString, Error> {
        let body = self
            .post_empty(&format!("AccessRequests/{id}/CheckOutPassword"))
            .await?;
        let password = String::from_utf8(body.to_vec()).map_err(|e| Error::Deserialization {
            message: format!("checkout response is not UTF-8: {e}"),
            body: String::new(),
        })?;
        info!(id, "password checked out");
        Ok(SecretString::from(password))
    }
}
