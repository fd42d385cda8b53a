// Appliance authentication
//
// Two-step login: a resource-owner password grant against the embedded
// secure token service (rSTS), then an exchange of the STS access token
// for a core-API user token. The user token is stored on the client and
// sent as a bearer credential on every later request.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::client::{ApplianceClient, decode, read_body};
use crate::error::Error;

const STS_TOKEN_PATH: &str = "RSTS/oauth2/token";

#[derive(Serialize)]
struct StsTokenRequest<'a> {
    grant_type: &'static str,
    username: &'a str,
    password: &'a str,
    scope: String,
}

#[derive(Deserialize)]
struct StsTokenResponse {
    access_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct LoginExchangeRequest<'a> {
    sts_access_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LoginExchangeResponse {
    status: String,
    #[serde(default)]
    user_token: Option<String>,
}

impl ApplianceClient {
    /// Authenticate with username/password against an identity provider.
    ///
    /// `provider` is the provider's rSTS id (`"local"` for the built-in
    /// directory). On success the user token is stored on the client.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
        provider: &str,
    ) -> Result<(), Error> {
        let url = self.root_url(STS_TOKEN_PATH)?;
        debug!(username, provider, "requesting STS token at {url}");

        let body = StsTokenRequest {
            grant_type: "password",
            username,
            password: password.expose_secret(),
            scope: format!("rsts:sts:primaryproviderid:{provider}"),
        };

        let resp = self.http().post(url).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }
        let sts: StsTokenResponse = decode(&resp.bytes().await?)?;

        self.exchange_sts_token(&SecretString::from(sts.access_token))
            .await?;
        info!(username, "login successful");
        Ok(())
    }

    /// Exchange an STS access token for a user token and store it.
    ///
    /// Useful when the STS token was obtained out of band (e.g. through
    /// a browser or certificate flow).
    pub async fn exchange_sts_token(&self, sts_token: &SecretString) -> Result<(), Error> {
        let url = self.api_url("Token/LoginResponse")?;
        debug!("exchanging STS token at {url}");

        let resp = self
            .http()
            .post(url)
            .json(&LoginExchangeRequest {
                sts_access_token: sts_token.expose_secret(),
            })
            .send()
            .await?;
        let exchange: LoginExchangeResponse = decode(&read_body(resp).await?)?;

        match exchange.user_token {
            Some(token) if exchange.status == "Success" => {
                self.set_token(SecretString::from(token));
                Ok(())
            }
            _ => Err(Error::Authentication {
                message: format!("token exchange returned status '{}'", exchange.status),
            }),
        }
    }

    /// End the current session and forget the user token.
    pub async fn logout(&self) -> Result<(), Error> {
        debug!("logging out");
        self.post_empty("Token/Logout").await?;
        self.clear_token();
        debug!("logout complete");
        Ok(())
    }
}
