// ── Session ──
//
// Pairs an authenticated `ApplianceClient` with the polling configuration.
// Records returned by the API stay plain data; every workflow operation
// is a method here that takes the record (or its id) as an argument.

use std::sync::Arc;

use pamly_api::ApplianceClient;
use pamly_api::transport::{TlsMode, TransportConfig};
use tracing::{debug, info};

use crate::config::{AuthCredentials, PollConfig, SessionConfig, TlsVerification};
use crate::error::CoreError;

/// Handle to an appliance for workflow operations.
///
/// Cheaply cloneable via `Arc`; clones share the same client and token.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: ApplianceClient,
    poll: PollConfig,
    /// Set when `connect` ran the login exchange itself.
    owns_login: bool,
}

impl Session {
    /// Build the transport and authenticate.
    ///
    /// With [`AuthCredentials::Password`] this runs the login exchange;
    /// with [`AuthCredentials::Token`] the token is attached as-is.
    pub async fn connect(config: SessionConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: tls_to_transport(&config.tls),
            timeout: config.timeout,
        };
        let client = ApplianceClient::new(config.url.clone(), &transport)?;

        let owns_login = match &config.auth {
            AuthCredentials::Token(token) => {
                debug!(url = %config.url, "using pre-issued user token");
                client.set_token(token.clone());
                false
            }
            AuthCredentials::Password {
                username,
                password,
                provider,
            } => {
                client.login(username, password, provider).await?;
                true
            }
        };
        info!(url = %config.url, "session established");

        Ok(Self {
            inner: Arc::new(SessionInner {
                client,
                poll: config.poll,
                owns_login,
            }),
        })
    }

    /// Wrap an already-authenticated client.
    pub fn from_client(client: ApplianceClient, poll: PollConfig) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                client,
                poll,
                owns_login: false,
            }),
        }
    }

    /// The underlying API client, for plain resource calls.
    pub fn client(&self) -> &ApplianceClient {
        &self.inner.client
    }

    pub fn poll_config(&self) -> &PollConfig {
        &self.inner.poll
    }

    /// Whether this session logged in with a password, as opposed to
    /// borrowing a pre-issued token.
    pub fn owns_login(&self) -> bool {
        self.inner.owns_login
    }

    /// Log out and drop the user token.
    pub async fn disconnect(&self) -> Result<(), CoreError> {
        self.inner.client.logout().await?;
        info!("session closed");
        Ok(())
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
