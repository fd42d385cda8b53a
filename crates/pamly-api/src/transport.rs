// HTTP client construction for the appliance.
//
// Appliances usually sit behind a self-signed or internal-CA certificate,
// so the trust source is chosen per connection. One client serves both the
// STS token endpoint and the core API.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::Error;

const USER_AGENT: &str = concat!("pamly/", env!("CARGO_PKG_VERSION"));

/// Where the appliance's server certificate is trusted from.
#[derive(Debug, Clone)]
pub enum TlsMode {
    /// Platform root store.
    System,
    /// PEM bundle of the CA that signed the appliance certificate.
    CustomCa(PathBuf),
    /// No verification. Lab appliances only.
    DangerAcceptInvalid,
}

/// TLS trust and per-request timeout for talking to one appliance.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build the rustls-backed client. An unreadable CA bundle is reported
    /// as [`Error::Tls`] before any request is made.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT);

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}
