// ── Runtime session configuration ──
//
// These types describe *how* to reach an appliance. They carry credential
// data and connection tuning, but never touch disk. The CLI builds a
// `SessionConfig` (usually through pamly-config) and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// How to authenticate with the appliance.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// A user token issued earlier (skips the login exchange).
    Token(SecretString),
    /// Username/password against an identity provider.
    Password {
        username: String,
        password: SecretString,
        /// rSTS provider id, `local` for the built-in directory.
        provider: String,
    },
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (appliances ship with self-signed certs).
    DangerAcceptInvalid,
}

/// Fixed intervals of the two polling loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Re-fetch interval while waiting for a pending access request.
    pub checkout_interval: Duration,
    /// Re-fetch interval while waiting for an account task to finish.
    pub task_interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            checkout_interval: Duration::from_secs(1),
            task_interval: Duration::from_millis(500),
        }
    }
}

/// Configuration for one appliance session.
///
/// Built by the CLI, passed to `Session::connect` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Appliance URL (e.g., `https://pam.example.com`).
    pub url: Url,
    pub auth: AuthCredentials,
    pub tls: TlsVerification,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    pub poll: PollConfig,
}

impl SessionConfig {
    pub fn new(url: Url, auth: AuthCredentials) -> Self {
        Self {
            url,
            auth,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            poll: PollConfig::default(),
        }
    }
}
