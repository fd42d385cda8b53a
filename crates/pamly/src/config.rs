//! CLI configuration -- thin wrapper around `pamly_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--appliance, --token, --insecure, --timeout).

use std::time::Duration;

use secrecy::SecretString;

use pamly_core::{AuthCredentials, PollConfig, SessionConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use pamly_config::{
    Config, Profile, config_path, load_config, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the `SessionConfig` for this invocation.
///
/// CLI flags take priority over profile values. Without a matching profile
/// the session is built from `--appliance` and `--token` alone.
pub fn build_session_config(global: &GlobalOpts, cfg: &Config) -> Result<SessionConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let Some(profile) = cfg.profiles.get(&profile_name) else {
        // An explicitly named profile must exist.
        if global.profile.is_some() {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(cfg),
            });
        }
        return session_from_flags(global, cfg, &profile_name);
    };

    resolve_profile(profile, &profile_name, global, cfg)
}

/// Translate a `Profile` + global flags into a `SessionConfig`.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<SessionConfig, CliError> {
    // 1. Appliance URL (flag > env > profile)
    let url_str = global.appliance.as_deref().unwrap_or(&profile.appliance);
    let url = parse_url(url_str)?;

    // 2. Auth (--token > profile chain)
    let auth = match global.token {
        Some(ref token) => AuthCredentials::Token(SecretString::from(token.clone())),
        None => pamly_config::resolve_auth(profile, profile_name)?,
    };

    // 3. TLS verification
    let tls = if global.insecure || cfg.defaults.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        pamly_config::profile_tls(profile)
    };

    // 4. Timeout (flag > profile > defaults)
    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(cfg.defaults.timeout);

    Ok(SessionConfig {
        url,
        auth,
        tls,
        timeout: Duration::from_secs(timeout),
        poll: pamly_config::profile_poll(profile),
    })
}

fn session_from_flags(
    global: &GlobalOpts,
    cfg: &Config,
    profile_name: &str,
) -> Result<SessionConfig, CliError> {
    let url_str = global.appliance.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let url = parse_url(url_str)?;

    let Some(ref token) = global.token else {
        return Err(CliError::NoCredentials {
            profile: profile_name.into(),
        });
    };

    let tls = if global.insecure || cfg.defaults.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(SessionConfig {
        url,
        auth: AuthCredentials::Token(SecretString::from(token.clone())),
        tls,
        timeout: Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout)),
        poll: PollConfig::default(),
    })
}

fn parse_url(url_str: &str) -> Result<url::Url, CliError> {
    url_str.parse().map_err(|_| CliError::Validation {
        field: "appliance".into(),
        reason: format!("invalid URL: {url_str}"),
    })
}

/// Comma-separated, sorted profile names for help text.
pub fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<_> = cfg.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort_unstable();
    names.join(", ")
}
