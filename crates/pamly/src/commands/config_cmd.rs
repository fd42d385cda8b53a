//! Config subcommand handlers.

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of `cfg` with plaintext secrets masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(MASK.into());
        }
    }
    cfg
}

/// Format config for display as TOML, secrets masked.
fn format_config(cfg: &Config) -> String {
    toml::to_string_pretty(&redacted(cfg))
        .unwrap_or_else(|e| format!("# failed to render config: {e}"))
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_secret(prompt: &str, field: &str) -> Result<String, CliError> {
    let secret = rpassword::prompt_password(prompt).map_err(prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: field.into(),
            reason: "cannot be empty".into(),
        });
    }
    Ok(secret)
}

/// Offer to store a secret in the system keyring or return it for plaintext config.
///
/// Returns `Some(secret)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_keyring_storage(
    secret: &str,
    profile_name: &str,
    kind: &str,
) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt(format!("Where to store the {kind}?"))
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        pamly_config::store_keyring_secret(profile_name, kind, secret)?;
        eprintln!("   ✓ {kind} stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(secret.to_owned()))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let shown = redacted(&cfg);
            let out = output::render_single(&global.output, &shown, format_config, |_| {
                config::config_path().display().to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Init => init(global),

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        ConfigCommand::SetPassword => store_secret(global, "password", "Password: "),

        ConfigCommand::SetToken => store_secret(global, "token", "User token: "),
    }
}

fn store_secret(global: &GlobalOpts, kind: &str, prompt: &str) -> Result<(), CliError> {
    let cfg = config::load_config()?;
    let profile_name = config::active_profile_name(global, &cfg);
    if !cfg.profiles.contains_key(&profile_name) {
        return Err(CliError::ProfileNotFound {
            available: config::available_profiles(&cfg),
            name: profile_name,
        });
    }
    let secret = prompt_secret(prompt, kind)?;
    pamly_config::store_keyring_secret(&profile_name, kind, &secret)?;
    eprintln!("✓ {kind} stored in system keyring for profile '{profile_name}'");
    Ok(())
}

/// Interactive wizard: create or replace one profile, keep the rest.
fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("pamly configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let mut cfg = config::load_config_or_default();

    // 1. Profile name
    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(config::active_profile_name(global, &cfg))
        .interact_text()
        .map_err(prompt_err)?;

    // 2. Appliance URL
    let appliance: String = Input::new()
        .with_prompt("Appliance URL")
        .interact_text()
        .map_err(prompt_err)?;
    if appliance.parse::<url::Url>().is_err() {
        return Err(CliError::Validation {
            field: "appliance".into(),
            reason: format!("invalid URL: {appliance}"),
        });
    }

    // 3. Auth
    let auth_choices = &["Username/Password", "Pre-issued user token"];
    let auth_selection = Select::new()
        .with_prompt("Authentication method")
        .items(auth_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let mut profile = Profile {
        appliance,
        provider: "local".into(),
        ..Profile::default()
    };

    if auth_selection == 0 {
        profile.provider = Input::new()
            .with_prompt("Identity provider login id")
            .default("local".into())
            .interact_text()
            .map_err(prompt_err)?;
        let username: String = Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(prompt_err)?;
        let password = prompt_secret("Password: ", "password")?;
        profile.username = Some(username);
        profile.password = prompt_keyring_storage(&password, &profile_name, "password")?;
    } else {
        let token = prompt_secret("User token: ", "token")?;
        pamly_config::store_keyring_secret(&profile_name, "token", &token)?;
        eprintln!("   ✓ token stored in system keyring");
    }

    cfg.profiles.insert(profile_name.clone(), profile);
    if cfg.default_profile.is_none() || cfg.profiles.len() == 1 {
        cfg.default_profile = Some(profile_name.clone());
    }
    config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", config_path.display());
    eprintln!("  Profile: {profile_name}");
    eprintln!("\n  Test it: pamly --profile {profile_name} cluster members");
    Ok(())
}
