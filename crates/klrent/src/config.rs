//! CLI configuration: a thin wrapper around `klrent_config`.
//!
//! Re-exports the shared types and adds resolution that respects the
//! `GlobalOpts` overrides (--api-url, --timeout, --insecure).

use std::time::Duration;

use klrent_core::{PortalConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use klrent_config::{
    Config, Profile, config_path, load_config_or_default, resolve_email, resolve_password,
    save_config, session_path, store_password,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| klrent_config::DEFAULT_PROFILE.into())
}

/// Build the `PortalConfig` for this invocation.
///
/// Without a matching profile the portal is reached at `--api-url` (or the
/// default URL) with default settings. Flag overrides win over the profile.
pub fn resolve_portal_config(global: &GlobalOpts, cfg: &Config) -> Result<PortalConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    if global.profile.is_some() && !cfg.profiles.contains_key(&profile_name) {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: cfg.profile_names(),
        });
    }

    let profile = cfg
        .profiles
        .get(&profile_name)
        .cloned()
        .unwrap_or_else(|| Profile::new(klrent_core::config::DEFAULT_API_URL));

    let mut portal =
        klrent_config::profile_to_portal_config(&profile, &profile_name, &cfg.defaults)?;

    if let Some(ref url_str) = global.api_url {
        portal.url = url_str.parse().map_err(|_| CliError::Validation {
            field: "api-url".into(),
            reason: format!("invalid URL: {url_str}"),
        })?;
    }
    if let Some(secs) = global.timeout {
        portal.timeout = Duration::from_secs(secs);
    }
    if global.insecure {
        portal.tls = TlsVerification::DangerAcceptInvalid;
    }
    Ok(portal)
}
