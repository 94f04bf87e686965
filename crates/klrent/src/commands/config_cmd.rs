//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Input, Select};
use secrecy::{ExposeSecret, SecretString};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

const REDACTED: &str = "********";

fn show_detail(cfg: &Config) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Config file:     {}", config::config_path().display());
    let _ = writeln!(
        out,
        "Default profile: {}",
        cfg.default_profile.as_deref().unwrap_or("-")
    );
    let _ = writeln!(
        out,
        "Defaults:        output={} color={} timeout={}s",
        cfg.defaults.output, cfg.defaults.color, cfg.defaults.timeout
    );
    for (name, p) in &cfg.profiles {
        let _ = writeln!(out, "\n[{name}]");
        let _ = writeln!(out, "  api_url      = {}", p.api_url);
        let fields = [
            ("email", p.email.clone()),
            ("password", p.password.clone()),
            ("password_env", p.password_env.clone()),
            ("ca_cert", p.ca_cert.as_ref().map(|c| c.display().to_string())),
            ("insecure", p.insecure.map(|b| b.to_string())),
            ("timeout", p.timeout.map(|t| t.to_string())),
            ("origin", p.origin.clone()),
            ("cep_url", p.cep_url.clone()),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                let _ = writeln!(out, "  {key:<12} = {value}");
            }
        }
    }
    out.trim_end().to_owned()
}

fn parse_bool(field: &str, value: &str) -> Result<bool, CliError> {
    value
        .parse()
        .map_err(|_| CliError::validation(field, "must be 'true' or 'false'"))
}

fn apply_setting(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "api_url" | "api-url" => {
            url::Url::parse(&value)
                .map_err(|_| CliError::validation("api_url", format!("invalid URL: {value}")))?;
            profile.api_url = value;
        }
        "email" => profile.email = Some(value),
        "password_env" | "password-env" => profile.password_env = Some(value),
        "insecure" => profile.insecure = Some(parse_bool("insecure", &value)?),
        "timeout" => {
            profile.timeout = Some(value.parse().map_err(|_| {
                CliError::validation("timeout", "must be a whole number of seconds")
            })?);
        }
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "origin" => profile.origin = Some(value),
        "cep_url" | "cep-url" => {
            url::Url::parse(&value)
                .map_err(|_| CliError::validation("cep_url", format!("invalid URL: {value}")))?;
            profile.cep_url = Some(value);
        }
        _ => {
            return Err(CliError::validation(
                "key",
                format!(
                    "unknown key '{key}'. Valid keys: api_url, email, password_env, \
                     timeout, insecure, ca_cert, origin, cep_url"
                ),
            ));
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("KL Rent a Car CLI configuration");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default(klrent_config::DEFAULT_PROFILE.into())
                .interact_text()
                .map_err(prompt_err)?;

            let api_url: String = Input::new()
                .with_prompt("Portal API URL")
                .default(klrent_core::config::DEFAULT_API_URL.into())
                .interact_text()
                .map_err(prompt_err)?;
            url::Url::parse(&api_url)
                .map_err(|_| CliError::validation("api_url", format!("invalid URL: {api_url}")))?;

            let email: String = Input::new()
                .with_prompt("Login e-mail")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let store_choices = &[
                "Store password in system keyring (recommended)",
                "Save to config file (plaintext)",
                "Ask at login",
            ];
            let store_selection = Select::new()
                .with_prompt("Where to keep the password?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let mut password = None;
            if store_selection < 2 {
                let pass = SecretString::from(
                    rpassword::prompt_password("Password: ").map_err(prompt_err)?,
                );
                if pass.expose_secret().is_empty() {
                    return Err(CliError::validation("password", "password cannot be empty"));
                }
                if store_selection == 0 {
                    config::store_password(&profile_name, &pass)?;
                    eprintln!("   Password stored in system keyring");
                } else {
                    password = Some(pass.expose_secret().to_owned());
                }
            }

            let profile = Profile {
                email: Some(email).filter(|e| !e.trim().is_empty()),
                password,
                ..Profile::new(api_url)
            };

            // Keep other profiles from an existing file.
            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            let path = config::save_config(&cfg)?;
            eprintln!("\nConfiguration written to {}", path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Next: klrent login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let mut cfg = config::load_config_or_default();
            for profile in cfg.profiles.values_mut() {
                if profile.password.is_some() {
                    profile.password = Some(REDACTED.into());
                }
            }
            let out = output::render_single(&global.output, &cfg, show_detail, |c| {
                c.profiles.keys().cloned().collect::<Vec<_>>().join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg
                .profiles
                .entry(profile_name.clone())
                .or_insert_with(|| Profile::new(klrent_core::config::DEFAULT_API_URL));

            apply_setting(profile, &key, value)?;
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Set {key} on profile '{profile_name}'");
            }
            Ok(())
        }

        // ── Set password in keyring ─────────────────────────────────
        ConfigCommand::SetPassword => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let pass = SecretString::from(
                rpassword::prompt_password(format!("Password for '{profile_name}': "))
                    .map_err(prompt_err)?,
            );
            if pass.expose_secret().is_empty() {
                return Err(CliError::validation("password", "password cannot be empty"));
            }
            config::store_password(&profile_name, &pass)?;
            if !global.quiet {
                eprintln!("Password for '{profile_name}' stored in system keyring");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_known_keys() {
        let mut p = Profile::new("http://localhost:3000");
        apply_setting(&mut p, "timeout", "45".into()).unwrap();
        apply_setting(&mut p, "insecure", "true".into()).unwrap();
        apply_setting(&mut p, "api-url", "https://api.example.com".into()).unwrap();
        apply_setting(&mut p, "origin", "cli".into()).unwrap();
        apply_setting(&mut p, "cep-url", "http://127.0.0.1:9000".into()).unwrap();
        assert_eq!(p.timeout, Some(45));
        assert_eq!(p.insecure, Some(true));
        assert_eq!(p.api_url, "https://api.example.com");
        assert_eq!(p.origin.as_deref(), Some("cli"));
        assert_eq!(p.cep_url.as_deref(), Some("http://127.0.0.1:9000"));
    }

    #[test]
    fn set_rejects_bad_values() {
        let mut p = Profile::default();
        assert!(apply_setting(&mut p, "timeout", "soon".into()).is_err());
        assert!(apply_setting(&mut p, "insecure", "maybe".into()).is_err());
        assert!(apply_setting(&mut p, "api_url", "not a url".into()).is_err());
        assert!(apply_setting(&mut p, "colour", "red".into()).is_err());
    }

    #[test]
    fn show_lists_profiles() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "work".into(),
            Profile {
                email: Some("ana@example.com".into()),
                ..Profile::new("http://localhost:3000")
            },
        );
        let text = show_detail(&cfg);
        assert!(text.contains("[work]"));
        assert!(text.contains("ana@example.com"));
        assert!(!text.contains("password "));
    }
}
