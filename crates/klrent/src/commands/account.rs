//! Login, logout, whoami, and password reset.

use std::io::IsTerminal;

use secrecy::SecretString;

use klrent_core::{Portal, UserProfile};

use crate::cli::{ForgotPasswordArgs, GlobalOpts, LoginArgs};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util;

fn user_detail(u: &UserProfile) -> String {
    format!("ID:     {}\nName:   {}\nE-mail: {}", u.id, u.name, u.email)
}

fn print_user(user: &UserProfile, global: &GlobalOpts) {
    let out = output::render_single(&global.output, user, user_detail, |u| u.email.clone());
    output::print_output(&out, global.quiet);
}

/// E-mail from the flag, then the profile chain, then a prompt.
fn login_email(args: LoginArgs, profile: &Profile, profile_name: &str) -> Result<String, CliError> {
    if let Some(email) = args.email {
        return Ok(email);
    }
    match config::resolve_email(profile, profile_name) {
        Ok(email) => Ok(email),
        Err(_) if std::io::stdin().is_terminal() => dialoguer::Input::<String>::new()
            .with_prompt("E-mail")
            .interact_text()
            .map_err(util::prompt_err),
        Err(e) => Err(e.into()),
    }
}

/// Password from the credential chain, then a prompt.
fn login_password(profile: &Profile, profile_name: &str) -> Result<SecretString, CliError> {
    match config::resolve_password(profile, profile_name) {
        Ok(password) => Ok(password),
        Err(_) if std::io::stdin().is_terminal() => rpassword::prompt_password("Password: ")
            .map(SecretString::from)
            .map_err(util::prompt_err),
        Err(e) => Err(e.into()),
    }
}

pub async fn login(
    portal: &Portal,
    args: LoginArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let profile_name = config::active_profile_name(global, cfg);
    let profile = cfg.profiles.get(&profile_name).cloned().unwrap_or_default();

    let email = login_email(args, &profile, &profile_name)?;
    let password = login_password(&profile, &profile_name)?;

    let spinner = util::spinner("Logging in...", global);
    let user = portal.login(&email, &password).await;
    spinner.finish_and_clear();

    match user? {
        Some(user) => {
            util::note(global, &format!("Welcome, {}!", user.first_name()));
            print_user(&user, global);
        }
        None => util::note(global, &format!("Logged in as {email}")),
    }
    Ok(())
}

pub async fn logout(portal: &Portal, global: &GlobalOpts) -> Result<(), CliError> {
    if !portal.is_logged_in() {
        util::note(global, "Not logged in");
        return Ok(());
    }
    portal.logout().await?;
    util::note(global, "Logged out");
    Ok(())
}

pub async fn whoami(portal: &Portal, global: &GlobalOpts) -> Result<(), CliError> {
    let user = portal.current_user().await?;
    print_user(&user, global);
    Ok(())
}

pub async fn forgot_password(
    portal: &Portal,
    args: &ForgotPasswordArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if args.email.trim().is_empty() {
        return Err(CliError::validation("email", "an e-mail address is required"));
    }
    let message = portal.forgot_password(&args.email).await?;
    util::note(
        global,
        message
            .as_deref()
            .unwrap_or("If the address is registered, a reset link is on its way"),
    );
    Ok(())
}
