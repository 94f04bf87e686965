//! Account sign-up and customer registration.

use std::io::IsTerminal;
use std::path::Path;

use dialoguer::{Confirm, Input};
use secrecy::{ExposeSecret, SecretString};

use klrent_core::format::{format_cep, format_cnpj, format_cpf, format_phone};
use klrent_core::{
    CustomerRecord, EmailEntry, PersonKind, PhoneEntry, Portal, PostalAddress, RegistrationForm,
};

use crate::cli::{GlobalOpts, RegisterArgs, RegisterCommand, RegistrationArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Prompts ─────────────────────────────────────────────────────────

fn ask(prompt: &str) -> Result<String, CliError> {
    Input::<String>::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(util::prompt_err)
}

fn ask_optional(prompt: &str) -> Result<Option<String>, CliError> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(util::prompt_err)?;
    Ok(Some(value).filter(|v| !v.trim().is_empty()))
}

/// Ask with a looked-up value offered as the default.
fn ask_prefilled(prompt: &str, found: &str) -> Result<String, CliError> {
    if found.trim().is_empty() {
        return ask(prompt);
    }
    Input::<String>::new()
        .with_prompt(prompt)
        .default(found.to_owned())
        .interact_text()
        .map_err(util::prompt_err)
}

fn ask_password() -> Result<(String, String), CliError> {
    let password = rpassword::prompt_password("Password: ").map_err(util::prompt_err)?;
    let confirmation = rpassword::prompt_password("Confirm password: ").map_err(util::prompt_err)?;
    Ok((password, confirmation))
}

fn ask_phones() -> Result<Vec<PhoneEntry>, CliError> {
    let mut phones = Vec::new();
    loop {
        let Some(number) = ask_optional("Phone with area code (blank to finish)")? else {
            break;
        };
        let digits = klrent_core::format::digits_only(&number);
        if digits.len() < 10 {
            eprintln!("  {} is not a phone number with area code", format_phone(&number));
            continue;
        }
        let (ddd, rest) = digits.split_at(2);
        phones.push(PhoneEntry {
            ddd: ddd.to_owned(),
            number: rest.to_owned(),
            contact_name: ask_optional("Contact name")?,
        });
    }
    Ok(phones)
}

fn ask_emails() -> Result<Vec<EmailEntry>, CliError> {
    let mut emails = Vec::new();
    while let Some(address) = ask_optional("E-mail (blank to finish)")? {
        emails.push(EmailEntry {
            address,
            description: ask_optional("Description")?,
        });
    }
    Ok(emails)
}

/// Address for a CEP. Lookup failures only cost the pre-fill.
async fn lookup_address(portal: &Portal, cep: &str) -> PostalAddress {
    match portal.lookup_address(cep).await {
        Ok(Some(address)) => address,
        Ok(None) => PostalAddress::default(),
        Err(e) => {
            tracing::warn!(error = %e, "CEP lookup failed");
            PostalAddress::default()
        }
    }
}

async fn prompt_form(portal: &Portal, kind: PersonKind) -> Result<RegistrationForm, CliError> {
    let (document_prompt, name_prompt) = match kind {
        PersonKind::Individual => ("CPF", "Full name"),
        PersonKind::Company => ("CNPJ", "Company name"),
    };

    let document = ask(document_prompt)?;
    let full_name = ask(name_prompt)?;
    let licence_number = ask("Driver's licence number")?;
    let licence_state = ask("Licence state (UF)")?;
    let licence_expiry = ask("Licence expiry (dd/mm/yyyy)")?;
    let cep = ask("CEP")?;
    let found = lookup_address(portal, &cep).await;
    let street = ask_prefilled("Street", &found.street)?;
    let number = ask("Number")?;
    let district = ask_prefilled("District", &found.district)?;
    let city = ask_prefilled("City", &found.city)?;
    let state = ask_prefilled("State (UF)", &found.state)?;
    let profession = match kind {
        PersonKind::Individual => ask_optional("Profession")?,
        PersonKind::Company => None,
    };
    let notes = ask_optional("Notes")?;
    let phones = ask_phones()?;
    let emails = ask_emails()?;
    let (password, password_confirmation) = ask_password()?;

    Ok(RegistrationForm {
        kind,
        document,
        full_name,
        licence_number,
        licence_state,
        licence_expiry,
        cep,
        street,
        number,
        district,
        city,
        state,
        profession,
        notes,
        phones,
        emails,
        password,
        password_confirmation,
        store_id: None,
    })
}

fn read_form(path: &Path, kind: PersonKind) -> Result<RegistrationForm, CliError> {
    let raw = std::fs::read_to_string(path)?;
    let mut form: RegistrationForm = serde_json::from_str(&raw)?;
    form.kind = kind;
    Ok(form)
}

fn summary(form: &RegistrationForm) -> String {
    let document = match form.kind {
        PersonKind::Individual => format_cpf(&form.document),
        PersonKind::Company => format_cnpj(&form.document),
    };
    format!(
        "{} {document}, {}, {} {} CEP {}",
        form.full_name.trim(),
        form.kind,
        form.street,
        form.number,
        format_cep(&form.cep),
    )
}

fn record_detail(c: &CustomerRecord) -> String {
    let mut lines = vec![
        format!("Customer: {}", c.id),
        format!("Name:     {}", c.name),
        format!("Document: {}", c.document),
    ];
    if let Some(ref message) = c.message {
        lines.push(message.clone());
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

async fn register_customer(
    portal: &Portal,
    args: RegistrationArgs,
    kind: PersonKind,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let form = match args.from_file {
        Some(ref path) => {
            let mut form = read_form(path, kind)?;
            let blanks = [&form.street, &form.district, &form.city, &form.state];
            if blanks.iter().any(|field| field.trim().is_empty()) {
                let found = lookup_address(portal, &form.cep).await;
                form.fill_blank_address(&found);
            }
            form
        }
        None if std::io::stdin().is_terminal() => prompt_form(portal, kind).await?,
        None => {
            return Err(CliError::validation(
                "from-file",
                "pass --from-file when not running interactively",
            ));
        }
    };

    // Surface form errors before asking anything else.
    form.validate()?;
    if !util::confirm(&format!("Register {}?", summary(&form)), global, "register")? {
        return Ok(());
    }

    let record = portal.register_customer(&form).await?;
    let out = output::render_single(&global.output, &record, record_detail, |c| c.id.to_string());
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle(
    portal: &Portal,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RegisterCommand::Account { name, email } => {
            if !std::io::stdin().is_terminal() {
                return Err(CliError::validation(
                    "password",
                    "account sign-up needs an interactive terminal for the password",
                ));
            }
            let (password, confirmation) = ask_password()?;
            if password != confirmation {
                return Err(CliError::validation("password", "passwords do not match"));
            }
            let password = SecretString::from(password);
            if password.expose_secret().is_empty() {
                return Err(CliError::validation("password", "password cannot be empty"));
            }

            let user = portal.register_account(&name, &email, &password).await?;
            util::note(global, &format!("Account created for {email}"));
            if let Some(user) = user {
                util::note(global, &format!("Logged in as {}", user.first_name()));
            }

            let register_now = Confirm::new()
                .with_prompt("Register your customer details now?")
                .default(false)
                .interact()
                .map_err(util::prompt_err)?;
            if register_now {
                let args = RegistrationArgs { from_file: None };
                return register_customer(portal, args, PersonKind::Individual, global).await;
            }
            Ok(())
        }
        RegisterCommand::Individual(args) => {
            register_customer(portal, args, PersonKind::Individual, global).await
        }
        RegisterCommand::Company(args) => {
            register_customer(portal, args, PersonKind::Company, global).await
        }
    }
}
