// ── Customer registration ──
//
// Individual (CPF) and company (CNPJ) sign-up forms. Masks are stripped
// and blank contact rows dropped before the payload is built; the backend
// receives digits only.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use klrent_api::{CadastrarClienteRequest, EmailNovo, TelefoneNovo};

use crate::error::CoreError;
use crate::format::{br_date_to_iso, digits_only};

const MIN_PASSWORD_LEN: usize = 6;
const DEFAULT_STORE_ID: u64 = 1;
const COUNTRY: &str = "Brasil";

/// Individual or company customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PersonKind {
    Individual,
    Company,
}

impl PersonKind {
    /// `tipo_pessoa_cli` code.
    pub fn code(self) -> u8 {
        match self {
            Self::Individual => 1,
            Self::Company => 2,
        }
    }

    fn document_name(self) -> &'static str {
        match self {
            Self::Individual => "CPF",
            Self::Company => "CNPJ",
        }
    }

    fn document_len(self) -> usize {
        match self {
            Self::Individual => 11,
            Self::Company => 14,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneEntry {
    /// Two-digit area code.
    pub ddd: String,
    pub number: String,
    #[serde(default)]
    pub contact_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailEntry {
    pub address: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A filled-in sign-up form, as typed (masks allowed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub kind: PersonKind,
    /// CPF for individuals, CNPJ for companies.
    pub document: String,
    pub full_name: String,
    pub licence_number: String,
    pub licence_state: String,
    /// `dd/mm/yyyy`
    pub licence_expiry: String,
    pub cep: String,
    pub street: String,
    pub number: String,
    pub district: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub profession: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub phones: Vec<PhoneEntry>,
    #[serde(default)]
    pub emails: Vec<EmailEntry>,
    pub password: String,
    pub password_confirmation: String,
    #[serde(default)]
    pub store_id: Option<u64>,
}

/// Address found for a CEP, used to pre-fill the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub street: String,
    pub district: String,
    pub city: String,
    pub state: String,
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

impl RegistrationForm {
    /// Check the form before submission. Errors name the offending field.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.password != self.password_confirmation {
            return Err(CoreError::validation("passwords do not match"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CoreError::validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.full_name.trim().is_empty() {
            return Err(CoreError::validation("name is required"));
        }

        let document = digits_only(&self.document);
        if document.len() != self.kind.document_len() {
            return Err(CoreError::validation(format!(
                "{} must have {} digits",
                self.kind.document_name(),
                self.kind.document_len()
            )));
        }
        if digits_only(&self.cep).len() != 8 {
            return Err(CoreError::validation("CEP must have 8 digits"));
        }

        let expiry = br_date_to_iso(self.licence_expiry.trim());
        if NaiveDate::parse_from_str(&expiry, "%Y-%m-%d").is_err() {
            return Err(CoreError::validation(
                "licence expiry must be a valid dd/mm/yyyy date",
            ));
        }
        Ok(())
    }

    /// Copy looked-up address parts into fields left blank.
    pub fn fill_blank_address(&mut self, address: &PostalAddress) {
        let pairs = [
            (&mut self.street, &address.street),
            (&mut self.district, &address.district),
            (&mut self.city, &address.city),
            (&mut self.state, &address.state),
        ];
        for (field, found) in pairs {
            if field.trim().is_empty() && !found.trim().is_empty() {
                field.clone_from(found);
            }
        }
    }

    /// Validate and build the `POST /clientes` payload.
    pub fn to_request(&self) -> Result<CadastrarClienteRequest, CoreError> {
        self.validate()?;

        let phones: Vec<TelefoneNovo> = self
            .phones
            .iter()
            .map(|p| (digits_only(&p.ddd), digits_only(&p.number), p))
            .filter(|(ddd, number, _)| !ddd.is_empty() && !number.is_empty())
            .map(|(ddd, number, p)| TelefoneNovo {
                ddd_fone: ddd,
                numero_fone: number,
                nome_fone: non_blank(p.contact_name.as_ref()),
            })
            .collect();

        let emails: Vec<EmailNovo> = self
            .emails
            .iter()
            .filter(|e| !e.address.trim().is_empty())
            .map(|e| EmailNovo {
                endereco_email: e.address.trim().to_owned(),
                descricao_email: non_blank(e.description.as_ref()),
            })
            .collect();

        let fone_cli = self
            .phones
            .first()
            .map(|p| format!("{}{}", digits_only(&p.ddd), digits_only(&p.number)))
            .unwrap_or_default();

        Ok(CadastrarClienteRequest {
            cep_cli: digits_only(&self.cep),
            cidade_cli: self.city.clone(),
            cpf_cli: digits_only(&self.document),
            senha_cli: self.password.clone(),
            endereco_rua_cli: self.street.clone(),
            identidade_cli: None,
            org_identidade_cli: None,
            nome_cli: self.full_name.trim().to_owned(),
            tipo_pessoa_cli: self.kind.code(),
            loja_id_cli: self.store_id.unwrap_or(DEFAULT_STORE_ID),
            bairro_cli: self.district.clone(),
            endereco_num_cli: self.number.clone(),
            endereco_trabalho_cli: None,
            endereco_uf_cli: self.state.clone(),
            fone_cli,
            hab_uf_cli: self.licence_state.clone(),
            hab_validade_cli: br_date_to_iso(self.licence_expiry.trim()),
            habilitacao_cli: self.licence_number.clone(),
            nascimento_cli: None,
            primeiro_nome: None,
            estadocivil_cli: None,
            sexo_cli: None,
            nome_mae_cli: None,
            obs_cli: non_blank(self.notes.as_ref()),
            pais_cli: Some(COUNTRY.to_owned()),
            profissao_cli: non_blank(self.profession.as_ref()),
            profissao2_cli: None,
            fones_novos: phones,
            emails_novos: emails,
        })
    }
}
