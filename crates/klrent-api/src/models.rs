// Wire types for the rental portal backend.
//
// Field names follow the backend exactly (a mix of camelCase and
// snake_case Portuguese identifiers). Decimal amounts are kept as the
// strings the backend sends; `klrent-core` parses them into domain types.

use serde::{Deserialize, Deserializer, Serialize};

// ── Envelope normalization ──────────────────────────────────────────

/// A list endpoint's response.
///
/// Depending on the endpoint (and the backend version) lists arrive either
/// as a bare JSON array or wrapped in an object under `veiculos`, `lojas`,
/// `data`, or `planos`. The variant is decided here, once, so callers only
/// ever see a `Vec<T>`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing<T> {
    Bare(Vec<T>),
    Wrapped(WrappedListing<T>),
}

#[derive(Debug, Deserialize)]
pub(crate) struct WrappedListing<T> {
    veiculos: Option<Vec<T>>,
    lojas: Option<Vec<T>>,
    data: Option<Vec<T>>,
    planos: Option<Vec<T>>,
}

impl<T> Listing<T> {
    /// Collapse either shape into the item list. A wrapper without any of
    /// the known keys yields an empty list.
    pub(crate) fn into_items(self) -> Vec<T> {
        match self {
            Self::Bare(items) => items,
            Self::Wrapped(w) => w
                .veiculos
                .or(w.lojas)
                .or(w.data)
                .or(w.planos)
                .unwrap_or_default(),
        }
    }
}

/// Accept a decimal amount sent either as a JSON string or a JSON number.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Amount::deserialize(deserializer)? {
        Amount::Text(s) => s,
        Amount::Number(n) => n.to_string(),
    })
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "string_or_number")] String);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|Wrapper(s)| s))
}

// ── Fleet ───────────────────────────────────────────────────────────

/// The state a vehicle group is offered in.
///
/// The listing endpoint sends a plain name; the detail endpoint may send an
/// object with `nome` and `sigla`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Estado {
    Nome(String),
    Detalhado {
        #[serde(default)]
        nome: Option<String>,
        #[serde(default)]
        sigla: Option<String>,
    },
}

impl Estado {
    /// The display name, falling back to the abbreviation.
    pub fn nome(&self) -> Option<&str> {
        match self {
            Self::Nome(nome) => Some(nome.as_str()),
            Self::Detalhado { nome, sigla } => nome.as_deref().or(sigla.as_deref()),
        }
    }
}

/// A rentable vehicle group offered in one state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Veiculo {
    pub id: u64,
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub valor_diaria: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub valor_locacao: String,
    pub estado_id: u64,
    #[serde(default)]
    pub estado: Option<Estado>,
    #[serde(default)]
    pub imagem: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub seguro_basico: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub seguro_plus: Option<String>,
}

/// Server-side fleet filters (`GET /frota?...`). Unset fields are omitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FrotaFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marca: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disponivel: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preco_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preco_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagina: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limite: Option<u32>,
}

// ── Stores ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loja {
    pub id: u64,
    pub nome: String,
    #[serde(default)]
    pub endereco: Option<String>,
    #[serde(default)]
    pub cidade: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
}

// ── Promotional plans ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plano {
    pub id: u64,
    pub titulo: String,
    pub qtd_min_dias: u32,
    #[serde(deserialize_with = "string_or_number")]
    pub valor_pretendido: String,
    #[serde(default)]
    pub observacao: Option<String>,
    pub grupo_id: u64,
    pub estado_id: u64,
    #[serde(default)]
    pub qtd_dias_locado: Option<u32>,
    #[serde(default)]
    pub qtd_dias_pagar: Option<u32>,
    #[serde(default)]
    pub tipo_plano: Option<String>,
    #[serde(default)]
    pub percentual: Option<f64>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub valor_diaria: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
}

// ── Authentication ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub nome: String,
    pub email: String,
    pub senha: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: u64,
    pub nome: String,
    pub email: String,
}

/// Response of `/auth/login`, `/auth/register`, and `/auth/me`.
///
/// The token arrives as `access_token` or `token` depending on the route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<AuthUser>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AuthResponse {
    /// The issued token, whichever field carried it.
    pub fn issued_token(&self) -> Option<&str> {
        self.access_token
            .as_deref()
            .or(self.token.as_deref())
            .filter(|t| !t.is_empty())
    }
}

// ── Customers ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelefoneNovo {
    pub ddd_fone: String,
    pub numero_fone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome_fone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailNovo {
    pub endereco_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao_email: Option<String>,
}

/// `POST /clientes` payload. `tipo_pessoa_cli` is 1 for individuals and
/// 2 for companies; companies carry the CNPJ in `cpf_cli`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CadastrarClienteRequest {
    pub cep_cli: String,
    pub cidade_cli: String,
    pub cpf_cli: String,
    pub senha_cli: String,
    pub endereco_rua_cli: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identidade_cli: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_identidade_cli: Option<String>,
    pub nome_cli: String,
    pub tipo_pessoa_cli: u8,
    pub loja_id_cli: u64,
    pub bairro_cli: String,
    pub endereco_num_cli: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endereco_trabalho_cli: Option<String>,
    pub endereco_uf_cli: String,
    pub fone_cli: String,
    pub hab_uf_cli: String,
    pub hab_validade_cli: String,
    pub habilitacao_cli: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nascimento_cli: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primeiro_nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estadocivil_cli: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sexo_cli: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome_mae_cli: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obs_cli: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pais_cli: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profissao_cli: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profissao2_cli: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub fones_novos: Vec<TelefoneNovo>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub emails_novos: Vec<EmailNovo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClienteResponse {
    pub id: u64,
    pub nome_cli: String,
    pub cpf_cli: String,
    #[serde(default)]
    pub message: Option<String>,
}

// ── Reservations ────────────────────────────────────────────────────

/// `POST /reserva` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriarReservaRequest {
    pub id_loja: u64,
    /// Return store; always `null` (same-store return).
    pub loja_dev: Option<u64>,
    /// `YYYY-MM-DD`
    pub data_retirada: String,
    /// `HH:MM`
    pub hora_retirada: String,
    pub data_devolucao: String,
    pub hora_devolucao: String,
    pub grupo_escolhido: u64,
    /// Plan id, or 0 for conventional rentals.
    pub plano_escolhido: u64,
    /// `basico` or `premium`.
    pub categoria: String,
    pub vlr_doado: Option<String>,
    pub seguro_escolhido: String,
    pub qtd_dias: u32,
    pub origem_agen: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LojaResumo {
    pub id: u64,
    pub nome: String,
    #[serde(default)]
    pub cidade: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Momento {
    pub data: String,
    #[serde(default)]
    pub hora: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Periodo {
    pub retirada: Momento,
    pub devolucao: Momento,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrupoResumo {
    pub id: u64,
    pub nome: String,
    #[serde(default)]
    pub imagem: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cancelamento {
    pub data: String,
    pub motivo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservaResponse {
    pub id: u64,
    pub data_registro: String,
    pub loja_retirada: LojaResumo,
    #[serde(default)]
    pub loja_devolucao: Option<u64>,
    pub periodo: Periodo,
    pub grupo: GrupoResumo,
    #[serde(default)]
    pub plano_id: u64,
    pub categoria: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub valor_doado: Option<String>,
    #[serde(default)]
    pub seguro: Option<String>,
    pub qtd_dias: u32,
    #[serde(default)]
    pub origem: Option<String>,
    /// `pendente`, `confirmada`, `cancelada`, or `concluida`.
    pub status: String,
    #[serde(default)]
    pub cancelamento: Option<Cancelamento>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelarReservaRequest {
    pub motivo: String,
}

// ── Rentals ─────────────────────────────────────────────────────────

/// A past or ongoing rental (`GET /locacao`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Locacao {
    pub id_loc: u64,
    #[serde(rename = "dataLoc")]
    pub data_loc: String,
    #[serde(rename = "dataPrev", default)]
    pub data_prev: Option<String>,
    #[serde(rename = "dataDevolucao", default)]
    pub data_devolucao: Option<String>,
    #[serde(rename = "clienteId")]
    pub cliente_id: u64,
    pub id_car: u64,
    pub placa_car: String,
    pub modelo_car: String,
    #[serde(default)]
    pub descricao_ctg: Option<String>,
    #[serde(default)]
    pub nome_marca: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn listing_accepts_bare_arrays() {
        let listing: Listing<Loja> =
            serde_json::from_value(json!([{ "id": 1, "nome": "Centro" }])).unwrap();
        assert_eq!(listing.into_items().len(), 1);
    }

    #[test]
    fn listing_accepts_each_wrapper_key() {
        for key in ["veiculos", "lojas", "data", "planos"] {
            let listing: Listing<Loja> =
                serde_json::from_value(json!({ key: [{ "id": 2, "nome": "Aeroporto" }] })).unwrap();
            let items = listing.into_items();
            assert_eq!(items.len(), 1, "wrapper key {key}");
            assert_eq!(items[0].nome, "Aeroporto");
        }
    }

    #[test]
    fn listing_with_unknown_wrapper_is_empty() {
        let listing: Listing<Loja> = serde_json::from_value(json!({ "total": 0 })).unwrap();
        assert!(listing.into_items().is_empty());
    }

    #[test]
    fn veiculo_accepts_numeric_amounts_and_estado_object() {
        let veiculo: Veiculo = serde_json::from_value(json!({
            "id": 3,
            "nome": "Grupo B",
            "valorLocacao": 150.5,
            "estadoId": 13,
            "estado": { "nome": "Amazonas", "sigla": "AM" },
            "seguroBasico": "10"
        }))
        .unwrap();
        assert_eq!(veiculo.valor_locacao, "150.5");
        assert_eq!(veiculo.seguro_basico.as_deref(), Some("10"));
        assert_eq!(veiculo.seguro_plus, None);
        assert_eq!(veiculo.estado.unwrap().nome(), Some("Amazonas"));
    }

    #[test]
    fn auth_response_reads_either_token_field() {
        let a: AuthResponse = serde_json::from_value(json!({ "access_token": "a1" })).unwrap();
        let b: AuthResponse = serde_json::from_value(json!({ "token": "b2" })).unwrap();
        let c: AuthResponse = serde_json::from_value(json!({ "token": "" })).unwrap();
        assert_eq!(a.issued_token(), Some("a1"));
        assert_eq!(b.issued_token(), Some("b2"));
        assert_eq!(c.issued_token(), None);
    }

    #[test]
    fn reservation_request_keeps_null_fields() {
        let req = CriarReservaRequest {
            id_loja: 1,
            loja_dev: None,
            data_retirada: "2026-10-20".into(),
            hora_retirada: "09:00".into(),
            data_devolucao: "2026-10-23".into(),
            hora_devolucao: "09:00".into(),
            grupo_escolhido: 4,
            plano_escolhido: 0,
            categoria: "basico".into(),
            vlr_doado: None,
            seguro_escolhido: "basico".into(),
            qtd_dias: 3,
            origem_agen: "site".into(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert!(value["loja_dev"].is_null());
        assert!(value["vlr_doado"].is_null());
        assert_eq!(value["qtd_dias"], 3);
    }
}
