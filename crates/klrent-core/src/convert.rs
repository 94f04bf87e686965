// ── API-to-domain type conversions ──
//
// Bridges raw `klrent_api` response types into `klrent_core::model`
// domain types. Amounts arrive as decimal strings and dates as either
// `YYYY-MM-DD` or full ISO-8601 timestamps; both are parsed here so the
// pricing code only sees strong types.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;

use klrent_api::{
    AuthUser, ClienteResponse, Endereco, Locacao, Loja, Plano, ReservaResponse, Veiculo,
};

use crate::error::CoreError;
use crate::registration::PostalAddress;
use crate::model::{
    Cancellation, CustomerRecord, InsuranceTier, PromoPlan, Rental, Reservation,
    ReservationStatus, Store, UserProfile, VehicleOffer,
};

// ── Helpers ────────────────────────────────────────────────────────

fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, CoreError> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| CoreError::Internal(format!("invalid {field} {raw:?}: {e}")))
}

/// Blank strings count as absent.
fn parse_optional_decimal(field: &str, raw: Option<&str>) -> Result<Option<Decimal>, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_decimal(field, value).map(Some),
    }
}

/// Parse the date part of `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS...`.
pub(crate) fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, CoreError> {
    let day = raw.trim().get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| CoreError::Internal(format!("invalid {field} {raw:?}: {e}")))
}

fn parse_optional_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(field, value).map(Some),
    }
}

// ── Catalog ────────────────────────────────────────────────────────

impl TryFrom<Veiculo> for VehicleOffer {
    type Error = CoreError;

    fn try_from(v: Veiculo) -> Result<Self, Self::Error> {
        Ok(Self {
            base_daily_rate: parse_decimal("daily rate", &v.valor_locacao)?,
            listed_daily_rate: parse_optional_decimal("listed rate", v.valor_diaria.as_deref())?,
            basic_insurance_percent: parse_optional_decimal(
                "basic insurance",
                v.seguro_basico.as_deref(),
            )?,
            premium_insurance_percent: parse_optional_decimal(
                "premium insurance",
                v.seguro_plus.as_deref(),
            )?,
            state: v.estado.as_ref().and_then(|e| e.nome()).map(str::to_owned),
            id: v.id,
            name: v.nome,
            description: v.descricao,
            state_id: v.estado_id,
            image: v.imagem,
        })
    }
}

impl TryFrom<Plano> for PromoPlan {
    type Error = CoreError;

    fn try_from(p: Plano) -> Result<Self, Self::Error> {
        Ok(Self {
            target_price: parse_decimal("plan price", &p.valor_pretendido)?,
            id: p.id,
            title: p.titulo,
            minimum_stay_days: p.qtd_min_dias,
            note: p.observacao.filter(|n| !n.trim().is_empty()),
            group_id: p.grupo_id,
            state_id: p.estado_id,
        })
    }
}

impl From<Loja> for Store {
    fn from(l: Loja) -> Self {
        Self {
            id: l.id,
            name: l.nome,
            address: l.endereco,
            city: l.cidade,
            state: l.estado,
            phone: l.telefone,
        }
    }
}

// ── Customer area ──────────────────────────────────────────────────

impl From<AuthUser> for UserProfile {
    fn from(u: AuthUser) -> Self {
        Self {
            id: u.id,
            name: u.nome,
            email: u.email,
        }
    }
}

impl From<ClienteResponse> for CustomerRecord {
    fn from(c: ClienteResponse) -> Self {
        Self {
            id: c.id,
            name: c.nome_cli,
            document: c.cpf_cli,
            message: c.message,
        }
    }
}

impl From<Endereco> for PostalAddress {
    fn from(e: Endereco) -> Self {
        Self {
            street: e.logradouro,
            district: e.bairro,
            city: e.localidade,
            state: e.uf,
        }
    }
}

fn parse_status(raw: &str) -> Result<ReservationStatus, CoreError> {
    ReservationStatus::from_str(&raw.trim().to_lowercase())
        .map_err(|_| CoreError::Internal(format!("unknown reservation status {raw:?}")))
}

fn parse_tier(raw: &str) -> InsuranceTier {
    match raw.trim().to_lowercase().as_str() {
        "premium" | "plus" => InsuranceTier::Premium,
        _ => InsuranceTier::Basic,
    }
}

impl TryFrom<ReservaResponse> for Reservation {
    type Error = CoreError;

    fn try_from(r: ReservaResponse) -> Result<Self, Self::Error> {
        let insurance = parse_tier(r.seguro.as_deref().unwrap_or(&r.categoria));
        Ok(Self {
            pickup_date: parse_date("pickup date", &r.periodo.retirada.data)?,
            return_date: parse_date("return date", &r.periodo.devolucao.data)?,
            donated_amount: parse_optional_decimal("donated amount", r.valor_doado.as_deref())?,
            status: parse_status(&r.status)?,
            id: r.id,
            registered_at: r.data_registro,
            store_id: r.loja_retirada.id,
            store_name: r.loja_retirada.nome,
            store_city: r.loja_retirada.cidade,
            pickup_time: r.periodo.retirada.hora,
            return_time: r.periodo.devolucao.hora,
            group_id: r.grupo.id,
            group_name: r.grupo.nome,
            plan_id: (r.plano_id != 0).then_some(r.plano_id),
            insurance,
            days: r.qtd_dias,
            origin: r.origem,
            cancellation: r.cancelamento.map(|c| Cancellation {
                date: c.data,
                reason: c.motivo,
            }),
        })
    }
}

impl TryFrom<Locacao> for Rental {
    type Error = CoreError;

    fn try_from(l: Locacao) -> Result<Self, Self::Error> {
        Ok(Self {
            started: parse_date("rental date", &l.data_loc)?,
            expected_return: parse_optional_date("expected return", l.data_prev.as_deref())?,
            returned: parse_optional_date("return date", l.data_devolucao.as_deref())?,
            id: l.id_loc,
            customer_id: l.cliente_id,
            car_id: l.id_car,
            plate: l.placa_car,
            model: l.modelo_car,
            category: l.descricao_ctg,
            brand: l.nome_marca,
        })
    }
}

/// Convert a listing, skipping malformed records.
///
/// One bad record should not hide the rest of a catalog; each skip is
/// logged at warn.
pub(crate) fn convert_listing<W, D>(kind: &str, items: Vec<W>) -> Vec<D>
where
    D: TryFrom<W, Error = CoreError>,
{
    items
        .into_iter()
        .filter_map(|item| match D::try_from(item) {
            Ok(converted) => Some(converted),
            Err(e) => {
                warn!(kind, error = %e, "skipping malformed record");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use klrent_api::{GrupoResumo, LojaResumo, Momento, Periodo};
    use pretty_assertions::assert_eq;

    use super::*;

    fn veiculo() -> Veiculo {
        serde_json::from_value(serde_json::json!({
            "id": 4,
            "nome": "Grupo B",
            "valorLocacao": "150.50",
            "seguroBasico": "10",
            "seguroPlus": "",
            "estadoId": 13,
            "estado": "Amazonas"
        }))
        .unwrap()
    }

    #[test]
    fn listing_skips_malformed_records() {
        let mut broken = veiculo();
        broken.id = 5;
        broken.valor_locacao = String::new();

        let offers: Vec<VehicleOffer> = convert_listing("vehicle", vec![broken, veiculo()]);
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].id, 4);
    }

    #[test]
    fn vehicle_amounts_are_parsed() {
        let offer = VehicleOffer::try_from(veiculo()).unwrap();
        assert_eq!(offer.base_daily_rate, Decimal::from_str("150.50").unwrap());
        assert_eq!(offer.basic_insurance_percent, Some(Decimal::from(10)));
        assert_eq!(offer.premium_insurance_percent, None);
        assert_eq!(offer.state.as_deref(), Some("Amazonas"));
    }

    #[test]
    fn malformed_amount_is_an_internal_error() {
        let mut v = veiculo();
        v.valor_locacao = "abc".into();
        assert!(matches!(
            VehicleOffer::try_from(v),
            Err(CoreError::Internal(_))
        ));
    }

    #[test]
    fn dates_accept_timestamps() {
        assert_eq!(
            parse_date("d", "2026-10-20T03:00:00.000Z").unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()
        );
        assert!(parse_date("d", "20/10/2026").is_err());
    }

    #[test]
    fn reservation_maps_plan_and_status() {
        let wire = ReservaResponse {
            id: 31,
            data_registro: "2026-10-18".into(),
            loja_retirada: LojaResumo {
                id: 1,
                nome: "Centro".into(),
                cidade: Some("Manaus".into()),
                estado: None,
            },
            loja_devolucao: None,
            periodo: Periodo {
                retirada: Momento {
                    data: "2026-10-20".into(),
                    hora: Some("09:00".into()),
                },
                devolucao: Momento {
                    data: "2026-10-25".into(),
                    hora: Some("09:00".into()),
                },
            },
            grupo: GrupoResumo {
                id: 4,
                nome: "Grupo B".into(),
                imagem: None,
            },
            plano_id: 0,
            categoria: "premium".into(),
            valor_doado: None,
            seguro: None,
            qtd_dias: 5,
            origem: Some("site".into()),
            status: "Cancelada".into(),
            cancelamento: Some(klrent_api::Cancelamento {
                data: "2026-10-19".into(),
                motivo: "Viagem adiada".into(),
            }),
        };

        let reservation = Reservation::try_from(wire).unwrap();
        assert_eq!(reservation.plan_id, None);
        assert_eq!(reservation.insurance, InsuranceTier::Premium);
        assert_eq!(reservation.status, ReservationStatus::Cancelled);
        assert_eq!(reservation.cancellation.unwrap().reason, "Viagem adiada");
    }

    #[test]
    fn open_rental_has_no_return_date() {
        let wire: Locacao = serde_json::from_value(serde_json::json!({
            "id_loc": 77,
            "dataLoc": "2026-09-01",
            "dataPrev": "",
            "clienteId": 5,
            "id_car": 12,
            "placa_car": "ABC1D23",
            "modelo_car": "Onix"
        }))
        .unwrap();
        let rental = Rental::try_from(wire).unwrap();
        assert!(rental.is_active());
        assert_eq!(rental.expected_return, None);
    }
}
