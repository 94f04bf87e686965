// ── Reservation draft ──
//
// The inputs of a reservation before it is submitted: store, mode, plan,
// insurance, dates, and times. Every setter applies the date-range policy
// and re-derives the return date the way the reservation page does, so the
// draft is always in a state that can be quoted.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use tracing::debug;

use klrent_api::CriarReservaRequest;

use crate::error::CoreError;
use crate::model::{InsuranceTier, PromoPlan, RentalMode, Store, VehicleOffer};
use crate::pricing::{
    DateRange, DateRejection, Quote, compute_quote, initialize_default_range,
    reconcile_return_date, validate_pickup_change,
};

/// Default pickup and return time.
pub const DEFAULT_TIME: &str = "09:00";

/// Origin tag sent with reservations made outside the counter.
pub const DEFAULT_ORIGIN: &str = "site";

#[derive(Debug, Clone, Serialize)]
pub struct ReservationDraft {
    offer: VehicleOffer,
    plans: Vec<PromoPlan>,
    stores: Vec<Store>,
    store_id: Option<u64>,
    mode: RentalMode,
    plan_id: Option<u64>,
    insurance: InsuranceTier,
    pickup: NaiveDate,
    #[serde(rename = "return")]
    ret: NaiveDate,
    pickup_time: NaiveTime,
    return_time: NaiveTime,
}

fn default_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Parse `HH:MM`.
pub fn parse_time(raw: &str) -> Result<NaiveTime, CoreError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| CoreError::validation(format!("{raw:?} is not a valid HH:MM time")))
}

impl ReservationDraft {
    /// Start a draft for `offer` as of `today`.
    ///
    /// The first store and the first plan are preselected; dates take the
    /// default range.
    pub fn new(
        offer: VehicleOffer,
        plans: Vec<PromoPlan>,
        stores: Vec<Store>,
        today: NaiveDate,
    ) -> Self {
        let (pickup, ret) = initialize_default_range(today);
        Self {
            store_id: stores.first().map(|s| s.id),
            plan_id: plans.first().map(|p| p.id),
            offer,
            plans,
            stores,
            mode: RentalMode::Conventional,
            insurance: InsuranceTier::Basic,
            pickup,
            ret,
            pickup_time: default_time(),
            return_time: default_time(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn offer(&self) -> &VehicleOffer {
        &self.offer
    }

    pub fn plans(&self) -> &[PromoPlan] {
        &self.plans
    }

    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    pub fn store(&self) -> Option<&Store> {
        let id = self.store_id?;
        self.stores.iter().find(|s| s.id == id)
    }

    pub fn mode(&self) -> RentalMode {
        self.mode
    }

    /// The selected plan, whatever the mode.
    pub fn selected_plan(&self) -> Option<&PromoPlan> {
        let id = self.plan_id?;
        self.plans.iter().find(|p| p.id == id)
    }

    /// The plan that applies to pricing: only in promotional mode.
    pub fn active_plan(&self) -> Option<&PromoPlan> {
        match self.mode {
            RentalMode::Promotional => self.selected_plan(),
            RentalMode::Conventional => None,
        }
    }

    pub fn insurance(&self) -> InsuranceTier {
        self.insurance
    }

    pub fn pickup(&self) -> NaiveDate {
        self.pickup
    }

    pub fn return_date(&self) -> NaiveDate {
        self.ret
    }

    /// Whether promotional mode can be offered for this vehicle.
    pub fn promotional_available(&self) -> bool {
        !self.plans.is_empty()
    }

    // ── Mutations ────────────────────────────────────────────────────

    fn rederive_return(&mut self) {
        let plan = self.selected_plan().cloned();
        self.ret = reconcile_return_date(Some(self.ret), self.pickup, self.mode, plan.as_ref());
    }

    pub fn select_store(&mut self, store_id: u64) -> Result<(), CoreError> {
        if !self.stores.iter().any(|s| s.id == store_id) {
            return Err(CoreError::validation(format!(
                "store {store_id} does not serve this vehicle's state"
            )));
        }
        self.store_id = Some(store_id);
        Ok(())
    }

    /// Change the pickup date. Sundays are refused and leave the draft as is.
    pub fn set_pickup(&mut self, date: NaiveDate) -> Result<(), DateRejection> {
        validate_pickup_change(date)?;
        debug!(%date, "pickup date changed");
        self.pickup = date;
        self.rederive_return();
        Ok(())
    }

    /// Change the return date. Sundays, the pickup date itself, and dates
    /// before pickup are refused.
    pub fn set_return(&mut self, date: NaiveDate) -> Result<(), DateRejection> {
        let range = DateRange::new(self.pickup, date)?;
        debug!(%date, "return date changed");
        self.ret = range.return_date();
        Ok(())
    }

    pub fn set_mode(&mut self, mode: RentalMode) -> Result<(), CoreError> {
        if mode == RentalMode::Promotional && !self.promotional_available() {
            return Err(CoreError::validation(
                "no promotional plans are available for this vehicle",
            ));
        }
        self.mode = mode;
        self.rederive_return();
        Ok(())
    }

    pub fn select_plan(&mut self, plan_id: u64) -> Result<(), CoreError> {
        if !self.plans.iter().any(|p| p.id == plan_id) {
            return Err(CoreError::validation(format!(
                "plan {plan_id} is not offered for this vehicle"
            )));
        }
        self.plan_id = Some(plan_id);
        self.rederive_return();
        Ok(())
    }

    /// Change coverage. Dates are left untouched.
    pub fn set_insurance(&mut self, tier: InsuranceTier) {
        self.insurance = tier;
    }

    pub fn set_times(&mut self, pickup: NaiveTime, ret: NaiveTime) {
        self.pickup_time = pickup;
        self.return_time = ret;
    }

    // ── Output ───────────────────────────────────────────────────────

    pub fn quote(&self) -> Quote {
        compute_quote(
            Some(&self.offer),
            self.mode,
            self.active_plan(),
            self.insurance,
            Some(self.pickup),
            Some(self.ret),
        )
    }

    /// Build the `POST /reserva` payload.
    ///
    /// Refused when no store is selected, when promotional mode has no
    /// plan, or when the quote is zero.
    pub fn to_request(&self, origin: &str) -> Result<CriarReservaRequest, CoreError> {
        let store = self
            .store()
            .ok_or_else(|| CoreError::incomplete("select a pickup store"))?;
        let plan = self.active_plan();
        if self.mode == RentalMode::Promotional && plan.is_none() {
            return Err(CoreError::incomplete("promotional rentals need a plan"));
        }
        let quote = self.quote();
        if quote.is_zero() {
            return Err(CoreError::incomplete("the quote for this selection is zero"));
        }

        let tier = self.insurance.wire_name().to_owned();
        Ok(CriarReservaRequest {
            id_loja: store.id,
            loja_dev: None,
            data_retirada: self.pickup.format("%Y-%m-%d").to_string(),
            hora_retirada: self.pickup_time.format("%H:%M").to_string(),
            data_devolucao: self.ret.format("%Y-%m-%d").to_string(),
            hora_devolucao: self.return_time.format("%H:%M").to_string(),
            grupo_escolhido: self.offer.id,
            plano_escolhido: plan.map_or(0, |p| p.id),
            categoria: tier.clone(),
            vlr_doado: None,
            seguro_escolhido: tier,
            qtd_dias: quote.billable_days,
            origem_agen: origin.to_owned(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn offer() -> VehicleOffer {
        VehicleOffer {
            id: 4,
            name: "Grupo B".into(),
            description: None,
            base_daily_rate: Decimal::from(100),
            listed_daily_rate: None,
            basic_insurance_percent: Some(Decimal::from(10)),
            premium_insurance_percent: Some(Decimal::from(25)),
            state: Some("Amazonas".into()),
            state_id: 13,
            image: None,
        }
    }

    fn plan(id: u64, min_days: u32, target: i64) -> PromoPlan {
        PromoPlan {
            id,
            title: format!("Plano {id}"),
            minimum_stay_days: min_days,
            target_price: Decimal::from(target),
            note: None,
            group_id: 4,
            state_id: 13,
        }
    }

    fn store(id: u64) -> Store {
        Store {
            id,
            name: format!("Loja {id}"),
            address: None,
            city: Some("Manaus".into()),
            state: Some("AM".into()),
            phone: None,
        }
    }

    // Friday 2026-10-16: default pickup Saturday 17, return Monday 19.
    fn draft() -> ReservationDraft {
        ReservationDraft::new(
            offer(),
            vec![plan(9, 5, 1000), plan(10, 7, 2400)],
            vec![store(1), store(2)],
            date(10, 16),
        )
    }

    #[test]
    fn new_draft_preselects_first_store_and_plan() {
        let d = draft();
        assert_eq!(d.store().unwrap().id, 1);
        assert_eq!(d.selected_plan().unwrap().id, 9);
        assert_eq!(d.mode(), RentalMode::Conventional);
        assert_eq!(d.pickup(), date(10, 17));
        assert_eq!(d.return_date(), date(10, 19));
    }

    #[test]
    fn sunday_return_after_saturday_pickup_is_rejected_and_kept() {
        let mut d = draft();
        let before = d.return_date();
        assert_eq!(d.set_return(date(10, 18)), Err(DateRejection::SundayNotAllowed));
        assert_eq!(d.return_date(), before);
    }

    #[test]
    fn return_must_fall_after_pickup() {
        let mut d = draft();
        d.set_pickup(date(10, 21)).unwrap();
        let before = d.return_date();
        assert_eq!(d.set_return(date(10, 21)), Err(DateRejection::EqualsPickup));
        assert_eq!(d.set_return(date(10, 20)), Err(DateRejection::ReturnBeforePickup));
        assert_eq!(d.return_date(), before);
    }

    #[test]
    fn manual_return_survives_insurance_change() {
        let mut d = draft();
        d.set_pickup(date(10, 19)).unwrap();
        d.set_return(date(10, 29)).unwrap();
        d.set_insurance(InsuranceTier::Premium);
        assert_eq!(d.return_date(), date(10, 29));
    }

    #[test]
    fn promotional_mode_derives_minimum_stay() {
        let mut d = draft();
        d.set_pickup(date(10, 19)).unwrap();
        d.set_mode(RentalMode::Promotional).unwrap();
        assert_eq!(d.return_date(), date(10, 24));

        d.select_plan(10).unwrap();
        assert_eq!(d.return_date(), date(10, 26));
        assert_eq!(d.quote().display_total(), Decimal::from(2400));
    }

    #[test]
    fn promotional_mode_needs_plans() {
        let mut d = ReservationDraft::new(offer(), Vec::new(), vec![store(1)], date(10, 16));
        assert!(d.set_mode(RentalMode::Promotional).is_err());
        assert_eq!(d.mode(), RentalMode::Conventional);
    }

    #[test]
    fn request_carries_quote_days_and_tier() {
        let mut d = draft();
        d.set_pickup(date(10, 19)).unwrap();
        d.set_return(date(10, 22)).unwrap();
        d.set_insurance(InsuranceTier::Premium);
        d.select_store(2).unwrap();

        let req = d.to_request(DEFAULT_ORIGIN).unwrap();
        assert_eq!(
            req,
            CriarReservaRequest {
                id_loja: 2,
                loja_dev: None,
                data_retirada: "2026-10-19".into(),
                hora_retirada: DEFAULT_TIME.into(),
                data_devolucao: "2026-10-22".into(),
                hora_devolucao: DEFAULT_TIME.into(),
                grupo_escolhido: 4,
                plano_escolhido: 0,
                categoria: "premium".into(),
                vlr_doado: None,
                seguro_escolhido: "premium".into(),
                qtd_dias: 3,
                origem_agen: "site".into(),
            }
        );
    }

    #[test]
    fn request_includes_plan_in_promotional_mode() {
        let mut d = draft();
        d.set_mode(RentalMode::Promotional).unwrap();
        let req = d.to_request(DEFAULT_ORIGIN).unwrap();
        assert_eq!(req.plano_escolhido, 9);
        assert_eq!(req.categoria, "basico");
    }

    #[test]
    fn request_without_store_is_refused() {
        let d = ReservationDraft::new(offer(), Vec::new(), Vec::new(), date(10, 16));
        assert!(matches!(
            d.to_request(DEFAULT_ORIGIN),
            Err(CoreError::IncompleteQuote { .. })
        ));
    }

    #[test]
    fn zero_quote_is_refused() {
        let mut free = offer();
        free.base_daily_rate = Decimal::ZERO;
        let d = ReservationDraft::new(free, Vec::new(), vec![store(1)], date(10, 16));
        assert!(matches!(
            d.to_request(DEFAULT_ORIGIN),
            Err(CoreError::IncompleteQuote { .. })
        ));
    }

    #[test]
    fn times_parse_as_hh_mm() {
        assert_eq!(parse_time("14:30").unwrap(), NaiveTime::from_hms_opt(14, 30, 0).unwrap());
        assert!(parse_time("25:00").is_err());
    }
}
