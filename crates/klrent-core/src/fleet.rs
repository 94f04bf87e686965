// ── Fleet browsing ──
//
// Client-side narrowing of an already-fetched catalog, the way the portal's
// fleet page filters without another round trip.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::VehicleOffer;

/// Catalog filter. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetFilter {
    pub state: Option<String>,
    pub group: Option<String>,
    pub min_daily: Option<Decimal>,
    pub max_daily: Option<Decimal>,
    /// Case-insensitive substring of the group name or state.
    pub search: Option<String>,
}

impl FleetFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Number of active criteria.
    pub fn active_count(&self) -> usize {
        [
            self.state.is_some(),
            self.group.is_some(),
            self.min_daily.is_some(),
            self.max_daily.is_some(),
            self.search.as_deref().is_some_and(|s| !s.is_empty()),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn matches(&self, offer: &VehicleOffer) -> bool {
        let state = offer.state.as_deref().unwrap_or_default();
        let rate = offer.catalog_rate();

        if self.state.as_deref().is_some_and(|s| !s.eq_ignore_ascii_case(state)) {
            return false;
        }
        if self.group.as_deref().is_some_and(|g| !g.eq_ignore_ascii_case(&offer.name)) {
            return false;
        }
        if self.min_daily.is_some_and(|min| rate < min) {
            return false;
        }
        if self.max_daily.is_some_and(|max| rate > max) {
            return false;
        }
        match self.search.as_deref().map(str::to_lowercase) {
            Some(needle) if !needle.is_empty() => {
                offer.name.to_lowercase().contains(&needle)
                    || state.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }

    /// The offers passing the filter, in catalog order.
    pub fn apply<'a>(&self, offers: &'a [VehicleOffer]) -> Vec<&'a VehicleOffer> {
        offers.iter().filter(|o| self.matches(o)).collect()
    }
}

/// Sorted distinct states, for menus.
pub fn states(offers: &[VehicleOffer]) -> Vec<String> {
    let mut states: Vec<String> = offers.iter().filter_map(|o| o.state.clone()).collect();
    states.sort();
    states.dedup();
    states
}

/// Sorted distinct group names, for menus.
pub fn groups(offers: &[VehicleOffer]) -> Vec<String> {
    let mut groups: Vec<String> = offers.iter().map(|o| o.name.clone()).collect();
    groups.sort();
    groups.dedup();
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(id: u64, name: &str, state: &str, rate: i64) -> VehicleOffer {
        VehicleOffer {
            id,
            name: name.into(),
            description: None,
            base_daily_rate: Decimal::from(rate),
            listed_daily_rate: None,
            basic_insurance_percent: None,
            premium_insurance_percent: None,
            state: Some(state.into()),
            state_id: 1,
            image: None,
        }
    }

    fn catalog() -> Vec<VehicleOffer> {
        vec![
            offer(1, "Grupo B", "Amazonas", 120),
            offer(2, "Grupo C", "Pará", 180),
            offer(3, "Grupo B", "Pará", 130),
        ]
    }

    #[test]
    fn empty_filter_matches_all() {
        let catalog = catalog();
        let filter = FleetFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&catalog).len(), 3);
    }

    #[test]
    fn filters_combine() {
        let catalog = catalog();
        let filter = FleetFilter {
            state: Some("pará".into()),
            max_daily: Some(Decimal::from(150)),
            ..FleetFilter::default()
        };
        let ids: Vec<u64> = filter.apply(&catalog).iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![3]);
        assert_eq!(filter.active_count(), 2);
    }

    #[test]
    fn search_looks_at_name_and_state() {
        let catalog = catalog();
        let filter = FleetFilter {
            search: Some("AMAZ".into()),
            ..FleetFilter::default()
        };
        assert_eq!(filter.apply(&catalog).len(), 1);
    }

    #[test]
    fn listed_rate_wins_for_price_filters() {
        let mut o = offer(9, "Grupo X", "Amazonas", 100);
        o.listed_daily_rate = Some(Decimal::from(300));
        let filter = FleetFilter {
            max_daily: Some(Decimal::from(200)),
            ..FleetFilter::default()
        };
        assert!(!filter.matches(&o));
    }

    #[test]
    fn menus_are_sorted_and_distinct() {
        let catalog = catalog();
        assert_eq!(states(&catalog), vec!["Amazonas", "Pará"]);
        assert_eq!(groups(&catalog), vec!["Grupo B", "Grupo C"]);
    }
}
