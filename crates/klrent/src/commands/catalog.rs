//! Fleet, plan, and store command handlers.

use tabled::Tabled;

use klrent_core::fleet;
use klrent_core::{
    FleetFilter, FrotaFilters, OfferDetails, OfferRef, Portal, PromoPlan, Store, VehicleOffer,
};

use crate::cli::{FleetArgs, FleetCommand, FleetListArgs, GlobalOpts, OfferArg, StoresArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct OfferRow {
    #[tabled(rename = "Link")]
    link: String,
    #[tabled(rename = "Group")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Daily")]
    daily: String,
    #[tabled(rename = "Basic %")]
    basic: String,
    #[tabled(rename = "Premium %")]
    premium: String,
}

impl From<&VehicleOffer> for OfferRow {
    fn from(o: &VehicleOffer) -> Self {
        Self {
            link: link(o),
            name: o.name.clone(),
            state: o.state.clone().unwrap_or_default(),
            daily: output::money(o.catalog_rate()),
            basic: o
                .basic_insurance_percent
                .map(|p| p.normalize().to_string())
                .unwrap_or_else(|| "-".into()),
            premium: o
                .premium_insurance_percent
                .map(|p| p.normalize().to_string())
                .unwrap_or_else(|| "-".into()),
        }
    }
}

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Plan")]
    title: String,
    #[tabled(rename = "Min days")]
    min_days: u32,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Note")]
    note: String,
}

impl From<&PromoPlan> for PlanRow {
    fn from(p: &PromoPlan) -> Self {
        Self {
            id: p.id,
            title: p.title.clone(),
            min_days: p.minimum_stay_days,
            price: output::money(p.target_price),
            note: p.note.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct StoreRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Store")]
    name: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Phone")]
    phone: String,
}

impl From<&Store> for StoreRow {
    fn from(s: &Store) -> Self {
        Self {
            id: s.id,
            name: s.name.clone(),
            city: s.city.clone().unwrap_or_default(),
            address: s.address.clone().unwrap_or_default(),
            phone: s.phone.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct NameRow {
    #[tabled(rename = "Name")]
    name: String,
}

fn link(o: &VehicleOffer) -> String {
    OfferRef::new(o.id, o.state_id).encode()
}

fn offer_detail(d: &OfferDetails) -> String {
    let o = &d.offer;
    let mut lines = vec![
        format!("Group:       {}", o.name),
        format!("Link:        {}", link(o)),
        format!("State:       {}", o.state.as_deref().unwrap_or("-")),
        format!("Daily rate:  {}", output::money(o.base_daily_rate)),
    ];
    if let Some(ref desc) = o.description {
        lines.push(format!("Description: {desc}"));
    }
    lines.push(format!(
        "Insurance:   basic {}%, premium {}%",
        o.basic_insurance_percent.unwrap_or_default().normalize(),
        o.premium_insurance_percent.unwrap_or_default().normalize(),
    ));

    lines.push(String::new());
    lines.push("Stores:".into());
    if d.stores.is_empty() {
        lines.push("  (none)".into());
    }
    for s in &d.stores {
        lines.push(format!("  {:>4}  {}  {}", s.id, s.name, s.city.as_deref().unwrap_or("")));
    }

    lines.push(String::new());
    lines.push("Promotional plans:".into());
    if d.plans.is_empty() {
        lines.push("  (none)".into());
    }
    for p in &d.plans {
        lines.push(format!(
            "  {:>4}  {} ({}+ days) {}",
            p.id,
            p.title,
            p.minimum_stay_days,
            output::money(p.target_price)
        ));
    }
    lines.join("\n")
}

fn render_names(global: &GlobalOpts, names: &[String]) -> String {
    output::render_list(
        &global.output,
        names,
        |n| NameRow { name: n.clone() },
        |n| n.clone(),
    )
}

// ── Handlers ────────────────────────────────────────────────────────

fn filters(args: FleetListArgs) -> (FrotaFilters, FleetFilter) {
    let server = FrotaFilters {
        categoria: args.category,
        marca: args.brand,
        disponivel: args.available.then_some(true),
        ..FrotaFilters::default()
    };
    let local = FleetFilter {
        state: args.state,
        group: args.group,
        min_daily: args.min_daily,
        max_daily: args.max_daily,
        search: args.search,
    };
    (server, local)
}

pub async fn handle_fleet(
    portal: &Portal,
    args: FleetArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        FleetCommand::List(list) => {
            let (server, local) = filters(list);
            let spinner = util::spinner("Loading fleet...", global);
            let offers = portal.list_fleet(&server).await;
            spinner.finish_and_clear();
            let offers = offers?;

            let shown: Vec<VehicleOffer> = local.apply(&offers).into_iter().cloned().collect();
            tracing::debug!(
                total = offers.len(),
                shown = shown.len(),
                criteria = local.active_count(),
                "fleet filtered"
            );
            let out = output::render_list(
                &global.output,
                &shown,
                |o| OfferRow::from(o),
                |o| link(o),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FleetCommand::Show(arg) => {
            let offer = util::parse_offer(&arg.offer)?;
            let details = portal.offer_details(offer).await?;
            let out = output::render_single(
                &global.output,
                &details,
                offer_detail,
                |d| link(&d.offer),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FleetCommand::Categories => {
            let names = portal.fleet_categories().await?;
            output::print_output(&render_names(global, &names), global.quiet);
            Ok(())
        }

        FleetCommand::Brands => {
            let names = portal.fleet_brands().await?;
            output::print_output(&render_names(global, &names), global.quiet);
            Ok(())
        }

        FleetCommand::States => {
            let offers = portal.list_fleet(&FrotaFilters::default()).await?;
            output::print_output(&render_names(global, &fleet::states(&offers)), global.quiet);
            Ok(())
        }

        FleetCommand::Groups => {
            let offers = portal.list_fleet(&FrotaFilters::default()).await?;
            output::print_output(&render_names(global, &fleet::groups(&offers)), global.quiet);
            Ok(())
        }
    }
}

pub async fn handle_plans(
    portal: &Portal,
    args: &OfferArg,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let offer = util::parse_offer(&args.offer)?;
    let plans = portal.list_plans(offer.id, offer.state_id).await?;
    let out = output::render_list(
        &global.output,
        &plans,
        |p| PlanRow::from(p),
        |p| p.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle_stores(
    portal: &Portal,
    args: &StoresArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let stores = portal.list_stores(args.state_id).await?;
    let out = output::render_list(
        &global.output,
        &stores,
        |s| StoreRow::from(s),
        |s| s.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
