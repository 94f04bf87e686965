//! Quote and reservation handlers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use klrent_core::draft::parse_time;
use klrent_core::{InsuranceTier, Portal, Quote, RentalMode, ReservationDraft};

use crate::cli::{BookingArgs, Coverage, GlobalOpts, QuoteArgs, ReserveArgs};
use crate::error::CliError;
use crate::output;

use super::{reservations, util};

impl From<Coverage> for InsuranceTier {
    fn from(c: Coverage) -> Self {
        match c {
            Coverage::Basic => InsuranceTier::Basic,
            Coverage::Premium => InsuranceTier::Premium,
        }
    }
}

/// What the quote command prints.
#[derive(Serialize)]
struct QuoteView {
    link: String,
    group: String,
    store: Option<String>,
    mode: RentalMode,
    plan: Option<String>,
    insurance: InsuranceTier,
    pickup: NaiveDate,
    #[serde(rename = "return")]
    return_date: NaiveDate,
    billable_days: u32,
    daily_rate: Decimal,
    total: Decimal,
}

impl QuoteView {
    fn new(draft: &ReservationDraft, quote: &Quote) -> Self {
        let offer = draft.offer();
        Self {
            link: klrent_core::OfferRef::new(offer.id, offer.state_id).encode(),
            group: offer.name.clone(),
            store: draft.store().map(|s| s.name.clone()),
            mode: draft.mode(),
            plan: draft.active_plan().map(|p| p.title.clone()),
            insurance: draft.insurance(),
            pickup: draft.pickup(),
            return_date: draft.return_date(),
            billable_days: quote.billable_days,
            daily_rate: quote.display_daily_rate(),
            total: quote.display_total(),
        }
    }
}

fn quote_detail(v: &QuoteView) -> String {
    let mut lines = vec![
        format!("Group:      {}", v.group),
        format!("Store:      {}", v.store.as_deref().unwrap_or("-")),
        format!("Mode:       {}", v.mode),
    ];
    if let Some(ref plan) = v.plan {
        lines.push(format!("Plan:       {plan}"));
    }
    lines.extend([
        format!("Insurance:  {}", v.insurance),
        format!("Pickup:     {}", v.pickup.format("%d/%m/%Y")),
        format!("Return:     {}", v.return_date.format("%d/%m/%Y")),
        format!("Days:       {}", v.billable_days),
        format!("Daily rate: {}", output::money(v.daily_rate)),
        format!("Total:      {}", output::money(v.total)),
    ]);
    lines.join("\n")
}

/// Load the offer and apply the requested selections.
///
/// Mode and plan go first so the pickup date derives the plan's stay.
async fn build_draft(
    portal: &Portal,
    args: BookingArgs,
    today: NaiveDate,
    global: &GlobalOpts,
) -> Result<ReservationDraft, CliError> {
    let offer = util::parse_offer(&args.offer)?;
    let spinner = util::spinner("Loading offer...", global);
    let draft = portal.draft(offer, today).await;
    spinner.finish_and_clear();
    let mut draft = draft?;

    if let Some(store) = args.store {
        draft.select_store(store)?;
    }
    if args.promo || args.plan.is_some() {
        draft.set_mode(RentalMode::Promotional)?;
    }
    if let Some(plan) = args.plan {
        draft.select_plan(plan)?;
    }
    draft.set_insurance(args.insurance.into());
    if let Some(pickup) = args.pickup {
        draft.set_pickup(pickup)?;
    }
    if let Some(ret) = args.return_date {
        draft.set_return(ret)?;
    }
    Ok(draft)
}

pub async fn handle_quote(
    portal: &Portal,
    args: QuoteArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let today = args.today.unwrap_or_else(util::today);
    let draft = build_draft(portal, args.booking, today, global).await?;
    let view = QuoteView::new(&draft, &draft.quote());
    let out = output::render_single(&global.output, &view, quote_detail, |v| v.total.to_string());
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle_reserve(
    portal: &Portal,
    args: ReserveArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !portal.is_logged_in() {
        return Err(CliError::NotLoggedIn);
    }
    let pickup_time = parse_time(&args.pickup_time)?;
    let return_time = parse_time(&args.return_time)?;

    let mut draft = build_draft(portal, args.booking, util::today(), global).await?;
    draft.set_times(pickup_time, return_time);
    let quote = draft.quote();

    let prompt = format!(
        "Book {} from {} to {} ({} days) for {}?",
        draft.offer().name,
        draft.pickup().format("%d/%m/%Y"),
        draft.return_date().format("%d/%m/%Y"),
        quote.billable_days,
        output::money(quote.display_total()),
    );
    if !util::confirm(&prompt, global, "reserve")? {
        return Ok(());
    }

    let reservation = portal.reserve(&draft).await?;
    util::note(global, &format!("Reservation {} created", reservation.id));

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &reservation,
        |r| reservations::detail(r, color),
        |r| r.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
