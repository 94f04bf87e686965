//! Reservation list/show/cancel handlers.

use std::io::IsTerminal;

use tabled::Tabled;

use klrent_core::{Portal, Reservation};

use crate::cli::{GlobalOpts, ReservationsArgs, ReservationsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ReservationRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Store")]
    store: String,
    #[tabled(rename = "Pickup")]
    pickup: String,
    #[tabled(rename = "Return")]
    return_date: String,
    #[tabled(rename = "Days")]
    days: u32,
    #[tabled(rename = "Status")]
    status: String,
}

impl ReservationRow {
    fn new(r: &Reservation, color: bool) -> Self {
        Self {
            id: r.id,
            group: r.group_name.clone(),
            store: r.store_name.clone(),
            pickup: r.pickup_date.format("%d/%m/%Y").to_string(),
            return_date: r.return_date.format("%d/%m/%Y").to_string(),
            days: r.days,
            status: output::status_label(r.status, color),
        }
    }
}

fn with_time(date: chrono::NaiveDate, time: Option<&str>) -> String {
    match time {
        Some(t) => format!("{} {t}", date.format("%d/%m/%Y")),
        None => date.format("%d/%m/%Y").to_string(),
    }
}

/// Detail view shared with `reserve`.
pub fn detail(r: &Reservation, color: bool) -> String {
    let store = match r.store_city {
        Some(ref city) => format!("{} ({city})", r.store_name),
        None => r.store_name.clone(),
    };
    let mut lines = vec![
        format!("Reservation: {}", r.id),
        format!("Status:      {}", output::status_label(r.status, color)),
        format!("Group:       {}", r.group_name),
        format!("Store:       {store}"),
        format!("Pickup:      {}", with_time(r.pickup_date, r.pickup_time.as_deref())),
        format!("Return:      {}", with_time(r.return_date, r.return_time.as_deref())),
        format!("Days:        {}", r.days),
        format!("Insurance:   {}", r.insurance),
    ];
    if let Some(plan) = r.plan_id {
        lines.push(format!("Plan:        {plan}"));
    }
    if let Some(amount) = r.donated_amount {
        lines.push(format!("Donation:    {}", output::money(amount)));
    }
    lines.push(format!("Booked:      {}", r.registered_at));
    if let Some(ref c) = r.cancellation {
        lines.push(format!("Cancelled:   {} ({})", c.date, c.reason));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

fn cancel_reason(reason: Option<String>) -> Result<String, CliError> {
    if let Some(reason) = reason {
        return Ok(reason);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::validation(
            "reason",
            "a cancellation reason is required (pass --reason)",
        ));
    }
    dialoguer::Input::<String>::new()
        .with_prompt("Reason for cancelling")
        .interact_text()
        .map_err(util::prompt_err)
}

pub async fn handle(
    portal: &Portal,
    args: ReservationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        ReservationsCommand::List { all } => {
            let spinner = util::spinner("Loading reservations...", global);
            let list = if all {
                portal.reservations().await
            } else {
                portal.my_reservations().await
            };
            spinner.finish_and_clear();
            let list = list?;

            let out = output::render_list(
                &global.output,
                &list,
                |r| ReservationRow::new(r, color),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ReservationsCommand::Show { id } => {
            let reservation = portal.reservation(id).await?;
            let out = output::render_single(
                &global.output,
                &reservation,
                |r| detail(r, color),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ReservationsCommand::Cancel { id, reason } => {
            if !portal.is_logged_in() {
                return Err(CliError::NotLoggedIn);
            }
            let reason = cancel_reason(reason)?;
            if reason.trim().is_empty() {
                return Err(CliError::validation("reason", "a cancellation reason is required"));
            }
            if !util::confirm(&format!("Cancel reservation {id}?"), global, "cancel")? {
                return Ok(());
            }
            portal.cancel_reservation(id, &reason).await?;
            util::note(global, &format!("Reservation {id} cancelled"));
            Ok(())
        }
    }
}
