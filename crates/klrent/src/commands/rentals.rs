//! Rental history and vehicle document handlers.

use tabled::Tabled;

use klrent_core::{Portal, Rental};

use crate::cli::{DocumentsArgs, DocumentsCommand, GlobalOpts, RentalsArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct RentalRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Car")]
    car_id: u64,
    #[tabled(rename = "Plate")]
    plate: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Started")]
    started: String,
    #[tabled(rename = "Returned")]
    returned: String,
}

impl From<&Rental> for RentalRow {
    fn from(r: &Rental) -> Self {
        let returned = match (r.returned, r.expected_return) {
            (Some(d), _) => d.format("%d/%m/%Y").to_string(),
            (None, Some(due)) => format!("due {}", due.format("%d/%m/%Y")),
            (None, None) => "out".into(),
        };
        Self {
            id: r.id,
            car_id: r.car_id,
            plate: r.plate.clone(),
            model: r.model.clone(),
            started: r.started.format("%d/%m/%Y").to_string(),
            returned,
        }
    }
}

pub async fn handle_rentals(
    portal: &Portal,
    args: &RentalsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let spinner = util::spinner("Loading rentals...", global);
    let rentals = portal.rentals().await;
    spinner.finish_and_clear();

    let rentals: Vec<Rental> = rentals?
        .into_iter()
        .filter(|r| !args.active || r.is_active())
        .collect();

    let out = output::render_list(
        &global.output,
        &rentals,
        |r| RentalRow::from(r),
        |r| r.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle_documents(
    portal: &Portal,
    args: DocumentsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DocumentsCommand::Link { car_id } => {
            let link = portal.vehicle_document_link(car_id).await?;
            let out = output::render_single(
                &global.output,
                &serde_json::json!({ "car_id": car_id, "link": link }),
                |_| link.clone(),
                |_| link.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
