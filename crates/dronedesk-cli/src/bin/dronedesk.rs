//! DroneDesk command line client.
//!
//! Usage:
//!   dronedesk plans --search fp00
//!   dronedesk --admin command FP001 approve --feedback "Cleared"
//!   dronedesk demo

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use dronedesk_cli::{DeskClient, PlanState};
use dronedesk_core::{MapMode, MapPoint, OperationType, PlanCommand, PlanPatch, Role};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// DroneDesk server URL
    #[arg(long, default_value = "http://localhost:3000")]
    url: String,

    /// Act with the admin role
    #[arg(long)]
    admin: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the review queue
    Plans {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show one plan and its stage view
    Show { id: String },
    /// Create a draft plan
    Create(CreateArgs),
    /// Advance the planning wizard (submits on the last page)
    Next { id: String },
    /// Apply a lifecycle command
    Command {
        id: String,
        action: Action,
        #[arg(long)]
        feedback: Option<String>,
    },
    /// List pilots with certification status
    Pilots {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// List inventory
    Inventory,
    /// Show the news feed
    News {
        /// system, flight, maintenance or regulatory
        #[arg(long = "type")]
        update_type: Option<String>,
    },
    /// Walk a fresh plan through the whole lifecycle
    Demo,
}

#[derive(clap::Args, Debug)]
struct CreateArgs {
    #[arg(long)]
    pilot: String,
    #[arg(long, default_value = "")]
    location: String,
    /// YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,
    /// HH:MM
    #[arg(long)]
    time: Option<String>,
    /// Hours
    #[arg(long)]
    duration: Option<String>,
    #[arg(long)]
    operation_type: Option<OperationType>,
    #[arg(long)]
    drone: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Outline an area instead of a route
    #[arg(long)]
    area: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Action {
    Submit,
    Approve,
    Reject,
    Resubmit,
    Advance,
}

impl Action {
    fn into_command(self, feedback: Option<String>) -> PlanCommand {
        match self {
            Action::Submit => PlanCommand::Submit,
            Action::Approve => PlanCommand::Approve { feedback },
            Action::Reject => PlanCommand::Reject { feedback },
            Action::Resubmit => PlanCommand::Resubmit,
            Action::Advance => PlanCommand::AdvanceStage,
        }
    }
}

/// Demo site and outline offsets (~100m).
const DEMO_LAT: f64 = 51.5072;
const DEMO_LNG: f64 = -0.1276;
const OFFSET_DEG: f64 = 0.001;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let role = if args.admin { Role::Admin } else { Role::Pilot };
    let client = DeskClient::new(args.url, role);

    match args.command {
        Command::Plans { search } => {
            for row in client.list_plans(&search).await? {
                println!(
                    "{:<12} {:<18} {:<12} {:<10} {}",
                    row.id.as_deref().unwrap_or("-"),
                    row.pilot_name.as_deref().unwrap_or("-"),
                    row.date,
                    row.status,
                    row.location
                );
            }
        }
        Command::Show { id } => {
            let state = client.get_plan(&id).await?;
            print_state(&state);
            let view = client.stage_view(&id).await?;
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Command::Create(create) => {
            let draft = PlanPatch {
                pilot_name: Some(create.pilot),
                location: Some(create.location),
                date: create.date,
                time: create.time,
                duration: create.duration,
                operation_type: create.operation_type,
                drone_type: create.drone,
                operation_description: create.description,
                map_mode: Some(if create.area { MapMode::Area } else { MapMode::Route }),
                ..Default::default()
            };
            let state = client.create_plan(&draft).await?;
            print_state(&state);
        }
        Command::Next { id } => {
            let outcome = client.next_step(&id).await?;
            println!("Stage: {}", outcome.stage);
            print_state(&outcome.state);
        }
        Command::Command {
            id,
            action,
            feedback,
        } => {
            let outcome = client.command(&id, &action.into_command(feedback)).await?;
            println!("{} is now {}", id, outcome.stage);
        }
        Command::Pilots { search } => {
            for pilot in client.list_pilots(&search).await? {
                let certs: Vec<String> = pilot
                    .certifications
                    .iter()
                    .map(|cert| format!("{} until {}", cert.cert_type, cert.expiration_date))
                    .collect();
                println!("{:<16} {:<24} {}", pilot.name, pilot.email, certs.join(", "));
            }
        }
        Command::Inventory => {
            for item in client.inventory().await? {
                println!(
                    "{:<24} qty {:<4} next inspection {} ({} days)",
                    item.name, item.quantity, item.next_inspection, item.days_until_inspection
                );
            }
        }
        Command::News { update_type } => {
            for update in client.news(update_type.as_deref()).await? {
                println!("{} [{:?}] {}", update.date, update.priority, update.title);
            }
        }
        Command::Demo => run_demo(&client).await?,
    }

    Ok(())
}

fn print_state(state: &PlanState) {
    println!(
        "{} | {} | step {} ({}) | {:.0}%",
        state.plan.id.as_deref().unwrap_or("-"),
        state.plan.status,
        state.step,
        state.step_title,
        state.progress_percent
    );
}

async fn run_demo(client: &DeskClient) -> Result<()> {
    let pilot = client.as_role(Role::Pilot);
    let admin = client.as_role(Role::Admin);

    println!("Creating draft...");
    let draft = PlanPatch {
        pilot_name: Some("Demo Pilot".to_string()),
        location: Some("Riverside Park".to_string()),
        date: Some("2026-11-20".to_string()),
        time: Some("10:30".to_string()),
        duration: Some("1.5".to_string()),
        operation_type: Some(OperationType::A2),
        drone_type: Some("DJI Mavic 3".to_string()),
        operation_description: Some("Survey of the riverside footpath".to_string()),
        map_mode: Some(MapMode::Area),
        ..Default::default()
    };
    let state = pilot.create_plan(&draft).await?;
    let id = state.plan.id.clone().unwrap_or_default();
    println!("Draft {} created", id);

    for (dlat, dlng) in [(0.0, 0.0), (OFFSET_DEG, 0.0), (OFFSET_DEG, OFFSET_DEG)] {
        let point = MapPoint::new(DEMO_LAT + dlat, DEMO_LNG + dlng);
        pilot.add_point(&id, point).await?;
        println!("Added point {:.4}, {:.4}", point.lat, point.lng);
    }

    loop {
        let outcome = pilot.next_step(&id).await?;
        println!("Wizard: {}", outcome.state.step_title);
        if outcome.stage != dronedesk_core::FlightStage::Planning {
            println!("Submitted for review");
            break;
        }
    }

    let outcome = admin
        .command(
            &id,
            &PlanCommand::Approve {
                feedback: Some("Approved for the demo".to_string()),
            },
        )
        .await?;
    println!("Admin review: {}", outcome.stage);

    for _ in 0..2 {
        let outcome = pilot.command(&id, &PlanCommand::AdvanceStage).await?;
        println!("Advanced to {}", outcome.stage);
    }

    let actuals = PlanPatch {
        actual_time: Some("10:40".to_string()),
        actual_duration: Some("1.25".to_string()),
        ..Default::default()
    };
    let state = pilot.complete(&id, &actuals).await?;
    println!("Signed off {} at version {}", id, state.plan.version);

    Ok(())
}
