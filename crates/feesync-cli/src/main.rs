use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use feesync_core::{FeeSession, SaveOutcome, ScopePatch, SessionConfig};
use feesync_http::{BatchCreate, ClientConfig, GatewayClient, StaticToken};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "feesync")]
#[command(about = "Operator CLI for the school fee gateway")]
struct Cli {
    /// Gateway base URL.
    #[arg(long, default_value = "http://localhost:8000")]
    base_url: String,

    /// Bearer token for the gateway.
    #[arg(long, env = "FEESYNC_TOKEN")]
    token: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List fee records for a scope, grouped by class.
    List {
        #[arg(long)]
        school: Option<String>,
        #[arg(long)]
        class: Option<String>,
        #[arg(long)]
        month: Option<String>,
        /// Case-insensitive student name filter.
        #[arg(long, default_value = "")]
        search: String,
    },
    /// List students of a school.
    Students {
        #[arg(long)]
        school: String,
    },
    /// Create one fee record per active student for a month.
    CreateMonth {
        #[arg(long)]
        school: String,
        #[arg(long)]
        month: String,
        /// Overwrite records that already exist for this month.
        #[arg(long)]
        force: bool,
    },
    /// Record a payment for one student and month. Creates the fee
    /// record if needed, updates it if it already exists.
    Pay {
        #[arg(long)]
        student: String,
        #[arg(long)]
        month: String,
        #[arg(long)]
        amount: Decimal,
    },
    /// Update one fee record by id.
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        amount: Option<Decimal>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete fee records by id.
    Delete {
        ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let gateway = GatewayClient::new(
        ClientConfig::with_base_url(&cli.base_url),
        Arc::new(StaticToken(cli.token.clone())),
    )
    .context("building gateway client")?;
    let session = FeeSession::new(Arc::new(gateway), SessionConfig::default());

    match cli.command {
        Command::List {
            school,
            class,
            month,
            search,
        } => {
            let mut patch = ScopePatch::new().search(search);
            if let Some(school) = school {
                patch = patch.school(school);
            }
            if let Some(class) = class {
                patch = patch.class(class);
            }
            if let Some(month) = month {
                patch = patch.month(month);
            }
            session.set_filter(patch).await;
            if !session.scope().await.wants_reload() {
                anyhow::bail!("pass at least --school or --class");
            }
            session.reload_now().await;
            print_view(&session.view().await);
            report_errors(&session).await?;
        }
        Command::Students { school } => {
            let students = session.students(&school).await?;
            for s in &students {
                println!("{}\t{}\t{}", s.id, s.class, s.name);
            }
            info!("{} students", students.len());
        }
        Command::CreateMonth {
            school,
            month,
            force,
        } => match session.create_monthly_batch(&school, &month, force).await? {
            BatchCreate::Created { message } => println!("{message}"),
            BatchCreate::NeedsConfirmation { warning } => {
                println!("{warning}");
                println!("Re-run with --force to overwrite.");
            }
        },
        Command::Pay {
            student,
            month,
            amount,
        } => match session.create_single(&student, &month, amount).await? {
            SaveOutcome::CreatedNew => println!("Created a new fee record."),
            SaveOutcome::UpdatedExisting => {
                println!("A record already existed for this month; payment updated.")
            }
        },
        Command::Update { id, amount, date } => {
            session.update_fee(&id, amount, date).await?;
            println!("Updated {id}.");
        }
        Command::Delete { ids } => {
            session.delete_many(&ids).await?;
            println!("Deleted {} records.", ids.len());
        }
    }
    Ok(())
}

fn print_view(view: &feesync_core::FeeView) {
    for group in &view.groups {
        println!("{}", group.student_class);
        for rec in &group.rows {
            println!(
                "  {}\t{}\t{}\ttotal {}\tpaid {}\tdue {}\t{:?}",
                rec.id,
                rec.month,
                rec.student_name,
                rec.total_fee,
                rec.paid_amount,
                rec.balance_due,
                rec.status
            );
        }
        println!(
            "  subtotal\ttotal {}\tpaid {}\tdue {}",
            group.subtotal.total_fee, group.subtotal.paid_amount, group.subtotal.balance_due
        );
    }
    println!(
        "{} records\ttotal {}\tpaid {}\tdue {}",
        view.totals.count, view.totals.total_fee, view.totals.paid_amount, view.totals.balance_due
    );
}

/// Reload failures land on the notice board rather than bubbling up;
/// turn them into a non-zero exit for scripting.
async fn report_errors(session: &FeeSession) -> anyhow::Result<()> {
    let errors: Vec<_> = session
        .notices()
        .await
        .into_iter()
        .filter(|n| n.kind == feesync_core::NoticeKind::Error)
        .collect();
    match errors.first() {
        Some(err) => anyhow::bail!("{}", err.text),
        None => Ok(()),
    }
}
