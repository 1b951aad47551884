use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use rust_decimal::Decimal;
use tracing::info;
use tracing_appender::rolling;

use hrm_payroll::config::Config;
use hrm_payroll::db::init_db;
use hrm_payroll::store::Storage;
use hrm_payroll::{Actor, PayrollEngine};

#[derive(Parser)]
#[command(name = "hrm-payroll", about = "Payroll engine for the HR back office")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the monthly payroll batch for every employee.
    Run {
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
    },
    /// Recompute one employee's payslip for a period.
    Recompute {
        #[arg(long)]
        employee: u64,
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
    },
    /// Record a bonus and refresh the affected payslip.
    AddBonus {
        #[arg(long)]
        employee: u64,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        description: Option<String>,
    },
    /// Print the stored payslips for a period.
    Show {
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "payroll.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .init();

    info!("Payroll engine starting...");

    let pool = init_db(&config.database_url).await?;
    let engine = PayrollEngine::new(
        Storage::mysql(pool),
        config.policy.clone(),
        config.batch_workers,
    );

    match cli.command {
        Command::Run { month, year } => {
            let summary = engine
                .run_monthly_payroll(month, year, &Actor::system("Admin System"))
                .await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            if !summary.failures.is_empty() {
                anyhow::bail!(
                    "{} of {} employees failed",
                    summary.failures.len(),
                    summary.failures.len() + summary.payslips.len()
                );
            }
        }
        Command::Recompute {
            employee,
            month,
            year,
        } => {
            let payslip = engine
                .recompute_employee(employee, month, year, &Actor::system("Admin System"))
                .await?;
            println!("{}", serde_json::to_string_pretty(&payslip)?);
        }
        Command::AddBonus {
            employee,
            amount,
            month,
            year,
            description,
        } => {
            let payslip = engine
                .add_bonus(
                    employee,
                    amount,
                    month,
                    year,
                    description,
                    &Actor::system("Admin"),
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&payslip)?);
        }
        Command::Show { month, year } => {
            let payslips = engine.payslips_for_period(month, year).await?;
            println!("{}", serde_json::to_string_pretty(&payslips)?);
        }
    }

    Ok(())
}
