use clap::{Parser, ValueEnum};
use karigar::application::engine::{Collaborators, EngineConfig, MarketplaceEngine};
use karigar::domain::money::CommissionRate;
use karigar::domain::settlement::CommissionSchedule;
use karigar::infrastructure::collaborators::{
    RecordingPayments, StoreBackedDirectory, TracingNotifier,
};
use karigar::infrastructure::in_memory::{InMemoryRequestStore, InMemoryVendorStore};
use karigar::interfaces::csv::op_reader::{apply_operation, OpReader};
use karigar::interfaces::csv::report_writer::ReportWriter;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Report {
    /// Request ledger with settlements
    Requests,
    /// Vendor roster with approval state
    Vendors,
    /// Admin aggregates as JSON
    Stats,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input operations CSV file
    input: PathBuf,

    /// Which final report to print
    #[arg(long, value_enum, default_value = "requests")]
    report: Report,

    /// Default commission percentage, between 1 and 3
    #[arg(long)]
    commission_rate: Option<Decimal>,

    /// Seed for Happy Code generation; the same seed draws the same codes
    #[arg(long)]
    code_seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = EngineConfig {
        code_seed: cli.code_seed,
        ..Default::default()
    };
    if let Some(percent) = cli.commission_rate {
        config.commissions = CommissionSchedule::new(CommissionRate::from_percent(percent)?);
    }

    let request_store = InMemoryRequestStore::new();
    let vendor_store = InMemoryVendorStore::new();
    let collaborators = Collaborators {
        directory: Box::new(StoreBackedDirectory::new(Box::new(vendor_store.clone()))),
        notifier: Box::new(TracingNotifier),
        payments: Box::new(RecordingPayments::new()),
    };
    let engine = MarketplaceEngine::new(
        Box::new(request_store),
        Box::new(vendor_store),
        collaborators,
        config,
    );

    // Replay operations
    let file = File::open(cli.input).into_diagnostic()?;
    let reader = OpReader::new(file);
    for op_result in reader.operations() {
        match op_result {
            Ok(op) => {
                if let Err(e) = apply_operation(&engine, op).await {
                    eprintln!("Error processing operation: {}", e);
                }
            }
            Err(e) => {
                eprintln!("Error reading operation: {}", e);
            }
        }
    }

    // Output final state
    let stdout = io::stdout();
    match cli.report {
        Report::Requests => {
            let requests = engine.list_requests().await?;
            let mut writer = ReportWriter::new(stdout.lock());
            writer.write_requests(engine.catalog(), &requests)?;
        }
        Report::Vendors => {
            let vendors = engine.list_vendors().await?;
            let mut writer = ReportWriter::new(stdout.lock());
            writer.write_vendors(engine.catalog(), &vendors)?;
        }
        Report::Stats => {
            let stats = engine.admin_stats().await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&stats).into_diagnostic()?
            );
        }
    }

    Ok(())
}
