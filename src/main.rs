use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gcpinv::alerter::Alerter;
use gcpinv::config::Config;
use gcpinv::gcp::auth::validate_project_id;
use gcpinv::gcp::client::GcpClient;
use gcpinv::gcp::http::describe_error;
use gcpinv::output::{render, OutputFormat};
use gcpinv::parallel::RunnerPool;
use gcpinv::remote::registry::{get_all_resource_types, get_resource};
use gcpinv::remote::{build_suppliers, GcpStateReader, SupplierContext};
use gcpinv::scan::Scanner;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Inventory of live GCP resources
#[derive(Parser, Debug)]
#[command(name = "gcpinv", version, about, long_about = None)]
struct Args {
    /// GCP project to scan
    #[arg(short, long)]
    project: Option<String>,

    /// Maximum concurrent resource reads
    #[arg(long)]
    parallelism: Option<usize>,

    /// Resource type to skip (repeatable)
    #[arg(long, value_name = "TYPE")]
    exclude: Vec<String>,

    /// Only scan this resource type (repeatable)
    #[arg(long, value_name = "TYPE")]
    only: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    output: OutputFormat,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    /// Base URL replacing every Google API host
    #[arg(long, value_name = "URL")]
    api_root: Option<String>,

    /// Persist the effective project, parallelism and exclusions
    #[arg(long)]
    save_config: bool,

    /// Print the supported resource types and exit
    #[arg(long)]
    list_types: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Logging disabled, cannot open {:?}: {}", log_path, e);
            return None;
        },
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("gcpinv started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("gcpinv").join("gcpinv.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".gcpinv").join("gcpinv.log");
    }
    PathBuf::from("gcpinv.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    if args.list_types {
        for resource_type in get_all_resource_types() {
            let display_name = get_resource(resource_type)
                .map(|def| def.display_name.as_str())
                .unwrap_or_default();
            println!("{:<40} {}", resource_type, display_name);
        }
        return Ok(());
    }

    for resource_type in args.exclude.iter().chain(&args.only) {
        if get_resource(resource_type).is_none() {
            anyhow::bail!(
                "Unknown resource type '{}'. Use --list-types to see supported types",
                resource_type
            );
        }
    }

    // CLI > config > gcloud defaults
    let mut config = Config::load();
    if let Some(project) = &args.project {
        config.project_id = Some(project.clone());
    }
    if let Some(parallelism) = args.parallelism {
        config.parallelism = parallelism;
    }
    if args.api_root.is_some() {
        config.api_root = args.api_root.clone();
    }
    config.exclude.extend(args.exclude.iter().cloned());
    config.validate()?;

    let project = config.effective_project().context(
        "No GCP project configured. Set GOOGLE_CLOUD_PROJECT or use --project flag",
    )?;
    if !validate_project_id(&project) {
        anyhow::bail!("Invalid GCP project ID '{}'", project);
    }
    config.project_id = Some(project.clone());

    if args.save_config {
        config.save().context("Failed to save configuration")?;
    }

    tracing::info!("Using project: {}", project);

    let client = GcpClient::new(&project, config.api_root.clone())
        .await
        .context("Failed to initialize GCP client")?;

    let scope = CancellationToken::new();
    let pool = RunnerPool::with_scope(config.parallelism, scope.clone());
    let alerter = Arc::new(Alerter::new());
    let ctx = SupplierContext {
        project: project.clone(),
        api: Arc::new(client.clone()),
        reader: Arc::new(GcpStateReader::new(client)),
        pool: pool.clone(),
        alerter: Arc::clone(&alerter),
    };

    let mut suppliers = build_suppliers(&ctx)?;
    suppliers.retain(|s| config.is_selected(s.resource_type(), &args.only));
    let scanner = Scanner::new(pool, alerter, suppliers);

    let interrupt = scope.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling scan");
            interrupt.cancel();
        }
    });

    let inventory = match scanner.scan(&project).await {
        Ok(inventory) => inventory,
        Err(err) => {
            tracing::error!("Scan failed: {}", err);
            anyhow::bail!("Scan failed: {}", describe_error(&err));
        },
    };

    for (resource_type, alerts) in &inventory.alerts {
        for alert in alerts {
            eprintln!("Warning [{}]: {}", resource_type, alert.message);
        }
    }

    println!("{}", render(&inventory, args.output)?);

    Ok(())
}
