use anyhow::{Context, Result};
use aurora_walkthrough::defaults::{DefaultsSource, RdsDefaults};
use aurora_walkthrough::host::TerminalHost;
use aurora_walkthrough::progress::Progress;
use aurora_walkthrough::project::ProjectMetadata;
use aurora_walkthrough::prompt::TerminalPrompter;
use aurora_walkthrough::questions::DataSourceMetadata;
use aurora_walkthrough::{runner, ProviderType, Walkthrough};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

/// Telemetry events stay out of the terminal unless asked for; the user
/// already sees the error line printed by the host.
const DEFAULT_LOG_FILTER: &str = "warn,aurora_walkthrough::telemetry=off";

/// Attach an Aurora Serverless cluster to a project's GraphQL API
#[derive(Parser)]
#[command(name = "aurora-walkthrough")]
#[command(version)]
#[command(about = "Attach an Aurora Serverless cluster to a project's GraphQL API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root (the directory holding `amplify/`)
    #[arg(
        long,
        value_name = "DIR",
        global = true,
        env = "AURORA_WALKTHROUGH_PROJECT_DIR",
        default_value = "."
    )]
    project_dir: PathBuf,

    /// Log filter: trace, debug, info, warn, error or a directive list
    #[arg(
        short = 'v',
        long,
        value_name = "LEVEL",
        global = true,
        env = "RUST_LOG",
        default_value = DEFAULT_LOG_FILTER
    )]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the data source walkthrough and print the selection as JSON
    Add(AddArgs),
    /// Print the default values generated for the project as JSON
    Defaults,
}

#[derive(clap::Args)]
struct AddArgs {
    /// Question definitions to use instead of the bundled ones
    #[arg(long, value_name = "FILE")]
    datasource_metadata: Option<PathBuf>,

    /// Provider plugin clients are resolved from
    #[arg(long, value_name = "NAME", default_value = "awscloudformation")]
    provider: ProviderType,

    /// Endpoint override for every AWS service (e.g. LocalStack)
    #[arg(long, value_name = "URL", env = "AWS_ENDPOINT_URL")]
    endpoint: Option<String>,

    /// Named AWS profile
    #[arg(long, value_name = "NAME", env = "AWS_PROFILE")]
    profile: Option<String>,

    /// Do not draw spinners
    #[arg(long)]
    no_progress: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Defaults => print_defaults(cli.project_dir),
        Commands::Add(args) => tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start the async runtime")?
            .block_on(add(cli.project_dir, args)),
    }
}

fn print_defaults(project_dir: PathBuf) -> Result<ExitCode> {
    let project = ProjectMetadata::load(&project_dir)?;
    let defaults = RdsDefaults.defaults(&project);
    println!("{}", serde_json::to_string_pretty(&defaults)?);
    Ok(ExitCode::SUCCESS)
}

async fn add(project_dir: PathBuf, args: AddArgs) -> Result<ExitCode> {
    let metadata = match args.datasource_metadata {
        Some(ref path) => DataSourceMetadata::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => DataSourceMetadata::bundled()?,
    };

    let mut host = TerminalHost::new(project_dir);
    if let Some(endpoint) = args.endpoint {
        host = host.with_provider_option("endpoint", endpoint);
    }
    if let Some(profile) = args.profile {
        host = host.with_provider_option("profile", profile);
    }

    let progress = if args.no_progress {
        Progress::Hidden
    } else {
        Progress::Animated
    };

    let mut prompter = TerminalPrompter;
    let mut walkthrough = Walkthrough::new(&host, &mut prompter)
        .with_provider(args.provider)
        .with_progress(progress);

    match runner::run(&mut walkthrough, &RdsDefaults, &metadata).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(termination) => Ok(termination.exit_code()),
    }
}

fn init_tracing(log_level: &str, format: LogFormat) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(env_filter);

    let _ = match format {
        LogFormat::Json => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().json().with_writer(std::io::stderr)),
        ),
        LogFormat::Text => tracing::subscriber::set_global_default(
            registry.with(fmt::layer().with_writer(std::io::stderr)),
        ),
    };
}
