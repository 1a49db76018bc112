mod config;
mod registry;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use config::{ConfigError, load_settings};
use registry::{
    RunContext, init_run_logging, start_run, write_export_report, write_generation_report,
};
use schoolroll_export::{ExportError, OutputFormat, export};
use schoolroll_generate::{DataGenerator, GenerationError};
use schoolroll_store::{SqliteStore, StoreError, StoreOptions};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("settings error: {0}")]
    Config(#[from] ConfigError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("export error: {0}")]
    Export(#[from] ExportError),
}

#[derive(Parser, Debug)]
#[command(name = "schoolroll", version, about = "Synthetic school roster generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rebuild the database and export it as a spreadsheet.
    Generate(GenerateArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Xlsx,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Xlsx => OutputFormat::Xlsx,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Number of students (overrides the settings file).
    #[arg(long)]
    students: Option<u64>,
    /// Number of buses (overrides the settings file).
    #[arg(long)]
    buses: Option<u64>,
    /// Seed for every random draw (overrides the settings file).
    #[arg(long)]
    seed: Option<u64>,
    /// SQLite database file, recreated on every run.
    #[arg(long, default_value = "database.sqlite")]
    db: PathBuf,
    /// Spreadsheet path; CSV output goes to a directory named after its stem.
    #[arg(long, default_value = "SchoolData.xlsx")]
    out: PathBuf,
    #[arg(long, value_enum, default_value_t = FormatArg::Xlsx)]
    format: FormatArg,
    /// TOML settings file; created with defaults when missing.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args).await,
    }
}

async fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let GenerateArgs {
        students,
        buses,
        seed,
        db,
        out,
        format,
        config,
        run_dir,
    } = args;

    let mut settings = load_settings(config.as_deref())?;
    settings.apply_overrides(students, buses, seed);
    settings.validate()?;

    let run_id = Uuid::new_v4().to_string();
    let started_at = chrono::Utc::now();
    let format = OutputFormat::from(format);
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at,
        run_dir,
        db_path: db,
        out_path: out,
        format,
        config_path: config,
        settings,
    };

    let run_paths = start_run(&run_ctx)?;
    init_run_logging(&run_paths.logs_path)?;

    tracing::info!(
        event = "run_started",
        run_id = %run_id,
        students = run_ctx.settings.population.students,
        seed = run_ctx.settings.population.seed,
        db = %run_ctx.db_path.display()
    );

    let timer = Instant::now();

    let store = SqliteStore::open(&StoreOptions {
        path: Some(run_ctx.db_path.clone()),
        reset: true,
    })
    .await?;

    let options = run_ctx.settings.generate_options(started_at.naive_utc());
    let generation = DataGenerator::new(options).run(&store).await?;
    write_generation_report(&run_paths, &generation)?;
    tracing::info!(
        event = "generation_finished",
        duration_ms = generation.duration_ms,
        path = %run_paths.generation_report_path.display()
    );

    let writer = format.writer();
    let exported = export(&store, writer.as_ref(), &run_ctx.out_path).await?;
    write_export_report(&run_paths, &exported)?;
    tracing::info!(
        event = "export_written",
        format = %exported.format,
        path = %run_ctx.out_path.display(),
        participation_rate = exported.participation.rate
    );

    let duration_ms = timer.elapsed().as_millis();
    tracing::info!(
        event = "run_finished",
        status = "success",
        run_dir = %run_paths.root.display(),
        duration_ms = duration_ms
    );

    Ok(())
}
