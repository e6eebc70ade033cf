use std::io;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use skope_catalog::config::{ConfigLoader, ResolvedConfig};
use skope_catalog::domain::{DatasetId, VariableClass, VariableId, parse_year};
use skope_catalog::error::CatalogError;
use skope_catalog::output::{ListResult, OutputMode};
use skope_catalog::session::{Session, show_selection};
use skope_catalog::store::{CatalogStore, StaticCatalog};

#[derive(Parser)]
#[command(name = "skope-catalog")]
#[command(about = "Filter and select datasets from a paleoclimate dataset catalog")]
#[command(version)]
struct Cli {
    /// Catalog JSON file (defaults to the built-in catalog)
    #[arg(long, global = true)]
    catalog: Option<String>,

    #[arg(long, global = true)]
    config: Option<String>,

    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "List datasets matching the filter")]
    List(ListArgs),
    #[command(about = "Select a dataset and optionally one of its variables")]
    Show(ShowArgs),
    #[command(
        about = "Read commands from stdin, one per line",
        long_about = "Read commands from stdin, one per line.\n\n\
            Commands: filter <json>, reset, select <dataset>, variable <variable>, \
            clear, list, show, quit. Blank lines and lines starting with # are skipped."
    )]
    Session,
}

#[derive(Args)]
struct ListArgs {
    #[arg(long)]
    query: Option<String>,

    #[arg(long = "class")]
    classes: Vec<VariableClass>,

    #[arg(long, value_parser = parse_year, allow_negative_numbers = true)]
    from: Option<i32>,

    #[arg(long, value_parser = parse_year, allow_negative_numbers = true)]
    to: Option<i32>,
}

#[derive(Args)]
struct ShowArgs {
    dataset: DatasetId,

    #[arg(long)]
    variable: Option<VariableId>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<CatalogError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &CatalogError) -> u8 {
    match error {
        CatalogError::DatasetNotFound(_)
        | CatalogError::VariableNotFound { .. }
        | CatalogError::NoDatasetSelected
        | CatalogError::MissingConfig => 2,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };

    let config = resolve_config(cli.config.as_deref())?;
    let catalog = resolve_catalog(cli.catalog.as_deref(), &config)?;
    let mut store = CatalogStore::with_fallback_span(catalog, config.default_span);
    store.set_filter_criteria(config.filter);

    match cli.command {
        Commands::List(args) => run_list(args, &mut store, output_mode),
        Commands::Show(args) => run_show(args, &mut store, output_mode),
        Commands::Session => run_session(store, output_mode),
    }
}

fn resolve_config(path: Option<&str>) -> Result<ResolvedConfig, CatalogError> {
    match ConfigLoader::resolve(path) {
        Err(CatalogError::MissingConfig) if path.is_none() => Ok(ResolvedConfig::default()),
        other => other,
    }
}

fn resolve_catalog(
    path: Option<&str>,
    config: &ResolvedConfig,
) -> Result<StaticCatalog, CatalogError> {
    let catalog = match path.map(Utf8PathBuf::from).or_else(|| config.catalog.clone()) {
        Some(path) => ConfigLoader::load_catalog(&path)?,
        None => StaticCatalog::builtin()?,
    };
    if catalog.is_empty() {
        warn!("catalog has no datasets");
    } else {
        info!(datasets = catalog.len(), "catalog resolved");
    }
    Ok(catalog)
}

fn run_list(
    args: ListArgs,
    store: &mut CatalogStore<StaticCatalog>,
    output_mode: OutputMode,
) -> miette::Result<()> {
    store.load();

    let mut criteria = store.filter_criteria().clone();
    if let Some(query) = args.query {
        criteria = criteria.with_query(query);
    }
    if !args.classes.is_empty() {
        criteria = criteria.with_classes(args.classes);
    }
    if let Some(from) = args.from {
        criteria.year_start = from;
    }
    if let Some(to) = args.to {
        criteria.year_end = to;
    }
    store.set_filter_criteria(criteria);

    output_mode
        .write_list(&mut io::stdout().lock(), &ListResult::from_store(store))
        .into_diagnostic()
}

fn run_show(
    args: ShowArgs,
    store: &mut CatalogStore<StaticCatalog>,
    output_mode: OutputMode,
) -> miette::Result<()> {
    let result = show_selection(store, args.dataset, args.variable)?;
    output_mode
        .write_selection(&mut io::stdout().lock(), &result)
        .into_diagnostic()
}

fn run_session(
    store: CatalogStore<StaticCatalog>,
    output_mode: OutputMode,
) -> miette::Result<()> {
    let mut session = Session::new(store);
    session
        .run(
            io::stdin().lock(),
            &mut io::stdout().lock(),
            &mut io::stderr(),
            output_mode,
        )
        .into_diagnostic()
}
