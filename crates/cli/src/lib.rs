use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use infragen_catalog::EntityCatalog;
use infragen_facts::extract_source_facts;
use infragen_generator::{
    load_catalog, CommandFormatter, Formatter, GeneratorConfig, PassthroughFormatter, ProgramGenerator,
    ProjectLayout, QueryGenerator,
};
use infragen_oracle::{OpenAiConfig, OpenAiOracle};
use infragen_sqlc::ConfigMerger;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "infragen")]
#[command(about = "Generate Go infrastructure code from interface declarations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root (directory holding go.mod)
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Configuration file (default: <root>/infragen.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the oracle model
    #[arg(long, global = true)]
    model: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the interface, implementation struct and assertion of a file
    Extract(ExtractArgs),

    /// Print the entity catalog
    Catalog(CatalogArgs),

    /// Generate sqlc queries for a file and register them in sqlc.yml
    Sql(TargetArgs),

    /// Regenerate the method implementations of a file
    Program(ProgramArgs),

    /// Register a query file in sqlc.yml
    SqlcAdd(SqlcAddArgs),
}

#[derive(Args)]
struct ExtractArgs {
    /// Go source file
    file: PathBuf,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct CatalogArgs {
    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct TargetArgs {
    /// Go source file under the infrastructure directory
    file: PathBuf,
}

#[derive(Args)]
struct ProgramArgs {
    /// Go source file under the infrastructure directory
    file: PathBuf,

    /// Write the assembled source without running the formatter
    #[arg(long)]
    no_format: bool,
}

#[derive(Args)]
struct SqlcAddArgs {
    /// Query file reference, relative to the infrastructure directory
    reference: String,

    /// sqlc configuration file (default from layout)
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Serialize)]
struct CatalogEntry<'a> {
    path: String,
    entity_name: &'a str,
    code: &'a str,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let mut config = GeneratorConfig::load(&cli.root, cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(model) = &cli.model {
        config.oracle.model = model.clone();
        config
            .validate()
            .map_err(|reason| anyhow::anyhow!("Invalid --model override: {reason}"))?;
    }
    let layout = ProjectLayout::new(&cli.root, config.layout.clone());

    match cli.command {
        Commands::Extract(args) => run_extract(args, &layout)?,
        Commands::Catalog(args) => run_catalog(args, &layout)?,
        Commands::Sql(args) => run_sql(args, &config, &layout).await?,
        Commands::Program(args) => run_program(args, &config, &layout).await?,
        Commands::SqlcAdd(args) => run_sqlc_add(args, &layout)?,
    }

    Ok(())
}

fn build_oracle(config: &GeneratorConfig) -> Result<OpenAiOracle> {
    let settings = &config.oracle;
    let oracle_config = OpenAiConfig::from_env(
        settings.base_url.clone(),
        settings.model.clone(),
        &settings.api_key_env,
        Duration::from_secs(settings.timeout_secs),
    )?;
    log::debug!("Using model {} at {}", oracle_config.model, oracle_config.base_url);
    Ok(OpenAiOracle::new(oracle_config)?)
}

fn run_extract(args: ExtractArgs, layout: &ProjectLayout) -> Result<()> {
    let path = layout.resolve(&args.file);
    let facts = extract_source_facts(&path)
        .with_context(|| format!("Failed to extract facts from {}", path.display()))?;

    if args.json {
        return print_stdout(&serde_json::to_string_pretty(&facts)?);
    }

    let text = format!(
        "interface: {}\nmethods: {}\nimplementation: {}\n\n{}\n\n{}\n\n{}",
        facts.contract.name,
        facts.method_names().join(", "),
        facts.binding.struct_name,
        facts.contract.text,
        facts.binding.text,
        facts.assertion.text
    );
    print_stdout(&text)
}

fn run_catalog(args: CatalogArgs, layout: &ProjectLayout) -> Result<()> {
    let catalog: EntityCatalog = load_catalog(layout).context("Failed to scan entities")?;

    if args.json {
        let entries: Vec<_> = catalog
            .sorted()
            .into_iter()
            .map(|record| CatalogEntry {
                path: layout.display_path(&record.path),
                entity_name: &record.entity_name,
                code: &record.code,
            })
            .collect();
        return print_stdout(&serde_json::to_string_pretty(&entries)?);
    }

    print_stdout(catalog.render(layout.root()).trim_end())
}

async fn run_sql(args: TargetArgs, config: &GeneratorConfig, layout: &ProjectLayout) -> Result<()> {
    let oracle = build_oracle(config)?;
    let report = QueryGenerator::new(&oracle, layout)
        .generate(&args.file)
        .await
        .with_context(|| format!("Query generation failed for {}", args.file.display()))?;

    print_stdout(&format!(
        "Wrote {} queries to {}\nUpdated {}",
        report.query_count,
        layout.display_path(&report.query_file),
        layout.display_path(&report.merge.config_path)
    ))
}

async fn run_program(args: ProgramArgs, config: &GeneratorConfig, layout: &ProjectLayout) -> Result<()> {
    let oracle = build_oracle(config)?;
    let command_formatter = if args.no_format {
        None
    } else {
        CommandFormatter::from_settings(&config.format)
    };
    let formatter: &dyn Formatter = match &command_formatter {
        Some(formatter) => formatter,
        None => &PassthroughFormatter,
    };

    let report = ProgramGenerator::new(&oracle, formatter, layout)
        .generate(&args.file)
        .await
        .with_context(|| format!("Program generation failed for {}", args.file.display()))?;

    print_stdout(&format!(
        "Updated {} ({} methods)",
        layout.display_path(&report.path),
        report.methods.len()
    ))
}

fn run_sqlc_add(args: SqlcAddArgs, layout: &ProjectLayout) -> Result<()> {
    let path = args
        .file
        .map(|file| layout.resolve(file))
        .unwrap_or_else(|| layout.sqlc_config());
    let report = ConfigMerger::default()
        .merge_reference(&path, &args.reference)
        .with_context(|| format!("Failed to update {}", path.display()))?;

    print_stdout(&format!(
        "Updated {} ({} appended, {} already present, {} skipped)",
        layout.display_path(&report.config_path),
        report.appended,
        report.already_present,
        report.skipped_blocks
    ))
}
