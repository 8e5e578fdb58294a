use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use genchain::prelude::*;

#[derive(Parser)]
#[command(name = "genchain")]
#[command(about = "Run generative media chains", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a chain file and print its plan without running anything
    Validate {
        /// Path to the chain YAML file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Run a chain file against backend providers
    Run {
        /// Path to the chain YAML file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Initial input text (conventionally a prompt)
        #[arg(short, long)]
        input: String,

        /// Path to the providers YAML file (default: providers.yaml next to FILE)
        #[arg(short, long)]
        providers: Option<PathBuf>,

        /// Force an output directory for every step
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

/// One provider entry in providers.yaml: the HTTP adapter config plus an
/// optional environment variable naming the API key, resolved at startup.
#[derive(Debug, Deserialize)]
struct ProviderEntry {
    #[serde(flatten)]
    config: HttpGeneratorConfig,
    api_key_env: Option<String>,
}

fn load_providers(path: &Path) -> anyhow::Result<HashMap<StepKind, ProviderEntry>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    let providers: HashMap<StepKind, ProviderEntry> = serde_yaml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
    Ok(providers)
}

fn build_executor(providers: HashMap<StepKind, ProviderEntry>) -> anyhow::Result<Executor> {
    let mut executor = Executor::new();

    for (kind, entry) in providers {
        let mut config = entry.config;

        if let Some(var) = &entry.api_key_env {
            let token = std::env::var(var)
                .map_err(|_| anyhow::anyhow!("Environment variable {} is not set", var))?;
            config.auth = Some(HttpAuthConfig::Bearer { token });
        }

        let generator = HttpGenerator::new(config)?;
        executor = executor.with_generator(kind, Box::new(generator));
    }

    Ok(executor)
}

fn print_plan(chain: &Chain) {
    println!(
        "Chain: {}",
        chain.name.as_deref().unwrap_or("(unnamed)")
    );
    println!("Output dir: {}", chain.config.output_dir.display());
    println!();

    for (idx, step) in chain.steps.iter().enumerate() {
        let marker = if step.enabled { " " } else { "-" };
        println!(
            "  [{}] {}. {} (model: {})",
            marker,
            idx + 1,
            step.kind,
            step.resolved_model()
        );
    }

    let enabled = chain.enabled_steps().len();
    println!();
    println!("{} of {} steps enabled", enabled, chain.steps.len());
}

fn print_result(result: &ChainResult) {
    println!("\n=== Chain Results ===");
    println!("Run ID: {}", result.run_id);
    println!("Success: {}", result.success);
    println!(
        "Steps completed: {}/{}",
        result.steps_completed, result.total_steps
    );
    println!("Total cost: ${:.4}", result.total_cost);
    println!("Total time: {:.1}s", result.total_time);

    for (idx, step) in result.step_results.iter().enumerate() {
        let status = if step.success { "✓" } else { "✗" };
        println!(
            "  [{}] Step {} (model: {}, {:.1}s, ${:.4})",
            status,
            idx + 1,
            step.model,
            step.processing_time,
            step.cost
        );
        if let Some(path) = &step.output_path {
            println!("      path: {}", path);
        }
        if let Some(url) = &step.output_url {
            println!("      url: {}", url);
        }
        if let Some(error) = &step.error {
            println!("      Error: {}", error);
        }
    }

    if let Some(error) = &result.error {
        println!("\nError: {}", error);
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Validate { file } => {
            let chain = ChainLoader::load_file(&file)?;
            print_plan(&chain);
            Ok(ExitCode::SUCCESS)
        }

        Commands::Run {
            file,
            input,
            providers,
            output_dir,
        } => {
            let chain = ChainLoader::load_file(&file)?;

            let providers_path = providers.unwrap_or_else(|| {
                file.parent()
                    .unwrap_or_else(|| Path::new("."))
                    .join("providers.yaml")
            });
            let executor = build_executor(load_providers(&providers_path)?)?;

            let mut overrides = HashMap::new();
            if let Some(dir) = output_dir {
                overrides.insert(
                    "output_dir".to_string(),
                    serde_json::Value::String(dir.display().to_string()),
                );
            }

            let result = executor
                .execute_with_overrides(&chain, &input, &overrides)
                .await;
            print_result(&result);

            if result.success {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("genchain=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("genchain=info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
