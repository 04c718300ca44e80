//! Code generation CLI entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration**: load `codegen.toml` (or `--config`), apply
//!    `CODEGEN_*` overrides, and read `GOOGLE_API_KEY`. A missing key is fatal
//!    before any prompt is shown.
//! 2. **Wire observability**: configure `tracing-subscriber` (text or JSON)
//!    and, when an OTLP endpoint is configured, an OpenTelemetry exporter.
//! 3. **Construct infrastructure**: build the [`llm::GeminiProvider`] and
//!    inject it into one shared [`nodes::PipelineExecutor`].
//! 4. **Select run mode**:
//!    - `generate` (default): prompt for missing inputs, run the pipeline once
//!      with a stage-by-stage transcript, optionally save the code.
//!    - `serve`: expose the pipeline over HTTP until Ctrl-C.

mod config;
mod interactive;
mod observability;
mod persist;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use llm::{GeminiConfig, GeminiProvider};
use nodes::PipelineExecutor;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::interactive::{Prompter, TranscriptPrinter};
use crate::observability::LogFormat;

#[derive(Parser, Debug)]
#[command(
    name = "codegen",
    version,
    about = "Turn a feature description into code through plan, design, code and review stages"
)]
struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML configuration file (default: ./codegen.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the pipeline once from the terminal
    Generate(GenerateArgs),

    /// Serve the pipeline over HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug, Default)]
struct GenerateArgs {
    /// What to build; prompted for when omitted
    #[arg(short, long)]
    description: Option<String>,

    /// Target programming language; prompted for when omitted
    #[arg(short, long)]
    language: Option<String>,

    /// File or directory to save the generated code to (implies --save)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Save without asking
    #[arg(long, conflicts_with = "no_save")]
    save: bool,

    /// Do not save and do not ask
    #[arg(long)]
    no_save: bool,
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Address to listen on, overriding `server.bind`
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let _telemetry = match observability::init(cli.verbose, cli.log_format) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("fatal error: {e:#}");
            eprintln!("\nFatal error occurred:\n{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let executor = build_executor(&config)?;

    match cli
        .command
        .unwrap_or_else(|| Commands::Generate(GenerateArgs::default()))
    {
        Commands::Generate(args) => generate(&executor, args).await,
        Commands::Serve(args) => serve(executor, &config, args).await,
    }
}

fn build_executor(config: &AppConfig) -> Result<Arc<PipelineExecutor>> {
    let credentials = GeminiConfig::from_env()?;
    let provider = GeminiProvider::new(config.gemini_config(credentials.api_key))?;
    info!(model = provider.model(), base_url = %config.llm.base_url, "LLM provider ready");

    Ok(Arc::new(PipelineExecutor::new(Arc::new(provider))))
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

async fn generate(executor: &PipelineExecutor, args: GenerateArgs) -> Result<()> {
    println!("CODE GENERATION PIPELINE\n");

    let (description, language) = {
        let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());
        let description = match non_blank(args.description) {
            Some(d) => d,
            None => prompter.ask_non_empty(
                "What do you want to build?\n(e.g., 'Addition of two integers')",
                "Description",
            )?,
        };
        let language = match non_blank(args.language) {
            Some(l) => l,
            None => prompter.ask_non_empty(
                "Programming language?\n(e.g., Python, JavaScript, Java)",
                "Language",
            )?,
        };
        (description, language)
    };

    println!("\nStarting code generation pipeline...\n");
    let mut transcript = TranscriptPrinter::new(io::stdout());
    let run = tokio::select! {
        result = executor.run_observed(&description, &language, &mut transcript) => result?,
        _ = tokio::signal::ctrl_c() => {
            println!("\n\nInterrupted by user");
            return Ok(());
        }
    };

    let save = if args.no_save {
        false
    } else if args.save || args.output.is_some() {
        true
    } else {
        Prompter::new(io::stdin().lock(), io::stdout()).confirm("\nSave generated code to file?")?
    };

    if save {
        let path = persist::save_code(&run.code, args.output.as_deref())?;
        println!("Code saved to {}", path.display());
    }

    println!("\nDone!");
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// serve
// ---------------------------------------------------------------------------

async fn serve(executor: Arc<PipelineExecutor>, config: &AppConfig, args: ServeArgs) -> Result<()> {
    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());
    let socket = listener::bind(&bind).await?;
    listener::serve(socket, executor, shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => {
            // Without a signal handler the server runs until killed.
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_interactive_generate() {
        let cli = Cli::try_parse_from(["codegen"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn generate_flags_are_parsed() {
        let cli = Cli::try_parse_from([
            "codegen",
            "-vv",
            "generate",
            "--description",
            "sum two integers",
            "--language",
            "go",
            "--no-save",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Some(Commands::Generate(args)) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.description.as_deref(), Some("sum two integers"));
        assert_eq!(args.language.as_deref(), Some("go"));
        assert!(args.no_save);
    }

    #[test]
    fn save_and_no_save_conflict() {
        assert!(Cli::try_parse_from(["codegen", "generate", "--save", "--no-save"]).is_err());
    }

    #[test]
    fn serve_accepts_bind_and_json_logs() {
        let cli =
            Cli::try_parse_from(["codegen", "serve", "--bind", "0.0.0.0:9000", "--log-format", "json"])
                .unwrap();

        assert_eq!(cli.log_format, LogFormat::Json);
        let Some(Commands::Serve(args)) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.bind.as_deref(), Some("0.0.0.0:9000"));
    }

    #[test]
    fn blank_flag_values_are_treated_as_missing() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(Some(" go ".into())), Some("go".to_string()));
    }
}
