use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;
use variantai::llm::{LlmClient, OpenAiClient, OpenAiConfig, OpenAiEmbedder};
use variantai::orchestrator::{Answer, AnswerPath, Orchestrator};
use variantai::retrieval::{ChromaRetriever, Retriever, StaticRetriever};
use variantai::session::{ChatSession, DEFAULT_EXPORT_FILE};
use variantai::sources::{MyVariantClient, ScholarClient};
use variantai::tools::{ToolExecutor, ToolRegistry};

fn setup_logging(level: Option<&str>) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("variantai")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("variantai.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.unwrap_or("info")))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    let llm_config = OpenAiConfig {
        base_url: config.llm.base_url.clone(),
        model: config.llm.model.clone(),
        temperature: config.llm.temperature,
        timeout: Duration::from_millis(config.llm.timeout_ms),
    };
    let llm: Arc<dyn LlmClient> = Arc::new(
        OpenAiClient::from_env(&config.llm.api_key_env, llm_config).context("Failed to create language model client")?,
    );
    if !llm.is_ready() {
        eyre::bail!("{} is empty", config.llm.api_key_env);
    }
    info!("Using model {}", llm.model());

    let retriever: Arc<dyn Retriever> = if config.retrieval.enabled {
        let api_key = std::env::var(&config.llm.api_key_env)
            .with_context(|| format!("{} not set", config.llm.api_key_env))?;
        let timeout = Duration::from_millis(config.retrieval.timeout_ms);
        let embedder = OpenAiEmbedder::new(&config.llm.base_url, &config.retrieval.embedding_model, api_key, timeout)?;
        Arc::new(ChromaRetriever::new(
            &config.retrieval.chroma_url,
            &config.retrieval.collection,
            Arc::new(embedder),
            timeout,
        )?)
    } else {
        info!("Retrieval disabled, answering without reference context");
        Arc::new(StaticRetriever::empty())
    };

    let source_timeout = Duration::from_millis(config.sources.timeout_ms);
    let variants = MyVariantClient::new(&config.sources.myvariant_url, source_timeout)
        .context("Failed to create variant source")?;
    let literature = ScholarClient::from_env(
        &config.sources.serpapi_url,
        &config.sources.serp_api_key_env,
        source_timeout,
    )
    .context("Failed to create literature source")?;

    let registry = ToolRegistry::standard().context("Tool registry failed validation")?;
    let executor = ToolExecutor::new(registry, Arc::new(variants), Arc::new(literature));

    Ok(Orchestrator::new(llm, retriever, executor))
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        None => handle_chat_command(None, cli.is_verbose(), config).await,
        Some(Commands::Ask { question }) => handle_ask_command(question, cli.is_verbose(), config).await,
        Some(Commands::Chat { resume }) => handle_chat_command(resume.as_deref(), cli.is_verbose(), config).await,
        Some(Commands::Tools { json }) => handle_tools_command(*json),
    }
}

async fn handle_ask_command(question: &str, verbose: bool, config: &Config) -> Result<()> {
    info!("Answering one-shot question");
    let orchestrator = build_orchestrator(config)?;
    let mut session = ChatSession::new();

    let answer = orchestrator.ask(&mut session, question).await;
    print_answer(&answer, verbose);
    Ok(())
}

async fn handle_chat_command(resume: Option<&Path>, verbose: bool, config: &Config) -> Result<()> {
    let orchestrator = build_orchestrator(config)?;
    let mut session = match resume {
        Some(path) => ChatSession::import(path).context(format!("Failed to resume from {}", path.display()))?,
        None => ChatSession::new(),
    };

    println!("{}", "VariantAI - Genomic Variant Interpreter".cyan().bold());
    println!("{}", "For research use only. Commands: /reset, /export [path], /history, /quit".dimmed());
    if !session.is_empty() {
        println!("Resumed {} turns", session.len());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.split_once(' ').map_or((input, ""), |(cmd, rest)| (cmd, rest.trim())) {
            ("/quit" | "/exit", _) => break,
            ("/reset", _) => {
                session.reset();
                println!("{}", "Chat restarted".yellow());
            }
            ("/history", _) => {
                for turn in session.turns() {
                    println!("{}: {}", format!("{:?}", turn.role).bold(), turn.content);
                }
            }
            ("/export", target) => {
                let path = if target.is_empty() {
                    config.session.export_dir.join(DEFAULT_EXPORT_FILE)
                } else {
                    PathBuf::from(target)
                };
                match session.export(&path) {
                    Ok(()) => println!("{} {}", "Exported to".green(), path.display()),
                    Err(e) => println!("{} {}", "Export failed:".red(), e),
                }
            }
            _ => {
                let answer = orchestrator.ask(&mut session, input).await;
                print_answer(&answer, verbose);
            }
        }
    }

    if verbose {
        let usage = session.usage();
        println!(
            "{} {} prompt + {} completion = {} tokens",
            "Session usage:".dimmed(),
            usage.prompt_tokens,
            usage.completion_tokens,
            usage.total()
        );
    }

    info!("Chat ended after {} turns", session.len());
    Ok(())
}

fn handle_tools_command(json: bool) -> Result<()> {
    let registry = ToolRegistry::standard().context("Tool registry failed validation")?;

    if json {
        let schemas: Vec<_> = registry.definitions().iter().map(|d| d.to_openai_schema()).collect();
        println!("{}", serde_json::to_string_pretty(&schemas)?);
        return Ok(());
    }

    for decl in registry.declarations() {
        println!("{}", decl.name.green().bold());
        println!("  {}", decl.description);
        for param in &decl.parameters {
            let required = if param.required { "required" } else { "optional" };
            println!(
                "  - {} ({}, {}): {}",
                param.name.cyan(),
                param.param_type.as_str(),
                required,
                param.description
            );
        }
    }
    Ok(())
}

fn print_answer(answer: &Answer, verbose: bool) {
    match &answer.path {
        AnswerPath::Unavailable { reason } => {
            println!("{} {}", "VariantAI:".red().bold(), answer.text);
            if verbose {
                println!("{} {}", "Reason:".dimmed(), reason);
            }
        }
        _ => println!("{} {}", "VariantAI:".green().bold(), answer.text),
    }

    if verbose {
        for result in answer.tool_results() {
            let marker = if result.is_error { "✗".red() } else { "✓".green() };
            println!("{} [{}] {}", marker, result.tool_call_id.dimmed(), result.content);
        }
        println!(
            "{} {} prompt + {} completion tokens",
            "Usage:".dimmed(),
            answer.usage.prompt_tokens,
            answer.usage.completion_tokens
        );
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging with the configured level
    setup_logging(config.log_level.as_deref()).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
