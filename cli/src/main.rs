use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use regula_core::{agent, audit, config, providers, session::Session};
mod onboard;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "regula")]
#[command(about = "regula - compliance question answering over your own documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up API access and defaults
    Onboard,
    /// Ask a compliance question
    Ask {
        #[arg(short, long)]
        question: Option<String>,
        /// Folder of PDF/Word documents to include as context
        #[arg(short, long)]
        docs: Option<PathBuf>,
        /// Regulatory website URL to scrape for context
        #[arg(short, long)]
        url: Option<String>,
    },
    /// Show the query audit trail
    Audit {
        /// Write the trail as CSV to this file instead of printing it
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or_else(|| {
        if !config::config_exists() {
            Commands::Onboard
        } else {
            Commands::Ask {
                question: None,
                docs: None,
                url: None,
            }
        }
    });

    match command {
        Commands::Onboard => {
            let onboard_config = onboard::run_onboard().map_err(|e| {
                eprintln!("❌ Onboarding failed: {}", e);
                anyhow::anyhow!("Onboarding failed: {}", e)
            })?;
            config::save_config(&onboard_config)?;
        }
        Commands::Ask {
            question,
            docs,
            url,
        } => run_ask(question, docs, url).await?,
        Commands::Audit { csv } => run_audit(csv)?,
    }

    Ok(())
}

fn login() -> Result<Session> {
    let expected = config::app_password();

    for _ in 0..3 {
        let supplied = dialoguer::Password::new()
            .with_prompt("🔐 Enter password")
            .interact()?;

        if let Some(session) = Session::authenticate(&supplied, &expected) {
            return Ok(session);
        }
        eprintln!("{}", style("❌ Incorrect password").red());
    }

    anyhow::bail!("Too many failed login attempts")
}

async fn run_ask(
    question: Option<String>,
    docs: Option<PathBuf>,
    url: Option<String>,
) -> Result<()> {
    let config = config::load_config()?;
    let session = login()?;

    let mut provider = providers::OpenAIProvider::new(config.resolve_api_key()?);
    provider = provider.with_model(config.model.clone());
    if let Some(base_url) = config.base_url.clone() {
        provider = provider.with_base_url(base_url);
    }

    config::ensure_regula_dir()?;

    let context_builder = agent::ContextBuilder::new()
        .with_knowledge(config.knowledge_summary()?)
        .with_truncate_limit(config.truncate_limit);
    let log = audit::QueryLog::new(config.log_path.clone());

    let agent = agent::Agent::new(Arc::new(provider), context_builder, log)
        .with_temperature(config.temperature);

    let docs = docs.as_deref();
    let url = url.as_deref();

    if let Some(q) = question {
        println!("\n🤔 Thinking...\n");
        match agent.answer_query(&session, q.trim(), docs, url).await {
            Ok(answer) => {
                println!("{}", answer);
            }
            Err(e) => {
                eprintln!("⚠️ Error: {}", e);
                anyhow::bail!("Query failed: {}", e);
            }
        }
    } else {
        println!("💬 regula");
        println!("Ask a compliance question (Ctrl+D to exit):\n");
        use std::io::{self, BufRead};
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut stdout_lock = stdout.lock();

        loop {
            print!("> ");
            let _ = stdout_lock.flush();

            let mut input = String::new();
            let mut reader = stdin.lock();

            match reader.read_line(&mut input) {
                Ok(0) => {
                    println!("\n👋 Goodbye!");
                    break;
                }
                Ok(_) => {
                    let input = input.trim();
                    if input.is_empty() {
                        continue;
                    }

                    println!("\n🤔 Thinking...\n");

                    match agent.answer_query(&session, input, docs, url).await {
                        Ok(answer) => {
                            println!("{}", answer);
                        }
                        Err(e) => {
                            eprintln!("⚠️ Error: {}", e);
                        }
                    }

                    println!();
                }
                Err(_) => {
                    println!("\n👋 Goodbye!");
                    break;
                }
            }
        }
    }

    Ok(())
}

fn run_audit(csv: Option<PathBuf>) -> Result<()> {
    let config = config::Config::load_or_init()?;
    let log = audit::QueryLog::new(config.log_path);

    if let Some(path) = csv {
        let content = log.export_csv()?;
        std::fs::write(&path, content)?;
        println!("📥 Logs written to {}", path.display());
        return Ok(());
    }

    let mut records = log.records()?;
    if records.is_empty() {
        println!("No logs found yet.");
        return Ok(());
    }

    // Newest first for display; the store itself stays insertion-ordered.
    audit::sort_newest_first(&mut records);

    println!("📊 Query audit trail ({} entries)\n", records.len());
    for record in records {
        println!("{}", style(format!("[{}]", record.timestamp)).dim());
        println!("Q: {}", record.question);
        println!("A: {}", record.answer);
        println!();
    }

    Ok(())
}
