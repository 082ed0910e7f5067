use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ledgerlift_extract::{extract_transactions, LlmConfig, Provider, Statement};
use std::path::PathBuf;

mod auth;
mod config;
mod display;
#[cfg(feature = "sheets")]
mod sheets;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "ledgerlift",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("LEDGERLIFT_BUILD_SHA"), ")"),
    about = "Extract bank statement transactions to CSV and Google Sheets"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract transactions from a statement (CSV or PDF) and preview them
    Extract {
        /// Path to the statement file (.csv or .pdf)
        file: PathBuf,

        /// Write the extracted transactions to a CSV file
        /// (default name: transactions_YYYY-MM-DD.csv)
        #[arg(long, num_args = 0..=1)]
        csv: Option<Option<PathBuf>>,

        /// Export the extracted transactions into a new Google Sheet
        #[arg(long)]
        sheets: bool,

        /// Limit number of preview rows printed (default: 25)
        #[arg(long, default_value_t = 25)]
        limit: usize,
    },

    /// Google Sheets connection commands
    #[cfg(feature = "sheets")]
    Sheets {
        #[command(subcommand)]
        command: SheetsCommand,
    },

    /// Store API credentials under ~/.ledgerlift/auth.json
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },

    /// Manage ~/.ledgerlift/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[cfg(feature = "sheets")]
#[derive(Subcommand, Debug)]
enum SheetsCommand {
    /// One-time Google OAuth setup (installed-app flow, tokens cached on disk)
    Connect,

    /// Show whether an OAuth client config and token cache exist
    Status,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Paste an Anthropic API key (sk-ant-…)
    PasteAnthropicKey,

    /// Paste an OpenAI API key (sk-…)
    PasteOpenaiKey,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,

    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Extract {
            file,
            csv,
            sheets,
            limit,
        } => {
            extract_cmd(file, csv, sheets, limit).await?;
        }

        #[cfg(feature = "sheets")]
        Command::Sheets { command } => match command {
            SheetsCommand::Connect => {
                sheets::connect_interactive().await?;
            }
            SheetsCommand::Status => {
                sheets::status()?;
            }
        },

        Command::Auth { command } => match command {
            AuthCommand::PasteAnthropicKey => {
                auth::anthropic_paste_key()?;
            }
            AuthCommand::PasteOpenaiKey => {
                auth::openai_paste_key()?;
            }
        },

        Command::Config { command } => match command {
            ConfigCommand::Init => {
                config::init_config()?;
            }
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init();
}

async fn extract_cmd(
    file: PathBuf,
    csv_out: Option<Option<PathBuf>>,
    to_sheets: bool,
    limit: usize,
) -> Result<()> {
    if !file.exists() {
        bail!("statement not found: {}", file.display());
    }

    let cfg = config::load_config()?;
    let llm_cfg = llm_config_from(&cfg)?;
    let api_key = api_key_for(&llm_cfg)?;

    let statement = Statement::load(&file, cfg.extract.max_csv_chars)?;

    println!("Extracting transactions from {}…\n", file.display());
    let txns = extract_transactions(&statement, &llm_cfg, &api_key).await?;

    display::print_preview(&txns, limit);

    if let Some(maybe_path) = csv_out {
        let out = maybe_path.unwrap_or_else(|| {
            PathBuf::from(ledgerlift_core::default_csv_filename(
                chrono::Utc::now().date_naive(),
            ))
        });
        let body = ledgerlift_core::render_csv(&txns)?;
        std::fs::write(&out, body).with_context(|| format!("write {}", out.display()))?;
        println!("\nWrote {}", out.display());
    }

    if to_sheets {
        export_to_sheets(&cfg, &txns).await?;
    }

    Ok(())
}

#[cfg(feature = "sheets")]
async fn export_to_sheets(
    cfg: &config::Config,
    txns: &[ledgerlift_core::Transaction],
) -> Result<()> {
    let today = chrono::Utc::now().date_naive();
    let url = sheets::export_transactions(
        txns,
        &cfg.sheets.title_prefix,
        &cfg.sheets.tab_title,
        today,
    )
    .await?;
    println!("\nExported {} transactions to Google Sheets:", txns.len());
    println!("  {}", url);
    Ok(())
}

#[cfg(not(feature = "sheets"))]
async fn export_to_sheets(
    _cfg: &config::Config,
    _txns: &[ledgerlift_core::Transaction],
) -> Result<()> {
    bail!("this build does not include Google Sheets support (enable the `sheets` feature)")
}

fn llm_config_from(cfg: &config::Config) -> Result<LlmConfig> {
    let provider = match cfg.llm.provider.as_str() {
        "anthropic" => Provider::Anthropic,
        "openai" => Provider::OpenAI,
        other => bail!("unknown [llm] provider {other:?} (expected \"anthropic\" or \"openai\")"),
    };
    Ok(LlmConfig {
        provider,
        model: cfg.llm.model.clone(),
        max_tokens: cfg.llm.max_tokens,
    })
}

fn api_key_for(cfg: &LlmConfig) -> Result<String> {
    let a = auth::load_auth()?;
    match cfg.provider {
        Provider::Anthropic => a.anthropic_api_key.ok_or_else(|| {
            anyhow::anyhow!("missing anthropic key; run: ledgerlift auth paste-anthropic-key")
        }),
        Provider::OpenAI => a.openai_api_key.ok_or_else(|| {
            anyhow::anyhow!("missing openai key; run: ledgerlift auth paste-openai-key")
        }),
    }
}
