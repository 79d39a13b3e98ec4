//! Nexus voting client: entry point.

mod display;

use anyhow::Context;
use clap::Parser;
use nexus_backend::BackendServer;
use nexus_history::EtherscanClient;
use nexus_provider::{HttpProvider, LedgerClient};
use nexus_session::{ClientConfig, SessionController, UiStatus};
use nexus_types::{CandidateId, NetworkId, Timestamp};
use nexus_utils::{init_logging, LogFormat};
use std::path::PathBuf;
use std::sync::Arc;

use crate::display::{candidate_line, enrich, history_line, tx_link};

#[derive(Parser)]
#[command(name = "nexus", about = "Vote on the Nexus candidate contract")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "NEXUS_CONFIG")]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint of the wallet provider.
    #[arg(long, env = "NEXUS_PROVIDER_URL")]
    provider_url: Option<String>,

    /// Address of the voting contract.
    #[arg(long, env = "NEXUS_CONTRACT")]
    contract: Option<String>,

    /// Network: "mainnet", "sepolia" or "holesky".
    #[arg(long, env = "NEXUS_NETWORK")]
    network: Option<NetworkId>,

    /// API key for the transaction history service.
    #[arg(long, env = "NEXUS_HISTORY_API_KEY")]
    api_key: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "NEXUS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "NEXUS_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Connect and list the candidates with their current vote counts.
    Candidates,
    /// Cast a vote and wait for it to be confirmed.
    Vote {
        /// Candidate id as listed by `candidates`.
        id: CandidateId,
    },
    /// Show the connected account's recent transactions.
    History {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Run the backend health endpoint.
    Serve {
        #[arg(long, env = "NEXUS_BACKEND_PORT")]
        port: Option<u16>,
    },
}

type Controller = SessionController<HttpProvider, EtherscanClient>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => ClientConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(url) = cli.provider_url {
        config.provider_url = Some(url);
    }
    if let Some(contract) = cli.contract {
        config.contract_address = contract;
    }
    if let Some(network) = cli.network {
        config.network = network;
    }
    if let Some(key) = cli.api_key {
        config.history_api_key = key;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    init_logging(config.log_format, &config.log_level);

    match cli.command {
        Command::Serve { port } => {
            let port = port.unwrap_or(config.backend_port);
            BackendServer::new(port).serve().await?;
        }
        Command::Candidates => {
            let controller = build_controller(&config)?;
            connect(&controller).await?;
            print_candidates(&controller, &config);
        }
        Command::Vote { id } => {
            let controller = build_controller(&config)?;
            connect(&controller).await?;
            vote(&controller, &config, id).await?;
        }
        Command::History { limit } => {
            if let Some(limit) = limit {
                config.history_limit = limit;
            }
            let controller = build_controller(&config)?;
            connect(&controller).await?;
            let state = controller.snapshot();
            if state.history.is_empty() {
                println!("No transactions found.");
            }
            let now = Timestamp::now();
            for record in &state.history {
                println!("{}", history_line(config.network, record, now));
            }
        }
    }

    Ok(())
}

fn build_controller(config: &ClientConfig) -> anyhow::Result<Controller> {
    let settings = config.session_settings()?;
    let ledger = match config.provider_url {
        Some(ref url) => LedgerClient::new(Arc::new(HttpProvider::new(url.clone())?)),
        None => LedgerClient::without_provider(),
    };
    let history = EtherscanClient::new(config.history_api_url(), config.history_api_key.clone());
    tracing::info!(
        network = config.network.as_str(),
        contract = %settings.contract_address,
        "client configured"
    );
    Ok(SessionController::new(ledger, history, settings))
}

async fn connect(controller: &Controller) -> anyhow::Result<()> {
    match controller.connect().await {
        Ok(account) => {
            println!("Connected as {account}");
            Ok(())
        }
        Err(e) => {
            if let Some(notice) = controller.snapshot().notice {
                eprintln!("{notice}");
            }
            Err(e).context("wallet connection failed")
        }
    }
}

fn print_candidates(controller: &Controller, config: &ClientConfig) {
    let state = controller.snapshot();
    if state.candidates.is_empty() {
        println!("No candidates registered.");
    }
    for candidate in &state.candidates {
        let shown = enrich(candidate, config.candidate_meta(candidate.id));
        println!("{}", candidate_line(&shown));
        if !shown.description.is_empty() {
            println!("      {}", shown.description);
        }
    }
}

async fn vote(controller: &Controller, config: &ClientConfig, id: CandidateId) -> anyhow::Result<()> {
    let mut rx = controller.subscribe();
    let mut last = UiStatus::Idle;
    let mut show = |status: UiStatus| {
        if status != last && status != UiStatus::Idle {
            println!("{status}");
        }
        last = status;
    };

    let submission = controller.vote(id);
    tokio::pin!(submission);
    let result = loop {
        tokio::select! {
            result = &mut submission => break result,
            Ok(()) = rx.changed() => show(rx.borrow_and_update().status.clone()),
        }
    };
    show(controller.snapshot().status);

    match result {
        Ok(receipt) => {
            println!("{}", tx_link(config.network, &receipt.transaction_hash));
            print_candidates(controller, config);
            Ok(())
        }
        Err(e) => {
            if let Some(notice) = controller.snapshot().notice {
                eprintln!("{notice}");
            }
            Err(e).context(format!("vote for candidate {id} failed"))
        }
    }
}
