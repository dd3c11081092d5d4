//! Charity governance daemon: runs one call against a persistent node.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use dac_governance::NewProposal;
use dac_node::{init_logging, open_lmdb, Call, LmdbNode, NodeConfig, NodeError};
use dac_types::{Address, Amount, ProposalId, TokenId};
use serde_json::json;

#[derive(Parser)]
#[command(name = "dac-daemon", about = "Decentralized autonomous charity ledger")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "DAC_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for ledger storage.
    #[arg(long, env = "DAC_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "DAC_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "DAC_LOG_FORMAT")]
    log_format: Option<String>,

    /// Advance one block after every accepted call.
    #[arg(long, env = "DAC_AUTO_ADVANCE")]
    auto_advance: bool,

    /// Address the call is submitted from.
    #[arg(long = "from", env = "DAC_SENDER", value_parser = parse_address)]
    sender: Option<Address>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Choice {
    Yes,
    No,
}

#[derive(Subcommand)]
enum Command {
    /// Donate to the treasury (amount in micro-units, 1 token = 1000000).
    Donate { amount: u128 },

    /// Create a funding proposal.
    Propose {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_parser = parse_address)]
        beneficiary: Address,
        /// Requested amount in micro-units.
        #[arg(long)]
        amount: u128,
        /// Voting window in blocks.
        #[arg(long)]
        duration: u64,
    },

    /// Vote on an open proposal.
    Vote { proposal_id: u64, choice: Choice },

    /// Execute a closed, passing proposal.
    Execute { proposal_id: u64 },

    /// Mint a donation receipt.
    Mint { metadata_uri: String },

    /// Advance the chain height.
    Mine {
        #[arg(default_value_t = 1)]
        blocks: u64,
    },

    /// Show one proposal.
    Proposal { proposal_id: u64 },

    /// List proposals.
    Proposals {
        #[arg(long, default_value_t = 1)]
        from: u64,
        #[arg(long, default_value_t = 20)]
        count: usize,
        /// Only proposals still accepting votes.
        #[arg(long)]
        active: bool,
    },

    /// Governance credits held by an address.
    Tokens {
        #[arg(value_parser = parse_address)]
        address: Address,
    },

    /// Whether an address has voted on a proposal.
    HasVoted {
        proposal_id: u64,
        #[arg(value_parser = parse_address)]
        address: Address,
    },

    /// Show one donation receipt.
    Receipt { token_id: u64 },

    /// Treasury and participation figures.
    Stats,

    /// Audit snapshot of contributor balances.
    Snapshot {
        /// Also write the bincode-encoded snapshot to this file.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the effective configuration.
    Config,
}

fn parse_address(s: &str) -> Result<Address, String> {
    Address::parse(s).map_err(|e| e.to_string())
}

fn load_config(cli: &Cli) -> anyhow::Result<NodeConfig> {
    let mut config = match &cli.config {
        Some(path) => NodeConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => NodeConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    config.auto_advance |= cli.auto_advance;
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(config.log_format()?, &config.log_level)?;

    if let Command::Config = cli.command {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    tracing::debug!(data_dir = %config.data_dir.display(), "opening node");
    let mut node = open_lmdb(config).context("opening ledger")?;

    let call = match &cli.command {
        Command::Donate { amount } => Some(Call::Donate {
            amount: Amount::new(*amount),
        }),
        Command::Propose {
            title,
            description,
            beneficiary,
            amount,
            duration,
        } => Some(Call::CreateProposal(NewProposal {
            title: title.clone(),
            description: description.clone(),
            beneficiary: beneficiary.clone(),
            requested_amount: Amount::new(*amount),
            duration_blocks: *duration,
        })),
        Command::Vote {
            proposal_id,
            choice,
        } => Some(Call::Vote {
            proposal_id: ProposalId::new(*proposal_id),
            support: matches!(choice, Choice::Yes),
        }),
        Command::Execute { proposal_id } => Some(Call::ExecuteProposal {
            proposal_id: ProposalId::new(*proposal_id),
        }),
        Command::Mint { metadata_uri } => Some(Call::MintReceipt {
            metadata_uri: metadata_uri.clone(),
        }),
        _ => None,
    };

    let output = match call {
        Some(call) => {
            let Some(sender) = &cli.sender else {
                bail!("--from <ADDRESS> (or DAC_SENDER) is required for {}", call.name());
            };
            match node.submit(sender, call) {
                Ok(outcome) => json!({ "ok": true, "height": node.height(), "result": outcome }),
                Err(e) => return report_failure(e),
            }
        }
        None => query(&mut node, &cli.command)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn query(node: &mut LmdbNode, command: &Command) -> anyhow::Result<serde_json::Value> {
    let value = match command {
        Command::Mine { blocks } => {
            let height = node.advance(*blocks)?;
            json!({ "height": height })
        }
        Command::Proposal { proposal_id } => {
            let id = ProposalId::new(*proposal_id);
            match node.get_proposal(id) {
                Ok(proposal) => json!({
                    "proposal": proposal,
                    "status": node.proposal_status(id)?,
                    "payout": node.get_payout(id)?,
                }),
                Err(e) => return report_failure(e),
            }
        }
        Command::Proposals {
            from,
            count,
            active,
        } => {
            if *active {
                json!({ "height": node.height(), "proposals": node.active_proposals() })
            } else {
                json!({ "height": node.height(), "proposals": node.list_proposals(*from, *count) })
            }
        }
        Command::Tokens { address } => json!({
            "address": address,
            "credits": node.get_donor_tokens(address),
            "account": node.get_contributor(address),
            "receipts": node.receipts_of(address),
        }),
        Command::HasVoted {
            proposal_id,
            address,
        } => {
            let id = ProposalId::new(*proposal_id);
            json!({
                "voted": node.has_voted(id, address),
                "vote": node.get_vote(id, address),
            })
        }
        Command::Receipt { token_id } => {
            let id = TokenId::new(*token_id);
            match node.get_receipt(id) {
                Some(receipt) => json!({ "receipt": receipt }),
                None => bail!("{id} not found"),
            }
        }
        Command::Stats => json!({ "height": node.height(), "stats": node.fund_stats() }),
        Command::Snapshot { out } => {
            let snapshot = node.snapshot();
            if let Some(path) = out {
                std::fs::write(path, snapshot.to_bytes()?)
                    .with_context(|| format!("writing snapshot to {}", path.display()))?;
                tracing::info!(path = %path.display(), "snapshot written");
            }
            json!({
                "height": snapshot.height,
                "hash": hex::encode(snapshot.hash),
                "verified": snapshot.verify(),
                "contributors": snapshot.contributor_count(),
                "totals": snapshot.totals,
            })
        }
        Command::Donate { .. }
        | Command::Propose { .. }
        | Command::Vote { .. }
        | Command::Execute { .. }
        | Command::Mint { .. }
        | Command::Config => bail!("not a query"),
    };
    Ok(value)
}

/// Domain failures are reported as JSON with their contract-style code;
/// infrastructure failures propagate as errors.
fn report_failure<T>(e: NodeError) -> anyhow::Result<T> {
    let Some(kind) = e.kind() else {
        return Err(e.into());
    };
    let output = json!({
        "ok": false,
        "error": kind.name(),
        "code": kind.code(),
        "message": e.to_string(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    std::process::exit(1);
}
