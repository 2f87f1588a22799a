use crate::application::filter::{FilterCriteria, TradeTypeFilter};
use crate::config::AppConfig;
use crate::domain::values::break_type::BreakType;
use crate::domain::values::confirmation_status::ConfirmationStatus;
use crate::domain::values::document_bucket::DocumentBucket;
use crate::domain::values::pending_with::PendingWith;
use crate::domain::values::queue_status::QueueStatus;
use crate::domain::values::risk_level::RiskLevel;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "confirmdesk", version, about = "Trade confirmation desk for equity and FX trades")]
pub struct Cli {
    /// SQLite database path
    #[arg(long, global = true, env = "CONFIRMDESK_DB")]
    pub db: Option<String>,
    /// Seed for enrichment draws, for reproducible runs
    #[arg(long, global = true, env = "CONFIRMDESK_SEED")]
    pub seed: Option<u64>,
    /// Equity dataset (path or http(s) URL)
    #[arg(long, global = true, env = "CONFIRMDESK_EQUITY_SOURCE")]
    pub equity: Option<String>,
    /// FX dataset (path or http(s) URL)
    #[arg(long, global = true, env = "CONFIRMDESK_FX_SOURCE")]
    pub fx: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Command-line flags win over the environment.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(equity) = &self.equity {
            config.equity_source = equity.clone();
        }
        if let Some(fx) = &self.fx {
            config.fx_source = fx.clone();
        }
        if let Commands::Serve { host, port } = &self.command {
            if let Some(host) = host {
                config.host = host.clone();
            }
            if let Some(port) = port {
                config.port = *port;
            }
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load both datasets and print the import report
    Load {
        /// Also copy the loaded trades and their workflows to the database
        #[arg(long)]
        persist: bool,
    },
    /// Import an arbitrary CSV sheet by matching its headers
    Upload {
        file: PathBuf,
        #[arg(long)]
        persist: bool,
    },
    /// List trades matching the filter
    Trades {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Counts for the filtered view
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Distinct counterparties, currencies and traders
    Facets,
    /// Confirmation workflow of every trade
    Workflows,
    /// Steps that need someone to act
    Actions,
    /// Break analyses for failed and disputed trades
    Failures,
    /// Document pack of one trade
    Documents { trade_id: String },
    /// Counts from the database
    Stats,
    /// Serve the HTTP API
    Serve {
        #[arg(long, env = "CONFIRMDESK_HOST")]
        host: Option<String>,
        #[arg(long, env = "CONFIRMDESK_PORT")]
        port: Option<u16>,
    },
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// all, equity or fx
    #[arg(long, default_value = "all")]
    pub trade_type: TradeTypeFilter,
    #[arg(long)]
    pub status: Option<ConfirmationStatus>,
    #[arg(long)]
    pub counterparty: Option<String>,
    /// Earliest trade date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Latest trade date (YYYY-MM-DD), inclusive
    #[arg(long)]
    pub to: Option<NaiveDate>,
    #[arg(long)]
    pub currency: Option<String>,
    #[arg(long)]
    pub trader: Option<String>,
    #[arg(long)]
    pub risk: Option<RiskLevel>,
    /// complete, pending or missing
    #[arg(long)]
    pub documents: Option<DocumentBucket>,
    #[arg(long)]
    pub break_type: Option<BreakType>,
    #[arg(long)]
    pub pending_with: Option<PendingWith>,
    #[arg(long)]
    pub queue: Option<QueueStatus>,
}

impl From<FilterArgs> for FilterCriteria {
    fn from(args: FilterArgs) -> Self {
        FilterCriteria {
            trade_type: args.trade_type,
            status: args.status,
            counterparty: args.counterparty,
            date_from: args.from,
            date_to: args.to,
            currency: args.currency,
            trader: args.trader,
            risk_level: args.risk,
            document_status: args.documents,
            break_type: args.break_type,
            pending_with: args.pending_with,
            queue_status: args.queue,
        }
    }
}
