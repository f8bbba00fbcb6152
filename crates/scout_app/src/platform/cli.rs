use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use scout_core::{AudienceMode, Condition, MarketplaceId, OpenStrategy};

use super::logging::LogDestination;

#[derive(Debug, Parser)]
#[command(
    name = "flipscout",
    version,
    about = "Search several resale marketplaces at once"
)]
pub struct Cli {
    /// Config file; defaults to ./flipscout.ron when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Where log output goes; overrides the config file.
    #[arg(long, global = true, value_enum)]
    pub log: Option<LogDestination>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build search URLs for the selected marketplaces and open them.
    Search(SearchArgs),
    /// Continue a hand-off chain from an address carrying `#state=`.
    Resume(ResumeArgs),
    /// Estimate profit and ROI on Amazon and eBay.
    Profit(ProfitArgs),
    /// Sign up for the newsletter.
    Subscribe(SubscribeArgs),
    /// List the configured marketplaces and the conditions each supports.
    Marketplaces,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Words to search for.
    #[arg(required = true, num_args = 1..)]
    pub term: Vec<String>,

    /// Marketplace to search; repeat for several. Defaults to all.
    #[arg(short, long = "marketplace")]
    pub marketplaces: Vec<MarketplaceId>,

    /// Condition filter; repeat for several.
    #[arg(short, long = "condition")]
    pub conditions: Vec<Condition>,

    #[arg(long)]
    pub min: Option<String>,

    #[arg(long)]
    pub max: Option<String>,

    /// Target delay between opens in milliseconds; 0 opens all at once.
    #[arg(long)]
    pub throttle_ms: Option<u64>,

    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Print result links without opening anything.
    #[arg(long)]
    pub links_only: bool,

    #[command(flatten)]
    pub navigation: NavigationArgs,
}

#[derive(Debug, Args)]
pub struct ResumeArgs {
    /// Full address including the `#state=` fragment.
    pub address: String,

    #[arg(long)]
    pub links_only: bool,

    #[command(flatten)]
    pub navigation: NavigationArgs,
}

#[derive(Debug, Args)]
pub struct NavigationArgs {
    /// Record navigations instead of launching the browser.
    #[arg(long)]
    pub dry_run: bool,

    /// Refuse navigations to URLs with this prefix (dry runs only).
    #[arg(long = "block", requires = "dry_run")]
    pub blocked: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ProfitArgs {
    /// Cost of goods sold.
    #[arg(long)]
    pub cogs: String,

    /// Expected Amazon sale price.
    #[arg(long)]
    pub amazon: String,

    /// Expected eBay sale price.
    #[arg(long)]
    pub ebay: String,
}

#[derive(Debug, Args)]
pub struct SubscribeArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, value_enum, default_value_t = AudienceArg::Reseller)]
    pub audience: AudienceArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Queue,
    HandOff,
}

impl From<StrategyArg> for OpenStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Queue => OpenStrategy::Queue,
            StrategyArg::HandOff => OpenStrategy::HandOff,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AudienceArg {
    Reseller,
    Collector,
}

impl From<AudienceArg> for AudienceMode {
    fn from(arg: AudienceArg) -> Self {
        match arg {
            AudienceArg::Reseller => AudienceMode::Reseller,
            AudienceArg::Collector => AudienceMode::Collector,
        }
    }
}
