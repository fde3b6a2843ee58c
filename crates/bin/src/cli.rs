//! CLI argument definitions for the chainpad binary.

use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use chainpad::{
    FeatureMode, UpstreamConfig,
    config::{DEFAULT_COINGECKO_URL, DEFAULT_ETHERSCAN_URL, DEFAULT_FIAT},
};

/// Chainpad editor backend
#[derive(Parser, Debug)]
#[command(name = "chainpad")]
#[command(about = "Chainpad: editor backend with a block explorer and price checker chat")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the chainpad server
    Serve(ServeArgs),
    /// Check health of a running chainpad server
    Health(HealthArgs),
    /// Send one chat line and print the reply
    Ask(AskArgs),
}

/// Third-party API settings shared by `serve` and `ask`.
#[derive(clap::Args, Debug)]
pub struct UpstreamArgs {
    /// Etherscan-compatible API endpoint
    #[arg(long, default_value = DEFAULT_ETHERSCAN_URL, env = "ETHERSCAN_URL")]
    pub etherscan_url: String,

    /// Etherscan API key (anonymous, rate-limited access when unset)
    #[arg(long, env = "ETHERSCAN_API_KEY", hide_env_values = true)]
    pub etherscan_api_key: Option<String>,

    /// CoinGecko-compatible API root
    #[arg(long, default_value = DEFAULT_COINGECKO_URL, env = "COINGECKO_URL")]
    pub coingecko_url: String,

    /// CoinGecko API key, sent as a bearer token
    #[arg(long, env = "COINGECKO_API_KEY", hide_env_values = true)]
    pub coingecko_api_key: Option<String>,

    /// Fiat unit for price quotes
    #[arg(long, default_value = DEFAULT_FIAT, env = "CHAINPAD_FIAT")]
    pub fiat: String,

    /// Timeout for each upstream call, in seconds
    #[arg(long, default_value_t = 10, env = "CHAINPAD_UPSTREAM_TIMEOUT")]
    pub upstream_timeout: u64,
}

impl UpstreamArgs {
    pub fn to_config(&self) -> chainpad::Result<UpstreamConfig> {
        Ok(UpstreamConfig::new(&self.etherscan_url, &self.coingecko_url)?
            .with_etherscan_key(self.etherscan_api_key.clone())
            .with_coingecko_key(self.coingecko_api_key.clone())
            .with_fiat(&self.fiat)
            .with_timeout(Duration::from_secs(self.upstream_timeout)))
    }
}

/// Arguments for the serve command
#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value_t = 5000, env = "CHAINPAD_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(long, default_value = "0.0.0.0", env = "CHAINPAD_HOST")]
    pub host: String,

    /// Seed the store with the demo user and file tree
    #[arg(long)]
    pub demo_data: bool,

    #[command(flatten)]
    pub upstream: UpstreamArgs,
}

/// Arguments for the health command
#[derive(clap::Args, Debug)]
pub struct HealthArgs {
    /// Port of the server to check
    #[arg(short, long, default_value_t = 5000, env = "CHAINPAD_PORT")]
    pub port: u16,

    /// Host of the server to check
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Timeout in seconds
    #[arg(short, long, default_value_t = 5)]
    pub timeout: u64,
}

/// Which command word the chat accepts
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Mode {
    /// `block ±N`
    Block,
    /// `price SYMBOL`
    Price,
}

impl From<Mode> for FeatureMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Block => FeatureMode::BlockExplorer,
            Mode::Price => FeatureMode::PriceChecker,
        }
    }
}

/// Arguments for the ask command
#[derive(clap::Args, Debug)]
pub struct AskArgs {
    /// Active feature mode
    #[arg(short, long, value_enum, default_value = "block")]
    pub mode: Mode,

    /// Chainpad server to ask; answers in-process from the upstream APIs when unset
    #[arg(short, long, env = "CHAINPAD_SERVER")]
    pub server: Option<String>,

    /// Timeout for the server call, in seconds
    #[arg(short, long, default_value_t = 30)]
    pub timeout: u64,

    /// Print the reply as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub upstream: UpstreamArgs,

    /// The chat line, e.g. `block -1` or `price icp`
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub text: Vec<String>,
}
