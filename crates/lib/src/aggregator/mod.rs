//! Server-side resolution of chat commands against the upstream APIs.
//!
//! The block path turns a command string into a [`BlockTag`], which may need
//! one extra call for the chain head, and then fetches the block. The price
//! path maps a currency symbol to an upstream slug and fetches one quote.
//! Nothing is cached: every call reaches the upstream and is stamped with a
//! fresh capture time.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::Result;
use crate::clock::{Clock, SystemClock};
use crate::config::UpstreamConfig;
use crate::intent::BlockOffset;
use crate::upstream::{
    BlockSource, BlockTag, CoinGeckoClient, EtherscanClient, PriceSource, http_client,
};

pub mod errors;
pub mod types;

pub use errors::AggregateError;
pub use types::{BlockReport, LATEST_BLOCK_LABEL, PriceQuote};

/// Slug the price API uses for the Internet Computer token.
pub const ICP_SLUG: &str = "internet-computer";

/// Resolves chat lookups against a block source and a price source.
#[derive(Clone)]
pub struct Aggregator {
    blocks: Arc<dyn BlockSource>,
    prices: Arc<dyn PriceSource>,
    clock: Arc<dyn Clock>,
    fiat: String,
}

impl Aggregator {
    pub fn new(
        blocks: Arc<dyn BlockSource>,
        prices: Arc<dyn PriceSource>,
        clock: Arc<dyn Clock>,
        fiat: impl Into<String>,
    ) -> Self {
        Self {
            blocks,
            prices,
            clock,
            fiat: fiat.into(),
        }
    }

    /// Wires the HTTP clients described by `config` with the system clock.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self> {
        let http = http_client(config)?;
        Ok(Self::new(
            Arc::new(EtherscanClient::new(http.clone(), config)),
            Arc::new(CoinGeckoClient::new(http, config)),
            Arc::new(SystemClock),
            config.fiat.clone(),
        ))
    }

    /// The fiat unit quotes are expressed in.
    pub fn fiat(&self) -> &str {
        &self.fiat
    }

    /// Resolves an offset to a concrete tag.
    ///
    /// `Latest` never touches the upstream. Relative offsets fetch the chain
    /// head first; if that fails the whole resolution fails rather than
    /// guessing a tag.
    pub async fn resolve_tag(&self, offset: BlockOffset) -> Result<BlockTag> {
        let (delta, ahead) = match offset {
            BlockOffset::Latest => return Ok(BlockTag::Latest),
            BlockOffset::Ahead(n) => (n, true),
            BlockOffset::Behind(n) => (n, false),
        };

        let latest = self.blocks.latest_block_number().await.map_err(|e| {
            warn!("Failed to fetch latest block number: {e}");
            AggregateError::LatestBlockUnavailable {
                reason: e.to_string(),
            }
        })?;

        let target = if ahead {
            latest.checked_add(delta)
        } else {
            latest.checked_sub(delta)
        };

        match target {
            Some(number) => {
                debug!(latest, number, "Resolved relative block offset");
                Ok(BlockTag::Number(number))
            }
            None => Err(AggregateError::OffsetOutOfRange {
                offset: format!("{}{delta}", if ahead { '+' } else { '-' }),
                latest,
            }
            .into()),
        }
    }

    /// Handles a `block` command string end to end.
    pub async fn block_report(&self, command: &str) -> Result<BlockReport> {
        let offset = BlockOffset::from_command(command);
        let tag = self.resolve_tag(offset).await?;
        info!(%command, %tag, "Fetching block data");

        let block_info = self.blocks.block_by_tag(tag).await?.into_option();

        let block_number = match tag {
            BlockTag::Latest => LATEST_BLOCK_LABEL.to_string(),
            BlockTag::Number(_) => tag.to_string(),
        };

        Ok(BlockReport {
            command: command.to_string(),
            block_number,
            block_info,
            timestamp: self.clock.timestamp(),
        })
    }

    /// Passes a caller-supplied tag straight to the block explorer.
    pub async fn raw_block(&self, tag: &str) -> Result<Value> {
        self.blocks.raw_block(tag).await
    }

    /// Looks up the price of `currency` in the configured fiat unit.
    pub async fn price_quote(&self, currency: &str) -> Result<PriceQuote> {
        let slug = currency_slug(currency);
        let queried = if currency.eq_ignore_ascii_case("icp") {
            ICP_SLUG
        } else {
            currency
        };

        let price = self
            .prices
            .simple_price(&slug, &self.fiat)
            .await?
            .ok_or_else(|| AggregateError::PriceNotFound {
                currency: queried.to_string(),
            })?;

        Ok(PriceQuote {
            currency: currency.to_ascii_uppercase(),
            price,
            timestamp: self.clock.timestamp(),
        })
    }
}

/// Maps a user-facing currency symbol to the price API's slug.
pub fn currency_slug(currency: &str) -> String {
    if currency.eq_ignore_ascii_case("icp") {
        ICP_SLUG.to_string()
    } else {
        currency.to_ascii_lowercase()
    }
}
