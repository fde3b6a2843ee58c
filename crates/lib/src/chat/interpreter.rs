//! Turns chat input into backend lookups and system replies.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::message::{ChatLog, ChatMessage};
use super::{render, text};
use crate::Result;
use crate::aggregator::{Aggregator, BlockReport, PriceQuote};
use crate::intent::{BlockOffset, FeatureMode, Intent, parse_intent};

/// Reference currencies quoted alongside every price reply.
const REFERENCE_CURRENCIES: [&str; 2] = ["bitcoin", "ethereum"];

/// The two backend lookups the chat needs.
///
/// [`HttpChatApi`](super::HttpChatApi) reaches a running server; the
/// [`Aggregator`] implementation answers in-process.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Resolves a `block ...` command string.
    async fn block(&self, command: &str) -> Result<BlockReport>;

    /// Quotes one currency.
    async fn price(&self, currency: &str) -> Result<PriceQuote>;
}

#[async_trait]
impl ChatApi for Aggregator {
    async fn block(&self, command: &str) -> Result<BlockReport> {
        self.block_report(command).await
    }

    async fn price(&self, currency: &str) -> Result<PriceQuote> {
        self.price_quote(currency).await
    }
}

#[async_trait]
impl<T: ChatApi + ?Sized> ChatApi for Arc<T> {
    async fn block(&self, command: &str) -> Result<BlockReport> {
        (**self).block(command).await
    }

    async fn price(&self, currency: &str) -> Result<PriceQuote> {
        (**self).price(currency).await
    }
}

/// What a line of input should do under the active mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The input does not start with the mode's keyword.
    ModeMismatch,
    Block(BlockOffset),
    /// Upper-cased display symbol.
    Price(String),
    Unrecognized,
}

/// Classifies `text` under `mode`.
///
/// Mode gating comes first, so a `price` command in block mode is a
/// mismatch even though it would parse.
pub fn classify(mode: FeatureMode, text: &str) -> Dispatch {
    if !mode.accepts(text) {
        return Dispatch::ModeMismatch;
    }
    match parse_intent(text) {
        Intent::BlockQuery { offset } => Dispatch::Block(offset),
        Intent::PriceQuery { symbol } => Dispatch::Price(symbol),
        Intent::Unrecognized => Dispatch::Unrecognized,
    }
}

/// A submitted line whose reply has not arrived yet.
///
/// Returned by [`ChatSession::begin`]; the log already ends with the
/// thinking placeholder while one of these is outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pending {
    mode: FeatureMode,
    dispatch: Dispatch,
}

impl Pending {
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Whether resolving this line will call the backend.
    pub fn needs_backend(&self) -> bool {
        matches!(self.dispatch, Dispatch::Block(_) | Dispatch::Price(_))
    }

    /// Produces the reply, calling `api` if the line needs it.
    pub async fn resolve<A: ChatApi + ?Sized>(&self, api: &A) -> ChatMessage {
        answer(api, self.mode, &self.dispatch).await
    }
}

/// One chat conversation bound to a backend.
pub struct ChatSession<A> {
    mode: FeatureMode,
    log: ChatLog,
    api: A,
    awaiting_reply: bool,
}

impl<A: ChatApi> ChatSession<A> {
    /// A block-explorer session holding only the greeting.
    pub fn new(api: A) -> Self {
        Self {
            mode: FeatureMode::default(),
            log: ChatLog::new(),
            api,
            awaiting_reply: false,
        }
    }

    pub fn mode(&self) -> FeatureMode {
        self.mode
    }

    /// Switches mode and restarts the conversation. An outstanding reply is
    /// discarded when it completes.
    pub fn set_mode(&mut self, mode: FeatureMode) {
        self.mode = mode;
        self.awaiting_reply = false;
        self.log.reset_with_greeting();
    }

    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Whether the log currently ends with the thinking placeholder.
    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// Appends the user message and the thinking placeholder.
    ///
    /// Blank input is ignored and returns `None`. The caller resolves the
    /// returned [`Pending`] against [`api`](Self::api) and hands the reply
    /// to [`complete`](Self::complete).
    pub fn begin(&mut self, input: &str) -> Option<Pending> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        self.log.push(ChatMessage::user(input));
        self.log.push(ChatMessage::system(text::THINKING));
        self.awaiting_reply = true;

        Some(Pending {
            mode: self.mode,
            dispatch: classify(self.mode, input),
        })
    }

    /// Replaces the thinking placeholder with `reply`.
    ///
    /// Returns `None` and drops the reply if nothing is outstanding, which
    /// happens when the mode was switched while the reply was in flight.
    pub fn complete(&mut self, reply: ChatMessage) -> Option<&ChatMessage> {
        if !self.awaiting_reply {
            debug!("Dropping reply for a conversation that was reset");
            return None;
        }
        self.awaiting_reply = false;
        self.log.replace_last(reply);
        self.log.last()
    }

    /// Handles one line of input from start to finish.
    pub async fn submit(&mut self, input: &str) -> Option<&ChatMessage> {
        let pending = self.begin(input)?;
        let reply = pending.resolve(&self.api).await;
        self.complete(reply)
    }
}

/// Produces the single system reply for `input` under `mode`.
///
/// Backend failures become failure messages; this never errors.
pub async fn respond<A: ChatApi + ?Sized>(api: &A, mode: FeatureMode, input: &str) -> ChatMessage {
    answer(api, mode, &classify(mode, input)).await
}

async fn answer<A: ChatApi + ?Sized>(api: &A, mode: FeatureMode, dispatch: &Dispatch) -> ChatMessage {
    match dispatch {
        Dispatch::ModeMismatch => ChatMessage::system(text::mode_mismatch(mode.keyword())),
        Dispatch::Unrecognized => ChatMessage::system(text::USAGE_HINT),
        Dispatch::Block(offset) => {
            let command = offset.to_command();
            debug!(%command, "Requesting block");
            match api.block(&command).await {
                Ok(report) => {
                    ChatMessage::system(render::block_reply(&report)).with_block(report.into())
                }
                Err(e) => {
                    warn!(%command, error = %e, "Block lookup failed");
                    ChatMessage::system(text::BLOCK_FAILURE)
                }
            }
        }
        Dispatch::Price(symbol) => {
            debug!(%symbol, "Requesting price");
            let [bitcoin, ethereum] = REFERENCE_CURRENCIES;
            let lookups = tokio::try_join!(
                api.price(symbol),
                api.price(bitcoin),
                api.price(ethereum)
            );
            match lookups {
                Ok((quote, btc, eth)) => ChatMessage::system(render::price_reply(&quote, &btc, &eth)),
                Err(e) => {
                    warn!(%symbol, error = %e, "Price lookup failed");
                    ChatMessage::system(text::PRICE_FAILURE)
                }
            }
        }
    }
}
