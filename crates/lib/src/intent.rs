//! Chat command grammar.
//!
//! Two command words are understood:
//!
//! * `block <±N>`: a block relative to the chain head. `block 0` (with any
//!   sign) means the newest block.
//! * `price <symbol>`: the current price of a currency.
//!
//! [`parse_intent`] is the single place where free text becomes a typed
//! [`Intent`]. The server re-parses the command string it receives with
//! [`BlockOffset::from_command`], which is deliberately more lenient.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which command grammar the chat currently accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeatureMode {
    /// Accepts `block` commands.
    #[default]
    BlockExplorer,
    /// Accepts `price` commands.
    PriceChecker,
}

impl FeatureMode {
    /// The command word this mode accepts.
    pub fn keyword(self) -> &'static str {
        match self {
            FeatureMode::BlockExplorer => "block",
            FeatureMode::PriceChecker => "price",
        }
    }

    /// Human label shown in front ends.
    pub fn label(self) -> &'static str {
        match self {
            FeatureMode::BlockExplorer => "EVM Block Explorer",
            FeatureMode::PriceChecker => "ICP価格チェッカー",
        }
    }

    /// Whether `text` starts with this mode's keyword (case-insensitive,
    /// leading whitespace ignored).
    pub fn accepts(self, text: &str) -> bool {
        starts_with_keyword(text.trim_start(), self.keyword())
    }

    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            FeatureMode::BlockExplorer => FeatureMode::PriceChecker,
            FeatureMode::PriceChecker => FeatureMode::BlockExplorer,
        }
    }
}

impl fmt::Display for FeatureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A block selector relative to the chain head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOffset {
    /// The newest block.
    Latest,
    /// `N` blocks after the newest block.
    Ahead(u64),
    /// `N` blocks before the newest block.
    Behind(u64),
}

impl BlockOffset {
    /// Builds an offset from a sign and magnitude. Zero is always `Latest`.
    pub fn from_signed(negative: bool, value: u64) -> Self {
        match (value, negative) {
            (0, _) => BlockOffset::Latest,
            (n, false) => BlockOffset::Ahead(n),
            (n, true) => BlockOffset::Behind(n),
        }
    }

    /// The command string sent to the backend: `block 0` or `block ±N`.
    pub fn to_command(self) -> String {
        match self {
            BlockOffset::Latest => "block 0".to_string(),
            BlockOffset::Ahead(n) => format!("block +{n}"),
            BlockOffset::Behind(n) => format!("block -{n}"),
        }
    }

    /// Server-side reading of a command string.
    ///
    /// Looks for `block`, optional whitespace, a mandatory `+`/`-`, optional
    /// whitespace and digits anywhere in the string (case-insensitive).
    /// Anything else, including an unsigned number, selects `Latest`.
    pub fn from_command(command: &str) -> Self {
        let lower = command.to_ascii_lowercase();
        let mut search = lower.as_str();
        while let Some(at) = search.find("block") {
            let rest = &search[at + "block".len()..];
            if let Some(offset) = signed_offset(rest) {
                return offset;
            }
            search = rest;
        }
        BlockOffset::Latest
    }
}

impl fmt::Display for BlockOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_command())
    }
}

/// What a line of chat input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    BlockQuery { offset: BlockOffset },
    /// `symbol` is the upper-cased currency token.
    PriceQuery { symbol: String },
    Unrecognized,
}

/// Parses one line of chat input.
///
/// The block grammar is tried first, then the price grammar.
pub fn parse_intent(text: &str) -> Intent {
    let text = text.trim();
    if let Some(offset) = parse_block(text) {
        return Intent::BlockQuery { offset };
    }
    if let Some(symbol) = parse_price(text) {
        return Intent::PriceQuery { symbol };
    }
    Intent::Unrecognized
}

/// `block` ws* [+-]? ws* digits ws* end
fn parse_block(text: &str) -> Option<BlockOffset> {
    if !starts_with_keyword(text, "block") {
        return None;
    }
    let rest = text["block".len()..].trim_start();
    let (negative, rest) = match rest.as_bytes().first() {
        Some(b'+') => (false, &rest[1..]),
        Some(b'-') => (true, &rest[1..]),
        _ => (false, rest),
    };
    let rest = rest.trim_start();
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 || !rest[digits_end..].trim().is_empty() {
        return None;
    }
    let value = rest[..digits_end].parse::<u64>().ok()?;
    Some(BlockOffset::from_signed(negative, value))
}

/// `price` ws+ [A-Za-z0-9_-]+ ws* end
fn parse_price(text: &str) -> Option<String> {
    if !starts_with_keyword(text, "price") {
        return None;
    }
    let after = &text["price".len()..];
    let rest = after.trim_start();
    if rest.len() == after.len() {
        return None;
    }
    let token_end = rest
        .find(|c: char| !is_currency_char(c))
        .unwrap_or(rest.len());
    if token_end == 0 || !rest[token_end..].trim().is_empty() {
        return None;
    }
    Some(rest[..token_end].to_ascii_uppercase())
}

/// ws* [+-] ws* digits, with the sign mandatory.
fn signed_offset(rest: &str) -> Option<BlockOffset> {
    let rest = rest.trim_start();
    let negative = match rest.as_bytes().first()? {
        b'+' => false,
        b'-' => true,
        _ => return None,
    };
    let rest = rest[1..].trim_start();
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let value = rest[..digits_end].parse::<u64>().ok()?;
    Some(BlockOffset::from_signed(negative, value))
}

fn is_currency_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    text.get(..keyword.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
}
