//! Formatting of backend replies into chat text.

use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::aggregator::{BlockReport, PriceQuote};
use crate::upstream::parse_hex_quantity;

/// Display offset for capture times (JST).
const DISPLAY_OFFSET_SECS: i32 = 9 * 3600;

/// Multi-line summary of a block report.
pub fn block_reply(report: &BlockReport) -> String {
    let mut out = format!("ブロック {} の情報:\n", report.block_number);

    let Some(info) = &report.block_info else {
        out.push_str("ブロック情報を取得できませんでした。");
        return out;
    };

    let hash = str_field(info, "hash");
    let parent = str_field(info, "parentHash");
    let tx_count = info
        .get("transactions")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);

    out.push_str(&format!(
        "・ハッシュ: {}...{}\n",
        head_or(hash, 12, "なし"),
        tail_from(hash, 60)
    ));
    out.push_str(&format!(
        "・親ハッシュ: {}...{}\n",
        head_or(parent, 8, "なし"),
        tail_from(parent, 60)
    ));
    out.push_str(&format!("・トランザクション数: {tx_count}\n"));
    out.push_str(&format!("・ガス使用量: {}\n", hex_field(info, "gasUsed")));
    out.push_str(&format!("・ガスリミット: {}\n", hex_field(info, "gasLimit")));
    out
}

/// Price reply with the two reference currencies.
pub fn price_reply(quote: &PriceQuote, bitcoin: &PriceQuote, ethereum: &PriceQuote) -> String {
    format!(
        "通貨 {} の現在価格:\n\
         ・価格: ¥{:.2}\n\
         ・取得時刻: {}\n\n\
         その他の通貨:\n\
         ・Bitcoin (BTC): ¥{:.2}\n\
         ・Ethereum (ETH): ¥{:.2}",
        quote.currency,
        quote.price,
        display_time(&quote.timestamp),
        bitcoin.price,
        ethereum.price,
    )
}

/// Renders an ISO-8601 capture time as local display time, falling back to
/// the raw string when it does not parse.
pub fn display_time(timestamp: &str) -> String {
    let Some(offset) = FixedOffset::east_opt(DISPLAY_OFFSET_SECS) else {
        return timestamp.to_string();
    };
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(t) => t
            .with_timezone(&offset)
            .format("%Y/%m/%d %H:%M:%S")
            .to_string(),
        Err(_) => timestamp.to_string(),
    }
}

fn str_field<'a>(info: &'a Value, key: &str) -> Option<&'a str> {
    info.get(key).and_then(Value::as_str)
}

fn hex_field(info: &Value, key: &str) -> u64 {
    str_field(info, key).and_then(parse_hex_quantity).unwrap_or(0)
}

fn head_or<'a>(value: Option<&'a str>, len: usize, fallback: &'a str) -> &'a str {
    match value {
        Some(v) if !v.is_empty() => v.get(..len).unwrap_or(v),
        _ => fallback,
    }
}

fn tail_from(value: Option<&str>, start: usize) -> &str {
    value.and_then(|v| v.get(start..)).unwrap_or("")
}
