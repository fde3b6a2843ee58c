//! Fixed chat strings shown to the user.

pub const GREETING: &str = "こんにちは！ 操作語を入力して下さい";

pub const THINKING: &str = "考え中...";

pub const USAGE_HINT: &str =
    "\"block 0\"（最新ブロック）や\"block -1\"（1つ前のブロック）など、block情報のみ対応しています。";

pub const BLOCK_FAILURE: &str =
    "ブロックチェーン情報の取得に失敗しました。もう一度お試しください。";

pub const PRICE_FAILURE: &str = "価格情報の取得に失敗しました。もう一度お試しください。";

/// Reply when the input does not start with the active mode's keyword.
pub fn mode_mismatch(keyword: &str) -> String {
    format!("現在の機能選択では操作語「{keyword}」のみ使用できます")
}
