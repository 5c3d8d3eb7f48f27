//! ファイル名からのラン番号抽出

use chrono::Local;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

static KCB_PATTERN: OnceLock<Regex> = OnceLock::new();
static DIGITS_PATTERN: OnceLock<Regex> = OnceLock::new();

/// ファイル名からラン番号 (6桁) を抽出
/// 優先順位: "KCB-618" 形式 > 3〜6桁の数字 > 現在時刻 (月日時)
pub fn extract_run_number(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_name);

    let kcb = KCB_PATTERN.get_or_init(|| Regex::new(r"(?i)KCB-(\d+)").expect("static regex"));
    if let Some(m) = kcb.captures(base).and_then(|c| c.get(1)) {
        return zero_pad(m.as_str());
    }

    let digits = DIGITS_PATTERN.get_or_init(|| Regex::new(r"(\d{3,6})").expect("static regex"));
    if let Some(m) = digits.captures(base).and_then(|c| c.get(1)) {
        return zero_pad(m.as_str());
    }

    // フォールバック: タイムスタンプ
    Local::now().format("%m%d%H").to_string()
}

/// 6桁になるまで先頭を0で埋める
fn zero_pad(digits: &str) -> String {
    format!("{:0>6}", digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kcb_prefix() {
        assert_eq!(extract_run_number("KCB-618.dat"), "000618");
        assert_eq!(extract_run_number("kcb-000618.dat"), "000618");
        assert_eq!(extract_run_number("/tmp/uploads/KCB-12.dat"), "000012");
    }

    #[test]
    fn plain_digits() {
        assert_eq!(extract_run_number("orders_4521.dat"), "004521");
        // 7桁以上は先頭6桁
        assert_eq!(extract_run_number("run1234567.dat"), "123456");
    }

    #[test]
    fn long_kcb_numbers_are_kept() {
        assert_eq!(extract_run_number("KCB-1234567.dat"), "1234567");
    }

    #[test]
    fn fallback_is_six_digits() {
        let run = extract_run_number("orders.dat");
        assert_eq!(run.len(), 6);
        assert!(run.chars().all(|c| c.is_ascii_digit()));
    }
}
