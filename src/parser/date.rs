//! 日付正規化モジュール

use chrono::{Local, NaiveDate};

/// 受け付ける日付フォーマット (優先順)
const DATE_FORMATS: &[&str] = &["%d/%m/%y", "%d%m%y", "%d/%m/%Y", "%Y-%m-%d"];

/// 日付文字列を解析
/// 対応: 29/09/25, 290925, 29/09/2025, 2025-09-29
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    let date_str = date_str.trim();
    if date_str.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_str, fmt).ok())
}

/// 日付を YYYY-MM-DD 形式に正規化
/// 解析できない場合は今日の日付
pub fn normalize_date(date_str: &str) -> String {
    parse_date(date_str)
        .unwrap_or_else(|| Local::now().date_naive())
        .format("%Y-%m-%d")
        .to_string()
}

/// 今日の日付 (YYYY-MM-DD)
pub fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}
