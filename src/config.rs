//! 設定 - 環境変数 (.env) から読み込み

use crate::error::{Error, Result};
use crate::packing::DEFAULT_BANK_NAME;
use crate::upload::DEFAULT_MAX_UPLOAD_BYTES;
use std::path::PathBuf;
use std::str::FromStr;

/// アプリケーション設定
#[derive(Debug, Clone)]
pub struct Settings {
    /// 待ち受けアドレス
    pub bind: String,
    pub port: u16,
    /// アップロード上限 (バイト)
    pub max_upload_bytes: u64,
    /// CLIのPDF出力先
    pub output_dir: PathBuf,
    /// PDFに表示する銀行名
    pub bank_name: String,
    /// 注文番号の接頭辞 ("KCB-000618" の "KCB")
    pub order_prefix: String,
    pub compress_pdf: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8000,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            output_dir: PathBuf::from("output/packing_lists"),
            bank_name: DEFAULT_BANK_NAME.to_string(),
            order_prefix: "KCB".to_string(),
            compress_pdf: true,
        }
    }
}

impl Settings {
    /// 環境変数から読み込み
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の取得関数から読み込み (未設定の項目は既定値)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            bind: get("PACKLIST_BIND").unwrap_or(defaults.bind),
            port: parse_or(get("PACKLIST_PORT"), "PACKLIST_PORT", defaults.port)?,
            max_upload_bytes: parse_or(
                get("PACKLIST_MAX_UPLOAD_BYTES"),
                "PACKLIST_MAX_UPLOAD_BYTES",
                defaults.max_upload_bytes,
            )?,
            output_dir: get("PACKLIST_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            bank_name: get("PACKLIST_BANK_NAME").unwrap_or(defaults.bank_name),
            order_prefix: get("PACKLIST_ORDER_PREFIX").unwrap_or(defaults.order_prefix),
            compress_pdf: match get("PACKLIST_COMPRESS_PDF") {
                Some(value) => parse_bool("PACKLIST_COMPRESS_PDF", &value)?,
                None => defaults.compress_pdf,
            },
        })
    }

    /// 待ち受けアドレス ("127.0.0.1:8000")
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| Error::Config {
            key: key.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.address(), "127.0.0.1:8000");
        assert_eq!(s.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(s.bank_name, "KCB Bank Ltd");
        assert_eq!(s.order_prefix, "KCB");
        assert!(s.compress_pdf);
    }

    #[test]
    fn overrides_from_environment() {
        let s = settings(&[
            ("PACKLIST_BIND", "0.0.0.0"),
            ("PACKLIST_PORT", "9090"),
            ("PACKLIST_MAX_UPLOAD_BYTES", "2048"),
            ("PACKLIST_OUTPUT_DIR", "/srv/packing"),
            ("PACKLIST_COMPRESS_PDF", "off"),
        ])
        .unwrap();
        assert_eq!(s.address(), "0.0.0.0:9090");
        assert_eq!(s.max_upload_bytes, 2048);
        assert_eq!(s.output_dir, PathBuf::from("/srv/packing"));
        assert!(!s.compress_pdf);
    }

    #[test]
    fn blank_values_use_defaults() {
        let s = settings(&[("PACKLIST_PORT", "  ")]).unwrap();
        assert_eq!(s.port, 8000);
    }

    #[test]
    fn malformed_values_are_errors() {
        let err = settings(&[("PACKLIST_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PACKLIST_PORT"));

        assert!(settings(&[("PACKLIST_COMPRESS_PDF", "maybe")]).is_err());
    }
}
