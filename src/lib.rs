//! KCB小切手帳パッキングリスト - DATファイルからPDFを生成
//!
//! # 機能
//! - DATファイル (固定長210文字レコード) の検証と解析
//! - 注文を冊数分に展開し、配送支店ごとにパッキングリストを作成
//! - A4のPDFレポート出力
//! - アップロード用Webサーバーとコマンドライン

pub mod cli;
pub mod config;
pub mod error;
pub mod packing;
pub mod parser;
pub mod pdf;
pub mod service;
pub mod upload;
pub mod web;

pub use config::Settings;
pub use error::{Error, Result};
pub use packing::{PackingList, RunSummary};
pub use service::{GeneratedReport, PackingListService, ProcessOptions};
