//! パッキングリスト生成 - メインエントリポイント

use anyhow::{Context, Result};
use clap::Parser;
use kcb_packlist::Settings;
use kcb_packlist::cli::{self, Cli};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    // 環境変数の読み込み (.env の RUST_LOG もロギングに反映させる)
    dotenvy::dotenv().ok();

    // ロギング初期化 (標準エラーへ出力)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env().context("Failed to load settings")?;

    if cli::run(cli, settings)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
