//! 処理パイプライン - 検証 → 解析 → 生成 → PDF出力

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::packing::{OrderInfo, RunSummary, generate_packing_lists};
use crate::parser::{FileMetadata, normalize_date, parse_dat, parse_date, today};
use crate::pdf::{RenderOptions, render_packing_lists};
use crate::upload::validate_upload;
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// 処理オプション
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// 注文日 (省略時は今日)
    pub order_date: Option<String>,
    /// 出力ファイル名 (省略時は自動生成)
    pub output_name: Option<String>,
}

/// 生成済みレポート
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    /// ダウンロード/保存用ファイル名
    pub file_name: String,
    pub pdf: Vec<u8>,
    pub page_count: usize,
    pub metadata: FileMetadata,
    pub summary: RunSummary,
}

/// 1ファイル分の処理結果
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub success: bool,
    pub original: String,
    pub output: Option<PathBuf>,
    pub error: Option<String>,
    pub summary: Option<RunSummary>,
}

/// 一括処理の結果
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    pub results: Vec<FileResult>,
}

impl BatchResult {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }
}

/// パッキングリスト生成サービス
#[derive(Debug, Clone)]
pub struct PackingListService {
    settings: Settings,
}

impl PackingListService {
    pub fn new(settings: &Settings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// アップロードされた内容からPDFを生成
    pub fn process(
        &self,
        file_name: &str,
        content: &[u8],
        options: &ProcessOptions,
    ) -> Result<GeneratedReport> {
        validate_upload(file_name, content.len() as u64, self.settings.max_upload_bytes)?;

        let dat = parse_dat(file_name, content)?;
        let metadata = dat.metadata();
        info!(
            "Parsed {}: run {}, {} orders, {} books",
            file_name, metadata.run_number, metadata.total_orders, metadata.total_books
        );
        if dat.skipped_lines > 0 {
            warn!("{} order lines were skipped in {}", dat.skipped_lines, file_name);
        }

        let books = dat.expand_books()?;
        info!("Expanded {} books", books.len());

        let order = OrderInfo {
            bank_name: self.settings.bank_name.clone(),
            order_number: dat.order_number(&self.settings.order_prefix),
            order_date: resolve_order_date(options.order_date.as_deref()),
        };

        let lists = generate_packing_lists(&books, &order);
        if lists.is_empty() {
            return Err(Error::NoDeliveryBranches);
        }
        info!("Generated {} packing lists for {}", lists.len(), order.order_number);

        let rendered = render_packing_lists(
            &lists,
            &RenderOptions {
                title: Some(format!("Packing List {}", order.order_number)),
                author: Some(order.bank_name.clone()),
                compress: self.settings.compress_pdf,
            },
        )?;
        info!(
            "Rendered {} pages ({} bytes)",
            rendered.page_count,
            rendered.bytes.len()
        );

        let file_name = match &options.output_name {
            Some(name) => with_pdf_extension(name),
            None => download_name(&order.order_number),
        };

        Ok(GeneratedReport {
            file_name,
            pdf: rendered.bytes,
            page_count: rendered.page_count,
            summary: RunSummary::new(&order, metadata.total_orders, &lists),
            metadata,
        })
    }

    /// ファイルを読み込んでPDFを出力ディレクトリに保存
    pub fn process_file(
        &self,
        path: &Path,
        output_dir: &Path,
        options: &ProcessOptions,
    ) -> Result<(PathBuf, GeneratedReport)> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let content = std::fs::read(path)?;

        let mut options = options.clone();
        if options.output_name.is_none() {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
            options.output_name = Some(format!(
                "PackingList_{}_{}",
                stem,
                Local::now().format("%Y%m%d")
            ));
        }

        let report = self.process(&file_name, &content, &options)?;

        std::fs::create_dir_all(output_dir)?;
        let output = output_dir.join(unique_filename(output_dir, &report.file_name));
        std::fs::write(&output, &report.pdf)?;
        info!("Saved {}", output.display());

        Ok((output, report))
    }

    /// 複数ファイルを一括処理 (失敗しても続行)
    /// 出力名の指定は1ファイルのときのみ有効
    pub fn process_files(
        &self,
        paths: &[PathBuf],
        output_dir: &Path,
        options: &ProcessOptions,
    ) -> BatchResult {
        let mut options = options.clone();
        if paths.len() > 1 && options.output_name.take().is_some() {
            warn!("--name is ignored when processing multiple files");
        }

        let mut batch = BatchResult::default();
        for path in paths {
            let original = path.display().to_string();
            let result = match self.process_file(path, output_dir, &options) {
                Ok((output, report)) => FileResult {
                    success: true,
                    original,
                    output: Some(output),
                    error: None,
                    summary: Some(report.summary),
                },
                Err(e) => {
                    error!("Failed to process {}: {}", original, e);
                    FileResult {
                        success: false,
                        original,
                        output: None,
                        error: Some(e.to_string()),
                        summary: None,
                    }
                }
            };
            batch.results.push(result);
        }

        info!(
            "Processed {}/{} files successfully",
            batch.succeeded(),
            batch.total()
        );
        batch
    }
}

/// 注文日を決定 (解析できなければ今日)
fn resolve_order_date(date: Option<&str>) -> String {
    match date {
        Some(value) => {
            if parse_date(value).is_none() {
                warn!("Unrecognised order date {:?}, using today", value);
            }
            normalize_date(value)
        }
        None => today(),
    }
}

/// Web応答用のファイル名 ("PackingList_KCB-000618_20250929_143015.pdf")
pub fn download_name(order_number: &str) -> String {
    format!(
        "PackingList_{}_{}.pdf",
        order_number,
        Local::now().format("%Y%m%d_%H%M%S")
    )
}

fn with_pdf_extension(name: &str) -> String {
    if name.to_ascii_lowercase().ends_with(".pdf") {
        name.to_string()
    } else {
        format!("{}.pdf", name)
    }
}

/// 重複しないファイル名を取得
pub fn unique_filename(directory: &Path, filename: &str) -> String {
    let path = Path::new(filename);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(filename);
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("pdf");

    let mut final_name = filename.to_string();
    let mut counter = 1;

    while directory.join(&final_name).exists() {
        final_name = format!("{}_{}.{}", stem, counter, ext);
        counter += 1;
    }

    final_name
}
