//! アップロード画面 (Bootstrap + maud)

use crate::upload::format_limit;
use maud::{DOCTYPE, Markup, PreEscaped, html};

/// カラーパレット
pub struct Colors;

impl Colors {
    pub const BG_DARK: &'static str = "#0a0f1a";
    pub const BG_CARD: &'static str = "#121a2d";
    pub const ACCENT: &'static str = "#1a237e";
    pub const ACCENT_HOVER: &'static str = "#283593";
    pub const TEXT_PRIMARY: &'static str = "#ffffff";
    pub const TEXT_SECONDARY: &'static str = "#8b9dc3";
    pub const ERROR: &'static str = "#f87171";
    pub const BORDER: &'static str = "#2a3a5c";
}

const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";

/// フォーム送信後にPDFをダウンロード、失敗時はJSONのエラーを表示
const UPLOAD_SCRIPT: &str = r#"
document.getElementById('upload-form').addEventListener('submit', async (event) => {
  event.preventDefault();
  const error = document.getElementById('error');
  error.textContent = '';
  const response = await fetch('/process', { method: 'POST', body: new FormData(event.target) });
  if (!response.ok) {
    const body = await response.json().catch(() => ({ error: response.statusText }));
    error.textContent = body.error;
    return;
  }
  const disposition = response.headers.get('Content-Disposition') || '';
  const match = disposition.match(/filename="([^"]+)"/);
  const link = document.createElement('a');
  link.href = URL.createObjectURL(await response.blob());
  link.download = match ? match[1] : 'PackingList.pdf';
  link.click();
  URL.revokeObjectURL(link.href);
});
"#;

fn stylesheet() -> String {
    format!(
        "body {{ background: {bg}; color: {text}; }}\n\
         .card {{ background: {card}; border: 1px solid {border}; color: {text}; }}\n\
         .text-muted-custom {{ color: {muted}; }}\n\
         .btn-accent {{ background: {accent}; color: {text}; }}\n\
         .btn-accent:hover {{ background: {hover}; color: {text}; }}\n\
         #error {{ color: {error}; }}\n",
        bg = Colors::BG_DARK,
        card = Colors::BG_CARD,
        border = Colors::BORDER,
        text = Colors::TEXT_PRIMARY,
        muted = Colors::TEXT_SECONDARY,
        accent = Colors::ACCENT,
        hover = Colors::ACCENT_HOVER,
        error = Colors::ERROR,
    )
}

/// アップロード画面
pub fn upload_page(bank_name: &str, max_upload_bytes: u64) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Packing List Generator" }
                link rel="stylesheet" href=(BOOTSTRAP_CSS);
                style { (PreEscaped(stylesheet())) }
            }
            body {
                div class="container py-5" style="max-width: 640px" {
                    div class="card shadow" {
                        div class="card-body p-4" {
                            h1 class="h4 mb-1" { "Packing List Generator" }
                            p class="text-muted-custom mb-4" { (bank_name) " cheque book orders" }
                            form id="upload-form" action="/process" method="post" enctype="multipart/form-data" {
                                div class="mb-3" {
                                    label for="dat_file" class="form-label" { "Order file (.dat)" }
                                    input class="form-control" type="file" id="dat_file" name="dat_file" accept=".dat" required;
                                    div class="form-text text-muted-custom" {
                                        "Maximum size " (format_limit(max_upload_bytes))
                                    }
                                }
                                button type="submit" class="btn btn-accent w-100" { "Generate PDF" }
                            }
                            div id="error" class="mt-3" {}
                        }
                    }
                }
                script { (PreEscaped(UPLOAD_SCRIPT)) }
            }
        }
    }
}

/// アップロード画面のHTMLを生成
pub fn render(bank_name: &str, max_upload_bytes: u64) -> String {
    upload_page(bank_name, max_upload_bytes).into_string()
}
