//! Webサーバー - アップロード画面とPDF生成エンドポイント

mod page;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::service::{GeneratedReport, PackingListService, ProcessOptions};
use crate::upload::UploadError;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

/// アップロードのフィールド名
pub const UPLOAD_FIELD: &str = "dat_file";

/// マルチパートのヘッダー等に見込む余裕
const BODY_SLACK: usize = 64 * 1024;

#[derive(Clone)]
struct AppState {
    service: Arc<PackingListService>,
}

/// ルーターを作成
pub fn router(settings: Arc<Settings>) -> Router {
    let limit = usize::try_from(settings.max_upload_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(BODY_SLACK);

    let state = AppState {
        service: Arc::new(PackingListService::new(&settings)),
    };

    Router::new()
        .route("/", get(index))
        .route("/process", post(process_upload).fallback(method_not_allowed))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}

/// サーバーを起動
pub async fn serve(settings: Settings) -> Result<()> {
    let address = settings.address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(Arc::new(settings))).await?;
    Ok(())
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let settings = state.service.settings();
    Html(page::render(&settings.bank_name, settings.max_upload_bytes))
}

async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "POST method required")
}

async fn process_upload(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Response {
    let limit = state.service.settings().max_upload_bytes;

    let mut multipart = match multipart {
        Ok(m) => m,
        Err(e) => {
            warn!("Rejected upload: {}", e);
            return upload_error(UploadError::NoFile);
        }
    };

    let (file_name, content) = match read_upload(&mut multipart, limit).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return upload_error(UploadError::NoFile),
        Err(e) => return upload_error(e),
    };

    info!("Received {} ({} bytes)", file_name, content.len());

    let service = Arc::clone(&state.service);
    let name = file_name.clone();
    let result = tokio::task::spawn_blocking(move || {
        service.process(&name, &content, &ProcessOptions::default())
    })
    .await;

    match result {
        Ok(Ok(report)) => pdf_response(report),
        Ok(Err(e)) => failure_response(&file_name, e),
        Err(e) => {
            error!("Processing task for {} failed: {}", file_name, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Error processing file: {}", e),
            )
        }
    }
}

/// アップロードされたファイルを取り出す
async fn read_upload(
    multipart: &mut Multipart,
    limit: u64,
) -> std::result::Result<Option<(String, Vec<u8>)>, UploadError> {
    // 上限超過時は実サイズが分からないため上限+1として扱う
    let too_large = UploadError::TooLarge {
        size: limit.saturating_add(1),
        limit,
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => return Err(too_large),
            Err(e) => {
                warn!("Malformed multipart body: {}", e);
                return Ok(None);
            }
        };

        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => return Err(too_large),
            Err(e) => {
                warn!("Failed to read upload: {}", e);
                return Ok(None);
            }
        };

        return Ok(Some((file_name, bytes.to_vec())));
    }
}

fn pdf_response(report: GeneratedReport) -> Response {
    info!(
        "Sending {} ({} pages, {} bytes)",
        report.file_name,
        report.page_count,
        report.pdf.len()
    );

    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", report.file_name),
            ),
        ],
        report.pdf,
    )
        .into_response()
}

fn failure_response(file_name: &str, err: Error) -> Response {
    match err {
        Error::Upload(e) => upload_error(e),
        e if e.is_client_error() => {
            warn!("Could not process {}: {}", file_name, e);
            error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                &format!("Error processing file: {}", e),
            )
        }
        e => {
            error!("Failed to process {}: {}", file_name, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Error processing file: {}", e),
            )
        }
    }
}

fn upload_error(err: UploadError) -> Response {
    warn!("Upload rejected: {}", err);
    error_response(StatusCode::BAD_REQUEST, &err.to_string())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
