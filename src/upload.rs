//! アップロードファイルの検証

/// 既定のアップロード上限 (10MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// 受け付ける拡張子
pub const DAT_EXTENSION: &str = ".dat";

/// アップロード検証エラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("No file uploaded")]
    NoFile,

    #[error("Only .dat files are allowed")]
    InvalidExtension,

    #[error("File size must not exceed {}", limit_text(.limit))]
    TooLarge { size: u64, limit: u64 },
}

/// ファイル名とサイズを検証
pub fn validate_upload(file_name: &str, size: u64, limit: u64) -> Result<(), UploadError> {
    if file_name.trim().is_empty() {
        return Err(UploadError::NoFile);
    }

    if !file_name.ends_with(DAT_EXTENSION) {
        return Err(UploadError::InvalidExtension);
    }

    if size > limit {
        return Err(UploadError::TooLarge { size, limit });
    }

    Ok(())
}

fn limit_text(limit: &u64) -> String {
    format_limit(*limit)
}

/// 上限値を人間向けに表示 (10485760 -> "10MB")
pub fn format_limit(limit: u64) -> String {
    const MB: u64 = 1024 * 1024;
    const KB: u64 = 1024;

    if limit >= MB && limit % MB == 0 {
        format!("{}MB", limit / MB)
    } else if limit >= KB && limit % KB == 0 {
        format!("{}KB", limit / KB)
    } else {
        format!("{} bytes", limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_dat_file_within_limit() {
        assert_eq!(validate_upload("KCB-618.dat", 2048, DEFAULT_MAX_UPLOAD_BYTES), Ok(()));
    }

    #[test]
    fn rejects_other_extensions() {
        assert_eq!(
            validate_upload("orders.txt", 10, DEFAULT_MAX_UPLOAD_BYTES),
            Err(UploadError::InvalidExtension)
        );
        // 大文字拡張子も受け付けない
        assert_eq!(
            validate_upload("ORDERS.DAT", 10, DEFAULT_MAX_UPLOAD_BYTES),
            Err(UploadError::InvalidExtension)
        );
    }

    #[test]
    fn rejects_files_over_limit() {
        let err = validate_upload("big.dat", DEFAULT_MAX_UPLOAD_BYTES + 1, DEFAULT_MAX_UPLOAD_BYTES)
            .unwrap_err();
        assert_eq!(err.to_string(), "File size must not exceed 10MB");
    }

    #[test]
    fn file_exactly_at_limit_is_allowed() {
        assert!(validate_upload("edge.dat", 1024, 1024).is_ok());
    }

    #[test]
    fn empty_name_means_no_file() {
        assert_eq!(validate_upload("  ", 0, 1024), Err(UploadError::NoFile));
    }

    #[test]
    fn limit_formatting() {
        assert_eq!(format_limit(10 * 1024 * 1024), "10MB");
        assert_eq!(format_limit(512 * 1024), "512KB");
        assert_eq!(format_limit(1000), "1000 bytes");
    }
}
