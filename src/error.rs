//! エラー型

use crate::parser::ParseError;
use crate::upload::UploadError;

/// ライブラリ全体の Result 型
pub type Result<T> = std::result::Result<T, Error>;

/// パッキングリスト生成中に発生するエラー
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// アップロード検証エラー
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// DATファイル解析エラー
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// 配送支店コードを持つ冊子が1つもない
    #[error("No books with a delivery branch code were found")]
    NoDeliveryBranches,

    /// PDF生成エラー
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    /// 設定値エラー
    #[error("Invalid setting {key}={value:?}: {reason}")]
    Config {
        key: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// 利用者の入力に起因するエラーかどうか
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Upload(_) | Error::Parse(_) | Error::NoDeliveryBranches
        )
    }
}
