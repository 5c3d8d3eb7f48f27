//! DATファイル解析モジュール - KCB小切手帳注文ファイル

mod book_style;
mod date;
mod record;
mod run_number;

pub use book_style::{BookStyle, UNKNOWN_STYLE};
pub use date::{normalize_date, parse_date, today};
pub use record::{OrderRecord, RECORD_TYPE_ORDER, RECORD_WIDTH, record_type};
pub use run_number::extract_run_number;

#[cfg(test)]
pub(crate) use record::tests::order_line;

use serde::Serialize;
use tracing::{debug, warn};

/// 解析エラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("File is not valid UTF-8 text")]
    Encoding,

    #[error("No order records found in file")]
    NoOrders,

    #[error("Line {line}: invalid cheque start serial {value:?}")]
    InvalidSerial { line: usize, value: String },
}

/// 解析済みDATファイル
#[derive(Debug, Clone)]
pub struct DatFile {
    /// 元のファイル名
    pub file_name: String,
    /// ファイル名から抽出したラン番号
    pub run_number: String,
    /// 注文レコード (行番号付き)
    pub orders: Vec<(usize, OrderRecord)>,
    /// 解析できずスキップした行数
    pub skipped_lines: usize,
}

/// 冊子1冊分のエントリ (注文を冊数分展開したもの)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub book_style: String,
    pub book_type_description: String,
    pub currency: String,
    pub leaves: u32,
    pub branch_code: String,
    pub account_number: String,
    pub serial_number: String,
    pub account_name: String,
    pub branch_title: String,
    pub branch_address: String,
    pub delivery_branch_code: String,
    pub delivery_branch_name: String,
    pub number_of_books: u32,
}

/// ファイルのメタデータ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMetadata {
    pub run_number: String,
    pub file_name: String,
    pub total_orders: usize,
    pub total_books: u64,
}

/// DATファイルを解析
pub fn parse_dat(file_name: &str, content: &[u8]) -> Result<DatFile, ParseError> {
    let text = std::str::from_utf8(content).map_err(|_| ParseError::Encoding)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut orders = Vec::new();
    let mut skipped_lines = 0;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        // ヘッダー ('0') とトレーラー ('4') は読み飛ばす
        if record_type(line) != Some(RECORD_TYPE_ORDER) {
            continue;
        }

        match OrderRecord::parse(line) {
            Ok(order) => orders.push((line_no, order)),
            Err(e) => {
                warn!("Skipping line {}: invalid book count {:?}", line_no, e.0);
                skipped_lines += 1;
            }
        }
    }

    if orders.is_empty() {
        return Err(ParseError::NoOrders);
    }

    debug!("Parsed {} order records from {}", orders.len(), file_name);

    Ok(DatFile {
        file_name: file_name.to_string(),
        run_number: extract_run_number(file_name),
        orders,
        skipped_lines,
    })
}

impl DatFile {
    /// 注文レコードのみを取得
    pub fn records(&self) -> impl Iterator<Item = &OrderRecord> {
        self.orders.iter().map(|(_, order)| order)
    }

    /// 冊数分に展開 (シリアルはスタイルごとの増分で加算)
    pub fn expand_books(&self) -> Result<Vec<Book>, ParseError> {
        let mut books = Vec::new();

        for (line, order) in &self.orders {
            let style = BookStyle::lookup(&order.book_style);
            let increment = style.serial_increment();

            let start: u64 = order.cheque_start_serial.parse().map_err(|_| {
                ParseError::InvalidSerial {
                    line: *line,
                    value: order.cheque_start_serial.clone(),
                }
            })?;

            // 1冊目は元のシリアルをそのまま使う
            books.push(book_from_order(order, style, order.cheque_start_serial.clone()));

            for n in 1..u64::from(order.number_of_books) {
                let serial = format!("{:06}", start + n * increment);
                books.push(book_from_order(order, style, serial));
            }
        }

        Ok(books)
    }

    /// ファイルのメタデータを取得
    pub fn metadata(&self) -> FileMetadata {
        FileMetadata {
            run_number: self.run_number.clone(),
            file_name: self.file_name.clone(),
            total_orders: self.orders.len(),
            total_books: self.records().map(|o| u64::from(o.number_of_books)).sum(),
        }
    }

    /// 注文番号 ("KCB-000618")
    pub fn order_number(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.run_number)
    }
}

fn book_from_order(order: &OrderRecord, style: &BookStyle, serial: String) -> Book {
    Book {
        book_style: order.book_style.clone(),
        book_type_description: style.description.to_string(),
        currency: style.currency.to_string(),
        leaves: style.leaves,
        branch_code: order.sort_code.clone(),
        account_number: order.account_number.clone(),
        serial_number: serial,
        account_name: order.personalization.clone(),
        branch_title: order.branch_title.clone(),
        branch_address: order.branch_address.clone(),
        delivery_branch_code: order.delivery_branch_code.clone(),
        delivery_branch_name: order.delivery_branch_name.clone(),
        number_of_books: order.number_of_books,
    }
}
