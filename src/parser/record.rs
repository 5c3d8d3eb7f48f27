//! 注文レコード (固定長) の解析

/// レコード長 (これより短い行は空白で埋める)
pub const RECORD_WIDTH: usize = 210;

/// レコード種別 (3文字目)
pub const RECORD_TYPE_HEADER: char = '0';
pub const RECORD_TYPE_ORDER: char = '1';
pub const RECORD_TYPE_TRAILER: char = '4';

/// 注文レコード
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderRecord {
    pub bank_id: String,
    pub record_type: String,
    pub priority: String,
    pub sort_code: String,
    pub account_number: String,
    pub check_digit: String,
    pub cheque_voucher_digits: String,
    pub credits_voucher_digits: String,
    pub book_style: String,
    /// 冊数
    pub number_of_books: u32,
    pub cheque_start_serial: String,
    pub credits_start_serial: String,
    /// 口座名義 (パーソナライズ)
    pub personalization: String,
    pub branch_title: String,
    pub branch_address: String,
    pub signature_required: String,
    pub beneficiary_name: String,
    pub delivery_branch_code: String,
    pub delivery_branch_name: String,
}

/// 行のレコード種別を取得
pub fn record_type(line: &str) -> Option<char> {
    line.chars().nth(2)
}

/// 冊数フィールドが数値でない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBookCount(pub String);

impl OrderRecord {
    /// 1行を注文レコードとして解析
    pub fn parse(line: &str) -> Result<Self, InvalidBookCount> {
        let mut chars: Vec<char> = line.chars().collect();
        if chars.len() < RECORD_WIDTH {
            chars.resize(RECORD_WIDTH, ' ');
        }

        let field = |start: usize, end: usize| -> String {
            let end = end.min(chars.len());
            chars[start..end].iter().collect::<String>().trim().to_string()
        };

        let count = field(26, 30);
        let number_of_books = if count.is_empty() {
            1
        } else {
            count.parse::<u32>().map_err(|_| InvalidBookCount(count.clone()))?
        };

        Ok(Self {
            bank_id: field(0, 2),
            record_type: field(2, 3),
            priority: field(3, 4),
            sort_code: field(4, 9),
            account_number: field(9, 19),
            check_digit: field(19, 20),
            cheque_voucher_digits: field(20, 22),
            credits_voucher_digits: field(22, 24),
            book_style: field(24, 26),
            // 0冊は1冊として扱う
            number_of_books: number_of_books.max(1),
            cheque_start_serial: field(30, 36),
            credits_start_serial: field(36, 42),
            personalization: field(42, 78),
            branch_title: field(78, 108),
            branch_address: field(108, 138),
            signature_required: field(138, 139),
            beneficiary_name: field(139, 169),
            delivery_branch_code: field(169, 174),
            delivery_branch_name: field(174, 210),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// テスト用の注文行を組み立てる
    pub(crate) fn order_line(
        style: &str,
        books: &str,
        serial: &str,
        name: &str,
        delivery_code: &str,
        delivery_name: &str,
    ) -> String {
        format!(
            "{:<2}{:1}{:1}{:<5}{:<10}{:1}{:<2}{:<2}{:<2}{:>4}{:<6}{:<6}{:<36}{:<30}{:<30}{:1}{:<30}{:<5}{:<36}",
            "01",
            "1",
            "N",
            "01100",
            "1234567890",
            "7",
            "00",
            "00",
            style,
            books,
            serial,
            "000000",
            name,
            "KCB MOI AVENUE",
            "P.O. BOX 48400",
            "Y",
            "",
            delivery_code,
            delivery_name,
        )
    }

    #[test]
    fn parses_fixed_width_fields() {
        let line = order_line("02", "3", "000101", "ACME CORPORATION", "01320", "KCB LAVINGTON");
        assert_eq!(line.chars().count(), RECORD_WIDTH);

        let record = OrderRecord::parse(&line).unwrap();
        assert_eq!(record.bank_id, "01");
        assert_eq!(record.record_type, "1");
        assert_eq!(record.sort_code, "01100");
        assert_eq!(record.account_number, "1234567890");
        assert_eq!(record.book_style, "02");
        assert_eq!(record.number_of_books, 3);
        assert_eq!(record.cheque_start_serial, "000101");
        assert_eq!(record.personalization, "ACME CORPORATION");
        assert_eq!(record.branch_title, "KCB MOI AVENUE");
        assert_eq!(record.delivery_branch_code, "01320");
        assert_eq!(record.delivery_branch_name, "KCB LAVINGTON");
    }

    #[test]
    fn short_lines_are_padded() {
        let line = order_line("01", "1", "000001", "JOHN DOE", "01320", "KCB LAVINGTON");
        let truncated: String = line.chars().take(60).collect();

        let record = OrderRecord::parse(&truncated).unwrap();
        assert_eq!(record.cheque_start_serial, "000001");
        assert_eq!(record.personalization, "JOHN DOE");
        assert_eq!(record.delivery_branch_code, "");
    }

    #[test]
    fn blank_book_count_means_one() {
        let line = order_line("01", "", "000001", "JOHN DOE", "01320", "X");
        assert_eq!(OrderRecord::parse(&line).unwrap().number_of_books, 1);

        let line = order_line("01", "0", "000001", "JOHN DOE", "01320", "X");
        assert_eq!(OrderRecord::parse(&line).unwrap().number_of_books, 1);
    }

    #[test]
    fn non_numeric_book_count_is_rejected() {
        let line = order_line("01", "AB", "000001", "JOHN DOE", "01320", "X");
        assert_eq!(
            OrderRecord::parse(&line),
            Err(InvalidBookCount("AB".to_string()))
        );
    }

    #[test]
    fn record_type_is_third_character() {
        assert_eq!(record_type("010TD"), Some(RECORD_TYPE_HEADER));
        assert_eq!(record_type("011"), Some(RECORD_TYPE_ORDER));
        assert_eq!(record_type("01"), None);
    }
}
