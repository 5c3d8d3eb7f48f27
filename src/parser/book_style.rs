//! 小切手帳スタイル (book style) の定義

/// スタイルコードごとの冊子情報
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookStyle {
    /// 2桁のスタイルコード
    pub code: &'static str,
    /// 種別名
    pub description: &'static str,
    /// 通貨
    pub currency: &'static str,
    /// 1冊あたりの枚数
    pub leaves: u32,
}

/// 未登録コード用の既定値
pub const UNKNOWN_STYLE: BookStyle = BookStyle {
    code: "",
    description: "Unknown",
    currency: "KES",
    leaves: 50,
};

const BOOK_STYLES: &[BookStyle] = &[
    style("01", "Personal KES", "KES", 50),
    style("02", "Corporate KES", "KES", 100),
    style("25", "South African Rand Small", "ZAR", 50),
    style("45", "South African Rand Large", "ZAR", 100),
    style("31", "Sterling Pound Small", "GBP", 50),
    style("51", "Sterling Pound Large", "GBP", 100),
    style("32", "USA Dollar Small", "USD", 50),
    style("52", "USA Dollar Large", "USD", 100),
    style("40", "EURO Small", "EUR", 50),
    style("69", "EURO Large", "EUR", 100),
    style("71", "KES Banker's Cheques", "KES", 100),
    style("72", "USD Banker's Cheques", "USD", 100),
    style("73", "GBP Banker's Cheques", "GBP", 100),
    style("74", "EUR Banker's Cheques", "EUR", 100),
];

const fn style(
    code: &'static str,
    description: &'static str,
    currency: &'static str,
    leaves: u32,
) -> BookStyle {
    BookStyle {
        code,
        description,
        currency,
        leaves,
    }
}

impl BookStyle {
    /// コードからスタイルを検索 (未登録なら None)
    pub fn find(code: &str) -> Option<&'static BookStyle> {
        BOOK_STYLES.iter().find(|s| s.code == code)
    }

    /// コードからスタイルを取得 (未登録なら既定値)
    pub fn lookup(code: &str) -> &'static BookStyle {
        Self::find(code).unwrap_or(&UNKNOWN_STYLE)
    }

    /// 次の冊子の開始シリアルまでの増分
    pub fn serial_increment(&self) -> u64 {
        u64::from(self.leaves)
    }

    /// 登録済みの全スタイル
    pub fn all() -> &'static [BookStyle] {
        BOOK_STYLES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_styles() {
        let usd = BookStyle::lookup("52");
        assert_eq!(usd.currency, "USD");
        assert_eq!(usd.leaves, 100);
        assert_eq!(usd.serial_increment(), 100);

        let personal = BookStyle::lookup("01");
        assert_eq!(personal.leaves, 50);
        assert_eq!(personal.description, "Personal KES");
    }

    #[test]
    fn unknown_style_falls_back() {
        assert!(BookStyle::find("99").is_none());
        let unknown = BookStyle::lookup("99");
        assert_eq!(unknown.description, "Unknown");
        assert_eq!(unknown.currency, "KES");
        assert_eq!(unknown.serial_increment(), 50);
    }

    #[test]
    fn codes_are_unique() {
        let mut codes: Vec<_> = BookStyle::all().iter().map(|s| s.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), BookStyle::all().len());
    }
}
