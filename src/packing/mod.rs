//! パッキングリスト生成 - 配送支店ごとに冊子をまとめる

use crate::parser::Book;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// 既定の銀行名
pub const DEFAULT_BANK_NAME: &str = "KCB Bank Ltd";

/// 支店名が空のときの表示
pub const UNKNOWN_BRANCH: &str = "UNKNOWN BRANCH";

/// 注文番号と日付
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderInfo {
    pub bank_name: String,
    pub order_number: String,
    pub order_date: String,
}

/// パッキングリストの1行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookEntry {
    pub book_style: String,
    pub account_name: String,
    pub account_number: String,
    pub start_serial: String,
    /// 配送支店コード
    pub branch_code: String,
    pub currency: String,
    pub leaves: u32,
}

/// 配送支店1つ分のパッキングリスト (PDFの1ページ分)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackingList {
    pub bank_name: String,
    pub order_number: String,
    pub order_date: String,
    pub delivery_branch_code: String,
    pub delivery_branch_name: String,
    pub total_books: usize,
    pub books: Vec<BookEntry>,
}

/// スタイル別の冊数
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleCount {
    pub book_style: String,
    pub count: usize,
}

impl PackingList {
    /// スタイル別の冊数 (スタイルコード降順)
    pub fn style_summary(&self) -> Vec<StyleCount> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for book in &self.books {
            *counts.entry(book.book_style.as_str()).or_default() += 1;
        }

        counts
            .into_iter()
            .rev()
            .map(|(style, count)| StyleCount {
                book_style: style.to_string(),
                count,
            })
            .collect()
    }

    /// 表示順の冊子 (スタイルコード降順、同一スタイル内は元の順序)
    pub fn sorted_books(&self) -> Vec<&BookEntry> {
        let mut books: Vec<&BookEntry> = self.books.iter().collect();
        books.sort_by(|a, b| b.book_style.cmp(&a.book_style));
        books
    }
}

/// 冊子を配送支店コードでグループ化
/// 配送支店コードが空の冊子は除外
pub fn group_by_delivery_branch(books: &[Book]) -> BTreeMap<String, Vec<&Book>> {
    let mut grouped: BTreeMap<String, Vec<&Book>> = BTreeMap::new();
    let mut dropped = 0usize;

    for book in books {
        let code = book.delivery_branch_code.trim();
        if code.is_empty() {
            dropped += 1;
            continue;
        }
        grouped.entry(code.to_string()).or_default().push(book);
    }

    if dropped > 0 {
        warn!("{} books have no delivery branch code and were left out", dropped);
    }

    grouped
}

/// パッキングリストを生成 (配送支店コード昇順)
pub fn generate_packing_lists(books: &[Book], order: &OrderInfo) -> Vec<PackingList> {
    group_by_delivery_branch(books)
        .into_iter()
        .map(|(code, books)| {
            // 支店名は先頭の冊子から取得
            let name = books
                .first()
                .map(|b| b.delivery_branch_name.trim())
                .filter(|n| !n.is_empty())
                .unwrap_or(UNKNOWN_BRANCH)
                .to_string();

            let entries: Vec<BookEntry> = books
                .iter()
                .map(|book| BookEntry {
                    book_style: book.book_style.clone(),
                    account_name: book.account_name.trim().to_string(),
                    account_number: book.account_number.trim().to_string(),
                    start_serial: book.serial_number.trim().to_string(),
                    branch_code: book.delivery_branch_code.trim().to_string(),
                    currency: book.currency.clone(),
                    leaves: book.leaves,
                })
                .collect();

            PackingList {
                bank_name: order.bank_name.clone(),
                order_number: order.order_number.clone(),
                order_date: order.order_date.clone(),
                delivery_branch_code: code,
                delivery_branch_name: name,
                total_books: entries.len(),
                books: entries,
            }
        })
        .collect()
}

/// 支店ごとの集計
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchSummary {
    pub code: String,
    pub name: String,
    pub books: usize,
}

/// 1回の生成処理の集計
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub order_number: String,
    pub order_date: String,
    pub total_orders: usize,
    pub total_books: usize,
    pub branches: Vec<BranchSummary>,
}

impl RunSummary {
    pub fn new(order: &OrderInfo, total_orders: usize, lists: &[PackingList]) -> Self {
        Self {
            order_number: order.order_number.clone(),
            order_date: order.order_date.clone(),
            total_orders,
            total_books: lists.iter().map(|l| l.total_books).sum(),
            branches: lists
                .iter()
                .map(|l| BranchSummary {
                    code: l.delivery_branch_code.clone(),
                    name: l.delivery_branch_name.clone(),
                    books: l.total_books,
                })
                .collect(),
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(70);
        writeln!(f, "{}", rule)?;
        writeln!(f, "PACKING LIST SUMMARY  {} ({})", self.order_number, self.order_date)?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Total Delivery Branches: {}", self.branches.len())?;
        writeln!(f, "Total Books Across All Branches: {}", self.total_books)?;
        writeln!(f)?;
        writeln!(f, "Breakdown by Branch:")?;
        writeln!(f, "{}", "-".repeat(70))?;
        for (i, branch) in self.branches.iter().enumerate() {
            writeln!(f, "{}. {} ({})", i + 1, branch.name, branch.code)?;
            writeln!(f, "   Books: {}", branch.books)?;
        }
        write!(f, "{}", rule)
    }
}
