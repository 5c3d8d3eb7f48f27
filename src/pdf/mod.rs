//! PDF生成モジュール - 配送支店ごとにパッキングリストを描画
//!
//! 1支店につき1ページから始まり、冊子一覧がページに収まらない場合は
//! 見出し行を繰り返して次のページへ続ける。
//! ページの組み立てと出力は pdf_oxide の `PdfWriter` が行い、
//! このモジュールは帳票のレイアウトだけを扱う。

mod metrics;

pub use metrics::{Face, text_width, truncate_to_width, wrap_text};

use crate::error::{Error, Result};
use crate::packing::{BookEntry, PackingList};
use pdf_oxide::elements::{ContentElement, PathContent};
use pdf_oxide::layout::Color;
use pdf_oxide::writer::{PdfWriter, PdfWriterConfig};
use tracing::debug;

/// A4 (pt)
pub const A4_WIDTH: f32 = 595.0;
pub const A4_HEIGHT: f32 = 842.0;

const INCH: f32 = 72.0;
const MARGIN: f32 = 0.5 * INCH;
const CONTENT_WIDTH: f32 = A4_WIDTH - 2.0 * MARGIN;

const NAVY: Color = hex(0x1a237e);
const RED: Color = hex(0xc62828);
const LIGHT_GREY: Color = hex(0xf5f5f5);
const STRIPE: Color = hex(0xf9f9f9);
const GRID: Color = hex(0x808080);
const BLACK: Color = hex(0x000000);
const WHITE: Color = hex(0xffffff);

const GRID_WIDTH: f32 = 0.5;
const RULE_WIDTH: f32 = 1.5;

/// 冊子一覧の列 (見出し, 幅 [inch])
const BOOK_COLUMNS: [(&str, f32); 6] = [
    ("Book Code", 0.7),
    ("Account Name", 2.3),
    ("Account Number", 1.3),
    ("Start Serial", 1.1),
    ("Branch Code", 0.9),
    ("Delivery Branch", 1.5),
];

/// 折り返す列 (口座名義, 配送支店)
const WRAPPED_COLUMNS: [usize; 2] = [1, 5];

const BOOK_ALIGNS: [Align; 6] = [
    Align::Center,
    Align::Left,
    Align::Left,
    Align::Left,
    Align::Left,
    Align::Left,
];

const fn hex(value: u32) -> Color {
    Color {
        r: ((value >> 16) & 0xff) as f32 / 255.0,
        g: ((value >> 8) & 0xff) as f32 / 255.0,
        b: (value & 0xff) as f32 / 255.0,
    }
}

/// PDF生成オプション
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub title: Option<String>,
    pub author: Option<String>,
    /// コンテンツストリームを圧縮する
    pub compress: bool,
}

/// 生成済みPDF
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// パッキングリストをPDFに変換
pub fn render_packing_lists(lists: &[PackingList], options: &RenderOptions) -> Result<RenderedPdf> {
    if lists.is_empty() {
        return Err(Error::Pdf("no packing lists to render".to_string()));
    }

    let mut config = PdfWriterConfig::default().with_compress(options.compress);
    config.creator = Some(concat!("kcb_packlist ", env!("CARGO_PKG_VERSION")).to_string());
    if let Some(title) = &options.title {
        config = config.with_title(title.clone());
    }
    if let Some(author) = &options.author {
        config = config.with_author(author.clone());
    }

    let mut layout = ReportLayout::default();
    for list in lists {
        // 支店ごとに改ページ
        layout.start_page();
        layout.packing_list(list);
    }

    let page_count = layout.pages.len();
    let mut writer = PdfWriter::with_config(config);
    for page in layout.pages {
        page.write_to(&mut writer);
    }
    let bytes = writer.finish().map_err(|e| Error::Pdf(e.to_string()))?;
    debug!("Rendered {} packing lists on {} pages ({} bytes)", lists.len(), page_count, bytes.len());

    Ok(RenderedPdf { bytes, page_count })
}

/// ページ上の描画要素
enum Mark {
    Shape(PathContent),
    Text {
        text: String,
        x: f32,
        y: f32,
        face: Face,
        size: f32,
        color: Color,
    },
}

#[derive(Default)]
struct Page {
    marks: Vec<Mark>,
}

impl Page {
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let path = PathContent {
            stroke_color: None,
            ..PathContent::rect(x, y, width, height)
        };
        self.marks.push(Mark::Shape(path.with_fill(color)));
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, line_width: f32, color: Color) {
        let path = PathContent::rect(x, y, width, height)
            .with_stroke(color)
            .with_stroke_width(line_width);
        self.marks.push(Mark::Shape(path));
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, line_width: f32, color: Color) {
        let path = PathContent::line(x1, y1, x2, y2)
            .with_stroke(color)
            .with_stroke_width(line_width);
        self.marks.push(Mark::Shape(path));
    }

    fn text(&mut self, text: &str, x: f32, y: f32, face: Face, size: f32, color: Color) {
        self.marks.push(Mark::Text {
            text: text.to_string(),
            x,
            y,
            face,
            size,
            color,
        });
    }

    /// A4ページとして書き出す
    fn write_to(self, writer: &mut PdfWriter) {
        let mut builder = writer.add_page(A4_WIDTH, A4_HEIGHT);
        let mut fill: Option<Color> = None;

        for mark in self.marks {
            match mark {
                Mark::Shape(path) => {
                    if path.fill_color.is_some() {
                        fill = path.fill_color;
                    }
                    builder.add_element(&ContentElement::Path(path));
                }
                Mark::Text {
                    text,
                    x,
                    y,
                    face,
                    size,
                    color,
                } => {
                    // 文字色は直前の塗り色 (面積0の矩形で切り替える)
                    if fill != Some(color) {
                        let ink = PathContent {
                            stroke_color: None,
                            ..PathContent::rect(x, y, 0.0, 0.0)
                        };
                        builder.add_element(&ContentElement::Path(ink.with_fill(color)));
                        fill = Some(color);
                    }
                    builder.add_text(&text, x, y, face.resource(), size);
                }
            }
        }

        builder.finish();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

/// 表の行スタイル
#[derive(Debug, Clone, Copy)]
struct RowStyle {
    face: Face,
    size: f32,
    leading: f32,
    color: Color,
    background: Color,
    pad_v: f32,
    pad_h: f32,
}

impl RowStyle {
    fn header(pad_v: f32, pad_h: f32) -> Self {
        Self {
            face: Face::Bold,
            size: 9.0,
            leading: 10.8,
            color: LIGHT_GREY,
            background: NAVY,
            pad_v,
            pad_h,
        }
    }

    fn body(face: Face, size: f32, leading: f32, background: Color, pad_h: f32) -> Self {
        Self {
            face,
            size,
            leading,
            color: BLACK,
            background,
            pad_v: 5.0,
            pad_h,
        }
    }
}

fn stripe(index: usize) -> Color {
    if index % 2 == 0 { WHITE } else { STRIPE }
}

struct ReportLayout {
    pages: Vec<Page>,
    /// 現在位置 (空き領域の上端)
    y: f32,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            y: A4_HEIGHT - MARGIN,
        }
    }
}

impl ReportLayout {
    fn start_page(&mut self) {
        self.pages.push(Page::default());
        self.y = A4_HEIGHT - MARGIN;
    }

    fn page(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn remaining(&self) -> f32 {
        self.y - MARGIN
    }

    fn packing_list(&mut self, list: &PackingList) {
        self.title();
        self.branch_title(list);
        self.header_table(list);
        self.style_summary_table(list);
        self.books_table(list);
    }

    fn title(&mut self) {
        let text = "PACKING LIST";
        let size = 16.0;
        let x = (A4_WIDTH - text_width(text, Face::Bold, size)) / 2.0;
        let y = self.y - size;
        self.page().text(text, x, y, Face::Bold, size, NAVY);
        self.y -= 20.0 + 6.0 + 0.08 * INCH;
    }

    fn branch_title(&mut self, list: &PackingList) {
        let text = format!(
            "Delivery Branch: {} ({})",
            list.delivery_branch_name, list.delivery_branch_code
        );
        let size = 12.0;
        let leading = 15.0;
        for line in wrap_text(&text, CONTENT_WIDTH, Face::Bold, size) {
            let y = self.y - size;
            self.page().text(&line, MARGIN, y, Face::Bold, size, RED);
            self.y -= leading;
        }
        self.y -= 4.0 + 0.15 * INCH;
    }

    /// 銀行名・注文番号・注文日・冊数の 2x2 表 (値は欄内で折り返す)
    fn header_table(&mut self, list: &PackingList) {
        let widths = [3.0 * INCH, 3.0 * INCH];
        let x0 = centered_x(&widths);
        let size = 10.0;
        let leading = 12.0;
        let pad = 8.0;

        let total_books = list.total_books.to_string();
        let rows = [
            [("Bank Name:", list.bank_name.as_str()), ("Order Number:", list.order_number.as_str())],
            [("Order Date:", list.order_date.as_str()), ("Total Books:", total_books.as_str())],
        ];

        let mut top = self.y;
        let page = self.page();
        for row in &rows {
            let cells: Vec<(&str, f32, Vec<String>)> = row
                .iter()
                .zip(widths)
                .map(|((label, value), width)| {
                    let label_w = text_width(label, Face::Bold, size) + 3.0;
                    let lines = wrap_text(value, width - 2.0 * pad - label_w, Face::Regular, size);
                    (*label, label_w, lines)
                })
                .collect();
            let line_count = cells.iter().map(|(_, _, lines)| lines.len()).max().unwrap_or(1);
            let row_h = 6.0 + line_count as f32 * leading + 6.0;

            let mut x = x0;
            for ((label, label_w, lines), width) in cells.iter().zip(widths) {
                page.fill_rect(x, top - row_h, width, row_h, LIGHT_GREY);
                page.stroke_rect(x, top - row_h, width, row_h, GRID_WIDTH, GRID);

                let first = top - 6.0 - (leading + size * 0.7) / 2.0;
                page.text(label, x + pad, first, Face::Bold, size, BLACK);
                for (i, line) in lines.iter().enumerate() {
                    let y = first - i as f32 * leading;
                    page.text(line, x + pad + label_w, y, Face::Regular, size, BLACK);
                }
                x += width;
            }
            top -= row_h;
        }

        self.y = top - 0.12 * INCH;
    }

    /// スタイル別冊数の表
    fn style_summary_table(&mut self, list: &PackingList) {
        let widths = [1.2 * INCH, 1.5 * INCH];
        let aligns = [Align::Left, Align::Left];
        let x0 = centered_x(&widths);
        let table_w: f32 = widths.iter().sum();

        let summary = list.style_summary();
        let total: usize = summary.iter().map(|s| s.count).sum();

        let header = vec![vec!["Book Style".to_string()], vec!["Number of Books".to_string()]];
        let header_style = RowStyle::header(6.0, 8.0);

        let mut top = self.y;
        let page = self.page();

        let h = draw_row(page, x0, top, &widths, &aligns, &header, &header_style);
        top -= h;
        page.line(x0, top, x0 + table_w, top, RULE_WIDTH, NAVY);

        for (i, style) in summary.iter().enumerate() {
            let cells = vec![vec![style.book_style.clone()], vec![style.count.to_string()]];
            let row_style = RowStyle::body(Face::Regular, 9.0, 10.8, stripe(i), 8.0);
            top -= draw_row(page, x0, top, &widths, &aligns, &cells, &row_style);
        }

        let cells = vec![vec!["TOTAL".to_string()], vec![total.to_string()]];
        let total_style = RowStyle::body(Face::Bold, 9.0, 10.8, LIGHT_GREY, 8.0);
        page.line(x0, top, x0 + table_w, top, RULE_WIDTH, NAVY);
        top -= draw_row(page, x0, top, &widths, &aligns, &cells, &total_style);

        self.y = top - 0.2 * INCH;
    }

    /// 冊子一覧 (改ページ時は見出し行を繰り返す)
    fn books_table(&mut self, list: &PackingList) {
        let widths = book_column_widths();
        let x0 = centered_x(&widths);

        let header: Vec<Vec<String>> = BOOK_COLUMNS.iter().map(|(title, _)| vec![title.to_string()]).collect();
        let header_style = RowStyle::header(8.0, 5.0);
        let header_h = measure_row(&header, &header_style);

        let rows: Vec<Vec<Vec<String>>> = list
            .sorted_books()
            .into_iter()
            .map(|book| book_cells(book, &list.delivery_branch_name, &widths))
            .collect();

        let first_h = rows
            .first()
            .map(|cells| measure_row(cells, &book_row_style(0)))
            .unwrap_or(0.0);
        if self.remaining() < header_h + first_h {
            self.start_page();
        }
        self.books_header(x0, &widths, &header, &header_style);

        for (i, cells) in rows.iter().enumerate() {
            let style = book_row_style(i);
            let h = measure_row(cells, &style);
            if self.remaining() < h {
                self.start_page();
                self.books_header(x0, &widths, &header, &header_style);
            }
            let top = self.y;
            draw_row(self.page(), x0, top, &widths, &BOOK_ALIGNS, cells, &style);
            self.y -= h;
        }
    }

    fn books_header(&mut self, x0: f32, widths: &[f32], header: &[Vec<String>], style: &RowStyle) {
        let top = self.y;
        let aligns = [Align::Center; 6];
        let page = self.page();
        let h = draw_row(page, x0, top, widths, &aligns, header, style);
        let table_w: f32 = widths.iter().sum();
        page.line(x0, top - h, x0 + table_w, top - h, RULE_WIDTH, NAVY);
        self.y -= h;
    }
}

fn book_row_style(index: usize) -> RowStyle {
    RowStyle::body(Face::Regular, 8.0, 9.0, stripe(index), 5.0)
}

/// 列幅 (印刷可能幅に収まるよう縮小)
fn book_column_widths() -> Vec<f32> {
    let nominal: f32 = BOOK_COLUMNS.iter().map(|(_, w)| w * INCH).sum();
    let scale = (CONTENT_WIDTH / nominal).min(1.0);
    BOOK_COLUMNS.iter().map(|(_, w)| w * INCH * scale).collect()
}

fn book_cells(book: &BookEntry, delivery_branch: &str, widths: &[f32]) -> Vec<Vec<String>> {
    let style = book_row_style(0);
    let values = [
        book.book_style.as_str(),
        book.account_name.as_str(),
        book.account_number.as_str(),
        book.start_serial.as_str(),
        book.branch_code.as_str(),
        delivery_branch,
    ];

    values
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(col, (value, width))| {
            let inner = width - 2.0 * style.pad_h;
            if WRAPPED_COLUMNS.contains(&col) {
                wrap_text(value, inner, style.face, style.size)
            } else {
                vec![truncate_to_width(value, inner, style.face, style.size)]
            }
        })
        .collect()
}

fn centered_x(widths: &[f32]) -> f32 {
    let total: f32 = widths.iter().sum();
    MARGIN + (CONTENT_WIDTH - total) / 2.0
}

/// 行の高さ
fn measure_row(cells: &[Vec<String>], style: &RowStyle) -> f32 {
    let lines = cells.iter().map(|c| c.len().max(1)).max().unwrap_or(1);
    lines as f32 * style.leading + 2.0 * style.pad_v
}

/// 行内で上下中央に置いたときの i 行目のベースライン
fn baseline(top: f32, height: f32, line_count: usize, leading: f32, size: f32, index: usize) -> f32 {
    let block = line_count as f32 * leading;
    let block_top = top - (height - block) / 2.0;
    block_top - index as f32 * leading - (leading + size * 0.7) / 2.0
}

/// 1行を描画して高さを返す
fn draw_row(
    page: &mut Page,
    x0: f32,
    top: f32,
    widths: &[f32],
    aligns: &[Align],
    cells: &[Vec<String>],
    style: &RowStyle,
) -> f32 {
    let h = measure_row(cells, style);
    let table_w: f32 = widths.iter().sum();
    page.fill_rect(x0, top - h, table_w, h, style.background);

    let mut x = x0;
    for ((cell, &width), &align) in cells.iter().zip(widths).zip(aligns) {
        page.stroke_rect(x, top - h, width, h, GRID_WIDTH, GRID);
        for (i, line) in cell.iter().enumerate() {
            let y = baseline(top, h, cell.len(), style.leading, style.size, i);
            let tx = match align {
                Align::Left => x + style.pad_h,
                Align::Center => x + (width - text_width(line, style.face, style.size)) / 2.0,
            };
            page.text(line, tx, y, style.face, style.size, style.color);
        }
        x += width;
    }

    h
}
