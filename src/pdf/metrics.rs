//! 文字幅の計測と折り返し
//!
//! 幅は pdf_oxide の標準14フォントのメトリクスを使う。

use pdf_oxide::writer::TextLayout;
use std::sync::LazyLock;

static LAYOUT: LazyLock<TextLayout> = LazyLock::new(TextLayout::new);

/// 帳票で使う書体
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
}

impl Face {
    /// メトリクス参照用の標準フォント名
    pub fn base_font(self) -> &'static str {
        match self {
            Face::Regular => "Helvetica",
            Face::Bold => "Helvetica-Bold",
        }
    }

    /// ページのフォントリソース名 (`Tf` で指定する名前)
    pub fn resource(self) -> &'static str {
        match self {
            Face::Regular => "Helvetica",
            Face::Bold => "HelveticaBold",
        }
    }
}

/// 文字列の描画幅 (pt)
pub fn text_width(text: &str, face: Face, size: f32) -> f32 {
    LAYOUT.font_manager().text_width(text, face.base_font(), size)
}

/// 指定幅に収まるように折り返す
/// 1単語が幅を超える場合は文字単位で分割
pub fn wrap_text(text: &str, max_width: f32, face: Face, size: f32) -> Vec<String> {
    LAYOUT
        .wrap_text(text, face.base_font(), size, max_width)
        .into_iter()
        .flat_map(|(line, width)| {
            if width <= max_width {
                vec![line]
            } else {
                split_chars(&line, max_width, face, size)
            }
        })
        .collect()
}

fn split_chars(word: &str, max_width: f32, face: Face, size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for ch in word.chars() {
        current.push(ch);
        if text_width(&current, face, size) > max_width && current.chars().count() > 1 {
            current.pop();
            lines.push(std::mem::take(&mut current));
            current.push(ch);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// 指定幅に収まるように末尾を切り詰める
pub fn truncate_to_width(text: &str, max_width: f32, face: Face, size: f32) -> String {
    if text_width(text, face, size) <= max_width {
        return text.to_string();
    }

    let mut out = String::new();
    for ch in text.chars() {
        out.push(ch);
        if text_width(&out, face, size) > max_width {
            out.pop();
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(text_width("", Face::Regular, 10.0), 0.0);
        assert!((text_width("0", Face::Regular, 1000.0) - 556.0).abs() < 0.01);
        assert!(text_width("WIDE", Face::Regular, 9.0) > text_width("wide", Face::Regular, 9.0));
    }

    #[test]
    fn non_ascii_uses_font_default_width() {
        let accented = text_width("É", Face::Regular, 1000.0);
        assert!(accented > 0.0);
        assert_eq!(text_width("ÉÉ", Face::Regular, 1000.0), 2.0 * accented);
    }

    #[test]
    fn resource_names_have_no_dash() {
        assert_eq!(Face::Bold.resource(), "HelveticaBold");
        assert_eq!(Face::Bold.base_font(), "Helvetica-Bold");
        assert_eq!(Face::Regular.resource(), Face::Regular.base_font());
    }

    #[test]
    fn short_text_is_single_line() {
        assert_eq!(wrap_text("JOHN DOE", 200.0, Face::Regular, 8.0), ["JOHN DOE"]);
        assert_eq!(wrap_text("", 200.0, Face::Regular, 8.0), [""]);
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap_text("GLOBAL TRADERS LIMITED NAIROBI", 60.0, Face::Regular, 8.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, Face::Regular, 8.0) <= 60.0);
        }
        assert_eq!(lines.join(" "), "GLOBAL TRADERS LIMITED NAIROBI");
    }

    #[test]
    fn long_words_are_split() {
        let lines = wrap_text("ABCDEFGHIJKLMNOPQRSTUVWXYZ", 40.0, Face::Regular, 8.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "ABCDEFGHIJKLMNOPQRSTUVWXYZ");
        for line in &lines {
            assert!(text_width(line, Face::Regular, 8.0) <= 40.0);
        }
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate_to_width("SHORT", 100.0, Face::Regular, 8.0), "SHORT");
        let cut = truncate_to_width("A VERY LONG BRANCH NAME INDEED", 30.0, Face::Regular, 8.0);
        assert!(text_width(&cut, Face::Regular, 8.0) <= 30.0);
        assert!("A VERY LONG BRANCH NAME INDEED".starts_with(&cut));
    }
}
