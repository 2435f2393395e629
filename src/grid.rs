//! Grid Module
//!
//! 抽出されたテーブルから、プレビュー用の稠密なグリッド構造への変換を提供するモジュール。
//! 短い行の補完（[`NULL_MARKER`]）とプレビュー行数の制限を担当します。

use std::io::Write;

use unicode_width::UnicodeWidthStr;

use crate::api::Theme;
use crate::error::Txt2XlsxError;
use crate::types::{ExtractedTable, NULL_MARKER};

/// 表示用セル
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Cell {
    /// 表示文字列
    pub content: String,

    /// 欠損値を補完したセルかどうか
    pub is_null: bool,
}

impl Cell {
    /// 新しい通常セルを生成
    pub fn new(content: String) -> Self {
        Self {
            content,
            is_null: false,
        }
    }

    /// 欠損マーカーのセルを生成
    pub fn null() -> Self {
        Self {
            content: NULL_MARKER.to_string(),
            is_null: true,
        }
    }
}

/// プレビュー用のグリッド構造
///
/// ヘッダー行と、最大`limit`行のデータ行を保持します。
/// すべての行は列数と同じ長さに揃えられます。
#[derive(Debug)]
pub(crate) struct PreviewGrid {
    /// ファイル名（拡張子なし）
    pub title: String,

    /// ヘッダー行
    header: Vec<String>,

    /// データ行（行 × 列）
    cells: Vec<Vec<Cell>>,

    /// 元のテーブルの総データ行数
    pub total_rows: usize,

    /// 要約
    pub summary: Option<String>,
}

impl PreviewGrid {
    /// テーブルからグリッドを構築
    ///
    /// # 引数
    ///
    /// * `table` - 抽出されたテーブル
    /// * `limit` - プレビューに含める最大データ行数
    pub fn build(table: &ExtractedTable, limit: usize) -> Self {
        let cols = table.column_count();

        let cells = table
            .rows
            .iter()
            .take(limit)
            .map(|row| {
                (0..cols)
                    .map(|col| match row.get(col).and_then(|v| v.display_text()) {
                        Some(text) => Cell::new(text),
                        None => Cell::null(),
                    })
                    .collect()
            })
            .collect();

        Self {
            title: table.display_filename().to_string(),
            header: table.columns.clone(),
            cells,
            total_rows: table.row_count(),
            summary: table.non_empty_summary().map(str::to_string),
        }
    }

    /// 表示行数を取得
    pub(crate) fn get_rows(&self) -> usize {
        self.cells.len()
    }

    /// 列数を取得
    pub(crate) fn get_cols(&self) -> usize {
        self.header.len()
    }

    /// ヘッダー行を取得
    pub(crate) fn header(&self) -> &[String] {
        &self.header
    }

    /// 指定された行を取得
    pub(crate) fn get_row(&self, row_idx: usize) -> &[Cell] {
        self.cells.get(row_idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 表示行数が総行数より少ないかどうか
    pub(crate) fn is_truncated(&self) -> bool {
        self.get_rows() < self.total_rows
    }

    /// プレビューの見出し（例: `Preview: sales.xlsx`）
    pub(crate) fn heading(&self) -> String {
        format!("Preview: {}.xlsx", self.title)
    }

    /// 行数・列数の概要（例: `2 rows • 2 columns`）
    pub(crate) fn counts(&self) -> String {
        format!("{} rows • {} columns", self.total_rows, self.get_cols())
    }

    /// Markdownテーブルとして出力
    ///
    /// データ行がない場合は、テーブルの代わりにメッセージを出力します。
    pub fn render_markdown<W: Write>(&self, writer: &mut W) -> Result<(), Txt2XlsxError> {
        writeln!(writer, "### {}\n", self.heading())?;
        writeln!(writer, "{}\n", self.counts())?;

        if self.total_rows == 0 {
            writeln!(writer, "No rows found in the provided text.")?;
            writer.flush()?;
            return Ok(());
        }

        let header: Vec<String> = self.header.iter().map(|h| escape_markdown(h)).collect();
        let body: Vec<Vec<String>> = self
            .cells
            .iter()
            .map(|row| row.iter().map(|c| escape_markdown(&c.content)).collect())
            .collect();

        // 1. 列幅の計算
        let col_widths = calculate_column_widths(&header, &body);

        // 2. ヘッダー行と区切り行
        write_markdown_row(writer, &header, &col_widths)?;
        writeln!(writer, "{}", generate_separator(&col_widths))?;

        // 3. 各データ行の出力
        for row in &body {
            write_markdown_row(writer, row, &col_widths)?;
        }

        if self.is_truncated() {
            writeln!(
                writer,
                "\n_Showing first {} of {} rows._",
                self.get_rows(),
                self.total_rows
            )?;
        }

        if let Some(summary) = &self.summary {
            writeln!(writer, "\n**Summary:** {}", summary)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// HTMLテーブルとして出力
    ///
    /// テーマに応じたクラス名でテーブル全体を囲みます。
    /// 補完されたセルは`class="null"`付きの`<em>`で出力します。
    pub fn render_html<W: Write>(&self, writer: &mut W, theme: Theme) -> Result<(), Txt2XlsxError> {
        writeln!(writer, "<div class=\"{}\">", theme.css_class())?;
        writeln!(writer, "  <h3>{}</h3>", escape_html(&self.heading()))?;
        writeln!(writer, "  <p>{}</p>", escape_html(&self.counts()))?;

        if self.total_rows == 0 {
            writeln!(writer, "  <p>No rows found in the provided text.</p>")?;
            writeln!(writer, "</div>")?;
            writer.flush()?;
            return Ok(());
        }

        writeln!(writer, "  <table>")?;
        writeln!(writer, "    <thead>")?;
        writeln!(writer, "      <tr>")?;
        for column in &self.header {
            writeln!(writer, "        <th>{}</th>", escape_html(column))?;
        }
        writeln!(writer, "      </tr>")?;
        writeln!(writer, "    </thead>")?;

        writeln!(writer, "    <tbody>")?;
        for row in &self.cells {
            writeln!(writer, "      <tr>")?;
            for cell in row {
                if cell.is_null {
                    writeln!(writer, "        <td class=\"null\"><em>{}</em></td>", NULL_MARKER)?;
                } else {
                    writeln!(writer, "        <td>{}</td>", escape_html(&cell.content))?;
                }
            }
            writeln!(writer, "      </tr>")?;
        }
        writeln!(writer, "    </tbody>")?;
        writeln!(writer, "  </table>")?;

        if let Some(summary) = &self.summary {
            writeln!(
                writer,
                "  <p class=\"summary\"><strong>Summary:</strong> {}</p>",
                escape_html(summary)
            )?;
        }

        writeln!(writer, "</div>")?;
        writer.flush()?;
        Ok(())
    }
}

/// 列幅を計算（内部ヘルパー）
///
/// 各列について、ヘッダーとすべての行の表示幅を計算し、列ごとの最大幅を返します。
/// 最小幅は3文字（区切り行の最小幅）です。全角文字は表示幅2として計算します。
fn calculate_column_widths(header: &[String], body: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = header.iter().map(|h| h.width().max(3)).collect();

    for row in body {
        for (col_idx, content) in row.iter().enumerate() {
            widths[col_idx] = widths[col_idx].max(content.width());
        }
    }

    widths
}

/// ヘッダー区切り行を生成（内部ヘルパー）
fn generate_separator(col_widths: &[usize]) -> String {
    let mut parts = vec!["|".to_string()];

    for &width in col_widths {
        // セルの前後のスペース（各1文字）+ セル幅分のハイフン
        parts.push("-".repeat(width + 2));
        parts.push("|".to_string());
    }

    parts.join("")
}

/// 1行分のMarkdownを出力（内部ヘルパー）
fn write_markdown_row<W: Write>(
    writer: &mut W,
    row: &[String],
    col_widths: &[usize],
) -> Result<(), Txt2XlsxError> {
    write!(writer, "|")?;
    for (content, &width) in row.iter().zip(col_widths) {
        // 表示幅に基づいて右側を埋める
        let padding = width.saturating_sub(content.width());
        write!(writer, " {}{} |", content, " ".repeat(padding))?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Markdownテーブル内で意味を持つ文字をエスケープ
fn escape_markdown(s: &str) -> String {
    s.trim()
        .replace('|', "\\|")
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
}

/// HTML特殊文字をエスケープ
fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
