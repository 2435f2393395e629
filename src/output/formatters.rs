//! Output Formatters Implementation
//!
//! 各出力フォーマットの実装を提供するモジュール。

use crate::api::Theme;
use crate::error::Txt2XlsxError;
use crate::grid::PreviewGrid;
use std::io::Write;

/// Markdown形式のフォーマッター
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn render<W: Write>(
        &self,
        grid: &PreviewGrid,
        writer: &mut W,
        _theme: Theme,
    ) -> Result<(), Txt2XlsxError> {
        grid.render_markdown(writer)
    }
}

/// HTML形式のフォーマッター
pub struct HtmlFormatter;

impl HtmlFormatter {
    pub fn render<W: Write>(
        &self,
        grid: &PreviewGrid,
        writer: &mut W,
        theme: Theme,
    ) -> Result<(), Txt2XlsxError> {
        grid.render_html(writer, theme)
    }
}

/// JSON形式のフォーマッター
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn render<W: Write>(
        &self,
        grid: &PreviewGrid,
        writer: &mut W,
        _theme: Theme,
    ) -> Result<(), Txt2XlsxError> {
        use serde_json::{json, Value};

        // 補完されたセルはnullとして出力
        let json_rows: Vec<Value> = (0..grid.get_rows())
            .map(|row_idx| {
                grid.get_row(row_idx)
                    .iter()
                    .map(|cell| {
                        if cell.is_null {
                            Value::Null
                        } else {
                            json!(cell.content)
                        }
                    })
                    .collect()
            })
            .collect();

        let mut json_output = json!({
            "filename": grid.title,
            "columns": grid.header(),
            "rows": json_rows,
            "totalRows": grid.total_rows,
        });
        if let Some(summary) = &grid.summary {
            json_output["summary"] = json!(summary);
        }

        serde_json::to_writer_pretty(&mut *writer, &json_output)?;
        writeln!(writer)?;
        writer.flush()?;

        Ok(())
    }
}

/// CSV形式のフォーマッター
pub struct CsvFormatter;

impl CsvFormatter {
    pub fn render<W: Write>(
        &self,
        grid: &PreviewGrid,
        writer: &mut W,
        _theme: Theme,
    ) -> Result<(), Txt2XlsxError> {
        if grid.get_cols() == 0 {
            return Ok(());
        }

        let header: Vec<String> = grid.header().iter().map(|h| escape_csv(h)).collect();
        writeln!(writer, "{}", header.join(","))?;

        // 補完されたセルは空フィールドとして出力
        for row_idx in 0..grid.get_rows() {
            let fields: Vec<String> = grid
                .get_row(row_idx)
                .iter()
                .map(|cell| {
                    if cell.is_null {
                        String::new()
                    } else {
                        escape_csv(&cell.content)
                    }
                })
                .collect();
            writeln!(writer, "{}", fields.join(","))?;
        }

        writer.flush()?;
        Ok(())
    }
}

/// CSV文字列をエスケープ
///
/// ダブルクォート、改行、カンマを含む場合はダブルクォートで囲み、
/// 内部のダブルクォートは2つにエスケープします。
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
