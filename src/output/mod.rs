//! Output Format Module
//!
//! Strategy Patternによるプレビュー出力フォーマットの抽象化を提供するモジュール。

mod formatters;

use crate::api::{PreviewFormat, Theme};
use crate::error::Txt2XlsxError;
use crate::grid::PreviewGrid;
use std::io::Write;

pub use formatters::*;

/// 出力フォーマッター（Strategy Pattern）
///
/// 各出力フォーマット（Markdown, HTML, JSON, CSV）をenumとして表現します。
#[derive(Debug, Clone, Copy)]
pub enum OutputFormatter {
    Markdown,
    Html,
    Json,
    Csv,
}

impl OutputFormatter {
    /// 出力フォーマットからフォーマッターを生成
    pub fn from_format(format: PreviewFormat) -> Self {
        match format {
            PreviewFormat::Markdown => OutputFormatter::Markdown,
            PreviewFormat::Html => OutputFormatter::Html,
            PreviewFormat::Json => OutputFormatter::Json,
            PreviewFormat::Csv => OutputFormatter::Csv,
        }
    }

    /// グリッドを指定されたフォーマットで出力する
    ///
    /// # 引数
    ///
    /// * `grid` - 出力するグリッド
    /// * `writer` - 出力先のライター
    /// * `theme` - 配色テーマ（HTML形式で使用）
    pub fn render<W: Write>(
        &self,
        grid: &PreviewGrid,
        writer: &mut W,
        theme: Theme,
    ) -> Result<(), Txt2XlsxError> {
        match self {
            OutputFormatter::Markdown => MarkdownFormatter.render(grid, writer, theme),
            OutputFormatter::Html => HtmlFormatter.render(grid, writer, theme),
            OutputFormatter::Json => JsonFormatter.render(grid, writer, theme),
            OutputFormatter::Csv => CsvFormatter.render(grid, writer, theme),
        }
    }
}
