//! Workbook Export Module
//!
//! 抽出されたテーブルをXLSXワークブックに変換するモジュール。
//! `[columns, ...rows]`を1枚目のシートに書き込み、列幅の推定、
//! オートフィルター、要約シートの追加を行います。

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};

use crate::api::ExportOptions;
use crate::error::Txt2XlsxError;
use crate::security::{sanitize_filename, SecurityConfig};
use crate::types::{CellValue, ExtractedTable};

/// データシートの名前
pub const DATA_SHEET_NAME: &str = "Extracted Data";

/// 要約シートの名前
pub const SUMMARY_SHEET_NAME: &str = "Info";

/// 列幅の推定に使用する先頭行数
const WIDTH_SAMPLE_ROWS: usize = 10;

/// 列幅に加える余白（文字数）
const WIDTH_PADDING: usize = 5;

/// 列幅の上限（文字数）
const MAX_COLUMN_WIDTH: usize = 50;

/// 出力ファイル名を生成する
///
/// ファイル名を無害化し、`.xlsx`を付加します。
///
/// # 使用例
///
/// ```rust
/// use txt2xlsx::{output_filename, ExtractedTable};
///
/// let table = ExtractedTable::new("Q1 sales", vec![], vec![]);
/// assert_eq!(output_filename(&table), "Q1_sales.xlsx");
/// ```
pub fn output_filename(table: &ExtractedTable) -> String {
    format!("{}.xlsx", sanitize_filename(table.display_filename()))
}

/// 列幅を推定する
///
/// 各列について、ヘッダーと先頭10行の値のうち最長の文字数に余白5文字を加え、
/// 50文字で上限を設けます。欠損値と空文字列は無視します。
pub(crate) fn column_widths(table: &ExtractedTable) -> Vec<usize> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(col_idx, column)| {
            let longest = table
                .rows
                .iter()
                .take(WIDTH_SAMPLE_ROWS)
                .filter_map(|row| row.get(col_idx))
                .map(CellValue::char_len)
                .fold(column.chars().count(), usize::max);

            (longest + WIDTH_PADDING).min(MAX_COLUMN_WIDTH)
        })
        .collect()
}

/// ワークブックを構築する
///
/// # 処理フロー
///
/// 1. テーブルが1シートに収まるかを検証
/// 2. データシートにヘッダー行とデータ行を書き込み
/// 3. 列幅とオートフィルターを設定
/// 4. 要約がある場合は要約シートを追加
pub(crate) fn build_workbook(
    table: &ExtractedTable,
    options: &ExportOptions,
    security: &SecurityConfig,
) -> Result<Workbook, Txt2XlsxError> {
    security.validate_table(table)?;

    let mut workbook = Workbook::new();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(DATA_SHEET_NAME)?;
    write_data_sheet(worksheet, table, options)?;

    if options.include_summary {
        if let Some(summary) = table.non_empty_summary() {
            let summary_sheet = workbook.add_worksheet();
            summary_sheet.set_name(SUMMARY_SHEET_NAME)?;
            summary_sheet.write_string(0, 0, "Summary")?;
            summary_sheet.write_string(1, 0, summary)?;
            summary_sheet.set_column_width(0, MAX_COLUMN_WIDTH as f64)?;
        }
    }

    Ok(workbook)
}

/// データシートを書き込む（内部ヘルパー）
///
/// 行数・列数は`SecurityConfig::validate_table`で検証済みのため、
/// `u32`/`u16`への変換で切り捨ては発生しません。
///
/// 欠損値・空文字列・ヘッダーに満たない部分は書式付きの空セルとして書き込み、
/// 値のない行もシート上に残します（シートは常に`row_count + 1`行）。
fn write_data_sheet(
    worksheet: &mut Worksheet,
    table: &ExtractedTable,
    options: &ExportOptions,
) -> Result<(), Txt2XlsxError> {
    // 既定書式の空セルは出力されないため、既定以外の書式を使う
    let blank = Format::new().set_align(FormatAlign::Left);

    for (col_idx, column) in table.columns.iter().enumerate() {
        worksheet.write_string(0, col_idx as u16, column)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let sheet_row = row_idx as u32 + 1;
        let width = row.len().max(table.column_count()).max(1);
        for col_idx in 0..width {
            let sheet_col = col_idx as u16;
            match row.get(col_idx) {
                Some(CellValue::String(s)) if !s.is_empty() => {
                    worksheet.write_string(sheet_row, sheet_col, s)?;
                }
                Some(CellValue::Number(n)) => {
                    worksheet.write_number(sheet_row, sheet_col, *n)?;
                }
                Some(CellValue::Bool(b)) => {
                    worksheet.write_boolean(sheet_row, sheet_col, *b)?;
                }
                _ => {
                    worksheet.write_blank(sheet_row, sheet_col, &blank)?;
                }
            }
        }
    }

    for (col_idx, width) in column_widths(table).into_iter().enumerate() {
        worksheet.set_column_width(col_idx as u16, width as f64)?;
    }

    if options.auto_filter && table.row_count() > 0 {
        let last_col = last_column(table);
        worksheet.autofilter(0, 0, table.row_count() as u32, last_col)?;
    }

    Ok(())
}

/// 書き込み済み範囲の最終列（内部ヘルパー）
///
/// ヘッダーより長い行がある場合は、その行の最終列まで含めます。
fn last_column(table: &ExtractedTable) -> u16 {
    let widest = table
        .rows
        .iter()
        .map(Vec::len)
        .fold(table.column_count(), usize::max);
    widest.saturating_sub(1) as u16
}

/// ワークブックをディレクトリに保存し、保存先のパスを返す
pub(crate) fn save_workbook(
    table: &ExtractedTable,
    options: &ExportOptions,
    security: &SecurityConfig,
    dir: &Path,
) -> Result<PathBuf, Txt2XlsxError> {
    let mut workbook = build_workbook(table, options, security)?;
    let path = dir.join(output_filename(table));

    workbook.save(&path)?;
    log::info!(
        "Saved {} ({} rows, {} columns)",
        path.display(),
        table.row_count(),
        table.column_count()
    );

    Ok(path)
}

/// ワークブックをメモリ上のバイト列として生成する
pub(crate) fn workbook_to_buffer(
    table: &ExtractedTable,
    options: &ExportOptions,
    security: &SecurityConfig,
) -> Result<Vec<u8>, Txt2XlsxError> {
    let mut workbook = build_workbook(table, options, security)?;
    Ok(workbook.save_to_buffer()?)
}
