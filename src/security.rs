//! Security Module
//!
//! 入力サイズの制限と、出力ファイル名の無害化を提供するモジュール。

use crate::error::Txt2XlsxError;
use crate::types::{ExtractedTable, DEFAULT_FILENAME};

/// Excelの最大行数（ヘッダー行を含む）
const EXCEL_MAX_ROWS: usize = 1_048_576;

/// Excelの最大列数（XFD）
const EXCEL_MAX_COLUMNS: usize = 16_384;

/// セキュリティ設定
///
/// 抽出リクエストと書き出し処理の制限を定義します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SecurityConfig {
    /// 入力テキストの最大サイズ（バイト）
    /// デフォルト: 1MiB (1_048_576 bytes)
    pub max_input_bytes: usize,
    /// 1シートに書き出せる最大列数
    /// デフォルト: 16384
    pub max_columns: usize,
    /// 1シートに書き出せる最大データ行数（ヘッダー行を除く）
    /// デフォルト: 1048575
    pub max_rows: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: 1_048_576, // 1MiB
            max_columns: EXCEL_MAX_COLUMNS,
            max_rows: EXCEL_MAX_ROWS - 1,
        }
    }
}

impl SecurityConfig {
    /// 入力テキストのサイズを検証する
    pub fn validate_input(&self, text: &str) -> Result<(), Txt2XlsxError> {
        if text.len() > self.max_input_bytes {
            return Err(Txt2XlsxError::SecurityViolation(format!(
                "Input text size exceeds maximum: {} bytes (max: {} bytes)",
                text.len(),
                self.max_input_bytes
            )));
        }
        Ok(())
    }

    /// 抽出されたテーブルが1シートに収まるかを検証する
    pub fn validate_table(&self, table: &ExtractedTable) -> Result<(), Txt2XlsxError> {
        if table.column_count() > self.max_columns {
            return Err(Txt2XlsxError::SecurityViolation(format!(
                "Column count exceeds maximum: {} (max: {})",
                table.column_count(),
                self.max_columns
            )));
        }
        if let Some(width) = table
            .rows
            .iter()
            .map(Vec::len)
            .find(|&len| len > self.max_columns)
        {
            return Err(Txt2XlsxError::SecurityViolation(format!(
                "Row width exceeds maximum: {} (max: {})",
                width, self.max_columns
            )));
        }
        if table.row_count() > self.max_rows {
            return Err(Txt2XlsxError::SecurityViolation(format!(
                "Row count exceeds maximum: {} (max: {})",
                table.row_count(),
                self.max_rows
            )));
        }
        Ok(())
    }
}

/// ファイル名の無害化
///
/// `[A-Za-z0-9-_]`以外の文字をすべて`_`に置き換えます。
/// パス区切り文字や`.`も置換されるため、結果は常に単一のファイル名になります。
/// 空のファイル名は[`DEFAULT_FILENAME`]に置き換えます。
///
/// # 使用例
///
/// ```rust
/// use txt2xlsx::sanitize_filename;
///
/// assert_eq!(sanitize_filename("Q1 sales/report"), "Q1_sales_report");
/// assert_eq!(sanitize_filename(""), "extracted_data");
/// ```
pub fn sanitize_filename(stem: &str) -> String {
    let stem = if stem.is_empty() { DEFAULT_FILENAME } else { stem };

    stem.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
