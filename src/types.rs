//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use serde::{Deserialize, Serialize};

/// 欠損セルの表示に使用するマーカー
pub const NULL_MARKER: &str = "null";

/// ファイル名が空の場合に使用する既定のファイル名
pub const DEFAULT_FILENAME: &str = "extracted_data";

/// セルの値を表す列挙型
///
/// 抽出APIの応答に含まれるJSONスカラー値をそのまま表現します。
/// スキーマ上は文字列ですが、モデルが数値や論理値を返す場合も受け付けます。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// 論理値
    Bool(bool),

    /// 数値（f64）
    Number(f64),

    /// 文字列
    String(String),

    /// 欠損値（JSONの`null`）
    Null,
}

impl CellValue {
    /// 値が欠損かどうかを判定
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// 値を表示用の文字列に変換
    ///
    /// 欠損値の場合は`None`を返します。呼び出し側で[`NULL_MARKER`]に置き換えます。
    pub fn display_text(&self) -> Option<String> {
        match self {
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::String(s) => Some(s.clone()),
            CellValue::Null => None,
        }
    }

    /// 列幅推定に使用する文字数
    ///
    /// 欠損値と空文字列は0として扱います。
    pub fn char_len(&self) -> usize {
        self.display_text().map_or(0, |s| s.chars().count())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// 整数値の場合は小数点を付けずに出力する
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// カレンダーイベント
///
/// テーブルに付随する任意のイベント情報です。カレンダーリンクの生成時にのみ
/// 一時的に使用され、永続化されません。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// イベントのタイトル
    pub title: String,

    /// イベントの説明
    #[serde(default)]
    pub description: String,

    /// 開始日時（パース可能な任意の日時文字列）
    pub start_date: String,

    /// 終了日時（パース可能な任意の日時文字列）
    pub end_date: String,

    /// 場所
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// 抽出されたテーブル
///
/// 抽出APIの応答（Extraction reply）を表す中心的なデータ型です。
///
/// # 不変条件
///
/// 行の長さは列数と一致するとは限りません。レンダラーは短い行を
/// [`NULL_MARKER`]で補完し、列数を超えるセルは無視します。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedTable {
    /// 拡張子なしのファイル名
    #[serde(default)]
    pub filename: String,

    /// 列名のリスト
    pub columns: Vec<String>,

    /// データ行のリスト
    pub rows: Vec<Vec<CellValue>>,

    /// 1文の要約
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// カレンダーイベント
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_event: Option<CalendarEvent>,
}

impl ExtractedTable {
    /// 新しいテーブルを生成
    pub fn new(filename: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            filename: filename.into(),
            columns,
            rows,
            summary: None,
            calendar_event: None,
        }
    }

    /// 要約を設定
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// カレンダーイベントを設定
    pub fn with_calendar_event(mut self, event: CalendarEvent) -> Self {
        self.calendar_event = Some(event);
        self
    }

    /// データ行数
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 列数
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// 指定位置のセルを取得
    ///
    /// 行が短い場合や値が欠損している場合は`None`を返します。
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .filter(|v| !v.is_null())
    }

    /// 表示用のファイル名（空文字列の場合のみ既定値）
    pub fn display_filename(&self) -> &str {
        if self.filename.is_empty() {
            DEFAULT_FILENAME
        } else {
            &self.filename
        }
    }

    /// 空でない要約を返す
    pub fn non_empty_summary(&self) -> Option<&str> {
        self.summary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
