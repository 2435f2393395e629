//! Public API Types
//!
//! 公開APIで使用する列挙型と設定構造体を定義するモジュール。

/// セッションの処理状態
///
/// 状態は `Idle → Processing → Success | Error` の一方向に遷移し、
/// `clear()`で`Idle`に戻ります。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingStatus {
    /// 入力待ち（初期状態）
    #[default]
    Idle,

    /// 抽出リクエストを実行中
    Processing,

    /// 抽出に成功し、テーブルを保持している
    Success,

    /// 抽出に失敗し、エラーメッセージを保持している
    Error,
}

/// プレビューの配色テーマ
///
/// HTMLプレビューのクラス名に反映されます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// ライトテーマ（デフォルト）
    #[default]
    Light,

    /// ダークテーマ
    Dark,
}

impl Theme {
    /// もう一方のテーマを返す
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// HTMLのクラス名
    pub fn css_class(self) -> &'static str {
        match self {
            Theme::Light => "txt2xlsx-light",
            Theme::Dark => "txt2xlsx-dark",
        }
    }
}

/// プレビューの出力フォーマット
///
/// 抽出したテーブルを書き出す前に確認する際の出力形式を指定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum PreviewFormat {
    /// Markdown形式（デフォルト）
    ///
    /// # 出力例
    ///
    /// ```markdown
    /// | Month | Amount |
    /// | ----- | ------ |
    /// | Jan   | 100    |
    /// ```
    #[default]
    Markdown,

    /// HTML形式
    ///
    /// テーマに応じたクラス名を持つ`<table>`として出力します。
    Html,

    /// JSON形式
    ///
    /// # 出力例
    ///
    /// ```json
    /// {
    ///   "columns": ["Month", "Amount"],
    ///   "rows": [["Jan", "100"]]
    /// }
    /// ```
    Json,

    /// CSV形式
    Csv,
}

/// ワークブック書き出しの設定
///
/// # 使用例
///
/// ```rust,no_run
/// use txt2xlsx::ExportOptions;
///
/// let options = ExportOptions {
///     include_summary: false,
///     ..ExportOptions::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// 要約を`Info`シートとして追加するか
    pub include_summary: bool,

    /// データ範囲にオートフィルターを設定するか
    pub auto_filter: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_summary: true,
            auto_filter: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::default(), Theme::Light);
    }

    #[test]
    fn test_export_options_default() {
        let options = ExportOptions::default();
        assert!(options.include_summary);
        assert!(options.auto_filter);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ProcessingStatus::default(), ProcessingStatus::Idle);
        assert_eq!(PreviewFormat::default(), PreviewFormat::Markdown);
    }
}
