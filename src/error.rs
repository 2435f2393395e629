//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// ユーザーに表示する汎用エラーメッセージ
///
/// 抽出処理の失敗原因（ネットワーク、HTTPステータス、JSON解析など）は
/// ログにのみ出力し、ユーザーにはこのメッセージだけを提示します。
pub const GENERIC_ERROR_MESSAGE: &str =
    "Failed to process text. Please try again or check your API key configuration.";

/// txt2xlsxクレート全体で使用するエラー型
///
/// テキストの抽出リクエスト、応答の解析、ワークブックの書き出し処理中に発生する
/// すべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー（入力ファイルの読み込み、出力先の作成など）
/// - `Http`: 抽出APIへのHTTPリクエストが失敗したエラー
/// - `Json`: 抽出APIの応答をJSONとして解析できなかったエラー
/// - `Xlsx`: ワークブックの生成に失敗したエラー
/// - `Config`: 設定の検証に失敗したエラー（APIキー未設定など）
/// - `Provider`: 抽出APIがエラーステータスを返したエラー
/// - `EmptyResponse`: 抽出APIの応答が空だったエラー
/// - `InvalidState`: セッションの状態遷移が許可されていないエラー
/// - `SecurityViolation`: 入力サイズなどの制限に違反したエラー
///
/// # 使用例
///
/// ```rust,no_run
/// use txt2xlsx::Txt2XlsxError;
/// use std::fs;
///
/// fn read_source_text(path: &str) -> Result<String, Txt2XlsxError> {
///     let text = fs::read_to_string(path)?;  // Ioエラーが自動的に変換される
///     Ok(text)
/// }
/// ```
#[derive(Error, Debug)]
pub enum Txt2XlsxError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 抽出APIへのHTTPリクエスト中に発生したエラー
    ///
    /// 接続失敗、タイムアウト、TLSエラーなどが原因となります。
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSONのシリアライズ・デシリアライズ中に発生したエラー
    ///
    /// 抽出APIの応答が期待するスキーマに一致しない場合に発生します。
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ワークブックの生成中に発生したエラー
    #[error("Failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// 設定の検証に失敗したエラー
    ///
    /// `ExtractorBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。例えば、APIキーが空の場合や、temperatureが範囲外の場合などです。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use txt2xlsx::{ExtractorBuilder, Txt2XlsxError};
    ///
    /// let result = ExtractorBuilder::new()
    ///     .with_api_key("")  // 空のAPIキー
    ///     .build();
    ///
    /// match result {
    ///     Err(Txt2XlsxError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// 抽出APIがエラーステータスを返したエラー
    #[error("Provider error (HTTP {status}): {message}")]
    Provider {
        /// HTTPステータスコード
        status: u16,
        /// API側のエラーメッセージ
        message: String,
    },

    /// 抽出APIの応答にテキストが含まれていなかったエラー
    #[error("No response received from the extraction API")]
    EmptyResponse,

    /// セッションの状態遷移が許可されていないエラー
    ///
    /// 抽出処理中の再送信や、テーブル未生成時のダウンロードなどで発生します。
    #[error("Invalid session state: {0}")]
    InvalidState(String),

    /// 入力制限に違反したエラー
    ///
    /// 入力テキストのサイズ上限や、スプレッドシートの行数・列数の上限を
    /// 超えた場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

impl Txt2XlsxError {
    /// ユーザーに表示するメッセージを返す
    ///
    /// 抽出処理に起因するエラーはすべて[`GENERIC_ERROR_MESSAGE`]に縮約されます。
    /// 状態エラーと設定エラーは利用者の操作ミスなので、そのまま表示します。
    pub fn user_message(&self) -> String {
        match self {
            Txt2XlsxError::Config(_) | Txt2XlsxError::InvalidState(_) => self.to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}
