//! Builder Module
//!
//! Fluent Builder APIを提供し、`Extractor`インスタンスを段階的に構築する。

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::api::{ExportOptions, PreviewFormat, Theme};
use crate::config::ClientConfig;
use crate::error::Txt2XlsxError;
use crate::provider::{ExtractionBackend, ExtractionRequest, GeminiBackend};
use crate::security::SecurityConfig;
use crate::types::ExtractedTable;

/// プレビューに表示する既定の最大行数
pub const DEFAULT_PREVIEW_LIMIT: usize = 50;

/// 抽出処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ExtractionConfig {
    /// 抽出APIの接続設定
    pub client: ClientConfig,

    /// プレビューの最大行数
    pub preview_limit: usize,

    /// ワークブック書き出しの設定
    pub export_options: ExportOptions,

    /// 入力・出力の制限
    pub security: SecurityConfig,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            export_options: ExportOptions::default(),
            security: SecurityConfig::default(),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Extractor`インスタンスを段階的に構築するためのビルダーです。
/// APIキー以外のすべての設定項目にデフォルト値が設定されており、必要な設定のみを
/// オーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use txt2xlsx::ExtractorBuilder;
///
/// # fn main() -> Result<(), txt2xlsx::Txt2XlsxError> {
/// let extractor = ExtractorBuilder::new()
///     .with_api_key("my-api-key")
///     .with_preview_limit(20)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ExtractorBuilder {
    /// 内部設定（構築中）
    config: ExtractionConfig,

    /// 独自のバックエンド（未指定の場合はGemini）
    backend: Option<Box<dyn ExtractionBackend>>,
}

impl Default for ExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractorBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - モデル: `gemini-2.5-flash`
    /// - temperature: 0.1
    /// - タイムアウト: 60秒
    /// - プレビュー行数: 50
    /// - 書き出し: 要約シートあり、オートフィルターあり
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
            backend: None,
        }
    }

    /// 環境変数の設定を初期値とするビルダーを生成する
    ///
    /// 読み込む環境変数は[`ClientConfig::from_env`]を参照してください。
    pub fn from_env() -> Self {
        Self::new().with_client_config(ClientConfig::from_env())
    }

    /// 接続設定をまとめて指定する
    pub fn with_client_config(mut self, client: ClientConfig) -> Self {
        self.config.client = client;
        self
    }

    /// APIキーを指定する
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.client.api_key = api_key.into();
        self
    }

    /// モデル名を指定する
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.config.client.model = model.into();
        self
    }

    /// APIベースURLを指定する
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.client.base_url = base_url.into();
        self
    }

    /// サンプリング温度を指定する
    ///
    /// # 制約
    ///
    /// * `0.0 <= temperature <= 2.0` でなければならない
    /// * 制約違反の場合、`build()`時に`Txt2XlsxError::Config`を返す
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config.client.temperature = temperature;
        self
    }

    /// リクエストタイムアウトを指定する
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.client.timeout = timeout;
        self
    }

    /// プレビューに表示する最大行数を指定する
    ///
    /// 0を指定した場合、`build()`時に`Txt2XlsxError::Config`を返します。
    pub fn with_preview_limit(mut self, limit: usize) -> Self {
        self.config.preview_limit = limit;
        self
    }

    /// ワークブック書き出しの設定を指定する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use txt2xlsx::{ExportOptions, ExtractorBuilder};
    ///
    /// let builder = ExtractorBuilder::new().with_export_options(ExportOptions {
    ///     include_summary: false,
    ///     auto_filter: true,
    /// });
    /// ```
    pub fn with_export_options(mut self, options: ExportOptions) -> Self {
        self.config.export_options = options;
        self
    }

    /// 入力テキストの最大サイズ（バイト）を指定する
    pub fn with_max_input_bytes(mut self, max: usize) -> Self {
        self.config.security.max_input_bytes = max;
        self
    }

    /// 独自のバックエンドを指定する
    ///
    /// 指定した場合、APIキーは検証されません。
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use txt2xlsx::{ExtractorBuilder, StaticBackend};
    ///
    /// let reply = r#"{"filename":"sales","columns":["Month"],"rows":[["Jan"]]}"#;
    /// let extractor = ExtractorBuilder::new()
    ///     .with_backend(StaticBackend::new(reply))
    ///     .build()
    ///     .unwrap();
    /// let table = extractor.extract("Sales: Jan").unwrap();
    /// assert_eq!(table.filename, "sales");
    /// ```
    pub fn with_backend(mut self, backend: impl ExtractionBackend + 'static) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    /// 設定を検証し、`Extractor`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `Txt2XlsxError::Config(String)`: 設定の検証に失敗した場合
    ///   * APIキーが空（独自バックエンド未指定時）
    ///   * モデル名が空
    ///   * temperatureが範囲外
    ///   * タイムアウトが0
    ///   * ベースURLが不正
    ///   * プレビュー行数が0
    /// * `Txt2XlsxError::Http`: HTTPクライアントの初期化に失敗した場合
    pub fn build(self) -> Result<Extractor, Txt2XlsxError> {
        // 1. 接続設定の検証
        self.config.client.validate(self.backend.is_none())?;

        // 2. プレビュー行数の検証
        if self.config.preview_limit == 0 {
            return Err(Txt2XlsxError::Config(
                "Preview limit must be at least 1".to_string(),
            ));
        }

        // 3. バックエンドの生成
        let backend = match self.backend {
            Some(backend) => backend,
            None => Box::new(GeminiBackend::new(&self.config.client)?),
        };

        Ok(Extractor {
            config: self.config,
            backend,
        })
    }
}

/// 抽出処理のファサード
///
/// テキストからテーブルを抽出し、プレビュー・ワークブック・カレンダーリンクを
/// 生成するためのメインエントリーポイントです。
///
/// # 使用例
///
/// ```rust,no_run
/// use txt2xlsx::ExtractorBuilder;
///
/// # fn main() -> Result<(), txt2xlsx::Txt2XlsxError> {
/// let extractor = ExtractorBuilder::from_env().build()?;
/// let table = extractor.extract("Sales: Jan $100, Feb $200")?;
/// println!("{}", extractor.preview_to_string(&table)?);
/// let path = extractor.export(&table, ".")?;
/// println!("saved to {}", path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Extractor {
    /// 抽出設定
    config: ExtractionConfig,

    /// 抽出APIのバックエンド
    backend: Box<dyn ExtractionBackend>,
}

impl Extractor {
    /// テキストからテーブルを抽出する
    ///
    /// # 処理フロー
    ///
    /// 1. 入力テキストの検証（空白のみ・サイズ上限）
    /// 2. 固定スキーマ付きのリクエストを1回だけ送信
    /// 3. 応答をJSONとして解析
    /// 4. 行数・列数の上限を検証
    ///
    /// # 発生し得るエラー
    ///
    /// * `Txt2XlsxError::InvalidState`: 入力が空白のみの場合
    /// * `Txt2XlsxError::SecurityViolation`: 入力または応答が上限を超えた場合
    /// * `Txt2XlsxError::EmptyResponse`: 応答が空の場合
    /// * `Txt2XlsxError::Json`: 応答がスキーマに一致しない場合
    /// * `Txt2XlsxError::Http` / `Txt2XlsxError::Provider`: 通信に失敗した場合
    pub fn extract(&self, text: &str) -> Result<ExtractedTable, Txt2XlsxError> {
        if text.trim().is_empty() {
            return Err(Txt2XlsxError::InvalidState(
                "input text is empty".to_string(),
            ));
        }
        self.config.security.validate_input(text)?;

        let request = ExtractionRequest {
            prompt: crate::schema::build_prompt(text),
            schema: crate::schema::response_schema(),
            temperature: self.config.client.temperature,
        };

        log::debug!(
            "Sending {} bytes of text to {}",
            text.len(),
            self.backend.name()
        );
        let reply = self.backend.complete(&request)?;
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(Txt2XlsxError::EmptyResponse);
        }

        let table: ExtractedTable = serde_json::from_str(reply)?;
        self.config.security.validate_table(&table)?;

        log::info!(
            "Extracted '{}' ({} rows, {} columns)",
            table.display_filename(),
            table.row_count(),
            table.column_count()
        );

        Ok(table)
    }

    /// テーブルのプレビューを出力する
    ///
    /// 最大`preview_limit`行を、指定されたフォーマットで出力します。
    /// 短い行は`null`マーカーで補完されます。
    pub fn preview<W: Write>(
        &self,
        table: &ExtractedTable,
        format: PreviewFormat,
        theme: Theme,
        writer: &mut W,
    ) -> Result<(), Txt2XlsxError> {
        let grid = crate::grid::PreviewGrid::build(table, self.config.preview_limit);
        let formatter = crate::output::OutputFormatter::from_format(format);
        formatter.render(&grid, writer, theme)
    }

    /// テーブルのプレビューをMarkdown文字列として返す
    pub fn preview_to_string(&self, table: &ExtractedTable) -> Result<String, Txt2XlsxError> {
        let mut buffer = Vec::new();
        self.preview(table, PreviewFormat::Markdown, Theme::default(), &mut buffer)?;

        let result = String::from_utf8(buffer).map_err(|e| {
            Txt2XlsxError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;

        Ok(result)
    }

    /// テーブルをワークブックとして`dir`に保存し、保存先のパスを返す
    ///
    /// ファイル名は[`crate::output_filename`]で生成されます。
    pub fn export(
        &self,
        table: &ExtractedTable,
        dir: impl AsRef<Path>,
    ) -> Result<PathBuf, Txt2XlsxError> {
        crate::export::save_workbook(
            table,
            &self.config.export_options,
            &self.config.security,
            dir.as_ref(),
        )
    }

    /// テーブルをワークブックのバイト列として返す
    pub fn export_to_buffer(&self, table: &ExtractedTable) -> Result<Vec<u8>, Txt2XlsxError> {
        crate::export::workbook_to_buffer(table, &self.config.export_options, &self.config.security)
    }

    /// テーブルに対応するカレンダーリンクを生成する
    pub fn calendar_url(&self, table: &ExtractedTable, now: DateTime<Utc>) -> String {
        crate::calendar::calendar_url_for_table(table, now)
    }

    /// プレビューの最大行数
    pub fn preview_limit(&self) -> usize {
        self.config.preview_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::StaticBackend;
    use std::cell::RefCell;
    use std::rc::Rc;

    const SALES_REPLY: &str = r#"{
        "filename": "sales",
        "columns": ["Month", "Amount"],
        "rows": [["Jan", "100"], ["Feb", "200"]]
    }"#;

    /// 受け取ったリクエストを記録するバックエンド
    #[derive(Debug, Clone, Default)]
    struct RecordingBackend {
        requests: Rc<RefCell<Vec<ExtractionRequest>>>,
    }

    impl ExtractionBackend for RecordingBackend {
        fn complete(&self, request: &ExtractionRequest) -> Result<String, Txt2XlsxError> {
            self.requests.borrow_mut().push(request.clone());
            Ok(SALES_REPLY.to_string())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn static_extractor(reply: &str) -> Extractor {
        ExtractorBuilder::new()
            .with_backend(StaticBackend::new(reply))
            .build()
            .unwrap()
    }

    #[test]
    fn test_extractor_builder_new() {
        let builder = ExtractorBuilder::new();
        assert_eq!(builder.config.preview_limit, DEFAULT_PREVIEW_LIMIT);
        assert_eq!(builder.config.export_options, ExportOptions::default());
        assert_eq!(builder.config.client.model, crate::config::DEFAULT_MODEL);
        assert!(builder.backend.is_none());
    }

    #[test]
    fn test_builder_method_chaining() {
        let builder = ExtractorBuilder::new()
            .with_api_key("key")
            .with_model("gemini-2.5-pro")
            .with_base_url("http://localhost:8080")
            .with_temperature(0.5)
            .with_timeout(Duration::from_secs(5))
            .with_preview_limit(10)
            .with_max_input_bytes(100)
            .with_export_options(ExportOptions {
                include_summary: false,
                auto_filter: false,
            });

        assert_eq!(builder.config.client.api_key, "key");
        assert_eq!(builder.config.client.model, "gemini-2.5-pro");
        assert_eq!(builder.config.client.base_url, "http://localhost:8080");
        assert_eq!(builder.config.client.temperature, 0.5);
        assert_eq!(builder.config.client.timeout, Duration::from_secs(5));
        assert_eq!(builder.config.preview_limit, 10);
        assert_eq!(builder.config.security.max_input_bytes, 100);
        assert!(!builder.config.export_options.include_summary);
    }

    #[test]
    fn test_build_success_with_api_key() {
        let result = ExtractorBuilder::new().with_api_key("key").build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_build_without_api_key() {
        match ExtractorBuilder::new().build() {
            Err(Txt2XlsxError::Config(msg)) => assert!(msg.contains("API key")),
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_build_with_zero_preview_limit() {
        let result = ExtractorBuilder::new()
            .with_api_key("key")
            .with_preview_limit(0)
            .build();
        match result {
            Err(Txt2XlsxError::Config(msg)) => assert!(msg.contains("Preview limit")),
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_build_with_invalid_temperature() {
        let result = ExtractorBuilder::new()
            .with_api_key("key")
            .with_temperature(-0.1)
            .build();
        assert!(matches!(result, Err(Txt2XlsxError::Config(_))));
    }

    #[test]
    fn test_extract_sends_schema_and_prompt() {
        let backend = RecordingBackend::default();
        let extractor = ExtractorBuilder::new()
            .with_backend(backend.clone())
            .with_temperature(0.2)
            .build()
            .unwrap();

        let table = extractor.extract("Sales: Jan $100, Feb $200").unwrap();
        assert_eq!(table.row_count(), 2);

        let recorded = backend.requests.borrow();
        assert_eq!(recorded.len(), 1);
        assert!(recorded[0].prompt.contains("Sales: Jan $100, Feb $200"));
        assert_eq!(recorded[0].schema["required"][0], "filename");
        assert_eq!(recorded[0].temperature, 0.2);
    }

    #[test]
    fn test_extract_blank_input() {
        let extractor = static_extractor(SALES_REPLY);
        assert!(matches!(
            extractor.extract("   \n"),
            Err(Txt2XlsxError::InvalidState(_))
        ));
    }

    #[test]
    fn test_extract_input_too_large() {
        let extractor = ExtractorBuilder::new()
            .with_backend(StaticBackend::new(SALES_REPLY))
            .with_max_input_bytes(8)
            .build()
            .unwrap();

        assert!(matches!(
            extractor.extract("this is longer than eight bytes"),
            Err(Txt2XlsxError::SecurityViolation(_))
        ));
    }

    #[test]
    fn test_extract_empty_reply() {
        let extractor = static_extractor("  ");
        assert!(matches!(
            extractor.extract("text"),
            Err(Txt2XlsxError::EmptyResponse)
        ));
    }

    #[test]
    fn test_extract_malformed_reply() {
        let extractor = static_extractor(r#"{"filename": "x", "columns": "not-an-array"}"#);
        assert!(matches!(extractor.extract("text"), Err(Txt2XlsxError::Json(_))));
    }

    #[test]
    fn test_preview_to_string() {
        let extractor = static_extractor(SALES_REPLY);
        let table = extractor.extract("Sales").unwrap();
        let preview = extractor.preview_to_string(&table).unwrap();

        assert!(preview.contains("Preview: sales.xlsx"));
        assert!(preview.contains("| Feb   | 200    |"));
    }

    #[test]
    fn test_export_to_buffer() {
        let extractor = static_extractor(SALES_REPLY);
        let table = extractor.extract("Sales").unwrap();
        let buffer = extractor.export_to_buffer(&table).unwrap();
        assert!(!buffer.is_empty());
    }
}
