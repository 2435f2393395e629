//! Client Configuration Module
//!
//! 抽出APIクライアントの接続設定と、環境変数からの読み込みを提供するモジュール。

use std::time::Duration;

use crate::error::Txt2XlsxError;

/// 既定のモデル名
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// 既定のAPIベースURL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// 既定のtemperature（抽出結果を安定させるため低めに設定）
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// 既定のリクエストタイムアウト
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// APIキーを読み込む環境変数（優先順）
const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// 抽出APIクライアントの接続設定
#[derive(Clone, PartialEq)]
pub struct ClientConfig {
    /// APIキー
    pub api_key: String,

    /// モデル名
    pub model: String,

    /// APIベースURL
    pub base_url: String,

    /// サンプリング温度（0.0〜2.0）
    pub temperature: f32,

    /// リクエストタイムアウト
    pub timeout: Duration,
}

// APIキーをログに出さない
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// 環境変数から設定を読み込む
    ///
    /// * `GEMINI_API_KEY`（未設定の場合は`API_KEY`）: APIキー
    /// * `TXT2XLSX_MODEL`: モデル名
    /// * `TXT2XLSX_BASE_URL`: APIベースURL
    ///
    /// 未設定の項目は既定値のままです。APIキーが見つからない場合も
    /// ここではエラーにせず、`ExtractorBuilder::build()`で検出します。
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の検索関数から設定を読み込む
    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some((var, key)) = API_KEY_VARS
            .iter()
            .find_map(|var| lookup(var).filter(|v| !v.trim().is_empty()).map(|v| (var, v)))
        {
            log::debug!("Using API key from {var}");
            config.api_key = key;
        }
        if let Some(model) = lookup("TXT2XLSX_MODEL").filter(|v| !v.trim().is_empty()) {
            config.model = model;
        }
        if let Some(base_url) = lookup("TXT2XLSX_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url;
        }

        config
    }

    /// 設定を検証する
    ///
    /// `require_api_key`が`false`の場合（独自バックエンド使用時）はAPIキーを検証しません。
    pub(crate) fn validate(&self, require_api_key: bool) -> Result<(), Txt2XlsxError> {
        if require_api_key && self.api_key.trim().is_empty() {
            return Err(Txt2XlsxError::Config(
                "API key is not set (use GEMINI_API_KEY or API_KEY)".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(Txt2XlsxError::Config("Model name is empty".to_string()));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Txt2XlsxError::Config(format!(
                "Invalid temperature: {} (expected 0.0..=2.0)",
                self.temperature
            )));
        }

        if self.timeout.is_zero() {
            return Err(Txt2XlsxError::Config("Timeout must be non-zero".to_string()));
        }

        url::Url::parse(&self.base_url).map_err(|e| {
            Txt2XlsxError::Config(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_from_lookup_prefers_gemini_key() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "gemini-key"),
            ("API_KEY", "legacy-key"),
        ]));
        assert_eq!(config.api_key, "gemini-key");
    }

    #[test]
    fn test_from_lookup_falls_back_to_api_key() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "  "),
            ("API_KEY", "legacy-key"),
            ("TXT2XLSX_MODEL", "gemini-2.5-pro"),
        ]));
        assert_eq!(config.api_key, "legacy-key");
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_validate_missing_api_key() {
        let config = ClientConfig::default();
        match config.validate(true) {
            Err(Txt2XlsxError::Config(msg)) => assert!(msg.contains("API key")),
            _ => panic!("Expected Config error"),
        }
        assert!(config.validate(false).is_ok());
    }

    #[test]
    fn test_validate_temperature_and_url() {
        let config = ClientConfig {
            api_key: "k".to_string(),
            temperature: 3.0,
            ..ClientConfig::default()
        };
        assert!(config.validate(true).is_err());

        let config = ClientConfig {
            api_key: "k".to_string(),
            base_url: "not a url".to_string(),
            ..ClientConfig::default()
        };
        match config.validate(true) {
            Err(Txt2XlsxError::Config(msg)) => assert!(msg.contains("Invalid base URL")),
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig {
            api_key: "secret-key".to_string(),
            ..ClientConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }
}
