//! Extraction Backend Module
//!
//! 抽出APIの呼び出しを抽象化するモジュール。
//! 既定の実装はGemini（[`GeminiBackend`]）で、保存済みの応答を返す
//! [`StaticBackend`]はオフライン実行とテストに使用します。

mod gemini;

pub use gemini::GeminiBackend;

use serde_json::Value;

use crate::error::Txt2XlsxError;

/// 抽出APIへのリクエスト内容
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRequest {
    /// 入力テキストを埋め込んだプロンプト
    pub prompt: String,

    /// 応答が従うべきJSONスキーマ
    pub schema: Value,

    /// サンプリング温度
    pub temperature: f32,
}

/// 抽出APIのバックエンド
///
/// 1回の呼び出しにつき1回だけリクエストを送信し、モデルが返した
/// JSONテキストをそのまま返します。再試行は行いません。
pub trait ExtractionBackend: std::fmt::Debug {
    /// 抽出リクエストを送信し、応答テキストを返す
    ///
    /// # Errors
    ///
    /// 通信エラー、HTTPエラー、応答形式の不一致の場合に[`Txt2XlsxError`]を返します。
    fn complete(&self, request: &ExtractionRequest) -> Result<String, Txt2XlsxError>;

    /// ログ出力用のバックエンド名
    fn name(&self) -> &str;
}

/// 固定の応答を返すバックエンド
///
/// 以前に保存した抽出結果（JSON）を再利用して、プレビューや書き出しを
/// ネットワークなしで実行する場合に使用します。
#[derive(Debug, Clone)]
pub struct StaticBackend {
    reply: String,
}

impl StaticBackend {
    /// 返却する応答テキストを指定して生成
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

impl ExtractionBackend for StaticBackend {
    fn complete(&self, _request: &ExtractionRequest) -> Result<String, Txt2XlsxError> {
        Ok(self.reply.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}
