//! Session Module
//!
//! 入力テキスト・処理状態・抽出結果・テーマを保持するセッションを提供するモジュール。
//! 状態は `Idle → Processing → Success | Error` の順に遷移し、遷移のたびに
//! 表示状態がまるごと置き換えられます。

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::api::{ProcessingStatus, Theme};
use crate::builder::Extractor;
use crate::error::Txt2XlsxError;
use crate::types::ExtractedTable;

/// 抽出セッション
///
/// 同時に実行できる抽出リクエストは1つだけです。処理中の再送信や入力変更は
/// `Txt2XlsxError::InvalidState`で拒否されます。
///
/// # 使用例
///
/// ```rust
/// use txt2xlsx::{ExtractorBuilder, ProcessingStatus, Session, StaticBackend};
///
/// let reply = r#"{"filename":"sales","columns":["Month","Amount"],"rows":[["Jan","100"]]}"#;
/// let extractor = ExtractorBuilder::new()
///     .with_backend(StaticBackend::new(reply))
///     .build()
///     .unwrap();
///
/// let mut session = Session::new();
/// session.set_input("Sales: Jan $100").unwrap();
/// assert_eq!(session.submit(&extractor).unwrap(), ProcessingStatus::Success);
/// assert_eq!(session.table().unwrap().row_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Session {
    input: String,
    status: ProcessingStatus,
    table: Option<ExtractedTable>,
    error: Option<String>,
    theme: Theme,
}

impl Session {
    /// 初期状態（`Idle`・入力なし・ライトテーマ）のセッションを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// 現在の処理状態
    pub fn status(&self) -> ProcessingStatus {
        self.status
    }

    /// 入力テキスト
    pub fn input(&self) -> &str {
        &self.input
    }

    /// 抽出結果（`Success`の場合のみ）
    pub fn table(&self) -> Option<&ExtractedTable> {
        self.table.as_ref()
    }

    /// ユーザー向けのエラーメッセージ（`Error`の場合のみ）
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// 現在のテーマ
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// テーマを切り替え、切り替え後のテーマを返す
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// 入力テキストを置き換える
    pub fn set_input(&mut self, text: impl Into<String>) -> Result<(), Txt2XlsxError> {
        self.ensure_not_processing("edit input")?;
        self.input = text.into();
        Ok(())
    }

    /// クリップボードから読み取ったテキストで入力を置き換える
    pub fn paste(&mut self, clipboard_text: impl Into<String>) -> Result<(), Txt2XlsxError> {
        self.ensure_not_processing("paste")?;
        self.input = clipboard_text.into();
        log::debug!("Pasted {} bytes", self.input.len());
        Ok(())
    }

    /// 入力・結果・エラーを消去し、`Idle`に戻す
    pub fn clear(&mut self) {
        self.input.clear();
        self.table = None;
        self.error = None;
        self.status = ProcessingStatus::Idle;
    }

    /// 抽出を開始できるか（入力が空白のみでなく、処理中でない）
    pub fn can_submit(&self) -> bool {
        !self.input.trim().is_empty() && self.status != ProcessingStatus::Processing
    }

    /// 抽出を実行し、遷移後の状態を返す
    ///
    /// * 入力が空白のみの場合は何もせず、現在の状態を返します
    /// * 成功時は`Success`に遷移し、テーブルを保持します
    /// * 失敗時は`Error`に遷移し、汎用エラーメッセージを保持します
    ///   （詳細はログに出力されます）
    ///
    /// # 発生し得るエラー
    ///
    /// * `Txt2XlsxError::InvalidState`: 既に処理中の場合
    pub fn submit(&mut self, extractor: &Extractor) -> Result<ProcessingStatus, Txt2XlsxError> {
        self.ensure_not_processing("submit")?;
        if self.input.trim().is_empty() {
            return Ok(self.status);
        }

        self.status = ProcessingStatus::Processing;
        self.table = None;
        self.error = None;
        log::info!("Extracting table from {} bytes of text", self.input.len());

        match extractor.extract(&self.input) {
            Ok(table) => {
                self.table = Some(table);
                self.status = ProcessingStatus::Success;
            }
            Err(e) => {
                log::error!("Extraction failed: {e}");
                self.error = Some(e.user_message());
                self.status = ProcessingStatus::Error;
            }
        }

        Ok(self.status)
    }

    /// 抽出結果をワークブックとして`dir`に保存する
    ///
    /// # 発生し得るエラー
    ///
    /// * `Txt2XlsxError::InvalidState`: 抽出結果がない場合
    pub fn download(
        &self,
        extractor: &Extractor,
        dir: impl AsRef<Path>,
    ) -> Result<PathBuf, Txt2XlsxError> {
        let table = self.require_table("download")?;
        extractor.export(table, dir)
    }

    /// 抽出結果に対応するカレンダーリンクを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `Txt2XlsxError::InvalidState`: 抽出結果がない場合
    pub fn calendar_url(&self, now: DateTime<Utc>) -> Result<String, Txt2XlsxError> {
        let table = self.require_table("build a calendar link")?;
        Ok(crate::calendar::calendar_url_for_table(table, now))
    }

    fn ensure_not_processing(&self, action: &str) -> Result<(), Txt2XlsxError> {
        if self.status == ProcessingStatus::Processing {
            return Err(Txt2XlsxError::InvalidState(format!(
                "cannot {action} while an extraction is in progress"
            )));
        }
        Ok(())
    }

    fn require_table(&self, action: &str) -> Result<&ExtractedTable, Txt2XlsxError> {
        self.table.as_ref().ok_or_else(|| {
            Txt2XlsxError::InvalidState(format!("no extracted table to {action}"))
        })
    }
}
