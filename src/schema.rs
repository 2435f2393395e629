//! Extraction Schema Module
//!
//! 抽出APIに送信する固定の応答スキーマとプロンプトを定義するモジュール。

use serde_json::{json, Value};

/// 応答スキーマで必須となるプロパティ
pub(crate) const REQUIRED_PROPERTIES: [&str; 3] = ["filename", "columns", "rows"];

/// 抽出APIに渡す応答スキーマを生成する
///
/// Gemini APIの`responseSchema`形式（OpenAPIサブセット）で記述します。
/// `rows`の要素は文字列として要求しますが、応答側では数値や論理値も受け付けます。
pub(crate) fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "filename": {
                "type": "STRING",
                "description": "A short, descriptive filename for the excel file (without extension), e.g., 'sales_report_q1'."
            },
            "summary": {
                "type": "STRING",
                "description": "A brief 1-sentence summary of the data extracted."
            },
            "columns": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "The headers/column names for the tabular data."
            },
            "rows": {
                "type": "ARRAY",
                "items": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "The data rows corresponding to the columns. Ensure all rows have the same length as columns."
                },
                "description": "The list of rows containing the data."
            }
        },
        "required": REQUIRED_PROPERTIES,
    })
}

/// 入力テキストを埋め込んだ抽出プロンプトを生成する
pub(crate) fn build_prompt(text: &str) -> String {
    format!(
        r#"Analyze the following text and extract any structured data found within it into a clean, tabular format suitable for an Excel spreadsheet.

Instructions:
1. Identify the main entities and attributes described in the text.
2. Create meaningful column headers (e.g., "Date", "Product Name", "Amount", "Status").
3. Standardize dates to ISO format (YYYY-MM-DD) if possible, or keep as legible string.
4. Ensure every row has a value for every column (use empty string or null if missing).
5. Generate a concise filename based on the content.

Input Text:
"""
{text}
"""
"#
    )
}
