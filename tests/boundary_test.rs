//! Boundary Tests for txt2xlsx
//!
//! 空の入力、空のテーブル、列数の上限、全角文字などの境界条件を検証します。

use calamine::{open_workbook_from_rs, Reader, Xlsx};
use std::io::Cursor;
use txt2xlsx::{ExtractorBuilder, StaticBackend, Txt2XlsxError, DATA_SHEET_NAME};

fn extractor_with(reply: impl Into<String>) -> txt2xlsx::Extractor {
    ExtractorBuilder::new()
        .with_backend(StaticBackend::new(reply))
        .build()
        .unwrap()
}

/// TC-B-001: 空白のみの入力は送信しない
#[test]
fn test_whitespace_only_input() {
    let extractor = extractor_with(r#"{"filename":"x","columns":[],"rows":[]}"#);

    for input in ["", "   ", "\n\t\n"] {
        match extractor.extract(input) {
            Err(Txt2XlsxError::InvalidState(_)) => {}
            e => panic!("Unexpected result for {:?}: {:?}", input, e),
        }
    }
}

/// TC-B-002: 列もデータもないテーブル
#[test]
fn test_no_columns() {
    let extractor = extractor_with(r#"{"filename":"empty","columns":[],"rows":[]}"#);
    let table = extractor.extract("text").unwrap();

    let preview = extractor.preview_to_string(&table).unwrap();
    assert!(preview.contains("0 rows • 0 columns"));
    assert!(preview.contains("No rows found in the provided text."));

    // 空のワークブックでも書き出せる
    let buffer = extractor.export_to_buffer(&table).unwrap();
    let workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(buffer)).unwrap();
    assert_eq!(workbook.sheet_names(), vec![DATA_SHEET_NAME.to_string()]);
}

/// TC-B-003: ファイル名が省略された応答
#[test]
fn test_missing_filename() {
    let extractor = extractor_with(r#"{"columns":["A"],"rows":[["1"]]}"#);
    let table = extractor.extract("text").unwrap();

    assert_eq!(txt2xlsx::output_filename(&table), "extracted_data.xlsx");
    assert!(extractor
        .preview_to_string(&table)
        .unwrap()
        .contains("Preview: extracted_data.xlsx"));
}

/// TC-B-004: 必須項目が欠けた応答
#[test]
fn test_missing_required_fields() {
    for reply in [
        r#"{"filename":"x","rows":[]}"#,
        r#"{"filename":"x","columns":[]}"#,
        r#"[]"#,
    ] {
        match extractor_with(reply).extract("text") {
            Err(Txt2XlsxError::Json(_)) => {}
            e => panic!("Unexpected result for {}: {:?}", reply, e),
        }
    }
}

/// TC-B-005: 空の応答
#[test]
fn test_blank_reply() {
    match extractor_with("  \n ").extract("text") {
        Err(Txt2XlsxError::EmptyResponse) => {}
        e => panic!("Unexpected result: {:?}", e),
    }
}

/// TC-B-006: Excelの最大列数
#[test]
fn test_max_columns() {
    let columns = |n: usize| {
        let names: Vec<String> = (0..n).map(|i| format!("\"C{}\"", i)).collect();
        format!(r#"{{"filename":"wide","columns":[{}],"rows":[]}}"#, names.join(","))
    };

    assert!(extractor_with(columns(16_384)).extract("text").is_ok());

    match extractor_with(columns(16_385)).extract("text") {
        Err(Txt2XlsxError::SecurityViolation(msg)) => assert!(msg.contains("Column count")),
        e => panic!("Unexpected result: {:?}", e),
    }
}

/// TC-B-007: 全角文字を含むプレビューの列揃え
#[test]
fn test_wide_characters_alignment() {
    let extractor = extractor_with(
        r#"{"filename":"uriage","columns":["月","金額"],"rows":[["一月","100"],["Feb","2000"]]}"#,
    );
    let table = extractor.extract("売上").unwrap();
    let preview = extractor.preview_to_string(&table).unwrap();

    let table_lines: Vec<&str> = preview.lines().filter(|l| l.starts_with('|')).collect();
    assert_eq!(table_lines.len(), 4);

    // 全角文字を表示幅2として揃えるため、各行の表示幅は等しい
    use unicode_width::UnicodeWidthStr;
    let widths: Vec<usize> = table_lines.iter().map(|l| l.width()).collect();
    assert!(widths.windows(2).all(|w| w[0] == w[1]), "{:?}", widths);
}

/// TC-B-008: セル内のパイプと改行
#[test]
fn test_pipe_and_newline_in_cells() {
    let extractor = extractor_with(
        r#"{"filename":"notes","columns":["Note"],"rows":[["a|b"],["line1\nline2"]]}"#,
    );
    let table = extractor.extract("text").unwrap();
    let preview = extractor.preview_to_string(&table).unwrap();

    assert!(preview.contains("a\\|b"));
    assert!(preview.contains("line1 line2"));
}

/// TC-B-009: 列数より長い行
#[test]
fn test_row_longer_than_header() {
    let extractor =
        extractor_with(r#"{"filename":"extra","columns":["A"],"rows":[["1","2","3"]]}"#);
    let table = extractor.extract("text").unwrap();

    // プレビューはヘッダーの列数で切り詰める
    let preview = extractor.preview_to_string(&table).unwrap();
    let row = preview.lines().find(|l| l.starts_with("| 1")).unwrap();
    assert_eq!(row.matches('|').count(), 2);

    // ワークブックにはすべての値を書き出す
    let buffer = extractor.export_to_buffer(&table).unwrap();
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(buffer)).unwrap();
    let range = workbook.worksheet_range(DATA_SHEET_NAME).unwrap();
    assert_eq!(range.get_size(), (2, 3));
}

/// TC-B-010: 値のない末尾行もシートに残る
#[test]
fn test_trailing_empty_rows_in_workbook() {
    for reply in [
        r#"{"filename":"blank","columns":["A","B"],"rows":[["a","b"],["",""]]}"#,
        r#"{"filename":"blank","columns":["A","B"],"rows":[["a","b"],[null,null]]}"#,
    ] {
        let extractor = extractor_with(reply);
        let table = extractor.extract("text").unwrap();
        let buffer = extractor.export_to_buffer(&table).unwrap();

        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(buffer)).unwrap();
        let dimensions = workbook
            .worksheet_cells_reader(DATA_SHEET_NAME)
            .unwrap()
            .dimensions();
        assert_eq!(dimensions.end.0 as usize + 1, table.row_count() + 1, "{}", reply);
        assert_eq!(dimensions.end.1, 1);
    }
}
