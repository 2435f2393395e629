//! Calendar Link Module
//!
//! 抽出結果に関連するGoogleカレンダーの予定作成リンクを生成するモジュール。
//! 日付の解析に失敗しても処理は失敗せず、「現在時刻から1時間後」で代替します。

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::types::{CalendarEvent, ExtractedTable};

/// 予定作成エンドポイント
pub const CALENDAR_BASE_URL: &str = "https://calendar.google.com/calendar/render";

/// カレンダーの日時形式（`YYYYMMDDTHHMMSSZ`）
const CALENDAR_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// タイムゾーンを持たない日時として受け付ける形式
const NAIVE_DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// 日付のみとして受け付ける形式
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// 日時文字列を解析する
///
/// * オフセット付き（RFC 3339 / RFC 2822）: そのまま
/// * 日付のみ: UTCの0時
/// * オフセットなしの日時: ローカルタイムゾーン
fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).single())
        .map(|dt| dt.with_timezone(&Utc))
}

/// 日時をカレンダー形式に変換する
///
/// 解析できない場合は`now`の1時間後を使用します。
pub fn format_calendar_date(value: &str, now: DateTime<Utc>) -> String {
    let datetime = parse_datetime(value).unwrap_or_else(|| {
        log::warn!("Unparsable calendar date '{value}', using one hour from now");
        now + Duration::hours(1)
    });
    datetime.format(CALENDAR_DATE_FORMAT).to_string()
}

/// Googleカレンダーの予定作成URLを生成する
///
/// # 引数
///
/// * `event` - 予定の情報。`None`の場合は「1時間後から1時間の確認予定」を生成します
/// * `fallback_title` - `event`が`None`の場合のタイトルに使用する名前
/// * `now` - 現在時刻（代替日時の基準）
///
/// この関数は失敗しません。
///
/// # 使用例
///
/// ```rust
/// use chrono::Utc;
/// use txt2xlsx::google_calendar_url;
///
/// let url = google_calendar_url(None, "sales", Utc::now());
/// assert!(url.contains("action=TEMPLATE"));
/// assert!(url.contains("text=Review%3A+sales"));
/// ```
pub fn google_calendar_url(
    event: Option<&CalendarEvent>,
    fallback_title: &str,
    now: DateTime<Utc>,
) -> String {
    let (title, details, location, start, end) = match event {
        Some(event) => (
            event.title.clone(),
            event.description.clone(),
            event.location.clone().unwrap_or_default(),
            format_calendar_date(&event.start_date, now),
            format_calendar_date(&event.end_date, now),
        ),
        None => (
            format!("Review: {fallback_title}"),
            "Review the extracted Excel data.".to_string(),
            String::new(),
            (now + Duration::hours(1))
                .format(CALENDAR_DATE_FORMAT)
                .to_string(),
            (now + Duration::hours(2))
                .format(CALENDAR_DATE_FORMAT)
                .to_string(),
        ),
    };

    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("action", "TEMPLATE")
        .append_pair("text", &title)
        .append_pair("dates", &format!("{start}/{end}"))
        .append_pair("details", &details)
        .append_pair("location", &location)
        .finish();

    format!("{CALENDAR_BASE_URL}?{query}")
}

/// テーブルに対応するカレンダーURLを生成する
///
/// テーブルにイベントがない場合は、ファイル名をタイトルにした確認予定を生成します。
pub fn calendar_url_for_table(table: &ExtractedTable, now: DateTime<Utc>) -> String {
    google_calendar_url(
        table.calendar_event.as_ref(),
        table.display_filename(),
        now,
    )
}
