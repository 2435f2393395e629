//! txt2xlsx - Turn unstructured text into Excel workbooks via LLM table extraction
//!
//! This crate sends free-form text (emails, notes, reports) to a generative
//! language model with a fixed response schema, previews the extracted table,
//! exports it as an XLSX workbook and builds a Google Calendar link for any
//! event found in the text.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use txt2xlsx::ExtractorBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads GEMINI_API_KEY (or API_KEY) from the environment
//!     let extractor = ExtractorBuilder::from_env().build()?;
//!
//!     let table = extractor.extract("Sales: Jan $100, Feb $200")?;
//!     println!("{}", extractor.preview_to_string(&table)?);
//!
//!     // Writes ./<filename>.xlsx
//!     let path = extractor.export(&table, ".")?;
//!     println!("Saved {}", path.display());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Offline Extraction
//!
//! Any [`ExtractionBackend`] can stand in for the model. [`StaticBackend`]
//! replays a fixed reply, which is handy for tests and dry runs:
//!
//! ```rust
//! use txt2xlsx::{ExtractorBuilder, StaticBackend};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let reply = r#"{
//!     "filename": "sales",
//!     "columns": ["Month", "Amount"],
//!     "rows": [["Jan", "100"], ["Feb", "200"]]
//! }"#;
//!
//! let extractor = ExtractorBuilder::new()
//!     .with_backend(StaticBackend::new(reply))
//!     .build()?;
//!
//! let table = extractor.extract("Sales: Jan $100, Feb $200")?;
//! assert_eq!(table.row_count(), 2);
//!
//! let workbook = extractor.export_to_buffer(&table)?;
//! assert!(!workbook.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use txt2xlsx::{ExportOptions, ExtractorBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = ExtractorBuilder::new()
//!         .with_api_key("your-api-key")
//!         .with_model("gemini-2.5-pro")
//!         .with_timeout(Duration::from_secs(120))
//!         .with_preview_limit(20)
//!         .with_export_options(ExportOptions {
//!             include_summary: false,
//!             auto_filter: true,
//!         })
//!         .build()?;
//!
//!     let table = extractor.extract("Meeting with ACME on 2025-03-01 at 10:00")?;
//!     extractor.export(&table, "out")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Interactive Sessions
//!
//! [`Session`] tracks the input, processing status, result and theme of a
//! single user session, allowing only one extraction in flight at a time.

mod api;
mod builder;
mod calendar;
mod config;
mod error;
mod export;
mod grid;
mod output;
mod provider;
mod schema;
mod security;
mod session;
mod types;

// 公開API
pub use api::{ExportOptions, PreviewFormat, ProcessingStatus, Theme};
pub use builder::{Extractor, ExtractorBuilder, DEFAULT_PREVIEW_LIMIT};
pub use calendar::{calendar_url_for_table, format_calendar_date, google_calendar_url};
pub use config::ClientConfig;
pub use error::{Txt2XlsxError, GENERIC_ERROR_MESSAGE};
pub use export::{output_filename, DATA_SHEET_NAME, SUMMARY_SHEET_NAME};
pub use provider::{ExtractionBackend, ExtractionRequest, GeminiBackend, StaticBackend};
pub use security::sanitize_filename;
pub use session::Session;
pub use types::{CalendarEvent, CellValue, ExtractedTable, DEFAULT_FILENAME, NULL_MARKER};
