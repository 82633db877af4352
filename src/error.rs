//! Single error type for everything that can fail past the per-row level.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API 오류: {msg} (코드: {code})")]
    Api { code: String, msg: String },

    /// No deals matched the period/city/region filter. Callers render this
    /// as "no data", not as an internal failure.
    #[error("해당 기간의 데이터가 없습니다. (period={period_key}, filter={filter:?})")]
    NoData {
        period_key: String,
        filter: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, ReportError>;
