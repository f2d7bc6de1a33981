//! Contracts with the comparison service and the HTTP plumbing shared by
//! every backend.
//!
//! The viewer only needs two calls: list the sheets of a file, and fetch one
//! sheet's cell matrix. [`SheetCatalog`] and [`GridDataSource`] describe them;
//! [`fetch::HttpBackend`] implements both over `window.fetch` in the browser.

#[cfg(target_arch = "wasm32")]
pub mod fetch;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Deserialize;

use crate::error::{Result, SxsError};
use crate::types::{FileRef, GridSnapshot, SheetList, SheetName};

/// Characters escaped inside one URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'\\')
    .add(b'^')
    .add(b'|');

/// Resolves the ordered sheet names of an uploaded file.
#[allow(async_fn_in_trait)]
pub trait SheetCatalog {
    async fn list_sheets(&self, file: &FileRef) -> Result<Vec<SheetName>>;
}

/// Fetches the full cell matrix of one sheet.
#[allow(async_fn_in_trait)]
pub trait GridDataSource {
    async fn load_sheet(&self, file: &FileRef, sheet: &str) -> Result<GridSnapshot>;
}

/// One request against the service, carrying what it needs to build its URL
/// and to classify a failure.
#[derive(Debug, Clone, Copy)]
pub enum RemoteCall<'a> {
    /// `GET {base}/sheets/{file}`
    Catalog { file: &'a FileRef },
    /// `GET {base}/data/{file}/{sheet}`
    Sheet { file: &'a FileRef, sheet: &'a str },
}

impl RemoteCall<'_> {
    /// Absolute or base-relative URL for this call.
    pub fn url(&self, api_base: &str) -> String {
        let base = api_base.trim_end_matches('/');
        match self {
            Self::Catalog { file } => format!("{base}/sheets/{}", encode_segment(file.as_str())),
            Self::Sheet { file, sheet } => format!(
                "{base}/data/{}/{}",
                encode_segment(file.as_str()),
                encode_segment(sheet)
            ),
        }
    }

    /// Map a non-success HTTP status (and its body) to the error taxonomy.
    pub fn classify_status(&self, status: u16, body: &str) -> SxsError {
        let detail = error_detail(body).unwrap_or_else(|| format!("HTTP {status}"));
        if matches!(status, 502..=504) {
            return SxsError::RemoteUnavailable(detail);
        }
        match (self, status) {
            (Self::Catalog { file } | Self::Sheet { file, .. }, 404) => {
                SxsError::FileNotFound(file.to_string())
            }
            (Self::Sheet { file, sheet }, _) => SxsError::SheetNotFound {
                file: file.to_string(),
                sheet: (*sheet).to_string(),
            },
            (Self::Catalog { .. }, _) => SxsError::RemoteUnavailable(detail),
        }
    }

    /// Map a transport-level failure (request never completed).
    pub fn transport_error(&self, reason: &str) -> SxsError {
        SxsError::RemoteUnavailable(reason.to_string())
    }
}

/// Percent-encode one path segment.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Extract the `detail` message from an error body, if it has one.
pub fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Decode a `/sheets/{file}` success body.
pub fn decode_sheet_list(body: &str) -> Result<Vec<SheetName>> {
    let list: SheetList = serde_json::from_str(body)?;
    Ok(list.sheets)
}

/// Decode a `/data/{file}/{sheet}` success body.
pub fn decode_snapshot(body: &str) -> Result<GridSnapshot> {
    Ok(serde_json::from_str(body)?)
}
