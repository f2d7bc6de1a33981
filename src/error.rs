//! Structured error types for sxsview.
//!
//! Every remote failure is scoped to one side of the viewer; these values are
//! stored per side and rendered inline rather than propagated to the host.

/// All errors that can occur while loading, decoding, or presenting a comparison.
#[derive(Debug, thiserror::Error)]
pub enum SxsError {
    /// The comparison service could not be reached or answered with a server fault.
    #[error("Service unavailable: {0}")]
    RemoteUnavailable(String),

    /// The file identifier is unknown to the service.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// The sheet does not exist in the given file (or could not be read).
    #[error("Sheet '{sheet}' not found in {file}")]
    SheetNotFound { file: String, sheet: String },

    /// A response body or input document failed to decode.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The host passed something the viewer cannot use.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// DOM or Canvas setup failed.
    #[error("DOM error: {0}")]
    Dom(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SxsError>;

impl SxsError {
    /// Short category label, used for log fields and the side status line.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RemoteUnavailable(_) => "remote-unavailable",
            Self::FileNotFound(_) => "file-not-found",
            Self::SheetNotFound { .. } => "sheet-not-found",
            Self::Decode(_) => "decode",
            Self::InvalidInput(_) => "invalid-input",
            Self::Dom(_) => "dom",
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl From<SxsError> for wasm_bindgen::JsValue {
    fn from(e: SxsError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_not_found_names_file_and_sheet() {
        let err = SxsError::SheetNotFound {
            file: "a.xlsx".to_string(),
            sheet: "Q3 Totals".to_string(),
        };
        assert_eq!(err.to_string(), "Sheet 'Q3 Totals' not found in a.xlsx");
        assert_eq!(err.kind(), "sheet-not-found");
    }

    #[test]
    fn decode_wraps_serde_error() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("nope");
        let err = match parse {
            Ok(_) => return,
            Err(e) => SxsError::from(e),
        };
        assert_eq!(err.kind(), "decode");
        assert!(err.to_string().starts_with("Decode error:"));
    }
}
