use serde::{Deserialize, Serialize};

use super::FileRef;

/// Diff classification of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Modified,
    Added,
    Removed,
}

impl ChangeType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Modified => "modified",
            Self::Added => "added",
            Self::Removed => "removed",
        }
    }
}

/// One per-cell difference reported by the compare service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub row: u32,
    pub col: u32,
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    #[serde(default)]
    pub old: String,
    #[serde(default)]
    pub new: String,
}

impl ChangeRecord {
    pub fn new(row: u32, col: u32, change_type: ChangeType) -> Self {
        Self {
            row,
            col,
            change_type,
            old: String::new(),
            new: String::new(),
        }
    }
}

/// Aggregate numbers from the compare service, passed through for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareSummary {
    #[serde(default)]
    pub total_rows: Option<u64>,
    #[serde(default)]
    pub total_cols: Option<u64>,
    #[serde(default)]
    pub changes_count: Option<u64>,
}

/// The pair of uploaded files being compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareFiles {
    pub file1: FileRef,
    pub file2: FileRef,
}

/// Result body of the compare call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareData {
    #[serde(default)]
    pub summary: CompareSummary,
    #[serde(default)]
    pub changes: Vec<ChangeRecord>,
}

/// Everything the viewer receives from the upload/compare flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareInput {
    pub files: CompareFiles,
    #[serde(default)]
    pub data: CompareData,
}

impl CompareInput {
    /// Decode the compare flow's JSON document.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
