//! Metadata echoed back for an uploaded file.

use serde::{Deserialize, Serialize};

/// What the upload endpoint reports about a received file.
///
/// The file body itself is discarded; only its size is counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadInfo {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub size: u64,
}
