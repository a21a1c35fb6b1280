//! # File I/O Module
//!
//! Reading request documents and writing response documents:
//! - **Atomic saves**: write to .tmp, sync, rename to prevent partial files
//! - **Version validation**: response documents carry a schema version
//!
//! ## File Format
//!
//! Request documents are JSON: one request object or an array of them.
//! Response documents wrap the answered envelopes:
//!
//! ```json
//! { "version": "0.1.0", "generated_at": "2025-01-01T00:00:00Z", "responses": [ ... ] }
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use composite_core::api::handle_batch_json;
//! use composite_core::file_io::{load_request_text, save_responses};
//! use composite_core::validation::ValidationLimits;
//! use std::path::Path;
//!
//! let text = load_request_text(Path::new("requests.json"))?;
//! let responses = handle_batch_json(&text, &ValidationLimits::default());
//! save_responses(&responses, Path::new("responses.json"))?;
//! # Ok::<(), composite_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::CalculationResponse;
use crate::errors::{CalcError, CalcResult};

/// Current schema version for response documents
pub const SCHEMA_VERSION: &str = "0.1.0";

/// A saved batch of responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseDocument {
    /// Schema version this document was written with
    pub version: String,

    pub generated_at: DateTime<Utc>,

    pub responses: Vec<CalculationResponse>,
}

impl ResponseDocument {
    pub fn new(responses: Vec<CalculationResponse>) -> Self {
        ResponseDocument {
            version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            responses,
        }
    }
}

/// Read a request document into memory.
pub fn load_request_text(path: &Path) -> CalcResult<String> {
    fs::read_to_string(path).map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))
}

/// Save responses to a file with atomic write semantics.
///
/// The save process:
/// 1. Serialize the document to JSON
/// 2. Write to a temporary file (.tmp)
/// 3. Sync to disk (fsync)
/// 4. Rename over the target
pub fn save_responses(responses: &[CalculationResponse], path: &Path) -> CalcResult<()> {
    let document = ResponseDocument::new(responses.to_vec());
    let json = serde_json::to_string_pretty(&document).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .sync_all()
        .map_err(|e| CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    info!(path = %path.display(), count = responses.len(), "responses saved");
    Ok(())
}

/// Load a response document.
///
/// # Returns
///
/// * `Err(CalcError::VersionMismatch)` - file version is incompatible
/// * `Err(CalcError::SerializationError)` - invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_responses(path: &Path) -> CalcResult<ResponseDocument> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let document: ResponseDocument = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&document.version)?;
    Ok(document)
}

fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version.split('.').filter_map(|p| p.parse().ok()).collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION.split('.').filter_map(|p| p.parse().ok()).collect();

    let (Some(&file_major), Some(&current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };

    if file_major != current_major {
        return Err(mismatch());
    }

    // 0.x: a newer minor may carry breaking changes
    if current_major == 0 {
        if let (Some(&file_minor), Some(&current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }

    Ok(())
}
