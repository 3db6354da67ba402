//! Status lines and fallback messages shared by both front ends

use crate::model::UploadResponse;

pub const NO_FILE_MESSAGE: &str = "Please select a CSV file";
pub const UPLOAD_FALLBACK: &str = "Upload failed";
pub const REPORT_FALLBACK: &str = "PDF generation failed";
/// Login and register failures without a server message
pub const AUTH_FALLBACK: &str = "Request failed";

/// Line shown under the upload control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Success line for a finished upload
pub fn upload_success_message(response: &UploadResponse) -> String {
    format!(
        "Uploaded: {} ({} equipment)",
        response.filename, response.total_equipment_count
    )
}
