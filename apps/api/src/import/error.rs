use thiserror::Error;

/// Fatal outcomes of an import attempt. No partial record is ever produced
/// alongside one of these.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Unsupported file type: {0}. Please use a PDF, DOCX, or TXT file.")]
    UnsupportedFormat(String),

    #[error("Failed to parse document: {0}. Please ensure the file is not corrupted or password-protected, or try a different file.")]
    CorruptDocument(String),

    #[error("No text content found in the file")]
    EmptyContent,

    #[error("Unable to process the document right now: {0}. Please try again.")]
    ServiceUnavailable(String),

    #[error("File is {size} bytes; the limit is {limit} bytes")]
    FileTooLarge { size: usize, limit: usize },
}

impl ImportError {
    /// `true` when retrying the same file may succeed; otherwise the file itself must change.
    pub fn retryable(&self) -> bool {
        matches!(self, ImportError::ServiceUnavailable(_))
    }
}
